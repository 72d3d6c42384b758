use std::ops::RangeInclusive;

use eframe::egui::{self, Ui};

use skill_horizon::layout::LayoutConfig;

use super::super::ViewModel;

const MAX_SEARCH_ROWS: usize = 12;

fn tuning_slider(
    ui: &mut Ui,
    value: &mut f32,
    range: RangeInclusive<f32>,
    text: &str,
    hover: &str,
) -> bool {
    ui.add(
        egui::Slider::new(value, range)
            .text(text)
            .clamping(egui::SliderClamping::Always),
    )
    .on_hover_text(hover)
    .changed()
}

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Explorer");
        ui.separator();
        ui.add_space(4.0);

        self.draw_search(ui);
        ui.separator();
        self.draw_layout_tuning(ui);
    }

    fn draw_search(&mut self, ui: &mut Ui) {
        ui.label("Find a node")
            .on_hover_text("Fuzzy search over labels and ids; matches are ringed on the canvas.");
        ui.text_edit_singleline(&mut self.search);

        let matches = self.search_matches();
        if self.search.trim().is_empty() {
            return;
        }
        if matches.is_empty() {
            ui.label("No matching nodes.");
            return;
        }

        let mut picked = None;
        for &index in matches.iter().take(MAX_SEARCH_ROWS) {
            let Some(node) = self.engine.store().node(index) else {
                continue;
            };
            let label = format!("{} {}", node.category.glyph(), node.display_label());
            if ui.link(label).on_hover_text(node.id.as_str()).clicked() {
                picked = Some(node.id.clone());
            }
        }
        if matches.len() > MAX_SEARCH_ROWS {
            ui.small(format!("and {} more", matches.len() - MAX_SEARCH_ROWS));
        }

        if picked.is_some() {
            self.set_selected(picked);
        }
    }

    fn draw_layout_tuning(&mut self, ui: &mut Ui) {
        let mut changed = false;
        let config = &mut self.config;

        ui.collapsing("Layout tuning", |ui| {
            changed |= tuning_slider(
                ui,
                &mut config.link_distance,
                40.0..=260.0,
                "Link distance",
                "Rest length of the spring along each edge.",
            );
            changed |= tuning_slider(
                ui,
                &mut config.link_strength,
                0.05..=1.0,
                "Link strength",
                "How strongly connected nodes pull toward their rest length.",
            );
            changed |= tuning_slider(
                ui,
                &mut config.charge_strength,
                -1200.0..=-50.0,
                "Repulsion",
                "Many-body charge between all nodes; more negative pushes harder.",
            );
            changed |= tuning_slider(
                ui,
                &mut config.collision_padding,
                0.0..=40.0,
                "Collision padding",
                "Extra space kept around every node.",
            );
            changed |= tuning_slider(
                ui,
                &mut config.tier_strength,
                0.2..=2.0,
                "Tier pull",
                "Vertical pull toward each node's tier height.",
            );
            changed |= tuning_slider(
                ui,
                &mut config.center_strength,
                0.0..=0.3,
                "Centering",
                "Horizontal pull toward the middle of the canvas.",
            );
            changed |= tuning_slider(
                ui,
                &mut config.jitter,
                0.0..=300.0,
                "Start jitter",
                "Horizontal spread of the seeded starting positions.",
            );

            ui.horizontal(|ui| {
                ui.label("Seed");
                changed |= ui
                    .add(egui::DragValue::new(&mut config.seed).speed(1.0))
                    .on_hover_text("Seed for the starting jitter; equal seeds give equal layouts.")
                    .changed();
            });

            if ui.button("Reset to defaults").clicked() {
                let seed = config.seed;
                *config = LayoutConfig {
                    seed,
                    ..LayoutConfig::default()
                };
                changed = true;
            }
        });

        if changed {
            self.engine.reconfigure(self.config.clone());
        }

        ui.add_space(6.0);
        if ui
            .button("Re-run layout")
            .on_hover_text("Discard positions and lay the current tree out again.")
            .clicked()
        {
            self.engine.restart();
        }
    }
}
