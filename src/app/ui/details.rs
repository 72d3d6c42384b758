use eframe::egui::{self, Color32, RichText, Ui};

use skill_horizon::render::category_color;
use skill_horizon::skill::Difficulty;
use skill_horizon::store::GraphStore;

use super::super::ViewModel;

struct NeighborEntry {
    id: String,
    label: String,
    relationship: String,
}

fn neighbors(store: &GraphStore, edge_indices: &[usize], incoming: bool) -> Vec<NeighborEntry> {
    edge_indices
        .iter()
        .filter_map(|&edge_index| {
            let edge = store.edges().get(edge_index)?;
            let other = if incoming { edge.source } else { edge.target };
            let node = store.node(other)?;
            Some(NeighborEntry {
                id: node.id.clone(),
                label: node.display_label().to_owned(),
                relationship: store.link(edge).relationship.clone(),
            })
        })
        .collect()
}

fn difficulty_color(difficulty: Difficulty) -> Color32 {
    match difficulty {
        Difficulty::Beginner => Color32::from_rgb(0x4a, 0xde, 0x80),
        Difficulty::Intermediate => Color32::from_rgb(0xfa, 0xcc, 0x15),
        Difficulty::Advanced => Color32::from_rgb(0xf8, 0x71, 0x71),
        Difficulty::Unknown => Color32::from_gray(160),
    }
}

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        let Some(selected_id) = self.selected_id() else {
            return;
        };

        let store = self.engine.store();
        let Some(index) = store.index_of(&selected_id) else {
            ui.label("Selected node no longer exists in this skill tree.");
            return;
        };
        let Some(node) = store.node(index).cloned() else {
            return;
        };
        let builds_on = neighbors(store, store.incoming(index), true);
        let leads_to = neighbors(store, store.outgoing(index), false);
        let tier = self
            .engine
            .simulation()
            .map(|simulation| simulation.tiers().get(index));

        let mut close = false;
        let mut navigate = None;

        ui.horizontal(|ui| {
            ui.label(
                RichText::new(node.category.glyph())
                    .size(22.0)
                    .color(category_color(node.category)),
            );
            ui.heading(RichText::new(node.display_label()).strong());
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("✖").on_hover_text("Close").clicked() {
                    close = true;
                }
            });
        });
        ui.horizontal_wrapped(|ui| {
            ui.label(
                RichText::new(node.category.label())
                    .color(category_color(node.category))
                    .strong(),
            );
            ui.label(RichText::new(node.difficulty.label()).color(difficulty_color(node.difficulty)));
            if let Some(tier) = tier {
                ui.label(format!("Level {tier}"));
            }
        });
        ui.separator();

        egui::ScrollArea::vertical()
            .id_salt("details_scroll")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                if node.description.trim().is_empty() {
                    ui.label(RichText::new("No description provided.").italics());
                } else {
                    ui.label(node.description.as_str());
                }

                if !node.tags.is_empty() {
                    ui.add_space(6.0);
                    ui.horizontal_wrapped(|ui| {
                        for tag in &node.tags {
                            ui.label(RichText::new(format!("#{tag}")).small().monospace());
                        }
                    });
                }

                if let Some(link) = node.link.as_deref().filter(|link| !link.trim().is_empty()) {
                    ui.add_space(6.0);
                    ui.hyperlink_to("Learn more ↗", link);
                }

                if !node.resources.is_empty() {
                    ui.add_space(6.0);
                    ui.label(RichText::new("Resources").strong());
                    for resource in &node.resources {
                        if resource.starts_with("http://") || resource.starts_with("https://") {
                            ui.hyperlink(resource);
                        } else {
                            ui.label(format!("• {resource}"));
                        }
                    }
                }

                ui.separator();
                for (title, entries, empty) in [
                    ("Builds on", &builds_on, "Nothing; this is a starting point."),
                    ("Leads to", &leads_to, "Nothing yet; this is a summit."),
                ] {
                    ui.label(RichText::new(title).strong());
                    if entries.is_empty() {
                        ui.label(RichText::new(empty).italics());
                    }
                    for entry in entries {
                        let text = if entry.relationship.trim().is_empty() {
                            entry.label.clone()
                        } else {
                            format!("{}  ({})", entry.label, entry.relationship)
                        };
                        if ui.link(text).on_hover_text(entry.id.as_str()).clicked() {
                            navigate = Some(entry.id.clone());
                        }
                    }
                    ui.add_space(6.0);
                }
            });

        if close {
            self.set_selected(None);
        } else if navigate.is_some() {
            self.set_selected(navigate);
        }
    }
}
