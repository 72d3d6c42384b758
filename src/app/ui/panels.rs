use eframe::egui::{self, Align, Color32, Key, Layout, RichText, Ui};

use super::super::{Status, ViewModel};

const ACCENT: Color32 = Color32::from_rgb(0xf9, 0x73, 0x16);

impl ViewModel {
    pub(in crate::app) fn draw_top_bar(
        &mut self,
        ui: &mut Ui,
        status: &Status,
        is_generating: bool,
        generate_requested: &mut bool,
    ) {
        ui.add_space(4.0);
        ui.horizontal(|ui| {
            ui.label(RichText::new("☀").size(20.0).color(ACCENT));
            ui.heading(RichText::new("AI Horizons").strong());
            ui.separator();

            let input = ui.add_enabled(
                !is_generating,
                egui::TextEdit::singleline(&mut self.topic)
                    .hint_text("Enter interest, major, career field, or project...")
                    .desired_width(360.0),
            );
            let submitted = input.lost_focus() && ui.input(|input| input.key_pressed(Key::Enter));

            let can_generate = !is_generating && !self.topic.trim().is_empty();
            let explore = ui
                .add_enabled(can_generate, egui::Button::new("Explore"))
                .on_hover_text("Generate a new skill tree for this topic.");
            if (explore.clicked() || submitted) && can_generate {
                *generate_requested = true;
            }
            if is_generating {
                ui.spinner();
            }

            match status {
                Status::Idle => {}
                Status::Info(message) => {
                    ui.label(RichText::new(message).color(Color32::from_gray(190)));
                }
                Status::Failed(message) => {
                    ui.label(RichText::new(message).color(Color32::from_rgb(0xf4, 0x3f, 0x5e)));
                }
            }

            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                ui.label(self.graph_summary_text());
            });
        });
        ui.add_space(4.0);
    }

    fn graph_summary_text(&self) -> String {
        let store = self.engine.store();
        let max_tier = self
            .engine
            .simulation()
            .map(|simulation| simulation.tiers().max_tier())
            .unwrap_or(1);
        let mut text = format!(
            "nodes: {}  edges: {}  tiers: {}",
            store.len(),
            store.edges().len(),
            max_tier + 1
        );
        if store.dangling_count() > 0 {
            text.push_str(&format!("  ignored edges: {}", store.dangling_count()));
        }
        if self.engine.is_running() {
            text.push_str("  (settling)");
        }
        text
    }
}
