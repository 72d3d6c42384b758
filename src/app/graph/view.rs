use std::collections::HashSet;

use eframe::egui::{
    self, Align2, Color32, FontId, Painter, Pos2, Rect, Sense, Shape, Stroke, Ui, vec2,
};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use skill_horizon::render::{
    EdgeSprite, LABEL_COLOR, LABEL_SIZE, NODE_FILL, NodeSprite, TRANSITION_SECONDS,
    category_color,
};
use skill_horizon::skill::Category;

use super::super::ViewModel;
use super::super::render_utils::{
    BACKGROUND, canvas_to_screen, circle_visible, draw_background, fade, segment_visible,
};

const SEARCH_RING: Color32 = Color32::from_rgb(103, 196, 255);
const SELECTED_HALO: Color32 = Color32::from_rgb(0xfb, 0xbf, 0x24);

pub(in crate::app) fn fuzzy_match_score(
    matcher: &SkimMatcherV2,
    text: &str,
    query: &str,
) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_lowercase(), &query.to_lowercase()))
}

impl ViewModel {
    /// Node indices whose label or id matches the search box, best first.
    pub(in crate::app) fn search_matches(&self) -> Vec<usize> {
        let query = self.search.trim();
        if query.is_empty() {
            return Vec::new();
        }

        let matcher = SkimMatcherV2::default();
        let mut scored = self
            .engine
            .store()
            .nodes()
            .iter()
            .enumerate()
            .filter_map(|(index, node)| {
                let score = fuzzy_match_score(&matcher, node.display_label(), query)
                    .or_else(|| fuzzy_match_score(&matcher, &node.id, query))?;
                Some((index, score))
            })
            .collect::<Vec<_>>();
        scored.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        scored.into_iter().map(|(index, _)| index).collect()
    }

    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui, is_generating: bool) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);

        self.sync_canvas_size(rect);
        self.handle_graph_zoom(ui, rect, &response);
        self.handle_graph_pan(&response);
        self.handle_node_drag(ui, rect, &response);
        self.handle_node_click(rect, &response);

        let frame_delta_seconds = ui.ctx().input(|input| input.stable_dt);
        if self.engine.advance(frame_delta_seconds) || self.engine.dragging().is_some() {
            ui.ctx().request_repaint();
        }

        draw_background(&painter, rect, self.pan, self.zoom);
        self.draw_orientation_hint(&painter, rect);

        let hovered = self.hovered_node(ui, rect);
        if hovered.is_some() {
            ui.output_mut(|output| output.cursor_icon = egui::CursorIcon::PointingHand);
        }

        let matches = self.search_matches().into_iter().collect::<HashSet<_>>();
        let mut animating = false;

        for sprite in self.engine.scene().edges() {
            animating |= self.draw_edge(ui, &painter, rect, sprite);
        }

        let selected = self.engine.highlight().selected();
        for sprite in self.engine.scene().nodes() {
            let emphasis = NodeEmphasis {
                selected: selected == Some(sprite.node),
                hovered: hovered == Some(sprite.node),
                matched: matches.contains(&sprite.node),
            };
            animating |= self.draw_node(ui, &painter, rect, sprite, emphasis);
        }

        if animating {
            ui.ctx().request_repaint();
        }

        if let Some(index) = hovered
            && let Some(node) = self.engine.store().node(index)
        {
            painter.text(
                rect.left_top() + vec2(12.0, 12.0),
                Align2::LEFT_TOP,
                format!("{}  |  {}  |  {}", node.display_label(), node.category, node.difficulty.label()),
                FontId::proportional(13.0),
                Color32::from_gray(235),
            );
        }

        self.draw_legend(&painter, rect);
        if self.engine.store().is_empty() {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "This skill tree has no nodes.",
                FontId::proportional(16.0),
                Color32::from_gray(200),
            );
        }
        if is_generating {
            Self::draw_generation_overlay(ui, &painter, rect);
        }
    }

    fn animated(&self, ui: &Ui, key: (&str, usize), target: f32) -> (f32, bool) {
        let value =
            ui.ctx()
                .animate_value_with_time(ui.make_persistent_id(key), target, TRANSITION_SECONDS);
        (value, (value - target).abs() > 1.0e-3)
    }

    fn draw_edge(&self, ui: &Ui, painter: &Painter, rect: Rect, sprite: &EdgeSprite) -> bool {
        let (opacity, fading) = self.animated(ui, ("edge-opacity", sprite.edge), sprite.opacity);
        let (width, widening) = self.animated(ui, ("edge-width", sprite.edge), sprite.width);
        let zoom = self.zoom;
        let color = fade(sprite.color, opacity);
        let stroke = Stroke::new((width * zoom.sqrt()).max(0.5), color);

        let start = canvas_to_screen(rect, self.pan, zoom, sprite.from);
        let end = canvas_to_screen(rect, self.pan, zoom, sprite.to);

        if sprite.is_loop() {
            if let Some(node) = self.engine.scene().nodes().get(sprite.source) {
                let center = canvas_to_screen(
                    rect,
                    self.pan,
                    zoom,
                    node.center - vec2(0.0, node.radius),
                );
                painter.circle_stroke(center, node.radius * 0.45 * zoom, stroke);
            }
            return fading || widening;
        }

        if !segment_visible(rect, start, end, 4.0) {
            return fading || widening;
        }
        painter.line_segment([start, end], stroke);

        if let Some(arrow) = sprite.arrow {
            let points = arrow
                .iter()
                .map(|&point| canvas_to_screen(rect, self.pan, zoom, point))
                .collect::<Vec<Pos2>>();
            painter.add(Shape::convex_polygon(points, color, Stroke::NONE));
        }
        fading || widening
    }

    fn draw_node(
        &self,
        ui: &Ui,
        painter: &Painter,
        rect: Rect,
        sprite: &NodeSprite,
        emphasis: NodeEmphasis,
    ) -> bool {
        let (opacity, fading) = self.animated(ui, ("node-opacity", sprite.node), sprite.opacity);
        let zoom = self.zoom;
        let center = canvas_to_screen(rect, self.pan, zoom, sprite.center);
        let radius = sprite.radius * zoom;
        if !circle_visible(rect, center, radius + (LABEL_SIZE + 24.0) * zoom) {
            return fading;
        }

        if emphasis.selected {
            painter.circle_stroke(
                center,
                radius + 6.0 * zoom,
                Stroke::new(2.0, fade(SELECTED_HALO, opacity * 0.8)),
            );
        } else if emphasis.matched {
            painter.circle_stroke(
                center,
                radius + 5.0 * zoom,
                Stroke::new(1.6, fade(SEARCH_RING, opacity.max(0.4))),
            );
        }

        let stroke_width = sprite.stroke_width + if emphasis.hovered { 1.0 } else { 0.0 };
        painter.circle_filled(center, radius, fade(NODE_FILL, opacity));
        painter.circle_stroke(
            center,
            radius,
            Stroke::new(stroke_width * zoom.sqrt(), fade(sprite.stroke, opacity)),
        );

        if !sprite.glyph.is_empty() {
            painter.text(
                center,
                Align2::CENTER_CENTER,
                sprite.glyph,
                FontId::proportional(sprite.glyph_size * zoom),
                fade(Color32::WHITE, opacity),
            );
        }

        let label_at = canvas_to_screen(rect, self.pan, zoom, sprite.label_anchor());
        let font = FontId::proportional((LABEL_SIZE * zoom).max(6.0));
        painter.text(
            label_at + vec2(0.0, 2.0),
            Align2::CENTER_CENTER,
            &sprite.label,
            font.clone(),
            fade(Color32::BLACK, opacity),
        );
        painter.text(
            label_at,
            Align2::CENTER_CENTER,
            &sprite.label,
            font,
            fade(LABEL_COLOR, opacity),
        );
        fading
    }

    fn draw_orientation_hint(&self, painter: &Painter, rect: Rect) {
        let color = Color32::from_rgba_unmultiplied(148, 163, 184, 80);
        let x = rect.left() + 24.0;
        painter.text(
            Pos2::new(x, rect.top() + 24.0),
            Align2::LEFT_TOP,
            "Zenith",
            FontId::monospace(11.0),
            color,
        );
        painter.line_segment(
            [
                Pos2::new(x + 20.0, rect.top() + 44.0),
                Pos2::new(x + 20.0, rect.bottom() - 44.0),
            ],
            Stroke::new(1.0, color),
        );
        painter.text(
            Pos2::new(x, rect.bottom() - 24.0),
            Align2::LEFT_BOTTOM,
            "Horizon",
            FontId::monospace(11.0),
            color,
        );
    }

    fn draw_legend(&self, painter: &Painter, rect: Rect) {
        let font = FontId::proportional(12.0);
        let item_width = 118.0;
        let width = item_width * Category::LEGEND.len() as f32;
        let top_left = Pos2::new(rect.center().x - width * 0.5, rect.bottom() - 40.0);
        let backdrop = Rect::from_min_size(top_left - vec2(10.0, 6.0), vec2(width + 20.0, 30.0));
        painter.rect_filled(backdrop, 14.0, fade(BACKGROUND, 0.9));
        painter.rect_stroke(
            backdrop,
            14.0,
            Stroke::new(1.0, Color32::from_rgb(51, 65, 85)),
            egui::StrokeKind::Inside,
        );

        for (slot, category) in Category::LEGEND.iter().enumerate() {
            let origin = top_left + vec2(slot as f32 * item_width, 9.0);
            painter.circle_filled(origin + vec2(6.0, 0.0), 5.0, category_color(*category));
            painter.text(
                origin + vec2(16.0, 0.0),
                Align2::LEFT_CENTER,
                format!("{} {}", category.glyph(), category.label()),
                font.clone(),
                LABEL_COLOR,
            );
        }
    }

    fn draw_generation_overlay(ui: &mut Ui, painter: &Painter, rect: Rect) {
        painter.rect_filled(rect, 0.0, Color32::from_rgba_unmultiplied(2, 6, 23, 170));
        painter.text(
            rect.center() + vec2(0.0, 36.0),
            Align2::CENTER_CENTER,
            "Illuminating Horizon...",
            FontId::proportional(18.0),
            Color32::from_rgb(0xfd, 0xba, 0x74),
        );
        ui.put(
            Rect::from_center_size(rect.center(), vec2(32.0, 32.0)),
            egui::Spinner::new().size(32.0),
        );
    }
}

#[derive(Clone, Copy)]
struct NodeEmphasis {
    selected: bool,
    hovered: bool,
    matched: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fuzzy_matching_ignores_case() {
        let matcher = SkimMatcherV2::default();
        assert!(fuzzy_match_score(&matcher, "Version Control", "vcs").is_none());
        assert!(fuzzy_match_score(&matcher, "Version Control", "VERCON").is_some());
        assert!(fuzzy_match_score(&matcher, "Ollama", "olm").is_some());
    }
}
