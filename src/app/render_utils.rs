use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke, Vec2};

pub(super) const BACKGROUND: Color32 = Color32::from_rgb(0x0f, 0x17, 0x2a);
const GRID: Color32 = Color32::from_rgba_premultiplied(30, 41, 59, 90);

pub(super) fn fade(color: Color32, opacity: f32) -> Color32 {
    color.gamma_multiply(opacity.clamp(0.0, 1.0))
}

pub(super) fn draw_background(painter: &Painter, rect: Rect, pan: Vec2, zoom: f32) {
    painter.rect_filled(rect, 0.0, BACKGROUND);

    let step = (64.0 * zoom.clamp(0.5, 2.0)).max(24.0);
    let origin = rect.center() + pan;
    let stroke = Stroke::new(1.0, GRID);

    let mut x = rect.left() + (origin.x - rect.left()).rem_euclid(step);
    while x < rect.right() {
        painter.line_segment([Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())], stroke);
        x += step;
    }

    let mut y = rect.top() + (origin.y - rect.top()).rem_euclid(step);
    while y < rect.bottom() {
        painter.line_segment([Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)], stroke);
        y += step;
    }
}

pub(super) fn circle_visible(rect: Rect, position: Pos2, radius: f32) -> bool {
    !(position.x + radius < rect.left()
        || position.x - radius > rect.right()
        || position.y + radius < rect.top()
        || position.y - radius > rect.bottom())
}

pub(super) fn segment_visible(rect: Rect, start: Pos2, end: Pos2, padding: f32) -> bool {
    let min_x = start.x.min(end.x) - padding;
    let max_x = start.x.max(end.x) + padding;
    let min_y = start.y.min(end.y) - padding;
    let max_y = start.y.max(end.y) + padding;

    !(max_x < rect.left() || min_x > rect.right() || max_y < rect.top() || min_y > rect.bottom())
}

/// Layout coordinates span the canvas with its center at the middle of
/// `rect`; pan and zoom apply around that center.
pub(super) fn canvas_to_screen(rect: Rect, pan: Vec2, zoom: f32, canvas: Pos2) -> Pos2 {
    let half = rect.size() * 0.5;
    rect.center() + pan + (canvas.to_vec2() - half) * zoom
}

pub(super) fn screen_to_canvas(rect: Rect, pan: Vec2, zoom: f32, screen: Pos2) -> Pos2 {
    let half = rect.size() * 0.5;
    ((screen - rect.center() - pan) / zoom + half).to_pos2()
}

#[cfg(test)]
mod tests {
    use eframe::egui::{pos2, vec2};

    use super::*;

    #[test]
    fn identity_view_maps_canvas_onto_rect() {
        let rect = Rect::from_min_size(pos2(300.0, 40.0), vec2(800.0, 600.0));
        assert_eq!(
            canvas_to_screen(rect, Vec2::ZERO, 1.0, pos2(0.0, 0.0)),
            pos2(300.0, 40.0)
        );
        assert_eq!(
            canvas_to_screen(rect, Vec2::ZERO, 1.0, pos2(800.0, 600.0)),
            pos2(1100.0, 640.0)
        );
    }

    #[test]
    fn screen_to_canvas_inverts_pan_and_zoom() {
        let rect = Rect::from_min_size(pos2(10.0, 20.0), vec2(640.0, 480.0));
        let pan = vec2(35.0, -12.0);
        let canvas = pos2(123.0, 456.0);
        let screen = canvas_to_screen(rect, pan, 2.5, canvas);
        let back = screen_to_canvas(rect, pan, 2.5, screen);
        assert!((back - canvas).length() < 1.0e-3);
    }

    #[test]
    fn offscreen_shapes_are_culled() {
        let rect = Rect::from_min_size(Pos2::ZERO, vec2(100.0, 100.0));
        assert!(circle_visible(rect, pos2(-5.0, 50.0), 10.0));
        assert!(!circle_visible(rect, pos2(-20.0, 50.0), 10.0));
        assert!(segment_visible(rect, pos2(-50.0, 50.0), pos2(150.0, 50.0), 0.0));
        assert!(!segment_visible(rect, pos2(-50.0, -50.0), pos2(-10.0, -10.0), 2.0));
    }
}
