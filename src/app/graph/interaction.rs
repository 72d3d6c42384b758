use eframe::egui::{self, Rect, Ui};

use skill_horizon::layout::CanvasSize;

use super::super::ViewModel;
use super::super::render_utils::screen_to_canvas;

pub(in crate::app) const MIN_ZOOM: f32 = 0.1;
pub(in crate::app) const MAX_ZOOM: f32 = 4.0;

impl ViewModel {
    /// Relayouts when the canvas changes size; sub-pixel jitter is ignored.
    pub(in crate::app) fn sync_canvas_size(&mut self, rect: Rect) {
        let size = CanvasSize::new(rect.width().round(), rect.height().round());
        if size != self.engine.size() || self.engine.simulation().is_none() {
            self.engine.resize(size);
        }
    }

    pub(in crate::app) fn handle_graph_zoom(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
    ) {
        if !response.hovered() {
            return;
        }

        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll.abs() <= f32::EPSILON {
            return;
        }

        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .unwrap_or_else(|| rect.center());
        let anchor = pointer - rect.center() - self.pan;
        let previous = self.zoom;

        let zoom_factor = (1.0 + (scroll * 0.0018)).clamp(0.85, 1.15);
        self.zoom = (self.zoom * zoom_factor).clamp(MIN_ZOOM, MAX_ZOOM);
        self.pan += anchor - anchor * (self.zoom / previous);
    }

    pub(in crate::app) fn handle_graph_pan(&mut self, response: &egui::Response) {
        if response.dragged_by(egui::PointerButton::Secondary)
            || response.dragged_by(egui::PointerButton::Middle)
        {
            self.pan += response.drag_delta();
        }
    }

    /// Primary-button drags move nodes; a release anywhere ends the drag.
    pub(in crate::app) fn handle_node_drag(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
    ) {
        let to_canvas = |screen| screen_to_canvas(rect, self.pan, self.zoom, screen);

        if response.drag_started_by(egui::PointerButton::Primary) {
            let origin = ui.input(|input| input.pointer.press_origin());
            let pointer = response.interact_pointer_pos();
            if let (Some(origin), Some(pointer)) = (origin, pointer)
                && let Some(index) = self.engine.node_at(to_canvas(origin))
            {
                self.engine.begin_drag(index, to_canvas(pointer));
            }
        } else if self.engine.dragging().is_some()
            && response.dragged_by(egui::PointerButton::Primary)
            && let Some(pointer) = response.interact_pointer_pos()
        {
            self.engine.drag_to(to_canvas(pointer));
        }

        if response.drag_stopped() && self.engine.dragging().is_some() {
            self.engine.end_drag();
        }
    }

    pub(in crate::app) fn handle_node_click(&mut self, rect: Rect, response: &egui::Response) {
        if !response.clicked_by(egui::PointerButton::Primary) {
            return;
        }

        let Some(pointer) = response.interact_pointer_pos() else {
            return;
        };
        let canvas = screen_to_canvas(rect, self.pan, self.zoom, pointer);
        let clicked = self.engine.click(canvas).map(|node| node.id.clone());
        if clicked.is_some() {
            self.set_selected(clicked);
        }
    }

    pub(in crate::app) fn hovered_node(&self, ui: &Ui, rect: Rect) -> Option<usize> {
        let pointer = ui.input(|input| input.pointer.hover_pos())?;
        if !rect.contains(pointer) {
            return None;
        }
        self.engine
            .node_at(screen_to_canvas(rect, self.pan, self.zoom, pointer))
    }
}
