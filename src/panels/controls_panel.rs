use crate::event::EventStream;
use crate::mode::EditorMode;
use crate::session::{ControlRequest, ControlsBar};
use crate::undo::UndoController;
use egui::{Align, Button, Layout, Rect, Ui, UiBuilder};
use std::cell::RefCell;
use std::rc::Rc;

/// What the bar wants done after a frame: session requests go out through the
/// request stream, undo/redo are handled by the app against the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlsAction {
    Request(ControlRequest),
    Undo,
    Redo,
}

/// The button bar in the strip below the content area. Shows transform
/// buttons or paint buttons depending on the applied mode.
pub struct ControlsPanel {
    mode: EditorMode,
    undo: Option<Rc<RefCell<UndoController>>>,
    geometry: Rect,
    requests: EventStream<ControlRequest>,
}

impl Default for ControlsPanel {
    fn default() -> Self {
        Self {
            mode: EditorMode::transform(),
            undo: None,
            geometry: Rect::ZERO,
            requests: EventStream::new(),
        }
    }
}

impl ControlsPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render the bar and collect the clicks. The caller fires the request
    /// stream after this borrow ends, so the session can call back into
    /// [`ControlsBar::apply_mode`] without re-entering the panel.
    pub fn ui(&mut self, ui: &mut Ui) -> Vec<ControlsAction> {
        if self.geometry.width() <= 0.0 || self.geometry.height() <= 0.0 {
            return Vec::new();
        }
        let mut actions = Vec::new();
        let bar_rect = self.geometry.shrink(12.0);
        ui.allocate_new_ui(UiBuilder::new().max_rect(bar_rect), |ui| {
            ui.horizontal_centered(|ui| {
                if self.mode.is_paint() {
                    self.paint_buttons(ui, &mut actions);
                } else {
                    self.transform_buttons(ui, &mut actions);
                }
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    if ui.button("Done").clicked() {
                        actions.push(ControlsAction::Request(ControlRequest::Done));
                    }
                    if ui.button("Cancel").clicked() {
                        actions.push(ControlsAction::Request(ControlRequest::Cancel));
                    }
                });
            });
        });
        actions
    }

    fn transform_buttons(&self, ui: &mut Ui, actions: &mut Vec<ControlsAction>) {
        if ui.button("Rotate").clicked() {
            actions.push(ControlsAction::Request(ControlRequest::Rotate(90)));
        }
        if ui.button("Flip").clicked() {
            actions.push(ControlsAction::Request(ControlRequest::Flip));
        }
        if ui.button("Paint").clicked() {
            actions.push(ControlsAction::Request(ControlRequest::EnterPaintMode));
        }
    }

    fn paint_buttons(&self, ui: &mut Ui, actions: &mut Vec<ControlsAction>) {
        let (can_undo, can_redo) = self
            .undo
            .as_ref()
            .map(|undo| {
                let undo = undo.borrow();
                (undo.can_undo(), undo.can_redo())
            })
            .unwrap_or((false, false));
        if ui.add_enabled(can_undo, Button::new("Undo")).clicked() {
            actions.push(ControlsAction::Undo);
        }
        if ui.add_enabled(can_redo, Button::new("Redo")).clicked() {
            actions.push(ControlsAction::Redo);
        }
    }
}

impl ControlsBar for ControlsPanel {
    fn attach_undo(&mut self, undo: Rc<RefCell<UndoController>>) {
        self.undo = Some(undo);
    }

    fn apply_mode(&mut self, mode: EditorMode) {
        self.mode = mode;
    }

    fn set_geometry(&mut self, rect: Rect) {
        self.geometry = rect;
    }

    fn requests(&self) -> EventStream<ControlRequest> {
        self.requests.clone()
    }
}
