use crate::brush::Brush;
use crate::event::EventStream;
use crate::mode::EditorMode;
use crate::modifications::Modifications;
use crate::undo::UndoController;
use egui::{Pos2, Rect};
use image::DynamicImage;
use std::cell::RefCell;
use std::rc::Rc;

/// Configuration bundle forwarded to the content surface at construction.
/// The session carries it through without looking inside.
#[derive(Debug, Clone, Default)]
pub struct EditorData {
    /// Caption shown by the content surface, if any.
    pub title: Option<String>,
    /// Whether the surface should letterbox the photo instead of cropping.
    pub fit_to_view: bool,
}

/// User requests surfaced by the controls bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlRequest {
    /// Rotate by this many degrees; the bar sends 90 per press.
    Rotate(i32),
    /// Toggle the horizontal mirror.
    Flip,
    /// Switch from the transform controls to the paint controls.
    EnterPaintMode,
    /// Accept: finish the paint session, or commit the whole edit.
    Done,
    /// Reject: abandon the paint session, or cancel the whole edit.
    Cancel,
}

/// The rendering area the session drives.
///
/// Receives every mode and modification change; owns the paint strokes until
/// [`ContentSurface::save`] merges them into the record. The `action` carried
/// by a mode change tells the surface what to do with strokes accumulated
/// during a finished paint session.
pub trait ContentSurface {
    /// One-time setup with everything the session forwards uninspected.
    fn init(
        &mut self,
        photo: Rc<DynamicImage>,
        modifications: &Modifications,
        undo: Rc<RefCell<UndoController>>,
        data: EditorData,
    );

    fn apply_mode(&mut self, mode: EditorMode);

    fn apply_modifications(&mut self, modifications: &Modifications);

    fn apply_brush(&mut self, brush: Brush);

    /// Finalize drawing into the record. Called once, at commit.
    fn save(&mut self, modifications: &mut Modifications);

    fn set_geometry(&mut self, rect: Rect);
}

/// The button bar below the content area.
///
/// Its request stream must be fired while the bar itself is not borrowed, so
/// the session's handlers can call back into [`ControlsBar::apply_mode`].
pub trait ControlsBar {
    /// Hand over the shared undo controller so the bar can gate its
    /// undo/redo buttons.
    fn attach_undo(&mut self, undo: Rc<RefCell<UndoController>>);

    fn apply_mode(&mut self, mode: EditorMode);

    fn set_geometry(&mut self, rect: Rect);

    /// The bar's outbound request stream. Cloning the stream handle is cheap.
    fn requests(&self) -> EventStream<ControlRequest>;
}

/// The brush color/size chooser, visible only in paint mode.
pub trait ColorPicker {
    /// Seed the picker with the user's last persisted brush.
    fn set_brush(&mut self, brush: Brush);

    fn set_visible(&mut self, visible: bool);

    /// Keep the picker's indicator centered over the controls area.
    fn move_indicator(&mut self, pos: Pos2);

    /// Fired with the finalized brush whenever the user settles on one.
    fn brush_saves(&self) -> EventStream<Brush>;
}
