use crate::brush::Brush;
use crate::mode::{Action, EditorMode};
use crate::modifications::Modifications;
use crate::session::{ContentSurface, EditorData};
use crate::stroke::{Stroke, StrokeRef};
use crate::undo::{PaintCommand, UndoController};
use egui::{
    Align2, Color32, ColorImage, FontId, Pos2, Rect, Sense, TextureHandle, TextureOptions, Ui,
    pos2, vec2,
};
use image::DynamicImage;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

/// Stroke width at size ratio 1.0, as a fraction of the content height.
const MAX_BRUSH_FRACTION: f32 = 0.05;

/// The content surface: renders the photo with the current rotation/mirror
/// applied and captures paint strokes while the session is in paint mode.
pub struct CanvasPanel {
    photo: Option<Rc<DynamicImage>>,
    data: EditorData,
    undo: Option<Rc<RefCell<UndoController>>>,
    mode: EditorMode,
    modifications: Modifications,
    brush: Brush,
    geometry: Rect,
    /// Strokes kept so far, normalized to the content rect.
    strokes: Vec<StrokeRef>,
    /// Stroke count at the moment the current paint session began; a discard
    /// rolls back to here.
    paint_baseline: usize,
    /// Points of the stroke currently being dragged.
    scratch: Vec<Pos2>,
    texture: Option<TextureHandle>,
    /// (angle, flipped) the cached texture was rendered with.
    texture_key: (i32, bool),
}

impl Default for CanvasPanel {
    fn default() -> Self {
        Self {
            photo: None,
            data: EditorData::default(),
            undo: None,
            mode: EditorMode::transform(),
            modifications: Modifications::default(),
            brush: Brush::default(),
            geometry: Rect::ZERO,
            strokes: Vec::new(),
            paint_baseline: 0,
            scratch: Vec::new(),
            texture: None,
            texture_key: (0, false),
        }
    }
}

impl CanvasPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Revert the latest stroke through the shared undo controller.
    pub fn undo_last(&mut self) {
        let Some(undo) = &self.undo else { return };
        if let Some(PaintCommand::AddStroke(_)) = undo.borrow_mut().undo() {
            self.strokes.pop();
        }
    }

    /// Re-apply the latest undone stroke.
    pub fn redo_last(&mut self) {
        let Some(undo) = &self.undo else { return };
        if let Some(PaintCommand::AddStroke(stroke)) = undo.borrow_mut().redo() {
            self.strokes.push(stroke);
        }
    }

    pub fn ui(&mut self, ui: &mut Ui) {
        if self.geometry.width() <= 0.0 || self.geometry.height() <= 0.0 {
            return;
        }
        self.refresh_texture(ui);

        let painter = ui.painter_at(self.geometry);
        painter.rect_filled(self.geometry, 0.0, Color32::from_gray(20));
        if let Some(texture) = &self.texture {
            let photo_rect = if self.data.fit_to_view {
                fit_rect(texture.size_vec2(), self.geometry)
            } else {
                self.geometry
            };
            painter.image(
                texture.id(),
                photo_rect,
                Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0)),
                Color32::WHITE,
            );
        }
        if let Some(title) = &self.data.title {
            painter.text(
                pos2(self.geometry.center().x, self.geometry.min.y + 16.0),
                Align2::CENTER_CENTER,
                title,
                FontId::proportional(14.0),
                Color32::from_gray(200),
            );
        }

        for stroke in &self.strokes {
            self.paint_stroke(&painter, stroke.brush(), stroke.points());
        }
        if self.scratch.len() > 1 {
            self.paint_stroke(&painter, self.brush, &self.scratch);
        }

        if self.mode.is_paint() {
            self.capture_input(ui);
        }
    }

    fn capture_input(&mut self, ui: &mut Ui) {
        let response = ui.allocate_rect(self.geometry, Sense::drag());
        if let Some(pos) = response.interact_pointer_pos() {
            if response.dragged() || response.drag_started() {
                self.scratch.push(self.normalize(pos));
            }
        }
        if response.drag_stopped() {
            self.finish_scratch();
        }
    }

    fn finish_scratch(&mut self) {
        if self.scratch.len() > 1 {
            let stroke = Stroke::new_ref(self.brush, std::mem::take(&mut self.scratch));
            self.strokes.push(Arc::clone(&stroke));
            if let Some(undo) = &self.undo {
                undo.borrow_mut().push(PaintCommand::AddStroke(stroke));
            }
        } else {
            self.scratch.clear();
        }
    }

    fn paint_stroke(&self, painter: &egui::Painter, brush: Brush, points: &[Pos2]) {
        let thickness = (brush.size_ratio() * self.geometry.height() * MAX_BRUSH_FRACTION).max(1.0);
        let line: Vec<Pos2> = points.iter().map(|p| self.denormalize(*p)).collect();
        painter.add(egui::Shape::line(
            line,
            egui::Stroke::new(thickness, brush.color()),
        ));
    }

    fn normalize(&self, pos: Pos2) -> Pos2 {
        pos2(
            (pos.x - self.geometry.min.x) / self.geometry.width(),
            (pos.y - self.geometry.min.y) / self.geometry.height(),
        )
    }

    fn denormalize(&self, pos: Pos2) -> Pos2 {
        pos2(
            self.geometry.min.x + pos.x * self.geometry.width(),
            self.geometry.min.y + pos.y * self.geometry.height(),
        )
    }

    /// Re-render the photo texture when the rotation or mirror changed.
    fn refresh_texture(&mut self, ui: &Ui) {
        let key = (self.modifications.angle, self.modifications.flipped);
        if self.texture.is_some() && self.texture_key == key {
            return;
        }
        let Some(photo) = &self.photo else { return };
        let mut transformed = match self.modifications.angle {
            90 => photo.rotate90(),
            180 => photo.rotate180(),
            270 => photo.rotate270(),
            _ => (**photo).clone(),
        };
        if self.modifications.flipped {
            transformed = transformed.fliph();
        }
        let rgba = transformed.to_rgba8();
        let size = [rgba.width() as usize, rgba.height() as usize];
        let color_image = ColorImage::from_rgba_unmultiplied(size, rgba.as_raw());
        self.texture = Some(
            ui.ctx()
                .load_texture("photo", color_image, TextureOptions::LINEAR),
        );
        self.texture_key = key;
    }
}

impl ContentSurface for CanvasPanel {
    fn init(
        &mut self,
        photo: Rc<DynamicImage>,
        modifications: &Modifications,
        undo: Rc<RefCell<UndoController>>,
        data: EditorData,
    ) {
        self.strokes = modifications.paint.clone();
        self.paint_baseline = self.strokes.len();
        self.modifications = modifications.clone();
        self.photo = Some(photo);
        self.undo = Some(undo);
        self.data = data;
        self.texture = None;
    }

    fn apply_mode(&mut self, mode: EditorMode) {
        // The action is the one-shot verdict on the paint session just
        // finished; Save keeps the strokes where they already are.
        if mode.action == Action::Discard {
            self.strokes.truncate(self.paint_baseline);
            self.scratch.clear();
            if let Some(undo) = &self.undo {
                undo.borrow_mut().clear();
            }
        }
        if mode.is_paint() {
            self.paint_baseline = self.strokes.len();
        }
        self.mode = mode;
    }

    fn apply_modifications(&mut self, modifications: &Modifications) {
        self.modifications = modifications.clone();
    }

    fn apply_brush(&mut self, brush: Brush) {
        self.brush = brush;
    }

    fn save(&mut self, modifications: &mut Modifications) {
        self.finish_scratch();
        modifications.paint = self.strokes.clone();
    }

    fn set_geometry(&mut self, rect: Rect) {
        self.geometry = rect;
    }
}

/// Largest rect with the texture's aspect ratio centered inside `bounds`.
fn fit_rect(texture_size: egui::Vec2, bounds: Rect) -> Rect {
    let scale = (bounds.width() / texture_size.x).min(bounds.height() / texture_size.y);
    let size = texture_size * scale;
    Rect::from_center_size(bounds.center(), vec2(size.x, size.y))
}
