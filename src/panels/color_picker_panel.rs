use crate::brush::Brush;
use crate::event::EventStream;
use crate::session::ColorPicker;
use egui::{Color32, Context, Pos2, Slider, vec2};

/// Palette offered by the picker.
const PALETTE: [Color32; 8] = [
    Color32::WHITE,
    Color32::RED,
    Color32::from_rgb(255, 150, 0),
    Color32::YELLOW,
    Color32::GREEN,
    Color32::from_rgb(0, 200, 255),
    Color32::BLUE,
    Color32::from_rgb(180, 90, 255),
];

/// Brush color/size chooser, shown as a floating strip anchored above the
/// controls bar while the session is in paint mode.
pub struct ColorPickerPanel {
    brush: Brush,
    visible: bool,
    indicator: Pos2,
    saves: EventStream<Brush>,
}

impl Default for ColorPickerPanel {
    fn default() -> Self {
        Self {
            brush: Brush::default(),
            visible: false,
            indicator: Pos2::ZERO,
            saves: EventStream::new(),
        }
    }
}

impl ColorPickerPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render the picker. Returns the brush when the user settles on one
    /// (swatch click or slider release); the caller fires the save stream
    /// after this borrow ends.
    pub fn ui(&mut self, ctx: &Context) -> Option<Brush> {
        if !self.visible {
            return None;
        }
        let mut saved = None;
        egui::Area::new(egui::Id::new("brush_picker"))
            .pivot(egui::Align2::CENTER_TOP)
            .fixed_pos(self.indicator)
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.horizontal(|ui| {
                        for color in PALETTE {
                            let selected = self.brush.color() == color;
                            let size = if selected { 18.0 } else { 14.0 };
                            let (rect, response) =
                                ui.allocate_exact_size(vec2(size, size), egui::Sense::click());
                            ui.painter().circle_filled(rect.center(), size / 2.0, color);
                            if response.clicked() {
                                self.brush = Brush::new(self.brush.size_ratio(), color);
                                saved = Some(self.brush);
                            }
                        }
                        let mut ratio = self.brush.size_ratio();
                        let response = ui.add(Slider::new(&mut ratio, 0.0..=1.0).show_value(false));
                        if response.changed() {
                            self.brush = Brush::new(ratio, self.brush.color());
                        }
                        if response.drag_stopped() {
                            saved = Some(self.brush);
                        }
                    });
                });
            });
        saved
    }
}

impl ColorPicker for ColorPickerPanel {
    fn set_brush(&mut self, brush: Brush) {
        self.brush = brush;
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn move_indicator(&mut self, pos: Pos2) {
        self.indicator = pos;
    }

    fn brush_saves(&self) -> EventStream<Brush> {
        self.saves.clone()
    }
}
