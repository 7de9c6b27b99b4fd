mod canvas_panel;
mod color_picker_panel;
mod controls_panel;

pub use canvas_panel::CanvasPanel;
pub use color_picker_panel::ColorPickerPanel;
pub use controls_panel::{ControlsAction, ControlsPanel};
