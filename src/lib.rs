#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod brush;
pub mod event;
pub mod mode;
pub mod modifications;
pub mod panels;
pub mod session;
pub mod settings;
pub mod stroke;
pub mod undo;

pub use app::PhotoEditApp;
pub use brush::Brush;
pub use event::{EventStream, Subscription};
pub use mode::{Action, EditorMode, Mode};
pub use modifications::Modifications;
pub use session::{ControlRequest, EditorData, PhotoEditor};
pub use settings::{JsonSettingsStore, SettingsStore};
pub use stroke::{Stroke, StrokeRef};
pub use undo::{PaintCommand, UndoController};
