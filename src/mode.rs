/// Which sub-view of the editor is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Transform,
    Paint,
}

/// One-shot instruction riding along a transition back to [`Mode::Transform`],
/// telling the content surface what to do with the paint strokes accumulated
/// during the Paint session. Routed, never interpreted, by the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Action {
    #[default]
    None,
    Save,
    Discard,
}

/// The observable editor mode plus its transition payload.
///
/// Only the constructors below exist, so the invalid pair
/// `(Paint, action != None)` cannot be built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EditorMode {
    pub mode: Mode,
    pub action: Action,
}

impl EditorMode {
    /// Initial mode: transform controls, nothing pending.
    pub fn transform() -> Self {
        Self {
            mode: Mode::Transform,
            action: Action::None,
        }
    }

    /// Entering paint mode from the transform controls.
    pub fn paint() -> Self {
        Self {
            mode: Mode::Paint,
            action: Action::None,
        }
    }

    /// Leaving paint mode with "done": keep the strokes.
    pub fn save() -> Self {
        Self {
            mode: Mode::Transform,
            action: Action::Save,
        }
    }

    /// Leaving paint mode with "cancel": drop the strokes.
    pub fn discard() -> Self {
        Self {
            mode: Mode::Transform,
            action: Action::Discard,
        }
    }

    pub fn is_paint(&self) -> bool {
        self.mode == Mode::Paint
    }
}
