use crate::stroke::StrokeRef;

/// A paint-layer edit that can be undone.
#[derive(Debug, Clone)]
pub enum PaintCommand {
    AddStroke(StrokeRef),
}

/// Manages the history of paint commands for undo/redo functionality.
///
/// Shared between the session, the content surface (which records finished
/// strokes) and the controls bar (which gates its undo/redo buttons), so it
/// lives behind `Rc<RefCell<_>>` rather than being owned by any one of them.
#[derive(Debug, Default)]
pub struct UndoController {
    /// Stack of commands that can be undone
    undo_stack: Vec<PaintCommand>,
    /// Stack of commands that can be redone
    redo_stack: Vec<PaintCommand>,
}

impl UndoController {
    /// Creates a new empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an executed command. Clears the redo stack, as any new edit
    /// invalidates the redo chain.
    pub fn push(&mut self, command: PaintCommand) {
        self.undo_stack.push(command);
        self.redo_stack.clear();
    }

    /// Undo the most recent command, returning it so the caller can revert
    /// its effect on the paint layer.
    pub fn undo(&mut self) -> Option<PaintCommand> {
        let command = self.undo_stack.pop()?;
        self.redo_stack.push(command.clone());
        Some(command)
    }

    /// Redo the most recently undone command, returning it so the caller can
    /// re-apply it.
    pub fn redo(&mut self) -> Option<PaintCommand> {
        let command = self.redo_stack.pop()?;
        self.undo_stack.push(command.clone());
        Some(command)
    }

    /// Returns true if there are commands that can be undone
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Returns true if there are commands that can be redone
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Clear the history, e.g. when a paint session's strokes are discarded.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
