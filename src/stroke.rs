use crate::brush::Brush;
use egui::Pos2;
use std::sync::Arc;

// Immutable stroke for sharing
#[derive(Debug, Clone)]
pub struct Stroke {
    points: Vec<Pos2>,
    brush: Brush,
}

// Define a reference-counted type alias for Stroke
pub type StrokeRef = Arc<Stroke>;

impl Stroke {
    // Create a new immutable stroke painted with the given brush
    pub fn new(brush: Brush, points: Vec<Pos2>) -> Self {
        Self { points, brush }
    }

    // Create a new reference-counted Stroke
    pub fn new_ref(brush: Brush, points: Vec<Pos2>) -> StrokeRef {
        Arc::new(Self::new(brush, points))
    }

    pub fn points(&self) -> &[Pos2] {
        &self.points
    }

    pub fn brush(&self) -> Brush {
        self.brush
    }
}
