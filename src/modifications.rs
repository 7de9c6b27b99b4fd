use crate::stroke::StrokeRef;

/// The accumulating record of edits applied to the source photo.
///
/// Created once per editing session, mutated in place by the session
/// controller and pushed to the content surface after every change. The copy
/// captured at commit time is the payload of the session's `done` event.
#[derive(Debug, Clone, Default)]
pub struct Modifications {
    /// Clockwise rotation in degrees, always one of 0, 90, 180, 270.
    pub angle: i32,
    /// Horizontal mirror.
    pub flipped: bool,
    /// Paint-layer content. Owned by the content surface; the session never
    /// looks inside, it only carries the strokes merged in at save time.
    pub paint: Vec<StrokeRef>,
}

impl Modifications {
    /// Rotate by a multiple of 90 degrees, wrapping at 360.
    pub fn rotate(&mut self, delta: i32) {
        self.angle = (self.angle + delta).rem_euclid(360);
    }

    /// Toggle the horizontal mirror.
    pub fn flip(&mut self) {
        self.flipped = !self.flipped;
    }

    /// True if the record differs from an untouched photo.
    pub fn is_empty(&self) -> bool {
        self.angle == 0 && !self.flipped && self.paint.is_empty()
    }
}
