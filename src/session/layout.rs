use egui::{Pos2, Rect, Vec2, pos2};

/// Height of the strip reserved for the controls bar at the bottom.
pub const CONTROLS_HEIGHT: f32 = 120.0;

/// Vertical offset of the color picker's indicator below the controls top.
pub const COLOR_PICKER_TOP_SKIP: f32 = 16.0;

/// Resolved geometry for one session size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionLayout {
    /// Rendering area: everything above the controls strip.
    pub content: Rect,
    /// The reserved strip at the bottom.
    pub controls: Rect,
    /// Color picker indicator anchor, horizontally centered over the strip.
    pub picker_indicator: Pos2,
}

/// Compute the layout for the given session size.
///
/// Pure function of the size and the style constants above, so re-invoking it
/// with the same size always yields the same geometry. Empty sizes resolve to
/// `None`: a collapse to zero is a no-op, not a layout pass.
pub fn compute(size: Vec2) -> Option<SessionLayout> {
    if size.x <= 0.0 || size.y <= 0.0 {
        return None;
    }
    let full = Rect::from_min_size(Pos2::ZERO, size);
    let content_height = (full.height() - CONTROLS_HEIGHT).max(0.0);
    let content = Rect::from_min_max(full.min, pos2(full.max.x, full.min.y + content_height));
    let controls = Rect::from_min_max(pos2(full.min.x, content.max.y), full.max);
    let picker_indicator = pos2(controls.center().x, controls.min.y + COLOR_PICKER_TOP_SKIP);
    Some(SessionLayout {
        content,
        controls,
        picker_indicator,
    })
}
