use egui::vec2;
use photo_edit::session::layout::{self, COLOR_PICKER_TOP_SKIP, CONTROLS_HEIGHT};

#[test]
fn empty_sizes_resolve_to_none() {
    assert!(layout::compute(vec2(0.0, 0.0)).is_none());
    assert!(layout::compute(vec2(800.0, 0.0)).is_none());
    assert!(layout::compute(vec2(0.0, 600.0)).is_none());
    assert!(layout::compute(vec2(-10.0, 600.0)).is_none());
}

#[test]
fn layout_is_idempotent() {
    let size = vec2(800.0, 600.0);
    let first = layout::compute(size).unwrap();
    let second = layout::compute(size).unwrap();
    assert_eq!(first, second);
}

#[test]
fn controls_strip_is_reserved_at_the_bottom() {
    let resolved = layout::compute(vec2(800.0, 600.0)).unwrap();
    assert_eq!(resolved.controls.height(), CONTROLS_HEIGHT);
    assert_eq!(resolved.content.height(), 600.0 - CONTROLS_HEIGHT);
    assert_eq!(resolved.content.max.y, resolved.controls.min.y);
    assert_eq!(resolved.content.width(), 800.0);
    assert_eq!(resolved.controls.width(), 800.0);
    assert_eq!(resolved.controls.max.y, 600.0);
}

#[test]
fn picker_indicator_is_centered_over_the_controls() {
    let resolved = layout::compute(vec2(800.0, 600.0)).unwrap();
    assert_eq!(resolved.picker_indicator.x, 400.0);
    assert_eq!(
        resolved.picker_indicator.y,
        resolved.controls.min.y + COLOR_PICKER_TOP_SKIP
    );
}

#[test]
fn sizes_shorter_than_the_strip_leave_no_content_area() {
    let resolved = layout::compute(vec2(400.0, CONTROLS_HEIGHT / 2.0)).unwrap();
    assert_eq!(resolved.content.height(), 0.0);
    assert_eq!(resolved.controls.min.y, 0.0);
}
