use egui::{Color32, Pos2, Rect, vec2};
use image::DynamicImage;
use photo_edit::session::layout;
use photo_edit::session::{
    ColorPicker, ContentSurface, ControlRequest, ControlsBar, EditorData, PhotoEditor,
};
use photo_edit::settings::{SettingsResult, SettingsStore};
use photo_edit::{
    Action, Brush, EditorMode, EventStream, Mode, Modifications, Stroke, UndoController,
};
use std::cell::RefCell;
use std::rc::Rc;

// ---- fake collaborators -------------------------------------------------

#[derive(Default)]
struct RecordingContent {
    undo: Option<Rc<RefCell<UndoController>>>,
    data: Option<EditorData>,
    modes: Vec<EditorMode>,
    applied: Vec<Modifications>,
    brushes: Vec<Brush>,
    save_calls: usize,
    geometry: Option<Rect>,
}

impl ContentSurface for RecordingContent {
    fn init(
        &mut self,
        _photo: Rc<DynamicImage>,
        _modifications: &Modifications,
        undo: Rc<RefCell<UndoController>>,
        data: EditorData,
    ) {
        self.undo = Some(undo);
        self.data = Some(data);
    }

    fn apply_mode(&mut self, mode: EditorMode) {
        self.modes.push(mode);
    }

    fn apply_modifications(&mut self, modifications: &Modifications) {
        self.applied.push(modifications.clone());
    }

    fn apply_brush(&mut self, brush: Brush) {
        self.brushes.push(brush);
    }

    fn save(&mut self, modifications: &mut Modifications) {
        self.save_calls += 1;
        // Leave a fingerprint so tests can see the finalize step ran before
        // the done payload was captured.
        modifications
            .paint
            .push(Stroke::new_ref(Brush::default(), vec![Pos2::ZERO]));
    }

    fn set_geometry(&mut self, rect: Rect) {
        self.geometry = Some(rect);
    }
}

#[derive(Default)]
struct FakeControls {
    undo: Option<Rc<RefCell<UndoController>>>,
    modes: Vec<EditorMode>,
    geometry: Option<Rect>,
    requests: EventStream<ControlRequest>,
}

impl ControlsBar for FakeControls {
    fn attach_undo(&mut self, undo: Rc<RefCell<UndoController>>) {
        self.undo = Some(undo);
    }

    fn apply_mode(&mut self, mode: EditorMode) {
        self.modes.push(mode);
    }

    fn set_geometry(&mut self, rect: Rect) {
        self.geometry = Some(rect);
    }

    fn requests(&self) -> EventStream<ControlRequest> {
        self.requests.clone()
    }
}

#[derive(Default)]
struct FakePicker {
    brush: Option<Brush>,
    visibility: Vec<bool>,
    indicator: Option<Pos2>,
    saves: EventStream<Brush>,
}

impl ColorPicker for FakePicker {
    fn set_brush(&mut self, brush: Brush) {
        self.brush = Some(brush);
    }

    fn set_visible(&mut self, visible: bool) {
        self.visibility.push(visible);
    }

    fn move_indicator(&mut self, pos: Pos2) {
        self.indicator = Some(pos);
    }

    fn brush_saves(&self) -> EventStream<Brush> {
        self.saves.clone()
    }
}

#[derive(Default)]
struct MemorySettings {
    blob: Option<Vec<u8>>,
    writes: usize,
    delayed_saves: usize,
}

impl SettingsStore for MemorySettings {
    fn brush_blob(&self) -> Option<&[u8]> {
        self.blob.as_deref()
    }

    fn set_brush_blob(&mut self, blob: Vec<u8>) {
        self.blob = Some(blob);
        self.writes += 1;
    }

    fn save_now(&mut self) -> SettingsResult<()> {
        Ok(())
    }

    fn save_delayed(&mut self) {
        self.delayed_saves += 1;
    }
}

// ---- harness ------------------------------------------------------------

struct Harness {
    session: PhotoEditor,
    content: Rc<RefCell<RecordingContent>>,
    controls: Rc<RefCell<FakeControls>>,
    picker: Rc<RefCell<FakePicker>>,
    settings: Rc<RefCell<MemorySettings>>,
}

impl Harness {
    fn new() -> Self {
        Self::with_settings(MemorySettings::default())
    }

    fn with_settings(settings: MemorySettings) -> Self {
        let content = Rc::new(RefCell::new(RecordingContent::default()));
        let controls = Rc::new(RefCell::new(FakeControls::default()));
        let picker = Rc::new(RefCell::new(FakePicker::default()));
        let settings = Rc::new(RefCell::new(settings));
        let session = PhotoEditor::new(
            Rc::new(DynamicImage::new_rgba8(4, 4)),
            Modifications::default(),
            EditorData::default(),
            Rc::clone(&content) as Rc<RefCell<dyn ContentSurface>>,
            Rc::clone(&controls) as Rc<RefCell<dyn ControlsBar>>,
            Rc::clone(&picker) as Rc<RefCell<dyn ColorPicker>>,
            Rc::clone(&settings) as Rc<RefCell<dyn SettingsStore>>,
        );
        Self {
            session,
            content,
            controls,
            picker,
            settings,
        }
    }

    fn press(&self, request: ControlRequest) {
        let requests = self.controls.borrow().requests();
        requests.fire(&request);
    }

    fn save_brush(&self, brush: Brush) {
        let saves = self.picker.borrow().brush_saves();
        saves.fire(&brush);
    }
}

// ---- mode transitions ---------------------------------------------------

#[test]
fn session_starts_in_transform_mode() {
    let h = Harness::new();
    assert_eq!(h.session.mode(), EditorMode::transform());
    assert_eq!(h.content.borrow().modes, vec![EditorMode::transform()]);
    assert_eq!(h.controls.borrow().modes, vec![EditorMode::transform()]);
    assert_eq!(h.picker.borrow().visibility, vec![false]);
}

#[test]
fn paint_request_enters_paint_mode_with_no_action() {
    let h = Harness::new();
    h.press(ControlRequest::EnterPaintMode);
    let mode = h.session.mode();
    assert_eq!(mode.mode, Mode::Paint);
    assert_eq!(mode.action, Action::None);
    assert_eq!(h.picker.borrow().visibility, vec![false, true]);
}

#[test]
fn done_in_paint_mode_returns_to_transform_with_save() {
    let h = Harness::new();
    h.press(ControlRequest::EnterPaintMode);
    h.press(ControlRequest::Done);
    let mode = h.session.mode();
    assert_eq!(mode.mode, Mode::Transform);
    assert_eq!(mode.action, Action::Save);
    assert!(!h.session.is_finished());
    // The picker hides again and every collaborator saw the transition.
    assert_eq!(h.picker.borrow().visibility, vec![false, true, false]);
    assert_eq!(h.content.borrow().modes.last(), Some(&EditorMode::save()));
}

#[test]
fn cancel_in_paint_mode_returns_to_transform_with_discard() {
    let h = Harness::new();
    h.press(ControlRequest::EnterPaintMode);
    h.press(ControlRequest::Cancel);
    let mode = h.session.mode();
    assert_eq!(mode.mode, Mode::Transform);
    assert_eq!(mode.action, Action::Discard);
    assert!(!h.session.is_finished());
}

#[test]
fn mode_changes_are_observable_externally() {
    let h = Harness::new();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let _sub = h.session.mode_changes().subscribe(move |mode: &EditorMode| {
        sink.borrow_mut().push(*mode);
    });
    h.press(ControlRequest::EnterPaintMode);
    h.press(ControlRequest::Done);
    assert_eq!(*seen.borrow(), vec![EditorMode::paint(), EditorMode::save()]);
}

// ---- rotate / flip ------------------------------------------------------

#[test]
fn rotation_wraps_at_360() {
    let h = Harness::new();
    for expected in [90, 180, 270, 0, 90] {
        h.press(ControlRequest::Rotate(90));
        assert_eq!(h.session.modifications().angle, expected);
    }
}

#[test]
fn rotate_and_flip_push_the_record_without_changing_mode() {
    let h = Harness::new();
    h.press(ControlRequest::Rotate(90));
    h.press(ControlRequest::Flip);
    h.press(ControlRequest::Flip);
    h.press(ControlRequest::Rotate(90));

    let applied = &h.content.borrow().applied;
    assert_eq!(applied.len(), 4);
    assert_eq!(applied[0].angle, 90);
    assert!(applied[1].flipped);
    assert!(!applied[2].flipped);
    assert_eq!(applied[3].angle, 180);
    assert_eq!(h.session.mode(), EditorMode::transform());
}

// ---- terminal protocol --------------------------------------------------

#[test]
fn done_in_transform_mode_commits_exactly_once() {
    let h = Harness::new();
    let payloads = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&payloads);
    let _sub = h
        .session
        .done_events()
        .subscribe(move |modifications: &Modifications| {
            sink.borrow_mut().push(modifications.clone());
        });

    h.press(ControlRequest::Rotate(90));
    h.press(ControlRequest::Done);

    assert!(h.session.is_finished());
    assert_eq!(h.content.borrow().save_calls, 1);
    assert_eq!(payloads.borrow().len(), 1);
    let committed = &payloads.borrow()[0];
    assert_eq!(committed.angle, 90);
    // The content surface finalized the paint layer before the copy was taken.
    assert_eq!(committed.paint.len(), 1);

    // The terminal state is absorbing.
    h.press(ControlRequest::Done);
    h.press(ControlRequest::Rotate(90));
    assert_eq!(payloads.borrow().len(), 1);
    assert_eq!(h.content.borrow().save_calls, 1);
    assert_eq!(h.session.modifications().angle, 90);
}

#[test]
fn cancel_in_transform_mode_cancels_exactly_once() {
    let h = Harness::new();
    let cancels = Rc::new(RefCell::new(0));
    let sink = Rc::clone(&cancels);
    let _sub = h.session.cancel_events().subscribe(move |_| {
        *sink.borrow_mut() += 1;
    });

    h.press(ControlRequest::Cancel);
    assert!(h.session.is_finished());
    assert_eq!(*cancels.borrow(), 1);

    h.press(ControlRequest::Cancel);
    assert_eq!(*cancels.borrow(), 1);
}

#[test]
fn done_and_cancel_are_mutually_exclusive() {
    let h = Harness::new();
    let dones = Rc::new(RefCell::new(0));
    let sink = Rc::clone(&dones);
    let _sub = h.session.done_events().subscribe(move |_| {
        *sink.borrow_mut() += 1;
    });

    h.press(ControlRequest::Cancel);
    h.press(ControlRequest::Done);
    assert_eq!(*dones.borrow(), 0);
    assert_eq!(h.content.borrow().save_calls, 0);
}

// ---- brush persistence --------------------------------------------------

#[test]
fn initial_brush_is_decoded_from_the_store() {
    let brush = Brush::new(0.5, Color32::RED);
    let settings = MemorySettings {
        blob: Some(brush.encode()),
        ..Default::default()
    };
    let h = Harness::with_settings(settings);
    assert_eq!(h.picker.borrow().brush, Some(brush));
}

#[test]
fn saving_a_brush_writes_the_store_and_schedules_a_delayed_save() {
    let h = Harness::new();
    let brush = Brush::new(0.3, Color32::GREEN);
    h.save_brush(brush);

    assert_eq!(h.content.borrow().brushes, vec![brush]);
    let settings = h.settings.borrow();
    assert_eq!(settings.writes, 1);
    assert_eq!(settings.delayed_saves, 1);
    assert_eq!(settings.blob.as_deref(), Some(brush.encode().as_slice()));
}

#[test]
fn saving_the_same_brush_twice_writes_once() {
    let h = Harness::new();
    let brush = Brush::new(0.3, Color32::GREEN);
    h.save_brush(brush);
    h.save_brush(brush);

    // Forwarded to the content surface both times, persisted once.
    assert_eq!(h.content.borrow().brushes.len(), 2);
    assert_eq!(h.settings.borrow().writes, 1);
    assert_eq!(h.settings.borrow().delayed_saves, 1);
}

#[test]
fn saving_the_persisted_brush_is_a_no_op() {
    let brush = Brush::new(0.5, Color32::RED);
    let settings = MemorySettings {
        blob: Some(brush.encode()),
        ..Default::default()
    };
    let h = Harness::with_settings(settings);
    h.save_brush(brush);

    assert_eq!(h.settings.borrow().writes, 0);
    assert_eq!(h.settings.borrow().delayed_saves, 0);
}

// ---- wiring and lifetime ------------------------------------------------

#[test]
fn undo_controller_is_shared_with_content_and_controls() {
    let h = Harness::new();
    let session_undo = h.session.undo_controller();
    let content_undo = h.content.borrow().undo.clone().unwrap();
    let controls_undo = h.controls.borrow().undo.clone().unwrap();
    assert!(Rc::ptr_eq(&session_undo, &content_undo));
    assert!(Rc::ptr_eq(&session_undo, &controls_undo));
}

#[test]
fn editor_data_is_forwarded_to_the_content_surface() {
    let content = Rc::new(RefCell::new(RecordingContent::default()));
    let controls = Rc::new(RefCell::new(FakeControls::default()));
    let picker = Rc::new(RefCell::new(FakePicker::default()));
    let settings = Rc::new(RefCell::new(MemorySettings::default()));
    let _session = PhotoEditor::new(
        Rc::new(DynamicImage::new_rgba8(4, 4)),
        Modifications::default(),
        EditorData {
            title: Some("caption".to_owned()),
            fit_to_view: true,
        },
        Rc::clone(&content) as Rc<RefCell<dyn ContentSurface>>,
        controls as Rc<RefCell<dyn ControlsBar>>,
        picker as Rc<RefCell<dyn ColorPicker>>,
        settings as Rc<RefCell<dyn SettingsStore>>,
    );
    let data = content.borrow().data.clone().unwrap();
    assert_eq!(data.title.as_deref(), Some("caption"));
    assert!(data.fit_to_view);
}

#[test]
fn set_size_pushes_the_computed_geometry() {
    let h = Harness::new();
    let size = vec2(800.0, 600.0);
    h.session.set_size(size);

    let expected = layout::compute(size).unwrap();
    assert_eq!(h.content.borrow().geometry, Some(expected.content));
    assert_eq!(h.controls.borrow().geometry, Some(expected.controls));
    assert_eq!(h.picker.borrow().indicator, Some(expected.picker_indicator));
}

#[test]
fn empty_sizes_are_ignored() {
    let h = Harness::new();
    h.session.set_size(vec2(0.0, 0.0));
    assert_eq!(h.content.borrow().geometry, None);
    assert_eq!(h.controls.borrow().geometry, None);
}

#[test]
fn dropping_the_session_unsubscribes_its_callbacks() {
    let h = Harness::new();
    let requests = h.controls.borrow().requests();
    let saves = h.picker.borrow().brush_saves();
    assert_eq!(requests.subscriber_count(), 1);
    assert_eq!(saves.subscriber_count(), 1);

    drop(h.session);
    assert_eq!(requests.subscriber_count(), 0);
    assert_eq!(saves.subscriber_count(), 0);

    // Firing afterwards reaches nobody and must not panic.
    requests.fire(&ControlRequest::Done);
    assert_eq!(h.content.borrow().save_calls, 0);
}
