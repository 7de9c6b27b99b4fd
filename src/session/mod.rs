mod collaborators;
pub mod layout;

pub use collaborators::{ColorPicker, ContentSurface, ControlRequest, ControlsBar, EditorData};
pub use layout::SessionLayout;

use crate::brush::Brush;
use crate::event::{EventStream, Subscription};
use crate::mode::{EditorMode, Mode};
use crate::modifications::Modifications;
use crate::settings::SettingsStore;
use crate::undo::UndoController;
use egui::Vec2;
use image::DynamicImage;
use std::cell::RefCell;
use std::rc::Rc;
use uuid::Uuid;

pub type ContentHandle = Rc<RefCell<dyn ContentSurface>>;
pub type ControlsHandle = Rc<RefCell<dyn ControlsBar>>;
pub type PickerHandle = Rc<RefCell<dyn ColorPicker>>;
pub type SettingsHandle = Rc<RefCell<dyn SettingsStore>>;

/// One photo editing session: coordinates the content surface, the controls
/// bar and the color picker from construction to a single terminal
/// done/cancel event.
///
/// All collaborator handles are shared; the session subscribes to their
/// request streams at construction and the subscriptions die with the
/// session, so no callback of a dropped session can ever fire.
pub struct PhotoEditor {
    state: Rc<RefCell<SessionState>>,
    _subscriptions: Vec<Subscription>,
}

struct SessionState {
    id: Uuid,
    mode: EditorMode,
    modifications: Modifications,
    /// Set when the terminal done/cancel event has fired. Absorbing: every
    /// later request is ignored.
    finished: bool,
    content: ContentHandle,
    controls: ControlsHandle,
    color_picker: PickerHandle,
    settings: SettingsHandle,
    undo: Rc<RefCell<UndoController>>,
    /// Encoded form of the last brush known to be in the settings store.
    persisted_brush: Vec<u8>,
    mode_changes: EventStream<EditorMode>,
    done: EventStream<Modifications>,
    cancel: EventStream<()>,
}

/// Work that has to happen after the session's own borrow is released, so
/// subscribers may re-enter the session's accessors.
enum Outbound {
    ModeChanged(EditorMode),
    Done(Modifications),
    Cancel,
}

impl PhotoEditor {
    pub fn new(
        photo: Rc<DynamicImage>,
        modifications: Modifications,
        data: EditorData,
        content: ContentHandle,
        controls: ControlsHandle,
        color_picker: PickerHandle,
        settings: SettingsHandle,
    ) -> Self {
        let id = Uuid::new_v4();
        let undo = Rc::new(RefCell::new(UndoController::new()));

        content
            .borrow_mut()
            .init(photo, &modifications, Rc::clone(&undo), data);
        controls.borrow_mut().attach_undo(Rc::clone(&undo));

        let persisted_brush = settings
            .borrow()
            .brush_blob()
            .map(<[u8]>::to_vec)
            .unwrap_or_default();
        let initial_brush = if persisted_brush.is_empty() {
            Brush::default()
        } else {
            Brush::decode(&persisted_brush)
        };
        color_picker.borrow_mut().set_brush(initial_brush);

        let state = Rc::new(RefCell::new(SessionState {
            id,
            mode: EditorMode::transform(),
            modifications,
            finished: false,
            content,
            controls,
            color_picker,
            settings,
            undo,
            persisted_brush,
            mode_changes: EventStream::new(),
            done: EventStream::new(),
            cancel: EventStream::new(),
        }));

        let requests = state.borrow().controls.borrow().requests();
        let weak = Rc::downgrade(&state);
        let controls_subscription = requests.subscribe(move |request| {
            if let Some(state) = weak.upgrade() {
                handle_request(&state, *request);
            }
        });

        let brush_saves = state.borrow().color_picker.borrow().brush_saves();
        let weak = Rc::downgrade(&state);
        let brush_subscription = brush_saves.subscribe(move |brush| {
            if let Some(state) = weak.upgrade() {
                handle_brush_save(&state, *brush);
            }
        });

        log::info!("Photo editing session {} started", id);
        broadcast_mode(&state, EditorMode::transform());

        Self {
            state,
            _subscriptions: vec![controls_subscription, brush_subscription],
        }
    }

    /// Current mode/action value.
    pub fn mode(&self) -> EditorMode {
        self.state.borrow().mode
    }

    /// Snapshot of the current edit record.
    pub fn modifications(&self) -> Modifications {
        self.state.borrow().modifications.clone()
    }

    /// True once the terminal done/cancel event has fired.
    pub fn is_finished(&self) -> bool {
        self.state.borrow().finished
    }

    /// The undo controller shared with the content and controls collaborators.
    pub fn undo_controller(&self) -> Rc<RefCell<UndoController>> {
        Rc::clone(&self.state.borrow().undo)
    }

    /// Outbound stream of mode changes.
    pub fn mode_changes(&self) -> EventStream<EditorMode> {
        self.state.borrow().mode_changes.clone()
    }

    /// Outbound terminal stream carrying the finalized record.
    pub fn done_events(&self) -> EventStream<Modifications> {
        self.state.borrow().done.clone()
    }

    /// Outbound terminal stream for session cancellation.
    pub fn cancel_events(&self) -> EventStream<()> {
        self.state.borrow().cancel.clone()
    }

    /// Push the session's own size down to the collaborators. Empty sizes are
    /// ignored.
    pub fn set_size(&self, size: Vec2) {
        let Some(resolved) = layout::compute(size) else {
            return;
        };
        let (content, controls, picker) = {
            let state = self.state.borrow();
            (
                Rc::clone(&state.content),
                Rc::clone(&state.controls),
                Rc::clone(&state.color_picker),
            )
        };
        content.borrow_mut().set_geometry(resolved.content);
        controls.borrow_mut().set_geometry(resolved.controls);
        picker.borrow_mut().move_indicator(resolved.picker_indicator);
    }
}

fn handle_request(state: &Rc<RefCell<SessionState>>, request: ControlRequest) {
    let outbound = {
        let mut guard = state.borrow_mut();
        if guard.finished {
            log::debug!("Session {} is finished, ignoring {:?}", guard.id, request);
            return;
        }
        let s = &mut *guard;
        match request {
            ControlRequest::Rotate(delta) => {
                s.modifications.rotate(delta);
                s.content.borrow_mut().apply_modifications(&s.modifications);
                None
            }
            ControlRequest::Flip => {
                s.modifications.flip();
                s.content.borrow_mut().apply_modifications(&s.modifications);
                None
            }
            ControlRequest::EnterPaintMode => match s.mode.mode {
                Mode::Transform => {
                    s.mode = EditorMode::paint();
                    Some(Outbound::ModeChanged(s.mode))
                }
                Mode::Paint => None,
            },
            ControlRequest::Done => match s.mode.mode {
                Mode::Paint => {
                    s.mode = EditorMode::save();
                    Some(Outbound::ModeChanged(s.mode))
                }
                Mode::Transform => {
                    s.content.borrow_mut().save(&mut s.modifications);
                    s.finished = true;
                    log::info!(
                        "Session {} committed: angle={}, flipped={}, {} strokes",
                        s.id,
                        s.modifications.angle,
                        s.modifications.flipped,
                        s.modifications.paint.len()
                    );
                    Some(Outbound::Done(s.modifications.clone()))
                }
            },
            ControlRequest::Cancel => match s.mode.mode {
                Mode::Paint => {
                    s.mode = EditorMode::discard();
                    Some(Outbound::ModeChanged(s.mode))
                }
                Mode::Transform => {
                    s.finished = true;
                    log::info!("Session {} cancelled", s.id);
                    Some(Outbound::Cancel)
                }
            },
        }
    };

    match outbound {
        Some(Outbound::ModeChanged(mode)) => broadcast_mode(state, mode),
        Some(Outbound::Done(modifications)) => {
            let stream = state.borrow().done.clone();
            stream.fire(&modifications);
        }
        Some(Outbound::Cancel) => {
            let stream = state.borrow().cancel.clone();
            stream.fire(&());
        }
        None => {}
    }
}

/// Push a mode change into every collaborator, then notify external
/// observers.
fn broadcast_mode(state: &Rc<RefCell<SessionState>>, mode: EditorMode) {
    let (content, controls, picker, stream) = {
        let s = state.borrow();
        (
            Rc::clone(&s.content),
            Rc::clone(&s.controls),
            Rc::clone(&s.color_picker),
            s.mode_changes.clone(),
        )
    };
    content.borrow_mut().apply_mode(mode);
    controls.borrow_mut().apply_mode(mode);
    picker.borrow_mut().set_visible(mode.is_paint());
    stream.fire(&mode);
}

/// Forward a finalized brush to the content surface and persist it, skipping
/// the store write when the encoded bytes match what is already persisted.
fn handle_brush_save(state: &Rc<RefCell<SessionState>>, brush: Brush) {
    let (content, settings, encoded) = {
        let mut s = state.borrow_mut();
        let encoded = brush.encode();
        let changed = encoded != s.persisted_brush;
        if changed {
            s.persisted_brush = encoded.clone();
        }
        (
            Rc::clone(&s.content),
            changed.then(|| Rc::clone(&s.settings)),
            encoded,
        )
    };
    content.borrow_mut().apply_brush(brush);
    if let Some(settings) = settings {
        let mut settings = settings.borrow_mut();
        settings.set_brush_blob(encoded);
        settings.save_delayed();
    }
}
