use crate::event::Subscription;
use crate::modifications::Modifications;
use crate::panels::{CanvasPanel, ColorPickerPanel, ControlsAction, ControlsPanel};
use crate::session::{ColorPicker, ControlsBar, EditorData, PhotoEditor};
use crate::settings::{JsonSettingsStore, SettingsStore};
use image::DynamicImage;
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

/// How the last session ended.
#[derive(Debug, Clone)]
pub enum SessionOutcome {
    Committed(Modifications),
    Cancelled,
}

/// Demo shell hosting one photo editing session at a time.
pub struct PhotoEditApp {
    photo: Rc<DynamicImage>,
    settings: Rc<RefCell<JsonSettingsStore>>,
    session: PhotoEditor,
    canvas: Rc<RefCell<CanvasPanel>>,
    controls: Rc<RefCell<ControlsPanel>>,
    color_picker: Rc<RefCell<ColorPickerPanel>>,
    outcome: Rc<RefCell<Option<SessionOutcome>>>,
    _outcome_subscriptions: Vec<Subscription>,
}

impl PhotoEditApp {
    /// Called once before the first frame.
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let settings = Rc::new(RefCell::new(JsonSettingsStore::load(settings_path())));
        let photo = Rc::new(load_photo());
        let (session, canvas, controls, color_picker, outcome, subscriptions) =
            start_session(Rc::clone(&photo), Rc::clone(&settings));
        Self {
            photo,
            settings,
            session,
            canvas,
            controls,
            color_picker,
            outcome,
            _outcome_subscriptions: subscriptions,
        }
    }

    fn restart(&mut self) {
        let (session, canvas, controls, color_picker, outcome, subscriptions) =
            start_session(Rc::clone(&self.photo), Rc::clone(&self.settings));
        self.session = session;
        self.canvas = canvas;
        self.controls = controls;
        self.color_picker = color_picker;
        self.outcome = outcome;
        self._outcome_subscriptions = subscriptions;
    }

    fn session_ui(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                self.session.set_size(ui.max_rect().size());

                self.canvas.borrow_mut().ui(ui);
                let actions = self.controls.borrow_mut().ui(ui);
                let saved_brush = self.color_picker.borrow_mut().ui(ctx);

                // Fire streams only after every panel borrow is released; the
                // session's handlers re-enter the panels.
                let requests = self.controls.borrow().requests();
                for action in actions {
                    match action {
                        ControlsAction::Request(request) => requests.fire(&request),
                        ControlsAction::Undo => self.canvas.borrow_mut().undo_last(),
                        ControlsAction::Redo => self.canvas.borrow_mut().redo_last(),
                    }
                }
                if let Some(brush) = saved_brush {
                    let saves = self.color_picker.borrow().brush_saves();
                    saves.fire(&brush);
                }
            });
    }

    fn outcome_ui(&mut self, ctx: &egui::Context, outcome: &SessionOutcome) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(48.0);
                match outcome {
                    SessionOutcome::Committed(modifications) => {
                        ui.heading("Edit committed");
                        ui.label(format!(
                            "angle: {}°, flipped: {}, strokes: {}",
                            modifications.angle,
                            modifications.flipped,
                            modifications.paint.len()
                        ));
                    }
                    SessionOutcome::Cancelled => {
                        ui.heading("Edit cancelled");
                    }
                }
                ui.add_space(16.0);
                if ui.button("New session").clicked() {
                    self.restart();
                }
            });
        });
    }
}

impl eframe::App for PhotoEditApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let outcome = self.outcome.borrow().clone();
        match outcome {
            Some(outcome) => self.outcome_ui(ctx, &outcome),
            None => self.session_ui(ctx),
        }

        // Flush a requested delayed settings save at frame granularity.
        if let Err(err) = self.settings.borrow_mut().flush_if_dirty() {
            log::error!("Failed to save settings: {}", err);
        }
    }

    /// Called by the framework to save state before shutdown.
    fn save(&mut self, _storage: &mut dyn eframe::Storage) {
        if let Err(err) = self.settings.borrow_mut().flush_if_dirty() {
            log::error!("Failed to save settings on shutdown: {}", err);
        }
    }
}

type SessionParts = (
    PhotoEditor,
    Rc<RefCell<CanvasPanel>>,
    Rc<RefCell<ControlsPanel>>,
    Rc<RefCell<ColorPickerPanel>>,
    Rc<RefCell<Option<SessionOutcome>>>,
    Vec<Subscription>,
);

fn start_session(photo: Rc<DynamicImage>, settings: Rc<RefCell<JsonSettingsStore>>) -> SessionParts {
    let canvas = Rc::new(RefCell::new(CanvasPanel::new()));
    let controls = Rc::new(RefCell::new(ControlsPanel::new()));
    let color_picker = Rc::new(RefCell::new(ColorPickerPanel::new()));

    let data = EditorData {
        title: Some("Edit photo".to_owned()),
        fit_to_view: true,
    };
    let session = PhotoEditor::new(
        photo,
        Modifications::default(),
        data,
        Rc::clone(&canvas) as Rc<RefCell<dyn crate::session::ContentSurface>>,
        Rc::clone(&controls) as Rc<RefCell<dyn crate::session::ControlsBar>>,
        Rc::clone(&color_picker) as Rc<RefCell<dyn crate::session::ColorPicker>>,
        Rc::clone(&settings) as Rc<RefCell<dyn SettingsStore>>,
    );

    let outcome = Rc::new(RefCell::new(None));
    let done_cell = Rc::clone(&outcome);
    let done = session
        .done_events()
        .subscribe(move |modifications: &Modifications| {
            *done_cell.borrow_mut() = Some(SessionOutcome::Committed(modifications.clone()));
        });
    let cancel_cell = Rc::clone(&outcome);
    let cancel = session.cancel_events().subscribe(move |_| {
        *cancel_cell.borrow_mut() = Some(SessionOutcome::Cancelled);
    });

    (
        session,
        canvas,
        controls,
        color_picker,
        outcome,
        vec![done, cancel],
    )
}

fn settings_path() -> PathBuf {
    eframe::storage_dir("photo_edit")
        .map(|dir| dir.join("settings.json"))
        .unwrap_or_else(|| PathBuf::from("photo_edit_settings.json"))
}

/// Load the photo named on the command line, or fall back to a generated
/// placeholder so the app always starts.
fn load_photo() -> DynamicImage {
    if let Some(path) = std::env::args().nth(1) {
        match image::open(&path) {
            Ok(photo) => return photo,
            Err(err) => log::warn!("Failed to open {}: {}, using placeholder", path, err),
        }
    }
    let placeholder = image::RgbaImage::from_fn(640, 480, |x, y| {
        image::Rgba([(x % 256) as u8, (y % 256) as u8, 160, 255])
    });
    DynamicImage::ImageRgba8(placeholder)
}
