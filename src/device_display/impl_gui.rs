use crate::device_display::interface::{DeviceDisplay, DisplayView};
use crate::device_input::interface::{DeviceInput, InputEvent};
use std::error::Error;
use std::path::PathBuf;
use std::sync::mpsc::{Receiver, Sender};
use std::sync::{Arc, Mutex};

struct ClassifierWindow {
    view: Arc<Mutex<DisplayView>>,
    events: Sender<InputEvent>,
    path: String,
}

impl eframe::App for ClassifierWindow {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let view = match self.view.lock() {
            Ok(view) => view.clone(),
            Err(_) => return,
        };
        let events = self.events.clone();
        let send = move |event: InputEvent| {
            let _ = events.send(event);
        };

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Histology classifier");
            ui.add_space(8.0);

            ui.horizontal(|ui| {
                ui.label("Image path");
                ui.text_edit_singleline(&mut self.path);
                if ui.button("Choose Image").clicked() && !self.path.trim().is_empty() {
                    send(InputEvent::ImageSelected(PathBuf::from(self.path.trim())));
                }
            });
            ui.label(egui::RichText::new(&view.image_text).weak());
            ui.separator();

            match &view.best_match {
                Some((label, confidence)) => {
                    ui.horizontal(|ui| {
                        ui.vertical(|ui| {
                            ui.label(egui::RichText::new("Best match").weak());
                            ui.label(egui::RichText::new(label).strong().size(18.0));
                        });
                        ui.add_space(24.0);
                        ui.vertical(|ui| {
                            ui.label(egui::RichText::new("Confidence").weak());
                            ui.label(egui::RichText::new(confidence).size(18.0));
                        });
                    });
                }
                None => {
                    ui.label(egui::RichText::new("No predictions yet.").weak());
                }
            }
            ui.separator();

            let mut consent = view.consent;
            if ui
                .checkbox(
                    &mut consent,
                    "I acknowledge this tool does not replace professional medical advice.",
                )
                .changed()
            {
                send(InputEvent::ConsentChanged(consent));
            }

            ui.horizontal(|ui| {
                ui.label(egui::RichText::new("Model status").weak());
                ui.label(&view.status_text);
                ui.add_space(16.0);
                ui.label(egui::RichText::new(&view.side_text).weak());
            });

            if ui
                .add_enabled(
                    view.classify_enabled,
                    egui::Button::new(&view.button_text),
                )
                .clicked()
            {
                send(InputEvent::ClassifyClicked);
            }
            ui.label(
                egui::RichText::new(
                    "Press Enter to classify after upload and acknowledge the disclaimer.",
                )
                .small()
                .weak(),
            );
        });

        if let Some(alert) = &view.alert {
            egui::Window::new("Notice")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.label(alert);
                    if ui.button("OK").clicked() {
                        send(InputEvent::AlertDismissed);
                    }
                });
        } else if ctx.input(|i| i.key_pressed(egui::Key::Enter)) {
            send(InputEvent::EnterPressed);
        }
    }
}

/// Window that is both the display and the input of the app.
/// `run_window` must be called on the main thread.
#[derive(Clone)]
pub struct DeviceGui {
    view: Arc<Mutex<DisplayView>>,
    context: Arc<Mutex<Option<egui::Context>>>,
    sender: Sender<InputEvent>,
    receiver: Arc<Mutex<Option<Receiver<InputEvent>>>>,
}

impl DeviceGui {
    pub fn new() -> Self {
        let (sender, receiver) = std::sync::mpsc::channel();
        Self {
            view: Arc::new(Mutex::new(DisplayView::default())),
            context: Arc::new(Mutex::new(None)),
            sender,
            receiver: Arc::new(Mutex::new(Some(receiver))),
        }
    }

    pub fn run_window(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default().with_inner_size([520.0, 360.0]),
            ..Default::default()
        };

        let window = ClassifierWindow {
            view: self.view.clone(),
            events: self.sender.clone(),
            path: String::new(),
        };
        let context = self.context.clone();

        eframe::run_native(
            "Histology classifier",
            options,
            Box::new(move |cc| {
                if let Ok(mut context) = context.lock() {
                    *context = Some(cc.egui_ctx.clone());
                }
                Box::new(window)
            }),
        )
        .map_err(|e| e.to_string())?;

        Ok(())
    }
}

impl DeviceDisplay for DeviceGui {
    fn init(&mut self) -> Result<(), Box<dyn Error + Send + Sync>> {
        Ok(())
    }

    fn render(&mut self, view: &DisplayView) -> Result<(), Box<dyn Error + Send + Sync>> {
        *self.view.lock().map_err(|e| e.to_string())? = view.clone();

        if let Some(context) = self.context.lock().map_err(|e| e.to_string())?.as_ref() {
            context.request_repaint();
        }
        Ok(())
    }
}

impl DeviceInput for DeviceGui {
    fn events(&self) -> Receiver<InputEvent> {
        match self.receiver.lock().ok().and_then(|mut receiver| receiver.take()) {
            Some(receiver) => receiver,
            None => std::sync::mpsc::channel().1,
        }
    }
}
