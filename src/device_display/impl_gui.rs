use crate::device_display::interface::{DeviceDisplay, Notification, SessionStatus};
use eframe::egui;
use image::RgbaImage;
use std::error::Error;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

const NOTIFICATION_DURATION: Duration = Duration::from_secs(5);
const REPAINT_INTERVAL: Duration = Duration::from_millis(16);

#[derive(Default)]
struct GuiModel {
    status: SessionStatus,
    slots: Vec<String>,
    preview: Option<egui::ColorImage>,
    notifications: Vec<(Notification, Instant)>,
}

struct PredictionWindow {
    model: Arc<Mutex<GuiModel>>,
    preview_texture: Option<egui::TextureHandle>,
    on_start: Box<dyn Fn()>,
    on_stop: Box<dyn Fn()>,
}

impl eframe::App for PredictionWindow {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let (status, slots, notifications, preview) = {
            let mut model = self.model.lock().unwrap_or_else(PoisonError::into_inner);
            model
                .notifications
                .retain(|(_, shown_at)| shown_at.elapsed() < NOTIFICATION_DURATION);
            (
                model.status,
                model.slots.clone(),
                model.notifications.clone(),
                model.preview.take(),
            )
        };

        if let Some(image) = preview {
            match &mut self.preview_texture {
                Some(texture) => texture.set(image, egui::TextureOptions::LINEAR),
                None => {
                    self.preview_texture =
                        Some(ctx.load_texture("camera-preview", image, egui::TextureOptions::LINEAR))
                }
            }
        }

        if !notifications.is_empty() {
            egui::TopBottomPanel::top("notifications").show(ctx, |ui| {
                for (notification, _) in &notifications {
                    ui.colored_label(
                        egui::Color32::from_rgb(200, 40, 40),
                        format!("{}: {}", notification.title, notification.description),
                    );
                }
            });
        }

        egui::SidePanel::right("predictions")
            .min_width(280.0)
            .show(ctx, |ui| {
                ui.heading("Prediction Results");
                ui.add_space(8.0);
                for slot in &slots {
                    ui.label(egui::RichText::new(slot).monospace().size(16.0));
                }
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(20.0);
                match status {
                    SessionStatus::Idle | SessionStatus::Stopped => {
                        ui.label("Camera feed will appear here once activated");
                        if ui.button("Start Webcam").clicked() {
                            (self.on_start)();
                        }
                    }
                    SessionStatus::Loading => {
                        ui.horizontal(|ui| {
                            ui.spinner();
                            ui.label("Initializing...");
                        });
                    }
                    SessionStatus::Active => {
                        if let Some(texture) = &self.preview_texture {
                            ui.image((texture.id(), texture.size_vec2()));
                        }
                        if ui.button("Stop Webcam").clicked() {
                            (self.on_stop)();
                        }
                    }
                }
            });
        });

        ctx.request_repaint_after(REPAINT_INTERVAL);
    }
}

/// egui window showing the live preview and prediction rows. The session
/// writes into it through `DeviceDisplay`; the window reads on every repaint.
#[derive(Clone, Default)]
pub struct DeviceDisplayGui {
    model: Arc<Mutex<GuiModel>>,
}

impl DeviceDisplayGui {
    pub fn new() -> Self {
        Self::default()
    }

    fn model(&self) -> MutexGuard<'_, GuiModel> {
        self.model.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Blocks the calling thread until the window is closed.
    pub fn run_window(
        &self,
        title: &str,
        size: [f32; 2],
        on_start: Box<dyn Fn()>,
        on_stop: Box<dyn Fn()>,
    ) -> Result<(), eframe::Error> {
        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_title(title)
                .with_inner_size(size),
            ..Default::default()
        };

        let window = PredictionWindow {
            model: self.model.clone(),
            preview_texture: None,
            on_start,
            on_stop,
        };

        eframe::run_native(title, options, Box::new(|_cc| Box::new(window)))
    }
}

impl DeviceDisplay for DeviceDisplayGui {
    fn show_status(&mut self, status: SessionStatus) {
        let mut model = self.model();
        if status == SessionStatus::Loading {
            model.preview = None;
        }
        model.status = status;
    }

    fn prepare_slots(&mut self, count: usize) {
        self.model().slots = vec![String::new(); count];
    }

    fn slot_count(&self) -> usize {
        self.model().slots.len()
    }

    fn write_slot(&mut self, index: usize, text: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
        let mut model = self.model();
        let slot = model
            .slots
            .get_mut(index)
            .ok_or_else(|| format!("Invalid slot {}", index))?;
        *slot = text.to_string();
        Ok(())
    }

    fn show_preview(&mut self, frame: &RgbaImage) {
        let size = [frame.width() as usize, frame.height() as usize];
        self.model().preview = Some(egui::ColorImage::from_rgba_unmultiplied(size, frame.as_raw()));
    }

    fn notify(&mut self, notification: &Notification) {
        self.model()
            .notifications
            .push((notification.clone(), Instant::now()));
    }
}
