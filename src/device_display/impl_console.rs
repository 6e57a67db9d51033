use crate::device_display::interface::{DeviceDisplay, Notification, SessionStatus};
use image::RgbaImage;
use std::error::Error;

/// Prints status changes, notifications and changed prediction rows.
pub struct DeviceDisplayConsole {
    status: SessionStatus,
    slots: Vec<String>,
}

impl DeviceDisplayConsole {
    pub fn new() -> Self {
        Self {
            status: SessionStatus::Idle,
            slots: Vec::new(),
        }
    }

    fn render_slots(&self) {
        let width = self
            .slots
            .iter()
            .map(|slot| slot.chars().count())
            .max()
            .unwrap_or(0)
            .max(18);
        println!("┌{}┐", "─".repeat(width));
        for slot in &self.slots {
            println!("│{:<width$}│", slot, width = width);
        }
        println!("└{}┘", "─".repeat(width));
    }
}

impl Default for DeviceDisplayConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceDisplay for DeviceDisplayConsole {
    fn show_status(&mut self, status: SessionStatus) {
        if status != self.status {
            self.status = status;
            match status {
                SessionStatus::Idle => println!("Camera feed will appear here once activated"),
                SessionStatus::Loading => println!("Initializing..."),
                SessionStatus::Active => println!("Prediction Results"),
                SessionStatus::Stopped => println!("Camera stopped"),
            }
        }
    }

    fn prepare_slots(&mut self, count: usize) {
        self.slots = vec![String::new(); count];
    }

    fn slot_count(&self) -> usize {
        self.slots.len()
    }

    fn write_slot(&mut self, index: usize, text: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
        let slot = self
            .slots
            .get_mut(index)
            .ok_or_else(|| format!("Invalid slot {}", index))?;
        if slot.as_str() != text {
            *slot = text.to_string();
            self.render_slots();
        }
        Ok(())
    }

    fn show_preview(&mut self, _frame: &RgbaImage) {}

    fn notify(&mut self, notification: &Notification) {
        println!("[{}] {}", notification.title, notification.description);
    }
}
