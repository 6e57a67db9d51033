use crate::device_display::interface::{DeviceDisplay, Notification, SessionStatus};
use image::RgbaImage;
use std::error::Error;
use std::sync::{Arc, Mutex};

#[derive(Debug, Default, Clone)]
pub struct DisplayRecord {
    pub statuses: Vec<SessionStatus>,
    pub slots: Vec<String>,
    pub slot_writes: usize,
    pub previews: usize,
    pub notifications: Vec<Notification>,
}

/// Records everything written to it so tests can inspect the view.
#[derive(Clone, Default)]
pub struct DeviceDisplayFake {
    record: Arc<Mutex<DisplayRecord>>,
}

impl DeviceDisplayFake {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self) -> DisplayRecord {
        self.record.lock().unwrap().clone()
    }
}

impl DeviceDisplay for DeviceDisplayFake {
    fn show_status(&mut self, status: SessionStatus) {
        let mut record = self.record.lock().unwrap();
        if record.statuses.last() != Some(&status) {
            record.statuses.push(status);
        }
    }

    fn prepare_slots(&mut self, count: usize) {
        self.record.lock().unwrap().slots = vec![String::new(); count];
    }

    fn slot_count(&self) -> usize {
        self.record.lock().unwrap().slots.len()
    }

    fn write_slot(&mut self, index: usize, text: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
        let mut record = self.record.lock().unwrap();
        let slot = record
            .slots
            .get_mut(index)
            .ok_or_else(|| format!("Invalid slot {}", index))?;
        *slot = text.to_string();
        record.slot_writes += 1;
        Ok(())
    }

    fn show_preview(&mut self, _frame: &RgbaImage) {
        self.record.lock().unwrap().previews += 1;
    }

    fn notify(&mut self, notification: &Notification) {
        self.record
            .lock()
            .unwrap()
            .notifications
            .push(notification.clone());
    }
}
