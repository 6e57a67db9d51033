use image::RgbaImage;
use std::error::Error;

/// What the surrounding UI needs to know about the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionStatus {
    #[default]
    Idle,
    Loading,
    Active,
    Stopped,
}

/// Short human readable message shown as a transient toast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: String,
}

/// The prediction view: status, a camera preview, and a fixed number of text
/// slots, one per class.
pub trait DeviceDisplay: Send {
    fn show_status(&mut self, status: SessionStatus);

    /// Replaces all slots with `count` empty ones.
    fn prepare_slots(&mut self, count: usize);

    fn slot_count(&self) -> usize;

    /// Returns an error if `index` is not below `slot_count()`.
    fn write_slot(&mut self, index: usize, text: &str) -> Result<(), Box<dyn Error + Send + Sync>>;

    fn show_preview(&mut self, frame: &RgbaImage);

    fn notify(&mut self, notification: &Notification);
}
