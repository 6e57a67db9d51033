use super::main::Session;
use std::sync::PoisonError;

impl Session {
    pub fn render(&self) {
        let status = self.model.state.status();
        self.device_display
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .show_status(status);
    }

    /// Writes one row per slot. Rows without a slot are dropped.
    pub fn render_prediction(&self, rows: &[String]) {
        let mut device_display = self
            .device_display
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let slot_count = device_display.slot_count();

        for (index, row) in rows.iter().enumerate().take(slot_count) {
            if let Err(e) = device_display.write_slot(index, row) {
                let _ = self.logger.error(&format!("Failed to render row {}: {}", index, e));
            }
        }
    }
}
