//! On/off state for parity highlighting

use std::cell::Cell;
use std::rc::Rc;

use tracing::info;

use super::controller::HighlightController;
use crate::host::Host;

pub const ENABLED_MESSAGE: &str = "Even/odd highlighting enabled";
pub const DISABLED_MESSAGE: &str = "Even/odd highlighting disabled";

/// Shared flag read by the toggle command and both change listeners.
///
/// Clones share the same flag. Starts inactive.
#[derive(Debug, Clone, Default)]
pub struct ToggleState {
    active: Rc<Cell<bool>>,
}

impl ToggleState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    /// Flip the flag, repaint or clear, and tell the user.
    /// Returns the new state.
    pub fn toggle(&self, controller: &HighlightController, host: &mut dyn Host) -> bool {
        if self.is_active() {
            controller.clear_highlights(host);
            host.show_information_message(DISABLED_MESSAGE);
            self.active.set(false);
        } else {
            controller.apply_highlights(host);
            host.show_information_message(ENABLED_MESSAGE);
            self.active.set(true);
        }
        info!(active = self.is_active(), "parity highlighting toggled");
        self.is_active()
    }

    /// Repaint only while active
    pub fn refresh(&self, controller: &HighlightController, host: &mut dyn Host) {
        if self.is_active() {
            controller.apply_highlights(host);
        }
    }
}
