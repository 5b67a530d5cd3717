//! Applies and clears parity decorations on the focused document

use tracing::trace;

use super::scanner::{self, Highlights};
use super::styles::DecorationStyles;
use crate::host::Host;

pub struct HighlightController {
    styles: DecorationStyles,
}

impl HighlightController {
    pub fn new(styles: DecorationStyles) -> Self {
        Self { styles }
    }

    pub fn styles(&self) -> DecorationStyles {
        self.styles
    }

    /// Rescan the focused document and repaint both decorations.
    /// Does nothing when no document has focus.
    pub fn apply_highlights(&self, host: &mut dyn Host) {
        let Some(document) = host.active_document() else {
            return;
        };
        let highlights = scanner::scan(document);
        trace!(
            even = highlights.even.len(),
            odd = highlights.odd.len(),
            "applying parity highlights"
        );
        self.paint(host, &highlights);
    }

    /// Remove both decorations from the focused document
    pub fn clear_highlights(&self, host: &mut dyn Host) {
        if host.active_document().is_none() {
            return;
        }
        trace!("clearing parity highlights");
        self.paint(host, &Highlights::default());
    }

    fn paint(&self, host: &mut dyn Host, highlights: &Highlights) {
        host.set_decorations(self.styles.even, &highlights.even);
        host.set_decorations(self.styles.odd, &highlights.odd);
    }
}
