//! Even/odd number highlighting
//!
//! - `scanner` finds standalone integers and splits them by parity
//! - `controller` paints or clears them on the focused document
//! - `toggle` holds the on/off flag
//! - `extension` wires the command and change listeners into a host

mod controller;
mod extension;
mod scanner;
mod styles;
mod toggle;

pub use controller::HighlightController;
pub use extension::{activate, deactivate, TOGGLE_COMMAND};
pub use scanner::{scan, scan_text, tokens, Highlights, NumberToken};
pub use styles::{DecorationStyles, EVEN_STYLE, ODD_STYLE};
pub use toggle::{ToggleState, DISABLED_MESSAGE, ENABLED_MESSAGE};
