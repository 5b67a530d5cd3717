//! The two decoration styles

use crate::host::{DecorationHandle, Host};
use crate::style::{Color, Style};

/// Background for even numbers
pub const EVEN_STYLE: Style = Style {
    fg: Color::Black,
    bg: Color::BrightGreen,
    bold: false,
    reverse: false,
};

/// Background for odd numbers
pub const ODD_STYLE: Style = Style {
    fg: Color::Black,
    bg: Color::BrightMagenta,
    bold: false,
    reverse: false,
};

/// Handles for the even and odd decorations, created once at activation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecorationStyles {
    pub even: DecorationHandle,
    pub odd: DecorationHandle,
}

impl DecorationStyles {
    pub fn register(host: &mut dyn Host) -> Self {
        Self {
            even: host.create_decoration_type(EVEN_STYLE),
            odd: host.create_decoration_type(ODD_STYLE),
        }
    }
}
