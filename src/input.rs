//! Input handling - key reading and translation

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Key modifier and prefix flags
pub mod key_flags {
    pub const CONTROL: u32 = 0x1000_0000;
    pub const META: u32 = 0x2000_0000;
    pub const CTLX: u32 = 0x4000_0000;
    pub const SPEC: u32 = 0x8000_0000;
    /// `C-c` user prefix
    pub const CTLC: u32 = 0x0100_0000;
}

/// Special key codes (PC scan-code style)
pub mod special {
    pub const HOME: u32 = 0x47;
    pub const UP: u32 = 0x48;
    pub const PAGE_UP: u32 = 0x49;
    pub const LEFT: u32 = 0x4b;
    pub const RIGHT: u32 = 0x4d;
    pub const END: u32 = 0x4f;
    pub const DOWN: u32 = 0x50;
    pub const PAGE_DOWN: u32 = 0x51;
    pub const DELETE: u32 = 0x53;
    /// F1 is `F_BASE + 1`
    pub const F_BASE: u32 = 0x3a;
}

const PREFIX_MASK: u32 = 0xFF00_0000;

/// A key with modifiers packed into one code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Key(pub u32);

impl Key {
    pub fn char(ch: char) -> Self {
        Key(ch as u32)
    }

    /// C-x style control key
    pub fn ctrl(ch: char) -> Self {
        Key(key_flags::CONTROL | ch.to_ascii_lowercase() as u32)
    }

    /// M-x or ESC x
    pub fn meta(ch: char) -> Self {
        Key(key_flags::META | ch.to_ascii_lowercase() as u32)
    }

    /// C-x <ch>
    pub fn ctlx(ch: char) -> Self {
        Key(key_flags::CTLX | ch.to_ascii_lowercase() as u32)
    }

    /// C-x C-<ch>
    pub fn ctlx_ctrl(ch: char) -> Self {
        Key(key_flags::CTLX | key_flags::CONTROL | ch.to_ascii_lowercase() as u32)
    }

    /// C-c <ch>
    pub fn ctlc(ch: char) -> Self {
        Key(key_flags::CTLC | ch.to_ascii_lowercase() as u32)
    }

    pub fn special(code: u32) -> Self {
        Key(key_flags::SPEC | code)
    }

    /// Function key F<n>
    pub fn function(n: u8) -> Self {
        Key::special(special::F_BASE + n as u32)
    }

    pub fn code(&self) -> u32 {
        self.0
    }

    pub fn is_ctrl(&self) -> bool {
        self.0 & key_flags::CONTROL != 0
    }

    pub fn is_meta(&self) -> bool {
        self.0 & key_flags::META != 0
    }

    pub fn is_ctlx(&self) -> bool {
        self.0 & key_flags::CTLX != 0
    }

    pub fn is_ctlc(&self) -> bool {
        self.0 & key_flags::CTLC != 0
    }

    pub fn is_special(&self) -> bool {
        self.0 & key_flags::SPEC != 0
    }

    /// The character without modifiers
    pub fn base_char(&self) -> Option<char> {
        char::from_u32(self.0 & !PREFIX_MASK)
    }

    /// Printable, unmodified character
    pub fn is_self_insert(&self) -> bool {
        if self.0 & PREFIX_MASK != 0 {
            return false;
        }
        char::from_u32(self.0).is_some_and(|ch| ch >= ' ' && ch != '\x7f')
    }

    /// Human-readable name, e.g. "C-x C-s" or "F5"
    pub fn display_name(&self) -> String {
        let mut result = String::new();
        if self.is_ctlx() {
            result.push_str("C-x ");
        }
        if self.is_ctlc() {
            result.push_str("C-c ");
        }
        if self.is_meta() {
            result.push_str("M-");
        }
        if self.is_ctrl() {
            result.push_str("C-");
        }

        if self.is_special() {
            let code = self.0 & 0xFF;
            let name = match code {
                special::HOME => "Home".to_string(),
                special::UP => "Up".to_string(),
                special::PAGE_UP => "PageUp".to_string(),
                special::LEFT => "Left".to_string(),
                special::RIGHT => "Right".to_string(),
                special::END => "End".to_string(),
                special::DOWN => "Down".to_string(),
                special::PAGE_DOWN => "PageDown".to_string(),
                special::DELETE => "Delete".to_string(),
                n if n > special::F_BASE && n <= special::F_BASE + 12 => {
                    format!("F{}", n - special::F_BASE)
                }
                n => format!("special-0x{:02x}", n),
            };
            result.push_str(&name);
            return result;
        }

        match self.0 & !PREFIX_MASK {
            0x7f => result.push_str("DEL"),
            0x20 => result.push_str("SPC"),
            base => match char::from_u32(base) {
                Some(ch) => result.push(ch),
                None => result.push_str(&format!("0x{:x}", base)),
            },
        }
        result
    }
}

/// Prefix state for multi-key sequences
#[derive(Debug, Default)]
pub struct InputState {
    ctlx_pending: bool,
    ctlc_pending: bool,
    meta_pending: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Waiting for the rest of a sequence
    pub fn is_pending(&self) -> bool {
        self.ctlx_pending || self.ctlc_pending || self.meta_pending
    }

    /// Echo text for a pending prefix
    pub fn pending_label(&self) -> Option<&'static str> {
        if self.ctlx_pending {
            Some("C-x -")
        } else if self.ctlc_pending {
            Some("C-c -")
        } else if self.meta_pending {
            Some("ESC -")
        } else {
            None
        }
    }

    /// Translate a crossterm event; None while a prefix is still open
    pub fn translate_key(&mut self, event: KeyEvent) -> Option<Key> {
        let KeyEvent {
            code, modifiers, kind, ..
        } = event;

        // Windows reports release and repeat too
        if kind != KeyEventKind::Press {
            return None;
        }

        if self.meta_pending {
            self.meta_pending = false;
            return translate_basic(code, modifiers).map(|k| Key(k.0 | key_flags::META));
        }

        if self.ctlx_pending {
            self.ctlx_pending = false;
            return translate_basic(code, modifiers).map(|k| Key(k.0 | key_flags::CTLX));
        }

        if self.ctlc_pending {
            self.ctlc_pending = false;
            return translate_basic(code, modifiers).map(|k| Key(k.0 | key_flags::CTLC));
        }

        let ctrl = modifiers.contains(KeyModifiers::CONTROL);
        match code {
            KeyCode::Esc => {
                self.meta_pending = true;
                None
            }
            KeyCode::Char('x') if ctrl => {
                self.ctlx_pending = true;
                None
            }
            KeyCode::Char('c') if ctrl => {
                self.ctlc_pending = true;
                None
            }
            _ => translate_basic(code, modifiers),
        }
    }
}

fn translate_basic(code: KeyCode, modifiers: KeyModifiers) -> Option<Key> {
    let ctrl = modifiers.contains(KeyModifiers::CONTROL);
    let alt = modifiers.contains(KeyModifiers::ALT);

    let key = match code {
        KeyCode::Char(ch) => {
            let mut flags = 0;
            if ctrl {
                flags |= key_flags::CONTROL;
            }
            if alt {
                flags |= key_flags::META;
            }
            let base = if flags != 0 { ch.to_ascii_lowercase() } else { ch };
            Key(flags | base as u32)
        }
        KeyCode::Enter => Key::ctrl('m'),
        KeyCode::Tab => Key::ctrl('i'),
        KeyCode::Backspace => Key(0x7f),
        KeyCode::Delete => Key::special(special::DELETE),
        KeyCode::Home => Key::special(special::HOME),
        KeyCode::End => Key::special(special::END),
        KeyCode::PageUp => Key::special(special::PAGE_UP),
        KeyCode::PageDown => Key::special(special::PAGE_DOWN),
        KeyCode::Up => Key::special(special::UP),
        KeyCode::Down => Key::special(special::DOWN),
        KeyCode::Left => Key::special(special::LEFT),
        KeyCode::Right => Key::special(special::RIGHT),
        KeyCode::F(n) => Key::function(n),
        KeyCode::Esc => Key::ctrl('['),
        _ => return None,
    };
    Some(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_plain_and_control() {
        let mut input = InputState::new();
        assert_eq!(input.translate_key(press(KeyCode::Char('a'), KeyModifiers::NONE)), Some(Key::char('a')));
        assert_eq!(input.translate_key(press(KeyCode::Char('f'), KeyModifiers::CONTROL)), Some(Key::ctrl('f')));
        assert_eq!(input.translate_key(press(KeyCode::F(5), KeyModifiers::NONE)), Some(Key::function(5)));
    }

    #[test]
    fn test_ctlx_sequence() {
        let mut input = InputState::new();
        assert_eq!(input.translate_key(press(KeyCode::Char('x'), KeyModifiers::CONTROL)), None);
        assert!(input.is_pending());
        assert_eq!(input.pending_label(), Some("C-x -"));
        assert_eq!(
            input.translate_key(press(KeyCode::Char('s'), KeyModifiers::CONTROL)),
            Some(Key::ctlx_ctrl('s'))
        );
        assert!(!input.is_pending());
    }

    #[test]
    fn test_ctlc_sequence() {
        let mut input = InputState::new();
        assert_eq!(input.translate_key(press(KeyCode::Char('c'), KeyModifiers::CONTROL)), None);
        assert_eq!(input.translate_key(press(KeyCode::Char('h'), KeyModifiers::NONE)), Some(Key::ctlc('h')));
    }

    #[test]
    fn test_escape_is_meta_prefix() {
        let mut input = InputState::new();
        assert_eq!(input.translate_key(press(KeyCode::Esc, KeyModifiers::NONE)), None);
        assert_eq!(input.translate_key(press(KeyCode::Char('x'), KeyModifiers::NONE)), Some(Key::meta('x')));
        assert_eq!(input.translate_key(press(KeyCode::Char('x'), KeyModifiers::ALT)), Some(Key::meta('x')));
    }

    #[test]
    fn test_self_insert() {
        assert!(Key::char('7').is_self_insert());
        assert!(!Key::ctrl('a').is_self_insert());
        assert!(!Key(0x7f).is_self_insert());
        assert!(!Key::ctlc('h').is_self_insert());
    }

    #[test]
    fn test_display_names() {
        assert_eq!(Key::ctlx_ctrl('s').display_name(), "C-x C-s");
        assert_eq!(Key::ctlc('h').display_name(), "C-c h");
        assert_eq!(Key::meta('x').display_name(), "M-x");
        assert_eq!(Key::function(5).display_name(), "F5");
        assert_eq!(Key::special(special::PAGE_DOWN).display_name(), "PageDown");
    }
}
