//! paritylight - a small terminal editor with even/odd number highlighting
//!
//! The editor core (`workbench`, `editor`, `command`) implements the `host`
//! API; the `parity` add-on is written against that API only.

pub mod buffer;
pub mod command;
pub mod config;
pub mod display;
pub mod editor;
pub mod error;
pub mod host;
pub mod input;
pub mod logging;
pub mod parity;
pub mod style;
pub mod terminal;
pub mod window;
pub mod workbench;
