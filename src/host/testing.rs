//! In-memory host for unit tests

use std::collections::HashMap;

use super::{DecorationHandle, Host, LineIndex, Position, Range, TextDocument};
use crate::style::Style;

/// A document backed by a plain string
pub struct StringDocument {
    text: String,
    index: LineIndex,
}

impl StringDocument {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            index: LineIndex::new(text),
        }
    }
}

impl TextDocument for StringDocument {
    fn text(&self) -> String {
        self.text.clone()
    }

    fn position_at(&self, offset: usize) -> Position {
        self.index.position_at(offset)
    }
}

/// Records every call an add-on makes
#[derive(Default)]
pub struct RecordingHost {
    pub document: Option<StringDocument>,
    pub styles: Vec<Style>,
    /// Every `set_decorations` call, in order
    pub calls: Vec<(DecorationHandle, Vec<Range>)>,
    /// What is currently painted per decoration
    pub painted: HashMap<DecorationHandle, Vec<Range>>,
    pub messages: Vec<String>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: &str) -> Self {
        Self {
            document: Some(StringDocument::new(text)),
            ..Self::default()
        }
    }

    pub fn set_text(&mut self, text: &str) {
        self.document = Some(StringDocument::new(text));
    }

    pub fn painted(&self, handle: DecorationHandle) -> &[Range] {
        self.painted.get(&handle).map(|r| r.as_slice()).unwrap_or(&[])
    }

    /// Text covered by each range painted with `handle`
    pub fn painted_text(&self, handle: DecorationHandle) -> Vec<String> {
        let Some(doc) = &self.document else {
            return Vec::new();
        };
        let lines: Vec<&str> = doc.text.split('\n').collect();
        self.painted(handle)
            .iter()
            .map(|r| lines[r.start.line][r.start.column..r.end.column].to_string())
            .collect()
    }
}

impl Host for RecordingHost {
    fn active_document(&self) -> Option<&dyn TextDocument> {
        self.document.as_ref().map(|d| d as &dyn TextDocument)
    }

    fn create_decoration_type(&mut self, style: Style) -> DecorationHandle {
        self.styles.push(style);
        DecorationHandle(self.styles.len() - 1)
    }

    fn set_decorations(&mut self, decoration: DecorationHandle, ranges: &[Range]) {
        self.calls.push((decoration, ranges.to_vec()));
        self.painted.insert(decoration, ranges.to_vec());
    }

    fn show_information_message(&mut self, message: &str) {
        self.messages.push(message.to_string());
    }
}
