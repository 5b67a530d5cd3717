//! Command and event registry
//!
//! Holds the callbacks add-ons register with the host. The registry is kept
//! apart from the `Host` implementation so a callback can borrow the host
//! mutably while the registry is borrowed for dispatch.

use std::collections::HashMap;

use tracing::debug;

use super::Host;
use crate::error::{EditorError, Result};

/// A zero-argument callback invoked with access to the host
pub type Callback = Box<dyn FnMut(&mut dyn Host)>;

/// Token returned by every registration; hand it back to `Registry::dispose`
#[derive(Debug, PartialEq, Eq)]
#[must_use]
pub enum Disposable {
    Command(String),
    Listener(u64),
}

/// Registered commands and event listeners
#[derive(Default)]
pub struct Registry {
    commands: HashMap<String, Callback>,
    text_changed: Vec<(u64, Callback)>,
    editor_changed: Vec<(u64, Callback)>,
    next_listener: u64,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a command id to a callback. Ids are unique.
    pub fn register_command(&mut self, id: &str, callback: Callback) -> Result<Disposable> {
        if self.commands.contains_key(id) {
            return Err(EditorError::Message(format!("command '{}' already exists", id)));
        }
        debug!(command = id, "command registered");
        self.commands.insert(id.to_string(), callback);
        Ok(Disposable::Command(id.to_string()))
    }

    /// Listen for edits to the text of any document
    pub fn on_did_change_text_document(&mut self, callback: Callback) -> Disposable {
        let id = self.next_id();
        self.text_changed.push((id, callback));
        Disposable::Listener(id)
    }

    /// Listen for the focused editor changing
    pub fn on_did_change_active_text_editor(&mut self, callback: Callback) -> Disposable {
        let id = self.next_id();
        self.editor_changed.push((id, callback));
        Disposable::Listener(id)
    }

    fn next_id(&mut self) -> u64 {
        self.next_listener += 1;
        self.next_listener
    }

    /// Run a registered command
    pub fn execute_command(&mut self, id: &str, host: &mut dyn Host) -> Result<()> {
        let callback = self
            .commands
            .get_mut(id)
            .ok_or_else(|| EditorError::UnknownCommand(id.to_string()))?;
        debug!(command = id, "executing command");
        callback(&mut *host);
        Ok(())
    }

    /// Notify listeners that document text changed
    pub fn fire_text_document_changed(&mut self, host: &mut dyn Host) {
        for (_, callback) in &mut self.text_changed {
            callback(&mut *host);
        }
    }

    /// Notify listeners that the focused editor changed
    pub fn fire_active_text_editor_changed(&mut self, host: &mut dyn Host) {
        for (_, callback) in &mut self.editor_changed {
            callback(&mut *host);
        }
    }

    /// Drop a registration
    pub fn dispose(&mut self, disposable: Disposable) {
        match disposable {
            Disposable::Command(id) => {
                self.commands.remove(&id);
            }
            Disposable::Listener(id) => {
                self.text_changed.retain(|(l, _)| *l != id);
                self.editor_changed.retain(|(l, _)| *l != id);
            }
        }
    }

    /// Registered command ids, sorted
    pub fn command_ids(&self) -> Vec<&str> {
        let mut ids: Vec<_> = self.commands.keys().map(|s| s.as_str()).collect();
        ids.sort();
        ids
    }

    pub fn has_command(&self, id: &str) -> bool {
        self.commands.contains_key(id)
    }

    /// Number of live event listeners
    pub fn listener_count(&self) -> usize {
        self.text_changed.len() + self.editor_changed.len()
    }
}

/// Per add-on bookkeeping owned by the host.
///
/// Everything an add-on registers goes into `subscriptions`; the host
/// disposes the whole list when it shuts down.
#[derive(Debug, Default)]
pub struct ExtensionContext {
    pub subscriptions: Vec<Disposable>,
}

impl ExtensionContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Release every registration, in reverse order
    pub fn dispose_all(&mut self, registry: &mut Registry) {
        while let Some(disposable) = self.subscriptions.pop() {
            registry.dispose(disposable);
        }
    }
}
