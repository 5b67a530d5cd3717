//! Editor state and main loop

use std::path::Path;

use tracing::{debug, info, warn};

use crate::command::{self, CommandStatus, KeyTable};
use crate::config::Config;
use crate::error::Result;
use crate::host::{ExtensionContext, Registry};
use crate::input::{InputState, Key};
use crate::parity::{self, ToggleState};
use crate::terminal::{TermEvent, Terminal};
use crate::workbench::Workbench;

/// Everything the editor owns
pub struct EditorState {
    /// Buffers, window and display; the `Host` add-ons see
    pub workbench: Workbench,
    /// Add-on commands and change listeners
    pub registry: Registry,
    /// Add-on subscriptions, disposed at shutdown
    pub context: ExtensionContext,
    /// Input state
    pub input: InputState,
    /// Key bindings
    pub keytab: KeyTable,
    /// Minibuffer prompt state
    pub prompt: PromptState,
    /// Whether editor is running
    pub running: bool,
    /// Parity highlighter flag, once activated
    highlighting: Option<ToggleState>,
}

/// What action to perform when prompt completes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptAction {
    None,
    FindFile,
    SwitchBuffer,
    ExecuteCommand,
}

/// Minibuffer prompt state
#[derive(Debug, Clone)]
pub struct PromptState {
    /// Whether prompt is active
    pub active: bool,
    /// The prompt string (e.g., "Find file")
    pub prompt: String,
    /// Current input
    pub input: String,
    /// What to do when complete
    pub action: PromptAction,
    /// Default value (shown in prompt)
    pub default: Option<String>,
}

impl Default for PromptState {
    fn default() -> Self {
        Self {
            active: false,
            prompt: String::new(),
            input: String::new(),
            action: PromptAction::None,
            default: None,
        }
    }
}

impl EditorState {
    /// Create a new editor state for a terminal `rows` high
    pub fn new(config: &Config, rows: u16) -> Self {
        Self {
            workbench: Workbench::new(rows, config.show_line_numbers),
            registry: Registry::new(),
            context: ExtensionContext::new(),
            input: InputState::new(),
            keytab: KeyTable::with_defaults(),
            prompt: PromptState::default(),
            running: true,
            highlighting: None,
        }
    }

    pub fn open_file(&mut self, path: &Path) -> Result<()> {
        self.workbench.open_file(path)
    }

    /// Start the bundled add-ons against the focused buffer
    pub fn activate_extensions(&mut self) -> Result<()> {
        let state = parity::activate(&mut self.workbench, &mut self.registry, &mut self.context)?;
        self.highlighting = Some(state);
        info!(commands = ?self.registry.command_ids(), "extensions activated");
        Ok(())
    }

    /// Tear the add-ons down; their commands and listeners are gone afterwards
    pub fn shutdown(&mut self) {
        parity::deactivate();
        self.context.dispose_all(&mut self.registry);
        self.highlighting = None;
        debug!("extensions disposed");
    }

    /// Whether parity highlighting is switched on
    pub fn highlighting_active(&self) -> bool {
        self.highlighting.as_ref().is_some_and(ToggleState::is_active)
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Run the main editor loop
    pub fn run(&mut self, terminal: &mut Terminal) -> Result<()> {
        self.workbench.resize(terminal.rows());

        while self.running {
            self.workbench.render(terminal)?;

            match terminal.read_event()? {
                TermEvent::Resize(_, rows) => self.workbench.resize(rows),
                TermEvent::Key(event) => {
                    if let Some(key) = self.input.translate_key(event) {
                        match self.handle_key(key) {
                            CommandStatus::Success => {}
                            CommandStatus::Failure | CommandStatus::Abort => terminal.beep()?,
                        }
                    } else if let Some(label) = self.input.pending_label() {
                        // Show visual feedback that we're waiting for continuation key
                        self.workbench.display.set_message(label);
                    }
                }
            }
        }

        Ok(())
    }

    /// Handle one key, then tell listeners what changed.
    ///
    /// Command errors become a minibuffer message and a failed status.
    pub fn handle_key(&mut self, key: Key) -> CommandStatus {
        let before = self.workbench.focus_state();

        let result = if self.prompt.active {
            self.handle_prompt_key(key)
        } else {
            self.dispatch_key(key)
        };
        let status = match result {
            Ok(CommandStatus::Abort) => {
                self.workbench.display.set_message("Quit");
                CommandStatus::Abort
            }
            Ok(status) => status,
            Err(e) => {
                warn!(key = %key.display_name(), error = %e, "command failed");
                self.workbench.display.set_message(e.to_string());
                CommandStatus::Failure
            }
        };

        self.notify_changes(before);
        status
    }

    fn dispatch_key(&mut self, key: Key) -> Result<CommandStatus> {
        self.workbench.display.clear_message();

        if let Some(cmd) = self.keytab.lookup(key) {
            return cmd(self);
        }
        if key.is_self_insert() {
            if let Some(ch) = key.base_char() {
                self.workbench.insert_char(ch);
            }
            return Ok(CommandStatus::Success);
        }
        self.workbench.display.set_message("Key not bound");
        Ok(CommandStatus::Failure)
    }

    /// Fire "active editor changed" when focus moved to another buffer,
    /// otherwise "text changed" when the focused buffer was edited
    fn notify_changes(&mut self, before: (usize, u64)) {
        let after = self.workbench.focus_state();
        if after.0 != before.0 {
            self.registry.fire_active_text_editor_changed(&mut self.workbench);
        } else if after.1 != before.1 {
            self.registry.fire_text_document_changed(&mut self.workbench);
        }
    }

    /// Run a built-in command, or else an add-on command, by name
    pub fn run_command_by_name(&mut self, name: &str) -> Result<CommandStatus> {
        if let Some(cmd) = command::find_command(name) {
            return cmd(self);
        }
        self.registry.execute_command(name, &mut self.workbench)?;
        Ok(CommandStatus::Success)
    }

    /// Start a minibuffer prompt
    pub fn start_prompt(&mut self, prompt: &str, action: PromptAction, default: Option<String>) {
        self.prompt.active = true;
        self.prompt.prompt = prompt.to_string();
        self.prompt.input.clear();
        self.prompt.action = action;
        self.prompt.default = default;
        self.update_prompt_display();
    }

    fn update_prompt_display(&mut self) {
        let display = match &self.prompt.default {
            Some(def) if self.prompt.input.is_empty() => {
                format!("{} (default {}): ", self.prompt.prompt, def)
            }
            _ => format!("{}: {}", self.prompt.prompt, self.prompt.input),
        };
        self.workbench.display.set_message(display);
    }

    fn handle_prompt_key(&mut self, key: Key) -> Result<CommandStatus> {
        // C-g aborts
        if key == Key::ctrl('g') {
            self.prompt = PromptState::default();
            return Ok(CommandStatus::Abort);
        }

        // Enter completes
        if key == Key::ctrl('m') {
            let input = if self.prompt.input.is_empty() {
                self.prompt.default.clone().unwrap_or_default()
            } else {
                self.prompt.input.clone()
            };
            let action = std::mem::replace(&mut self.prompt.action, PromptAction::None);
            self.prompt.active = false;
            self.workbench.display.clear_message();
            return self.complete_prompt(action, input);
        }

        // Tab completes as far as the candidates agree
        if key == Key::ctrl('i') {
            let done = self.complete_input();
            self.update_prompt_display();
            return Ok(if done { CommandStatus::Success } else { CommandStatus::Failure });
        }

        if key == Key(0x7f) || key == Key::ctrl('h') {
            self.prompt.input.pop();
            self.update_prompt_display();
            return Ok(CommandStatus::Success);
        }

        if key.is_self_insert() {
            if let Some(ch) = key.base_char() {
                self.prompt.input.push(ch);
                self.update_prompt_display();
            }
            return Ok(CommandStatus::Success);
        }

        Ok(CommandStatus::Failure)
    }

    /// Names the current prompt can complete to
    fn completion_candidates(&self) -> Vec<String> {
        match self.prompt.action {
            PromptAction::ExecuteCommand => {
                let mut names: Vec<String> =
                    command::command_names().into_iter().map(str::to_string).collect();
                names.extend(self.registry.command_ids().into_iter().map(str::to_string));
                names
            }
            PromptAction::SwitchBuffer => self
                .workbench
                .buffer_names()
                .into_iter()
                .map(str::to_string)
                .collect(),
            PromptAction::FindFile | PromptAction::None => Vec::new(),
        }
    }

    /// Extend the input to the longest prefix shared by all matches
    fn complete_input(&mut self) -> bool {
        let matches: Vec<String> = self
            .completion_candidates()
            .into_iter()
            .filter(|c| c.starts_with(&self.prompt.input))
            .collect();
        let Some(first) = matches.first() else {
            return false;
        };

        let mut common = first.len();
        for other in &matches[1..] {
            common = first
                .char_indices()
                .zip(other.chars())
                .take_while(|((_, a), b)| a == b)
                .last()
                .map_or(0, |((i, a), _)| i + a.len_utf8())
                .min(common);
        }
        self.prompt.input = first[..common].to_string();
        true
    }

    fn complete_prompt(&mut self, action: PromptAction, input: String) -> Result<CommandStatus> {
        match action {
            PromptAction::FindFile => {
                if input.is_empty() {
                    self.workbench.display.set_message("No file name");
                    return Ok(CommandStatus::Failure);
                }
                self.workbench.open_file(Path::new(&input))?;
                Ok(CommandStatus::Success)
            }
            PromptAction::SwitchBuffer => {
                if !input.is_empty() {
                    self.workbench.focus_by_name(&input)?;
                }
                Ok(CommandStatus::Success)
            }
            PromptAction::ExecuteCommand => {
                if input.is_empty() {
                    return Ok(CommandStatus::Success);
                }
                debug!(command = %input, "execute-extended-command");
                self.run_command_by_name(&input)
            }
            PromptAction::None => Ok(CommandStatus::Success),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::fs;
    use std::rc::Rc;

    use crate::buffer::Buffer;
    use crate::host::{Callback, TextDocument};
    use crate::input::special;
    use crate::parity::{ENABLED_MESSAGE, TOGGLE_COMMAND};

    fn editor_with(text: &str) -> EditorState {
        let mut editor = EditorState::new(&Config::default(), 24);
        *editor.workbench.current_buffer_mut() = Buffer::from_text("t", text);
        editor
    }

    fn type_str(editor: &mut EditorState, text: &str) {
        for ch in text.chars() {
            editor.handle_key(Key::char(ch));
        }
    }

    fn spans_on(editor: &EditorState, line: usize) -> usize {
        let bench = &editor.workbench;
        bench.current_buffer().line_spans(line, bench.decoration_styles()).len()
    }

    fn counter(count: &Rc<Cell<usize>>) -> Callback {
        let count = count.clone();
        Box::new(move |_| count.set(count.get() + 1))
    }

    #[test]
    fn test_startup_paints_while_inactive() {
        let mut editor = editor_with("1 2 x3");
        editor.activate_extensions().unwrap();

        assert_eq!(spans_on(&editor, 0), 2);
        assert!(!editor.highlighting_active());
    }

    #[test]
    fn test_first_toggle_repaints_and_reports_enabled() {
        let mut editor = editor_with("1 2");
        editor.activate_extensions().unwrap();
        assert_eq!(spans_on(&editor, 0), 2);

        assert_eq!(editor.handle_key(Key::function(5)), CommandStatus::Success);
        assert_eq!(spans_on(&editor, 0), 2);
        assert!(editor.highlighting_active());
        assert_eq!(editor.workbench.display.message(), Some(ENABLED_MESSAGE));

        // Edits repaint once active
        editor.handle_key(Key::ctrl('e'));
        type_str(&mut editor, " 3");
        assert_eq!(spans_on(&editor, 0), 3);

        editor.handle_key(Key::ctlc('h'));
        assert!(!editor.highlighting_active());
        assert_eq!(spans_on(&editor, 0), 0);
    }

    #[test]
    fn test_inactive_edits_do_not_repaint() {
        let mut editor = editor_with("1");
        editor.activate_extensions().unwrap();

        editor.handle_key(Key::ctrl('e'));
        type_str(&mut editor, " 2");
        assert_eq!(editor.workbench.current_buffer().text(), "1 2");
        assert_eq!(spans_on(&editor, 0), 1);
    }

    #[test]
    fn test_focus_change_repaints_when_active() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.txt");
        let b = dir.path().join("b.txt");
        fs::write(&a, "1").unwrap();
        fs::write(&b, "2").unwrap();

        let mut editor = EditorState::new(&Config::default(), 24);
        editor.open_file(&a).unwrap();
        editor.open_file(&b).unwrap();
        editor.activate_extensions().unwrap();
        editor.handle_key(Key::function(5));
        assert_eq!(spans_on(&editor, 0), 1);
        assert!(editor.highlighting_active());
        assert_eq!(editor.workbench.display.message(), Some(ENABLED_MESSAGE));

        // a.txt was never painted before it got focus
        editor.handle_key(Key::ctlx('p'));
        assert_eq!(editor.workbench.current_buffer().name(), "a.txt");
        assert_eq!(spans_on(&editor, 0), 1);
    }

    #[test]
    fn test_events_fire_only_on_real_changes() {
        let mut editor = editor_with("ab");
        let texts = Rc::new(Cell::new(0));
        let focuses = Rc::new(Cell::new(0));
        let _ = editor.registry.on_did_change_text_document(counter(&texts));
        let _ = editor.registry.on_did_change_active_text_editor(counter(&focuses));

        editor.handle_key(Key::ctrl('f'));
        editor.handle_key(Key::special(special::DOWN));
        editor.handle_key(Key::ctlx('n'));
        assert_eq!((texts.get(), focuses.get()), (0, 0));

        editor.handle_key(Key::char('c'));
        assert_eq!((texts.get(), focuses.get()), (1, 0));

        // Nothing to delete at the end of the buffer
        editor.handle_key(Key::ctrl('e'));
        assert_eq!(editor.handle_key(Key::ctrl('d')), CommandStatus::Failure);
        assert_eq!(texts.get(), 1);
    }

    #[test]
    fn test_switch_buffer_fires_focus_event() {
        let dir = tempfile::tempdir().unwrap();
        let mut editor = EditorState::new(&Config::default(), 24);
        editor.open_file(&dir.path().join("one")).unwrap();
        let focuses = Rc::new(Cell::new(0));
        let _ = editor.registry.on_did_change_active_text_editor(counter(&focuses));

        editor.handle_key(Key::ctlx('b'));
        assert_eq!(editor.workbench.display.message(), Some("Switch to buffer (default *scratch*): "));
        editor.handle_key(Key::ctrl('m'));

        assert_eq!(editor.workbench.current_index(), 0);
        assert_eq!(focuses.get(), 1);
    }

    #[test]
    fn test_mx_runs_addon_command() {
        let mut editor = editor_with("4");
        editor.activate_extensions().unwrap();

        editor.handle_key(Key::meta('x'));
        type_str(&mut editor, TOGGLE_COMMAND);
        assert_eq!(editor.handle_key(Key::ctrl('m')), CommandStatus::Success);

        assert!(editor.highlighting_active());
        assert_eq!(editor.workbench.display.message(), Some(ENABLED_MESSAGE));
    }

    #[test]
    fn test_mx_runs_builtin_command() {
        let mut editor = editor_with("");
        editor.handle_key(Key::meta('x'));
        type_str(&mut editor, "toggle-line-numbers");
        editor.handle_key(Key::ctrl('m'));
        assert!(editor.workbench.display.show_line_numbers);
    }

    #[test]
    fn test_mx_unknown_command_is_reported() {
        let mut editor = editor_with("");
        editor.handle_key(Key::meta('x'));
        type_str(&mut editor, "nope");

        assert_eq!(editor.handle_key(Key::ctrl('m')), CommandStatus::Failure);
        assert_eq!(editor.workbench.display.message(), Some("No such command: nope"));
        assert!(!editor.prompt.active);
    }

    #[test]
    fn test_mx_tab_completion() {
        let mut editor = editor_with("");
        editor.activate_extensions().unwrap();
        editor.handle_key(Key::meta('x'));

        type_str(&mut editor, "parity");
        editor.handle_key(Key::ctrl('i'));
        assert_eq!(editor.prompt.input, TOGGLE_COMMAND);

        editor.prompt.input = "toggle-".to_string();
        editor.handle_key(Key::ctrl('i'));
        assert_eq!(editor.prompt.input, "toggle-");

        editor.prompt.input = "zz".to_string();
        assert_eq!(editor.handle_key(Key::ctrl('i')), CommandStatus::Failure);
    }

    #[test]
    fn test_prompt_abort() {
        let mut editor = editor_with("");
        editor.handle_key(Key::ctlx_ctrl('f'));
        assert!(editor.prompt.active);

        assert_eq!(editor.handle_key(Key::ctrl('g')), CommandStatus::Abort);
        assert!(!editor.prompt.active);
        assert_eq!(editor.workbench.display.message(), Some("Quit"));
    }

    #[test]
    fn test_shutdown_disposes_addon() {
        let mut editor = editor_with("1");
        editor.activate_extensions().unwrap();
        editor.shutdown();

        assert!(!editor.registry.has_command(TOGGLE_COMMAND));
        assert_eq!(editor.registry.listener_count(), 0);
        assert_eq!(editor.handle_key(Key::function(5)), CommandStatus::Failure);
        assert_eq!(
            editor.workbench.display.message(),
            Some("No such command: paritylight.toggle")
        );
    }

    #[test]
    fn test_save_and_quit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let mut editor = EditorState::new(&Config::default(), 24);
        editor.open_file(&path).unwrap();

        type_str(&mut editor, "12");
        editor.handle_key(Key::ctlx_ctrl('s'));
        assert_eq!(fs::read_to_string(&path).unwrap(), "12");
        assert_eq!(editor.workbench.display.message(), Some("Wrote out.txt"));

        editor.handle_key(Key::ctlx_ctrl('c'));
        assert!(!editor.running);
    }

    #[test]
    fn test_unbound_key() {
        let mut editor = editor_with("");
        assert_eq!(editor.handle_key(Key::ctrl('z')), CommandStatus::Failure);
        assert_eq!(editor.workbench.display.message(), Some("Key not bound"));
    }
}
