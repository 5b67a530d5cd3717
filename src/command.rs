//! Command dispatch system

use std::collections::HashMap;

use crate::editor::{EditorState, PromptAction};
use crate::error::Result;
use crate::input::{special, Key};

/// Command result status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    Success,
    Failure,
    Abort,
}

/// Command function signature
pub type CommandFn = fn(&mut EditorState) -> Result<CommandStatus>;

/// A named command
pub struct Command {
    pub name: &'static str,
    pub function: CommandFn,
}

/// Key binding entry with command function and name
struct BindingEntry {
    function: CommandFn,
    name: &'static str,
}

/// Key binding table
pub struct KeyTable {
    bindings: HashMap<u32, BindingEntry>,
}

impl KeyTable {
    /// Create an empty key table
    pub fn new() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// Create key table with default bindings
    pub fn with_defaults() -> Self {
        let mut table = Self::new();
        table.setup_defaults();
        table
    }

    /// Add a key binding with command name
    pub fn bind_named(&mut self, key: Key, cmd: CommandFn, name: &'static str) {
        self.bindings.insert(key.code(), BindingEntry { function: cmd, name });
    }

    /// Look up a command for a key
    pub fn lookup(&self, key: Key) -> Option<CommandFn> {
        self.bindings.get(&key.code()).map(|e| e.function)
    }

    /// Look up a command name for a key
    pub fn lookup_name(&self, key: Key) -> Option<&'static str> {
        self.bindings.get(&key.code()).map(|e| e.name)
    }

    fn setup_defaults(&mut self) {
        use commands::*;

        // Basic cursor movement
        self.bind_named(Key::ctrl('f'), forward_char, "forward-char");
        self.bind_named(Key::ctrl('b'), backward_char, "backward-char");
        self.bind_named(Key::ctrl('n'), next_line, "next-line");
        self.bind_named(Key::ctrl('p'), previous_line, "previous-line");
        self.bind_named(Key::ctrl('a'), beginning_of_line, "beginning-of-line");
        self.bind_named(Key::ctrl('e'), end_of_line, "end-of-line");
        self.bind_named(Key::ctrl('v'), scroll_down, "scroll-down");
        self.bind_named(Key::meta('v'), scroll_up, "scroll-up");

        // Arrow keys (special keys)
        self.bind_named(Key::special(special::RIGHT), forward_char, "forward-char");
        self.bind_named(Key::special(special::LEFT), backward_char, "backward-char");
        self.bind_named(Key::special(special::DOWN), next_line, "next-line");
        self.bind_named(Key::special(special::UP), previous_line, "previous-line");
        self.bind_named(Key::special(special::HOME), beginning_of_line, "beginning-of-line");
        self.bind_named(Key::special(special::END), end_of_line, "end-of-line");
        self.bind_named(Key::special(special::PAGE_DOWN), scroll_down, "scroll-down");
        self.bind_named(Key::special(special::PAGE_UP), scroll_up, "scroll-up");

        // Editing
        self.bind_named(Key::ctrl('m'), newline, "newline");
        self.bind_named(Key::ctrl('d'), delete_char_forward, "delete-char");
        self.bind_named(Key::special(special::DELETE), delete_char_forward, "delete-char");
        self.bind_named(Key(0x7f), delete_char_backward, "delete-backward-char");
        self.bind_named(Key::ctrl('h'), delete_char_backward, "delete-backward-char");
        self.bind_named(Key::ctrl('k'), kill_line, "kill-line");

        // Files and buffers
        self.bind_named(Key::ctlx_ctrl('s'), save_buffer, "save-buffer");
        self.bind_named(Key::ctlx_ctrl('f'), find_file, "find-file");
        self.bind_named(Key::ctlx('b'), switch_buffer, "switch-to-buffer");
        self.bind_named(Key::ctlx('n'), next_buffer, "next-buffer");
        self.bind_named(Key::ctlx('p'), previous_buffer, "previous-buffer");

        // Parity highlighting
        self.bind_named(Key::function(5), toggle_parity_highlighting, "toggle-parity-highlighting");
        self.bind_named(Key::ctlc('h'), toggle_parity_highlighting, "toggle-parity-highlighting");

        // Misc
        self.bind_named(Key::meta('x'), execute_extended_command, "execute-extended-command");
        self.bind_named(Key::ctlx('#'), toggle_line_numbers, "toggle-line-numbers");
        self.bind_named(Key::ctrl('l'), redraw_display, "redraw-display");
        self.bind_named(Key::ctrl('g'), abort, "keyboard-quit");
        self.bind_named(Key::ctlx_ctrl('c'), quit, "save-buffers-kill-emacs");
    }
}

impl Default for KeyTable {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Every built-in command, by the name `M-x` accepts
pub const COMMANDS: &[Command] = &[
    Command { name: "forward-char", function: commands::forward_char },
    Command { name: "backward-char", function: commands::backward_char },
    Command { name: "next-line", function: commands::next_line },
    Command { name: "previous-line", function: commands::previous_line },
    Command { name: "beginning-of-line", function: commands::beginning_of_line },
    Command { name: "end-of-line", function: commands::end_of_line },
    Command { name: "scroll-down", function: commands::scroll_down },
    Command { name: "scroll-up", function: commands::scroll_up },
    Command { name: "newline", function: commands::newline },
    Command { name: "delete-char", function: commands::delete_char_forward },
    Command { name: "delete-backward-char", function: commands::delete_char_backward },
    Command { name: "kill-line", function: commands::kill_line },
    Command { name: "save-buffer", function: commands::save_buffer },
    Command { name: "find-file", function: commands::find_file },
    Command { name: "switch-to-buffer", function: commands::switch_buffer },
    Command { name: "next-buffer", function: commands::next_buffer },
    Command { name: "previous-buffer", function: commands::previous_buffer },
    Command { name: "toggle-parity-highlighting", function: commands::toggle_parity_highlighting },
    Command { name: "execute-extended-command", function: commands::execute_extended_command },
    Command { name: "toggle-line-numbers", function: commands::toggle_line_numbers },
    Command { name: "redraw-display", function: commands::redraw_display },
    Command { name: "keyboard-quit", function: commands::abort },
    Command { name: "save-buffers-kill-emacs", function: commands::quit },
];

/// Find a built-in command by name
pub fn find_command(name: &str) -> Option<CommandFn> {
    COMMANDS.iter().find(|c| c.name == name).map(|c| c.function)
}

/// Built-in command names, sorted
pub fn command_names() -> Vec<&'static str> {
    let mut names: Vec<_> = COMMANDS.iter().map(|c| c.name).collect();
    names.sort_unstable();
    names
}

/// Commands module - actual command implementations
pub mod commands {
    use super::*;
    use crate::parity::TOGGLE_COMMAND;

    /// Move cursor forward one character
    pub fn forward_char(editor: &mut EditorState) -> Result<CommandStatus> {
        editor.workbench.move_right();
        Ok(CommandStatus::Success)
    }

    /// Move cursor backward one character
    pub fn backward_char(editor: &mut EditorState) -> Result<CommandStatus> {
        editor.workbench.move_left();
        Ok(CommandStatus::Success)
    }

    pub fn next_line(editor: &mut EditorState) -> Result<CommandStatus> {
        editor.workbench.move_down(1);
        Ok(CommandStatus::Success)
    }

    pub fn previous_line(editor: &mut EditorState) -> Result<CommandStatus> {
        editor.workbench.move_up(1);
        Ok(CommandStatus::Success)
    }

    pub fn beginning_of_line(editor: &mut EditorState) -> Result<CommandStatus> {
        editor.workbench.move_to_bol();
        Ok(CommandStatus::Success)
    }

    pub fn end_of_line(editor: &mut EditorState) -> Result<CommandStatus> {
        editor.workbench.move_to_eol();
        Ok(CommandStatus::Success)
    }

    /// Scroll down (forward) one page
    pub fn scroll_down(editor: &mut EditorState) -> Result<CommandStatus> {
        let page = editor.workbench.page_size();
        editor.workbench.move_down(page);
        Ok(CommandStatus::Success)
    }

    /// Scroll up (backward) one page
    pub fn scroll_up(editor: &mut EditorState) -> Result<CommandStatus> {
        let page = editor.workbench.page_size();
        editor.workbench.move_up(page);
        Ok(CommandStatus::Success)
    }

    pub fn newline(editor: &mut EditorState) -> Result<CommandStatus> {
        editor.workbench.newline();
        Ok(CommandStatus::Success)
    }

    /// Delete character at cursor (forward)
    pub fn delete_char_forward(editor: &mut EditorState) -> Result<CommandStatus> {
        Ok(status(editor.workbench.delete_forward()))
    }

    /// Delete character before cursor
    pub fn delete_char_backward(editor: &mut EditorState) -> Result<CommandStatus> {
        Ok(status(editor.workbench.delete_backward()))
    }

    /// Kill to end of line, or the line break when already there
    pub fn kill_line(editor: &mut EditorState) -> Result<CommandStatus> {
        Ok(status(editor.workbench.kill_line()))
    }

    pub fn save_buffer(editor: &mut EditorState) -> Result<CommandStatus> {
        if !editor.workbench.current_buffer().is_modified() {
            editor.workbench.display.set_message("(No changes need to be saved)");
            return Ok(CommandStatus::Success);
        }
        editor.workbench.save_current()?;
        Ok(CommandStatus::Success)
    }

    /// Find file (open or create)
    pub fn find_file(editor: &mut EditorState) -> Result<CommandStatus> {
        editor.start_prompt("Find file", PromptAction::FindFile, None);
        Ok(CommandStatus::Success)
    }

    /// Switch to buffer, defaulting to the first one not shown
    pub fn switch_buffer(editor: &mut EditorState) -> Result<CommandStatus> {
        let current = editor.workbench.current_index();
        let default = editor
            .workbench
            .buffer_names()
            .into_iter()
            .enumerate()
            .find(|(i, _)| *i != current)
            .map(|(_, name)| name.to_string());
        editor.start_prompt("Switch to buffer", PromptAction::SwitchBuffer, default);
        Ok(CommandStatus::Success)
    }

    pub fn next_buffer(editor: &mut EditorState) -> Result<CommandStatus> {
        if editor.workbench.buffer_count() <= 1 {
            editor.workbench.display.set_message("Only one buffer");
            return Ok(CommandStatus::Success);
        }
        editor.workbench.next_buffer();
        announce_buffer(editor);
        Ok(CommandStatus::Success)
    }

    pub fn previous_buffer(editor: &mut EditorState) -> Result<CommandStatus> {
        if editor.workbench.buffer_count() <= 1 {
            editor.workbench.display.set_message("Only one buffer");
            return Ok(CommandStatus::Success);
        }
        editor.workbench.previous_buffer();
        announce_buffer(editor);
        Ok(CommandStatus::Success)
    }

    /// Run the add-on's toggle command (F5, C-c h)
    pub fn toggle_parity_highlighting(editor: &mut EditorState) -> Result<CommandStatus> {
        editor.registry.execute_command(TOGGLE_COMMAND, &mut editor.workbench)?;
        Ok(CommandStatus::Success)
    }

    /// Read a command name and run it (M-x)
    pub fn execute_extended_command(editor: &mut EditorState) -> Result<CommandStatus> {
        editor.start_prompt("M-x", PromptAction::ExecuteCommand, None);
        Ok(CommandStatus::Success)
    }

    pub fn toggle_line_numbers(editor: &mut EditorState) -> Result<CommandStatus> {
        editor.workbench.display.toggle_line_numbers();
        Ok(CommandStatus::Success)
    }

    /// Recenter display with cursor line in middle of window (C-l)
    pub fn redraw_display(editor: &mut EditorState) -> Result<CommandStatus> {
        editor.workbench.window.recenter();
        editor.workbench.display.force_redraw();
        Ok(CommandStatus::Success)
    }

    /// Abort current operation
    pub fn abort(_editor: &mut EditorState) -> Result<CommandStatus> {
        Ok(CommandStatus::Abort)
    }

    pub fn quit(editor: &mut EditorState) -> Result<CommandStatus> {
        editor.quit();
        Ok(CommandStatus::Success)
    }

    fn status(done: bool) -> CommandStatus {
        if done {
            CommandStatus::Success
        } else {
            CommandStatus::Failure
        }
    }

    fn announce_buffer(editor: &mut EditorState) {
        let name = editor.workbench.current_buffer().name().to_string();
        editor.workbench.display.set_message(format!("Buffer: {}", name));
    }
}
