use crate::app::{Focus, Overlay};
use crate::command::Command;
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tui_input::InputRequest;

/// Represents the context for a keybinding.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeybindingContext {
    Global,
    Focus(Focus),
    Overlay(Overlay),
}

impl KeybindingContext {
    pub fn title(&self) -> &'static str {
        match self {
            KeybindingContext::Global => "Global",
            KeybindingContext::Focus(Focus::Form) => "New Request",
            KeybindingContext::Focus(Focus::Lookup) => "Look Up",
            KeybindingContext::Focus(Focus::History) => "History",
            KeybindingContext::Overlay(Overlay::ConfirmClear) => "Clear History",
            KeybindingContext::Overlay(_) => "Popup",
        }
    }
}

type KeyBindingKey = (KeybindingContext, KeyCode, KeyModifiers);

/// Registry of all keybindings mapped to commands.
#[derive(Debug, Default)]
pub struct KeybindingRegistry {
    bindings: Vec<(KeyBindingKey, Command)>,
}

impl KeybindingRegistry {
    /// Creates a new keybinding registry with all default bindings.
    pub fn new() -> Self {
        let mut registry = Self { bindings: Vec::new() };

        registry.register_global_bindings();
        registry.register_form_bindings();
        registry.register_lookup_bindings();
        registry.register_history_bindings();
        registry.register_confirm_clear_bindings();
        registry.register_popup_bindings(Overlay::Help);
        registry.register_popup_bindings(Overlay::Message(String::new()));
        registry.register_popup_bindings(Overlay::Error(String::new()));

        registry
    }

    fn find_cmd(
        bindings: &[(KeyBindingKey, Command)],
        expected_context: &KeybindingContext,
        key_event: KeyEvent,
    ) -> Option<Command> {
        bindings
            .iter()
            .find(|((context, kcode, kmod), _)| {
                context == expected_context
                    && *kcode == key_event.code
                    && *kmod == key_event.modifiers
            })
            .map(|(_, cmd)| *cmd)
    }

    /// Resolves a key press. Overlays capture all keys, otherwise the focused panel
    /// is checked before the global bindings.
    pub fn lookup(
        &self,
        focus: Focus,
        overlay: &Option<Overlay>,
        key_event: KeyEvent,
    ) -> Option<Command> {
        if let Some(ov) = overlay {
            let context = KeybindingContext::Overlay(self.get_overlay_type(ov));
            return Self::find_cmd(&self.bindings, &context, key_event);
        }

        Self::find_cmd(&self.bindings, &KeybindingContext::Focus(focus), key_event)
            .or_else(|| Self::find_cmd(&self.bindings, &KeybindingContext::Global, key_event))
    }

    // Replace the string with empty one to be able to match on the enum value
    fn get_overlay_type(&self, overlay: &Overlay) -> Overlay {
        match overlay {
            Overlay::Message(_) => Overlay::Message(String::new()),
            Overlay::Error(_) => Overlay::Error(String::new()),
            other => other.clone(),
        }
    }

    /// Returns all keybindings for a specific context in registration order.
    pub fn get_keybindings_for_context(
        &self,
        target_context: &KeybindingContext,
    ) -> Vec<(String, Command)> {
        self.bindings
            .iter()
            .filter(|((context, _, _), _)| context == target_context)
            .map(|((_, keycode, modifiers), cmd)| (Self::format_key(*keycode, *modifiers), *cmd))
            .collect()
    }

    /// Formats the first key bound to `command` in `context`, used for footer hints.
    pub fn key_for(&self, context: &KeybindingContext, command: Command) -> Option<String> {
        self.bindings
            .iter()
            .find(|((c, _, _), cmd)| c == context && *cmd == command)
            .map(|((_, keycode, modifiers), _)| Self::format_key(*keycode, *modifiers))
    }

    fn format_key(keycode: KeyCode, modifiers: KeyModifiers) -> String {
        let key_str = match keycode {
            KeyCode::Char(' ') => "Space".to_string(),
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Up => "Up".to_string(),
            KeyCode::Down => "Down".to_string(),
            KeyCode::Left => "Left".to_string(),
            KeyCode::Right => "Right".to_string(),
            KeyCode::PageUp => "PageUp".to_string(),
            KeyCode::PageDown => "PageDown".to_string(),
            KeyCode::Home => "Home".to_string(),
            KeyCode::End => "End".to_string(),
            KeyCode::Enter => "Enter".to_string(),
            KeyCode::Esc => "Esc".to_string(),
            KeyCode::Backspace => "Backspace".to_string(),
            KeyCode::Delete => "Delete".to_string(),
            KeyCode::Tab => "Tab".to_string(),
            KeyCode::BackTab => "Shift+Tab".to_string(),
            KeyCode::F(n) => format!("F{}", n),
            _ => format!("{:?}", keycode),
        };

        if modifiers.contains(KeyModifiers::CONTROL) {
            format!("Ctrl+{}", key_str)
        } else if modifiers.contains(KeyModifiers::SHIFT) {
            match keycode {
                KeyCode::Char(c) => c.to_uppercase().to_string(),
                KeyCode::BackTab => key_str,
                _ => format!("Shift+{}", key_str),
            }
        } else if modifiers.contains(KeyModifiers::ALT) {
            format!("Alt+{}", key_str)
        } else if modifiers.is_empty() {
            key_str
        } else {
            format!("{:?}+{}", modifiers, key_str)
        }
    }

    /// Helper to register a single keybinding.
    fn bind(
        &mut self,
        context: KeybindingContext,
        keycode: KeyCode,
        modifiers: KeyModifiers,
        command: Command,
    ) {
        self.bindings.push(((context, keycode, modifiers), command));
    }

    /// Helper to register a keybinding without modifiers.
    fn bind_simple(&mut self, context: KeybindingContext, keycode: KeyCode, command: Command) {
        self.bind(context, keycode, KeyModifiers::empty(), command);
    }

    /// Helper to register a keybinding with SHIFT modifier.
    fn bind_shift(&mut self, context: KeybindingContext, c: char, command: Command) {
        self.bind(context, KeyCode::Char(c), KeyModifiers::SHIFT, command);
    }

    /// Registers keybindings that work in every panel when no popup is open.
    fn register_global_bindings(&mut self) {
        let context = KeybindingContext::Global;

        self.bind(context.clone(), KeyCode::Char('c'), KeyModifiers::CONTROL, Command::Quit);
        self.bind_simple(context.clone(), KeyCode::F(1), Command::ToggleHelp);
        self.bind_simple(context.clone(), KeyCode::Tab, Command::FocusNext);
        self.bind(context.clone(), KeyCode::BackTab, KeyModifiers::SHIFT, Command::FocusPrevious);
        self.bind_simple(context.clone(), KeyCode::Enter, Command::Confirm);
        self.bind_simple(context.clone(), KeyCode::Esc, Command::Cancel);
        self.bind(context, KeyCode::Char('y'), KeyModifiers::CONTROL, Command::CopyId);
    }

    fn register_form_bindings(&mut self) {
        let context = KeybindingContext::Focus(Focus::Form);

        self.bind_simple(context.clone(), KeyCode::Down, Command::NextField);
        self.bind_simple(context.clone(), KeyCode::Up, Command::PreviousField);
        self.bind_simple(context.clone(), KeyCode::PageUp, Command::PreviousDay);
        self.bind_simple(context.clone(), KeyCode::PageDown, Command::NextDay);
        self.bind(context, KeyCode::Char('t'), KeyModifiers::CONTROL, Command::DateToday);
    }

    fn register_lookup_bindings(&mut self) {
        let context = KeybindingContext::Focus(Focus::Lookup);

        self.bind_simple(context.clone(), KeyCode::Up, Command::RecallOlderId);
        self.bind_simple(context, KeyCode::Down, Command::RecallNewerId);
    }

    fn register_history_bindings(&mut self) {
        let context = KeybindingContext::Focus(Focus::History);

        self.bind_simple(context.clone(), KeyCode::Char('q'), Command::Quit);
        self.bind_simple(context.clone(), KeyCode::Char('?'), Command::ToggleHelp);
        self.bind_simple(context.clone(), KeyCode::Up, Command::MoveUp);
        self.bind_simple(context.clone(), KeyCode::Down, Command::MoveDown);
        self.bind_simple(context.clone(), KeyCode::Char('k'), Command::MoveUp);
        self.bind_simple(context.clone(), KeyCode::Char('j'), Command::MoveDown);
        self.bind_simple(context.clone(), KeyCode::Char('g'), Command::GotoTop);
        self.bind_shift(context.clone(), 'G', Command::GotoBottom);
        self.bind_simple(context.clone(), KeyCode::Char('y'), Command::CopyId);
        self.bind_simple(context, KeyCode::Char('c'), Command::ClearHistory);
    }

    fn register_confirm_clear_bindings(&mut self) {
        let context = KeybindingContext::Overlay(Overlay::ConfirmClear);

        self.bind_simple(context.clone(), KeyCode::Char('y'), Command::ConfirmClearHistory);
        self.bind_simple(context.clone(), KeyCode::Char('n'), Command::Cancel);
        self.bind_simple(context.clone(), KeyCode::Esc, Command::Cancel);
        self.bind(context, KeyCode::Char('c'), KeyModifiers::CONTROL, Command::Quit);
    }

    fn register_popup_bindings(&mut self, overlay: Overlay) {
        let context = KeybindingContext::Overlay(overlay);

        self.bind_simple(context.clone(), KeyCode::Esc, Command::Cancel);
        self.bind_simple(context.clone(), KeyCode::Enter, Command::Cancel);
        self.bind_simple(context.clone(), KeyCode::Char('q'), Command::Cancel);
        self.bind_simple(context.clone(), KeyCode::F(1), Command::ToggleHelp);
        self.bind(context, KeyCode::Char('c'), KeyModifiers::CONTROL, Command::Quit);
    }
}

/// Maps a key that no binding claimed to an edit of the focused text input.
pub fn text_edit_request(key_event: KeyEvent) -> Option<InputRequest> {
    let ctrl = key_event.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key_event.modifiers.contains(KeyModifiers::ALT);

    let request = match key_event.code {
        KeyCode::Char(c) if !ctrl && !alt => InputRequest::InsertChar(c),
        KeyCode::Char('w') if ctrl => InputRequest::DeletePrevWord,
        KeyCode::Char('u') if ctrl => InputRequest::DeleteLine,
        KeyCode::Char('k') if ctrl => InputRequest::DeleteTillEnd,
        KeyCode::Char('a') if ctrl => InputRequest::GoToStart,
        KeyCode::Char('e') if ctrl => InputRequest::GoToEnd,
        KeyCode::Backspace if ctrl || alt => InputRequest::DeletePrevWord,
        KeyCode::Backspace => InputRequest::DeletePrevChar,
        KeyCode::Delete if ctrl || alt => InputRequest::DeleteNextWord,
        KeyCode::Delete => InputRequest::DeleteNextChar,
        KeyCode::Left if ctrl || alt => InputRequest::GoToPrevWord,
        KeyCode::Left => InputRequest::GoToPrevChar,
        KeyCode::Right if ctrl || alt => InputRequest::GoToNextWord,
        KeyCode::Right => InputRequest::GoToNextChar,
        KeyCode::Home => InputRequest::GoToStart,
        KeyCode::End => InputRequest::GoToEnd,
        _ => return None,
    };
    Some(request)
}
