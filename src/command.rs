use crate::app::App;
use color_eyre::Result;

/// Represents actions that can be performed in the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    // Application Control
    Quit,
    ToggleHelp,
    Cancel,
    Confirm,
    FocusNext,
    FocusPrevious,
    CopyId,

    // Form
    NextField,
    PreviousField,
    PreviousDay,
    NextDay,
    DateToday,

    // Lookup
    RecallOlderId,
    RecallNewerId,

    // History
    MoveUp,
    MoveDown,
    GotoTop,
    GotoBottom,
    ClearHistory,
    ConfirmClearHistory,
}

impl Command {
    /// Returns a human-readable description of this command.
    pub fn description(&self) -> &'static str {
        match self {
            // Application Control
            Command::Quit => "Quit",
            Command::ToggleHelp => "Toggle help",
            Command::Cancel => "Cancel/Close",
            Command::Confirm => "Submit/Look up/View",
            Command::FocusNext => "Next panel",
            Command::FocusPrevious => "Previous panel",
            Command::CopyId => "Copy request id to clipboard",

            // Form
            Command::NextField => "Next field",
            Command::PreviousField => "Previous field",
            Command::PreviousDay => "Date: previous day",
            Command::NextDay => "Date: next day",
            Command::DateToday => "Date: today",

            // Lookup
            Command::RecallOlderId => "Older id from history",
            Command::RecallNewerId => "Newer id from history",

            // History
            Command::MoveUp => "Move up",
            Command::MoveDown => "Move down",
            Command::GotoTop => "Go to newest",
            Command::GotoBottom => "Go to oldest",
            Command::ClearHistory => "Clear history",
            Command::ConfirmClearHistory => "Yes, clear history",
        }
    }

    /// Executes this command on the given application.
    pub fn execute(&self, app: &mut App) -> Result<()> {
        match self {
            // Application Control
            Command::Quit => app.quit(),
            Command::ToggleHelp => app.toggle_help(),
            Command::Cancel => app.cancel(),
            Command::Confirm => app.confirm(),
            Command::FocusNext => app.focus_next(),
            Command::FocusPrevious => app.focus_previous(),
            Command::CopyId => app.copy_id(),

            // Form
            Command::NextField => app.form.focus_next(),
            Command::PreviousField => app.form.focus_previous(),
            Command::PreviousDay => app.shift_date(-1),
            Command::NextDay => app.shift_date(1),
            Command::DateToday => app.reset_date(),

            // Lookup
            Command::RecallOlderId => app.lookup.recall_older(),
            Command::RecallNewerId => app.lookup.recall_newer(),

            // History
            Command::MoveUp => app.lookup.select_previous(),
            Command::MoveDown => app.lookup.select_next(),
            Command::GotoTop => app.lookup.select_first(),
            Command::GotoBottom => app.lookup.select_last(),
            Command::ClearHistory => app.ask_clear_history(),
            Command::ConfirmClearHistory => app.clear_history(),
        }
        Ok(())
    }
}
