use crate::app::App;
use crate::command::Command;
use crate::keybindings::KeybindingContext;
use crate::ui::colors::{FOOTER_BG, FOOTER_KEY_FG, STATUS_ERROR_FG, WHITE_COLOR};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Widget},
};

/// Commands hinted in the footer for each panel.
const HINTS: &[(Command, &str)] = &[
    (Command::Confirm, "run"),
    (Command::FocusNext, "panel"),
    (Command::ClearHistory, "clear"),
    (Command::CopyId, "copy id"),
    (Command::ToggleHelp, "help"),
    (Command::Quit, "quit"),
];

impl App {
    /// Key hints for the focused panel, most specific binding first.
    fn footer_hints(&self) -> Line<'static> {
        let focused = KeybindingContext::Focus(self.focus);
        let mut spans = vec![Span::raw(" ")];
        for (command, label) in HINTS {
            let key = self
                .keybindings
                .key_for(&focused, *command)
                .or_else(|| self.keybindings.key_for(&KeybindingContext::Global, *command));
            if let Some(key) = key {
                spans.push(Span::styled(key, Style::default().fg(FOOTER_KEY_FG)));
                spans.push(Span::raw(format!(" {}  ", label)));
            }
        }
        Line::from(spans)
    }

    pub(super) fn render_footer(&self, area: Rect, buf: &mut Buffer) {
        let count = self.lookup.history().len();
        let mut status = vec![Span::raw(format!("{} saved ", count))];
        if self.store.is_volatile() {
            status.insert(
                0,
                Span::styled("history not saved to disk ", Style::default().fg(STATUS_ERROR_FG)),
            );
        }

        Block::default()
            .title_bottom(self.footer_hints())
            .title_bottom(
                Line::from(status)
                    .right_aligned()
                    .style(Style::default().fg(WHITE_COLOR)),
            )
            .style(Style::default().bg(FOOTER_BG))
            .render(area, buf);
    }
}
