use crate::app::{App, Focus};
use crate::form::format_date_for_display;
use crate::history::{HISTORY_CAPACITY, HistoryItem};
use crate::ui::colors::{
    HISTORY_DATE_FG, HISTORY_HIGHLIGHT_BG, HISTORY_LOCATION_FG, HISTORY_NOTES_FG, PLACEHOLDER_FG,
    RIGHT_ARROW,
};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph, StatefulWidget, Widget},
};

/// Height of the history panel: one row per entry plus borders.
pub(super) const HISTORY_PANEL_HEIGHT: u16 = HISTORY_CAPACITY as u16 + 2;

fn history_line(item: &HistoryItem) -> Line<'static> {
    let notes = match item.notes.as_deref() {
        Some(notes) => notes.to_string(),
        None => "No notes".to_string(),
    };
    Line::from(vec![
        Span::styled(format_date_for_display(item.date), Style::default().fg(HISTORY_DATE_FG)),
        Span::raw(" — "),
        Span::styled(item.location.clone(), Style::default().fg(HISTORY_LOCATION_FG)),
        Span::raw(": "),
        Span::styled(notes, Style::default().fg(HISTORY_NOTES_FG)),
    ])
}

impl App {
    pub(super) fn render_history(&self, area: Rect, buf: &mut Buffer) {
        let focused = self.focus == Focus::History;
        let history = self.lookup.history();
        let title = format!(
            " Recently Submitted Requests ({}/{}) ",
            history.len(),
            HISTORY_CAPACITY
        );
        let block = self.panel_block(&title, focused);

        if history.is_empty() {
            let placeholder =
                Line::from("No requests submitted yet.").style(Style::default().fg(PLACEHOLDER_FG));
            Paragraph::new(placeholder)
                .block(block)
                .render(area, buf);
            return;
        }

        let items: Vec<ListItem> = history
            .iter()
            .map(|item| ListItem::new(history_line(item)))
            .collect();
        let list = List::new(items)
            .block(block)
            .highlight_symbol(RIGHT_ARROW)
            .highlight_style(if focused {
                Style::default().bg(HISTORY_HIGHLIGHT_BG).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            });

        let mut state = ListState::default().with_selected(Some(self.lookup.selected()));
        StatefulWidget::render(list, area, buf, &mut state);
    }
}
