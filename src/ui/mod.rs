pub mod colors;
mod footer;
mod form;
mod history;
mod lookup;
mod popups;

use crate::app::{App, Overlay};
use colors::{
    GRAY_COLOR, INPUT_FOCUSED_BORDER, PANEL_BORDER, PANEL_FOCUSED_BORDER, PLACEHOLDER_FG,
    WHITE_COLOR,
};
use history::HISTORY_PANEL_HEIGHT;
pub use popups::popup_area;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Position, Rect},
    style::Style,
    text::Line,
    widgets::{Block, BorderType, Borders, Paragraph, Widget},
};
use tui_input::Input;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [top, middle, bottom] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(area);

        let [panels_area, history_area] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(HISTORY_PANEL_HEIGHT),
        ])
        .areas(middle);
        let [form_area, lookup_area] =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                .areas(panels_area);

        // Title
        let title_middle = Line::from(" Lazyweather ").centered();
        let title_right = Line::from(format!("v{}", env!("CARGO_PKG_VERSION")))
            .right_aligned()
            .style(Style::default().fg(WHITE_COLOR));
        let title = Block::default()
            .title_bottom(title_middle)
            .title_bottom(title_right)
            .style(Style::default().bg(GRAY_COLOR));
        title.render(top, buf);

        // Panels
        self.render_form(form_area, buf);
        self.render_lookup(lookup_area, buf);
        self.render_history(history_area, buf);

        // Footer
        self.render_footer(bottom, buf);

        // Overlays
        if let Some(ref overlay) = self.overlay {
            self.cursor.set(None);
            let overlay_area = overlay.popup_size().map(|(w, h)| popup_area(area, w, h));

            match (overlay, overlay_area) {
                (Overlay::Help, Some(popup)) => self.render_help(popup, buf),
                (Overlay::ConfirmClear, Some(popup)) => self.render_confirm_clear_popup(popup, buf),
                (Overlay::Message(message), _) => self.render_message_popup(message, area, buf),
                (Overlay::Error(error_msg), _) => self.render_error_popup(error_msg, area, buf),
                _ => {}
            }
        }
    }
}

impl App {
    fn panel_block<'a>(&self, title: &'a str, focused: bool) -> Block<'a> {
        let border = if focused { PANEL_FOCUSED_BORDER } else { PANEL_BORDER };
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border))
    }

    /// Renders a single line text input. A focused input places the terminal cursor.
    fn render_input(
        &self,
        input: &Input,
        title: &str,
        placeholder: &str,
        focused: bool,
        area: Rect,
        buf: &mut Buffer,
    ) {
        let border = if focused { INPUT_FOCUSED_BORDER } else { PANEL_BORDER };
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border));

        let width = block.inner(area).width.max(1) as usize;
        let scroll = input.visual_scroll(width.saturating_sub(1));

        let paragraph = if input.value().is_empty() {
            Paragraph::new(placeholder).style(Style::default().fg(PLACEHOLDER_FG))
        } else {
            Paragraph::new(input.value()).scroll((0, scroll as u16))
        };
        paragraph.block(block).render(area, buf);

        if focused {
            let x = input.visual_cursor().saturating_sub(scroll) as u16;
            self.cursor.set(Some(Position::new(area.x + 1 + x, area.y + 1)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{api::ApiClient, event::EventHandler, slot::MemorySlot, store::HistoryStore};
    use std::time::Duration;

    fn render_to_text(app: &App, area: Rect) -> String {
        let mut buf = Buffer::empty(area);
        app.render(area, &mut buf);
        (0..area.height)
            .map(|y| (0..area.width).map(|x| buf[(x, y)].symbol().to_string()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn test_app() -> App {
        let api = ApiClient::new("http://localhost:8000", Duration::from_secs(1)).unwrap();
        App::with_events(HistoryStore::new(MemorySlot::new()), api, EventHandler::detached())
    }

    #[test]
    fn test_renders_all_panels() {
        let app = test_app();

        let text = render_to_text(&app, Rect::new(0, 0, 120, 36));

        assert!(text.contains("Lazyweather"));
        assert!(text.contains("New Weather Request"));
        assert!(text.contains("Look Up Weather Data"));
        assert!(text.contains("Recently Submitted Requests (0/10)"));
        assert!(text.contains("No requests submitted yet."));
        assert!(app.cursor.get().is_some());
    }

    #[test]
    fn test_overlay_hides_cursor() {
        let mut app = test_app();
        app.overlay = Some(Overlay::Help);

        let text = render_to_text(&app, Rect::new(0, 0, 120, 50));

        assert!(text.contains("Help"));
        assert!(app.cursor.get().is_none());
    }
}
