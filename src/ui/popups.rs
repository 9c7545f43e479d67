use crate::app::App;
use crate::help::render_help_popup;
use crate::ui::colors::{CONFIRM_BG, CONFIRM_FG, MESSAGE_BORDER, MESSAGE_ERROR_FG, MESSAGE_INFO_FG};
use ratatui::widgets::{BorderType, Padding};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};

/// Calculates a centered popup area within the given rect.
///
/// The popup will be centered with at least 2 characters margin on all sides.
pub fn popup_area(area: Rect, width: u16, height: u16) -> Rect {
    let min_margin = 2;

    let max_width = area.width.saturating_sub(2 * min_margin);
    let max_height = area.height.saturating_sub(2 * min_margin);

    let popup_width = width.min(max_width);
    let popup_height = height.min(max_height);

    let x = area.x + (area.width.saturating_sub(popup_width)) / 2;
    let y = area.y + (area.height.saturating_sub(popup_height)) / 2;

    Rect {
        x,
        y,
        width: popup_width,
        height: popup_height,
    }
}

impl App {
    /// Renders a centered popup that adapts to content size.
    fn render_popup(
        &self,
        message: &str,
        title: &str,
        title_color: Color,
        area: Rect,
        buf: &mut Buffer,
    ) {
        let lines: Vec<&str> = message.split('\n').collect();
        let max_line_width = lines.iter().map(|line| line.chars().count()).max().unwrap_or(0);

        let popup_width = (max_line_width as u16 + 6).min(area.width.saturating_sub(4));
        let popup_height = (lines.len() as u16 + 4).min(area.height.saturating_sub(4));
        let popup_area = popup_area(area, popup_width, popup_height);

        Clear.render(popup_area, buf);

        let border_color = if title == "Error" {
            MESSAGE_ERROR_FG
        } else {
            MESSAGE_BORDER
        };

        let block = Block::default()
            .title(format!(" {} ", title))
            .title_style(Style::default().fg(title_color))
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border_color))
            .padding(Padding::uniform(1));

        Paragraph::new(message)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(popup_area, buf);
    }

    /// Renders a centered message popup that adapts to content size.
    pub(super) fn render_message_popup(&self, message: &str, area: Rect, buf: &mut Buffer) {
        self.render_popup(message, "Message", MESSAGE_INFO_FG, area, buf);
    }

    /// Renders a centered error popup that adapts to content size.
    pub(super) fn render_error_popup(&self, error_msg: &str, area: Rect, buf: &mut Buffer) {
        self.render_popup(error_msg, "Error", MESSAGE_ERROR_FG, area, buf);
    }

    pub(super) fn render_help(&self, area: Rect, buf: &mut Buffer) {
        render_help_popup(&self.keybindings, area, buf);
    }

    /// Asks before wiping the stored history.
    pub(super) fn render_confirm_clear_popup(&self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);

        let count = self.lookup.history().len();
        let text = vec![
            Line::from(format!("Remove all {} saved requests?", count)),
            Line::from(""),
            Line::from(vec![
                Span::styled(
                    " y ",
                    Style::default().fg(CONFIRM_FG).bg(CONFIRM_BG).add_modifier(Modifier::BOLD),
                ),
                Span::raw(" clear   "),
                Span::styled(
                    " n ",
                    Style::default().fg(CONFIRM_FG).bg(CONFIRM_BG).add_modifier(Modifier::BOLD),
                ),
                Span::raw(" keep"),
            ]),
        ];

        let block = Block::default()
            .title(" Clear History ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(MESSAGE_ERROR_FG))
            .padding(Padding::horizontal(1));

        Paragraph::new(text)
            .block(block)
            .alignment(Alignment::Center)
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_popup_area_is_centered() {
        let area = Rect::new(0, 0, 100, 40);
        assert_eq!(popup_area(area, 40, 10), Rect::new(30, 15, 40, 10));
    }

    #[test]
    fn test_popup_area_keeps_margin() {
        let area = Rect::new(0, 0, 30, 10);
        let popup = popup_area(area, 60, 44);
        assert_eq!(popup.width, 26);
        assert_eq!(popup.height, 6);
        assert_eq!((popup.x, popup.y), (2, 2));
    }
}
