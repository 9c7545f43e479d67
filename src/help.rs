use crate::app::{Focus, Overlay};
use crate::keybindings::{KeybindingContext, KeybindingRegistry};
use crate::ui::colors::{HELP_BG, HELP_BORDER_FG, HELP_HEADER_FG, HELP_HIGHLIGHT_FG};
use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Padding, Paragraph, Widget, Wrap};

/// Width of the key column in the help popup.
const KEY_COLUMN_WIDTH: usize = 12;

/// Sections shown in the help popup, in order.
const SECTIONS: [KeybindingContext; 5] = [
    KeybindingContext::Global,
    KeybindingContext::Focus(Focus::Form),
    KeybindingContext::Focus(Focus::Lookup),
    KeybindingContext::Focus(Focus::History),
    KeybindingContext::Overlay(Overlay::ConfirmClear),
];

/// Builds the help text from the registered keybindings.
pub fn help_lines(registry: &KeybindingRegistry) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for context in SECTIONS.iter() {
        let bindings = registry.get_keybindings_for_context(context);
        if bindings.is_empty() {
            continue;
        }
        if !lines.is_empty() {
            lines.push(Line::from(""));
        }
        lines.push(
            Line::from(context.title())
                .style(Style::default().fg(HELP_HEADER_FG).add_modifier(Modifier::BOLD)),
        );
        for (key, command) in bindings {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("{:<KEY_COLUMN_WIDTH$}", key),
                    Style::default().fg(HELP_HIGHLIGHT_FG),
                ),
                Span::raw(command.description()),
            ]));
        }
    }
    lines
}

pub fn render_help_popup(registry: &KeybindingRegistry, popup_area: Rect, buf: &mut Buffer) {
    Clear.render(popup_area, buf);

    let block = Block::default()
        .title(" Help ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(HELP_BORDER_FG))
        .padding(Padding::horizontal(1))
        .style(Style::default().bg(HELP_BG));

    Paragraph::new(help_lines(registry))
        .block(block)
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: false })
        .render(popup_area, buf);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_help_lists_every_section() {
        let registry = KeybindingRegistry::new();
        let text: Vec<String> = help_lines(&registry).iter().map(|l| l.to_string()).collect();

        for title in ["Global", "New Request", "Look Up", "History", "Clear History"] {
            assert!(text.iter().any(|l| l == title), "missing section {title}");
        }
        assert!(text.iter().any(|l| l.starts_with("Ctrl+c") && l.ends_with("Quit")));
        assert!(text.iter().any(|l| l.starts_with("c ") && l.ends_with("Clear history")));
    }
}
