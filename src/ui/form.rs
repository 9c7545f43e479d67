use crate::app::{App, Focus};
use crate::form::{FormField, SubmitStatus, format_date_for_display};
use crate::ui::colors::{PLACEHOLDER_FG, STATUS_BUSY_FG, STATUS_ERROR_FG, STATUS_OK_FG};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};

impl App {
    pub(super) fn render_form(&self, area: Rect, buf: &mut Buffer) {
        let focused = self.focus == Focus::Form;
        let block = self.panel_block(" New Weather Request ", focused);
        let inner = block.inner(area);
        block.render(area, buf);

        let [location_area, date_area, notes_area, status_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Fill(1),
        ])
        .areas(inner);

        let field_areas = [location_area, date_area, notes_area];
        for (field, field_area) in FormField::ALL.into_iter().zip(field_areas) {
            let title = match (field, self.form.date()) {
                (FormField::Date, Some(date)) => {
                    format!(" {} ({}) ", field.label(), format_date_for_display(date))
                }
                _ => format!(" {} ", field.label()),
            };
            self.render_input(
                self.form.input(field),
                &title,
                field.placeholder(),
                focused && self.form.focus() == field,
                field_area,
                buf,
            );
        }

        self.render_submit_status(status_area, buf);
    }

    fn render_submit_status(&self, area: Rect, buf: &mut Buffer) {
        let lines = match &self.form.status {
            SubmitStatus::Idle => {
                vec![
                    Line::from("Enter submits the request.")
                        .style(Style::default().fg(PLACEHOLDER_FG)),
                ]
            }
            SubmitStatus::Submitting => {
                vec![Line::from("Submitting...").style(Style::default().fg(STATUS_BUSY_FG))]
            }
            SubmitStatus::Succeeded { id } => vec![
                Line::from("Weather request submitted successfully!")
                    .style(Style::default().fg(STATUS_OK_FG)),
                Line::from(vec![
                    Span::raw("Request ID: "),
                    Span::styled(id.clone(), Style::default().add_modifier(Modifier::BOLD)),
                ]),
            ],
            SubmitStatus::Failed(message) => {
                vec![Line::from(message.clone()).style(Style::default().fg(STATUS_ERROR_FG))]
            }
        };

        Paragraph::new(lines).wrap(Wrap { trim: true }).render(area, buf);
    }
}
