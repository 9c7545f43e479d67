use crate::api::WeatherRecord;
use crate::app::{App, Focus};
use crate::form::format_date_for_display;
use crate::lookup::LookupStatus;
use crate::ui::colors::{
    CARD_TEMPERATURE_FG, CARD_VALUE_FG, LABEL_FG, PLACEHOLDER_FG, STATUS_BUSY_FG, STATUS_ERROR_FG,
};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};

/// Width of the label column on the weather card.
const LABEL_WIDTH: usize = 13;

fn format_measure(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) => format!("{}{}", v, unit),
        None => "n/a".to_string(),
    }
}

fn card_line(label: &str, value: String, value_style: Style) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("{:<LABEL_WIDTH$}", format!("{}:", label)),
            Style::default().fg(LABEL_FG),
        ),
        Span::styled(value, value_style),
    ])
}

/// Lines shown for a found record.
pub(super) fn weather_card(record: &WeatherRecord) -> Vec<Line<'static>> {
    let value = Style::default().fg(CARD_VALUE_FG);
    let current = record.current();

    let mut lines = vec![
        card_line("Date", format_date_for_display(record.date), value),
        card_line("Location", record.location.clone(), value),
        card_line(
            "Temperature",
            format_measure(current.and_then(|c| c.temperature), "°C"),
            Style::default().fg(CARD_TEMPERATURE_FG).add_modifier(Modifier::BOLD),
        ),
        card_line(
            "Condition",
            current
                .and_then(|c| c.description())
                .unwrap_or("n/a")
                .to_string(),
            value,
        ),
        card_line("Humidity", format_measure(current.and_then(|c| c.humidity), "%"), value),
        card_line("Wind", format_measure(current.and_then(|c| c.wind_speed), " km/h"), value),
    ];

    if let Some(feelslike) = current.and_then(|c| c.feelslike) {
        lines.push(card_line("Feels like", format!("{}°C", feelslike), value));
    }
    if let Some(observed) = current.and_then(|c| c.observation_time.clone()) {
        lines.push(card_line("Observed", observed, value));
    }
    if let Some(place) = &record.weather.location {
        let reported: Vec<&str> = [place.name.as_deref(), place.country.as_deref()]
            .into_iter()
            .flatten()
            .collect();
        if !reported.is_empty() {
            lines.push(card_line("Reported", reported.join(", "), value));
        }
        if let Some(localtime) = &place.localtime {
            lines.push(card_line("Local time", localtime.clone(), value));
        }
    }

    lines.push(card_line("Notes", record.notes_or_none().to_string(), value));
    lines.push(Line::from(""));
    lines.push(Line::from(format!("ID: {}", record.id)).style(Style::default().fg(PLACEHOLDER_FG)));
    lines
}

impl App {
    pub(super) fn render_lookup(&self, area: Rect, buf: &mut Buffer) {
        let focused = self.focus == Focus::Lookup;
        let block = self.panel_block(" Look Up Weather Data ", focused);
        let inner = block.inner(area);
        block.render(area, buf);

        let [input_area, card_area] =
            Layout::vertical([Constraint::Length(3), Constraint::Fill(1)]).areas(inner);

        self.render_input(
            self.lookup.input(),
            " Request ID ",
            "Enter the ID of a submitted request",
            focused,
            input_area,
            buf,
        );

        let lines = match &self.lookup.status {
            LookupStatus::Idle => {
                vec![
                    Line::from("Enter looks up the id. Up/Down recall recent ids.")
                        .style(Style::default().fg(PLACEHOLDER_FG)),
                ]
            }
            LookupStatus::Loading(id) => {
                vec![
                    Line::from(format!("Loading {}...", id))
                        .style(Style::default().fg(STATUS_BUSY_FG)),
                ]
            }
            LookupStatus::Found(record) => weather_card(record),
            LookupStatus::Failed(message) => {
                vec![Line::from(message.clone()).style(Style::default().fg(STATUS_ERROR_FG))]
            }
        };

        Paragraph::new(lines).wrap(Wrap { trim: false }).render(card_area, buf);
    }
}
