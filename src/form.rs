use crate::api::WeatherRequest;
use chrono::{Days, NaiveDate};
use thiserror::Error;
use tui_input::{Input, InputRequest};

/// Formats accepted in the date field, tried in order.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%d.%m.%Y",
    "%m/%d/%Y",
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("Location is required.")]
    MissingLocation,
    #[error("Date is invalid or missing.")]
    InvalidDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FormField {
    #[default]
    Location,
    Date,
    Notes,
}

impl FormField {
    pub const ALL: [FormField; 3] = [FormField::Location, FormField::Date, FormField::Notes];

    pub fn label(&self) -> &'static str {
        match self {
            FormField::Location => "Location",
            FormField::Date => "Date",
            FormField::Notes => "Notes (Optional)",
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            FormField::Location => "e.g., New York, London, Tokyo",
            FormField::Date => "YYYY-MM-DD",
            FormField::Notes => "Any additional notes about this weather request...",
        }
    }

    fn next(self) -> Self {
        match self {
            FormField::Location => FormField::Date,
            FormField::Date => FormField::Notes,
            FormField::Notes => FormField::Location,
        }
    }

    fn previous(self) -> Self {
        match self {
            FormField::Location => FormField::Notes,
            FormField::Date => FormField::Location,
            FormField::Notes => FormField::Date,
        }
    }
}

/// Outcome of the most recent submission.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmitStatus {
    #[default]
    Idle,
    Submitting,
    Succeeded {
        id: String,
    },
    Failed(String),
}

/// Parses a date typed by the user.
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(input, format).ok())
}

/// Long form shown next to the date field, e.g. "May 01, 2024".
pub fn format_date_for_display(date: NaiveDate) -> String {
    date.format("%B %d, %Y").to_string()
}

/// Input state for a new weather request.
#[derive(Debug, Default)]
pub struct WeatherForm {
    location: Input,
    date: Input,
    notes: Input,
    focus: FormField,
    pub status: SubmitStatus,
}

impl WeatherForm {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            location: Input::default(),
            date: Input::new(today.to_string()),
            notes: Input::default(),
            focus: FormField::Location,
            status: SubmitStatus::Idle,
        }
    }

    pub fn focus(&self) -> FormField {
        self.focus
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_previous(&mut self) {
        self.focus = self.focus.previous();
    }

    pub fn input(&self, field: FormField) -> &Input {
        match field {
            FormField::Location => &self.location,
            FormField::Date => &self.date,
            FormField::Notes => &self.notes,
        }
    }

    fn input_mut(&mut self, field: FormField) -> &mut Input {
        match field {
            FormField::Location => &mut self.location,
            FormField::Date => &mut self.date,
            FormField::Notes => &mut self.notes,
        }
    }

    /// Applies an edit to the focused field.
    pub fn edit(&mut self, request: InputRequest) {
        let field = self.focus;
        self.input_mut(field).handle(request);
    }

    pub fn set_value(&mut self, field: FormField, value: String) {
        let input = self.input_mut(field);
        *input = Input::new(value);
    }

    /// Parsed date field, if valid.
    pub fn date(&self) -> Option<NaiveDate> {
        parse_date(self.date.value())
    }

    /// Moves the date by `days`, starting from `today` when the field is invalid.
    pub fn shift_date(&mut self, days: i64, today: NaiveDate) {
        let current = self.date().unwrap_or(today);
        let shifted = if days >= 0 {
            current.checked_add_days(Days::new(days.unsigned_abs()))
        } else {
            current.checked_sub_days(Days::new(days.unsigned_abs()))
        };
        if let Some(date) = shifted {
            self.set_value(FormField::Date, date.to_string());
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.status == SubmitStatus::Submitting
    }

    /// Builds the request to send, or the first problem with the input.
    pub fn validate(&self) -> Result<WeatherRequest, FormError> {
        let location = self.location.value().trim();
        if location.is_empty() {
            return Err(FormError::MissingLocation);
        }

        let date = self.date().ok_or(FormError::InvalidDate)?;

        Ok(WeatherRequest {
            date,
            location: location.to_string(),
            notes: self.notes.value().trim().to_string(),
        })
    }

    /// Clears the inputs after a successful submission. The status is kept.
    pub fn reset(&mut self, today: NaiveDate) {
        self.location.reset();
        self.notes.reset();
        self.date = Input::new(today.to_string());
        self.focus = FormField::Location;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    fn type_text(form: &mut WeatherForm, text: &str) {
        for c in text.chars() {
            form.edit(InputRequest::InsertChar(c));
        }
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = Some(today());
        assert_eq!(parse_date("2024-05-01"), expected);
        assert_eq!(parse_date(" 2024-05-01 "), expected);
        assert_eq!(parse_date("May 01, 2024"), expected);
        assert_eq!(parse_date("May 1, 2024"), expected);
        assert_eq!(parse_date("01 May 2024"), expected);
        assert_eq!(parse_date("01.05.2024"), expected);
        assert_eq!(parse_date("05/01/2024"), expected);
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("2024-02-30"), None);
        assert_eq!(parse_date("tomorrow"), None);
    }

    #[test]
    fn test_format_date_for_display() {
        assert_eq!(format_date_for_display(today()), "May 01, 2024");
    }

    #[test]
    fn test_new_form_defaults_to_today() {
        let form = WeatherForm::new(today());
        assert_eq!(form.input(FormField::Date).value(), "2024-05-01");
        assert_eq!(form.focus(), FormField::Location);
    }

    #[test]
    fn test_validate_requires_location() {
        let mut form = WeatherForm::new(today());
        type_text(&mut form, "   ");
        assert_eq!(form.validate(), Err(FormError::MissingLocation));
    }

    #[test]
    fn test_validate_requires_valid_date() {
        let mut form = WeatherForm::new(today());
        type_text(&mut form, "Paris");
        form.set_value(FormField::Date, "someday".into());
        assert_eq!(form.validate(), Err(FormError::InvalidDate));
    }

    #[test]
    fn test_validate_builds_request() {
        let mut form = WeatherForm::new(today());
        type_text(&mut form, " Oslo ");
        form.focus_next();
        form.focus_next();
        type_text(&mut form, "cold");

        let request = form.validate().unwrap();
        assert_eq!(
            request,
            WeatherRequest {
                date: today(),
                location: "Oslo".into(),
                notes: "cold".into(),
            }
        );
    }

    #[test]
    fn test_focus_wraps() {
        let mut form = WeatherForm::new(today());
        form.focus_previous();
        assert_eq!(form.focus(), FormField::Notes);
        form.focus_next();
        assert_eq!(form.focus(), FormField::Location);
    }

    #[test]
    fn test_shift_date() {
        let mut form = WeatherForm::new(today());
        form.shift_date(-1, today());
        assert_eq!(form.input(FormField::Date).value(), "2024-04-30");
        form.shift_date(2, today());
        assert_eq!(form.input(FormField::Date).value(), "2024-05-02");
    }

    #[test]
    fn test_shift_invalid_date_starts_from_today() {
        let mut form = WeatherForm::new(today());
        form.set_value(FormField::Date, "garbage".into());
        form.shift_date(1, today());
        assert_eq!(form.date(), NaiveDate::from_ymd_opt(2024, 5, 2));
    }

    #[test]
    fn test_reset_clears_inputs() {
        let mut form = WeatherForm::new(today());
        type_text(&mut form, "Paris");
        form.focus_next();
        form.status = SubmitStatus::Succeeded { id: "abc".into() };

        let tomorrow = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();
        form.reset(tomorrow);

        assert_eq!(form.input(FormField::Location).value(), "");
        assert_eq!(form.input(FormField::Date).value(), "2024-05-02");
        assert_eq!(form.focus(), FormField::Location);
        assert_eq!(form.status, SubmitStatus::Succeeded { id: "abc".into() });
    }
}
