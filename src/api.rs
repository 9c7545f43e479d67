use chrono::NaiveDate;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// Shown for any failed submission or unexpected lookup failure.
pub const GENERIC_FAILURE_MESSAGE: &str =
    "Could not fetch weather data. Please try again with a valid location.";
pub const NOT_FOUND_MESSAGE: &str = "No weather data found for that ID.";

/// Failures talking to the weather service.
///
/// Transport problems (no response at all) are kept apart from responses the
/// service sent back.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("could not reach weather service: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("weather service rejected the request ({status}): {detail}")]
    Rejected { status: u16, detail: String },

    #[error("no weather data found for id '{0}'")]
    NotFound(String),

    #[error("unexpected response from weather service: {0}")]
    Malformed(String),

    #[error("request id must not be empty")]
    EmptyId,

    #[error("invalid API url '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

impl ApiError {
    /// Message suitable for the status line.
    pub fn user_message(&self) -> &'static str {
        match self {
            ApiError::NotFound(_) => NOT_FOUND_MESSAGE,
            ApiError::EmptyId => "Please enter a request ID.",
            _ => GENERIC_FAILURE_MESSAGE,
        }
    }

    /// True when the service never answered.
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport(_))
    }
}

/// Body of a new weather request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeatherRequest {
    pub date: NaiveDate,
    pub location: String,
    pub notes: String,
}

/// Answer to a successful submission.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SubmitReceipt {
    pub id: String,
}

/// A stored weather result as returned by a lookup.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WeatherRecord {
    pub id: String,
    pub date: NaiveDate,
    pub location: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub weather: WeatherReport,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct WeatherReport {
    #[serde(default)]
    pub current: Option<CurrentConditions>,
    #[serde(default)]
    pub location: Option<ReportLocation>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CurrentConditions {
    /// Degrees Celsius.
    pub temperature: Option<f64>,
    #[serde(default)]
    pub weather_descriptions: Vec<String>,
    /// Percent.
    pub humidity: Option<f64>,
    /// km/h.
    pub wind_speed: Option<f64>,
    pub feelslike: Option<f64>,
    pub observation_time: Option<String>,
}

impl CurrentConditions {
    pub fn description(&self) -> Option<&str> {
        self.weather_descriptions.first().map(String::as_str)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ReportLocation {
    pub name: Option<String>,
    pub country: Option<String>,
    pub localtime: Option<String>,
}

impl WeatherRecord {
    pub fn current(&self) -> Option<&CurrentConditions> {
        self.weather.current.as_ref()
    }

    pub fn notes_or_none(&self) -> &str {
        match self.notes.as_deref() {
            Some(notes) if !notes.trim().is_empty() => notes,
            _ => "None",
        }
    }
}

/// HTTP client for the weather service.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let base_url = Url::parse(base_url).map_err(|e| ApiError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: "not a hierarchical url".to_string(),
            });
        }

        let client = Client::builder().timeout(timeout).build().map_err(ApiError::Transport)?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Submits a weather request and returns the id the service assigned to it.
    pub async fn submit(&self, request: &WeatherRequest) -> Result<SubmitReceipt, ApiError> {
        let url = self.endpoint(&["weather"])?;
        info!(
            url = %url,
            location = %request.location,
            date = %request.date,
            "Submitting weather request"
        );

        let response = self
            .client
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(ApiError::Transport)?;
        let status = response.status();
        let body = response.text().await.map_err(ApiError::Transport)?;

        let receipt: SubmitReceipt = classify(status, &body)?;
        if receipt.id.trim().is_empty() {
            return Err(ApiError::Malformed("empty id in submit response".to_string()));
        }

        debug!(id = %receipt.id, "Weather request accepted");
        Ok(receipt)
    }

    /// Fetches a previously submitted result by id.
    pub async fn lookup(&self, id: &str) -> Result<WeatherRecord, ApiError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(ApiError::EmptyId);
        }

        let url = self.endpoint(&["weather", id])?;
        info!(url = %url, "Looking up weather data");

        let response = self.client.get(url).send().await.map_err(ApiError::Transport)?;
        let status = response.status();
        let body = response.text().await.map_err(ApiError::Transport)?;

        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(id.to_string()));
        }

        classify(status, &body)
    }

    /// Appends escaped path segments to the base url.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: "not a hierarchical url".to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

/// Turns a response into a value or a typed error.
pub fn classify<T: DeserializeOwned>(status: StatusCode, body: &str) -> Result<T, ApiError> {
    if !status.is_success() {
        return Err(ApiError::Rejected {
            status: status.as_u16(),
            detail: error_detail(status, body),
        });
    }

    serde_json::from_str(body).map_err(|e| ApiError::Malformed(e.to_string()))
}

/// Extracts a readable reason from an error body.
///
/// Understands `{"detail": "..."}` as well as validation lists
/// (`{"detail": [{"msg": "..."}]}`), and falls back to the raw body.
fn error_detail(status: StatusCode, body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        detail: serde_json::Value,
    }

    if let Ok(ErrorBody { detail }) = serde_json::from_str::<ErrorBody>(body) {
        match detail {
            serde_json::Value::String(message) => return message,
            serde_json::Value::Array(entries) => {
                let messages: Vec<&str> = entries
                    .iter()
                    .filter_map(|entry| entry.get("msg").and_then(|m| m.as_str()))
                    .collect();
                if !messages.is_empty() {
                    return messages.join("; ");
                }
            }
            _ => {}
        }
    }

    let body = body.trim();
    if body.is_empty() {
        status.canonical_reason().unwrap_or("unknown error").to_string()
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(base, Duration::from_secs(1)).unwrap()
    }

    #[test]
    fn test_endpoint_appends_segments() {
        let api = client("http://localhost:8000");
        assert_eq!(api.endpoint(&["weather"]).unwrap().as_str(), "http://localhost:8000/weather");
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let api = client("http://example.com/api/");
        assert_eq!(
            api.endpoint(&["weather", "abc"]).unwrap().as_str(),
            "http://example.com/api/weather/abc"
        );
    }

    #[test]
    fn test_endpoint_escapes_id() {
        let api = client("http://localhost:8000");
        assert_eq!(
            api.endpoint(&["weather", "a/b c"]).unwrap().as_str(),
            "http://localhost:8000/weather/a%2Fb%20c"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            ApiClient::new("not a url", Duration::from_secs(1)),
            Err(ApiError::InvalidBaseUrl { .. })
        ));
        assert!(matches!(
            ApiClient::new("mailto:someone@example.com", Duration::from_secs(1)),
            Err(ApiError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn test_classify_receipt() {
        let receipt: SubmitReceipt = classify(StatusCode::OK, r#"{"id":"abc-123"}"#).unwrap();
        assert_eq!(receipt.id, "abc-123");
    }

    #[test]
    fn test_classify_rejection_uses_detail() {
        let err = classify::<SubmitReceipt>(
            StatusCode::BAD_REQUEST,
            r#"{"detail":"Your API request failed. Please try again."}"#,
        )
        .unwrap_err();
        match err {
            ApiError::Rejected { status, detail } => {
                assert_eq!(status, 400);
                assert_eq!(detail, "Your API request failed. Please try again.");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_classify_rejection_validation_list() {
        let body = r#"{"detail":[{"loc":["body","date"],"msg":"field required"}]}"#;
        let err = classify::<SubmitReceipt>(StatusCode::UNPROCESSABLE_ENTITY, body).unwrap_err();
        assert!(matches!(
            err,
            ApiError::Rejected { status: 422, ref detail } if detail == "field required"
        ));
    }

    #[test]
    fn test_classify_rejection_without_body() {
        let err = classify::<SubmitReceipt>(StatusCode::INTERNAL_SERVER_ERROR, "").unwrap_err();
        assert!(matches!(
            err,
            ApiError::Rejected { ref detail, .. } if detail == "Internal Server Error"
        ));
    }

    #[test]
    fn test_classify_malformed_success() {
        let err = classify::<SubmitReceipt>(StatusCode::OK, "<html>").unwrap_err();
        assert!(matches!(err, ApiError::Malformed(_)));
    }

    #[test]
    fn test_classify_weather_record() {
        let body = r#"{
            "id": "abc",
            "date": "2024-05-01",
            "location": "Paris",
            "notes": "",
            "weather": {
                "request": {"type": "City"},
                "location": {"name": "Paris", "country": "France", "localtime": "2024-05-01 12:00"},
                "current": {
                    "temperature": 18,
                    "weather_descriptions": ["Partly cloudy"],
                    "humidity": 60,
                    "wind_speed": 11,
                    "feelslike": 17,
                    "observation_time": "10:00 AM"
                }
            }
        }"#;
        let record: WeatherRecord = classify(StatusCode::OK, body).unwrap();

        assert_eq!(record.date, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        assert_eq!(record.notes_or_none(), "None");
        let current = record.current().unwrap();
        assert_eq!(current.temperature, Some(18.0));
        assert_eq!(current.description(), Some("Partly cloudy"));
        assert_eq!(record.weather.location.unwrap().country.as_deref(), Some("France"));
    }

    #[test]
    fn test_classify_weather_record_without_weather() {
        let body = r#"{"id":"abc","date":"2024-05-01","location":"Paris"}"#;
        let record: WeatherRecord = classify(StatusCode::OK, body).unwrap();
        assert!(record.current().is_none());
    }

    #[test]
    fn test_user_messages() {
        assert_eq!(ApiError::NotFound("x".into()).user_message(), NOT_FOUND_MESSAGE);
        assert_eq!(ApiError::Malformed("x".into()).user_message(), GENERIC_FAILURE_MESSAGE);
        assert_eq!(
            ApiError::Rejected {
                status: 400,
                detail: "bad".into()
            }
            .user_message(),
            GENERIC_FAILURE_MESSAGE
        );
    }

    #[tokio::test]
    async fn test_lookup_rejects_empty_id() {
        let api = client("http://localhost:8000");
        assert!(matches!(api.lookup("   ").await, Err(ApiError::EmptyId)));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let api = client(&format!("http://{}", addr));
        let err = api.lookup("abc").await.unwrap_err();

        assert!(err.is_transport());
        assert_eq!(err.user_message(), GENERIC_FAILURE_MESSAGE);
    }

    #[test]
    fn test_service_answers_are_not_transport_errors() {
        assert!(!ApiError::NotFound("abc".into()).is_transport());
        assert!(
            !ApiError::Rejected {
                status: 500,
                detail: "boom".into()
            }
            .is_transport()
        );
        assert!(!ApiError::Malformed("<html>".into()).is_transport());
    }
}
