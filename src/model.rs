/// Shared data types for the sea-level alarm service.
///
/// Everything that crosses a component boundary lives here: the coordinate
/// and elevation values, the events flowing through the daemon's channel,
/// and the error taxonomy for transport and response decoding. All other
/// modules should reference these types rather than redefining them.

use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Geographic values
// ---------------------------------------------------------------------------

/// A WGS84 position fix, produced by the positioning service and consumed
/// once per elevation request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

/// Ground elevation above sea level at a coordinate. Decoded from a provider
/// response, evaluated once, then discarded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Elevation {
    pub meters: f64,
}

/// Verdict of a threshold evaluation. Recomputed on every elevation reading;
/// no history is kept, so a low elevation re-raises `Alarm` each time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlarmState {
    Safe,
    Alarm,
}

// ---------------------------------------------------------------------------
// Events on the daemon channel
// ---------------------------------------------------------------------------

/// Notifications from the external positioning service. Timeouts and errors
/// carry no position, so the daemon only logs them.
#[derive(Debug, Clone, PartialEq)]
pub enum PositionEvent {
    Updated(Coordinate),
    UpdateTimeout,
    Error(String),
}

/// Final result of one HTTP attempt, delivered by the transport worker.
/// `attempt` lets the monitor discard completions for superseded requests.
#[derive(Debug)]
pub struct FetchOutcome {
    pub attempt: u64,
    pub url: String,
    pub issued_at: DateTime<Utc>,
    pub result: Result<String, HttpError>,
    /// Wall-clock time from request start to final (non-redirected) completion.
    pub elapsed: Duration,
}

/// Everything the daemon's event loop reacts to. Position fixes and finished
/// HTTP attempts arrive on the same channel, so all state transitions happen
/// on one thread.
#[derive(Debug)]
pub enum Event {
    Position(PositionEvent),
    RequestFinished(FetchOutcome),
}

// ---------------------------------------------------------------------------
// Error taxonomy
// ---------------------------------------------------------------------------

/// Transport-level failures. Terminal for the current attempt; the monitor
/// logs them and waits for the next position event.
#[derive(Debug, Error)]
pub enum HttpError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server returned status {status} for {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },

    #[error("invalid request url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("redirect from {url} carried no usable Location header")]
    MissingLocation { url: String },

    #[error("could not resolve redirect target '{target}': {reason}")]
    InvalidRedirect { target: String, reason: String },

    #[error("gave up after following {limit} redirects")]
    TooManyRedirects { limit: usize },
}

/// Failures while decoding a provider response body into an elevation.
#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    /// Recognized callback grammar, but a field inside it is broken.
    #[error("malformed callback response: {0}")]
    Malformed(String),

    /// Recognized JSON shape, but an expected part of the structure is
    /// absent. The message names which expectation failed; callers only
    /// need it for diagnostics.
    #[error("json response missing expected structure: {0}")]
    MissingField(&'static str),

    /// Body matches neither the callback grammar nor a JSON object.
    #[error("response matches no known provider format: {0:?}")]
    UnrecognizedFormat(String),

    /// The callback's numeric field was zero, so the reciprocal elevation
    /// is undefined. Never reported as infinity.
    #[error("callback reciprocal is zero; elevation is undefined")]
    DivideByZeroElevation,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display_names_the_failed_expectation() {
        let err = ParseError::MissingField("no results array in response");
        assert!(err.to_string().contains("no results array"));

        let err = ParseError::Malformed("non-numeric first field: 'abc'".to_string());
        assert!(err.to_string().contains("abc"));

        let err = ParseError::UnrecognizedFormat("<html>".to_string());
        assert!(err.to_string().contains("<html>"));
    }

    #[test]
    fn test_http_error_display_carries_the_url() {
        let err = HttpError::MissingLocation {
            url: "http://example.com/a".to_string(),
        };
        assert!(err.to_string().contains("http://example.com/a"));

        let err = HttpError::TooManyRedirects { limit: 5 };
        assert!(err.to_string().contains('5'));
    }

    #[test]
    fn test_coordinate_is_a_plain_copyable_value() {
        let porto = Coordinate {
            latitude: 41.161758,
            longitude: -8.583933,
        };
        let copy = porto;
        assert_eq!(copy, porto);
    }
}
