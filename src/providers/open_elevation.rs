/// Open-Elevation API client.
///
/// Handles URL construction and JSON response parsing for the lookup
/// endpoint:
///   https://api.open-elevation.com/api/v1/lookup?locations=<lat>,<lon>
///
/// Response shape:
///   { "results": [ { "latitude": ..., "longitude": ..., "elevation": <number> } ] }
///
/// The body is walked step by step instead of deserialized into one struct,
/// so each structural failure gets its own diagnostic (which expectation
/// failed), not a generic deserialization message.

use crate::model::{Coordinate, Elevation, ParseError};

pub const LOOKUP_BASE_URL: &str = "https://api.open-elevation.com/api/v1/lookup";

// ---------------------------------------------------------------------------
// URL construction
// ---------------------------------------------------------------------------

/// Builds the lookup URL for a coordinate. The endpoint takes a single
/// `locations` parameter holding `<lat>,<lon>` (it also accepts a
/// pipe-separated batch, which this service never sends).
pub fn build_lookup_url(base: &str, coord: &Coordinate) -> String {
    let locations = format!("{},{}", coord.latitude, coord.longitude);
    format!("{}?locations={}", base, urlencoding::encode(&locations))
}

// ---------------------------------------------------------------------------
// Response parsing
// ---------------------------------------------------------------------------

/// Parses an Open-Elevation JSON response body into an elevation, taken
/// from the first entry of the `results` array.
///
/// # Errors
/// - `ParseError::UnrecognizedFormat` — the body is not valid JSON at all.
/// - `ParseError::MissingField` — valid JSON, but the expected structure
///   (`results` array, first object, numeric `elevation`) is absent.
pub fn parse_lookup_response(body: &str) -> Result<Elevation, ParseError> {
    let doc: serde_json::Value = serde_json::from_str(body)
        .map_err(|_| ParseError::UnrecognizedFormat(super::snippet(body)))?;

    let object = doc
        .as_object()
        .ok_or(ParseError::MissingField("response is not a JSON object"))?;

    let results = object
        .get("results")
        .and_then(|v| v.as_array())
        .ok_or(ParseError::MissingField("no results array in response"))?;

    let first = results
        .first()
        .ok_or(ParseError::MissingField("results array is empty"))?;

    let first = first
        .as_object()
        .ok_or(ParseError::MissingField("first result is not an object"))?;

    let meters = first
        .get("elevation")
        .ok_or(ParseError::MissingField("no elevation in first result"))?
        .as_f64()
        .ok_or(ParseError::MissingField("elevation is not numeric"))?;

    Ok(Elevation { meters })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
