/// GPSVisualizer elevation script client.
///
/// Handles URL construction and response parsing for the elevation_data
/// script:
///   http://www.gpsvisualizer.com/elevation_data/elev2018.js?coords=<lat>,<lon>
///
/// The response is not JSON but a one-line callback invocation:
///   LocalElevationCallback(0.0084819,'srtm30m',...)
/// The first argument is the *reciprocal* of the elevation in meters; the
/// second is the quoted name of the dataset that answered. A reciprocal of
/// zero has no defined elevation and is reported as a parse failure rather
/// than infinity.

use tracing::debug;

use crate::model::{Coordinate, Elevation, ParseError};

pub const ELEVATION_BASE_URL: &str = "http://www.gpsvisualizer.com/elevation_data/elev2018.js";

// ---------------------------------------------------------------------------
// URL construction
// ---------------------------------------------------------------------------

/// Builds the elevation script URL for a coordinate. The script takes a
/// single `coords` parameter holding `<lat>,<lon>`.
pub fn build_elevation_url(base: &str, coord: &Coordinate) -> String {
    let coords = format!("{},{}", coord.latitude, coord.longitude);
    format!("{}?coords={}", base, urlencoding::encode(&coords))
}

// ---------------------------------------------------------------------------
// Response parsing
// ---------------------------------------------------------------------------

/// Parses a callback-script response body into an elevation.
///
/// Grammar: `Identifier(<number>,'<label>'[,...])`. Everything after the
/// first `(` is the argument list; the first comma-separated field is the
/// reciprocal, and the label sits between the first pair of single quotes
/// after that comma.
///
/// # Errors
/// - `ParseError::Malformed` — missing comma, non-numeric first field, or
///   missing quoted label.
/// - `ParseError::DivideByZeroElevation` — the reciprocal is zero.
pub fn parse_callback_response(body: &str) -> Result<Elevation, ParseError> {
    let body = body.trim_start();

    let open = body
        .find('(')
        .ok_or_else(|| ParseError::Malformed("no opening parenthesis".to_string()))?;
    let args = &body[open + 1..];

    let (number_field, rest) = args.split_once(',').ok_or_else(|| {
        ParseError::Malformed("missing comma after numeric field".to_string())
    })?;

    let reciprocal: f64 = number_field.trim().parse().map_err(|_| {
        ParseError::Malformed(format!("non-numeric first field: '{}'", number_field))
    })?;

    let label = quoted_label(rest)
        .ok_or_else(|| ParseError::Malformed("missing quoted source label".to_string()))?;
    debug!(source = label, "elevation data source");

    if reciprocal == 0.0 {
        return Err(ParseError::DivideByZeroElevation);
    }

    Ok(Elevation {
        meters: 1.0 / reciprocal,
    })
}

/// Substring between the first pair of single quotes, if both are present.
fn quoted_label(rest: &str) -> Option<&str> {
    let start = rest.find('\'')? + 1;
    let end = rest[start..].find('\'')? + start;
    Some(&rest[start..end])
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
