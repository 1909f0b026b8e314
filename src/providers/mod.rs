/// Elevation provider registry: URL construction and response decoding.
///
/// Each provider gets its own file under providers/ rather than bloating
/// this one — adding a provider means a new module plus an enum arm here;
/// neither the transport nor the monitor changes.
///
/// Providers differ in two ways: the URL their lookup endpoint expects, and
/// the grammar of their response body. The body grammar is sniffed rather
/// than keyed off the configured provider, because a redirecting provider
/// may hand the request to a mirror that answers in the other format.

pub mod gpsvisualizer;
pub mod open_elevation;

#[cfg(test)]
pub(crate) mod fixtures;

use serde::Deserialize;

use crate::model::{Coordinate, Elevation, ParseError};

// ---------------------------------------------------------------------------
// Provider selection
// ---------------------------------------------------------------------------

/// The closed set of known elevation providers. Selection is static
/// configuration (`[provider] kind` in sealarm.toml).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElevationProvider {
    /// Open-Elevation public API. Free and self-hostable, limited to
    /// ~1 req/s per IP on the public instance, and can be slow (3-30 s).
    OpenElevation,

    /// GPSVisualizer elevation script. Answers quickly; the payload is a
    /// callback invocation carrying the reciprocal of the elevation.
    #[default]
    #[serde(rename = "gpsvisualizer")]
    GpsVisualizer,
}

impl ElevationProvider {
    /// Public endpoint this provider answers on. Config may override it for
    /// self-hosted instances.
    pub fn default_base_url(&self) -> &'static str {
        match self {
            ElevationProvider::OpenElevation => open_elevation::LOOKUP_BASE_URL,
            ElevationProvider::GpsVisualizer => gpsvisualizer::ELEVATION_BASE_URL,
        }
    }

    /// Builds the lookup URL for `coord` against `base`. The query always
    /// contains the exact decimal latitude and longitude, in the order this
    /// provider expects them.
    pub fn build_request_url(&self, base: &str, coord: &Coordinate) -> String {
        match self {
            ElevationProvider::OpenElevation => open_elevation::build_lookup_url(base, coord),
            ElevationProvider::GpsVisualizer => gpsvisualizer::build_elevation_url(base, coord),
        }
    }
}

// ---------------------------------------------------------------------------
// Response decoding
// ---------------------------------------------------------------------------

/// Content kind sniffed from a response body before parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    /// `Identifier(<number>,'<label>',...)` — GPSVisualizer style.
    CallbackScript,
    /// A JSON object — Open-Elevation style.
    Json,
    Unrecognized,
}

/// Classifies a response body by its leading characters. Any identifier
/// followed by `(` counts as a callback script; the observed provider uses
/// `LocalElevationCallback(` but the name is not load-bearing.
pub fn sniff(body: &str) -> ResponseKind {
    let body = body.trim_start();
    if looks_like_callback(body) {
        ResponseKind::CallbackScript
    } else if body.starts_with('{') {
        ResponseKind::Json
    } else {
        ResponseKind::Unrecognized
    }
}

fn looks_like_callback(body: &str) -> bool {
    match body.find('(') {
        None | Some(0) => false,
        Some(open) => {
            let ident = &body[..open];
            ident
                .chars()
                .next()
                .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
                && ident.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
    }
}

/// Decodes a provider response body into an elevation, dispatching on the
/// sniffed grammar.
pub fn parse_response(body: &str) -> Result<Elevation, ParseError> {
    match sniff(body) {
        ResponseKind::CallbackScript => gpsvisualizer::parse_callback_response(body),
        ResponseKind::Json => open_elevation::parse_lookup_response(body),
        ResponseKind::Unrecognized => Err(ParseError::UnrecognizedFormat(snippet(body))),
    }
}

/// First characters of a body, for error payloads. Full bodies can be large
/// HTML error pages; the head is enough to recognize them in a log line.
pub(crate) fn snippet(body: &str) -> String {
    body.chars().take(80).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
