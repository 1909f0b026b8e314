/// Test fixtures: representative provider response payloads.
///
/// Structurally complete but truncated to the minimum needed to exercise
/// the decoders. Both grammars are shown for the same place, the Porto
/// default coordinate (41.161758, -8.583933).
///
/// GPSVisualizer elevation script shape (one line of text):
///   LocalElevationCallback(<reciprocal-of-meters>,'<dataset>'[,...])
///
/// Open-Elevation lookup shape:
///   { "results": [ { "latitude", "longitude", "elevation" } ] }

/// GPSVisualizer answer for Porto: 1 / 0.0084819 ≈ 117.9 m.
pub(crate) fn fixture_gpsvisualizer_porto() -> &'static str {
    "LocalElevationCallback(0.0084819,'srtm30m')"
}

/// Open-Elevation answer for Porto, with the echoed coordinate fields the
/// real API includes alongside the elevation.
pub(crate) fn fixture_open_elevation_porto() -> &'static str {
    r#"{
      "results": [
        {
          "latitude": 41.161758,
          "longitude": -8.583933,
          "elevation": 117.0
        }
      ]
    }"#
}

/// Open-Elevation answer for a coordinate on the Douro riverbank, below the
/// 2.0 m inundation threshold.
pub(crate) fn fixture_open_elevation_riverbank() -> &'static str {
    r#"{"results":[{"latitude": 41.1405, "longitude": -8.6130, "elevation": 1.2}]}"#
}

/// What a proxy in front of a provider returns when the backend is down.
/// Matches neither grammar.
pub(crate) fn fixture_html_error_page() -> &'static str {
    "<html><head><title>502 Bad Gateway</title></head><body>bad gateway</body></html>"
}
