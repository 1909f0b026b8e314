/// Service configuration loader - parses sealarm.toml
///
/// Separates operational tuning (provider choice, alarm threshold, transport
/// limits, startup coordinate) from code, so pointing at a self-hosted
/// provider or tightening the threshold does not require recompiling the
/// service. Every section is optional; the defaults below are the documented
/// production values.

use serde::Deserialize;
use std::fs;

use crate::alert::thresholds::INUNDATION_THRESHOLD_M;
use crate::providers::ElevationProvider;

// ---------------------------------------------------------------------------
// Configuration sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub provider: ProviderConfig,
    pub alarm: AlarmConfig,
    pub transport: TransportConfig,
    pub position: PositionConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub kind: ElevationProvider,
    /// Override for self-hosted provider instances. When absent, requests
    /// go to the provider's public endpoint.
    pub base_url: Option<String>,
}

impl ProviderConfig {
    /// The base URL requests are issued against.
    pub fn resolved_base_url(&self) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| self.kind.default_base_url().to_string())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AlarmConfig {
    /// Elevations strictly below this many meters raise the alarm.
    pub threshold_m: f64,
}

impl Default for AlarmConfig {
    fn default() -> Self {
        Self {
            threshold_m: INUNDATION_THRESHOLD_M,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TransportConfig {
    /// Per-request timeout, connection through final body.
    pub timeout_secs: u64,
    /// Redirect hops followed before an attempt is abandoned.
    pub max_redirects: usize,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 15,
            max_redirects: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PositionConfig {
    /// Coordinate requested once at startup, before any live fix arrives.
    /// Defaults to Porto.
    pub initial_latitude: f64,
    pub initial_longitude: f64,
}

impl Default for PositionConfig {
    fn default() -> Self {
        Self {
            initial_latitude: 41.161758,
            initial_longitude: -8.583933,
        }
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Loads configuration from a TOML file.
///
/// # Panics
/// Panics if the file is missing or malformed — the service must not start
/// against a half-applied configuration.
pub fn load(path: &str) -> ServiceConfig {
    let contents =
        fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {}: {}", path, e));

    from_toml_str(&contents).unwrap_or_else(|e| panic!("Failed to parse {}: {}", path, e))
}

/// Parses configuration from a TOML string.
pub fn from_toml_str(contents: &str) -> Result<ServiceConfig, toml::de::Error> {
    toml::from_str(contents)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
