//! sealarm_service: sea-level alarm monitoring service.
//!
//! Listens to geo-location changes, requests the ground elevation at each
//! position from a third-party provider, and raises an alarm when the
//! elevation falls below the projected 2100 sea-level rise.
//!
//! # Module structure
//!
//! ```text
//! sealarm_service
//! ├── model      — shared data types (Coordinate, Elevation, AlarmState,
//! │                events, error taxonomy)
//! ├── config     — service configuration loader (sealarm.toml)
//! ├── providers
//! │   ├── open_elevation — Open-Elevation API: URL construction + JSON parsing
//! │   ├── gpsvisualizer  — GPSVisualizer script: URL construction + callback parsing
//! │   └── fixtures (test only) — representative provider response payloads
//! ├── transport  — single-outstanding-request HTTP runner with capped redirects
//! ├── monitor    — elevation request state machine (Idle → Requesting → Idle)
//! ├── alert
//! │   └── thresholds — inundation threshold evaluation
//! ├── position   — handle driven by the external positioning service
//! └── daemon     — event loop wiring positions → monitor → alarm notification
//! ```

pub mod alert;
pub mod config;
pub mod daemon;
pub mod model;
pub mod monitor;
pub mod position;
pub mod providers;
pub mod transport;
