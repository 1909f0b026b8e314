/// Elevation request state machine.
///
/// Sits between the position source and the transport: a position fix
/// becomes at most one outstanding elevation request, the response body is
/// decoded by the provider codec, and the resulting elevation is evaluated
/// against the inundation threshold.
///
/// States: `Idle → Requesting → Idle`. Parse and transport failures are
/// terminal for the attempt — logged, no retry; the next position event is
/// the only retrigger. A fix arriving while a request is outstanding is
/// queued, newest wins, and issued when the current attempt resolves.

use tracing::{debug, info, warn};

use crate::alert::thresholds;
use crate::model::{AlarmState, Coordinate, FetchOutcome};
use crate::providers::{self, ElevationProvider};
use crate::transport::RequestRunner;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MonitorState {
    Idle,
    Requesting { attempt: u64 },
}

pub struct ElevationMonitor {
    provider: ElevationProvider,
    base_url: String,
    threshold_m: f64,
    runner: RequestRunner,
    state: MonitorState,
    /// Newest coordinate that arrived while a request was outstanding.
    pending: Option<Coordinate>,
}

impl ElevationMonitor {
    pub fn new(
        provider: ElevationProvider,
        base_url: String,
        threshold_m: f64,
        runner: RequestRunner,
    ) -> Self {
        Self {
            provider,
            base_url,
            threshold_m,
            runner,
            state: MonitorState::Idle,
            pending: None,
        }
    }

    /// A new position fix. Starts a request when idle; otherwise replaces
    /// the pending coordinate so the alarm tracks the most recent position.
    pub fn on_position(&mut self, coord: Coordinate) {
        match self.state {
            MonitorState::Idle => self.begin_request(coord),
            MonitorState::Requesting { .. } => {
                if self.pending.replace(coord).is_some() {
                    debug!("replacing pending coordinate with newer position");
                }
            }
        }
    }

    /// A finished HTTP attempt. Outcomes for superseded attempts are
    /// ignored; the matching outcome returns the monitor to `Idle`, yields
    /// an alarm verdict when the body decoded, and issues any pending
    /// coordinate.
    pub fn on_request_finished(&mut self, outcome: FetchOutcome) -> Option<AlarmState> {
        match self.state {
            MonitorState::Requesting { attempt } if attempt == outcome.attempt => {}
            _ => {
                debug!(
                    attempt = outcome.attempt,
                    "ignoring outcome for superseded attempt"
                );
                return None;
            }
        }
        self.state = MonitorState::Idle;

        let verdict = match outcome.result {
            Ok(body) => self.evaluate_body(&body),
            Err(err) => {
                warn!(url = %outcome.url, "elevation request failed: {err}");
                None
            }
        };
        info!(
            url = %outcome.url,
            elapsed_ms = outcome.elapsed.as_millis() as u64,
            "elevation request finished"
        );

        if let Some(coord) = self.pending.take() {
            self.begin_request(coord);
        }
        verdict
    }

    fn begin_request(&mut self, coord: Coordinate) {
        let url = self.provider.build_request_url(&self.base_url, &coord);
        info!(
            latitude = coord.latitude,
            longitude = coord.longitude,
            "requesting elevation"
        );
        let attempt = self.runner.start(&url);
        self.state = MonitorState::Requesting { attempt };
    }

    fn evaluate_body(&self, body: &str) -> Option<AlarmState> {
        match providers::parse_response(body) {
            Ok(elevation) => {
                info!(elevation_m = elevation.meters, "elevation changed");
                Some(thresholds::evaluate(elevation.meters, self.threshold_m))
            }
            Err(err) => {
                warn!("could not decode elevation response: {err}");
                None
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
