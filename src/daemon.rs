/// Core daemon implementation for the sea-level alarm service.
///
/// This module implements the main event loop that:
/// 1. Receives position fixes, timeouts, and errors from the positioning
///    service through a `PositionHandle`
/// 2. Drives the elevation monitor's request state machine
/// 3. Receives finished HTTP attempts from the transport workers
/// 4. Turns every evaluated elevation into an alarm notification
///
/// Position events and transport completions arrive on one channel, so all
/// state transitions happen on this single thread and no locking is needed.

use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

use tracing::{info, warn};

use crate::config::ServiceConfig;
use crate::model::{AlarmState, Coordinate, Event, HttpError, PositionEvent};
use crate::monitor::ElevationMonitor;
use crate::position::PositionHandle;
use crate::transport::RequestRunner;

pub struct Daemon {
    config: ServiceConfig,
    events_tx: Sender<Event>,
    events_rx: Receiver<Event>,
    monitor: ElevationMonitor,
}

impl Daemon {
    /// Builds the daemon: event channel, transport runner, monitor.
    pub fn new(config: ServiceConfig) -> Result<Self, HttpError> {
        let (events_tx, events_rx) = mpsc::channel();

        let runner = RequestRunner::new(&config.transport, events_tx.clone())?;
        let monitor = ElevationMonitor::new(
            config.provider.kind,
            config.provider.resolved_base_url(),
            config.alarm.threshold_m,
            runner,
        );

        Ok(Self {
            config,
            events_tx,
            events_rx,
            monitor,
        })
    }

    /// Handle for the external positioning service. Clone freely; every
    /// clone feeds the same event loop.
    pub fn position_handle(&self) -> PositionHandle {
        PositionHandle::new(self.events_tx.clone())
    }

    /// Requests elevation for the configured startup coordinate, so an
    /// alarm verdict exists before the first live position fix arrives.
    pub fn request_initial_position(&mut self) {
        let coord = Coordinate {
            latitude: self.config.position.initial_latitude,
            longitude: self.config.position.initial_longitude,
        };
        info!(
            latitude = coord.latitude,
            longitude = coord.longitude,
            "requesting elevation for startup coordinate"
        );
        self.monitor.on_position(coord);
    }

    /// Waits up to `timeout` for one event and handles it. Returns the
    /// alarm verdict when the event completed an evaluation.
    pub fn poll_event(&mut self, timeout: Duration) -> Option<AlarmState> {
        let event = self.events_rx.recv_timeout(timeout).ok()?;
        self.handle_event(event)
    }

    /// Main daemon loop (runs indefinitely).
    pub fn run(&mut self) {
        loop {
            // The daemon holds a sender itself, so recv never disconnects.
            let event = self.events_rx.recv().expect("event channel closed");
            self.handle_event(event);
        }
    }

    fn handle_event(&mut self, event: Event) -> Option<AlarmState> {
        match event {
            Event::Position(PositionEvent::Updated(coord)) => {
                self.monitor.on_position(coord);
                None
            }
            Event::Position(PositionEvent::UpdateTimeout) => {
                warn!("position source reported an update timeout");
                None
            }
            Event::Position(PositionEvent::Error(message)) => {
                warn!("position source error: {message}");
                None
            }
            Event::RequestFinished(outcome) => {
                let verdict = self.monitor.on_request_finished(outcome);
                if let Some(state) = verdict {
                    self.notify(state);
                }
                verdict
            }
        }
    }

    /// The alarm notification consumed by the application shell. A log line
    /// here; an embedding GUI would hook the same spot.
    fn notify(&self, state: AlarmState) {
        match state {
            AlarmState::Alarm => {
                warn!("sea level alarm: this part of land is projected to be under water by 2100")
            }
            AlarmState::Safe => info!("elevation is above the inundation threshold"),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
