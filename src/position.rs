/// Interface to the external positioning service.
///
/// Position acquisition is platform-specific and lives outside this crate;
/// whatever provides it drives this handle. Updates feed the monitor; the
/// timeout and error notifications are logged by the daemon and otherwise
/// ignored.

use std::sync::mpsc::Sender;

use crate::model::{Coordinate, Event, PositionEvent};

/// Cloneable sender a positioning backend uses to feed the daemon's event
/// loop. Every method returns whether the daemon was still listening.
#[derive(Clone)]
pub struct PositionHandle {
    events: Sender<Event>,
}

impl PositionHandle {
    pub(crate) fn new(events: Sender<Event>) -> Self {
        Self { events }
    }

    /// Delivers a new position fix.
    pub fn update(&self, coordinate: Coordinate) -> bool {
        self.events
            .send(Event::Position(PositionEvent::Updated(coordinate)))
            .is_ok()
    }

    /// The backend could not produce a fix within its own deadline.
    pub fn timeout(&self) -> bool {
        self.events
            .send(Event::Position(PositionEvent::UpdateTimeout))
            .is_ok()
    }

    /// The backend failed outright (permissions, hardware, service loss).
    pub fn error(&self, message: impl Into<String>) -> bool {
        self.events
            .send(Event::Position(PositionEvent::Error(message.into())))
            .is_ok()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
