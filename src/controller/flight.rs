//! Single-flight guard shared by the controllers

use chrono::{DateTime, Utc};

/// Whether a controller currently has a backend call outstanding
///
/// The only way into `InFlight` is `try_begin`, the only way out is
/// `settle`. A busy attempt is refused, never queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Flight {
    #[default]
    Idle,
    InFlight { since: DateTime<Utc> },
}

impl Flight {
    /// Move to `InFlight`; returns false if a call is already outstanding
    pub fn try_begin(&mut self) -> bool {
        match self {
            Flight::Idle => {
                *self = Flight::InFlight { since: Utc::now() };
                true
            }
            Flight::InFlight { .. } => false,
        }
    }

    /// Return to `Idle`; returns false if nothing was in flight
    pub fn settle(&mut self) -> bool {
        match self {
            Flight::InFlight { .. } => {
                *self = Flight::Idle;
                true
            }
            Flight::Idle => false,
        }
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(self, Flight::InFlight { .. })
    }
}
