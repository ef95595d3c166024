//! Cosmetic board rotation, layered over a session.
//!
//! A rotation flips the board orientation halfway through and ends the
//! transition at full duration. Game state is never touched. Time is passed in
//! by the caller, so a rotation advances only when it is ticked.

use std::ops::{Deref, DerefMut};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::coretypes::Orientation;
use crate::oracle::RulesOracle;
use crate::session::SessionController;

/// Default length of one rotation.
pub const DEFAULT_ROTATION: Duration = Duration::from_millis(750);

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct RotationConfig {
    pub duration: Duration,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            duration: DEFAULT_ROTATION,
        }
    }
}

/// Milestones reported by `Rotating::tick`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum RotationEvent {
    /// Halfway point reached, the board now shows this side at the bottom.
    OrientationFlipped(Orientation),
    /// Full duration reached, the board is no longer animating.
    TransitionFinished,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
struct InFlight {
    started: Instant,
    flipped: bool,
}

/// A session with board rotation.
///
/// Only one rotation runs at a time: triggering another while one is in
/// flight is ignored.
#[derive(Debug)]
pub struct Rotating<O> {
    session: SessionController<O>,
    config: RotationConfig,
    in_flight: Option<InFlight>,
}

impl<O: RulesOracle> Rotating<O> {
    pub fn new(session: SessionController<O>) -> Self {
        Self::with_config(session, RotationConfig::default())
    }

    pub fn with_config(session: SessionController<O>, config: RotationConfig) -> Self {
        Self {
            session,
            config,
            in_flight: None,
        }
    }

    /// Start a rotation at `now`. Returns false, doing nothing, if one is already running.
    pub fn rotate(&mut self, now: Instant) -> bool {
        if self.in_flight.is_some() {
            debug!("rotation already in flight, ignored");
            return false;
        }
        debug!(duration_ms = self.config.duration.as_millis() as u64, "rotation started");
        self.in_flight = Some(InFlight {
            started: now,
            flipped: false,
        });
        true
    }

    /// Advance the running rotation to `now` and report milestones passed since the last tick.
    /// Each milestone fires once per rotation, in order, even if one tick passes both.
    pub fn tick(&mut self, now: Instant) -> Vec<RotationEvent> {
        let mut events = Vec::new();
        let InFlight { started, flipped } = match self.in_flight {
            Some(in_flight) => in_flight,
            None => return events,
        };
        let elapsed = now.saturating_duration_since(started);

        if !flipped && elapsed >= self.config.duration / 2 {
            self.session.flip_orientation();
            events.push(RotationEvent::OrientationFlipped(self.session.orientation()));
            self.in_flight = Some(InFlight {
                started,
                flipped: true,
            });
        }
        if elapsed >= self.config.duration {
            self.in_flight = None;
            events.push(RotationEvent::TransitionFinished);
        }
        events
    }

    /// Abort a running rotation. The orientation keeps whatever the rotation already did.
    /// Returns true if a rotation was running.
    pub fn cancel(&mut self) -> bool {
        self.in_flight.take().is_some()
    }

    /// Skip the animation: jump straight to the end state of a running rotation.
    ///
    /// Unlike `cancel`, a rotation stopped before half duration still turns the
    /// board, so the orientation always ends where the rotation was headed.
    pub fn reset_instantly(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            if !in_flight.flipped {
                self.session.flip_orientation();
            }
        }
    }

    /// Show the board from `orientation`, dropping any running rotation so a
    /// later tick cannot flip the board away from the requested side.
    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.stop_for_explicit_orientation();
        self.session.set_orientation(orientation);
    }

    /// Reset the game and show the board from `orientation`. Any running
    /// rotation is dropped.
    pub fn reset_with_orientation(&mut self, orientation: Orientation) {
        self.stop_for_explicit_orientation();
        self.session.reset_with_orientation(orientation);
    }

    fn stop_for_explicit_orientation(&mut self) {
        if self.cancel() {
            debug!("rotation dropped for explicit orientation");
        }
    }

    /// True while a rotation is animating.
    pub fn is_transitioning(&self) -> bool {
        self.in_flight.is_some()
    }

    /// True once a running rotation has flipped the board.
    pub fn is_past_half(&self) -> bool {
        self.in_flight.map_or(false, |in_flight| in_flight.flipped)
    }

    /// Fraction of the running rotation completed at `now`, for drawing the
    /// board at an angle. None when idle.
    pub fn progress(&self, now: Instant) -> Option<f32> {
        let in_flight = self.in_flight?;
        if self.config.duration.is_zero() {
            return Some(1.0);
        }
        let elapsed = now.saturating_duration_since(in_flight.started);
        Some((elapsed.as_secs_f32() / self.config.duration.as_secs_f32()).min(1.0))
    }

    pub fn config(&self) -> &RotationConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionController<O> {
        &self.session
    }

    pub fn into_inner(self) -> SessionController<O> {
        self.session
    }
}

impl<O> Deref for Rotating<O> {
    type Target = SessionController<O>;
    fn deref(&self) -> &Self::Target {
        &self.session
    }
}

impl<O> DerefMut for Rotating<O> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.session
    }
}
