use std::fmt::Display;

use thiserror::Error;

use super::duration::{DurationError, SessionMinutes};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimerError {
    #[error("a session is already running")]
    AlreadyRunning,
    #[error("no session is running")]
    NotRunning,
    #[error(transparent)]
    InvalidDuration(#[from] DurationError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The countdown reached zero.
    Completed,
    /// The user ended the session before the countdown ran out.
    UserEnded,
}

impl Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StopReason::Completed => write!(f, "completed"),
            StopReason::UserEnded => write!(f, "user-ended"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Idle,
    Running { planned: u32, remaining: u32 },
}

/// A session that just left the running state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinishedSession {
    pub planned: u32,
    pub elapsed: u32,
    pub reason: StopReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Nothing is running, the tick changed nothing.
    Idle,
    Running { remaining: u32 },
    Expired(FinishedSession),
}

/// Countdown state machine. Only `start` leaves [TimerState::Idle]; expiry and `stop` return to
/// it.
#[derive(Debug)]
pub struct SessionTimer {
    state: TimerState,
}

impl Default for SessionTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionTimer {
    pub fn new() -> Self {
        Self {
            state: TimerState::Idle,
        }
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, TimerState::Running { .. })
    }

    /// Starts a countdown and returns the number of seconds remaining.
    pub fn start(&mut self, minutes: SessionMinutes) -> Result<u32, TimerError> {
        if self.is_running() {
            return Err(TimerError::AlreadyRunning);
        }
        let planned = minutes.seconds();
        self.state = TimerState::Running {
            planned,
            remaining: planned,
        };
        Ok(planned)
    }

    /// Advances the countdown by one second.
    pub fn tick(&mut self) -> Tick {
        let TimerState::Running { planned, remaining } = self.state else {
            return Tick::Idle;
        };
        let remaining = remaining.saturating_sub(1);
        self.state = TimerState::Running { planned, remaining };
        if remaining == 0 {
            self.stop(StopReason::Completed)
                .map_or(Tick::Idle, Tick::Expired)
        } else {
            Tick::Running { remaining }
        }
    }

    /// Stops the countdown. Returns `None` if nothing was running.
    pub fn stop(&mut self, reason: StopReason) -> Option<FinishedSession> {
        let TimerState::Running { planned, remaining } = self.state else {
            return None;
        };
        self.state = TimerState::Idle;
        Some(FinishedSession {
            planned,
            elapsed: planned - remaining,
            reason,
        })
    }
}
