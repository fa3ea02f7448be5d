//! Transition state machine for one viewer session.
//!
//! Exactly one tracker exists per session. Requests arriving out of order
//! (a second present, a dismiss while an animation is in flight, repeated
//! dismiss taps) are rejected with a typed error instead of being left
//! unspecified.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionState {
    Idle,
    Presenting,
    Presented,
    Dismissing,
    /// Terminal. A dismissed session never animates again.
    Dismissed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("viewer transition '{requested}' rejected while {current:?}")]
pub struct TransitionError {
    pub current: TransitionState,
    pub requested: &'static str,
}

#[derive(Debug)]
pub struct TransitionTracker {
    state: TransitionState,
}

impl TransitionTracker {
    pub fn new() -> Self {
        Self {
            state: TransitionState::Idle,
        }
    }

    pub fn state(&self) -> TransitionState {
        self.state
    }

    fn step(
        &mut self,
        from: TransitionState,
        to: TransitionState,
        requested: &'static str,
    ) -> Result<(), TransitionError> {
        if self.state == from {
            self.state = to;
            Ok(())
        } else {
            Err(TransitionError {
                current: self.state,
                requested,
            })
        }
    }

    pub fn begin_present(&mut self) -> Result<(), TransitionError> {
        self.step(TransitionState::Idle, TransitionState::Presenting, "present")
    }

    pub fn finish_present(&mut self) -> Result<(), TransitionError> {
        self.step(
            TransitionState::Presenting,
            TransitionState::Presented,
            "finish-present",
        )
    }

    pub fn begin_dismiss(&mut self) -> Result<(), TransitionError> {
        self.step(
            TransitionState::Presented,
            TransitionState::Dismissing,
            "dismiss",
        )
    }

    pub fn finish_dismiss(&mut self) -> Result<(), TransitionError> {
        self.step(
            TransitionState::Dismissing,
            TransitionState::Dismissed,
            "finish-dismiss",
        )
    }
}

impl Default for TransitionTracker {
    fn default() -> Self {
        Self::new()
    }
}
