#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure control system translating player intent into world commands.
//!
//! The system mirrors the world's phase machine by observing `PhaseChanged`
//! events, then gates the frame's intent accordingly: slides pass through only
//! while input is awaited, restarts whenever no animation is in flight, and a
//! clock tick is emitted unconditionally.

use std::time::Duration;

use nuclear_synthesis_core::{Command, Direction, Event, Phase};

/// Player intent captured by an adapter for a single frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlayerIntent {
    /// Directional slide requested this frame, if any.
    pub direction: Option<Direction>,
    /// Whether a restart was requested this frame.
    pub restart: bool,
}

impl PlayerIntent {
    /// Intent describing a frame without any player action.
    #[must_use]
    pub const fn idle() -> Self {
        Self {
            direction: None,
            restart: false,
        }
    }
}

/// Pure system gating player input against the tracked gameplay phase.
#[derive(Debug)]
pub struct Control {
    phase: Phase,
}

impl Control {
    /// Creates a control system assuming the world awaits input.
    #[must_use]
    pub fn new() -> Self {
        Self {
            phase: Phase::AwaitingInput,
        }
    }

    /// Consumes the previous frame's events and this frame's intent to emit
    /// the commands driving the next world step.
    pub fn handle(
        &mut self,
        events: &[Event],
        intent: PlayerIntent,
        dt: Duration,
        out: &mut Vec<Command>,
    ) {
        for event in events {
            if let Event::PhaseChanged { phase } = event {
                self.phase = *phase;
            }
        }

        if intent.restart && self.phase != Phase::Animating {
            out.push(Command::StartGame);
        } else if let Some(direction) = intent.direction {
            if self.phase == Phase::AwaitingInput {
                out.push(Command::Slide { direction });
            }
        }

        out.push(Command::Tick { dt });
    }
}

impl Default for Control {
    fn default() -> Self {
        Self::new()
    }
}
