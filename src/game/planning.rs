use bevy::prelude::*;

use super::bot::Side;
use super::timer::TimerHandle;

pub const WIN_MESSAGE: &str = "You win!";
pub const LOSE_MESSAGE: &str = "You lose!";

/// Round state machine: Planning -> Executing -> Planning, GameOver is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Planning,
    Executing,
    GameOver,
}

/// Per-round bookkeeping and the authoritative battle phase.
#[derive(Resource, Debug, Clone)]
pub struct PlanningState {
    phase: Phase,
    /// Side whose intents come from the player.
    pub controlling_side: Side,
    /// Intents or world changed since presentation last redrew previews.
    dirty: bool,
    round: u32,
    pub round_timer: Option<TimerHandle>,
    /// Auto-start countdown while planning, when enabled.
    pub countdown: Option<TimerHandle>,
    winner: Option<Side>,
}

impl Default for PlanningState {
    fn default() -> Self {
        Self {
            phase: Phase::Planning,
            controlling_side: Side::Player,
            dirty: true,
            round: 0,
            round_timer: None,
            countdown: None,
            winner: None,
        }
    }
}

impl PlanningState {
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn winner(&self) -> Option<Side> {
        self.winner
    }

    /// Win/lose line from the controlling side's point of view.
    pub fn message(&self) -> Option<&'static str> {
        self.winner.map(|w| {
            if w == self.controlling_side {
                WIN_MESSAGE
            } else {
                LOSE_MESSAGE
            }
        })
    }

    pub fn is_planning(&self) -> bool {
        self.phase == Phase::Planning
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Planning -> Executing. Returns the new round number.
    pub fn begin_execution(&mut self, round_timer: TimerHandle) -> Option<u32> {
        if self.phase != Phase::Planning {
            return None;
        }
        self.phase = Phase::Executing;
        self.round += 1;
        self.round_timer = Some(round_timer);
        self.countdown = None;
        self.dirty = true;
        Some(self.round)
    }

    /// Executing -> Planning. False (and no change) from any other phase.
    pub fn end_execution(&mut self) -> bool {
        if self.phase != Phase::Executing {
            return false;
        }
        self.phase = Phase::Planning;
        self.round_timer = None;
        self.dirty = true;
        true
    }

    /// Enter the terminal phase. Returns the timers that must be cancelled.
    pub fn finish(&mut self, winner: Side) -> Vec<TimerHandle> {
        self.phase = Phase::GameOver;
        self.winner = Some(winner);
        self.dirty = true;
        self.round_timer
            .take()
            .into_iter()
            .chain(self.countdown.take())
            .collect()
    }
}
