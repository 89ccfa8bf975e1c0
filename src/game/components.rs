use bevy::prelude::*;

use super::bot::BotId;
use super::planning::Phase;

// ── Game phase state ────────────────────────────────────────────────

/// Bevy-side mirror of the battle phase held by `PlanningState`.
#[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GamePhase {
    #[default]
    Planning,
    Executing,
    GameOver,
}

impl From<Phase> for GamePhase {
    fn from(phase: Phase) -> Self {
        match phase {
            Phase::Planning => Self::Planning,
            Phase::Executing => Self::Executing,
            Phase::GameOver => Self::GameOver,
        }
    }
}

// ── Simulation components ───────────────────────────────────────────

#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct Velocity(pub Vec2);

// ── Planning input ──────────────────────────────────────────────────

/// Player bot currently receiving orders.
#[derive(Resource, Default)]
pub struct Selection {
    pub bot: Option<BotId>,
}
