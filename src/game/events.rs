use bevy::prelude::*;

use super::bot::{BotId, IntentMode, Side};

/// Overlap reported by collision detection, consumed by the hit resolver.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub enum Contact {
    ProjectileBarrier(Entity),
    ProjectileOutOfBounds(Entity),
    ProjectileBot { projectile: Entity, bot: Entity },
}

/// Scheduled callbacks that came due this step.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub enum TimerEvent {
    RoundEnd,
    ExpireProjectile(Entity),
    /// Planning time ran out; start the round.
    PlanningElapsed,
}

/// Requests from the presentation layer. Applied at the start of the next fixed step.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub enum BattleCommand {
    SetMode { bot: BotId, mode: IntentMode },
    /// Commit an intent of the bot's current mode towards `point`.
    Aim { bot: BotId, point: Vec2 },
    ClearIntent { bot: BotId },
    StartRound,
    Reset,
}

/// Battle lifecycle notifications for presentation and logs.
#[derive(Message, Debug, Clone, PartialEq)]
pub enum BattleEvent {
    RoundStarted { round: u32 },
    RoundEnded { round: u32 },
    BotKilled { bot: BotId, by: BotId },
    GameOver { winner: Side, message: String },
    Reset,
}
