use bevy::prelude::*;

use super::bot::{Bot, BotId};
use super::components::Velocity;
use super::events::{BattleEvent, Contact};
use super::planning::{Phase, PlanningState};
use super::projectile::Projectile;
use super::roster::Rosters;
use super::timer::BattleTimers;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Stale, ownerless, self-inflicted or aimed at a dead bot.
    Ignored,
    Killed { victim: BotId, by: BotId },
}

/// Apply one projectile–bot hit.
///
/// Safe to repeat: a released projectile or a dead bot turns any later
/// hit involving it into `Ignored`.
pub fn resolve_hit(projectile: &mut Projectile, target: &mut Bot, rosters: &mut Rosters) -> HitOutcome {
    if !target.alive {
        return HitOutcome::Ignored;
    }
    let Some(owner) = projectile.owner else {
        return HitOutcome::Ignored;
    };
    // No self-damage; friendly fire between different bots is allowed.
    if owner == target.id {
        return HitOutcome::Ignored;
    }

    target.alive = false;
    projectile.release();
    rosters.remove(target.id, target.side);

    HitOutcome::Killed {
        victim: target.id,
        by: owner,
    }
}

/// ResolveSet: turn contacts into kills, projectile removal and the win check.
pub fn resolve_contacts(
    mut commands: Commands,
    mut contacts: MessageReader<Contact>,
    mut planning: ResMut<PlanningState>,
    mut rosters: ResMut<Rosters>,
    mut timers: ResMut<BattleTimers>,
    mut projectiles: Query<&mut Projectile>,
    mut bots: Query<(&mut Bot, &mut Velocity)>,
    mut events: MessageWriter<BattleEvent>,
) {
    for contact in contacts.read() {
        if planning.phase() == Phase::GameOver {
            continue;
        }
        match *contact {
            Contact::ProjectileBarrier(entity) | Contact::ProjectileOutOfBounds(entity) => {
                if let Ok(mut projectile) = projectiles.get_mut(entity) {
                    if projectile.release() {
                        commands.entity(entity).try_despawn();
                    }
                }
            }
            Contact::ProjectileBot { projectile, bot } => {
                let (Ok(mut shot), Ok((mut target, mut velocity))) =
                    (projectiles.get_mut(projectile), bots.get_mut(bot))
                else {
                    continue;
                };
                let HitOutcome::Killed { victim, by } =
                    resolve_hit(&mut shot, &mut target, &mut rosters)
                else {
                    continue;
                };

                velocity.0 = Vec2::ZERO;
                commands.entity(projectile).try_despawn();
                info!("{victim:?} killed by {by:?}");
                events.write(BattleEvent::BotKilled { bot: victim, by });
                planning.mark_dirty();

                if let Some(winner) = rosters.winner() {
                    for handle in planning.finish(winner) {
                        timers.cancel(handle);
                    }
                    let message = planning.message().unwrap_or_default();
                    info!("Game over: {message}");
                    events.write(BattleEvent::GameOver {
                        winner,
                        message: message.to_string(),
                    });
                }
            }
        }
    }
}
