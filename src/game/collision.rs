use bevy::prelude::*;

use super::arena::{ArenaBounds, Barrier};
use super::bot::Bot;
use super::events::Contact;
use super::geometry::{circle_intersects_rect, circles_overlap};
use super::projectile::Projectile;
use crate::config::tuning::Tuning;

/// CollisionDetectSet: Projectile–Barrier, Projectile–Wall, Projectile–Bot.
///
/// Per projectile a barrier hit wins over leaving the arena, which wins
/// over bot overlaps. Overlapping bots are reported in spawn order; the
/// owner is reported too and filtered out by the resolver.
pub fn detect_contacts(
    tuning: Res<Tuning>,
    bounds: Res<ArenaBounds>,
    barriers: Query<&Barrier>,
    bots: Query<(Entity, &Bot, &Transform)>,
    projectiles: Query<(Entity, &Projectile, &Transform)>,
    mut contacts: MessageWriter<Contact>,
) {
    let mut live: Vec<_> = bots
        .iter()
        .filter(|(_, bot, _)| bot.alive)
        .map(|(entity, bot, tf)| (bot.id, entity, tf.translation.truncate()))
        .collect();
    live.sort_by_key(|(id, _, _)| *id);

    for (entity, projectile, tf) in &projectiles {
        if !projectile.is_live() {
            continue;
        }
        let position = tf.translation.truncate();

        if barriers
            .iter()
            .any(|b| circle_intersects_rect(position, tuning.projectile_radius, b.rect()))
        {
            contacts.write(Contact::ProjectileBarrier(entity));
            continue;
        }

        if !bounds.contains(position) {
            contacts.write(Contact::ProjectileOutOfBounds(entity));
            continue;
        }

        for (_, bot, bot_pos) in &live {
            if circles_overlap(position, tuning.projectile_radius, *bot_pos, tuning.bot_radius) {
                contacts.write(Contact::ProjectileBot {
                    projectile: entity,
                    bot: *bot,
                });
            }
        }
    }
}
