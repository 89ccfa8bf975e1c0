use bevy::prelude::*;

use super::arena::{ArenaBounds, Barrier};
use super::bot::Bot;
use super::components::Velocity;
use super::geometry::push_circle_out_of_rect;
use super::projectile::Projectile;
use crate::config::tuning::Tuning;

/// PhysicsSet: integrate live bots, then resolve overlaps with barriers,
/// each other and the arena walls.
///
/// Collisions shorten planned moves; the plan never overrides physics.
pub fn integrate_bots(
    tuning: Res<Tuning>,
    bounds: Res<ArenaBounds>,
    barriers: Query<&Barrier>,
    mut bots: Query<(&Bot, &mut Transform, &Velocity)>,
) {
    let dt = tuning.dt;
    let radius = tuning.bot_radius;
    let barriers: Vec<Barrier> = barriers.iter().copied().collect();

    for (bot, mut transform, vel) in &mut bots {
        if !bot.alive {
            continue;
        }
        let moved = transform.translation.truncate() + vel.0 * dt;
        let settled = settle(moved, radius, &barriers, *bounds);
        transform.translation.x = settled.x;
        transform.translation.y = settled.y;
    }

    let mut live: Vec<_> = bots
        .iter_mut()
        .filter(|(bot, _, _)| bot.alive)
        .collect();
    live.sort_by_key(|(bot, _, _)| bot.id);
    let positions: Vec<Vec2> = live
        .iter()
        .map(|(_, tf, _)| tf.translation.truncate())
        .collect();
    let corrections = separation(&positions, radius);

    for ((_, transform, _), (position, correction)) in
        live.iter_mut().zip(positions.into_iter().zip(corrections))
    {
        if correction == Vec2::ZERO {
            continue;
        }
        let settled = settle(position + correction, radius, &barriers, *bounds);
        transform.translation.x = settled.x;
        transform.translation.y = settled.y;
    }
}

/// Push a bot out of every barrier and keep it inside the arena.
fn settle(position: Vec2, radius: f32, barriers: &[Barrier], bounds: ArenaBounds) -> Vec2 {
    let mut position = position;
    for barrier in barriers {
        if let Some(push) = push_circle_out_of_rect(position, radius, barrier.rect()) {
            position += push;
        }
    }
    bounds.clamp_circle(position, radius)
}

/// Corrections that split every pairwise overlap evenly between the two bots.
fn separation(positions: &[Vec2], radius: f32) -> Vec<Vec2> {
    let min_dist = radius * 2.0;
    let mut corrections = vec![Vec2::ZERO; positions.len()];

    for i in 0..positions.len() {
        for j in (i + 1)..positions.len() {
            let delta = positions[j] - positions[i];
            let dist = delta.length();
            if dist < min_dist && dist > 0.0 {
                let push = delta / dist * ((min_dist - dist) * 0.5);
                corrections[i] -= push;
                corrections[j] += push;
            }
        }
    }
    corrections
}

/// Integrate projectile movement.
pub fn integrate_projectiles(
    tuning: Res<Tuning>,
    mut query: Query<(&mut Transform, &Velocity), With<Projectile>>,
) {
    let dt = tuning.dt;
    for (mut transform, vel) in &mut query {
        transform.translation.x += vel.0.x * dt;
        transform.translation.y += vel.0.y * dt;
    }
}
