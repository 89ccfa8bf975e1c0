use bevy::prelude::*;
use rand::Rng;

use crate::config::tuning::Tuning;

const PLACEMENT_ATTEMPTS: usize = 64;
/// Minimum clearance kept between two barriers.
const BARRIER_GAP: f32 = 24.0;

/// Static axis-aligned obstacle. Blocks bots and all projectiles.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Barrier {
    pub center: Vec2,
    pub size: Vec2,
}

impl Barrier {
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self { center, size }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_center_size(self.center, self.size)
    }
}

/// Scatter non-overlapping barriers over the band between the two spawn columns.
///
/// Gives up on a barrier after a bounded number of attempts, so a crowded
/// arena may end up with fewer than `barrier_count`.
pub fn generate_barriers(tuning: &Tuning, rng: &mut impl Rng) -> Vec<Barrier> {
    let half_w = tuning.arena_width * 0.5 - tuning.spawn_margin;
    let half_h = tuning.arena_height * 0.5;
    let min_size = tuning.barrier_min_size.max(1.0);
    let max_size = tuning.barrier_max_size.max(min_size);

    let mut barriers: Vec<Barrier> = Vec::with_capacity(tuning.barrier_count);
    for _ in 0..tuning.barrier_count {
        for _ in 0..PLACEMENT_ATTEMPTS {
            let size = Vec2::new(
                rng.random_range(min_size..=max_size),
                rng.random_range(min_size..=max_size),
            );
            let span = Vec2::new(half_w, half_h) - size * 0.5;
            if span.x <= 0.0 || span.y <= 0.0 {
                break;
            }
            let center = Vec2::new(
                rng.random_range(-span.x..=span.x),
                rng.random_range(-span.y..=span.y),
            );
            let candidate = Barrier::new(center, size);
            let padded = candidate.rect().inflate(BARRIER_GAP);
            if barriers
                .iter()
                .all(|b| padded.intersect(b.rect()).is_empty())
            {
                barriers.push(candidate);
                break;
            }
        }
    }
    barriers
}
