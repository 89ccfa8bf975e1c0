use bevy::prelude::*;

use crate::config::tuning::Tuning;
use crate::game::bot::Side;

/// Rectangular arena centred on the origin.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct ArenaBounds {
    pub width: f32,
    pub height: f32,
}

impl ArenaBounds {
    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self {
            width: tuning.arena_width.max(1.0),
            height: tuning.arena_height.max(1.0),
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_center_size(Vec2::ZERO, Vec2::new(self.width, self.height))
    }

    pub fn contains(&self, point: Vec2) -> bool {
        self.rect().contains(point)
    }

    /// Keep a circle fully inside the arena.
    pub fn clamp_circle(&self, center: Vec2, radius: f32) -> Vec2 {
        let half = Vec2::new(self.width, self.height) * 0.5;
        let inner = (half - Vec2::splat(radius)).max(Vec2::ZERO);
        center.clamp(-inner, inner)
    }
}

/// Evenly spaced spawn points in the side's column (player left, enemy right).
pub fn spawn_points(tuning: &Tuning, side: Side) -> Vec<Vec2> {
    let bounds = ArenaBounds::from_tuning(tuning);
    let count = tuning.squad_size;
    let column = tuning.spawn_margin.min(bounds.width * 0.5) * 0.5;
    let x = match side {
        Side::Player => -bounds.width * 0.5 + column,
        Side::Enemy => bounds.width * 0.5 - column,
    };
    let spacing = bounds.height / (count as f32 + 1.0);
    (0..count)
        .map(|i| Vec2::new(x, bounds.height * 0.5 - spacing * (i as f32 + 1.0)))
        .collect()
}
