//! Opposing-side planner.
//!
//! Every enemy bot independently picks the nearest player bot, then either
//! shoots at it (when in range and a coin flip says so) or plans a move
//! towards it. Moves avoid barriers with a greedy angular sweep around the
//! line of sight; when every heading is blocked the bot wiggles in a random
//! direction instead of standing still.

use bevy::prelude::*;
use rand::Rng;

use super::arena::Barrier;
use super::bot::{Bot, BotAction};
use super::geometry::{direction_to, heading_deg, rotate_deg, segment_intersects_rect};
use crate::config::tuning::Tuning;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlannerParams {
    pub max_move_distance: f32,
    pub min_move_distance: f32,
    pub shoot_preview_length: f32,
    pub shoot_range_multiplier: f32,
    pub sweep_step_deg: f32,
    pub wiggle_min_distance: f32,
    pub wiggle_max_distance: f32,
}

impl PlannerParams {
    pub fn from_tuning(tuning: &Tuning) -> Self {
        Self {
            max_move_distance: tuning.max_move_distance,
            min_move_distance: tuning.min_move_distance,
            shoot_preview_length: tuning.shoot_preview_length,
            shoot_range_multiplier: tuning.shoot_range_multiplier,
            sweep_step_deg: tuning.sweep_step_deg,
            wiggle_min_distance: tuning.wiggle_min_distance,
            wiggle_max_distance: tuning.wiggle_max_distance,
        }
    }

    pub fn shoot_range(&self) -> f32 {
        self.shoot_preview_length * self.shoot_range_multiplier
    }
}

impl Default for PlannerParams {
    fn default() -> Self {
        Self::from_tuning(&Tuning::default())
    }
}

/// Index of the closest point to `origin`. Ties go to the first one seen.
pub fn nearest_target(origin: Vec2, candidates: &[Vec2]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, p) in candidates.iter().enumerate() {
        let d = origin.distance(*p);
        match best {
            Some((_, best_d)) if d >= best_d => {}
            _ => best = Some((i, d)),
        }
    }
    best.map(|(i, _)| i)
}

/// Whether the straight path `from`–`to` clears every barrier.
pub fn path_is_clear(from: Vec2, to: Vec2, barriers: &[Barrier]) -> bool {
    barriers
        .iter()
        .all(|b| !segment_intersects_rect(from, to, b.rect()))
}

/// Uniform sample from `[lo, hi]`, tolerating an inverted or empty range.
fn sample_range(rng: &mut impl Rng, lo: f32, hi: f32) -> f32 {
    if hi > lo {
        rng.random_range(lo..=hi)
    } else {
        hi.max(0.0)
    }
}

/// Plan a single bot at `origin`. None when there is nothing to target.
pub fn plan_bot(
    origin: Vec2,
    friendlies: &[Vec2],
    barriers: &[Barrier],
    params: &PlannerParams,
    rng: &mut impl Rng,
) -> Option<BotAction> {
    let target = friendlies[nearest_target(origin, friendlies)?];
    let direction = direction_to(origin, target);

    if origin.distance(target) <= params.shoot_range() && rng.random_bool(0.5) {
        return Some(BotAction::shoot_from(
            origin,
            direction,
            params.shoot_preview_length,
        ));
    }

    let distance = sample_range(
        rng,
        params.min_move_distance.min(params.max_move_distance),
        params.max_move_distance,
    );
    if let Some(heading) = first_clear_heading(origin, direction, distance, barriers, params) {
        return Some(BotAction::move_from(
            origin,
            heading,
            distance,
            params.max_move_distance,
        ));
    }

    let heading = heading_deg(rng.random_range(0..360u32) as f32);
    let wiggle = sample_range(rng, params.wiggle_min_distance, params.wiggle_max_distance);
    Some(BotAction::move_from(
        origin,
        heading,
        wiggle,
        params.max_move_distance,
    ))
}

/// Sweep headings outward from `direction` in fixed steps over a full turn.
fn first_clear_heading(
    origin: Vec2,
    direction: Vec2,
    distance: f32,
    barriers: &[Barrier],
    params: &PlannerParams,
) -> Option<Vec2> {
    let step = if params.sweep_step_deg > 0.0 {
        params.sweep_step_deg
    } else {
        360.0
    };
    let steps = (360.0 / step).ceil() as u32;

    (0..steps)
        .map(|i| rotate_deg(direction, step * i as f32))
        .find(|heading| path_is_clear(origin, origin + *heading * distance, barriers))
}

/// Fill in intents for every hostile bot. No-op when there are no friendlies.
///
/// Each bot is planned from its own current position; hostiles keep their
/// previous intent when there is nothing to aim at.
pub fn plan<'a>(
    friendlies: &[Vec2],
    hostiles: impl IntoIterator<Item = (Vec2, &'a mut Bot)>,
    barriers: &[Barrier],
    params: &PlannerParams,
    rng: &mut impl Rng,
) {
    if friendlies.is_empty() {
        return;
    }
    for (origin, bot) in hostiles {
        if let Some(action) = plan_bot(origin, friendlies, barriers, params, rng) {
            bot.commit(action);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::bot::{BotId, Side};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn far_target() -> Vec2 {
        Vec2::new(1000.0, 0.0)
    }

    #[test]
    fn picks_nearest_friendly() {
        let friendlies = [Vec2::new(10.0, 0.0), Vec2::new(5.0, 0.0)];
        assert_eq!(nearest_target(Vec2::ZERO, &friendlies), Some(1));
    }

    #[test]
    fn ties_go_to_first_seen() {
        let friendlies = [Vec2::new(0.0, 5.0), Vec2::new(5.0, 0.0)];
        assert_eq!(nearest_target(Vec2::ZERO, &friendlies), Some(0));
        assert_eq!(nearest_target(Vec2::ZERO, &[]), None);
    }

    #[test]
    fn overlapping_target_heads_along_x() {
        let params = PlannerParams::default();
        for seed in 0..16 {
            let mut rng = StdRng::seed_from_u64(seed);
            let action = plan_bot(Vec2::ZERO, &[Vec2::ZERO], &[], &params, &mut rng).unwrap();
            assert_eq!(action.direction(), Some(Vec2::new(1.0, 0.0)));
        }
    }

    #[test]
    fn clear_line_moves_straight_at_target() {
        let params = PlannerParams::default();
        let mut rng = StdRng::seed_from_u64(1);
        let action = plan_bot(Vec2::ZERO, &[far_target()], &[], &params, &mut rng).unwrap();
        let BotAction::Move {
            direction,
            distance,
            target,
        } = action
        else {
            panic!("expected a move, got {action:?}");
        };
        assert_eq!(direction, Vec2::new(1.0, 0.0));
        assert!((params.min_move_distance..=params.max_move_distance).contains(&distance));
        assert!((target - direction * distance).length() < 1e-4);
    }

    #[test]
    fn blocked_line_of_sight_sweeps_around_barrier() {
        let params = PlannerParams::default();
        let wall = Barrier::new(Vec2::new(70.0, 0.0), Vec2::new(20.0, 200.0));
        for seed in 0..16 {
            let mut rng = StdRng::seed_from_u64(seed);
            let action = plan_bot(Vec2::ZERO, &[far_target()], &[wall], &params, &mut rng).unwrap();
            let BotAction::Move {
                direction,
                distance,
                target,
            } = action
            else {
                panic!("expected a move, got {action:?}");
            };
            assert_ne!(direction, Vec2::new(1.0, 0.0));
            assert!((direction.length() - 1.0).abs() < 1e-5);
            assert!((params.min_move_distance..=params.max_move_distance).contains(&distance));
            assert!(!segment_intersects_rect(Vec2::ZERO, target, wall.rect()));
        }
    }

    #[test]
    fn sweep_takes_the_next_heading_when_only_line_of_sight_is_blocked() {
        let params = PlannerParams::default();
        // Blocks the 0° path for every candidate distance; the 15° path
        // passes above it.
        let wall = Barrier::new(Vec2::new(45.0, 0.0), Vec2::new(10.0, 10.0));
        let aim = direction_to(Vec2::ZERO, far_target());
        for seed in 0..16 {
            let mut rng = StdRng::seed_from_u64(seed);
            let action = plan_bot(Vec2::ZERO, &[far_target()], &[wall], &params, &mut rng).unwrap();
            let BotAction::Move {
                direction,
                distance,
                target,
            } = action
            else {
                panic!("expected a move, got {action:?}");
            };
            assert_eq!(direction, rotate_deg(aim, 15.0));
            assert!((target - direction * distance).length() < 1e-4);
        }
    }

    #[test]
    fn sweep_takes_the_first_clear_heading_in_scan_order() {
        let params = PlannerParams::default();
        let walls = [
            Barrier::new(Vec2::new(45.0, 8.0), Vec2::new(10.0, 30.0)),
            Barrier::new(Vec2::new(0.0, -60.0), Vec2::new(200.0, 10.0)),
        ];
        let origin = Vec2::ZERO;
        let aim = direction_to(origin, far_target());
        for seed in 0..16 {
            let mut rng = StdRng::seed_from_u64(seed);
            let action = plan_bot(origin, &[far_target()], &walls, &params, &mut rng).unwrap();
            let BotAction::Move {
                direction,
                distance,
                target,
            } = action
            else {
                panic!("expected a move, got {action:?}");
            };
            let steps = (360.0 / params.sweep_step_deg).ceil() as u32;
            let first_clear = (0..steps)
                .map(|i| rotate_deg(aim, params.sweep_step_deg * i as f32))
                .find(|h| path_is_clear(origin, origin + *h * distance, &walls))
                .unwrap();
            assert_ne!(first_clear, aim);
            assert_eq!(direction, first_clear);
            assert!((target - (origin + direction * distance)).length() < 1e-4);
        }
    }

    #[test]
    fn fully_boxed_in_bot_wiggles() {
        let params = PlannerParams::default();
        let walls = [
            Barrier::new(Vec2::new(0.0, 35.0), Vec2::new(100.0, 10.0)),
            Barrier::new(Vec2::new(0.0, -35.0), Vec2::new(100.0, 10.0)),
            Barrier::new(Vec2::new(35.0, 0.0), Vec2::new(10.0, 100.0)),
            Barrier::new(Vec2::new(-35.0, 0.0), Vec2::new(10.0, 100.0)),
        ];
        // Out of shooting range, along a non-integer heading.
        let target = Vec2::new(300.0, 700.0);
        let aim = direction_to(Vec2::ZERO, target);
        for seed in 0..16 {
            let mut rng = StdRng::seed_from_u64(seed);
            let action = plan_bot(Vec2::ZERO, &[target], &walls, &params, &mut rng).unwrap();
            let BotAction::Move {
                direction,
                distance,
                ..
            } = action
            else {
                panic!("expected a move, got {action:?}");
            };
            assert!((direction - aim).length() > 1e-3);
            assert!((direction.length() - 1.0).abs() < 1e-5);
            assert!((params.wiggle_min_distance..=params.wiggle_max_distance).contains(&distance));
        }
    }

    #[test]
    fn in_range_bots_either_shoot_or_move() {
        let params = PlannerParams::default();
        let target = Vec2::new(200.0, 0.0);
        let mut shots = 0;
        let mut moves = 0;
        for seed in 0..64 {
            let mut rng = StdRng::seed_from_u64(seed);
            match plan_bot(Vec2::ZERO, &[target], &[], &params, &mut rng).unwrap() {
                BotAction::Shoot { direction, target } => {
                    assert_eq!(direction, Vec2::new(1.0, 0.0));
                    assert_eq!(target, Vec2::new(params.shoot_preview_length, 0.0));
                    shots += 1;
                }
                BotAction::Move { distance, .. } => {
                    assert!(distance <= params.max_move_distance);
                    moves += 1;
                }
                BotAction::None => panic!("planner must commit an intent"),
            }
        }
        assert!(shots > 0 && moves > 0);
    }

    #[test]
    fn no_friendlies_leaves_intents_alone() {
        let params = PlannerParams::default();
        let mut rng = StdRng::seed_from_u64(5);
        let mut a = Bot::new(BotId(1), Side::Enemy);
        let mut b = Bot::new(BotId(2), Side::Enemy);
        let kept = BotAction::shoot_from(Vec2::ONE, Vec2::Y, 120.0);
        b.commit(kept);
        plan(
            &[],
            [(Vec2::ZERO, &mut a), (Vec2::ONE, &mut b)],
            &[],
            &params,
            &mut rng,
        );
        assert!(a.action.is_none());
        assert_eq!(b.action, kept);
    }

    #[test]
    fn every_hostile_gets_an_intent() {
        let params = PlannerParams::default();
        let mut rng = StdRng::seed_from_u64(9);
        let mut bots: Vec<Bot> = (0..5).map(|i| Bot::new(BotId(i), Side::Enemy)).collect();
        let friendlies = [Vec2::new(-400.0, 0.0), Vec2::new(-400.0, 100.0)];
        plan(
            &friendlies,
            bots.iter_mut()
                .enumerate()
                .map(|(i, bot)| (Vec2::new(400.0, i as f32 * 60.0), bot)),
            &[],
            &params,
            &mut rng,
        );
        for bot in &bots {
            let dir = bot.action.direction().unwrap();
            assert!((dir.length() - 1.0).abs() < 1e-5);
            if let BotAction::Move { distance, .. } = bot.action {
                assert!((0.0..=params.max_move_distance).contains(&distance));
            }
        }
    }
}
