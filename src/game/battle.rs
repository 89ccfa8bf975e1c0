use bevy::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::arena::{ArenaBounds, Barrier, generate_barriers, spawn_points};
use super::bot::{Bot, BotId, Side};
use super::components::Velocity;
use super::events::{BattleCommand, BattleEvent, TimerEvent};
use super::planning::PlanningState;
use super::projectile::Projectile;
use super::roster::Rosters;
use super::timer::BattleTimers;
use crate::config::tuning::Tuning;

/// Battle randomness: barrier layout, enemy sweep and wiggle, burst spread.
#[derive(Resource, Debug)]
pub struct BattleRng(pub StdRng);

impl BattleRng {
    /// Seeded from `tuning.seed` when set, from entropy otherwise.
    pub fn from_tuning(tuning: &Tuning) -> Self {
        match tuning.seed {
            Some(seed) => Self(StdRng::seed_from_u64(seed)),
            None => Self(StdRng::seed_from_u64(rand::random())),
        }
    }
}

/// Hands out bot ids. Never rewinds, so ids stay unique across resets.
#[derive(Resource, Debug, Default)]
pub struct BotIdAllocator(u32);

impl BotIdAllocator {
    pub fn issue(&mut self) -> BotId {
        let id = BotId(self.0);
        self.0 += 1;
        id
    }
}

/// Components of one squad member.
pub fn bot_bundle(id: BotId, side: Side, position: Vec2) -> impl Bundle {
    (
        Bot::new(id, side),
        Transform::from_translation(position.extend(1.0)),
        Velocity::default(),
    )
}

/// Start the planning countdown when a time limit is configured.
pub fn arm_countdown(tuning: &Tuning, planning: &mut PlanningState, timers: &mut BattleTimers) {
    if tuning.planning_time_limit_ms > 0.0 && planning.is_planning() {
        let handle = timers.schedule(tuning.planning_time_limit_ms, TimerEvent::PlanningElapsed);
        planning.countdown = Some(handle);
    }
}

/// Spawn a generated barrier layout and both squads in their columns.
fn populate(
    commands: &mut Commands,
    tuning: &Tuning,
    rng: &mut BattleRng,
    ids: &mut BotIdAllocator,
    rosters: &mut Rosters,
) -> usize {
    let barriers = generate_barriers(tuning, &mut rng.0);
    let count = barriers.len();
    commands.spawn_batch(barriers);

    for side in [Side::Player, Side::Enemy] {
        for position in spawn_points(tuning, side) {
            let id = ids.issue();
            commands.spawn(bot_bundle(id, side, position));
            rosters.add(id, side);
        }
    }
    count
}

/// Startup: fresh battle in the planning phase.
pub fn spawn_battle(
    mut commands: Commands,
    tuning: Res<Tuning>,
    mut rng: ResMut<BattleRng>,
    mut ids: ResMut<BotIdAllocator>,
    mut rosters: ResMut<Rosters>,
    mut planning: ResMut<PlanningState>,
    mut timers: ResMut<BattleTimers>,
    mut bounds: ResMut<ArenaBounds>,
) {
    *bounds = ArenaBounds::from_tuning(&tuning);
    let barriers = populate(&mut commands, &tuning, &mut rng, &mut ids, &mut rosters);
    arm_countdown(&tuning, &mut planning, &mut timers);
    info!(
        "Battle ready: {}v{} with {barriers} barriers",
        rosters.player.len(),
        rosters.enemy.len()
    );
}

/// OrderSet: back to a fresh battle with new barriers.
///
/// Outstanding timers are invalidated before anything is respawned, so
/// nothing scheduled in the old world can fire into the new one.
pub fn reset_battle(
    mut commands: Commands,
    mut requests: MessageReader<BattleCommand>,
    tuning: Res<Tuning>,
    mut rng: ResMut<BattleRng>,
    mut ids: ResMut<BotIdAllocator>,
    mut rosters: ResMut<Rosters>,
    mut planning: ResMut<PlanningState>,
    mut timers: ResMut<BattleTimers>,
    mut bounds: ResMut<ArenaBounds>,
    existing: Query<Entity, Or<(With<Bot>, With<Projectile>, With<Barrier>)>>,
    mut events: MessageWriter<BattleEvent>,
) {
    let requested = requests
        .read()
        .filter(|c| matches!(c, BattleCommand::Reset))
        .count()
        > 0;
    if !requested {
        return;
    }

    timers.invalidate_all();
    if tuning.seed.is_some() {
        *rng = BattleRng::from_tuning(&tuning);
    }
    for entity in &existing {
        commands.entity(entity).despawn();
    }
    *bounds = ArenaBounds::from_tuning(&tuning);
    *rosters = Rosters::default();
    *planning = PlanningState::default();

    let barriers = populate(&mut commands, &tuning, &mut rng, &mut ids, &mut rosters);
    arm_countdown(&tuning, &mut planning, &mut timers);
    info!("Battle reset ({barriers} barriers)");
    events.write(BattleEvent::Reset);
}

/// TimerSet: advance the battle clock by one fixed step and publish what came due.
pub fn advance_timers(
    tuning: Res<Tuning>,
    mut timers: ResMut<BattleTimers>,
    mut fired: MessageWriter<TimerEvent>,
) {
    fired.write_batch(timers.advance(tuning.dt * 1000.0));
}
