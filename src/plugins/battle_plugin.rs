use bevy::prelude::*;

use crate::config::tuning::Tuning;
use crate::game::{
    arena::ArenaBounds,
    battle::{self, BattleRng, BotIdAllocator},
    collision,
    combat,
    components::GamePhase,
    events::{BattleCommand, BattleEvent, Contact, TimerEvent},
    executor, orders, physics,
    planning::{Phase, PlanningState},
    roster::Rosters,
    timer::BattleTimers,
};

// ── SystemSets (strict FixedUpdate ordering) ────────────────────────

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum BattleSet {
    OrderSet,
    PhysicsSet,
    CollisionDetectSet,
    ResolveSet,
    TimerSet,
    RoundSet,
}

/// Headless round-resolution core: resources, messages and the fixed step.
pub struct BattlePlugin;

impl Plugin for BattlePlugin {
    fn build(&self, app: &mut App) {
        if !app.world().contains_resource::<Tuning>() {
            app.insert_resource(Tuning::default());
        }
        let tuning = app.world().resource::<Tuning>().clone();
        app.insert_resource(BattleRng::from_tuning(&tuning));
        app.insert_resource(ArenaBounds::from_tuning(&tuning));
        app.init_resource::<BotIdAllocator>();
        app.init_resource::<Rosters>();
        app.init_resource::<PlanningState>();
        app.init_resource::<BattleTimers>();

        app.add_message::<BattleCommand>();
        app.add_message::<Contact>();
        app.add_message::<TimerEvent>();
        app.add_message::<BattleEvent>();
        app.init_state::<GamePhase>();

        app.configure_sets(
            FixedUpdate,
            (
                BattleSet::OrderSet,
                BattleSet::PhysicsSet.run_if(executing),
                BattleSet::CollisionDetectSet.run_if(executing),
                BattleSet::ResolveSet.run_if(in_play),
                BattleSet::TimerSet.run_if(in_play),
                BattleSet::RoundSet,
            )
                .chain(),
        );

        app.add_systems(Startup, battle::spawn_battle);

        // OrderSet — reset last so it discards orders given in the same step
        app.add_systems(
            FixedUpdate,
            (orders::apply_orders, battle::reset_battle)
                .chain()
                .in_set(BattleSet::OrderSet),
        );

        // PhysicsSet
        app.add_systems(
            FixedUpdate,
            (physics::integrate_bots, physics::integrate_projectiles)
                .chain()
                .in_set(BattleSet::PhysicsSet),
        );

        // CollisionDetectSet
        app.add_systems(
            FixedUpdate,
            collision::detect_contacts.in_set(BattleSet::CollisionDetectSet),
        );

        // ResolveSet
        app.add_systems(
            FixedUpdate,
            combat::resolve_contacts.in_set(BattleSet::ResolveSet),
        );

        // TimerSet
        app.add_systems(
            FixedUpdate,
            (
                battle::advance_timers,
                executor::end_round,
                executor::expire_projectiles,
            )
                .chain()
                .in_set(BattleSet::TimerSet),
        );

        // RoundSet
        app.add_systems(
            FixedUpdate,
            executor::start_round.in_set(BattleSet::RoundSet),
        );

        app.add_systems(Update, sync_phase);
    }
}

fn executing(planning: Res<PlanningState>) -> bool {
    planning.phase() == Phase::Executing
}

fn in_play(planning: Res<PlanningState>) -> bool {
    planning.phase() != Phase::GameOver
}

/// Mirror the core phase into the Bevy state machine.
fn sync_phase(
    planning: Res<PlanningState>,
    state: Res<State<GamePhase>>,
    mut next_state: ResMut<NextState<GamePhase>>,
) {
    let wanted = GamePhase::from(planning.phase());
    if *state.get() != wanted {
        next_state.set(wanted);
    }
}
