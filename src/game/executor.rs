use bevy::prelude::*;
use rand::Rng;

use super::arena::Barrier;
use super::battle::{BattleRng, arm_countdown};
use super::bot::{Bot, BotAction, BotId};
use super::components::Velocity;
use super::events::{BattleCommand, BattleEvent, TimerEvent};
use super::geometry::rotate_deg;
use super::planner::{self, PlannerParams};
use super::planning::PlanningState;
use super::projectile::Projectile;
use super::timer::BattleTimers;
use crate::config::tuning::Tuning;

/// Velocity that covers `distance` in exactly one round.
pub fn move_velocity(direction: Vec2, distance: f32, round_secs: f32) -> Vec2 {
    if round_secs <= 0.0 {
        return Vec2::ZERO;
    }
    direction * (distance / round_secs)
}

/// Pellet headings of one shotgun burst, each within `±spread_deg` of `direction`.
pub fn burst_headings(direction: Vec2, tuning: &Tuning, rng: &mut impl Rng) -> Vec<Vec2> {
    let spread = tuning.spread_deg.abs();
    (0..tuning.burst_count)
        .map(|_| {
            let offset = if spread > 0.0 {
                rng.random_range(-spread..=spread)
            } else {
                0.0
            };
            rotate_deg(direction, offset)
        })
        .collect()
}

/// Components of one in-flight pellet.
pub fn projectile_bundle(owner: BotId, position: Vec2, velocity: Vec2) -> impl Bundle {
    (
        Projectile::new(owner),
        Transform::from_translation(position.extend(0.5)),
        Velocity(velocity),
    )
}

/// RoundSet: on a start request or an elapsed planning countdown, plan the
/// opposing side, turn every committed intent into motion or projectiles
/// and arm the round timer.
pub fn start_round(
    mut commands: Commands,
    mut requests: MessageReader<BattleCommand>,
    mut fired: MessageReader<TimerEvent>,
    tuning: Res<Tuning>,
    mut planning: ResMut<PlanningState>,
    mut timers: ResMut<BattleTimers>,
    mut rng: ResMut<BattleRng>,
    barriers: Query<&Barrier>,
    mut bots: Query<(&mut Bot, &Transform, &mut Velocity)>,
    mut events: MessageWriter<BattleEvent>,
) {
    let requested = requests
        .read()
        .filter(|c| matches!(c, BattleCommand::StartRound))
        .count()
        > 0;
    let elapsed = fired
        .read()
        .filter(|e| matches!(e, TimerEvent::PlanningElapsed))
        .count()
        > 0;
    if !requested && !elapsed {
        return;
    }
    if !planning.is_planning() {
        debug!("Ignoring round start in {:?}", planning.phase());
        return;
    }
    if let Some(countdown) = planning.countdown.take() {
        timers.cancel(countdown);
    }

    let rng = &mut rng.0;
    let controlling = planning.controlling_side;
    let friendlies: Vec<Vec2> = bots
        .iter()
        .filter(|(bot, _, _)| bot.alive && bot.side == controlling)
        .map(|(_, tf, _)| tf.translation.truncate())
        .collect();
    let barriers: Vec<Barrier> = barriers.iter().copied().collect();
    let mut hostiles: Vec<_> = bots
        .iter_mut()
        .filter(|(bot, _, _)| bot.alive && bot.side == controlling.opponent())
        .map(|(bot, tf, _)| (bot.id, tf.translation.truncate(), bot.into_inner()))
        .collect();
    hostiles.sort_by_key(|(id, _, _)| *id);
    planner::plan(
        &friendlies,
        hostiles.into_iter().map(|(_, origin, bot)| (origin, bot)),
        &barriers,
        &PlannerParams::from_tuning(&tuning),
        rng,
    );

    let round_secs = tuning.round_secs();
    let lifetime_ms = tuning.bullet_lifetime_ms();
    let mut volleys = 0;
    let mut live: Vec<_> = bots.iter_mut().filter(|(bot, _, _)| bot.alive).collect();
    live.sort_by_key(|(bot, _, _)| bot.id);
    for (bot, tf, mut velocity) in live {
        let position = tf.translation.truncate();
        match bot.action {
            BotAction::Move {
                direction,
                distance,
                ..
            } => {
                velocity.0 = move_velocity(direction, distance, round_secs);
            }
            BotAction::Shoot { direction, .. } => {
                for heading in burst_headings(direction, &tuning, rng) {
                    let pellet = commands
                        .spawn(projectile_bundle(
                            bot.id,
                            position + heading * tuning.bullet_start_offset,
                            heading * tuning.bullet_speed,
                        ))
                        .id();
                    timers.schedule(lifetime_ms, TimerEvent::ExpireProjectile(pellet));
                }
                volleys += 1;
            }
            BotAction::None => {}
        }
    }

    let round_timer = timers.schedule(tuning.round_duration_ms, TimerEvent::RoundEnd);
    let Some(round) = planning.begin_execution(round_timer) else {
        timers.cancel(round_timer);
        return;
    };
    info!(
        "Round {round} started: {volleys} volleys, {} timers armed",
        timers.len()
    );
    events.write(BattleEvent::RoundStarted { round });
}

/// TimerSet: stop survivors, wipe their plans and clear the field of projectiles.
pub fn end_round(
    mut commands: Commands,
    mut fired: MessageReader<TimerEvent>,
    tuning: Res<Tuning>,
    mut planning: ResMut<PlanningState>,
    mut timers: ResMut<BattleTimers>,
    mut bots: Query<(&mut Bot, &mut Velocity)>,
    projectiles: Query<Entity, With<Projectile>>,
    mut events: MessageWriter<BattleEvent>,
) {
    let due = fired
        .read()
        .filter(|e| matches!(e, TimerEvent::RoundEnd))
        .count()
        > 0;
    if !due || !planning.end_execution() {
        return;
    }

    for (mut bot, mut velocity) in &mut bots {
        if bot.alive {
            velocity.0 = Vec2::ZERO;
            bot.clear_plan();
        }
    }
    for entity in &projectiles {
        commands.entity(entity).try_despawn();
    }
    arm_countdown(&tuning, &mut planning, &mut timers);

    let round = planning.round();
    info!("Round {round} ended");
    events.write(BattleEvent::RoundEnded { round });
}

/// TimerSet: remove pellets whose lifetime ran out. Stale ids are ignored.
pub fn expire_projectiles(
    mut commands: Commands,
    mut fired: MessageReader<TimerEvent>,
    mut projectiles: Query<&mut Projectile>,
) {
    for event in fired.read() {
        if let TimerEvent::ExpireProjectile(entity) = *event {
            if let Ok(mut projectile) = projectiles.get_mut(entity) {
                projectile.release();
                commands.entity(entity).try_despawn();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::bot::Side;
    use crate::game::planning::Phase;
    use bevy::ecs::system::RunSystemOnce;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn world(tuning: Tuning) -> World {
        let mut world = World::new();
        world.insert_resource(tuning);
        world.init_resource::<PlanningState>();
        world.init_resource::<BattleTimers>();
        world.insert_resource(BattleRng(StdRng::seed_from_u64(4)));
        world.init_resource::<Messages<BattleCommand>>();
        world.init_resource::<Messages<TimerEvent>>();
        world.init_resource::<Messages<BattleEvent>>();
        world
    }

    fn spawn_bot(world: &mut World, id: u32, side: Side, position: Vec2) -> Entity {
        world
            .spawn((
                Bot::new(BotId(id), side),
                Transform::from_translation(position.extend(1.0)),
                Velocity::default(),
            ))
            .id()
    }

    fn start(world: &mut World) {
        world.write_message(BattleCommand::StartRound);
        world.run_system_once(start_round).unwrap();
    }

    fn pellets(world: &mut World) -> Vec<(Projectile, Vec2, Vec2)> {
        world
            .query::<(&Projectile, &Transform, &Velocity)>()
            .iter(world)
            .map(|(p, tf, v)| (*p, tf.translation.truncate(), v.0))
            .collect()
    }

    #[test]
    fn movers_cover_their_distance_over_the_round() {
        let mut world = world(Tuning::default());
        let bot = spawn_bot(&mut world, 0, Side::Player, Vec2::ZERO);
        world
            .get_mut::<Bot>(bot)
            .unwrap()
            .commit(BotAction::move_from(Vec2::ZERO, Vec2::Y, 100.0, 180.0));

        start(&mut world);

        let v = world.get::<Velocity>(bot).unwrap().0;
        assert!((v - Vec2::new(0.0, 50.0)).length() < 1e-4);
        assert!(pellets(&mut world).is_empty());
        assert_eq!(world.resource::<BattleTimers>().len(), 1);
        assert_eq!(world.resource::<PlanningState>().phase(), Phase::Executing);
    }

    #[test]
    fn shooters_fire_a_spread_burst() {
        let tuning = Tuning::default();
        let mut world = world(tuning.clone());
        let origin = Vec2::new(10.0, 10.0);
        let bot = spawn_bot(&mut world, 3, Side::Player, origin);
        world
            .get_mut::<Bot>(bot)
            .unwrap()
            .commit(BotAction::shoot_from(origin, Vec2::X, 120.0));

        start(&mut world);

        let pellets = pellets(&mut world);
        assert_eq!(pellets.len(), tuning.burst_count as usize);
        let max_offset = tuning.spread_deg.to_radians().cos();
        for (p, position, velocity) in pellets {
            assert_eq!(p.owner, Some(BotId(3)));
            let heading = velocity.normalize();
            assert!((velocity.length() - tuning.bullet_speed).abs() < 1e-2);
            assert!(heading.dot(Vec2::X) >= max_offset - 1e-5);
            let from_bot = position - origin;
            assert!((from_bot.length() - tuning.bullet_start_offset).abs() < 1e-3);
            assert!((from_bot.normalize() - heading).length() < 1e-4);
        }
        // One expiry per pellet plus the round timer.
        assert_eq!(
            world.resource::<BattleTimers>().len(),
            tuning.burst_count as usize + 1
        );
        assert_eq!(world.get::<Velocity>(bot), Some(&Velocity(Vec2::ZERO)));
    }

    #[test]
    fn round_start_plans_every_enemy() {
        let mut world = world(Tuning::default());
        spawn_bot(&mut world, 0, Side::Player, Vec2::new(-400.0, 0.0));
        let enemies = [
            spawn_bot(&mut world, 1, Side::Enemy, Vec2::new(400.0, 0.0)),
            spawn_bot(&mut world, 2, Side::Enemy, Vec2::new(400.0, 100.0)),
        ];

        start(&mut world);

        for enemy in enemies {
            assert!(matches!(
                world.get::<Bot>(enemy).unwrap().action,
                BotAction::Move { .. }
            ));
            assert!(world.get::<Velocity>(enemy).unwrap().0.length() > 0.0);
        }
        let started: Vec<_> = world
            .resource::<Messages<BattleEvent>>()
            .iter_current_update_messages()
            .cloned()
            .collect();
        assert_eq!(started, vec![BattleEvent::RoundStarted { round: 1 }]);
    }

    #[test]
    fn idle_and_dead_bots_do_nothing() {
        let mut world = world(Tuning::default());
        spawn_bot(&mut world, 0, Side::Player, Vec2::ZERO);
        let dead = spawn_bot(&mut world, 1, Side::Player, Vec2::ZERO);
        {
            let mut bot = world.get_mut::<Bot>(dead).unwrap();
            bot.commit(BotAction::shoot_from(Vec2::ZERO, Vec2::X, 120.0));
            bot.alive = false;
        }

        start(&mut world);

        assert!(pellets(&mut world).is_empty());
        let moving = world
            .query::<&Velocity>()
            .iter(&world)
            .any(|v| v.0 != Vec2::ZERO);
        assert!(!moving);
    }

    #[test]
    fn round_start_needs_a_trigger_and_the_planning_phase() {
        let mut world = world(Tuning::default());
        world.run_system_once(start_round).unwrap();
        assert_eq!(world.resource::<PlanningState>().round(), 0);

        start(&mut world);
        assert_eq!(world.resource::<PlanningState>().round(), 1);
        start(&mut world);
        assert_eq!(world.resource::<PlanningState>().round(), 1);
        // Only the first round timer was armed.
        assert_eq!(world.resource::<BattleTimers>().len(), 1);
    }

    #[test]
    fn round_end_wipes_plans_and_projectiles() {
        let mut world = world(Tuning::default());
        let bot = spawn_bot(&mut world, 0, Side::Player, Vec2::ZERO);
        {
            let mut b = world.get_mut::<Bot>(bot).unwrap();
            b.commit(BotAction::move_from(Vec2::ZERO, Vec2::X, 50.0, 180.0));
            b.commit(BotAction::shoot_from(Vec2::ZERO, Vec2::X, 120.0));
        }
        start(&mut world);
        world.get_mut::<Velocity>(bot).unwrap().0 = Vec2::new(25.0, 0.0);
        assert!(!pellets(&mut world).is_empty());

        world.write_message(TimerEvent::RoundEnd);
        world.run_system_once(end_round).unwrap();

        let b = world.get::<Bot>(bot).unwrap();
        assert!(b.action.is_none());
        assert!(b.planned_move.is_none() && b.planned_shoot.is_none());
        assert_eq!(world.get::<Velocity>(bot), Some(&Velocity(Vec2::ZERO)));
        assert!(pellets(&mut world).is_empty());
        assert!(world.resource::<PlanningState>().is_planning());
    }

    #[test]
    fn expiry_removes_only_the_named_pellet() {
        let mut world = world(Tuning::default());
        let a = world.spawn(projectile_bundle(BotId(0), Vec2::ZERO, Vec2::X)).id();
        let b = world.spawn(projectile_bundle(BotId(0), Vec2::ZERO, Vec2::X)).id();
        world.write_message(TimerEvent::ExpireProjectile(a));
        world.write_message(TimerEvent::ExpireProjectile(a));

        world.run_system_once(expire_projectiles).unwrap();

        assert!(world.get_entity(a).is_err());
        assert!(world.get::<Projectile>(b).is_some_and(Projectile::is_live));
    }
}
