use bevy::prelude::*;

use super::bot::{Bot, BotAction, BotId, IntentMode};
use super::events::BattleCommand;
use super::geometry::direction_to;
use super::planning::PlanningState;
use crate::config::tuning::Tuning;

/// Intent of the bot's current mode from `origin` towards `point`.
pub fn aim_action(mode: IntentMode, origin: Vec2, point: Vec2, tuning: &Tuning) -> BotAction {
    let direction = direction_to(origin, point);
    match mode {
        IntentMode::Move => BotAction::move_from(
            origin,
            direction,
            origin.distance(point),
            tuning.max_move_distance,
        ),
        IntentMode::Shoot => {
            BotAction::shoot_from(origin, direction, tuning.shoot_preview_length)
        }
    }
}

/// Whether `bot` may take player orders right now.
pub fn accepts_orders(bot: &Bot, planning: &PlanningState) -> bool {
    planning.is_planning() && bot.alive && bot.side == planning.controlling_side
}

fn order_target(command: &BattleCommand) -> Option<BotId> {
    match *command {
        BattleCommand::SetMode { bot, .. }
        | BattleCommand::Aim { bot, .. }
        | BattleCommand::ClearIntent { bot } => Some(bot),
        BattleCommand::StartRound | BattleCommand::Reset => None,
    }
}

/// OrderSet: apply player intent edits to live bots of the controlling side.
pub fn apply_orders(
    mut requests: MessageReader<BattleCommand>,
    tuning: Res<Tuning>,
    mut planning: ResMut<PlanningState>,
    mut bots: Query<(&mut Bot, &Transform)>,
) {
    for command in requests.read() {
        let Some(id) = order_target(command) else {
            continue;
        };
        let Some((mut bot, tf)) = bots.iter_mut().find(|(bot, _)| bot.id == id) else {
            debug!("Ignoring order for {id:?}: no such bot");
            continue;
        };
        if !accepts_orders(&bot, &planning) {
            debug!(
                "Ignoring order for {id:?} in {:?}: not a live {:?} bot",
                planning.phase(),
                planning.controlling_side
            );
            continue;
        }

        match *command {
            BattleCommand::SetMode { mode, .. } => bot.set_mode(mode),
            BattleCommand::Aim { point, .. } => {
                let action = aim_action(bot.mode, tf.translation.truncate(), point, &tuning);
                bot.commit(action);
            }
            BattleCommand::ClearIntent { .. } => bot.clear_plan(),
            BattleCommand::StartRound | BattleCommand::Reset => {}
        }
        planning.mark_dirty();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::bot::{Side, planned_count};
    use crate::game::timer::Scheduler;
    use bevy::ecs::system::RunSystemOnce;

    fn world() -> World {
        let mut world = World::new();
        world.insert_resource(Tuning::default());
        world.init_resource::<PlanningState>();
        world.init_resource::<Messages<BattleCommand>>();
        for (i, (side, x)) in [(Side::Player, -300.0), (Side::Player, -300.0), (Side::Enemy, 300.0)]
            .into_iter()
            .enumerate()
        {
            world.spawn((
                Bot::new(BotId(i as u32), side),
                Transform::from_xyz(x, i as f32 * 50.0, 1.0),
            ));
        }
        world
    }

    fn order(world: &mut World, commands: &[BattleCommand]) {
        world.resource_mut::<Messages<BattleCommand>>().clear();
        for command in commands {
            world.write_message(*command);
        }
        world.run_system_once(apply_orders).unwrap();
    }

    fn bot(world: &mut World, id: u32) -> Bot {
        world
            .query::<&Bot>()
            .iter(world)
            .find(|b| b.id == BotId(id))
            .cloned()
            .unwrap()
    }

    fn planned(world: &mut World) -> usize {
        planned_count(world.query::<&Bot>().iter(world), Side::Player)
    }

    #[test]
    fn move_orders_are_clamped_to_max_distance() {
        let mut world = world();
        order(
            &mut world,
            &[BattleCommand::Aim {
                bot: BotId(0),
                point: Vec2::new(200.0, 0.0),
            }],
        );
        let action = bot(&mut world, 0).action;
        assert!(matches!(action, BotAction::Move { distance, .. } if distance == 180.0));
        assert_eq!(action.target(), Some(Vec2::new(-120.0, 0.0)));
    }

    #[test]
    fn player_intents_count_towards_planned() {
        let mut world = world();
        order(
            &mut world,
            &[
                BattleCommand::Aim {
                    bot: BotId(0),
                    point: Vec2::ZERO,
                },
                BattleCommand::SetMode {
                    bot: BotId(1),
                    mode: IntentMode::Shoot,
                },
                BattleCommand::Aim {
                    bot: BotId(1),
                    point: Vec2::ZERO,
                },
            ],
        );
        assert_eq!(planned(&mut world), 2);
        assert!(matches!(bot(&mut world, 1).action, BotAction::Shoot { .. }));

        order(&mut world, &[BattleCommand::ClearIntent { bot: BotId(0) }]);
        assert_eq!(planned(&mut world), 1);
        assert!(world.resource::<PlanningState>().is_dirty());
    }

    #[test]
    fn enemy_bots_cannot_be_commanded() {
        let mut world = world();
        world.resource_mut::<PlanningState>().mark_clean();
        order(
            &mut world,
            &[
                BattleCommand::SetMode {
                    bot: BotId(2),
                    mode: IntentMode::Shoot,
                },
                BattleCommand::Aim {
                    bot: BotId(2),
                    point: Vec2::ZERO,
                },
            ],
        );
        let enemy = bot(&mut world, 2);
        assert!(enemy.action.is_none());
        assert_eq!(enemy.mode, IntentMode::Move);
        assert!(!world.resource::<PlanningState>().is_dirty());
    }

    #[test]
    fn orders_are_refused_outside_planning_and_for_the_dead() {
        let mut world = world();
        let mut dead = world.query::<&mut Bot>();
        for mut b in dead.iter_mut(&mut world) {
            if b.id == BotId(1) {
                b.alive = false;
            }
        }
        order(
            &mut world,
            &[BattleCommand::Aim {
                bot: BotId(1),
                point: Vec2::ZERO,
            }],
        );
        assert!(bot(&mut world, 1).action.is_none());

        let mut timers = Scheduler::<()>::default();
        let handle = timers.schedule(2000.0, ());
        world
            .resource_mut::<PlanningState>()
            .begin_execution(handle);
        order(
            &mut world,
            &[BattleCommand::Aim {
                bot: BotId(0),
                point: Vec2::ZERO,
            }],
        );
        assert!(bot(&mut world, 0).action.is_none());
    }
}
