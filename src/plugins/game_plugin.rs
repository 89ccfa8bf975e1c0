use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::config::tuning::Tuning;
use crate::game::{
    arena::{ArenaBounds, Barrier},
    bot::{Bot, BotAction, BotId, IntentMode, Side},
    components::*,
    events::BattleCommand,
    geometry::rotate_deg,
    projectile::Projectile,
    roster::Rosters,
};

const PLAYER_COLOR: Color = Color::srgb(0.2, 0.6, 1.0);
const ENEMY_COLOR: Color = Color::srgb(1.0, 0.2, 0.2);
const BARRIER_COLOR: Color = Color::srgb(0.45, 0.45, 0.5);
const MOVE_PREVIEW_COLOR: Color = Color::srgb(0.2, 1.0, 0.2);
const SHOOT_PREVIEW_COLOR: Color = Color::srgb(1.0, 0.9, 0.2);

/// Presentation: arena visuals, intent previews and planning input.
pub struct GamePlugin;

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Selection>();

        // ── Startup ─────────────────────────────────────────────────────
        app.add_systems(Startup, setup_camera);

        // ── Planning phase (Update) ─────────────────────────────────────
        app.add_systems(
            Update,
            planning_input.run_if(in_state(GamePhase::Planning)),
        );

        // ── Always-on ───────────────────────────────────────────────────
        app.add_systems(
            Update,
            (
                reset_input,
                rebuild_arena_backdrop.run_if(resource_changed::<ArenaBounds>),
                attach_barrier_visuals,
                attach_bot_visuals,
                sync_bot_visibility,
                draw_overlays,
            )
                .chain(),
        );
        app.add_systems(Update, tuning_reload_input);
    }
}

#[derive(Component)]
struct ArenaBackdrop;

// ── Startup ─────────────────────────────────────────────────────────

fn setup_camera(mut commands: Commands) {
    commands.spawn(Camera2d);
}

// ── World visuals ───────────────────────────────────────────────────

fn rebuild_arena_backdrop(
    mut commands: Commands,
    bounds: Res<ArenaBounds>,
    existing: Query<Entity, With<ArenaBackdrop>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    for entity in &existing {
        commands.entity(entity).despawn();
    }
    commands.spawn((
        ArenaBackdrop,
        Mesh2d(meshes.add(Rectangle::new(bounds.width, bounds.height))),
        MeshMaterial2d(materials.add(Color::srgba(0.15, 0.15, 0.2, 1.0))),
        Transform::from_translation(Vec3::new(0.0, 0.0, -1.0)),
    ));
}

fn attach_barrier_visuals(
    mut commands: Commands,
    added: Query<(Entity, &Barrier), Added<Barrier>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    if added.is_empty() {
        return;
    }
    let material = materials.add(BARRIER_COLOR);
    for (entity, barrier) in &added {
        commands.entity(entity).insert((
            Mesh2d(meshes.add(Rectangle::new(barrier.size.x, barrier.size.y))),
            MeshMaterial2d(material.clone()),
            Transform::from_translation(barrier.center.extend(0.0)),
        ));
    }
}

fn attach_bot_visuals(
    mut commands: Commands,
    tuning: Res<Tuning>,
    added: Query<(Entity, &Bot), Added<Bot>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    if added.is_empty() {
        return;
    }
    let mesh = meshes.add(Circle::new(tuning.bot_radius));
    let player_mat = materials.add(PLAYER_COLOR);
    let enemy_mat = materials.add(ENEMY_COLOR);
    for (entity, bot) in &added {
        let material = match bot.side {
            Side::Player => player_mat.clone(),
            Side::Enemy => enemy_mat.clone(),
        };
        commands
            .entity(entity)
            .insert((Mesh2d(mesh.clone()), MeshMaterial2d(material)));
    }
}

/// Hide bots that died.
fn sync_bot_visibility(mut query: Query<(&Bot, &mut Visibility), Changed<Bot>>) {
    for (bot, mut visibility) in &mut query {
        *visibility = if bot.alive {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
    }
}

/// Intent previews, selection ring and projectiles.
fn draw_overlays(
    tuning: Res<Tuning>,
    selection: Res<Selection>,
    bots: Query<(&Bot, &Transform)>,
    projectiles: Query<&Transform, With<Projectile>>,
    mut gizmos: Gizmos,
) {
    let radius = tuning.bot_radius;

    for (bot, tf) in bots.iter().filter(|(b, _)| b.alive) {
        let position = tf.translation.truncate();
        if let (Some(target), Some(direction)) = (bot.action.target(), bot.action.direction()) {
            if let BotAction::Move { .. } = bot.action {
                gizmos.line_2d(position, target, MOVE_PREVIEW_COLOR);
                gizmos.circle_2d(target, radius * 0.5, MOVE_PREVIEW_COLOR);
            } else {
                gizmos.line_2d(position, target, SHOOT_PREVIEW_COLOR);
                // Spread cone
                let reach = tuning.shoot_preview_length * 0.6;
                for edge in [-tuning.spread_deg, tuning.spread_deg] {
                    let end = position + rotate_deg(direction, edge) * reach;
                    gizmos.line_2d(position, end, SHOOT_PREVIEW_COLOR.with_alpha(0.4));
                }
            }
        }
        if selection.bot == Some(bot.id) {
            gizmos.circle_2d(position, radius + 4.0, Color::WHITE);
        }
    }

    for tf in &projectiles {
        gizmos.circle_2d(
            tf.translation.truncate(),
            tuning.projectile_radius,
            SHOOT_PREVIEW_COLOR,
        );
    }
}

// ── Planning input ──────────────────────────────────────────────────

fn cursor_world(
    windows: &Query<&Window, With<PrimaryWindow>>,
    cameras: &Query<(&Camera, &GlobalTransform)>,
) -> Option<Vec2> {
    let window = windows.single().ok()?;
    let cursor = window.cursor_position()?;
    let (camera, camera_tf) = cameras.single().ok()?;
    camera.viewport_to_world_2d(camera_tf, cursor).ok()
}

/// Select with 1–5/Tab or by clicking a bot, M/S to switch mode,
/// left click to aim, right click to clear, Space to start the round.
fn planning_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mouse: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform)>,
    tuning: Res<Tuning>,
    rosters: Res<Rosters>,
    bots: Query<(&Bot, &Transform)>,
    mut selection: ResMut<Selection>,
    mut orders: MessageWriter<BattleCommand>,
) {
    let roster = rosters.side(Side::Player);
    if selection.bot.is_some_and(|id| !roster.contains(&id)) {
        selection.bot = None;
    }

    let digits = [
        KeyCode::Digit1,
        KeyCode::Digit2,
        KeyCode::Digit3,
        KeyCode::Digit4,
        KeyCode::Digit5,
    ];
    for (i, key) in digits.iter().enumerate() {
        if keyboard.just_pressed(*key) {
            if let Some(id) = roster.get(i) {
                selection.bot = Some(*id);
            }
        }
    }
    if keyboard.just_pressed(KeyCode::Tab) && !roster.is_empty() {
        let next = selection
            .bot
            .and_then(|id| roster.iter().position(|r| *r == id))
            .map_or(0, |i| (i + 1) % roster.len());
        selection.bot = Some(roster[next]);
    }

    if let Some(bot) = selection.bot {
        if keyboard.just_pressed(KeyCode::KeyM) {
            orders.write(BattleCommand::SetMode {
                bot,
                mode: IntentMode::Move,
            });
        }
        if keyboard.just_pressed(KeyCode::KeyS) {
            orders.write(BattleCommand::SetMode {
                bot,
                mode: IntentMode::Shoot,
            });
        }
        if mouse.just_pressed(MouseButton::Right) || keyboard.just_pressed(KeyCode::Backspace) {
            orders.write(BattleCommand::ClearIntent { bot });
        }
    }

    if mouse.just_pressed(MouseButton::Left) {
        if let Some(point) = cursor_world(&windows, &cameras) {
            let clicked: Option<BotId> = bots
                .iter()
                .find(|(b, tf)| {
                    b.alive
                        && b.side == Side::Player
                        && tf.translation.truncate().distance(point) <= tuning.bot_radius
                })
                .map(|(b, _)| b.id);
            match clicked {
                Some(id) => selection.bot = Some(id),
                None => {
                    if let Some(bot) = selection.bot {
                        orders.write(BattleCommand::Aim { bot, point });
                    }
                }
            }
        }
    }

    if keyboard.just_pressed(KeyCode::Space) {
        orders.write(BattleCommand::StartRound);
    }
}

// ── Always-on ───────────────────────────────────────────────────────

/// New game with R.
fn reset_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut orders: MessageWriter<BattleCommand>,
    mut selection: ResMut<Selection>,
) {
    if keyboard.just_pressed(KeyCode::KeyR) {
        orders.write(BattleCommand::Reset);
        selection.bot = None;
    }
}

/// Reload tuning with F5. Takes effect on the next reset.
fn tuning_reload_input(keyboard: Res<ButtonInput<KeyCode>>, mut tuning: ResMut<Tuning>) {
    if keyboard.just_pressed(KeyCode::F5) {
        tuning.reload();
    }
}
