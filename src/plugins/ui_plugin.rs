use bevy::prelude::*;

use crate::game::{
    bot::{Bot, IntentMode, planned_count},
    components::*,
    planning::PlanningState,
    roster::Rosters,
    timer::BattleTimers,
};

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_ui);
        app.add_systems(
            Update,
            (update_phase_display, update_plan_display, update_message_display),
        );
    }
}

#[derive(Component)]
struct PhaseText;

#[derive(Component)]
struct PlanText;

#[derive(Component)]
struct MessageText;

fn setup_ui(mut commands: Commands) {
    commands
        .spawn(Node {
            position_type: PositionType::Absolute,
            left: Val::Px(10.0),
            top: Val::Px(10.0),
            flex_direction: FlexDirection::Column,
            row_gap: Val::Px(6.0),
            ..default()
        })
        .with_children(|parent| {
            parent.spawn((
                PhaseText,
                Text::new("Planning"),
                TextFont {
                    font_size: 20.0,
                    ..default()
                },
                TextColor(Color::srgb(0.8, 0.8, 0.2)),
            ));

            parent.spawn((
                PlanText,
                Text::new(""),
                TextFont {
                    font_size: 18.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));
        });

    commands.spawn((
        MessageText,
        Text::new(""),
        TextFont {
            font_size: 48.0,
            ..default()
        },
        TextColor(Color::WHITE),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Percent(42.0),
            left: Val::Percent(38.0),
            ..default()
        },
    ));
}

fn update_phase_display(
    state: Res<State<GamePhase>>,
    planning: Res<PlanningState>,
    timers: Res<BattleTimers>,
    mut text_query: Query<&mut Text, With<PhaseText>>,
) {
    let countdown = planning.countdown.and_then(|h| timers.remaining_ms(h));
    let phase_str = match state.get() {
        GamePhase::Planning => match countdown {
            Some(ms) => format!(
                "Round {} planning ({:.1}s)  Space to start",
                planning.round() + 1,
                ms / 1000.0
            ),
            None => format!("Round {} planning  Space to start", planning.round() + 1),
        },
        GamePhase::Executing => format!("Round {} executing", planning.round()),
        GamePhase::GameOver => "Game Over".to_string(),
    };
    for mut text in &mut text_query {
        **text = phase_str.clone();
    }
}

/// Refreshed only when intents or the selection changed.
fn update_plan_display(
    mut planning: ResMut<PlanningState>,
    selection: Res<Selection>,
    rosters: Res<Rosters>,
    bots: Query<&Bot>,
    mut text_query: Query<&mut Text, With<PlanText>>,
) {
    if !planning.is_dirty() && !selection.is_changed() {
        return;
    }

    let side = planning.controlling_side;
    let squad = rosters.side(side).len();
    let selected = match selection.bot.and_then(|id| bots.iter().find(|b| b.id == id)) {
        Some(bot) => {
            let mode = match bot.mode {
                IntentMode::Move => "move",
                IntentMode::Shoot => "shoot",
            };
            format!("bot #{} ({mode})", bot.id.0)
        }
        None => "none (1-5 / Tab)".to_string(),
    };
    let line = format!(
        "Planned {}/{}  Selected: {}\nM move  S shoot  click aim  right click clear  R restart",
        planned_count(&bots, side),
        squad,
        selected
    );
    for mut text in &mut text_query {
        **text = line.clone();
    }
    planning.mark_clean();
}

fn update_message_display(
    planning: Res<PlanningState>,
    mut text_query: Query<(&mut Text, &mut TextColor), With<MessageText>>,
) {
    if !planning.is_changed() {
        return;
    }
    let (line, color) = match (planning.message(), planning.winner()) {
        (Some(msg), Some(winner)) if winner == planning.controlling_side => (
            format!("{msg}\nPress R to restart"),
            Color::srgb(0.3, 1.0, 0.3),
        ),
        (Some(msg), _) => (
            format!("{msg}\nPress R to restart"),
            Color::srgb(1.0, 0.3, 0.3),
        ),
        (None, _) => (String::new(), Color::WHITE),
    };
    for (mut text, mut text_color) in &mut text_query {
        **text = line.clone();
        text_color.0 = color;
    }
}
