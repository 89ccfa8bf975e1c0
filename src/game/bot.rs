use bevy::prelude::*;

/// Stable bot identity. Assigned monotonically, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BotId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Player,
    Enemy,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Self::Player => Self::Enemy,
            Self::Enemy => Self::Player,
        }
    }
}

/// Intent kind a bot is currently editing. Never "none".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IntentMode {
    #[default]
    Move,
    Shoot,
}

/// A bot's commitment for the upcoming round. Directions are unit vectors.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum BotAction {
    #[default]
    None,
    Move {
        direction: Vec2,
        distance: f32,
        target: Vec2,
    },
    Shoot {
        direction: Vec2,
        /// Preview endpoint only; fired projectiles spread around `direction`.
        target: Vec2,
    },
}

impl BotAction {
    /// Move intent from `origin`; `distance` is clamped to `[0, max_distance]`.
    pub fn move_from(origin: Vec2, direction: Vec2, distance: f32, max_distance: f32) -> Self {
        let distance = distance.clamp(0.0, max_distance.max(0.0));
        Self::Move {
            direction,
            distance,
            target: origin + direction * distance,
        }
    }

    pub fn shoot_from(origin: Vec2, direction: Vec2, preview_length: f32) -> Self {
        Self::Shoot {
            direction,
            target: origin + direction * preview_length,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    pub fn direction(&self) -> Option<Vec2> {
        match self {
            Self::None => None,
            Self::Move { direction, .. } | Self::Shoot { direction, .. } => Some(*direction),
        }
    }

    pub fn target(&self) -> Option<Vec2> {
        match self {
            Self::None => None,
            Self::Move { target, .. } | Self::Shoot { target, .. } => Some(*target),
        }
    }

    pub fn mode(&self) -> Option<IntentMode> {
        match self {
            Self::None => None,
            Self::Move { .. } => Some(IntentMode::Move),
            Self::Shoot { .. } => Some(IntentMode::Shoot),
        }
    }
}

/// One squad member. Position and velocity live on `Transform` / `Velocity`.
#[derive(Component, Debug, Clone)]
pub struct Bot {
    pub id: BotId,
    pub side: Side,
    pub action: BotAction,
    pub alive: bool,
    pub mode: IntentMode,
    /// Last move chosen this planning phase, kept across mode toggles.
    pub planned_move: Option<BotAction>,
    /// Last shot chosen this planning phase, kept across mode toggles.
    pub planned_shoot: Option<BotAction>,
}

impl Bot {
    pub fn new(id: BotId, side: Side) -> Self {
        Self {
            id,
            side,
            action: BotAction::None,
            alive: true,
            mode: IntentMode::default(),
            planned_move: None,
            planned_shoot: None,
        }
    }

    /// Commit `action` and remember it in the slot of its kind.
    pub fn commit(&mut self, action: BotAction) {
        match action.mode() {
            Some(IntentMode::Move) => self.planned_move = Some(action),
            Some(IntentMode::Shoot) => self.planned_shoot = Some(action),
            None => {}
        }
        if let Some(mode) = action.mode() {
            self.mode = mode;
        }
        self.action = action;
    }

    /// Switch intent kind, restoring whatever was last chosen for it.
    pub fn set_mode(&mut self, mode: IntentMode) {
        self.mode = mode;
        let remembered = match mode {
            IntentMode::Move => self.planned_move,
            IntentMode::Shoot => self.planned_shoot,
        };
        self.action = remembered.unwrap_or_default();
    }

    /// Drop the current intent and both remembered slots.
    pub fn clear_plan(&mut self) {
        self.action = BotAction::None;
        self.planned_move = None;
        self.planned_shoot = None;
    }
}

/// Live bots of `side` holding an intent for the coming round.
pub fn planned_count<'a>(bots: impl IntoIterator<Item = &'a Bot>, side: Side) -> usize {
    bots.into_iter()
        .filter(|b| b.alive && b.side == side && !b.action.is_none())
        .count()
}
