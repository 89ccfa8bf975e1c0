use bevy::prelude::*;

use super::bot::{BotId, Side};

/// Live bot ids per side plus the combined list, in spawn order.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct Rosters {
    pub player: Vec<BotId>,
    pub enemy: Vec<BotId>,
    pub all: Vec<BotId>,
}

impl Rosters {
    pub fn add(&mut self, id: BotId, side: Side) {
        match side {
            Side::Player => self.player.push(id),
            Side::Enemy => self.enemy.push(id),
        }
        self.all.push(id);
    }

    pub fn side(&self, side: Side) -> &[BotId] {
        match side {
            Side::Player => &self.player,
            Side::Enemy => &self.enemy,
        }
    }

    /// Remove `id` from its side and from `all`. False if it wasn't listed.
    pub fn remove(&mut self, id: BotId, side: Side) -> bool {
        let list = match side {
            Side::Player => &mut self.player,
            Side::Enemy => &mut self.enemy,
        };
        let before = list.len();
        list.retain(|b| *b != id);
        let removed = list.len() != before;
        self.all.retain(|b| *b != id);
        removed
    }

    /// Side whose opponent has no bots left. Enemy wipe-out is checked first.
    pub fn winner(&self) -> Option<Side> {
        if self.enemy.is_empty() {
            Some(Side::Player)
        } else if self.player.is_empty() {
            Some(Side::Enemy)
        } else {
            None
        }
    }
}
