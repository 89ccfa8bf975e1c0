use bevy::prelude::*;

use super::bot::BotId;

/// In-flight pellet. Entity ids are generational, so a stale id held by an
/// expiry timer or a contact can never reach a newer projectile.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Projectile {
    /// Cleared on release; an ownerless projectile never hits anything.
    pub owner: Option<BotId>,
}

impl Projectile {
    pub fn new(owner: BotId) -> Self {
        Self { owner: Some(owner) }
    }

    pub fn is_live(&self) -> bool {
        self.owner.is_some()
    }

    /// Make the projectile inert. False if it already was.
    pub fn release(&mut self) -> bool {
        self.owner.take().is_some()
    }
}
