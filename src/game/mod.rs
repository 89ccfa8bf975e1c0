pub mod arena;
pub mod battle;
pub mod bot;
pub mod collision;
pub mod components;
pub mod combat;
pub mod events;
pub mod executor;
pub mod geometry;
pub mod orders;
pub mod physics;
pub mod planner;
pub mod planning;
pub mod projectile;
pub mod roster;
pub mod timer;
