pub mod battle_plugin;
pub mod game_plugin;
pub mod ui_plugin;
