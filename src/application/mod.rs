pub mod game;
pub mod player_names;
pub mod session;
