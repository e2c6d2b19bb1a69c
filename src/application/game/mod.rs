mod create_game;
mod end_game;
mod get_distribution;
mod get_game;
mod list_games;
mod record_roll;

pub use create_game::*;
pub use end_game::*;
pub use get_distribution::*;
pub use get_game::*;
pub use list_games::*;
pub use record_roll::*;
