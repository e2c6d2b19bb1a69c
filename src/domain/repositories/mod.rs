mod game_repository;
mod player_name_repository;
mod user_repository;

pub use game_repository::*;
pub use player_name_repository::*;
pub use user_repository::*;
