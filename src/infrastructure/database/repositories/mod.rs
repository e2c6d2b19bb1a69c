mod game_repo;
mod player_name_repo;
mod user_repo;

pub use game_repo::*;
pub use player_name_repo::*;
pub use user_repo::*;
