mod game;
mod player;
mod roll;
mod user;

pub use game::*;
pub use player::*;
pub use roll::*;
pub use user::*;
