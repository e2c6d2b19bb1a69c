mod list_player_names;

pub use list_player_names::*;
