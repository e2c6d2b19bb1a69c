mod change_feed;
mod game_sync;
mod game_view;
mod subscription;

pub use change_feed::*;
pub use game_sync::*;
pub use game_view::*;
pub use subscription::*;
