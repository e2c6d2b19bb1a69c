mod distribution_service;
mod player_name_service;
mod roster_service;
mod turn_service;

pub use distribution_service::*;
pub use player_name_service::*;
pub use roster_service::*;
pub use turn_service::*;
