mod randomizer;
mod subscription_tracker;

pub use randomizer::*;
pub use subscription_tracker::*;
