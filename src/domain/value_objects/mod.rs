mod dice;
mod distribution;

pub use dice::*;
pub use distribution::*;
