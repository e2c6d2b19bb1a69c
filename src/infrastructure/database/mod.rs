mod pool;
pub mod repositories;
mod schema;

pub use pool::*;
pub use schema::*;
