mod start_session;

pub use start_session::*;
