//! Connection handlers.

pub mod session;

pub use session::handle_connection;
