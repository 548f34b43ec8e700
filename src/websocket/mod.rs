pub mod connection;
pub mod handler;
pub mod types;

pub use connection::ConnectionManager;
pub use handler::ws_handler;
pub use types::{Audience, ServerEvent};
