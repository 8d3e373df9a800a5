pub mod config;
pub mod error;
pub mod server;

pub use crate::config::ServerConfig;
pub use crate::error::{ServerError, ServerResult};
pub use crate::server::Server;
