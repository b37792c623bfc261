//! The strix server runtime: TCP transport, connection registry and
//! request dispatch.

mod config;
mod conn;
mod files;
mod registry;
mod server;
pub mod transport;
pub mod utils;

pub use crate::config::{RegistryConfig, ServerConfig};
pub use crate::conn::{ConnSender, Connection, TcpSender};
pub use crate::files::serve_dir;
pub use crate::registry::Registry;
pub use crate::server::ServerTrait;
pub use crate::transport::HttpServer;
