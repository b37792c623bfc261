use std::net::SocketAddr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    #[serde(default = "default_max_buffer")]
    pub max_buffer_size: usize,
    #[serde(default = "default_read_buffer")]
    pub read_buffer_size: usize,
    #[serde(default = "default_max_connections")]
    pub max_connections: usize,
    #[serde(default = "default_keep_alive")]
    pub keep_alive: bool,
}

fn default_max_buffer() -> usize {
    8 * 1024 * 1024
}
fn default_read_buffer() -> usize {
    64 * 1024
}
fn default_max_connections() -> usize {
    1000
}
fn default_keep_alive() -> bool {
    true
}

impl ServerConfig {
    pub fn from_addr(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            max_buffer_size: default_max_buffer(),
            read_buffer_size: default_read_buffer(),
            max_connections: default_max_connections(),
            keep_alive: default_keep_alive(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    pub server_name: String,
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout: u64,
}

fn default_sweep_interval() -> u64 {
    15
}
fn default_idle_timeout() -> u64 {
    45
}

impl RegistryConfig {
    pub fn from_name(server_name: &str) -> Self {
        Self {
            server_name: server_name.to_string(),
            sweep_interval: default_sweep_interval(),
            idle_timeout: default_idle_timeout(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_fields() {
        let config: ServerConfig =
            serde_json::from_str(r#"{"bind_addr":"127.0.0.1:8080"}"#).unwrap();
        assert_eq!(config.max_buffer_size, 8 * 1024 * 1024);
        assert_eq!(config.read_buffer_size, 64 * 1024);
        assert_eq!(config.max_connections, 1000);
        assert!(config.keep_alive);

        let config: RegistryConfig = serde_json::from_str(r#"{"server_name":"strix"}"#).unwrap();
        assert_eq!(config.sweep_interval, 15);
        assert_eq!(config.idle_timeout, 45);
    }
}
