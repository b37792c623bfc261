use std::{sync::Arc, time::Duration};

use ahash::RandomState;
use dashmap::DashMap;
use tokio::sync::broadcast;
use tracing::{info, warn};

use crate::{Connection, RegistryConfig, utils::now_secs};

/// Tracks every live connection and evicts the ones that go quiet.
pub struct Registry {
    pub config: RegistryConfig,
    connections: DashMap<u128, Arc<Connection>, RandomState>,
    shutdown_tx: Arc<broadcast::Sender<()>>,
}

impl Registry {
    pub fn new(config: RegistryConfig) -> Arc<Self> {
        let (shutdown_tx, _shutdown_rx) = broadcast::channel(1);
        let shutdown_tx = Arc::new(shutdown_tx);

        let registry = Arc::new(Self {
            config,
            connections: DashMap::with_hasher(RandomState::new()),
            shutdown_tx: shutdown_tx.clone(),
        });

        let mut shutdown_rx = shutdown_tx.subscribe();

        tokio::spawn({
            let registry_clone = registry.clone();
            async move {
                let sweep_interval = Duration::from_secs(registry_clone.config.sweep_interval);
                let idle_timeout = registry_clone.config.idle_timeout;

                loop {
                    tokio::select! {
                        _ = tokio::time::sleep(sweep_interval) => {
                            registry_clone.sweep_idle(idle_timeout).await;
                        }
                        _ = shutdown_rx.recv() => {
                            info!("Sweep task received shutdown signal, stopping.");
                            break;
                        }
                    }
                }
            }
        });

        registry
    }

    pub fn add(&self, conn: Arc<Connection>) {
        self.connections.insert(conn.id(), conn);
    }

    pub async fn remove(&self, id: u128) {
        let conn = match self.connections.remove(&id) {
            Some((_id, conn)) => conn,
            None => return,
        };

        if let Err(e) = conn.close().await {
            warn!("close connection [{:032X}] error: {}", id, e);
        }
    }

    pub fn find(&self, id: u128) -> Option<Arc<Connection>> {
        self.connections.get(&id).as_deref().cloned()
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    pub fn server_name(&self) -> &str {
        &self.config.server_name
    }

    pub async fn close(&self) {
        let _ = self.shutdown_tx.send(());

        for entry in self.connections.iter() {
            if let Err(e) = entry.value().close().await {
                warn!("close connection error: {}", e);
            }
        }

        self.connections.clear();
    }

    async fn sweep_idle(&self, timeout_secs: u64) {
        let now = now_secs();
        let mut to_remove = Vec::new();

        for entry in self.connections.iter() {
            let conn = entry.value();
            if now.saturating_sub(conn.last_recv()) > timeout_secs {
                to_remove.push(*entry.key());
            }
        }

        for id in to_remove {
            let conn = match self.connections.remove(&id) {
                Some((_id, conn)) => conn,
                None => continue,
            };

            warn!(
                "Connection [{:032X}] (addr: {}) idle for over {}s, evicting",
                id,
                conn.peer_addr(),
                timeout_secs
            );

            if let Err(e) = conn.close().await {
                warn!("close connection [{:032X}] error: {}", id, e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConnSender;
    use anyhow::Result;
    use bytes::BytesMut;
    use std::net::SocketAddr;

    struct NullSender;

    #[async_trait::async_trait]
    impl ConnSender for NullSender {
        async fn send_buf(&self, _buf: &BytesMut) -> Result<()> {
            Ok(())
        }
        async fn close(&self) -> Result<()> {
            Ok(())
        }
    }

    fn conn(id: u128) -> Arc<Connection> {
        let addr: SocketAddr = "127.0.0.1:9999".parse().unwrap();
        Arc::new(Connection::new(id, addr, Arc::new(NullSender)))
    }

    #[tokio::test]
    async fn add_find_remove() {
        let registry = Registry::new(RegistryConfig::from_name("test"));
        registry.add(conn(7));
        assert_eq!(registry.len(), 1);
        assert!(registry.find(7).is_some());
        assert!(registry.find(8).is_none());

        registry.remove(7).await;
        assert!(registry.is_empty());
        registry.close().await;
    }

    #[tokio::test]
    async fn sweep_evicts_idle_connections() {
        let registry = Registry::new(RegistryConfig {
            server_name: "test".into(),
            sweep_interval: 3600,
            idle_timeout: 0,
        });

        registry.add(conn(1));

        tokio::time::sleep(Duration::from_millis(1100)).await;
        registry.sweep_idle(0).await;
        assert!(registry.is_empty());
        registry.close().await;
    }

    #[tokio::test]
    async fn close_drops_everything() {
        let registry = Registry::new(RegistryConfig::from_name("test"));
        registry.add(conn(1));
        registry.add(conn(2));
        registry.close().await;
        assert!(registry.is_empty());
    }
}
