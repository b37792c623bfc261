use std::{
    net::SocketAddr,
    sync::atomic::{AtomicU64, Ordering},
};

use anyhow::Result;
use bytes::BytesMut;
use tokio::{io::AsyncWriteExt, net::tcp::OwnedWriteHalf, sync::Mutex};

use crate::utils::now_secs;

/// Write side of a connection. The transport behind it is opaque to the
/// registry and the dispatch loop.
#[async_trait::async_trait]
pub trait ConnSender: Sync + Send {
    async fn send_buf(&self, buf: &BytesMut) -> Result<()>;
    async fn close(&self) -> Result<()>;
}

pub struct TcpSender {
    writer: Mutex<OwnedWriteHalf>,
}

impl TcpSender {
    pub fn new(writer: OwnedWriteHalf) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }
}

#[async_trait::async_trait]
impl ConnSender for TcpSender {
    async fn send_buf(&self, buf: &BytesMut) -> Result<()> {
        let mut writer = self.writer.lock().await;
        writer.write_all(buf).await?;
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        let mut writer = self.writer.lock().await;
        writer.shutdown().await?;
        Ok(())
    }
}

/// One accepted connection as the registry sees it.
pub struct Connection {
    id: u128,
    peer_addr: SocketAddr,
    sender: std::sync::Arc<dyn ConnSender>,
    last_recv: AtomicU64,
    requests: AtomicU64,
}

impl Connection {
    pub fn new(id: u128, peer_addr: SocketAddr, sender: std::sync::Arc<dyn ConnSender>) -> Self {
        Connection {
            id,
            peer_addr,
            sender,
            last_recv: AtomicU64::new(now_secs()),
            requests: AtomicU64::new(0),
        }
    }

    pub async fn send_buf(&self, buf: &BytesMut) -> Result<()> {
        self.sender.send_buf(buf).await
    }

    pub async fn close(&self) -> Result<()> {
        self.sender.close().await
    }

    pub fn id(&self) -> u128 {
        self.id
    }

    pub fn peer_addr(&self) -> SocketAddr {
        self.peer_addr
    }

    pub fn update_last_recv(&self) {
        self.last_recv.store(now_secs(), Ordering::SeqCst);
    }

    pub fn last_recv(&self) -> u64 {
        self.last_recv.load(Ordering::SeqCst)
    }

    pub fn count_request(&self) -> u64 {
        self.requests.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn requests(&self) -> u64 {
        self.requests.load(Ordering::Relaxed)
    }
}
