use std::net::SocketAddr;

#[async_trait::async_trait]
pub trait ServerTrait: Sync + Send {
    fn local_addr(&self) -> SocketAddr;

    async fn close(&self);
}
