use std::{
    net::{Ipv4Addr, SocketAddr},
    path::PathBuf,
    sync::Arc,
};

use anyhow::{Result, anyhow};
use strix_router::Router;
use strix_server::{HttpServer, Registry, RegistryConfig, ServerConfig, ServerTrait};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpStream,
};
use tracing::info;

/// ------------------------- Client -------------------------

/// A deliberately dumb HTTP client speaking raw bytes over a socket, so
/// the tests observe exactly what goes over the wire.
pub struct TestClient {
    stream: TcpStream,
    // bytes read past the end of the previous response (pipelining)
    leftover: Vec<u8>,
}

/// What the client read back, split at the header/body boundary.
#[derive(Debug)]
pub struct RawResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

impl TestClient {
    pub async fn connect(addr: SocketAddr) -> Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        stream.set_nodelay(true)?;
        Ok(Self {
            stream,
            leftover: Vec::new(),
        })
    }

    pub async fn send_raw(&mut self, bytes: &[u8]) -> Result<()> {
        self.stream.write_all(bytes).await?;
        Ok(())
    }

    pub async fn get(&mut self, path: &str) -> Result<RawResponse> {
        let request = format!("GET {path} HTTP/1.1\r\nHost: localhost\r\n\r\n");
        self.send_raw(request.as_bytes()).await?;
        self.read_response().await
    }

    pub async fn post(&mut self, path: &str, body: &[u8]) -> Result<RawResponse> {
        let head = format!(
            "POST {path} HTTP/1.1\r\nHost: localhost\r\nContent-Length: {}\r\n\r\n",
            body.len()
        );
        self.stream.write_all(head.as_bytes()).await?;
        self.stream.write_all(body).await?;
        self.read_response().await
    }

    /// Reads one response: head up to the blank line, then exactly
    /// `Content-Length` body bytes.
    pub async fn read_response(&mut self) -> Result<RawResponse> {
        let mut buf = std::mem::take(&mut self.leftover);
        let mut chunk = [0u8; 4096];

        let head_end = loop {
            if let Some(pos) = find_head_end(&buf) {
                break pos;
            }
            let n = self.stream.read(&mut chunk).await?;
            if n == 0 {
                return Err(anyhow!("connection closed before response head"));
            }
            buf.extend_from_slice(&chunk[..n]);
        };

        let head = std::str::from_utf8(&buf[..head_end])?;
        let mut lines = head.split("\r\n");
        let status_line = lines.next().ok_or_else(|| anyhow!("empty response"))?;
        let status: u16 = status_line
            .split_whitespace()
            .nth(1)
            .ok_or_else(|| anyhow!("malformed status line: {status_line}"))?
            .parse()?;

        let headers: Vec<(String, String)> = lines
            .filter_map(|line| {
                line.split_once(':')
                    .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
            })
            .collect();

        let content_length: usize = headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
            .and_then(|(_, v)| v.parse().ok())
            .unwrap_or(0);

        let mut body = buf[head_end + 4..].to_vec();
        while body.len() < content_length {
            let n = self.stream.read(&mut chunk).await?;
            if n == 0 {
                return Err(anyhow!("connection closed mid-body"));
            }
            body.extend_from_slice(&chunk[..n]);
        }
        self.leftover = body.split_off(content_length);

        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }

    /// Reads until EOF; for probing that the server really closed.
    pub async fn read_to_end(&mut self) -> Result<Vec<u8>> {
        let mut buf = std::mem::take(&mut self.leftover);
        self.stream.read_to_end(&mut buf).await?;
        Ok(buf)
    }
}

fn find_head_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}

/// ------------------------- TestEnv -------------------------
pub struct TestEnv {
    registry: Arc<Registry>,
    servers: Vec<Arc<dyn ServerTrait>>,
}

impl Default for TestEnv {
    fn default() -> Self {
        let _ = tracing_subscriber::fmt::try_init();
        Self {
            registry: Registry::new(RegistryConfig::from_name("strix-test")),
            servers: Vec::new(),
        }
    }
}

impl TestEnv {
    /// Starts a server on an ephemeral port and returns it.
    pub async fn start_server(
        &mut self,
        router: Router,
        base_path: Option<PathBuf>,
    ) -> Result<Arc<dyn ServerTrait>> {
        let addr = SocketAddr::from((Ipv4Addr::LOCALHOST, 0));
        let config = ServerConfig::from_addr(addr);
        let server = HttpServer::open(self.registry.clone(), config, Arc::new(router), base_path)
            .await?;
        info!("test server on {}", server.local_addr());
        self.servers.push(server.clone());
        Ok(server)
    }

    pub async fn connect(&self, server: &Arc<dyn ServerTrait>) -> Result<TestClient> {
        TestClient::connect(server.local_addr()).await
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub async fn shutdown(&mut self) {
        for server in self.servers.drain(..) {
            server.close().await;
        }
        self.registry.close().await;
    }
}
