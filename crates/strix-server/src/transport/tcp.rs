use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use anyhow::Result;
use bytes::BytesMut;
use strix_http::{Http1Codec, HttpError, Method, Request, Response, StatusCode};
use strix_router::Router;
use tokio::{
    io::AsyncReadExt,
    net::{TcpListener, TcpStream, tcp::OwnedReadHalf},
    sync::{Semaphore, broadcast},
};
use tokio_util::codec::{Decoder, Encoder};
use tracing::{debug, info, warn};

use crate::{
    Connection, Registry, ServerConfig, ServerTrait, TcpSender, files::serve_dir, utils::new_uuid,
};

pub struct HttpServer {
    registry: Arc<Registry>,
    config: ServerConfig,
    router: Arc<Router>,
    base_path: Option<PathBuf>,
    local_addr: SocketAddr,
    listener: Arc<TcpListener>,
    semaphore: Arc<Semaphore>,
    shutdown_tx: Arc<broadcast::Sender<()>>,
}

#[async_trait::async_trait]
impl ServerTrait for HttpServer {
    fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    async fn close(&self) {
        if let Err(e) = self.shutdown_tx.send(()) {
            warn!("Error sending shutdown signal: {}", e);
        }

        self.registry.close().await;

        info!("Shutdown complete");
    }
}

impl HttpServer {
    pub async fn open(
        registry: Arc<Registry>,
        config: ServerConfig,
        router: Arc<Router>,
        base_path: Option<PathBuf>,
    ) -> Result<Arc<dyn ServerTrait>> {
        let listener = TcpListener::bind(config.bind_addr).await?;
        let local_addr = listener.local_addr()?;
        let semaphore = Arc::new(Semaphore::new(config.max_connections));

        let (shutdown_tx, mut shutdown_rx) = broadcast::channel(2 + config.max_connections);
        let server = Arc::new(HttpServer {
            registry,
            config,
            router,
            base_path,
            local_addr,
            listener: Arc::new(listener),
            semaphore,
            shutdown_tx: Arc::new(shutdown_tx),
        });

        tokio::spawn({
            let server_ = server.clone();
            async move {
                info!("Accepting connections on {}", local_addr);
                loop {
                    tokio::select! {
                        Ok((stream, peer_addr)) = server_.listener.accept() => {
                            server_.clone().handle_connection(stream, peer_addr).await
                        }
                        _ = shutdown_rx.recv() => {
                            info!("Server received shutdown signal, stopping.");
                            break;
                        }
                    }
                }
                info!("Stopped accepting connections");
            }
        });

        Ok(server)
    }

    async fn handle_connection(self: Arc<Self>, stream: TcpStream, peer_addr: SocketAddr) {
        debug!("New connection from {}", peer_addr);

        if let Err(e) = stream.set_nodelay(true) {
            warn!("Error setting TCP_NODELAY for {}: {}", peer_addr, e);
        }

        let (reader, writer) = stream.into_split();
        let sender = Arc::new(TcpSender::new(writer));
        let conn = Arc::new(Connection::new(new_uuid(), peer_addr, sender));

        let permit = match self.semaphore.clone().try_acquire_owned() {
            Ok(permit) => permit,
            Err(_) => {
                warn!("At capacity, turning away {}", peer_addr);
                let response = Response::new()
                    .with_status(StatusCode::ServiceUnavailable)
                    .with_header("Connection", "close")
                    .with_header("Content-Length", "0");
                let _ = self.send_response(&conn, response, false).await;
                let _ = conn.close().await;
                return;
            }
        };

        self.registry.add(conn.clone());

        tokio::spawn({
            let server_clone = self.clone();
            async move {
                let _permit = permit;

                server_clone.handle_connection_inner(conn.clone(), reader).await;

                server_clone.registry.remove(conn.id()).await;

                debug!(
                    "Connection {} closed after {} request(s)",
                    peer_addr,
                    conn.requests()
                );
            }
        });
    }

    async fn handle_connection_inner(
        self: &Arc<Self>,
        conn: Arc<Connection>,
        mut reader: OwnedReadHalf,
    ) {
        let peer_addr = conn.peer_addr();

        let mut codec = Http1Codec::new(self.config.max_buffer_size);
        let mut buffer = BytesMut::with_capacity(self.config.read_buffer_size);
        let mut temp_buf = vec![0u8; self.config.read_buffer_size];

        let mut shutdown_rx = self.shutdown_tx.subscribe();

        'outer: loop {
            tokio::select! {
                result = reader.read(&mut temp_buf) => {
                    match result {
                        Ok(0) => {
                            debug!("Connection {} closed by client", peer_addr);
                            break;
                        }
                        Ok(n) => {
                            buffer.extend_from_slice(&temp_buf[..n]);

                            loop {
                                match codec.decode(&mut buffer) {
                                    Ok(Some(mut request)) => {
                                        request.set_peer_addr(peer_addr);
                                        conn.update_last_recv();
                                        conn.count_request();

                                        let keep_alive =
                                            self.config.keep_alive && request.keep_alive();

                                        if let Err(e) = self.dispatch(&conn, request, keep_alive).await {
                                            warn!("Error sending to {}: {}", peer_addr, e);
                                            break 'outer;
                                        }

                                        if !keep_alive {
                                            break 'outer;
                                        }
                                    }
                                    Ok(None) => {
                                        break;
                                    }
                                    Err(HttpError::TooLarge { size, max }) => {
                                        warn!(
                                            "Request from {} too large ({} > {})",
                                            peer_addr, size, max
                                        );
                                        let response = Response::new()
                                            .with_status(StatusCode::RequestHeaderFieldsTooLarge)
                                            .with_header("Connection", "close")
                                            .with_header("Content-Length", "0");
                                        let _ = self.send_response(&conn, response, false).await;
                                        break 'outer;
                                    }
                                    Err(e) => {
                                        warn!("Error parsing request from {}: {}", peer_addr, e);
                                        let response = Response::new()
                                            .with_status(StatusCode::BadRequest)
                                            .with_header("Connection", "close")
                                            .with_header("Content-Length", "0");
                                        let _ = self.send_response(&conn, response, false).await;
                                        break 'outer;
                                    }
                                }
                            }
                        }
                        Err(e) => {
                            debug!("Connection {} read error: {}", peer_addr, e);
                            break;
                        }
                    }
                }
                _ = shutdown_rx.recv() => {
                    debug!("Connection {} shutting down due to server shutdown", peer_addr);
                    break;
                }
            }
        }
    }

    /// Resolves a handler, runs it and writes the response back.
    async fn dispatch(
        &self,
        conn: &Arc<Connection>,
        request: Request,
        keep_alive: bool,
    ) -> Result<()> {
        let peer_addr = conn.peer_addr();
        let request_line = request.request_line();
        let head_only = request.method() == &Method::Head;

        let response = match self.router.find_handler(request.method(), request.path()) {
            Ok(handler) => handler(request),
            Err(StatusCode::MethodNotAllowed) => strix_router::method_not_allowed(request),
            Err(_) => match &self.base_path {
                Some(base) => serve_dir(base, &request).await,
                None => strix_router::not_found(request),
            },
        };

        let status = response.status();
        let body_len = response.body().len();

        info!(
            "{} \"{}\" {} {}",
            peer_addr,
            request_line,
            status.to_u16(),
            body_len
        );

        let response = if head_only { response.into_head() } else { response };
        self.send_response(conn, response, keep_alive).await
    }

    async fn send_response(
        &self,
        conn: &Arc<Connection>,
        mut response: Response,
        keep_alive: bool,
    ) -> Result<()> {
        if response.header("server").is_none() {
            response = response.with_header("Server", self.registry.server_name());
        }
        if !keep_alive && response.header("connection").is_none() {
            response = response.with_header("Connection", "close");
        }

        let mut out = BytesMut::new();
        Http1Codec::default().encode(response, &mut out)?;
        conn.send_buf(&out).await
    }
}
