use anyhow::Result;
use strix_http::{Request, Response, StatusCode};
use strix_router::{Route, RouterBuilder};
use strix_test::factory::TestEnv;

fn hello(_req: Request) -> Response {
    Response::new()
        .with_status(StatusCode::Ok)
        .with_header("Content-Type", "text/plain")
        .with_body("hello strix")
}

fn echo(req: Request) -> Response {
    let body = req.body().clone();
    Response::new().with_status(StatusCode::Ok).with_body(body)
}

fn routed() -> strix_router::Router {
    RouterBuilder::new()
        .add(Route::get(r"/hello").unwrap().using(hello))
        .add(Route::post(r"/echo").unwrap().using(echo))
        .build()
}

#[tokio::test]
async fn get_round_trip() -> Result<()> {
    let mut env = TestEnv::default();
    let server = env.start_server(routed(), None).await?;

    let mut client = env.connect(&server).await?;
    let resp = client.get("/hello").await?;

    assert_eq!(resp.status, 200);
    assert_eq!(resp.body, b"hello strix");
    assert_eq!(resp.header("content-type"), Some("text/plain"));
    assert_eq!(resp.header("server"), Some("strix-test"));
    assert!(resp.header("date").is_some());

    env.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn unknown_path_is_404() -> Result<()> {
    let mut env = TestEnv::default();
    let server = env.start_server(routed(), None).await?;

    let mut client = env.connect(&server).await?;
    let resp = client.get("/missing").await?;
    assert_eq!(resp.status, 404);
    assert!(resp.body.is_empty());

    env.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn wrong_method_is_405() -> Result<()> {
    let mut env = TestEnv::default();
    let server = env.start_server(routed(), None).await?;

    let mut client = env.connect(&server).await?;
    let resp = client.get("/echo").await?;
    assert_eq!(resp.status, 405);

    env.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn post_echoes_the_body() -> Result<()> {
    let mut env = TestEnv::default();
    let server = env.start_server(routed(), None).await?;

    let payload = vec![0x42u8; 16 * 1024];
    let mut client = env.connect(&server).await?;
    let resp = client.post("/echo", &payload).await?;

    assert_eq!(resp.status, 200);
    assert_eq!(resp.body, payload);

    env.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn keep_alive_reuses_the_connection() -> Result<()> {
    let mut env = TestEnv::default();
    let server = env.start_server(routed(), None).await?;

    let mut client = env.connect(&server).await?;
    for _ in 0..3 {
        let resp = client.get("/hello").await?;
        assert_eq!(resp.status, 200);
    }

    // three requests, still one connection in the registry
    assert_eq!(env.registry().len(), 1);

    env.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn pipelined_requests_are_answered_in_order() -> Result<()> {
    let mut env = TestEnv::default();
    let server = env.start_server(routed(), None).await?;

    let mut client = env.connect(&server).await?;
    client
        .send_raw(
            b"GET /hello HTTP/1.1\r\nHost: a\r\n\r\nGET /missing HTTP/1.1\r\nHost: a\r\n\r\n",
        )
        .await?;

    let first = client.read_response().await?;
    let second = client.read_response().await?;
    assert_eq!(first.status, 200);
    assert_eq!(first.body, b"hello strix");
    assert_eq!(second.status, 404);

    env.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn serves_static_files() -> Result<()> {
    let dir = tempfile::tempdir()?;
    tokio::fs::write(dir.path().join("index.html"), "<p>static</p>").await?;

    let mut env = TestEnv::default();
    let server = env
        .start_server(RouterBuilder::new().build(), Some(dir.path().to_path_buf()))
        .await?;

    let mut client = env.connect(&server).await?;
    let resp = client.get("/index.html").await?;
    assert_eq!(resp.status, 200);
    assert_eq!(resp.body, b"<p>static</p>");
    assert_eq!(resp.header("content-type"), Some("text/html; charset=utf-8"));

    // directory target falls back to index.html
    let resp = client.get("/").await?;
    assert_eq!(resp.status, 200);
    assert_eq!(resp.body, b"<p>static</p>");

    env.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn connection_close_is_honored() -> Result<()> {
    let mut env = TestEnv::default();
    let server = env.start_server(routed(), None).await?;

    let mut client = env.connect(&server).await?;
    client
        .send_raw(b"GET /hello HTTP/1.1\r\nHost: a\r\nConnection: close\r\n\r\n")
        .await?;
    let resp = client.read_response().await?;
    assert_eq!(resp.status, 200);
    assert_eq!(resp.header("connection"), Some("close"));

    // server side closes; the rest of the stream is EOF
    let rest = client.read_to_end().await?;
    assert!(rest.is_empty());

    env.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn garbage_gets_400_and_a_close() -> Result<()> {
    let mut env = TestEnv::default();
    let server = env.start_server(routed(), None).await?;

    let mut client = env.connect(&server).await?;
    client.send_raw(b"GARBAGE\r\n\r\n").await?;
    let resp = client.read_response().await?;
    assert_eq!(resp.status, 400);

    let rest = client.read_to_end().await?;
    assert!(rest.is_empty());

    env.shutdown().await;
    Ok(())
}

#[tokio::test]
async fn graceful_shutdown_closes_live_connections() -> Result<()> {
    let mut env = TestEnv::default();
    let server = env.start_server(routed(), None).await?;

    let mut client = env.connect(&server).await?;
    let resp = client.get("/hello").await?;
    assert_eq!(resp.status, 200);

    server.close().await;

    // the idle keep-alive connection is torn down
    let rest = client.read_to_end().await?;
    assert!(rest.is_empty());
    assert_eq!(env.registry().len(), 0);

    env.shutdown().await;
    Ok(())
}
