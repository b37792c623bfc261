use std::path::{Path, PathBuf};

use strix_http::{Request, Response, StatusCode};
use tracing::{debug, warn};

/// Content types for the extensions we expect to serve. Anything else is
/// sent as octet-stream.
fn content_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html") | Some("htm") => "text/html; charset=utf-8",
        Some("css") => "text/css",
        Some("js") => "application/javascript",
        Some("json") => "application/json",
        Some("txt") => "text/plain; charset=utf-8",
        Some("xml") => "application/xml",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("ico") => "image/x-icon",
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("wasm") => "application/wasm",
        Some("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
}

/// Serves `request.path()` from under `base`.
///
/// The resolved target is canonicalized and checked against the
/// canonicalized base, so `..` segments and symlinks cannot escape it.
/// Directory targets fall back to their `index.html`.
pub async fn serve_dir(base: &Path, request: &Request) -> Response {
    let head_only = request.method() == &strix_http::Method::Head;

    let relative = request.path().trim_start_matches('/');
    let mut target: PathBuf = base.join(relative);

    let base = match tokio::fs::canonicalize(base).await {
        Ok(base) => base,
        Err(e) => {
            warn!("static root {} unusable: {}", base.display(), e);
            return not_found();
        }
    };

    target = match tokio::fs::canonicalize(&target).await {
        Ok(target) => target,
        Err(_) => {
            debug!("static miss: {}", target.display());
            return not_found();
        }
    };

    if !target.starts_with(&base) {
        warn!(
            "refusing path escaping static root: {} (from {})",
            target.display(),
            request.path()
        );
        return not_found();
    }

    if let Ok(meta) = tokio::fs::metadata(&target).await
        && meta.is_dir()
    {
        target.push("index.html");
    }

    match tokio::fs::read(&target).await {
        Ok(contents) => {
            let response = Response::new()
                .with_status(StatusCode::Ok)
                .with_header("Content-Type", content_type_for(&target))
                .with_body(contents);
            if head_only {
                response.into_head()
            } else {
                response
            }
        }
        Err(_) => not_found(),
    }
}

fn not_found() -> Response {
    Response::new()
        .with_status(StatusCode::NotFound)
        .with_header("Content-Length", "0")
}

#[cfg(test)]
mod tests {
    use super::*;
    use strix_http::{Method, Request};

    fn request(path: &str) -> Request {
        Request::builder(Method::Get, path).build()
    }

    async fn fixture() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        tokio::fs::write(dir.path().join("index.html"), "<h1>home</h1>")
            .await
            .unwrap();
        tokio::fs::write(dir.path().join("app.js"), "console.log(1)")
            .await
            .unwrap();
        tokio::fs::create_dir(dir.path().join("sub")).await.unwrap();
        tokio::fs::write(dir.path().join("sub/index.html"), "sub")
            .await
            .unwrap();
        dir
    }

    #[tokio::test]
    async fn serves_files_with_content_type() {
        let dir = fixture().await;
        let resp = serve_dir(dir.path(), &request("/app.js")).await;
        assert_eq!(resp.status(), StatusCode::Ok);
        assert_eq!(resp.header("content-type"), Some("application/javascript"));
        assert_eq!(resp.body().as_ref(), b"console.log(1)");
    }

    #[tokio::test]
    async fn directory_falls_back_to_index() {
        let dir = fixture().await;
        let resp = serve_dir(dir.path(), &request("/")).await;
        assert_eq!(resp.status(), StatusCode::Ok);
        assert_eq!(resp.body().as_ref(), b"<h1>home</h1>");

        let resp = serve_dir(dir.path(), &request("/sub")).await;
        assert_eq!(resp.body().as_ref(), b"sub");
    }

    #[tokio::test]
    async fn missing_file_is_404() {
        let dir = fixture().await;
        let resp = serve_dir(dir.path(), &request("/nope.txt")).await;
        assert_eq!(resp.status(), StatusCode::NotFound);
    }

    #[tokio::test]
    async fn traversal_cannot_escape_the_root() {
        let dir = fixture().await;
        // the secret lives next to the served root
        let parent = dir.path().parent().unwrap().to_path_buf();
        tokio::fs::write(parent.join("secret.txt"), "nope")
            .await
            .ok();

        let resp = serve_dir(dir.path(), &request("/../secret.txt")).await;
        assert_eq!(resp.status(), StatusCode::NotFound);
    }

    #[tokio::test]
    async fn head_keeps_headers_drops_body() {
        let dir = fixture().await;
        let req = Request::builder(Method::Head, "/app.js").build();
        let resp = serve_dir(dir.path(), &req).await;
        assert_eq!(resp.status(), StatusCode::Ok);
        assert!(resp.body().is_empty());
        assert_eq!(resp.header("content-length"), Some("14"));
    }
}
