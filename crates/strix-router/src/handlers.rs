//! Built-in error handlers. All of them answer with an empty body and an
//! explicit zero `Content-Length`.

use strix_http::{Request, Response, StatusCode};

pub fn not_found(_req: Request) -> Response {
    empty(StatusCode::NotFound)
}

pub fn method_not_allowed(_req: Request) -> Response {
    empty(StatusCode::MethodNotAllowed)
}

pub fn internal_server_error(_req: Request) -> Response {
    empty(StatusCode::InternalServerError)
}

pub fn not_implemented(_req: Request) -> Response {
    empty(StatusCode::NotImplemented)
}

fn empty(status: StatusCode) -> Response {
    Response::new()
        .with_status(status)
        .with_header("Content-Length", "0")
}

#[cfg(test)]
mod tests {
    use super::*;
    use strix_http::Method;

    #[test]
    fn error_handlers_have_empty_bodies() {
        let req = || strix_http::Request::builder(Method::Get, "/").build();
        for (handler, status) in [
            (not_found as crate::Handler, StatusCode::NotFound),
            (method_not_allowed, StatusCode::MethodNotAllowed),
            (internal_server_error, StatusCode::InternalServerError),
            (not_implemented, StatusCode::NotImplemented),
        ] {
            let resp = handler(req());
            assert_eq!(resp.status(), status);
            assert!(resp.body().is_empty());
            assert_eq!(resp.header("content-length"), Some("0"));
        }
    }
}
