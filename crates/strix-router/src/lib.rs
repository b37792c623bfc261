//! Regex-based request routing.
//!
//! Routes pair an HTTP method with an anchored path pattern and a plain
//! function handler. Handlers are synchronous on purpose: the server runs
//! them inside the connection task, and anything long-running belongs in
//! its own spawned task.
//!
//! ```
//! use strix_http::{Request, Response, StatusCode};
//! use strix_router::{Route, RouterBuilder};
//!
//! fn hello(_req: Request) -> Response {
//!     Response::new()
//!         .with_status(StatusCode::Ok)
//!         .with_body("hello")
//! }
//!
//! let router = RouterBuilder::new()
//!     .add(Route::get(r"/hello").unwrap().using(hello))
//!     .build();
//! ```

mod builder;
mod handlers;
mod path;
mod route;

pub use builder::RouterBuilder;
pub use handlers::{internal_server_error, method_not_allowed, not_found, not_implemented};
pub use path::RoutePath;
pub use route::{Route, RouteBuilder};

use strix_http::{Method, Request, Response, StatusCode};

/// A request handler. Takes the parsed request and produces a response.
pub type Handler = fn(Request) -> Response;

/// Errors raised while assembling routes.
#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    #[error("invalid route pattern: {0}")]
    Pattern(#[from] regex::Error),
}

pub type Result<T> = std::result::Result<T, RouterError>;

/// An ordered collection of routes. First matching route wins.
#[derive(Debug, Default)]
pub struct Router {
    pub(crate) routes: Vec<Route>,
}

impl Router {
    /// Looks up the handler for a method/path pair.
    ///
    /// No route matches the path at all -> `Err(NotFound)`. Some route
    /// matches the path but none with this method -> `Err(MethodNotAllowed)`.
    pub fn find_handler(&self, method: &Method, path: &str) -> std::result::Result<Handler, StatusCode> {
        let matching: Vec<&Route> = self
            .routes
            .iter()
            .filter(|route| route.path.is_match(path))
            .collect();

        if matching.is_empty() {
            return Err(StatusCode::NotFound);
        }

        matching
            .iter()
            .find(|route| route.method == *method)
            .map(|route| route.handler)
            .ok_or(StatusCode::MethodNotAllowed)
    }

    /// Like [`find_handler`](Self::find_handler) but maps the error cases to
    /// the built-in error handlers, so the caller always gets something to
    /// run. This is what the server dispatch uses.
    pub fn find_handler_with_defaults(&self, method: &Method, path: &str) -> Handler {
        match self.find_handler(method, path) {
            Ok(handler) => handler,
            Err(StatusCode::MethodNotAllowed) => handlers::method_not_allowed,
            Err(_) => handlers::not_found,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }
}
