use crate::{Route, Router};

/// Collects routes and produces a [`Router`].
///
/// ```
/// use strix_http::{Request, Response};
/// use strix_router::{Route, RouterBuilder};
///
/// fn person(_req: Request) -> Response {
///     Response::new()
/// }
///
/// let router = RouterBuilder::new()
///     .add(Route::get(r"/person/\d+").unwrap().using(person))
///     .build();
/// ```
#[derive(Debug, Default)]
pub struct RouterBuilder {
    routes: Vec<Route>,
}

impl RouterBuilder {
    pub fn new() -> RouterBuilder {
        RouterBuilder::default()
    }

    pub fn add(mut self, route: Route) -> RouterBuilder {
        tracing::debug!("registered route {} {}", route.method, route.path.as_str());
        self.routes.push(route);
        self
    }

    pub fn build(self) -> Router {
        Router {
            routes: self.routes,
        }
    }
}
