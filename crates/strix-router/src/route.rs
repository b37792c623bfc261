use std::fmt;

use strix_http::Method;

use crate::path::RoutePath;
use crate::{Handler, Result, handlers};

/// One routing rule: method + path pattern + handler.
pub struct Route {
    pub method: Method,
    pub path: RoutePath,
    pub handler: Handler,
}

impl Route {
    pub fn options(path: &str) -> Result<RouteBuilder> {
        Route::from(Method::Options, path)
    }

    pub fn get(path: &str) -> Result<RouteBuilder> {
        Route::from(Method::Get, path)
    }

    pub fn post(path: &str) -> Result<RouteBuilder> {
        Route::from(Method::Post, path)
    }

    pub fn put(path: &str) -> Result<RouteBuilder> {
        Route::from(Method::Put, path)
    }

    pub fn delete(path: &str) -> Result<RouteBuilder> {
        Route::from(Method::Delete, path)
    }

    pub fn head(path: &str) -> Result<RouteBuilder> {
        Route::from(Method::Head, path)
    }

    pub fn trace(path: &str) -> Result<RouteBuilder> {
        Route::from(Method::Trace, path)
    }

    pub fn connect(path: &str) -> Result<RouteBuilder> {
        Route::from(Method::Connect, path)
    }

    pub fn patch(path: &str) -> Result<RouteBuilder> {
        Route::from(Method::Patch, path)
    }

    pub fn from(method: Method, path: &str) -> Result<RouteBuilder> {
        Ok(RouteBuilder {
            route: Route {
                method,
                path: RoutePath::new(path)?,
                handler: handlers::not_implemented,
            },
        })
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

/// Finishes a [`Route`] by attaching its handler.
#[derive(Debug)]
pub struct RouteBuilder {
    route: Route,
}

impl RouteBuilder {
    pub fn using(mut self, handler: Handler) -> Route {
        self.route.handler = handler;
        self.route
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strix_http::{Request, Response, StatusCode};

    fn noop(_req: Request) -> Response {
        Response::new()
    }

    #[test]
    fn constructors_set_the_method() {
        assert_eq!(Route::get("/").unwrap().using(noop).method, Method::Get);
        assert_eq!(Route::patch("/").unwrap().using(noop).method, Method::Patch);
    }

    #[test]
    fn unfinished_route_answers_not_implemented() {
        let route = Route::from(Method::Get, "/").unwrap().route;
        let resp = (route.handler)(Request::builder(Method::Get, "/").build());
        assert_eq!(resp.status(), StatusCode::NotImplemented);
    }
}
