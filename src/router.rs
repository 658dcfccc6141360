//! Request routing over matchit radix trees.
//!
//! A path pattern goes in, a handler comes out, in O(path-length). There is
//! no middleware stack and no fallback chain — what you register is exactly
//! what runs.

use std::collections::HashMap;
use std::sync::Arc;

use matchit::Router as MatchitRouter;

use crate::handler::{BoxedHandler, Handler};
use crate::method::Method;

/// The application routing table.
///
/// Holds one radix tree per HTTP method; a lookup walks the tree for the
/// request's method in O(path-length). Built once at startup and handed to
/// [`Server::serve`]; [`Router::on`] returns `self` so registrations chain.
///
/// [`Server::serve`]: crate::Server::serve
pub struct Router {
    routes: HashMap<Method, MatchitRouter<BoxedHandler>>,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: HashMap::new() }
    }

    /// Registers `handler` for a method + path pair, returning `self` so
    /// calls chain.
    ///
    /// Path parameters use `{name}` syntax — `req.param("name")` retrieves
    /// them. `{*name}` at the end of a path catches everything that follows;
    /// static routes always win over a catch-all.
    ///
    /// ```rust,no_run
    /// # use std::sync::Arc;
    /// # use chirpd::{AppState, Method, Request, Response, Router};
    /// # async fn get_chirp(_: Arc<AppState>, _: Request) -> Response { Response::text("") }
    /// # async fn create_chirp(_: Arc<AppState>, _: Request) -> Response { Response::text("") }
    /// Router::new()
    ///     .on(Method::Get,  "/api/chirps/{chirp_id}", get_chirp)
    ///     .on(Method::Post, "/api/chirps",            create_chirp);
    /// ```
    pub fn on(self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.add(method, path, handler)
    }

    fn add(mut self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, handler.into_boxed_handler())
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self
    }

    pub(crate) fn lookup(
        &self,
        method: Method,
        path: &str,
    ) -> Option<(BoxedHandler, HashMap<String, String>)> {
        let tree = self.routes.get(&method)?;
        let matched = tree.at(path).ok()?;
        let handler = Arc::clone(matched.value);
        let params = matched.params.iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Some((handler, params))
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::Request;
    use crate::response::Response;
    use crate::state::AppState;

    async fn ok(_: Arc<AppState>, _: Request) -> Response {
        Response::text("ok")
    }

    fn router() -> Router {
        Router::new()
            .on(Method::Get, "/api/chirps", ok)
            .on(Method::Get, "/api/chirps/{chirp_id}", ok)
            .on(Method::Post, "/api/chirps", ok)
            .on(Method::Get, "/app", ok)
            .on(Method::Get, "/app/{*path}", ok)
    }

    #[test]
    fn static_route_matches() {
        assert!(router().lookup(Method::Get, "/api/chirps").is_some());
    }

    #[test]
    fn method_is_part_of_the_key() {
        assert!(router().lookup(Method::Delete, "/api/chirps").is_none());
    }

    #[test]
    fn params_are_captured() {
        let (_, params) = router()
            .lookup(Method::Get, "/api/chirps/abc-123")
            .unwrap();
        assert_eq!(params.get("chirp_id").map(String::as_str), Some("abc-123"));
    }

    #[test]
    fn catch_all_captures_the_rest() {
        let (_, params) = router()
            .lookup(Method::Get, "/app/assets/logo.css")
            .unwrap();
        assert_eq!(params.get("path").map(String::as_str), Some("assets/logo.css"));
    }

    #[test]
    fn unknown_path_misses() {
        assert!(router().lookup(Method::Get, "/nope").is_none());
    }
}
