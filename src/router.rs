//! Radix-tree request router.
//!
//! One tree per HTTP method. O(path-length) lookup. Resource routers are
//! built on their own and mounted under a prefix with [`Router::nest`];
//! whatever no tree matches goes to the fallback.

use std::collections::HashMap;
use std::sync::Arc;

use matchit::Router as MatchitRouter;

use crate::handler::{BoxedHandler, Handler};
use crate::method::Method;
use crate::request::Request;
use crate::response::Response;
use crate::status::Status;

/// The application router.
///
/// Build it once at startup and hand it to [`Server::serve`](crate::Server::serve).
/// Each registration returns `self` so calls chain.
pub struct Router {
    routes: HashMap<Method, MatchitRouter<BoxedHandler>>,
    // Every registration in order, so a router can be re-mounted under a prefix.
    table: Vec<(Method, String, BoxedHandler)>,
    fallback: Option<BoxedHandler>,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: HashMap::new(), table: Vec::new(), fallback: None }
    }

    /// Register a handler for a method + path pair.
    ///
    /// Path parameters use `{name}` syntax; `req.param("name")` retrieves them.
    ///
    /// # Panics
    ///
    /// Panics if the path is malformed or conflicts with an existing route.
    /// Routes are fixed at startup, so this is a programming error.
    pub fn on(self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.insert(method, path.to_owned(), handler.into_boxed_handler())
    }

    pub fn get(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::Get, path, handler)
    }

    pub fn post(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::Post, path, handler)
    }

    pub fn put(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::Put, path, handler)
    }

    pub fn delete(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::Delete, path, handler)
    }

    /// Mounts every route of `other` under `prefix`.
    ///
    /// A nested `/` answers on both `prefix` and `prefix/`. The nested
    /// router's fallback is dropped; only the outermost one is used.
    ///
    /// ```rust,no_run
    /// # use pantry::{Router, Status, Request};
    /// # async fn list(_: Request) -> Status { Status::Ok }
    /// let recipes = Router::new().get("/", list);
    /// let app = Router::new().nest("/recipes", recipes);
    /// ```
    pub fn nest(mut self, prefix: &str, other: Router) -> Self {
        for (method, path, handler) in other.table {
            for full in join(prefix, &path) {
                self = self.insert(method, full, Arc::clone(&handler));
            }
        }
        self
    }

    /// Sets the handler for requests no route matches, including requests
    /// with a method [`Method`] does not know.
    pub fn fallback(mut self, handler: impl Handler) -> Self {
        self.fallback = Some(handler.into_boxed_handler());
        self
    }

    fn insert(mut self, method: Method, path: String, handler: BoxedHandler) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path.as_str(), Arc::clone(&handler))
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self.table.push((method, path, handler));
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

    /// Routes one request and produces one response.
    pub(crate) async fn dispatch(&self, mut req: Request) -> Response {
        let found = req.method.and_then(|m| self.lookup(m, &req.path));
        match (found, &self.fallback) {
            (Some((handler, params)), _) => {
                req.params = params;
                handler.call(req).await
            }
            (None, Some(fallback)) => fallback.call(req).await,
            (None, None) => not_found(),
        }
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}

/// The generic 404 every unmatched request ends in.
pub fn not_found() -> Response {
    Response::builder()
        .status(Status::NotFound)
        .json(br#"{"error":"Not found"}"#.to_vec())
}

fn join(prefix: &str, path: &str) -> Vec<String> {
    let prefix = prefix.trim_end_matches('/');
    match (prefix.is_empty(), path) {
        (true, _) => vec![path.to_owned()],
        (false, "/") => vec![prefix.to_owned(), format!("{prefix}/")],
        (false, _) => vec![format!("{prefix}{path}")],
    }
}
