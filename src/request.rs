//! Incoming HTTP request type.

use std::collections::HashMap;

use bytes::Bytes;

use crate::method::Method;

/// An incoming HTTP request with its body fully collected.
///
/// `method` is `None` when the wire verb is not one [`Method`] knows about;
/// such requests never match a route and go straight to the fallback.
pub struct Request {
    pub(crate) method: Option<Method>,
    pub(crate) path: String,
    pub(crate) body: Bytes,
    pub(crate) params: HashMap<String, String>,
}

impl Request {
    pub(crate) fn new(method: Option<Method>, path: impl Into<String>, body: Bytes) -> Self {
        Self { method, path: path.into(), body, params: HashMap::new() }
    }

    pub fn method(&self) -> Option<Method> { self.method }
    pub fn path(&self) -> &str { &self.path }
    pub fn body(&self) -> &[u8] { &self.body }

    /// Returns a named path parameter.
    ///
    /// For a route `/recipes/{id}`, `req.param("id")` on `/recipes/42` returns `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }
}
