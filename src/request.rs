//! Incoming HTTP request type.

use std::collections::HashMap;

use bytes::Bytes;

use crate::method::Method;

/// An incoming HTTP request, as seen by a handler.
///
/// The server builds one of these per request after routing: the body has
/// already been collected and any `{name}` / `{*name}` route segments are
/// available through [`Request::param`].
#[derive(Debug)]
pub struct Request {
    method: Method,
    path: String,
    body: Bytes,
    params: HashMap<String, String>,
}

impl Request {
    pub(crate) fn new(
        method: Method,
        path: String,
        body: Bytes,
        params: HashMap<String, String>,
    ) -> Self {
        Self {
            method,
            path,
            body,
            params,
        }
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// The request body, fully collected.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// A route parameter captured by the matched pattern, e.g. `chirp_id`
    /// for a route registered as `/api/chirps/{chirp_id}`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }
}
