use std::future::Future;

use serde::Serialize;
use serde_json::Value;

use crate::{api::Method, error::ApiError};

/// JSON over HTTP with bearer authentication.
///
/// Implementations map a 401 to [`ApiError::Auth`], any other non-2xx status
/// to [`ApiError::Server`] carrying the raw body, and an unparsable 2xx body
/// to [`ApiError::Malformed`]. An empty 2xx body is `Value::Null`.
pub trait Transport {
    fn get(&self, path: &str, token: &str) -> impl Future<Output = Result<Value, ApiError>>;

    fn mutate(
        &self,
        method: Method,
        path: &str,
        body: &impl Serialize,
        token: &str,
    ) -> impl Future<Output = Result<Value, ApiError>>;
}
