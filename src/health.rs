//! Readiness probe.

use std::sync::Arc;

use crate::request::Request;
use crate::state::AppState;

/// `GET /api/healthz`.
///
/// Always `200 OK` with a plain-text `OK` body. If the process can respond
/// to HTTP at all, it can serve traffic, so this handler has no dependencies.
pub async fn readiness(_state: Arc<AppState>, _req: Request) -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Platform;
    use crate::method::Method;
    use crate::response::IntoResponse;
    use crate::status::Status;
    use crate::store::Store;
    use bytes::Bytes;
    use std::collections::HashMap;
    use std::path::PathBuf;

    #[tokio::test]
    async fn readiness_answers_plain_text_ok() {
        let store = Store::open_in_memory().expect("in-memory store");
        let state = Arc::new(AppState::new(store, Platform::Dev, PathBuf::from(".")));
        let req = Request::new(
            Method::Get,
            "/api/healthz".to_string(),
            Bytes::new(),
            HashMap::new(),
        );

        let response = readiness(state, req).await.into_response();
        assert_eq!(response.status, Status::Ok);
        assert_eq!(response.body, b"OK");
        assert!(response
            .headers
            .iter()
            .any(|(name, value)| name == "content-type" && value == "text/plain; charset=utf-8"));
    }
}
