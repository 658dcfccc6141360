//! Admin endpoints: the hit-counter page and the destructive dev reset.

use std::sync::Arc;

use tracing::{error, info};

use crate::config::Platform;
use crate::request::Request;
use crate::response::Response;
use crate::state::AppState;
use crate::status::Status;

/// `GET /admin/metrics` — a small HTML page with the site hit count.
pub async fn metrics(state: Arc<AppState>, _req: Request) -> Response {
    let hits = state.metrics.count();
    Response::html(format!(
        "<html>\n  <body>\n    <h1>Welcome, Chirpd Admin</h1>\n    \
         <p>Chirpd has been visited {hits} times!</p>\n  </body>\n</html>"
    ))
}

/// `POST /admin/reset` — zeroes the hit counter and deletes every user
/// (chirps cascade). Refused outside the dev platform with a `403`.
pub async fn reset(state: Arc<AppState>, _req: Request) -> Response {
    if state.platform != Platform::Dev {
        return Response::builder()
            .status(Status::Forbidden)
            .text("Reset is only allowed in dev environment.");
    }

    state.metrics.reset();

    if let Err(e) = state.db.reset().await {
        error!("database reset failed: {e}");
        return Response::builder()
            .status(Status::InternalServerError)
            .text(format!("Failed to reset the database: {e}"));
    }

    info!("hit counter and database reset");
    Response::text("Hits reset to 0 and database reset to initial state.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::method::Method;
    use crate::store::Store;
    use bytes::Bytes;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn state(platform: Platform) -> Arc<AppState> {
        let store = Store::open_in_memory().expect("in-memory store");
        Arc::new(AppState::new(store, platform, PathBuf::from(".")))
    }

    fn request(method: Method, path: &str) -> Request {
        Request::new(method, path.to_string(), Bytes::new(), HashMap::new())
    }

    #[tokio::test]
    async fn metrics_reports_the_current_count() {
        let state = state(Platform::Dev);
        state.metrics.record();
        state.metrics.record();

        let response = metrics(state, request(Method::Get, "/admin/metrics")).await;
        assert_eq!(response.status, Status::Ok);

        let text = String::from_utf8(response.body).unwrap();
        assert!(text.contains("Chirpd has been visited 2 times!"));
        assert!(text.contains("<h1>Welcome, Chirpd Admin</h1>"));
    }

    #[tokio::test]
    async fn reset_is_dev_only() {
        let state = state(Platform::Production);
        state.metrics.record();

        let response = reset(Arc::clone(&state), request(Method::Post, "/admin/reset")).await;
        assert_eq!(response.status, Status::Forbidden);
        assert_eq!(response.body, b"Reset is only allowed in dev environment.");
        // Refused means untouched.
        assert_eq!(state.metrics.count(), 1);
    }

    #[tokio::test]
    async fn reset_clears_counter_and_users() {
        let state = state(Platform::Dev);
        state.metrics.record();
        state
            .db
            .create_user("walt@breaking.bad".into(), "h".into())
            .await
            .unwrap();

        let response = reset(Arc::clone(&state), request(Method::Post, "/admin/reset")).await;
        assert_eq!(response.status, Status::Ok);
        assert_eq!(
            response.body,
            b"Hits reset to 0 and database reset to initial state."
        );
        assert_eq!(state.metrics.count(), 0);
        assert!(state
            .db
            .user_by_email("walt@breaking.bad".into())
            .await
            .unwrap()
            .is_none());
    }
}
