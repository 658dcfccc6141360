//! Static file serving for the `/app` site, with hit counting.

use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::request::Request;
use crate::response::Response;
use crate::state::AppState;
use crate::status::Status;

/// Serves a file from the configured static root.
///
/// Handles `GET /app`, `GET /app/`, and `GET /app/{*path}`. Directory
/// requests (including the site root) resolve to their `index.html`.
/// Every request increments the hit counter, 404s included.
pub async fn serve(state: Arc<AppState>, req: Request) -> Response {
    state.metrics.record();

    let rel = req.param("path").unwrap_or_default();
    if !is_safe(rel) {
        return Response::status(Status::NotFound);
    }

    let mut path = state.static_dir.join(rel);
    if rel.is_empty() || is_dir(&path).await {
        path.push("index.html");
    }

    match tokio::fs::read(&path).await {
        Ok(contents) => Response::builder().bytes(content_type_for(&path), contents),
        Err(e) => {
            debug!(path = %path.display(), "static file miss: {e}");
            Response::status(Status::NotFound)
        }
    }
}

/// Rejects anything that could escape the static root: absolute paths and
/// `..` segments. (`PathBuf::join` swaps in the whole path when handed an
/// absolute one.)
fn is_safe(rel: &str) -> bool {
    !rel.starts_with('/') && rel.split('/').all(|segment| segment != "..")
}

async fn is_dir(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|meta| meta.is_dir())
        .unwrap_or(false)
}

fn content_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("html") | Some("htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js") => "text/javascript; charset=utf-8",
        Some("json") => "application/json",
        Some("txt") => "text/plain; charset=utf-8",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        Some("webp") => "image/webp",
        Some("woff2") => "font/woff2",
        Some("wasm") => "application/wasm",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Platform;
    use crate::method::Method;
    use crate::store::Store;
    use bytes::Bytes;
    use std::collections::HashMap;

    fn state_with_root(root: &Path) -> Arc<AppState> {
        let store = Store::open_in_memory().expect("in-memory store");
        Arc::new(AppState::new(store, Platform::Dev, root.to_path_buf()))
    }

    fn request_for(rel: Option<&str>) -> Request {
        let mut params = HashMap::new();
        if let Some(rel) = rel {
            params.insert("path".to_string(), rel.to_string());
        }
        Request::new(Method::Get, "/app".to_string(), Bytes::new(), params)
    }

    #[test]
    fn content_types_by_extension() {
        assert_eq!(
            content_type_for(Path::new("index.html")),
            "text/html; charset=utf-8"
        );
        assert_eq!(content_type_for(Path::new("app.wasm")), "application/wasm");
        assert_eq!(
            content_type_for(Path::new("mystery.bin")),
            "application/octet-stream"
        );
        assert_eq!(
            content_type_for(Path::new("no_extension")),
            "application/octet-stream"
        );
    }

    #[tokio::test]
    async fn serves_index_for_the_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>Welcome to Chirpd</h1>").unwrap();
        let state = state_with_root(dir.path());

        let response = serve(Arc::clone(&state), request_for(None)).await;
        assert_eq!(response.status, Status::Ok);
        assert_eq!(response.body, b"<h1>Welcome to Chirpd</h1>");
        assert_eq!(state.metrics.count(), 1);
    }

    #[tokio::test]
    async fn serves_assets_with_content_types() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("assets")).unwrap();
        std::fs::write(dir.path().join("assets/site.css"), "body {}").unwrap();
        let state = state_with_root(dir.path());

        let response = serve(state, request_for(Some("assets/site.css"))).await;
        assert_eq!(response.status, Status::Ok);
        assert_eq!(response.body, b"body {}");
        assert!(response
            .headers
            .iter()
            .any(|(name, value)| name == "content-type" && value == "text/css; charset=utf-8"));
    }

    #[tokio::test]
    async fn serves_directory_index() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("docs")).unwrap();
        std::fs::write(dir.path().join("docs/index.html"), "docs").unwrap();
        let state = state_with_root(dir.path());

        let response = serve(state, request_for(Some("docs"))).await;
        assert_eq!(response.status, Status::Ok);
        assert_eq!(response.body, b"docs");
    }

    #[tokio::test]
    async fn rejects_path_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_with_root(dir.path());

        for rel in ["../secrets.txt", "a/../../b", "/etc/passwd"] {
            let response = serve(Arc::clone(&state), request_for(Some(rel))).await;
            assert_eq!(response.status, Status::NotFound, "{rel} should be rejected");
        }
        // Misses count too.
        assert_eq!(state.metrics.count(), 3);
    }

    #[tokio::test]
    async fn missing_files_are_404s_and_still_count() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_with_root(dir.path());

        let response = serve(Arc::clone(&state), request_for(Some("nope.html"))).await;
        assert_eq!(response.status, Status::NotFound);
        assert_eq!(state.metrics.count(), 1);
    }
}
