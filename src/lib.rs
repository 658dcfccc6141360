//! # chirpd
//!
//! A small HTTP backend for chirps: 140-byte posts with profanity redaction,
//! user accounts with Argon2id password hashing, and a hit-counted static
//! site. SQLite on disk. That is the entire backend.
//!
//! ## The contract
//!
//! chirpd expects a reverse proxy in front of it. TLS termination, rate
//! limits, slow-client defense, and body-size caps are nginx's job; chirpd
//! keeps for itself only what the proxy cannot do:
//!
//! - routing — one [`matchit`] radix tree per method
//! - async I/O — tokio + hyper, HTTP/1.1 and HTTP/2
//! - graceful shutdown — stop accepting on SIGTERM / Ctrl-C, drain, exit
//! - the chirp rules — moderation, accounts, persistence
//!
//! ## Endpoints
//!
//! | Method | Path | |
//! |---|---|---|
//! | `GET`  | `/app`, `/app/{*path}`   | static site, hit-counted |
//! | `GET`  | `/api/healthz`           | readiness probe |
//! | `POST` | `/api/validate_chirp`    | moderation dry run |
//! | `POST` | `/api/users`             | register |
//! | `POST` | `/api/login`             | email + password login |
//! | `POST` | `/api/chirps`            | create a chirp |
//! | `GET`  | `/api/chirps`            | list chirps, oldest first |
//! | `GET`  | `/api/chirps/{chirp_id}` | fetch one chirp |
//! | `GET`  | `/admin/metrics`         | hit-count page |
//! | `POST` | `/admin/reset`           | dev only: wipe counter + data |
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use chirpd::{AppState, Config, Server, Store};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), chirpd::Error> {
//!     let config = Config::from_env()?;
//!     let store = Store::open(&config.db_path)?;
//!     let state = Arc::new(AppState::new(store, config.platform, config.static_dir));
//!
//!     Server::bind(&config.bind_addr)
//!         .await?
//!         .serve(chirpd::routes(), state)
//!         .await
//! }
//! ```

mod admin;
mod auth;
mod chirps;
mod config;
mod error;
mod handler;
mod health;
mod json;
mod method;
mod moderation;
mod request;
mod response;
mod router;
mod server;
mod state;
mod static_files;
mod status;
mod store;
mod users;

pub use auth::{hash_password, verify_password, AuthError};
pub use config::{Config, ConfigError, Platform};
pub use error::Error;
pub use handler::Handler;
pub use method::Method;
pub use moderation::{sanitize, ModerationError, MAX_CHIRP_LENGTH};
pub use request::Request;
pub use response::{IntoResponse, Response};
pub use router::Router;
pub use server::Server;
pub use state::{AppState, HitCounter};
pub use status::Status;
pub use store::{ChirpRecord, Store, StoreError, UserRecord};

/// Builds the application router with every endpoint wired up.
///
/// `/app/` needs its own registration: the `{*path}` catch-all only matches
/// a non-empty remainder.
pub fn routes() -> Router {
    Router::new()
        // the static site, hit-counted
        .on(Method::Get, "/app", static_files::serve)
        .on(Method::Get, "/app/", static_files::serve)
        .on(Method::Get, "/app/{*path}", static_files::serve)
        // the API
        .on(Method::Get, "/api/healthz", health::readiness)
        .on(Method::Post, "/api/validate_chirp", chirps::validate)
        .on(Method::Post, "/api/users", users::create)
        .on(Method::Post, "/api/login", users::login)
        .on(Method::Post, "/api/chirps", chirps::create)
        .on(Method::Get, "/api/chirps", chirps::list)
        .on(Method::Get, "/api/chirps/{chirp_id}", chirps::get)
        // admin
        .on(Method::Get, "/admin/metrics", admin::metrics)
        .on(Method::Post, "/admin/reset", admin::reset)
}
