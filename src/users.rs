//! User registration and login.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};
use uuid::Uuid;

use crate::auth;
use crate::json::{decode, respond_err, respond_json};
use crate::request::Request;
use crate::response::Response;
use crate::state::AppState;
use crate::status::Status;
use crate::store::UserRecord;

/// A user as it appears on the wire. There is deliberately no password field
/// of any kind here — the hash cannot end up in a response.
#[derive(Serialize)]
pub struct User {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub email: String,
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            created_at: record.created_at,
            updated_at: record.updated_at,
            email: record.email,
        }
    }
}

#[derive(Deserialize)]
struct Credentials {
    password: String,
    email: String,
}

/// `POST /api/users` — registers a user.
pub async fn create(state: Arc<AppState>, req: Request) -> Response {
    let params: Credentials = match decode(req.body()) {
        Ok(params) => params,
        Err(response) => return response,
    };

    let hashed_password = match auth::hash_password(&params.password) {
        Ok(hash) => hash,
        Err(e) => {
            error!("failed to hash password: {e}");
            return respond_err(Status::InternalServerError, "Couldn't hash password");
        }
    };

    match state.db.create_user(params.email, hashed_password).await {
        Ok(record) => respond_json(Status::Created, &User::from(record)),
        Err(e) => {
            error!("failed to create user: {e}");
            respond_err(Status::InternalServerError, "Couldn't create user")
        }
    }
}

/// `POST /api/login`.
///
/// Every authentication failure — unknown email, wrong password, lookup
/// error — produces the same `401` body, so the response never reveals
/// whether an email is registered.
pub async fn login(state: Arc<AppState>, req: Request) -> Response {
    const INCORRECT: &str = "Incorrect email or password";

    let params: Credentials = match decode(req.body()) {
        Ok(params) => params,
        Err(response) => return response,
    };

    let user = match state.db.user_by_email(params.email).await {
        Ok(Some(user)) => user,
        Ok(None) => return respond_err(Status::Unauthorized, INCORRECT),
        Err(e) => {
            error!("failed to look up user: {e}");
            return respond_err(Status::Unauthorized, INCORRECT);
        }
    };

    if let Err(e) = auth::verify_password(&params.password, &user.hashed_password) {
        warn!(user = %user.id, "rejected login: {e}");
        return respond_err(Status::Unauthorized, INCORRECT);
    }

    respond_json(Status::Ok, &User::from(user))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Platform;
    use crate::method::Method;
    use crate::store::Store;
    use bytes::Bytes;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn state() -> Arc<AppState> {
        let store = Store::open_in_memory().expect("in-memory store");
        Arc::new(AppState::new(store, Platform::Dev, PathBuf::from(".")))
    }

    fn post(path: &str, body: &str) -> Request {
        Request::new(
            Method::Post,
            path.to_string(),
            Bytes::copy_from_slice(body.as_bytes()),
            HashMap::new(),
        )
    }

    #[tokio::test]
    async fn create_returns_the_user_without_password_fields() {
        let state = state();
        let response = create(
            Arc::clone(&state),
            post("/api/users", r#"{"password":"hunter2","email":"walt@breaking.bad"}"#),
        )
        .await;
        assert_eq!(response.status, Status::Created);

        let text = String::from_utf8(response.body.clone()).unwrap();
        assert!(text.contains(r#""email":"walt@breaking.bad""#));
        assert!(!text.contains("password"));
        assert!(!text.contains("hash"));

        // The stored hash is a PHC string, not the plaintext.
        let stored = state
            .db
            .user_by_email("walt@breaking.bad".into())
            .await
            .unwrap()
            .expect("user exists");
        assert!(stored.hashed_password.starts_with("$argon2id$"));
    }

    #[tokio::test]
    async fn duplicate_registration_is_a_500() {
        let state = state();
        let body = r#"{"password":"hunter2","email":"walt@breaking.bad"}"#;
        let first = create(Arc::clone(&state), post("/api/users", body)).await;
        assert_eq!(first.status, Status::Created);

        let second = create(state, post("/api/users", body)).await;
        assert_eq!(second.status, Status::InternalServerError);
        assert_eq!(second.body, br#"{"error":"Couldn't create user"}"#);
    }

    #[tokio::test]
    async fn login_round_trip() {
        let state = state();
        create(
            Arc::clone(&state),
            post("/api/users", r#"{"password":"hunter2","email":"walt@breaking.bad"}"#),
        )
        .await;

        let response = login(
            state,
            post("/api/login", r#"{"password":"hunter2","email":"walt@breaking.bad"}"#),
        )
        .await;
        assert_eq!(response.status, Status::Ok);

        let text = String::from_utf8(response.body).unwrap();
        assert!(text.contains(r#""email":"walt@breaking.bad""#));
        assert!(!text.contains("password"));
    }

    #[tokio::test]
    async fn failed_logins_are_indistinguishable() {
        let state = state();
        create(
            Arc::clone(&state),
            post("/api/users", r#"{"password":"hunter2","email":"walt@breaking.bad"}"#),
        )
        .await;

        let wrong_password = login(
            Arc::clone(&state),
            post("/api/login", r#"{"password":"*******","email":"walt@breaking.bad"}"#),
        )
        .await;
        let unknown_email = login(
            state,
            post("/api/login", r#"{"password":"hunter2","email":"jesse@breaking.bad"}"#),
        )
        .await;

        assert_eq!(wrong_password.status, Status::Unauthorized);
        assert_eq!(unknown_email.status, Status::Unauthorized);
        // Byte-identical bodies: no email-exists probe.
        assert_eq!(wrong_password.body, unknown_email.body);
        assert_eq!(
            wrong_password.body,
            br#"{"error":"Incorrect email or password"}"#
        );
    }
}
