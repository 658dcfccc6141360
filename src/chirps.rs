//! Chirp API handlers: create, list, fetch, and the standalone validator.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::error;
use uuid::Uuid;

use crate::json::{decode, respond_err, respond_json};
use crate::moderation;
use crate::request::Request;
use crate::response::Response;
use crate::state::AppState;
use crate::status::Status;
use crate::store::ChirpRecord;

/// A chirp as it appears on the wire.
#[derive(Serialize)]
pub struct Chirp {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user_id: Uuid,
    pub body: String,
}

impl From<ChirpRecord> for Chirp {
    fn from(record: ChirpRecord) -> Self {
        Self {
            id: record.id,
            created_at: record.created_at,
            updated_at: record.updated_at,
            user_id: record.user_id,
            body: record.body,
        }
    }
}

/// `POST /api/chirps` — validates, cleans, and stores a chirp.
pub async fn create(state: Arc<AppState>, req: Request) -> Response {
    #[derive(Deserialize)]
    struct Params {
        body: String,
        user_id: Uuid,
    }

    let params: Params = match decode(req.body()) {
        Ok(params) => params,
        Err(response) => return response,
    };

    let cleaned = match moderation::sanitize(&params.body) {
        Ok(cleaned) => cleaned,
        Err(e) => return respond_err(Status::BadRequest, &e.to_string()),
    };

    match state.db.create_chirp(params.user_id, cleaned).await {
        Ok(record) => respond_json(Status::Created, &Chirp::from(record)),
        Err(e) => {
            error!("failed to create chirp: {e}");
            respond_err(Status::InternalServerError, "Couldn't create chirp")
        }
    }
}

/// `GET /api/chirps` — every chirp, oldest first.
pub async fn list(state: Arc<AppState>, _req: Request) -> Response {
    match state.db.chirps().await {
        Ok(records) => {
            let chirps: Vec<Chirp> = records.into_iter().map(Chirp::from).collect();
            respond_json(Status::Ok, &chirps)
        }
        Err(e) => {
            error!("failed to list chirps: {e}");
            respond_err(Status::InternalServerError, "Couldn't retrieve chirps")
        }
    }
}

/// `GET /api/chirps/{chirp_id}`.
///
/// A malformed id is a `400`; an id that does not resolve to a chirp — for
/// whatever reason — is a `404`.
pub async fn get(state: Arc<AppState>, req: Request) -> Response {
    let raw = req.param("chirp_id").unwrap_or_default();
    let id = match Uuid::parse_str(raw) {
        Ok(id) => id,
        Err(_) => return respond_err(Status::BadRequest, "Invalid chirp ID"),
    };

    match state.db.chirp(id).await {
        Ok(Some(record)) => respond_json(Status::Ok, &Chirp::from(record)),
        Ok(None) => respond_err(Status::NotFound, "Couldn't get chirp"),
        Err(e) => {
            error!("failed to fetch chirp {id}: {e}");
            respond_err(Status::NotFound, "Couldn't get chirp")
        }
    }
}

/// `POST /api/validate_chirp` — runs moderation without storing anything.
pub async fn validate(_state: Arc<AppState>, req: Request) -> Response {
    #[derive(Deserialize)]
    struct Params {
        body: String,
    }

    #[derive(Serialize)]
    struct CleanedBody {
        cleaned_body: String,
    }

    let params: Params = match decode(req.body()) {
        Ok(params) => params,
        Err(response) => return response,
    };

    match moderation::sanitize(&params.body) {
        Ok(cleaned) => respond_json(Status::Ok, &CleanedBody { cleaned_body: cleaned }),
        Err(e) => respond_err(Status::BadRequest, &e.to_string()),
    }
}
