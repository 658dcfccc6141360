//! JSON envelope helpers shared by every API handler.
//!
//! Errors always travel as `{"error": "message"}`. Success payloads are
//! whatever the handler hands to [`respond_json`].

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::error;

use crate::response::Response;
use crate::status::Status;

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

/// Serializes `payload` and responds with `status`.
pub fn respond_json<T: Serialize>(status: Status, payload: &T) -> Response {
    match serde_json::to_vec(payload) {
        Ok(body) => Response::builder().status(status).json(body),
        Err(e) => {
            error!("failed to serialize response: {e}");
            Response::status(Status::InternalServerError)
        }
    }
}

/// Responds with the `{"error": "…"}` envelope. 5xx responses are logged.
pub fn respond_err(status: Status, message: &str) -> Response {
    if status.is_server_error() {
        error!("responding with {}: {message}", status.code());
    }
    respond_json(status, &ErrorBody { error: message })
}

/// Decodes a JSON request body.
///
/// A body that fails to decode is answered with `500` and the message
/// `Couldn't decode parameters`.
pub fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, Response> {
    serde_json::from_slice(body).map_err(|e| {
        error!("failed to decode request parameters: {e}");
        respond_err(Status::InternalServerError, "Couldn't decode parameters")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[test]
    fn error_envelope_shape() {
        let response = respond_err(Status::BadRequest, "Chirp is too long");
        assert_eq!(response.status, Status::BadRequest);
        assert_eq!(response.body, br#"{"error":"Chirp is too long"}"#);
    }

    #[test]
    fn payloads_serialize_with_status() {
        #[derive(Serialize)]
        struct Payload {
            cleaned_body: &'static str,
        }

        let response = respond_json(Status::Ok, &Payload { cleaned_body: "hi" });
        assert_eq!(response.status, Status::Ok);
        assert_eq!(response.body, br#"{"cleaned_body":"hi"}"#);
    }

    #[test]
    fn decode_failure_is_a_500() {
        #[derive(Debug, Deserialize)]
        struct Params {
            body: String,
        }

        let ok: Params = decode(br#"{"body":"hello"}"#).unwrap();
        assert_eq!(ok.body, "hello");

        let response = decode::<Params>(b"not json").unwrap_err();
        assert_eq!(response.status, Status::InternalServerError);
        assert_eq!(response.body, br#"{"error":"Couldn't decode parameters"}"#);
    }
}
