//! JSON request body extractor
//!
//! Wraps body parsing so that every malformed body surfaces as a 400
//! through [`AppError`] instead of axum's default rejections. An empty
//! body and a JSON `null` both read as `{}`.

use crate::error::AppError;
use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// JSON body where an empty or `null` body reads as `{}`
#[derive(Debug)]
pub struct Payload<T>(pub T);

impl<T, S> FromRequest<S> for Payload<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::validation(e.body_text()))?;

        let invalid = |e: serde_json::Error| {
            AppError::validation(format!("Invalid request body: {}", e))
        };

        let value = if bytes.iter().all(u8::is_ascii_whitespace) {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).map_err(invalid)?
        };

        let value = match value {
            Value::Null => Value::Object(Map::new()),
            other => other,
        };

        serde_json::from_value(value).map(Payload).map_err(invalid)
    }
}
