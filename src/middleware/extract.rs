//! Wrappers around axum's `Json` and `Path` extractors whose rejections
//! render as the API's `{"error": ...}` body instead of plain text.

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Path, Request, rejection::JsonRejection},
    http::{StatusCode, request::Parts},
};
use serde::de::DeserializeOwned;

use crate::HomeroomError;

pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = HomeroomError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => Err(HomeroomError::Rejected {
                status: json_rejection_status(&rejection),
                message: rejection.body_text(),
            }),
        }
    }
}

/// Oversized bodies keep 413 and a wrong content type keeps 415;
/// every other body problem, including a mistyped field, is a 400.
pub fn json_rejection_status(rejection: &JsonRejection) -> StatusCode {
    match rejection.status() {
        status @ (StatusCode::PAYLOAD_TOO_LARGE | StatusCode::UNSUPPORTED_MEDIA_TYPE) => status,
        _ => StatusCode::BAD_REQUEST,
    }
}

pub struct ApiPath<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = HomeroomError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(ApiPath(value)),
            Err(rejection) => Err(HomeroomError::Rejected {
                status: rejection.status(),
                message: rejection.body_text(),
            }),
        }
    }
}
