use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::HomeroomError;

/// Tenant id taken from the `?device_id=` query parameter.
///
/// The id is caller-supplied and unauthenticated: it partitions data
/// but does not prove ownership.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tenant(pub String);

impl Tenant {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Find a non-blank `device_id` in a raw query string.
pub fn device_id_from_query(query: Option<&str>) -> Option<String> {
    let qs = query?;
    url::form_urlencoded::parse(qs.as_bytes())
        .find(|(k, _)| k == "device_id")
        .map(|(_, v)| v.into_owned())
        .filter(|v| !v.trim().is_empty())
}

impl<S> FromRequestParts<S> for Tenant
where
    S: Send + Sync,
{
    type Rejection = HomeroomError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        device_id_from_query(parts.uri.query())
            .map(Tenant)
            .ok_or_else(|| HomeroomError::MissingFields(vec!["device_id"]))
    }
}
