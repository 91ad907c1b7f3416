//! Guest identity extractor for the wishes bridge.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::error::ApiError;

/// Header identifying the guest viewing the widget.
pub const GUEST_ID_HEADER: &str = "X-Guest-Id";

/// The viewing guest, if the widget knows one.
///
/// A missing header is allowed for reads; the host refuses submits and
/// likes without one. A malformed header is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionalGuestId(pub Option<Uuid>);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for OptionalGuestId {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(GUEST_ID_HEADER) else {
            return Ok(OptionalGuestId(None));
        };

        value
            .to_str()
            .ok()
            .and_then(|v| Uuid::parse_str(v.trim()).ok())
            .map(|id| OptionalGuestId(Some(id)))
            .ok_or_else(|| ApiError::validation(format!("{} must be a UUID", GUEST_ID_HEADER)))
    }
}
