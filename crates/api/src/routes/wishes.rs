//! Host side of the wishes widget bridge over HTTP.
//!
//! The host page forwards each message the embedded widget posts to this
//! endpoint and posts the returned messages back into the widget.

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap},
    Json,
};
use domain::bridge::{decode_embedded, HostMessage, WishHost};
use persistence::stores::PgWishStore;
use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::OptionalGuestId;
use crate::middleware::metrics::record_bridge_message;

/// Handle one embedded message for an invitation.
///
/// POST /api/v1/invitations/:id/wishes/messages
///
/// The `Origin` header is checked before the body is decoded. Failures the
/// widget can act on (save errors, like failures) come back as host
/// messages with 200 OK; untrusted origins and undecodable messages are
/// rejected outright.
pub async fn handle_message(
    State(state): State<AppState>,
    Path(invitation_id): Path<Uuid>,
    headers: HeaderMap,
    OptionalGuestId(viewer): OptionalGuestId,
    Json(body): Json<Value>,
) -> Result<Json<Vec<HostMessage>>, ApiError> {
    let origin = headers
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if let Err(e) = state.origin_policy.check(origin) {
        warn!(origin = %origin, invitation_id = %invitation_id, "Rejected bridge message");
        record_bridge_message("unknown", "untrusted_origin");
        return Err(e.into());
    }

    let message = decode_embedded(&body).inspect_err(|_| {
        record_bridge_message("unknown", "malformed");
    })?;
    let message_type = message.message_type();

    let host = WishHost::new(
        PgWishStore::new(state.pool.clone()),
        state.images.clone(),
        state.origin_policy.clone(),
        state.host_options(),
    );

    match host.handle(origin, invitation_id, viewer, message).await {
        Ok(replies) => {
            debug!(
                invitation_id = %invitation_id,
                message_type,
                replies = replies.len(),
                "Bridge message handled"
            );
            record_bridge_message(message_type, "handled");
            Ok(Json(replies))
        }
        Err(e) => {
            record_bridge_message(message_type, "rejected");
            Err(e.into())
        }
    }
}
