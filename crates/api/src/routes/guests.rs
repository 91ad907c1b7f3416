//! Guest list routes for hosts.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::{CreateGuestRequest, GuestRecord, ListGuestsResponse};
use persistence::repositories::GuestRepository;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::routes::invitations::hosted_invitation;

/// Add a guest to an invitation.
///
/// POST /api/v1/invitations/:id/guests
///
/// The mobile number is stored canonicalized so that a later linking pass
/// can match it against a signed-in user's phone by equality.
pub async fn add_guest(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(invitation_id): Path<Uuid>,
    Json(request): Json<CreateGuestRequest>,
) -> Result<(StatusCode, Json<GuestRecord>), ApiError> {
    request.validate()?;
    hosted_invitation(&state, &user_auth, invitation_id).await?;

    let mobile = state.normalizer.normalize(&request.mobile);
    let guest: GuestRecord = GuestRepository::new(state.pool.clone())
        .create(invitation_id, request.name.trim(), mobile.as_str())
        .await?
        .into();

    info!(
        invitation_id = %invitation_id,
        guest_id = %guest.id,
        "Guest added"
    );

    Ok((StatusCode::CREATED, Json(guest)))
}

/// List an invitation's guests.
///
/// GET /api/v1/invitations/:id/guests
pub async fn list_guests(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(invitation_id): Path<Uuid>,
) -> Result<Json<ListGuestsResponse>, ApiError> {
    hosted_invitation(&state, &user_auth, invitation_id).await?;

    let data = GuestRepository::new(state.pool.clone())
        .list_by_invitation(invitation_id)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(Json(ListGuestsResponse { data }))
}

/// Remove a guest from an invitation.
///
/// DELETE /api/v1/invitations/:id/guests/:guest_id
pub async fn remove_guest(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path((invitation_id, guest_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    hosted_invitation(&state, &user_auth, invitation_id).await?;

    let deleted = GuestRepository::new(state.pool.clone())
        .delete(invitation_id, guest_id)
        .await?;
    if !deleted {
        return Err(ApiError::NotFound("Guest not found".to_string()));
    }

    info!(invitation_id = %invitation_id, guest_id = %guest_id, "Guest removed");
    Ok(StatusCode::NO_CONTENT)
}
