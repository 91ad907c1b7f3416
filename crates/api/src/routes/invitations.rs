//! Invitation routes for hosts.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::{CreateInvitationRequest, Invitation};
use persistence::repositories::InvitationRepository;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;

/// Create an invitation hosted by the caller.
///
/// POST /api/v1/invitations
pub async fn create_invitation(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Json(request): Json<CreateInvitationRequest>,
) -> Result<(StatusCode, Json<Invitation>), ApiError> {
    request.validate()?;

    let repo = InvitationRepository::new(state.pool.clone());
    let invitation: Invitation = repo
        .create(
            user_auth.user_id,
            request.title.as_deref().map(str::trim),
            request.bride_name.as_deref().map(str::trim),
            request.groom_name.as_deref().map(str::trim),
            request.event_date,
        )
        .await?
        .into();

    info!(
        invitation_id = %invitation.id,
        host_user_id = %invitation.host_user_id,
        "Invitation created"
    );

    Ok((StatusCode::CREATED, Json(invitation)))
}

/// Get an invitation. Only its host may read it.
///
/// GET /api/v1/invitations/:id
pub async fn get_invitation(
    State(state): State<AppState>,
    user_auth: UserAuth,
    Path(invitation_id): Path<Uuid>,
) -> Result<Json<Invitation>, ApiError> {
    let invitation = hosted_invitation(&state, &user_auth, invitation_id).await?;
    Ok(Json(invitation))
}

/// Loads an invitation and checks the caller hosts it.
pub(crate) async fn hosted_invitation(
    state: &AppState,
    user_auth: &UserAuth,
    invitation_id: Uuid,
) -> Result<Invitation, ApiError> {
    let invitation: Invitation = InvitationRepository::new(state.pool.clone())
        .find_by_id(invitation_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Invitation not found".to_string()))?
        .into();

    if invitation.host_user_id != user_auth.user_id {
        return Err(ApiError::Forbidden(
            "Only the host can manage this invitation".to_string(),
        ));
    }

    Ok(invitation)
}
