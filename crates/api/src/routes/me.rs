//! Routes for the signed-in user's own invitations.

use axum::{extract::State, Json};
use domain::models::ListLinkedInvitationsResponse;
use domain::services::{GuestLinker, LinkingReport};
use persistence::repositories::UserGuestInvitationRepository;
use persistence::stores::PgGuestLinkStore;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::UserAuth;
use crate::middleware::metrics::record_linking_pass;

/// Link every guest row carrying the caller's phone number to the caller.
///
/// POST /api/v1/me/invitations/link
///
/// The phone comes only from the verified token; any request body is ignored.
/// Safe to call repeatedly: existing links are counted, never duplicated.
pub async fn link_invitations(
    State(state): State<AppState>,
    user_auth: UserAuth,
) -> Result<Json<LinkingReport>, ApiError> {
    let phone = user_auth
        .phone
        .clone()
        .filter(|p| !p.trim().is_empty())
        .ok_or_else(|| ApiError::validation("A phone number is required to link invitations"))?;

    let linker = GuestLinker::new(
        PgGuestLinkStore::new(state.pool.clone()),
        state.normalizer.clone(),
    );
    let report = linker.run(user_auth.user_id, &phone).await?;
    record_linking_pass(&report);

    Ok(Json(report))
}

/// List the caller's linked invitations, newest first.
///
/// GET /api/v1/me/invitations
pub async fn list_linked_invitations(
    State(state): State<AppState>,
    user_auth: UserAuth,
) -> Result<Json<ListLinkedInvitationsResponse>, ApiError> {
    let data = UserGuestInvitationRepository::new(state.pool.clone())
        .list_for_user(user_auth.user_id)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(Json(ListLinkedInvitationsResponse { data }))
}
