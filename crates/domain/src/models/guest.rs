//! Guest domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// One invitee added by a host.
///
/// `mobile` is stored in canonical form; the API canonicalizes it at write
/// time so that the linking pass can match by string equality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct GuestRecord {
    pub id: Uuid,
    pub invitation_id: Uuid,
    pub name: String,
    pub mobile: String,
    pub created_at: DateTime<Utc>,
}

/// Request to add a guest to an invitation.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateGuestRequest {
    #[validate(
        length(min = 1, max = 100, message = "Name must be 1-100 characters"),
        custom(function = "shared::validation::validate_not_blank")
    )]
    pub name: String,

    #[validate(custom(function = "shared::validation::validate_mobile_input"))]
    pub mobile: String,
}

/// Response for listing guests.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListGuestsResponse {
    pub data: Vec<GuestRecord>,
}
