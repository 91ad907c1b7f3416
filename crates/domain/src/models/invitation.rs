//! Invitation domain models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Title shown when the host left the invitation title blank.
pub const DEFAULT_INVITATION_TITLE: &str = "Wedding Invitation";

/// Placeholder for a blank bride name.
pub const DEFAULT_BRIDE_NAME: &str = "Bride";

/// Placeholder for a blank groom name.
pub const DEFAULT_GROOM_NAME: &str = "Groom";

/// An event invitation owned by a host user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Invitation {
    pub id: Uuid,
    pub host_user_id: Uuid,
    pub title: Option<String>,
    pub bride_name: Option<String>,
    pub groom_name: Option<String>,
    pub event_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Invitation {
    /// Title for display, falling back to [`DEFAULT_INVITATION_TITLE`].
    pub fn display_title(&self) -> String {
        non_blank(self.title.as_deref())
            .unwrap_or(DEFAULT_INVITATION_TITLE)
            .to_string()
    }

    /// `"{bride} & {groom}"` with placeholders for blank names.
    pub fn hosts_names(&self) -> String {
        format!(
            "{} & {}",
            non_blank(self.bride_name.as_deref()).unwrap_or(DEFAULT_BRIDE_NAME),
            non_blank(self.groom_name.as_deref()).unwrap_or(DEFAULT_GROOM_NAME),
        )
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Request to create an invitation.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateInvitationRequest {
    #[validate(length(max = 200, message = "Title must be at most 200 characters"))]
    pub title: Option<String>,

    #[validate(length(max = 100, message = "Bride name must be at most 100 characters"))]
    pub bride_name: Option<String>,

    #[validate(length(max = 100, message = "Groom name must be at most 100 characters"))]
    pub groom_name: Option<String>,

    pub event_date: Option<NaiveDate>,
}
