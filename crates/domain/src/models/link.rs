//! User invitation links: an invitation surfaced to a signed-in user
//! because one of its guest rows carries the user's phone number.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use super::guest::GuestRecord;
use super::invitation::Invitation;

/// RSVP status of a linked invitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkStatus {
    #[default]
    Pending,
    Accepted,
    Declined,
}

impl FromStr for LinkStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(LinkStatus::Pending),
            "accepted" => Ok(LinkStatus::Accepted),
            "declined" => Ok(LinkStatus::Declined),
            _ => Err(format!("Unknown invitation status: {}", s)),
        }
    }
}

impl std::fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LinkStatus::Pending => write!(f, "pending"),
            LinkStatus::Accepted => write!(f, "accepted"),
            LinkStatus::Declined => write!(f, "declined"),
        }
    }
}

/// A row of `user_guest_invitations`.
///
/// Unique per (user_id, invitation_id, guest_id).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct UserInvitationLink {
    pub id: Uuid,
    pub user_id: Uuid,
    pub invitation_id: Uuid,
    pub guest_id: Uuid,
    pub guest_name: String,
    pub invitation_title: String,
    pub hosts_names: String,
    pub invitation_date: Option<NaiveDate>,
    pub status: LinkStatus,
    pub created_at: DateTime<Utc>,
}

/// A link about to be inserted by the linking pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInvitationLink {
    pub user_id: Uuid,
    pub invitation_id: Uuid,
    pub guest_id: Uuid,
    pub guest_name: String,
    pub invitation_title: String,
    pub hosts_names: String,
    pub invitation_date: Option<NaiveDate>,
    pub status: LinkStatus,
}

impl NewInvitationLink {
    /// Builds a pending link with display fields denormalized from the invitation.
    pub fn pending(user_id: Uuid, guest: &GuestRecord, invitation: &Invitation) -> Self {
        Self {
            user_id,
            invitation_id: invitation.id,
            guest_id: guest.id,
            guest_name: guest.name.clone(),
            invitation_title: invitation.display_title(),
            hosts_names: invitation.hosts_names(),
            invitation_date: invitation.event_date,
            status: LinkStatus::Pending,
        }
    }

    /// The compound uniqueness key.
    pub fn key(&self) -> (Uuid, Uuid, Uuid) {
        (self.user_id, self.invitation_id, self.guest_id)
    }
}

/// Response for listing a user's linked invitations.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListLinkedInvitationsResponse {
    pub data: Vec<UserInvitationLink>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_status_round_trip() {
        for status in [LinkStatus::Pending, LinkStatus::Accepted, LinkStatus::Declined] {
            assert_eq!(status.to_string().parse::<LinkStatus>().unwrap(), status);
        }
        assert!("maybe".parse::<LinkStatus>().is_err());
        assert_eq!("PENDING".parse::<LinkStatus>().unwrap(), LinkStatus::Pending);
    }

    #[test]
    fn test_link_status_serialization() {
        assert_eq!(
            serde_json::to_string(&LinkStatus::Pending).unwrap(),
            "\"pending\""
        );
        assert_eq!(LinkStatus::default(), LinkStatus::Pending);
    }

    #[test]
    fn test_pending_link_denormalizes_invitation() {
        let invitation = Invitation {
            id: Uuid::new_v4(),
            host_user_id: Uuid::new_v4(),
            title: None,
            bride_name: Some("Asha".to_string()),
            groom_name: None,
            event_date: NaiveDate::from_ymd_opt(2026, 11, 20),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let guest = GuestRecord {
            id: Uuid::new_v4(),
            invitation_id: invitation.id,
            name: "Meera".to_string(),
            mobile: "+919876543210".to_string(),
            created_at: Utc::now(),
        };
        let user_id = Uuid::new_v4();

        let link = NewInvitationLink::pending(user_id, &guest, &invitation);

        assert_eq!(link.status, LinkStatus::Pending);
        assert_eq!(link.invitation_title, "Wedding Invitation");
        assert_eq!(link.hosts_names, "Asha & Groom");
        assert_eq!(link.guest_name, "Meera");
        assert_eq!(link.invitation_date, invitation.event_date);
        assert_eq!(link.key(), (user_id, invitation.id, guest.id));
    }
}
