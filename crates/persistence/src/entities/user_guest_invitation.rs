//! User guest invitation entity (database row mapping).

use chrono::{DateTime, NaiveDate, Utc};
use domain::models::LinkStatus;
use sqlx::FromRow;
use uuid::Uuid;

/// Database enum for invitation_status that maps to PostgreSQL enum type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "invitation_status", rename_all = "lowercase")]
pub enum LinkStatusDb {
    Pending,
    Accepted,
    Declined,
}

impl From<LinkStatusDb> for LinkStatus {
    fn from(db_status: LinkStatusDb) -> Self {
        match db_status {
            LinkStatusDb::Pending => LinkStatus::Pending,
            LinkStatusDb::Accepted => LinkStatus::Accepted,
            LinkStatusDb::Declined => LinkStatus::Declined,
        }
    }
}

impl From<LinkStatus> for LinkStatusDb {
    fn from(status: LinkStatus) -> Self {
        match status {
            LinkStatus::Pending => LinkStatusDb::Pending,
            LinkStatus::Accepted => LinkStatusDb::Accepted,
            LinkStatus::Declined => LinkStatusDb::Declined,
        }
    }
}

/// Database row mapping for the user_guest_invitations table.
#[derive(Debug, Clone, FromRow)]
pub struct UserGuestInvitationEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub invitation_id: Uuid,
    pub guest_id: Uuid,
    pub guest_name: String,
    pub invitation_title: String,
    pub hosts_names: String,
    pub invitation_date: Option<NaiveDate>,
    pub status: LinkStatusDb,
    pub created_at: DateTime<Utc>,
}

impl From<UserGuestInvitationEntity> for domain::models::UserInvitationLink {
    fn from(entity: UserGuestInvitationEntity) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            invitation_id: entity.invitation_id,
            guest_id: entity.guest_id,
            guest_name: entity.guest_name,
            invitation_title: entity.invitation_title,
            hosts_names: entity.hosts_names,
            invitation_date: entity.invitation_date,
            status: entity.status.into(),
            created_at: entity.created_at,
        }
    }
}
