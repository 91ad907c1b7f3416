//! Invitation entity (database row mapping).

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the invitations table.
#[derive(Debug, Clone, FromRow)]
pub struct InvitationEntity {
    pub id: Uuid,
    pub host_user_id: Uuid,
    pub title: Option<String>,
    pub bride_name: Option<String>,
    pub groom_name: Option<String>,
    pub event_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<InvitationEntity> for domain::models::Invitation {
    fn from(entity: InvitationEntity) -> Self {
        Self {
            id: entity.id,
            host_user_id: entity.host_user_id,
            title: entity.title,
            bride_name: entity.bride_name,
            groom_name: entity.groom_name,
            event_date: entity.event_date,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}
