//! Guest entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the guests table.
#[derive(Debug, Clone, FromRow)]
pub struct GuestEntity {
    pub id: Uuid,
    pub invitation_id: Uuid,
    pub name: String,
    pub mobile: String,
    pub created_at: DateTime<Utc>,
}

impl From<GuestEntity> for domain::models::GuestRecord {
    fn from(entity: GuestEntity) -> Self {
        Self {
            id: entity.id,
            invitation_id: entity.invitation_id,
            name: entity.name,
            mobile: entity.mobile,
            created_at: entity.created_at,
        }
    }
}
