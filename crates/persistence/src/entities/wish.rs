//! Wish entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database row mapping for the wishes table, with the viewer's like flag.
#[derive(Debug, Clone, FromRow)]
pub struct WishEntity {
    pub id: Uuid,
    pub invitation_id: Uuid,
    pub guest_id: Uuid,
    pub guest_name: String,
    pub content: String,
    pub image_url: Option<String>,
    pub likes_count: i32,
    pub replies_count: i32,
    pub is_approved: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub has_liked: bool,
}

impl From<WishEntity> for domain::models::Wish {
    fn from(entity: WishEntity) -> Self {
        Self {
            id: entity.id,
            invitation_id: entity.invitation_id,
            guest_id: entity.guest_id,
            guest_name: entity.guest_name,
            content: entity.content,
            image_url: entity.image_url,
            likes_count: entity.likes_count,
            replies_count: entity.replies_count,
            is_approved: entity.is_approved,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
            has_liked: entity.has_liked,
        }
    }
}
