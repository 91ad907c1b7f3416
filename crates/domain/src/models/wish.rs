//! Wish domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A guest-submitted message of congratulation.
///
/// `has_liked` is computed for the viewing guest and is not stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wish {
    pub id: Uuid,
    pub invitation_id: Uuid,
    pub guest_id: Uuid,
    pub guest_name: String,
    pub content: String,
    #[serde(default)]
    pub image_url: Option<String>,
    pub likes_count: i32,
    pub replies_count: i32,
    pub is_approved: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub has_liked: bool,
}

/// A like left by a guest. At most one per (wish_id, guest_id).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishLike {
    pub id: Uuid,
    pub wish_id: Uuid,
    pub guest_id: Uuid,
    pub guest_name: String,
    pub created_at: DateTime<Utc>,
}

/// A wish about to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWish {
    pub invitation_id: Uuid,
    pub guest_id: Uuid,
    pub guest_name: String,
    pub content: String,
    pub image_url: Option<String>,
    pub is_approved: bool,
}

/// Like state of one wish as seen by one guest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeState {
    pub likes_count: i32,
    pub has_liked: bool,
}
