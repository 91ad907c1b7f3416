//! In-memory wish and image stores for tests and local runs.

use chrono::Utc;
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::host::{ImageStore, WishStore};
use crate::error::StoreError;
use crate::models::{LikeState, NewWish, Wish, WishLike};

#[derive(Default)]
struct WishState {
    wishes: Vec<Wish>,
    likes: Vec<WishLike>,
    guests: HashSet<(Uuid, Uuid)>,
    fail_writes: bool,
}

/// Wish store backed by a `Vec`, enforcing one like per (wish, guest).
#[derive(Default)]
pub struct InMemoryWishStore {
    state: RwLock<WishState>,
}

impl InMemoryWishStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_guest(&self, invitation_id: Uuid, guest_id: Uuid) {
        self.state
            .write()
            .await
            .guests
            .insert((guest_id, invitation_id));
    }

    /// Makes every subsequent write fail with a backend error.
    pub async fn fail_writes(&self, fail: bool) {
        self.state.write().await.fail_writes = fail;
    }

    /// Every stored wish, approved or not, in insertion order.
    pub async fn all_wishes(&self) -> Vec<Wish> {
        self.state.read().await.wishes.clone()
    }

    /// Flips the moderation flag of a stored wish.
    pub async fn set_approved(&self, wish_id: Uuid, approved: bool) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        let wish = state
            .wishes
            .iter_mut()
            .find(|w| w.id == wish_id)
            .ok_or_else(|| StoreError::NotFound(format!("wish {}", wish_id)))?;
        wish.is_approved = approved;
        wish.updated_at = Utc::now();
        Ok(())
    }
}

#[async_trait::async_trait]
impl WishStore for InMemoryWishStore {
    async fn list_wishes(
        &self,
        invitation_id: Uuid,
        viewer: Option<Uuid>,
    ) -> Result<Vec<Wish>, StoreError> {
        let state = self.state.read().await;
        let mut wishes: Vec<Wish> = state
            .wishes
            .iter()
            .filter(|w| w.invitation_id == invitation_id && w.is_approved)
            .map(|w| {
                let mut wish = w.clone();
                wish.has_liked = viewer.is_some_and(|guest_id| {
                    state
                        .likes
                        .iter()
                        .any(|l| l.wish_id == w.id && l.guest_id == guest_id)
                });
                wish
            })
            .collect();
        wishes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(wishes)
    }

    async fn insert_wish(&self, wish: &NewWish) -> Result<Wish, StoreError> {
        let mut state = self.state.write().await;
        if state.fail_writes {
            return Err(StoreError::Backend("injected write failure".to_string()));
        }

        let now = Utc::now();
        let stored = Wish {
            id: Uuid::new_v4(),
            invitation_id: wish.invitation_id,
            guest_id: wish.guest_id,
            guest_name: wish.guest_name.clone(),
            content: wish.content.clone(),
            image_url: wish.image_url.clone(),
            likes_count: 0,
            replies_count: 0,
            is_approved: wish.is_approved,
            created_at: now,
            updated_at: now,
            has_liked: false,
        };
        state.wishes.push(stored.clone());
        Ok(stored)
    }

    async fn toggle_like(
        &self,
        invitation_id: Uuid,
        wish_id: Uuid,
        guest_id: Uuid,
        guest_name: &str,
    ) -> Result<LikeState, StoreError> {
        let mut state = self.state.write().await;
        if state.fail_writes {
            return Err(StoreError::Backend("injected write failure".to_string()));
        }

        let index = state
            .wishes
            .iter()
            .position(|w| w.id == wish_id && w.invitation_id == invitation_id)
            .ok_or_else(|| StoreError::NotFound(format!("wish {}", wish_id)))?;

        let existing = state
            .likes
            .iter()
            .position(|l| l.wish_id == wish_id && l.guest_id == guest_id);

        let has_liked = match existing {
            Some(i) => {
                state.likes.remove(i);
                false
            }
            None => {
                state.likes.push(WishLike {
                    id: Uuid::new_v4(),
                    wish_id,
                    guest_id,
                    guest_name: guest_name.to_string(),
                    created_at: Utc::now(),
                });
                true
            }
        };

        let likes_count = state.likes.iter().filter(|l| l.wish_id == wish_id).count() as i32;
        let wish = &mut state.wishes[index];
        wish.likes_count = likes_count;
        wish.updated_at = Utc::now();

        Ok(LikeState {
            likes_count,
            has_liked,
        })
    }

    async fn guest_belongs_to_invitation(
        &self,
        guest_id: Uuid,
        invitation_id: Uuid,
    ) -> Result<bool, StoreError> {
        Ok(self
            .state
            .read()
            .await
            .guests
            .contains(&(guest_id, invitation_id)))
    }
}

/// Image store keeping blobs in a map.
pub struct InMemoryImageStore {
    public_base_url: String,
    objects: RwLock<HashMap<String, (String, Vec<u8>)>>,
}

impl InMemoryImageStore {
    pub fn new(public_base_url: impl Into<String>) -> Self {
        Self {
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
            objects: RwLock::new(HashMap::new()),
        }
    }

    /// Content type and bytes stored under `key`.
    pub async fn get(&self, key: &str) -> Option<(String, Vec<u8>)> {
        self.objects.read().await.get(key).cloned()
    }

    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }
}

#[async_trait::async_trait]
impl ImageStore for InMemoryImageStore {
    async fn put(
        &self,
        key: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, StoreError> {
        self.objects
            .write()
            .await
            .insert(key.to_string(), (content_type.to_string(), bytes));
        Ok(format!("{}/{}", self.public_base_url, key))
    }
}
