//! Postgres implementations of the domain storage traits.

use domain::bridge::WishStore;
use domain::error::StoreError;
use domain::models::{GuestRecord, Invitation, LikeState, NewInvitationLink, NewWish, Wish};
use domain::services::{GuestLinkStore, InsertOutcome};
use shared::phone::CanonicalPhone;
use sqlx::PgPool;
use uuid::Uuid;

use crate::repositories::{
    GuestRepository, InvitationRepository, UserGuestInvitationRepository, WishRepository,
};

/// Maps a database error onto the storage error the domain understands.
pub fn store_error(err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::RowNotFound => StoreError::NotFound(err.to_string()),
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
            StoreError::Conflict(db_err.message().to_string())
        }
        _ => {
            tracing::warn!(error = %err, "Database operation failed");
            StoreError::Backend(err.to_string())
        }
    }
}

/// Guest linking storage backed by Postgres.
#[derive(Clone)]
pub struct PgGuestLinkStore {
    invitations: InvitationRepository,
    guests: GuestRepository,
    links: UserGuestInvitationRepository,
}

impl PgGuestLinkStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            invitations: InvitationRepository::new(pool.clone()),
            guests: GuestRepository::new(pool.clone()),
            links: UserGuestInvitationRepository::new(pool),
        }
    }
}

#[async_trait::async_trait]
impl GuestLinkStore for PgGuestLinkStore {
    async fn find_guests_by_mobile(
        &self,
        mobile: &CanonicalPhone,
    ) -> Result<Vec<GuestRecord>, StoreError> {
        let guests = self
            .guests
            .find_by_mobile(mobile.as_str())
            .await
            .map_err(store_error)?;
        Ok(guests.into_iter().map(Into::into).collect())
    }

    async fn find_invitation(
        &self,
        invitation_id: Uuid,
    ) -> Result<Option<Invitation>, StoreError> {
        let invitation = self
            .invitations
            .find_by_id(invitation_id)
            .await
            .map_err(store_error)?;
        Ok(invitation.map(Into::into))
    }

    async fn link_exists(
        &self,
        user_id: Uuid,
        invitation_id: Uuid,
        guest_id: Uuid,
    ) -> Result<bool, StoreError> {
        self.links
            .exists(user_id, invitation_id, guest_id)
            .await
            .map_err(store_error)
    }

    async fn insert_link(&self, link: &NewInvitationLink) -> Result<InsertOutcome, StoreError> {
        let inserted = self.links.insert(link).await.map_err(store_error)?;
        Ok(if inserted {
            InsertOutcome::Inserted
        } else {
            InsertOutcome::AlreadyLinked
        })
    }
}

/// Wish storage backed by Postgres.
#[derive(Clone)]
pub struct PgWishStore {
    wishes: WishRepository,
    guests: GuestRepository,
}

impl PgWishStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            wishes: WishRepository::new(pool.clone()),
            guests: GuestRepository::new(pool),
        }
    }
}

#[async_trait::async_trait]
impl WishStore for PgWishStore {
    async fn list_wishes(
        &self,
        invitation_id: Uuid,
        viewer: Option<Uuid>,
    ) -> Result<Vec<Wish>, StoreError> {
        let wishes = self
            .wishes
            .list_approved(invitation_id, viewer)
            .await
            .map_err(store_error)?;
        Ok(wishes.into_iter().map(Into::into).collect())
    }

    async fn insert_wish(&self, wish: &NewWish) -> Result<Wish, StoreError> {
        let entity = self.wishes.create(wish).await.map_err(store_error)?;
        Ok(entity.into())
    }

    async fn toggle_like(
        &self,
        invitation_id: Uuid,
        wish_id: Uuid,
        guest_id: Uuid,
        guest_name: &str,
    ) -> Result<LikeState, StoreError> {
        let (likes_count, has_liked) = self
            .wishes
            .toggle_like(invitation_id, wish_id, guest_id, guest_name)
            .await
            .map_err(store_error)?
            .ok_or_else(|| StoreError::NotFound(format!("wish {}", wish_id)))?;
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
        self.guests
            .belongs_to_invitation(guest_id, invitation_id)
            .await
            .map_err(store_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        assert!(matches!(
            store_error(sqlx::Error::RowNotFound),
            StoreError::NotFound(_)
        ));
    }

    #[test]
    fn test_other_errors_map_to_backend() {
        assert!(matches!(
            store_error(sqlx::Error::PoolTimedOut),
            StoreError::Backend(_)
        ));
    }
}
