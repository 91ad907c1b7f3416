//! Wish repository for database operations.

use domain::models::NewWish;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::WishEntity;
use crate::metrics::QueryTimer;

/// Repository for wishes and their likes.
#[derive(Clone)]
pub struct WishRepository {
    pool: PgPool,
}

impl WishRepository {
    /// Creates a new WishRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List approved wishes of an invitation, newest first.
    ///
    /// `has_liked` is computed for `viewer`; without a viewer it is false.
    pub async fn list_approved(
        &self,
        invitation_id: Uuid,
        viewer: Option<Uuid>,
    ) -> Result<Vec<WishEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_approved_wishes");
        let result = sqlx::query_as::<_, WishEntity>(
            r#"
            SELECT
                w.id, w.invitation_id, w.guest_id, w.guest_name, w.content, w.image_url,
                w.likes_count, w.replies_count, w.is_approved, w.created_at, w.updated_at,
                EXISTS(
                    SELECT 1 FROM wish_likes l
                    WHERE l.wish_id = w.id AND l.guest_id = $2
                ) as has_liked
            FROM wishes w
            WHERE w.invitation_id = $1 AND w.is_approved = true
            ORDER BY w.created_at DESC
            "#,
        )
        .bind(invitation_id)
        .bind(viewer)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Create a new wish.
    pub async fn create(&self, wish: &NewWish) -> Result<WishEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_wish");
        let result = sqlx::query_as::<_, WishEntity>(
            r#"
            INSERT INTO wishes (invitation_id, guest_id, guest_name, content, image_url, is_approved)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, invitation_id, guest_id, guest_name, content, image_url,
                      likes_count, replies_count, is_approved, created_at, updated_at,
                      false as has_liked
            "#,
        )
        .bind(wish.invitation_id)
        .bind(wish.guest_id)
        .bind(&wish.guest_name)
        .bind(&wish.content)
        .bind(&wish.image_url)
        .bind(wish.is_approved)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Add or remove a guest's like and recount.
    ///
    /// Runs in one transaction with the wish row locked, so concurrent
    /// toggles serialize. Returns `None` when the wish does not belong to
    /// the invitation, otherwise `(likes_count, has_liked)`.
    pub async fn toggle_like(
        &self,
        invitation_id: Uuid,
        wish_id: Uuid,
        guest_id: Uuid,
        guest_name: &str,
    ) -> Result<Option<(i32, bool)>, sqlx::Error> {
        let timer = QueryTimer::new("toggle_wish_like");

        let mut tx = self.pool.begin().await?;

        let wish = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT id FROM wishes
            WHERE id = $1 AND invitation_id = $2
            FOR UPDATE
            "#,
        )
        .bind(wish_id)
        .bind(invitation_id)
        .fetch_optional(&mut *tx)
        .await?;

        if wish.is_none() {
            tx.rollback().await?;
            timer.record();
            return Ok(None);
        }

        let removed = sqlx::query(
            r#"
            DELETE FROM wish_likes
            WHERE wish_id = $1 AND guest_id = $2
            "#,
        )
        .bind(wish_id)
        .bind(guest_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        let has_liked = if removed == 0 {
            sqlx::query(
                r#"
                INSERT INTO wish_likes (wish_id, guest_id, guest_name)
                VALUES ($1, $2, $3)
                ON CONFLICT (wish_id, guest_id) DO NOTHING
                "#,
            )
            .bind(wish_id)
            .bind(guest_id)
            .bind(guest_name)
            .execute(&mut *tx)
            .await?;
            true
        } else {
            false
        };

        let likes_count = sqlx::query_scalar::<_, i32>(
            r#"
            UPDATE wishes
            SET likes_count = (SELECT COUNT(*) FROM wish_likes WHERE wish_id = $1)::int,
                updated_at = NOW()
            WHERE id = $1
            RETURNING likes_count
            "#,
        )
        .bind(wish_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        timer.record();
        Ok(Some((likes_count, has_liked)))
    }
}
