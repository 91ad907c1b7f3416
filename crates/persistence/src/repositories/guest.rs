//! Guest repository for database operations.

use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::GuestEntity;
use crate::metrics::QueryTimer;

/// Repository for guest-related database operations.
///
/// Mobiles are stored and matched in canonical form; callers canonicalize
/// before writing or querying.
#[derive(Clone)]
pub struct GuestRepository {
    pool: PgPool,
}

impl GuestRepository {
    /// Creates a new GuestRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Add a guest to an invitation.
    pub async fn create(
        &self,
        invitation_id: Uuid,
        name: &str,
        mobile: &str,
    ) -> Result<GuestEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_guest");
        let result = sqlx::query_as::<_, GuestEntity>(
            r#"
            INSERT INTO guests (invitation_id, name, mobile)
            VALUES ($1, $2, $3)
            RETURNING id, invitation_id, name, mobile, created_at
            "#,
        )
        .bind(invitation_id)
        .bind(name)
        .bind(mobile)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List the guests of an invitation, oldest first.
    pub async fn list_by_invitation(
        &self,
        invitation_id: Uuid,
    ) -> Result<Vec<GuestEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_guests_by_invitation");
        let result = sqlx::query_as::<_, GuestEntity>(
            r#"
            SELECT id, invitation_id, name, mobile, created_at
            FROM guests
            WHERE invitation_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(invitation_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find every guest row carrying the given canonical mobile.
    pub async fn find_by_mobile(&self, mobile: &str) -> Result<Vec<GuestEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_guests_by_mobile");
        let result = sqlx::query_as::<_, GuestEntity>(
            r#"
            SELECT id, invitation_id, name, mobile, created_at
            FROM guests
            WHERE mobile = $1
            "#,
        )
        .bind(mobile)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Check whether a guest belongs to an invitation.
    pub async fn belongs_to_invitation(
        &self,
        guest_id: Uuid,
        invitation_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("guest_belongs_to_invitation");
        let result = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM guests WHERE id = $1 AND invitation_id = $2)
            "#,
        )
        .bind(guest_id)
        .bind(invitation_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Remove a guest from an invitation. Returns whether a row was deleted.
    pub async fn delete(&self, invitation_id: Uuid, guest_id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_guest");
        let result = sqlx::query(
            r#"
            DELETE FROM guests
            WHERE id = $1 AND invitation_id = $2
            "#,
        )
        .bind(guest_id)
        .bind(invitation_id)
        .execute(&self.pool)
        .await;
        timer.record();
        result.map(|r| r.rows_affected() > 0)
    }
}
