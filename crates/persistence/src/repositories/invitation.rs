//! Invitation repository for database operations.

use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::InvitationEntity;
use crate::metrics::QueryTimer;

/// Repository for invitation-related database operations.
#[derive(Clone)]
pub struct InvitationRepository {
    pool: PgPool,
}

impl InvitationRepository {
    /// Creates a new InvitationRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new invitation owned by `host_user_id`.
    pub async fn create(
        &self,
        host_user_id: Uuid,
        title: Option<&str>,
        bride_name: Option<&str>,
        groom_name: Option<&str>,
        event_date: Option<NaiveDate>,
    ) -> Result<InvitationEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_invitation");
        let result = sqlx::query_as::<_, InvitationEntity>(
            r#"
            INSERT INTO invitations (host_user_id, title, bride_name, groom_name, event_date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, host_user_id, title, bride_name, groom_name, event_date, created_at, updated_at
            "#,
        )
        .bind(host_user_id)
        .bind(title)
        .bind(bride_name)
        .bind(groom_name)
        .bind(event_date)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find invitation by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<InvitationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_invitation_by_id");
        let result = sqlx::query_as::<_, InvitationEntity>(
            r#"
            SELECT id, host_user_id, title, bride_name, groom_name, event_date, created_at, updated_at
            FROM invitations
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }
}
