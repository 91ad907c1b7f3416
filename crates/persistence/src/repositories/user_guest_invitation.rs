//! Repository for invitations linked to signed-in users.

use domain::models::NewInvitationLink;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{LinkStatusDb, UserGuestInvitationEntity};
use crate::metrics::QueryTimer;

/// Repository for user_guest_invitations rows.
#[derive(Clone)]
pub struct UserGuestInvitationRepository {
    pool: PgPool,
}

impl UserGuestInvitationRepository {
    /// Creates a new UserGuestInvitationRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Check whether a link with the given compound key exists.
    pub async fn exists(
        &self,
        user_id: Uuid,
        invitation_id: Uuid,
        guest_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("user_guest_invitation_exists");
        let result = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM user_guest_invitations
                WHERE user_id = $1 AND invitation_id = $2 AND guest_id = $3
            )
            "#,
        )
        .bind(user_id)
        .bind(invitation_id)
        .bind(guest_id)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Insert a link.
    ///
    /// Uses ON CONFLICT on uq_user_guest_invitation so concurrent passes for
    /// the same user never produce duplicates. Returns whether a row was
    /// inserted.
    pub async fn insert(&self, link: &NewInvitationLink) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("insert_user_guest_invitation");
        let result = sqlx::query(
            r#"
            INSERT INTO user_guest_invitations (
                user_id, invitation_id, guest_id, guest_name,
                invitation_title, hosts_names, invitation_date, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT ON CONSTRAINT uq_user_guest_invitation DO NOTHING
            "#,
        )
        .bind(link.user_id)
        .bind(link.invitation_id)
        .bind(link.guest_id)
        .bind(&link.guest_name)
        .bind(&link.invitation_title)
        .bind(&link.hosts_names)
        .bind(link.invitation_date)
        .bind(LinkStatusDb::from(link.status))
        .execute(&self.pool)
        .await;
        timer.record();
        result.map(|r| r.rows_affected() > 0)
    }

    /// List a user's linked invitations, newest first.
    pub async fn list_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<UserGuestInvitationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_user_guest_invitations");
        let result = sqlx::query_as::<_, UserGuestInvitationEntity>(
            r#"
            SELECT id, user_id, invitation_id, guest_id, guest_name, invitation_title,
                   hosts_names, invitation_date, status, created_at
            FROM user_guest_invitations
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}
