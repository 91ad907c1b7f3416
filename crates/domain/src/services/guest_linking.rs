//! Guest-to-user invitation linking.
//!
//! A linking pass runs once per session, when both a signed-in identity
//! and its phone number are known. Every guest row whose canonical mobile
//! equals the user's canonical phone yields a pending
//! [`UserInvitationLink`](crate::models::UserInvitationLink), at most once
//! per (user, invitation, guest).
//!
//! Passes may run concurrently for the same user (several devices or tabs).
//! The existence check only saves a round trip; the store must enforce the
//! compound key itself and report a lost race as
//! [`InsertOutcome::AlreadyLinked`].

use serde::Serialize;
use shared::phone::{CanonicalPhone, PhoneNormalizer};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::{GuestRecord, Invitation, NewInvitationLink, UserInvitationLink};

/// Result of inserting a link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    /// The compound key already existed (possibly inserted by a concurrent pass).
    AlreadyLinked,
}

/// Storage the linking pass reads from and writes to.
#[async_trait::async_trait]
pub trait GuestLinkStore: Send + Sync {
    /// Guests whose stored mobile equals `mobile` exactly.
    async fn find_guests_by_mobile(
        &self,
        mobile: &CanonicalPhone,
    ) -> Result<Vec<GuestRecord>, StoreError>;

    async fn find_invitation(&self, invitation_id: Uuid)
        -> Result<Option<Invitation>, StoreError>;

    async fn link_exists(
        &self,
        user_id: Uuid,
        invitation_id: Uuid,
        guest_id: Uuid,
    ) -> Result<bool, StoreError>;

    /// Inserts `link` unless its (user, invitation, guest) key exists.
    async fn insert_link(&self, link: &NewInvitationLink) -> Result<InsertOutcome, StoreError>;
}

#[async_trait::async_trait]
impl<T: GuestLinkStore + ?Sized> GuestLinkStore for Arc<T> {
    async fn find_guests_by_mobile(
        &self,
        mobile: &CanonicalPhone,
    ) -> Result<Vec<GuestRecord>, StoreError> {
        (**self).find_guests_by_mobile(mobile).await
    }

    async fn find_invitation(
        &self,
        invitation_id: Uuid,
    ) -> Result<Option<Invitation>, StoreError> {
        (**self).find_invitation(invitation_id).await
    }

    async fn link_exists(
        &self,
        user_id: Uuid,
        invitation_id: Uuid,
        guest_id: Uuid,
    ) -> Result<bool, StoreError> {
        (**self).link_exists(user_id, invitation_id, guest_id).await
    }

    async fn insert_link(&self, link: &NewInvitationLink) -> Result<InsertOutcome, StoreError> {
        (**self).insert_link(link).await
    }
}

/// Error that aborts a whole linking pass.
///
/// Per-guest failures never abort a pass; they are counted in
/// [`LinkingReport::failed`].
#[derive(Debug, Error)]
pub enum LinkingError {
    #[error("Failed to look up guests by phone: {0}")]
    GuestLookup(#[source] StoreError),
}

/// Summary of one linking pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct LinkingReport {
    /// Canonical phone used for matching; `None` when the input had no digits.
    pub canonical_phone: Option<String>,
    /// Guest rows whose mobile matched.
    pub matched: usize,
    /// Links inserted by this pass.
    pub created: usize,
    /// Matches that were already linked.
    pub already_linked: usize,
    /// Matches whose parent invitation could not be resolved.
    pub skipped_no_invitation: usize,
    /// Matches that failed on lookup or insert.
    pub failed: usize,
}

/// Runs linking passes against a [`GuestLinkStore`].
#[derive(Debug, Clone)]
pub struct GuestLinker<S> {
    store: S,
    normalizer: PhoneNormalizer,
}

impl<S: GuestLinkStore> GuestLinker<S> {
    pub fn new(store: S, normalizer: PhoneNormalizer) -> Self {
        Self { store, normalizer }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Links every guest row matching `raw_phone` to `user_id`.
    pub async fn run(&self, user_id: Uuid, raw_phone: &str) -> Result<LinkingReport, LinkingError> {
        let phone = self.normalizer.normalize(raw_phone);
        let mut report = LinkingReport::default();

        if phone.is_empty() {
            debug!(user_id = %user_id, "Phone number has no digits, skipping linking pass");
            return Ok(report);
        }
        report.canonical_phone = Some(phone.to_string());

        let guests = self
            .store
            .find_guests_by_mobile(&phone)
            .await
            .map_err(LinkingError::GuestLookup)?;
        report.matched = guests.len();

        let mut invitations: HashMap<Uuid, Option<Invitation>> = HashMap::new();

        for guest in &guests {
            let invitation = match invitations.get(&guest.invitation_id) {
                Some(cached) => cached.clone(),
                None => match self.store.find_invitation(guest.invitation_id).await {
                    Ok(found) => {
                        invitations.insert(guest.invitation_id, found.clone());
                        found
                    }
                    Err(e) => {
                        warn!(
                            user_id = %user_id,
                            guest_id = %guest.id,
                            invitation_id = %guest.invitation_id,
                            error = %e,
                            "Failed to load invitation for guest match"
                        );
                        report.failed += 1;
                        continue;
                    }
                },
            };

            let Some(invitation) = invitation else {
                debug!(
                    guest_id = %guest.id,
                    invitation_id = %guest.invitation_id,
                    "Guest has no resolvable invitation"
                );
                report.skipped_no_invitation += 1;
                continue;
            };

            match self.link_guest(user_id, guest, &invitation).await {
                Ok(InsertOutcome::Inserted) => report.created += 1,
                Ok(InsertOutcome::AlreadyLinked) => report.already_linked += 1,
                Err(e) => {
                    warn!(
                        user_id = %user_id,
                        guest_id = %guest.id,
                        invitation_id = %invitation.id,
                        error = %e,
                        "Failed to link guest invitation"
                    );
                    report.failed += 1;
                }
            }
        }

        info!(
            user_id = %user_id,
            matched = report.matched,
            created = report.created,
            already_linked = report.already_linked,
            failed = report.failed,
            "Guest linking pass completed"
        );

        Ok(report)
    }

    async fn link_guest(
        &self,
        user_id: Uuid,
        guest: &GuestRecord,
        invitation: &Invitation,
    ) -> Result<InsertOutcome, StoreError> {
        if self
            .store
            .link_exists(user_id, invitation.id, guest.id)
            .await?
        {
            return Ok(InsertOutcome::AlreadyLinked);
        }

        let link = NewInvitationLink::pending(user_id, guest, invitation);
        self.store.insert_link(&link).await
    }
}

/// In-memory [`GuestLinkStore`] for development and testing.
///
/// Enforces the (user, invitation, guest) key on insert like the database
/// constraint does, and can simulate failures.
#[derive(Debug, Default)]
pub struct InMemoryGuestLinkStore {
    inner: RwLock<InMemoryLinkState>,
}

#[derive(Debug, Default)]
struct InMemoryLinkState {
    guests: Vec<GuestRecord>,
    invitations: HashMap<Uuid, Invitation>,
    links: Vec<UserInvitationLink>,
    failing_inserts: HashSet<Uuid>,
    fail_guest_lookup: bool,
}

impl InMemoryGuestLinkStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_invitation(&self, invitation: Invitation) {
        self.inner
            .write()
            .await
            .invitations
            .insert(invitation.id, invitation);
    }

    pub async fn add_guest(&self, guest: GuestRecord) {
        self.inner.write().await.guests.push(guest);
    }

    /// Makes inserts for `guest_id` fail with a backend error.
    pub async fn fail_inserts_for(&self, guest_id: Uuid) {
        self.inner.write().await.failing_inserts.insert(guest_id);
    }

    /// Makes the guest lookup fail with a backend error.
    pub async fn fail_guest_lookup(&self) {
        self.inner.write().await.fail_guest_lookup = true;
    }

    pub async fn links(&self) -> Vec<UserInvitationLink> {
        self.inner.read().await.links.clone()
    }
}

#[async_trait::async_trait]
impl GuestLinkStore for InMemoryGuestLinkStore {
    async fn find_guests_by_mobile(
        &self,
        mobile: &CanonicalPhone,
    ) -> Result<Vec<GuestRecord>, StoreError> {
        let state = self.inner.read().await;
        if state.fail_guest_lookup {
            return Err(StoreError::Backend("simulated guest lookup failure".into()));
        }
        Ok(state
            .guests
            .iter()
            .filter(|g| g.mobile == mobile.as_str())
            .cloned()
            .collect())
    }

    async fn find_invitation(
        &self,
        invitation_id: Uuid,
    ) -> Result<Option<Invitation>, StoreError> {
        Ok(self.inner.read().await.invitations.get(&invitation_id).cloned())
    }

    async fn link_exists(
        &self,
        user_id: Uuid,
        invitation_id: Uuid,
        guest_id: Uuid,
    ) -> Result<bool, StoreError> {
        Ok(self.inner.read().await.links.iter().any(|l| {
            l.user_id == user_id && l.invitation_id == invitation_id && l.guest_id == guest_id
        }))
    }

    async fn insert_link(&self, link: &NewInvitationLink) -> Result<InsertOutcome, StoreError> {
        let mut state = self.inner.write().await;
        if state.failing_inserts.contains(&link.guest_id) {
            return Err(StoreError::Backend("simulated insert failure".into()));
        }

        let exists = state
            .links
            .iter()
            .any(|l| (l.user_id, l.invitation_id, l.guest_id) == link.key());
        if exists {
            return Ok(InsertOutcome::AlreadyLinked);
        }

        state.links.push(UserInvitationLink {
            id: Uuid::new_v4(),
            user_id: link.user_id,
            invitation_id: link.invitation_id,
            guest_id: link.guest_id,
            guest_name: link.guest_name.clone(),
            invitation_title: link.invitation_title.clone(),
            hosts_names: link.hosts_names.clone(),
            invitation_date: link.invitation_date,
            status: link.status,
            created_at: chrono::Utc::now(),
        });
        Ok(InsertOutcome::Inserted)
    }
}
