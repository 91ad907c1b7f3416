//! Embedded side of the wishes bridge.
//!
//! A [`WishWidget`] is owned by one mounted widget view: [`WishWidget::attach`]
//! on mount, [`WishWidget::detach`] on unmount. It never talks to storage; it
//! posts [`EmbeddedMessage`]s through a [`MessageSink`] and applies the
//! [`HostMessage`]s fed to [`WishWidget::receive`].
//!
//! Like toggles are optimistic. Each toggle is applied locally right away and
//! kept as a pending entry until the host answers:
//! - `WISH_LIKE_UPDATED` settles it and installs the host's counts;
//! - `WISH_LIKE_FAILED`, a reply timeout, or a failed post rolls it back.
//!
//! Replies carrying a `requestId` settle that exact toggle. Replies without
//! one settle the oldest pending toggle of the same wish, which is only an
//! approximation when the same wish has several toggles in flight.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde_json::Value;
use shared::validation::validate_wish_content;
use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, warn};
use uuid::Uuid;

use super::error::BridgeError;
use super::origin::OriginPolicy;
use super::protocol::{
    decode_host, EmbeddedMessage, HostMessage, LikeFailedPayload, LikeUpdatedPayload,
    RequestPayload, SubmitWishPayload, ToggleLikePayload,
};
use crate::models::Wish;

/// Default upper bound for an attached image, before base64 encoding.
pub const DEFAULT_MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Outbound channel to the host page.
pub trait MessageSink {
    fn post(&mut self, message: &EmbeddedMessage) -> Result<(), BridgeError>;
}

impl MessageSink for Vec<EmbeddedMessage> {
    fn post(&mut self, message: &EmbeddedMessage) -> Result<(), BridgeError> {
        self.push(message.clone());
        Ok(())
    }
}

/// Where the bytes of an attached image come from.
pub trait ImageSource {
    fn read_image(&self) -> io::Result<Vec<u8>>;
}

impl ImageSource for Vec<u8> {
    fn read_image(&self) -> io::Result<Vec<u8>> {
        Ok(self.clone())
    }
}

impl ImageSource for PathBuf {
    fn read_image(&self) -> io::Result<Vec<u8>> {
        std::fs::read(self)
    }
}

/// An image the guest picked to go with a wish.
pub struct ImageAttachment {
    pub filename: String,
    pub content_type: String,
    pub source: Box<dyn ImageSource>,
}

impl std::fmt::Debug for ImageAttachment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageAttachment")
            .field("filename", &self.filename)
            .field("content_type", &self.content_type)
            .finish_non_exhaustive()
    }
}

/// A wish as typed in the form.
#[derive(Debug)]
pub struct WishDraft {
    pub content: String,
    pub image: Option<ImageAttachment>,
}

impl WishDraft {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            image: None,
        }
    }
}

/// The guest viewing the widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuestIdentity {
    pub guest_id: Uuid,
    pub guest_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Error,
}

/// A user-visible notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct WidgetOptions {
    pub max_image_bytes: usize,
    /// How long to wait for a reply before giving up. `None` waits forever.
    pub reply_timeout: Option<Duration>,
}

impl Default for WidgetOptions {
    fn default() -> Self {
        Self {
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
            reply_timeout: Some(Duration::from_secs(15)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LikeSnapshot {
    has_liked: bool,
    likes_count: i32,
}

#[derive(Debug, Clone)]
struct PendingLike {
    request_id: Uuid,
    wish_id: Uuid,
    before: LikeSnapshot,
    sent_at: Instant,
}

/// State of one embedded wishes widget.
pub struct WishWidget<S> {
    sink: S,
    policy: OriginPolicy,
    guest: Option<GuestIdentity>,
    options: WidgetOptions,
    attached: bool,
    wishes: Vec<Wish>,
    loading_since: Option<Instant>,
    submitting_since: Option<(Uuid, Instant)>,
    pending_likes: Vec<PendingLike>,
    notices: Vec<Notice>,
}

impl<S: MessageSink> WishWidget<S> {
    pub fn new(
        sink: S,
        policy: OriginPolicy,
        guest: Option<GuestIdentity>,
        options: WidgetOptions,
    ) -> Self {
        Self {
            sink,
            policy,
            guest,
            options,
            attached: false,
            wishes: Vec::new(),
            loading_since: None,
            submitting_since: None,
            pending_likes: Vec::new(),
            notices: Vec::new(),
        }
    }

    /// Starts listening and asks the host for the wish list.
    pub fn attach(&mut self, now: Instant) -> Result<(), BridgeError> {
        self.attached = true;
        self.loading_since = Some(now);

        let message = EmbeddedMessage::RequestInitialWishesData(RequestPayload {
            request_id: Some(Uuid::new_v4()),
        });
        if let Err(e) = self.sink.post(&message) {
            self.loading_since = None;
            self.notices
                .push(Notice::new(NoticeLevel::Error, "Could not load wishes"));
            return Err(e);
        }
        Ok(())
    }

    /// Stops listening. In-flight requests are forgotten.
    pub fn detach(&mut self) {
        self.attached = false;
        self.loading_since = None;
        self.submitting_since = None;
        self.pending_likes.clear();
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn is_loading(&self) -> bool {
        self.loading_since.is_some()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting_since.is_some()
    }

    pub fn wishes(&self) -> &[Wish] {
        &self.wishes
    }

    pub fn wish(&self, wish_id: Uuid) -> Option<&Wish> {
        self.wishes.iter().find(|w| w.id == wish_id)
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub fn pending_like_count(&self) -> usize {
        self.pending_likes.len()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Handles a raw message dispatched into the widget.
    ///
    /// Messages from untrusted origins, malformed messages and anything
    /// received while detached are logged and dropped without touching state.
    pub fn receive(&mut self, origin: &str, data: &Value, now: Instant) -> Result<(), BridgeError> {
        if !self.attached {
            debug!(origin = %origin, "Widget detached, dropping message");
            return Err(BridgeError::Detached);
        }

        if let Err(e) = self.policy.check(origin) {
            warn!(origin = %origin, "Rejected bridge message from untrusted origin");
            return Err(e);
        }

        let message = decode_host(data).map_err(|e| {
            warn!(origin = %origin, error = %e, "Dropped undecodable bridge message");
            e
        })?;

        self.apply(message, now);
        Ok(())
    }

    fn apply(&mut self, message: HostMessage, now: Instant) {
        debug!(message_type = message.message_type(), "Applying host message");

        match message {
            HostMessage::InitialWishesData(payload) => {
                // The full list is authoritative; optimistic state is dropped.
                self.wishes = payload.wishes;
                self.pending_likes.clear();
                self.loading_since = None;
            }
            HostMessage::WishSubmittedSuccess(_) => {
                self.submitting_since = None;
                self.notices
                    .push(Notice::new(NoticeLevel::Success, "Your wish has been sent!"));
                self.request_refresh(now);
            }
            HostMessage::WishSubmittedError(payload) => {
                self.submitting_since = None;
                self.notices.push(Notice::new(
                    NoticeLevel::Error,
                    format!("Failed to send your wish: {}", payload.error),
                ));
            }
            HostMessage::WishLikeUpdated(payload) => self.settle_like(payload),
            HostMessage::WishLikeFailed(payload) => self.fail_like(payload),
        }
    }

    fn request_refresh(&mut self, now: Instant) {
        let message = EmbeddedMessage::RequestWishesRefresh(RequestPayload {
            request_id: Some(Uuid::new_v4()),
        });
        match self.sink.post(&message) {
            Ok(()) => self.loading_since = Some(now),
            Err(e) => warn!(error = %e, "Failed to request wishes refresh"),
        }
    }

    /// Validates and sends a new wish. Returns the request id.
    pub fn submit_wish(&mut self, draft: WishDraft, now: Instant) -> Result<Uuid, BridgeError> {
        if !self.attached {
            return Err(BridgeError::Detached);
        }

        let Some(guest) = self.guest.clone() else {
            self.notices.push(Notice::new(
                NoticeLevel::Error,
                "Open this page from your invitation link to send a wish",
            ));
            return Err(BridgeError::MissingGuest);
        };

        let content = draft.content.trim().to_string();
        if let Err(e) = validate_wish_content(&content) {
            let message = e
                .message
                .map(|m| m.to_string())
                .unwrap_or_else(|| e.code.to_string());
            self.notices
                .push(Notice::new(NoticeLevel::Error, message.clone()));
            return Err(BridgeError::Validation(message));
        }

        let (image_data, image_filename, image_type) = match draft.image {
            Some(image) => match self.encode_image(&image) {
                Ok(data) => (Some(data), Some(image.filename), Some(image.content_type)),
                Err(reason) => {
                    warn!(filename = %image.filename, reason = %reason, "Image conversion failed");
                    self.notices.push(Notice::new(
                        NoticeLevel::Warning,
                        "Your image could not be attached; sending the wish without it",
                    ));
                    (None, None, None)
                }
            },
            None => (None, None, None),
        };

        let request_id = Uuid::new_v4();
        let message = EmbeddedMessage::SubmitNewWish(SubmitWishPayload {
            guest_id: guest.guest_id,
            guest_name: guest.guest_name,
            content,
            image_data,
            image_filename,
            image_type,
            request_id: Some(request_id),
        });

        if let Err(e) = self.sink.post(&message) {
            self.notices
                .push(Notice::new(NoticeLevel::Error, "Failed to send your wish"));
            return Err(e);
        }

        self.submitting_since = Some((request_id, now));
        Ok(request_id)
    }

    fn encode_image(&self, image: &ImageAttachment) -> Result<String, String> {
        let bytes = image.source.read_image().map_err(|e| e.to_string())?;
        if bytes.is_empty() {
            return Err("image is empty".to_string());
        }
        if bytes.len() > self.options.max_image_bytes {
            return Err(format!(
                "image is {} bytes, limit is {}",
                bytes.len(),
                self.options.max_image_bytes
            ));
        }
        Ok(BASE64.encode(bytes))
    }

    /// Flips the viewer's like on `wish_id` optimistically and tells the host.
    pub fn toggle_like(&mut self, wish_id: Uuid, now: Instant) -> Result<Uuid, BridgeError> {
        if !self.attached {
            return Err(BridgeError::Detached);
        }
        let Some(guest) = self.guest.clone() else {
            self.notices.push(Notice::new(
                NoticeLevel::Error,
                "Open this page from your invitation link to like wishes",
            ));
            return Err(BridgeError::MissingGuest);
        };

        let wish = self
            .wishes
            .iter_mut()
            .find(|w| w.id == wish_id)
            .ok_or(BridgeError::UnknownWish(wish_id))?;

        let before = LikeSnapshot {
            has_liked: wish.has_liked,
            likes_count: wish.likes_count,
        };
        flip(wish);

        let request_id = Uuid::new_v4();
        self.pending_likes.push(PendingLike {
            request_id,
            wish_id,
            before,
            sent_at: now,
        });

        let message = EmbeddedMessage::ToggleWishLike(ToggleLikePayload {
            wish_id,
            guest_id: guest.guest_id,
            guest_name: guest.guest_name,
            request_id: Some(request_id),
        });

        if let Err(e) = self.sink.post(&message) {
            self.roll_back(request_id);
            self.notices
                .push(Notice::new(NoticeLevel::Error, "Could not update like"));
            return Err(e);
        }

        Ok(request_id)
    }

    fn take_pending(&mut self, wish_id: Uuid, request_id: Option<Uuid>) -> Option<PendingLike> {
        let index = match request_id {
            Some(id) => self.pending_likes.iter().position(|p| p.request_id == id),
            None => self.pending_likes.iter().position(|p| p.wish_id == wish_id),
        }?;
        Some(self.pending_likes.remove(index))
    }

    fn settle_like(&mut self, payload: LikeUpdatedPayload) {
        self.take_pending(payload.wish_id, payload.request_id);

        let still_pending = self
            .pending_likes
            .iter()
            .filter(|p| p.wish_id == payload.wish_id)
            .count();

        let Some(wish) = self.wishes.iter_mut().find(|w| w.id == payload.wish_id) else {
            return;
        };

        wish.likes_count = payload.likes_count;
        wish.has_liked = payload.has_liked;
        // Toggles sent after the settled one are not reflected in the reply yet.
        for _ in 0..still_pending {
            flip(wish);
        }
    }

    fn fail_like(&mut self, payload: LikeFailedPayload) {
        let Some(pending) = self.take_pending(payload.wish_id, payload.request_id) else {
            return;
        };
        self.restore(pending);
        self.notices.push(Notice::new(
            NoticeLevel::Error,
            format!("Could not update like: {}", payload.error),
        ));
    }

    fn roll_back(&mut self, request_id: Uuid) {
        if let Some(index) = self
            .pending_likes
            .iter()
            .position(|p| p.request_id == request_id)
        {
            let pending = self.pending_likes.remove(index);
            self.restore(pending);
        }
    }

    /// Undoes one optimistic toggle.
    ///
    /// With no other toggle of the same wish in flight the pre-toggle values
    /// are restored exactly; otherwise only this toggle is inverted.
    fn restore(&mut self, pending: PendingLike) {
        let others = self
            .pending_likes
            .iter()
            .any(|p| p.wish_id == pending.wish_id);

        let Some(wish) = self.wishes.iter_mut().find(|w| w.id == pending.wish_id) else {
            return;
        };

        if others {
            flip(wish);
        } else {
            wish.has_liked = pending.before.has_liked;
            wish.likes_count = pending.before.likes_count;
        }
    }

    /// Expires requests that waited longer than the reply timeout.
    pub fn poll_timeouts(&mut self, now: Instant) {
        let Some(timeout) = self.options.reply_timeout else {
            return;
        };

        if let Some(since) = self.loading_since {
            if now.saturating_duration_since(since) >= timeout {
                self.loading_since = None;
                self.notices.push(Notice::new(
                    NoticeLevel::Warning,
                    "Wishes are taking longer than expected to load",
                ));
            }
        }

        if let Some((request_id, since)) = self.submitting_since {
            if now.saturating_duration_since(since) >= timeout {
                warn!(request_id = %request_id, "Wish submission timed out");
                self.submitting_since = None;
                self.notices.push(Notice::new(
                    NoticeLevel::Error,
                    "We could not confirm your wish was sent, please try again",
                ));
            }
        }

        // Newest first so that each restore sees the toggles sent before it.
        let mut expired: Vec<Uuid> = self
            .pending_likes
            .iter()
            .filter(|p| now.saturating_duration_since(p.sent_at) >= timeout)
            .map(|p| p.request_id)
            .collect();
        expired.reverse();

        if !expired.is_empty() {
            for request_id in expired {
                self.roll_back(request_id);
            }
            self.notices
                .push(Notice::new(NoticeLevel::Error, "Could not update like"));
        }
    }
}

/// Exact +1/-1 so that a pair of toggles always restores the count, even when
/// the host sent `has_liked` with a zero count. [`displayed_likes`] clamps.
fn flip(wish: &mut Wish) {
    if wish.has_liked {
        wish.has_liked = false;
        wish.likes_count -= 1;
    } else {
        wish.has_liked = true;
        wish.likes_count += 1;
    }
}

/// Like count to render for `wish`; never below zero.
pub fn displayed_likes(wish: &Wish) -> i32 {
    wish.likes_count.max(0)
}
