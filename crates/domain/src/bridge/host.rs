//! Host side of the wishes bridge.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde_json::Value;
use sha2::{Digest, Sha256};
use shared::validation::validate_wish_content;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use super::error::BridgeError;
use super::origin::OriginPolicy;
use super::protocol::{
    decode_embedded, EmbeddedMessage, HostMessage, LikeFailedPayload, LikeUpdatedPayload,
    SubmitErrorPayload, SubmitWishPayload, SubmittedPayload, ToggleLikePayload, WishesPayload,
};
use super::widget::DEFAULT_MAX_IMAGE_BYTES;
use crate::error::StoreError;
use crate::models::{LikeState, NewWish, Wish};

/// Wish storage used by the host.
#[async_trait::async_trait]
pub trait WishStore: Send + Sync {
    /// Approved wishes of an invitation, newest first, with `has_liked`
    /// computed for `viewer`.
    async fn list_wishes(
        &self,
        invitation_id: Uuid,
        viewer: Option<Uuid>,
    ) -> Result<Vec<Wish>, StoreError>;

    async fn insert_wish(&self, wish: &NewWish) -> Result<Wish, StoreError>;

    /// Adds or removes the guest's like atomically.
    ///
    /// Returns `StoreError::NotFound` when the wish does not belong to the
    /// invitation.
    async fn toggle_like(
        &self,
        invitation_id: Uuid,
        wish_id: Uuid,
        guest_id: Uuid,
        guest_name: &str,
    ) -> Result<LikeState, StoreError>;

    async fn guest_belongs_to_invitation(
        &self,
        guest_id: Uuid,
        invitation_id: Uuid,
    ) -> Result<bool, StoreError>;
}

/// Blob storage for wish images.
#[async_trait::async_trait]
pub trait ImageStore: Send + Sync {
    /// Stores `bytes` under `key` and returns the public URL.
    async fn put(&self, key: &str, content_type: &str, bytes: Vec<u8>)
        -> Result<String, StoreError>;
}

#[async_trait::async_trait]
impl<T: WishStore + ?Sized> WishStore for Arc<T> {
    async fn list_wishes(
        &self,
        invitation_id: Uuid,
        viewer: Option<Uuid>,
    ) -> Result<Vec<Wish>, StoreError> {
        (**self).list_wishes(invitation_id, viewer).await
    }

    async fn insert_wish(&self, wish: &NewWish) -> Result<Wish, StoreError> {
        (**self).insert_wish(wish).await
    }

    async fn toggle_like(
        &self,
        invitation_id: Uuid,
        wish_id: Uuid,
        guest_id: Uuid,
        guest_name: &str,
    ) -> Result<LikeState, StoreError> {
        (**self)
            .toggle_like(invitation_id, wish_id, guest_id, guest_name)
            .await
    }

    async fn guest_belongs_to_invitation(
        &self,
        guest_id: Uuid,
        invitation_id: Uuid,
    ) -> Result<bool, StoreError> {
        (**self)
            .guest_belongs_to_invitation(guest_id, invitation_id)
            .await
    }
}

#[async_trait::async_trait]
impl<T: ImageStore + ?Sized> ImageStore for Arc<T> {
    async fn put(
        &self,
        key: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, StoreError> {
        (**self).put(key, content_type, bytes).await
    }
}

#[derive(Debug, Clone)]
pub struct HostOptions {
    /// Whether new wishes are visible without moderation.
    pub auto_approve: bool,
    pub max_image_bytes: usize,
}

impl Default for HostOptions {
    fn default() -> Self {
        Self {
            auto_approve: true,
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
        }
    }
}

/// Answers embedded requests for one host page.
pub struct WishHost<W, I> {
    wishes: W,
    images: I,
    policy: OriginPolicy,
    options: HostOptions,
}

impl<W: WishStore, I: ImageStore> WishHost<W, I> {
    pub fn new(wishes: W, images: I, policy: OriginPolicy, options: HostOptions) -> Self {
        Self {
            wishes,
            images,
            policy,
            options,
        }
    }

    pub fn policy(&self) -> &OriginPolicy {
        &self.policy
    }

    /// Checks the origin, decodes `data` and handles it.
    pub async fn handle_value(
        &self,
        origin: &str,
        invitation_id: Uuid,
        viewer: Option<Uuid>,
        data: &Value,
    ) -> Result<Vec<HostMessage>, BridgeError> {
        self.policy.check(origin)?;
        let message = decode_embedded(data)?;
        self.dispatch(invitation_id, viewer, message).await
    }

    /// Handles one embedded message and returns the replies to post back.
    ///
    /// Storage failures while listing wishes are returned as errors; failures
    /// of a submission or a like are reported to the widget as
    /// `WISH_SUBMITTED_ERROR` and `WISH_LIKE_FAILED` replies.
    pub async fn handle(
        &self,
        origin: &str,
        invitation_id: Uuid,
        viewer: Option<Uuid>,
        message: EmbeddedMessage,
    ) -> Result<Vec<HostMessage>, BridgeError> {
        self.policy.check(origin)?;
        self.dispatch(invitation_id, viewer, message).await
    }

    async fn dispatch(
        &self,
        invitation_id: Uuid,
        viewer: Option<Uuid>,
        message: EmbeddedMessage,
    ) -> Result<Vec<HostMessage>, BridgeError> {
        let reply = match message {
            EmbeddedMessage::RequestInitialWishesData(payload)
            | EmbeddedMessage::RequestWishesRefresh(payload) => {
                let wishes = self.wishes.list_wishes(invitation_id, viewer).await?;
                HostMessage::InitialWishesData(WishesPayload {
                    wishes,
                    request_id: payload.request_id,
                })
            }
            EmbeddedMessage::SubmitNewWish(payload) => {
                self.submit(invitation_id, viewer, payload).await
            }
            EmbeddedMessage::ToggleWishLike(payload) => {
                self.toggle(invitation_id, viewer, payload).await
            }
        };

        Ok(vec![reply])
    }

    async fn check_guest(
        &self,
        invitation_id: Uuid,
        viewer: Option<Uuid>,
        guest_id: Uuid,
    ) -> Result<(), String> {
        // Guest ids are public in the wish list, so the viewer must vouch for one.
        match viewer {
            None => return Err("Open this page from your invitation link".to_string()),
            Some(v) if v != guest_id => {
                return Err("Guest does not match the current viewer".to_string())
            }
            Some(_) => {}
        }

        match self
            .wishes
            .guest_belongs_to_invitation(guest_id, invitation_id)
            .await
        {
            Ok(true) => Ok(()),
            Ok(false) => Err("Guest is not on this invitation".to_string()),
            Err(e) => {
                warn!(guest_id = %guest_id, error = %e, "Guest lookup failed");
                Err("Failed to verify guest".to_string())
            }
        }
    }

    async fn submit(
        &self,
        invitation_id: Uuid,
        viewer: Option<Uuid>,
        payload: SubmitWishPayload,
    ) -> HostMessage {
        let request_id = payload.request_id;
        let error = |error: String| {
            HostMessage::WishSubmittedError(SubmitErrorPayload { error, request_id })
        };

        if let Err(e) = self
            .check_guest(invitation_id, viewer, payload.guest_id)
            .await
        {
            return error(e);
        }

        let content = payload.content.trim().to_string();
        if let Err(e) = validate_wish_content(&content) {
            return error(
                e.message
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string()),
            );
        }

        let image_url = match payload.image_data.as_deref() {
            Some(data) if !data.is_empty() => {
                self.store_image(
                    invitation_id,
                    data,
                    payload.image_type.as_deref(),
                    payload.image_filename.as_deref(),
                )
                .await
            }
            _ => None,
        };

        let new_wish = NewWish {
            invitation_id,
            guest_id: payload.guest_id,
            guest_name: payload.guest_name,
            content,
            image_url,
            is_approved: self.options.auto_approve,
        };

        match self.wishes.insert_wish(&new_wish).await {
            Ok(wish) => {
                info!(
                    wish_id = %wish.id,
                    invitation_id = %invitation_id,
                    guest_id = %wish.guest_id,
                    has_image = wish.image_url.is_some(),
                    "Wish submitted"
                );
                HostMessage::WishSubmittedSuccess(SubmittedPayload {
                    wish_id: Some(wish.id),
                    request_id,
                })
            }
            Err(e) => {
                warn!(invitation_id = %invitation_id, error = %e, "Failed to store wish");
                error("Failed to save your wish".to_string())
            }
        }
    }

    /// Decodes and stores an attached image. Any failure drops the image.
    async fn store_image(
        &self,
        invitation_id: Uuid,
        data: &str,
        declared_type: Option<&str>,
        filename: Option<&str>,
    ) -> Option<String> {
        let image = match decode_image(data, declared_type, self.options.max_image_bytes) {
            Ok(image) => image,
            Err(reason) => {
                warn!(invitation_id = %invitation_id, reason = %reason, "Discarding wish image");
                return None;
            }
        };

        let key = format!(
            "wishes/{}/{}.{}",
            invitation_id,
            hex::encode(Sha256::digest(&image.bytes)),
            image_extension(&image.content_type, filename)
        );

        match self.images.put(&key, &image.content_type, image.bytes).await {
            Ok(url) => Some(url),
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to store wish image");
                None
            }
        }
    }

    async fn toggle(
        &self,
        invitation_id: Uuid,
        viewer: Option<Uuid>,
        payload: ToggleLikePayload,
    ) -> HostMessage {
        let wish_id = payload.wish_id;
        let request_id = payload.request_id;
        let failed = |error: String| {
            HostMessage::WishLikeFailed(LikeFailedPayload {
                wish_id,
                error,
                request_id,
            })
        };

        if let Err(e) = self
            .check_guest(invitation_id, viewer, payload.guest_id)
            .await
        {
            return failed(e);
        }

        match self
            .wishes
            .toggle_like(invitation_id, wish_id, payload.guest_id, &payload.guest_name)
            .await
        {
            Ok(state) => HostMessage::WishLikeUpdated(LikeUpdatedPayload {
                wish_id,
                likes_count: state.likes_count,
                has_liked: state.has_liked,
                request_id,
            }),
            Err(StoreError::NotFound(_)) => failed("Wish not found".to_string()),
            Err(e) => {
                warn!(wish_id = %wish_id, error = %e, "Failed to toggle like");
                failed("Failed to update like".to_string())
            }
        }
    }
}

#[derive(Debug)]
struct DecodedImage {
    content_type: String,
    bytes: Vec<u8>,
}

/// Decodes base64 image data, optionally wrapped in a `data:` URL.
fn decode_image(
    data: &str,
    declared_type: Option<&str>,
    max_bytes: usize,
) -> Result<DecodedImage, String> {
    let (url_type, encoded) = match data.strip_prefix("data:") {
        Some(rest) => {
            let (header, encoded) = rest
                .split_once(',')
                .ok_or_else(|| "data URL has no payload".to_string())?;
            let media_type = header.split(';').next().unwrap_or_default();
            (Some(media_type), encoded)
        }
        None => (None, data),
    };

    let content_type = declared_type
        .filter(|t| !t.is_empty())
        .or(url_type.filter(|t| !t.is_empty()))
        .ok_or_else(|| "image type is missing".to_string())?
        .to_ascii_lowercase();
    if !content_type.starts_with("image/") {
        return Err(format!("unsupported content type {}", content_type));
    }

    // Base64 inflates by 4/3; reject early before allocating.
    if encoded.len() / 4 * 3 > max_bytes + 3 {
        return Err(format!("image exceeds {} bytes", max_bytes));
    }

    let bytes = BASE64
        .decode(encoded.trim())
        .map_err(|e| format!("invalid base64: {}", e))?;
    if bytes.is_empty() {
        return Err("image is empty".to_string());
    }
    if bytes.len() > max_bytes {
        return Err(format!("image exceeds {} bytes", max_bytes));
    }

    Ok(DecodedImage {
        content_type,
        bytes,
    })
}

fn image_extension(content_type: &str, filename: Option<&str>) -> String {
    let known = match content_type {
        "image/png" => Some("png"),
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        "image/heic" => Some("heic"),
        _ => None,
    };
    if let Some(ext) = known {
        return ext.to_string();
    }

    filename
        .and_then(|f| f.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty() && ext.len() <= 5 && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or_else(|| "img".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::memory::{InMemoryImageStore, InMemoryWishStore};
    use crate::bridge::protocol::RequestPayload;
    use serde_json::json;

    const ORIGIN: &str = "https://invites.example.com";

    struct Fixture {
        host: WishHost<Arc<InMemoryWishStore>, Arc<InMemoryImageStore>>,
        wishes: Arc<InMemoryWishStore>,
        images: Arc<InMemoryImageStore>,
        invitation_id: Uuid,
        guest_id: Uuid,
    }

    async fn fixture(options: HostOptions) -> Fixture {
        let wishes = Arc::new(InMemoryWishStore::new());
        let images = Arc::new(InMemoryImageStore::new("https://cdn.example.com"));
        let invitation_id = Uuid::new_v4();
        let guest_id = Uuid::new_v4();
        wishes.add_guest(invitation_id, guest_id).await;

        let host = WishHost::new(
            wishes.clone(),
            images.clone(),
            OriginPolicy::new(ORIGIN, Vec::<String>::new()),
            options,
        );

        Fixture {
            host,
            wishes,
            images,
            invitation_id,
            guest_id,
        }
    }

    fn submit(guest_id: Uuid, content: &str) -> SubmitWishPayload {
        SubmitWishPayload {
            guest_id,
            guest_name: "Asha".to_string(),
            content: content.to_string(),
            image_data: None,
            image_filename: None,
            image_type: None,
            request_id: Some(Uuid::new_v4()),
        }
    }

    async fn submit_ok(f: &Fixture, content: &str) -> Uuid {
        let replies = f
            .host
            .handle(
                ORIGIN,
                f.invitation_id,
                Some(f.guest_id),
                EmbeddedMessage::SubmitNewWish(submit(f.guest_id, content)),
            )
            .await
            .unwrap();
        match &replies[0] {
            HostMessage::WishSubmittedSuccess(p) => p.wish_id.unwrap(),
            other => panic!("unexpected reply: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_untrusted_origin_rejected() {
        let f = fixture(HostOptions::default()).await;
        let result = f
            .host
            .handle(
                "https://evil.example.com",
                f.invitation_id,
                None,
                EmbeddedMessage::RequestInitialWishesData(RequestPayload::default()),
            )
            .await;
        assert!(matches!(result, Err(BridgeError::UntrustedOrigin(_))));
    }

    #[tokio::test]
    async fn test_initial_data_echoes_request_id() {
        let f = fixture(HostOptions::default()).await;
        submit_ok(&f, "First!").await;
        let request_id = Uuid::new_v4();

        let replies = f
            .host
            .handle(
                ORIGIN,
                f.invitation_id,
                Some(f.guest_id),
                EmbeddedMessage::RequestInitialWishesData(RequestPayload {
                    request_id: Some(request_id),
                }),
            )
            .await
            .unwrap();

        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].request_id(), Some(request_id));
        match &replies[0] {
            HostMessage::InitialWishesData(p) => {
                assert_eq!(p.wishes.len(), 1);
                assert_eq!(p.wishes[0].content, "First!");
            }
            other => panic!("unexpected reply: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_submit_stores_trimmed_wish() {
        let f = fixture(HostOptions::default()).await;
        submit_ok(&f, "  Many happy returns  ").await;

        let stored = f.wishes.all_wishes().await;
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].content, "Many happy returns");
        assert!(stored[0].is_approved);
    }

    #[tokio::test]
    async fn test_submit_without_auto_approve_is_hidden() {
        let f = fixture(HostOptions {
            auto_approve: false,
            ..HostOptions::default()
        })
        .await;
        submit_ok(&f, "Pending review").await;

        let listed = f.wishes.list_wishes(f.invitation_id, None).await.unwrap();
        assert!(listed.is_empty());
        assert!(!f.wishes.all_wishes().await[0].is_approved);
    }

    #[tokio::test]
    async fn test_submit_too_long_rejected() {
        let f = fixture(HostOptions::default()).await;
        let replies = f
            .host
            .handle(
                ORIGIN,
                f.invitation_id,
                Some(f.guest_id),
                EmbeddedMessage::SubmitNewWish(submit(f.guest_id, &"a".repeat(281))),
            )
            .await
            .unwrap();

        assert_eq!(replies[0].message_type(), "WISH_SUBMITTED_ERROR");
        assert!(f.wishes.all_wishes().await.is_empty());
    }

    #[tokio::test]
    async fn test_submit_from_unknown_guest_rejected() {
        let f = fixture(HostOptions::default()).await;
        let stranger = Uuid::new_v4();
        let replies = f
            .host
            .handle(
                ORIGIN,
                f.invitation_id,
                Some(stranger),
                EmbeddedMessage::SubmitNewWish(submit(stranger, "Hi")),
            )
            .await
            .unwrap();

        match &replies[0] {
            HostMessage::WishSubmittedError(p) => {
                assert_eq!(p.error, "Guest is not on this invitation")
            }
            other => panic!("unexpected reply: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_submit_and_like_require_viewer() {
        let f = fixture(HostOptions::default()).await;
        let replies = f
            .host
            .handle(
                ORIGIN,
                f.invitation_id,
                None,
                EmbeddedMessage::SubmitNewWish(submit(f.guest_id, "Hi")),
            )
            .await
            .unwrap();
        assert_eq!(replies[0].message_type(), "WISH_SUBMITTED_ERROR");
        assert!(f.wishes.all_wishes().await.is_empty());

        let wish_id = submit_ok(&f, "Hello").await;
        let replies = f
            .host
            .handle(
                ORIGIN,
                f.invitation_id,
                None,
                EmbeddedMessage::ToggleWishLike(ToggleLikePayload {
                    wish_id,
                    guest_id: f.guest_id,
                    guest_name: "Asha".to_string(),
                    request_id: None,
                }),
            )
            .await
            .unwrap();
        assert_eq!(replies[0].message_type(), "WISH_LIKE_FAILED");
    }

    #[tokio::test]
    async fn test_submit_for_other_viewer_rejected() {
        let f = fixture(HostOptions::default()).await;
        let replies = f
            .host
            .handle(
                ORIGIN,
                f.invitation_id,
                Some(Uuid::new_v4()),
                EmbeddedMessage::SubmitNewWish(submit(f.guest_id, "Hi")),
            )
            .await
            .unwrap();
        assert_eq!(replies[0].message_type(), "WISH_SUBMITTED_ERROR");
    }

    #[tokio::test]
    async fn test_submit_with_image_stores_blob() {
        let f = fixture(HostOptions::default()).await;
        let mut payload = submit(f.guest_id, "With photo");
        payload.image_data = Some("data:image/png;base64,AQID".to_string());
        payload.image_filename = Some("us.png".to_string());

        f.host
            .handle(
                ORIGIN,
                f.invitation_id,
                Some(f.guest_id),
                EmbeddedMessage::SubmitNewWish(payload),
            )
            .await
            .unwrap();

        let stored = f.wishes.all_wishes().await;
        let url = stored[0].image_url.clone().unwrap();
        let expected_key = format!(
            "wishes/{}/{}.png",
            f.invitation_id,
            hex::encode(Sha256::digest([1u8, 2, 3]))
        );
        assert_eq!(url, format!("https://cdn.example.com/{}", expected_key));
        assert_eq!(
            f.images.get(&expected_key).await,
            Some(("image/png".to_string(), vec![1, 2, 3]))
        );
    }

    #[tokio::test]
    async fn test_bad_image_still_stores_wish() {
        let f = fixture(HostOptions::default()).await;
        let mut payload = submit(f.guest_id, "Photo is broken");
        payload.image_data = Some("not base64!!".to_string());
        payload.image_type = Some("image/jpeg".to_string());

        let replies = f
            .host
            .handle(
                ORIGIN,
                f.invitation_id,
                Some(f.guest_id),
                EmbeddedMessage::SubmitNewWish(payload),
            )
            .await
            .unwrap();

        assert_eq!(replies[0].message_type(), "WISH_SUBMITTED_SUCCESS");
        let stored = f.wishes.all_wishes().await;
        assert!(stored[0].image_url.is_none());
        assert!(f.images.is_empty().await);
    }

    #[tokio::test]
    async fn test_store_failure_reported_as_submit_error() {
        let f = fixture(HostOptions::default()).await;
        f.wishes.fail_writes(true).await;

        let replies = f
            .host
            .handle(
                ORIGIN,
                f.invitation_id,
                Some(f.guest_id),
                EmbeddedMessage::SubmitNewWish(submit(f.guest_id, "Hello")),
            )
            .await
            .unwrap();
        assert_eq!(replies[0].message_type(), "WISH_SUBMITTED_ERROR");
    }

    #[tokio::test]
    async fn test_toggle_like_twice() {
        let f = fixture(HostOptions::default()).await;
        let wish_id = submit_ok(&f, "Like me").await;
        let toggle = |request_id| {
            EmbeddedMessage::ToggleWishLike(ToggleLikePayload {
                wish_id,
                guest_id: f.guest_id,
                guest_name: "Asha".to_string(),
                request_id: Some(request_id),
            })
        };

        let first = Uuid::new_v4();
        let replies = f
            .host
            .handle(ORIGIN, f.invitation_id, Some(f.guest_id), toggle(first))
            .await
            .unwrap();
        assert_eq!(
            replies[0],
            HostMessage::WishLikeUpdated(LikeUpdatedPayload {
                wish_id,
                likes_count: 1,
                has_liked: true,
                request_id: Some(first),
            })
        );

        let replies = f
            .host
            .handle(ORIGIN, f.invitation_id, Some(f.guest_id), toggle(Uuid::new_v4()))
            .await
            .unwrap();
        match &replies[0] {
            HostMessage::WishLikeUpdated(p) => {
                assert_eq!(p.likes_count, 0);
                assert!(!p.has_liked);
            }
            other => panic!("unexpected reply: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_toggle_unknown_wish_fails() {
        let f = fixture(HostOptions::default()).await;
        let wish_id = Uuid::new_v4();
        let replies = f
            .host
            .handle(
                ORIGIN,
                f.invitation_id,
                Some(f.guest_id),
                EmbeddedMessage::ToggleWishLike(ToggleLikePayload {
                    wish_id,
                    guest_id: f.guest_id,
                    guest_name: "Asha".to_string(),
                    request_id: None,
                }),
            )
            .await
            .unwrap();

        match &replies[0] {
            HostMessage::WishLikeFailed(p) => {
                assert_eq!(p.wish_id, wish_id);
                assert_eq!(p.error, "Wish not found");
            }
            other => panic!("unexpected reply: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_handle_value_decodes_and_checks_origin() {
        let f = fixture(HostOptions::default()).await;

        let replies = f
            .host
            .handle_value(
                ORIGIN,
                f.invitation_id,
                None,
                &json!({"type": "REQUEST_WISHES_REFRESH", "payload": {}}),
            )
            .await
            .unwrap();
        assert_eq!(replies[0].message_type(), "INITIAL_WISHES_DATA");

        let err = f
            .host
            .handle_value(ORIGIN, f.invitation_id, None, &json!({"type": "DELETE_ALL"}))
            .await
            .unwrap_err();
        assert_eq!(err, BridgeError::UnknownType("DELETE_ALL".to_string()));
    }

    #[test]
    fn test_decode_image_plain_base64_requires_type() {
        assert!(decode_image("AQID", None, 10).is_err());
        let image = decode_image("AQID", Some("image/gif"), 10).unwrap();
        assert_eq!(image.bytes, vec![1, 2, 3]);
        assert_eq!(image.content_type, "image/gif");
    }

    #[test]
    fn test_decode_image_rejects_non_images_and_oversize() {
        assert!(decode_image("data:text/html;base64,AQID", None, 10).is_err());
        assert!(decode_image("AQID", Some("image/png"), 2).is_err());
    }

    #[test]
    fn test_image_extension() {
        assert_eq!(image_extension("image/jpeg", None), "jpg");
        assert_eq!(image_extension("image/avif", Some("me.AVIF")), "avif");
        assert_eq!(image_extension("image/avif", None), "img");
    }
}
