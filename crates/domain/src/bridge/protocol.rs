//! Wire format of the wishes bridge.
//!
//! Every message is `{ "type": <TYPE>, "payload": { ... } }`. Both catalogs
//! are closed: unknown types, missing fields and unexpected fields are
//! rejected at decode time.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::error::BridgeError;
use crate::models::Wish;

/// Payload of a request that carries nothing but its correlation id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RequestPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<Uuid>,
}

/// Payload of `SUBMIT_NEW_WISH`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SubmitWishPayload {
    pub guest_id: Uuid,
    pub guest_name: String,
    pub content: String,
    /// Base64 image bytes, optionally as a `data:` URL.
    #[serde(default)]
    pub image_data: Option<String>,
    #[serde(default)]
    pub image_filename: Option<String>,
    #[serde(default)]
    pub image_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<Uuid>,
}

/// Payload of `TOGGLE_WISH_LIKE`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ToggleLikePayload {
    pub wish_id: Uuid,
    pub guest_id: Uuid,
    pub guest_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<Uuid>,
}

/// Messages sent by the embedded widget to its host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    content = "payload",
    rename_all = "SCREAMING_SNAKE_CASE",
    deny_unknown_fields
)]
pub enum EmbeddedMessage {
    RequestInitialWishesData(RequestPayload),
    SubmitNewWish(SubmitWishPayload),
    ToggleWishLike(ToggleLikePayload),
    RequestWishesRefresh(RequestPayload),
}

impl EmbeddedMessage {
    /// Every `type` tag in the catalog.
    pub const TYPES: [&'static str; 4] = [
        "REQUEST_INITIAL_WISHES_DATA",
        "SUBMIT_NEW_WISH",
        "TOGGLE_WISH_LIKE",
        "REQUEST_WISHES_REFRESH",
    ];

    pub fn message_type(&self) -> &'static str {
        match self {
            EmbeddedMessage::RequestInitialWishesData(_) => Self::TYPES[0],
            EmbeddedMessage::SubmitNewWish(_) => Self::TYPES[1],
            EmbeddedMessage::ToggleWishLike(_) => Self::TYPES[2],
            EmbeddedMessage::RequestWishesRefresh(_) => Self::TYPES[3],
        }
    }

    pub fn request_id(&self) -> Option<Uuid> {
        match self {
            EmbeddedMessage::RequestInitialWishesData(p)
            | EmbeddedMessage::RequestWishesRefresh(p) => p.request_id,
            EmbeddedMessage::SubmitNewWish(p) => p.request_id,
            EmbeddedMessage::ToggleWishLike(p) => p.request_id,
        }
    }

    pub fn to_json(&self) -> Result<Value, BridgeError> {
        serde_json::to_value(self).map_err(|e| BridgeError::Transport(e.to_string()))
    }
}

/// Payload of `INITIAL_WISHES_DATA`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct WishesPayload {
    pub wishes: Vec<Wish>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<Uuid>,
}

/// Payload of `WISH_SUBMITTED_SUCCESS`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SubmittedPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wish_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<Uuid>,
}

/// Payload of `WISH_SUBMITTED_ERROR`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SubmitErrorPayload {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<Uuid>,
}

/// Payload of `WISH_LIKE_UPDATED`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LikeUpdatedPayload {
    pub wish_id: Uuid,
    #[serde(rename = "likes_count", alias = "likesCount")]
    pub likes_count: i32,
    pub has_liked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<Uuid>,
}

/// Payload of `WISH_LIKE_FAILED`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LikeFailedPayload {
    pub wish_id: Uuid,
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<Uuid>,
}

/// Messages sent by the host back into the embedded widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    content = "payload",
    rename_all = "SCREAMING_SNAKE_CASE",
    deny_unknown_fields
)]
pub enum HostMessage {
    InitialWishesData(WishesPayload),
    WishSubmittedSuccess(SubmittedPayload),
    WishSubmittedError(SubmitErrorPayload),
    WishLikeUpdated(LikeUpdatedPayload),
    /// Explicit failure signal for a like toggle, so the widget can roll back.
    WishLikeFailed(LikeFailedPayload),
}

impl HostMessage {
    /// Every `type` tag in the catalog.
    pub const TYPES: [&'static str; 5] = [
        "INITIAL_WISHES_DATA",
        "WISH_SUBMITTED_SUCCESS",
        "WISH_SUBMITTED_ERROR",
        "WISH_LIKE_UPDATED",
        "WISH_LIKE_FAILED",
    ];

    pub fn message_type(&self) -> &'static str {
        match self {
            HostMessage::InitialWishesData(_) => Self::TYPES[0],
            HostMessage::WishSubmittedSuccess(_) => Self::TYPES[1],
            HostMessage::WishSubmittedError(_) => Self::TYPES[2],
            HostMessage::WishLikeUpdated(_) => Self::TYPES[3],
            HostMessage::WishLikeFailed(_) => Self::TYPES[4],
        }
    }

    pub fn request_id(&self) -> Option<Uuid> {
        match self {
            HostMessage::InitialWishesData(p) => p.request_id,
            HostMessage::WishSubmittedSuccess(p) => p.request_id,
            HostMessage::WishSubmittedError(p) => p.request_id,
            HostMessage::WishLikeUpdated(p) => p.request_id,
            HostMessage::WishLikeFailed(p) => p.request_id,
        }
    }

    pub fn to_json(&self) -> Result<Value, BridgeError> {
        serde_json::to_value(self).map_err(|e| BridgeError::Transport(e.to_string()))
    }
}

fn type_tag(value: &Value) -> Result<&str, BridgeError> {
    let object = value
        .as_object()
        .ok_or_else(|| BridgeError::Malformed("message is not an object".to_string()))?;

    object
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| BridgeError::Malformed("message has no string `type`".to_string()))
}

/// Decodes a message received by the host.
pub fn decode_embedded(value: &Value) -> Result<EmbeddedMessage, BridgeError> {
    let tag = type_tag(value)?;
    if !EmbeddedMessage::TYPES.contains(&tag) {
        return Err(BridgeError::UnknownType(tag.to_string()));
    }
    EmbeddedMessage::deserialize(value).map_err(|e| BridgeError::Malformed(e.to_string()))
}

/// Decodes a message received by the embedded widget.
pub fn decode_host(value: &Value) -> Result<HostMessage, BridgeError> {
    let tag = type_tag(value)?;
    if !HostMessage::TYPES.contains(&tag) {
        return Err(BridgeError::UnknownType(tag.to_string()));
    }
    HostMessage::deserialize(value).map_err(|e| BridgeError::Malformed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_request_with_empty_payload() {
        let msg = decode_embedded(&json!({"type": "REQUEST_INITIAL_WISHES_DATA", "payload": {}}))
            .unwrap();
        assert_eq!(msg, EmbeddedMessage::RequestInitialWishesData(RequestPayload::default()));
        assert_eq!(msg.message_type(), "REQUEST_INITIAL_WISHES_DATA");
        assert!(msg.request_id().is_none());
    }

    #[test]
    fn test_decode_submit_new_wish() {
        let guest_id = Uuid::new_v4();
        let request_id = Uuid::new_v4();
        let msg = decode_embedded(&json!({
            "type": "SUBMIT_NEW_WISH",
            "payload": {
                "guestId": guest_id,
                "guestName": "Asha",
                "content": "Congratulations!",
                "imageData": null,
                "imageFilename": null,
                "imageType": null,
                "requestId": request_id,
            }
        }))
        .unwrap();

        match msg {
            EmbeddedMessage::SubmitNewWish(p) => {
                assert_eq!(p.guest_id, guest_id);
                assert_eq!(p.content, "Congratulations!");
                assert!(p.image_data.is_none());
                assert_eq!(p.request_id, Some(request_id));
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[test]
    fn test_encode_toggle_like() {
        let wish_id = Uuid::new_v4();
        let guest_id = Uuid::new_v4();
        let msg = EmbeddedMessage::ToggleWishLike(ToggleLikePayload {
            wish_id,
            guest_id,
            guest_name: "Raj".to_string(),
            request_id: None,
        });

        let json = msg.to_json().unwrap();
        assert_eq!(json["type"], "TOGGLE_WISH_LIKE");
        assert_eq!(json["payload"]["wishId"], wish_id.to_string());
        assert_eq!(json["payload"]["guestName"], "Raj");
        assert!(json["payload"].get("requestId").is_none());
    }

    #[test]
    fn test_like_updated_uses_snake_case_count() {
        let wish_id = Uuid::new_v4();
        let msg = HostMessage::WishLikeUpdated(LikeUpdatedPayload {
            wish_id,
            likes_count: 4,
            has_liked: true,
            request_id: None,
        });

        let json = msg.to_json().unwrap();
        assert_eq!(json["type"], "WISH_LIKE_UPDATED");
        assert_eq!(json["payload"]["likes_count"], 4);
        assert_eq!(json["payload"]["hasLiked"], true);
        assert_eq!(decode_host(&json).unwrap(), msg);
    }

    #[test]
    fn test_unknown_type_rejected() {
        assert_eq!(
            decode_embedded(&json!({"type": "DELETE_ALL_WISHES", "payload": {}})),
            Err(BridgeError::UnknownType("DELETE_ALL_WISHES".to_string()))
        );
        // Host message types are not valid in the other direction.
        assert!(matches!(
            decode_embedded(&json!({"type": "INITIAL_WISHES_DATA", "payload": {"wishes": []}})),
            Err(BridgeError::UnknownType(_))
        ));
    }

    #[test]
    fn test_malformed_shapes_rejected() {
        let cases = [
            json!("REQUEST_INITIAL_WISHES_DATA"),
            json!({"payload": {}}),
            json!({"type": 7, "payload": {}}),
            json!({"type": "TOGGLE_WISH_LIKE", "payload": {"wishId": "nope"}}),
            json!({"type": "SUBMIT_NEW_WISH", "payload": {"content": "hi"}}),
            json!({"type": "REQUEST_WISHES_REFRESH", "payload": {"admin": true}}),
            json!({"type": "REQUEST_WISHES_REFRESH", "payload": {}, "extra": 1}),
        ];

        for case in cases {
            assert!(
                matches!(decode_embedded(&case), Err(BridgeError::Malformed(_))),
                "expected malformed: {}",
                case
            );
        }
    }

    #[test]
    fn test_decode_host_error_message() {
        let msg = decode_host(&json!({
            "type": "WISH_SUBMITTED_ERROR",
            "payload": {"error": "Could not save your wish"}
        }))
        .unwrap();
        assert_eq!(
            msg,
            HostMessage::WishSubmittedError(SubmitErrorPayload {
                error: "Could not save your wish".to_string(),
                request_id: None,
            })
        );
    }

    #[test]
    fn test_host_request_id_accessor() {
        let request_id = Uuid::new_v4();
        let msg = HostMessage::WishSubmittedSuccess(SubmittedPayload {
            wish_id: None,
            request_id: Some(request_id),
        });
        assert_eq!(msg.request_id(), Some(request_id));
        assert_eq!(msg.message_type(), "WISH_SUBMITTED_SUCCESS");
    }
}
