//! Messaging bridge between the embedded wishes widget and its host page.
//!
//! The two sides run in isolated contexts and only exchange tagged
//! `{type, payload}` messages:
//!
//! - [`protocol`]: the closed message catalog and its validating decoder
//! - [`origin`]: the trusted-origin check applied to every inbound message
//! - [`widget`]: the embedded side (wish list state, optimistic likes)
//! - [`host`]: the host side (persists wishes and likes)
//!
//! Every request carries a generated `requestId` which the host echoes, so
//! replies settle the exact request they answer. Replies without one (older
//! hosts) are matched by message type and wish id only.

pub mod error;
pub mod host;
pub mod memory;
pub mod origin;
pub mod protocol;
pub mod widget;

pub use error::BridgeError;
pub use host::{HostOptions, ImageStore, WishHost, WishStore};
pub use memory::{InMemoryImageStore, InMemoryWishStore};
pub use origin::OriginPolicy;
pub use protocol::{decode_embedded, decode_host, EmbeddedMessage, HostMessage};
pub use widget::{
    displayed_likes, GuestIdentity, ImageAttachment, ImageSource, MessageSink, Notice,
    NoticeLevel, WidgetOptions, WishDraft, WishWidget,
};
