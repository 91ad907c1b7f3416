//! Bridge error type.

use thiserror::Error;
use uuid::Uuid;

use crate::error::StoreError;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BridgeError {
    #[error("Message from untrusted origin: {0}")]
    UntrustedOrigin(String),

    #[error("Unknown message type: {0}")]
    UnknownType(String),

    #[error("Malformed message: {0}")]
    Malformed(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Guest identity is missing")]
    MissingGuest,

    #[error("Unknown wish: {0}")]
    UnknownWish(Uuid),

    #[error("Bridge is detached")]
    Detached,

    #[error("Failed to post message: {0}")]
    Transport(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}
