//! Domain services for the invitations backend.
//!
//! Services contain business logic that operates on domain models.

pub mod guest_linking;

pub use guest_linking::{
    GuestLinkStore, GuestLinker, InMemoryGuestLinkStore, InsertOutcome, LinkingError,
    LinkingReport,
};
