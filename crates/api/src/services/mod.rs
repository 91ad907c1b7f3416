//! Service integrations used by route handlers.

pub mod image_store;

pub use image_store::LocalImageStore;
