//! Framegrab Storage Library
//!
//! Media stores that host the frames a user selected. Every backend writes an
//! object under a caller-chosen key, overwriting any previous object with the
//! same key, and returns a publicly reachable URL.
//!
//! # Key format
//!
//! Selection keys are `{videoId}-{percent}-{size}`, e.g.
//! `dQw4w9WgXcQ-65-portrait`. Key generation and validation live in [`keys`] so
//! all backends agree on what a key may contain.

#[cfg(feature = "store-cloudinary")]
pub mod cloudinary;
pub mod factory;
pub mod keys;
#[cfg(feature = "store-local")]
pub mod local;
#[cfg(feature = "store-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
#[cfg(feature = "store-cloudinary")]
pub use cloudinary::CloudinaryStore;
pub use factory::create_media_store;
pub use framegrab_core::MediaStoreBackend;
pub use keys::selection_key;
#[cfg(feature = "store-local")]
pub use local::LocalStore;
#[cfg(feature = "store-s3")]
pub use s3::S3Store;
pub use traits::{MediaStore, StorageError, StorageResult};
