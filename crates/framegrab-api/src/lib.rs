//! Framegrab API Library
//!
//! HTTP handlers and application setup for the frame extraction service.

mod api_doc;
mod handlers;
mod utils;

pub mod error;
pub mod setup;
pub mod state;

pub use error::{ErrorResponse, HttpAppError};
pub use handlers::extract::{DURATION_SOURCE_HEADER, FRAME_TIMESTAMP_HEADER, VIDEO_ID_HEADER};
