//! Core domain models and logic for gamehub
//!
//! This crate contains:
//! - Domain models (Entry and its projections)
//! - Blob codec (transport encoding for embedded images)
//! - The request error taxonomy shared by the pipelines

pub mod codec;
pub mod entry;
pub mod error;

pub use codec::{DEFAULT_IMAGE_MIME, encode_for_transport, encode_image};
pub use entry::{
    Entry, EntryDetails, EntrySummary, EntryUpdate, NewEntry, RenderableEntry, RenderableSummary,
};
pub use error::{Error, Result};
