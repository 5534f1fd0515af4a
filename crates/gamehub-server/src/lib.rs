//! HTTP surface for gamehub
//!
//! - `form`: multipart submission parsing
//! - `ingest`: turns a submission into an entry plus screenshots
//! - `retrieve`: renderable projections and file downloads
//! - `views`: HTML pages
//! - `server`: routing and startup

pub mod error;
pub mod form;
pub mod ingest;
pub mod retrieve;
pub mod server;
pub mod views;

pub use error::AppError;
pub use form::UploadForm;
pub use ingest::IngestPipeline;
pub use retrieve::{Download, RetrievalPipeline};
pub use server::{AppState, GameHubServer};
