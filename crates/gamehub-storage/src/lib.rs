//! Storage layer for gamehub
//!
//! This crate provides:
//! - SQLite database operations over entries and screenshots
//! - Idempotent schema bootstrap

pub mod db;
pub mod error;
mod models;

pub use db::Storage;
pub use error::{Result, StorageError};
