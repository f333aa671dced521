//! Core library for Taskboard
//!
//! This crate contains the core business logic, including:
//! - The Task model and its status lifecycle
//! - Payload validation
//! - The repository contract and file-backed store

pub mod error;
pub mod task;

pub use error::{Error, Violation};
pub type Result<T> = std::result::Result<T, Error>;
