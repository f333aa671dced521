//! Task module
//!
//! This module contains task-related types and logic.

mod file_store;
mod model;
mod repository;
mod service;
mod validate;

pub use file_store::FileTaskStore;
pub use model::*;
pub use repository::TaskRepository;
pub use service::{TaskQuery, TaskService};
pub use validate::{NewTask, TaskPatch};
