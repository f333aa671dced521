//! Task repository trait
//!
//! Defines the interface for task storage operations.

use async_trait::async_trait;
use uuid::Uuid;

use super::model::{SortField, SortOrder, Task, TaskStatus};
use crate::Result;

/// Repository interface for task CRUD operations
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Create a new task
    async fn create(&self, task: Task) -> Result<Task>;

    /// Get a task by ID
    async fn get(&self, id: Uuid) -> Result<Option<Task>>;

    /// Get tasks, optionally filtered by status, in the given order
    async fn list(
        &self,
        status: Option<TaskStatus>,
        sort_by: SortField,
        order: SortOrder,
    ) -> Result<Vec<Task>>;

    /// Replace an existing task, refreshing its `updated_at`
    async fn update(&self, task: Task) -> Result<Task>;

    /// Delete a task by ID; `false` if it did not exist
    async fn delete(&self, id: Uuid) -> Result<bool>;
}
