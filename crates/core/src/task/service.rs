//! Task service
//!
//! Validation and orchestration between transport and store. The store is
//! injected at construction so tests can substitute their own.

use std::sync::Arc;

use serde::Deserialize;
use uuid::Uuid;

use super::model::{SortField, SortOrder, Task, TaskStatus};
use super::repository::TaskRepository;
use super::validate::{NewTask, TaskPatch};
use crate::{Error, Result};

/// Listing query parameters, as they arrive on the wire
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskQuery {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub sort_by: Option<String>,
    #[serde(default)]
    pub order: Option<String>,
}

/// Service layer for task CRUD operations
pub struct TaskService {
    store: Arc<dyn TaskRepository>,
}

impl TaskService {
    pub fn new(store: Arc<dyn TaskRepository>) -> Self {
        Self { store }
    }

    /// Validate and persist a new task
    pub async fn create(&self, payload: NewTask) -> Result<Task> {
        let fields = payload.validate()?;

        let mut task = Task::new(fields.title, fields.due_date).with_status(fields.status);
        if let Some(description) = fields.description {
            task = task.with_description(description);
        }

        let created = self.store.create(task).await?;
        tracing::info!(id = %created.id, "task created");
        Ok(created)
    }

    /// List tasks matching the query
    ///
    /// An unrecognized status filter is dropped rather than rejected, so the
    /// unfiltered set comes back. Unknown sort fields and orders fall back to
    /// due date ascending.
    pub async fn list(&self, query: TaskQuery) -> Result<Vec<Task>> {
        let status = query.status.as_deref().and_then(TaskStatus::parse);
        let sort_by = query
            .sort_by
            .as_deref()
            .and_then(SortField::parse)
            .unwrap_or_default();
        let order = query
            .order
            .as_deref()
            .and_then(SortOrder::parse)
            .unwrap_or_default();

        self.store.list(status, sort_by, order).await
    }

    /// Get a task by ID
    pub async fn get(&self, id: Uuid) -> Result<Task> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }

    /// Apply a partial update to an existing task
    ///
    /// Existence is checked before the payload, so an unknown id fails with
    /// NotFound even when the payload is also invalid.
    pub async fn update(&self, id: Uuid, patch: TaskPatch) -> Result<Task> {
        let mut task = self
            .store
            .get(id)
            .await?
            .ok_or_else(|| Error::NotFound(id.to_string()))?;

        let fields = patch.validate()?;

        if let Some(title) = fields.title {
            task.title = title;
        }
        if let Some(description) = fields.description {
            task.description = Some(description);
        }
        if let Some(status) = fields.status {
            task.status = status;
        }
        if let Some(due_date) = fields.due_date {
            task.due_date = due_date;
        }

        let updated = self.store.update(task).await?;
        tracing::info!(id = %updated.id, "task updated");
        Ok(updated)
    }

    /// Delete a task by ID
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        if self.store.delete(id).await? {
            tracing::info!(%id, "task deleted");
            Ok(())
        } else {
            Err(Error::NotFound(id.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::FileTaskStore;
    use async_trait::async_trait;
    use tempfile::TempDir;

    async fn test_service() -> (TaskService, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("tasks.json");
        let store = FileTaskStore::new(&path).await.unwrap();
        (TaskService::new(Arc::new(store)), temp_dir)
    }

    fn new_task(title: &str) -> NewTask {
        NewTask {
            title: Some(title.to_string()),
            due_date: Some("2030-01-01T00:00:00Z".to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_then_get_round_trip() {
        let (service, _temp) = test_service().await;

        let created = service.create(new_task("Round trip")).await.unwrap();
        let fetched = service.get(created.id).await.unwrap();

        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.title, "Round trip");
        assert_eq!(fetched.status, TaskStatus::Pending);
        assert_eq!(fetched.due_date, created.due_date);
    }

    #[tokio::test]
    async fn test_create_invalid_leaves_store_untouched() {
        let (service, _temp) = test_service().await;

        let payload = NewTask {
            title: Some("".to_string()),
            due_date: Some("invalid-date".to_string()),
            ..Default::default()
        };
        let err = service.create(payload).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        let tasks = service.list(TaskQuery::default()).await.unwrap();
        assert!(tasks.is_empty());
    }

    #[tokio::test]
    async fn test_create_echoes_supplied_status() {
        let (service, _temp) = test_service().await;

        let mut payload = new_task("Status echo");
        payload.status = Some("IN_PROGRESS".to_string());
        let created = service.create(payload).await.unwrap();
        assert_eq!(created.status, TaskStatus::InProgress);
    }

    #[tokio::test]
    async fn test_list_bogus_status_filter_returns_full_set() {
        let (service, _temp) = test_service().await;

        service.create(new_task("One")).await.unwrap();
        let mut done = new_task("Two");
        done.status = Some("COMPLETED".to_string());
        service.create(done).await.unwrap();

        let query = TaskQuery {
            status: Some("BOGUS".to_string()),
            ..Default::default()
        };
        assert_eq!(service.list(query).await.unwrap().len(), 2);

        let query = TaskQuery {
            status: Some("COMPLETED".to_string()),
            ..Default::default()
        };
        let completed = service.list(query).await.unwrap();
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].title, "Two");
    }

    #[tokio::test]
    async fn test_list_unknown_sort_falls_back_to_due_date() {
        let (service, _temp) = test_service().await;

        let mut later = new_task("Later");
        later.due_date = Some("2031-01-01T00:00:00Z".to_string());
        service.create(later).await.unwrap();
        service.create(new_task("Sooner")).await.unwrap();

        let query = TaskQuery {
            sort_by: Some("nonsense".to_string()),
            order: Some("sideways".to_string()),
            ..Default::default()
        };
        let tasks = service.list(query).await.unwrap();
        assert_eq!(tasks[0].title, "Sooner");
        assert_eq!(tasks[1].title, "Later");
    }

    #[tokio::test]
    async fn test_update_merges_supplied_fields_only() {
        let (service, _temp) = test_service().await;

        let created = service
            .create(new_task("Keep me"))
            .await
            .unwrap();

        let patch = TaskPatch {
            status: Some("COMPLETED".to_string()),
            ..Default::default()
        };
        let updated = service.update(created.id, patch).await.unwrap();

        assert_eq!(updated.title, "Keep me");
        assert_eq!(updated.status, TaskStatus::Completed);
        assert_eq!(updated.due_date, created.due_date);
        assert!(updated.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn test_update_unknown_id_wins_over_invalid_payload() {
        let (service, _temp) = test_service().await;

        let patch = TaskPatch {
            title: Some("".to_string()),
            ..Default::default()
        };
        let err = service.update(Uuid::new_v4(), patch).await.unwrap_err();
        match err {
            Error::NotFound(_) => {}
            e => panic!("Expected NotFound error, got: {:?}", e),
        }
    }

    #[tokio::test]
    async fn test_update_invalid_payload_on_existing_task() {
        let (service, _temp) = test_service().await;

        let created = service.create(new_task("Valid")).await.unwrap();
        let patch = TaskPatch {
            status: Some("NOT_A_STATUS".to_string()),
            ..Default::default()
        };
        let err = service.update(created.id, patch).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        // Task unchanged
        let fetched = service.get(created.id).await.unwrap();
        assert_eq!(fetched.status, TaskStatus::Pending);
    }

    #[tokio::test]
    async fn test_delete_then_get_not_found() {
        let (service, _temp) = test_service().await;

        let created = service.create(new_task("Short-lived")).await.unwrap();
        service.delete(created.id).await.unwrap();

        let err = service.get(created.id).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));

        let err = service.delete(created.id).await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    struct FailingStore;

    #[async_trait]
    impl TaskRepository for FailingStore {
        async fn create(&self, _task: Task) -> Result<Task> {
            Err(Error::Store("disk on fire".to_string()))
        }
        async fn get(&self, _id: Uuid) -> Result<Option<Task>> {
            Err(Error::Store("disk on fire".to_string()))
        }
        async fn list(
            &self,
            _status: Option<TaskStatus>,
            _sort_by: SortField,
            _order: SortOrder,
        ) -> Result<Vec<Task>> {
            Err(Error::Store("disk on fire".to_string()))
        }
        async fn update(&self, _task: Task) -> Result<Task> {
            Err(Error::Store("disk on fire".to_string()))
        }
        async fn delete(&self, _id: Uuid) -> Result<bool> {
            Err(Error::Store("disk on fire".to_string()))
        }
    }

    #[tokio::test]
    async fn test_store_failure_surfaces_as_store_error() {
        let service = TaskService::new(Arc::new(FailingStore));

        let err = service.create(new_task("Doomed")).await.unwrap_err();
        assert!(matches!(err, Error::Store(_)));

        // Validation still runs before the store is touched
        let err = service.create(NewTask::default()).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }
}
