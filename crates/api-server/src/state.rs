//! Application state

use std::path::PathBuf;
use std::sync::Arc;

use tb_core::task::{FileTaskStore, TaskService};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    service: TaskService,
    dev_mode: bool,
}

impl AppState {
    /// Create a new AppState backed by a file store in the given data directory
    pub async fn new(data_dir: PathBuf, dev_mode: bool) -> tb_core::Result<Self> {
        let tasks_path = data_dir.join("tasks.json");
        let store = FileTaskStore::new(tasks_path).await?;
        let service = TaskService::new(Arc::new(store));

        Ok(Self {
            inner: Arc::new(AppStateInner { service, dev_mode }),
        })
    }

    /// Get reference to the task service
    pub fn service(&self) -> &TaskService {
        &self.inner.service
    }

    /// Whether 500 responses expose the underlying error message
    pub fn dev_mode(&self) -> bool {
        self.inner.dev_mode
    }
}
