//! Task operations with label synchronization.

use crate::error::{Error, Result};
use crate::labels::{decide, LabelClient, LabelsField, TextChange};
use crate::tasks::models::{NewTask, Task, TaskChanges};
use crate::tasks::store::{TaskStore, TaskUpdate};

/// Combines a [`TaskStore`] with a [`LabelClient`].
///
/// Store calls are blocking and run on the blocking thread pool, so a slow
/// disk or label request never stalls other requests.
#[derive(Debug, Clone)]
pub struct TaskService<S> {
    store: S,
    labels: LabelClient,
}

impl<S> TaskService<S>
where
    S: TaskStore + Clone + Send + Sync + 'static,
{
    /// Create a service over a store and label client.
    pub const fn new(store: S, labels: LabelClient) -> Self {
        Self { store, labels }
    }

    /// The underlying store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Whether label suggestions are enabled.
    pub fn labeling_enabled(&self) -> bool {
        self.labels.is_configured()
    }

    /// Run a blocking store operation on the blocking thread pool.
    async fn with_store<T, F>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&S) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = self.store.clone();
        tokio::task::spawn_blocking(move || op(&store))
            .await
            .map_err(|e| Error::Blocking(e.to_string()))?
    }

    /// Create a task and label it.
    ///
    /// The task is stored before labels are requested, so a failed
    /// suggestion still leaves a persisted task without labels, and other
    /// requests see the task while the suggestion is pending. If the task is
    /// deleted in the meantime, the inserted task is returned as it was.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub async fn create(&self, new: NewTask) -> Result<Task> {
        let NewTask { title, description, completed } = new;
        let task = self
            .with_store(move |store| store.create_task(&title, description.as_deref(), completed))
            .await?;

        let suggestion = self.labels.suggest(&task.title, task.description.as_deref()).await;
        let labels = decide(None, TextChange::Changed(suggestion), &LabelsField::Unspecified);
        if labels.is_none() {
            return Ok(task);
        }

        let id = task.id;
        let labelled =
            self.with_store(move |store| store.set_labels(id, labels.as_deref())).await?;
        // A concurrent delete can remove the row between the two writes.
        Ok(labelled.unwrap_or_else(|| {
            tracing::debug!(id, "task deleted before its labels were stored");
            task
        }))
    }

    /// List every task.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub async fn list(&self) -> Result<Vec<Task>> {
        self.with_store(|store| store.list_tasks()).await
    }

    /// Fetch a task.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TaskNotFound`] if no task has this id, or an error
    /// if the store fails.
    pub async fn get(&self, id: i64) -> Result<Task> {
        self.with_store(move |store| store.get_task(id)).await?.ok_or(Error::TaskNotFound(id))
    }

    /// Replace a task's fields, resolving labels with the label policy.
    ///
    /// Labels are only requested when the title or description changed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TaskNotFound`] if no task has this id, or an error
    /// if the store fails.
    pub async fn update(&self, id: i64, changes: TaskChanges) -> Result<Task> {
        let current = self.get(id).await?;

        let change = if current.text_differs(&changes.title, changes.description.as_deref()) {
            TextChange::Changed(
                self.labels.suggest(&changes.title, changes.description.as_deref()).await,
            )
        } else {
            TextChange::Unchanged
        };
        let labels = decide(current.labels.as_deref(), change, &changes.labels);

        let update = TaskUpdate {
            title: changes.title,
            description: changes.description,
            completed: changes.completed,
            labels,
        };
        self.with_store(move |store| store.update_task(id, &update))
            .await?
            .ok_or(Error::TaskNotFound(id))
    }

    /// Delete a task.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TaskNotFound`] if no task has this id, or an error
    /// if the store fails.
    pub async fn delete(&self, id: i64) -> Result<()> {
        if self.with_store(move |store| store.delete_task(id)).await? {
            Ok(())
        } else {
            Err(Error::TaskNotFound(id))
        }
    }
}
