//! Task management.
//!
//! This module provides:
//! - The [`Task`] model and request inputs
//! - A `SQLite`-backed [`TaskStore`]
//! - [`TaskService`], which keeps labels in sync on create and update
//!
//! # Example
//!
//! ```no_run
//! use labeled_todos::labels::LabelClient;
//! use labeled_todos::tasks::{NewTask, SqliteTaskStore, TaskService};
//!
//! # async fn demo() -> labeled_todos::error::Result<()> {
//! let store = SqliteTaskStore::new("/tmp/tasks.db")?;
//! let service = TaskService::new(store, LabelClient::disabled());
//!
//! let task = service
//!     .create(NewTask { title: "Groceries".into(), description: None, completed: false })
//!     .await?;
//! assert!(task.labels.is_none());
//! # Ok(())
//! # }
//! ```

pub mod models;
pub mod service;
pub mod store;

pub use models::{NewTask, Task, TaskChanges};
pub use service::TaskService;
pub use store::{SqliteTaskStore, TaskStore, TaskUpdate};
