//! Task model types.

use crate::labels::LabelsField;
use serde::{Deserialize, Serialize};

/// A task in the task list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier assigned by the store; never reused.
    pub id: i64,
    /// Short title describing the task.
    pub title: String,
    /// Optional longer description. `None` is distinct from an empty string.
    pub description: Option<String>,
    /// Whether the task is done.
    pub completed: bool,
    /// Normalized labels (`"work, urgent"`), if any.
    pub labels: Option<String>,
}

impl Task {
    /// Whether `title` or `description` differ from this task's text.
    #[must_use]
    pub fn text_differs(&self, title: &str, description: Option<&str>) -> bool {
        self.title != title || self.description.as_deref() != description
    }
}

/// Input for creating a task.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewTask {
    /// Task title.
    pub title: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// Completion flag, `false` when omitted.
    #[serde(default)]
    pub completed: bool,
}

/// Input for updating a task.
///
/// `title`, `description` and `completed` replace the stored values;
/// `labels` is resolved by the label policy.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TaskChanges {
    /// New title.
    pub title: String,
    /// New description; omitted means `None`.
    #[serde(default)]
    pub description: Option<String>,
    /// New completion flag, `false` when omitted.
    #[serde(default)]
    pub completed: bool,
    /// What the caller said about labels.
    #[serde(default, deserialize_with = "LabelsField::deserialize_present")]
    pub labels: LabelsField,
}
