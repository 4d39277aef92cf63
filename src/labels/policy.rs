//! Label synchronization policy.
//!
//! Decides which labels to persist when a task is created or updated. The
//! rules are evaluated in order and the first match wins:
//!
//! | text changed | suggestion     | caller labels   | result            |
//! |--------------|----------------|-----------------|-------------------|
//! | yes          | labels         | any             | suggestion        |
//! | yes          | none           | explicit `null` | no labels         |
//! | yes          | none           | string          | caller's labels   |
//! | yes          | none           | absent          | previous labels   |
//! | no           | not requested  | string          | caller's labels   |
//! | no           | not requested  | absent / `null` | previous labels   |

use super::{normalize_labels, Suggestion};
use serde::{Deserialize, Deserializer};

/// What the caller said about labels in an update request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LabelsField {
    /// The request did not mention labels.
    #[default]
    Unspecified,
    /// The request set labels to `null`.
    Cleared,
    /// The request supplied a label string.
    Set(String),
}

impl LabelsField {
    /// Deserialize a present `labels` member; pair with `#[serde(default)]`
    /// so that a missing member becomes [`LabelsField::Unspecified`].
    ///
    /// # Errors
    ///
    /// Returns an error if the value is neither `null` nor a string.
    pub fn deserialize_present<'de, D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<String>::deserialize(deserializer)?.map_or(Self::Cleared, Self::Set))
    }
}

/// Whether the task text changed, carrying the suggestion if it did.
///
/// Suggestions are only requested for changed text, so `Unchanged` has no
/// suggestion to carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextChange {
    /// Title or description changed; labels were requested.
    Changed(Suggestion),
    /// Title and description are the same as before.
    Unchanged,
}

/// Choose the labels to persist.
///
/// `previous` is `None` on creation.
#[must_use]
pub fn decide(previous: Option<&str>, change: TextChange, caller: &LabelsField) -> Option<String> {
    match (change, caller) {
        (TextChange::Changed(Suggestion::Labels(suggested)), _) => Some(suggested),
        (TextChange::Changed(Suggestion::NoLabels), LabelsField::Cleared) => None,
        (TextChange::Changed(Suggestion::NoLabels), LabelsField::Set(labels))
        | (TextChange::Unchanged, LabelsField::Set(labels)) => normalize_labels(labels),
        (TextChange::Changed(Suggestion::NoLabels), LabelsField::Unspecified) => {
            previous.map(str::to_string)
        }
        (TextChange::Unchanged, LabelsField::Unspecified | LabelsField::Cleared) => {
            previous.map(str::to_string)
        }
    }
}
