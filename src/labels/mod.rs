//! Label suggestion and synchronization.
//!
//! - [`LabelClient`] asks a [`CompletionProvider`](crate::traits::CompletionProvider)
//!   for labels and folds every failure into [`Suggestion::NoLabels`].
//! - [`policy::decide`] chooses which labels to persist on create/update.
//! - [`OpenAiProvider`] is the production provider.

pub mod client;
pub mod openai;
pub mod policy;

pub use client::LabelClient;
pub use openai::OpenAiProvider;
pub use policy::{decide, LabelsField, TextChange};

/// Separator between tokens in a stored label string.
pub const LABEL_SEPARATOR: &str = ", ";

/// Outcome of asking for label suggestions.
///
/// There is intentionally no error variant: provider failures are reported
/// as `NoLabels`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Suggestion {
    /// Normalized, non-empty label string.
    Labels(String),
    /// No labels are available.
    NoLabels,
}

impl Suggestion {
    /// Convert into the label value, if any.
    #[must_use]
    pub fn into_labels(self) -> Option<String> {
        match self {
            Self::Labels(labels) => Some(labels),
            Self::NoLabels => None,
        }
    }
}

/// Normalize a comma-separated label list.
///
/// Tokens are trimmed, empty tokens dropped, the rest lowercased and joined
/// with `", "`. Returns `None` when no tokens remain.
#[must_use]
pub fn normalize_labels(raw: &str) -> Option<String> {
    let tokens: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
        .collect();

    if tokens.is_empty() {
        None
    } else {
        Some(tokens.join(LABEL_SEPARATOR))
    }
}

/// Interpret raw model output as a suggestion.
///
/// The literal word `none` (any case, surrounding whitespace ignored) means
/// the model found no applicable labels.
#[must_use]
pub fn parse_suggestion(raw: &str) -> Suggestion {
    if raw.trim().eq_ignore_ascii_case("none") {
        return Suggestion::NoLabels;
    }
    normalize_labels(raw).map_or(Suggestion::NoLabels, Suggestion::Labels)
}
