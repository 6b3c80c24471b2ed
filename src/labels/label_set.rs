use std::path::Path;

use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum LabelError {
    #[error("could not read label file: {0}")]
    Io(#[from] std::io::Error),
    #[error("label file is not a JSON array of strings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("label file is empty")]
    Empty,
}

/// Ordered class names, index-aligned with the classifier output.
///
/// Loaded once per session and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelSet {
    labels: Vec<String>,
}

impl LabelSet {
    pub fn new(labels: Vec<String>) -> LabelSet {
        LabelSet { labels }
    }

    /// `"Class 0"`, `"Class 1"`, ... for `count` classes.
    pub fn placeholders(count: usize) -> LabelSet {
        LabelSet { labels: (0..count).map(|i| format!("Class {}", i)).collect() }
    }

    /// Reads a JSON array of strings, e.g. `["Healthy", "Cordana"]`.
    pub fn load_json(path: impl AsRef<Path>) -> Result<LabelSet, LabelError> {
        let file = std::fs::File::open(path)?;
        let labels: Vec<String> = serde_json::from_reader(std::io::BufReader::new(file))?;
        if labels.is_empty() {
            return Err(LabelError::Empty);
        }
        Ok(LabelSet { labels })
    }

    /// Picks the first usable label source: the label file, then the labels
    /// embedded in the model, then placeholders for `class_count` classes.
    pub fn resolve(
        path: Option<&Path>,
        model_labels: Option<&[String]>,
        class_count: usize,
    ) -> LabelSet {
        if let Some(path) = path {
            match LabelSet::load_json(path) {
                Ok(set) => return set,
                Err(e) => debug!(path = %path.display(), error = %e, "label file unavailable"),
            }
        }
        match model_labels {
            Some(labels) if !labels.is_empty() => LabelSet::new(labels.to_vec()),
            _ => LabelSet::placeholders(class_count),
        }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.labels
    }
}
