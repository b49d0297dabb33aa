use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Flat key/value style settings that apply to one file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConventionSnapshot {
    values: BTreeMap<String, String>,
}

impl ConventionSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Layer `other` on top of this snapshot; keys present in both take the
    /// value from `other`.
    pub fn merged_with(mut self, other: &ConventionSnapshot) -> Self {
        for (key, value) in &other.values {
            self.values.insert(key.clone(), value.clone());
        }
        self
    }
}

impl<K, V> FromIterator<(K, V)> for ConventionSnapshot
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        ConventionSnapshot {
            values: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }
}

/// Errors raised while loading conventions for a file.
#[derive(Debug, Error)]
pub enum ConventionError {
    #[error("failed to read conventions from {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("invalid section pattern '{pattern}' in {path}: {message}")]
    Pattern {
        path: PathBuf,
        pattern: String,
        message: String,
    },
}

/// Source of per-file style conventions, such as `.editorconfig` lookup.
pub trait ConventionProvider: Send + Sync {
    fn load(&self, path: &Path) -> Result<ConventionSnapshot, ConventionError>;
}

/// Provider that never supplies overrides.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoConventions;

impl ConventionProvider for NoConventions {
    fn load(&self, _path: &Path) -> Result<ConventionSnapshot, ConventionError> {
        Ok(ConventionSnapshot::new())
    }
}

/// Provider returning the same snapshot for every file.
#[derive(Clone, Debug, Default)]
pub struct FixedConventions(pub ConventionSnapshot);

impl ConventionProvider for FixedConventions {
    fn load(&self, _path: &Path) -> Result<ConventionSnapshot, ConventionError> {
        Ok(self.0.clone())
    }
}
