//! Breed label catalog.
//!
//! Some classifier deployments return bare score arrays whose positions
//! refer to the model's label index. The catalog is that ordered label
//! list, loaded once at process start. It is static configuration data,
//! not logic: a JSON array of breed names, either from a file named by
//! `BLENS_BREED_LABELS` or the compiled-in default list.

use std::path::Path;

use thiserror::Error;

/// Environment variable naming a JSON label file.
pub const BREED_LABELS_ENV: &str = "BLENS_BREED_LABELS";

/// Compiled-in default label list.
const BUILTIN_LABELS: &str = include_str!("breeds.json");

/// Errors loading a label catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read label file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("label file is not a JSON string array: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("label catalog is empty")]
    Empty,
}

/// Ordered list of breed labels the classifier's index positions refer to.
#[derive(Debug, Clone)]
pub struct BreedCatalog {
    labels: Vec<String>,
}

impl BreedCatalog {
    /// Create from an ordered label list.
    pub fn new(labels: Vec<String>) -> Result<Self, CatalogError> {
        if labels.is_empty() {
            return Err(CatalogError::Empty);
        }
        Ok(Self { labels })
    }

    /// The compiled-in default catalog.
    pub fn builtin() -> Self {
        // The embedded list is validated by tests; parsing cannot fail.
        let labels: Vec<String> =
            serde_json::from_str(BUILTIN_LABELS).expect("embedded breed list is valid JSON");
        Self { labels }
    }

    /// Load from a JSON file containing a string array.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::new(serde_json::from_str(&raw)?)
    }

    /// Load from `BLENS_BREED_LABELS` if set, otherwise the built-in list.
    pub fn from_env() -> Result<Self, CatalogError> {
        match std::env::var(BREED_LABELS_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::from_json_file(path.trim()),
            _ => Ok(Self::builtin()),
        }
    }

    /// Label at a classifier index position.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    /// All labels in classifier index order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
