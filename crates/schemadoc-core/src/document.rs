//! Document buffer and file boundary
//!
//! The rewriter works on a whole document held in memory; patterns may span
//! arbitrary distances, so there is no streaming form. `load` and `save` are
//! the only filesystem operations in the crate, each invoked at most once
//! per run by the binary.

use sha2::{Digest, Sha256};
use std::path::Path;

/// In-memory text of the target file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    text: String,
}

impl Document {
    /// Wrap existing text in a document buffer
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Read a document from disk; fails if unreadable or not valid UTF-8
    pub fn load(path: &Path) -> Result<Self, DocumentError> {
        let text = std::fs::read_to_string(path).map_err(|source| DocumentError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self { text })
    }

    /// Write the document to disk
    pub fn save(&self, path: &Path) -> Result<(), DocumentError> {
        std::fs::write(path, &self.text).map_err(|source| DocumentError::Write {
            path: path.display().to_string(),
            source,
        })
    }

    /// Borrow the document text
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Consume the buffer, returning the text
    pub fn into_inner(self) -> String {
        self.text
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Whether the document is empty
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// SHA-256 digest of the text, hex-encoded
    pub fn checksum(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.text.as_bytes());
        hex::encode(hasher.finalize())
    }
}

impl From<String> for Document {
    fn from(text: String) -> Self {
        Self { text }
    }
}

/// Failures at the file boundary
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
}
