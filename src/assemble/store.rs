//! Fragment loading.

use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StoreError {
    #[error("fragment not found: {0}")]
    FragmentNotFound(PathBuf),

    #[error("failed to read fragment '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Source of raw fragment content.
///
/// Locators handed to `load` are either concrete fragment paths or artifact
/// locators produced by an earlier group in the same run; both load the same
/// way. The store never interprets the content it returns.
pub trait FragmentStore {
    fn load(&self, locator: &str) -> Result<String, StoreError>;
}

/// Filesystem-backed store resolving relative locators against a base dir.
#[derive(Debug, Clone)]
pub struct FsStore {
    base_dir: PathBuf,
}

impl FsStore {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    fn resolve(&self, locator: &str) -> PathBuf {
        let path = Path::new(locator);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }
}

impl FragmentStore for FsStore {
    fn load(&self, locator: &str) -> Result<String, StoreError> {
        let path = self.resolve(locator);
        match std::fs::read_to_string(&path) {
            Ok(contents) => {
                tracing::trace!(locator, "Loaded fragment");
                Ok(contents)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StoreError::FragmentNotFound(path))
            }
            Err(source) => Err(StoreError::Read { path, source }),
        }
    }
}
