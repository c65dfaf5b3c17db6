use std::path::{Path, PathBuf};

use thiserror::Error;

use super::layout::{Layout, LayoutError};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WriteError {
    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error("failed to create output dir '{path}': {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write artifact '{path}': {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Persists one group's assembled payload and returns its locator.
///
/// Called once per group, in resolution order, so a locator handed out
/// earlier by the layout always points at an artifact that exists by the
/// time a later group loads it.
pub trait ArtifactWriter {
    fn write(&self, group: &str, payload: &str) -> Result<String, WriteError>;
}

/// Writes artifacts under the layout's output directory as `<group>.toml`.
#[derive(Debug, Clone)]
pub struct FsWriter {
    layout: Layout,
}

impl FsWriter {
    pub fn new(layout: Layout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }
}

impl ArtifactWriter for FsWriter {
    fn write(&self, group: &str, payload: &str) -> Result<String, WriteError> {
        let locator = self.layout.locator(group)?;
        let path = Path::new(&locator);

        let dir = self.layout.output_dir();
        std::fs::create_dir_all(dir).map_err(|source| WriteError::CreateDir {
            path: dir.to_path_buf(),
            source,
        })?;
        std::fs::write(path, payload).map_err(|source| WriteError::Write {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::debug!(group, locator = %locator, "Wrote artifact");
        Ok(locator)
    }
}
