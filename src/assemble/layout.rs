//! Artifact layout: where assembled group artifacts live on disk.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::resolver::{ArtifactLocator, LocatorError};

/// Optional per-project manifest consulted for layout settings.
pub const MANIFEST_FILE: &str = "assembly.toml";

/// Extension given to assembled artifacts.
pub const ARTIFACT_EXT: &str = "toml";

const OUTPUT_DIR_DEFAULT: &str = "assembly-output";

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LayoutError {
    #[error("empty artifact file name")]
    EmptyFileName,

    #[error("failed to read manifest '{path}': {source}")]
    ManifestRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse manifest '{path}': {source}")]
    ManifestParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("artifact path for group '{0}' is not valid UTF-8")]
    NonUtf8Path(String),
}

#[derive(Debug, Default, Deserialize)]
struct Manifest {
    #[serde(default)]
    assembly: AssemblySection,
}

#[derive(Debug, Default, Deserialize)]
struct AssemblySection {
    #[serde(rename = "output-dir")]
    output_dir: Option<String>,
}

/// Directory layout of one assembly run: the project base dir plus the
/// output dir assembled artifacts are written to.
///
/// The artifact path of a group is stable for a given layout, which is what
/// lets the resolver hand out locators for groups before their dependents
/// are processed.
#[derive(Debug, Clone)]
pub struct Layout {
    base_dir: PathBuf,
    output_dir: PathBuf,
}

impl Layout {
    /// Creates a layout rooted at `base_dir`.
    ///
    /// An explicit `output_dir` is absolutized against the base dir. Without
    /// one, the manifest's `[assembly] output-dir` is consulted, falling
    /// back to `<base>/assembly-output`.
    pub fn new(base_dir: impl AsRef<Path>, output_dir: Option<&str>) -> Result<Self, LayoutError> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let output_dir = match output_dir {
            Some(dir) => abs_path(&base_dir, dir)?,
            None => find_output_dir(&base_dir)?,
        };
        Ok(Self {
            base_dir,
            output_dir,
        })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Full path of the assembled artifact for `group`.
    pub fn artifact_path(&self, group: &str) -> Result<PathBuf, LayoutError> {
        if group.is_empty() {
            return Err(LayoutError::EmptyFileName);
        }
        Ok(self.output_dir.join(format!("{group}.{ARTIFACT_EXT}")))
    }

    /// Locator string for a group's artifact: its path, as UTF-8.
    pub fn locator(&self, group: &str) -> Result<String, LayoutError> {
        self.artifact_path(group)?
            .into_os_string()
            .into_string()
            .map_err(|_| LayoutError::NonUtf8Path(group.to_string()))
    }
}

impl ArtifactLocator for Layout {
    fn artifact_locator(&self, group: &str) -> Result<String, LocatorError> {
        self.locator(group).map_err(Into::into)
    }
}

/// Absolutizes `file` against `dir`: absolute paths pass through, relative
/// ones are joined onto `dir`. An empty name is refused.
fn abs_path(dir: &Path, file: &str) -> Result<PathBuf, LayoutError> {
    if file.is_empty() {
        return Err(LayoutError::EmptyFileName);
    }
    let file = Path::new(file);
    if file.is_absolute() {
        Ok(file.to_path_buf())
    } else {
        Ok(dir.join(file))
    }
}

fn find_output_dir(base_dir: &Path) -> Result<PathBuf, LayoutError> {
    let path = base_dir.join(MANIFEST_FILE);
    let manifest = match std::fs::read_to_string(&path) {
        Ok(contents) => toml::from_str::<Manifest>(&contents)
            .map_err(|source| LayoutError::ManifestParse { path, source })?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Manifest::default(),
        Err(source) => return Err(LayoutError::ManifestRead { path, source }),
    };

    match manifest.assembly.output_dir {
        Some(dir) => abs_path(base_dir, &dir),
        None => Ok(base_dir.join(OUTPUT_DIR_DEFAULT)),
    }
}
