use crate::assemble::{LayoutError, StoreError, WriteError};
use crate::resolver::ResolveError;
use thiserror::Error;

/// Top-level error type for the conflux library.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("resolution error: {0}")]
    Resolve(#[from] ResolveError),

    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),

    #[error("fragment store error: {0}")]
    Store(#[from] StoreError),

    #[error("artifact write error: {0}")]
    Write(#[from] WriteError),
}
