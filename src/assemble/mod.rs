//! Assembly plumbing around the resolver core: fragment loading, artifact
//! layout and persistence, and per-run orchestration.

mod builder;
mod layout;
mod store;
mod writer;

pub use builder::{AssembledGroup, Assembler, Assembly};
pub use layout::{Layout, LayoutError, ARTIFACT_EXT, MANIFEST_FILE};
pub use store::{FragmentStore, FsStore, StoreError};
pub use writer::{ArtifactWriter, FsWriter, WriteError};
