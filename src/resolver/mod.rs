//! Group dependency resolution.
//!
//! Orders configuration groups so that any group referenced through a
//! `$name` fragment is assembled before its dependents, and rewrites those
//! references to the referenced group's artifact locator.

mod error;
mod graph;
mod order;

pub use error::{LocatorError, ResolveError};
pub use graph::{DependencyGraph, FragmentRef, GroupMap};
pub use order::{ArtifactLocator, Resolution};
