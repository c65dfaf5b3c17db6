use thiserror::Error;

/// Failure surfaced by an [`ArtifactLocator`](super::ArtifactLocator)
/// implementation, propagated through resolution untouched.
pub type LocatorError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ResolveError {
    #[error("circular dependency between config groups: {}", cycle_trace(.chain, .group))]
    Cycle {
        /// The group that was re-entered while still on the active path.
        group: String,
        /// Groups on the active path, in the order they were entered.
        chain: Vec<String>,
    },

    #[error("group '{group}' references unknown group '{missing}'")]
    UnknownDependency { group: String, missing: String },

    #[error("failed to locate artifact for group '{group}': {source}")]
    Locator {
        group: String,
        #[source]
        source: LocatorError,
    },
}

fn cycle_trace(chain: &[String], group: &str) -> String {
    let mut trace = chain.join(" -> ");
    if !trace.is_empty() {
        trace.push_str(" -> ");
    }
    trace.push_str(group);
    trace
}
