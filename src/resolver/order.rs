//! Topological ordering of groups and rewriting of group references.

use std::collections::HashMap;

use super::error::{LocatorError, ResolveError};
use super::graph::{DependencyGraph, FragmentRef, GroupMap};

/// Capability consumed while rewriting: maps a group name to the locator of
/// its assembled artifact.
///
/// The resolver only asks for groups that are already placed in the
/// resolution order, so implementations may assume the referenced artifact
/// location is final by the time it is requested.
pub trait ArtifactLocator {
    fn artifact_locator(&self, group: &str) -> Result<String, LocatorError>;
}

impl<F> ArtifactLocator for F
where
    F: Fn(&str) -> Result<String, LocatorError>,
{
    fn artifact_locator(&self, group: &str) -> Result<String, LocatorError> {
        self(group)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VisitState {
    Unvisited,
    InProgress,
    Done,
}

/// Outcome of a successful resolution: a dependency-respecting total order
/// over the input groups, plus each group's fragment list with `$name`
/// references rewritten to artifact locators.
///
/// ## Example
///
/// ```
/// use conflux::resolver::{GroupMap, LocatorError, Resolution};
///
/// let groups = GroupMap::from_iter([
///     ("web", vec!["config/web.toml", "$params"]),
///     ("params", vec!["config/params.toml"]),
/// ]);
///
/// fn locator(name: &str) -> Result<String, LocatorError> {
///     Ok(format!("output/{name}.toml"))
/// }
/// let resolution = Resolution::resolve(&groups, &locator)?;
///
/// assert_eq!(resolution.order().to_vec(), ["params", "web"]);
/// assert_eq!(
///     resolution.groups().get("web").unwrap(),
///     ["config/web.toml", "output/params.toml"]
/// );
/// # Ok::<(), conflux::resolver::ResolveError>(())
/// ```
#[derive(Debug)]
pub struct Resolution {
    order: Vec<String>,
    groups: GroupMap,
}

impl Resolution {
    /// Orders `groups` so that every referenced group precedes its
    /// dependents, then rewrites group references through `locator`.
    ///
    /// The walk is driven in input key order, making the result reproducible
    /// for identical input order. Circular and unknown dependencies abort
    /// the whole run; no partial order escapes.
    pub fn resolve(
        groups: &GroupMap,
        locator: &dyn ArtifactLocator,
    ) -> Result<Self, ResolveError> {
        let graph = DependencyGraph::build(groups);
        let order = sort(&graph)?;
        let groups = rewrite(&order, &graph, locator)?;
        Ok(Self { order, groups })
    }

    /// Group names in processing order.
    pub fn order(&self) -> &[String] {
        &self.order
    }

    /// Rewritten fragment lists, iterable in processing order.
    pub fn groups(&self) -> &GroupMap {
        &self.groups
    }
}

fn sort(graph: &DependencyGraph) -> Result<Vec<String>, ResolveError> {
    let mut walk = Walk {
        graph,
        state: HashMap::new(),
        trail: Vec::new(),
        order: Vec::new(),
    };
    // Groups already placed through another group's walk are skipped, so the
    // driver is idempotent per name.
    for name in graph.names() {
        walk.visit(name)?;
    }
    Ok(walk.order)
}

struct Walk<'g> {
    graph: &'g DependencyGraph,
    state: HashMap<&'g str, VisitState>,
    /// Active DFS path, in entry order. Feeds cycle diagnostics.
    trail: Vec<&'g str>,
    order: Vec<String>,
}

impl<'g> Walk<'g> {
    fn visit(&mut self, name: &'g str) -> Result<(), ResolveError> {
        match self.state.get(name).copied().unwrap_or(VisitState::Unvisited) {
            VisitState::Done => return Ok(()),
            VisitState::InProgress => {
                return Err(ResolveError::Cycle {
                    group: name.to_string(),
                    chain: self.trail.iter().map(|s| s.to_string()).collect(),
                });
            }
            VisitState::Unvisited => {}
        }

        self.state.insert(name, VisitState::InProgress);
        self.trail.push(name);

        for dep in self.graph.deps_of(name) {
            if !self.graph.contains(dep) {
                return Err(ResolveError::UnknownDependency {
                    group: name.to_string(),
                    missing: dep.clone(),
                });
            }
            self.visit(dep)?;
        }

        self.trail.pop();
        self.state.insert(name, VisitState::Done);
        self.order.push(name.to_string());
        Ok(())
    }
}

/// Rewrites each group's fragment list in resolution order: plain fragments
/// pass through untouched, group references become the target's locator.
fn rewrite(
    order: &[String],
    graph: &DependencyGraph,
    locator: &dyn ArtifactLocator,
) -> Result<GroupMap, ResolveError> {
    let mut rewritten = GroupMap::new();

    for name in order {
        let list = graph.list_of(name);
        let mut resolved = Vec::with_capacity(list.len());
        for fragment in list {
            match fragment {
                FragmentRef::Path(path) => resolved.push(path.clone()),
                FragmentRef::Group(target) => {
                    let located = locator.artifact_locator(target).map_err(|source| {
                        ResolveError::Locator {
                            group: target.clone(),
                            source,
                        }
                    })?;
                    resolved.push(located);
                }
            }
        }
        rewritten.insert(name.clone(), resolved);
    }

    Ok(rewritten)
}
