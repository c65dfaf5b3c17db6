//! Dependency extraction from raw group fragment lists.

use std::collections::HashMap;

/// One entry of a group's fragment list, classified exactly once when the
/// dependency graph is built.
///
/// A leading `$` marks a reference to another group's assembled artifact;
/// anything else is a concrete fragment path. No other marker syntax exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FragmentRef {
    Path(String),
    Group(String),
}

impl FragmentRef {
    pub fn parse(raw: &str) -> Self {
        match raw.strip_prefix('$') {
            // A bare "$" names no group; keep it as a literal path.
            Some(name) if !name.is_empty() => Self::Group(name.to_string()),
            _ => Self::Path(raw.to_string()),
        }
    }

    /// The referenced group name, if this is a group reference.
    pub fn group(&self) -> Option<&str> {
        match self {
            Self::Group(name) => Some(name),
            Self::Path(_) => None,
        }
    }
}

/// Insertion-ordered mapping from group name to its raw fragment list.
///
/// Iteration follows first-seen key order. Inserting an existing key appends
/// to that group's list, so several packages can contribute fragments to one
/// group while list order stays meaningful for downstream merging.
#[derive(Debug, Default, Clone)]
pub struct GroupMap {
    names: Vec<String>,
    lists: HashMap<String, Vec<String>>,
}

impl GroupMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `refs` to `name`'s fragment list, registering the group on
    /// first use.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        refs: impl IntoIterator<Item = impl Into<String>>,
    ) {
        let name = name.into();
        if !self.lists.contains_key(&name) {
            self.names.push(name.clone());
        }
        self.lists
            .entry(name)
            .or_default()
            .extend(refs.into_iter().map(Into::into));
    }

    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.lists.get(name).map(Vec::as_slice)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lists.contains_key(name)
    }

    /// Group names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// `(name, fragment list)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.names
            .iter()
            .map(|name| (name.as_str(), self.lists[name].as_slice()))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<N, L, R> FromIterator<(N, L)> for GroupMap
where
    N: Into<String>,
    L: IntoIterator<Item = R>,
    R: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (N, L)>>(iter: T) -> Self {
        let mut map = Self::new();
        for (name, refs) in iter {
            map.insert(name, refs);
        }
        map
    }
}

/// Adjacency data derived from one [`GroupMap`]: each group's classified
/// fragment list plus the set of groups it references.
#[derive(Debug)]
pub struct DependencyGraph {
    names: Vec<String>,
    lists: HashMap<String, Vec<FragmentRef>>,
    deps: HashMap<String, Vec<String>>,
}

impl DependencyGraph {
    /// Classifies every fragment reference and collects per-group dependency
    /// targets. Duplicates collapse; first-reference order is kept so the
    /// resolution walk never observes hash order.
    ///
    /// Building never fails. Unknown targets are reported by the walk, which
    /// has the referencing group and the active path for context.
    pub fn build(groups: &GroupMap) -> Self {
        let mut names = Vec::with_capacity(groups.len());
        let mut lists = HashMap::with_capacity(groups.len());
        let mut deps: HashMap<String, Vec<String>> = HashMap::new();

        for (name, refs) in groups.iter() {
            let classified: Vec<FragmentRef> =
                refs.iter().map(|raw| FragmentRef::parse(raw)).collect();

            for target in classified.iter().filter_map(FragmentRef::group) {
                let targets = deps.entry(name.to_string()).or_default();
                if !targets.iter().any(|t| t == target) {
                    targets.push(target.to_string());
                }
            }

            names.push(name.to_string());
            lists.insert(name.to_string(), classified);
        }

        Self { names, lists, deps }
    }

    /// Group names in input order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lists.contains_key(name)
    }

    /// Dependency targets of `name`, deduplicated, in first-reference order.
    pub fn deps_of(&self, name: &str) -> &[String] {
        self.deps.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Classified fragment list of `name`.
    pub fn list_of(&self, name: &str) -> &[FragmentRef] {
        self.lists.get(name).map(Vec::as_slice).unwrap_or(&[])
    }
}
