use std::collections::HashMap;

use crate::error::Error;
use crate::resolver::{GroupMap, Resolution};

use super::layout::Layout;
use super::store::{FragmentStore, FsStore};
use super::writer::{ArtifactWriter, FsWriter};

/// Build record of one assembled group.
#[derive(Debug, Clone)]
pub struct AssembledGroup {
    name: String,
    sources: Vec<String>,
    locator: String,
}

impl AssembledGroup {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resolved source locations, in merge order. Group references have
    /// already been rewritten to artifact locators.
    pub fn sources(&self) -> &[String] {
        &self.sources
    }

    /// Where the assembled artifact was written.
    pub fn locator(&self) -> &str {
        &self.locator
    }
}

/// Outcome of a full assembly run.
#[derive(Debug)]
pub struct Assembly {
    order: Vec<String>,
    groups: HashMap<String, AssembledGroup>,
}

impl Assembly {
    /// Build order; every dependency precedes its dependents.
    pub fn order(&self) -> &[String] {
        &self.order
    }

    pub fn group(&self, name: &str) -> Option<&AssembledGroup> {
        self.groups.get(name)
    }

    /// Assembled groups, in build order.
    pub fn iter(&self) -> impl Iterator<Item = &AssembledGroup> {
        self.order.iter().map(|name| &self.groups[name])
    }
}

/// Drives one assembly run: resolves the processing order, then builds each
/// group's artifact from its rewritten fragment list.
///
/// Fragment payloads are opaque text; the assembler joins them in list order
/// and leaves any interpretation to whatever consumes the artifact.
///
/// ## Example
///
/// ```no_run
/// use conflux::{Assembler, GroupMap, Layout};
///
/// let layout = Layout::new(".", None)?;
/// let assembler = Assembler::from_layout(layout);
///
/// let groups = GroupMap::from_iter([
///     ("params", vec!["config/params.toml"]),
///     ("web", vec!["$params", "config/web.toml"]),
/// ]);
///
/// let assembly = assembler.assemble(&groups)?;
/// for group in assembly.iter() {
///     println!("{} -> {}", group.name(), group.locator());
/// }
/// # Ok::<(), conflux::Error>(())
/// ```
#[derive(Debug)]
pub struct Assembler<S, W> {
    layout: Layout,
    store: S,
    writer: W,
}

impl Assembler<FsStore, FsWriter> {
    /// Filesystem-backed assembler: fragments load relative to the layout's
    /// base dir, artifacts land in its output dir.
    pub fn from_layout(layout: Layout) -> Self {
        let store = FsStore::new(layout.base_dir());
        let writer = FsWriter::new(layout.clone());
        Self {
            layout,
            store,
            writer,
        }
    }
}

impl<S: FragmentStore, W: ArtifactWriter> Assembler<S, W> {
    pub fn new(layout: Layout, store: S, writer: W) -> Self {
        Self {
            layout,
            store,
            writer,
        }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Runs one assembly over `groups`.
    ///
    /// Groups are processed in resolution order, so by the time a fragment
    /// list names another group's artifact, that artifact has already been
    /// written. Any failure aborts the run with the first error; artifacts
    /// written before the failure may remain on disk.
    pub fn assemble(&self, groups: &GroupMap) -> Result<Assembly, Error> {
        let resolution = Resolution::resolve(groups, &self.layout)?;
        let mut built = HashMap::with_capacity(resolution.order().len());

        for (name, sources) in resolution.groups().iter() {
            let payload = self.join_payloads(sources)?;
            let locator = self.writer.write(name, &payload)?;
            tracing::debug!(group = name, locator = %locator, "Assembled group");

            built.insert(
                name.to_string(),
                AssembledGroup {
                    name: name.to_string(),
                    sources: sources.to_vec(),
                    locator,
                },
            );
        }

        Ok(Assembly {
            order: resolution.order().to_vec(),
            groups: built,
        })
    }

    fn join_payloads(&self, sources: &[String]) -> Result<String, Error> {
        let mut payload = String::new();
        for source in sources {
            let contents = self.store.load(source)?;
            if !payload.is_empty() {
                payload.push('\n');
            }
            payload.push_str(contents.trim_end());
            payload.push('\n');
        }
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::ResolveError;
    use crate::assemble::store::StoreError;
    use std::fs;
    use tempfile::tempdir;

    fn order_of(assembly: &Assembly) -> Vec<&str> {
        assembly.order().iter().map(String::as_str).collect()
    }

    #[test]
    fn assembles_groups_in_dependency_order() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("params.toml"), "key = \"value\"\n").unwrap();
        fs::write(dir.path().join("web.toml"), "route = \"/\"\n").unwrap();

        let layout = Layout::new(dir.path(), None).unwrap();
        let assembler = Assembler::from_layout(layout);

        let groups = GroupMap::from_iter([
            ("web", vec!["$params", "web.toml"]),
            ("params", vec!["params.toml"]),
        ]);

        let assembly = assembler.assemble(&groups).unwrap();
        assert_eq!(order_of(&assembly), ["params", "web"]);

        // The web artifact starts with the params artifact's contents.
        let web = assembly.group("web").unwrap();
        let contents = fs::read_to_string(web.locator()).unwrap();
        assert!(contents.starts_with("key = \"value\""));
        assert!(contents.contains("route = \"/\""));
    }

    #[test]
    fn rewritten_sources_point_at_artifacts() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("params.toml"), "key = 1\n").unwrap();

        let layout = Layout::new(dir.path(), None).unwrap();
        let expected = layout.locator("params").unwrap();
        let assembler = Assembler::from_layout(layout);

        let groups = GroupMap::from_iter([
            ("web", vec!["$params"]),
            ("params", vec!["params.toml"]),
        ]);

        let assembly = assembler.assemble(&groups).unwrap();
        assert_eq!(assembly.group("web").unwrap().sources(), [expected]);
    }

    #[test]
    fn iterates_groups_in_build_order() {
        let dir = tempdir().unwrap();
        for name in ["a.toml", "b.toml", "c.toml"] {
            fs::write(dir.path().join(name), "x = 1\n").unwrap();
        }

        let layout = Layout::new(dir.path(), None).unwrap();
        let assembler = Assembler::from_layout(layout);

        let groups = GroupMap::from_iter([
            ("a", vec!["$b", "a.toml"]),
            ("b", vec!["$c", "b.toml"]),
            ("c", vec!["c.toml"]),
        ]);

        let assembly = assembler.assemble(&groups).unwrap();
        let names: Vec<&str> = assembly.iter().map(AssembledGroup::name).collect();
        assert_eq!(names, ["c", "b", "a"]);
    }

    #[test]
    fn unknown_group_reference_aborts_the_run() {
        let dir = tempdir().unwrap();
        let layout = Layout::new(dir.path(), None).unwrap();
        let assembler = Assembler::from_layout(layout);

        let groups = GroupMap::from_iter([("web", vec!["$missing"])]);

        match assembler.assemble(&groups) {
            Err(Error::Resolve(ResolveError::UnknownDependency { group, missing })) => {
                assert_eq!(group, "web");
                assert_eq!(missing, "missing");
            }
            other => panic!("expected unknown dependency error, got {other:?}"),
        }
        // Nothing was written.
        assert!(!dir.path().join("assembly-output").exists());
    }

    #[test]
    fn missing_fragment_aborts_the_run() {
        let dir = tempdir().unwrap();
        let layout = Layout::new(dir.path(), None).unwrap();
        let assembler = Assembler::from_layout(layout);

        let groups = GroupMap::from_iter([("web", vec!["absent.toml"])]);

        match assembler.assemble(&groups) {
            Err(Error::Store(StoreError::FragmentNotFound(_))) => {}
            other => panic!("expected missing fragment error, got {other:?}"),
        }
    }
}
