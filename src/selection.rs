//! Checkbox state transitions for the directory selector.
//!
//! A directory only renders when every ancestor up to the root renders too,
//! so checking a directory checks its ancestors and unchecking one unchecks
//! its descendants.

use crate::domain::InclusionSet;
use crate::error::TreeError;
use crate::infra::DirectoryLister;
use crate::tree::build_selector;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// The root and every directory below it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryIndex {
    root: PathBuf,
    dirs: BTreeSet<PathBuf>,
}

impl DirectoryIndex {
    pub fn new(root: PathBuf, dirs: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            root,
            dirs: dirs.into_iter().collect(),
        }
    }

    pub fn scan(lister: &dyn DirectoryLister, root: &Path) -> Result<Self, TreeError> {
        let selector = build_selector(lister, root, &InclusionSet::new())?;
        Ok(Self::new(
            root.to_path_buf(),
            selector.directories().map(Path::to_path_buf),
        ))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.dirs.contains(path)
    }

    pub fn len(&self) -> usize {
        self.dirs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }

    /// Drops entries for directories that no longer exist.
    pub fn retain_known(&self, inclusion: &InclusionSet) -> InclusionSet {
        inclusion
            .iter()
            .filter(|path| self.contains(path))
            .cloned()
            .collect()
    }
}

/// Checking `path` also checks its ancestors below the root. Unchecking
/// drops `path` and every directory under it, compared by path components,
/// so unchecking `/r/a` keeps `/r/ab`.
pub fn toggle(
    index: &DirectoryIndex,
    inclusion: &InclusionSet,
    path: &Path,
    checked: bool,
) -> InclusionSet {
    let mut next = inclusion.clone();
    if !index.contains(path) {
        tracing::debug!(path = %path.display(), "ignoring toggle for unknown directory");
        return next;
    }

    if checked {
        next.insert(path.to_path_buf());
        let mut current = path.parent();
        while let Some(ancestor) = current {
            if ancestor == index.root() || !ancestor.starts_with(index.root()) {
                break;
            }
            next.insert(ancestor.to_path_buf());
            current = ancestor.parent();
        }
    } else {
        next.retain(|included| !included.starts_with(path));
    }

    next
}

pub fn select_all(index: &DirectoryIndex) -> InclusionSet {
    index.dirs.clone()
}

pub fn unselect_all() -> InclusionSet {
    InclusionSet::new()
}
