//! Recursive directory walks producing the colorized tree and the
//! checkbox selector.

use crate::classify::{classify, color_for};
use crate::domain::{
    ColorPalette, DirectoryEntry, EntryKind, FileCategory, HexColor, InclusionSet, Session,
};
use crate::error::TreeError;
use crate::exclusion::{ExclusionSet, HiddenNames};
use crate::infra::DirectoryLister;
use crate::selection::DirectoryIndex;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

pub const TEE: &str = " ┣ ";
pub const CORNER: &str = " ┗ ";
pub const PIPE: &str = " ┃ ";
pub const BLANK: &str = "   ";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeLine {
    pub prefix: String,
    pub glyph: &'static str,
    pub name: String,
    pub path: PathBuf,
    pub kind: EntryKind,
    pub category: Option<FileCategory>,
    pub color: Option<HexColor>,
}

impl fmt::Display for TreeLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.prefix, self.glyph, self.name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedTree {
    pub lines: Vec<TreeLine>,
}

impl RenderedTree {
    pub fn text(&self) -> String {
        lines_to_text(&self.lines)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorLine {
    pub prefix: String,
    pub glyph: &'static str,
    pub name: String,
    pub path: PathBuf,
    pub checked: bool,
}

impl fmt::Display for SelectorLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = if self.checked { "[x]" } else { "[ ]" };
        write!(f, "{}{}{} {}", self.prefix, self.glyph, mark, self.name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectorTree {
    pub lines: Vec<SelectorLine>,
}

impl SelectorTree {
    #[cfg(test)]
    pub fn text(&self) -> String {
        lines_to_text(&self.lines)
    }

    pub fn directories(&self) -> impl Iterator<Item = &Path> {
        self.lines.iter().map(|line| line.path.as_path())
    }
}

fn lines_to_text<T: fmt::Display>(lines: &[T]) -> String {
    let mut out = String::new();
    for line in lines {
        out.push_str(&line.to_string());
        out.push('\n');
    }
    out
}

/// Both trees plus the directory index they were built from.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub tree: RenderedTree,
    pub selector: SelectorTree,
    pub directories: DirectoryIndex,
}

struct TreeWalk<'a> {
    lister: &'a dyn DirectoryLister,
    inclusion: &'a InclusionSet,
    exclusion: &'a ExclusionSet,
    hidden: &'a HiddenNames,
    palette: &'a ColorPalette,
}

impl TreeWalk<'_> {
    fn run(&self, root: &Path) -> Result<RenderedTree, TreeError> {
        let mut lines = Vec::new();
        self.walk(root, "", &mut lines)?;
        Ok(RenderedTree { lines })
    }

    fn walk(&self, dir: &Path, prefix: &str, out: &mut Vec<TreeLine>) -> Result<(), TreeError> {
        let entries: Vec<DirectoryEntry> = list_children(self.lister, dir)?
            .into_iter()
            .filter(|entry| {
                !self.hidden.contains(&entry.name) && !self.exclusion.matches(&entry.name)
            })
            .collect();
        let entries = sort_entries(entries);
        let count = entries.len();

        for (idx, entry) in entries.into_iter().enumerate() {
            let is_last = idx + 1 == count;
            let (glyph, child_prefix) = branch(prefix, is_last);

            if entry.is_dir() {
                if !self.inclusion.contains(&entry.path) {
                    continue;
                }
                out.push(TreeLine {
                    prefix: prefix.to_string(),
                    glyph,
                    name: entry.name,
                    path: entry.path.clone(),
                    kind: EntryKind::Directory,
                    category: None,
                    color: None,
                });
                self.walk(&entry.path, &child_prefix, out)?;
            } else {
                let category = classify(&entry.name);
                let color = color_for(&entry.name, self.palette);
                out.push(TreeLine {
                    prefix: prefix.to_string(),
                    glyph,
                    name: entry.name,
                    path: entry.path,
                    kind: EntryKind::File,
                    category: Some(category),
                    color: Some(color),
                });
            }
        }

        Ok(())
    }
}

/// Renders every visible entry below `root`. Directories outside
/// `inclusion` are dropped together with their whole subtree; files are
/// only ever hidden by `exclusion`.
pub fn build_tree(
    lister: &dyn DirectoryLister,
    root: &Path,
    inclusion: &InclusionSet,
    exclusion: &ExclusionSet,
    palette: &ColorPalette,
) -> Result<RenderedTree, TreeError> {
    let walk = TreeWalk {
        lister,
        inclusion,
        exclusion,
        hidden: &HiddenNames::default(),
        palette,
    };
    walk.run(root)
}

/// Lists every directory below `root`, checked when it is in `inclusion`.
/// Ignores exclusions and recurses into unchecked directories too.
pub fn build_selector(
    lister: &dyn DirectoryLister,
    root: &Path,
    inclusion: &InclusionSet,
) -> Result<SelectorTree, TreeError> {
    let mut lines = Vec::new();
    push_selector_lines(lister, root, "", inclusion, &mut lines)?;
    Ok(SelectorTree { lines })
}

fn push_selector_lines(
    lister: &dyn DirectoryLister,
    dir: &Path,
    prefix: &str,
    inclusion: &InclusionSet,
    out: &mut Vec<SelectorLine>,
) -> Result<(), TreeError> {
    let directories: Vec<DirectoryEntry> = list_children(lister, dir)?
        .into_iter()
        .filter(DirectoryEntry::is_dir)
        .collect();
    let directories = sort_entries(directories);
    let count = directories.len();

    for (idx, entry) in directories.into_iter().enumerate() {
        let (glyph, child_prefix) = branch(prefix, idx + 1 == count);
        out.push(SelectorLine {
            prefix: prefix.to_string(),
            glyph,
            name: entry.name,
            path: entry.path.clone(),
            checked: inclusion.contains(&entry.path),
        });
        push_selector_lines(lister, &entry.path, &child_prefix, inclusion, out)?;
    }

    Ok(())
}

/// Builds the selector and the tree for one session in a single pass.
/// Entries named exactly as in `hidden` are left out of the tree only.
pub fn render(
    lister: &dyn DirectoryLister,
    session: &Session,
    hidden: &HiddenNames,
) -> Result<Snapshot, TreeError> {
    let selector = build_selector(lister, &session.root, &session.inclusion)?;
    let tree = TreeWalk {
        lister,
        inclusion: &session.inclusion,
        exclusion: &session.exclusion,
        hidden,
        palette: &session.palette,
    }
    .run(&session.root)?;
    let directories = DirectoryIndex::new(
        session.root.clone(),
        selector.directories().map(Path::to_path_buf),
    );

    Ok(Snapshot {
        tree,
        selector,
        directories,
    })
}

fn list_children(
    lister: &dyn DirectoryLister,
    dir: &Path,
) -> Result<Vec<DirectoryEntry>, TreeError> {
    lister.list(dir).map_err(|source| TreeError::Unreadable {
        path: dir.to_path_buf(),
        source,
    })
}

/// Directories first, then files; each group by case-insensitive name.
fn sort_entries(entries: Vec<DirectoryEntry>) -> Vec<DirectoryEntry> {
    let (mut dirs, mut files): (Vec<_>, Vec<_>) =
        entries.into_iter().partition(DirectoryEntry::is_dir);
    let by_name = |a: &DirectoryEntry, b: &DirectoryEntry| {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.name.cmp(&b.name))
    };
    dirs.sort_by(by_name);
    files.sort_by(by_name);
    dirs.extend(files);
    dirs
}

fn branch(prefix: &str, is_last: bool) -> (&'static str, String) {
    if is_last {
        (CORNER, format!("{prefix}{BLANK}"))
    } else {
        (TEE, format!("{prefix}{PIPE}"))
    }
}
