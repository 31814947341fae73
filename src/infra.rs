use crate::domain::{DirectoryEntry, EntryKind};
use std::fs;
use std::io;
use std::path::Path;

/// The only filesystem capability the tree builders need.
pub trait DirectoryLister: Send + Sync {
    fn list(&self, dir: &Path) -> io::Result<Vec<DirectoryEntry>>;
}

/// Lists real directories. Symbolic links are skipped entirely, so a link
/// cycle cannot make the walk recurse forever.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsLister;

impl DirectoryLister for FsLister {
    fn list(&self, dir: &Path) -> io::Result<Vec<DirectoryEntry>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let file_type = entry.file_type()?;
            if file_type.is_symlink() {
                continue;
            }
            let kind = if file_type.is_dir() {
                EntryKind::Directory
            } else {
                EntryKind::File
            };
            entries.push(DirectoryEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                kind,
                path: dir.join(entry.file_name()),
            });
        }
        Ok(entries)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    /// In-memory directory tree keyed by absolute path. Directories without
    /// children still need an entry; unknown directories fail to list.
    #[derive(Debug, Default)]
    pub(crate) struct MemoryLister {
        dirs: BTreeMap<PathBuf, Vec<DirectoryEntry>>,
        unreadable: Vec<PathBuf>,
    }

    impl MemoryLister {
        pub(crate) fn new(root: &str) -> Self {
            let mut lister = Self::default();
            lister.dirs.insert(PathBuf::from(root), Vec::new());
            lister
        }

        pub(crate) fn dir(mut self, path: &str) -> Self {
            self.add(path, EntryKind::Directory);
            self.dirs.entry(PathBuf::from(path)).or_default();
            self
        }

        pub(crate) fn file(mut self, path: &str) -> Self {
            self.add(path, EntryKind::File);
            self
        }

        pub(crate) fn unreadable(mut self, path: &str) -> Self {
            self.unreadable.push(PathBuf::from(path));
            self
        }

        fn add(&mut self, path: &str, kind: EntryKind) {
            let path = PathBuf::from(path);
            let parent = path.parent().map(Path::to_path_buf).unwrap_or_default();
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            self.dirs
                .entry(parent)
                .or_default()
                .push(DirectoryEntry { name, kind, path });
        }
    }

    impl DirectoryLister for MemoryLister {
        fn list(&self, dir: &Path) -> io::Result<Vec<DirectoryEntry>> {
            if self.unreadable.iter().any(|p| p == dir) {
                return Err(io::Error::new(
                    io::ErrorKind::PermissionDenied,
                    "permission denied",
                ));
            }
            self.dirs
                .get(dir)
                .cloned()
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such directory"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn fs_lister_reports_kinds_and_joined_paths() {
        let temp = tempfile::tempdir().expect("tempdir");
        fs::create_dir(temp.path().join("src")).expect("create dir");
        fs::write(temp.path().join("README.md"), "hi").expect("write file");

        let mut entries = FsLister.list(temp.path()).expect("list");
        entries.sort_by(|a, b| a.name.cmp(&b.name));

        assert_eq!(
            entries,
            vec![
                DirectoryEntry {
                    name: "README.md".to_string(),
                    kind: EntryKind::File,
                    path: temp.path().join("README.md"),
                },
                DirectoryEntry {
                    name: "src".to_string(),
                    kind: EntryKind::Directory,
                    path: temp.path().join("src"),
                },
            ]
        );
    }

    #[test]
    fn fs_lister_fails_for_missing_directory() {
        let temp = tempfile::tempdir().expect("tempdir");
        let err = FsLister
            .list(&temp.path().join("gone"))
            .expect_err("missing dir");
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[cfg(unix)]
    #[test]
    fn fs_lister_skips_symlinks() {
        let temp = tempfile::tempdir().expect("tempdir");
        fs::create_dir(temp.path().join("real")).expect("create dir");
        fs::write(temp.path().join("main.js"), "").expect("write file");
        std::os::unix::fs::symlink(temp.path().join("real"), temp.path().join("lib.js"))
            .expect("symlink dir");
        std::os::unix::fs::symlink(temp.path().join("main.js"), temp.path().join("alias.js"))
            .expect("symlink file");

        let mut names: Vec<String> = FsLister
            .list(temp.path())
            .expect("list")
            .into_iter()
            .map(|e| e.name)
            .collect();
        names.sort();
        assert_eq!(names, vec!["main.js".to_string(), "real".to_string()]);
    }
}
