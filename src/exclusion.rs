use crate::domain::dotted_extension;
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    Added(String),
    AlreadyPresent(String),
    Empty,
}

/// Names (`node_modules`) and dotted extensions (`.png`) hidden from the
/// colorized tree at every depth. Matching is exact string equality against
/// either the entry name or its extension.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet {
    entries: BTreeSet<String>,
}

impl ExclusionSet {
    pub fn insert(&mut self, raw: &str) -> InsertOutcome {
        let entry = raw.trim();
        if entry.is_empty() {
            return InsertOutcome::Empty;
        }
        if self.entries.insert(entry.to_string()) {
            InsertOutcome::Added(entry.to_string())
        } else {
            InsertOutcome::AlreadyPresent(entry.to_string())
        }
    }

    pub fn remove(&mut self, entry: &str) -> bool {
        self.entries.remove(entry)
    }

    pub fn contains(&self, entry: &str) -> bool {
        self.entries.contains(entry)
    }

    pub fn matches(&self, name: &str) -> bool {
        self.contains(name) || dotted_extension(name).is_some_and(|ext| self.contains(ext))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for ExclusionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = ExclusionSet::default();
        for raw in iter {
            set.insert(raw.as_ref());
        }
        set
    }
}

/// Entry names always left out of the tree, such as `.git`. Unlike an
/// [`ExclusionSet`] these never match as extensions: `.git` hides `.git`
/// but not `mirror.git`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HiddenNames {
    names: BTreeSet<String>,
}

impl HiddenNames {
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }
}

impl<S: AsRef<str>> FromIterator<S> for HiddenNames {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let names = iter
            .into_iter()
            .map(|raw| raw.as_ref().trim().to_string())
            .filter(|name| !name.is_empty())
            .collect();
        HiddenNames { names }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_input_is_never_added() {
        let mut set = ExclusionSet::default();
        assert_eq!(set.insert(""), InsertOutcome::Empty);
        assert_eq!(set.insert("   "), InsertOutcome::Empty);
        assert!(set.is_empty());
    }

    #[test]
    fn insert_reports_duplicates() {
        let mut set = ExclusionSet::default();
        assert_eq!(set.insert(".png"), InsertOutcome::Added(".png".to_string()));
        assert_eq!(
            set.insert(" .png "),
            InsertOutcome::AlreadyPresent(".png".to_string())
        );
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn matches_by_name_or_extension() {
        let set: ExclusionSet = ["src", ".png"].into_iter().collect();
        assert!(set.matches("src"));
        assert!(set.matches("a.png"));
        assert!(!set.matches("a.PNG"));
        assert!(!set.matches("src.rs"));
        assert!(!set.matches("png"));
    }

    #[test]
    fn dotted_entries_also_match_as_extensions() {
        let set: ExclusionSet = [".git"].into_iter().collect();
        assert!(set.matches(".git"));
        assert!(set.matches("mirror.git"));
        assert!(!set.matches(".gitignore"));
    }

    #[test]
    fn remove_reports_whether_entry_existed() {
        let mut set: ExclusionSet = ["a", "b"].into_iter().collect();
        assert!(set.remove("a"));
        assert!(!set.remove("a"));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["b"]);
    }

    #[test]
    fn hidden_names_match_whole_names_only() {
        let hidden: HiddenNames = [".git", " .DS_Store ", ""].into_iter().collect();
        assert!(hidden.contains(".git"));
        assert!(hidden.contains(".DS_Store"));
        assert!(!hidden.contains("mirror.git"));
        assert!(!hidden.contains("x.DS_Store"));
        assert!(!hidden.contains(""));
    }
}
