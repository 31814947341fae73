use crate::config::AppConfig;
use crate::domain::{FileCategory, HexColor, Session};
use crate::exclusion::{HiddenNames, InsertOutcome};
use crate::export::{render_text, root_label};
use crate::selection::{DirectoryIndex, select_all, toggle, unselect_all};
use crate::tree::{RenderedTree, SelectorLine, SelectorTree, Snapshot};
use std::path::{Path, PathBuf};

const MAX_LOG_LINES: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaneFocus {
    Selector,
    Tree,
    Log,
}

impl PaneFocus {
    pub fn next(self) -> Self {
        match self {
            Self::Selector => Self::Tree,
            Self::Tree => Self::Log,
            Self::Log => Self::Selector,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Exclusion,
    Export,
    Color(FileCategory),
}

impl InputKind {
    pub fn prompt(self) -> String {
        match self {
            InputKind::Exclusion => {
                "exclude name or extension (e.g. node_modules, .png)".to_string()
            }
            InputKind::Export => "export to file (.txt, .html or .json)".to_string(),
            InputKind::Color(category) => format!("color for {} (#RRGGBB)", category.label()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalState {
    None,
    Help,
    Input { kind: InputKind, value: String },
    Exclusions { selected: usize },
    Palette { selected: usize },
}

#[derive(Debug, Clone)]
pub enum BackendTask {
    Rebuild {
        session: Session,
        hidden: HiddenNames,
    },
}

#[derive(Debug, Clone)]
pub enum BackendEvent {
    Rebuilt {
        snapshot: Snapshot,
        duration_ms: u64,
    },
    Error {
        context: String,
        message: String,
    },
}

pub struct App {
    pub config: AppConfig,
    pub focus: PaneFocus,
    pub session: Session,
    pub root_label: String,
    pub selected_index: usize,
    list_scroll: usize,
    pub tree_scroll: usize,
    pub logs: Vec<String>,
    pub log_tail_offset: usize,
    pub modal: ModalState,
    pub busy: bool,
    pub should_quit: bool,
    hidden: HiddenNames,
    directories: DirectoryIndex,
    tree: RenderedTree,
    selector: SelectorTree,
    selection_initialized: bool,
}

impl App {
    pub fn new(config: AppConfig, session: Session) -> Self {
        let hidden = config.hidden();
        let root_label = root_label(&session.root);
        let directories = DirectoryIndex::new(session.root.clone(), Vec::new());
        Self {
            config,
            focus: PaneFocus::Selector,
            session,
            root_label,
            selected_index: 0,
            list_scroll: 0,
            tree_scroll: 0,
            logs: Vec::new(),
            log_tail_offset: 0,
            modal: ModalState::None,
            busy: false,
            should_quit: false,
            hidden,
            directories,
            tree: RenderedTree::default(),
            selector: SelectorTree::default(),
            selection_initialized: false,
        }
    }

    pub fn rebuild_task(&self) -> BackendTask {
        BackendTask::Rebuild {
            session: self.session.clone(),
            hidden: self.hidden.clone(),
        }
    }

    /// Installs a finished rebuild. Returns true when the first rebuild
    /// switched the selection to every directory and the tree must be
    /// rendered again with it.
    pub fn apply_snapshot(&mut self, snapshot: Snapshot) -> bool {
        let previous = self.selected_path();
        self.session.inclusion = snapshot.directories.retain_known(&self.session.inclusion);
        self.directories = snapshot.directories;
        self.tree = snapshot.tree;
        self.selector = snapshot.selector;

        if let Some(target) = previous
            && let Some(idx) = self.selector.lines.iter().position(|l| l.path == target)
        {
            self.selected_index = idx;
        } else {
            self.sync_selection_bounds();
        }
        self.clamp_tree_scroll();

        if !self.selection_initialized {
            self.selection_initialized = true;
            if self.config.select_all_on_start && !self.directories.is_empty() {
                self.session.inclusion = select_all(&self.directories);
                return true;
            }
        }
        false
    }

    pub fn tree(&self) -> &RenderedTree {
        &self.tree
    }

    pub fn selector_lines(&self) -> &[SelectorLine] {
        &self.selector.lines
    }

    pub fn directory_count(&self) -> usize {
        self.directories.len()
    }

    pub fn export_text(&self) -> String {
        render_text(&self.root_label, &self.tree)
    }

    pub fn select_next(&mut self) {
        let len = self.current_len();
        if len == 0 {
            self.selected_index = 0;
            return;
        }
        self.selected_index = (self.selected_index + 1) % len;
    }

    pub fn select_prev(&mut self) {
        let len = self.current_len();
        if len == 0 {
            self.selected_index = 0;
            return;
        }
        if self.selected_index == 0 {
            self.selected_index = len - 1;
        } else {
            self.selected_index -= 1;
        }
    }

    pub fn current_len(&self) -> usize {
        self.selector.lines.len()
    }

    pub fn list_scroll(&self) -> usize {
        self.list_scroll
    }

    pub fn sync_list_scroll(&mut self, viewport_rows: usize) {
        let len = self.current_len();
        if len == 0 {
            self.list_scroll = 0;
            return;
        }

        let rows = viewport_rows.max(1);
        if self.selected_index < self.list_scroll {
            self.list_scroll = self.selected_index;
        } else if self.selected_index >= self.list_scroll + rows {
            self.list_scroll = self.selected_index + 1 - rows;
        }

        let max_offset = len.saturating_sub(rows);
        if self.list_scroll > max_offset {
            self.list_scroll = max_offset;
        }
    }

    pub fn sync_selection_bounds(&mut self) {
        let len = self.current_len();
        if len == 0 {
            self.selected_index = 0;
            self.list_scroll = 0;
        } else if self.selected_index >= len {
            self.selected_index = len - 1;
        }
    }

    pub fn selected_path(&self) -> Option<PathBuf> {
        self.selector
            .lines
            .get(self.selected_index)
            .map(|line| line.path.clone())
    }

    /// Flips the checkbox under the cursor. Returns whether the inclusion set
    /// changed and a rebuild is due.
    pub fn toggle_selected(&mut self) -> bool {
        let Some(path) = self.selected_path() else {
            return false;
        };
        let checked = !self.session.inclusion.contains(&path);
        self.toggle_path(&path, checked)
    }

    pub fn toggle_path(&mut self, path: &Path, checked: bool) -> bool {
        let next = toggle(&self.directories, &self.session.inclusion, path, checked);
        if next == self.session.inclusion {
            return false;
        }
        tracing::debug!(path = %path.display(), checked, "selection toggled");
        self.session.inclusion = next;
        true
    }

    pub fn select_all_directories(&mut self) -> bool {
        let next = select_all(&self.directories);
        if next == self.session.inclusion {
            return false;
        }
        self.session.inclusion = next;
        self.log(format!("selected all {} directories", self.directories.len()));
        true
    }

    pub fn unselect_all_directories(&mut self) -> bool {
        if self.session.inclusion.is_empty() {
            return false;
        }
        self.session.inclusion = unselect_all();
        self.log("unselected all directories".to_string());
        true
    }

    pub fn add_exclusion(&mut self, raw: &str) -> bool {
        match self.session.exclusion.insert(raw) {
            InsertOutcome::Added(entry) => {
                self.log(format!("exclusion added: {entry}"));
                true
            }
            InsertOutcome::AlreadyPresent(entry) => {
                self.log(format!("exclusion already exists: {entry}"));
                false
            }
            InsertOutcome::Empty => {
                self.log("empty exclusion ignored".to_string());
                false
            }
        }
    }

    pub fn remove_exclusion(&mut self, entry: &str) -> bool {
        let removed = self.session.exclusion.remove(entry);
        if removed {
            self.log(format!("exclusion removed: {entry}"));
        }
        removed
    }

    pub fn exclusion_at(&self, index: usize) -> Option<String> {
        self.session.exclusion.iter().nth(index).map(str::to_string)
    }

    pub fn set_color(&mut self, category: FileCategory, raw: &str) -> bool {
        match raw.parse::<HexColor>() {
            Ok(color) => {
                if self.session.palette.color(category) == color {
                    return false;
                }
                self.session.palette.set(category, color);
                self.log(format!("color for {} set to {color}", category.label()));
                true
            }
            Err(err) => {
                self.log(format!("error[color]: {err}"));
                false
            }
        }
    }

    pub fn reset_color(&mut self, category: FileCategory) -> bool {
        let reset = self.session.palette.reset(category);
        if reset {
            self.log(format!("color for {} reset to default", category.label()));
        }
        reset
    }

    pub fn open_help(&mut self) {
        self.modal = ModalState::Help;
    }

    pub fn open_input(&mut self, kind: InputKind, value: String) {
        self.modal = ModalState::Input { kind, value };
    }

    pub fn open_exclusions(&mut self) {
        self.modal = ModalState::Exclusions { selected: 0 };
    }

    pub fn open_palette(&mut self) {
        self.modal = ModalState::Palette { selected: 0 };
    }

    pub fn close_modal(&mut self) {
        self.modal = ModalState::None;
    }

    pub fn log(&mut self, line: String) {
        self.logs.push(line);
        if self.log_tail_offset > 0 {
            self.log_tail_offset = self.log_tail_offset.saturating_add(1);
        }
        if self.logs.len() > MAX_LOG_LINES {
            let to_trim = self.logs.len() - MAX_LOG_LINES;
            self.logs.drain(0..to_trim);
        }
    }

    pub fn scroll_log_up(&mut self, lines: usize) -> bool {
        let before = self.log_tail_offset;
        self.log_tail_offset = self
            .log_tail_offset
            .saturating_add(lines)
            .min(self.logs.len().saturating_sub(1));
        self.log_tail_offset != before
    }

    pub fn scroll_log_down(&mut self, lines: usize) -> bool {
        let before = self.log_tail_offset;
        self.log_tail_offset = self.log_tail_offset.saturating_sub(lines);
        self.log_tail_offset != before
    }

    pub fn scroll_tree_up(&mut self, lines: usize) -> bool {
        if self.tree_scroll == 0 {
            return false;
        }
        self.tree_scroll = self.tree_scroll.saturating_sub(lines);
        true
    }

    pub fn scroll_tree_down(&mut self, lines: usize) -> bool {
        let max = self.tree_max_scroll();
        if self.tree_scroll >= max {
            return false;
        }
        self.tree_scroll = (self.tree_scroll + lines).min(max);
        true
    }

    fn tree_max_scroll(&self) -> usize {
        // header line plus one row per entry
        self.tree.lines.len()
    }

    fn clamp_tree_scroll(&mut self) {
        self.tree_scroll = self.tree_scroll.min(self.tree_max_scroll());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::testing::MemoryLister;
    use crate::tree::render;
    use pretty_assertions::assert_eq;

    fn lister() -> MemoryLister {
        MemoryLister::new("/proj")
            .dir("/proj/src")
            .dir("/proj/src/bin")
            .file("/proj/src/bin/main.rs")
            .file("/proj/src/x.js")
            .dir("/proj/docs")
            .file("/proj/docs/y.md")
            .file("/proj/README.md")
    }

    fn app_with(config: AppConfig) -> App {
        App::new(config, Session::new(PathBuf::from("/proj")))
    }

    /// Runs rebuilds the way the worker would until the app is settled.
    fn settle(app: &mut App, lister: &MemoryLister) {
        loop {
            let BackendTask::Rebuild { session, hidden } = app.rebuild_task();
            let snapshot = render(lister, &session, &hidden).expect("render");
            if !app.apply_snapshot(snapshot) {
                break;
            }
        }
    }

    #[test]
    fn first_rebuild_selects_every_directory() {
        let lister = lister();
        let mut app = app_with(AppConfig::default());
        settle(&mut app, &lister);

        assert_eq!(app.session.inclusion.len(), 3);
        assert!(app.tree().text().contains("main.rs"));
        assert!(app.selector_lines().iter().all(|l| l.checked));
        assert_eq!(app.root_label, "PROJ");
    }

    #[test]
    fn first_rebuild_respects_disabled_select_all() {
        let lister = lister();
        let config = AppConfig {
            select_all_on_start: false,
            ..AppConfig::default()
        };
        let mut app = app_with(config);
        settle(&mut app, &lister);

        assert!(app.session.inclusion.is_empty());
        assert_eq!(app.tree().text(), " ┗ README.md\n");
        assert_eq!(app.current_len(), 3);
    }

    #[test]
    fn toggling_selected_directory_unchecks_descendants() {
        let lister = lister();
        let mut app = app_with(AppConfig::default());
        settle(&mut app, &lister);

        let src = app
            .selector_lines()
            .iter()
            .position(|l| l.name == "src")
            .expect("src row");
        app.selected_index = src;
        assert!(app.toggle_selected());
        settle(&mut app, &lister);

        assert!(!app.session.inclusion.contains(Path::new("/proj/src")));
        assert!(!app.session.inclusion.contains(Path::new("/proj/src/bin")));
        assert!(!app.tree().text().contains("x.js"));
        assert_eq!(app.selected_path(), Some(PathBuf::from("/proj/src")));
    }

    #[test]
    fn checking_nested_directory_checks_its_parent() {
        let lister = lister();
        let mut app = app_with(AppConfig::default());
        settle(&mut app, &lister);
        assert!(app.unselect_all_directories());
        settle(&mut app, &lister);

        assert!(app.toggle_path(Path::new("/proj/src/bin"), true));
        assert!(app.session.inclusion.contains(Path::new("/proj/src")));
        assert!(!app.toggle_path(Path::new("/proj/src/bin"), true));
    }

    #[test]
    fn exclusions_ignore_empty_input_and_duplicates() {
        let mut app = app_with(AppConfig::default());
        assert!(!app.add_exclusion("  "));
        assert!(app.add_exclusion(".md"));
        assert!(!app.add_exclusion(".md"));
        assert_eq!(app.exclusion_at(0), Some(".md".to_string()));
        assert!(app.remove_exclusion(".md"));
        assert!(!app.remove_exclusion(".md"));
        assert!(app.logs.iter().any(|l| l.contains("empty exclusion ignored")));
    }

    #[test]
    fn invalid_color_is_logged_and_palette_kept() {
        let mut app = app_with(AppConfig::default());
        assert!(!app.set_color(FileCategory::Code, "blue"));
        assert_eq!(
            app.session.palette.color(FileCategory::Code),
            FileCategory::Code.default_color()
        );
        assert!(app.logs.iter().any(|l| l.starts_with("error[color]")));

        assert!(app.set_color(FileCategory::Code, "#000000"));
        assert!(!app.set_color(FileCategory::Code, "000000"));
        assert!(app.reset_color(FileCategory::Code));
        assert!(!app.reset_color(FileCategory::Code));
    }

    #[test]
    fn selection_is_bounded_after_directories_vanish() {
        let lister = lister();
        let mut app = app_with(AppConfig::default());
        settle(&mut app, &lister);
        app.selected_index = 2;

        let smaller = MemoryLister::new("/proj").dir("/proj/docs");
        settle(&mut app, &smaller);
        assert_eq!(app.current_len(), 1);
        assert_eq!(app.selected_index, 0);
        assert_eq!(app.session.inclusion.len(), 1);
    }

    #[test]
    fn tree_scroll_is_clamped() {
        let lister = lister();
        let mut app = app_with(AppConfig::default());
        settle(&mut app, &lister);
        let max = app.tree().lines.len();

        assert!(!app.scroll_tree_up(1));
        assert!(app.scroll_tree_down(100));
        assert_eq!(app.tree_scroll, max);
        assert!(!app.scroll_tree_down(1));
        assert!(app.scroll_tree_up(2));
        assert_eq!(app.tree_scroll, max - 2);
    }

    #[test]
    fn log_preserves_manual_scroll_position_when_new_entries_arrive() {
        let mut app = app_with(AppConfig::default());
        for i in 0..10 {
            app.log(format!("line-{i}"));
        }
        app.scroll_log_up(4);
        app.log("line-10".to_string());
        app.log("line-11".to_string());
        assert_eq!(app.log_tail_offset, 6);
        assert!(app.scroll_log_down(10));
        assert_eq!(app.log_tail_offset, 0);
    }

    #[test]
    fn list_scroll_moves_only_at_view_edges() {
        let mut lister = MemoryLister::new("/proj");
        for i in 0..20 {
            lister = lister.dir(&format!("/proj/d{i:02}"));
        }
        let mut app = app_with(AppConfig::default());
        settle(&mut app, &lister);

        app.selected_index = 10;
        app.sync_list_scroll(5);
        assert_eq!(app.list_scroll(), 6);

        app.selected_index = 6;
        app.sync_list_scroll(5);
        assert_eq!(app.list_scroll(), 6);

        app.selected_index = 5;
        app.sync_list_scroll(5);
        assert_eq!(app.list_scroll(), 5);
    }
}
