use indextree::NodeId;
use std::path::Path;

use crate::error::Result;
use crate::reveal::{Platform, RevealCommand};
use crate::tree::{DirTree, TreeEntry};
use crate::walker::{DirWalker, WalkStats};

/// Receives every reveal command the viewer issues.
pub type Launcher = Box<dyn FnMut(&RevealCommand) -> Result<()>>;

/// Front-end independent state: the current tree, the selected row and the
/// status line.
pub struct Viewer {
    tree: Option<DirTree>,
    selected: Option<NodeId>,
    status: String,
    walker: DirWalker,
    platform: Platform,
    launcher: Launcher,
}

impl Default for Viewer {
    fn default() -> Self {
        Self::with_launcher(Platform::current(), Box::new(|cmd: &RevealCommand| cmd.run()))
    }
}

impl Viewer {
    /// Build a viewer that hands reveal commands to `launcher` instead of
    /// running them.
    pub fn with_launcher(platform: Platform, launcher: Launcher) -> Self {
        Self {
            tree: None,
            selected: None,
            status: String::from("Choose a folder to display"),
            walker: DirWalker::new(),
            platform,
            launcher,
        }
    }

    /// Walk `path` and replace the current tree with the result.
    ///
    /// On failure the current tree is left untouched.
    pub fn load_root(&mut self, path: &Path) -> Result<WalkStats> {
        match self.walker.walk(path) {
            Ok((tree, stats)) => {
                self.status = walk_summary(&tree, &stats);
                self.tree = Some(tree);
                self.selected = None;
                Ok(stats)
            }
            Err(err) => {
                self.status = err.to_string();
                Err(err)
            }
        }
    }

    pub fn tree(&self) -> Option<&DirTree> {
        self.tree.as_ref()
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn selected(&self) -> Option<NodeId> {
        self.selected
    }

    pub fn selected_entry(&self) -> Option<&TreeEntry> {
        self.tree.as_ref()?.entry(self.selected?)
    }

    pub fn select(&mut self, id: NodeId) {
        if self.tree.as_ref().and_then(|t| t.entry(id)).is_some() {
            self.selected = Some(id);
        }
    }

    /// Double-click action: select the row and reveal it in the file manager.
    pub fn activate(&mut self, id: NodeId) -> Option<RevealCommand> {
        let entry = self.tree.as_ref()?.entry(id)?;
        let cmd = RevealCommand::for_entry(self.platform, &entry.path, entry.kind);
        self.selected = Some(id);

        tracing::debug!(program = %cmd.program, args = ?cmd.args, "Revealing entry");
        if let Err(err) = (self.launcher)(&cmd) {
            tracing::warn!(error = %err, "Reveal failed");
            self.status = err.to_string();
        }
        Some(cmd)
    }

    pub fn expand_all(&mut self) {
        if let Some(tree) = self.tree.as_mut() {
            tree.expand_all();
        }
    }

    pub fn collapse_all(&mut self) {
        if let Some(tree) = self.tree.as_mut() {
            tree.collapse_all();
        }
    }

    pub fn toggle(&mut self, id: NodeId) -> bool {
        self.tree.as_mut().is_some_and(|tree| tree.toggle(id))
    }

    pub fn set_open(&mut self, id: NodeId, open: bool) -> bool {
        self.tree.as_mut().is_some_and(|tree| tree.set_open(id, open))
    }
}

fn walk_summary(tree: &DirTree, stats: &WalkStats) -> String {
    let mut summary = format!(
        "{}: {} folders, {} files",
        tree.root_entry().path.display(),
        stats.folders,
        stats.files
    );
    if stats.skipped > 0 {
        summary.push_str(&format!(", {} unreadable", stats.skipped));
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TreeError;
    use std::cell::RefCell;
    use std::ffi::OsString;
    use std::fs;
    use std::rc::Rc;
    use tempfile::TempDir;

    fn recording_viewer(platform: Platform) -> (Viewer, Rc<RefCell<Vec<RevealCommand>>>) {
        let launched = Rc::new(RefCell::new(Vec::new()));
        let sink = launched.clone();
        let viewer = Viewer::with_launcher(
            platform,
            Box::new(move |cmd: &RevealCommand| -> Result<()> {
                sink.borrow_mut().push(cmd.clone());
                Ok(())
            }),
        );
        (viewer, launched)
    }

    #[test]
    fn test_activate_file_reveals_containing_folder() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("docs")).unwrap();
        fs::write(dir.path().join("docs/a.txt"), b"x").unwrap();

        let (mut viewer, launched) = recording_viewer(Platform::Other);
        viewer.load_root(dir.path()).unwrap();

        let file = viewer
            .tree()
            .unwrap()
            .get_node(&dir.path().join("docs/a.txt"))
            .unwrap();
        viewer.activate(file);

        let launched = launched.borrow();
        assert_eq!(launched.len(), 1);
        assert_eq!(launched[0].program, "xdg-open");
        assert_eq!(launched[0].args, vec![dir.path().join("docs").into_os_string()]);
        assert_eq!(viewer.selected(), Some(file));
    }

    #[test]
    fn test_activate_folder_reveals_itself() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("docs")).unwrap();

        let (mut viewer, launched) = recording_viewer(Platform::Other);
        viewer.load_root(dir.path()).unwrap();

        let folder = viewer
            .tree()
            .unwrap()
            .get_node(&dir.path().join("docs"))
            .unwrap();
        viewer.activate(folder);

        assert_eq!(
            launched.borrow()[0].args,
            vec![dir.path().join("docs").into_os_string()]
        );
    }

    #[test]
    fn test_failed_reveal_shows_status() {
        let dir = TempDir::new().unwrap();
        let mut viewer = Viewer::with_launcher(
            Platform::MacOs,
            Box::new(|cmd: &RevealCommand| -> Result<()> {
                Err(TreeError::Reveal {
                    program: cmd.program.clone(),
                    source: std::io::Error::from(std::io::ErrorKind::NotFound),
                })
            }),
        );
        viewer.load_root(dir.path()).unwrap();

        let root = viewer.tree().unwrap().get_root();
        let cmd = viewer.activate(root).unwrap();

        assert_eq!(cmd.args[0], OsString::from("-R"));
        assert!(viewer.status().contains("open"));
    }

    #[test]
    fn test_load_root_replaces_previous_tree() {
        let first = TempDir::new().unwrap();
        fs::write(first.path().join("old.txt"), b"").unwrap();
        let second = TempDir::new().unwrap();
        fs::write(second.path().join("new.txt"), b"").unwrap();

        let (mut viewer, _) = recording_viewer(Platform::Other);
        viewer.load_root(first.path()).unwrap();
        let old = viewer
            .tree()
            .unwrap()
            .get_node(&first.path().join("old.txt"))
            .unwrap();
        viewer.select(old);

        viewer.load_root(second.path()).unwrap();
        let tree = viewer.tree().unwrap();

        assert!(tree.get_node(&first.path().join("old.txt")).is_none());
        assert_eq!(tree.child_names(tree.get_root()), vec!["new.txt"]);
        assert_eq!(viewer.selected(), None);
    }

    #[test]
    fn test_failed_load_keeps_tree() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("kept.txt"), b"").unwrap();

        let (mut viewer, _) = recording_viewer(Platform::Other);
        viewer.load_root(dir.path()).unwrap();

        assert!(viewer.load_root(&dir.path().join("missing")).is_err());
        assert!(viewer.status().starts_with("Path not found"));
        let tree = viewer.tree().unwrap();
        assert_eq!(tree.child_names(tree.get_root()), vec!["kept.txt"]);
    }

    #[test]
    fn test_activate_without_tree_is_noop() {
        let (mut viewer, launched) = recording_viewer(Platform::Other);
        let mut scratch = DirTree::new("/scratch");
        let stray = scratch
            .add_entry("/scratch/file".into(), crate::tree::EntryKind::File)
            .unwrap();

        assert!(viewer.activate(stray).is_none());
        assert!(launched.borrow().is_empty());
    }
}
