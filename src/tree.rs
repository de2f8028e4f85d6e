use indextree::{Arena, NodeId};
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};

/// Icon tag of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Folder,
    File,
}

impl EntryKind {
    pub fn is_folder(self) -> bool {
        matches!(self, Self::Folder)
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::Folder => "📁",
            Self::File => "📄",
        }
    }
}

/// One row of the folder tree: a file or folder found during the walk.
#[derive(Debug, Clone)]
pub struct TreeEntry {
    pub name: String,
    pub kind: EntryKind,
    /// Absolute path of the entry on disk
    pub path: PathBuf,
    pub open: bool,
}

/// Folder tree backed by an arena allocator.
///
/// Children keep insertion order, so a walker that inserts entries sorted by
/// name produces alphabetically ordered siblings. Dropping the tree drops
/// every node at once.
pub struct DirTree {
    arena: Arena<TreeEntry>,
    root: NodeId,
    path_to_node: HashMap<PathBuf, NodeId>,
}

impl DirTree {
    /// Create a new tree holding only an open root folder
    pub fn new<P: AsRef<Path>>(root_path: P) -> Self {
        let mut arena = Arena::new();
        let root_path_buf = root_path.as_ref().to_path_buf();

        let root_entry = TreeEntry {
            name: root_label(&root_path_buf),
            kind: EntryKind::Folder,
            path: root_path_buf.clone(),
            open: true,
        };

        let root = arena.new_node(root_entry);
        let mut path_to_node = HashMap::new();
        path_to_node.insert(root_path_buf, root);

        Self {
            arena,
            root,
            path_to_node,
        }
    }

    /// Append an entry under its parent folder.
    ///
    /// Returns `None` when the parent has not been inserted yet.
    pub fn add_entry(&mut self, path: PathBuf, kind: EntryKind) -> Option<NodeId> {
        let parent_id = path
            .parent()
            .and_then(|parent| self.path_to_node.get(parent))
            .copied()?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let node_id = self.arena.new_node(TreeEntry {
            name,
            kind,
            path: path.clone(),
            open: false,
        });
        parent_id.append(node_id, &mut self.arena);

        self.path_to_node.insert(path, node_id);
        Some(node_id)
    }

    pub fn get_root(&self) -> NodeId {
        self.root
    }

    pub fn get_arena(&self) -> &Arena<TreeEntry> {
        &self.arena
    }

    pub fn get_node(&self, path: &Path) -> Option<NodeId> {
        self.path_to_node.get(path).copied()
    }

    pub fn entry(&self, id: NodeId) -> Option<&TreeEntry> {
        self.arena.get(id).filter(|n| !n.is_removed()).map(|n| n.get())
    }

    pub(crate) fn entry_mut(&mut self, id: NodeId) -> Option<&mut TreeEntry> {
        self.arena
            .get_mut(id)
            .filter(|n| !n.is_removed())
            .map(|n| n.get_mut())
    }

    pub fn root_entry(&self) -> &TreeEntry {
        self.arena[self.root].get()
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        id.children(&self.arena)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.arena.get(id)?.parent()
    }

    /// Names of the direct children of `id`, in display order.
    pub fn child_names(&self, id: NodeId) -> Vec<&str> {
        self.children(id)
            .filter_map(|child| self.entry(child))
            .map(|entry| entry.name.as_str())
            .collect()
    }

    /// Number of nodes, root included
    pub fn len(&self) -> usize {
        self.path_to_node.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Label shown for the root row: the last path component (`..` included), or
/// the whole path for filesystem roots such as `/` or `C:\`.
pub fn root_label(path: &Path) -> String {
    path.file_name()
        .or_else(|| match path.components().next_back() {
            Some(last @ Component::ParentDir) => Some(last.as_os_str()),
            _ => None,
        })
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tree_basic() {
        let mut tree = DirTree::new("/test");
        tree.add_entry(PathBuf::from("/test/file1.txt"), EntryKind::File);
        let dir = tree
            .add_entry(PathBuf::from("/test/dir1"), EntryKind::Folder)
            .unwrap();
        tree.add_entry(PathBuf::from("/test/dir1/file2.txt"), EntryKind::File);

        assert_eq!(tree.len(), 4);
        assert_eq!(tree.child_names(tree.get_root()), vec!["file1.txt", "dir1"]);
        assert_eq!(tree.child_names(dir), vec!["file2.txt"]);
        assert_eq!(tree.get_node(Path::new("/test/dir1")), Some(dir));
    }

    #[test]
    fn test_root_is_open_children_closed() {
        let mut tree = DirTree::new("/test");
        let dir = tree
            .add_entry(PathBuf::from("/test/dir"), EntryKind::Folder)
            .unwrap();

        assert!(tree.root_entry().open);
        assert_eq!(tree.root_entry().name, "test");
        assert!(!tree.entry(dir).unwrap().open);
        assert_eq!(tree.parent(dir), Some(tree.get_root()));
    }

    #[test]
    fn test_orphan_entry_rejected() {
        let mut tree = DirTree::new("/test");
        let orphan = tree.add_entry(PathBuf::from("/test/missing/file.txt"), EntryKind::File);

        assert!(orphan.is_none());
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_root_label() {
        assert_eq!(root_label(Path::new("/home/user/projects/")), "projects");
        assert_eq!(root_label(Path::new("/")), "/");
    }

    #[test]
    fn test_root_label_parent_dir() {
        assert_eq!(root_label(Path::new("/tmp/a/..")), "..");
        assert_eq!(root_label(Path::new("/tmp/a/../")), "..");
        assert_eq!(DirTree::new("/tmp/a/..").root_entry().name, "..");
    }
}
