use indextree::NodeId;

use crate::tree::DirTree;

/// A row that is currently visible in a tree widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleRow {
    pub id: NodeId,
    /// 0 for the root row.
    pub depth: usize,
}

impl DirTree {
    /// Mark every node open, root included.
    pub fn expand_all(&mut self) {
        self.set_all(true);
    }

    /// Mark every node closed, root included.
    pub fn collapse_all(&mut self) {
        self.set_all(false);
    }

    fn set_all(&mut self, open: bool) {
        let ids: Vec<NodeId> = self.get_root().descendants(self.get_arena()).collect();
        for id in ids {
            if let Some(entry) = self.entry_mut(id) {
                entry.open = open;
            }
        }
    }

    /// Open or close a single folder. Files stay closed.
    pub fn set_open(&mut self, id: NodeId, open: bool) -> bool {
        match self.entry_mut(id) {
            Some(entry) if entry.kind.is_folder() => {
                entry.open = open;
                true
            }
            _ => false,
        }
    }

    pub fn toggle(&mut self, id: NodeId) -> bool {
        let Some(open) = self.entry(id).map(|e| e.open) else {
            return false;
        };
        self.set_open(id, !open)
    }

    /// Flatten the tree in display order, descending only into open nodes.
    pub fn visible_rows(&self) -> Vec<VisibleRow> {
        let arena = self.get_arena();
        let mut rows = Vec::new();
        let mut stack = vec![VisibleRow {
            id: self.get_root(),
            depth: 0,
        }];

        while let Some(row) = stack.pop() {
            rows.push(row);
            if self.entry(row.id).is_some_and(|e| e.open) {
                // Reverse so the first child is popped first
                for child in row.id.children(arena).rev() {
                    stack.push(VisibleRow {
                        id: child,
                        depth: row.depth + 1,
                    });
                }
            }
        }

        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::EntryKind;
    use std::path::PathBuf;

    fn sample_tree() -> DirTree {
        let mut tree = DirTree::new("/r");
        tree.add_entry(PathBuf::from("/r/a"), EntryKind::Folder);
        tree.add_entry(PathBuf::from("/r/a/x.txt"), EntryKind::File);
        tree.add_entry(PathBuf::from("/r/a/sub"), EntryKind::Folder);
        tree.add_entry(PathBuf::from("/r/a/sub/deep.txt"), EntryKind::File);
        tree.add_entry(PathBuf::from("/r/b.txt"), EntryKind::File);
        tree
    }

    fn all_open(tree: &DirTree) -> Vec<bool> {
        tree.get_root()
            .descendants(tree.get_arena())
            .map(|id| tree.entry(id).unwrap().open)
            .collect()
    }

    #[test]
    fn test_expand_all_is_idempotent() {
        let mut tree = sample_tree();

        tree.expand_all();
        assert!(all_open(&tree).iter().all(|open| *open));

        tree.expand_all();
        assert!(all_open(&tree).iter().all(|open| *open));
        assert_eq!(tree.visible_rows().len(), tree.len());
    }

    #[test]
    fn test_collapse_all_is_idempotent() {
        let mut tree = sample_tree();
        tree.expand_all();

        tree.collapse_all();
        assert!(all_open(&tree).iter().all(|open| !*open));

        tree.collapse_all();
        assert!(all_open(&tree).iter().all(|open| !*open));
        assert_eq!(tree.visible_rows().len(), 1);
    }

    #[test]
    fn test_visible_rows_follow_open_flags() {
        let mut tree = sample_tree();

        let names = |tree: &DirTree| -> Vec<(String, usize)> {
            tree.visible_rows()
                .iter()
                .map(|row| (tree.entry(row.id).unwrap().name.clone(), row.depth))
                .collect()
        };

        assert_eq!(
            names(&tree),
            vec![("r".to_string(), 0), ("a".to_string(), 1), ("b.txt".to_string(), 1)]
        );

        let a = tree.get_node(&PathBuf::from("/r/a")).unwrap();
        assert!(tree.toggle(a));
        assert_eq!(
            names(&tree),
            vec![
                ("r".to_string(), 0),
                ("a".to_string(), 1),
                ("x.txt".to_string(), 2),
                ("sub".to_string(), 2),
                ("b.txt".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_files_cannot_be_toggled() {
        let mut tree = sample_tree();
        let file = tree.get_node(&PathBuf::from("/r/b.txt")).unwrap();

        assert!(!tree.toggle(file));
        assert!(!tree.entry(file).unwrap().open);
    }
}
