use jwalk::{Parallelism, WalkDir};
use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::error::{Result, TreeError};
use crate::tree::{DirTree, EntryKind};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WalkStats {
    pub folders: u64,
    pub files: u64,
    /// Folders whose listing failed and were left empty
    pub skipped: u64,
    pub duration_ms: u128,
}

/// Eager, single-threaded folder walker.
///
/// Entries come back depth-first with siblings sorted by file name, which is
/// exactly the order the tree wants them appended in.
/// Symlinks are followed: a link to a folder is listed and walked as that
/// folder.
#[derive(Debug, Clone, Default)]
pub struct DirWalker;

impl DirWalker {
    pub fn new() -> Self {
        Self
    }

    /// Walk `root` and build its complete tree before returning.
    pub fn walk<P: AsRef<Path>>(&self, root: P) -> Result<(DirTree, WalkStats)> {
        let start = Instant::now();
        let root_path = resolve_root(root.as_ref())?;

        let mut tree = DirTree::new(&root_path);
        let mut stats = WalkStats::default();
        let mut unreadable: HashSet<PathBuf> = HashSet::new();

        let walker = WalkDir::new(&root_path)
            .skip_hidden(false)
            .follow_links(true)
            .sort(true)
            .parallelism(Parallelism::Serial);

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    let permission = err
                        .io_error()
                        .is_some_and(|e| e.kind() == ErrorKind::PermissionDenied);
                    if !permission {
                        tracing::debug!(error = %err, "Skipping unreadable entry");
                    }
                    if let Some(path) = err.path() {
                        unreadable.insert(path.to_path_buf());
                    }
                    continue;
                }
            };

            if entry.read_children_error.is_some() {
                unreadable.insert(entry.path());
            }

            if entry.depth == 0 {
                continue;
            }

            let kind = if entry.file_type().is_dir() {
                EntryKind::Folder
            } else {
                EntryKind::File
            };

            if tree.add_entry(entry.path(), kind).is_some() {
                match kind {
                    EntryKind::Folder => stats.folders += 1,
                    EntryKind::File => stats.files += 1,
                }
            }
        }

        stats.skipped = unreadable.len() as u64;
        stats.duration_ms = start.elapsed().as_millis();

        tracing::info!(
            root = %root_path.display(),
            folders = stats.folders,
            files = stats.files,
            skipped = stats.skipped,
            duration_ms = stats.duration_ms as u64,
            "Walk finished"
        );

        Ok((tree, stats))
    }
}

/// Make `root` absolute and check that it is a folder.
fn resolve_root(root: &Path) -> Result<PathBuf> {
    let absolute = std::path::absolute(root).map_err(|source| TreeError::Io {
        path: root.to_path_buf(),
        source,
    })?;

    let metadata = fs::metadata(&absolute).map_err(|source| {
        if source.kind() == ErrorKind::NotFound {
            TreeError::NotFound(absolute.clone())
        } else {
            TreeError::Io {
                path: absolute.clone(),
                source,
            }
        }
    })?;

    if !metadata.is_dir() {
        return Err(TreeError::NotADirectory(absolute));
    }

    Ok(absolute)
}
