//! Tree builder — walks a start directory and materialises the audio tree.
//!
//! The walk is a serial, depth-first `jwalk` traversal with symlinks
//! followed, so every entry is classified by what `stat` reports. Each
//! directory listing is filtered and ordered inside `process_read_dir`
//! before `jwalk` yields it:
//!
//! - names starting with `.` are dropped;
//! - directories are always kept, regular files only when their extension
//!   is in the [`AudioExtensions`] allow-list, anything else is dropped;
//! - survivors are sorted with [`ordering::library_sort_key`].
//!
//! Entries are then attached with [`DirectoryTree::add_child`] in the order
//! they are yielded. Front insertion reverses that order, which is what
//! produces the final "marker names first, ascending" sibling order.

pub mod ordering;

use crate::error::Result;
use crate::filter::AudioExtensions;
use crate::model::{join_path, DirectoryTree, EntryId, IdSession};
use crate::persist::is_representable_name;
use crate::prune::remove_empty_directories;
use jwalk::DirEntry;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Name of the synthetic root entry.
pub const ROOT_NAME: &str = "root";

/// Result of a raw build, before pruning.
#[derive(Debug)]
pub struct BuiltTree {
    pub tree: DirectoryTree,
    /// Qualifying entries materialised under the start path, root excluded.
    pub entries: usize,
    /// Entries that could not be read and directories that could not be
    /// listed, the start path included.
    pub skipped: usize,
}

/// Result of [`create_directory_tree`]: a built and pruned tree.
#[derive(Debug)]
pub struct LibraryScan {
    pub tree: DirectoryTree,
    /// Qualifying entries left after pruning, root excluded.
    pub entries: usize,
}

/// Builds one tree. Owns the id session of that build, so ids start at 1
/// for every builder and are never shared between builds.
pub struct TreeBuilder {
    audio: Arc<AudioExtensions>,
    session: IdSession,
}

impl TreeBuilder {
    pub fn new(audio: AudioExtensions) -> Self {
        Self {
            audio: Arc::new(audio),
            session: IdSession::new(),
        }
    }

    /// Walk `start_path` and return the unpruned tree.
    ///
    /// A start path or subdirectory that cannot be listed is logged and
    /// contributes nothing; entries attached before the failure are kept.
    /// Only a failure to grow the arena is an error.
    pub fn build(mut self, start_path: &Path) -> Result<BuiltTree> {
        let started = Instant::now();
        info!("Building audio tree of {}", start_path.display());

        let mut tree = DirectoryTree::new()?;
        let root = tree.create_entry(&mut self.session, ROOT_NAME, true, None)?;
        tree.set_root(root);
        tree.set_full_path(root, "", "");

        let start_str = start_path.to_string_lossy().into_owned();

        let audio = Arc::clone(&self.audio);
        let walker = jwalk::WalkDir::new(start_path)
            .skip_hidden(false)
            .follow_links(true)
            .parallelism(jwalk::Parallelism::Serial)
            .process_read_dir(move |depth, _path, _read_dir_state, children| {
                // `None` is the pseudo-listing that holds the start path itself.
                if depth.is_none() {
                    return;
                }
                retain_qualifying(&audio, children);
                children.sort_by_cached_key(|child| match child {
                    Ok(entry) => (
                        false,
                        ordering::library_sort_key(&entry.file_name.to_string_lossy()),
                    ),
                    Err(_) => (true, ordering::library_sort_key("")),
                });
            });

        // Directory path -> entry, for the lifetime of this walk only.
        let mut dir_map: HashMap<PathBuf, EntryId> = HashMap::new();
        dir_map.insert(start_path.to_path_buf(), root);

        let mut entries = 0usize;
        let mut skipped = 0usize;

        for entry_result in walker {
            let entry = match entry_result {
                Ok(e) => e,
                Err(err) => {
                    skipped += 1;
                    warn!("Skipping unreadable entry: {err}");
                    continue;
                }
            };

            // jwalk reports a failed listing on the directory entry itself.
            if let Some(err) = &entry.read_children_error {
                skipped += 1;
                warn!("Cannot list {}: {err}", entry.path().display());
            }

            if entry.depth == 0 {
                if !entry.file_type.is_dir() {
                    warn!("{} is not a directory", start_path.display());
                }
                continue;
            }

            let Some(&parent) = dir_map.get(entry.parent_path()) else {
                debug!("No parent entry for {}, skipping", entry.path().display());
                continue;
            };

            let name = entry.file_name.to_string_lossy();
            let is_dir = entry.file_type.is_dir();

            // The root stores the degenerate "/" path, so its direct children
            // are anchored at the start path instead.
            let full_path = {
                let base = if parent == root {
                    start_str.as_str()
                } else {
                    tree.get(parent).map_or("", |p| p.full_path.as_str())
                };
                join_path(base, &name)
            };

            let id = tree.create_entry(&mut self.session, &name, is_dir, Some(parent))?;
            if let Some(node) = tree.get_mut(id) {
                node.full_path = full_path;
            }
            tree.add_child(parent, id);
            entries += 1;

            if is_dir {
                dir_map.insert(entry.path(), id);
            }
        }

        debug!(
            "Walk complete: {} entries, {} skipped, last id {} in {:?}",
            entries,
            skipped,
            self.session.last_used(),
            started.elapsed()
        );

        Ok(BuiltTree {
            tree,
            entries,
            skipped,
        })
    }
}

/// Build the tree of `start_path` and prune directories left empty.
pub fn create_directory_tree(start_path: &Path, audio: AudioExtensions) -> Result<LibraryScan> {
    let BuiltTree {
        mut tree, entries, ..
    } = TreeBuilder::new(audio).build(start_path)?;
    let removed = match tree.root() {
        Some(root) => remove_empty_directories(&mut tree, root),
        None => 0,
    };
    let entries = entries.saturating_sub(removed);
    info!(
        "Audio tree of {} ready: {} entries ({} empty directories pruned)",
        start_path.display(),
        entries,
        removed
    );
    Ok(LibraryScan { tree, entries })
}

/// `true` for names the builder may list at all. Hidden names (which
/// include `.` and `..`) never are.
pub fn is_listable_name(name: &str) -> bool {
    !name.is_empty() && !name.starts_with('.')
}

/// Drop children that can never become entries. Errors are kept so the
/// walk loop can report them.
fn retain_qualifying(
    audio: &AudioExtensions,
    children: &mut Vec<std::result::Result<DirEntry<((), ())>, jwalk::Error>>,
) {
    children.retain(|child| {
        let Ok(entry) = child else {
            return true;
        };
        let name = entry.file_name.to_string_lossy();
        if !is_listable_name(&name) {
            return false;
        }
        if !is_representable_name(&name) {
            warn!("Skipping {}: name cannot be saved", entry.path().display());
            return false;
        }
        if entry.file_type.is_dir() {
            true
        } else if entry.file_type.is_file() {
            audio.matches_file_name(&name)
        } else {
            false
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_names_are_not_listable() {
        assert!(!is_listable_name("."));
        assert!(!is_listable_name(".."));
        assert!(!is_listable_name(".DS_Store"));
        assert!(!is_listable_name(""));
        assert!(is_listable_name("_hidden_looking"));
        assert!(is_listable_name("Album"));
    }

    #[test]
    fn test_missing_start_path_yields_root_only() {
        let built = TreeBuilder::new(AudioExtensions::default())
            .build(Path::new("/nonexistent/audiotree/start"))
            .unwrap();
        assert_eq!(built.entries, 0);
        assert!(built.skipped > 0);
        assert_eq!(built.tree.len(), 1);
        let root = built.tree.root().unwrap();
        assert_eq!(root, EntryId(1));
        let root_entry = built.tree.get(root).unwrap();
        assert_eq!(root_entry.name, ROOT_NAME);
        assert_eq!(root_entry.full_path, "/");
        assert!(root_entry.is_dir);
        assert_eq!(root_entry.parent_id, None);
    }
}
