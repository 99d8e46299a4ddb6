/// Tree serializer.
///
/// Traversal only borrows the tree, so a tree can be written any number of
/// times. [`free_and_write`] adds the ownership-taking variant: the tree is
/// disposed of once its records are on disk, and handed back untouched when
/// the destination cannot be written.
use super::{is_representable_name, tsv_writer, NO_PARENT};
use crate::error::{Result, TreeError};
use crate::model::{DirectoryTree, EntryId};
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

#[derive(Serialize)]
struct Record<'a> {
    id: u32,
    name: &'a str,
    is_dir: u8,
    parent_id: i64,
}

/// `free_and_write` failed; the tree is returned to the caller intact.
#[derive(Debug, thiserror::Error)]
#[error("failed to save tree: {source}")]
pub struct SaveError {
    pub tree: DirectoryTree,
    #[source]
    pub source: TreeError,
}

/// Write the subtree of `node` in pre-order.
///
/// `node`'s record carries `parent_id` (`None` writes [`NO_PARENT`]); every
/// descendant carries the id of its actual parent. Children are visited in
/// their current sibling order. Returns the number of records written.
pub fn write_subtree<W: Write>(
    tree: &DirectoryTree,
    node: EntryId,
    parent_id: Option<EntryId>,
    out: &mut csv::Writer<W>,
) -> Result<usize> {
    let mut written = 0;
    let mut stack = vec![(node, parent_id)];

    while let Some((id, parent)) = stack.pop() {
        let Some(entry) = tree.get(id) else {
            continue;
        };
        if !is_representable_name(&entry.name) {
            return Err(TreeError::UnrepresentableName {
                id: id.0,
                name: entry.name.to_string(),
            });
        }

        out.serialize(Record {
            id: id.0,
            name: &entry.name,
            is_dir: u8::from(entry.is_dir),
            parent_id: parent.map_or(NO_PARENT, |p| i64::from(p.0)),
        })?;
        written += 1;

        // Reversed so the first child is popped first.
        for child in tree.children(id).into_iter().rev() {
            stack.push((child, Some(id)));
        }
    }

    Ok(written)
}

/// Write the whole tree, starting at the root with [`NO_PARENT`].
pub fn write_tree<W: Write>(tree: &DirectoryTree, sink: W) -> Result<usize> {
    let mut out = tsv_writer(sink);
    let written = match tree.root() {
        Some(root) => write_subtree(tree, root, None, &mut out)?,
        None => 0,
    };
    out.flush().map_err(csv::Error::from)?;
    Ok(written)
}

/// Write the tree to `path`, replacing any existing file.
///
/// Records go to a temporary file in the same directory, which is renamed
/// over `path` only once every record is written. A failed write leaves the
/// previous file untouched.
pub fn write_tree_to_path(tree: &DirectoryTree, path: &Path) -> Result<usize> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut staged = NamedTempFile::new_in(dir).map_err(|e| TreeError::io(dir, e))?;
    let written = write_tree(tree, staged.as_file_mut())?;
    staged
        .persist(path)
        .map_err(|e| TreeError::io(path, e.error))?;
    debug!("Wrote {} records to {}", written, path.display());
    Ok(written)
}

/// Persist the tree to `path`, then dispose of it.
///
/// On success the tree is gone and the number of records is returned. If
/// the destination cannot be opened or written, nothing is disposed of:
/// the [`SaveError`] carries the tree back.
pub fn free_and_write(tree: DirectoryTree, path: &Path) -> std::result::Result<usize, SaveError> {
    match write_tree_to_path(&tree, path) {
        Ok(written) => {
            drop(tree);
            info!("Saved {} entries to {}", written, path.display());
            Ok(written)
        }
        Err(source) => {
            warn!("Could not save tree to {}: {source}", path.display());
            Err(SaveError { tree, source })
        }
    }
}
