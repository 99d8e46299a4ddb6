/// Plain-text rendering of a tree for human inspection.
use crate::model::{DirectoryTree, EntryId};
use std::fmt::Write;

/// Render the tree one entry per line, indented two spaces per level:
///
/// ```text
/// root (Directory)
///   Album (Directory)
///     01.flac (File)
/// ```
pub fn render_tree(tree: &DirectoryTree) -> String {
    let mut out = String::new();
    let Some(root) = tree.root() else {
        return out;
    };

    let mut stack: Vec<(EntryId, usize)> = vec![(root, 0)];
    while let Some((id, depth)) = stack.pop() {
        let Some(entry) = tree.get(id) else {
            continue;
        };
        let kind = if entry.is_dir { "Directory" } else { "File" };
        let _ = writeln!(out, "{:indent$}{} ({kind})", "", entry.name, indent = depth * 2);
        for child in tree.children(id).into_iter().rev() {
            stack.push((child, depth + 1));
        }
    }
    out
}
