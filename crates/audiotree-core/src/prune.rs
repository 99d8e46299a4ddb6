/// Empty-directory pruning.
///
/// After filtering, directories that held only non-audio files are left
/// childless. Pruning walks the tree bottom-up and splices them out of their
/// parent's sibling list.
use crate::model::{DirectoryTree, EntryId};

/// Remove every directory under `node` that is childless once its own
/// subtree has been pruned, and return how many were removed.
///
/// Files are never removed. `node` itself is never evaluated, so a root that
/// ends up with no children is kept.
pub fn remove_empty_directories(tree: &mut DirectoryTree, node: EntryId) -> usize {
    let mut removed = 0;
    let mut prev: Option<EntryId> = None;
    let mut current = tree.get(node).and_then(|n| n.first_child);

    while let Some(child) = current {
        let Some(entry) = tree.get(child) else {
            break;
        };
        let next = entry.next_sibling;

        if entry.is_dir {
            removed += remove_empty_directories(tree, child);

            if tree.get(child).is_some_and(|c| c.is_childless()) {
                tree.remove_child(node, prev, child);
                removed += 1;
                current = next;
                continue;
            }
        }

        prev = Some(child);
        current = next;
    }

    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::IdSession;

    struct Fixture {
        tree: DirectoryTree,
        session: IdSession,
        root: EntryId,
    }

    impl Fixture {
        fn new() -> Self {
            let mut tree = DirectoryTree::with_capacity(16).unwrap();
            let mut session = IdSession::new();
            let root = tree.create_entry(&mut session, "root", true, None).unwrap();
            tree.set_root(root);
            Self {
                tree,
                session,
                root,
            }
        }

        fn add(&mut self, parent: EntryId, name: &str, is_dir: bool) -> EntryId {
            let id = self
                .tree
                .create_entry(&mut self.session, name, is_dir, Some(parent))
                .unwrap();
            self.tree.append_child(parent, id);
            id
        }
    }

    #[test]
    fn test_removes_nested_empty_directories() {
        let mut f = Fixture::new();
        let root = f.root;
        let keep = f.add(root, "keep", true);
        f.add(keep, "song.mp3", false);
        let outer = f.add(root, "outer", true);
        let inner = f.add(outer, "inner", true);
        f.add(inner, "deeper", true);

        // deeper, inner, outer all collapse.
        assert_eq!(remove_empty_directories(&mut f.tree, root), 3);
        assert_eq!(f.tree.child_names(root), vec!["keep"]);
        assert!(!f.tree.contains(outer));
        assert!(!f.tree.contains(inner));
        assert_eq!(f.tree.len(), 3);
    }

    #[test]
    fn test_files_are_never_removed() {
        let mut f = Fixture::new();
        let root = f.root;
        f.add(root, "a.flac", false);
        f.add(root, "b.flac", false);
        assert_eq!(remove_empty_directories(&mut f.tree, root), 0);
        assert_eq!(f.tree.child_names(root), vec!["a.flac", "b.flac"]);
    }

    #[test]
    fn test_childless_root_is_kept() {
        let mut f = Fixture::new();
        let root = f.root;
        f.add(root, "empty", true);
        assert_eq!(remove_empty_directories(&mut f.tree, root), 1);
        assert!(f.tree.contains(root));
        assert!(f.tree.get(root).unwrap().is_childless());
    }

    #[test]
    fn test_siblings_stay_linked_after_splicing() {
        let mut f = Fixture::new();
        let root = f.root;
        let first = f.add(root, "first", true);
        f.add(first, "1.mp3", false);
        f.add(root, "gap", true);
        let middle = f.add(root, "middle", true);
        f.add(middle, "2.mp3", false);
        f.add(root, "tail", true);

        assert_eq!(remove_empty_directories(&mut f.tree, root), 2);
        assert_eq!(f.tree.child_names(root), vec!["first", "middle"]);
        assert_eq!(f.tree.get(root).unwrap().last_child, Some(middle));

        let late = f.add(root, "late", false);
        assert_eq!(f.tree.children(root).last(), Some(&late));
    }
}
