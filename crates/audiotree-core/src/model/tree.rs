/// Arena-backed directory tree.
///
/// Every entry lives in one [`SparseIdIndex`] addressed by its id. Child
/// lists are linked through ids, so removing or dropping entries never
/// leaves a dangling reference, and reload can wire up a parent by looking
/// its id up directly.
use super::entry::{join_path, Entry, EntryId, IdSession};
use super::sparse::SparseIdIndex;
use crate::error::{Result, TreeError};
use compact_str::CompactString;

/// A filtered mirror of a directory subtree.
///
/// Dropping the tree tears down every entry.
#[derive(Debug, Clone)]
pub struct DirectoryTree {
    entries: SparseIdIndex,
    root: Option<EntryId>,
}

impl DirectoryTree {
    /// Create an empty tree with the default initial slot count.
    pub fn new() -> Result<Self> {
        Ok(Self {
            entries: SparseIdIndex::new()?,
            root: None,
        })
    }

    /// Create an empty tree with `slots` pre-allocated id slots.
    pub fn with_capacity(slots: usize) -> Result<Self> {
        Ok(Self {
            entries: SparseIdIndex::with_slots(slots)?,
            root: None,
        })
    }

    /// Create an empty tree whose id table never grows past `max_slots`.
    pub fn with_slot_limit(slots: usize, max_slots: usize) -> Result<Self> {
        Ok(Self {
            entries: SparseIdIndex::with_slot_limit(slots, max_slots)?,
            root: None,
        })
    }

    /// Allocate a new entry with the next id of `session`.
    ///
    /// The entry starts unlinked with an empty `full_path`; callers attach it
    /// with [`add_child`](Self::add_child) and give it a path with
    /// [`set_full_path`](Self::set_full_path).
    pub fn create_entry(
        &mut self,
        session: &mut IdSession,
        name: &str,
        is_dir: bool,
        parent: Option<EntryId>,
    ) -> Result<EntryId> {
        let entry = Entry::new(session.next_id(), CompactString::new(name), is_dir, parent);
        self.insert(entry)?
            .map_err(|rejected| TreeError::DuplicateId { id: rejected.id.0 })
    }

    /// Store a fully-formed entry at the slot of its id.
    ///
    /// Returns the entry back if another entry already owns that id.
    pub fn insert(&mut self, entry: Entry) -> Result<std::result::Result<EntryId, Entry>> {
        self.entries.insert(entry)
    }

    /// Set `full_path` of `id` to `parent_path` and `name` joined by one `/`.
    pub fn set_full_path(&mut self, id: EntryId, parent_path: &str, name: &str) {
        if let Some(entry) = self.entries.get_mut(id) {
            entry.full_path = join_path(parent_path, name);
        }
    }

    /// Attach `child` as the first child of `parent`.
    ///
    /// This is O(1); the most recently added child comes first. Ordering
    /// is the caller's job.
    pub fn add_child(&mut self, parent: EntryId, child: EntryId) {
        let Some(old_first) = self.entries.get(parent).map(|p| p.first_child) else {
            return;
        };
        if let Some(node) = self.entries.get_mut(child) {
            node.next_sibling = old_first;
            node.parent_id = Some(parent);
        }
        if let Some(node) = self.entries.get_mut(parent) {
            node.first_child = Some(child);
            if node.last_child.is_none() {
                node.last_child = Some(child);
            }
        }
    }

    /// Attach `child` as the last child of `parent`, O(1).
    pub fn append_child(&mut self, parent: EntryId, child: EntryId) {
        let Some(old_last) = self.entries.get(parent).map(|p| p.last_child) else {
            return;
        };
        if let Some(node) = self.entries.get_mut(child) {
            node.next_sibling = None;
            node.parent_id = Some(parent);
        }
        match old_last {
            Some(last) => {
                if let Some(node) = self.entries.get_mut(last) {
                    node.next_sibling = Some(child);
                }
            }
            None => {
                if let Some(node) = self.entries.get_mut(parent) {
                    node.first_child = Some(child);
                }
            }
        }
        if let Some(node) = self.entries.get_mut(parent) {
            node.last_child = Some(child);
        }
    }

    /// Unlink `child` from `parent`'s sibling list and drop its subtree.
    ///
    /// `prev` is the sibling directly before `child`, `None` when `child` is
    /// the first child. Returns the number of entries dropped.
    pub fn remove_child(&mut self, parent: EntryId, prev: Option<EntryId>, child: EntryId) -> usize {
        let next = self.entries.get(child).and_then(|c| c.next_sibling);
        match prev {
            Some(prev) => {
                if let Some(node) = self.entries.get_mut(prev) {
                    node.next_sibling = next;
                }
            }
            None => {
                if let Some(node) = self.entries.get_mut(parent) {
                    node.first_child = next;
                }
            }
        }
        if let Some(node) = self.entries.get_mut(parent) {
            if node.last_child == Some(child) {
                node.last_child = prev;
            }
        }
        self.drop_subtree(child)
    }

    /// Drop `id` and all of its descendants from the arena.
    fn drop_subtree(&mut self, id: EntryId) -> usize {
        let mut dropped = 0;
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(entry) = self.entries.take(current) else {
                continue;
            };
            dropped += 1;
            let mut child = entry.first_child;
            while let Some(c) = child {
                stack.push(c);
                child = self.entries.get(c).and_then(|n| n.next_sibling);
            }
        }
        dropped
    }

    /// Root of the tree, if one has been set.
    #[inline]
    pub fn root(&self) -> Option<EntryId> {
        self.root
    }

    /// Make `id` the root. Its `parent_id` becomes the "no parent" sentinel.
    pub fn set_root(&mut self, id: EntryId) {
        if let Some(entry) = self.entries.get_mut(id) {
            entry.parent_id = None;
            self.root = Some(id);
        }
    }

    /// Get the entry with the given id.
    #[inline]
    pub fn get(&self, id: EntryId) -> Option<&Entry> {
        self.entries.get(id)
    }

    /// Mutable access, e.g. for consumers toggling `is_enqueued`.
    #[inline]
    pub fn get_mut(&mut self, id: EntryId) -> Option<&mut Entry> {
        self.entries.get_mut(id)
    }

    #[inline]
    pub fn contains(&self, id: EntryId) -> bool {
        self.entries.contains(id)
    }

    /// Direct children of `parent`, in sibling order.
    pub fn children(&self, parent: EntryId) -> Vec<EntryId> {
        let mut children = Vec::new();
        let mut child = self.entries.get(parent).and_then(|p| p.first_child);
        while let Some(id) = child {
            children.push(id);
            child = self.entries.get(id).and_then(|c| c.next_sibling);
        }
        children
    }

    /// Names of the direct children of `parent`, in sibling order.
    pub fn child_names(&self, parent: EntryId) -> Vec<&str> {
        self.children(parent)
            .into_iter()
            .filter_map(|id| self.entries.get(id))
            .map(|e| e.name.as_str())
            .collect()
    }

    /// Find a direct child of `parent` by name.
    pub fn find_child(&self, parent: EntryId, name: &str) -> Option<EntryId> {
        self.children(parent)
            .into_iter()
            .find(|&id| self.entries.get(id).is_some_and(|e| e.name == name))
    }

    /// All live entries in ascending id order, reachable from the root or not.
    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter()
    }

    /// Number of addressable id slots.
    #[inline]
    pub fn slot_count(&self) -> usize {
        self.entries.slot_count()
    }

    /// Total number of live entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the tree contains no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
