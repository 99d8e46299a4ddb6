/// A single node of the directory tree.
///
/// Entries live in the id-addressed arena owned by [`super::DirectoryTree`].
/// Parent-child relationships use ids rather than pointers, so there are no
/// back-references to keep alive and the persisted form maps onto the arena
/// one record per slot.
use compact_str::CompactString;

/// Stable identity of an entry.
///
/// Builder ids start at 1 and grow by one per materialised entry within a
/// build session. Reloaded ids are whatever the persisted file says.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(pub u32);

impl EntryId {
    /// Return the id as a `usize` for slot indexing.
    #[inline]
    pub fn idx(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single file or directory in the tree.
///
/// Children form a singly-linked list through [`next_sibling`](Entry::next_sibling),
/// with `last_child` cached so both front insertion (build) and back
/// insertion (reload) are O(1).
#[derive(Debug, Clone)]
pub struct Entry {
    pub id: EntryId,

    /// Owning directory. `None` is the "no parent" sentinel of the root,
    /// persisted as `-1`.
    pub parent_id: Option<EntryId>,

    /// Leaf name exactly as listed on disk.
    pub name: CompactString,

    /// Parent path and name joined by [`join_path`].
    pub full_path: String,

    pub is_dir: bool,

    /// Reserved for consumers such as a playback queue; the core only
    /// initialises it.
    pub is_enqueued: bool,

    pub first_child: Option<EntryId>,
    pub last_child: Option<EntryId>,
    pub next_sibling: Option<EntryId>,
}

impl Entry {
    /// Create an unlinked entry with an empty path.
    pub fn new(id: EntryId, name: CompactString, is_dir: bool, parent_id: Option<EntryId>) -> Self {
        Self {
            id,
            parent_id,
            name,
            full_path: String::new(),
            is_dir,
            is_enqueued: false,
            first_child: None,
            last_child: None,
            next_sibling: None,
        }
    }

    /// `true` if no child is linked under this entry.
    #[inline]
    pub fn is_childless(&self) -> bool {
        self.first_child.is_none()
    }
}

/// Join `parent` and `name` with exactly one `/` between them.
///
/// One trailing separator on `parent` is absorbed so a start path given as
/// `music/` does not produce `music//track.mp3`. Empty sides still get the
/// separator: `join_path("", "")` is `"/"`, which is the stored path of the
/// synthetic build root.
pub fn join_path(parent: &str, name: &str) -> String {
    let parent = parent.strip_suffix('/').unwrap_or(parent);
    let mut path = String::with_capacity(parent.len() + name.len() + 1);
    path.push_str(parent);
    path.push('/');
    path.push_str(name);
    path
}

/// Owns the identity counter for exactly one build.
///
/// A fresh session hands out 1 first. Sessions are never shared; every
/// build creates its own.
#[derive(Debug, Default)]
pub struct IdSession {
    last_used: u32,
}

impl IdSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the next id of this session.
    pub fn next_id(&mut self) -> EntryId {
        self.last_used += 1;
        EntryId(self.last_used)
    }

    /// Last id handed out, 0 if none.
    pub fn last_used(&self) -> u32 {
        self.last_used
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_path_degenerate_root() {
        assert_eq!(join_path("", ""), "/");
    }

    #[test]
    fn test_join_path_start_path_with_empty_name() {
        assert_eq!(join_path("/music", ""), "/music/");
        assert_eq!(join_path("/music/", ""), "/music/");
    }

    #[test]
    fn test_join_path_single_separator() {
        assert_eq!(join_path("/music", "Album"), "/music/Album");
        assert_eq!(join_path("/music/", "Album"), "/music/Album");
        assert_eq!(join_path("", "Album"), "/Album");
    }

    #[test]
    fn test_session_starts_at_one() {
        let mut session = IdSession::new();
        assert_eq!(session.last_used(), 0);
        assert_eq!(session.next_id(), EntryId(1));
        assert_eq!(session.next_id(), EntryId(2));
        assert_eq!(session.last_used(), 2);
    }

    #[test]
    fn test_sessions_are_independent() {
        let mut first = IdSession::new();
        first.next_id();
        first.next_id();
        let mut second = IdSession::new();
        assert_eq!(second.next_id(), EntryId(1));
    }

    #[test]
    fn test_new_entry_defaults() {
        let entry = Entry::new(EntryId(7), CompactString::new("a.flac"), false, Some(EntryId(3)));
        assert!(!entry.is_enqueued);
        assert!(entry.is_childless());
        assert!(entry.full_path.is_empty());
        assert_eq!(entry.parent_id, Some(EntryId(3)));
    }
}
