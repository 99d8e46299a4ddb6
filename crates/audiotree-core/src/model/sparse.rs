/// Directly-addressed entry table keyed by [`EntryId`].
///
/// Slot `n` holds the entry whose id is `n`. Ids coming from a persisted file
/// can be large, sparse and out of order, so the table grows on demand to
/// `id + GROWTH_HEADROOM` slots with every newly exposed slot empty. Growth
/// is fallible: an allocation failure, or growth past an optional slot
/// limit, is reported as [`TreeError::ResourceExhausted`] instead of
/// aborting the process.
use super::entry::{Entry, EntryId};
use crate::error::{Result, TreeError};

/// Slots allocated up front by [`SparseIdIndex::new`].
pub const INITIAL_SLOTS: usize = 1_000;

/// Extra slots exposed past an out-of-range id when growing.
pub const GROWTH_HEADROOM: usize = 100;

#[derive(Debug, Clone)]
pub struct SparseIdIndex {
    slots: Vec<Option<Entry>>,
    occupied: usize,
    max_slots: usize,
}

impl SparseIdIndex {
    /// Create a table with [`INITIAL_SLOTS`] empty slots.
    pub fn new() -> Result<Self> {
        Self::with_slots(INITIAL_SLOTS)
    }

    /// Create a table with `slots` empty slots.
    pub fn with_slots(slots: usize) -> Result<Self> {
        Self::with_slot_limit(slots, usize::MAX)
    }

    /// Create a table with `slots` empty slots that never grows past
    /// `max_slots`. Useful when loading files from an untrusted source.
    pub fn with_slot_limit(slots: usize, max_slots: usize) -> Result<Self> {
        let mut table = Self {
            slots: Vec::new(),
            occupied: 0,
            max_slots,
        };
        table.resize_to(slots)?;
        Ok(table)
    }

    /// Make sure `id` is addressable, growing to `id + GROWTH_HEADROOM` slots
    /// when it is not.
    pub fn ensure(&mut self, id: EntryId) -> Result<()> {
        if id.idx() < self.slots.len() {
            return Ok(());
        }
        let requested = id
            .idx()
            .checked_add(GROWTH_HEADROOM)
            .ok_or(TreeError::ResourceExhausted { requested: usize::MAX })?;
        self.resize_to(requested)
    }

    fn resize_to(&mut self, requested: usize) -> Result<()> {
        if requested > self.max_slots {
            return Err(TreeError::ResourceExhausted { requested });
        }
        let additional = requested.saturating_sub(self.slots.len());
        self.slots
            .try_reserve(additional)
            .map_err(|_| TreeError::ResourceExhausted { requested })?;
        self.slots.resize_with(requested, || None);
        Ok(())
    }

    /// Store `entry` at the slot of its id, growing first if needed.
    ///
    /// Returns the entry back if the slot is already occupied.
    pub fn insert(&mut self, entry: Entry) -> Result<std::result::Result<EntryId, Entry>> {
        let id = entry.id;
        self.ensure(id)?;
        let slot = &mut self.slots[id.idx()];
        if slot.is_some() {
            return Ok(Err(entry));
        }
        *slot = Some(entry);
        self.occupied += 1;
        Ok(Ok(id))
    }

    /// Empty the slot of `id`, returning what it held.
    pub fn take(&mut self, id: EntryId) -> Option<Entry> {
        let taken = self.slots.get_mut(id.idx())?.take();
        if taken.is_some() {
            self.occupied -= 1;
        }
        taken
    }

    #[inline]
    pub fn get(&self, id: EntryId) -> Option<&Entry> {
        self.slots.get(id.idx())?.as_ref()
    }

    #[inline]
    pub fn get_mut(&mut self, id: EntryId) -> Option<&mut Entry> {
        self.slots.get_mut(id.idx())?.as_mut()
    }

    #[inline]
    pub fn contains(&self, id: EntryId) -> bool {
        self.get(id).is_some()
    }

    /// Number of addressable slots, occupied or not.
    #[inline]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Number of occupied slots.
    #[inline]
    pub fn len(&self) -> usize {
        self.occupied
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.occupied == 0
    }

    /// Occupied entries in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.slots.iter().filter_map(Option::as_ref)
    }
}
