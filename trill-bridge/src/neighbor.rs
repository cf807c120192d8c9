use std::{fmt, sync::Arc};

use arc_swap::ArcSwapOption;

use trill_wire::{MacAddr, Nickname};

/// Control-plane description of one remote RBridge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeighborInfo {
    /// Outer MAC of the directly adjacent RBridge on the link towards this
    /// neighbour.
    pub adj_snpa: MacAddr,
    adjacencies: Vec<Nickname>,
    dt_roots: Vec<Nickname>,
}

impl NeighborInfo {
    pub fn new(adj_snpa: MacAddr) -> Self {
        Self { adj_snpa, adjacencies: Vec::new(), dt_roots: Vec::new() }
    }

    /// Sets the nicknames reachable through this node when it roots a
    /// distribution tree.
    pub fn with_adjacencies(mut self, adjacencies: Vec<Nickname>) -> Self {
        self.adjacencies = adjacencies;
        self
    }

    /// Sets the distribution-tree roots this node advertises.
    pub fn with_dt_roots(mut self, dt_roots: Vec<Nickname>) -> Self {
        self.dt_roots = dt_roots;
        self
    }

    #[inline]
    pub fn adjacencies(&self) -> &[Nickname] {
        &self.adjacencies
    }

    #[inline]
    pub fn dt_roots(&self) -> &[Nickname] {
        &self.dt_roots
    }
}

/// A reference-counted neighbour record.
///
/// The table slot holds one `Arc` reference; every lookup hands out another.
/// A record evicted from the table therefore stays valid for any in-flight
/// forwarding operation that captured it, and is destroyed when the last
/// handle drops.
#[derive(Debug)]
pub struct RbrNode {
    ni: NeighborInfo,
}

impl RbrNode {
    pub(crate) fn new(ni: NeighborInfo) -> Arc<Self> {
        Arc::new(Self { ni })
    }

    #[inline]
    pub fn info(&self) -> &NeighborInfo {
        &self.ni
    }
}

/// The nickname-indexed neighbour database.
///
/// One slot per point in the 16-bit nickname space; only valid nicknames are
/// ever occupied. Readers are wait-free: a lookup is an acquire-load of the
/// slot plus a reference-count bump, so a reader observing a slot also
/// observes a fully initialised record. Writers serialize on the owning
/// bridge's lock.
pub struct NeighborTable {
    slots: Box<[ArcSwapOption<RbrNode>]>,
}

impl NeighborTable {
    const SLOTS: usize = 1 << 16;

    pub(crate) fn new() -> Self {
        let mut slots = Vec::with_capacity(Self::SLOTS);
        slots.resize_with(Self::SLOTS, ArcSwapOption::empty);
        Self { slots: slots.into_boxed_slice() }
    }

    /// Returns an owned handle on the neighbour, or `None` for invalid
    /// nicknames and empty slots.
    pub fn lookup(&self, nick: Nickname) -> Option<Arc<RbrNode>> {
        if !nick.is_valid() {
            return None;
        }
        self.slots[nick.raw() as usize].load_full()
    }

    /// Replaces the slot, releasing the previous occupant's table-held
    /// reference. The nickname must be valid.
    pub(crate) fn install(&self, nick: Nickname, node: Arc<RbrNode>) {
        debug_assert!(nick.is_valid());
        self.slots[nick.raw() as usize].store(Some(node));
    }

    /// Clears the slot; returns whether it was occupied.
    pub(crate) fn evict(&self, nick: Nickname) -> bool {
        if !nick.is_valid() {
            return false;
        }
        self.slots[nick.raw() as usize].swap(None).is_some()
    }

    pub(crate) fn evict_all(&self) {
        for slot in self.slots.iter() {
            slot.store(None);
        }
    }

    /// Number of occupied slots. Walks the table; intended for inspection,
    /// not the data path.
    pub fn occupied(&self) -> usize {
        self.slots.iter().filter(|slot| slot.load().is_some()).count()
    }
}

impl fmt::Debug for NeighborTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NeighborTable").field("occupied", &self.occupied()).finish()
    }
}
