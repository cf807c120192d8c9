use std::sync::atomic::{AtomicU16, Ordering};

use trill_wire::Nickname;

use crate::NeighborTable;

/// Per-bridge RBridge state.
///
/// Lives behind the bridge's atomic attachment and exists exactly while
/// TRILL is enabled. The nickname scalars are read by the data plane without
/// locks; a stale read at worst classifies a frame as "no local nickname
/// yet" and drops it.
pub struct Rbr {
    local_nick: AtomicU16,
    tree_root: AtomicU16,
    nodes: NeighborTable,
}

impl Rbr {
    pub(crate) fn new() -> Self {
        Self {
            local_nick: AtomicU16::new(Nickname::NONE.raw()),
            tree_root: AtomicU16::new(Nickname::NONE.raw()),
            nodes: NeighborTable::new(),
        }
    }

    /// Nickname assigned to this RBridge, [`Nickname::NONE`] until the
    /// control plane installs one.
    #[inline]
    pub fn local_nick(&self) -> Nickname {
        Nickname::new(self.local_nick.load(Ordering::Relaxed))
    }

    pub(crate) fn set_local_nick(&self, nick: Nickname) {
        self.local_nick.store(nick.raw(), Ordering::Relaxed);
    }

    /// The nominated distribution-tree root.
    #[inline]
    pub fn tree_root(&self) -> Nickname {
        Nickname::new(self.tree_root.load(Ordering::Relaxed))
    }

    pub(crate) fn set_tree_root(&self, nick: Nickname) {
        self.tree_root.store(nick.raw(), Ordering::Relaxed);
    }

    #[inline]
    pub fn nodes(&self) -> &NeighborTable {
        &self.nodes
    }
}
