use std::sync::atomic::{AtomicU64, Ordering};

/// Per-bridge datapath counters, shared between the engine and the host.
#[derive(Debug, Default)]
pub struct BridgeStats {
    /// Frames discarded on the receive side.
    rx_dropped: AtomicU64,
    /// Frames discarded on the transmit side.
    tx_dropped: AtomicU64,
    /// End-station frames encapsulated into the fabric.
    encapsulated: AtomicU64,
    /// Fabric frames decapsulated for local delivery.
    decapsulated: AtomicU64,
    /// Unicast frames forwarded towards an adjacency.
    forwarded: AtomicU64,
    /// Copies emitted by distribution-tree replication.
    replicated: AtomicU64,
}

impl BridgeStats {
    #[inline]
    pub(crate) fn increment_rx_dropped(&self) {
        self.rx_dropped.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn increment_tx_dropped(&self) {
        self.tx_dropped.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn increment_encapsulated(&self) {
        self.encapsulated.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn increment_decapsulated(&self) {
        self.decapsulated.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn increment_forwarded(&self) {
        self.forwarded.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn increment_replicated(&self) {
        self.replicated.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn rx_dropped(&self) -> u64 {
        self.rx_dropped.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn tx_dropped(&self) -> u64 {
        self.tx_dropped.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn encapsulated(&self) -> u64 {
        self.encapsulated.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn decapsulated(&self) -> u64 {
        self.decapsulated.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn forwarded(&self) -> u64 {
        self.forwarded.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn replicated(&self) -> u64 {
        self.replicated.load(Ordering::Relaxed)
    }
}
