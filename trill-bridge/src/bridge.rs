use std::{sync::Arc, time::Duration};

use arc_swap::ArcSwapOption;
use parking_lot::Mutex;
use tracing::warn;

use trill_common::RateLimit;
use trill_wire::{MacAddr, Nickname};

use crate::{BridgeStats, ControlError, DropReason, Host, NeighborInfo, Rbr, RbrNode};

/// Hop count written into freshly encapsulated frames when not overridden:
/// the maximum the 6-bit field can carry.
pub const DEFAULT_HOP_COUNT: u8 = 0x3f;

/// Tunables for TRILL processing on a bridge.
#[derive(Debug, Clone)]
pub struct RbridgeOptions {
    /// Initial hop count for encapsulated frames.
    pub(crate) hop_count: u8,
    /// Whether the virtual-network tagging extension is in use.
    pub(crate) vnt: bool,
    /// Window and burst for rate-limited datapath warnings.
    warn_window: Duration,
    warn_burst: u32,
}

impl Default for RbridgeOptions {
    fn default() -> Self {
        Self {
            hop_count: DEFAULT_HOP_COUNT,
            vnt: false,
            warn_window: Duration::from_secs(5),
            warn_burst: 10,
        }
    }
}

impl RbridgeOptions {
    /// Sets the initial hop count for encapsulated frames.
    pub fn hop_count(mut self, hop_count: u8) -> Self {
        self.hop_count = hop_count;
        self
    }

    /// Enables the virtual-network tagging extension.
    pub fn vnt(mut self, vnt: bool) -> Self {
        self.vnt = vnt;
        self
    }

    /// Sets the budget for rate-limited datapath warnings.
    pub fn warn_limit(mut self, window: Duration, burst: u32) -> Self {
        self.warn_window = window;
        self.warn_burst = burst;
        self
    }
}

/// The TRILL view of one Ethernet bridge: the per-bridge state attachment,
/// drop accounting, and the control-plane surface. The data plane enters
/// through `handle_frame`; see [`RxAction`](crate::RxAction) for the
/// buffer-ownership contract.
///
/// All control-plane mutations serialize on the bridge lock; the data plane
/// never takes it.
pub struct Bridge<H> {
    pub(crate) host: H,
    pub(crate) mac: MacAddr,
    rbr: ArcSwapOption<Rbr>,
    lock: Mutex<()>,
    pub(crate) stats: BridgeStats,
    pub(crate) opts: RbridgeOptions,
    warn_limit: RateLimit,
}

impl<H: Host> Bridge<H> {
    pub fn new(host: H, mac: MacAddr) -> Self {
        Self::with_options(host, mac, RbridgeOptions::default())
    }

    pub fn with_options(host: H, mac: MacAddr, opts: RbridgeOptions) -> Self {
        let warn_limit = RateLimit::new(opts.warn_window, opts.warn_burst);
        Self {
            host,
            mac,
            rbr: ArcSwapOption::empty(),
            lock: Mutex::new(()),
            stats: BridgeStats::default(),
            opts,
            warn_limit,
        }
    }

    #[inline]
    pub fn host(&self) -> &H {
        &self.host
    }

    /// The bridge device's own MAC address.
    #[inline]
    pub fn mac(&self) -> MacAddr {
        self.mac
    }

    #[inline]
    pub fn stats(&self) -> &BridgeStats {
        &self.stats
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.rbr.load().is_some()
    }

    #[inline]
    pub fn vnt_enabled(&self) -> bool {
        self.opts.vnt
    }

    /// Acquire-loads the RBridge state, if attached.
    pub(crate) fn rbr(&self) -> Option<Arc<Rbr>> {
        self.rbr.load_full()
    }

    /// Enables TRILL on the bridge. Stops STP first; no-op when already
    /// enabled.
    pub fn enable(&self) {
        if self.is_enabled() {
            return;
        }
        self.host.stp_stop();
        let rbr = Arc::new(Rbr::new());
        let _guard = self.lock.lock();
        if self.rbr.load().is_none() {
            self.rbr.store(Some(rbr));
        }
    }

    /// Disables TRILL: detaches the state, then evicts every neighbour.
    /// In-flight frames that captured the state or a neighbour handle
    /// finish safely on their own references.
    pub fn disable(&self) {
        let old = {
            let _guard = self.lock.lock();
            self.rbr.swap(None)
        };
        if let Some(rbr) = old {
            rbr.nodes().evict_all();
        }
    }

    pub fn set_enabled(&self, enabled: bool) {
        if enabled {
            self.enable();
        } else {
            self.disable();
        }
    }

    /// Installs the local nickname.
    pub fn set_local_nick(&self, nick: Nickname) -> Result<(), ControlError> {
        if !nick.is_valid() {
            return Err(ControlError::NotFound(nick));
        }
        let rbr = self.rbr().ok_or(ControlError::Disabled)?;
        let _guard = self.lock.lock();
        rbr.set_local_nick(nick);
        Ok(())
    }

    /// Nominates the distribution-tree root. Idempotent; a no-op when the
    /// root is unchanged.
    pub fn set_tree_root(&self, nick: Nickname) -> Result<(), ControlError> {
        if !nick.is_valid() {
            return Err(ControlError::NotFound(nick));
        }
        let rbr = self.rbr().ok_or(ControlError::Disabled)?;
        if rbr.tree_root() != nick {
            let _guard = self.lock.lock();
            rbr.set_tree_root(nick);
        }
        Ok(())
    }

    /// Installs or replaces the neighbour record for `nick`.
    pub fn add_neighbor(&self, nick: Nickname, info: NeighborInfo) -> Result<(), ControlError> {
        if !nick.is_valid() {
            return Err(ControlError::NotFound(nick));
        }
        let rbr = self.rbr().ok_or(ControlError::Disabled)?;
        let node = RbrNode::new(info);
        let _guard = self.lock.lock();
        rbr.nodes().install(nick, node);
        Ok(())
    }

    /// Evicts the neighbour record for `nick`, if any.
    pub fn del_neighbor(&self, nick: Nickname) -> Result<(), ControlError> {
        if !nick.is_valid() {
            return Err(ControlError::NotFound(nick));
        }
        let rbr = self.rbr().ok_or(ControlError::Disabled)?;
        let _guard = self.lock.lock();
        rbr.nodes().evict(nick);
        Ok(())
    }

    /// Receive-side drop: the caller discards the frame, this records it.
    pub(crate) fn drop_rx(&self, site: &'static str, reason: DropReason) {
        self.stats.increment_rx_dropped();
        if self.warn_limit.allow() {
            warn!(site, %reason, "dropping frame");
        }
    }

    /// Transmit-side drop.
    pub(crate) fn drop_tx(&self, site: &'static str, reason: DropReason) {
        self.stats.increment_tx_dropped();
        if self.warn_limit.allow() {
            warn!(site, %reason, "dropping frame");
        }
    }
}
