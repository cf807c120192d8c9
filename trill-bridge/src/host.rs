//! The narrow interfaces through which the engine reaches the rest of the
//! hosting bridge. Everything here is behavioural: the engine never assumes
//! more than these contracts state.

use trill_wire::{MacAddr, Nickname, VlanId, Vni};

use crate::Frame;

/// Identifier of a bridge port, assigned by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PortId(pub u32);

/// One entry of the bridge's MAC forwarding database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FdbEntry {
    pub port: PortId,
    /// Device MAC of the entry's port.
    pub port_mac: MacAddr,
    /// Whether the port faces end stations.
    pub guest: bool,
    /// Virtual network configured on the port, if any.
    pub vni: Option<Vni>,
}

/// The bridge's MAC forwarding database.
pub trait Fdb {
    fn fdb_get(&self, mac: MacAddr, vid: VlanId) -> Option<FdbEntry>;

    /// Learns or refreshes `mac` behind `port` at `vid`.
    fn fdb_update(&self, port: PortId, mac: MacAddr, vid: VlanId);

    /// Same, additionally recording the ingress RBridge the address was
    /// learned from.
    fn fdb_update_nick(&self, port: PortId, mac: MacAddr, vid: VlanId, ingress: Nickname);

    /// Refreshes the `used` timestamp of an entry on the forward path.
    fn fdb_touch(&self, mac: MacAddr, vid: VlanId);
}

/// Outbound primitives of the hosting bridge. Every method taking a
/// [`Frame`] by value assumes ownership of it.
pub trait ForwardPlane {
    /// Transmits on one port.
    fn forward(&self, port: PortId, frame: Frame);

    /// Delivers to the end station(s) behind one port.
    fn deliver(&self, port: PortId, frame: Frame);

    /// Floods to every end station on the bridge.
    fn endstation_deliver(&self, frame: Frame);

    /// Floods an encapsulated frame on the fabric-facing ports.
    fn trill_flood_forward(&self, frame: Frame);

    /// Hands a host-bound frame to the bridge's local stack.
    fn finish_host_frame(&self, frame: Frame);

    /// VLAN ingress policy. Returns the classified VLAN, or `None` to
    /// reject the frame.
    fn allowed_ingress(&self, port: PortId, frame: &mut Frame) -> Option<VlanId>;

    /// Floods to the end stations of one virtual network. Hosts without the
    /// network drop the frame.
    fn vni_flood_deliver(&self, vni: Vni, frame: Frame);
}

/// Port attributes.
pub trait Ports {
    /// Device MAC of the port.
    fn port_mac(&self, port: PortId) -> MacAddr;

    /// Whether the port faces end stations (TRILL "guest" flag).
    fn is_guest(&self, port: PortId) -> bool;

    fn port_vni(&self, port: PortId) -> Option<Vni>;

    /// Whether `mac` at `vid` is reachable on a guest port of this bridge.
    fn is_local_guest_port(&self, port: PortId, mac: MacAddr, vid: VlanId) -> bool;
}

/// Control-plane-maintained MAC to RBridge mapping.
pub trait NickResolution {
    /// Resolves the egress RBridge for an end-station destination. May
    /// return [`Nickname::NONE`] to request distribution-tree flooding.
    fn nick_from_mac(&self, port: PortId, mac: MacAddr, vid: VlanId) -> Nickname;
}

/// Spanning-tree control. STP and TRILL are mutually exclusive on a bridge.
pub trait Stp {
    fn stp_stop(&self);
}

/// Everything the engine needs from its hosting bridge.
pub trait Host: Fdb + ForwardPlane + Ports + NickResolution + Stp {}

impl<T: Fdb + ForwardPlane + Ports + NickResolution + Stp> Host for T {}
