//! A TRILL RBridge data plane: bit-exact wire formats plus the receive-side
//! forwarding engine for an Ethernet bridge.
//!
//! See [`trill_bridge::Bridge`] for the engine and the `Host` traits for the
//! collaborator surface a hosting bridge implements.

pub use trill_bridge as bridge;
pub use trill_wire as wire;

pub use trill_bridge::{
    Bridge, BridgeStats, ControlError, DropReason, Frame, NeighborInfo, PortId, RbridgeOptions,
    RxAction,
};
pub use trill_wire::{MacAddr, Nickname, TrillHeader, VlanId, Vni};
