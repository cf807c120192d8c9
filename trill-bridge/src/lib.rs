#![cfg_attr(not(test), warn(unused_crate_dependencies))]

//! A TRILL RBridge forwarding engine embedded in an Ethernet bridge.
//!
//! The engine owns the per-bridge RBridge state and the nickname-indexed
//! neighbour database, and implements the receive-side data plane: ingress
//! classification, encapsulation of end-station frames, nickname-based
//! forwarding of transit frames, distribution-tree replication with
//! reverse-path-forwarding checks, and decapsulation for local delivery.
//! Everything the engine needs from the rest of the bridge — the forwarding
//! database, transmit primitives, port attributes, nickname resolution — is
//! reached through the traits in [`host`](crate::Host).
//!
//! Concurrency model: the data plane never blocks and never takes the
//! bridge lock. Neighbour records are published through atomic pointer
//! slots and reference-counted, so control-plane eviction and in-flight
//! forwarding never race.

mod bridge;
mod decap;
mod encap;
mod error;
mod forward;
mod frame;
mod handler;
mod host;
mod neighbor;
mod recv;
mod replicate;
mod state;
mod stats;

pub use bridge::{Bridge, RbridgeOptions, DEFAULT_HOP_COUNT};
pub use error::{ControlError, DropReason};
pub use frame::{Frame, PacketType, VlanTag};
pub use handler::RxAction;
pub use host::{Fdb, FdbEntry, ForwardPlane, Host, NickResolution, PortId, Ports, Stp};
pub use neighbor::{NeighborInfo, NeighborTable, RbrNode};
pub use state::Rbr;
pub use stats::BridgeStats;
