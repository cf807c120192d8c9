#![cfg_attr(not(test), warn(unused_crate_dependencies))]

//! Bit-exact wire formats for the TRILL data plane: the shim header and its
//! optional extension area, Ethernet header plumbing, and the small wire-level
//! identifier types.

mod eth;
mod ext;
mod header;
mod mac;
mod types;

pub use eth::{is_bpdu_group, EthHdr, ETHERTYPE_TRILL, ETHERTYPE_VLAN, ETH_HLEN};
pub use ext::{TrillOpt, VntExt, VNT_EXTENSION_LENGTH, VNT_EXTENSION_TYPE, VNT_OPT_UNITS};
pub use header::{Error, TrillHeader, TRILL_VERSION};
pub use mac::{MacAddr, ParseMacError};
pub use types::{Nickname, VlanId, Vni};
