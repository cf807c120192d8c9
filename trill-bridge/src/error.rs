use thiserror::Error;

use trill_wire::Nickname;

/// Why the data plane discarded a frame.
///
/// Never propagated to peers or callers: each drop site consumes the buffer,
/// bumps the matching bridge counter, and emits one rate-limited warning.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    #[error("invalid nickname")]
    InvalidNickname,
    #[error("unknown neighbor")]
    UnknownNeighbor,
    #[error("hop count exhausted")]
    HopCountExhausted,
    #[error("frame loop detected")]
    LoopDetected,
    #[error("reverse path forwarding check failed")]
    FailedRpf,
    #[error("not from an adjacency on the distribution tree")]
    WrongAdjacency,
    #[error("outer destination is not this bridge")]
    WrongDestination,
    #[error("malformed TRILL header")]
    MalformedHeader,
    #[error("virtual network mismatch")]
    VniMismatch,
    #[error("VLAN ingress policy rejected the frame")]
    VlanIngressDenied,
    #[error("invalid source MAC address")]
    InvalidSourceMac,
}

/// Errors surfaced to the control-plane daemon.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ControlError {
    #[error("nickname {0} is not valid")]
    NotFound(Nickname),
    #[error("TRILL is not enabled on this bridge")]
    Disabled,
}
