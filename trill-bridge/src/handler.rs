use trill_wire::{is_bpdu_group, EthHdr, ETHERTYPE_TRILL};

use crate::{Bridge, DropReason, Frame, Host, PacketType, PortId};

/// Outcome of [`Bridge::handle_frame`].
///
/// `Consumed` means the engine took ownership of the buffer — it was
/// forwarded, delivered, replicated, or dropped. `Pass` hands the untouched
/// buffer back for the standard bridge receive path.
#[derive(Debug)]
pub enum RxAction {
    Consumed,
    Pass(Frame),
}

impl<H: Host> Bridge<H> {
    /// Receive entry point for every frame arriving on a bridge port.
    ///
    /// Guest-port (end-station) traffic is classified for local delivery or
    /// encapsulation; fabric-port traffic with the TRILL EtherType enters
    /// the TRILL receive path; anything else is host-bound or dropped. With
    /// TRILL disabled the frame passes through unchanged.
    pub fn handle_frame(&self, port: PortId, mut frame: Frame) -> RxAction {
        let Some(rbr) = self.rbr() else {
            return RxAction::Pass(frame);
        };
        if frame.packet_type() == PacketType::Loopback {
            return RxAction::Pass(frame);
        }
        let Some(outer) = EthHdr::parse(frame.mac_header()) else {
            self.drop_rx("handle_frame", DropReason::MalformedHeader);
            return RxAction::Consumed;
        };
        if !outer.src.is_valid_source() {
            self.drop_rx("handle_frame", DropReason::InvalidSourceMac);
            return RxAction::Consumed;
        }
        let Some(vid) = self.host.allowed_ingress(port, &mut frame) else {
            self.drop_rx("handle_frame", DropReason::VlanIngressDenied);
            return RxAction::Consumed;
        };
        if is_bpdu_group(outer.dst) {
            // learn the sender, never carry a BPDU across the fabric
            self.host.fdb_update(port, outer.src, vid);
            return RxAction::Consumed;
        }

        if self.host.is_guest(port) {
            // guest-to-guest traffic on the same bridge skips the fabric
            if self.host.is_local_guest_port(port, outer.dst, vid) {
                if let Some(entry) = self.host.fdb_get(outer.dst, vid) {
                    if entry.guest {
                        // the source may have just migrated here; drop any
                        // stale nickname it was learned under
                        self.host.fdb_update(port, outer.src, vid);
                        if self.opts.vnt && self.host.port_vni(port) != entry.vni {
                            self.drop_rx("handle_frame", DropReason::VniMismatch);
                        } else {
                            self.host.deliver(entry.port, frame);
                        }
                        return RxAction::Consumed;
                    }
                }
            }
            let egress = self.host.nick_from_mac(port, outer.dst, vid);
            self.host.fdb_update(port, outer.src, vid);
            self.encaps_prepare(&rbr, port, frame, egress, vid);
            RxAction::Consumed
        } else {
            if outer.ethertype == ETHERTYPE_TRILL {
                self.trill_recv(&rbr, port, frame, vid);
            } else if outer.dst == self.mac {
                frame.set_packet_type(PacketType::Host);
                self.host.finish_host_frame(frame);
            } else {
                self.drop_rx("handle_frame", DropReason::WrongDestination);
            }
            RxAction::Consumed
        }
    }
}
