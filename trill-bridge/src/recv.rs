use trill_wire::{
    EthHdr, TrillHeader, TrillOpt, VlanId, VntExt, ETH_HLEN, TRILL_VERSION, VNT_EXTENSION_TYPE,
};

use crate::{Bridge, DropReason, Frame, Host, PortId, Rbr};

impl<H: Host> Bridge<H> {
    /// Receive path for fabric frames carrying the TRILL EtherType:
    /// validation, then decapsulation, unicast transit, or
    /// distribution-tree replication.
    pub(crate) fn trill_recv(&self, rbr: &Rbr, port: PortId, mut frame: Frame, vid: VlanId) {
        let Some(outer) = EthHdr::parse(frame.mac_header()) else {
            return self.drop_rx("trill_recv", DropReason::MalformedHeader);
        };
        // The outer destination must be this port. Switches between
        // RBridges may flood a TRILL frame on every link; without this
        // check such copies circulate until the hop count expires.
        if outer.dst != self.host.port_mac(port) {
            return self.drop_rx("trill_recv", DropReason::WrongDestination);
        }
        let src_snpa = outer.src;

        let Ok(trh) = TrillHeader::parse(frame.data()) else {
            return self.drop_rx("trill_recv", DropReason::MalformedHeader);
        };
        let trh_size = trh.header_len();
        if frame.len() < trh_size + ETH_HLEN {
            return self.drop_rx("trill_recv", DropReason::MalformedHeader);
        }
        frame.mark_encapsulated(trh_size + ETH_HLEN);

        if !trh.egress.is_valid() || !trh.ingress.is_valid() {
            return self.drop_rx("trill_recv", DropReason::InvalidNickname);
        }
        if trh.version() != TRILL_VERSION {
            return self.drop_rx("trill_recv", DropReason::MalformedHeader);
        }
        let local = rbr.local_nick();
        if trh.ingress == local {
            // a frame we ingressed came back; broken topology
            return self.drop_rx("trill_recv", DropReason::LoopDetected);
        }
        if trh.options_len() > 0 {
            if !self.opts.vnt {
                return self.drop_rx("trill_recv", DropReason::MalformedHeader);
            }
            if trh.options_len() < TrillOpt::LEN + VntExt::LEN {
                return self.drop_rx("trill_recv", DropReason::MalformedHeader);
            }
            let ext_at = TrillHeader::LEN + TrillOpt::LEN;
            match VntExt::parse(&frame.data()[ext_at..]) {
                Ok(ext) if ext.ext_type() == VNT_EXTENSION_TYPE => {}
                _ => return self.drop_rx("trill_recv", DropReason::MalformedHeader),
            }
        }

        if !trh.multi_destination() {
            if trh.egress == trh.ingress {
                return self.drop_rx("trill_recv", DropReason::LoopDetected);
            }
            if trh.egress == local {
                self.decaps(port, frame, trh_size, vid);
            } else if trh.hop_count() > 0 {
                self.host.fdb_update(port, src_snpa, vid);
                self.unicast_fwd(rbr, frame, trh.egress, vid);
            } else {
                self.drop_rx("trill_recv", DropReason::HopCountExhausted);
            }
            return;
        }

        // Multi-destination. The frame must arrive from an adjacency on the
        // distribution tree named by the egress nickname.
        let Some(dest) = rbr.nodes().lookup(trh.egress) else {
            return self.drop_rx("trill_recv", DropReason::UnknownNeighbor);
        };
        let from_adjacency = dest.info().adjacencies().iter().any(|&nick| {
            rbr.nodes().lookup(nick).is_some_and(|adj| adj.info().adj_snpa == src_snpa)
        });
        if !from_adjacency {
            return self.drop_rx("trill_recv", DropReason::WrongAdjacency);
        }

        // Reverse path forwarding: the ingress RBridge must have advertised
        // the tree it used. An ingress advertising no trees at all is
        // accepted only on the bridge's own nominated root.
        let Some(source_node) = rbr.nodes().lookup(trh.ingress) else {
            return self.drop_rx("trill_recv", DropReason::FailedRpf);
        };
        let roots = source_node.info().dt_roots();
        let rpf_ok = roots.contains(&trh.egress)
            || (roots.is_empty() && trh.egress == rbr.tree_root());
        if !rpf_ok {
            return self.drop_rx("trill_recv", DropReason::FailedRpf);
        }
        drop(source_node);
        drop(dest);

        if trh.hop_count() == 0 {
            return self.drop_rx("trill_recv", DropReason::HopCountExhausted);
        }

        // one copy onwards along the tree, the original decapsulated here
        let copy = frame.clone();
        self.multidest_fwd(rbr, copy, trh.egress, trh.ingress, Some(src_snpa), vid);
        self.decaps(port, frame, trh_size, vid);
    }
}
