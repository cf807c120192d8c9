use trill_wire::{
    EthHdr, MacAddr, TrillHeader, TrillOpt, VlanId, Vni, VntExt, ETH_HLEN, VNT_EXTENSION_TYPE,
};

use crate::{Bridge, DropReason, Frame, Host, PortId};

impl<H: Host> Bridge<H> {
    /// Strips the TRILL shim (and any extension area) so the inner Ethernet
    /// frame becomes the current packet, records the ingress-nickname
    /// learning hint, and delivers locally.
    ///
    /// The cursor must sit on the TRILL header; `trh_size` is the full shim
    /// length including extensions.
    pub(crate) fn decaps(&self, port: PortId, mut frame: Frame, trh_size: usize, vid: VlanId) {
        let Ok(trh) = TrillHeader::parse(frame.data()) else {
            return self.drop_rx("decaps", DropReason::MalformedHeader);
        };
        if trh_size < TrillHeader::LEN || frame.len() < trh_size {
            return self.drop_rx("decaps", DropReason::MalformedHeader);
        }
        frame.pull(TrillHeader::LEN);
        let mut rest = trh_size - TrillHeader::LEN;

        let mut vni = None;
        if trh.options_len() > 0 {
            if rest <= TrillOpt::LEN {
                return self.drop_rx("decaps", DropReason::MalformedHeader);
            }
            frame.pull(TrillOpt::LEN);
            rest -= TrillOpt::LEN;

            let Ok(ext) = VntExt::parse(frame.data()) else {
                return self.drop_rx("decaps", DropReason::MalformedHeader);
            };
            if ext.ext_type() != VNT_EXTENSION_TYPE {
                return self.drop_rx("decaps", DropReason::MalformedHeader);
            }
            vni = ext.vni();
            if rest < VntExt::LEN {
                return self.drop_rx("decaps", DropReason::MalformedHeader);
            }
            frame.pull(VntExt::LEN);
            rest -= VntExt::LEN;
            if rest > 0 {
                // an option we do not understand; safer to discard
                return self.drop_rx("decaps", DropReason::MalformedHeader);
            }
        }

        // the inner frame becomes the current packet
        frame.reset_mac_header();
        frame.clear_encapsulated();
        let Some(inner) = EthHdr::parse(frame.data()) else {
            return self.drop_rx("decaps", DropReason::MalformedHeader);
        };
        frame.pull(ETH_HLEN);

        self.host.fdb_update_nick(port, inner.src, vid, trh.ingress);
        self.stats.increment_decapsulated();
        self.decap_finish(frame, inner.dst, vid, vni);
    }

    /// Local delivery of a decapsulated frame: known destinations go out
    /// their port (subject to virtual-network policing), unknown ones are
    /// flooded to the end stations of the frame's network.
    fn decap_finish(&self, frame: Frame, dest: MacAddr, vid: VlanId, vni: Option<Vni>) {
        if let Some(entry) = self.host.fdb_get(dest, vid) {
            if self.opts.vnt && entry.vni != vni {
                return self.drop_rx("decap_finish", DropReason::VniMismatch);
            }
            self.host.deliver(entry.port, frame);
        } else if let Some(vni) = vni {
            self.host.vni_flood_deliver(vni, frame);
        } else {
            self.host.endstation_deliver(frame);
        }
    }
}
