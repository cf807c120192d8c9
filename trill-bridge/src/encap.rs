use trill_wire::{
    EthHdr, Nickname, TrillHeader, TrillOpt, VlanId, Vni, VntExt, ETHERTYPE_TRILL, ETH_HLEN,
    VNT_OPT_UNITS,
};

use crate::{Bridge, DropReason, Frame, Host, PortId, Rbr};

impl<H: Host> Bridge<H> {
    /// Egress handling for an end-station frame: picks unicast or
    /// distribution-tree delivery, encapsulates, and dispatches.
    ///
    /// `egress` may be [`Nickname::NONE`] to request flooding on the
    /// distribution tree.
    pub(crate) fn encaps_prepare(
        &self,
        rbr: &Rbr,
        port: PortId,
        frame: Frame,
        egress: Nickname,
        vid: VlanId,
    ) {
        if egress != Nickname::NONE && !egress.is_valid() {
            return self.drop_tx("encaps_prepare", DropReason::InvalidNickname);
        }
        let local = rbr.local_nick();
        if !local.is_valid() {
            // the daemon has not installed our nickname yet
            return self.drop_tx("encaps_prepare", DropReason::InvalidNickname);
        }
        let vni = if self.opts.vnt { self.host.port_vni(port) } else { None };

        if egress == Nickname::NONE {
            let Some(self_node) = rbr.nodes().lookup(local) else {
                return self.drop_tx("encaps_prepare", DropReason::UnknownNeighbor);
            };
            let root =
                self_node.info().dt_roots().first().copied().unwrap_or_else(|| rbr.tree_root());
            drop(self_node);
            if !root.is_valid() {
                return self.drop_tx("encaps_prepare", DropReason::InvalidNickname);
            }

            // end stations on this bridge get an unencapsulated copy
            let copy = frame.clone();
            match vni {
                Some(vni) => self.host.vni_flood_deliver(vni, copy),
                None => self.host.endstation_deliver(copy),
            }

            let mut frame = frame;
            self.encaps(&mut frame, local, root, true, vni);
            self.stats.increment_encapsulated();
            self.multidest_fwd(rbr, frame, root, local, None, vid);
        } else {
            let mut frame = frame;
            self.encaps(&mut frame, local, egress, false, vni);
            self.stats.increment_encapsulated();
            self.unicast_fwd(rbr, frame, egress, vid);
        }
    }

    /// Pushes the TRILL shim and a fresh outer Ethernet header.
    ///
    /// On return the cursor sits on the TRILL header and `mac` on the outer
    /// Ethernet header; outer addresses are zero until the forwarder
    /// rewrites them for the chosen hop.
    fn encaps(
        &self,
        frame: &mut Frame,
        ingress: Nickname,
        egress: Nickname,
        multidest: bool,
        vni: Option<Vni>,
    ) {
        // bring the end-station Ethernet header back under the cursor
        frame.push(ETH_HLEN);
        frame.mark_encapsulated(0);
        if let Some(tag) = frame.take_vlan_tag() {
            frame.push_vlan_tag(tag);
        }

        let opts_len = if vni.is_some() { TrillOpt::LEN + VntExt::LEN } else { 0 };
        frame.ensure_headroom(TrillHeader::LEN + opts_len + ETH_HLEN);

        if let Some(vni) = vni {
            let mut dst = frame.push(VntExt::LEN);
            VntExt::new(vni).encode(&mut dst);
            let mut dst = frame.push(TrillOpt::LEN);
            TrillOpt::default().encode(&mut dst);
        }

        let mut trh = TrillHeader::new(egress, ingress);
        trh.set_multi_destination(multidest);
        trh.set_hop_count(self.opts.hop_count);
        if vni.is_some() {
            trh.set_opt_len(VNT_OPT_UNITS);
        }
        let mut dst = frame.push(TrillHeader::LEN);
        trh.encode(&mut dst);

        let outer = frame.push(ETH_HLEN);
        outer[..12].fill(0);
        EthHdr::write_ethertype(outer, ETHERTYPE_TRILL);
        frame.reset_mac_header();
        frame.pull(ETH_HLEN);
    }
}
