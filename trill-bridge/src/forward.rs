use trill_wire::{EthHdr, Nickname, TrillHeader, VlanId};

use crate::{Bridge, DropReason, Frame, Host, Rbr};

impl<H: Host> Bridge<H> {
    /// Unicast next-hop forwarding: resolves the adjacency for
    /// `adj_nick`, rewrites the outer addresses, decrements the hop count,
    /// and hands the frame to the bridge's transmit primitives.
    ///
    /// The cursor must sit on the TRILL header. The caller guarantees the
    /// hop count is non-zero for transit frames.
    pub(crate) fn unicast_fwd(&self, rbr: &Rbr, mut frame: Frame, adj_nick: Nickname, vid: VlanId) {
        let Some(adj) = rbr.nodes().lookup(adj_nick) else {
            return self.drop_tx("unicast_fwd", DropReason::UnknownNeighbor);
        };

        TrillHeader::dec_hop_count(frame.data_mut());

        // this bridge becomes the outer source, the adjacency the outer
        // destination
        let mac = frame.mac_header_mut();
        EthHdr::write_src(mac, self.mac);
        EthHdr::write_dst(mac, adj.info().adj_snpa);
        drop(adj);

        self.stats.increment_forwarded();
        self.fwd_finish(frame, vid);
    }

    /// Selects the egress port for the rewritten outer destination. An fdb
    /// hit refreshes the entry and stamps the port's own MAC as the outer
    /// source; a miss floods on the fabric-facing ports.
    fn fwd_finish(&self, mut frame: Frame, vid: VlanId) {
        let dest = EthHdr::dst_of(frame.mac_header());
        if let Some(entry) = self.host.fdb_get(dest, vid) {
            self.host.fdb_touch(dest, vid);
            EthHdr::write_src(frame.mac_header_mut(), entry.port_mac);
            self.host.forward(entry.port, frame);
        } else {
            self.host.trill_flood_forward(frame);
        }
    }
}
