use trill_wire::{MacAddr, Nickname, VlanId};

use crate::{Bridge, DropReason, Frame, Host, Rbr};

impl<H: Host> Bridge<H> {
    /// Replicates a multi-destination frame to the adjacencies of the
    /// distribution tree rooted at `egress`.
    ///
    /// Skips the tree branch the frame came from: the adjacency equal to
    /// `ingress`, and, when `source_snpa` is given, the adjacency on the
    /// arriving link. The first surviving adjacency is served with the
    /// original buffer after the loop; every further one gets a deep copy,
    /// because the forwarder rewrites outer addresses per hop. With no
    /// surviving adjacency the frame is discarded quietly (nothing to
    /// reach is not an error).
    pub(crate) fn multidest_fwd(
        &self,
        rbr: &Rbr,
        frame: Frame,
        egress: Nickname,
        ingress: Nickname,
        source_snpa: Option<MacAddr>,
        vid: VlanId,
    ) {
        let Some(dest) = rbr.nodes().lookup(egress) else {
            return self.drop_tx("multidest_fwd", DropReason::UnknownNeighbor);
        };

        let mut saved: Option<Nickname> = None;
        for &adj_nick in dest.info().adjacencies() {
            if !adj_nick.is_valid() || adj_nick == ingress {
                continue;
            }
            let Some(adj) = rbr.nodes().lookup(adj_nick) else {
                continue;
            };
            if source_snpa == Some(adj.info().adj_snpa) {
                continue;
            }
            drop(adj);

            if saved.is_none() {
                saved = Some(adj_nick);
                continue;
            }
            self.stats.increment_replicated();
            self.unicast_fwd(rbr, frame.clone(), adj_nick, vid);
        }
        drop(dest);

        match saved {
            Some(adj_nick) => {
                self.stats.increment_replicated();
                self.unicast_fwd(rbr, frame, adj_nick, vid);
            }
            None => drop(frame),
        }
    }
}
