//! Unicast paths: encapsulation, transit forwarding, decapsulation, and the
//! receive-side validation boundaries.

use trill_bridge::{
    FdbEntry, Frame, NeighborInfo, PacketType, PortId, RxAction, DEFAULT_HOP_COUNT,
};
use trill_wire::{EthHdr, Nickname, TrillHeader, ETHERTYPE_TRILL};

use crate::mock::{bridge, eth_frame, mac, outer_of, trh_of, trill_frame, Emission, PortCfg, VID};

const A: Nickname = Nickname::new(0x0001);
const B: Nickname = Nickname::new(0x0002);
const C: Nickname = Nickname::new(0x0003);

const GUEST: PortId = PortId(1);
const FABRIC: PortId = PortId(2);

fn ma() -> trill_wire::MacAddr {
    mac(0xa1)
}
fn mb() -> trill_wire::MacAddr {
    mac(0xb2)
}
fn mc() -> trill_wire::MacAddr {
    mac(0xc3)
}
fn es1() -> trill_wire::MacAddr {
    mac(0x11)
}
fn es2() -> trill_wire::MacAddr {
    mac(0x12)
}

#[test]
fn unicast_encapsulation() {
    let bridge = bridge(ma());
    bridge.host().add_port(GUEST, PortCfg { mac: mac(0x51), guest: true, vni: None });
    bridge.enable();
    bridge.set_local_nick(A).unwrap();
    bridge.add_neighbor(B, NeighborInfo::new(mb())).unwrap();
    bridge.host().set_nick(es2(), B);

    let payload = b"unicast payload";
    let input = eth_frame(es2(), es1(), 0x0800, payload);
    assert!(matches!(
        bridge.handle_frame(GUEST, Frame::from_ethernet(&input)),
        RxAction::Consumed
    ));

    let emissions = bridge.host().take_emissions();
    assert_eq!(emissions.len(), 1);
    let Emission::TrillFlood { frame } = &emissions[0] else {
        panic!("expected fabric flood, got {:?}", emissions[0]);
    };

    let outer = outer_of(frame);
    assert_eq!(outer.src, ma());
    assert_eq!(outer.dst, mb());
    assert_eq!(outer.ethertype, ETHERTYPE_TRILL);

    let trh = trh_of(frame);
    assert_eq!(trh.version(), 0);
    assert!(!trh.multi_destination());
    assert_eq!(trh.opt_len(), 0);
    // the forwarder takes the first hop out of the configured budget
    assert_eq!(trh.hop_count(), DEFAULT_HOP_COUNT - 1);
    assert_eq!(trh.egress, B);
    assert_eq!(trh.ingress, A);

    // inner frame rides unchanged behind the shim
    assert_eq!(&frame.data()[TrillHeader::LEN..], &input[..]);
    assert!(frame.is_encapsulated());

    // the source was learned on the guest port
    assert!(bridge.host().learned.lock().contains(&(GUEST, es1(), VID, None)));
    assert_eq!(bridge.stats().encapsulated(), 1);
    assert_eq!(bridge.stats().forwarded(), 1);
}

#[test]
fn unicast_encapsulation_uses_fdb_port_for_next_hop() {
    let bridge = bridge(ma());
    bridge.host().add_port(GUEST, PortCfg { mac: mac(0x51), guest: true, vni: None });
    let fabric_mac = mac(0x52);
    bridge.host().add_fdb(
        mb(),
        FdbEntry { port: FABRIC, port_mac: fabric_mac, guest: false, vni: None },
    );
    bridge.enable();
    bridge.set_local_nick(A).unwrap();
    bridge.add_neighbor(B, NeighborInfo::new(mb())).unwrap();
    bridge.host().set_nick(es2(), B);

    let input = eth_frame(es2(), es1(), 0x0800, b"x");
    bridge.handle_frame(GUEST, Frame::from_ethernet(&input));

    let emissions = bridge.host().take_emissions();
    assert_eq!(emissions.len(), 1);
    let Emission::Forward { port, frame } = &emissions[0] else {
        panic!("expected per-port forward, got {:?}", emissions[0]);
    };
    assert_eq!(*port, FABRIC);
    // outer source becomes the selected port's own MAC
    assert_eq!(outer_of(frame).src, fabric_mac);
    assert_eq!(outer_of(frame).dst, mb());
    assert!(bridge.host().touched.lock().contains(&(mb(), VID)));
}

#[test]
fn unicast_transit_decrements_and_rewrites() {
    let bridge = bridge(mb());
    bridge.host().add_port(FABRIC, PortCfg { mac: mb(), guest: false, vni: None });
    bridge.enable();
    bridge.set_local_nick(B).unwrap();
    bridge.add_neighbor(C, NeighborInfo::new(mc())).unwrap();

    let inner = eth_frame(es2(), es1(), 0x0800, b"transit");
    let mut trh = TrillHeader::new(C, A);
    trh.set_hop_count(5);
    let frame = trill_frame(mb(), ma(), trh, &inner);
    assert!(matches!(bridge.handle_frame(FABRIC, frame), RxAction::Consumed));

    let emissions = bridge.host().take_emissions();
    assert_eq!(emissions.len(), 1);
    let Emission::TrillFlood { frame } = &emissions[0] else {
        panic!("expected fabric flood, got {:?}", emissions[0]);
    };

    let outer = outer_of(frame);
    assert_eq!(outer.src, mb());
    assert_eq!(outer.dst, mc());

    let trh = trh_of(frame);
    assert_eq!(trh.hop_count(), 4);
    assert_eq!(trh.egress, C);
    assert_eq!(trh.ingress, A);
    assert_eq!(&frame.data()[TrillHeader::LEN..], &inner[..]);

    // the previous hop's outer source was learned
    assert!(bridge.host().learned.lock().contains(&(FABRIC, ma(), VID, None)));
}

#[test]
fn decapsulation_at_egress() {
    let bridge = bridge(mc());
    bridge.host().add_port(FABRIC, PortCfg { mac: mc(), guest: false, vni: None });
    let station_port = PortId(7);
    bridge
        .host()
        .add_fdb(es2(), FdbEntry { port: station_port, port_mac: mac(0x57), guest: true, vni: None });
    bridge.enable();
    bridge.set_local_nick(C).unwrap();

    let inner = eth_frame(es2(), es1(), 0x0800, b"to the end station");
    let mut trh = TrillHeader::new(C, A);
    trh.set_hop_count(3);
    let frame = trill_frame(mc(), mb(), trh, &inner);
    bridge.handle_frame(FABRIC, frame);

    let emissions = bridge.host().take_emissions();
    assert_eq!(emissions.len(), 1);
    let Emission::Deliver { port, frame } = &emissions[0] else {
        panic!("expected local delivery, got {:?}", emissions[0]);
    };
    assert_eq!(*port, station_port);
    // headers reset: the inner frame is the packet again, byte for byte
    assert_eq!(frame.mac_header(), &inner[..]);
    assert!(!frame.is_encapsulated());

    // learning hint carries the ingress nickname
    assert!(bridge.host().learned.lock().contains(&(FABRIC, es1(), VID, Some(A))));
    assert_eq!(bridge.stats().decapsulated(), 1);
}

#[test]
fn encapsulate_then_decapsulate_round_trip() {
    // ingress RBridge A
    let ingress = bridge(ma());
    ingress.host().add_port(GUEST, PortCfg { mac: mac(0x51), guest: true, vni: None });
    ingress.enable();
    ingress.set_local_nick(A).unwrap();
    ingress.add_neighbor(B, NeighborInfo::new(mb())).unwrap();
    ingress.host().set_nick(es2(), B);

    let input = eth_frame(es2(), es1(), 0x0800, b"round trip");
    ingress.handle_frame(GUEST, Frame::from_ethernet(&input));
    let emissions = ingress.host().take_emissions();
    let Emission::TrillFlood { frame: wire } = &emissions[0] else {
        panic!("expected fabric flood");
    };

    // egress RBridge B receives the emitted bytes
    let egress = bridge(mb());
    egress.host().add_port(FABRIC, PortCfg { mac: mb(), guest: false, vni: None });
    let station_port = PortId(9);
    egress
        .host()
        .add_fdb(es2(), FdbEntry { port: station_port, port_mac: mac(0x59), guest: true, vni: None });
    egress.enable();
    egress.set_local_nick(B).unwrap();

    egress.handle_frame(FABRIC, Frame::from_ethernet(wire.mac_header()));
    let emissions = egress.host().take_emissions();
    assert_eq!(emissions.len(), 1);
    let Emission::Deliver { port, frame } = &emissions[0] else {
        panic!("expected local delivery, got {:?}", emissions[0]);
    };
    assert_eq!(*port, station_port);
    assert_eq!(frame.mac_header(), &input[..]);
    assert!(egress.host().learned.lock().contains(&(FABRIC, es1(), VID, Some(A))));
}

#[test]
fn self_loop_frames_are_dropped() {
    let bridge = bridge(mb());
    bridge.host().add_port(FABRIC, PortCfg { mac: mb(), guest: false, vni: None });
    bridge.enable();
    bridge.set_local_nick(B).unwrap();

    let inner = eth_frame(es2(), es1(), 0x0800, b"loop");
    let mut trh = TrillHeader::new(C, B); // ingress == local
    trh.set_hop_count(5);
    bridge.handle_frame(FABRIC, trill_frame(mb(), ma(), trh, &inner));

    assert!(bridge.host().take_emissions().is_empty());
    assert_eq!(bridge.stats().rx_dropped(), 1);
}

#[test]
fn unicast_egress_equal_ingress_is_dropped() {
    let bridge = bridge(mb());
    bridge.host().add_port(FABRIC, PortCfg { mac: mb(), guest: false, vni: None });
    bridge.enable();
    bridge.set_local_nick(B).unwrap();

    let inner = eth_frame(es2(), es1(), 0x0800, b"");
    let mut trh = TrillHeader::new(A, A);
    trh.set_hop_count(5);
    bridge.handle_frame(FABRIC, trill_frame(mb(), ma(), trh, &inner));

    assert!(bridge.host().take_emissions().is_empty());
    assert_eq!(bridge.stats().rx_dropped(), 1);
}

#[test]
fn hop_count_boundaries() {
    let bridge = bridge(mb());
    bridge.host().add_port(FABRIC, PortCfg { mac: mb(), guest: false, vni: None });
    bridge.enable();
    bridge.set_local_nick(B).unwrap();
    bridge.add_neighbor(C, NeighborInfo::new(mc())).unwrap();

    let inner = eth_frame(es2(), es1(), 0x0800, b"ttl");

    // hop 0 arriving: transit always drops
    let trh = TrillHeader::new(C, A);
    bridge.handle_frame(FABRIC, trill_frame(mb(), ma(), trh, &inner));
    assert!(bridge.host().take_emissions().is_empty());
    assert_eq!(bridge.stats().rx_dropped(), 1);

    // hop 1 arriving: forwarded with the last hop spent
    let mut trh = TrillHeader::new(C, A);
    trh.set_hop_count(1);
    bridge.handle_frame(FABRIC, trill_frame(mb(), ma(), trh, &inner));
    let emissions = bridge.host().take_emissions();
    assert_eq!(emissions.len(), 1);
    let Emission::TrillFlood { frame } = &emissions[0] else {
        panic!("expected forward");
    };
    assert_eq!(trh_of(frame).hop_count(), 0);

    // hop 1 arriving at its destination: decapsulation still succeeds
    let mut trh = TrillHeader::new(B, A);
    trh.set_hop_count(1);
    bridge.handle_frame(FABRIC, trill_frame(mb(), ma(), trh, &inner));
    let emissions = bridge.host().take_emissions();
    assert_eq!(emissions.len(), 1);
    assert!(matches!(emissions[0], Emission::Endstation { .. }));
}

#[test]
fn malformed_receive_boundaries() {
    let bridge = bridge(mb());
    bridge.host().add_port(FABRIC, PortCfg { mac: mb(), guest: false, vni: None });
    bridge.enable();
    bridge.set_local_nick(B).unwrap();

    let inner = eth_frame(es2(), es1(), 0x0800, b"");

    // outer destination is not the receiving port
    let mut trh = TrillHeader::new(C, A);
    trh.set_hop_count(5);
    bridge.handle_frame(FABRIC, trill_frame(mac(0x77), ma(), trh, &inner));
    assert_eq!(bridge.stats().rx_dropped(), 1);

    // option area claimed but absent: shorter than trh_size + ETH_HLEN
    let mut trh = TrillHeader::new(C, A);
    trh.set_hop_count(5);
    trh.set_opt_len(3);
    bridge.handle_frame(FABRIC, trill_frame(mb(), ma(), trh, &inner));
    assert_eq!(bridge.stats().rx_dropped(), 2);

    // reserved nicknames in the shim
    let mut trh = TrillHeader::new(Nickname::UNASSIGNED, A);
    trh.set_hop_count(5);
    bridge.handle_frame(FABRIC, trill_frame(mb(), ma(), trh, &inner));
    assert_eq!(bridge.stats().rx_dropped(), 3);

    // wrong protocol version
    let mut bytes = Vec::new();
    EthHdr { dst: mb(), src: ma(), ethertype: ETHERTYPE_TRILL }.encode(&mut bytes);
    let mut trh = TrillHeader::new(C, A);
    trh.set_hop_count(5);
    trh.encode(&mut bytes);
    bytes[14] |= 0x40; // version bits
    bytes.extend_from_slice(&inner);
    bridge.handle_frame(FABRIC, Frame::from_ethernet(&bytes));
    assert_eq!(bridge.stats().rx_dropped(), 4);

    // truncated: no room for an inner Ethernet header
    let mut trh = TrillHeader::new(C, A);
    trh.set_hop_count(5);
    bridge.handle_frame(FABRIC, trill_frame(mb(), ma(), trh, &inner[..4]));
    assert_eq!(bridge.stats().rx_dropped(), 5);

    assert!(bridge.host().take_emissions().is_empty());
}

#[test]
fn guest_to_local_guest_skips_the_fabric() {
    let bridge = bridge(ma());
    bridge.host().add_port(GUEST, PortCfg { mac: mac(0x51), guest: true, vni: None });
    let peer_port = PortId(3);
    bridge
        .host()
        .add_fdb(es2(), FdbEntry { port: peer_port, port_mac: mac(0x53), guest: true, vni: None });
    bridge.enable();
    bridge.set_local_nick(A).unwrap();

    let input = eth_frame(es2(), es1(), 0x0800, b"local");
    bridge.handle_frame(GUEST, Frame::from_ethernet(&input));

    let emissions = bridge.host().take_emissions();
    assert_eq!(emissions.len(), 1);
    let Emission::Deliver { port, frame } = &emissions[0] else {
        panic!("expected direct delivery, got {:?}", emissions[0]);
    };
    assert_eq!(*port, peer_port);
    // no shim was pushed
    assert_eq!(frame.mac_header(), &input[..]);
    assert_eq!(bridge.stats().encapsulated(), 0);
}

#[test]
fn bpdus_are_learned_and_swallowed() {
    let bridge = bridge(ma());
    bridge.host().add_port(GUEST, PortCfg { mac: mac(0x51), guest: true, vni: None });
    bridge.enable();
    bridge.set_local_nick(A).unwrap();

    let bpdu_group = "01:80:c2:00:00:00".parse().unwrap();
    let input = eth_frame(bpdu_group, es1(), 0x0026, b"bpdu");
    assert!(matches!(
        bridge.handle_frame(GUEST, Frame::from_ethernet(&input)),
        RxAction::Consumed
    ));

    assert!(bridge.host().take_emissions().is_empty());
    assert!(bridge.host().learned.lock().contains(&(GUEST, es1(), VID, None)));
    // swallowing a BPDU is policy, not an error
    assert_eq!(bridge.stats().rx_dropped(), 0);
}

#[test]
fn pass_through_and_ingress_filters() {
    let bridge = bridge(ma());
    bridge.host().add_port(GUEST, PortCfg { mac: mac(0x51), guest: true, vni: None });

    // TRILL disabled: the standard bridge path gets the frame back
    let input = eth_frame(es2(), es1(), 0x0800, b"");
    assert!(matches!(
        bridge.handle_frame(GUEST, Frame::from_ethernet(&input)),
        RxAction::Pass(_)
    ));

    bridge.enable();
    bridge.set_local_nick(A).unwrap();

    // loopback frames stay with the caller
    let mut frame = Frame::from_ethernet(&input);
    frame.set_packet_type(PacketType::Loopback);
    assert!(matches!(bridge.handle_frame(GUEST, frame), RxAction::Pass(_)));

    // group source address is never valid
    let bad_src = eth_frame(es2(), trill_wire::MacAddr::BROADCAST, 0x0800, b"");
    assert!(matches!(
        bridge.handle_frame(GUEST, Frame::from_ethernet(&bad_src)),
        RxAction::Consumed
    ));
    assert_eq!(bridge.stats().rx_dropped(), 1);

    // VLAN ingress policy rejection
    bridge.host().deny_ingress.store(true, std::sync::atomic::Ordering::Relaxed);
    assert!(matches!(
        bridge.handle_frame(GUEST, Frame::from_ethernet(&input)),
        RxAction::Consumed
    ));
    assert_eq!(bridge.stats().rx_dropped(), 2);
    bridge.host().deny_ingress.store(false, std::sync::atomic::Ordering::Relaxed);

    // fabric-port frame for the bridge's own MAC reaches the local stack
    let host_bound = eth_frame(ma(), es1(), 0x0800, b"mgmt");
    bridge.host().add_port(FABRIC, PortCfg { mac: ma(), guest: false, vni: None });
    bridge.handle_frame(FABRIC, Frame::from_ethernet(&host_bound));
    let emissions = bridge.host().take_emissions();
    assert_eq!(emissions.len(), 1);
    assert!(matches!(emissions[0], Emission::HostStack { .. }));

    // anything else on a fabric port is dropped
    let stray = eth_frame(mac(0x66), es1(), 0x0800, b"");
    bridge.handle_frame(FABRIC, Frame::from_ethernet(&stray));
    assert_eq!(bridge.stats().rx_dropped(), 3);
}
