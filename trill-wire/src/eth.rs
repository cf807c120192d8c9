use bytes::BufMut;

use crate::MacAddr;

/// Length of an untagged Ethernet header.
pub const ETH_HLEN: usize = 14;

/// EtherType carried by the outer Ethernet header of every TRILL frame.
pub const ETHERTYPE_TRILL: u16 = 0x22f3;

/// EtherType of an 802.1Q VLAN tag.
pub const ETHERTYPE_VLAN: u16 = 0x8100;

/// An Ethernet II header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EthHdr {
    pub dst: MacAddr,
    pub src: MacAddr,
    pub ethertype: u16,
}

impl EthHdr {
    pub const LEN: usize = ETH_HLEN;

    /// Reads a header from the start of `buf`; `None` if it is too short.
    pub fn parse(buf: &[u8]) -> Option<Self> {
        if buf.len() < Self::LEN {
            return None;
        }
        let mut dst = [0u8; 6];
        let mut src = [0u8; 6];
        dst.copy_from_slice(&buf[0..6]);
        src.copy_from_slice(&buf[6..12]);
        Some(Self {
            dst: MacAddr::new(dst),
            src: MacAddr::new(src),
            ethertype: u16::from_be_bytes([buf[12], buf[13]]),
        })
    }

    pub fn encode(&self, dst: &mut impl BufMut) {
        dst.put_slice(self.dst.as_bytes());
        dst.put_slice(self.src.as_bytes());
        dst.put_u16(self.ethertype);
    }

    /// Overwrites the destination address of an encoded header in place.
    #[inline]
    pub fn write_dst(buf: &mut [u8], mac: MacAddr) {
        buf[0..6].copy_from_slice(mac.as_bytes());
    }

    /// Overwrites the source address of an encoded header in place.
    #[inline]
    pub fn write_src(buf: &mut [u8], mac: MacAddr) {
        buf[6..12].copy_from_slice(mac.as_bytes());
    }

    #[inline]
    pub fn write_ethertype(buf: &mut [u8], ethertype: u16) {
        buf[12..14].copy_from_slice(&ethertype.to_be_bytes());
    }

    #[inline]
    pub fn dst_of(buf: &[u8]) -> MacAddr {
        let mut octets = [0u8; 6];
        octets.copy_from_slice(&buf[0..6]);
        MacAddr::new(octets)
    }

    #[inline]
    pub fn src_of(buf: &[u8]) -> MacAddr {
        let mut octets = [0u8; 6];
        octets.copy_from_slice(&buf[6..12]);
        MacAddr::new(octets)
    }
}

/// Returns `true` for the IEEE 802.1D link-local block
/// 01-80-c2-00-00-00..0f. Bridges never relay these group addresses, and
/// BPDUs in particular must not cross the TRILL fabric.
#[inline]
pub fn is_bpdu_group(mac: MacAddr) -> bool {
    let b = mac.as_bytes();
    b[0] == 0x01 && b[1] == 0x80 && b[2] == 0xc2 && b[3] == 0 && b[4] == 0 && b[5] & 0xf0 == 0
}
