use bytes::BytesMut;

use trill_wire::ETH_HLEN;

/// Delivery class of a frame, mirroring the link layer's classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PacketType {
    #[default]
    Host,
    Broadcast,
    Multicast,
    OtherHost,
    Loopback,
}

/// A VLAN tag held out-of-band by receive offload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VlanTag {
    pub proto: u16,
    pub tci: u16,
}

/// An owned Ethernet frame with explicit headroom.
///
/// `head` is the data cursor: [`Frame::data`] starts there and runs to the
/// end of the buffer. [`Frame::push`] moves the cursor backwards into
/// headroom, [`Frame::pull`] forwards. `mac` addresses the current (outer)
/// Ethernet header; on entry to the receive handler it sits immediately
/// before the cursor.
///
/// Cloning performs a deep copy, so a clone can be rewritten independently.
#[derive(Debug, Clone)]
pub struct Frame {
    buf: BytesMut,
    head: usize,
    mac: usize,
    inner: Option<usize>,
    encapsulated: bool,
    packet_type: PacketType,
    vlan: Option<VlanTag>,
}

impl Frame {
    /// Headroom reserved in front of ingested frames, enough for one TRILL
    /// encapsulation without reallocating.
    pub const DEFAULT_HEADROOM: usize = 64;

    /// Builds a frame from raw bytes that start with an Ethernet header.
    pub fn from_ethernet(bytes: &[u8]) -> Self {
        let mut buf = BytesMut::with_capacity(Self::DEFAULT_HEADROOM + bytes.len());
        buf.resize(Self::DEFAULT_HEADROOM, 0);
        buf.extend_from_slice(bytes);
        Self {
            buf,
            head: Self::DEFAULT_HEADROOM + ETH_HLEN.min(bytes.len()),
            mac: Self::DEFAULT_HEADROOM,
            inner: None,
            encapsulated: false,
            packet_type: PacketType::default(),
            vlan: None,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len() - self.head
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn headroom(&self) -> usize {
        self.head
    }

    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.buf[self.head..]
    }

    #[inline]
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.buf[self.head..]
    }

    /// Moves the cursor back `n` bytes and returns the exposed region.
    ///
    /// # Panics
    /// Panics if the headroom is smaller than `n`; grow it first with
    /// [`Frame::ensure_headroom`].
    pub fn push(&mut self, n: usize) -> &mut [u8] {
        assert!(self.head >= n, "push of {n} exceeds headroom {}", self.head);
        self.head -= n;
        &mut self.buf[self.head..self.head + n]
    }

    /// Advances the cursor `n` bytes.
    ///
    /// # Panics
    /// Panics if fewer than `n` bytes remain.
    pub fn pull(&mut self, n: usize) {
        assert!(n <= self.len(), "pull of {n} exceeds frame length {}", self.len());
        self.head += n;
    }

    /// Guarantees at least `n` bytes of headroom, reallocating and copying
    /// if necessary.
    pub fn ensure_headroom(&mut self, n: usize) {
        if self.head >= n {
            return;
        }
        let extra = n - self.head;
        let mut buf = BytesMut::with_capacity(extra + self.buf.len());
        buf.resize(extra, 0);
        buf.extend_from_slice(&self.buf);
        self.buf = buf;
        self.head += extra;
        self.mac += extra;
        if let Some(inner) = self.inner.as_mut() {
            *inner += extra;
        }
    }

    /// Makes the cursor position the current Ethernet header.
    #[inline]
    pub fn reset_mac_header(&mut self) {
        self.mac = self.head;
    }

    /// The frame from its current Ethernet header onwards.
    #[inline]
    pub fn mac_header(&self) -> &[u8] {
        &self.buf[self.mac..]
    }

    #[inline]
    pub fn mac_header_mut(&mut self) -> &mut [u8] {
        &mut self.buf[self.mac..]
    }

    /// Records the encapsulated payload starting `inner_offset` bytes past
    /// the cursor. No-op if already marked.
    pub fn mark_encapsulated(&mut self, inner_offset: usize) {
        if !self.encapsulated {
            self.inner = Some(self.head + inner_offset);
            self.encapsulated = true;
        }
    }

    pub fn clear_encapsulated(&mut self) {
        self.encapsulated = false;
        self.inner = None;
    }

    #[inline]
    pub fn is_encapsulated(&self) -> bool {
        self.encapsulated
    }

    #[inline]
    pub fn packet_type(&self) -> PacketType {
        self.packet_type
    }

    #[inline]
    pub fn set_packet_type(&mut self, packet_type: PacketType) {
        self.packet_type = packet_type;
    }

    #[inline]
    pub fn vlan_tag(&self) -> Option<VlanTag> {
        self.vlan
    }

    #[inline]
    pub fn set_vlan_tag(&mut self, tag: VlanTag) {
        self.vlan = Some(tag);
    }

    #[inline]
    pub fn take_vlan_tag(&mut self) -> Option<VlanTag> {
        self.vlan.take()
    }

    /// Reinserts an offloaded VLAN tag inline. The cursor must sit at an
    /// Ethernet header; the tag lands between the source address and the
    /// EtherType.
    pub fn push_vlan_tag(&mut self, tag: VlanTag) {
        self.ensure_headroom(4);
        self.push(4);
        let data = self.data_mut();
        data.copy_within(4..16, 0);
        data[12..14].copy_from_slice(&tag.proto.to_be_bytes());
        data[14..16].copy_from_slice(&tag.tci.to_be_bytes());
    }
}
