use crate::ip::{Ipv4Header, Ipv6Header, IPV4_HEADER_LEN};
use crate::ntp::{NtpMessage, NTP_MESSAGE_LEN};
use crate::udp::{UdpHeader, UDP_HEADER_LEN};
use cookie_factory::bytes::{be_u16, be_u32, be_u64, be_u8};
use cookie_factory::combinator::slice;
use cookie_factory::sequence::tuple;
use cookie_factory::{gen, GenError};

/// Common trait for all serialization functions
pub trait ToVec {
    /// Serialize to bytes representation (network order).
    /// Check values and fix all fields before serializing.
    fn to_vec(&mut self) -> Result<Vec<u8>, GenError> {
        self.fix();
        self.to_vec_raw()
    }

    /// Check and correct all fields: version numbers, lengths and other values if possible.
    fn fix(&mut self) {}

    /// Serialize to bytes representation (network order). Do not check values
    fn to_vec_raw(&self) -> Result<Vec<u8>, GenError>;
}

impl ToVec for Ipv4Header {
    /// Options are not part of the header: always write a 20-byte header
    fn fix(&mut self) {
        self.version = 4;
        self.ihl = (IPV4_HEADER_LEN / 4) as u8;
    }

    fn to_vec_raw(&self) -> Result<Vec<u8>, GenError> {
        let mut v = Vec::with_capacity(IPV4_HEADER_LEN);

        gen(
            tuple((
                be_u8(self.version << 4 | (self.ihl & 0x0f)),
                be_u8(self.tos),
                be_u16(self.total_len),
                be_u16(self.id),
                be_u16(self.flags_foff),
                be_u8(self.ttl),
                be_u8(self.protocol.0),
                be_u16(self.checksum),
                slice(self.src.octets()),
                slice(self.dst.octets()),
            )),
            &mut v,
        )
        .map(|res| res.0.to_vec())
    }
}

impl ToVec for Ipv6Header {
    fn fix(&mut self) {
        self.version = 6;
        self.flow_label &= 0x000f_ffff;
    }

    fn to_vec_raw(&self) -> Result<Vec<u8>, GenError> {
        let mut v = Vec::with_capacity(40);
        let ver_class_label = u32::from(self.version) << 28
            | u32::from(self.traffic_class) << 20
            | (self.flow_label & 0x000f_ffff);

        gen(
            tuple((
                be_u32(ver_class_label),
                be_u16(self.payload_len),
                be_u8(self.next_header.0),
                be_u8(self.hop_limit),
                slice(self.src.octets()),
                slice(self.dst.octets()),
            )),
            &mut v,
        )
        .map(|res| res.0.to_vec())
    }
}

impl ToVec for UdpHeader {
    fn fix(&mut self) {
        if (self.length as usize) < UDP_HEADER_LEN {
            self.length = UDP_HEADER_LEN as u16;
        }
    }

    fn to_vec_raw(&self) -> Result<Vec<u8>, GenError> {
        let mut v = Vec::with_capacity(UDP_HEADER_LEN);

        gen(
            tuple((
                be_u16(self.src_port),
                be_u16(self.dst_port),
                be_u16(self.length),
                be_u16(self.checksum),
            )),
            &mut v,
        )
        .map(|res| res.0.to_vec())
    }
}

impl ToVec for NtpMessage {
    fn fix(&mut self) {
        self.leap_indicator &= 0x03;
        self.version &= 0x07;
        self.mode.0 &= 0x07;
    }

    fn to_vec_raw(&self) -> Result<Vec<u8>, GenError> {
        let mut v = Vec::with_capacity(NTP_MESSAGE_LEN);

        gen(
            tuple((
                be_u8(self.li_vn_mode()),
                be_u8(self.stratum),
                be_u8(self.poll),
                be_u8(self.precision),
                be_u32(self.root_delay),
                be_u32(self.root_dispersion),
                be_u32(self.reference_id),
                be_u64(self.reference_ts.0),
                be_u64(self.origin_ts.0),
                be_u64(self.receive_ts.0),
                be_u64(self.transmit_ts.0),
            )),
            &mut v,
        )
        .map(|res| res.0.to_vec())
    }
}
