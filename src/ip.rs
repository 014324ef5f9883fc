//! Network layer: IPv4 and IPv6 headers
//!
//! The walk stops on anything the dissector does not handle: IPv4 fragments, non-UDP
//! payloads and IP versions other than 4 and 6. Chained IPv6 headers (next header
//! `IPV6`, 41) are skipped one fixed header at a time.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use nom::number::streaming::{be_u16, be_u32, be_u8};
use nom::IResult;
use rusticata_macros::newtype_enum;

use crate::cursor::{be_array, ByteCursor};
use crate::error::{DissectError, Unsupported};

/// IPv4 header without options
pub const IPV4_HEADER_LEN: usize = 20;
/// Fixed IPv6 header
pub const IPV6_HEADER_LEN: usize = 40;

pub const IPV4_DONT_FRAGMENT: u16 = 0x4000;
pub const IPV4_MORE_FRAGMENTS: u16 = 0x2000;
pub const IPV4_FRAGMENT_OFFSET_MASK: u16 = 0x1fff;

/// IP protocol number (IPv4 protocol field, IPv6 next header)
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct IpProtocol(pub u8);

newtype_enum! {
impl display IpProtocol {
    HOPOPT = 0,
    ICMP = 1,
    IPIP = 4,
    TCP = 6,
    UDP = 17,
    IPV6 = 41,
    IPV6_ROUTE = 43,
    IPV6_FRAG = 44,
    ICMPV6 = 58,
    IPV6_NONXT = 59,
    IPV6_OPTS = 60,
}
}

/// Address family of a dissected packet
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IpFamily {
    V4,
    V6,
}

impl fmt::Display for IpFamily {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            IpFamily::V4 => f.write_str("IPv4"),
            IpFamily::V6 => f.write_str("IPv6"),
        }
    }
}

/// IPv4 header (RFC 791), options excluded
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ipv4Header {
    pub version: u8,
    /// Header length, in 32-bit words
    pub ihl: u8,
    pub tos: u8,
    pub total_len: u16,
    pub id: u16,
    /// Flags (3 bits) and fragment offset (13 bits)
    pub flags_foff: u16,
    pub ttl: u8,
    pub protocol: IpProtocol,
    pub checksum: u16,
    pub src: Ipv4Addr,
    pub dst: Ipv4Addr,
}

impl Ipv4Header {
    /// Header length in bytes, including options
    #[inline]
    pub fn header_len(&self) -> usize {
        usize::from(self.ihl) * 4
    }

    #[inline]
    pub fn dont_fragment(&self) -> bool {
        self.flags_foff & IPV4_DONT_FRAGMENT != 0
    }

    #[inline]
    pub fn more_fragments(&self) -> bool {
        self.flags_foff & IPV4_MORE_FRAGMENTS != 0
    }

    /// Fragment offset, in units of 8 bytes
    #[inline]
    pub fn fragment_offset(&self) -> u16 {
        self.flags_foff & IPV4_FRAGMENT_OFFSET_MASK
    }

    /// True for any part of a fragmented datagram, including the first one
    #[inline]
    pub fn is_fragment(&self) -> bool {
        self.more_fragments() || self.fragment_offset() != 0
    }
}

/// IPv6 fixed header (RFC 8200)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ipv6Header {
    pub version: u8,
    pub traffic_class: u8,
    pub flow_label: u32,
    pub payload_len: u16,
    pub next_header: IpProtocol,
    pub hop_limit: u8,
    pub src: Ipv6Addr,
    pub dst: Ipv6Addr,
}

/// Read the fixed part of an IPv4 header
pub fn parse_ipv4_header(i: &[u8]) -> IResult<&[u8], Ipv4Header, DissectError> {
    let (i, ver_ihl) = be_u8(i)?;
    let (i, tos) = be_u8(i)?;
    let (i, total_len) = be_u16(i)?;
    let (i, id) = be_u16(i)?;
    let (i, flags_foff) = be_u16(i)?;
    let (i, ttl) = be_u8(i)?;
    let (i, protocol) = be_u8(i)?;
    let (i, checksum) = be_u16(i)?;
    let (i, src) = be_array::<4>(i)?;
    let (i, dst) = be_array::<4>(i)?;
    let header = Ipv4Header {
        version: ver_ihl >> 4,
        ihl: ver_ihl & 0x0f,
        tos,
        total_len,
        id,
        flags_foff,
        ttl,
        protocol: IpProtocol(protocol),
        checksum,
        src: Ipv4Addr::from(src),
        dst: Ipv4Addr::from(dst),
    };
    Ok((i, header))
}

/// Read a fixed IPv6 header
pub fn parse_ipv6_header(i: &[u8]) -> IResult<&[u8], Ipv6Header, DissectError> {
    let (i, ver_class_label) = be_u32(i)?;
    let (i, payload_len) = be_u16(i)?;
    let (i, next_header) = be_u8(i)?;
    let (i, hop_limit) = be_u8(i)?;
    let (i, src) = be_array::<16>(i)?;
    let (i, dst) = be_array::<16>(i)?;
    let header = Ipv6Header {
        version: (ver_class_label >> 28) as u8,
        traffic_class: ((ver_class_label >> 20) & 0xff) as u8,
        flow_label: ver_class_label & 0x000f_ffff,
        payload_len,
        next_header: IpProtocol(next_header),
        hop_limit,
        src: Ipv6Addr::from(src),
        dst: Ipv6Addr::from(dst),
    };
    Ok((i, header))
}

/// Result of the network layer walk
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NetworkLayer {
    pub family: IpFamily,
    /// Upper-layer protocol (always UDP on success)
    pub protocol: IpProtocol,
    pub src: IpAddr,
    pub dst: IpAddr,
    /// Number of IPv6 headers skipped after the first one
    pub chained_headers: usize,
}

/// Walk the IP header(s), leaving the cursor on the transport header
///
/// The IP version is read from the high nibble of the first byte.
pub fn walk_network_layer(cursor: &mut ByteCursor) -> Result<NetworkLayer, DissectError> {
    let version = cursor.peek_u8()? >> 4;
    match version {
        4 => walk_ipv4(cursor),
        6 => walk_ipv6(cursor),
        v => Err(Unsupported::IpVersion(v).into()),
    }
}

fn walk_ipv4(cursor: &mut ByteCursor) -> Result<NetworkLayer, DissectError> {
    let header = cursor.read_with(parse_ipv4_header)?;
    let header_len = header.header_len();
    if header_len < IPV4_HEADER_LEN {
        return Err(Unsupported::Ipv4HeaderLength(header.ihl).into());
    }
    // DF is irrelevant: only unfragmented datagrams are accepted
    if header.is_fragment() {
        return Err(Unsupported::Fragmented.into());
    }
    if header.protocol != IpProtocol::UDP {
        return Err(Unsupported::Protocol(header.protocol).into());
    }
    // options
    cursor.skip(header_len - IPV4_HEADER_LEN)?;
    Ok(NetworkLayer {
        family: IpFamily::V4,
        protocol: header.protocol,
        src: IpAddr::V4(header.src),
        dst: IpAddr::V4(header.dst),
        chained_headers: 0,
    })
}

fn walk_ipv6(cursor: &mut ByteCursor) -> Result<NetworkLayer, DissectError> {
    let header = cursor.read_with(parse_ipv6_header)?;
    let mut next_header = header.next_header;
    let mut chained_headers = 0;
    // Each iteration consumes a full header or fails, so the chain cannot be
    // longer than frame_len / IPV6_HEADER_LEN.
    while next_header == IpProtocol::IPV6 {
        let inner = cursor.read_with(parse_ipv6_header)?;
        next_header = inner.next_header;
        chained_headers += 1;
    }
    if next_header != IpProtocol::UDP {
        return Err(Unsupported::Protocol(next_header).into());
    }
    Ok(NetworkLayer {
        family: IpFamily::V6,
        protocol: next_header,
        src: IpAddr::V6(header.src),
        dst: IpAddr::V6(header.dst),
        chained_headers,
    })
}
