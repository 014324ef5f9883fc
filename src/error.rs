use std::fmt;

use nom::error::{ErrorKind, ParseError};

use crate::ip::IpProtocol;
use crate::linktype::Linktype;

/// Reason a frame is out of scope for the dissector
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Unsupported {
    /// No fixed link-layer header size is known for this link type
    LinkType(Linktype),
    /// IP version nibble is neither 4 nor 6
    IpVersion(u8),
    /// IPv4 IHL field smaller than the fixed header
    Ipv4HeaderLength(u8),
    /// IPv4 datagram with more-fragments set or a non-zero fragment offset
    Fragmented,
    /// Upper-layer protocol is not UDP
    Protocol(IpProtocol),
    /// UDP payload is not exactly one NTP message (value is the payload size)
    MessageSize(usize),
    /// Neither port matches the configured port filter
    Port { src: u16, dst: u16 },
}

/// Verdict for a frame that produced no record
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DissectError {
    /// Buffer exhausted before a required field
    Truncated,
    Unsupported(Unsupported),

    NomError(ErrorKind),
}

impl<I> ParseError<I> for DissectError {
    fn from_error_kind(_input: I, kind: ErrorKind) -> Self {
        DissectError::NomError(kind)
    }
    fn append(_input: I, kind: ErrorKind, _other: Self) -> Self {
        DissectError::NomError(kind)
    }
}

impl From<nom::Err<DissectError>> for DissectError {
    fn from(e: nom::Err<DissectError>) -> Self {
        match e {
            // streaming parsers report missing bytes as incomplete input
            nom::Err::Incomplete(_) => DissectError::Truncated,
            nom::Err::Error(e) | nom::Err::Failure(e) => e,
        }
    }
}

impl From<Unsupported> for DissectError {
    fn from(u: Unsupported) -> Self {
        DissectError::Unsupported(u)
    }
}

impl fmt::Display for Unsupported {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Unsupported::LinkType(l) => write!(f, "unsupported link type {}", l),
            Unsupported::IpVersion(v) => write!(f, "unsupported IP version {}", v),
            Unsupported::Ipv4HeaderLength(ihl) => write!(f, "invalid IPv4 header length {}", ihl),
            Unsupported::Fragmented => f.write_str("fragmented IPv4 datagram"),
            Unsupported::Protocol(p) => write!(f, "not UDP (protocol {})", p),
            Unsupported::MessageSize(sz) => write!(f, "NTP payload of {} bytes", sz),
            Unsupported::Port { src, dst } => write!(f, "ports {} -> {} not filtered", src, dst),
        }
    }
}

impl fmt::Display for DissectError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DissectError::Truncated => f.write_str("truncated frame"),
            DissectError::Unsupported(u) => u.fmt(f),
            DissectError::NomError(kind) => write!(f, "parse error: {:?}", kind),
        }
    }
}

impl std::error::Error for DissectError {}
