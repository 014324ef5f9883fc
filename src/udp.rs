use nom::number::streaming::be_u16;
use nom::IResult;

use crate::cursor::ByteCursor;
use crate::error::DissectError;

pub const UDP_HEADER_LEN: usize = 8;

/// UDP header (RFC 768)
///
/// Neither `length` nor `checksum` is verified: on truncated captures the
/// declared length may not match the captured bytes, so the remaining payload
/// is always bounded by the cursor instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UdpHeader {
    pub src_port: u16,
    pub dst_port: u16,
    /// Length of header and data, in bytes
    pub length: u16,
    pub checksum: u16,
}

pub fn parse_udp_header(i: &[u8]) -> IResult<&[u8], UdpHeader, DissectError> {
    let (i, src_port) = be_u16(i)?;
    let (i, dst_port) = be_u16(i)?;
    let (i, length) = be_u16(i)?;
    let (i, checksum) = be_u16(i)?;
    let header = UdpHeader {
        src_port,
        dst_port,
        length,
        checksum,
    };
    Ok((i, header))
}

/// Consume the UDP header, leaving the cursor on the payload
pub fn strip_transport_layer(cursor: &mut ByteCursor) -> Result<UdpHeader, DissectError> {
    cursor.read_with(parse_udp_header)
}
