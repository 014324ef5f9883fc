//! Link layer stripping
//!
//! Only the size of the link-layer header matters here: the dissector does not
//! look at the length/type field, and dispatches on the IP version nibble instead.

use crate::cursor::ByteCursor;
use crate::error::{DissectError, Unsupported};
use crate::linktype::Linktype;

/// Ethernet header: destination MAC, source MAC, length/type
pub const ETHERNET_HEADER_LEN: usize = 14;

/// Skip the link-layer header of a frame captured with the given link type
///
/// Fails with `Truncated` if the frame is shorter than the header.
pub fn strip_link_layer(cursor: &mut ByteCursor, linktype: Linktype) -> Result<(), DissectError> {
    let len = linktype
        .header_len()
        .ok_or(Unsupported::LinkType(linktype))?;
    cursor.skip(len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    const ETH_HEADER: &[u8] = &hex!("00 11 22 33 44 55 66 77 88 99 aa bb 08 00");

    #[test]
    fn strip_ethernet() {
        let mut cursor = ByteCursor::new(ETH_HEADER);
        assert_eq!(strip_link_layer(&mut cursor, Linktype::ETHERNET), Ok(()));
        assert_eq!(cursor.position(), ETHERNET_HEADER_LEN);
    }

    #[test]
    fn strip_ethernet_truncated() {
        let mut cursor = ByteCursor::new(&ETH_HEADER[..13]);
        let res = strip_link_layer(&mut cursor, Linktype::ETHERNET);
        assert_eq!(res, Err(DissectError::Truncated));
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn strip_unknown_linktype() {
        let mut cursor = ByteCursor::new(ETH_HEADER);
        let res = strip_link_layer(&mut cursor, Linktype(147));
        assert_eq!(
            res,
            Err(DissectError::Unsupported(Unsupported::LinkType(Linktype(147))))
        );
    }
}
