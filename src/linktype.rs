use rusticata_macros::newtype_enum;

/// Data link type of the capture source
///
/// The link-layer header type specifies the type of headers at the beginning
/// of each captured frame.
///
/// See <http://www.tcpdump.org/linktypes.html>
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Linktype(pub i32);

newtype_enum! {
impl display Linktype {
    NULL = 0,
    ETHERNET = 1,

    RAW = 101,

    LOOP = 108,
    LINUX_SLL = 113,
    LINUX_SLL2 = 276,

    // Raw IPv4; the packet begins with an IPv4 header.
    IPV4 = 228,
    // Raw IPv6; the packet begins with an IPv6 header.
    IPV6 = 229,
}
}

impl Default for Linktype {
    fn default() -> Self {
        Linktype::ETHERNET
    }
}

impl Linktype {
    /// Size of the link-layer header preceding the network layer, if fixed
    ///
    /// Ethernet frames are expected without 802.1Q tag and without frame check
    /// sequence, as delivered by libpcap.
    pub const fn header_len(self) -> Option<usize> {
        match self {
            Linktype::ETHERNET => Some(14),
            Linktype::NULL | Linktype::LOOP => Some(4),
            Linktype::RAW | Linktype::IPV4 | Linktype::IPV6 => Some(0),
            Linktype::LINUX_SLL => Some(16),
            Linktype::LINUX_SLL2 => Some(20),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Linktype;

    #[test]
    fn linktype_header_len() {
        assert_eq!(Linktype::default(), Linktype::ETHERNET);
        assert_eq!(Linktype::ETHERNET.header_len(), Some(14));
        assert_eq!(Linktype::LINUX_SLL.header_len(), Some(16));
        assert_eq!(Linktype::LINUX_SLL2.header_len(), Some(20));
        assert_eq!(Linktype::RAW.header_len(), Some(0));
        assert_eq!(Linktype::NULL.header_len(), Some(4));
        assert_eq!(Linktype(10).header_len(), None);
        assert_eq!(Linktype::ETHERNET.to_string(), "ETHERNET");
    }
}
