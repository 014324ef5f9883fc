//! NTP message decoding
//!
//! Only the 48-byte base format is handled. Extension fields and the optional
//! key identifier / message digest trailer are not supported: a UDP payload of any
//! other size is rejected.

use nom::number::streaming::{be_u32, be_u64, be_u8};
use nom::IResult;
use rusticata_macros::newtype_enum;

use crate::cursor::ByteCursor;
use crate::error::{DissectError, Unsupported};

/// Well-known NTP port
pub const NTP_PORT: u16 = 123;

/// Size of the NTP base message (RFC 5905)
pub const NTP_MESSAGE_LEN: usize = 48;

/// Seconds between the NTP era 0 epoch (1900-01-01) and the Unix epoch
pub const NTP_UNIX_OFFSET: u64 = 2_208_988_800;

/// NTP association mode (3 bits)
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct NtpMode(pub u8);

newtype_enum! {
impl display NtpMode {
    RESERVED = 0,
    SYMMETRIC_ACTIVE = 1,
    SYMMETRIC_PASSIVE = 2,
    CLIENT = 3,
    SERVER = 4,
    BROADCAST = 5,
    CONTROL = 6,
    PRIVATE = 7,
}
}

/// 64-bit NTP timestamp: 32 bits of seconds, 32 bits of fraction
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct NtpTimestamp(pub u64);

impl NtpTimestamp {
    #[inline]
    pub fn seconds(self) -> u32 {
        (self.0 >> 32) as u32
    }

    #[inline]
    pub fn fraction(self) -> u32 {
        self.0 as u32
    }

    /// Fractional part converted to nanoseconds (truncated)
    pub fn subsec_nanos(self) -> u32 {
        ((u64::from(self.fraction()) * 1_000_000_000) >> 32) as u32
    }

    /// Seconds relative to the Unix epoch, assuming NTP era 0
    pub fn unix_seconds(self) -> i64 {
        i64::from(self.seconds()) - NTP_UNIX_OFFSET as i64
    }

    /// A zero timestamp means "unknown" (e.g. origin timestamp of a first request)
    #[inline]
    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}

/// NTP message, all fields as found on the wire
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NtpMessage {
    /// Leap indicator (2 bits)
    pub leap_indicator: u8,
    /// Version number (3 bits)
    pub version: u8,
    pub mode: NtpMode,
    pub stratum: u8,
    /// Poll interval, raw byte (signed log2 seconds)
    pub poll: u8,
    /// Clock precision, raw byte (signed log2 seconds)
    pub precision: u8,
    /// Root delay, NTP short format
    pub root_delay: u32,
    /// Root dispersion, NTP short format
    pub root_dispersion: u32,
    pub reference_id: u32,
    pub reference_ts: NtpTimestamp,
    pub origin_ts: NtpTimestamp,
    pub receive_ts: NtpTimestamp,
    pub transmit_ts: NtpTimestamp,
}

impl NtpMessage {
    /// First byte of the message, with leap indicator, version and mode packed
    pub fn li_vn_mode(&self) -> u8 {
        (self.leap_indicator & 0x03) << 6 | (self.version & 0x07) << 3 | (self.mode.0 & 0x07)
    }

    #[inline]
    pub fn poll_log2(&self) -> i8 {
        self.poll as i8
    }

    #[inline]
    pub fn precision_log2(&self) -> i8 {
        self.precision as i8
    }

    /// Reference identifier as bytes (ASCII code for stratum 0/1, address otherwise)
    #[inline]
    pub fn reference_id_bytes(&self) -> [u8; 4] {
        self.reference_id.to_be_bytes()
    }
}

/// Decode a NTP message (48 bytes)
pub fn parse_ntp_message(i: &[u8]) -> IResult<&[u8], NtpMessage, DissectError> {
    let (i, li_vn_mode) = be_u8(i)?;
    let (i, stratum) = be_u8(i)?;
    let (i, poll) = be_u8(i)?;
    let (i, precision) = be_u8(i)?;
    let (i, root_delay) = be_u32(i)?;
    let (i, root_dispersion) = be_u32(i)?;
    let (i, reference_id) = be_u32(i)?;
    let (i, reference_ts) = be_u64(i)?;
    let (i, origin_ts) = be_u64(i)?;
    let (i, receive_ts) = be_u64(i)?;
    let (i, transmit_ts) = be_u64(i)?;
    let msg = NtpMessage {
        leap_indicator: li_vn_mode >> 6,
        version: (li_vn_mode >> 3) & 0x07,
        mode: NtpMode(li_vn_mode & 0x07),
        stratum,
        poll,
        precision,
        root_delay,
        root_dispersion,
        reference_id,
        reference_ts: NtpTimestamp(reference_ts),
        origin_ts: NtpTimestamp(origin_ts),
        receive_ts: NtpTimestamp(receive_ts),
        transmit_ts: NtpTimestamp(transmit_ts),
    };
    Ok((i, msg))
}

/// Decode the UDP payload, which must be exactly one NTP message
pub fn decode_time_protocol(cursor: &mut ByteCursor) -> Result<NtpMessage, DissectError> {
    let len = cursor.remaining_len();
    if len != NTP_MESSAGE_LEN {
        return Err(Unsupported::MessageSize(len).into());
    }
    cursor.read_with(parse_ntp_message)
}
