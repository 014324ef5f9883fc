//! # NTP traffic observer
//!
//! This crate extracts NTP messages from captured network frames, together with the time at
//! which each frame was captured, for clock offset analysis.
//!
//! Given one raw link-layer frame (as delivered by a capture source such as libpcap) and its
//! capture timestamp, the [`Dissector`] strips the link layer, the IP header(s) (IPv4, or IPv6
//! including chained IPv6 headers) and the UDP header, and decodes the 48-byte NTP message.
//! Anything else (fragments, other protocols, truncated or malformed frames, NTP messages with
//! extension fields or authentication trailer) is dropped: one frame produces either a complete
//! [`DissectedPacket`], or nothing.
//!
//! The dissector uses only safe code, does not copy data, and never allocates: every header is
//! read through a bounds-checked [`ByteCursor`], itself built on `nom` parsers.
//!
//! The [`tstamp`] module chooses which capture timestamp type to request from the capture
//! source (adapter clock preferred over host clock), and [`CaptureConfig`] carries the other
//! capture parameters. Opening devices and reading frames is left to the caller.
//!
//! # Example
//!
//! ```rust
//! use clock_sync_observer::{CaptureConfig, CaptureTimestamp, Frame};
//!
//! let config = CaptureConfig::default().with_tstamp_type("adapter");
//! let tstamp_type = config
//!     .timestamp_selector()
//!     .select(&["host", "adapter"]);
//! assert_eq!(tstamp_type, Some("adapter"));
//!
//! let dissector = config.dissector();
//! // frames would come from the capture source
//! let frames = [Frame::new(&[0u8; 20], CaptureTimestamp::new(1, 0))];
//! for pkt in dissector.dissect_all(frames.iter().copied()) {
//!     println!("{} {}[{}] -> {}[{}]", pkt.ts, pkt.src_addr, pkt.src_port, pkt.dst_addr, pkt.dst_port);
//! }
//! ```

#![deny(unsafe_code)]

mod error;
mod linktype;
pub use error::*;
pub use linktype::*;

pub mod cursor;
pub use cursor::ByteCursor;

pub mod ip;
pub mod link;
pub mod ntp;
pub mod udp;
pub use ip::{IpFamily, IpProtocol};
pub use ntp::{NtpMessage, NtpMode, NtpTimestamp, NTP_PORT};

mod time;
pub use time::*;

mod dissect;
pub use dissect::*;

pub mod tstamp;
pub use tstamp::{select_timestamp_type, TimestampType, TimestampTypeSelector};

mod capture;
pub use capture::*;

#[cfg(feature = "serialize")]
mod serialize;
#[cfg(feature = "serialize")]
pub use serialize::*;
