//! Frame dissection pipeline
//!
//! A frame goes through link layer, network layer, transport layer and NTP decoding,
//! each stage reading from the same [`ByteCursor`]. The first stage that fails ends
//! the dissection: no partial record is ever produced.
//!
//! ## Example
//!
//! ```rust
//! use clock_sync_observer::{CaptureTimestamp, Dissector, Frame, Linktype};
//!
//! fn on_frame(data: &[u8], ts_sec: u64, ts_nsec: u32) {
//!     let dissector = Dissector::new(Linktype::ETHERNET);
//!     let frame = Frame::new(data, CaptureTimestamp::new(ts_sec, ts_nsec));
//!     if let Some(pkt) = dissector.dissect(&frame) {
//!         println!(
//!             "t={} src={}[{}] dst={}[{}] stratum={}",
//!             pkt.ts, pkt.src_addr, pkt.src_port, pkt.dst_addr, pkt.dst_port, pkt.ntp.stratum
//!         );
//!     }
//! }
//! ```

use std::net::IpAddr;

use tracing::trace;

use crate::cursor::ByteCursor;
use crate::error::{DissectError, Unsupported};
use crate::ip::{walk_network_layer, IpFamily};
use crate::link::strip_link_layer;
use crate::linktype::Linktype;
use crate::ntp::{decode_time_protocol, NtpMessage};
use crate::time::CaptureTimestamp;
use crate::udp::strip_transport_layer;

/// A captured frame, borrowed from the capture source for one dissection
#[derive(Clone, Copy, Debug)]
pub struct Frame<'a> {
    /// Captured bytes, starting with the link-layer header
    pub data: &'a [u8],
    pub ts: CaptureTimestamp,
}

impl<'a> Frame<'a> {
    pub fn new(data: &'a [u8], ts: CaptureTimestamp) -> Frame<'a> {
        Frame { data, ts }
    }
}

/// A NTP message with its addressing and capture time
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DissectedPacket {
    pub family: IpFamily,
    pub src_addr: IpAddr,
    pub src_port: u16,
    pub dst_addr: IpAddr,
    pub dst_port: u16,
    pub ts: CaptureTimestamp,
    pub ntp: NtpMessage,
}

/// Stateless NTP frame dissector
///
/// The dissector only holds its configuration: it can be copied freely and shared
/// between capture threads.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Dissector {
    linktype: Linktype,
    port_filter: Option<u16>,
}

impl Dissector {
    pub fn new(linktype: Linktype) -> Dissector {
        Dissector {
            linktype,
            port_filter: None,
        }
    }

    /// Only accept datagrams with `port` as source or destination port
    ///
    /// By default, ports are not checked: the capture filter is expected to
    /// select NTP traffic already.
    pub fn with_port_filter(mut self, port: u16) -> Dissector {
        self.port_filter = Some(port);
        self
    }

    pub fn linktype(&self) -> Linktype {
        self.linktype
    }

    pub fn port_filter(&self) -> Option<u16> {
        self.port_filter
    }

    /// Dissect a frame, returning the reason when no record is produced
    pub fn try_dissect(&self, frame: &Frame) -> Result<DissectedPacket, DissectError> {
        let mut cursor = ByteCursor::new(frame.data);
        strip_link_layer(&mut cursor, self.linktype)?;
        let l3 = walk_network_layer(&mut cursor)?;
        let udp = strip_transport_layer(&mut cursor)?;
        if let Some(port) = self.port_filter {
            if udp.src_port != port && udp.dst_port != port {
                return Err(Unsupported::Port {
                    src: udp.src_port,
                    dst: udp.dst_port,
                }
                .into());
            }
        }
        let ntp = decode_time_protocol(&mut cursor)?;
        Ok(DissectedPacket {
            family: l3.family,
            src_addr: l3.src,
            src_port: udp.src_port,
            dst_addr: l3.dst,
            dst_port: udp.dst_port,
            ts: frame.ts,
            ntp,
        })
    }

    /// Dissect a frame
    ///
    /// Return `None` for truncated, malformed or out of scope frames. The reason is
    /// only reported as a `trace` event.
    pub fn dissect(&self, frame: &Frame) -> Option<DissectedPacket> {
        match self.try_dissect(frame) {
            Ok(pkt) => Some(pkt),
            Err(e) => {
                trace!(len = frame.data.len(), ts = %frame.ts, reason = %e, "frame dropped");
                None
            }
        }
    }

    /// Dissect frames in arrival order, skipping frames that produce no record
    pub fn dissect_all<'a, I>(self, frames: I) -> impl Iterator<Item = DissectedPacket> + 'a
    where
        I: IntoIterator<Item = Frame<'a>>,
        I::IntoIter: 'a,
    {
        frames.into_iter().filter_map(move |frame| self.dissect(&frame))
    }
}

/// Dissect an Ethernet frame, without port filtering
pub fn dissect_frame(frame: &Frame) -> Option<DissectedPacket> {
    Dissector::default().dissect(frame)
}
