use std::time::Duration;

use crate::dissect::Dissector;
use crate::linktype::Linktype;
use crate::ntp::NTP_PORT;
use crate::tstamp::{TimestampTypeSelector, DEFAULT_PREFERENCE_ORDER};

/// Capture device used when none is given
///
/// On Linux, frames captured on `any` use the [`Linktype::LINUX_SLL`] encapsulation.
pub const DEFAULT_DEVICE: &str = "any";

/// Maximum number of bytes captured per frame
pub const DEFAULT_SNAPLEN: u32 = 8192;

pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(300);

/// Capture filter selecting NTP traffic (IPv4 and IPv6), see `pcap-filter(7)`
pub const CAPTURE_FILTER: &str = "udp && (port 123)";

/// Resolution requested for capture timestamps
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TimestampPrecision {
    Micro,
    #[default]
    Nano,
}

impl TimestampPrecision {
    /// Units per second of the fractional part delivered by the capture source
    pub const fn resolution(self) -> u64 {
        match self {
            TimestampPrecision::Micro => crate::time::MICROS_PER_SEC,
            TimestampPrecision::Nano => crate::time::NANOS_PER_SEC,
        }
    }
}

/// Settings applied by the capture source before starting to deliver frames
///
/// The capture itself (opening the device, installing the filter, reading frames)
/// is left to the caller. This structure only carries the parameters, and builds the
/// [`Dissector`] and [`TimestampTypeSelector`] matching them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CaptureConfig {
    /// Device to capture on
    pub device: String,
    pub snaplen: u32,
    pub promiscuous: bool,
    pub read_timeout: Duration,
    pub filter: String,
    /// Preferred timestamp type name, overriding the default ranking when supported
    pub tstamp_type: Option<String>,
    pub tstamp_precision: TimestampPrecision,
    /// Link type reported by the capture source once activated
    pub linktype: Linktype,
    /// Also check NTP ports in the dissector (the filter already does it)
    pub check_port: bool,
}

impl CaptureConfig {
    pub fn new() -> CaptureConfig {
        CaptureConfig {
            device: DEFAULT_DEVICE.to_string(),
            snaplen: DEFAULT_SNAPLEN,
            promiscuous: false,
            read_timeout: DEFAULT_READ_TIMEOUT,
            filter: CAPTURE_FILTER.to_string(),
            tstamp_type: None,
            tstamp_precision: TimestampPrecision::Nano,
            linktype: Linktype::ETHERNET,
            check_port: false,
        }
    }

    pub fn with_device(mut self, device: &str) -> CaptureConfig {
        self.device = device.to_string();
        self
    }

    pub fn with_tstamp_type(mut self, name: &str) -> CaptureConfig {
        self.tstamp_type = Some(name.to_string());
        self
    }

    pub fn with_linktype(mut self, linktype: Linktype) -> CaptureConfig {
        self.linktype = linktype;
        self
    }

    /// Dissector for frames delivered with this configuration
    pub fn dissector(&self) -> Dissector {
        let dissector = Dissector::new(self.linktype);
        if self.check_port {
            dissector.with_port_filter(NTP_PORT)
        } else {
            dissector
        }
    }

    /// Timestamp type selector, with the user preference of this configuration
    pub fn timestamp_selector(&self) -> TimestampTypeSelector<'_> {
        TimestampTypeSelector::new(DEFAULT_PREFERENCE_ORDER)
            .with_user_preference(self.tstamp_type.as_deref())
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        CaptureConfig::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_config_defaults() {
        let config = CaptureConfig::default();
        assert_eq!(config.device, "any");
        assert_eq!(config.snaplen, 8192);
        assert_eq!(config.read_timeout, Duration::from_millis(300));
        assert_eq!(config.filter, "udp && (port 123)");
        assert!(!config.promiscuous);
        assert_eq!(config.tstamp_precision.resolution(), 1_000_000_000);
        assert_eq!(config.dissector(), Dissector::new(Linktype::ETHERNET));
        assert_eq!(config.timestamp_selector().user_preference(), None);
    }

    #[test]
    fn capture_config_builders() {
        let mut config = CaptureConfig::new()
            .with_device("eth0")
            .with_tstamp_type("host")
            .with_linktype(Linktype::LINUX_SLL);
        config.check_port = true;
        let dissector = config.dissector();
        assert_eq!(dissector.linktype(), Linktype::LINUX_SLL);
        assert_eq!(dissector.port_filter(), Some(123));
        let selector = config.timestamp_selector();
        assert_eq!(selector.user_preference(), Some("host"));
        assert_eq!(selector.select(&["adapter", "host"]), Some("host"));
    }
}
