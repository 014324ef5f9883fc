use std::fmt;
use std::time::Duration;

pub const MICROS_PER_SEC: u64 = 1_000_000;
pub const NANOS_PER_SEC: u64 = 1_000_000_000;

/// Time at which a frame was captured, as reported by the capture source
///
/// This is the capture clock (hardware or host, depending on the selected
/// timestamp type), with nanosecond resolution. It is not corrected in any way.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CaptureTimestamp {
    pub ts_sec: u64,
    /// Sub-second part, always below `NANOS_PER_SEC`
    pub ts_nsec: u32,
}

impl CaptureTimestamp {
    /// Build a timestamp, carrying excess nanoseconds into seconds
    pub fn new(ts_sec: u64, ts_nsec: u32) -> CaptureTimestamp {
        let carry = u64::from(ts_nsec) / NANOS_PER_SEC;
        CaptureTimestamp {
            ts_sec: ts_sec.saturating_add(carry),
            ts_nsec: (u64::from(ts_nsec) % NANOS_PER_SEC) as u32,
        }
    }

    /// Build a timestamp from seconds and a fractional part in `resolution` units per second
    ///
    /// This covers `timeval` (resolution `MICROS_PER_SEC`), `timespec` (`NANOS_PER_SEC`)
    /// and pcap-ng `if_tsresol` values (see [`build_ts_resolution`]).
    /// Return `None` if the resolution is zero.
    pub fn from_fraction(ts_sec: u64, ts_frac: u64, resolution: u64) -> Option<CaptureTimestamp> {
        if resolution == 0 {
            return None;
        }
        let carry = ts_frac / resolution;
        let frac = ts_frac % resolution;
        let nsec = (u128::from(frac) * u128::from(NANOS_PER_SEC) / u128::from(resolution)) as u32;
        Some(CaptureTimestamp {
            ts_sec: ts_sec.saturating_add(carry),
            ts_nsec: nsec,
        })
    }

    /// Build a timestamp from a `timeval`-style pair (microseconds)
    pub fn from_micros(ts_sec: u64, ts_usec: u32) -> CaptureTimestamp {
        let carry = u64::from(ts_usec) / MICROS_PER_SEC;
        let usec = u64::from(ts_usec) % MICROS_PER_SEC;
        CaptureTimestamp {
            ts_sec: ts_sec.saturating_add(carry),
            ts_nsec: (usec * 1000) as u32,
        }
    }

    pub fn as_duration(&self) -> Duration {
        Duration::from_secs(self.ts_sec).saturating_add(Duration::from_nanos(u64::from(self.ts_nsec)))
    }
}

impl From<Duration> for CaptureTimestamp {
    fn from(d: Duration) -> Self {
        CaptureTimestamp {
            ts_sec: d.as_secs(),
            ts_nsec: d.subsec_nanos(),
        }
    }
}

impl fmt::Display for CaptureTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}.{:09}", self.ts_sec, self.ts_nsec)
    }
}

/// Compute the timestamp resolution, in units per second
///
/// Return the resolution, or `None` if the resolution is invalid (for ex. greater than `2^64`)
pub fn build_ts_resolution(ts_resol: u8) -> Option<u64> {
    let ts_mode = ts_resol & 0x80;
    let unit = if ts_mode == 0 {
        // 10^if_tsresol
        // check that if_tsresol <= 19 (10^19 is the largest power of 10 to fit in a u64)
        if ts_resol > 19 {
            return None;
        }
        10u64.pow(ts_resol as u32)
    } else {
        // 2^if_tsresol
        // check that if_tsresol <= 63
        let exp = ts_resol & 0x7f;
        if exp > 63 {
            return None;
        }
        1 << u64::from(exp)
    };
    Some(unit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_ts_display() {
        let ts = CaptureTimestamp::new(1_340_954_905, 298_858_000);
        assert_eq!(ts.to_string(), "1340954905.298858000");
        let ts = CaptureTimestamp::new(12, 5);
        assert_eq!(ts.to_string(), "12.000000005");
    }

    #[test]
    fn capture_ts_carry() {
        let ts = CaptureTimestamp::new(1, 2_000_000_001);
        assert_eq!(ts, CaptureTimestamp { ts_sec: 3, ts_nsec: 1 });
        let ts = CaptureTimestamp::from_micros(1, 1_500_000);
        assert_eq!(ts, CaptureTimestamp { ts_sec: 2, ts_nsec: 500_000_000 });
    }

    #[test]
    fn capture_ts_from_fraction() {
        let micro = build_ts_resolution(6).unwrap();
        assert_eq!(micro, MICROS_PER_SEC);
        let ts = CaptureTimestamp::from_fraction(1_340_954_905, 298_858, micro).unwrap();
        assert_eq!(ts.ts_nsec, 298_858_000);

        // 2^-10 units
        let binary = build_ts_resolution(0x80 | 10).unwrap();
        assert_eq!(binary, 1024);
        let ts = CaptureTimestamp::from_fraction(0, 512, binary).unwrap();
        assert_eq!(ts.ts_nsec, 500_000_000);

        assert!(CaptureTimestamp::from_fraction(0, 1, 0).is_none());
        assert!(build_ts_resolution(20).is_none());
    }

    #[test]
    fn capture_ts_duration() {
        let d = Duration::new(5, 123);
        let ts = CaptureTimestamp::from(d);
        assert_eq!(ts.as_duration(), d);
    }
}
