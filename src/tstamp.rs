//! Capture timestamp type selection
//!
//! Capture sources can timestamp frames in several ways (host clock, adapter clock
//! synchronized or not with the host). For clock offset analysis, the adapter clock
//! is preferred, since it timestamps frames closest to the wire.
//!
//! ## Example
//!
//! ```rust
//! use clock_sync_observer::tstamp::select_timestamp_type;
//!
//! let supported = ["host", "adapter", "adapter_unsynced"];
//! assert_eq!(select_timestamp_type(&supported, None), Some("adapter_unsynced"));
//! assert_eq!(select_timestamp_type(&supported, Some("host")), Some("host"));
//! assert_eq!(select_timestamp_type(&["foo"], None), None);
//! ```

use rusticata_macros::newtype_enum;
use tracing::{debug, info, warn};

/// libpcap timestamp type (`PCAP_TSTAMP_*`)
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TimestampType(pub i32);

newtype_enum! {
impl display TimestampType {
    HOST = 0,
    HOST_LOWPREC = 1,
    HOST_HIPREC = 2,
    ADAPTER = 3,
    ADAPTER_UNSYNCED = 4,
    HOST_HIPREC_UNSYNCED = 5,
}
}

impl TimestampType {
    /// Name used by libpcap (`pcap_tstamp_type_val_to_name`)
    pub const fn name(self) -> Option<&'static str> {
        match self {
            TimestampType::HOST => Some("host"),
            TimestampType::HOST_LOWPREC => Some("host_lowprec"),
            TimestampType::HOST_HIPREC => Some("host_hiprec"),
            TimestampType::ADAPTER => Some("adapter"),
            TimestampType::ADAPTER_UNSYNCED => Some("adapter_unsynced"),
            TimestampType::HOST_HIPREC_UNSYNCED => Some("host_hiprec_unsynced"),
            _ => None,
        }
    }

    /// Inverse of [`TimestampType::name`] (`pcap_tstamp_type_name_to_val`)
    pub fn from_name(name: &str) -> Option<TimestampType> {
        let ty = match name {
            "host" => TimestampType::HOST,
            "host_lowprec" => TimestampType::HOST_LOWPREC,
            "host_hiprec" => TimestampType::HOST_HIPREC,
            "adapter" => TimestampType::ADAPTER,
            "adapter_unsynced" => TimestampType::ADAPTER_UNSYNCED,
            "host_hiprec_unsynced" => TimestampType::HOST_HIPREC_UNSYNCED,
            _ => return None,
        };
        Some(ty)
    }

    pub const fn description(self) -> Option<&'static str> {
        match self {
            TimestampType::HOST => Some("Host"),
            TimestampType::HOST_LOWPREC => Some("Host, low precision"),
            TimestampType::HOST_HIPREC => Some("Host, high precision, synced with the system clock"),
            TimestampType::ADAPTER => Some("Adapter"),
            TimestampType::ADAPTER_UNSYNCED => Some("Adapter, not synced with system time"),
            TimestampType::HOST_HIPREC_UNSYNCED => {
                Some("Host, high precision, not synced with the system clock")
            }
            _ => None,
        }
    }
}

/// Default ranking, most preferred first
pub const DEFAULT_PREFERENCE_ORDER: &[&str] = &["adapter_unsynced", "adapter", "host"];

// User choice ranks before any entry of the preference order
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Rank {
    User,
    Preferred(usize),
}

/// Pick the timestamp type to request from the capture source
///
/// A supported type matching the user preference always wins. Otherwise, the
/// supported type ranked first in the preference order is selected. Types absent
/// from the preference order are never selected. The result does not depend on the
/// order in which the supported types are listed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimestampTypeSelector<'p> {
    order: &'p [&'p str],
    user_preference: Option<&'p str>,
}

impl<'p> Default for TimestampTypeSelector<'p> {
    fn default() -> Self {
        TimestampTypeSelector::new(DEFAULT_PREFERENCE_ORDER)
    }
}

impl<'p> TimestampTypeSelector<'p> {
    /// Create a selector with a custom preference order (most preferred first)
    pub fn new(order: &'p [&'p str]) -> TimestampTypeSelector<'p> {
        TimestampTypeSelector {
            order,
            user_preference: None,
        }
    }

    pub fn with_user_preference(mut self, name: Option<&'p str>) -> TimestampTypeSelector<'p> {
        self.user_preference = name;
        self
    }

    pub fn order(&self) -> &'p [&'p str] {
        self.order
    }

    pub fn user_preference(&self) -> Option<&'p str> {
        self.user_preference
    }

    fn rank(&self, name: &str) -> Option<Rank> {
        if self.user_preference == Some(name) {
            return Some(Rank::User);
        }
        self.order
            .iter()
            .position(|&p| p == name)
            .map(Rank::Preferred)
    }

    fn best_index<'a, I>(&self, names: I) -> Option<usize>
    where
        I: Iterator<Item = Option<&'a str>>,
    {
        let mut best: Option<(Rank, usize)> = None;
        for (idx, name) in names.enumerate() {
            let name = match name {
                Some(name) => name,
                None => continue,
            };
            debug!(tstamp_type = name, "supported timestamp type");
            if let Some(rank) = self.rank(name) {
                if best.map_or(true, |(r, _)| rank < r) {
                    best = Some((rank, idx));
                }
            }
        }
        best.map(|(_, idx)| idx)
    }

    /// Select among timestamp type names
    ///
    /// Return `None` if no type is acceptable: the capture source should then keep
    /// its default.
    pub fn select<'s, S: AsRef<str>>(&self, supported: &'s [S]) -> Option<&'s str> {
        let chosen = self
            .best_index(supported.iter().map(|s| Some(s.as_ref())))
            .and_then(|idx| supported.get(idx))
            .map(|s| s.as_ref());
        log_selection(chosen);
        chosen
    }

    /// Select among numeric timestamp types; types without a known name are ignored
    pub fn select_type(&self, supported: &[TimestampType]) -> Option<TimestampType> {
        let chosen = self
            .best_index(supported.iter().map(|ty| ty.name()))
            .and_then(|idx| supported.get(idx))
            .copied();
        log_selection(chosen.and_then(TimestampType::name));
        chosen
    }
}

fn log_selection(chosen: Option<&str>) {
    match chosen {
        Some(name) => info!(tstamp_type = name, "setting timestamp type"),
        None => warn!("no preferred timestamp type found"),
    }
}

/// Select a timestamp type using [`DEFAULT_PREFERENCE_ORDER`]
pub fn select_timestamp_type<'s, S: AsRef<str>>(
    supported: &'s [S],
    preference: Option<&str>,
) -> Option<&'s str> {
    TimestampTypeSelector::default()
        .with_user_preference(preference)
        .select(supported)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUPPORTED: &[&str] = &["host", "adapter", "adapter_unsynced"];

    #[test]
    fn select_default_order() {
        assert_eq!(select_timestamp_type(SUPPORTED, None), Some("adapter_unsynced"));
        assert_eq!(select_timestamp_type(&["host", "adapter"], None), Some("adapter"));
        assert_eq!(select_timestamp_type(&["host_lowprec", "host"], None), Some("host"));
    }

    #[test]
    fn select_user_preference() {
        assert_eq!(select_timestamp_type(SUPPORTED, Some("host")), Some("host"));
        // preference listed after a ranked type
        let supported = ["adapter_unsynced", "host"];
        assert_eq!(select_timestamp_type(&supported, Some("host")), Some("host"));
        // preference outside of the ranking
        let supported = ["host", "host_hiprec"];
        assert_eq!(select_timestamp_type(&supported, Some("host_hiprec")), Some("host_hiprec"));
        // preference not supported: fall back to the ranking
        assert_eq!(
            select_timestamp_type(SUPPORTED, Some("host_hiprec")),
            Some("adapter_unsynced")
        );
    }

    #[test]
    fn select_none_acceptable() {
        assert_eq!(select_timestamp_type(&["foo"], None), None);
        let empty: &[&str] = &[];
        assert_eq!(select_timestamp_type(empty, Some("host")), None);
    }

    #[test]
    fn select_is_order_independent() {
        let permutations: &[[&str; 3]] = &[
            ["host", "adapter", "adapter_unsynced"],
            ["host", "adapter_unsynced", "adapter"],
            ["adapter", "host", "adapter_unsynced"],
            ["adapter", "adapter_unsynced", "host"],
            ["adapter_unsynced", "host", "adapter"],
            ["adapter_unsynced", "adapter", "host"],
        ];
        for p in permutations {
            assert_eq!(select_timestamp_type(p, None), Some("adapter_unsynced"));
            assert_eq!(select_timestamp_type(p, Some("adapter")), Some("adapter"));
        }
    }

    #[test]
    fn select_owned_names() {
        let supported: Vec<String> = vec!["host".to_string(), "adapter".to_string()];
        let selector = TimestampTypeSelector::new(&["host", "adapter"]);
        assert_eq!(selector.select(&supported[..]), Some("host"));
    }

    #[test]
    fn select_numeric_types() {
        let supported = [TimestampType::HOST, TimestampType(42), TimestampType::ADAPTER];
        let selector = TimestampTypeSelector::default();
        assert_eq!(selector.select_type(&supported), Some(TimestampType::ADAPTER));
        let selector = selector.with_user_preference(Some("host"));
        assert_eq!(selector.select_type(&supported), Some(TimestampType::HOST));
        assert_eq!(selector.select_type(&[TimestampType(42)]), None);
    }

    #[test]
    fn timestamp_type_names() {
        for v in 0..6 {
            let ty = TimestampType(v);
            let name = ty.name().expect("known type");
            assert_eq!(TimestampType::from_name(name), Some(ty));
            assert!(ty.description().is_some());
        }
        assert_eq!(TimestampType(6).name(), None);
        assert_eq!(TimestampType::from_name("foo"), None);
        assert_eq!(TimestampType::ADAPTER_UNSYNCED.to_string(), "ADAPTER_UNSYNCED");
    }
}
