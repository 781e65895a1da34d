use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use thiserror::Error;

use crate::types::constants::{profile_defaults, signal_strength, timeouts};

/// Declares an opaque handle to a D-Bus object.
///
/// Handles compare and hash by their object path but are deliberately not
/// interchangeable with one another or with display text.
macro_rules! object_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            /// Wraps a D-Bus object path.
            pub fn new(path: impl Into<String>) -> Self {
                Self(path.into())
            }

            /// The underlying object path.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<zvariant::OwnedObjectPath> for $name {
            fn from(path: zvariant::OwnedObjectPath) -> Self {
                Self(path.as_str().to_owned())
            }
        }

        impl TryFrom<&$name> for zvariant::OwnedObjectPath {
            type Error = ProvisionError;

            fn try_from(handle: &$name) -> Result<Self, Self::Error> {
                zvariant::OwnedObjectPath::try_from(handle.as_str())
                    .map_err(|_| ProvisionError::InvalidPath(handle.0.clone()))
            }
        }
    };
}

object_handle!(
    /// Reference to a currently active connection.
    ActiveLinkHandle
);
object_handle!(
    /// Reference to a saved connection profile.
    ProfileHandle
);
object_handle!(
    /// Reference to a network device.
    DeviceHandle
);
object_handle!(
    /// Reference to a visible access point.
    AccessPointHandle
);

/// Summary of one saved connection profile.
///
/// Extracted from the nested `GetSettings` mapping; only the fields the
/// provisioning flow matches on are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedProfile {
    /// Object path of the profile.
    pub handle: ProfileHandle,
    /// Value of `connection.type`, empty if absent.
    pub connection_type: String,
    /// Value of `connection.id`, empty if absent.
    pub id: String,
    /// Raw `802-11-wireless.ssid` bytes, `None` for non-wireless profiles.
    ///
    /// SSIDs are byte strings and need not be valid UTF-8; use
    /// [`SavedProfile::ssid_lossy`] for display.
    pub ssid: Option<Vec<u8>>,
}

impl SavedProfile {
    /// Returns true for Wi-Fi profiles.
    pub fn is_wireless(&self) -> bool {
        self.connection_type == crate::types::constants::connection_type::WIRELESS
    }

    /// Returns true if this is a Wi-Fi profile for `ssid`.
    ///
    /// Compares raw bytes. An empty target never matches.
    pub fn matches_ssid(&self, ssid: &str) -> bool {
        !ssid.is_empty() && self.is_wireless() && self.ssid.as_deref() == Some(ssid.as_bytes())
    }

    /// The SSID decoded for display, invalid UTF-8 replaced.
    pub fn ssid_lossy(&self) -> Option<Cow<'_, str>> {
        self.ssid.as_deref().map(String::from_utf8_lossy)
    }
}

/// Bucketed signal level shown next to the QR result.
///
/// Ordered from worst to best. `Offline` means the radio is disabled,
/// `NoRoute` means the radio is on but nothing measurable was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SignalLevel {
    /// Wi-Fi radio is disabled.
    Offline,
    /// Radio enabled but no matching access point (or zero strength).
    NoRoute,
    /// Strength below 20%.
    None,
    /// Strength below 40%.
    Weak,
    /// Strength below 50%.
    Ok,
    /// Strength below 80%.
    Good,
    /// Strength of 80% or more.
    Excellent,
}

impl SignalLevel {
    /// Buckets a 0-100 strength reading.
    ///
    /// A disabled radio is always `Offline`, whatever the reading.
    pub fn from_strength(radio_enabled: bool, strength: u8) -> Self {
        if !radio_enabled {
            return Self::Offline;
        }
        match strength {
            0 => Self::NoRoute,
            s if s < signal_strength::NONE_BELOW => Self::None,
            s if s < signal_strength::WEAK_BELOW => Self::Weak,
            s if s < signal_strength::OK_BELOW => Self::Ok,
            s if s < signal_strength::GOOD_BELOW => Self::Good,
            _ => Self::Excellent,
        }
    }

    /// Freedesktop symbolic icon name for this level.
    pub fn icon_name(&self) -> &'static str {
        match self {
            Self::Offline => "network-wireless-offline-symbolic",
            Self::NoRoute => "network-wireless-no-route-symbolic",
            Self::None => "network-wireless-signal-none-symbolic",
            Self::Weak => "network-wireless-signal-weak-symbolic",
            Self::Ok => "network-wireless-signal-ok-symbolic",
            Self::Good => "network-wireless-signal-good-symbolic",
            Self::Excellent => "network-wireless-signal-excellent-symbolic",
        }
    }
}

impl Display for SignalLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Offline => write!(f, "offline"),
            Self::NoRoute => write!(f, "no route"),
            Self::None => write!(f, "none"),
            Self::Weak => write!(f, "weak"),
            Self::Ok => write!(f, "ok"),
            Self::Good => write!(f, "good"),
            Self::Excellent => write!(f, "excellent"),
        }
    }
}

/// Options applied to every provisioning attempt.
///
/// # Examples
///
/// ```rust
/// use qrwifi::ProvisionOptions;
/// use std::time::Duration;
///
/// let opts = ProvisionOptions::default()
///     .with_dns_priority(10)
///     .with_discovery_timeout(Some(Duration::from_secs(5)));
/// assert_eq!(opts.dns_priority, 10);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisionOptions {
    /// `ipv4.dns-priority` of new profiles (lower wins).
    pub dns_priority: i32,
    /// `connection.autoconnect-retries` of new profiles (0 = forever).
    pub autoconnect_retries: i32,
    /// Upper bound on waiting for the access-point-added signal.
    /// `None` waits until the bus delivers it.
    pub discovery_timeout: Option<Duration>,
}

impl Default for ProvisionOptions {
    /// Defaults:
    /// - `dns_priority`: 50
    /// - `autoconnect_retries`: 0 (unlimited)
    /// - `discovery_timeout`: 30 seconds
    fn default() -> Self {
        Self {
            dns_priority: profile_defaults::DNS_PRIORITY,
            autoconnect_retries: profile_defaults::AUTOCONNECT_RETRIES_FOREVER,
            discovery_timeout: Some(timeouts::discovery_timeout()),
        }
    }
}

impl ProvisionOptions {
    /// Sets the IPv4 DNS priority of new profiles.
    pub fn with_dns_priority(mut self, priority: i32) -> Self {
        self.dns_priority = priority;
        self
    }

    /// Sets the autoconnect retry count of new profiles.
    pub fn with_autoconnect_retries(mut self, retries: i32) -> Self {
        self.autoconnect_retries = retries;
        self
    }

    /// Sets the discovery wait deadline.
    pub fn with_discovery_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.discovery_timeout = timeout;
        self
    }
}

/// What a completed provisioning attempt did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisionReport {
    /// The provisioned network.
    pub ssid: String,
    /// Number of active Wi-Fi links that were torn down.
    pub deactivated: usize,
    /// Number of stale saved profiles deleted.
    pub pruned: usize,
    /// The newly added profile.
    pub profile: ProfileHandle,
    /// Signal strength of the network, if it was seen after provisioning.
    pub strength: Option<u8>,
    /// Bucketed signal level.
    pub level: SignalLevel,
}

/// Result of handing a scanned payload to the provisioner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadOutcome {
    /// The payload is a URL; the caller decides whether to open it.
    OpenUrl(String),
    /// The payload carried Wi-Fi credentials and the network was provisioned.
    Provisioned(ProvisionReport),
    /// Nothing usable was found.
    Ignored,
}

/// Errors that can occur during provisioning.
///
/// Not-found conditions (no active Wi-Fi link, no stale profile, no visible
/// access point, no wireless device) are never reported through this type.
///
/// # Examples
///
/// ```no_run
/// use qrwifi::{ProvisionError, WifiCredentials, WifiProvisioner};
///
/// # async fn example() -> qrwifi::Result<()> {
/// let provisioner = WifiProvisioner::new().await?;
/// let creds = WifiCredentials::new("Home", "WPA", "hunter22");
///
/// match provisioner.provision(&creds).await {
///     Ok(report) => println!("{} is {}", report.ssid, report.level),
///     Err(ProvisionError::DbusOperation { context, .. }) => eprintln!("{context}"),
///     Err(e) => eprintln!("provisioning failed: {e}"),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// The bus could not be reached or an interface was invalid.
    #[error("D-Bus error: {0}")]
    Dbus(#[from] zbus::Error),

    /// A named D-Bus call failed.
    #[error("{context}: {source}")]
    DbusOperation {
        /// The call and object it was made on.
        context: String,
        /// The error reported by the bus or the service.
        #[source]
        source: zbus::Error,
    },

    /// A call was rejected by the network service.
    #[error("{call} on {target} failed: {reason}")]
    CallFailed {
        /// Name of the remote call.
        call: &'static str,
        /// Object the call was made on.
        target: String,
        /// Service-provided reason.
        reason: String,
    },

    /// The SSID is empty or longer than 32 bytes.
    #[error("invalid SSID '{0}': must be 1 to 32 bytes")]
    InvalidSsid(String),

    /// A handle did not hold a valid D-Bus object path.
    #[error("invalid object path: {0}")]
    InvalidPath(String),
}

impl ProvisionError {
    /// Wraps a zbus error with the call and object it came from.
    pub(crate) fn dbus(context: impl Into<String>, source: zbus::Error) -> Self {
        Self::DbusOperation {
            context: context.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_radio_is_always_offline() {
        for s in [0u8, 1, 19, 20, 50, 79, 80, 100] {
            assert_eq!(SignalLevel::from_strength(false, s), SignalLevel::Offline);
        }
    }

    #[test]
    fn strength_buckets_at_boundaries() {
        assert_eq!(SignalLevel::from_strength(true, 0), SignalLevel::NoRoute);
        assert_eq!(SignalLevel::from_strength(true, 1), SignalLevel::None);
        assert_eq!(SignalLevel::from_strength(true, 19), SignalLevel::None);
        assert_eq!(SignalLevel::from_strength(true, 20), SignalLevel::Weak);
        assert_eq!(SignalLevel::from_strength(true, 39), SignalLevel::Weak);
        assert_eq!(SignalLevel::from_strength(true, 40), SignalLevel::Ok);
        assert_eq!(SignalLevel::from_strength(true, 49), SignalLevel::Ok);
        assert_eq!(SignalLevel::from_strength(true, 50), SignalLevel::Good);
        assert_eq!(SignalLevel::from_strength(true, 79), SignalLevel::Good);
        assert_eq!(SignalLevel::from_strength(true, 80), SignalLevel::Excellent);
        assert_eq!(SignalLevel::from_strength(true, 100), SignalLevel::Excellent);
    }

    #[test]
    fn bucketing_is_monotonic() {
        let mut prev = SignalLevel::from_strength(true, 0);
        for s in 1..=100u8 {
            let level = SignalLevel::from_strength(true, s);
            assert!(level >= prev, "level dropped at {s}");
            prev = level;
        }
    }

    #[test]
    fn levels_are_ordered() {
        assert!(SignalLevel::Offline < SignalLevel::NoRoute);
        assert!(SignalLevel::NoRoute < SignalLevel::None);
        assert!(SignalLevel::Good < SignalLevel::Excellent);
    }

    #[test]
    fn icon_names() {
        assert_eq!(
            SignalLevel::Offline.icon_name(),
            "network-wireless-offline-symbolic"
        );
        assert_eq!(
            SignalLevel::Excellent.icon_name(),
            "network-wireless-signal-excellent-symbolic"
        );
    }

    #[test]
    fn handles_compare_by_path() {
        let a = AccessPointHandle::new("/org/freedesktop/NetworkManager/AccessPoint/1");
        let b = AccessPointHandle::new("/org/freedesktop/NetworkManager/AccessPoint/1");
        assert_eq!(a, b);
        assert_eq!(a.to_string(), a.as_str());
    }

    #[test]
    fn invalid_handle_path_is_rejected() {
        let bad = ActiveLinkHandle::new("not a path");
        let err = zvariant::OwnedObjectPath::try_from(&bad).unwrap_err();
        assert!(matches!(err, ProvisionError::InvalidPath(p) if p == "not a path"));
    }

    #[test]
    fn saved_profile_matching() {
        let wifi = SavedProfile {
            handle: ProfileHandle::new("/org/freedesktop/NetworkManager/Settings/1"),
            connection_type: "802-11-wireless".into(),
            id: "Home".into(),
            ssid: Some(b"Home".to_vec()),
        };
        assert!(wifi.matches_ssid("Home"));
        assert!(!wifi.matches_ssid("Cafe"));

        let wired = SavedProfile {
            connection_type: "802-3-ethernet".into(),
            ssid: None,
            ..wifi
        };
        assert!(!wired.matches_ssid("Home"));
    }

    #[test]
    fn non_utf8_ssid_matches_nothing_textual() {
        let profile = SavedProfile {
            handle: ProfileHandle::new("/org/freedesktop/NetworkManager/Settings/7"),
            connection_type: "802-11-wireless".into(),
            id: "odd".into(),
            ssid: Some(vec![0xff, 0xfe, 0x41]),
        };
        assert!(!profile.matches_ssid(""));
        assert!(!profile.matches_ssid("A"));
        assert_eq!(profile.ssid_lossy().as_deref(), Some("\u{fffd}\u{fffd}A"));
    }

    #[test]
    fn empty_target_never_matches() {
        let hidden = SavedProfile {
            handle: ProfileHandle::new("/org/freedesktop/NetworkManager/Settings/8"),
            connection_type: "802-11-wireless".into(),
            id: "hidden".into(),
            ssid: Some(Vec::new()),
        };
        assert!(!hidden.matches_ssid(""));
    }

    #[test]
    fn default_options() {
        let opts = ProvisionOptions::default();
        assert_eq!(opts.dns_priority, 50);
        assert_eq!(opts.autoconnect_retries, 0);
        assert_eq!(opts.discovery_timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn error_display() {
        let e = ProvisionError::CallFailed {
            call: "Delete",
            target: "/org/freedesktop/NetworkManager/Settings/3".into(),
            reason: "permission denied".into(),
        };
        assert_eq!(
            e.to_string(),
            "Delete on /org/freedesktop/NetworkManager/Settings/3 failed: permission denied"
        );
    }
}
