//! Constants for NetworkManager D-Bus interface values.
//!
//! These constants correspond to the numeric codes and setting names used by
//! NetworkManager's D-Bus API for device types, connection types and the
//! connection profile schema.

/// NetworkManager device type constants.
pub mod device_type {
    pub const WIFI: u32 = 2;
}

/// Connection type strings as stored in the `connection.type` setting and
/// reported by the `Type` property of active connections.
pub mod connection_type {
    pub const WIRELESS: &str = "802-11-wireless";
}

/// SSID length limits (IEEE 802.11), in bytes.
pub mod ssid {
    pub const MAX_LEN: usize = 32;
}

/// Section names of a connection profile.
pub mod section {
    pub const CONNECTION: &str = "connection";
    pub const WIRELESS: &str = "802-11-wireless";
    pub const WIRELESS_SECURITY: &str = "802-11-wireless-security";
    pub const IPV4: &str = "ipv4";
    pub const IPV6: &str = "ipv6";
}

/// Wi-Fi security setting values.
pub mod key_mgmt {
    pub const WPA_PSK: &str = "wpa-psk";
    pub const NONE: &str = "none";
    pub const AUTH_ALG_OPEN: &str = "open";
}

/// Defaults for newly provisioned profiles.
pub mod profile_defaults {
    /// Lower values win; NetworkManager uses 100 for regular connections.
    pub const DNS_PRIORITY: i32 = 50;
    /// 0 tells NetworkManager to retry autoconnect forever.
    pub const AUTOCONNECT_RETRIES_FOREVER: i32 = 0;
}

/// Timeout constants
pub mod timeouts {
    use std::time::Duration;

    pub const DISCOVERY_TIMEOUT_SECS: u64 = 30;

    pub fn discovery_timeout() -> Duration {
        Duration::from_secs(DISCOVERY_TIMEOUT_SECS)
    }
}

/// Signal strength thresholds for level buckets (exclusive upper bounds).
pub mod signal_strength {
    pub const NONE_BELOW: u8 = 20;
    pub const WEAK_BELOW: u8 = 40;
    pub const OK_BELOW: u8 = 50;
    pub const GOOD_BELOW: u8 = 80;
}

