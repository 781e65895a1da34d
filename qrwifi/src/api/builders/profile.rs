//! Wi-Fi profile builder.
//!
//! Constructs the nested settings dictionary NetworkManager's settings
//! service expects for a new infrastructure-mode Wi-Fi profile.
//!
//! # NetworkManager Settings Structure
//!
//! - `connection`: identity (type, id, uuid) and autoconnect behaviour
//! - `802-11-wireless`: SSID bytes, mode, hidden flag, security reference
//! - `802-11-wireless-security`: key management, and the PSK when secured
//! - `ipv4` / `ipv6`: automatic IPv4 with a DNS priority, IPv6 ignored

use std::collections::HashMap;
use uuid::Uuid;
use zvariant::Value;

use crate::api::models::ProvisionOptions;
use crate::api::payload::WifiCredentials;
use crate::types::constants::{connection_type, key_mgmt, profile_defaults, section};

/// A connection profile ready for submission.
///
/// Maps section name to a mapping of key to value. Ownership ends when the
/// profile is handed to the settings service.
#[derive(Debug, PartialEq)]
pub struct NetworkProfile {
    settings: HashMap<&'static str, HashMap<&'static str, Value<'static>>>,
}

impl NetworkProfile {
    /// Returns a whole section.
    pub fn section(&self, name: &str) -> Option<&HashMap<&'static str, Value<'static>>> {
        self.settings.get(name)
    }

    /// Returns a single setting.
    pub fn get(&self, section_name: &str, key: &str) -> Option<&Value<'static>> {
        self.settings.get(section_name)?.get(key)
    }

    /// Returns true if the section is present.
    pub fn has_section(&self, name: &str) -> bool {
        self.settings.contains_key(name)
    }

    /// The `connection.id` of the profile.
    pub fn id(&self) -> Option<&str> {
        match self.get(section::CONNECTION, "id")? {
            Value::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Consumes the profile, returning the raw settings dictionary.
    pub fn into_settings(self) -> HashMap<&'static str, HashMap<&'static str, Value<'static>>> {
        self.settings
    }
}

/// Builder for provisioned Wi-Fi profiles.
///
/// The security section depends only on the password: a non-empty password
/// yields WPA-PSK with open authentication, an empty one yields no key
/// management.
///
/// # Example
///
/// ```rust
/// use qrwifi::builders::ProfileBuilder;
/// use zvariant::Value;
///
/// let profile = ProfileBuilder::new("CoffeeShop").build();
///
/// assert_eq!(
///     profile.get("802-11-wireless-security", "key-mgmt"),
///     Some(&Value::from("none"))
/// );
/// assert!(profile.get("802-11-wireless-security", "psk").is_none());
/// ```
#[derive(Debug, Clone)]
pub struct ProfileBuilder {
    ssid: String,
    password: String,
    uuid: Option<Uuid>,
    dns_priority: i32,
    autoconnect_retries: i32,
}

impl ProfileBuilder {
    /// Creates a builder for an open network with the given SSID.
    pub fn new(ssid: impl Into<String>) -> Self {
        Self {
            ssid: ssid.into(),
            password: String::new(),
            uuid: None,
            dns_priority: profile_defaults::DNS_PRIORITY,
            autoconnect_retries: profile_defaults::AUTOCONNECT_RETRIES_FOREVER,
        }
    }

    /// Creates a builder from scanned credentials and provisioning options.
    pub fn from_credentials(creds: &WifiCredentials, opts: &ProvisionOptions) -> Self {
        Self::new(creds.ssid.clone())
            .password(creds.password.clone())
            .dns_priority(opts.dns_priority)
            .autoconnect_retries(opts.autoconnect_retries)
    }

    /// Sets the pre-shared key. An empty string means an open network.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    /// Sets a specific UUID for the connection.
    ///
    /// By default, a random UUID is generated.
    pub fn uuid(mut self, uuid: Uuid) -> Self {
        self.uuid = Some(uuid);
        self
    }

    /// Sets `ipv4.dns-priority`.
    pub fn dns_priority(mut self, priority: i32) -> Self {
        self.dns_priority = priority;
        self
    }

    /// Sets `connection.autoconnect-retries` (0 = forever).
    pub fn autoconnect_retries(mut self, retries: i32) -> Self {
        self.autoconnect_retries = retries;
        self
    }

    /// Builds the profile.
    pub fn build(self) -> NetworkProfile {
        let mut settings = HashMap::new();

        let mut connection = HashMap::new();
        connection.insert("type", Value::from(connection_type::WIRELESS));
        connection.insert("id", Value::from(self.ssid.clone()));
        connection.insert(
            "uuid",
            Value::from(self.uuid.unwrap_or_else(Uuid::new_v4).to_string()),
        );
        connection.insert("autoconnect", Value::from(true));
        connection.insert("autoconnect-retries", Value::from(self.autoconnect_retries));
        settings.insert(section::CONNECTION, connection);

        let mut wireless = HashMap::new();
        wireless.insert("ssid", Value::from(self.ssid.into_bytes()));
        wireless.insert("hidden", Value::from(false));
        wireless.insert("mode", Value::from("infrastructure"));
        wireless.insert("security", Value::from(section::WIRELESS_SECURITY));
        settings.insert(section::WIRELESS, wireless);

        let mut security = HashMap::new();
        if self.password.is_empty() {
            security.insert("key-mgmt", Value::from(key_mgmt::NONE));
        } else {
            security.insert("key-mgmt", Value::from(key_mgmt::WPA_PSK));
            security.insert("auth-alg", Value::from(key_mgmt::AUTH_ALG_OPEN));
            security.insert("psk", Value::from(self.password));
        }
        settings.insert(section::WIRELESS_SECURITY, security);

        let mut ipv4 = HashMap::new();
        ipv4.insert("method", Value::from("auto"));
        ipv4.insert("dns-priority", Value::from(self.dns_priority));
        settings.insert(section::IPV4, ipv4);

        let mut ipv6 = HashMap::new();
        ipv6.insert("method", Value::from("ignore"));
        settings.insert(section::IPV6, ipv6);

        NetworkProfile { settings }
    }
}
