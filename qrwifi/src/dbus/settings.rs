//! NetworkManager Settings proxies.
//!
//! Saved connection profiles live under `/org/freedesktop/NetworkManager/Settings`.

use std::collections::HashMap;
use zbus::{Result, proxy};
use zvariant::OwnedObjectPath;

/// Proxy for the settings service.
#[proxy(
    interface = "org.freedesktop.NetworkManager.Settings",
    default_service = "org.freedesktop.NetworkManager",
    default_path = "/org/freedesktop/NetworkManager/Settings"
)]
pub trait NMSettings {
    /// Paths to all saved connection profiles.
    fn list_connections(&self) -> Result<Vec<OwnedObjectPath>>;

    /// Persists a new connection profile without activating it.
    fn add_connection(
        &self,
        connection: HashMap<&str, HashMap<&str, zvariant::Value<'_>>>,
    ) -> Result<OwnedObjectPath>;
}

/// Proxy for a single saved connection profile.
///
/// `GetSettings` is called through a raw proxy so the returned values can be
/// borrowed from the reply body.
#[proxy(
    interface = "org.freedesktop.NetworkManager.Settings.Connection",
    default_service = "org.freedesktop.NetworkManager"
)]
pub trait NMSettingsConnection {
    /// Removes the profile permanently.
    fn delete(&self) -> Result<()>;
}
