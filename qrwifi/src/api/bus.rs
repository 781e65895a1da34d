//! The remote calls the provisioning flow makes.
//!
//! [`NetworkBus`] lists every NetworkManager call the pipeline issues, one
//! method per call. [`BusSession`](crate::BusSession) implements it over the
//! system D-Bus; other implementations can stand in for NetworkManager.

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::Result;
use crate::api::builders::NetworkProfile;
use crate::api::models::{
    AccessPointHandle, ActiveLinkHandle, DeviceHandle, ProfileHandle, SavedProfile,
};

/// Connection-manager, settings, device and access-point calls.
///
/// Every method is a single request/reply call. Implementations must not
/// retry; a failed call is reported once and the caller decides whether
/// the flow continues.
#[async_trait]
pub trait NetworkBus: Send + Sync {
    /// Lists currently active connections.
    async fn active_connections(&self) -> Result<Vec<ActiveLinkHandle>>;

    /// Reads the link type (`Type` property) of an active connection.
    async fn active_connection_type(&self, link: &ActiveLinkHandle) -> Result<String>;

    /// Tears down an active connection.
    async fn deactivate_connection(&self, link: &ActiveLinkHandle) -> Result<()>;

    /// Lists saved connection profiles.
    async fn saved_connections(&self) -> Result<Vec<ProfileHandle>>;

    /// Fetches and summarizes the settings of a saved profile.
    async fn saved_profile(&self, profile: &ProfileHandle) -> Result<SavedProfile>;

    /// Deletes a saved profile.
    async fn delete_connection(&self, profile: &ProfileHandle) -> Result<()>;

    /// Persists a new profile without activating it.
    async fn add_connection(&self, profile: NetworkProfile) -> Result<ProfileHandle>;

    /// Whether the Wi-Fi radio is enabled.
    async fn wireless_enabled(&self) -> Result<bool>;

    /// Enables or disables the Wi-Fi radio.
    async fn set_wireless_enabled(&self, enabled: bool) -> Result<()>;

    /// Lists network devices.
    async fn devices(&self) -> Result<Vec<DeviceHandle>>;

    /// Reads the numeric device type (2 = Wi-Fi).
    async fn device_type(&self, device: &DeviceHandle) -> Result<u32>;

    /// Lists access points visible to a wireless device.
    async fn access_points(&self, device: &DeviceHandle) -> Result<Vec<AccessPointHandle>>;

    /// Reads the raw SSID of an access point.
    async fn access_point_ssid(&self, ap: &AccessPointHandle) -> Result<Vec<u8>>;

    /// Reads the 0-100 signal strength of an access point.
    async fn access_point_strength(&self, ap: &AccessPointHandle) -> Result<u8>;

    /// Subscribes to access-point-added events of a wireless device.
    ///
    /// Dropping the stream removes the subscription.
    async fn access_point_added(
        &self,
        device: &DeviceHandle,
    ) -> Result<BoxStream<'static, AccessPointHandle>>;
}
