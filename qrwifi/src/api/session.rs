//! System-bus implementation of [`NetworkBus`].

use async_trait::async_trait;
use futures::StreamExt;
use futures::stream::BoxStream;
use log::{debug, warn};
use std::collections::HashMap;
use zbus::Connection;
use zvariant::{OwnedObjectPath, Value};

use crate::Result;
use crate::api::builders::NetworkProfile;
use crate::api::bus::NetworkBus;
use crate::api::models::{
    AccessPointHandle, ActiveLinkHandle, DeviceHandle, ProfileHandle, ProvisionError,
    SavedProfile,
};
use crate::dbus::{
    NMAccessPointProxy, NMActiveConnectionProxy, NMDeviceProxy, NMProxy,
    NMSettingsConnectionProxy, NMSettingsProxy, NMWirelessProxy,
};
use crate::util::utils::{nm_proxy, saved_profile_from_settings};

/// Handle to the system bus.
///
/// Every other component issues its calls through this session. Cloning
/// shares the underlying D-Bus connection.
///
/// # Example
///
/// ```no_run
/// use qrwifi::{BusSession, NetworkBus};
///
/// # async fn example() -> qrwifi::Result<()> {
/// let bus = BusSession::system().await?;
/// println!("Wi-Fi enabled: {}", bus.wireless_enabled().await?);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct BusSession {
    conn: Connection,
}

impl BusSession {
    /// Connects to the system D-Bus.
    pub async fn system() -> Result<Self> {
        let conn = Connection::system().await?;
        Ok(Self { conn })
    }

    /// Wraps an existing connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    /// The underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

#[async_trait]
impl NetworkBus for BusSession {
    async fn active_connections(&self) -> Result<Vec<ActiveLinkHandle>> {
        let nm = NMProxy::new(&self.conn).await?;
        let paths = nm
            .active_connections()
            .await
            .map_err(|e| ProvisionError::dbus("failed to list active connections", e))?;
        Ok(paths.into_iter().map(ActiveLinkHandle::from).collect())
    }

    async fn active_connection_type(&self, link: &ActiveLinkHandle) -> Result<String> {
        let ac = NMActiveConnectionProxy::builder(&self.conn)
            .path(OwnedObjectPath::try_from(link)?)?
            .build()
            .await?;
        ac.connection_type()
            .await
            .map_err(|e| ProvisionError::dbus(format!("failed to read type of {link}"), e))
    }

    async fn deactivate_connection(&self, link: &ActiveLinkHandle) -> Result<()> {
        let nm = NMProxy::new(&self.conn).await?;
        nm.deactivate_connection(OwnedObjectPath::try_from(link)?)
            .await
            .map_err(|e| ProvisionError::dbus(format!("failed to deactivate {link}"), e))?;
        debug!("Deactivated connection: {link}");
        Ok(())
    }

    async fn saved_connections(&self) -> Result<Vec<ProfileHandle>> {
        let settings = NMSettingsProxy::new(&self.conn).await?;
        let paths = settings
            .list_connections()
            .await
            .map_err(|e| ProvisionError::dbus("failed to list saved connections", e))?;
        Ok(paths.into_iter().map(ProfileHandle::from).collect())
    }

    async fn saved_profile(&self, profile: &ProfileHandle) -> Result<SavedProfile> {
        let cproxy = nm_proxy(
            &self.conn,
            OwnedObjectPath::try_from(profile)?,
            "org.freedesktop.NetworkManager.Settings.Connection",
        )
        .await?;

        let msg = cproxy
            .call_method("GetSettings", &())
            .await
            .map_err(|e| ProvisionError::dbus(format!("failed to read settings of {profile}"), e))?;
        let body = msg.body();
        let all: HashMap<String, HashMap<String, Value>> = body.deserialize()?;

        Ok(saved_profile_from_settings(profile.clone(), &all))
    }

    async fn delete_connection(&self, profile: &ProfileHandle) -> Result<()> {
        let cproxy = NMSettingsConnectionProxy::builder(&self.conn)
            .path(OwnedObjectPath::try_from(profile)?)?
            .build()
            .await?;
        cproxy
            .delete()
            .await
            .map_err(|e| ProvisionError::dbus(format!("failed to delete {profile}"), e))?;
        debug!("Deleted connection: {profile}");
        Ok(())
    }

    async fn add_connection(&self, profile: NetworkProfile) -> Result<ProfileHandle> {
        let id = profile.id().unwrap_or_default().to_owned();
        let settings = NMSettingsProxy::new(&self.conn).await?;
        let path = settings
            .add_connection(profile.into_settings())
            .await
            .map_err(|e| ProvisionError::dbus(format!("failed to add profile '{id}'"), e))?;
        debug!("Added connection '{id}': {}", path.as_str());
        Ok(ProfileHandle::from(path))
    }

    async fn wireless_enabled(&self) -> Result<bool> {
        let nm = NMProxy::new(&self.conn).await?;
        Ok(nm.wireless_enabled().await?)
    }

    async fn set_wireless_enabled(&self, enabled: bool) -> Result<()> {
        let nm = NMProxy::new(&self.conn).await?;
        nm.set_wireless_enabled(enabled)
            .await
            .map_err(|e| ProvisionError::dbus("failed to set WirelessEnabled", e))
    }

    async fn devices(&self) -> Result<Vec<DeviceHandle>> {
        let nm = NMProxy::new(&self.conn).await?;
        let paths = nm
            .get_devices()
            .await
            .map_err(|e| ProvisionError::dbus("failed to get device paths", e))?;
        Ok(paths.into_iter().map(DeviceHandle::from).collect())
    }

    async fn device_type(&self, device: &DeviceHandle) -> Result<u32> {
        let dev = NMDeviceProxy::builder(&self.conn)
            .path(OwnedObjectPath::try_from(device)?)?
            .build()
            .await?;
        dev.device_type()
            .await
            .map_err(|e| ProvisionError::dbus(format!("failed to get device type for {device}"), e))
    }

    async fn access_points(&self, device: &DeviceHandle) -> Result<Vec<AccessPointHandle>> {
        let wifi = NMWirelessProxy::builder(&self.conn)
            .path(OwnedObjectPath::try_from(device)?)?
            .build()
            .await?;
        let paths = wifi
            .get_all_access_points()
            .await
            .map_err(|e| ProvisionError::dbus(format!("failed to list access points of {device}"), e))?;
        Ok(paths.into_iter().map(AccessPointHandle::from).collect())
    }

    async fn access_point_ssid(&self, ap: &AccessPointHandle) -> Result<Vec<u8>> {
        let proxy = NMAccessPointProxy::builder(&self.conn)
            .path(OwnedObjectPath::try_from(ap)?)?
            .build()
            .await?;
        Ok(proxy.ssid().await?)
    }

    async fn access_point_strength(&self, ap: &AccessPointHandle) -> Result<u8> {
        let proxy = NMAccessPointProxy::builder(&self.conn)
            .path(OwnedObjectPath::try_from(ap)?)?
            .build()
            .await?;
        Ok(proxy.strength().await?)
    }

    async fn access_point_added(
        &self,
        device: &DeviceHandle,
    ) -> Result<BoxStream<'static, AccessPointHandle>> {
        let wifi = NMWirelessProxy::builder(&self.conn)
            .path(OwnedObjectPath::try_from(device)?)?
            .build()
            .await?;

        let stream = wifi.receive_access_point_added().await?;
        debug!("Subscribed to AccessPointAdded on {device}");

        Ok(stream
            .filter_map(|signal| async move {
                match signal.args() {
                    Ok(args) => Some(AccessPointHandle::from(args.access_point.clone())),
                    Err(e) => {
                        warn!("Failed to parse AccessPointAdded signal args: {e}");
                        None
                    }
                }
            })
            .boxed())
    }
}
