//! In-memory [`NetworkBus`] for pipeline tests.

use async_trait::async_trait;
use futures::StreamExt;
use futures::stream::{self, BoxStream};
use std::sync::{Mutex, MutexGuard};

use crate::Result;
use crate::api::builders::NetworkProfile;
use crate::api::bus::NetworkBus;
use crate::api::models::{
    AccessPointHandle, ActiveLinkHandle, DeviceHandle, ProfileHandle, ProvisionError,
    SavedProfile,
};
use crate::types::constants::{connection_type, device_type};

#[derive(Default)]
struct State {
    active: Vec<(ActiveLinkHandle, String)>,
    saved: Vec<SavedProfile>,
    added: Vec<NetworkProfile>,
    radio: bool,
    devices: Vec<(DeviceHandle, u32)>,
    access_points: Vec<(AccessPointHandle, Vec<u8>, u8)>,
    events: Vec<AccessPointHandle>,
    silent_events: bool,
    failing: Option<&'static str>,
    scans: usize,
    calls: Vec<String>,
}

/// Records every call and mutates its state the way NetworkManager would.
#[derive(Default)]
pub(crate) struct FakeBus {
    state: Mutex<State>,
}

impl FakeBus {
    pub(crate) fn new() -> Self {
        let bus = Self::default();
        bus.lock().radio = true;
        bus
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    pub(crate) fn with_active_link(self, path: &str, link_type: &str) -> Self {
        self.lock()
            .active
            .push((ActiveLinkHandle::new(path), link_type.to_string()));
        self
    }

    pub(crate) fn with_saved_wifi(self, path: &str, ssid: &str) -> Self {
        self.with_saved_wifi_bytes(path, ssid, ssid.as_bytes())
    }

    pub(crate) fn with_saved_wifi_bytes(self, path: &str, id: &str, ssid: &[u8]) -> Self {
        self.lock().saved.push(SavedProfile {
            handle: ProfileHandle::new(path),
            connection_type: connection_type::WIRELESS.to_string(),
            id: id.to_string(),
            ssid: Some(ssid.to_vec()),
        });
        self
    }

    pub(crate) fn with_saved_wired(self, path: &str, id: &str) -> Self {
        self.lock().saved.push(SavedProfile {
            handle: ProfileHandle::new(path),
            connection_type: "802-3-ethernet".to_string(),
            id: id.to_string(),
            ssid: None,
        });
        self
    }

    pub(crate) fn with_radio(self, enabled: bool) -> Self {
        self.lock().radio = enabled;
        self
    }

    pub(crate) fn with_device(self, path: &str, kind: u32) -> Self {
        self.lock().devices.push((DeviceHandle::new(path), kind));
        self
    }

    pub(crate) fn with_wifi_device(self, path: &str) -> Self {
        self.with_device(path, device_type::WIFI)
    }

    pub(crate) fn with_access_point(self, path: &str, ssid: &str, strength: u8) -> Self {
        self.with_access_point_bytes(path, ssid.as_bytes(), strength)
    }

    pub(crate) fn with_access_point_bytes(self, path: &str, ssid: &[u8], strength: u8) -> Self {
        self.lock()
            .access_points
            .push((AccessPointHandle::new(path), ssid.to_vec(), strength));
        self
    }

    /// Access-point-added events delivered to the next subscriber.
    pub(crate) fn with_events(self, paths: &[&str]) -> Self {
        self.lock()
            .events
            .extend(paths.iter().map(|p| AccessPointHandle::new(*p)));
        self
    }

    /// Subscribers get a stream that never yields.
    pub(crate) fn silent_events(self) -> Self {
        self.lock().silent_events = true;
        self
    }

    /// Makes every call named `call` fail.
    pub(crate) fn failing(self, call: &'static str) -> Self {
        self.lock().failing = Some(call);
        self
    }

    pub(crate) fn active_link_paths(&self) -> Vec<String> {
        self.lock()
            .active
            .iter()
            .map(|(h, _)| h.to_string())
            .collect()
    }

    pub(crate) fn saved_paths(&self) -> Vec<String> {
        self.lock()
            .saved
            .iter()
            .map(|p| p.handle.to_string())
            .collect()
    }

    pub(crate) fn radio(&self) -> bool {
        self.lock().radio
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.lock().calls.clone()
    }

    /// Number of access point listings, i.e. scans performed.
    pub(crate) fn scan_count(&self) -> usize {
        self.lock().scans
    }

    pub(crate) fn with_added<R>(&self, f: impl FnOnce(&Vec<NetworkProfile>) -> R) -> R {
        f(&self.lock().added)
    }

    fn record(
        &self,
        call: &'static str,
        detail: impl std::fmt::Display,
    ) -> Result<MutexGuard<'_, State>> {
        let mut state = self.lock();
        state.calls.push(format!("{call}({detail})"));
        if state.failing == Some(call) {
            return Err(ProvisionError::CallFailed {
                call,
                target: detail.to_string(),
                reason: "rejected by fake".into(),
            });
        }
        Ok(state)
    }
}

#[async_trait]
impl NetworkBus for FakeBus {
    async fn active_connections(&self) -> Result<Vec<ActiveLinkHandle>> {
        let state = self.record("ActiveConnections", "")?;
        Ok(state.active.iter().map(|(h, _)| h.clone()).collect())
    }

    async fn active_connection_type(&self, link: &ActiveLinkHandle) -> Result<String> {
        let state = self.record("Type", link)?;
        Ok(state
            .active
            .iter()
            .find(|(h, _)| h == link)
            .map(|(_, t)| t.clone())
            .unwrap_or_default())
    }

    async fn deactivate_connection(&self, link: &ActiveLinkHandle) -> Result<()> {
        let mut state = self.record("DeactivateConnection", link)?;
        state.active.retain(|(h, _)| h != link);
        Ok(())
    }

    async fn saved_connections(&self) -> Result<Vec<ProfileHandle>> {
        let state = self.record("ListConnections", "")?;
        Ok(state.saved.iter().map(|p| p.handle.clone()).collect())
    }

    async fn saved_profile(&self, profile: &ProfileHandle) -> Result<SavedProfile> {
        let state = self.record("GetSettings", profile)?;
        state
            .saved
            .iter()
            .find(|p| &p.handle == profile)
            .cloned()
            .ok_or_else(|| ProvisionError::CallFailed {
                call: "GetSettings",
                target: profile.to_string(),
                reason: "unknown connection".into(),
            })
    }

    async fn delete_connection(&self, profile: &ProfileHandle) -> Result<()> {
        let mut state = self.record("Delete", profile)?;
        state.saved.retain(|p| &p.handle != profile);
        Ok(())
    }

    async fn add_connection(&self, profile: NetworkProfile) -> Result<ProfileHandle> {
        let id = profile.id().unwrap_or_default().to_string();
        let mut state = self.record("AddConnection", &id)?;
        let handle = ProfileHandle::new(format!(
            "/org/freedesktop/NetworkManager/Settings/{}",
            100 + state.added.len()
        ));
        state.saved.push(SavedProfile {
            handle: handle.clone(),
            connection_type: connection_type::WIRELESS.to_string(),
            id: id.clone(),
            ssid: Some(id.into_bytes()),
        });
        state.added.push(profile);
        Ok(handle)
    }

    async fn wireless_enabled(&self) -> Result<bool> {
        let state = self.record("WirelessEnabled", "")?;
        Ok(state.radio)
    }

    async fn set_wireless_enabled(&self, enabled: bool) -> Result<()> {
        let mut state = self.record("SetWirelessEnabled", enabled)?;
        state.radio = enabled;
        Ok(())
    }

    async fn devices(&self) -> Result<Vec<DeviceHandle>> {
        let state = self.record("GetDevices", "")?;
        Ok(state.devices.iter().map(|(h, _)| h.clone()).collect())
    }

    async fn device_type(&self, device: &DeviceHandle) -> Result<u32> {
        let state = self.record("DeviceType", device)?;
        Ok(state
            .devices
            .iter()
            .find(|(h, _)| h == device)
            .map_or(0, |(_, t)| *t))
    }

    async fn access_points(&self, device: &DeviceHandle) -> Result<Vec<AccessPointHandle>> {
        let mut state = self.record("GetAllAccessPoints", device)?;
        state.scans += 1;
        Ok(state.access_points.iter().map(|(h, _, _)| h.clone()).collect())
    }

    async fn access_point_ssid(&self, ap: &AccessPointHandle) -> Result<Vec<u8>> {
        let state = self.record("Ssid", ap)?;
        Ok(state
            .access_points
            .iter()
            .find(|(h, _, _)| h == ap)
            .map(|(_, s, _)| s.clone())
            .unwrap_or_default())
    }

    async fn access_point_strength(&self, ap: &AccessPointHandle) -> Result<u8> {
        let state = self.record("Strength", ap)?;
        Ok(state
            .access_points
            .iter()
            .find(|(h, _, _)| h == ap)
            .map_or(0, |(_, _, s)| *s))
    }

    async fn access_point_added(
        &self,
        device: &DeviceHandle,
    ) -> Result<BoxStream<'static, AccessPointHandle>> {
        let mut state = self.record("AccessPointAdded", device)?;
        if state.silent_events {
            return Ok(stream::pending().boxed());
        }
        let events = std::mem::take(&mut state.events);
        Ok(stream::iter(events).boxed())
    }
}
