//! Access point signal strength lookup.
//!
//! The monitor finds the wireless device, looks up the access point whose
//! SSID matches the provisioned network and reports its strength, either on
//! demand or after the one-shot discovery event.

use futures::{FutureExt, Stream, StreamExt, select};
use futures_timer::Delay;
use log::{debug, info, warn};
use std::pin::pin;
use std::time::Duration;

use crate::Result;
use crate::api::bus::NetworkBus;
use crate::api::models::{AccessPointHandle, DeviceHandle, SignalLevel};
use crate::core::gate::DiscoveryGate;
use crate::types::constants::device_type;

/// Signal strength queries for one SSID at a time.
pub(crate) struct SignalMonitor<'a, B: NetworkBus + ?Sized> {
    bus: &'a B,
}

impl<'a, B: NetworkBus + ?Sized> SignalMonitor<'a, B> {
    pub(crate) fn new(bus: &'a B) -> Self {
        Self { bus }
    }

    /// Finds the first Wi-Fi device, `None` if the system has none.
    pub(crate) async fn wireless_device(&self) -> Result<Option<DeviceHandle>> {
        for device in self.bus.devices().await? {
            if self.bus.device_type(&device).await? == device_type::WIFI {
                debug!("Found Wi-Fi device: {device}");
                return Ok(Some(device));
            }
        }
        info!("No Wi-Fi device found");
        Ok(None)
    }

    /// Scans the device's access points for `ssid`.
    ///
    /// SSIDs are compared as raw bytes. Returns the strength of the first
    /// match, `None` if nothing matches or `ssid` is empty.
    pub(crate) async fn scan(&self, device: &DeviceHandle, ssid: &str) -> Result<Option<u8>> {
        if ssid.is_empty() {
            info!("Not scanning for an empty SSID");
            return Ok(None);
        }

        let access_points = self.bus.access_points(device).await?;
        debug!("Scanning {} access point(s) for '{ssid}'", access_points.len());

        for ap in access_points {
            let ssid_bytes = self.bus.access_point_ssid(&ap).await?;
            if ssid_bytes != ssid.as_bytes() {
                continue;
            }
            let strength = self.bus.access_point_strength(&ap).await?;
            debug!("Matched '{ssid}' at {ap} with strength {strength}");
            return Ok(Some(strength));
        }

        info!("No access point for '{ssid}' is visible");
        Ok(None)
    }

    /// Signal strength of `ssid`, `None` without a Wi-Fi device or match.
    pub(crate) async fn strength(&self, ssid: &str) -> Result<Option<u8>> {
        match self.wireless_device().await? {
            Some(device) => self.scan(&device, ssid).await,
            None => Ok(None),
        }
    }

    /// Bucketed signal level of `ssid`.
    ///
    /// A disabled radio is reported as [`SignalLevel::Offline`] without
    /// scanning.
    pub(crate) async fn level(&self, ssid: &str) -> Result<SignalLevel> {
        if !self.bus.wireless_enabled().await? {
            return Ok(SignalLevel::Offline);
        }
        let strength = self.strength(ssid).await?;
        Ok(SignalLevel::from_strength(true, strength.unwrap_or(0)))
    }

    /// Runs the scan for one discovery event if the gate lets it through.
    ///
    /// Events the gate rejects are ignored and yield `Ok(None)`.
    pub(crate) async fn handle_discovery(
        &self,
        gate: &mut DiscoveryGate,
        device: &DeviceHandle,
        ssid: &str,
    ) -> Result<Option<u8>> {
        if !gate.fire() {
            return Ok(None);
        }
        self.scan(device, ssid).await
    }

    /// Waits for the first discovery event on `events`, then scans.
    ///
    /// The stream is dropped as soon as one event has passed the gate, which
    /// ends the subscription. When `timeout` elapses first, or the stream
    /// ends, the result is `Ok(None)`.
    pub(crate) async fn await_discovery<S>(
        &self,
        events: S,
        gate: &mut DiscoveryGate,
        device: &DeviceHandle,
        ssid: &str,
        timeout: Option<Duration>,
    ) -> Result<Option<u8>>
    where
        S: Stream<Item = AccessPointHandle> + Unpin,
    {
        let mut events = events;

        let Some(limit) = timeout else {
            return self.drain(&mut events, gate, device, ssid).await;
        };

        let mut wait = pin!(self.drain(&mut events, gate, device, ssid).fuse());
        let mut deadline = pin!(Delay::new(limit).fuse());

        select! {
            result = wait => result,
            _ = deadline => {
                warn!("No access point discovered within {limit:?}");
                Ok(None)
            }
        }
    }

    async fn drain<S>(
        &self,
        events: &mut S,
        gate: &mut DiscoveryGate,
        device: &DeviceHandle,
        ssid: &str,
    ) -> Result<Option<u8>>
    where
        S: Stream<Item = AccessPointHandle> + Unpin,
    {
        while let Some(ap) = events.next().await {
            debug!("Access point added: {ap}");
            let result = self.handle_discovery(gate, device, ssid).await;
            if gate.is_done() {
                return result;
            }
        }
        debug!("Discovery event stream ended");
        Ok(None)
    }
}
