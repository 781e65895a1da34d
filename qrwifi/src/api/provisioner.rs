use log::{debug, error, info};

use crate::Result;
use crate::api::bus::NetworkBus;
use crate::api::models::{
    PayloadOutcome, ProvisionError, ProvisionOptions, ProvisionReport, SavedProfile,
    SignalLevel,
};
use crate::api::payload::{ParsedPayload, ScanSession, WifiCredentials};
use crate::api::session::BusSession;
use crate::core::active_link::deactivate_wireless_links;
use crate::core::gate::DiscoveryGate;
use crate::core::provision::submit_profile;
use crate::core::registry::{list_wireless_profiles, prune_saved_profiles};
use crate::core::signal::SignalMonitor;

/// Reprovisions Wi-Fi networks from scanned QR payloads.
///
/// This is the main entry point of the crate. A provisioning attempt tears
/// down the active Wi-Fi link, deletes stale saved profiles for the same
/// SSID, saves a fresh profile, then waits for NetworkManager to report a
/// newly visible access point and reads the signal strength of the network.
///
/// # Creating an Instance
///
/// ```no_run
/// use qrwifi::WifiProvisioner;
///
/// # async fn example() -> qrwifi::Result<()> {
/// let provisioner = WifiProvisioner::new().await?;
/// # Ok(())
/// # }
/// ```
///
/// # Examples
///
/// ## Handling a scanned payload
///
/// ```no_run
/// use qrwifi::{PayloadOutcome, ScanSession, WifiProvisioner};
///
/// # async fn example() -> qrwifi::Result<()> {
/// let provisioner = WifiProvisioner::new().await?;
/// let mut session = ScanSession::new();
///
/// match provisioner.handle_payload(&mut session, "WIFI:S:Home;T:WPA;P:hunter22;;").await? {
///     PayloadOutcome::OpenUrl(url) => println!("open {url}"),
///     PayloadOutcome::Provisioned(report) => {
///         println!("{}: {}", report.ssid, report.level.icon_name());
///     }
///     PayloadOutcome::Ignored => {}
/// }
/// # Ok(())
/// # }
/// ```
///
/// ## Custom options
///
/// ```no_run
/// use qrwifi::{ProvisionOptions, WifiProvisioner};
/// use std::time::Duration;
///
/// # async fn example() -> qrwifi::Result<()> {
/// let opts = ProvisionOptions::default()
///     .with_dns_priority(100)
///     .with_discovery_timeout(Some(Duration::from_secs(10)));
/// let provisioner = WifiProvisioner::with_options(opts).await?;
/// # Ok(())
/// # }
/// ```
///
/// # Thread Safety
///
/// `WifiProvisioner` is `Clone` when its bus is; clones of a
/// [`BusSession`]-backed provisioner share one D-Bus connection. Running
/// two provisioning attempts at the same time is not supported.
#[derive(Debug, Clone)]
pub struct WifiProvisioner<B: NetworkBus = BusSession> {
    bus: B,
    options: ProvisionOptions,
}

impl WifiProvisioner<BusSession> {
    /// Connects to the system D-Bus with default options.
    pub async fn new() -> Result<Self> {
        Self::with_options(ProvisionOptions::default()).await
    }

    /// Connects to the system D-Bus with the given options.
    pub async fn with_options(options: ProvisionOptions) -> Result<Self> {
        let bus = BusSession::system().await?;
        Ok(Self { bus, options })
    }
}

impl<B: NetworkBus> WifiProvisioner<B> {
    /// Wraps an existing bus.
    pub fn with_bus(bus: B, options: ProvisionOptions) -> Self {
        Self { bus, options }
    }

    /// The options new profiles and discovery waits use.
    pub fn options(&self) -> &ProvisionOptions {
        &self.options
    }

    /// The bus calls are issued on.
    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Replaces the active Wi-Fi configuration with `creds`.
    ///
    /// Steps run strictly in order and the first failing one aborts the
    /// attempt. Nothing is rolled back: a failure after deactivation leaves
    /// the device disconnected.
    ///
    /// 1. Deactivate every active Wi-Fi link.
    /// 2. Delete saved Wi-Fi profiles whose SSID is `creds.ssid`.
    /// 3. Enable the radio and save a new autoconnecting profile.
    /// 4. Wait for one access-point-added event, bounded by
    ///    [`ProvisionOptions::discovery_timeout`], and read the strength of
    ///    the first visible access point named `creds.ssid`.
    ///
    /// A missing wireless device, a missing access point or an elapsed
    /// discovery timeout all yield `strength: None`.
    ///
    /// An SSID that is empty or longer than 32 bytes is rejected with
    /// [`ProvisionError::InvalidSsid`] before any call is made.
    pub async fn provision(&self, creds: &WifiCredentials) -> Result<ProvisionReport> {
        if !creds.has_valid_ssid() {
            error!("Refusing to provision invalid SSID '{}'", creds.ssid);
            return Err(ProvisionError::InvalidSsid(creds.ssid.clone()));
        }
        info!("Provisioning '{}'", creds.ssid);

        let deactivated = deactivate_wireless_links(&self.bus).await?;
        let pruned = prune_saved_profiles(&self.bus, &creds.ssid).await?;
        let profile = submit_profile(&self.bus, creds, &self.options).await?;

        let monitor = SignalMonitor::new(&self.bus);
        let strength = match monitor.wireless_device().await? {
            Some(device) => {
                let events = self.bus.access_point_added(&device).await?;
                let mut gate = DiscoveryGate::new();
                gate.arm();
                monitor
                    .await_discovery(
                        events,
                        &mut gate,
                        &device,
                        &creds.ssid,
                        self.options.discovery_timeout,
                    )
                    .await?
            }
            None => {
                info!("Skipping signal lookup for '{}'", creds.ssid);
                None
            }
        };

        let radio = self.bus.wireless_enabled().await?;
        let level = SignalLevel::from_strength(radio, strength.unwrap_or(0));
        info!(
            "Provisioned '{}' ({deactivated} deactivated, {pruned} pruned, signal {level})",
            creds.ssid
        );

        Ok(ProvisionReport {
            ssid: creds.ssid.clone(),
            deactivated,
            pruned,
            profile,
            strength,
            level,
        })
    }

    /// Classifies scanned text and acts on it.
    ///
    /// URLs are returned for the caller to open, Wi-Fi payloads are
    /// remembered in `session` and provisioned, anything else is ignored.
    /// A Wi-Fi payload whose SSID NetworkManager would reject is ignored
    /// without touching the current configuration.
    pub async fn handle_payload(
        &self,
        session: &mut ScanSession,
        text: &str,
    ) -> Result<PayloadOutcome> {
        match session.classify(text) {
            ParsedPayload::Url(url) => Ok(PayloadOutcome::OpenUrl(url)),
            ParsedPayload::Wifi(creds) if !creds.has_valid_ssid() => {
                info!("Ignoring Wi-Fi payload with invalid SSID '{}'", creds.ssid);
                Ok(PayloadOutcome::Ignored)
            }
            ParsedPayload::Wifi(creds) => {
                debug!("Auth token '{}' from payload", creds.auth_protocol);
                let report = self.provision(&creds).await?;
                Ok(PayloadOutcome::Provisioned(report))
            }
            ParsedPayload::Invalid => Ok(PayloadOutcome::Ignored),
        }
    }

    /// Current strength of `ssid`, `None` if it is not visible.
    pub async fn signal_strength(&self, ssid: &str) -> Result<Option<u8>> {
        SignalMonitor::new(&self.bus).strength(ssid).await
    }

    /// Current bucketed signal level of `ssid`.
    pub async fn signal_level(&self, ssid: &str) -> Result<SignalLevel> {
        SignalMonitor::new(&self.bus).level(ssid).await
    }

    /// Whether the Wi-Fi radio is enabled.
    pub async fn wireless_enabled(&self) -> Result<bool> {
        self.bus.wireless_enabled().await
    }

    /// Saved Wi-Fi profiles.
    pub async fn saved_wireless_profiles(&self) -> Result<Vec<SavedProfile>> {
        list_wireless_profiles(&self.bus).await
    }
}
