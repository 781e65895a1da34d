//! QR-driven Wi-Fi provisioning over NetworkManager.
//!
//! This crate turns decoded QR text into actions:
//!
//! - URLs are handed back to the caller for opening
//! - `WIFI:S:<ssid>;T:<auth>;P:<password>` payloads replace the active Wi-Fi
//!   configuration with the scanned network
//! - Anything else is ignored
//!
//! Provisioning tears down the active Wi-Fi link, deletes stale saved profiles
//! for the same SSID, saves a new autoconnecting profile and reports the
//! signal strength of the network once NetworkManager sees it.
//!
//! # Example
//!
//! ```no_run
//! use qrwifi::{PayloadOutcome, ScanSession, WifiProvisioner};
//!
//! # async fn example() -> qrwifi::Result<()> {
//! let provisioner = WifiProvisioner::new().await?;
//! let mut session = ScanSession::new();
//!
//! if let PayloadOutcome::Provisioned(report) = provisioner
//!     .handle_payload(&mut session, "WIFI:S:Home;T:WPA;P:hunter22;;")
//!     .await?
//! {
//!     println!("{} ({:?}%)", report.level, report.strength);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! All operations return `Result<T, ProvisionError>`. Conditions that are
//! merely "nothing found" (no active Wi-Fi link, no stale profile, no wireless
//! device, no visible access point) are not errors; they show up as zero
//! counts or `None` in the [`ProvisionReport`].
//!
//! # Signal Discovery
//!
//! After the profile is saved the crate subscribes to the device's
//! `AccessPointAdded` signal and reads the strength once, on the first
//! delivery. Later deliveries are ignored and the subscription is dropped.
//! The wait is bounded by [`ProvisionOptions::discovery_timeout`].
//!
//! # Logging
//!
//! This crate uses the [`log`](https://docs.rs/log) facade for logging. To see
//! log output, add a logging implementation like `env_logger`. For example:
//!
//! ```no_run,ignore
//! env_logger::init();
//! // ...
//! ```

// Internal implementation modules
mod api;
mod core;
mod dbus;
mod types;
mod util;

// Re-exported public API
pub use api::builders;
pub use api::bus::NetworkBus;
pub use api::models::{
    AccessPointHandle, ActiveLinkHandle, DeviceHandle, PayloadOutcome, ProfileHandle,
    ProvisionError, ProvisionOptions, ProvisionReport, SavedProfile, SignalLevel,
};
pub use api::payload::{ParsedPayload, ScanSession, WifiCredentials, normalize_url};
pub use api::provisioner::WifiProvisioner;
pub use api::session::BusSession;
pub use crate::core::gate::{DiscoveryGate, GateState};

/// A specialized `Result` type for provisioning operations.
pub type Result<T> = std::result::Result<T, ProvisionError>;
