//! Submitting a new Wi-Fi profile.

use log::{debug, error, info};

use crate::Result;
use crate::api::builders::ProfileBuilder;
use crate::api::bus::NetworkBus;
use crate::api::models::{ProfileHandle, ProvisionOptions};
use crate::api::payload::WifiCredentials;

/// Enables the radio and persists a profile for `creds`.
///
/// The radio is switched on unconditionally, whatever its previous state.
/// A rejected submission is returned as an error; earlier pipeline steps are
/// not rolled back.
pub(crate) async fn submit_profile<B>(
    bus: &B,
    creds: &WifiCredentials,
    opts: &ProvisionOptions,
) -> Result<ProfileHandle>
where
    B: NetworkBus + ?Sized,
{
    bus.set_wireless_enabled(true).await?;
    debug!("Wi-Fi radio enabled");

    let profile = ProfileBuilder::from_credentials(creds, opts).build();
    debug!(
        "Submitting profile for '{}' | secured={}",
        creds.ssid,
        creds.is_secured()
    );

    match bus.add_connection(profile).await {
        Ok(handle) => {
            info!("Saved profile for '{}' at {handle}", creds.ssid);
            Ok(handle)
        }
        Err(e) => {
            error!("Failed to save profile for '{}': {e}", creds.ssid);
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fake::FakeBus;
    use zvariant::Value;

    #[tokio::test]
    async fn enables_radio_before_adding() {
        let bus = FakeBus::new().with_radio(false);
        let creds = WifiCredentials::new("Home", "WPA", "pw123456");

        submit_profile(&bus, &creds, &ProvisionOptions::default())
            .await
            .unwrap();

        assert!(bus.radio());
        let calls = bus.calls();
        let enable = calls.iter().position(|c| c == "SetWirelessEnabled(true)");
        let add = calls.iter().position(|c| c == "AddConnection(Home)");
        assert!(enable.unwrap() < add.unwrap());
    }

    #[tokio::test]
    async fn enabling_radio_is_idempotent() {
        let bus = FakeBus::new().with_radio(true);
        let creds = WifiCredentials::new("Home", "WPA", "pw123456");

        submit_profile(&bus, &creds, &ProvisionOptions::default())
            .await
            .unwrap();
        assert!(bus.radio());
        assert!(bus.calls().contains(&"SetWirelessEnabled(true)".to_string()));
    }

    #[tokio::test]
    async fn submitted_profile_matches_credentials() {
        let bus = FakeBus::new();
        let creds = WifiCredentials::new("Cafe", "nopass", "");

        submit_profile(&bus, &creds, &ProvisionOptions::default())
            .await
            .unwrap();

        bus.with_added(|added| {
            assert_eq!(added.len(), 1);
            assert_eq!(added[0].id(), Some("Cafe"));
            assert_eq!(
                added[0].get("802-11-wireless-security", "key-mgmt"),
                Some(&Value::from("none"))
            );
        });
    }

    #[tokio::test]
    async fn rejected_submission_is_reported() {
        let bus = FakeBus::new().failing("AddConnection");
        let creds = WifiCredentials::new("Home", "WPA", "pw123456");

        assert!(
            submit_profile(&bus, &creds, &ProvisionOptions::default())
                .await
                .is_err()
        );
    }
}
