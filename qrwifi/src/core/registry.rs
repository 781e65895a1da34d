//! Saved profile enumeration and pruning.

use log::{debug, info};

use crate::Result;
use crate::api::bus::NetworkBus;
use crate::api::models::SavedProfile;

/// Lists the saved Wi-Fi profiles.
pub(crate) async fn list_wireless_profiles<B>(bus: &B) -> Result<Vec<SavedProfile>>
where
    B: NetworkBus + ?Sized,
{
    let mut profiles = Vec::new();
    for handle in bus.saved_connections().await? {
        let profile = bus.saved_profile(&handle).await?;
        if profile.is_wireless() {
            profiles.push(profile);
        }
    }
    Ok(profiles)
}

/// Deletes every saved Wi-Fi profile whose SSID is `ssid`.
///
/// Several stale profiles may share an SSID, so the scan does not stop at
/// the first match. Returns the number of deleted profiles; zero matches is
/// not an error, which makes the step idempotent.
pub(crate) async fn prune_saved_profiles<B>(bus: &B, ssid: &str) -> Result<usize>
where
    B: NetworkBus + ?Sized,
{
    let handles = bus.saved_connections().await?;
    debug!("Checking {} saved profile(s) for '{ssid}'", handles.len());

    let mut deleted = 0;
    for handle in handles {
        let profile = bus.saved_profile(&handle).await?;
        if !profile.matches_ssid(ssid) {
            continue;
        }

        debug!("Deleting saved profile '{}' ({handle})", profile.id);
        bus.delete_connection(&handle).await?;
        deleted += 1;
    }

    if deleted == 0 {
        info!("No saved profile for '{ssid}'");
    } else {
        info!("Deleted {deleted} saved profile(s) for '{ssid}'");
    }
    Ok(deleted)
}
