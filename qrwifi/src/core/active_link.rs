//! Tearing down active Wi-Fi links before reprovisioning.

use log::{debug, error, info};

use crate::Result;
use crate::api::bus::NetworkBus;
use crate::types::constants::connection_type;

/// Deactivates every active connection whose type is Wi-Fi.
///
/// All active connections are inspected; more than one Wi-Fi link is not
/// expected but is handled. Returns the number of links torn down, which is
/// zero when no Wi-Fi link is active. The first failing deactivation aborts
/// the step.
pub(crate) async fn deactivate_wireless_links<B>(bus: &B) -> Result<usize>
where
    B: NetworkBus + ?Sized,
{
    let links = bus.active_connections().await?;
    debug!("Inspecting {} active connection(s)", links.len());

    let mut deactivated = 0;
    for link in links {
        let link_type = bus.active_connection_type(&link).await?;
        if link_type != connection_type::WIRELESS {
            continue;
        }

        debug!("Deactivating active Wi-Fi link {link}");
        if let Err(e) = bus.deactivate_connection(&link).await {
            error!("Failed to deactivate {link}: {e}");
            return Err(e);
        }
        deactivated += 1;
    }

    if deactivated == 0 {
        info!("No active Wi-Fi link to deactivate");
    }
    Ok(deactivated)
}
