//! NetworkManager Active Connection proxy.

use zbus::{Result, proxy};

/// Proxy for active connection interface.
///
/// An active connection is the running instance of a saved profile. The
/// provisioning flow only needs its type to decide whether to tear it down.
#[proxy(
    interface = "org.freedesktop.NetworkManager.Connection.Active",
    default_service = "org.freedesktop.NetworkManager"
)]
pub trait NMActiveConnection {
    /// Connection type, e.g. "802-11-wireless" or "802-3-ethernet".
    ///
    /// Named `connection_type` because `type` is a keyword.
    #[zbus(property, name = "Type")]
    fn connection_type(&self) -> Result<String>;
}
