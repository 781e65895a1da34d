//! Helpers for converting NetworkManager data and building raw proxies.
//!
//! Provides extraction of the fields the provisioning flow matches on from a
//! `GetSettings` reply, and a raw proxy builder for calls whose replies must
//! be borrowed from the message body.

use std::collections::HashMap;
use zbus::Connection;
use zvariant::{OwnedObjectPath, Value};

use crate::Result;
use crate::api::models::{ProfileHandle, SavedProfile};
use crate::types::constants::section;

/// Reads a string setting, `None` if missing or of another type.
fn str_setting<'a>(
    settings: &'a HashMap<String, HashMap<String, Value<'_>>>,
    section_name: &str,
    key: &str,
) -> Option<&'a str> {
    match settings.get(section_name)?.get(key)? {
        Value::Str(s) => Some(s.as_str()),
        _ => None,
    }
}

/// Reads the `802-11-wireless.ssid` byte array.
fn ssid_setting(settings: &HashMap<String, HashMap<String, Value<'_>>>) -> Option<Vec<u8>> {
    match settings.get(section::WIRELESS)?.get("ssid")? {
        Value::Array(arr) => {
            let mut raw = Vec::with_capacity(arr.len());
            for v in arr.iter() {
                if let Ok(b) = u8::try_from(v.clone()) {
                    raw.push(b);
                }
            }
            Some(raw)
        }
        _ => None,
    }
}

/// Summarizes a `GetSettings` reply into a [`SavedProfile`].
pub(crate) fn saved_profile_from_settings(
    handle: ProfileHandle,
    settings: &HashMap<String, HashMap<String, Value<'_>>>,
) -> SavedProfile {
    SavedProfile {
        handle,
        connection_type: str_setting(settings, section::CONNECTION, "type")
            .unwrap_or_default()
            .to_owned(),
        id: str_setting(settings, section::CONNECTION, "id")
            .unwrap_or_default()
            .to_owned(),
        ssid: ssid_setting(settings),
    }
}

/// Helper to create a NetworkManager D-Bus proxy for a given path and interface.
///
/// Returns a zbus Proxy instance for the specified path and interface.
pub(crate) async fn nm_proxy<'a, P>(
    conn: &'a Connection,
    path: P,
    interface: &'a str,
) -> Result<zbus::Proxy<'a>>
where
    P: TryInto<OwnedObjectPath>,
    P::Error: Into<zbus::Error>,
{
    let owned_path = path.try_into().map_err(Into::into)?;
    Ok(zbus::proxy::Builder::new(conn)
        .destination("org.freedesktop.NetworkManager")?
        .path(owned_path)?
        .interface(interface)?
        .build()
        .await?)
}
