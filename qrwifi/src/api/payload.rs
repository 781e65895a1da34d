//! Classification of scanned QR payloads.
//!
//! A decoded QR code is either a URL, a Wi-Fi credential payload of the form
//! `WIFI:S:<ssid>;T:<auth>;P:<password>`, or nothing usable. URLs are checked
//! first, so a payload matching both shapes is treated as a URL.
//!
//! # Example
//!
//! ```rust
//! use qrwifi::{ParsedPayload, ScanSession};
//!
//! let mut session = ScanSession::new();
//!
//! match session.classify("WIFI:S:Home;T:WPA;P:hunter22;;") {
//!     ParsedPayload::Wifi(creds) => assert_eq!(creds.ssid, "Home"),
//!     other => panic!("unexpected payload: {other:?}"),
//! }
//! assert_eq!(session.ssid(), Some("Home"));
//! ```

use log::{debug, info};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::types::constants::ssid;

static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:https?://)?[\w.\-]+(?:\.[\w.\-]+)+[\w\-._\~:/?#\[\]@!$\&'()*+,;=]*$")
        .expect("URL pattern is valid")
});

static WIFI_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^WIFI:S:([^;]*);T:([^;]*);P:([^;]*)").expect("Wi-Fi pattern is valid")
});

/// Credentials carried by a `WIFI:` payload.
///
/// Every field may be empty. An empty password means an open network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WifiCredentials {
    /// Network name.
    pub ssid: String,
    /// Authentication token from the `T:` field (e.g. "WPA", "WEP", "nopass").
    pub auth_protocol: String,
    /// Pre-shared key from the `P:` field.
    pub password: String,
}

impl WifiCredentials {
    /// Creates credentials from their three fields.
    pub fn new(
        ssid: impl Into<String>,
        auth_protocol: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            ssid: ssid.into(),
            auth_protocol: auth_protocol.into(),
            password: password.into(),
        }
    }

    /// Returns true if a pre-shared key is present.
    pub fn is_secured(&self) -> bool {
        !self.password.is_empty()
    }

    /// Returns true if the SSID is 1 to 32 bytes long, as NetworkManager
    /// requires.
    pub fn has_valid_ssid(&self) -> bool {
        (1..=ssid::MAX_LEN).contains(&self.ssid.len())
    }
}

/// A classified QR payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParsedPayload {
    /// A URL-shaped string, as scanned.
    Url(String),
    /// Wi-Fi credentials.
    Wifi(WifiCredentials),
    /// Neither shape matched.
    Invalid,
}

impl ParsedPayload {
    /// Classifies raw scanned text.
    ///
    /// A payload matching neither shape is reported at info level and
    /// yields [`ParsedPayload::Invalid`]; it is not an error.
    pub fn classify(text: &str) -> Self {
        if URL_PATTERN.is_match(text) {
            debug!("Payload classified as URL");
            return Self::Url(text.to_owned());
        }

        if let Some(caps) = WIFI_PATTERN.captures(text) {
            let field = |i: usize| caps.get(i).map_or("", |m| m.as_str());
            let creds = WifiCredentials::new(field(1), field(2), field(3));
            debug!(
                "Payload classified as Wi-Fi credentials for '{}' (auth '{}')",
                creds.ssid, creds.auth_protocol
            );
            return Self::Wifi(creds);
        }

        info!("No usable URL or Wi-Fi payload found in scanned text");
        Self::Invalid
    }

    /// Returns true for [`ParsedPayload::Invalid`].
    pub fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid)
    }
}

/// Prepends `http://` to a URL that carries no scheme.
///
/// This is the form handed to the system URL opener.
pub fn normalize_url(url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_owned()
    } else {
        format!("http://{url}")
    }
}

/// Credentials of the most recent Wi-Fi payload.
///
/// Owned by the caller for the duration of one provisioning attempt and
/// overwritten by the next Wi-Fi scan. Payloads that are not Wi-Fi
/// payloads leave the stored credentials untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanSession {
    credentials: Option<WifiCredentials>,
}

impl ScanSession {
    /// Creates an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Classifies `text`, remembering the credentials if it is a Wi-Fi payload.
    pub fn classify(&mut self, text: &str) -> ParsedPayload {
        let parsed = ParsedPayload::classify(text);
        if let ParsedPayload::Wifi(creds) = &parsed {
            self.credentials = Some(creds.clone());
        }
        parsed
    }

    /// The stored credentials, if any Wi-Fi payload was classified.
    pub fn credentials(&self) -> Option<&WifiCredentials> {
        self.credentials.as_ref()
    }

    /// The stored SSID.
    pub fn ssid(&self) -> Option<&str> {
        self.credentials.as_ref().map(|c| c.ssid.as_str())
    }
}
