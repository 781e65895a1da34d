//! Connection profile builders.
//!
//! This module provides the builder used to construct the NetworkManager
//! settings dictionary submitted through `AddConnection`.
//!
//! # When to Use These
//!
//! Most users should go through [`WifiProvisioner`](crate::WifiProvisioner),
//! which builds and submits profiles itself. The builder is exposed for
//! callers that want to inspect or persist a profile on their own.
//!
//! # Examples
//!
//! ```rust
//! use qrwifi::builders::ProfileBuilder;
//! use zvariant::Value;
//!
//! let profile = ProfileBuilder::new("HomeNetwork")
//!     .password("hunter22")
//!     .dns_priority(50)
//!     .build();
//!
//! assert_eq!(
//!     profile.get("802-11-wireless-security", "key-mgmt"),
//!     Some(&Value::from("wpa-psk"))
//! );
//! ```

pub mod profile;

pub use profile::{NetworkProfile, ProfileBuilder};
