//! Type definitions and constants.
//!
//! This module contains NetworkManager constants used by the provisioning flow.

pub(crate) mod constants;
