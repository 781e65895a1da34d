//! Core internal logic for provisioning.
//!
//! Each module implements one step of the provisioning pipeline against a
//! [`NetworkBus`](crate::NetworkBus). Steps return `Ok` with a count or an
//! optional value for not-found outcomes and `Err` only when a remote call
//! failed.

pub(crate) mod active_link;
pub(crate) mod gate;
pub(crate) mod provision;
pub(crate) mod registry;
pub(crate) mod signal;

#[cfg(test)]
pub(crate) mod fake;
