//! Operational tooling for Arista CloudVision Portal.
//!
//! Two binaries share this crate: `cvp-user-cleanup` kicks stale remote
//! user sessions off a CVP server, and `legacy-device-onboard` brings
//! streaming-but-unmanaged devices under provisioning control.

pub mod cleanup;
pub mod cvp;
pub mod logging;
pub mod onboard;
pub mod prompt;
