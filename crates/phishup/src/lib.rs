//! phishup library interface
//!
//! The binary is a thin wrapper; the CLI definition and the provisioning
//! flow live here so integration tests can drive them directly.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod cli;
pub mod install;

pub use install::InstallOptions;
