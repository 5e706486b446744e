//! phishup-core - provisioning mechanics for a gophish server
//!
//! This crate provides:
//! - Shell command execution with captured output
//! - `config.json` patching with one-level dotted keys
//! - Certbot transcript scraping (DNS challenge, certificate paths)
//! - The provisioning step state machine
//! - Preflight, prompt, and signal plumbing for the binary
//!
//! The flow lives in the `phishup` binary crate; everything here is
//! independently testable without touching the host.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod certbot;
pub mod config;
mod error;
pub mod gophish;
pub mod preflight;
pub mod prompt;
pub mod shell;
pub mod shutdown;
pub mod steps;

pub use error::{Error, Result};
