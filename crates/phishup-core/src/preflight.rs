//! Host checks that run before any provisioning step.
//!
//! Both checks are side-effect free, so a refused run leaves the host
//! untouched.

use nix::unistd::Uid;

use crate::{Error, Result};

/// Tools that must already be on PATH before the flow starts.
///
/// unzip and certbot are installed by the flow itself; apt is the one
/// bootstrap dependency.
pub const REQUIRED_TOOLS: [&str; 1] = ["apt"];

/// Refuse to run without elevated privileges.
///
/// # Errors
///
/// Returns [`Error::NotRoot`] when the effective UID is not 0.
pub fn check_root() -> Result<()> {
    if Uid::effective().is_root() {
        Ok(())
    } else {
        Err(Error::NotRoot)
    }
}

fn tool_on_path(name: &str) -> bool {
    which::which(name).is_ok()
}

/// Verify every bootstrap tool is present.
///
/// # Errors
///
/// Returns [`Error::MissingTool`] naming the first absent tool.
pub fn check_tools() -> Result<()> {
    for name in REQUIRED_TOOLS {
        if !tool_on_path(name) {
            return Err(Error::MissingTool {
                name: name.to_string(),
            });
        }
    }
    Ok(())
}
