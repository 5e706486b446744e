//! Gophish release facts and the native install steps.
//!
//! Everything here is specific to the gophish distribution: where the
//! release lives, what the unpacked tree looks like, and which config keys
//! the flow rewrites.

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::certbot::CertificatePaths;
use crate::config::UpdateRequest;
use crate::{Error, Result};

/// Release archive installed by default.
pub const RELEASE_URL: &str =
    "https://github.com/gophish/gophish/releases/download/v0.12.1/gophish-v0.12.1-linux-64bit.zip";

/// Directory the release is unpacked into, relative to the invocation dir.
pub const DEFAULT_INSTALL_DIR: &str = "gophish";

/// Admin interface address patched into `listen_url`.
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:3333";

/// Server binary inside the unpacked release.
pub const BINARY: &str = "gophish";

/// Last path segment of `url`, which is the filename wget writes.
#[must_use]
pub fn archive_name(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}

/// Shell command that fetches the release archive.
#[must_use]
pub fn download_command(url: &str) -> String {
    format!("wget {url}")
}

/// Shell command that extracts the archive, overwriting earlier contents.
#[must_use]
pub fn unpack_command(archive: &str) -> String {
    format!("unzip -o {archive}")
}

/// Create the install directory if it does not exist yet.
///
/// # Errors
///
/// Returns [`Error::Workdir`] when creation fails.
pub fn ensure_workdir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|source| Error::Workdir {
        path: dir.to_path_buf(),
        source,
    })?;
    tracing::debug!(dir = %dir.display(), "install directory ready");
    Ok(())
}

/// Mark the unpacked server binary executable (mode 0755).
///
/// # Errors
///
/// Returns [`Error::SetExecutable`] when the binary is missing or its
/// permissions cannot be changed.
pub fn set_executable(dir: &Path) -> Result<()> {
    let path = dir.join(BINARY);
    let metadata = fs::metadata(&path).map_err(|source| Error::SetExecutable {
        path: path.clone(),
        source,
    })?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        let mut perms = metadata.permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&path, perms).map_err(|source| Error::SetExecutable {
            path: path.clone(),
            source,
        })?;
        tracing::debug!(binary = %path.display(), "binary marked executable");
    }

    #[cfg(not(unix))]
    {
        // no executable bit to set; requiring the file to exist is all
        // that is left of this step
        let _ = metadata;
    }

    Ok(())
}

/// Update that points the admin interface at `addr`.
#[must_use]
pub fn listen_update(addr: &str) -> UpdateRequest {
    vec![("listen_url".to_string(), Value::String(addr.to_string()))]
}

/// Updates that switch the phishing server onto the issued certificate.
#[must_use]
pub fn tls_update(paths: &CertificatePaths) -> UpdateRequest {
    vec![
        ("phish_server.use_tls".to_string(), Value::Bool(true)),
        (
            "phish_server.cert_path".to_string(),
            Value::String(paths.cert_path.clone()),
        ),
        (
            "phish_server.key_path".to_string(),
            Value::String(paths.key_path.clone()),
        ),
    ]
}
