//! Patching gophish's `config.json`.
//!
//! The document is an ordered JSON object (serde_json's `preserve_order`
//! feature keeps `Map` in insertion order), so a load/patch/save cycle
//! leaves every untouched key exactly where it was. Updates are validated
//! in full before anything is written; a failed patch never leaves a
//! partial write behind.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::{Error, Result};

/// File this tool patches inside the install directory.
pub const CONFIG_FILE: &str = "config.json";

/// One ordered batch of key updates.
///
/// Keys are either flat (`listen_url`) or dotted one level deep
/// (`phish_server.use_tls`). A flat key must already exist at the top
/// level; a dotted key requires its section to exist as a nested mapping.
pub type UpdateRequest = Vec<(String, Value)>;

fn config_path(dir: &Path) -> PathBuf {
    dir.join(CONFIG_FILE)
}

/// Load the config document found in `dir`.
///
/// # Errors
///
/// Returns [`Error::ConfigRead`] when the file is missing or unreadable,
/// [`Error::ConfigParse`] for invalid JSON, and [`Error::ConfigNotObject`]
/// when the root is not an object.
pub fn load(dir: &Path) -> Result<Map<String, Value>> {
    let path = config_path(dir);
    let text = fs::read_to_string(&path).map_err(|source| Error::ConfigRead {
        path: path.clone(),
        source,
    })?;
    let value: Value = serde_json::from_str(&text).map_err(|source| Error::ConfigParse {
        path: path.clone(),
        source,
    })?;
    match value {
        Value::Object(document) => Ok(document),
        _ => Err(Error::ConfigNotObject { path }),
    }
}

/// Apply `updates` to `document` in order, entirely in memory.
///
/// A flat key overwrites an existing top-level entry regardless of the old
/// value's type. A dotted key writes into an existing nested mapping,
/// creating the subkey when absent. The first unresolvable key aborts the
/// whole batch.
///
/// # Errors
///
/// Returns [`Error::UnknownKey`], [`Error::KeyTooDeep`],
/// [`Error::SectionNotFound`], or [`Error::SectionNotObject`] for the first
/// key that cannot be resolved.
pub fn apply(document: &mut Map<String, Value>, updates: UpdateRequest) -> Result<()> {
    for (key, value) in updates {
        if document.contains_key(&key) {
            document.insert(key, value);
            continue;
        }

        let Some(dot) = key.find('.') else {
            return Err(Error::UnknownKey { key });
        };
        let section = key[..dot].to_string();
        let subkey = key[dot + 1..].to_string();
        if subkey.contains('.') {
            return Err(Error::KeyTooDeep { key });
        }

        match document.get_mut(&section) {
            Some(Value::Object(nested)) => {
                nested.insert(subkey, value);
            }
            Some(_) => return Err(Error::SectionNotObject { section }),
            None => return Err(Error::SectionNotFound { section }),
        }
    }
    Ok(())
}

/// Serialize `document` back to `dir`'s config file.
///
/// The text goes to a sibling temp file first and is renamed into place, so
/// a kill mid-write never truncates the real config.
///
/// # Errors
///
/// Returns [`Error::ConfigSerialize`] or [`Error::ConfigWrite`].
pub fn save(dir: &Path, document: &Map<String, Value>) -> Result<()> {
    let path = config_path(dir);
    let mut text =
        serde_json::to_string_pretty(document).map_err(|source| Error::ConfigSerialize {
            path: path.clone(),
            source,
        })?;
    text.push('\n');

    let tmp = dir.join(format!("{CONFIG_FILE}.tmp"));
    fs::write(&tmp, &text).map_err(|source| Error::ConfigWrite {
        path: tmp.clone(),
        source,
    })?;
    fs::rename(&tmp, &path).map_err(|source| Error::ConfigWrite {
        path: path.clone(),
        source,
    })?;

    tracing::info!(path = %path.display(), "config written");
    Ok(())
}

/// Load, apply, and save in one call.
///
/// Nothing reaches disk unless every key in `updates` resolves.
///
/// # Errors
///
/// Propagates any [`load`], [`apply`], or [`save`] error.
pub fn patch(dir: &Path, updates: UpdateRequest) -> Result<()> {
    let mut document = load(dir)?;
    apply(&mut document, updates)?;
    save(dir, &document)
}
