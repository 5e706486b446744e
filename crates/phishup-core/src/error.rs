//! Error types for phishup-core.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while provisioning.
///
/// Every variant carries the operator-facing diagnostic in its `Display`
/// form; the binary boundary prints it and maps any variant to exit code 1.
#[derive(Error, Debug)]
pub enum Error {
    /// Effective UID is not 0.
    #[error("phishup must be run as root (use sudo)")]
    NotRoot,

    /// A tool required before the flow starts is absent.
    #[error("required tool '{name}' was not found on PATH")]
    MissingTool { name: String },

    /// The shell itself could not be launched.
    #[error("failed to launch '{command}': {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    /// A strict command exited non-zero.
    #[error("command '{command}' exited with code {exit_code}:\n{stderr}")]
    CommandFailed {
        command: String,
        exit_code: i32,
        stderr: String,
    },

    /// The config file could not be read.
    #[error("cannot read config file {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The config file is not parseable JSON.
    #[error("config file {} is not valid JSON: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// The config file parses but its root is not an object.
    #[error("config file {} does not contain a JSON object at the top level", .path.display())]
    ConfigNotObject { path: PathBuf },

    /// A flat update key does not exist at the top level.
    #[error("key '{key}' does not exist at the top level of config.json")]
    UnknownKey { key: String },

    /// A dotted update key names a section that is absent.
    #[error("section '{section}' not found in config.json")]
    SectionNotFound { section: String },

    /// A dotted update key names a section that is not a nested mapping.
    #[error("'{section}' in config.json is not a nested mapping")]
    SectionNotObject { section: String },

    /// Update keys support exactly one level of nesting.
    #[error("key '{key}' nests more than one level deep; only 'section.subkey' is supported")]
    KeyTooDeep { key: String },

    /// The patched document could not be serialized.
    #[error("cannot serialize config for {}: {source}", .path.display())]
    ConfigSerialize {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// The patched document could not be written back.
    #[error("cannot write config file {}: {source}", .path.display())]
    ConfigWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The install directory could not be created.
    #[error("cannot create install directory {}: {source}", .path.display())]
    Workdir {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The unpacked server binary could not be made executable.
    #[error("cannot mark {} executable: {source}", .path.display())]
    SetExecutable {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Certbot wrote nothing to stdout or stderr.
    #[error("certbot produced no output; it may have failed to start or been interrupted")]
    NoCertbotOutput,

    /// Certbot's output did not contain the DNS TXT challenge.
    #[error("could not find the DNS TXT challenge in certbot's output")]
    ChallengeNotFound,

    /// Certbot's output did not confirm an issued certificate.
    #[error("certbot did not report an issued certificate")]
    CertificateNotIssued,

    /// Reading from the operator's terminal failed.
    #[error("failed to read operator input: {source}")]
    Prompt { source: std::io::Error },

    /// A signal handler could not be installed.
    #[error("cannot install signal handler: {source}")]
    SignalSetup { source: std::io::Error },
}
