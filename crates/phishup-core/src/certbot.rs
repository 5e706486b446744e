//! Certbot invocation and output scraping.
//!
//! The ACME exchange itself is certbot's job; this module only builds the
//! invocation and pulls two facts back out of its human-readable
//! transcript: the DNS TXT record the operator must publish, and where the
//! issued certificate landed. Scraping free-form tool output is brittle by
//! nature, so the extraction sits behind [`OutputParser`] and can be
//! swapped when certbot's wording changes.

use std::sync::OnceLock;

use regex::{Regex, RegexBuilder};

/// DNS TXT record the operator must publish before issuance proceeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsChallenge {
    /// Record name, always prefixed `_acme-challenge.`.
    pub record: String,
    /// Record value certbot expects to find.
    pub value: String,
}

/// Filesystem locations certbot reports after issuing.
///
/// Kept as strings: they are scraped tokens that go straight back out into
/// the config document and operator messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificatePaths {
    /// Full chain certificate file.
    pub cert_path: String,
    /// Private key file.
    pub key_path: String,
}

/// Extraction contract over certbot's combined stdout/stderr text.
pub trait OutputParser {
    /// Find the DNS TXT challenge, if the transcript contains one.
    fn challenge(&self, output: &str) -> Option<DnsChallenge>;

    /// Find the issued certificate and key paths, if issuance succeeded.
    fn certificate_paths(&self, output: &str) -> Option<CertificatePaths>;
}

/// Parser for certbot's current manual-mode wording.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextParser;

fn challenge_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"Please deploy a DNS TXT record under the name:\s*(_acme-challenge\.[^\s]+)\s*with the following value:\s*([^\s]+)",
        )
        .ok()
    })
    .as_ref()
}

fn certificate_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| {
        // issuance announcement and the two paths span multiple lines
        RegexBuilder::new(
            r"Successfully received certificate\..*?Certificate is saved at:\s*([^\s]+).*?Key is saved at:\s*([^\s]+)",
        )
        .dot_matches_new_line(true)
        .build()
        .ok()
    })
    .as_ref()
}

impl OutputParser for TextParser {
    fn challenge(&self, output: &str) -> Option<DnsChallenge> {
        let caps = challenge_re()?.captures(output)?;
        Some(DnsChallenge {
            record: caps.get(1)?.as_str().to_string(),
            value: caps.get(2)?.as_str().to_string(),
        })
    }

    fn certificate_paths(&self, output: &str) -> Option<CertificatePaths> {
        let caps = certificate_re()?.captures(output)?;
        Some(CertificatePaths {
            cert_path: caps.get(1)?.as_str().to_string(),
            key_path: caps.get(2)?.as_str().to_string(),
        })
    }
}

/// Build the certonly invocation for `domain`: manual mode, DNS challenge,
/// no email registration.
#[must_use]
pub fn certonly_command(domain: &str) -> String {
    format!(
        "certbot certonly -d {domain} --manual --preferred-challenges dns \
         --register-unsafely-without-email --agree-tos"
    )
}
