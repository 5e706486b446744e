//! The provisioning flow.
//!
//! [`run`] walks the step machine from `update-system` to `done`. System
//! package steps are lenient (an unreachable mirror must not strand a host
//! that already has the dependencies); the download and unpack steps are
//! strict because nothing after them can succeed without the archive. The
//! single certbot invocation yields one transcript that serves both the
//! DNS challenge display and, after the operator confirms the record, the
//! certificate paths.

use std::path::{Path, PathBuf};

use clap::ArgMatches;

use phishup_core::certbot::{self, CertificatePaths, DnsChallenge, OutputParser, TextParser};
use phishup_core::prompt::Prompt;
use phishup_core::steps::Step;
use phishup_core::{config, gophish, shell, Error, Result};

/// Everything the flow needs, resolved from the command line.
#[derive(Debug, Clone)]
pub struct InstallOptions {
    /// Certificate domain; prompted for when absent.
    pub domain: Option<String>,
    /// Admin listen address written to `listen_url`.
    pub listen: String,
    /// Directory the release lands in.
    pub install_dir: PathBuf,
    /// Release archive URL.
    pub release_url: String,
}

impl InstallOptions {
    /// Resolve options from parsed arguments.
    ///
    /// `build_cli` supplies defaults for everything but the domain, so the
    /// fallbacks here never fire in practice.
    #[must_use]
    pub fn from_matches(matches: &ArgMatches) -> Self {
        Self {
            domain: matches.get_one::<String>("domain").cloned(),
            listen: matches
                .get_one::<String>("listen")
                .cloned()
                .unwrap_or_else(|| gophish::DEFAULT_LISTEN_ADDR.to_string()),
            install_dir: matches
                .get_one::<String>("install-dir")
                .map_or_else(|| PathBuf::from(gophish::DEFAULT_INSTALL_DIR), PathBuf::from),
            release_url: matches
                .get_one::<String>("release-url")
                .cloned()
                .unwrap_or_else(|| gophish::RELEASE_URL.to_string()),
        }
    }
}

/// The combined certbot transcript, rejecting a silent run.
///
/// # Errors
///
/// Returns [`Error::NoCertbotOutput`] when certbot wrote nothing to either
/// stream, which means it failed to start or was interrupted.
pub fn certbot_transcript(output: &shell::CommandOutput) -> Result<String> {
    if output.is_empty() {
        return Err(Error::NoCertbotOutput);
    }
    Ok(output.combined())
}

/// Pull the DNS TXT challenge out of `transcript` and show the operator
/// what to publish.
///
/// # Errors
///
/// Returns [`Error::ChallengeNotFound`] after dumping the raw transcript
/// when the pattern is absent.
pub fn extract_challenge(
    parser: &impl OutputParser,
    transcript: &str,
) -> Result<DnsChallenge> {
    match parser.challenge(transcript) {
        Some(challenge) => {
            println!();
            println!("Please update your DNS records with the following:");
            println!("Name: {}", challenge.record);
            println!("Value: {}", challenge.value);
            Ok(challenge)
        }
        None => {
            eprintln!("Failed to extract the DNS challenge. Check Certbot's output:");
            eprintln!("{transcript}");
            Err(Error::ChallengeNotFound)
        }
    }
}

/// Pull the issued certificate paths out of `transcript` and patch the TLS
/// settings into the config under `dir`.
///
/// # Errors
///
/// Returns [`Error::CertificateNotIssued`] after dumping the raw transcript
/// when issuance is not confirmed; config errors propagate from the patch.
pub fn apply_certificate(
    dir: &Path,
    parser: &impl OutputParser,
    transcript: &str,
) -> Result<CertificatePaths> {
    let Some(paths) = parser.certificate_paths(transcript) else {
        eprintln!("Certbot did not confirm issuance. Check the output for errors:");
        eprintln!("{transcript}");
        return Err(Error::CertificateNotIssued);
    };

    println!("Certbot succeeded!");
    println!("Certificate path: {}", paths.cert_path);
    println!("Key path: {}", paths.key_path);

    config::patch(dir, gophish::tls_update(&paths))?;
    Ok(paths)
}

/// Drive every step in order; returns after `done` or the first fatal
/// error.
///
/// # Errors
///
/// Propagates the first fatal step error; lenient command failures are
/// logged and the flow moves on.
pub async fn run<P: Prompt>(opts: &InstallOptions, prompt: &mut P) -> Result<()> {
    let parser = TextParser;
    let mut step = Step::FIRST;
    let mut transcript = String::new();

    loop {
        tracing::info!(%step, "entering step");
        match step {
            Step::UpdateSystem => {
                shell::run("apt update", None, false).await?;
                shell::run("apt upgrade -y", None, false).await?;
            }
            Step::InstallDeps => {
                shell::run("apt install unzip certbot -y", None, false).await?;
            }
            Step::EnsureWorkdir => {
                gophish::ensure_workdir(&opts.install_dir)?;
            }
            Step::DownloadRelease => {
                let command = gophish::download_command(&opts.release_url);
                shell::run(&command, Some(&opts.install_dir), true).await?;
            }
            Step::Unpack => {
                let archive = gophish::archive_name(&opts.release_url);
                let command = gophish::unpack_command(archive);
                shell::run(&command, Some(&opts.install_dir), true).await?;
            }
            Step::SetExecutable => {
                gophish::set_executable(&opts.install_dir)?;
            }
            Step::PatchListenAddr => {
                config::patch(&opts.install_dir, gophish::listen_update(&opts.listen))?;
            }
            Step::RequestCert => {
                let domain = match &opts.domain {
                    Some(domain) => domain.clone(),
                    None => prompt.read_domain().await?,
                };
                let command = certbot::certonly_command(&domain);
                tracing::info!(%domain, "running certbot");
                let output = shell::run(&command, None, false).await?;
                transcript = certbot_transcript(&output)?;
                extract_challenge(&parser, &transcript)?;
            }
            Step::AwaitDnsConfirmation => {
                prompt.confirm_dns().await?;
            }
            Step::PatchTlsSettings => {
                apply_certificate(&opts.install_dir, &parser, &transcript)?;
            }
            Step::Done => {
                println!("Gophish installation and configuration completed successfully!");
            }
        }

        step = match step.next() {
            Some(next) => next,
            None => return Ok(()),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_pick_up_defaults() {
        let matches = crate::cli::build_cli().get_matches_from(["phishup"]);
        let opts = InstallOptions::from_matches(&matches);
        assert_eq!(opts.domain, None);
        assert_eq!(opts.listen, gophish::DEFAULT_LISTEN_ADDR);
        assert_eq!(opts.install_dir, PathBuf::from(gophish::DEFAULT_INSTALL_DIR));
        assert_eq!(opts.release_url, gophish::RELEASE_URL);
    }

    #[test]
    fn options_pick_up_overrides() {
        let matches = crate::cli::build_cli().get_matches_from([
            "phishup",
            "--domain",
            "example.com",
            "--install-dir",
            "/opt/gophish",
        ]);
        let opts = InstallOptions::from_matches(&matches);
        assert_eq!(opts.domain.as_deref(), Some("example.com"));
        assert_eq!(opts.install_dir, PathBuf::from("/opt/gophish"));
    }

    #[test]
    fn silent_certbot_run_is_rejected() {
        let output = shell::CommandOutput {
            success: true,
            exit_code: 0,
            stdout: "  \n".to_string(),
            stderr: String::new(),
        };
        assert!(matches!(
            certbot_transcript(&output),
            Err(Error::NoCertbotOutput)
        ));
    }

    #[test]
    fn noisy_certbot_run_yields_the_combined_transcript() -> Result<()> {
        // a non-zero certbot exit still carries the transcript to scan
        let output = shell::CommandOutput {
            success: false,
            exit_code: 1,
            stdout: "challenge details\n".to_string(),
            stderr: "deprecation warning\n".to_string(),
        };
        let transcript = certbot_transcript(&output)?;
        assert_eq!(transcript, "challenge details\ndeprecation warning\n");
        Ok(())
    }
}
