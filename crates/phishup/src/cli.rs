//! Command-line definition.

use clap::{Arg, Command};

use phishup_core::gophish;

const AFTER_HELP: &str = "\
The flow runs strictly in order:
  update-system, install-deps, ensure-workdir, download-release, unpack,
  set-executable, patch-listen-addr, request-cert, await-dns-confirmation,
  patch-tls-settings

request-cert runs certbot in manual DNS-challenge mode; you will be shown a
TXT record to publish and the flow waits until you confirm it. Must be run
as root. Logging goes to stderr and follows RUST_LOG (default: info).";

/// Build the phishup command-line interface.
#[must_use]
pub fn build_cli() -> Command {
    Command::new("phishup")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Provision a gophish server: packages, release archive, TLS certificate")
        .arg(
            Arg::new("domain")
                .long("domain")
                .value_name("DOMAIN")
                .help("Certificate domain; prompted for interactively when omitted"),
        )
        .arg(
            Arg::new("listen")
                .long("listen")
                .value_name("ADDR")
                .default_value(gophish::DEFAULT_LISTEN_ADDR)
                .help("Admin listen address written to listen_url"),
        )
        .arg(
            Arg::new("install-dir")
                .long("install-dir")
                .value_name("DIR")
                .default_value(gophish::DEFAULT_INSTALL_DIR)
                .help("Directory the release is downloaded and unpacked into"),
        )
        .arg(
            Arg::new("release-url")
                .long("release-url")
                .value_name("URL")
                .default_value(gophish::RELEASE_URL)
                .help("Release archive to install"),
        )
        .after_help(AFTER_HELP)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_release_facts() {
        let matches = build_cli().get_matches_from(["phishup"]);
        assert_eq!(
            matches.get_one::<String>("listen").map(String::as_str),
            Some(gophish::DEFAULT_LISTEN_ADDR)
        );
        assert_eq!(
            matches.get_one::<String>("install-dir").map(String::as_str),
            Some(gophish::DEFAULT_INSTALL_DIR)
        );
        assert_eq!(
            matches.get_one::<String>("release-url").map(String::as_str),
            Some(gophish::RELEASE_URL)
        );
        assert_eq!(matches.get_one::<String>("domain"), None);
    }

    #[test]
    fn flags_override_defaults() {
        let matches = build_cli().get_matches_from([
            "phishup",
            "--domain",
            "example.com",
            "--listen",
            "127.0.0.1:4444",
            "--install-dir",
            "/opt/gophish",
        ]);
        assert_eq!(
            matches.get_one::<String>("domain").map(String::as_str),
            Some("example.com")
        );
        assert_eq!(
            matches.get_one::<String>("listen").map(String::as_str),
            Some("127.0.0.1:4444")
        );
        assert_eq!(
            matches.get_one::<String>("install-dir").map(String::as_str),
            Some("/opt/gophish")
        );
    }

    #[test]
    fn cli_definition_is_consistent() {
        build_cli().debug_assert();
    }
}
