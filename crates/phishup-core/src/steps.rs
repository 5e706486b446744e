//! Provisioning flow states.
//!
//! The flow is strictly sequential with no branching back: each state's
//! side effects are preconditions for the next, so the only legal move is
//! one step forward. `AwaitDnsConfirmation` is the single suspension point,
//! where the process parks until the operator confirms the DNS record.

use std::fmt;

/// One stage of the provisioning flow, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    /// Refresh and upgrade the package index.
    UpdateSystem,
    /// Install unzip and certbot.
    InstallDeps,
    /// Create the install directory.
    EnsureWorkdir,
    /// Fetch the release archive.
    DownloadRelease,
    /// Extract the archive into the install directory.
    Unpack,
    /// Mark the server binary executable.
    SetExecutable,
    /// Point `listen_url` at the admin address.
    PatchListenAddr,
    /// Run certbot and pull the DNS challenge out of its output.
    RequestCert,
    /// Park until the operator has published the TXT record.
    AwaitDnsConfirmation,
    /// Write the issued certificate paths into the config.
    PatchTlsSettings,
    /// Terminal success state.
    Done,
}

impl Step {
    /// Every step, in execution order.
    pub const ALL: [Self; 11] = [
        Self::UpdateSystem,
        Self::InstallDeps,
        Self::EnsureWorkdir,
        Self::DownloadRelease,
        Self::Unpack,
        Self::SetExecutable,
        Self::PatchListenAddr,
        Self::RequestCert,
        Self::AwaitDnsConfirmation,
        Self::PatchTlsSettings,
        Self::Done,
    ];

    /// The step the flow starts in.
    pub const FIRST: Self = Self::UpdateSystem;

    /// The step after this one; `None` from the terminal state.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::UpdateSystem => Some(Self::InstallDeps),
            Self::InstallDeps => Some(Self::EnsureWorkdir),
            Self::EnsureWorkdir => Some(Self::DownloadRelease),
            Self::DownloadRelease => Some(Self::Unpack),
            Self::Unpack => Some(Self::SetExecutable),
            Self::SetExecutable => Some(Self::PatchListenAddr),
            Self::PatchListenAddr => Some(Self::RequestCert),
            Self::RequestCert => Some(Self::AwaitDnsConfirmation),
            Self::AwaitDnsConfirmation => Some(Self::PatchTlsSettings),
            Self::PatchTlsSettings => Some(Self::Done),
            Self::Done => None,
        }
    }

    /// Whether moving from `self` to `next` is legal. Only a single step
    /// forward ever is.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.next() == Some(next)
    }

    /// True for the terminal success state.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done)
    }

    /// True for the suspension point waiting on the operator.
    #[must_use]
    pub const fn is_suspension(self) -> bool {
        matches!(self, Self::AwaitDnsConfirmation)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::UpdateSystem => "update-system",
            Self::InstallDeps => "install-deps",
            Self::EnsureWorkdir => "ensure-workdir",
            Self::DownloadRelease => "download-release",
            Self::Unpack => "unpack",
            Self::SetExecutable => "set-executable",
            Self::PatchListenAddr => "patch-listen-addr",
            Self::RequestCert => "request-cert",
            Self::AwaitDnsConfirmation => "await-dns-confirmation",
            Self::PatchTlsSettings => "patch-tls-settings",
            Self::Done => "done",
        };
        write!(f, "{label}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_is_the_next_chain() {
        let mut walked = vec![Step::FIRST];
        let mut step = Step::FIRST;
        while let Some(next) = step.next() {
            walked.push(next);
            step = next;
        }
        assert_eq!(walked, Step::ALL);
    }

    #[test]
    fn only_done_is_terminal() {
        for step in Step::ALL {
            assert_eq!(step.is_terminal(), step == Step::Done);
        }
    }

    #[test]
    fn only_the_dns_wait_is_a_suspension() {
        for step in Step::ALL {
            assert_eq!(step.is_suspension(), step == Step::AwaitDnsConfirmation);
        }
    }

    #[test]
    fn transitions_are_forward_only_single_steps() {
        for (i, from) in Step::ALL.iter().enumerate() {
            for (j, to) in Step::ALL.iter().enumerate() {
                let legal = from.can_transition_to(*to);
                assert_eq!(legal, j == i + 1, "{from} -> {to}");
            }
        }
    }

    #[test]
    fn done_has_no_successor() {
        assert_eq!(Step::Done.next(), None);
        assert!(!Step::Done.can_transition_to(Step::FIRST));
    }

    #[test]
    fn labels_are_stable() {
        assert_eq!(Step::UpdateSystem.to_string(), "update-system");
        assert_eq!(Step::AwaitDnsConfirmation.to_string(), "await-dns-confirmation");
        assert_eq!(Step::Done.to_string(), "done");
    }
}
