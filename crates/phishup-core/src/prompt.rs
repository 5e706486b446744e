//! Operator interaction.
//!
//! The flow needs exactly two answers from the operator: the certificate
//! domain, and a bare confirmation line once the DNS TXT record is
//! published. Both sit behind [`Prompt`] so tests can script them and so
//! the indefinite DNS wait is an awaitable the caller can cancel.

use std::io::Write;

use tokio::io::{AsyncBufReadExt, BufReader};

use crate::{Error, Result};

/// Console dialogue the provisioning flow depends on.
#[allow(async_fn_in_trait)]
pub trait Prompt {
    /// Ask for the certificate domain, trimmed of surrounding whitespace.
    async fn read_domain(&mut self) -> Result<String>;

    /// Park until the operator confirms the DNS record is in place.
    ///
    /// There is deliberately no timeout; DNS propagation takes as long as
    /// it takes.
    async fn confirm_dns(&mut self) -> Result<()>;
}

/// [`Prompt`] implementation reading the attached terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsolePrompt;

async fn read_trimmed() -> Result<String> {
    let mut line = String::new();
    let mut reader = BufReader::new(tokio::io::stdin());
    reader
        .read_line(&mut line)
        .await
        .map_err(|source| Error::Prompt { source })?;
    Ok(line.trim().to_string())
}

impl Prompt for ConsolePrompt {
    async fn read_domain(&mut self) -> Result<String> {
        print!("Enter your domain for Certbot (e.g., example.com): ");
        std::io::stdout()
            .flush()
            .map_err(|source| Error::Prompt { source })?;
        read_trimmed().await
    }

    async fn confirm_dns(&mut self) -> Result<()> {
        println!("Wait approximately 1 minute after updating DNS, then press Enter to continue...");
        read_trimmed().await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Canned prompt used to drive the flow without a terminal.
    struct Scripted {
        domain: String,
        confirmations: u32,
    }

    impl Prompt for Scripted {
        async fn read_domain(&mut self) -> Result<String> {
            Ok(self.domain.clone())
        }

        async fn confirm_dns(&mut self) -> Result<()> {
            self.confirmations += 1;
            Ok(())
        }
    }

    async fn certificate_domain<P: Prompt>(prompt: &mut P) -> Result<String> {
        prompt.read_domain().await
    }

    #[tokio::test]
    async fn scripted_prompt_drives_a_generic_caller() -> Result<()> {
        let mut prompt = Scripted {
            domain: "example.com".to_string(),
            confirmations: 0,
        };
        let domain = certificate_domain(&mut prompt).await?;
        assert_eq!(domain, "example.com");

        prompt.confirm_dns().await?;
        assert_eq!(prompt.confirmations, 1);
        Ok(())
    }
}
