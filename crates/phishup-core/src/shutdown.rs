//! Signal plumbing for the top-level interrupt boundary.
//!
//! The flow itself never observes signals; the binary races its one run
//! future against these receivers and maps a delivered signal to a clean
//! non-zero exit.

use tokio::sync::broadcast;

use crate::{Error, Result};

/// Create broadcast channels for SIGINT and SIGTERM.
///
/// Each returned receiver yields one value when its signal is delivered.
/// On non-Unix hosts both map to Ctrl-C.
///
/// # Errors
///
/// Returns [`Error::SignalSetup`] when a handler cannot be installed.
pub fn signal_channels() -> Result<(broadcast::Receiver<()>, broadcast::Receiver<()>)> {
    let (sigint_tx, sigint_rx) = broadcast::channel(1);
    let (sigterm_tx, sigterm_rx) = broadcast::channel(1);

    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigint =
            signal(SignalKind::interrupt()).map_err(|source| Error::SignalSetup { source })?;
        let mut sigterm =
            signal(SignalKind::terminate()).map_err(|source| Error::SignalSetup { source })?;

        tokio::spawn(async move {
            let _ = sigint.recv().await;
            tracing::info!("received SIGINT");
            let _ = sigint_tx.send(());
        });

        tokio::spawn(async move {
            let _ = sigterm.recv().await;
            tracing::info!("received SIGTERM");
            let _ = sigterm_tx.send(());
        });
    }

    #[cfg(not(unix))]
    {
        tokio::spawn(async move {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("received Ctrl-C");
            let _ = sigint_tx.send(());
            let _ = sigterm_tx.send(());
        });
    }

    Ok((sigint_rx, sigterm_rx))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn channels_start_empty() -> Result<()> {
        let (mut sigint, mut sigterm) = signal_channels()?;
        assert!(matches!(
            sigint.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
        assert!(matches!(
            sigterm.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
        Ok(())
    }
}
