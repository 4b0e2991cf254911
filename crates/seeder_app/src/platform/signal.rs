//! Operator interrupt source for the shutdown supervisor.
//!
//! Handlers are installed once at startup so the default "terminate
//! immediately" disposition never applies while the supervisor runs.

use seeder_logging::{seeder_error, seeder_warn};

pub struct Interrupts {
    #[cfg(unix)]
    sigint: Option<tokio::signal::unix::Signal>,
    #[cfg(unix)]
    sigterm: Option<tokio::signal::unix::Signal>,
}

impl Interrupts {
    /// Must be called from within the tokio runtime.
    #[cfg(unix)]
    pub fn install() -> Self {
        use tokio::signal::unix::{signal, SignalKind};

        // Registration may fail in restricted environments (containers, tests).
        let sigint = signal(SignalKind::interrupt())
            .map_err(|e| seeder_warn!("Could not register SIGINT handler: {}", e))
            .ok();
        let sigterm = signal(SignalKind::terminate())
            .map_err(|e| seeder_warn!("Could not register SIGTERM handler: {}", e))
            .ok();
        Self { sigint, sigterm }
    }

    #[cfg(not(unix))]
    pub fn install() -> Self {
        Self {}
    }

    /// Waits for the next interrupt and names the signal that arrived.
    #[cfg(unix)]
    pub async fn recv(&mut self) -> &'static str {
        match (self.sigint.as_mut(), self.sigterm.as_mut()) {
            (Some(sigint), Some(sigterm)) => tokio::select! {
                _ = sigint.recv() => "SIGINT",
                _ = sigterm.recv() => "SIGTERM",
            },
            (Some(sigint), None) => {
                sigint.recv().await;
                "SIGINT"
            }
            (None, Some(sigterm)) => {
                sigterm.recv().await;
                "SIGTERM"
            }
            (None, None) => ctrl_c_fallback().await,
        }
    }

    #[cfg(not(unix))]
    pub async fn recv(&mut self) -> &'static str {
        ctrl_c_fallback().await
    }
}

async fn ctrl_c_fallback() -> &'static str {
    if let Err(e) = tokio::signal::ctrl_c().await {
        seeder_error!("Failed to listen for Ctrl+C: {}", e);
        // Nothing can interrupt us now; park instead of shutting down spuriously.
        std::future::pending::<()>().await;
    }
    "Ctrl+C"
}
