use crate::logger::{self, LogTag};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

// ═══════════════════════════════════════════════════════════════════════════════
// SHUTDOWN SIGNAL
// ═══════════════════════════════════════════════════════════════════════════════
//
// Ctrl+C and SIGTERM set the flag and wake whoever is waiting. The driver
// races every cycle and every sleep against `wait()`, so an interrupt ends
// the process without starting another sleep. A second Ctrl+C exits at once.
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Default)]
pub struct ShutdownSignal {
    requested: AtomicBool,
    notify: Notify,
}

impl ShutdownSignal {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn request(&self) {
        self.requested.store(true, Ordering::SeqCst);
        // Stores a permit when nobody is waiting yet
        self.notify.notify_one();
    }

    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    /// Resolves once shutdown has been requested
    pub async fn wait(&self) {
        while !self.is_requested() {
            self.notify.notified().await;
        }
    }

    /// Route Ctrl+C and (on unix) SIGTERM to this signal
    ///
    /// Must be called from inside the Tokio runtime. Only one Ctrl+C handler
    /// can exist per process.
    pub fn install_handlers(self: &Arc<Self>) -> anyhow::Result<()> {
        let signal = Arc::clone(self);
        ctrlc::set_handler(move || {
            if signal.is_requested() {
                std::process::exit(130);
            }
            signal.request();
        })?;

        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};

            let shutdown = Arc::clone(self);
            match signal(SignalKind::terminate()) {
                Ok(mut sigterm) => {
                    tokio::spawn(async move {
                        sigterm.recv().await;
                        logger::info(LogTag::System, "SIGTERM received");
                        shutdown.request();
                    });
                }
                Err(e) => {
                    logger::warning(
                        LogTag::System,
                        &format!("Cannot install SIGTERM handler: {}", e),
                    );
                }
            }
        }

        Ok(())
    }
}
