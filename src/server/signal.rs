// Signal handling module (nginx-style)
//
// Supported signals:
// - SIGHUP:  Reload the page store from disk
// - SIGTERM: Graceful shutdown
// - SIGINT:  Graceful shutdown (Ctrl+C)

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// Signal handler state
pub struct SignalHandler {
    /// Shutdown signal (SIGTERM, SIGINT)
    pub shutdown: Arc<Notify>,
    /// Content reload signal (SIGHUP)
    pub reload: Arc<Notify>,
    /// Whether shutdown has been requested
    pub shutdown_requested: Arc<AtomicBool>,
}

impl SignalHandler {
    pub fn new() -> Self {
        Self {
            shutdown: Arc::new(Notify::new()),
            reload: Arc::new(Notify::new()),
            shutdown_requested: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl Default for SignalHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Start signal handlers (Unix)
///
/// | Signal  | Action              |
/// |---------|---------------------|
/// | SIGHUP  | Reload pages file   |
/// | SIGTERM | Graceful stop       |
/// | SIGINT  | Graceful stop       |
#[cfg(unix)]
pub fn start_signal_handler(handler: Arc<SignalHandler>) {
    use tokio::signal::unix::{signal, SignalKind};

    tokio::spawn(async move {
        let mut sighup = signal(SignalKind::hangup()).expect("Failed to register SIGHUP handler");
        let mut sigterm =
            signal(SignalKind::terminate()).expect("Failed to register SIGTERM handler");
        let mut sigint =
            signal(SignalKind::interrupt()).expect("Failed to register SIGINT handler");

        println!("[SIGNAL] Signal handlers registered:");
        println!("  - SIGHUP  (kill -HUP <pid>)   : Reload pages file");
        println!("  - SIGTERM (kill <pid>)        : Graceful shutdown");
        println!("  - SIGINT  (Ctrl+C)            : Graceful shutdown");
        println!("[SIGNAL] Process ID: {}", std::process::id());

        loop {
            tokio::select! {
                _ = sighup.recv() => {
                    println!("\n[SIGNAL] SIGHUP received, reloading page content");
                    handler.reload.notify_one();
                }

                _ = sigterm.recv() => {
                    println!("\n[SIGNAL] SIGTERM received, initiating graceful shutdown");
                    handler.shutdown_requested.store(true, Ordering::SeqCst);
                    handler.shutdown.notify_waiters();
                    break;
                }

                _ = sigint.recv() => {
                    println!("\n[SIGNAL] SIGINT received, initiating graceful shutdown");
                    handler.shutdown_requested.store(true, Ordering::SeqCst);
                    handler.shutdown.notify_waiters();
                    break;
                }
            }
        }
    });
}

/// Windows fallback - only handles Ctrl+C
#[cfg(not(unix))]
pub fn start_signal_handler(handler: Arc<SignalHandler>) {
    tokio::spawn(async move {
        println!("[SIGNAL] Windows mode: Only Ctrl+C is supported");

        if let Ok(()) = tokio::signal::ctrl_c().await {
            println!("\n[SIGNAL] Ctrl+C received, initiating shutdown...");
            handler.shutdown_requested.store(true, Ordering::SeqCst);
            handler.shutdown.notify_waiters();
        }
    });
}
