// Server module entry
// Listener construction, connection handling, accept loop, and signals

pub mod connection;
pub mod listener;
pub mod run;
pub mod signal;

// Re-export the pieces main() wires together
pub use listener::create_reusable_listener;
pub use run::serve;
pub use signal::{start_signal_handler, SignalHandler};
