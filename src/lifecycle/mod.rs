//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → shutdown_signal() resolves
//!
//! Shutdown (shutdown.rs):
//!     Shutdown::trigger() → subscribers (HTTP server) stop accepting → drain → exit
//! ```
//!
//! # Design Decisions
//! - Signal handling is separate from the coordinator so tests can trigger
//!   shutdown without sending OS signals

pub mod shutdown;
pub mod signals;

pub use shutdown::{Shutdown, ShutdownListener};
pub use signals::shutdown_signal;
