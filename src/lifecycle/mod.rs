//! Process lifecycle subsystem.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger
//!
//! Shutdown (shutdown.rs):
//!     trigger → HTTP intake drains → controller aborts its timers → exit
//! ```
//!
//! # Design Decisions
//! - Timers are aborted on exit, never fired early: no stop() on shutdown
//! - All controller state is in memory and rebuilt from events after restart

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
