//! Observability subsystem.
//!
//! The library only emits `tracing` events; installing a subscriber is left
//! to the binary via [`logging::init_logging`].

pub mod logging;
