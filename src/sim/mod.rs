//! Simulation harness: program loading and the interactive session.

/// Program file loader.
pub mod loader;

/// Interactive command surface.
pub mod repl;
