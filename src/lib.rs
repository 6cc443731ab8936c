//! MIPS 5-Stage Pipeline Simulator Library.
//!
//! This crate implements a cycle-accurate instructional simulator for a
//! simplified MIPS instruction set. It models the classic five-stage in-order
//! pipeline (Fetch, Decode, Execute, Memory, Writeback) with explicit
//! inter-stage latches and a stall/bubble protocol.
//!
//! # Architecture
//!
//! * **Core**: 5-stage in-order pipeline advanced one clock cycle at a time.
//! * **State**: 32-entry register file, program counter, flat big-endian
//!   byte-addressable memory.
//! * **Front end**: hex program loader, line assembler, and an interactive
//!   command loop (`run`, `next`, `show`, `dump`, `pipe`, `reset`).
//!
//! # Modules
//!
//! * `common`: Shared types and error handling.
//! * `config`: Configuration loading and parsing.
//! * `core`: CPU core implementation.
//! * `isa`: Instruction Set Architecture definitions.
//! * `sim`: Program loading and the interactive session.
//! * `stats`: Simulation statistics collection.

/// Shared types and error handling.
///
/// Provides the memory access classification and the fatal trap taxonomy
/// used throughout the simulator.
pub mod common;

/// Configuration system for machine and trace settings.
///
/// Loads and parses TOML configuration files to customize memory size,
/// the initial program counter, and diagnostic output.
pub mod config;

/// CPU core implementation including pipeline stages and the cycle driver.
///
/// Implements the 5-stage in-order pipeline (Fetch, Decode, Execute, Memory,
/// Writeback), the stall controller, and the architectural state.
pub mod core;

/// Instruction Set Architecture definitions.
///
/// Implements instruction decoding, register naming conventions, and the
/// mnemonic-to-machine-word assembler.
pub mod isa;

/// Simulation harness: program loader and interactive command surface.
///
/// Handles loading hex or assembly program files into memory and drives
/// the simulator from interactive commands or batch runs.
pub mod sim;

/// Simulation statistics collection and reporting.
///
/// Tracks cycle counts, retired instruction counts, and stall cycles
/// during simulation execution.
pub mod stats;
