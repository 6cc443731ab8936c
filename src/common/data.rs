//! Memory Access Types.
//!
//! This module defines the classification of memory accesses used throughout
//! the simulator. The bounds checker uses these types to report the correct
//! trap for a faulting access.

/// Type of memory access operation.
///
/// Used to distinguish between instruction fetches, data reads, and data
/// writes so that an out-of-bounds access raises the matching trap.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessType {
    /// Instruction fetch access.
    Fetch,

    /// Data read access.
    Read,

    /// Data write access.
    Write,
}
