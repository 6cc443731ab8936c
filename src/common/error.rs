//! Fatal trap taxonomy.
//!
//! Every trap in this simulator is fatal: an unrecognized instruction at
//! decode time or an out-of-bounds memory access aborts the run. There are
//! no recoverable errors inside the pipeline; the only recovery path is
//! reloading a program and issuing `reset`.

use thiserror::Error;

/// Fatal simulation trap.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Trap {
    /// The decoder saw an opcode outside the supported instruction set.
    #[error("unknown instruction {word:#010x} with opcode {opcode:#04x}")]
    UnknownOpcode {
        /// Raw machine word.
        word: u32,
        /// Opcode field (bits 31-26).
        opcode: u32,
    },

    /// The decoder saw an r-format word with an unsupported function code.
    #[error("unknown r-format instruction {word:#010x} with funct {funct:#04x}")]
    UnknownFunct {
        /// Raw machine word.
        word: u32,
        /// Function code field (bits 5-0).
        funct: u32,
    },

    /// Instruction fetch past the end of memory.
    #[error("instruction fetch out of bounds at {0:#010x}")]
    FetchOutOfBounds(u32),

    /// Load past the end of memory.
    #[error("load out of bounds at {0:#010x}")]
    LoadOutOfBounds(u32),

    /// Store past the end of memory.
    #[error("store out of bounds at {0:#010x}")]
    StoreOutOfBounds(u32),
}
