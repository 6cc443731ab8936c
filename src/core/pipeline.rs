//! Pipeline positions, stage slots, and inter-stage latches.
//!
//! A slot tracks which instruction occupies a pipeline position in the
//! current cycle (the control path); the latches carry the data one stage
//! hands to the next, valid for exactly one cycle before being overwritten.

use crate::isa::Instruction;

/// Number of pipeline stages.
pub const NR_STAGES: usize = 5;

/// Display names of the pipeline positions, head first.
pub const STAGE_NAMES: [&str; NR_STAGES] = ["IF", "ID", "EX", "MEM", "WB"];

/// Pipeline position, head (fetch) first. The discriminant indexes the
/// slot array of the cycle driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Instruction fetch.
    If = 0,
    /// Instruction decode.
    Id = 1,
    /// Execute.
    Ex = 2,
    /// Memory access.
    Mem = 3,
    /// Register writeback.
    Wb = 4,
}

impl Stage {
    /// Display name of the position.
    pub fn name(self) -> &'static str {
        STAGE_NAMES[self as usize]
    }
}

/// Instruction occupying a pipeline position.
#[derive(Debug, Clone, Copy)]
pub struct FetchedInst {
    /// Raw machine word.
    pub word: u32,
    /// Program counter value at fetch time.
    pub pc: u32,
    /// Decoded form, filled in once the instruction passes Decode.
    pub decoded: Option<Instruction>,
}

/// One pipeline position of the cycle driver.
///
/// `occupant == None` is the bubble sentinel. `visited` records that the
/// slot has held a real instruction since reset: termination requires every
/// slot to be an already-visited bubble, so a pipeline that has not started
/// is never mistaken for one that has drained.
#[derive(Debug, Clone, Copy, Default)]
pub struct StageSlot {
    /// Current occupant, or `None` for a bubble.
    pub occupant: Option<FetchedInst>,
    /// Remaining stall cycles; a nonzero count freezes the slot.
    pub stalls: u32,
    /// The slot has held a real instruction since reset.
    pub visited: bool,
}

impl StageSlot {
    /// Whether the slot currently holds a bubble.
    pub fn is_bubble(&self) -> bool {
        self.occupant.is_none()
    }

    /// Whether the slot is empty after having done real work, the
    /// termination evidence for the cycle driver.
    pub fn drained(&self) -> bool {
        self.occupant.is_none() && self.visited
    }
}

/// IF-ID latch: the raw fetch result.
#[derive(Debug, Clone, Copy, Default)]
pub struct IfId {
    /// Raw machine word read from memory.
    pub inst: u32,
    /// Fetch-time program counter of the instruction.
    pub pc: u32,
}

/// ID-EX latch: operand fields staged for Execute.
///
/// Register indices, not values: register reads are deferred to Execute,
/// so read-after-write hazards are visible unless the program stalls.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdEx {
    /// Fetch-time program counter of the instruction.
    pub pc: u32,
    /// Source register index.
    pub rs: usize,
    /// Target register index.
    pub rt: usize,
    /// Destination register index (r-format only).
    pub rd: usize,
    /// Shift amount (r-format only).
    pub shamt: u32,
    /// Function code (r-format only).
    pub funct: u32,
    /// Raw 16-bit immediate (i-format only), extension deferred to Execute.
    pub imm: u16,
}

/// Memory operation requested by Execute.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MemAccess {
    /// Pass the ALU result through.
    #[default]
    None,
    /// Read a word at the computed address.
    Load,
    /// Write the staged store value at the computed address.
    Store,
}

/// EX-MEM latch: execution results.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExMem {
    /// Fetch-time program counter of the instruction.
    pub pc: u32,
    /// ALU result, or the effective address for loads and stores.
    pub alu: u32,
    /// Value to write to memory (stores only).
    pub store_data: u32,
    /// Destination register index, `None` when nothing is written back.
    pub dest: Option<usize>,
    /// Memory operation to perform.
    pub access: MemAccess,
}

/// MEM-WB latch: the value headed for the register file.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemWb {
    /// Fetch-time program counter of the instruction.
    pub pc: u32,
    /// ALU result (non-load instructions).
    pub alu: u32,
    /// Word read from memory (loads).
    pub load_data: u32,
    /// Destination register index, `None` when nothing is written back.
    pub dest: Option<usize>,
    /// Writeback takes `load_data` instead of `alu`.
    pub from_mem: bool,
}
