//! Primary opcode values (bits 31-26 of a machine word).

/// All r-format instructions share opcode zero; the function code selects
/// the operation.
pub const OP_RTYPE: u32 = 0x00;

/// Unconditional jump.
pub const OP_J: u32 = 0x02;
/// Jump and link.
pub const OP_JAL: u32 = 0x03;
/// Branch on equal.
pub const OP_BEQ: u32 = 0x04;
/// Branch on not equal.
pub const OP_BNE: u32 = 0x05;
/// Add immediate.
pub const OP_ADDI: u32 = 0x08;
/// Set on less than immediate.
pub const OP_SLTI: u32 = 0x0a;
/// And immediate.
pub const OP_ANDI: u32 = 0x0c;
/// Or immediate.
pub const OP_ORI: u32 = 0x0d;
/// Load word.
pub const OP_LW: u32 = 0x23;
/// Store word.
pub const OP_SW: u32 = 0x2b;
