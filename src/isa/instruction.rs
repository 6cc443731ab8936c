//! Instruction decoding.
//!
//! A machine word decodes into one of three formats, selected by the opcode
//! field alone. The format tag and operation are fixed at decode time and
//! carried as data from then on; no stage re-dispatches on mnemonic names.

use crate::common::error::Trap;

use super::{funct, opcodes};

/// Operation selected by the opcode (and, for r-format, the function code).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    /// `rd = rs + rt` (32-bit wraparound).
    Add,
    /// `rd = rs - rt`.
    Sub,
    /// `rd = rs & rt`.
    And,
    /// `rd = rs | rt`.
    Or,
    /// `rd = ~(rs | rt)`.
    Nor,
    /// `rd = 1` if `signed(rs) < signed(rt)` else `0`.
    Slt,
    /// `rd = rt << shamt`.
    Sll,
    /// `rd = rt >> shamt` (logical).
    Srl,
    /// `rd = rt >> shamt` (arithmetic, sign-preserving).
    Sra,
    /// `pc = rs`.
    Jr,
    /// `rt = rs + sign_extend16(imm)`.
    Addi,
    /// `rt = rs & zero_extend16(imm)`.
    Andi,
    /// `rt = rs | zero_extend16(imm)`.
    Ori,
    /// `rt = 1` if `signed(rs) < sign_extend16(imm)` else `0`.
    Slti,
    /// `rt = mem[rs + sign_extend16(imm)]`.
    Lw,
    /// `mem[rs + sign_extend16(imm)] = rt`.
    Sw,
    /// Branch to `pc + 4 + (sign_extend16(imm) << 2)` when `rs == rt`.
    Beq,
    /// Branch to `pc + 4 + (sign_extend16(imm) << 2)` when `rs != rt`.
    Bne,
    /// `pc = (pc & 0xf0000000) | (target << 2)`.
    J,
    /// Like `J`, and links the jump's own address into register 31.
    Jal,
}

impl Op {
    /// Assembly mnemonic of the operation.
    pub fn mnemonic(self) -> &'static str {
        match self {
            Op::Add => "add",
            Op::Sub => "sub",
            Op::And => "and",
            Op::Or => "or",
            Op::Nor => "nor",
            Op::Slt => "slt",
            Op::Sll => "sll",
            Op::Srl => "srl",
            Op::Sra => "sra",
            Op::Jr => "jr",
            Op::Addi => "addi",
            Op::Andi => "andi",
            Op::Ori => "ori",
            Op::Slti => "slti",
            Op::Lw => "lw",
            Op::Sw => "sw",
            Op::Beq => "beq",
            Op::Bne => "bne",
            Op::J => "j",
            Op::Jal => "jal",
        }
    }

    /// Whether the operation redirects the program counter.
    pub fn is_control_flow(self) -> bool {
        matches!(self, Op::Jr | Op::Beq | Op::Bne | Op::J | Op::Jal)
    }
}

/// Decoded instruction.
///
/// The variant tag derives solely from the opcode field and never changes
/// after decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// R-format: opcode 0, operation selected by the function code.
    Register {
        /// Operation.
        op: Op,
        /// Source register index (bits 25-21).
        rs: usize,
        /// Target register index (bits 20-16).
        rt: usize,
        /// Destination register index (bits 15-11).
        rd: usize,
        /// Shift amount (bits 10-6).
        shamt: u32,
        /// Function code (bits 5-0).
        funct: u32,
    },
    /// I-format: operation selected by the opcode.
    Immediate {
        /// Operation.
        op: Op,
        /// Source register index (bits 25-21).
        rs: usize,
        /// Target register index (bits 20-16).
        rt: usize,
        /// Raw 16-bit immediate; extension happens at execute time.
        imm: u16,
    },
    /// J-format: 26-bit target address fragment.
    Jump {
        /// Operation.
        op: Op,
        /// Target fragment (bits 25-0), shifted left by two when applied.
        target: u32,
    },
}

impl Instruction {
    /// Decodes a 32-bit machine word.
    ///
    /// # Errors
    ///
    /// Returns a fatal [`Trap`] for an opcode or r-format function code
    /// outside the supported set.
    pub fn decode(word: u32) -> Result<Self, Trap> {
        let opcode = word >> 26;
        match opcode {
            opcodes::OP_RTYPE => {
                let funct_bits = word & 0x3f;
                let op = match funct_bits {
                    funct::ADD => Op::Add,
                    funct::SUB => Op::Sub,
                    funct::AND => Op::And,
                    funct::OR => Op::Or,
                    funct::NOR => Op::Nor,
                    funct::SLT => Op::Slt,
                    funct::SLL => Op::Sll,
                    funct::SRL => Op::Srl,
                    funct::SRA => Op::Sra,
                    funct::JR => Op::Jr,
                    _ => return Err(Trap::UnknownFunct { word, funct: funct_bits }),
                };
                Ok(Instruction::Register {
                    op,
                    rs: ((word >> 21) & 0x1f) as usize,
                    rt: ((word >> 16) & 0x1f) as usize,
                    rd: ((word >> 11) & 0x1f) as usize,
                    shamt: (word >> 6) & 0x1f,
                    funct: funct_bits,
                })
            }
            opcodes::OP_J | opcodes::OP_JAL => Ok(Instruction::Jump {
                op: if opcode == opcodes::OP_J { Op::J } else { Op::Jal },
                target: word & 0x03ff_ffff,
            }),
            _ => {
                let op = match opcode {
                    opcodes::OP_ADDI => Op::Addi,
                    opcodes::OP_ANDI => Op::Andi,
                    opcodes::OP_ORI => Op::Ori,
                    opcodes::OP_SLTI => Op::Slti,
                    opcodes::OP_LW => Op::Lw,
                    opcodes::OP_SW => Op::Sw,
                    opcodes::OP_BEQ => Op::Beq,
                    opcodes::OP_BNE => Op::Bne,
                    _ => return Err(Trap::UnknownOpcode { word, opcode }),
                };
                Ok(Instruction::Immediate {
                    op,
                    rs: ((word >> 21) & 0x1f) as usize,
                    rt: ((word >> 16) & 0x1f) as usize,
                    imm: (word & 0xffff) as u16,
                })
            }
        }
    }

    /// Operation of the instruction, regardless of format.
    pub fn op(&self) -> Op {
        match *self {
            Instruction::Register { op, .. }
            | Instruction::Immediate { op, .. }
            | Instruction::Jump { op, .. } => op,
        }
    }

    /// Assembly mnemonic of the instruction.
    pub fn mnemonic(&self) -> &'static str {
        self.op().mnemonic()
    }
}
