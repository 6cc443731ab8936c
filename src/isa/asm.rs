//! Mnemonic-to-machine-word assembler.
//!
//! Encode-only translation of one assembly line into one 32-bit machine
//! word. No labels, no sections: branch offsets are given in instruction
//! words and jump targets as byte addresses. Operands may be separated by
//! whitespace or commas, memory operands accept both `lw t0, 8(s1)` and the
//! flat `lw t0 8 s1` form, and `//` or `#` starts a comment.

use thiserror::Error;

use super::{abi, funct, opcodes};

/// Assembly translation failure for a single line.
#[derive(Debug, Error)]
pub enum AsmError {
    /// The mnemonic is not part of the supported instruction set.
    #[error("unknown mnemonic '{0}'")]
    UnknownMnemonic(String),

    /// A register operand did not resolve to an index.
    #[error("unknown register '{0}'")]
    UnknownRegister(String),

    /// Wrong number of operands for the mnemonic.
    #[error("'{mnemonic}' expects {expected} operand(s), found {found}")]
    OperandCount {
        /// Mnemonic being translated.
        mnemonic: String,
        /// Required operand count.
        expected: usize,
        /// Operand count found on the line.
        found: usize,
    },

    /// An immediate operand is unparsable or out of range.
    #[error("bad immediate '{0}'")]
    BadImmediate(String),
}

/// Translates one line of assembly.
///
/// # Returns
///
/// `Ok(None)` for a blank or comment-only line, `Ok(Some(word))` for an
/// instruction.
///
/// # Errors
///
/// Returns an [`AsmError`] describing the first problem on the line.
pub fn assemble_line(line: &str) -> Result<Option<u32>, AsmError> {
    let code = line
        .split("//")
        .next()
        .unwrap_or("")
        .split('#')
        .next()
        .unwrap_or("");
    let lowered = code.to_lowercase().replace(',', " ");
    let tokens: Vec<&str> = lowered.split_whitespace().collect();
    if tokens.is_empty() {
        return Ok(None);
    }
    translate(&tokens).map(Some)
}

/// Translates a tokenized assembly line into a machine word.
pub fn translate(tokens: &[&str]) -> Result<u32, AsmError> {
    let mnemonic = tokens[0];
    let operands = &tokens[1..];
    match mnemonic {
        "add" | "sub" | "and" | "or" | "nor" | "slt" => {
            let [rd, rs, rt] = registers::<3>(mnemonic, operands)?;
            let code = match mnemonic {
                "add" => funct::ADD,
                "sub" => funct::SUB,
                "and" => funct::AND,
                "or" => funct::OR,
                "nor" => funct::NOR,
                _ => funct::SLT,
            };
            Ok(encode_r(rs, rt, rd, 0, code))
        }
        "sll" | "srl" | "sra" => {
            expect_operands(mnemonic, operands, 3)?;
            let rd = register(operands[0])?;
            let rt = register(operands[1])?;
            let shamt = immediate(operands[2], 0, 31)? as u32;
            let code = match mnemonic {
                "sll" => funct::SLL,
                "srl" => funct::SRL,
                _ => funct::SRA,
            };
            Ok(encode_r(0, rt, rd, shamt, code))
        }
        "jr" => {
            expect_operands(mnemonic, operands, 1)?;
            let rs = register(operands[0])?;
            Ok(encode_r(rs, 0, 0, 0, funct::JR))
        }
        "addi" | "andi" | "ori" | "slti" => {
            expect_operands(mnemonic, operands, 3)?;
            let rt = register(operands[0])?;
            let rs = register(operands[1])?;
            let imm = immediate(operands[2], i64::from(i16::MIN), i64::from(u16::MAX))?;
            let opcode = match mnemonic {
                "addi" => opcodes::OP_ADDI,
                "andi" => opcodes::OP_ANDI,
                "ori" => opcodes::OP_ORI,
                _ => opcodes::OP_SLTI,
            };
            Ok(encode_i(opcode, rs, rt, imm as u16))
        }
        "beq" | "bne" => {
            expect_operands(mnemonic, operands, 3)?;
            let rs = register(operands[0])?;
            let rt = register(operands[1])?;
            // Branch offsets are given in instruction words, the raw value
            // of the immediate field.
            let imm = immediate(operands[2], i64::from(i16::MIN), i64::from(u16::MAX))?;
            let opcode = if mnemonic == "beq" { opcodes::OP_BEQ } else { opcodes::OP_BNE };
            Ok(encode_i(opcode, rs, rt, imm as u16))
        }
        "lw" | "sw" => {
            let opcode = if mnemonic == "lw" { opcodes::OP_LW } else { opcodes::OP_SW };
            let rt = if operands.is_empty() {
                return Err(operand_count(mnemonic, operands, 2));
            } else {
                register(operands[0])?
            };
            let (imm, rs) = match operands.len() {
                2 => memory_operand(operands[1])?,
                3 => (
                    immediate(operands[1], i64::from(i16::MIN), i64::from(u16::MAX))?,
                    register(operands[2])?,
                ),
                _ => return Err(operand_count(mnemonic, operands, 2)),
            };
            Ok(encode_i(opcode, rs, rt, imm as u16))
        }
        "j" | "jal" => {
            expect_operands(mnemonic, operands, 1)?;
            // Jump targets are byte addresses; the word index lands in the
            // 26-bit target field.
            let addr = immediate(operands[0], 0, i64::from(u32::MAX))? as u32;
            let opcode = if mnemonic == "j" { opcodes::OP_J } else { opcodes::OP_JAL };
            Ok(encode_j(opcode, addr >> 2))
        }
        other => Err(AsmError::UnknownMnemonic(other.to_string())),
    }
}

fn encode_r(rs: usize, rt: usize, rd: usize, shamt: u32, code: u32) -> u32 {
    ((rs as u32) << 21) | ((rt as u32) << 16) | ((rd as u32) << 11) | (shamt << 6) | code
}

fn encode_i(opcode: u32, rs: usize, rt: usize, imm: u16) -> u32 {
    (opcode << 26) | ((rs as u32) << 21) | ((rt as u32) << 16) | u32::from(imm)
}

fn encode_j(opcode: u32, target: u32) -> u32 {
    (opcode << 26) | (target & 0x03ff_ffff)
}

fn register(token: &str) -> Result<usize, AsmError> {
    abi::register_index(token).ok_or_else(|| AsmError::UnknownRegister(token.to_string()))
}

fn registers<const N: usize>(mnemonic: &str, operands: &[&str]) -> Result<[usize; N], AsmError> {
    expect_operands(mnemonic, operands, N)?;
    let mut out = [0; N];
    for (slot, &token) in out.iter_mut().zip(operands) {
        *slot = register(token)?;
    }
    Ok(out)
}

fn expect_operands(mnemonic: &str, operands: &[&str], expected: usize) -> Result<(), AsmError> {
    if operands.len() == expected {
        Ok(())
    } else {
        Err(operand_count(mnemonic, operands, expected))
    }
}

fn operand_count(mnemonic: &str, operands: &[&str], expected: usize) -> AsmError {
    AsmError::OperandCount {
        mnemonic: mnemonic.to_string(),
        expected,
        found: operands.len(),
    }
}

/// Parses a signed or unsigned integer with optional `0x` prefix and sign.
fn immediate(token: &str, min: i64, max: i64) -> Result<i64, AsmError> {
    let bad = || AsmError::BadImmediate(token.to_string());
    let (negative, body) = match token.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, token),
    };
    let magnitude = if let Some(hex) = body.strip_prefix("0x").or_else(|| body.strip_prefix("0X")) {
        i64::from_str_radix(hex, 16).map_err(|_| bad())?
    } else {
        body.parse::<i64>().map_err(|_| bad())?
    };
    let value = if negative { -magnitude } else { magnitude };
    if value < min || value > max {
        return Err(bad());
    }
    Ok(value)
}

/// Parses an `offset(base)` memory operand.
fn memory_operand(token: &str) -> Result<(i64, usize), AsmError> {
    let Some((offset, rest)) = token.split_once('(') else {
        return Err(AsmError::BadImmediate(token.to_string()));
    };
    let Some(base) = rest.strip_suffix(')') else {
        return Err(AsmError::BadImmediate(token.to_string()));
    };
    let offset = if offset.is_empty() {
        0
    } else {
        immediate(offset, i64::from(i16::MIN), i64::from(u16::MAX))?
    };
    Ok((offset, register(base)?))
}
