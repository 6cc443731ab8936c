//! Instruction decode stage.

use crate::common::error::Trap;
use crate::core::pipeline::{IdEx, Stage};
use crate::core::Cpu;
use crate::isa::{Instruction, HALT_WORD};

/// Decodes the word latched by Fetch in the previous cycle and stages the
/// operand fields for Execute. The decoded form is stored back into the ID
/// slot, where it rides along as the control path for the later stages.
///
/// Register *values* are not read here; Execute reads the register file by
/// the staged indices, so there is no forwarding and read-after-write
/// hazards are visible unless the program stalls around them.
pub fn decode_stage(cpu: &mut Cpu) -> Result<(), Trap> {
    let Some(mut occ) = cpu.slots[Stage::Id as usize].occupant else {
        return Ok(());
    };
    if occ.word == HALT_WORD {
        return Ok(());
    }

    // An unknown opcode or function code is fatal here, before any operand
    // is staged.
    let inst = match occ.decoded {
        Some(inst) => inst,
        None => Instruction::decode(cpu.if_id.inst)?,
    };
    occ.decoded = Some(inst);
    cpu.slots[Stage::Id as usize].occupant = Some(occ);

    match inst {
        Instruction::Register {
            rs,
            rt,
            rd,
            shamt,
            funct,
            ..
        } => {
            cpu.id_ex = IdEx {
                pc: occ.pc,
                rs,
                rt,
                rd,
                shamt,
                funct,
                imm: 0,
            };
        }
        Instruction::Immediate { rs, rt, imm, .. } => {
            cpu.id_ex = IdEx {
                pc: occ.pc,
                rs,
                rt,
                imm,
                ..IdEx::default()
            };
        }
        // Jump targets were extracted at decode and travel in the slot;
        // there are no operands to stage.
        Instruction::Jump { .. } => {}
    }

    Ok(())
}
