//! Execute stage.

use crate::common::error::Trap;
use crate::core::pipeline::{ExMem, MemAccess, Stage};
use crate::core::Cpu;
use crate::isa::{abi, sign_extend16, zero_extend16, Instruction, Op, HALT_WORD};

/// Performs the ALU operation staged by Decode and writes the EX-MEM latch.
///
/// Control flow resolves here, not later: branches and jumps overwrite the
/// program counter during their Execute cycle. Instructions already fetched
/// behind a taken branch are not squashed; avoiding them is the program's
/// job, matching the no-forwarding data path.
pub fn execute_stage(cpu: &mut Cpu) -> Result<(), Trap> {
    let Some(occ) = cpu.slots[Stage::Ex as usize].occupant else {
        return Ok(());
    };
    if occ.word == HALT_WORD {
        return Ok(());
    }
    let Some(inst) = occ.decoded else {
        return Ok(());
    };

    let id_ex = cpu.id_ex;
    let pc = occ.pc;
    let rs_val = cpu.regs.read(id_ex.rs);
    let rt_val = cpu.regs.read(id_ex.rt);
    let simm = sign_extend16(id_ex.imm);
    let zimm = zero_extend16(id_ex.imm);

    let mut out = ExMem {
        pc,
        ..ExMem::default()
    };

    match inst.op() {
        Op::Add => {
            out.alu = rs_val.wrapping_add(rt_val);
            out.dest = Some(id_ex.rd);
        }
        Op::Sub => {
            out.alu = rs_val.wrapping_sub(rt_val);
            out.dest = Some(id_ex.rd);
        }
        Op::And => {
            out.alu = rs_val & rt_val;
            out.dest = Some(id_ex.rd);
        }
        Op::Or => {
            out.alu = rs_val | rt_val;
            out.dest = Some(id_ex.rd);
        }
        Op::Nor => {
            out.alu = !(rs_val | rt_val);
            out.dest = Some(id_ex.rd);
        }
        Op::Slt => {
            out.alu = ((rs_val as i32) < (rt_val as i32)) as u32;
            out.dest = Some(id_ex.rd);
        }
        Op::Sll => {
            out.alu = rt_val << id_ex.shamt;
            out.dest = Some(id_ex.rd);
        }
        Op::Srl => {
            out.alu = rt_val >> id_ex.shamt;
            out.dest = Some(id_ex.rd);
        }
        Op::Sra => {
            out.alu = ((rt_val as i32) >> id_ex.shamt) as u32;
            out.dest = Some(id_ex.rd);
        }
        Op::Jr => {
            cpu.pc = rs_val;
            cpu.stats.branches_taken += 1;
            out.alu = rs_val;
        }
        Op::Addi => {
            out.alu = rs_val.wrapping_add(simm);
            out.dest = Some(id_ex.rt);
        }
        Op::Andi => {
            out.alu = rs_val & zimm;
            out.dest = Some(id_ex.rt);
        }
        Op::Ori => {
            out.alu = rs_val | zimm;
            out.dest = Some(id_ex.rt);
        }
        Op::Slti => {
            out.alu = ((rs_val as i32) < (simm as i32)) as u32;
            out.dest = Some(id_ex.rt);
        }
        Op::Lw => {
            out.alu = rs_val.wrapping_add(simm);
            out.dest = Some(id_ex.rt);
            out.access = MemAccess::Load;
        }
        Op::Sw => {
            out.alu = rs_val.wrapping_add(simm);
            out.store_data = rt_val;
            out.access = MemAccess::Store;
        }
        Op::Beq => {
            if rs_val == rt_val {
                cpu.pc = branch_target(pc, id_ex.imm);
                cpu.stats.branches_taken += 1;
            }
        }
        Op::Bne => {
            if rs_val != rt_val {
                cpu.pc = branch_target(pc, id_ex.imm);
                cpu.stats.branches_taken += 1;
            }
        }
        Op::J => {
            if let Instruction::Jump { target, .. } = inst {
                cpu.pc = jump_target(pc, target);
                cpu.stats.branches_taken += 1;
            }
        }
        Op::Jal => {
            if let Instruction::Jump { target, .. } = inst {
                cpu.pc = jump_target(pc, target);
                cpu.stats.branches_taken += 1;
            }
            // The link value is the jump's own fetch address, carried to
            // the register file through the normal writeback path.
            out.alu = pc;
            out.dest = Some(abi::REG_RA);
        }
    }

    cpu.ex_mem = out;
    Ok(())
}

/// Branch target relative to the branch's own fetch address:
/// `pc + 4 + (sign_extend16(imm) << 2)`.
fn branch_target(pc: u32, imm: u16) -> u32 {
    pc.wrapping_add(4)
        .wrapping_add(sign_extend16(imm).wrapping_shl(2))
}

/// Jump target within the current 256 MiB region:
/// `(pc & 0xf0000000) | (target << 2)`.
fn jump_target(pc: u32, target: u32) -> u32 {
    (pc & 0xf000_0000) | (target << 2)
}
