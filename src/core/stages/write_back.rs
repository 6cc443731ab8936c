//! Register writeback stage.

use crate::common::error::Trap;
use crate::core::pipeline::Stage;
use crate::core::Cpu;
use crate::isa::{Op, HALT_WORD};

/// Writes the ALU or memory result into the register file at the latched
/// destination index and retires the instruction into the statistics.
/// Instructions without a destination (jumps, branches, stores) leave the
/// register file untouched.
pub fn wb_stage(cpu: &mut Cpu) -> Result<(), Trap> {
    let Some(occ) = cpu.slots[Stage::Wb as usize].occupant else {
        return Ok(());
    };
    if occ.word == HALT_WORD {
        return Ok(());
    }

    let mem_wb = cpu.mem_wb;
    let val = if mem_wb.from_mem {
        mem_wb.load_data
    } else {
        mem_wb.alu
    };
    if let Some(dest) = mem_wb.dest {
        cpu.regs.write(dest, val);
    }

    cpu.stats.instructions_retired += 1;
    if let Some(inst) = occ.decoded {
        match inst.op() {
            Op::Lw => cpu.stats.inst_load += 1,
            Op::Sw => cpu.stats.inst_store += 1,
            op if op.is_control_flow() => cpu.stats.inst_branch += 1,
            _ => cpu.stats.inst_alu += 1,
        }
    }

    Ok(())
}
