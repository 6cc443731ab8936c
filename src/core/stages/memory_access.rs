//! Memory access stage.

use crate::common::data::AccessType;
use crate::common::error::Trap;
use crate::core::pipeline::{MemAccess, MemWb, Stage};
use crate::core::Cpu;
use crate::isa::HALT_WORD;

/// Performs the memory operation requested by Execute, or passes the ALU
/// result through unchanged, and writes the MEM-WB latch.
///
/// When a memory stall is configured, a load or store holds this stage for
/// that many extra cycles via the stall primitive, modeling a slow memory.
pub fn mem_stage(cpu: &mut Cpu) -> Result<(), Trap> {
    let Some(occ) = cpu.slots[Stage::Mem as usize].occupant else {
        return Ok(());
    };
    if occ.word == HALT_WORD {
        return Ok(());
    }

    let ex_mem = cpu.ex_mem;
    let mut out = MemWb {
        pc: ex_mem.pc,
        alu: ex_mem.alu,
        dest: ex_mem.dest,
        ..MemWb::default()
    };

    match ex_mem.access {
        MemAccess::Load => {
            out.load_data = cpu.mem.read_word(ex_mem.alu, AccessType::Read)?;
            out.from_mem = true;
        }
        MemAccess::Store => {
            cpu.mem.write_word(ex_mem.alu, ex_mem.store_data)?;
        }
        MemAccess::None => {}
    }

    if ex_mem.access != MemAccess::None && cpu.memory_stall > 0 {
        let cycles = cpu.memory_stall;
        cpu.request_stall(Stage::Mem, cycles);
    }

    cpu.mem_wb = out;
    Ok(())
}
