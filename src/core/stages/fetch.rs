//! Instruction fetch stage.

use crate::common::data::AccessType;
use crate::common::error::Trap;
use crate::core::pipeline::{FetchedInst, IfId, Stage};
use crate::core::Cpu;
use crate::isa::HALT_WORD;

/// Reads the word at `pc`, records it in the IF slot and the IF-ID latch,
/// and advances `pc` by four. Once the halt word has been fetched the stage
/// stops reading memory and leaves bubbles behind it, letting the pipeline
/// drain.
pub fn fetch_stage(cpu: &mut Cpu) -> Result<(), Trap> {
    if cpu.halted {
        cpu.slots[Stage::If as usize].occupant = None;
        return Ok(());
    }

    let pc = cpu.pc;
    let word = cpu.mem.read_word(pc, AccessType::Fetch)?;

    let slot = &mut cpu.slots[Stage::If as usize];
    slot.occupant = Some(FetchedInst {
        word,
        pc,
        decoded: None,
    });
    slot.visited = true;

    cpu.if_id = IfId { inst: word, pc };

    if word == HALT_WORD {
        cpu.halted = true;
    }
    cpu.pc = pc.wrapping_add(4);
    Ok(())
}
