//! Cycle driver and stall controller.
//!
//! One call to [`Cpu::step`] simulates one clock cycle:
//!
//! 1. Slot occupancy advances from the tail of the pipeline toward the
//!    head. The scan breaks at the first frozen (stalled) slot: that slot
//!    keeps its occupant, every slot upstream holds its own content, and
//!    the slot just downstream receives a bubble.
//! 2. Stage logic runs in strict reverse pipeline order, WB first and IF
//!    last. The order is load-bearing: each stage must consume the latch
//!    its producer wrote in the *previous* cycle, before the producer
//!    overwrites it, and writeback must land before Execute reads the
//!    register file. The walk stops at the first frozen stage it meets,
//!    since that stage's work is already latched and everything upstream
//!    is held in place.
//! 3. The run is finished once every slot is a bubble that has previously
//!    held a real instruction, i.e. the pipeline has fully drained behind
//!    the halt word.

use std::fmt::Write as _;

use crate::common::error::Trap;
use crate::config::Config;
use crate::core::arch::{Gpr, Memory};
use crate::core::pipeline::{
    ExMem, IdEx, IfId, MemWb, Stage, StageSlot, NR_STAGES, STAGE_NAMES,
};
use crate::core::stages::{decode, execute, fetch, memory_access, write_back};
use crate::isa::abi;
use crate::stats::SimStats;

/// Values seeded into `$s0..$s7` of every new machine; `$s1` is patched to
/// the initial program counter. Together with the demo memory image they
/// give the sample programs something to chew on.
const SAVED_REG_SEED: [u32; 8] = [0x10, 0, 0x20, 2, 0xbada_cafe, 0xcdcd_cdcd, 0xffff_ffff, 7];

/// The simulated machine: architectural state, pipeline registers, and the
/// cycle driver that advances them.
#[derive(Debug)]
pub struct Cpu {
    /// General-purpose register file.
    pub regs: Gpr,
    /// Program counter.
    pub pc: u32,
    /// Flat byte-addressable memory.
    pub mem: Memory,

    /// One slot per pipeline position, head first.
    pub slots: [StageSlot; NR_STAGES],
    /// IF-ID latch.
    pub if_id: IfId,
    /// ID-EX latch.
    pub id_ex: IdEx,
    /// EX-MEM latch.
    pub ex_mem: ExMem,
    /// MEM-WB latch.
    pub mem_wb: MemWb,

    /// Cycles executed since the last reset.
    pub cycles: u64,
    /// The halt word has been fetched; no further fetches occur.
    pub halted: bool,
    /// Cumulative statistics (not cleared by reset).
    pub stats: SimStats,
    /// Print the pipeline trace after every cycle.
    pub trace: bool,

    /// Extra cycles a load or store occupies the Memory stage.
    pub(crate) memory_stall: u32,
    initial_pc: u32,
}

impl Cpu {
    /// Creates a machine from the configuration.
    pub fn new(config: &Config) -> Self {
        let initial_pc = config.machine.initial_pc_val();
        let mut regs = Gpr::new();
        for (i, &val) in SAVED_REG_SEED.iter().enumerate() {
            regs.write(abi::REG_S0 + i, val);
        }
        regs.write(abi::REG_S0 + 1, initial_pc);
        regs.write(abi::REG_SP, config.machine.initial_sp_val());

        Self {
            regs,
            pc: initial_pc,
            mem: Memory::new(config.machine.memory_size_val()),
            slots: [StageSlot::default(); NR_STAGES],
            if_id: IfId::default(),
            id_ex: IdEx::default(),
            ex_mem: ExMem::default(),
            mem_wb: MemWb::default(),
            cycles: 0,
            halted: false,
            stats: SimStats::default(),
            trace: config.general.trace_pipeline,
            memory_stall: config.machine.memory_stall_cycles,
            initial_pc,
        }
    }

    /// Whether cycle traces are printed, honoring the `always-trace`
    /// build feature.
    pub fn tracing(&self) -> bool {
        cfg!(feature = "always-trace") || self.trace
    }

    /// Holds `stage` on its current occupant for `cycles` additional
    /// cycles. While the stall lasts, the stage accepts no new instruction,
    /// every stage upstream of it is held as well, and downstream stages
    /// keep draining. A stalled Fetch also suppresses the memory read and
    /// the program-counter increment.
    pub fn request_stall(&mut self, stage: Stage, cycles: u32) {
        self.slots[stage as usize].stalls += cycles;
    }

    /// Simulates one clock cycle.
    ///
    /// # Returns
    ///
    /// `Ok(true)` while the pipeline still holds work, `Ok(false)` once it
    /// has fully drained.
    ///
    /// # Errors
    ///
    /// Propagates the fatal [`Trap`] of a failing stage; the machine state
    /// is left as-is for post-mortem inspection.
    pub fn step(&mut self) -> Result<bool, Trap> {
        let frozen: [bool; NR_STAGES] = std::array::from_fn(|i| self.slots[i].stalls > 0);

        // Advance occupancy tail-to-head. A frozen slot keeps its occupant
        // and breaks the shift chain, holding everything upstream; its
        // downstream neighbor receives a bubble instead of a handoff.
        for i in (1..NR_STAGES).rev() {
            if frozen[i] {
                break;
            }
            self.slots[i].occupant = if frozen[i - 1] {
                None
            } else {
                self.slots[i - 1].occupant
            };
            if self.slots[i].occupant.is_some() {
                self.slots[i].visited = true;
            }
        }

        // Each stall counter burns down exactly once per cycle.
        for slot in &mut self.slots {
            if slot.stalls > 0 {
                slot.stalls -= 1;
                self.stats.stall_cycles += 1;
            }
        }

        self.run_stages(&frozen)?;

        self.cycles += 1;
        self.stats.cycles += 1;
        if self.tracing() {
            eprint!("{}", self.pipeline_trace());
        }

        Ok(!self.drained())
    }

    /// Stage logic in reverse pipeline order, stopping at the first frozen
    /// stage: its work is already latched, and every stage upstream of it
    /// holds this cycle.
    fn run_stages(&mut self, frozen: &[bool; NR_STAGES]) -> Result<(), Trap> {
        if frozen[Stage::Wb as usize] {
            return Ok(());
        }
        write_back::wb_stage(self)?;
        if frozen[Stage::Mem as usize] {
            return Ok(());
        }
        memory_access::mem_stage(self)?;
        if frozen[Stage::Ex as usize] {
            return Ok(());
        }
        execute::execute_stage(self)?;
        if frozen[Stage::Id as usize] {
            return Ok(());
        }
        decode::decode_stage(self)?;
        if frozen[Stage::If as usize] {
            return Ok(());
        }
        fetch::fetch_stage(self)
    }

    /// Runs `nr_cycles` cycles, or to completion when `nr_cycles` is zero.
    ///
    /// # Returns
    ///
    /// The number of cycles executed.
    ///
    /// # Errors
    ///
    /// Propagates the first fatal [`Trap`].
    pub fn run(&mut self, nr_cycles: u64) -> Result<u64, Trap> {
        let mut ran = 0;
        while nr_cycles == 0 || ran < nr_cycles {
            ran += 1;
            if !self.step()? {
                break;
            }
        }
        Ok(ran)
    }

    /// Whether every pipeline slot has drained: the halt word has passed
    /// through and nothing real remains in flight.
    pub fn drained(&self) -> bool {
        self.slots.iter().all(StageSlot::drained)
    }

    /// Reinitializes the execution position: program counter, cycle
    /// counter, pipeline slots and latches, and the halt flag. Registers
    /// and memory persist, so architectural state accumulates across runs
    /// until a new process or program load.
    pub fn reset(&mut self) {
        self.pc = self.initial_pc;
        self.cycles = 0;
        self.halted = false;
        self.slots = [StageSlot::default(); NR_STAGES];
        self.if_id = IfId::default();
        self.id_ex = IdEx::default();
        self.ex_mem = ExMem::default();
        self.mem_wb = MemWb::default();
    }

    /// Formats the per-cycle diagnostic block: the cycle number and, for
    /// every stage, the raw instruction word, fetch PC, and remaining stall
    /// count. Bubbles print as all zeroes.
    pub fn pipeline_trace(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "\n### {} ###", self.cycles);
        for (name, slot) in STAGE_NAMES.iter().zip(&self.slots) {
            let (word, pc) = match slot.occupant {
                Some(occ) => (occ.word, occ.pc),
                None => (0, 0),
            };
            let _ = writeln!(out, "{name:>3}: {word:#010x}  {pc:#010x}  {}", slot.stalls);
        }
        let _ = writeln!(out);
        out
    }
}
