//! Integration tests for the stall controller: freeze shape, upstream
//! hold, downstream drain, and the Fetch edge case.

use mips_emulator::config::Config;
use mips_emulator::core::pipeline::Stage;
use mips_emulator::core::Cpu;
use mips_emulator::isa::asm;
use mips_emulator::sim::loader;

fn test_cpu() -> Cpu {
    let mut config = Config::default();
    config.general.trace_pipeline = false;
    Cpu::new(&config)
}

fn load(cpu: &mut Cpu, lines: &[&str]) {
    let words: Vec<u32> = lines
        .iter()
        .map(|line| {
            asm::assemble_line(line)
                .unwrap_or_else(|e| panic!("'{line}' failed: {e}"))
                .unwrap_or_else(|| panic!("'{line}' produced no word"))
        })
        .collect();
    loader::load_words(cpu, &words).unwrap();
}

/// Snapshot of a slot's observable trace fields.
fn slot_view(cpu: &Cpu, stage: Stage) -> Option<(u32, u32)> {
    cpu.slots[stage as usize].occupant.map(|o| (o.word, o.pc))
}

/// Tests that an n-cycle stall shows the same instruction and fetch PC in
/// the stalled slot for exactly n+1 consecutive cycle traces, holds
/// everything upstream (including the program counter), and lets the
/// downstream side drain with bubbles.
#[test]
fn test_stall_freezes_stage_and_upstream() {
    let mut cpu = test_cpu();
    load(
        &mut cpu,
        &[
            "addi t0 zr 1",
            "addi t1 zr 2",
            "addi t2 zr 3",
            "addi t3 zr 4",
        ],
    );

    // Fill the front of the pipeline: EX holds the first instruction.
    cpu.run(3).unwrap();
    let ex = slot_view(&cpu, Stage::Ex).expect("EX occupied");
    let id = slot_view(&cpu, Stage::Id).expect("ID occupied");
    let fetch = slot_view(&cpu, Stage::If).expect("IF occupied");
    let pc = cpu.pc;

    cpu.request_stall(Stage::Ex, 2);

    for _ in 0..2 {
        cpu.step().unwrap();
        // The stalled slot and everything upstream are held in place.
        assert_eq!(slot_view(&cpu, Stage::Ex), Some(ex));
        assert_eq!(slot_view(&cpu, Stage::Id), Some(id));
        assert_eq!(slot_view(&cpu, Stage::If), Some(fetch));
        assert_eq!(cpu.pc, pc);
        // Downstream keeps draining: the neighbor received a bubble.
        assert!(cpu.slots[Stage::Mem as usize].is_bubble());
    }

    // The stall is spent; the pipeline moves again.
    cpu.step().unwrap();
    assert_eq!(slot_view(&cpu, Stage::Mem), Some(ex));
    assert_eq!(slot_view(&cpu, Stage::Ex), Some(id));
    assert_eq!(slot_view(&cpu, Stage::Id), Some(fetch));
    assert_ne!(cpu.pc, pc);
}

/// Tests that the stalled instruction's own work, latched before the
/// stall, lands unchanged once the stall ends.
#[test]
fn test_stall_preserves_latched_result() {
    let mut cpu = test_cpu();
    load(&mut cpu, &["addi t0 zr 7", "addi t1 zr 9"]);

    // Let the first addi execute, then freeze it in EX for three cycles.
    cpu.run(3).unwrap();
    cpu.request_stall(Stage::Ex, 3);
    cpu.run(0).unwrap();

    assert_eq!(cpu.regs.read(8), 7);
    assert_eq!(cpu.regs.read(9), 9);
    assert_eq!(cpu.stats.stall_cycles, 3);
}

/// Tests the Fetch edge case: a stalled IF reads no memory and does not
/// advance the program counter, and its downstream neighbor sees bubbles.
#[test]
fn test_stall_on_fetch_holds_pc() {
    let mut cpu = test_cpu();
    load(&mut cpu, &["addi t0 zr 1", "addi t1 zr 2"]);

    cpu.step().unwrap();
    let fetched = slot_view(&cpu, Stage::If).expect("IF occupied");
    let pc = cpu.pc;

    cpu.request_stall(Stage::If, 2);
    for _ in 0..2 {
        cpu.step().unwrap();
        assert_eq!(slot_view(&cpu, Stage::If), Some(fetched));
        assert_eq!(cpu.pc, pc);
        assert!(cpu.slots[Stage::Id as usize].is_bubble());
    }

    // Fetch resumes where it left off.
    cpu.step().unwrap();
    assert_eq!(slot_view(&cpu, Stage::Id), Some(fetched));
    assert_eq!(cpu.pc, pc + 4);
}

/// Tests that stall requests accumulate on the counter.
#[test]
fn test_stall_requests_accumulate() {
    let mut cpu = test_cpu();
    load(&mut cpu, &["addi t0 zr 1"]);
    cpu.run(2).unwrap();

    cpu.request_stall(Stage::Id, 1);
    cpu.request_stall(Stage::Id, 2);
    assert_eq!(cpu.slots[Stage::Id as usize].stalls, 3);

    cpu.run(0).unwrap();
    assert_eq!(cpu.regs.read(8), 1);
    assert_eq!(cpu.stats.stall_cycles, 3);
}

/// Tests the configured memory stall: a load occupies MEM for the extra
/// cycles, the run grows by exactly that many cycles, and the result is
/// still correct.
#[test]
fn test_configured_memory_stall() {
    let run_with_stall = |stall: u32| -> (u64, u32) {
        let mut config = Config::default();
        config.general.trace_pipeline = false;
        config.machine.memory_stall_cycles = stall;
        let mut cpu = Cpu::new(&config);
        cpu.regs.write(9, 0x100);
        let words = [
            asm::assemble_line("sw s1 0(t1)").unwrap().unwrap(),
            asm::assemble_line("lw t0 0(t1)").unwrap().unwrap(),
        ];
        loader::load_words(&mut cpu, &words).unwrap();
        let cycles = cpu.run(0).unwrap();
        (cycles, cpu.regs.read(8))
    };

    let (plain_cycles, plain_val) = run_with_stall(0);
    let (stalled_cycles, stalled_val) = run_with_stall(2);

    assert_eq!(plain_val, 0x1000); // s1 seeds to the initial PC
    assert_eq!(stalled_val, plain_val);
    // Two memory operations, two extra cycles each.
    assert_eq!(stalled_cycles, plain_cycles + 4);
}
