//! Integration tests for the program loader.

use std::fs;

use mips_emulator::common::data::AccessType;
use mips_emulator::config::Config;
use mips_emulator::core::Cpu;
use mips_emulator::isa::HALT_WORD;
use mips_emulator::sim::loader::{self, LoaderError};

fn test_cpu() -> Cpu {
    let mut config = Config::default();
    config.general.trace_pipeline = false;
    Cpu::new(&config)
}

fn read_word(cpu: &Cpu, addr: u32) -> u32 {
    cpu.mem.read_word(addr, AccessType::Read).unwrap()
}

/// Tests hex parsing with comments, blank lines, and both comment markers.
#[test]
fn test_parse_program_strips_comments() {
    let text = "\
0x8c090008
0xac090020\t// sw t1, zero + 32
0x8c080000  # trailing hash comment

// full-line comment
# another
0x01095020
";
    let words = loader::parse_program(text).unwrap();
    assert_eq!(words, vec![0x8c09_0008, 0xac09_0020, 0x8c08_0000, 0x0109_5020]);
}

/// Tests that a malformed word is reported with its line number.
#[test]
fn test_parse_program_bad_word() {
    let err = loader::parse_program("0x8c090008\nnot-a-word\n").unwrap_err();
    match err {
        LoaderError::BadWord { line, token } => {
            assert_eq!(line, 2);
            assert_eq!(token, "not-a-word");
        }
        other => panic!("unexpected error: {other}"),
    }
}

/// Tests that loaded words land at the initial PC, big-endian, with the
/// halt word appended right behind the program.
#[test]
fn test_load_words_places_program_and_sentinel() {
    let mut cpu = test_cpu();
    loader::load_words(&mut cpu, &[0x0109_5020, 0x2008_0005]).unwrap();

    assert_eq!(read_word(&cpu, 0x1000), 0x0109_5020);
    assert_eq!(read_word(&cpu, 0x1004), 0x2008_0005);
    assert_eq!(read_word(&cpu, 0x1008), HALT_WORD);
    // Big-endian byte order in memory.
    assert_eq!(cpu.mem.read_byte(0x1000).unwrap(), 0x01);
    assert_eq!(cpu.mem.read_byte(0x1003).unwrap(), 0x20);
    assert_eq!(cpu.pc, 0x1000);
}

/// Tests that an empty program still gets the halt word, so a run
/// terminates.
#[test]
fn test_load_words_empty_program() {
    let mut cpu = test_cpu();
    loader::load_words(&mut cpu, &[]).unwrap();
    assert_eq!(read_word(&cpu, 0x1000), HALT_WORD);
    cpu.run(0).unwrap();
    assert!(cpu.drained());
}

/// Tests that assembling a program reports the failing line.
#[test]
fn test_assemble_program_error_line() {
    let err = loader::assemble_program("addi t0 zr 1\nbogus t0\n").unwrap_err();
    match err {
        LoaderError::Assembly { line, .. } => assert_eq!(line, 2),
        other => panic!("unexpected error: {other}"),
    }
}

/// Tests loading a hex program file from disk.
#[test]
fn test_load_program_hex_file() {
    let path = std::env::temp_dir().join("pipesim-loader-test-hex");
    fs::write(&path, "0x20080005 // addi t0, zr, 5\n0x20090003\n").unwrap();

    let mut cpu = test_cpu();
    let count = loader::load_program(&mut cpu, path.to_str().unwrap(), false).unwrap();
    fs::remove_file(&path).ok();

    assert_eq!(count, 2);
    cpu.run(0).unwrap();
    assert_eq!(cpu.regs.read(8), 5);
    assert_eq!(cpu.regs.read(9), 3);
}

/// Tests that a `.s` file goes through the assembler.
#[test]
fn test_load_program_assembly_file() {
    let path = std::env::temp_dir().join("pipesim-loader-test.s");
    fs::write(&path, "# demo\naddi t0 zr 5\naddi t1, zr, 2\n").unwrap();

    let mut cpu = test_cpu();
    let count = loader::load_program(&mut cpu, path.to_str().unwrap(), false).unwrap();
    fs::remove_file(&path).ok();

    assert_eq!(count, 2);
    cpu.run(0).unwrap();
    assert_eq!(cpu.regs.read(8), 5);
    assert_eq!(cpu.regs.read(9), 2);
}

/// Tests that a missing file is an I/O loader error.
#[test]
fn test_load_program_missing_file() {
    let mut cpu = test_cpu();
    let err = loader::load_program(&mut cpu, "/no/such/file", false).unwrap_err();
    assert!(matches!(err, LoaderError::Io { .. }));
}
