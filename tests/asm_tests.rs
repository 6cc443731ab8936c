//! Unit tests for the line assembler.

use mips_emulator::isa::asm::{assemble_line, AsmError};
use mips_emulator::isa::{Instruction, Op};

fn word(line: &str) -> u32 {
    assemble_line(line)
        .unwrap_or_else(|e| panic!("'{line}' failed: {e}"))
        .unwrap_or_else(|| panic!("'{line}' produced no word"))
}

/// Tests three-register r-format encodings.
#[test]
fn test_assemble_r_format() {
    assert_eq!(word("add t2 t0 t1"), 0x0109_5020);
    assert_eq!(word("sub t2 t0 t1"), 0x0109_5022);
    assert_eq!(word("and s0 s1 s2"), 0x0232_8024);
    assert_eq!(word("or s0 s1 s2"), 0x0232_8025);
    assert_eq!(word("nor s0 s1 s2"), 0x0232_8027);
    assert_eq!(word("slt t3 t1 t0"), 0x0128_582a);
}

/// Tests shift encodings, including hex shift amounts.
#[test]
fn test_assemble_shifts() {
    assert_eq!(word("sll t4 t2 2"), 0x000a_6080);
    assert_eq!(word("srl t4 t2 0x10"), 0x000a_6402);
    assert_eq!(word("sra t4 t2 31"), 0x000a_67c3);
}

/// Tests i-format arithmetic encodings with decimal, hex, and negative
/// immediates.
#[test]
fn test_assemble_i_format() {
    assert_eq!(word("addi t0 zr 5"), 0x2008_0005);
    assert_eq!(word("addi t1 t0 -1"), 0x2109_ffff);
    assert_eq!(word("andi t0 t1 0xff"), 0x3128_00ff);
    assert_eq!(word("ori t0 t1 0xff"), 0x3528_00ff);
    assert_eq!(word("slti t0 t1 10"), 0x2928_000a);
}

/// Tests both memory operand forms.
#[test]
fn test_assemble_memory_operands() {
    assert_eq!(word("lw t0 8 s1"), 0x8e28_0008);
    assert_eq!(word("lw t0, 8(s1)"), 0x8e28_0008);
    assert_eq!(word("sw t2, 12(zr)"), 0xac0a_000c);
    assert_eq!(word("lw ra, (sp)"), 0x8fbf_0000);
}

/// Tests branch and jump encodings.
#[test]
fn test_assemble_control_flow() {
    assert_eq!(word("beq a0 a1 4"), 0x1085_0004);
    assert_eq!(word("bne a0 a1 -2"), 0x1485_fffe);
    assert_eq!(word("jr ra"), 0x03e0_0008);
    assert_eq!(word("j 0x1000"), 0x0800_0400);
    assert_eq!(word("jal 0x1000"), 0x0c00_0400);
}

/// Tests register operand spellings: `$` prefix, numeric, and the `zero`
/// alias.
#[test]
fn test_assemble_register_spellings() {
    let canonical = word("add t2 t0 t1");
    assert_eq!(word("add $t2 $t0 $t1"), canonical);
    assert_eq!(word("add $10 $8 $9"), canonical);
    assert_eq!(word("addi t0 zero 5"), word("addi t0 zr 5"));
}

/// Tests that comments and blank lines assemble to nothing.
#[test]
fn test_assemble_blank_and_comment_lines() {
    assert!(assemble_line("").unwrap().is_none());
    assert!(assemble_line("   # only a comment").unwrap().is_none());
    assert!(assemble_line("// only a comment").unwrap().is_none());
    assert_eq!(
        assemble_line("add t2 t0 t1 // sum").unwrap(),
        Some(0x0109_5020)
    );
}

/// Tests assembler error reporting.
#[test]
fn test_assemble_errors() {
    assert!(matches!(
        assemble_line("frobnicate t0 t1 t2"),
        Err(AsmError::UnknownMnemonic(_))
    ));
    assert!(matches!(
        assemble_line("add t0 t1 t9x"),
        Err(AsmError::UnknownRegister(_))
    ));
    assert!(matches!(
        assemble_line("add t0 t1"),
        Err(AsmError::OperandCount { .. })
    ));
    assert!(matches!(
        assemble_line("addi t0 t1 0x10000"),
        Err(AsmError::BadImmediate(_))
    ));
    assert!(matches!(
        assemble_line("sll t0 t1 32"),
        Err(AsmError::BadImmediate(_))
    ));
}

/// Tests that assembling then decoding reproduces the operation for every
/// mnemonic in the instruction set.
#[test]
fn test_assemble_decode_agreement() {
    let cases = [
        ("add t2 t0 t1", Op::Add),
        ("sub t2 t0 t1", Op::Sub),
        ("and t2 t0 t1", Op::And),
        ("or t2 t0 t1", Op::Or),
        ("nor t2 t0 t1", Op::Nor),
        ("slt t2 t0 t1", Op::Slt),
        ("sll t2 t1 3", Op::Sll),
        ("srl t2 t1 3", Op::Srl),
        ("sra t2 t1 3", Op::Sra),
        ("jr ra", Op::Jr),
        ("addi t0 zr 1", Op::Addi),
        ("andi t0 zr 1", Op::Andi),
        ("ori t0 zr 1", Op::Ori),
        ("slti t0 zr 1", Op::Slti),
        ("lw t0 0(zr)", Op::Lw),
        ("sw t0 0(zr)", Op::Sw),
        ("beq t0 t1 1", Op::Beq),
        ("bne t0 t1 1", Op::Bne),
        ("j 0x1000", Op::J),
        ("jal 0x1000", Op::Jal),
    ];
    for (line, op) in cases {
        let encoded = word(line);
        let decoded = Instruction::decode(encoded)
            .unwrap_or_else(|e| panic!("'{line}' ({encoded:#010x}) failed to decode: {e}"));
        assert_eq!(decoded.op(), op, "'{line}'");
    }
}
