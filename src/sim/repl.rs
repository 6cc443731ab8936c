//! Interactive command surface.
//!
//! A line-oriented session on stdin/stdout. Commands are lowercased,
//! tokenized on whitespace, and anything from a `//` or `#` token onward is
//! ignored:
//!
//! * `run [n]` (or `r`): execute `n` cycles, or to completion if omitted;
//! * `next` (or `n`): execute exactly one cycle;
//! * `show [register|all|pc]`: dump architectural state;
//! * `dump <addr> <len>`: hex and ASCII memory dump;
//! * `pipe`: print the pipeline occupancy block;
//! * `reset`: reinitialize the execution position.
//!
//! State dumps go to stderr so that redirecting stdout keeps a clean
//! prompt transcript, matching the cycle traces.

use std::io::{self, BufRead, Write};
use std::process;

use crate::core::Cpu;
use crate::isa::abi;

/// Session display options, carried from the command line.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionOptions {
    /// Dump all registers after every cycle instead of every
    /// `dump_interval` cycles.
    pub verbose: bool,
    /// Dump the first 16 bytes of memory after every cycle.
    pub verbose_memory: bool,
    /// Cycles between automatic register dumps while running.
    pub dump_interval: u64,
}

/// Runs the interactive session until end of input.
///
/// # Errors
///
/// Returns the underlying I/O error if reading stdin fails.
pub fn run(cpu: &mut Cpu, opts: &SessionOptions) -> io::Result<()> {
    println!("**************************************");
    println!("  MIPS 5-stage pipeline simulator");
    println!();
    prompt()?;

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?.to_lowercase();
        let tokens = tokenize(&line);
        if !tokens.is_empty() {
            dispatch(cpu, &tokens, opts);
        }
        prompt()?;
    }
    Ok(())
}

/// Splits a command line into tokens, dropping everything from a comment
/// token onward.
pub fn tokenize(line: &str) -> Vec<&str> {
    line.split_whitespace()
        .take_while(|t| !t.starts_with("//") && !t.starts_with('#'))
        .collect()
}

fn prompt() -> io::Result<()> {
    print!(">> ");
    io::stdout().flush()
}

fn dispatch(cpu: &mut Cpu, tokens: &[&str], opts: &SessionOptions) {
    match tokens[0] {
        "run" | "r" => match *tokens {
            [_] => run_cycles(cpu, 0, opts),
            [_, n] => match n.parse::<u64>() {
                Ok(n) => run_cycles(cpu, n, opts),
                Err(_) => println!("Usage: run [cycles to run]"),
            },
            _ => println!("Usage: run [cycles to run]"),
        },
        "next" | "n" => run_cycles(cpu, 1, opts),
        "show" => match *tokens {
            [_] => show_registers(cpu, "all"),
            [_, which] => show_registers(cpu, which),
            _ => println!("Usage: show {{ [register name] }}"),
        },
        "dump" => match *tokens {
            [_, addr, len] => match (parse_u32(addr), parse_u32(len)) {
                (Some(addr), Some(len)) => dump_memory(cpu, addr, len),
                _ => println!("Usage: dump [start address] [length]"),
            },
            _ => println!("Usage: dump [start address] [length]"),
        },
        "pipe" => eprint!("{}", cpu.pipeline_trace()),
        "reset" => cpu.reset(),
        other => println!("Unknown command '{other}'"),
    }
}

/// Steps the machine `nr_cycles` cycles (zero means to completion),
/// honoring the periodic register dump. A fatal trap aborts the process
/// after a final state dump; per the error contract, nothing inside the
/// pipeline is recoverable.
pub fn run_cycles(cpu: &mut Cpu, nr_cycles: u64, opts: &SessionOptions) {
    let mut ran = 0;
    loop {
        let busy = match cpu.step() {
            Ok(busy) => busy,
            Err(trap) => {
                eprintln!("\n[!] FATAL TRAP: {trap}");
                show_registers(cpu, "all");
                cpu.stats.print();
                process::exit(1);
            }
        };
        ran += 1;

        if opts.verbose || (opts.dump_interval > 0 && cpu.cycles % opts.dump_interval == 0) {
            show_registers(cpu, "all");
        }
        if opts.verbose_memory {
            dump_memory(cpu, 0, 16);
        }

        if !busy {
            break;
        }
        if nr_cycles != 0 && ran == nr_cycles {
            if nr_cycles > 1 {
                eprintln!("MAXIMUM CYCLES REACHED");
            }
            break;
        }
    }
}

/// Dumps registers to stderr: one named register, `pc`, or `all`.
pub fn show_registers(cpu: &Cpu, which: &str) {
    let (range, include_pc) = match which {
        "all" => (0..32, true),
        "pc" => (0..0, true),
        name => match abi::register_index(name) {
            Some(idx) => (idx..idx + 1, false),
            None => {
                println!("Unknown register '{name}'");
                return;
            }
        },
    };

    for i in range {
        let val = cpu.regs.read(i);
        eprintln!("[{i:02}:{:>2}] {val:#010x}    {val}", abi::REG_NAMES[i]);
    }
    if include_pc {
        eprintln!("[  pc ] {:#010x}", cpu.pc);
    }
}

/// Dumps `len` bytes of memory from `addr` to stderr, four bytes per line
/// with hex and printable-ASCII columns.
pub fn dump_memory(cpu: &Cpu, addr: u32, len: u32) {
    for base in (addr..addr.saturating_add(len)).step_by(4) {
        let mut bytes = [0u8; 4];
        for (i, byte) in bytes.iter_mut().enumerate() {
            match cpu.mem.read_byte(base + i as u32) {
                Ok(b) => *byte = b,
                Err(_) => {
                    eprintln!("{base:#010x}:  <end of memory>");
                    return;
                }
            }
        }
        eprintln!(
            "{base:#010x}:  {:02x} {:02x} {:02x} {:02x}    {} {} {} {}",
            bytes[0],
            bytes[1],
            bytes[2],
            bytes[3],
            printable(bytes[0]),
            printable(bytes[1]),
            printable(bytes[2]),
            printable(bytes[3]),
        );
    }
}

fn printable(byte: u8) -> char {
    if byte.is_ascii_graphic() || byte == b' ' {
        byte as char
    } else {
        '.'
    }
}

fn parse_u32(token: &str) -> Option<u32> {
    if let Some(hex) = token.strip_prefix("0x").or_else(|| token.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16).ok()
    } else {
        token.parse::<u32>().ok()
    }
}
