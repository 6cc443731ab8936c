//! Program file loader.
//!
//! Loads a program into memory at the machine's initial program counter and
//! terminates it with the halt word. Two source forms are supported:
//!
//! * hex files: one `0x`-prefixed machine word per line, optional `//` or
//!   `#` line comments;
//! * assembly files (`.s` or `.asm` extension): one mnemonic line per
//!   instruction, translated by the line assembler.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::common::error::Trap;
use crate::core::Cpu;
use crate::isa::asm::{self, AsmError};
use crate::isa::{Instruction, HALT_WORD};

/// Program loading failure.
#[derive(Debug, Error)]
pub enum LoaderError {
    /// The program file could not be read.
    #[error("could not read program file '{path}': {source}")]
    Io {
        /// Path given on the command line.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A line did not parse as a machine word.
    #[error("line {line}: bad machine word '{token}'")]
    BadWord {
        /// 1-based line number.
        line: usize,
        /// Offending token.
        token: String,
    },

    /// A line did not assemble.
    #[error("line {line}: {source}")]
    Assembly {
        /// 1-based line number.
        line: usize,
        /// Underlying assembler error.
        source: AsmError,
    },

    /// The program and its halt word do not fit in memory.
    #[error("program does not fit in memory")]
    OutOfMemory,
}

/// Loads the program file at `path` into the machine, starting at the
/// initial program counter, and appends the halt word.
///
/// # Returns
///
/// The number of instructions loaded, excluding the halt word.
///
/// # Errors
///
/// Returns a [`LoaderError`] when the file cannot be read, a line does not
/// parse or assemble, or the program overflows memory.
pub fn load_program(cpu: &mut Cpu, path: &str, verbose: bool) -> Result<usize, LoaderError> {
    let text = fs::read_to_string(path).map_err(|source| LoaderError::Io {
        path: path.to_string(),
        source,
    })?;

    let assembly = matches!(
        Path::new(path).extension().and_then(|e| e.to_str()),
        Some("s") | Some("asm")
    );
    let words = if assembly {
        assemble_program(&text)?
    } else {
        parse_program(&text)?
    };

    load_words(cpu, &words)?;

    if verbose {
        for (i, &word) in words.iter().enumerate() {
            let name = Instruction::decode(word).map_or("??", |inst| inst.mnemonic());
            println!("  {i:3}: {word:#010x}  {name}");
        }
        println!();
    }
    Ok(words.len())
}

/// Parses hex program text: one machine word per line, `//` or `#` line
/// comments, blank lines ignored.
///
/// # Errors
///
/// Returns [`LoaderError::BadWord`] for a line whose first token is not a
/// machine word.
pub fn parse_program(text: &str) -> Result<Vec<u32>, LoaderError> {
    let mut words = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let Some(token) = strip_comment(line).split_whitespace().next() else {
            continue;
        };
        let word = parse_word(token).ok_or_else(|| LoaderError::BadWord {
            line: idx + 1,
            token: token.to_string(),
        })?;
        words.push(word);
    }
    Ok(words)
}

/// Assembles program text line by line.
///
/// # Errors
///
/// Returns [`LoaderError::Assembly`] carrying the failing line number.
pub fn assemble_program(text: &str) -> Result<Vec<u32>, LoaderError> {
    let mut words = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        match asm::assemble_line(line) {
            Ok(Some(word)) => words.push(word),
            Ok(None) => {}
            Err(source) => {
                return Err(LoaderError::Assembly {
                    line: idx + 1,
                    source,
                })
            }
        }
    }
    Ok(words)
}

/// Writes `words` to memory at the initial program counter followed by the
/// halt word. The execution position is reset so the program starts clean;
/// registers and the rest of memory are left alone.
///
/// # Errors
///
/// Returns [`LoaderError::OutOfMemory`] when the program overflows memory.
pub fn load_words(cpu: &mut Cpu, words: &[u32]) -> Result<(), LoaderError> {
    cpu.reset();
    let mut addr = cpu.pc;
    for &word in words.iter().chain(std::iter::once(&HALT_WORD)) {
        cpu.mem
            .write_word(addr, word)
            .map_err(|_: Trap| LoaderError::OutOfMemory)?;
        addr = addr.wrapping_add(4);
    }
    Ok(())
}

fn strip_comment(line: &str) -> &str {
    let line = line.split("//").next().unwrap_or("");
    line.split('#').next().unwrap_or("")
}

fn parse_word(token: &str) -> Option<u32> {
    if let Some(hex) = token.strip_prefix("0x").or_else(|| token.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16).ok()
    } else {
        token.parse::<u32>().ok()
    }
}
