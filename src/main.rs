//! MIPS Pipeline Simulator CLI.
//!
//! The main executable for the simulator. It handles command-line argument
//! parsing, machine initialization, program loading, and either a batch run
//! or the interactive session.
//!
//! # Usage
//!
//! The simulator runs in two modes:
//! 1. **Interactive Mode** (default): loads the program and accepts
//!    `run`/`next`/`show`/`dump`/`pipe`/`reset` commands on stdin.
//! 2. **Batch Mode** (`--run`): executes to completion (or `--max-cycles`)
//!    and prints statistics.
//!
//! `--assemble <file>` instead translates an assembly file to hex words on
//! stdout and exits.

use clap::Parser;
use std::{fs, process};

use mips_emulator::config::Config;
use mips_emulator::core::Cpu;
use mips_emulator::sim::loader;
use mips_emulator::sim::repl::{self, SessionOptions};
use mips_emulator::stats::SimStats;

/// Command-line arguments for the MIPS pipeline simulator.
#[derive(Parser, Debug)]
#[command(author, version, about = "MIPS 5-stage pipeline simulator")]
struct Args {
    /// Program file: hex machine words, or assembly with a .s/.asm extension.
    #[arg(default_value = "testcases/program-r")]
    file: String,

    /// TOML configuration file; built-in defaults apply when omitted.
    #[arg(long)]
    config: Option<String>,

    /// Run to completion without the interactive session.
    #[arg(short = 'r', long)]
    run: bool,

    /// Stop a batch run after this many cycles (0 = unlimited).
    #[arg(short = 'c', long, default_value_t = 0)]
    max_cycles: u64,

    /// Echo loaded instructions and dump registers every cycle.
    #[arg(short, long)]
    verbose: bool,

    /// Dump the first memory bytes every cycle.
    #[arg(short = 'm', long)]
    verbose_memory: bool,

    /// Print statistics as JSON after a batch run.
    #[arg(long)]
    json_stats: bool,

    /// Translate an assembly file to hex machine words and exit.
    #[arg(long)]
    assemble: Option<String>,
}

fn main() {
    let args = Args::parse();

    if let Some(path) = args.assemble {
        assemble_to_stdout(&path);
        return;
    }

    let config = match args.config {
        Some(ref path) => {
            let content = fs::read_to_string(path).unwrap_or_else(|e| {
                eprintln!("[!] Could not read config '{path}': {e}");
                process::exit(1);
            });
            toml::from_str(&content).unwrap_or_else(|e| {
                eprintln!("[!] Could not parse config '{path}': {e}");
                process::exit(1);
            })
        }
        None => Config::default(),
    };

    let mut cpu = Cpu::new(&config);

    println!("- Loading {}...", args.file);
    match loader::load_program(&mut cpu, &args.file, args.verbose) {
        Ok(count) => {
            println!(
                "- {count} instruction{} loaded",
                if count == 1 { "" } else { "s" }
            );
            println!();
        }
        Err(e) => {
            eprintln!("[!] {e}");
            process::exit(1);
        }
    }

    let opts = SessionOptions {
        verbose: args.verbose,
        verbose_memory: args.verbose_memory,
        dump_interval: config.general.dump_interval,
    };

    if args.run {
        repl::run_cycles(&mut cpu, args.max_cycles, &opts);
        repl::show_registers(&cpu, "all");
        print_stats(&cpu.stats, args.json_stats);
        return;
    }

    if let Err(e) = repl::run(&mut cpu, &opts) {
        eprintln!("[!] I/O error: {e}");
        process::exit(1);
    }
    print_stats(&cpu.stats, args.json_stats);
}

fn print_stats(stats: &SimStats, json: bool) {
    if json {
        println!("{}", stats.to_json());
    } else {
        stats.print();
    }
}

fn assemble_to_stdout(path: &str) {
    let text = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("[!] Could not read '{path}': {e}");
        process::exit(1);
    });
    match loader::assemble_program(&text) {
        Ok(words) => {
            for word in words {
                println!("{word:#010x}");
            }
        }
        Err(e) => {
            eprintln!("[!] {e}");
            process::exit(1);
        }
    }
}
