//! Configuration loading and parsing.

use serde::Deserialize;

const DEFAULT_MEMORY_SIZE: usize = 1 << 20;
const DEFAULT_INITIAL_PC: u32 = 0x1000;
const DEFAULT_INITIAL_SP: u32 = 0x8000;
const DEFAULT_DUMP_INTERVAL: u64 = 10;

/// Top-level simulator configuration.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Trace and display settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Simulated machine parameters.
    #[serde(default)]
    pub machine: MachineConfig,
}

/// Trace and display settings.
#[derive(Debug, Deserialize)]
pub struct GeneralConfig {
    /// Print the pipeline trace block after every cycle.
    #[serde(default = "default_trace_pipeline")]
    pub trace_pipeline: bool,

    /// Cycles between automatic register dumps while running.
    #[serde(default = "default_dump_interval")]
    pub dump_interval: u64,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            trace_pipeline: default_trace_pipeline(),
            dump_interval: default_dump_interval(),
        }
    }
}

/// Simulated machine parameters. Addresses and sizes are hex strings in the
/// TOML file; the `*_val` accessors parse them.
#[derive(Debug, Deserialize)]
pub struct MachineConfig {
    /// Memory size in bytes.
    #[serde(default = "default_memory_size")]
    pub memory_size: String,

    /// Program counter value at startup and after reset; programs load here.
    #[serde(default = "default_initial_pc")]
    pub initial_pc: String,

    /// Initial stack pointer seed.
    #[serde(default = "default_initial_sp")]
    pub initial_sp: String,

    /// Extra cycles a load or store occupies the Memory stage.
    #[serde(default)]
    pub memory_stall_cycles: u32,
}

impl MachineConfig {
    /// Memory size in bytes.
    pub fn memory_size_val(&self) -> usize {
        parse_hex(&self.memory_size, DEFAULT_MEMORY_SIZE as u32) as usize
    }

    /// Initial program counter.
    pub fn initial_pc_val(&self) -> u32 {
        parse_hex(&self.initial_pc, DEFAULT_INITIAL_PC)
    }

    /// Initial stack pointer.
    pub fn initial_sp_val(&self) -> u32 {
        parse_hex(&self.initial_sp, DEFAULT_INITIAL_SP)
    }
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            memory_size: default_memory_size(),
            initial_pc: default_initial_pc(),
            initial_sp: default_initial_sp(),
            memory_stall_cycles: 0,
        }
    }
}

fn parse_hex(s: &str, default: u32) -> u32 {
    let s = s.trim_start_matches("0x");
    u32::from_str_radix(s, 16).unwrap_or(default)
}

fn default_trace_pipeline() -> bool {
    true
}

fn default_dump_interval() -> u64 {
    DEFAULT_DUMP_INTERVAL
}

fn default_memory_size() -> String {
    format!("{DEFAULT_MEMORY_SIZE:#x}")
}

fn default_initial_pc() -> String {
    format!("{DEFAULT_INITIAL_PC:#x}")
}

fn default_initial_sp() -> String {
    format!("{DEFAULT_INITIAL_SP:#x}")
}
