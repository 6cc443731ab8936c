//! Simulation statistics collection and reporting.
//!
//! Tracks cycle counts, retired instruction counts by class, and stall
//! cycles during simulation execution. Counters are cumulative for the
//! process lifetime; `reset` clears the execution position but not these.

use serde::Serialize;

/// Simulation statistics counters.
#[derive(Debug, Default, Serialize)]
pub struct SimStats {
    /// Total cycles executed.
    pub cycles: u64,
    /// Instructions retired at writeback.
    pub instructions_retired: u64,

    /// Retired loads.
    pub inst_load: u64,
    /// Retired stores.
    pub inst_store: u64,
    /// Retired branches and jumps.
    pub inst_branch: u64,
    /// Retired ALU instructions.
    pub inst_alu: u64,

    /// Branches and jumps that redirected the program counter.
    pub branches_taken: u64,
    /// Stage-cycles lost to stalls.
    pub stall_cycles: u64,
}

impl SimStats {
    /// Prints a human-readable statistics report to stdout.
    pub fn print(&self) {
        println!("Simulation Statistics");
        println!("---------------------");
        println!("Cycles:               {}", self.cycles);
        println!("Instructions retired: {}", self.instructions_retired);
        println!("  ALU:                {}", self.inst_alu);
        println!("  Load:               {}", self.inst_load);
        println!("  Store:              {}", self.inst_store);
        println!("  Branch/Jump:        {}", self.inst_branch);
        println!("Branches taken:       {}", self.branches_taken);
        println!("Stall cycles:         {}", self.stall_cycles);
        if self.instructions_retired > 0 {
            let cpi = self.cycles as f64 / self.instructions_retired as f64;
            println!("CPI:                  {cpi:.2}");
        }
    }

    /// Serializes the counters as pretty-printed JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}
