//! Register naming conventions.
//!
//! Conventional MIPS register names, with `$zero` shortened to `zr`.
//! Note the naming is convention only: the simulator does not hardwire
//! register 0 to zero, and writes to it are visible.

/// Conventional names for the 32 general-purpose registers.
pub const REG_NAMES: [&str; 32] = [
    "zr", "at", "v0", "v1", "a0", "a1", "a2", "a3", //
    "t0", "t1", "t2", "t3", "t4", "t5", "t6", "t7", //
    "s0", "s1", "s2", "s3", "s4", "s5", "s6", "s7", //
    "t8", "t9", "k0", "k1", "gp", "sp", "fp", "ra",
];

/// First saved register ($s0).
pub const REG_S0: usize = 16;
/// Stack pointer ($sp).
pub const REG_SP: usize = 29;
/// Return address register ($ra), the link target of `jal`.
pub const REG_RA: usize = 31;

/// Resolves a register operand to its index.
///
/// Accepts conventional names (`t0`, `sp`, ...), the `zero` alias for `zr`,
/// a numeric index, and an optional `$` prefix on any of those.
///
/// # Returns
///
/// The register index, or `None` if the name is not recognized.
pub fn register_index(name: &str) -> Option<usize> {
    let name = name.strip_prefix('$').unwrap_or(name);
    if let Ok(n) = name.parse::<usize>() {
        return (n < 32).then_some(n);
    }
    if name == "zero" {
        return Some(0);
    }
    REG_NAMES.iter().position(|&r| r == name)
}
