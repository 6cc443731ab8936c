//! Flat byte-addressable memory.
//!
//! Word accesses are 4-byte big-endian. Every access is bounds-checked and
//! a faulting access raises the fatal trap matching its access type.

use crate::common::data::AccessType;
use crate::common::error::Trap;

/// Bytes pre-loaded at address zero of every new machine, handy for the
/// sample load/store programs and memory dumps.
const DEMO_IMAGE: &[u8] = &[
    0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, //
    0xde, 0xad, 0xbe, 0xef, 0x00, 0x00, 0x00, 0x00, //
    b'h', b'e', b'l', b'l', b'o', b' ', b'w', b'o', //
    b'r', b'l', b'd', b'!', b'!', 0x00, 0x00, 0x00, //
    b'a', b'w', b'e', b's', b'o', b'm', b'e', b' ', //
    b'c', b'o', b'm', b'p', b'u', b't', b'e', b'r', //
    b' ', b'a', b'r', b'c', b'h', b'i', b't', b'e', //
    b'c', b't', b'u', b'r', b'e', b'!', 0x00, 0x00,
];

/// Flat memory of the simulated machine.
#[derive(Debug, Clone)]
pub struct Memory {
    bytes: Vec<u8>,
}

impl Memory {
    /// Creates a zeroed memory of `size` bytes with the demo image copied
    /// to address zero.
    pub fn new(size: usize) -> Self {
        let mut bytes = vec![0; size];
        let n = DEMO_IMAGE.len().min(size);
        bytes[..n].copy_from_slice(&DEMO_IMAGE[..n]);
        Self { bytes }
    }

    /// Size of the memory in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the memory has zero size.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Reads a big-endian 32-bit word at `addr`.
    ///
    /// # Errors
    ///
    /// Returns the out-of-bounds trap matching `access` when any byte of
    /// the word lies past the end of memory.
    pub fn read_word(&self, addr: u32, access: AccessType) -> Result<u32, Trap> {
        let lo = addr as usize;
        let hi = lo.checked_add(4).filter(|&hi| hi <= self.bytes.len());
        let Some(hi) = hi else {
            return Err(out_of_bounds(addr, access));
        };
        let mut word = 0u32;
        for &byte in &self.bytes[lo..hi] {
            word = (word << 8) | u32::from(byte);
        }
        Ok(word)
    }

    /// Writes a big-endian 32-bit word at `addr`.
    ///
    /// # Errors
    ///
    /// Returns [`Trap::StoreOutOfBounds`] when any byte of the word lies
    /// past the end of memory.
    pub fn write_word(&mut self, addr: u32, val: u32) -> Result<(), Trap> {
        let lo = addr as usize;
        let hi = lo.checked_add(4).filter(|&hi| hi <= self.bytes.len());
        let Some(hi) = hi else {
            return Err(Trap::StoreOutOfBounds(addr));
        };
        self.bytes[lo..hi].copy_from_slice(&val.to_be_bytes());
        Ok(())
    }

    /// Reads a single byte at `addr`.
    ///
    /// # Errors
    ///
    /// Returns [`Trap::LoadOutOfBounds`] past the end of memory.
    pub fn read_byte(&self, addr: u32) -> Result<u8, Trap> {
        self.bytes
            .get(addr as usize)
            .copied()
            .ok_or(Trap::LoadOutOfBounds(addr))
    }
}

fn out_of_bounds(addr: u32, access: AccessType) -> Trap {
    match access {
        AccessType::Fetch => Trap::FetchOutOfBounds(addr),
        AccessType::Read => Trap::LoadOutOfBounds(addr),
        AccessType::Write => Trap::StoreOutOfBounds(addr),
    }
}
