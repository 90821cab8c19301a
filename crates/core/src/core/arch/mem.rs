//! Instruction and data memories.
//!
//! Instruction memory is a dense array of 512 words; entries the assembler
//! did not populate stay zero, and the zero word is the canonical NOP. Data
//! memory is a sparse word-addressed map: reads of never-written addresses
//! return 0 and are reported to the caller as uninitialized.

use std::collections::BTreeMap;

use crate::common::constants::{DMEM_ADDR_MASK, IMEM_WORDS, NOP_WORD};

/// Word-addressed instruction memory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InstrMemory {
    words: Vec<u16>,
}

impl Default for InstrMemory {
    fn default() -> Self {
        Self {
            words: vec![NOP_WORD; IMEM_WORDS],
        }
    }
}

impl InstrMemory {
    /// Creates an all-zero (all-NOP) instruction memory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes one encoded instruction at a word address.
    ///
    /// Out-of-range addresses are ignored; the assembler bounds programs to
    /// the memory size before loading.
    pub fn store(&mut self, addr: u16, word: u16) {
        if let Some(slot) = self.words.get_mut(addr as usize) {
            *slot = word;
        }
    }

    /// Fetches the word at an address; out-of-range reads return the NOP word.
    #[inline]
    pub fn fetch(&self, addr: u16) -> u16 {
        self.words.get(addr as usize).copied().unwrap_or(NOP_WORD)
    }
}

/// Sparse word-addressed data memory (9-bit address space).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DataMemory {
    words: BTreeMap<u16, u16>,
}

impl DataMemory {
    /// Creates an empty data memory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes a word. The address is reduced to the 9-bit space.
    pub fn write(&mut self, addr: u16, val: u16) {
        let _ = self.words.insert(addr & DMEM_ADDR_MASK, val);
    }

    /// Reads a word, returning `(value, initialized)`.
    ///
    /// Never-written addresses read as 0 with `initialized == false`; the
    /// memory stage turns that into a non-fatal warning on the snapshot.
    pub fn read(&self, addr: u16) -> (u16, bool) {
        match self.words.get(&(addr & DMEM_ADDR_MASK)) {
            Some(&val) => (val, true),
            None => (0, false),
        }
    }

    /// Iterates over written addresses in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (u16, u16)> + '_ {
        self.words.iter().map(|(&a, &v)| (a, v))
    }
}
