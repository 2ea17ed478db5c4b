use thiserror::Error;

use crate::constants::{Address, INSTRUCTION_SIZE};

/// Represents errors related to memory manipulations
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MemoryError {
    /// The given address was invalid
    #[error("invalid address {0}")]
    InvalidAddress(Address),

    /// The program does not fit in memory
    #[error("program of {size} bytes does not fit in {capacity} bytes of memory")]
    ProgramTooLarge { size: usize, capacity: usize },
}

/// Flat, byte-addressed memory of the machine
#[derive(Clone, PartialEq, Eq)]
pub struct Memory {
    inner: Box<[u8]>,
}

impl std::fmt::Debug for Memory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Memory {{ size: {}, [...] }}", self.inner.len())
    }
}

impl Memory {
    /// Create a zeroed memory of `size` bytes
    #[must_use]
    pub fn new(size: usize) -> Self {
        Self {
            inner: vec![0; size].into_boxed_slice(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.inner
    }

    fn range(&self, address: Address, length: usize) -> Result<std::ops::Range<usize>, MemoryError> {
        let start = usize::try_from(address).map_err(|_e| MemoryError::InvalidAddress(address))?;
        let end = start
            .checked_add(length)
            .filter(|end| *end <= self.inner.len())
            .ok_or(MemoryError::InvalidAddress(address))?;
        Ok(start..end)
    }

    /// Get a byte at an address
    ///
    /// # Errors
    ///
    /// It fails if the address is out of bounds.
    pub fn get(&self, address: Address) -> Result<u8, MemoryError> {
        let [byte] = self.read(address)?;
        Ok(byte)
    }

    /// Read `N` consecutive bytes starting at an address
    ///
    /// # Errors
    ///
    /// It fails if any of the bytes is out of bounds.
    pub fn read<const N: usize>(&self, address: Address) -> Result<[u8; N], MemoryError> {
        let range = self.range(address, N)?;
        let mut bytes = [0; N];
        bytes.copy_from_slice(&self.inner[range]);
        Ok(bytes)
    }

    /// Write bytes starting at an address
    ///
    /// # Errors
    ///
    /// It fails if any of the bytes is out of bounds. Nothing is written in
    /// that case.
    pub fn write(&mut self, address: Address, bytes: &[u8]) -> Result<(), MemoryError> {
        let range = self.range(address, bytes.len())?;
        self.inner[range].copy_from_slice(bytes);
        Ok(())
    }

    /// Read the instruction at an address, completing it with zeroes if it
    /// goes past the end of memory
    ///
    /// # Errors
    ///
    /// It fails if the address itself is past the end of memory.
    pub fn read_padded(&self, address: Address) -> Result<[u8; INSTRUCTION_SIZE], MemoryError> {
        let start = usize::try_from(address)
            .ok()
            .filter(|start| *start <= self.inner.len())
            .ok_or(MemoryError::InvalidAddress(address))?;

        let available = &self.inner[start..];
        let length = available.len().min(INSTRUCTION_SIZE);
        let mut bytes = [0; INSTRUCTION_SIZE];
        bytes[..length].copy_from_slice(&available[..length]);
        Ok(bytes)
    }

    /// Copy a program at the start of memory
    ///
    /// # Errors
    ///
    /// It fails if the program is bigger than the memory.
    pub fn load(&mut self, program: &[u8]) -> Result<(), MemoryError> {
        if program.len() > self.inner.len() {
            return Err(MemoryError::ProgramTooLarge {
                size: program.len(),
                capacity: self.inner.len(),
            });
        }

        self.inner[..program.len()].copy_from_slice(program);
        Ok(())
    }
}
