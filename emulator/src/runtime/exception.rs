use thiserror::Error;

use crate::codec::UnknownOpcode;
use crate::constants::Address;

use super::memory::MemoryError;
use super::registers::RegisterError;

/// Unrecoverable conditions which put the machine in the faulted state
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Exception {
    #[error("program counter {pc} has exceeded the boundaries of memory ({memory_size} bytes)")]
    ProgramCounterOutOfBounds { pc: Address, memory_size: usize },

    #[error("invalid instruction ({0})")]
    InvalidInstruction(#[from] UnknownOpcode),

    #[error("invalid memory access ({0})")]
    InvalidMemoryAccess(#[from] MemoryError),

    #[error("{0}")]
    InvalidRegister(#[from] RegisterError),
}
