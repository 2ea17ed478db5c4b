//! Binary layout of Dioxide instructions.
//!
//! Every instruction is exactly [`INSTRUCTION_SIZE`] bytes long:
//!
//! | byte  | content                |
//! |-------|------------------------|
//! | 0     | opcode                 |
//! | 1..5  | first operand, BE u32  |
//! | 5..9  | second operand, BE u32 |
//!
//! Decoding never fails: any nine bytes form a [`RawInstruction`]. Whether its
//! opcode means anything is decided later by [`Opcode::try_from`].

use parse_display::{Display, FromStr};
use thiserror::Error;

use crate::constants::{Word, INSTRUCTION_SIZE};

/// Canonical opcode table of the Dioxide architecture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, FromStr)]
#[display(style = "UPPERCASE")]
#[repr(u8)]
pub enum Opcode {
    /// No-op
    Nul = 0,

    /// Unconditional jump to an instruction index
    Brc = 1,

    /// Jump to an instruction index if a register is zero
    Brz = 2,

    /// Load an immediate value in a register
    Set = 3,

    /// Load a byte from memory in a register
    Lod = 4,

    /// Store the low byte of a register in memory
    Str = 5,

    /// Add a register to another
    Add = 6,

    /// Substract a register from another
    Sub = 7,

    /// Logical shift right by one
    Rsh = 8,

    /// Logical shift left by one
    Lsh = 9,

    /// Halt the machine
    Hlt = 10,

    /// Load a big-endian half-word from memory in a register
    Ldh = 11,

    /// Load a big-endian word from memory in a register
    Ldw = 12,

    /// Store the low half-word of a register in memory
    Sth = 13,

    /// Store a register in memory
    Stw = 14,
}

impl Opcode {
    pub const ALL: [Opcode; 15] = [
        Opcode::Nul,
        Opcode::Brc,
        Opcode::Brz,
        Opcode::Set,
        Opcode::Lod,
        Opcode::Str,
        Opcode::Add,
        Opcode::Sub,
        Opcode::Rsh,
        Opcode::Lsh,
        Opcode::Hlt,
        Opcode::Ldh,
        Opcode::Ldw,
        Opcode::Sth,
        Opcode::Stw,
    ];

    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("unknown opcode {0:#04x}")]
pub struct UnknownOpcode(pub u8);

impl TryFrom<u8> for Opcode {
    type Error = UnknownOpcode;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Opcode::ALL
            .get(usize::from(value))
            .copied()
            .ok_or(UnknownOpcode(value))
    }
}

impl From<Opcode> for u8 {
    fn from(opcode: Opcode) -> Self {
        opcode.code()
    }
}

/// An instruction as it is laid out in memory, before its opcode is resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
#[display("{opcode} ({arg1}, {arg2})")]
pub struct RawInstruction {
    pub opcode: u8,
    pub arg1: Word,
    pub arg2: Word,
}

impl RawInstruction {
    #[must_use]
    pub const fn new(opcode: u8, arg1: Word, arg2: Word) -> Self {
        Self { opcode, arg1, arg2 }
    }

    #[must_use]
    pub fn encode(&self) -> [u8; INSTRUCTION_SIZE] {
        encode(self.opcode, self.arg1, self.arg2)
    }

    #[must_use]
    pub fn decode(bytes: &[u8; INSTRUCTION_SIZE]) -> Self {
        decode(bytes)
    }
}

/// Encode an instruction to its binary form
#[must_use]
pub fn encode(opcode: u8, arg1: Word, arg2: Word) -> [u8; INSTRUCTION_SIZE] {
    let mut bytes = [0; INSTRUCTION_SIZE];
    bytes[0] = opcode;
    bytes[1..5].copy_from_slice(&arg1.to_be_bytes());
    bytes[5..9].copy_from_slice(&arg2.to_be_bytes());
    bytes
}

/// Decode an instruction from its binary form
#[must_use]
pub fn decode(bytes: &[u8; INSTRUCTION_SIZE]) -> RawInstruction {
    let [opcode, a0, a1, a2, a3, b0, b1, b2, b3] = *bytes;
    RawInstruction {
        opcode,
        arg1: Word::from_be_bytes([a0, a1, a2, a3]),
        arg2: Word::from_be_bytes([b0, b1, b2, b3]),
    }
}
