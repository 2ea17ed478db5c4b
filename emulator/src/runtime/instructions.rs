use parse_display::Display;
use tracing::debug;

use crate::codec::{Opcode, RawInstruction, UnknownOpcode};
use crate::constants::{Address, Word};

use super::{exception::Exception, registers::Reg, Computer};

/// A decoded instruction
///
/// Displays in assembler syntax, so that a decoded program can be assembled
/// back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Instruction {
    /// No-op
    #[display("NUL 0 0")]
    Nul,

    /// Jump to an instruction index
    #[display("BRC {0} 0")]
    Brc(Word),

    /// Jump to an instruction index if a register is zero
    #[display("BRZ {0} {1}")]
    Brz(Reg, Word),

    /// Load an immediate value in a register
    #[display("SET {0} {1}")]
    Set(Reg, Word),

    /// Load a byte from memory, zero-extended
    #[display("LOD {0} {1}")]
    Lod(Word, Reg),

    /// Store the low byte of a register
    #[display("STR {0} {1}")]
    Str(Reg, Word),

    /// Add the second register to the first one
    #[display("ADD {0} {1}")]
    Add(Reg, Reg),

    /// Substract the second register from the first one
    #[display("SUB {0} {1}")]
    Sub(Reg, Reg),

    /// Logical shift right by one bit
    #[display("RSH {0} 0")]
    Rsh(Reg),

    /// Logical shift left by one bit
    #[display("LSH {0} 0")]
    Lsh(Reg),

    /// Halt the machine
    #[display("HLT 0 0")]
    Hlt,

    /// Load a big-endian half-word from memory, zero-extended
    #[display("LDH {0} {1}")]
    Ldh(Word, Reg),

    /// Load a big-endian word from memory
    #[display("LDW {0} {1}")]
    Ldw(Word, Reg),

    /// Store the low half-word of a register, big-endian
    #[display("STH {0} {1}")]
    Sth(Reg, Word),

    /// Store a register, big-endian
    #[display("STW {0} {1}")]
    Stw(Reg, Word),
}

/// What the processor does after an instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flow {
    /// Go to the next instruction
    Next,

    /// Go to the instruction at this index
    Jump(Word),

    /// Stop the machine
    Halt,
}

impl Instruction {
    #[must_use]
    pub const fn opcode(&self) -> Opcode {
        use Instruction::*;

        match self {
            Nul => Opcode::Nul,
            Brc(_) => Opcode::Brc,
            Brz(_, _) => Opcode::Brz,
            Set(_, _) => Opcode::Set,
            Lod(_, _) => Opcode::Lod,
            Str(_, _) => Opcode::Str,
            Add(_, _) => Opcode::Add,
            Sub(_, _) => Opcode::Sub,
            Rsh(_) => Opcode::Rsh,
            Lsh(_) => Opcode::Lsh,
            Hlt => Opcode::Hlt,
            Ldh(_, _) => Opcode::Ldh,
            Ldw(_, _) => Opcode::Ldw,
            Sth(_, _) => Opcode::Sth,
            Stw(_, _) => Opcode::Stw,
        }
    }

    /// Build an instruction from an opcode and its raw operands.
    ///
    /// Operands an instruction does not use are dropped.
    #[must_use]
    pub const fn from_parts(opcode: Opcode, arg1: Word, arg2: Word) -> Self {
        match opcode {
            Opcode::Nul => Self::Nul,
            Opcode::Brc => Self::Brc(arg1),
            Opcode::Brz => Self::Brz(Reg(arg1), arg2),
            Opcode::Set => Self::Set(Reg(arg1), arg2),
            Opcode::Lod => Self::Lod(arg1, Reg(arg2)),
            Opcode::Str => Self::Str(Reg(arg1), arg2),
            Opcode::Add => Self::Add(Reg(arg1), Reg(arg2)),
            Opcode::Sub => Self::Sub(Reg(arg1), Reg(arg2)),
            Opcode::Rsh => Self::Rsh(Reg(arg1)),
            Opcode::Lsh => Self::Lsh(Reg(arg1)),
            Opcode::Hlt => Self::Hlt,
            Opcode::Ldh => Self::Ldh(arg1, Reg(arg2)),
            Opcode::Ldw => Self::Ldw(arg1, Reg(arg2)),
            Opcode::Sth => Self::Sth(Reg(arg1), arg2),
            Opcode::Stw => Self::Stw(Reg(arg1), arg2),
        }
    }

    /// Raw operands of the instruction, unused ones being `0`
    #[must_use]
    pub const fn operands(&self) -> (Word, Word) {
        use Instruction::*;

        match *self {
            Nul | Hlt => (0, 0),
            Brc(target) => (target, 0),
            Rsh(Reg(reg)) | Lsh(Reg(reg)) => (reg, 0),
            Brz(Reg(reg), value) | Set(Reg(reg), value) => (reg, value),
            Lod(addr, Reg(reg)) | Ldh(addr, Reg(reg)) | Ldw(addr, Reg(reg)) => (addr, reg),
            Str(Reg(reg), addr) | Sth(Reg(reg), addr) | Stw(Reg(reg), addr) => (reg, addr),
            Add(Reg(a), Reg(b)) | Sub(Reg(a), Reg(b)) => (a, b),
        }
    }

    /// Execute the instruction
    #[tracing::instrument(skip(computer), level = "trace")]
    pub(crate) fn execute(&self, computer: &mut Computer) -> Result<Flow, Exception> {
        use Instruction::*;

        match *self {
            Nul => {}

            Brc(target) => return Ok(Flow::Jump(target)),

            Brz(reg, target) => {
                let value = computer.registers.get(reg)?;
                if value == 0 {
                    return Ok(Flow::Jump(target));
                }
            }

            Set(reg, value) => computer.registers.set(reg, value)?,

            Lod(addr, reg) => {
                let [byte] = computer.memory.read(Address::from(addr))?;
                computer.registers.set(reg, Word::from(byte))?;
            }

            Str(reg, addr) => {
                let [.., low] = computer.registers.get(reg)?.to_be_bytes();
                computer.memory.write(Address::from(addr), &[low])?;
            }

            Add(a, b) => {
                let rhs = computer.registers.get(b)?;
                let lhs = computer.registers.get_mut(a)?;
                let res = lhs.wrapping_add(rhs);
                debug!("{} + {} = {}", lhs, rhs, res);
                *lhs = res;
            }

            Sub(a, b) => {
                let rhs = computer.registers.get(b)?;
                let lhs = computer.registers.get_mut(a)?;
                let res = lhs.wrapping_sub(rhs);
                debug!("{} - {} = {}", lhs, rhs, res);
                *lhs = res;
            }

            Rsh(reg) => *computer.registers.get_mut(reg)? >>= 1,

            Lsh(reg) => *computer.registers.get_mut(reg)? <<= 1,

            Hlt => return Ok(Flow::Halt),

            Ldh(addr, reg) => {
                let bytes = computer.memory.read(Address::from(addr))?;
                computer
                    .registers
                    .set(reg, Word::from(u16::from_be_bytes(bytes)))?;
            }

            Ldw(addr, reg) => {
                let bytes = computer.memory.read(Address::from(addr))?;
                computer.registers.set(reg, Word::from_be_bytes(bytes))?;
            }

            Sth(reg, addr) => {
                let [.., high, low] = computer.registers.get(reg)?.to_be_bytes();
                computer.memory.write(Address::from(addr), &[high, low])?;
            }

            Stw(reg, addr) => {
                let bytes = computer.registers.get(reg)?.to_be_bytes();
                computer.memory.write(Address::from(addr), &bytes)?;
            }
        };

        Ok(Flow::Next)
    }
}

impl TryFrom<RawInstruction> for Instruction {
    type Error = UnknownOpcode;

    fn try_from(raw: RawInstruction) -> Result<Self, Self::Error> {
        let opcode = Opcode::try_from(raw.opcode)?;
        Ok(Self::from_parts(opcode, raw.arg1, raw.arg2))
    }
}

impl From<Instruction> for RawInstruction {
    fn from(instruction: Instruction) -> Self {
        let (arg1, arg2) = instruction.operands();
        RawInstruction::new(instruction.opcode().code(), arg1, arg2)
    }
}
