use parse_display::Display;

use crate::constants as C;

/// How malformed input is handled by the assembler and the processor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display)]
#[display(style = "lowercase")]
pub enum Mode {
    /// Malformed input is silently degraded.
    ///
    /// Unknown mnemonics are skipped, bad operands read as `0`, leftover
    /// tokens are dropped and unknown opcodes execute as no-ops. The program
    /// counter only faults once it goes past the end of memory, and an
    /// instruction straddling the end of memory reads zeroes for its missing
    /// bytes.
    #[default]
    Legacy,

    /// Malformed input is an error.
    ///
    /// The program counter faults as soon as a whole instruction no longer
    /// fits before the end of memory.
    Strict,
}

impl Mode {
    #[must_use]
    pub const fn is_strict(self) -> bool {
        matches!(self, Mode::Strict)
    }
}

/// Parameters of a machine, fixed for its whole lifetime
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineConfig {
    /// Memory size, in bytes
    pub memory_size: usize,

    /// Number of registers
    pub registers: usize,

    pub mode: Mode,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            memory_size: C::MEMORY_SIZE,
            registers: C::NUM_REGISTERS,
            mode: Mode::default(),
        }
    }
}

impl MachineConfig {
    #[must_use]
    pub fn with_mode(self, mode: Mode) -> Self {
        Self { mode, ..self }
    }
}
