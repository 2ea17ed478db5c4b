use parse_display::Display;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::codec::{decode, RawInstruction};
use crate::config::{MachineConfig, Mode};
use crate::constants as C;

mod dump;
mod exception;
mod instructions;
mod memory;
mod registers;

pub use self::dump::Dump;
pub use self::exception::Exception;
pub use self::instructions::Instruction;
pub use self::memory::{Memory, MemoryError};
pub use self::registers::{Reg, RegisterError, Registers};

use self::instructions::Flow;

/// Distance between two consecutive instructions, in bytes
const STRIDE: C::Address = C::INSTRUCTION_SIZE as C::Address;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProcessorError {
    #[error("CPU exception: {0}")]
    Exception(#[from] Exception),

    #[error("the machine is {0}")]
    NotRunning(State),
}

type Result<T> = std::result::Result<T, ProcessorError>;

/// Lifecycle of a machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[display(style = "lowercase")]
pub enum State {
    Running,
    Halted,
    Faulted,
}

pub struct Computer {
    pub registers: Registers,
    pub memory: Memory,

    /// Byte offset of the next instruction
    pub pc: C::Address,

    /// Number of executed instructions
    pub cycles: usize,

    state: State,
    mode: Mode,
}

impl std::fmt::Debug for Computer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Computer {{ registers: {:?}, pc: {}, state: {}, memory: [...] }}",
            self.registers, self.pc, self.state
        )
    }
}

impl Default for Computer {
    fn default() -> Self {
        Self::new(&MachineConfig::default())
    }
}

impl Computer {
    /// Create a machine with zeroed memory and registers
    #[must_use]
    pub fn new(config: &MachineConfig) -> Self {
        info!(
            memory = config.memory_size,
            registers = config.registers,
            register_size = C::REGISTER_SIZE,
            mode = %config.mode,
            isa_revision = C::ISA_REVISION,
            "Machine initialized"
        );

        Self {
            registers: Registers::new(config.registers),
            memory: Memory::new(config.memory_size),
            pc: 0,
            cycles: 0,
            state: State::Running,
            mode: config.mode,
        }
    }

    /// Copy a program at the start of memory
    ///
    /// # Errors
    ///
    /// It fails if the program does not fit in memory.
    pub fn load(&mut self, program: &[u8]) -> std::result::Result<(), MemoryError> {
        self.memory.load(program)?;
        info!(size = program.len(), "Program loaded");
        Ok(())
    }

    #[must_use]
    pub const fn state(&self) -> State {
        self.state
    }

    #[must_use]
    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// Human-readable dump of the registers and memory
    #[must_use]
    pub const fn dump(&self) -> Dump<'_> {
        Dump::new(self)
    }

    fn fetch(&self) -> std::result::Result<RawInstruction, Exception> {
        let bytes = match self.mode {
            Mode::Legacy => self.memory.read_padded(self.pc),
            Mode::Strict => self.memory.read(self.pc),
        }
        .map_err(|_| self.out_of_bounds())?;

        Ok(decode(&bytes))
    }

    fn out_of_bounds(&self) -> Exception {
        Exception::ProgramCounterOutOfBounds {
            pc: self.pc,
            memory_size: self.memory.len(),
        }
    }

    fn check_bounds(&self) -> std::result::Result<(), Exception> {
        let memory_size = self.memory.len() as C::Address;
        let out_of_bounds = match self.mode {
            Mode::Legacy => self.pc > memory_size,
            Mode::Strict => self.pc.saturating_add(STRIDE) > memory_size,
        };

        if out_of_bounds {
            Err(self.out_of_bounds())
        } else {
            Ok(())
        }
    }

    /// Fetch, decode and execute one instruction, then move the program counter
    fn cycle(&mut self) -> std::result::Result<State, Exception> {
        let raw = self.fetch()?;

        let flow = match Instruction::try_from(raw) {
            Ok(instruction) => {
                debug!(pc = self.pc, "Executing instruction \"{}\"", instruction);
                instruction.execute(self)?
            }
            Err(e) if self.mode.is_strict() => return Err(e.into()),
            Err(e) => {
                debug!(pc = self.pc, %raw, "Skipping instruction: {}", e);
                Flow::Next
            }
        };

        self.cycles += 1;
        self.pc = match flow {
            Flow::Jump(target) => C::Address::from(target) * STRIDE,
            Flow::Next | Flow::Halt => self.pc + STRIDE,
        };

        // A halt never fetches again, so only the legacy check applies to it
        if flow != Flow::Halt || !self.mode.is_strict() {
            self.check_bounds()?;
        }

        if flow == Flow::Halt {
            Ok(State::Halted)
        } else {
            Ok(State::Running)
        }
    }

    /// Run a single instruction
    ///
    /// # Errors
    ///
    /// Fails if the machine is not running anymore, or if the instruction
    /// raised an exception. The machine is faulted in the latter case.
    #[tracing::instrument(skip(self), level = "trace")]
    pub fn step(&mut self) -> Result<State> {
        if self.state != State::Running {
            return Err(ProcessorError::NotRunning(self.state));
        }

        match self.cycle() {
            Ok(state) => {
                self.state = state;
                Ok(state)
            }
            Err(exception) => {
                error!(pc = self.pc, "{}", exception);
                self.state = State::Faulted;
                Err(exception.into())
            }
        }
    }

    /// Run until the machine halts
    ///
    /// # Errors
    ///
    /// Fails with the exception that faulted the machine.
    #[tracing::instrument(skip(self))]
    pub fn run(&mut self) -> Result<()> {
        while self.step()? == State::Running {}
        info!(cycles = self.cycles, "Machine halted");
        Ok(())
    }
}
