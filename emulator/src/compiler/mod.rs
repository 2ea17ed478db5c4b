use thiserror::Error;
use tracing::debug;

use crate::codec::{decode, RawInstruction};
use crate::config::MachineConfig;
use crate::constants as C;
use crate::parser::{location::Location, parse};
use crate::runtime::{Computer, MemoryError};

mod assembler;

pub use self::assembler::{assemble, assemble_statement, encode_all, Assembled, AssemblyError};

/// Holds informations about the compilation
#[derive(Debug, Clone, Default)]
pub struct DebugInfo {
    /// The machine code loaded in memory
    pub program: Vec<u8>,

    /// Source location of each instruction, by instruction index
    pub locations: Vec<Location>,
}

impl DebugInfo {
    /// Source location of the instruction at a memory address
    #[must_use]
    pub fn location_of(&self, address: C::Address) -> Option<&Location> {
        let index = usize::try_from(address).ok()? / C::INSTRUCTION_SIZE;
        self.locations.get(index)
    }

    /// The instructions of the program, as they are laid out in memory
    pub fn instructions(&self) -> impl Iterator<Item = RawInstruction> + '_ {
        self.program.chunks_exact(C::INSTRUCTION_SIZE).map(|chunk| {
            let mut bytes = [0; C::INSTRUCTION_SIZE];
            bytes.copy_from_slice(chunk);
            decode(&bytes)
        })
    }
}

#[derive(Debug, Error)]
pub enum CompilationError {
    #[error("could not assemble program")]
    Assembly(#[from] AssemblyError),

    #[error("could not load program")]
    Load(#[from] MemoryError),
}

/// Assemble a source text and load it in a new machine
///
/// # Errors
///
/// Fails if the program is rejected by the assembler (strict mode only) or if
/// it does not fit in memory.
#[tracing::instrument(skip(source))]
pub fn compile(
    source: &str,
    config: &MachineConfig,
) -> Result<(Computer, DebugInfo), CompilationError> {
    let program = parse(source);
    debug!(
        statements = program.statements.len(),
        trailing = program.trailing.len(),
        "Parsed program"
    );

    let instructions = assemble(&program, config.mode)?;
    let bytes = encode_all(&instructions);

    let mut computer = Computer::new(config);
    computer.load(&bytes)?;

    let debug_info = DebugInfo {
        program: bytes,
        locations: instructions.into_iter().map(|i| i.location).collect(),
    };

    Ok((computer, debug_info))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::config::Mode;
    use crate::runtime::{Instruction, State};

    #[test]
    fn compile_test() {
        let (mut computer, debug_info) =
            compile("SET 0 5; SET 1 3; ADD 0 1; HLT 0 0", &MachineConfig::default()).unwrap();

        assert_eq!(debug_info.program.len(), 36);
        assert_eq!(debug_info.locations.len(), 4);
        assert_eq!(&computer.memory.as_bytes()[..36], debug_info.program.as_slice());

        computer.run().unwrap();
        assert_eq!(computer.registers.as_slice()[0], 8);
        assert_eq!(computer.state(), State::Halted);
    }

    #[test]
    fn location_of_test() {
        let (_, debug_info) = compile("NUL 0 0\nHLT 0 0", &MachineConfig::default()).unwrap();
        assert_eq!(debug_info.location_of(9).map(Location::range), Some(8..15));
        assert_eq!(debug_info.location_of(12).map(Location::range), Some(8..15));
        assert_eq!(debug_info.location_of(18), None);
    }

    #[test]
    fn instructions_test() {
        let (_, debug_info) = compile("SET 2 7 HLT 0 0", &MachineConfig::default()).unwrap();
        let instructions: Vec<_> = debug_info
            .instructions()
            .map(|raw| Instruction::try_from(raw).unwrap())
            .collect();
        assert_eq!(
            instructions,
            vec![Instruction::Set(crate::runtime::Reg(2), 7), Instruction::Hlt]
        );
    }

    #[test]
    fn disassemble_test() {
        let source = indoc::indoc! {"
            SET 0 300
            STW 0 104
            LDH 106 2
            BRZ 2 0
            RSH 1 9     # the second operand is ignored
            HLT 0 0
        "};
        let (_, debug_info) = compile(source, &MachineConfig::default()).unwrap();
        let listing: Vec<String> = debug_info
            .instructions()
            .map(|raw| Instruction::try_from(raw).unwrap().to_string())
            .collect();

        insta::assert_snapshot!(listing.join("\n"), @r"
        SET 0 300
        STW 0 104
        LDH 106 2
        BRZ 2 0
        RSH 1 0
        HLT 0 0
        ");
    }

    #[test]
    fn program_too_large_test() {
        let config = MachineConfig {
            memory_size: 10,
            ..MachineConfig::default()
        };
        let error = compile("NUL 0 0 HLT 0 0", &config).unwrap_err();
        assert!(matches!(
            error,
            CompilationError::Load(MemoryError::ProgramTooLarge {
                size: 18,
                capacity: 10
            })
        ));
    }

    #[test]
    fn strict_rejects_test() {
        let config = MachineConfig::default().with_mode(Mode::Strict);
        assert!(matches!(
            compile("NOP 0 0", &config),
            Err(CompilationError::Assembly(
                AssemblyError::UnknownMnemonic { .. }
            ))
        ));
    }
}
