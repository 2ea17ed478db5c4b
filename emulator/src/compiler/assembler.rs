use thiserror::Error;
use tracing::{debug, trace};

use crate::codec::{encode, Opcode};
use crate::config::Mode;
use crate::constants::Word;
use crate::parser::{
    location::{Located, Location},
    parse_operand_lenient, parse_operand_strict, Program, Statement,
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AssemblyError {
    #[error("unknown mnemonic \"{mnemonic}\"")]
    UnknownMnemonic { mnemonic: String, location: Location },

    #[error("invalid operand \"{operand}\", expected a 32-bit decimal integer")]
    InvalidOperand { operand: String, location: Location },

    #[error("incomplete instruction, expected 3 tokens but found {found}")]
    IncompleteStatement { found: usize, location: Location },
}

impl AssemblyError {
    #[must_use]
    pub const fn location(&self) -> &Location {
        match self {
            Self::UnknownMnemonic { location, .. }
            | Self::InvalidOperand { location, .. }
            | Self::IncompleteStatement { location, .. } => location,
        }
    }
}

/// A statement turned into an instruction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assembled {
    pub opcode: Opcode,
    pub arg1: Word,
    pub arg2: Word,

    /// Where the statement is in the source
    pub location: Location,
}

fn parse_operand(operand: &Located<&str>, mode: Mode) -> Result<Word, AssemblyError> {
    match mode {
        Mode::Legacy => Ok(parse_operand_lenient(operand.inner)),
        Mode::Strict => {
            parse_operand_strict(operand.inner).ok_or_else(|| AssemblyError::InvalidOperand {
                operand: operand.inner.to_owned(),
                location: operand.location.clone(),
            })
        }
    }
}

/// Assemble a single statement
///
/// Returns `None` when the statement is skipped.
///
/// # Errors
///
/// In strict mode, fails on unknown mnemonics and invalid operands.
pub fn assemble_statement(
    statement: &Statement<'_>,
    mode: Mode,
) -> Result<Option<Assembled>, AssemblyError> {
    let Ok(opcode) = statement.mnemonic.inner.parse::<Opcode>() else {
        if mode.is_strict() {
            return Err(AssemblyError::UnknownMnemonic {
                mnemonic: statement.mnemonic.inner.to_owned(),
                location: statement.mnemonic.location.clone(),
            });
        }

        debug!(
            mnemonic = statement.mnemonic.inner,
            location = %statement.mnemonic.location,
            "Skipping unknown mnemonic"
        );
        return Ok(None);
    };

    let arg1 = parse_operand(&statement.arg1, mode)?;
    let arg2 = parse_operand(&statement.arg2, mode)?;

    Ok(Some(Assembled {
        opcode,
        arg1,
        arg2,
        location: statement.location(),
    }))
}

/// Assemble a program, one statement after the other
///
/// # Errors
///
/// In strict mode, fails on the first invalid statement, or if tokens are left
/// over after the last complete statement.
pub fn assemble(program: &Program<'_>, mode: Mode) -> Result<Vec<Assembled>, AssemblyError> {
    let mut instructions = Vec::with_capacity(program.statements.len());
    for statement in &program.statements {
        if let Some(assembled) = assemble_statement(statement, mode)? {
            trace!(%statement, "Assembled statement");
            instructions.push(assembled);
        }
    }

    if let Some(location) = program.trailing_location() {
        if mode.is_strict() {
            return Err(AssemblyError::IncompleteStatement {
                found: program.trailing.len(),
                location,
            });
        }

        debug!(count = program.trailing.len(), %location, "Dropping trailing tokens");
    }

    Ok(instructions)
}

/// Encode assembled instructions to machine code
#[must_use]
pub fn encode_all(instructions: &[Assembled]) -> Vec<u8> {
    instructions
        .iter()
        .flat_map(|i| encode(i.opcode.code(), i.arg1, i.arg2))
        .collect()
}
