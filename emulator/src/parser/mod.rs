//! Program parsing logic
//!
//! Parsing happens in two steps: the source is first split into tokens, which
//! are then grouped into `(mnemonic, arg1, arg2)` statements. The tokenizer and
//! the operand parser are written with the `nom` library.

pub(crate) mod line;
pub(crate) mod literal;
pub mod location;
pub(crate) mod tokenizer;

pub use line::{Program, Statement};
pub use literal::{parse_operand_lenient, parse_operand_strict};
pub use tokenizer::{tokenize, Tokenizer};

pub trait ParseError<I>: nom::error::ParseError<I> + nom::error::ContextError<I> {}

impl<I, E> ParseError<I> for E where E: nom::error::ParseError<I> + nom::error::ContextError<I> {}

/// Parse a program
///
/// This never fails: leftover tokens which do not form a full statement are
/// kept in [`Program::trailing`].
#[must_use]
pub fn parse(input: &str) -> Program<'_> {
    line::parse_program(tokenize(input))
}

#[cfg(test)]
mod tests {
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parse_test() {
        let program = parse(indoc! {"
            SET 0 0   # clear
            BRZ 0 2
            SET 1 99
            HLT 0 0
        "});

        assert_eq!(program.statements.len(), 4);
        assert!(program.trailing.is_empty());
        assert_eq!(
            program.to_string(),
            "SET 0 0\nBRZ 0 2\nSET 1 99\nHLT 0 0\n"
        );
    }
}
