use super::location::{Located, Location};

/// A `(mnemonic, arg1, arg2)` token triple
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Statement<'a> {
    pub mnemonic: Located<&'a str>,
    pub arg1: Located<&'a str>,
    pub arg2: Located<&'a str>,
}

impl Statement<'_> {
    /// Location spanning the three tokens
    #[must_use]
    pub fn location(&self) -> Location {
        self.mnemonic.location.join(&self.arg2.location)
    }
}

impl std::fmt::Display for Statement<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.mnemonic, self.arg1, self.arg2)
    }
}

/// A program, as a list of statements
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct Program<'a> {
    pub statements: Vec<Statement<'a>>,

    /// Tokens left over after the last complete statement
    pub trailing: Vec<Located<&'a str>>,
}

impl Program<'_> {
    /// Location of the leftover tokens, if any
    #[must_use]
    pub fn trailing_location(&self) -> Option<Location> {
        let first = self.trailing.first()?;
        let last = self.trailing.last()?;
        Some(first.location.join(&last.location))
    }
}

impl std::fmt::Display for Program<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for statement in &self.statements {
            writeln!(f, "{statement}")?;
        }
        Ok(())
    }
}

/// Group tokens by three, in order
pub(crate) fn parse_program<'a, I>(tokens: I) -> Program<'a>
where
    I: IntoIterator<Item = Located<&'a str>>,
{
    let mut tokens = tokens.into_iter().fuse();
    let mut statements = Vec::new();

    let trailing = loop {
        match (tokens.next(), tokens.next(), tokens.next()) {
            (Some(mnemonic), Some(arg1), Some(arg2)) => statements.push(Statement {
                mnemonic,
                arg1,
                arg2,
            }),
            (first, second, _) => break first.into_iter().chain(second).collect(),
        }
    };

    Program {
        statements,
        trailing,
    }
}
