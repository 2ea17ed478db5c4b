//! Split assembly source into tokens.
//!
//! Tokens are separated by spaces, newlines and `;`. A `#` starts a comment
//! which runs up to the end of the line. A `#` also ends the token it
//! touches, so `5#note` still yields `5`.

use std::iter::FusedIterator;

use nom::{
    branch::alt,
    bytes::complete::{take_till, take_till1, take_while1},
    character::complete::char,
    combinator::value,
    multi::many0_count,
    sequence::preceded,
    IResult,
};

use super::{
    location::{Locatable, Located},
    ParseError,
};

const COMMENT: char = '#';

fn is_separator(c: char) -> bool {
    matches!(c, ' ' | '\n' | ';')
}

fn is_token_end(c: char) -> bool {
    is_separator(c) || c == COMMENT
}

/// Parse a comment, up to the newline
fn parse_comment<'a, Error: ParseError<&'a str>>(input: &'a str) -> IResult<&'a str, (), Error> {
    value((), preceded(char(COMMENT), take_till(|c| c == '\n')))(input)
}

/// Skip everything that can't be part of a token
fn skip_ignored<'a, Error: ParseError<&'a str>>(input: &'a str) -> IResult<&'a str, (), Error> {
    value(
        (),
        many0_count(alt((value((), take_while1(is_separator)), parse_comment))),
    )(input)
}

/// Parse the raw text of a token
fn parse_word<'a, Error: ParseError<&'a str>>(input: &'a str) -> IResult<&'a str, &'a str, Error> {
    take_till1(is_token_end)(input)
}

/// Lazy iterator over the tokens of a source text
#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
    source: &'a str,
    rest: &'a str,
}

impl<'a> Tokenizer<'a> {
    #[must_use]
    pub const fn new(source: &'a str) -> Self {
        Self {
            source,
            rest: source,
        }
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Located<&'a str>;

    fn next(&mut self) -> Option<Self::Item> {
        let (start, ()) = skip_ignored::<()>(self.rest).ok()?;
        self.rest = start;
        if start.is_empty() {
            return None;
        }

        // A trailing `#` is left in place, the next call skips the comment
        let (end, word) = parse_word::<()>(start).ok()?;
        self.rest = end;

        Some(word.with_location((self.source, start, end)))
    }
}

impl FusedIterator for Tokenizer<'_> {}

/// Tokenize a source text
#[must_use]
pub fn tokenize(source: &str) -> Tokenizer<'_> {
    Tokenizer::new(source)
}
