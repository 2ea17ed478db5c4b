//! Parse numeric operands.
//!
//! Operands are signed base 10 integers. They are stored as 32-bit words, so
//! negative values and values above `u32::MAX` wrap around.

use nom::{
    bytes::complete::take_while,
    character::complete::{digit1, one_of},
    combinator::{all_consuming, opt, recognize},
    sequence::{pair, preceded},
    Finish, IResult,
};

use super::ParseError;
use crate::constants::Word;

const WORD_MODULUS: i128 = 1 << Word::BITS;

/// Characters skipped before a lenient operand
fn is_leading_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0B' | '\x0C')
}

/// Extract a signed decimal literal
fn take_decimal_literal<'a, Error: ParseError<&'a str>>(
    input: &'a str,
) -> IResult<&'a str, &'a str, Error> {
    recognize(pair(opt(one_of("+-")), digit1))(input)
}

/// Reduce a decimal literal to its low 32 bits
fn wrap_decimal(literal: &str) -> Word {
    let (negative, digits) = match literal.as_bytes().first() {
        Some(b'-') => (true, &literal[1..]),
        Some(b'+') => (false, &literal[1..]),
        _ => (false, literal),
    };

    let value = digits.bytes().fold(0, |acc: Word, digit| {
        acc.wrapping_mul(10).wrapping_add(Word::from(digit - b'0'))
    });

    if negative {
        value.wrapping_neg()
    } else {
        value
    }
}

/// Parse an operand the forgiving way.
///
/// Leading whitespace is skipped, then the longest signed decimal prefix is
/// read. Anything after it is ignored, and text with no such prefix reads as
/// `0`.
#[must_use]
pub fn parse_operand_lenient(input: &str) -> Word {
    preceded(
        take_while::<_, _, ()>(is_leading_space),
        take_decimal_literal,
    )(input)
    .map_or(0, |(_, literal)| wrap_decimal(literal))
}

/// Parse an operand, rejecting anything but a full signed decimal literal.
///
/// Values from `i32::MIN` up to `u32::MAX` are accepted, negative ones being
/// stored in two's complement.
#[must_use]
pub fn parse_operand_strict(input: &str) -> Option<Word> {
    let (_, literal) = all_consuming(take_decimal_literal::<()>)(input)
        .finish()
        .ok()?;

    let value: i128 = literal.parse().ok()?;
    if value < i128::from(i32::MIN) || value > i128::from(Word::MAX) {
        return None;
    }

    Word::try_from(value.rem_euclid(WORD_MODULUS)).ok()
}
