//! Recursive-descent parser for the Xeger grammar.
//!
//! ```text
//! Pattern    := Expression+
//! Expression := Atom [ Multiplier ]
//! Atom       := Char | '\' AnyChar | '(' Pattern ')' | '[' Set ']'
//! Set        := SetItem+
//! SetItem    := Char | Char '-' Char | '\' AnyChar
//! Multiplier := '*' | '+' | '?' | '{' Digit+ '}'
//! ```
//!
//! Patterns are parsed as bytes, not UTF-8 text: escape sequences and set
//! members are literal bytes, matching the byte-oriented contract of the
//! rest of this crate.

use rand::Rng;

use super::ast::{CharSet, Expression, Multiplier, Node, Pattern};
use crate::{
    error::{Error, Result},
    rng::RandomRing,
};

const RESERVED_IN_SET: &[u8] = b"[]{}*+?";

/// A byte cursor with one level of pushback, used to implement the
/// "peel the last literal off and reprocess it" rule in `Expression`
/// parsing without mutating the input buffer.
struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
    pending: Vec<u8>,
}

impl<'a> Cursor<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            pos: 0,
            pending: Vec::new(),
        }
    }

    fn bump(&mut self) -> Option<u8> {
        if let Some(b) = self.pending.pop() {
            return Some(b);
        }
        let b = self.bytes.get(self.pos).copied();
        if b.is_some() {
            self.pos += 1;
        }
        b
    }

    fn peek(&self) -> Option<u8> {
        if let Some(&b) = self.pending.last() {
            return Some(b);
        }
        self.bytes.get(self.pos).copied()
    }

    /// Make `b` the next byte returned by `bump`/`peek`.
    fn push_back(&mut self, b: u8) {
        self.pending.push(b);
    }

    fn is_empty(&self) -> bool {
        self.pending.is_empty() && self.pos >= self.bytes.len()
    }
}

/// Parse `text` into a [`Pattern`], sampling any `*`/`+`/`?` multipliers and
/// set choices from `rng` as their rings are constructed.
pub(crate) fn parse<R>(text: &[u8], max_random: u32, rng: &mut R) -> Result<Pattern>
where
    R: Rng + ?Sized,
{
    let mut cursor = Cursor::new(text);
    let pattern = parse_pattern(&mut cursor, rng, max_random, false)?;
    if pattern.expressions.is_empty() {
        return Err(Error::Parse("pattern must contain at least one expression".into()));
    }
    Ok(pattern)
}

fn parse_pattern<R>(cursor: &mut Cursor, rng: &mut R, max_random: u32, in_group: bool) -> Result<Pattern>
where
    R: Rng + ?Sized,
{
    let mut expressions = Vec::new();
    loop {
        if in_group {
            if cursor.is_empty() {
                return Err(Error::Parse("unmatched '(' in pattern".into()));
            }
            if cursor.peek() == Some(b')') {
                cursor.bump();
                break;
            }
        } else if cursor.is_empty() {
            break;
        }
        expressions.push(parse_expression(cursor, rng, max_random)?);
    }
    Ok(Pattern { expressions })
}

fn parse_expression<R>(cursor: &mut Cursor, rng: &mut R, max_random: u32) -> Result<Expression>
where
    R: Rng + ?Sized,
{
    let mut accum: Vec<u8> = Vec::new();

    loop {
        let c = match cursor.bump() {
            Some(c) => c,
            None => {
                debug_assert!(!accum.is_empty(), "caller only invokes us with input remaining");
                return Ok(Expression {
                    node: Node::Sequence(accum),
                    multiplier: None,
                });
            }
        };

        match c {
            b'(' if accum.is_empty() => {
                let group = parse_pattern(cursor, rng, max_random, true)?;
                let multiplier = parse_multiplier(cursor, rng, max_random)?;
                return Ok(Expression {
                    node: Node::Group(group),
                    multiplier,
                });
            }
            b'(' => {
                cursor.push_back(c);
                return Ok(Expression {
                    node: Node::Sequence(accum),
                    multiplier: None,
                });
            }
            b'[' if accum.is_empty() => {
                let set = parse_set(cursor, rng)?;
                let multiplier = parse_multiplier(cursor, rng, max_random)?;
                return Ok(Expression {
                    node: Node::Set(set),
                    multiplier,
                });
            }
            b'[' => {
                cursor.push_back(c);
                return Ok(Expression {
                    node: Node::Sequence(accum),
                    multiplier: None,
                });
            }
            b')' => {
                return Err(Error::Parse("unmatched ')' in pattern".into()));
            }
            b'\\' => {
                let escaped = cursor
                    .bump()
                    .ok_or_else(|| Error::Parse("dangling escape at end of pattern".into()))?;
                accum.push(escaped);
            }
            b'{' | b'*' | b'+' | b'?' if accum.len() == 1 => {
                cursor.push_back(c);
                let multiplier = parse_multiplier(cursor, rng, max_random)?;
                return Ok(Expression {
                    node: Node::Sequence(accum),
                    multiplier,
                });
            }
            b'{' | b'*' | b'+' | b'?' if accum.len() > 1 => {
                let last = accum.pop().expect("len > 1 checked above");
                // Reprocess `last` followed by the multiplier token as the
                // next Expression; everything before `last` stands alone.
                cursor.push_back(c);
                cursor.push_back(last);
                return Ok(Expression {
                    node: Node::Sequence(accum),
                    multiplier: None,
                });
            }
            b'{' | b'*' | b'+' | b'?' => {
                return Err(Error::Parse("multiplier used without a preceding atom".into()));
            }
            other => accum.push(other),
        }
    }
}

fn parse_multiplier<R>(cursor: &mut Cursor, rng: &mut R, max_random: u32) -> Result<Option<Multiplier>>
where
    R: Rng + ?Sized,
{
    match cursor.peek() {
        Some(b'*') => {
            cursor.bump();
            Ok(Some(Multiplier::Random(RandomRing::new(rng, 0, max_random))))
        }
        Some(b'+') => {
            cursor.bump();
            Ok(Some(Multiplier::Random(RandomRing::new(rng, 1, max_random))))
        }
        Some(b'?') => {
            cursor.bump();
            Ok(Some(Multiplier::Random(RandomRing::new(rng, 0, 1))))
        }
        Some(b'{') => {
            cursor.bump();
            let mut digits = Vec::new();
            loop {
                match cursor.bump() {
                    Some(b'}') => break,
                    Some(d) if d.is_ascii_digit() => digits.push(d),
                    Some(other) => {
                        return Err(Error::Parse(format!(
                            "multiplier braces must contain only digits, found '{}'",
                            other as char
                        )))
                    }
                    None => return Err(Error::Parse("incomplete multiplier braces".into())),
                }
            }
            if digits.is_empty() {
                return Err(Error::Parse("empty multiplier braces".into()));
            }
            let text = std::str::from_utf8(&digits).expect("ascii digits are valid utf-8");
            let n: u32 = text
                .parse()
                .map_err(|_| Error::Parse(format!("multiplier must be a number, found '{text}'")))?;
            if n == 1 {
                Ok(None)
            } else {
                Ok(Some(Multiplier::Constant(n)))
            }
        }
        _ => Ok(None),
    }
}

fn parse_set<R>(cursor: &mut Cursor, rng: &mut R) -> Result<CharSet>
where
    R: Rng + ?Sized,
{
    let mut members: Vec<u8> = Vec::new();
    let mut last: Option<u8> = None;

    loop {
        let c = cursor
            .bump()
            .ok_or_else(|| Error::Parse("incomplete set description".into()))?;

        match c {
            b']' => {
                if last.is_none() {
                    return Err(Error::Parse("empty set description".into()));
                }
                let len = members.len() as u32;
                return Ok(CharSet {
                    pick: RandomRing::new(rng, 0, len - 1),
                    members,
                });
            }
            b'-' => {
                let lo = last.ok_or_else(|| Error::Parse("range with no start character".into()))?;
                let hi = cursor
                    .bump()
                    .ok_or_else(|| Error::Parse("incomplete range in set description".into()))?;
                if hi < lo {
                    return Err(Error::Parse(format!(
                        "invalid set range '{}'-'{}'",
                        lo as char, hi as char
                    )));
                }
                members.pop();
                members.extend(lo..=hi);
                last = Some(hi);
            }
            b'\\' => {
                let escaped = cursor
                    .bump()
                    .ok_or_else(|| Error::Parse("dangling escape in set description".into()))?;
                members.push(escaped);
                last = Some(escaped);
            }
            c if RESERVED_IN_SET.contains(&c) => {
                return Err(Error::Parse(format!(
                    "unescaped reserved character '{}' in set",
                    c as char
                )));
            }
            c => {
                members.push(c);
                last = Some(c);
            }
        }
    }
}
