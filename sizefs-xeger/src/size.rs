//! The size parser (C6): decodes a filename like `1.5G-2K` into a byte
//! count.
//!
//! The grammar is fixed and small enough that a hand-written scanner is
//! clearer (and cheaper) than pulling in a general regex engine for it:
//!
//! ```text
//! ^([0-9]+(\.[0-9])?)([EPTGMKB])(([+\-])(\d+)([EPTGMKB]))?$
//! ```

use crate::error::{Error, Result};

/// Decimal (SI) byte multipliers, matching the grammar's unit letters.
fn unit_multiplier(unit: u8) -> Option<u64> {
    Some(match unit {
        b'B' => 1,
        b'K' => 1_000,
        b'M' => 1_000_000,
        b'G' => 1_000_000_000,
        b'T' => 1_000_000_000_000,
        b'P' => 1_000_000_000_000_000,
        b'E' => 1_000_000_000_000_000_000,
        _ => return None,
    })
}

struct Scanner<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let b = self.peek();
        if b.is_some() {
            self.pos += 1;
        }
        b
    }

    fn eat_digits(&mut self) -> &'a [u8] {
        let start = self.pos;
        while matches!(self.peek(), Some(b) if b.is_ascii_digit()) {
            self.pos += 1;
        }
        &self.bytes[start..self.pos]
    }

    fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }
}

fn digits_to_f64(digits: &[u8]) -> f64 {
    // `digits` is guaranteed ASCII digits by the caller.
    std::str::from_utf8(digits).unwrap().parse().unwrap_or(0.0)
}

fn digits_to_u64(digits: &[u8]) -> u64 {
    std::str::from_utf8(digits).unwrap().parse().unwrap_or(0)
}

/// Parse a size-encoded filename into its byte count, clamping negative
/// results to zero.
pub fn parse_size(name: &str) -> Result<u64> {
    if !name.is_ascii() {
        return Err(Error::BadFilename(name.to_string()));
    }
    let bytes = name.as_bytes();
    let mut scanner = Scanner::new(bytes);
    let bad = || Error::BadFilename(name.to_string());

    let int_part = scanner.eat_digits();
    if int_part.is_empty() {
        return Err(bad());
    }
    let mut magnitude = digits_to_f64(int_part);

    if scanner.peek() == Some(b'.') {
        scanner.bump();
        let frac = scanner.eat_digits();
        if frac.len() != 1 {
            return Err(bad());
        }
        magnitude += digits_to_f64(frac) / 10.0;
    }

    let size_unit = scanner.bump().and_then(unit_multiplier).ok_or_else(bad)?;
    let mut size = (magnitude * size_unit as f64) as i64;

    if matches!(scanner.peek(), Some(b'+') | Some(b'-')) {
        let sign = scanner.bump().expect("peeked above");
        let shift_digits = scanner.eat_digits();
        if shift_digits.is_empty() {
            return Err(bad());
        }
        let shift_unit = scanner.bump().and_then(unit_multiplier).ok_or_else(bad)?;
        let shift = digits_to_u64(shift_digits) as i64 * shift_unit as i64;
        size = if sign == b'-' { size - shift } else { size + shift };
    }

    if !scanner.at_end() {
        return Err(bad());
    }

    Ok(size.max(0) as u64)
}
