//! Decoder for PHP's native serialization format.
//!
//! A cursor-based parser that rejects any structural drift: a string
//! whose declared byte length does not land on its closing quote, an
//! array whose declared count does not match its element list, or a
//! stream that ends before the declared structure is consumed. The
//! corrupted exports this crate repairs fail exactly these checks.

use super::{PhpKey, PhpValue};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum DecodeError {
    #[error("unexpected end of input at byte {0}")]
    UnexpectedEof(usize),

    #[error("unknown type tag '{tag}' at byte {pos}")]
    UnknownTag { tag: char, pos: usize },

    #[error("expected `{expected}` at byte {pos}")]
    Expected { expected: &'static str, pos: usize },

    #[error("invalid number at byte {0}")]
    InvalidNumber(usize),

    #[error("string length mismatch: declared {declared} bytes at byte {pos}")]
    StringLength { declared: usize, pos: usize },

    #[error("array key at byte {0} is not an integer or string")]
    InvalidKey(usize),

    #[error("trailing bytes after value at byte {0}")]
    TrailingBytes(usize),
}

/// Decode a complete PHP-serialized payload.
///
/// The whole input must be consumed; trailing bytes are an error. The
/// degenerate payload `b:0;` decodes to `Bool(false)` like any other
/// well-formed value.
pub fn decode(input: &[u8]) -> Result<PhpValue, DecodeError> {
    let mut cursor = Cursor { input, pos: 0 };
    let value = cursor.parse_value()?;
    if cursor.pos != input.len() {
        return Err(DecodeError::TrailingBytes(cursor.pos));
    }
    Ok(value)
}

struct Cursor<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn peek(&self) -> Result<u8, DecodeError> {
        self.input
            .get(self.pos)
            .copied()
            .ok_or(DecodeError::UnexpectedEof(self.pos))
    }

    fn bump(&mut self) -> Result<u8, DecodeError> {
        let b = self.peek()?;
        self.pos += 1;
        Ok(b)
    }

    fn expect(&mut self, literal: &'static str) -> Result<(), DecodeError> {
        let end = self.pos + literal.len();
        if end > self.input.len() {
            return Err(DecodeError::UnexpectedEof(self.input.len()));
        }
        if &self.input[self.pos..end] != literal.as_bytes() {
            return Err(DecodeError::Expected {
                expected: literal,
                pos: self.pos,
            });
        }
        self.pos = end;
        Ok(())
    }

    /// Read bytes up to the next `;`, exclusive, consuming the `;`
    fn until_semicolon(&mut self) -> Result<&'a [u8], DecodeError> {
        let start = self.pos;
        while self.peek()? != b';' {
            self.pos += 1;
        }
        let slice = &self.input[start..self.pos];
        self.pos += 1;
        Ok(slice)
    }

    fn parse_usize_until(&mut self, terminator: &'static str) -> Result<usize, DecodeError> {
        let start = self.pos;
        while self.peek()?.is_ascii_digit() {
            self.pos += 1;
        }
        if self.pos == start {
            return Err(DecodeError::InvalidNumber(start));
        }
        let digits = std::str::from_utf8(&self.input[start..self.pos])
            .map_err(|_| DecodeError::InvalidNumber(start))?;
        let n: usize = digits.parse().map_err(|_| DecodeError::InvalidNumber(start))?;
        self.expect(terminator)?;
        Ok(n)
    }

    fn parse_value(&mut self) -> Result<PhpValue, DecodeError> {
        let tag_pos = self.pos;
        let tag = self.bump()?;
        match tag {
            b'N' => {
                self.expect(";")?;
                Ok(PhpValue::Null)
            }
            b'b' => {
                self.expect(":")?;
                let v = match self.bump()? {
                    b'0' => false,
                    b'1' => true,
                    _ => return Err(DecodeError::InvalidNumber(self.pos - 1)),
                };
                self.expect(";")?;
                Ok(PhpValue::Bool(v))
            }
            b'i' => {
                self.expect(":")?;
                let start = self.pos;
                let digits = self.until_semicolon()?;
                let text = std::str::from_utf8(digits)
                    .map_err(|_| DecodeError::InvalidNumber(start))?;
                let n: i64 = text.parse().map_err(|_| DecodeError::InvalidNumber(start))?;
                Ok(PhpValue::Int(n))
            }
            b'd' => {
                self.expect(":")?;
                let start = self.pos;
                let body = self.until_semicolon()?;
                let text = std::str::from_utf8(body)
                    .map_err(|_| DecodeError::InvalidNumber(start))?;
                let f = match text {
                    "INF" => f64::INFINITY,
                    "-INF" => f64::NEG_INFINITY,
                    "NAN" => f64::NAN,
                    other => other.parse().map_err(|_| DecodeError::InvalidNumber(start))?,
                };
                Ok(PhpValue::Float(f))
            }
            b's' => {
                self.expect(":")?;
                let declared = self.parse_usize_until(":\"")?;
                let content_start = self.pos;
                // checked_add: a declared length near usize::MAX must not
                // wrap the bounds check into an out-of-range slice
                let content_end = content_start
                    .checked_add(declared)
                    .ok_or(DecodeError::UnexpectedEof(self.input.len()))?;
                if content_end > self.input.len() {
                    return Err(DecodeError::UnexpectedEof(self.input.len()));
                }
                let bytes = self.input[content_start..content_end].to_vec();
                self.pos = content_end;
                // The closing quote must land exactly where the declared
                // length says. A multi-byte character injected after the
                // length was computed shifts it and fails here.
                if self.expect("\";").is_err() {
                    return Err(DecodeError::StringLength {
                        declared,
                        pos: content_start,
                    });
                }
                Ok(PhpValue::Str(bytes))
            }
            b'a' => {
                self.expect(":")?;
                let count = self.parse_usize_until(":{")?;
                let mut entries = Vec::with_capacity(count.min(1024));
                for _ in 0..count {
                    let key_pos = self.pos;
                    let key = match self.parse_value()? {
                        PhpValue::Int(i) => PhpKey::Int(i),
                        PhpValue::Str(bytes) => PhpKey::Str(bytes),
                        _ => return Err(DecodeError::InvalidKey(key_pos)),
                    };
                    let value = self.parse_value()?;
                    entries.push((key, value));
                }
                self.expect("}")?;
                Ok(PhpValue::Array(entries))
            }
            other => Err(DecodeError::UnknownTag {
                tag: other as char,
                pos: tag_pos,
            }),
        }
    }
}
