//! # Token Source Contract
//!
//! The schema compiler and the validator consume JSON as a forward stream of
//! [`Token`]s. A token source reports structural boundaries, member keys and
//! scalar values together with their nesting depth, and can discard a whole
//! value without the consumer recursing into it.
//!
//! ## Depth Convention
//!
//! A token's `depth` is the number of containers enclosing it. A container's
//! start token and its matching end token carry the same depth, which is how
//! "scan this node's members" loops find their end.
//!
//! ## Look-ahead
//!
//! Token sources are `Clone`. A clone is an independent cursor at the same
//! position; consumers use it to run a look-ahead pass (type-info extraction,
//! canonicalizing a value) while the original cursor still has to walk it.

use std::borrow::Cow;

use crate::error::ParseError;
use crate::kind::Kind;

/// Structural role of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    ObjectStart,
    ObjectEnd,
    ArrayStart,
    ArrayEnd,
    /// An object member name.
    Key,
    /// A string, number or literal value.
    Scalar,
}

impl TokenKind {
    /// Returns true for tokens that open a container.
    pub fn opens(self) -> bool {
        matches!(self, TokenKind::ObjectStart | TokenKind::ArrayStart)
    }

    /// Returns true for tokens that close a container.
    pub fn closes(self) -> bool {
        matches!(self, TokenKind::ObjectEnd | TokenKind::ArrayEnd)
    }
}

/// One token pulled from a [`TokenSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    /// Structural role.
    pub kind: TokenKind,
    /// Kind of the value this token starts; `None` for keys and end tokens.
    pub value_kind: Option<Kind>,
    /// Raw input bytes. For strings and keys this is the undecoded content
    /// between the quotes; for numbers and literals, the literal text.
    pub raw: &'a [u8],
    /// Number of enclosing containers.
    pub depth: usize,
    /// Byte offset of the token in the input.
    pub offset: usize,
}

impl<'a> Token<'a> {
    /// Returns true if the token starts a value (scalar or container).
    pub fn starts_value(&self) -> bool {
        self.value_kind.is_some()
    }

    /// Returns true if this token closes the container opened by `start`.
    pub fn closes(&self, start: &Token<'a>) -> bool {
        self.kind.closes() && self.depth == start.depth
    }
}

/// A forward-only producer of JSON tokens.
pub trait TokenSource<'a>: Clone {
    /// Pull the next token, or `None` once the top-level value is complete
    /// and the input is exhausted.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] on malformed input, including trailing content
    /// after the top-level value.
    fn next_token(&mut self) -> Result<Option<Token<'a>>, ParseError>;

    /// Number of containers open at the current position.
    fn depth(&self) -> usize;

    /// Current byte offset.
    fn offset(&self) -> usize;

    /// Pull the next token, treating end of input as an error.
    fn expect_token(&mut self) -> Result<Token<'a>, ParseError> {
        let offset = self.offset();
        self.next_token()?
            .ok_or_else(|| ParseError::unexpected_end(offset))
    }

    /// Pull the next token, which must start a value.
    fn expect_value(&mut self) -> Result<Token<'a>, ParseError> {
        let token = self.expect_token()?;
        if !token.starts_value() {
            return Err(ParseError::new(token.offset, "expected a value"));
        }
        Ok(token)
    }

    /// Discard the remainder of the value started by `start`.
    ///
    /// A no-op for scalars. For containers, consumes tokens up to and
    /// including the matching end token without recursing.
    fn skip_opened(&mut self, start: &Token<'a>) -> Result<(), ParseError> {
        if !start.kind.opens() {
            return Ok(());
        }
        loop {
            let token = self.expect_token()?;
            if token.closes(start) {
                return Ok(());
            }
        }
    }

    /// Read and discard the next whole value.
    fn skip_value(&mut self) -> Result<(), ParseError> {
        let start = self.expect_value()?;
        self.skip_opened(&start)
    }

    /// Require that the input holds nothing after the top-level value.
    fn finish(&mut self) -> Result<(), ParseError> {
        match self.next_token()? {
            None => Ok(()),
            Some(token) => Err(ParseError::new(token.offset, "trailing content after value")),
        }
    }
}

/// Decode the raw content of a string or key token.
///
/// Borrows when the content has no escapes.
///
/// # Errors
///
/// Returns [`ParseError`] for invalid escapes, unpaired surrogates or
/// invalid UTF-8.
pub fn decode_string(raw: &[u8]) -> Result<Cow<'_, str>, ParseError> {
    if !raw.contains(&b'\\') {
        return std::str::from_utf8(raw)
            .map(Cow::Borrowed)
            .map_err(|e| ParseError::new(e.valid_up_to(), "invalid UTF-8 in string"));
    }

    let mut out = String::with_capacity(raw.len());
    let mut i = 0;
    while i < raw.len() {
        let start = i;
        while i < raw.len() && raw[i] != b'\\' {
            i += 1;
        }
        let chunk = std::str::from_utf8(&raw[start..i])
            .map_err(|e| ParseError::new(start + e.valid_up_to(), "invalid UTF-8 in string"))?;
        out.push_str(chunk);
        if i == raw.len() {
            break;
        }

        let escape = *raw
            .get(i + 1)
            .ok_or_else(|| ParseError::new(i, "unterminated escape"))?;
        i += 2;
        match escape {
            b'"' => out.push('"'),
            b'\\' => out.push('\\'),
            b'/' => out.push('/'),
            b'b' => out.push('\u{0008}'),
            b'f' => out.push('\u{000C}'),
            b'n' => out.push('\n'),
            b'r' => out.push('\r'),
            b't' => out.push('\t'),
            b'u' => {
                let high = read_hex4(raw, i)?;
                i += 4;
                let code = if (0xD800..0xDC00).contains(&high) {
                    if raw.get(i) != Some(&b'\\') || raw.get(i + 1) != Some(&b'u') {
                        return Err(ParseError::new(i, "unpaired surrogate"));
                    }
                    let low = read_hex4(raw, i + 2)?;
                    if !(0xDC00..0xE000).contains(&low) {
                        return Err(ParseError::new(i, "unpaired surrogate"));
                    }
                    i += 6;
                    0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00)
                } else if (0xDC00..0xE000).contains(&high) {
                    return Err(ParseError::new(i - 6, "unpaired surrogate"));
                } else {
                    high
                };
                let ch = char::from_u32(code)
                    .ok_or_else(|| ParseError::new(i, "invalid unicode escape"))?;
                out.push(ch);
            }
            _ => return Err(ParseError::new(i - 2, "invalid escape")),
        }
    }
    Ok(Cow::Owned(out))
}

fn read_hex4(raw: &[u8], at: usize) -> Result<u32, ParseError> {
    let digits = raw
        .get(at..at + 4)
        .ok_or_else(|| ParseError::new(at, "truncated unicode escape"))?;
    digits.iter().try_fold(0u32, |acc, &b| {
        let digit = (b as char)
            .to_digit(16)
            .ok_or_else(|| ParseError::new(at, "invalid unicode escape"))?;
        Ok(acc * 16 + digit)
    })
}

/// Parse the raw text of a number token into the host's native `f64`.
///
/// Magnitudes beyond the `f64` range saturate to an infinity of the same
/// sign, and underflow rounds to zero.
///
/// # Errors
///
/// Returns [`ParseError`] when the text is not a number.
pub fn parse_number(raw: &[u8], offset: usize) -> Result<f64, ParseError> {
    let text = std::str::from_utf8(raw).map_err(|_| ParseError::new(offset, "invalid number"))?;
    text.parse()
        .map_err(|_| ParseError::new(offset, "invalid number"))
}
