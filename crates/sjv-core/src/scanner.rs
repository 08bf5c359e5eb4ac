//! # Byte-Slice Scanner
//!
//! A strict RFC 8259 [`TokenSource`] over an in-memory document. The scanner
//! keeps an explicit container stack, so neither scanning nor skipping
//! recurses regardless of how deeply the input nests.

use crate::error::ParseError;
use crate::kind::Kind;
use crate::token::{Token, TokenKind, TokenSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    Object,
    Array,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Before the top-level value.
    Start,
    /// Right after `[`: a value or `]`.
    ArrayFirst,
    /// Right after `{`: a key or `}`.
    ObjectFirst,
    /// After `,` inside an object: a key.
    ObjectKey,
    /// After `:` or after `,` inside an array: a value.
    Value,
    /// After a complete value: `,`, a closing bracket, or end of input.
    AfterValue,
}

/// Token source over a UTF-8 JSON document held in memory.
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    input: &'a [u8],
    pos: usize,
    stack: Vec<Frame>,
    state: State,
}

impl<'a> Scanner<'a> {
    /// Scan a string slice.
    pub fn new(input: &'a str) -> Self {
        Self {
            input: input.as_bytes(),
            pos: 0,
            stack: Vec::new(),
            state: State::Start,
        }
    }

    /// Scan raw bytes, which must be valid UTF-8.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] if the bytes are not valid UTF-8.
    pub fn from_slice(input: &'a [u8]) -> Result<Self, ParseError> {
        let text = std::str::from_utf8(input)
            .map_err(|e| ParseError::new(e.valid_up_to(), "invalid UTF-8"))?;
        Ok(Self::new(text))
    }

    fn skip_whitespace(&mut self) {
        while let Some(b' ' | b'\t' | b'\n' | b'\r') = self.peek() {
            self.pos += 1;
        }
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn token(&self, kind: TokenKind, value_kind: Option<Kind>, start: usize, end: usize) -> Token<'a> {
        let input = self.input;
        Token {
            kind,
            value_kind,
            raw: &input[start..end],
            depth: self.stack.len(),
            offset: start,
        }
    }

    fn value(&mut self) -> Result<Token<'a>, ParseError> {
        let start = self.pos;
        let byte = self.peek().ok_or_else(|| ParseError::unexpected_end(start))?;
        match byte {
            b'{' => {
                let token = self.token(TokenKind::ObjectStart, Some(Kind::Object), start, start + 1);
                self.pos += 1;
                self.stack.push(Frame::Object);
                self.state = State::ObjectFirst;
                Ok(token)
            }
            b'[' => {
                let token = self.token(TokenKind::ArrayStart, Some(Kind::Array), start, start + 1);
                self.pos += 1;
                self.stack.push(Frame::Array);
                self.state = State::ArrayFirst;
                Ok(token)
            }
            b'"' => {
                let (content_start, content_end) = self.string()?;
                self.state = State::AfterValue;
                Ok(self.token(TokenKind::Scalar, Some(Kind::String), content_start, content_end))
            }
            b't' => self.literal(b"true", Kind::True),
            b'f' => self.literal(b"false", Kind::False),
            b'n' => self.literal(b"null", Kind::Null),
            b'-' | b'0'..=b'9' => {
                let end = self.number()?;
                self.state = State::AfterValue;
                Ok(self.token(TokenKind::Scalar, Some(Kind::Number), start, end))
            }
            _ => Err(ParseError::new(start, "expected a value")),
        }
    }

    fn literal(&mut self, text: &'static [u8], kind: Kind) -> Result<Token<'a>, ParseError> {
        let start = self.pos;
        let end = start + text.len();
        if self.input.get(start..end) != Some(text) {
            return Err(ParseError::new(start, "invalid literal"));
        }
        self.pos = end;
        self.state = State::AfterValue;
        Ok(self.token(TokenKind::Scalar, Some(kind), start, end))
    }

    /// Scan a string starting at the opening quote; returns the content span.
    fn string(&mut self) -> Result<(usize, usize), ParseError> {
        let open = self.pos;
        self.pos += 1;
        let content_start = self.pos;
        loop {
            let byte = self.peek().ok_or_else(|| ParseError::new(open, "unterminated string"))?;
            match byte {
                b'"' => {
                    let content_end = self.pos;
                    self.pos += 1;
                    return Ok((content_start, content_end));
                }
                b'\\' => {
                    let escape = self
                        .input
                        .get(self.pos + 1)
                        .copied()
                        .ok_or_else(|| ParseError::new(open, "unterminated string"))?;
                    match escape {
                        b'"' | b'\\' | b'/' | b'b' | b'f' | b'n' | b'r' | b't' => self.pos += 2,
                        b'u' => {
                            let hex = self
                                .input
                                .get(self.pos + 2..self.pos + 6)
                                .ok_or_else(|| ParseError::new(self.pos, "truncated unicode escape"))?;
                            if !hex.iter().all(u8::is_ascii_hexdigit) {
                                return Err(ParseError::new(self.pos, "invalid unicode escape"));
                            }
                            self.pos += 6;
                        }
                        _ => return Err(ParseError::new(self.pos, "invalid escape")),
                    }
                }
                0x00..=0x1F => return Err(ParseError::new(self.pos, "control character in string")),
                _ => self.pos += 1,
            }
        }
    }

    /// Scan a number per the JSON grammar; returns the end offset.
    fn number(&mut self) -> Result<usize, ParseError> {
        let start = self.pos;
        if self.peek() == Some(b'-') {
            self.pos += 1;
        }
        match self.peek() {
            Some(b'0') => self.pos += 1,
            Some(b'1'..=b'9') => self.digits(),
            _ => return Err(ParseError::new(start, "invalid number")),
        }
        if self.peek() == Some(b'.') {
            self.pos += 1;
            if !matches!(self.peek(), Some(b'0'..=b'9')) {
                return Err(ParseError::new(start, "invalid number"));
            }
            self.digits();
        }
        if let Some(b'e' | b'E') = self.peek() {
            self.pos += 1;
            if let Some(b'+' | b'-') = self.peek() {
                self.pos += 1;
            }
            if !matches!(self.peek(), Some(b'0'..=b'9')) {
                return Err(ParseError::new(start, "invalid number"));
            }
            self.digits();
        }
        Ok(self.pos)
    }

    fn digits(&mut self) {
        while let Some(b'0'..=b'9') = self.peek() {
            self.pos += 1;
        }
    }

    fn key(&mut self) -> Result<Token<'a>, ParseError> {
        if self.peek() != Some(b'"') {
            return Err(ParseError::new(self.pos, "expected a member name"));
        }
        let (content_start, content_end) = self.string()?;
        let token = self.token(TokenKind::Key, None, content_start, content_end);
        self.skip_whitespace();
        if self.peek() != Some(b':') {
            return Err(ParseError::new(self.pos, "expected ':' after member name"));
        }
        self.pos += 1;
        self.state = State::Value;
        Ok(token)
    }

    fn close(&mut self, frame: Frame) -> Token<'a> {
        let start = self.pos;
        self.pos += 1;
        self.stack.pop();
        self.state = State::AfterValue;
        let kind = match frame {
            Frame::Object => TokenKind::ObjectEnd,
            Frame::Array => TokenKind::ArrayEnd,
        };
        self.token(kind, None, start, start + 1)
    }
}

impl<'a> TokenSource<'a> for Scanner<'a> {
    fn next_token(&mut self) -> Result<Option<Token<'a>>, ParseError> {
        self.skip_whitespace();
        match self.state {
            State::Start | State::Value => self.value().map(Some),
            State::ArrayFirst => {
                if self.peek() == Some(b']') {
                    Ok(Some(self.close(Frame::Array)))
                } else {
                    self.value().map(Some)
                }
            }
            State::ObjectFirst => {
                if self.peek() == Some(b'}') {
                    Ok(Some(self.close(Frame::Object)))
                } else {
                    self.key().map(Some)
                }
            }
            State::ObjectKey => self.key().map(Some),
            State::AfterValue => {
                let Some(&frame) = self.stack.last() else {
                    return match self.peek() {
                        None => Ok(None),
                        Some(_) => Err(ParseError::new(self.pos, "trailing content after value")),
                    };
                };
                match (self.peek(), frame) {
                    (Some(b','), Frame::Array) => {
                        self.pos += 1;
                        self.state = State::Value;
                        self.skip_whitespace();
                        self.value().map(Some)
                    }
                    (Some(b','), Frame::Object) => {
                        self.pos += 1;
                        self.state = State::ObjectKey;
                        self.skip_whitespace();
                        self.key().map(Some)
                    }
                    (Some(b']'), Frame::Array) | (Some(b'}'), Frame::Object) => {
                        Ok(Some(self.close(frame)))
                    }
                    (None, _) => Err(ParseError::unexpected_end(self.pos)),
                    _ => Err(ParseError::new(self.pos, "expected ',' or closing bracket")),
                }
            }
        }
    }

    fn depth(&self) -> usize {
        self.stack.len()
    }

    fn offset(&self) -> usize {
        self.pos
    }
}
