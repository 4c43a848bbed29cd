use std::char::REPLACEMENT_CHARACTER;

use crate::token::{Position, Token, TokenKind};

const HIGH_SURROGATES: std::ops::RangeInclusive<u32> = 0xD800..=0xDBFF;
const LOW_SURROGATES: std::ops::RangeInclusive<u32> = 0xDC00..=0xDFFF;

#[derive(Debug, Clone, PartialEq)]
pub struct ScannerErr {
    pub kind: ScannerErrKind,
    pub position: Position,
    pub lexeme: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScannerErrKind {
    UnexpectedEndOfSource,
    UnterminatedString,
    UnrecognisedSymbol,
    UnrecognisedKeyword,
    InvalidNumber,
    InvalidEscapeSequence,
}

/// Position-aware cursor over the source text, producing one token at a time.
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    source: &'a str,
    token_start: Position,
    current: Position,
}

impl<'a> Scanner<'a> {
    pub fn init(source: &'a str) -> Self {
        Self {
            source,
            token_start: Position::START,
            current: Position::START,
        }
    }

    /// Position of the next unconsumed character.
    pub fn position(&self) -> Position {
        self.current
    }

    /// Everything that has not been consumed yet.
    pub fn remaining(&self) -> &'a str {
        &self.source[self.current.offset..]
    }

    fn make_token(&mut self, kind: TokenKind) -> Token<'a> {
        let source = self.source;
        let start = self.token_start;
        self.token_start = self.current;

        Token::init(kind, start, &source[start.offset..self.current.offset])
    }

    fn make_err(&self, kind: ScannerErrKind, position: Position) -> ScannerErr {
        ScannerErr {
            kind,
            position,
            lexeme: self.source[self.token_start.offset..self.current.offset].to_string(),
        }
    }

    pub fn peek(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    pub fn advance(&mut self) -> Result<char, ScannerErr> {
        let c = self
            .peek()
            .ok_or_else(|| self.make_err(ScannerErrKind::UnexpectedEndOfSource, self.current))?;

        // Multi-byte characters move the offset by their encoded length but count as one column
        self.current.offset += c.len_utf8();
        if c == '\n' {
            self.current.line += 1;
            self.current.column = 1;
        } else {
            self.current.column += 1;
        }

        Ok(c)
    }

    pub fn skip_whitespace(&mut self) {
        while let Some(' ' | '\t' | '\r' | '\n') = self.peek() {
            // Cannot fail, a character was just peeked
            let _ = self.advance();
        }
    }

    pub fn is_at_end(&self) -> bool {
        self.current.offset >= self.source.len()
    }

    fn matches(&mut self, c: char) -> Result<bool, ScannerErr> {
        if self.peek() == Some(c) {
            self.advance()?;
            return Ok(true);
        }

        Ok(false)
    }

    fn matches_any(&mut self, chars: &[char]) -> Result<bool, ScannerErr> {
        for c in chars {
            if self.matches(*c)? {
                return Ok(true);
            }
        }

        Ok(false)
    }

    /// Consumes a run of ASCII digits, returning how many were consumed.
    fn digits(&mut self) -> Result<usize, ScannerErr> {
        let mut count = 0;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.advance()?;
            count += 1;
        }

        Ok(count)
    }

    fn number(&mut self, first: char) -> Result<Token<'a>, ScannerErr> {
        // A leading `-` must be followed by at least one digit
        if first == '-' && self.digits()? == 0 {
            return Err(self.make_err(ScannerErrKind::InvalidNumber, self.current));
        }
        self.digits()?;

        if self.matches('.')? && self.digits()? == 0 {
            return Err(self.make_err(ScannerErrKind::InvalidNumber, self.current));
        }

        // Scientific notation e.g. 10e5, 1E-3
        if self.matches_any(&['e', 'E'])? {
            self.matches_any(&['-', '+'])?;

            if self.digits()? == 0 {
                return Err(self.make_err(ScannerErrKind::InvalidNumber, self.current));
            }
        }

        if matches!(self.peek(), Some(c) if c.is_alphanumeric() || c == '_') {
            return Err(self.make_err(ScannerErrKind::InvalidNumber, self.current));
        }

        let lexeme = &self.source[self.token_start.offset..self.current.offset];
        let value = lexeme
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| self.make_err(ScannerErrKind::InvalidNumber, self.token_start))?;

        Ok(self.make_token(TokenKind::Number(value)))
    }

    /// Reads the four hex digits of a `\uXXXX` escape as a UTF-16 code unit.
    fn hex_unit(&mut self, escape_start: Position) -> Result<u32, ScannerErr> {
        let mut unit = 0;
        for _ in 0..4 {
            let digit = self
                .advance()?
                .to_digit(16)
                .ok_or_else(|| self.make_err(ScannerErrKind::InvalidEscapeSequence, escape_start))?;
            unit = unit * 16 + digit;
        }

        Ok(unit)
    }

    fn unicode_escape(&mut self, out: &mut String, escape_start: Position) -> Result<(), ScannerErr> {
        let mut unit = self.hex_unit(escape_start)?;

        loop {
            if !HIGH_SURROGATES.contains(&unit) {
                // Lone low surrogates cannot be stored in a `String`
                out.push(char::from_u32(unit).unwrap_or(REPLACEMENT_CHARACTER));
                return Ok(());
            }

            // A high surrogate only combines with a directly following `\u` escape
            if !self.remaining().starts_with("\\u") {
                out.push(REPLACEMENT_CHARACTER);
                return Ok(());
            }

            let second_start = self.current;
            self.advance()?;
            self.advance()?;
            let next = self.hex_unit(second_start)?;

            if LOW_SURROGATES.contains(&next) {
                let combined = 0x10000 + ((unit - 0xD800) << 10) + (next - 0xDC00);
                out.push(char::from_u32(combined).unwrap_or(REPLACEMENT_CHARACTER));
                return Ok(());
            }

            // Not a pair, the second escape is decoded on its own
            out.push(REPLACEMENT_CHARACTER);
            unit = next;
        }
    }

    fn escape(&mut self, out: &mut String, escape_start: Position) -> Result<(), ScannerErr> {
        let value = match self.advance()? {
            '"' => '"',
            '\\' => '\\',
            '/' => '/',
            'b' => '\x08',
            'f' => '\x0C',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'u' => return self.unicode_escape(out, escape_start),
            _ => {
                return Err(self.make_err(ScannerErrKind::InvalidEscapeSequence, escape_start));
            }
        };

        out.push(value);
        Ok(())
    }

    fn string(&mut self) -> Result<Token<'a>, ScannerErr> {
        let mut str_val = String::new();

        loop {
            let position = self.current;
            match self.advance()? {
                '"' => break,
                '\n' => return Err(self.make_err(ScannerErrKind::UnterminatedString, position)),
                '\\' => self.escape(&mut str_val, position)?,
                chr => str_val.push(chr),
            }
        }

        Ok(self.make_token(TokenKind::String(str_val)))
    }

    fn keyword(&mut self) -> Result<Token<'a>, ScannerErr> {
        while matches!(self.peek(), Some(c) if c.is_alphanumeric() || c == '_') {
            self.advance()?;
        }

        let keyword = &self.source[self.token_start.offset..self.current.offset];
        let kind = match keyword {
            "null" => TokenKind::Null,
            "true" => TokenKind::Bool(true),
            "false" => TokenKind::Bool(false),
            _ => Err(self.make_err(ScannerErrKind::UnrecognisedKeyword, self.token_start))?,
        };

        Ok(self.make_token(kind))
    }

    fn symbol(&mut self, c: char) -> Result<Token<'a>, ScannerErr> {
        let kind = match c {
            '{' => TokenKind::LCurlyBracket,
            '}' => TokenKind::RCurlyBracket,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            ':' => TokenKind::Colon,
            ',' => TokenKind::Comma,
            _ => Err(self.make_err(ScannerErrKind::UnrecognisedSymbol, self.token_start))?,
        };

        Ok(self.make_token(kind))
    }

    pub fn next_token(&mut self) -> Result<Option<Token<'a>>, ScannerErr> {
        self.skip_whitespace();

        if self.is_at_end() {
            return Ok(None);
        }

        self.token_start = self.current;

        let c = self.advance()?;

        if c.is_ascii_digit() || c == '-' {
            return self.number(c).map(Some);
        }

        if c.is_alphabetic() {
            return self.keyword().map(Some);
        }

        if c == '"' {
            return self.string().map(Some);
        }

        self.symbol(c).map(Some)
    }
}
