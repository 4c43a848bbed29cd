use thiserror::Error;

use crate::{
    json_value::{JsonValue, Map},
    scanner::{Scanner, ScannerErr, ScannerErrKind},
    token::{Position, Token, TokenKind},
};

#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind} at line {line} column {column}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    /// Byte offset of the failure.
    pub offset: usize,
    pub line: usize,
    pub column: usize,
    pub lexeme: String,
}

impl ParseError {
    fn new(kind: ParseErrorKind, position: Position, lexeme: &str) -> Self {
        Self {
            kind,
            offset: position.offset,
            line: position.line,
            column: position.column,
            lexeme: lexeme.to_string(),
        }
    }

    fn position(&self) -> Position {
        Position {
            offset: self.offset,
            line: self.line,
            column: self.column,
        }
    }

    /// Human-readable description without the location.
    pub fn reason(&self) -> String {
        self.kind.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseErrorKind {
    // Scanner specific errors
    #[error("unterminated string")]
    UnterminatedString,
    #[error("unexpected character")]
    UnrecognisedSymbol,
    #[error("unrecognised keyword")]
    UnrecognisedKeyword,
    #[error("invalid number literal")]
    InvalidNumber,
    #[error("invalid escape sequence")]
    InvalidEscapeSequence,

    // Parser specific errors
    #[error("expected end of input")]
    ExpectedEndOfSource,
    #[error("expected {0}")]
    ExpectedToken(TokenKind),
    #[error("unexpected token")]
    UnexpectedToken,

    // Both
    #[error("unexpected end of input")]
    UnexpectedEndOfSource,
}

impl From<ScannerErr> for ParseError {
    fn from(err: ScannerErr) -> Self {
        let kind = match err.kind {
            ScannerErrKind::UnexpectedEndOfSource => ParseErrorKind::UnexpectedEndOfSource,
            ScannerErrKind::UnterminatedString => ParseErrorKind::UnterminatedString,
            ScannerErrKind::UnrecognisedSymbol => ParseErrorKind::UnrecognisedSymbol,
            ScannerErrKind::UnrecognisedKeyword => ParseErrorKind::UnrecognisedKeyword,
            ScannerErrKind::InvalidNumber => ParseErrorKind::InvalidNumber,
            ScannerErrKind::InvalidEscapeSequence => ParseErrorKind::InvalidEscapeSequence,
        };

        Self::new(kind, err.position, &err.lexeme)
    }
}

/// Failure of the throwing entry points, which only keep the message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct DeserializeError {
    reason: String,
}

impl DeserializeError {
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl From<ParseError> for DeserializeError {
    fn from(err: ParseError) -> Self {
        Self {
            reason: err.to_string(),
        }
    }
}

/// Snapshot of how far the parser got through its input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserState {
    position: Position,
}

impl ParserState {
    /// Byte offset into the input.
    pub fn offset(&self) -> usize {
        self.position.offset
    }

    pub fn line(&self) -> usize {
        self.position.line
    }

    pub fn column(&self) -> usize {
        self.position.column
    }
}

/// Result of [`parse`]: the value plus whatever input followed it, or the error and where
/// the parser stopped.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome<'a> {
    Success { value: JsonValue, rest: &'a str },
    Error { error: ParseError, state: ParserState },
}

impl<'a> ParseOutcome<'a> {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn into_result(self) -> Result<(JsonValue, &'a str), ParseError> {
        match self {
            Self::Success { value, rest } => Ok((value, rest)),
            Self::Error { error, .. } => Err(error),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Parser<'a> {
    scanner: Scanner<'a>,

    // Tokens are scanned lazily so nothing past the value is consumed
    peeked: Option<Token<'a>>,
}

impl<'a> Parser<'a> {
    pub fn init(source: &'a str) -> Self {
        Self {
            scanner: Scanner::init(source),
            peeked: None,
        }
    }

    /// Parses a complete document, rejecting anything but whitespace after the value.
    pub fn parse(source: &'a str) -> Result<JsonValue, ParseError> {
        let mut parser = Parser::init(source);
        let value = parser.value()?;

        parser.scanner.skip_whitespace();
        let start = parser.scanner.position();

        // Trailing input is reported as such even when it does not scan as a token
        let end = match parser.scanner.next_token() {
            Ok(None) => return Ok(value),
            Ok(Some(token)) => token.position.offset + token.lexeme.len(),
            Err(_) => parser.scanner.position().offset,
        };

        Err(ParseError::new(
            ParseErrorKind::ExpectedEndOfSource,
            start,
            &source[start.offset..end],
        ))
    }

    fn make_err(&self, kind: ParseErrorKind, token: &Token) -> ParseError {
        ParseError::new(kind, token.position, token.lexeme)
    }

    fn peek(&mut self) -> Result<&Token<'a>, ParseError> {
        if self.peeked.is_none() {
            self.peeked = self.scanner.next_token()?;
        }

        let end = self.scanner.position();
        self.peeked
            .as_ref()
            .ok_or_else(|| ParseError::new(ParseErrorKind::UnexpectedEndOfSource, end, ""))
    }

    fn advance(&mut self) -> Result<Token<'a>, ParseError> {
        self.peek()?;
        let end = self.scanner.position();
        self.peeked
            .take()
            .ok_or_else(|| ParseError::new(ParseErrorKind::UnexpectedEndOfSource, end, ""))
    }

    fn check(&mut self, kind: &TokenKind) -> Result<bool, ParseError> {
        Ok(self.peek()?.kind.same_kind(kind))
    }

    fn consume(&mut self, kind: TokenKind) -> Result<(), ParseError> {
        let token = self.advance()?;
        if token.kind.same_kind(&kind) {
            return Ok(());
        }

        Err(self.make_err(ParseErrorKind::ExpectedToken(kind), &token))
    }

    fn value(&mut self) -> Result<JsonValue, ParseError> {
        let token = self.advance()?;
        match token.kind {
            TokenKind::LCurlyBracket => self.object(),
            TokenKind::LBracket => self.array(),
            TokenKind::String(val) => Ok(JsonValue::String(val)),
            TokenKind::Number(val) => Ok(JsonValue::Number(val)),
            TokenKind::Bool(val) => Ok(JsonValue::Bool(val)),
            TokenKind::Null => Ok(JsonValue::Null),
            _ => Err(self.make_err(ParseErrorKind::UnexpectedToken, &token)),
        }
    }

    // Opening bracket has already been consumed
    fn array(&mut self) -> Result<JsonValue, ParseError> {
        let mut elems = Vec::new();

        if self.check(&TokenKind::RBracket)? {
            self.advance()?;
            return Ok(JsonValue::Array(elems));
        }

        // After a comma another value is required, so a trailing comma fails in `value`
        loop {
            elems.push(self.value()?);

            let token = self.advance()?;
            match token.kind {
                TokenKind::Comma => continue,
                TokenKind::RBracket => break,
                _ => {
                    return Err(
                        self.make_err(ParseErrorKind::ExpectedToken(TokenKind::RBracket), &token)
                    );
                }
            }
        }

        Ok(JsonValue::Array(elems))
    }

    // Opening bracket has already been consumed
    fn object(&mut self) -> Result<JsonValue, ParseError> {
        let mut props = Map::new();

        if self.check(&TokenKind::RCurlyBracket)? {
            self.advance()?;
            return Ok(JsonValue::Object(props));
        }

        loop {
            let token = self.advance()?;
            let name = match token.kind {
                TokenKind::String(name) => name,
                _ => return Err(self.make_err(ParseErrorKind::UnexpectedToken, &token)),
            };

            self.consume(TokenKind::Colon)?;

            // Last occurrence of a key wins
            let value = self.value()?;
            props.insert(name, value);

            let token = self.advance()?;
            match token.kind {
                TokenKind::Comma => continue,
                TokenKind::RCurlyBracket => break,
                _ => {
                    return Err(self.make_err(
                        ParseErrorKind::ExpectedToken(TokenKind::RCurlyBracket),
                        &token,
                    ));
                }
            }
        }

        Ok(JsonValue::Object(props))
    }
}

/// Parses one value from the start of `source`, reporting the unconsumed remainder on
/// success and the line and column of the failure otherwise.
pub fn parse(source: &str) -> ParseOutcome<'_> {
    let mut parser = Parser::init(source);

    match parser.value() {
        Ok(value) => {
            parser.scanner.skip_whitespace();
            let rest = parser.scanner.remaining();
            tracing::trace!(consumed = source.len() - rest.len(), "parsed JSON value");

            ParseOutcome::Success { value, rest }
        }
        Err(error) => {
            tracing::debug!(line = error.line, column = error.column, %error, "failed to parse JSON");

            // The snapshot points at the failure, not at how far the scanner read
            let state = ParserState {
                position: error.position(),
            };

            ParseOutcome::Error { error, state }
        }
    }
}

/// Parses a complete document from text.
pub fn from_str(source: &str) -> Result<JsonValue, DeserializeError> {
    Parser::parse(source).map_err(|error| {
        tracing::debug!(%error, "failed to deserialize JSON");
        DeserializeError::from(error)
    })
}

/// Parses a complete document from UTF-8 encoded bytes.
pub fn deserialize(bytes: &[u8]) -> Result<JsonValue, DeserializeError> {
    let source = std::str::from_utf8(bytes).map_err(|err| DeserializeError {
        reason: format!("input is not valid UTF-8 at byte {}", err.valid_up_to()),
    })?;

    from_str(source)
}
