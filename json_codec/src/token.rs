use std::fmt;

/// Location of a character in the source.
///
/// `offset` is a byte offset, `line` and `column` are 1-based and the column counts
/// Unicode scalars rather than bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub const START: Position = Position {
        offset: 0,
        line: 1,
        column: 1,
    };
}

impl Default for Position {
    fn default() -> Self {
        Self::START
    }
}

/// Lexemes borrow from the source text.
#[derive(Debug, Clone, PartialEq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub position: Position,
    pub lexeme: &'a str,
}

impl<'a> Token<'a> {
    pub fn init(kind: TokenKind, position: Position, lexeme: &'a str) -> Self {
        Self {
            kind,
            position,
            lexeme,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    LCurlyBracket,
    RCurlyBracket,

    LBracket,
    RBracket,

    Colon,
    Comma,

    String(String),
    Number(f64),
    Bool(bool),
    Null,
}

impl TokenKind {
    /// Whether two kinds are the same token type, ignoring any payload.
    pub fn same_kind(&self, other: &TokenKind) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::LCurlyBracket => f.write_str("'{'"),
            TokenKind::RCurlyBracket => f.write_str("'}'"),
            TokenKind::LBracket => f.write_str("'['"),
            TokenKind::RBracket => f.write_str("']'"),
            TokenKind::Colon => f.write_str("':'"),
            TokenKind::Comma => f.write_str("','"),
            TokenKind::String(_) => f.write_str("string"),
            TokenKind::Number(_) => f.write_str("number"),
            TokenKind::Bool(_) => f.write_str("boolean"),
            TokenKind::Null => f.write_str("null"),
        }
    }
}
