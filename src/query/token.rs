//! Token types for the GDQL lexer.

use std::fmt;

/// A source position: 1-based line and column, plus the character offset
/// into the query string (used to place the caret in diagnostics).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

/// A token produced by the lexer. The literal carries the raw text for
/// kinds that need it (strings, numbers, durations, and identifier-like
/// words that are not reserved, such as era aliases and order fields).
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub literal: String,
    pub pos: Position,
}

impl Token {
    pub fn new(kind: TokenKind, literal: impl Into<String>, pos: Position) -> Self {
        Self {
            kind,
            literal: literal.into(),
            pos,
        }
    }
}

/// The kind of token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Eof,
    Illegal,

    // Keywords
    Shows,
    Songs,
    Performances,
    Setlist,
    From,
    Where,
    With,
    Written,
    Order,
    By,
    Limit,
    As,
    And,
    Or,
    Not,
    Of,
    Into,
    Then,
    Tease,
    Set1,
    Set2,
    Set3,
    Encore,
    Opened,
    Closed,
    Lyrics,
    Length,
    First,
    Last,
    Count,
    Distinct,
    Played,
    Guest,
    For,
    Asc,
    Desc,

    // Literals
    Str,
    Number,
    Duration,

    // Operators
    Gt,      // >
    GtGt,    // >>
    TildeGt, // ~>
    Eq,      // =
    Lt,      // <
    GtEq,    // >=
    LtEq,    // <=
    NotEq,   // !=
    Minus,   // - (date ranges)

    // Delimiters
    LParen,
    RParen,
    Comma,
    Semicolon,
    Slash, // / (dates, e.g. 5/8/77)
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TokenKind::Eof => "<eof>",
            TokenKind::Illegal => "<illegal>",
            TokenKind::Shows => "SHOWS",
            TokenKind::Songs => "SONGS",
            TokenKind::Performances => "PERFORMANCES",
            TokenKind::Setlist => "SETLIST",
            TokenKind::From => "FROM",
            TokenKind::Where => "WHERE",
            TokenKind::With => "WITH",
            TokenKind::Written => "WRITTEN",
            TokenKind::Order => "ORDER",
            TokenKind::By => "BY",
            TokenKind::Limit => "LIMIT",
            TokenKind::As => "AS",
            TokenKind::And => "AND",
            TokenKind::Or => "OR",
            TokenKind::Not => "NOT",
            TokenKind::Of => "OF",
            TokenKind::Into => "INTO",
            TokenKind::Then => "THEN",
            TokenKind::Tease => "TEASE",
            TokenKind::Set1 => "SET1",
            TokenKind::Set2 => "SET2",
            TokenKind::Set3 => "SET3",
            TokenKind::Encore => "ENCORE",
            TokenKind::Opened => "OPENED",
            TokenKind::Closed => "CLOSED",
            TokenKind::Lyrics => "LYRICS",
            TokenKind::Length => "LENGTH",
            TokenKind::First => "FIRST",
            TokenKind::Last => "LAST",
            TokenKind::Count => "COUNT",
            TokenKind::Distinct => "DISTINCT",
            TokenKind::Played => "PLAYED",
            TokenKind::Guest => "GUEST",
            TokenKind::For => "FOR",
            TokenKind::Asc => "ASC",
            TokenKind::Desc => "DESC",
            TokenKind::Str => "<string>",
            TokenKind::Number => "<number>",
            TokenKind::Duration => "<duration>",
            TokenKind::Gt => ">",
            TokenKind::GtGt => ">>",
            TokenKind::TildeGt => "~>",
            TokenKind::Eq => "=",
            TokenKind::Lt => "<",
            TokenKind::GtEq => ">=",
            TokenKind::LtEq => "<=",
            TokenKind::NotEq => "!=",
            TokenKind::Minus => "-",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::Comma => ",",
            TokenKind::Semicolon => ";",
            TokenKind::Slash => "/",
        };
        f.write_str(s)
    }
}

/// Classify an identifier-like word against the keyword table. The language
/// has no free identifiers, so anything unlisted is `None` and the lexer
/// reports it as an illegal token (the parser may still read its literal,
/// e.g. for era aliases and output formats).
pub fn lookup_keyword(upper: &str) -> Option<TokenKind> {
    let kind = match upper {
        "SHOWS" => TokenKind::Shows,
        "SONGS" => TokenKind::Songs,
        "PERFORMANCES" => TokenKind::Performances,
        "SETLIST" => TokenKind::Setlist,
        "FROM" => TokenKind::From,
        "WHERE" => TokenKind::Where,
        "WITH" => TokenKind::With,
        "WRITTEN" => TokenKind::Written,
        "ORDER" => TokenKind::Order,
        "BY" => TokenKind::By,
        "LIMIT" => TokenKind::Limit,
        "AS" => TokenKind::As,
        "AND" => TokenKind::And,
        "OR" => TokenKind::Or,
        "NOT" => TokenKind::Not,
        "OF" => TokenKind::Of,
        "INTO" => TokenKind::Into,
        "THEN" => TokenKind::Then,
        "TEASE" => TokenKind::Tease,
        "SET1" => TokenKind::Set1,
        "SET2" => TokenKind::Set2,
        "SET3" => TokenKind::Set3,
        "ENCORE" => TokenKind::Encore,
        "OPENED" => TokenKind::Opened,
        "CLOSED" => TokenKind::Closed,
        "LYRICS" => TokenKind::Lyrics,
        "LENGTH" => TokenKind::Length,
        "FIRST" => TokenKind::First,
        "LAST" => TokenKind::Last,
        "COUNT" => TokenKind::Count,
        "DISTINCT" => TokenKind::Distinct,
        "PLAYED" => TokenKind::Played,
        "GUEST" => TokenKind::Guest,
        "FOR" => TokenKind::For,
        "ASC" => TokenKind::Asc,
        "DESC" => TokenKind::Desc,
        _ => return None,
    };
    Some(kind)
}
