//! Lexer for GDQL.
//!
//! Produces a finite token stream with source positions. Lexing is total:
//! irregular input becomes [`TokenKind::Illegal`] tokens rather than errors,
//! and the parser turns those into diagnostics.

use super::token::{lookup_keyword, Position, Token, TokenKind};

/// ASCII and common Unicode double quotes. Word processors and some shells
/// substitute curly quotes; any opener matches any closer.
fn is_quote(ch: char) -> bool {
    matches!(
        ch,
        '"' | '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{201F}' | '\u{FF02}'
    )
}

fn is_duration_unit(s: &str) -> bool {
    matches!(
        s,
        "min" | "mins" | "minute" | "minutes" | "sec" | "secs" | "second" | "seconds"
    )
}

pub struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    col: usize,
    peeked: Option<Token>,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            col: 1,
            peeked: None,
        }
    }

    /// Return the next token and advance. Idempotent at end of input:
    /// repeated calls keep returning EOF.
    pub fn next_token(&mut self) -> Token {
        if let Some(t) = self.peeked.take() {
            return t;
        }
        self.scan_token()
    }

    /// Return the next token without consuming it.
    pub fn peek_token(&mut self) -> Token {
        if let Some(t) = &self.peeked {
            return t.clone();
        }
        let t = self.scan_token();
        self.peeked = Some(t.clone());
        t
    }

    /// Current source position (of the next unread character).
    pub fn position(&self) -> Position {
        Position {
            line: self.line,
            column: self.col,
            offset: self.pos,
        }
    }

    fn current(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_char(&self) -> Option<char> {
        self.chars.get(self.pos + 1).copied()
    }

    fn advance(&mut self) {
        if let Some(ch) = self.current() {
            if ch == '\n' {
                self.line += 1;
                self.col = 1;
            } else {
                self.col += 1;
            }
            self.pos += 1;
        }
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.current(), Some(' ' | '\t' | '\r' | '\n')) {
            self.advance();
        }
    }

    fn scan_token(&mut self) -> Token {
        loop {
            self.skip_whitespace();

            // -- line comment
            if self.current() == Some('-') && self.peek_char() == Some('-') {
                while let Some(ch) = self.current() {
                    if ch == '\n' {
                        break;
                    }
                    self.advance();
                }
                continue;
            }

            let pos = self.position();
            let Some(ch) = self.current() else {
                return Token::new(TokenKind::Eof, "", pos);
            };

            // A backslash immediately before a quote is shell residue
            // (`\"` from PowerShell or bash); drop it and re-examine.
            if ch == '\\' && self.peek_char().is_some_and(is_quote) {
                self.advance();
                continue;
            }

            return match ch {
                ';' => self.single(TokenKind::Semicolon, ";", pos),
                ',' => self.single(TokenKind::Comma, ",", pos),
                '/' => self.single(TokenKind::Slash, "/", pos),
                '(' => self.single(TokenKind::LParen, "(", pos),
                ')' => self.single(TokenKind::RParen, ")", pos),
                '=' => self.single(TokenKind::Eq, "=", pos),
                '-' => self.single(TokenKind::Minus, "-", pos),
                '!' => {
                    if self.peek_char() == Some('=') {
                        self.double(TokenKind::NotEq, "!=", pos)
                    } else {
                        self.single(TokenKind::Illegal, "!", pos)
                    }
                }
                '<' => {
                    if self.peek_char() == Some('=') {
                        self.double(TokenKind::LtEq, "<=", pos)
                    } else {
                        self.single(TokenKind::Lt, "<", pos)
                    }
                }
                '>' => match self.peek_char() {
                    Some('=') => self.double(TokenKind::GtEq, ">=", pos),
                    Some('>') => self.double(TokenKind::GtGt, ">>", pos),
                    _ => self.single(TokenKind::Gt, ">", pos),
                },
                '~' => {
                    if self.peek_char() == Some('>') {
                        self.double(TokenKind::TildeGt, "~>", pos)
                    } else {
                        self.single(TokenKind::Illegal, "~", pos)
                    }
                }
                '\\' => self.single(TokenKind::Illegal, "\\", pos),
                c if is_quote(c) => self.scan_string(pos),
                c if c.is_alphabetic() || c == '_' => self.scan_word(pos),
                c if c.is_ascii_digit() => self.scan_number_or_duration(pos),
                c => {
                    self.advance();
                    Token::new(TokenKind::Illegal, c.to_string(), pos)
                }
            };
        }
    }

    fn single(&mut self, kind: TokenKind, literal: &str, pos: Position) -> Token {
        self.advance();
        Token::new(kind, literal, pos)
    }

    fn double(&mut self, kind: TokenKind, literal: &str, pos: Position) -> Token {
        self.advance();
        self.advance();
        Token::new(kind, literal, pos)
    }

    fn scan_string(&mut self, start: Position) -> Token {
        self.advance(); // opening quote
        let mut s = String::new();
        loop {
            match self.current() {
                None => return Token::new(TokenKind::Illegal, "unterminated string", start),
                Some(ch) if is_quote(ch) => {
                    self.advance();
                    return Token::new(TokenKind::Str, s, start);
                }
                Some('\\') if self.peek_char().is_some_and(is_quote) => {
                    // `\"` inside the string closes it: the backslash was
                    // put there by the shell, not the user.
                    self.advance();
                    self.advance();
                    return Token::new(TokenKind::Str, s, start);
                }
                Some('\\') => {
                    self.advance();
                    match self.current() {
                        Some('n') => s.push('\n'),
                        Some('t') => s.push('\t'),
                        Some(c @ ('"' | '\\')) => s.push(c),
                        Some(c) => {
                            s.push('\\');
                            s.push(c);
                        }
                        None => {
                            return Token::new(TokenKind::Illegal, "unterminated string", start)
                        }
                    }
                    self.advance();
                }
                Some(ch) => {
                    s.push(ch);
                    self.advance();
                }
            }
        }
    }

    fn scan_word(&mut self, start: Position) -> Token {
        let mut s = String::new();
        while let Some(ch) = self.current() {
            if ch.is_alphanumeric() || ch == '_' || ch == '.' {
                s.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        match lookup_keyword(&s.to_uppercase()) {
            Some(kind) => Token::new(kind, s, start),
            // No free identifiers in the grammar; the parser reads the
            // literal of illegal words for era aliases and output formats.
            None => Token::new(TokenKind::Illegal, s, start),
        }
    }

    fn scan_number_or_duration(&mut self, start: Position) -> Token {
        let mut digits = String::new();
        while let Some(ch) = self.current() {
            if ch.is_ascii_digit() {
                digits.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        // `20 min`: a unit word may follow after spaces. Only the closed
        // unit set counts; anything else stays a plain number.
        if self.current() == Some(' ') {
            let mut next = self.pos;
            while self.chars.get(next) == Some(&' ') {
                next += 1;
            }
            let rest: String = self.chars[next..]
                .iter()
                .take_while(|c| c.is_alphabetic())
                .collect::<String>()
                .to_lowercase();
            if is_duration_unit(&rest) {
                while self.current() == Some(' ') {
                    self.advance();
                }
                let mut lit = digits;
                while let Some(ch) = self.current() {
                    if ch.is_alphabetic() {
                        lit.push(ch);
                        self.advance();
                    } else {
                        break;
                    }
                }
                return Token::new(TokenKind::Duration, lit, start);
            }
        }

        // `20min`: unit word attached directly.
        if self.current().is_some_and(|c| c.is_alphabetic()) {
            let mut full = digits.clone();
            while let Some(ch) = self.current() {
                if ch.is_alphabetic() {
                    full.push(ch);
                    self.advance();
                } else {
                    break;
                }
            }
            let suffix = full[digits.len()..].to_lowercase();
            if is_duration_unit(&suffix) {
                return Token::new(TokenKind::Duration, full, start);
            }
            return Token::new(TokenKind::Number, digits, start);
        }

        Token::new(TokenKind::Number, digits, start)
    }
}
