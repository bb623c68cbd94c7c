//! Hand-written single-pass tokenizer.
//!
//! The main dispatch looks at the current character (plus one character of
//! lookahead for `/`) and hands off to a focused method that consumes one
//! token. Comment, literal, and regexp bodies are scanned with `memchr`;
//! their terminators are all ASCII, so searching the UTF-8 bytes never
//! splits a character.
//!
//! Known approximations:
//! - every `/` that does not open a comment opens a regexp literal, so
//!   division is mis-lexed;
//! - an unterminated regexp stops before the end of its line.

use memchr::{memchr, memchr2, memchr3, memmem};

use crate::list::TokenList;
use crate::token::{Token, TokenKind};

/// Spaces a tab expands to unless configured otherwise.
pub const DEFAULT_TAB_WIDTH: usize = 4;

/// Tokenize `source` with the default tab width.
pub fn tokenize(source: &str) -> TokenList {
    Tokenizer::new().tokenize(source)
}

/// Tokenizer configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tokenizer {
    tab_width: usize,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Tokenizer {
            tab_width: DEFAULT_TAB_WIDTH,
        }
    }
}

impl Tokenizer {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_tab_width(mut self, tab_width: usize) -> Self {
        self.tab_width = tab_width;
        self
    }

    pub fn tab_width(&self) -> usize {
        self.tab_width
    }

    pub fn tokenize(&self, source: &str) -> TokenList {
        let mut scanner = Scanner {
            source,
            bytes: source.as_bytes(),
            pos: 0,
            tab_width: self.tab_width,
        };
        let mut tokens = TokenList::with_capacity(source.len() / 3);
        while let Some(token) = scanner.next_token() {
            tokens.push(token);
        }
        tokens
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_part(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

struct Scanner<'a> {
    source: &'a str,
    bytes: &'a [u8],
    /// Byte position of the next unconsumed character.
    pos: usize,
    tab_width: usize,
}

impl Scanner<'_> {
    #[inline]
    fn current(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    #[inline]
    fn byte_at(&self, pos: usize) -> Option<u8> {
        self.bytes.get(pos).copied()
    }

    fn next_token(&mut self) -> Option<Token> {
        loop {
            let c = self.current()?;
            let start = self.pos;
            let token = match c {
                // Carriage returns are dropped; `\n` alone marks a line.
                '\r' => {
                    self.pos += 1;
                    continue;
                }
                '\n' => self.line_feed(),
                ' ' | '\t' => self.whitespace(),
                '/' => match self.byte_at(start + 1) {
                    Some(b'*') => self.block_comment(start),
                    Some(b'/') => self.line_comment(start),
                    _ => self.regexp(start),
                },
                '"' | '\'' => self.quoted(start, c),
                '(' => self.single(start, TokenKind::BracketLeftParen),
                ')' => self.single(start, TokenKind::BracketRightParen),
                '[' => self.single(start, TokenKind::BracketLeftSquare),
                ']' => self.single(start, TokenKind::BracketRightSquare),
                '{' => self.single(start, TokenKind::BracketLeftBrace),
                '}' => self.single(start, TokenKind::BracketRightBrace),
                '.' => self.single(start, TokenKind::Point),
                ';' => self.single(start, TokenKind::Semicolon),
                '=' => self.single(start, TokenKind::EqualSign),
                ',' => self.single(start, TokenKind::Comma),
                ':' => self.single(start, TokenKind::Colon),
                '*' => self.single(start, TokenKind::Asterisk),
                c if is_ident_start(c) => self.identifier(start),
                _ => self.single(start, TokenKind::Unknown),
            };
            return Some(token);
        }
    }

    // ─── Single characters ──────────────────────────────────────────

    fn single(&mut self, start: usize, kind: TokenKind) -> Token {
        let len = self.current().map_or(1, char::len_utf8);
        self.pos += len;
        Token::new(kind, &self.source[start..self.pos])
    }

    fn line_feed(&mut self) -> Token {
        self.pos += 1;
        if self.byte_at(self.pos) == Some(b'\r') {
            self.pos += 1;
        }
        Token::line_feed()
    }

    // ─── Whitespace ─────────────────────────────────────────────────

    fn whitespace(&mut self) -> Token {
        let mut text = String::new();
        loop {
            match self.byte_at(self.pos) {
                Some(b' ') => text.push(' '),
                Some(b'\t') => text.extend(std::iter::repeat(' ').take(self.tab_width)),
                _ => break,
            }
            self.pos += 1;
        }
        Token::new(TokenKind::Whitespace, text)
    }

    // ─── Identifiers ────────────────────────────────────────────────

    fn identifier(&mut self, start: usize) -> Token {
        let mut chars = self.source[start..].chars();
        let mut end = start;
        if let Some(first) = chars.next() {
            end += first.len_utf8();
        }
        for c in chars {
            if !is_ident_part(c) {
                break;
            }
            end += c.len_utf8();
        }
        self.pos = end;
        Token::code(&self.source[start..end])
    }

    // ─── Comments ───────────────────────────────────────────────────

    fn block_comment(&mut self, start: usize) -> Token {
        let body = start + 2;
        self.pos = match memmem::find(&self.bytes[body..], b"*/") {
            Some(i) => body + i + 2,
            None => self.bytes.len(),
        };
        Token::new(TokenKind::Comment, &self.source[start..self.pos])
    }

    /// Line comments own their terminating `\n`; a `\r` right after it is
    /// swallowed.
    fn line_comment(&mut self, start: usize) -> Token {
        let end = match memchr(b'\n', &self.bytes[start..]) {
            Some(i) => start + i + 1,
            None => self.bytes.len(),
        };
        self.pos = end;
        if self.byte_at(end) == Some(b'\r') {
            self.pos += 1;
        }
        Token::new(TokenKind::LineComment, &self.source[start..end])
    }

    // ─── Literals ───────────────────────────────────────────────────

    /// Quoted literal. A backslash escapes the byte after it.
    fn quoted(&mut self, start: usize, quote: char) -> Token {
        let mut pos = start + 1;
        // `quote` is ASCII: either `"` or `'`.
        let quote = quote as u8;
        self.pos = loop {
            match memchr2(quote, b'\\', &self.bytes[pos..]) {
                Some(i) if self.bytes[pos + i] == b'\\' => {
                    pos = (pos + i + 2).min(self.bytes.len());
                }
                Some(i) => break pos + i + 1,
                None => break self.bytes.len(),
            }
        };
        Token::new(TokenKind::CodeLiteral, &self.source[start..self.pos])
    }

    /// Regexp literal from `/` to the next unescaped `/`.
    ///
    /// Regexp literals cannot span lines; without a closing `/` on the same
    /// line the token ends before the line feed.
    fn regexp(&mut self, start: usize) -> Token {
        let mut pos = start + 1;
        self.pos = loop {
            match memchr3(b'/', b'\\', b'\n', &self.bytes[pos..]) {
                Some(i) => match self.bytes[pos + i] {
                    b'/' => break pos + i + 1,
                    b'\n' => break pos + i,
                    _ => pos = (pos + i + 2).min(self.bytes.len()),
                },
                None => break self.bytes.len(),
            }
        };
        Token::new(TokenKind::Regexp, &self.source[start..self.pos])
    }
}
