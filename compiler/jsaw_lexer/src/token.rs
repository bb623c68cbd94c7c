//! Token, marker, and item types.
//!
//! Tokens are owned values. Copying a token into a second list clones its
//! text, so no two list positions ever share a buffer and rewriting one list
//! can never leak into another.

use std::fmt;

/// Lexical category of a [`Token`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// `/* ... */`, delimiters included.
    Comment,
    /// `// ...` up to and including the terminating line feed.
    LineComment,
    /// A single `\n`.
    LineFeed,
    /// A run of spaces (tabs already expanded).
    Whitespace,
    BracketLeftParen,
    BracketRightParen,
    BracketLeftSquare,
    BracketRightSquare,
    BracketLeftBrace,
    BracketRightBrace,
    /// Identifier or keyword.
    Code,
    /// Quoted string literal, quotes included.
    CodeLiteral,
    Semicolon,
    Point,
    EqualSign,
    Comma,
    Colon,
    /// `/.../` literal. Division is not told apart from a regexp.
    Regexp,
    /// Any other single character (operators, digits, ...).
    Unknown,
    Asterisk,
}

impl TokenKind {
    /// Short, stable name used by token dumps.
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Comment => "comment",
            TokenKind::LineComment => "line-comment",
            TokenKind::LineFeed => "lf",
            TokenKind::Whitespace => "ws",
            TokenKind::BracketLeftParen => "(",
            TokenKind::BracketRightParen => ")",
            TokenKind::BracketLeftSquare => "[",
            TokenKind::BracketRightSquare => "]",
            TokenKind::BracketLeftBrace => "{",
            TokenKind::BracketRightBrace => "}",
            TokenKind::Code => "code",
            TokenKind::CodeLiteral => "literal",
            TokenKind::Semicolon => ";",
            TokenKind::Point => ".",
            TokenKind::EqualSign => "=",
            TokenKind::Comma => ",",
            TokenKind::Colon => ":",
            TokenKind::Regexp => "regexp",
            TokenKind::Unknown => "unknown",
            TokenKind::Asterisk => "*",
        }
    }

    /// Whitespace, line feeds, and comments: tokens without meaning to the
    /// weaver's structural passes.
    #[inline]
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            TokenKind::Whitespace
                | TokenKind::LineFeed
                | TokenKind::Comment
                | TokenKind::LineComment
        )
    }
}

/// A lexed token: kind plus its exact source text.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Token {
    kind: TokenKind,
    text: String,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Token {
            kind,
            text: text.into(),
        }
    }

    /// Identifier or keyword token.
    pub fn code(text: impl Into<String>) -> Self {
        Token::new(TokenKind::Code, text)
    }

    pub fn whitespace(len: usize) -> Self {
        Token::new(TokenKind::Whitespace, " ".repeat(len))
    }

    pub fn line_feed() -> Self {
        Token::new(TokenKind::LineFeed, "\n")
    }

    /// Block comment around `content`.
    ///
    /// A `*/` inside `content` is broken up so the comment cannot close early.
    pub fn comment(content: &str) -> Self {
        let content = content.replace("*/", "* /");
        Token::new(TokenKind::Comment, format!("/* {content} */"))
    }

    #[inline]
    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// `true` for a `Code` token whose text is exactly `word`.
    #[inline]
    pub fn is_code(&self, word: &str) -> bool {
        self.kind == TokenKind::Code && self.text == word
    }

    #[inline]
    pub fn is_trivia(&self) -> bool {
        self.kind.is_trivia()
    }

    /// Content of a quoted literal without its quotes.
    ///
    /// Returns `None` for other kinds. An unterminated literal yields
    /// everything after the opening quote.
    pub fn literal_value(&self) -> Option<&str> {
        if self.kind != TokenKind::CodeLiteral {
            return None;
        }
        let mut chars = self.text.chars();
        let quote = chars.next()?;
        let rest = chars.as_str();
        Some(rest.strip_suffix(quote).unwrap_or(rest))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Structural event a [`Marker`] stands for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Just inside the opening brace of a named function.
    FunctionStart,
    /// Just before the closing brace of a named function.
    FunctionEnd,
    /// Before a statement calling a configured stop-execution function.
    StopExecution,
    /// After the `;` of that statement.
    ContinueExecution,
}

impl EventKind {
    pub fn name(self) -> &'static str {
        match self {
            EventKind::FunctionStart => "functionStart",
            EventKind::FunctionEnd => "functionEnd",
            EventKind::StopExecution => "stopExecution",
            EventKind::ContinueExecution => "continueExecution",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Synthetic, zero-width position in a token list.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Marker {
    event: EventKind,
    function_name: String,
}

impl Marker {
    pub fn new(event: EventKind, function_name: impl Into<String>) -> Self {
        Marker {
            event,
            function_name: function_name.into(),
        }
    }

    #[inline]
    pub fn event(&self) -> EventKind {
        self.event
    }

    #[inline]
    pub fn function_name(&self) -> &str {
        &self.function_name
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}:{}>", self.function_name, self.event)
    }
}

/// One element of a [`TokenList`](crate::TokenList).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Item {
    Token(Token),
    Marker(Marker),
}

impl Item {
    #[inline]
    pub fn as_token(&self) -> Option<&Token> {
        match self {
            Item::Token(token) => Some(token),
            Item::Marker(_) => None,
        }
    }

    #[inline]
    pub fn as_marker(&self) -> Option<&Marker> {
        match self {
            Item::Marker(marker) => Some(marker),
            Item::Token(_) => None,
        }
    }

    /// Kind of the token, `None` for markers.
    #[inline]
    pub fn kind(&self) -> Option<TokenKind> {
        self.as_token().map(Token::kind)
    }

    #[inline]
    pub fn is_kind(&self, kind: TokenKind) -> bool {
        self.kind() == Some(kind)
    }

    #[inline]
    pub fn is_code(&self, word: &str) -> bool {
        self.as_token().is_some_and(|t| t.is_code(word))
    }

    /// Rendered text. Markers render as the empty string.
    #[inline]
    pub fn text(&self) -> &str {
        match self {
            Item::Token(token) => token.text(),
            Item::Marker(_) => "",
        }
    }
}

impl From<Token> for Item {
    fn from(token: Token) -> Self {
        Item::Token(token)
    }
}

impl From<Marker> for Item {
    fn from(marker: Marker) -> Self {
        Item::Marker(marker)
    }
}
