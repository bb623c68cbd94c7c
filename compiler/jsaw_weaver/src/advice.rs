//! Interceptors: advice bodies read from aspect scripts.
//!
//! An aspect script is a sequence of functions whose names are wildcard
//! patterns over target function names. Inside each, one level deep, advice
//! blocks name the point they apply to:
//!
//! ```text
//! function get*(x) {
//!     before() { ... }
//!     around() { ... }
//! }
//! ```
//!
//! Each block becomes an [`Interceptor`] named `get*:before`,
//! `get*:around`, ... which is later matched against
//! `<functionName>:<adviceKind>`.

use std::fmt;

use jsaw_lexer::{EventKind, Item, TokenKind, TokenList};
use tracing::{debug, trace};

use crate::error::{MalformedKind, MalformedScriptError};
use crate::wildcard::WildcardPattern;

/// Where advice is applied relative to its target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AdviceKind {
    Before,
    After,
    Around,
    StopExecution,
    ContinueExecution,
}

impl AdviceKind {
    pub const ALL: [AdviceKind; 5] = [
        AdviceKind::Before,
        AdviceKind::After,
        AdviceKind::Around,
        AdviceKind::StopExecution,
        AdviceKind::ContinueExecution,
    ];

    /// Keyword of the advice block, also the suffix of interceptor names.
    pub fn literal(self) -> &'static str {
        match self {
            AdviceKind::Before => "before",
            AdviceKind::After => "after",
            AdviceKind::Around => "around",
            AdviceKind::StopExecution => "stopExecution",
            AdviceKind::ContinueExecution => "continueExecution",
        }
    }

    pub fn from_literal(literal: &str) -> Option<Self> {
        AdviceKind::ALL
            .into_iter()
            .find(|kind| kind.literal() == literal)
    }

    /// Advice kinds applied at a marker, in emission order.
    pub fn for_event(event: EventKind) -> &'static [AdviceKind] {
        match event {
            EventKind::FunctionStart => &[AdviceKind::Before, AdviceKind::Around],
            EventKind::FunctionEnd => &[AdviceKind::After],
            EventKind::StopExecution => &[AdviceKind::StopExecution],
            EventKind::ContinueExecution => &[AdviceKind::ContinueExecution],
        }
    }

    /// Subject an interceptor name is matched against.
    pub fn subject(self, function_name: &str) -> String {
        format!("{function_name}:{}", self.literal())
    }
}

impl fmt::Display for AdviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.literal())
    }
}

/// One advice body bound to a function-name pattern.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Interceptor {
    function_pattern: String,
    kind: AdviceKind,
    /// `<function_pattern>:<kind>`, compiled.
    name: WildcardPattern,
    body: TokenList,
    source_uri: String,
}

impl Interceptor {
    pub fn new(
        function_pattern: &str,
        kind: AdviceKind,
        body: TokenList,
        source_uri: &str,
    ) -> Result<Self, MalformedKind> {
        let name = kind.subject(function_pattern);
        let name = WildcardPattern::new(&name)
            .map_err(|_| MalformedKind::InvalidPattern { pattern: name })?;
        Ok(Interceptor {
            function_pattern: function_pattern.to_string(),
            kind,
            name,
            body,
            source_uri: source_uri.to_string(),
        })
    }

    /// Full pattern, e.g. `get*:before`.
    #[inline]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    #[inline]
    pub fn function_pattern(&self) -> &str {
        &self.function_pattern
    }

    #[inline]
    pub fn kind(&self) -> AdviceKind {
        self.kind
    }

    #[inline]
    pub fn body(&self) -> &TokenList {
        &self.body
    }

    #[inline]
    pub fn source_uri(&self) -> &str {
        &self.source_uri
    }

    /// Does this interceptor apply to `kind` advice of `function_name`?
    pub fn applies_to(&self, function_name: &str, kind: AdviceKind) -> bool {
        self.name.matches(&kind.subject(function_name))
    }
}

/// The interceptors of one aspect script, in declaration order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InterceptionList {
    source_uri: String,
    interceptors: Vec<Interceptor>,
}

impl InterceptionList {
    pub fn new(source_uri: impl Into<String>) -> Self {
        InterceptionList {
            source_uri: source_uri.into(),
            interceptors: Vec::new(),
        }
    }

    pub fn push(&mut self, interceptor: Interceptor) {
        self.interceptors.push(interceptor);
    }

    #[inline]
    pub fn source_uri(&self) -> &str {
        &self.source_uri
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.interceptors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.interceptors.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Interceptor> {
        self.interceptors.iter()
    }

    /// Interceptors applying to `kind` advice of `function_name`.
    pub fn matching<'a>(
        &'a self,
        function_name: &'a str,
        kind: AdviceKind,
    ) -> impl Iterator<Item = &'a Interceptor> + 'a {
        self.interceptors
            .iter()
            .filter(move |i| i.applies_to(function_name, kind))
    }
}

impl<'a> IntoIterator for &'a InterceptionList {
    type Item = &'a Interceptor;
    type IntoIter = std::slice::Iter<'a, Interceptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.interceptors.iter()
    }
}

/// Read every interceptor declared in an aspect script.
#[tracing::instrument(level = "debug", skip(tokens), fields(tokens = tokens.len()))]
pub fn read_interceptors(
    source_uri: &str,
    tokens: &TokenList,
) -> Result<InterceptionList, MalformedScriptError> {
    let reader = AspectReader { tokens, source_uri };
    let mut list = InterceptionList::new(source_uri);
    let mut i = 0;
    while i < tokens.len() {
        if tokens.get(i).is_some_and(|item| item.is_code("function")) {
            i = reader.read_function(i, &mut list)?;
        } else {
            i += 1;
        }
    }
    debug!(count = list.len(), "interceptors read");
    Ok(list)
}

struct AspectReader<'a> {
    tokens: &'a TokenList,
    source_uri: &'a str,
}

impl AspectReader<'_> {
    fn error(&self, kind: MalformedKind, index: usize) -> MalformedScriptError {
        MalformedScriptError::new(kind, self.tokens.offset_of(index)).in_script(self.source_uri)
    }

    fn kind_at(&self, index: usize) -> Option<TokenKind> {
        self.tokens.get(index).and_then(Item::kind)
    }

    /// Read the aspect function whose `function` keyword is at `keyword`.
    /// Returns the index after its closing brace.
    fn read_function(
        &self,
        keyword: usize,
        list: &mut InterceptionList,
    ) -> Result<usize, MalformedScriptError> {
        // Name: Code and `*` tokens up to the parameter list.
        let mut pattern = String::new();
        let mut i = keyword + 1;
        loop {
            let Some(item) = self.tokens.get(i) else {
                return Err(self.error(MalformedKind::UnexpectedEof { expected: "`(`" }, keyword));
            };
            match item.kind() {
                Some(TokenKind::BracketLeftParen) => break,
                Some(TokenKind::Code | TokenKind::Asterisk) => pattern.push_str(item.text()),
                _ => {}
            }
            i += 1;
        }
        if pattern.is_empty() {
            return Err(self.error(MalformedKind::MissingFunctionName, keyword));
        }

        let open = self.find(i, TokenKind::BracketLeftBrace).ok_or_else(|| {
            self.error(MalformedKind::UnexpectedEof { expected: "`{`" }, keyword)
        })?;

        let mut depth = 1usize;
        let mut i = open + 1;
        while let Some(item) = self.tokens.get(i) {
            match item.kind() {
                Some(TokenKind::BracketLeftBrace) => depth += 1,
                Some(TokenKind::BracketRightBrace) => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(i + 1);
                    }
                }
                Some(TokenKind::Code) if depth == 1 => {
                    if let Some(kind) = AdviceKind::from_literal(item.text()) {
                        if let Some(body_open) = self.advice_header(i) {
                            i = self.read_advice(&pattern, kind, body_open, list)?;
                            continue;
                        }
                    }
                }
                _ => {}
            }
            i += 1;
        }
        Err(self.error(MalformedKind::UnbalancedBraces, open))
    }

    /// For an advice keyword at `keyword`, the index of the `{` opening its
    /// body when followed by `()` and `{`.
    fn advice_header(&self, keyword: usize) -> Option<usize> {
        let lparen = self.tokens.next_significant(keyword + 1)?;
        let rparen = self.tokens.next_significant(lparen + 1)?;
        let open = self.tokens.next_significant(rparen + 1)?;
        let header = [
            (lparen, TokenKind::BracketLeftParen),
            (rparen, TokenKind::BracketRightParen),
            (open, TokenKind::BracketLeftBrace),
        ];
        header
            .iter()
            .all(|&(i, kind)| self.kind_at(i) == Some(kind))
            .then_some(open)
    }

    /// Read one advice body. Returns the index after its closing brace.
    fn read_advice(
        &self,
        pattern: &str,
        kind: AdviceKind,
        open: usize,
        list: &mut InterceptionList,
    ) -> Result<usize, MalformedScriptError> {
        let close = self
            .matching_brace(open)
            .ok_or_else(|| self.error(MalformedKind::UnbalancedBraces, open))?;
        let body: TokenList = self.tokens.items()[open + 1..close].iter().cloned().collect();
        let interceptor = Interceptor::new(pattern, kind, body, self.source_uri)
            .map_err(|kind| self.error(kind, open))?;
        trace!(pattern = interceptor.name(), "interceptor");
        list.push(interceptor);
        Ok(close + 1)
    }

    fn find(&self, from: usize, kind: TokenKind) -> Option<usize> {
        (from..self.tokens.len()).find(|&i| self.kind_at(i) == Some(kind))
    }

    fn matching_brace(&self, open: usize) -> Option<usize> {
        let mut depth = 0usize;
        for i in open..self.tokens.len() {
            match self.kind_at(i) {
                Some(TokenKind::BracketLeftBrace) => depth += 1,
                Some(TokenKind::BracketRightBrace) => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(i);
                    }
                }
                _ => {}
            }
        }
        None
    }
}

#[cfg(test)]
mod tests;
