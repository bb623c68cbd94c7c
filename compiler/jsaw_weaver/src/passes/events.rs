//! Function boundary and stop/continue marker injection.
//!
//! Every `function` keyword in the list is handled on its own, including
//! those nested inside other functions, so an inner function's body also
//! lies inside the outer function's marker region. Anonymous function
//! literals get no markers.
//!
//! Markers are planned against the indices of the unmodified input and
//! emitted in one final copy, so planning never has to correct for earlier
//! insertions.

use jsaw_lexer::{EventKind, Item, Marker, TokenKind, TokenList};
use tracing::{debug, trace};

use crate::error::{MalformedKind, MalformedScriptError, WeaveError};
use crate::wildcard::WildcardPattern;

/// One configured stop-execution function: `name` or `object.name`.
#[derive(Clone, Debug, PartialEq, Eq)]
struct StopRef {
    object: Option<WildcardPattern>,
    name: WildcardPattern,
}

/// The configured stop-execution functions, compiled.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StopFunctions {
    refs: Vec<StopRef>,
}

impl StopFunctions {
    pub fn new<I, S>(names: I) -> Result<Self, WeaveError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let refs: Vec<StopRef> = names
            .into_iter()
            .map(|name| -> Result<StopRef, WeaveError> {
                let name = name.as_ref();
                let invalid = |_: regex::Error| WeaveError::InvalidStopFunction {
                    name: name.to_string(),
                };
                let (object, function) = match name.rsplit_once('.') {
                    Some((object, function)) => {
                        (Some(WildcardPattern::new(object).map_err(invalid)?), function)
                    }
                    None => (None, name),
                };
                if function.is_empty() {
                    return Err(WeaveError::InvalidStopFunction {
                        name: name.to_string(),
                    });
                }
                Ok(StopRef {
                    object,
                    name: WildcardPattern::new(function).map_err(invalid)?,
                })
            })
            .collect::<Result<_, _>>()?;
        Ok(StopFunctions { refs })
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }

    /// Does a call to a stop function start at `index`?
    ///
    /// `index` must be a `Code` token not preceded by `.`; it is either the
    /// called name (`name(`) or the object of a qualified call
    /// (`object.name(`).
    fn is_call_at(&self, tokens: &TokenList, index: usize) -> bool {
        let Some(first) = tokens.get(index).and_then(Item::as_token) else {
            return false;
        };
        if first.kind() != TokenKind::Code || follows_point(tokens, index) {
            return false;
        }
        let Some(next) = tokens.next_significant(index + 1) else {
            return false;
        };
        match tokens.get(next).and_then(Item::kind) {
            Some(TokenKind::BracketLeftParen) => self
                .refs
                .iter()
                .any(|r| r.object.is_none() && r.name.matches(first.text())),
            Some(TokenKind::Point) => {
                let Some(member) = tokens.next_significant(next + 1) else {
                    return false;
                };
                let Some(member_token) = tokens.get(member).and_then(Item::as_token) else {
                    return false;
                };
                let called = tokens
                    .next_significant(member + 1)
                    .and_then(|i| tokens.get(i))
                    .is_some_and(|item| item.is_kind(TokenKind::BracketLeftParen));
                called
                    && member_token.kind() == TokenKind::Code
                    && self.refs.iter().any(|r| {
                        r.object.as_ref().is_some_and(|o| o.matches(first.text()))
                            && r.name.matches(member_token.text())
                    })
            }
            _ => false,
        }
    }
}

/// Index of the last significant token before `index`.
fn previous_significant(tokens: &TokenList, index: usize) -> Option<usize> {
    tokens.items()[..index]
        .iter()
        .rposition(|item| item.as_token().is_some_and(|t| !t.is_trivia()))
}

/// Is the significant token before `index` a `.`?
fn follows_point(tokens: &TokenList, index: usize) -> bool {
    previous_significant(tokens, index)
        .and_then(|i| tokens.get(i))
        .is_some_and(|item| item.is_kind(TokenKind::Point))
}

/// What a `{` opened.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Brace {
    /// Function body, statement block, `switch` body: holds statements.
    Block,
    /// Object literal: part of an expression.
    Literal,
}

/// Keywords directly followed by a statement block.
const BLOCK_KEYWORDS: [&str; 4] = ["else", "do", "try", "finally"];

/// Does the `{` at `index` open a statement block rather than an object
/// literal? `label` is the last colon seen in statement position.
fn opens_block(tokens: &TokenList, index: usize, label: Option<usize>) -> bool {
    let Some(prev) = previous_significant(tokens, index) else {
        return true;
    };
    let Some(token) = tokens.get(prev).and_then(Item::as_token) else {
        return true;
    };
    match token.kind() {
        TokenKind::BracketRightParen
        | TokenKind::BracketLeftBrace
        | TokenKind::BracketRightBrace
        | TokenKind::Semicolon => true,
        TokenKind::Colon => label == Some(prev),
        TokenKind::Code => BLOCK_KEYWORDS.contains(&token.text()),
        // Arrow function body.
        TokenKind::Unknown if token.text() == ">" => previous_significant(tokens, prev)
            .and_then(|i| tokens.get(i))
            .is_some_and(|item| item.is_kind(TokenKind::EqualSign)),
        _ => false,
    }
}

/// Depth of the innermost statement block in `braces`.
fn block_depth(braces: &[Brace]) -> usize {
    braces
        .iter()
        .rposition(|&brace| brace == Brace::Block)
        .map_or(1, |i| i + 1)
}

/// Insert function start/end markers for every named function and
/// stop/continue markers around statements calling a stop function.
#[tracing::instrument(level = "debug", skip_all, fields(tokens = tokens.len()))]
pub fn inject_events(
    tokens: &TokenList,
    stop_functions: &StopFunctions,
) -> Result<TokenList, MalformedScriptError> {
    // plan[i]: markers emitted before input item i; plan[len] goes last.
    let mut plan: Vec<Vec<Marker>> = vec![Vec::new(); tokens.len() + 1];
    let mut functions = 0usize;
    for keyword in 0..tokens.len() {
        if tokens.get(keyword).is_some_and(|item| item.is_code("function"))
            && plan_function(tokens, keyword, stop_functions, &mut plan)?
        {
            functions += 1;
        }
    }

    let markers: usize = plan.iter().map(Vec::len).sum();
    debug!(functions, markers, "events planned");

    let mut out = TokenList::with_capacity(tokens.len() + markers);
    let mut plan = plan.into_iter();
    for item in tokens {
        if let Some(before) = plan.next() {
            before.into_iter().for_each(|m| out.push(m));
        }
        out.push(item.clone());
    }
    for rest in plan {
        rest.into_iter().for_each(|m| out.push(m));
    }
    Ok(out)
}

/// Plan the markers of the function whose keyword is at `keyword`.
///
/// Returns `false` for anonymous functions, which are skipped.
fn plan_function(
    tokens: &TokenList,
    keyword: usize,
    stop_functions: &StopFunctions,
    plan: &mut [Vec<Marker>],
) -> Result<bool, MalformedScriptError> {
    let malformed = |kind, index| MalformedScriptError::new(kind, tokens.offset_of(index));

    let Some(name_index) = tokens.next_significant(keyword + 1) else {
        return Err(malformed(
            MalformedKind::UnexpectedEof { expected: "function name or `(`" },
            keyword,
        ));
    };
    let Some(name) = tokens
        .get(name_index)
        .and_then(Item::as_token)
        .filter(|t| t.kind() == TokenKind::Code)
        .map(|t| t.text().to_string())
    else {
        trace!(offset = tokens.offset_of(keyword), "anonymous function skipped");
        return Ok(false);
    };

    let Some(open) = (name_index + 1..tokens.len())
        .find(|&i| tokens.get(i).is_some_and(|t| t.is_kind(TokenKind::BracketLeftBrace)))
    else {
        return Err(malformed(
            MalformedKind::UnexpectedEof { expected: "`{`" },
            keyword,
        ));
    };

    // Ahead of markers other functions planned here, so that an around
    // body drops them together with the body.
    plan[open + 1].insert(0, Marker::new(EventKind::FunctionStart, name.as_str()));

    let mut braces = vec![Brace::Block];
    let mut statement_start = open + 1;
    // `?` seen in the current statement without their `:` yet.
    let mut ternaries = 0usize;
    let mut label: Option<usize> = None;
    // Block depth of the statement holding the pending stop call.
    let mut pending_stop: Option<usize> = None;

    for i in open + 1..tokens.len() {
        let Some(token) = tokens.get(i).and_then(Item::as_token) else {
            continue;
        };
        let in_block = braces.last() == Some(&Brace::Block);
        match token.kind() {
            TokenKind::BracketLeftBrace => {
                if opens_block(tokens, i, label) {
                    braces.push(Brace::Block);
                    statement_start = i + 1;
                    ternaries = 0;
                } else {
                    braces.push(Brace::Literal);
                }
            }
            TokenKind::BracketRightBrace => {
                if pending_stop == Some(braces.len()) {
                    plan[i].push(Marker::new(EventKind::ContinueExecution, name.as_str()));
                    pending_stop = None;
                }
                let closed = braces.pop();
                if braces.is_empty() {
                    plan[i].push(Marker::new(EventKind::FunctionEnd, name.as_str()));
                    trace!(function = %name, "function planned");
                    return Ok(true);
                }
                if closed == Some(Brace::Block) {
                    statement_start = i + 1;
                    ternaries = 0;
                }
            }
            TokenKind::Semicolon if in_block => {
                if pending_stop == Some(braces.len()) {
                    plan[i + 1].push(Marker::new(EventKind::ContinueExecution, name.as_str()));
                    pending_stop = None;
                }
                statement_start = i + 1;
                ternaries = 0;
            }
            TokenKind::Unknown if in_block && token.text() == "?" => ternaries += 1,
            TokenKind::Colon if in_block => {
                if ternaries > 0 {
                    ternaries -= 1;
                } else {
                    // Label, `case x:` or `default:`.
                    statement_start = i + 1;
                    label = Some(i);
                }
            }
            TokenKind::Code
                if pending_stop.is_none() && stop_functions.is_call_at(tokens, i) =>
            {
                let at = tokens
                    .next_significant(statement_start)
                    .map_or(i, |s| s.min(i));
                trace!(function = %name, call = token.text(), "stop execution");
                plan[at].push(Marker::new(EventKind::StopExecution, name.as_str()));
                pending_stop = Some(block_depth(&braces));
            }
            _ => {}
        }
    }
    Err(malformed(MalformedKind::UnbalancedBraces, open))
}
