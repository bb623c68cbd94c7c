//! Relocation of top-level `return` statements.
//!
//! After advice is spliced in just before a function's closing brace, so a
//! `return` would skip it. Within each marked function, a `return` at the
//! function's own brace level becomes
//!
//! ```text
//! var ____interceptionReturn____ = EXPR;
//! ```
//!
//! and `return ____interceptionReturn____;` is appended after the function
//! end marker. Returns inside nested blocks are left alone.

use jsaw_lexer::{EventKind, Item, Token, TokenKind, TokenList};
use tracing::debug;

/// Variable holding a function's return value until its end.
pub const RETURN_VARIABLE: &str = "____interceptionReturn____";

/// Per-function state, one per open `FunctionStart` marker.
#[derive(Default)]
struct Frame {
    /// Braces opened since the function start.
    depth: usize,
    saw_return: bool,
}

#[tracing::instrument(level = "debug", skip_all, fields(tokens = tokens.len()))]
pub fn rewrite_returns(tokens: &TokenList) -> TokenList {
    let mut out = TokenList::with_capacity(tokens.len());
    let mut frames: Vec<Frame> = Vec::new();
    let mut rewritten = 0usize;

    for (i, item) in tokens.iter().enumerate() {
        match item {
            Item::Marker(marker) => {
                out.push(marker.clone());
                match marker.event() {
                    EventKind::FunctionStart => frames.push(Frame::default()),
                    EventKind::FunctionEnd => {
                        if frames.pop().is_some_and(|frame| frame.saw_return) {
                            push_moved_return(&mut out);
                        }
                    }
                    EventKind::StopExecution | EventKind::ContinueExecution => {}
                }
            }
            Item::Token(token) => {
                let Some(frame) = frames.last_mut() else {
                    out.push(token.clone());
                    continue;
                };
                match token.kind() {
                    TokenKind::BracketLeftBrace => frame.depth += 1,
                    TokenKind::BracketRightBrace => frame.depth = frame.depth.saturating_sub(1),
                    TokenKind::Code if frame.depth == 0 && token.text() == "return" => {
                        frame.saw_return = true;
                        rewritten += 1;
                        push_assignment(&mut out, returns_nothing(tokens, i));
                        continue;
                    }
                    _ => {}
                }
                out.push(token.clone());
            }
        }
    }

    debug!(rewritten, "returns rewritten");
    out
}

/// `return;` or `return }`: nothing to assign.
fn returns_nothing(tokens: &TokenList, keyword: usize) -> bool {
    tokens
        .next_significant(keyword + 1)
        .and_then(|i| tokens.get(i))
        .and_then(Item::kind)
        .map_or(true, |kind| {
            matches!(kind, TokenKind::Semicolon | TokenKind::BracketRightBrace)
        })
}

/// `var ____interceptionReturn____ =`, followed by `undefined` when the
/// original statement had no expression.
fn push_assignment(out: &mut TokenList, empty: bool) {
    out.push(Token::code("var"));
    out.push(Token::whitespace(1));
    out.push(Token::code(RETURN_VARIABLE));
    out.push(Token::whitespace(1));
    out.push_token(TokenKind::EqualSign, "=");
    if empty {
        out.push(Token::whitespace(1));
        out.push(Token::code("undefined"));
    }
}

fn push_moved_return(out: &mut TokenList) {
    out.push(Token::line_feed());
    out.push(Token::comment("moved return statement"));
    out.push(Token::line_feed());
    out.push(Token::code("return"));
    out.push(Token::whitespace(1));
    out.push(Token::code(RETURN_VARIABLE));
    out.push_token(TokenKind::Semicolon, ";");
    out.push(Token::line_feed());
}
