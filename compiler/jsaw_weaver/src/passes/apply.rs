//! Detection of `cocoon.apply("...")` calls in a base script.

use jsaw_lexer::{Item, Token, TokenKind, TokenList};
use tracing::{debug, trace};

/// A recognised apply call: item range and the aspect script URI.
struct ApplyCall {
    start: usize,
    /// One past the last item (the `)` or a trailing `;`).
    end: usize,
    uri: String,
}

/// URIs of the aspect scripts a base script applies, in source order.
///
/// Duplicates are kept; the weaver loads each script once.
pub fn applied_scripts(tokens: &TokenList) -> Vec<String> {
    find_apply_calls(tokens)
        .into_iter()
        .map(|call| call.uri)
        .collect()
}

/// Replace every apply call (including its `;`) by a comment holding the
/// call's text.
#[tracing::instrument(level = "debug", skip_all)]
pub fn comment_applied_scripts(tokens: &mut TokenList) {
    let calls = find_apply_calls(tokens);
    debug!(count = calls.len(), "commenting applied scripts");

    // Back to front so earlier ranges keep their indices.
    for call in calls.iter().rev() {
        let mut cursor = tokens.cursor();
        cursor.seek(call.start);
        let mut text = String::new();
        for _ in call.start..call.end {
            if let Some(item) = cursor.remove() {
                text.push_str(item.text());
            }
        }
        trace!(uri = %call.uri, "applied script commented");
        cursor.insert_before(Token::comment(&text));
    }
}

fn find_apply_calls(tokens: &TokenList) -> Vec<ApplyCall> {
    (0..tokens.len())
        .filter_map(|i| match_apply_call(tokens, i))
        .collect()
}

/// `cocoon . apply ( "uri" ) ;?` starting at `start`, trivia allowed
/// between the parts.
fn match_apply_call(tokens: &TokenList, start: usize) -> Option<ApplyCall> {
    if !tokens.get(start)?.is_code("cocoon") {
        return None;
    }
    let point = expect(tokens, start + 1, |item| item.is_kind(TokenKind::Point))?;
    let apply = expect(tokens, point + 1, |item| item.is_code("apply"))?;
    let lparen = expect(tokens, apply + 1, |item| {
        item.is_kind(TokenKind::BracketLeftParen)
    })?;
    let literal = expect(tokens, lparen + 1, |item| {
        item.is_kind(TokenKind::CodeLiteral)
    })?;
    let rparen = expect(tokens, literal + 1, |item| {
        item.is_kind(TokenKind::BracketRightParen)
    })?;
    let uri = tokens
        .get(literal)
        .and_then(Item::as_token)
        .and_then(Token::literal_value)?
        .to_string();

    let end = match expect(tokens, rparen + 1, |item| item.is_kind(TokenKind::Semicolon)) {
        Some(semicolon) => semicolon + 1,
        None => rparen + 1,
    };
    Some(ApplyCall { start, end, uri })
}

/// Index of the next significant item if it satisfies `pred`.
fn expect(tokens: &TokenList, from: usize, pred: impl Fn(&Item) -> bool) -> Option<usize> {
    let index = tokens.next_significant(from)?;
    pred(tokens.get(index)?).then_some(index)
}
