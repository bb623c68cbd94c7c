//! Advice splicing: replaces markers with the bodies of matching
//! interceptors.
//!
//! Matching advice is emitted group by group in the order the aspect
//! scripts were applied, and within a group in declaration order. This also
//! holds for `after` advice.
//!
//! `around` advice replaces the whole body of its function: once any
//! `around` interceptor matches at a function start, every original token
//! up to the function's closing brace is dropped. Several matching `around`
//! interceptors are all emitted, one after another.

use jsaw_lexer::{EventKind, Item, Marker, Token, TokenKind, TokenList};
use tracing::{debug, trace};

use crate::advice::{AdviceKind, InterceptionList, Interceptor};

/// Body-replacement state entered by `around` advice.
enum Mode {
    Copy,
    /// Dropping the function body. Counts function starts seen inside it, so
    /// the right end marker leaves the mode.
    Around { nested: usize },
    /// After an around-replaced function's end marker: drop the relocated
    /// return up to the closing brace.
    DropTrailer,
}

#[tracing::instrument(level = "debug", skip_all, fields(tokens = tokens.len(), groups = groups.len()))]
pub fn splice_advice(tokens: &TokenList, groups: &[InterceptionList]) -> TokenList {
    let mut out = TokenList::with_capacity(tokens.len());
    let mut mode = Mode::Copy;
    let mut spliced = 0usize;

    for item in tokens {
        match item {
            Item::Marker(marker) => {
                if let Mode::Around { nested } = &mut mode {
                    match marker.event() {
                        EventKind::FunctionStart => *nested += 1,
                        EventKind::FunctionEnd if *nested > 0 => *nested -= 1,
                        EventKind::FunctionEnd => {
                            spliced += emit(&mut out, groups, marker, AdviceKind::After);
                            mode = Mode::DropTrailer;
                        }
                        EventKind::StopExecution | EventKind::ContinueExecution => {}
                    }
                    continue;
                }
                if marker.event() == EventKind::FunctionStart {
                    spliced += emit(&mut out, groups, marker, AdviceKind::Before);
                    let around = emit(&mut out, groups, marker, AdviceKind::Around);
                    if around > 0 {
                        trace!(function = marker.function_name(), around, "body replaced");
                        spliced += around;
                        mode = Mode::Around { nested: 0 };
                    }
                } else {
                    for &kind in AdviceKind::for_event(marker.event()) {
                        spliced += emit(&mut out, groups, marker, kind);
                    }
                }
            }
            Item::Token(token) => match mode {
                Mode::Copy => out.push(token.clone()),
                Mode::Around { .. } => {}
                Mode::DropTrailer => {
                    if token.kind() == TokenKind::BracketRightBrace {
                        out.push(token.clone());
                        mode = Mode::Copy;
                    }
                }
            },
        }
    }

    debug!(spliced, "advice spliced");
    out
}

/// Emit all `kind` advice matching `marker`'s function, framed by banner
/// comments. Returns the number of interceptors emitted.
fn emit(
    out: &mut TokenList,
    groups: &[InterceptionList],
    marker: &Marker,
    kind: AdviceKind,
) -> usize {
    let function = marker.function_name();
    let matching: Vec<&Interceptor> = groups
        .iter()
        .flat_map(|group| group.matching(function, kind))
        .collect();
    if matching.is_empty() {
        return 0;
    }

    out.push(Token::line_feed());
    out.push(Token::comment(&format!(
        "---- begin {kind} interception(s): {function} ----"
    )));
    for interceptor in &matching {
        out.push(Token::line_feed());
        out.push(Token::comment(&format!(
            "{} from {}",
            interceptor.name(),
            interceptor.source_uri()
        )));
        out.push(Token::line_feed());
        out.extend_from(interceptor.body());
    }
    out.push(Token::line_feed());
    out.push(Token::comment(&format!(
        "---- end {kind} interception(s): {function} ----"
    )));
    out.push(Token::line_feed());
    matching.len()
}

#[cfg(test)]
mod tests;
