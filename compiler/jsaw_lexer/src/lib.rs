//! Tokenizer and token model for flow scripts.
//!
//! This crate turns the source of a flow script (a JavaScript dialect) into
//! a flat [`TokenList`] for the aspect weaver to rewrite. The lexer
//! is deliberately shallow: it only distinguishes what the weaver needs to
//! find function boundaries, statements, and calls. Concatenating the text
//! of every token reproduces the input (modulo tab expansion and carriage
//! return removal), so a woven list can always be rendered back to source.
//!
//! # Architecture
//!
//! ```text
//! source → Tokenizer → TokenList ─┬→ passes (jsaw_weaver) → TokenList → render()
//!                                 └→ TokenCursor (in-place surgery)
//! ```
//!
//! Besides tokens, a list can hold [`Marker`] items: synthetic, zero-width
//! positions inserted by the weaver to anchor advice. Markers never render.

mod list;
mod token;
mod tokenizer;

pub use list::{TokenCursor, TokenList};
pub use token::{EventKind, Item, Marker, Token, TokenKind};
pub use tokenizer::{tokenize, Tokenizer, DEFAULT_TAB_WIDTH};
