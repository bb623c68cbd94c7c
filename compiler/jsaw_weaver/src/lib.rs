//! Aspect weaver for flow scripts.
//!
//! A base script opts into aspects with `cocoon.apply("aspects.js")`. Each
//! aspect script declares advice inside functions whose names are wildcard
//! patterns:
//!
//! ```text
//! function get*() {
//!     before() { log("entering"); }
//!     after()  { log("leaving"); }
//! }
//! ```
//!
//! Weaving rewrites the base script's tokens in a fixed order:
//!
//! ```text
//! tokens → comment_applied_scripts → inject_events → rewrite_returns → splice_advice → text
//! ```
//!
//! [`AspectWeaver`] drives the whole pipeline; the individual passes are
//! public so they can be inspected and tested in isolation.

mod advice;
mod config;
mod error;
pub mod passes;
mod source;
mod weaver;
mod wildcard;

pub use advice::{read_interceptors, AdviceKind, InterceptionList, Interceptor};
pub use config::WeaverConfig;
pub use error::{MalformedKind, MalformedScriptError, WeaveError};
pub use passes::StopFunctions;
pub use source::{is_local_file, FileResolver, MemoryResolver, Source, SourceResolver};
pub use weaver::{intercepted_path, AspectWeaver};
pub use wildcard::WildcardPattern;

/// Re-exported so callers need only one dependency for the token model.
pub use jsaw_lexer::{tokenize, EventKind, Item, Marker, Token, TokenKind, TokenList, Tokenizer};
