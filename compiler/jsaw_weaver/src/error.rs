//! Error types for weaving.
//!
//! Three failure classes exist: a script cannot be read, a script is not
//! well-formed enough to weave, or the woven result cannot be written. A
//! marker with no matching advice is not an error.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Top-level weaving error.
#[derive(Debug, Error)]
pub enum WeaveError {
    /// A base or aspect script could not be resolved or read.
    #[error("cannot read script `{uri}`: {source}")]
    Io {
        uri: String,
        #[source]
        source: io::Error,
    },

    /// A script is structurally unusable.
    #[error(transparent)]
    Malformed(#[from] MalformedScriptError),

    /// A configured stop-execution function is not a valid pattern.
    #[error("invalid stop-execution function `{name}`")]
    InvalidStopFunction { name: String },

    /// Weaving was requested before `set_base_script`.
    #[error("no base script has been set")]
    NoBaseScript,

    /// The debug copy of the woven script could not be written.
    #[error("cannot write woven script to `{}`: {source}", path.display())]
    Serialize {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl WeaveError {
    #[cold]
    pub fn io(uri: impl Into<String>, source: io::Error) -> Self {
        WeaveError::Io {
            uri: uri.into(),
            source,
        }
    }
}

/// What is structurally wrong with a script.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Error)]
pub enum MalformedKind {
    /// Input ended while looking for a required token.
    #[error("unexpected end of script, expected {expected}")]
    UnexpectedEof { expected: &'static str },
    /// An aspect function has no name to use as its pattern.
    #[error("aspect function without a name")]
    MissingFunctionName,
    /// A brace opened here is never closed.
    #[error("unbalanced braces")]
    UnbalancedBraces,
    /// A function name cannot be compiled into a wildcard pattern.
    #[error("invalid wildcard pattern `{pattern}`")]
    InvalidPattern { pattern: String },
}

/// A structural error located in a script.
///
/// Passes raise it with an unknown script; the weaver attaches the URI via
/// [`MalformedScriptError::in_script`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MalformedScriptError {
    /// URI of the offending script, if known.
    pub uri: Option<String>,
    /// Byte offset in the script's rendered text.
    pub offset: usize,
    pub kind: MalformedKind,
}

impl MalformedScriptError {
    #[cold]
    pub fn new(kind: MalformedKind, offset: usize) -> Self {
        MalformedScriptError {
            uri: None,
            offset,
            kind,
        }
    }

    /// Attach the script URI unless one is already set.
    #[must_use]
    pub fn in_script(mut self, uri: &str) -> Self {
        if self.uri.is_none() {
            self.uri = Some(uri.to_string());
        }
        self
    }
}

impl fmt::Display for MalformedScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.uri {
            Some(uri) => write!(f, "{uri}: {} (at byte {})", self.kind, self.offset),
            None => write!(f, "{} (at byte {})", self.kind, self.offset),
        }
    }
}

impl std::error::Error for MalformedScriptError {}
