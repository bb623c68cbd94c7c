//! Glob-style patterns over identifiers.
//!
//! `*` matches any run (possibly empty) of identifier characters; every
//! other character is literal. Matching is case-sensitive and anchored, so
//! `get*:before` matches `getUser:before` but neither `setUser:before` nor
//! `getUser:after`, and `*` never crosses a `:` or `.`.

use std::fmt;

use regex::Regex;

/// Regex fragment a `*` expands to.
const IDENT_RUN: &str = "[A-Za-z0-9_$]*";

/// A compiled wildcard pattern.
#[derive(Clone, Debug)]
pub struct WildcardPattern {
    pattern: String,
    regex: Regex,
}

impl WildcardPattern {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        let mut expr = String::with_capacity(pattern.len() + 2);
        expr.push('^');
        for (i, literal) in pattern.split('*').enumerate() {
            if i > 0 {
                expr.push_str(IDENT_RUN);
            }
            expr.push_str(&regex::escape(literal));
        }
        expr.push('$');
        Ok(WildcardPattern {
            pattern: pattern.to_string(),
            regex: Regex::new(&expr)?,
        })
    }

    #[inline]
    pub fn matches(&self, subject: &str) -> bool {
        self.regex.is_match(subject)
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.pattern
    }
}

impl PartialEq for WildcardPattern {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern
    }
}

impl Eq for WildcardPattern {}

impl fmt::Display for WildcardPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern)
    }
}
