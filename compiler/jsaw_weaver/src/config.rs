//! Weaver configuration.

use jsaw_lexer::DEFAULT_TAB_WIDTH;

/// Settings for an [`AspectWeaver`](crate::AspectWeaver).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WeaverConfig {
    /// Functions that suspend the script (create a continuation), as `name`
    /// or `object.name`. Each segment may contain `*`.
    pub stop_functions: Vec<String>,
    /// Also write the woven script next to a local base script as
    /// `<stem>_intercepted.js`.
    pub serialize_result: bool,
    /// Spaces a tab expands to while tokenizing.
    pub tab_width: usize,
}

impl Default for WeaverConfig {
    fn default() -> Self {
        WeaverConfig {
            stop_functions: vec!["cocoon.sendPageAndWait".to_string()],
            serialize_result: false,
            tab_width: DEFAULT_TAB_WIDTH,
        }
    }
}
