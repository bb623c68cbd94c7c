//! The weaving passes.
//!
//! Each pass takes a token list and returns a new one; only
//! [`comment_applied_scripts`] edits in place. They must run in this order:
//!
//! 1. [`comment_applied_scripts`] hides `cocoon.apply(...)` calls;
//! 2. [`inject_events`] adds function start/end and stop/continue markers;
//! 3. [`rewrite_returns`] turns top-level `return`s into assignments;
//! 4. [`splice_advice`] replaces markers with matching advice.

mod apply;
mod events;
mod returns;
mod splice;

pub use apply::{applied_scripts, comment_applied_scripts};
pub use events::{inject_events, StopFunctions};
pub use returns::{rewrite_returns, RETURN_VARIABLE};
pub use splice::splice_advice;
