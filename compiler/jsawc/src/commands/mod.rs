//! Command handlers for the `jsaw` CLI.
//!
//! Handlers that print report errors on stderr and exit with status 1.
//! The `*_script` / `format_*` functions underneath them return values and
//! are what the tests exercise.

mod debug;
mod weave;

pub use debug::{aspects_file, format_aspects, format_tokens, tokens_file};
pub use weave::{parse_weave_options, weave_file, weave_script, WeaveOptions};

/// Read a script or exit with a readable message.
pub(crate) fn read_file(path: &str) -> String {
    match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            let msg = match e.kind() {
                std::io::ErrorKind::NotFound => format!("cannot find file '{path}'"),
                std::io::ErrorKind::InvalidData => {
                    format!("'{path}' contains invalid UTF-8 data")
                }
                _ => format!("error reading '{path}': {e}"),
            };
            eprintln!("{msg}");
            std::process::exit(1);
        }
    }
}
