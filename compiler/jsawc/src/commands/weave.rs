//! The `weave` command: weave a base script with the aspects it applies.

use std::path::PathBuf;

use jsaw_weaver::{AspectWeaver, FileResolver, WeaveError, WeaverConfig};
use tracing::debug;

/// Options of `jsaw weave`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WeaveOptions {
    /// Stop-execution functions (`--stop=NAME`, repeatable). Empty keeps
    /// the default set.
    pub stop_functions: Vec<String>,
    /// Also write `<stem>_intercepted.js` next to the script (`--serialize`).
    pub serialize: bool,
    /// Spaces per tab (`--tab-width=N`).
    pub tab_width: Option<usize>,
    /// Write the woven script here instead of stdout (`-o`, `--output`).
    pub output: Option<PathBuf>,
}

impl WeaveOptions {
    pub fn config(&self) -> WeaverConfig {
        let defaults = WeaverConfig::default();
        WeaverConfig {
            stop_functions: if self.stop_functions.is_empty() {
                defaults.stop_functions
            } else {
                self.stop_functions.clone()
            },
            serialize_result: self.serialize,
            tab_width: self.tab_width.unwrap_or(defaults.tab_width),
        }
    }

    /// Overlay options set in `other`.
    pub fn merge(&mut self, other: &WeaveOptions) {
        self.stop_functions.extend(other.stop_functions.iter().cloned());
        self.serialize |= other.serialize;
        if other.tab_width.is_some() {
            self.tab_width = other.tab_width;
        }
        if other.output.is_some() {
            self.output.clone_from(&other.output);
        }
    }
}

/// Parse `weave` flags. Unknown flags are reported and ignored.
pub fn parse_weave_options(args: &[String]) -> WeaveOptions {
    let mut options = WeaveOptions::default();

    for arg in args {
        if let Some(name) = arg.strip_prefix("--stop=") {
            options.stop_functions.push(name.to_string());
        } else if arg == "--serialize" {
            options.serialize = true;
        } else if let Some(width) = arg.strip_prefix("--tab-width=") {
            match width.parse::<usize>() {
                Ok(width) => options.tab_width = Some(width),
                Err(_) => eprintln!("warning: invalid tab width '{width}', using default"),
            }
        } else if let Some(output) = arg.strip_prefix("-o=") {
            options.output = Some(PathBuf::from(output));
        } else if let Some(output) = arg.strip_prefix("--output=") {
            options.output = Some(PathBuf::from(output));
        } else if arg.starts_with('-') {
            eprintln!("warning: unknown option '{arg}'");
        }
    }

    options
}

/// Weave the script at `path`, resolving applied aspects next to it.
pub fn weave_script(path: &str, options: &WeaveOptions) -> Result<String, WeaveError> {
    let mut weaver = AspectWeaver::new(FileResolver::default(), options.config())?;
    weaver.set_base_script(path)?;
    debug!(
        applied = weaver.applied_scripts().len(),
        groups = weaver.interceptor_groups().len(),
        "base script loaded"
    );
    weaver.intercepted_script()
}

/// Weave `path` and print the result, or write it to `options.output`.
pub fn weave_file(path: &str, options: &WeaveOptions) {
    let woven = match weave_script(path, options) {
        Ok(woven) => woven,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    match &options.output {
        Some(output) => {
            if let Err(e) = std::fs::write(output, &woven) {
                eprintln!("error: cannot write '{}': {e}", output.display());
                std::process::exit(1);
            }
        }
        None => print!("{woven}"),
    }
}

#[cfg(test)]
mod tests;
