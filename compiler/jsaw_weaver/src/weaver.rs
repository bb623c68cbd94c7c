//! The weaver: loads a base script with its aspect scripts and runs the
//! passes over it.

use std::fs;
use std::io::Cursor;
use std::path::PathBuf;

use jsaw_lexer::{TokenList, Tokenizer};
use tracing::debug;

use crate::advice::{read_interceptors, InterceptionList};
use crate::config::WeaverConfig;
use crate::error::WeaveError;
use crate::passes::{
    applied_scripts, comment_applied_scripts, inject_events, rewrite_returns, splice_advice,
    StopFunctions,
};
use crate::source::{local_path, SourceResolver};

/// The current base script, tokenized.
struct BaseScript {
    uri: String,
    tokens: TokenList,
    /// Applied aspect scripts in source order, duplicates kept.
    applied: Vec<String>,
}

/// Weaves advice from aspect scripts into a base script.
///
/// One weaver holds one base script at a time. It is not meant to be shared
/// between threads while weaving; create one per compilation instead.
pub struct AspectWeaver<R> {
    resolver: R,
    config: WeaverConfig,
    stop_functions: StopFunctions,
    tokenizer: Tokenizer,
    base: Option<BaseScript>,
    groups: Vec<InterceptionList>,
}

impl<R: SourceResolver> AspectWeaver<R> {
    /// Fails if a configured stop-execution function is not a valid pattern.
    pub fn new(resolver: R, config: WeaverConfig) -> Result<Self, WeaveError> {
        let stop_functions = StopFunctions::new(&config.stop_functions)?;
        let tokenizer = Tokenizer::new().with_tab_width(config.tab_width);
        Ok(AspectWeaver {
            resolver,
            config,
            stop_functions,
            tokenizer,
            base: None,
            groups: Vec::new(),
        })
    }

    #[inline]
    pub fn config(&self) -> &WeaverConfig {
        &self.config
    }

    /// Load and tokenize the base script at `uri`, then every aspect script
    /// it applies.
    ///
    /// Interceptor groups of a previous base script are discarded. Each
    /// aspect script is loaded once, in order of its first application. On
    /// error the weaver is left without a base script.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn set_base_script(&mut self, uri: &str) -> Result<(), WeaveError> {
        self.base = None;
        self.groups.clear();

        let source = self
            .resolver
            .resolve(uri, None)
            .map_err(|err| WeaveError::io(uri, err))?;
        let tokens = self.tokenizer.tokenize(&source.text);
        let applied = applied_scripts(&tokens);
        debug!(tokens = tokens.len(), applied = applied.len(), "base script read");

        if let Err(err) = self.load_aspects(&source.uri, &applied) {
            self.groups.clear();
            return Err(err);
        }
        self.base = Some(BaseScript {
            uri: source.uri,
            tokens,
            applied,
        });
        Ok(())
    }

    fn load_aspects(&mut self, base_uri: &str, applied: &[String]) -> Result<(), WeaveError> {
        let mut loaded: Vec<&str> = Vec::with_capacity(applied.len());
        for uri in applied {
            if loaded.contains(&uri.as_str()) {
                continue;
            }
            loaded.push(uri);
            let source = self
                .resolver
                .resolve(uri, Some(base_uri))
                .map_err(|err| WeaveError::io(uri.as_str(), err))?;
            let tokens = self.tokenizer.tokenize(&source.text);
            self.add_interceptor_group(&source.uri, &tokens)?;
        }
        Ok(())
    }

    /// Read the interceptors of an aspect script and append them as a new
    /// group. Groups are applied in the order they were added.
    pub fn add_interceptor_group(
        &mut self,
        uri: &str,
        tokens: &TokenList,
    ) -> Result<(), WeaveError> {
        let group = read_interceptors(uri, tokens)?;
        debug!(uri, interceptors = group.len(), "interceptor group added");
        self.groups.push(group);
        Ok(())
    }

    /// Does the base script apply any aspect script?
    pub fn are_scripts_applied(&self) -> bool {
        self.base.as_ref().is_some_and(|base| !base.applied.is_empty())
    }

    /// Aspect script URIs applied by the base script, in source order.
    pub fn applied_scripts(&self) -> &[String] {
        self.base
            .as_ref()
            .map(|base| base.applied.as_slice())
            .unwrap_or_default()
    }

    #[inline]
    pub fn interceptor_groups(&self) -> &[InterceptionList] {
        &self.groups
    }

    /// URI the base script was resolved to.
    pub fn base_uri(&self) -> Option<&str> {
        self.base.as_ref().map(|base| base.uri.as_str())
    }

    /// Weave the base script and render the result.
    ///
    /// With [`WeaverConfig::serialize_result`] set and a local base script,
    /// the result is also written next to it (see [`intercepted_path`]).
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn intercepted_script(&self) -> Result<String, WeaveError> {
        let base = self.base.as_ref().ok_or(WeaveError::NoBaseScript)?;

        let mut tokens = base.tokens.clone();
        comment_applied_scripts(&mut tokens);
        let tokens = inject_events(&tokens, &self.stop_functions)
            .map_err(|err| err.in_script(&base.uri))?;
        let tokens = rewrite_returns(&tokens);
        let tokens = splice_advice(&tokens, &self.groups);
        let text = tokens.render();

        if self.config.serialize_result {
            if let Some(path) = intercepted_path(&base.uri) {
                fs::write(&path, &text).map_err(|source| WeaveError::Serialize {
                    path: path.clone(),
                    source,
                })?;
                debug!(path = %path.display(), "woven script written");
            }
        }
        Ok(text)
    }

    /// [`AspectWeaver::intercepted_script`] as a reader.
    pub fn intercepted_script_as_reader(&self) -> Result<Cursor<String>, WeaveError> {
        self.intercepted_script().map(Cursor::new)
    }
}

/// Where the woven copy of a local base script goes: `<stem>_intercepted.js`
/// in the same directory. `None` for non-local URIs.
pub fn intercepted_path(uri: &str) -> Option<PathBuf> {
    let path = local_path(uri)?;
    let stem = path.file_stem()?.to_string_lossy();
    Some(path.with_file_name(format!("{stem}_intercepted.js")))
}
