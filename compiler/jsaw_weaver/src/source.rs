//! Script sources addressed by URI.
//!
//! The weaver never touches the file system directly: base and aspect
//! scripts are fetched through a [`SourceResolver`]. [`FileResolver`] reads
//! local files, [`MemoryResolver`] serves scripts registered up front.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;
use tracing::trace;

/// The text of a script and the URI it was resolved to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Source {
    pub uri: String,
    pub text: String,
}

impl Source {
    pub fn new(uri: impl Into<String>, text: impl Into<String>) -> Self {
        Source {
            uri: uri.into(),
            text: text.into(),
        }
    }

    /// Read a whole script. Invalid UTF-8 is an `InvalidData` error.
    pub fn from_reader(uri: impl Into<String>, mut reader: impl Read) -> io::Result<Self> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Ok(Source {
            uri: uri.into(),
            text,
        })
    }
}

/// Fetches scripts by URI.
pub trait SourceResolver {
    /// Resolve `uri`. Relative URIs are taken relative to `base`, the URI
    /// of the script that refers to them, when given.
    fn resolve(&self, uri: &str, base: Option<&str>) -> io::Result<Source>;
}

impl<R: SourceResolver + ?Sized> SourceResolver for &R {
    fn resolve(&self, uri: &str, base: Option<&str>) -> io::Result<Source> {
        (**self).resolve(uri, base)
    }
}

/// Scheme of `uri`, if it has one.
///
/// Single letters are not schemes, so `C:\flow\main.js` stays a path.
fn scheme(uri: &str) -> Option<&str> {
    let (scheme, _) = uri.split_once(':')?;
    let mut chars = scheme.chars();
    let valid = scheme.len() >= 2
        && chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    valid.then_some(scheme)
}

/// Does `uri` name a local file: a `file:` URI or a plain path?
pub fn is_local_file(uri: &str) -> bool {
    scheme(uri).map_or(true, |s| s.eq_ignore_ascii_case("file"))
}

/// File system path of a local `uri`.
pub(crate) fn local_path(uri: &str) -> Option<PathBuf> {
    if !is_local_file(uri) {
        return None;
    }
    let path = match scheme(uri) {
        Some(s) => {
            let rest = &uri[s.len() + 1..];
            // `file:///abs` and `file://localhost/abs` both name `/abs`.
            match rest.strip_prefix("//") {
                Some(authority) => authority
                    .find('/')
                    .map_or(authority, |slash| &authority[slash..]),
                None => rest,
            }
        }
        None => uri,
    };
    Some(PathBuf::from(path))
}

/// Reads scripts from the local file system.
#[derive(Clone, Debug)]
pub struct FileResolver {
    root: PathBuf,
}

impl FileResolver {
    /// Relative URIs without a base resolve against `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FileResolver { root: root.into() }
    }

    fn locate(&self, uri: &str, base: Option<&str>) -> io::Result<PathBuf> {
        let path = local_path(uri).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::Unsupported,
                format!("`{uri}` is not a local file"),
            )
        })?;
        if path.is_absolute() {
            return Ok(path);
        }
        let dir = base
            .and_then(local_path)
            .and_then(|base| base.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| self.root.clone());
        Ok(dir.join(path))
    }
}

impl Default for FileResolver {
    fn default() -> Self {
        FileResolver::new(".")
    }
}

impl SourceResolver for FileResolver {
    fn resolve(&self, uri: &str, base: Option<&str>) -> io::Result<Source> {
        let path = self.locate(uri, base)?;
        trace!(uri, path = %path.display(), "reading script");
        let file = File::open(&path)?;
        Source::from_reader(path.to_string_lossy(), BufReader::new(file))
    }
}

/// Serves scripts registered in memory.
///
/// A lookup tries the URI as given, then joined to the base URI's
/// directory.
#[derive(Clone, Debug, Default)]
pub struct MemoryResolver {
    scripts: FxHashMap<String, String>,
}

impl MemoryResolver {
    pub fn new() -> Self {
        MemoryResolver::default()
    }

    pub fn insert(&mut self, uri: impl Into<String>, text: impl Into<String>) {
        self.scripts.insert(uri.into(), text.into());
    }

    /// Builder form of [`MemoryResolver::insert`].
    #[must_use]
    pub fn with(mut self, uri: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(uri, text);
        self
    }

    pub fn len(&self) -> usize {
        self.scripts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty()
    }
}

impl SourceResolver for MemoryResolver {
    fn resolve(&self, uri: &str, base: Option<&str>) -> io::Result<Source> {
        let relative = base
            .and_then(|base| base.rsplit_once('/'))
            .map(|(dir, _)| format!("{dir}/{uri}"));
        let candidates = std::iter::once(uri.to_string()).chain(relative);
        for candidate in candidates {
            if let Some(text) = self.scripts.get(&candidate) {
                return Ok(Source::new(candidate, text.clone()));
            }
        }
        Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("no script registered as `{uri}`"),
        ))
    }
}
