//! Debug commands: `tokens` and `aspects` for inspecting weaver input.

use std::fmt::Write;

use jsaw_lexer::tokenize;
use jsaw_weaver::{read_interceptors, MalformedScriptError};

use super::read_file;

/// One line per token: kind and quoted text.
pub fn format_tokens(source: &str) -> String {
    let tokens = tokenize(source);
    let mut out = String::new();
    for token in tokens.tokens() {
        let _ = writeln!(out, "  {:<12} {:?}", token.kind().name(), token.text());
    }
    out
}

/// The interceptors an aspect script declares, in declaration order.
pub fn format_aspects(uri: &str, source: &str) -> Result<String, MalformedScriptError> {
    let interceptors = read_interceptors(uri, &tokenize(source))?;
    let mut out = String::new();
    for interceptor in &interceptors {
        let _ = writeln!(
            out,
            "  {:<24} {} token(s)",
            interceptor.name(),
            interceptor.body().len()
        );
    }
    Ok(out)
}

/// Tokenize a file and print the token stream.
pub fn tokens_file(path: &str) {
    let content = read_file(path);
    let listing = format_tokens(&content);
    println!("Tokens for '{path}' ({} tokens):", listing.lines().count());
    print!("{listing}");
}

/// Read an aspect script and print its interceptors.
pub fn aspects_file(path: &str) {
    let content = read_file(path);
    match format_aspects(path, &content) {
        Ok(listing) => {
            println!(
                "Interceptors in '{path}' ({}):",
                listing.lines().count()
            );
            print!("{listing}");
        }
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }
}
