#![allow(
    clippy::unwrap_used,
    reason = "test code uses unwrap for concise assertions"
)]

use super::*;
use crate::advice::read_interceptors;
use crate::passes::{inject_events, rewrite_returns, StopFunctions};
use jsaw_lexer::tokenize;
use pretty_assertions::assert_eq;

fn groups(aspects: &[(&str, &str)]) -> Vec<InterceptionList> {
    aspects
        .iter()
        .map(|(uri, text)| read_interceptors(uri, &tokenize(text)).unwrap())
        .collect()
}

fn weave_with(base: &str, aspects: &[(&str, &str)], stops: &StopFunctions) -> String {
    let marked = inject_events(&tokenize(base), stops).unwrap();
    let rewritten = rewrite_returns(&marked);
    splice_advice(&rewritten, &groups(aspects)).render()
}

fn weave(base: &str, aspects: &[(&str, &str)]) -> String {
    weave_with(base, aspects, &StopFunctions::default())
}

fn index_of(haystack: &str, needle: &str) -> usize {
    haystack
        .find(needle)
        .unwrap_or_else(|| panic!("`{needle}` not found in:\n{haystack}"))
}

#[test]
fn before_advice_follows_opening_brace() {
    assert_eq!(
        weave(
            "function hello(x) { return x + 1; }",
            &[("a.js", "function hello(x) { before() { log(); } }")],
        ),
        "function hello(x) {\n\
         /* ---- begin before interception(s): hello ---- */\n\
         /* hello:before from a.js */\n log(); \n\
         /* ---- end before interception(s): hello ---- */\n \
         var ____interceptionReturn____ = x + 1; \n\
         /* moved return statement */\n\
         return ____interceptionReturn____;\n}"
    );
}

#[test]
fn after_advice_runs_before_moved_return() {
    let woven = weave(
        "function f() { return 1; }",
        &[("a.js", "function f() { after() { done(); } }")],
    );
    assert!(index_of(&woven, "done();") < index_of(&woven, "return ____interceptionReturn____;"));
    assert!(index_of(&woven, "var ____interceptionReturn____ = 1;") < index_of(&woven, "done();"));
}

#[test]
fn no_matching_advice_leaves_tokens() {
    let base = "function f() { a(); }";
    assert_eq!(weave(base, &[("a.js", "function g() { before() { b(); } }")]), base);
}

#[test]
fn markers_are_not_copied() {
    let marked = inject_events(&tokenize("function f() { a(); }"), &StopFunctions::default()).unwrap();
    let spliced = splice_advice(&marked, &[]);
    assert_eq!(spliced.markers().count(), 0);
    assert_eq!(spliced.render(), "function f() { a(); }");
}

#[test]
fn groups_are_applied_in_order() {
    let woven = weave(
        "function f() { }",
        &[
            ("one.js", "function f() { before() { one(); } }"),
            ("two.js", "function f() { before() { two(); } }"),
        ],
    );
    assert!(index_of(&woven, "one();") < index_of(&woven, "two();"));
    assert_eq!(woven.matches("begin before interception(s): f").count(), 1);
    assert!(woven.contains("/* f:before from one.js */"));
    assert!(woven.contains("/* f:before from two.js */"));
}

#[test]
fn after_advice_keeps_declaration_order() {
    let woven = weave(
        "function f() { }",
        &[(
            "a.js",
            "function f() { after() { first(); } } function f*() { after() { second(); } }",
        )],
    );
    assert!(index_of(&woven, "first();") < index_of(&woven, "second();"));
}

#[test]
fn wildcard_advice_matches_by_prefix() {
    let woven = weave(
        "function getX() { } function setX() { }",
        &[("a.js", "function get*() { before() { w(); } }")],
    );
    assert_eq!(woven.matches("w();").count(), 1);
    assert!(index_of(&woven, "w();") < index_of(&woven, "function setX"));
}

#[test]
fn around_replaces_body_and_return() {
    assert_eq!(
        weave(
            "function f() { a(); return 1; }",
            &[("a.js", "function f() { around() { b(); } }")],
        ),
        "function f() {\n\
         /* ---- begin around interception(s): f ---- */\n\
         /* f:around from a.js */\n b(); \n\
         /* ---- end around interception(s): f ---- */\n}"
    );
}

#[test]
fn around_keeps_before_and_after() {
    let woven = weave(
        "function f() { a(); }",
        &[(
            "a.js",
            "function f() { before() { b(); } around() { r(); } after() { e(); } }",
        )],
    );
    let before = index_of(&woven, "b();");
    let around = index_of(&woven, "r();");
    let after = index_of(&woven, "e();");
    assert!(before < around && around < after);
    assert!(!woven.contains("a();"));
}

#[test]
fn around_drops_nested_functions() {
    let woven = weave(
        "function outer() { function inner() { i(); } o(); } next();",
        &[("a.js", "function outer() { around() { r(); } }")],
    );
    assert!(!woven.contains("i();"));
    assert!(!woven.contains("o();"));
    assert!(woven.ends_with("*/\n} next();"));
}

#[test]
fn several_around_advices_are_all_emitted() {
    let woven = weave(
        "function f() { a(); }",
        &[
            ("one.js", "function f() { around() { one(); } }"),
            ("two.js", "function f() { around() { two(); } }"),
        ],
    );
    assert!(index_of(&woven, "one();") < index_of(&woven, "two();"));
    assert!(!woven.contains("a();"));
    assert_eq!(woven.matches("}").count(), 1);
}

#[test]
fn stop_and_continue_surround_the_call() {
    let stops = StopFunctions::new(["cocoon.sendPageAndWait"]).unwrap();
    let woven = weave_with(
        "function f() { cocoon.sendPageAndWait(\"p\"); g(); }",
        &[(
            "a.js",
            "function f() { stopExecution() { s(); } continueExecution() { c(); } }",
        )],
        &stops,
    );
    let stop = index_of(&woven, "s();");
    let call = index_of(&woven, "cocoon.sendPageAndWait");
    let resume = index_of(&woven, "c();");
    let next = index_of(&woven, "g();");
    assert!(stop < call && call < resume && resume < next);
    assert!(woven.contains("begin stopExecution interception(s): f"));
    assert!(woven.contains("begin continueExecution interception(s): f"));
}

#[test]
fn around_on_inner_function_drops_outer_stop_pair() {
    let stops = StopFunctions::new(["cocoon.sendPageAndWait"]).unwrap();
    let woven = weave_with(
        "function outer() { function inner() {cocoon.sendPageAndWait(\"p\"); } }",
        &[(
            "a.js",
            "function inner() { around() { replaced(); } }\n\
             function outer() { stopExecution() { stopped(); } continueExecution() { resumed(); } }",
        )],
        &stops,
    );
    assert!(woven.contains("replaced();"));
    assert!(!woven.contains("sendPageAndWait"));
    assert!(!woven.contains("stopped();"));
    assert!(!woven.contains("resumed();"));
}

#[test]
fn stop_advice_stays_outside_object_literal() {
    let stops = StopFunctions::new(["cocoon.sendPageAndWait"]).unwrap();
    let woven = weave_with(
        "function f() { var r = {a: cocoon.sendPageAndWait(\"p\")}; }",
        &[(
            "a.js",
            "function f() { stopExecution() { stopped(); } continueExecution() { resumed(); } }",
        )],
        &stops,
    );
    assert!(index_of(&woven, "stopped();") < index_of(&woven, "var r = {a: cocoon"));
    assert!(index_of(&woven, "(\"p\")};") < index_of(&woven, "resumed();"));
}
