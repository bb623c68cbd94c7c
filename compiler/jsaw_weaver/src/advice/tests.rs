#![allow(
    clippy::unwrap_used,
    reason = "test code uses unwrap for concise assertions"
)]

use super::*;
use jsaw_lexer::tokenize;
use pretty_assertions::assert_eq;

fn read(source: &str) -> Result<InterceptionList, MalformedScriptError> {
    read_interceptors("aspects.js", &tokenize(source))
}

fn names(list: &InterceptionList) -> Vec<&str> {
    list.iter().map(Interceptor::name).collect()
}

#[test]
fn advice_literals_round_trip() {
    for kind in AdviceKind::ALL {
        assert_eq!(AdviceKind::from_literal(kind.literal()), Some(kind));
    }
    assert_eq!(AdviceKind::from_literal("beforeAll"), None);
}

#[test]
fn function_start_applies_before_then_around() {
    assert_eq!(
        AdviceKind::for_event(EventKind::FunctionStart),
        &[AdviceKind::Before, AdviceKind::Around]
    );
    assert_eq!(
        AdviceKind::for_event(EventKind::ContinueExecution),
        &[AdviceKind::ContinueExecution]
    );
}

#[test]
fn reads_advice_in_declaration_order() {
    let list = read(
        "function hello(x) {\n  before() { log(1); }\n  after() { log(2); }\n}\n\
         function get*() { around() { return 0; } }",
    )
    .unwrap();
    assert_eq!(list.source_uri(), "aspects.js");
    assert_eq!(names(&list), vec!["hello:before", "hello:after", "get*:around"]);
    assert_eq!(list.iter().next().map(|i| i.body().render()).as_deref(), Some(" log(1); "));
}

#[test]
fn all_five_advice_kinds_are_recognised() {
    let list = read(
        "function f() { before() {} after() {} around() {} \
         stopExecution() {} continueExecution() {} }",
    )
    .unwrap();
    let kinds: Vec<AdviceKind> = list.iter().map(Interceptor::kind).collect();
    assert_eq!(kinds, AdviceKind::ALL.to_vec());
}

#[test]
fn advice_body_keeps_nested_braces() {
    let list = read("function f() { before() { if (a) { b(); } } }").unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(
        list.iter().next().map(|i| i.body().render()).as_deref(),
        Some(" if (a) { b(); } ")
    );
}

#[test]
fn nested_advice_keywords_are_not_interceptors() {
    // `after` inside a body is body content, not a second interceptor.
    let list = read("function f() { before() { function g() { after() {} } } }").unwrap();
    assert_eq!(names(&list), vec!["f:before"]);
}

#[test]
fn other_top_level_code_is_ignored() {
    let list = read("var x = 1;\nfunction f() { var y; before() { a(); } before; }").unwrap();
    assert_eq!(names(&list), vec!["f:before"]);
}

#[test]
fn wildcard_function_name_becomes_pattern() {
    let list = read("function get*() { before() { } }").unwrap();
    let interceptor = list.iter().next().unwrap();
    assert_eq!(interceptor.function_pattern(), "get*");
    assert!(interceptor.applies_to("getUser", AdviceKind::Before));
    assert!(!interceptor.applies_to("setUser", AdviceKind::Before));
    assert!(!interceptor.applies_to("getUser", AdviceKind::After));
}

#[test]
fn matching_filters_by_name_and_kind() {
    let list = read("function *() { before() { a(); } after() { b(); } }").unwrap();
    let matched: Vec<&str> = list
        .matching("anything", AdviceKind::After)
        .map(Interceptor::name)
        .collect();
    assert_eq!(matched, vec!["*:after"]);
}

#[test]
fn empty_script_has_no_interceptors() {
    assert!(read("").unwrap().is_empty());
}

#[test]
fn anonymous_aspect_function_is_malformed() {
    let err = read("function () { before() {} }").unwrap_err();
    assert_eq!(err.kind, MalformedKind::MissingFunctionName);
    assert_eq!(err.uri.as_deref(), Some("aspects.js"));
    assert_eq!(err.offset, 0);
}

#[test]
fn unclosed_aspect_function_is_malformed() {
    let err = read("function f() { before() { a(); }").unwrap_err();
    assert_eq!(err.kind, MalformedKind::UnbalancedBraces);
    assert_eq!(err.offset, 13);
}

#[test]
fn unclosed_advice_body_is_malformed() {
    let err = read("function f() {\n before() { a();\n").unwrap_err();
    assert_eq!(err.kind, MalformedKind::UnbalancedBraces);
}

#[test]
fn missing_parameter_list_is_malformed() {
    let err = read("function f").unwrap_err();
    assert_eq!(err.kind, MalformedKind::UnexpectedEof { expected: "`(`" });
}

#[test]
fn missing_body_is_malformed() {
    let err = read("function f()").unwrap_err();
    assert_eq!(err.kind, MalformedKind::UnexpectedEof { expected: "`{`" });
}
