#![allow(
    clippy::unwrap_used,
    reason = "test code uses unwrap for concise assertions"
)]

use super::*;
use pretty_assertions::assert_eq;
use std::fs;

fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(ToString::to_string).collect()
}

#[test]
fn parse_all_flags() {
    let options = parse_weave_options(&args(&[
        "--stop=cocoon.sendPageAndWait",
        "--stop=suspend*",
        "--serialize",
        "--tab-width=2",
        "--output=out.js",
    ]));
    assert_eq!(
        options,
        WeaveOptions {
            stop_functions: args(&["cocoon.sendPageAndWait", "suspend*"]),
            serialize: true,
            tab_width: Some(2),
            output: Some(PathBuf::from("out.js")),
        }
    );
}

#[test]
fn invalid_tab_width_is_ignored() {
    let options = parse_weave_options(&args(&["--tab-width=wide", "--bogus"]));
    assert_eq!(options, WeaveOptions::default());
}

#[test]
fn merge_accumulates_stop_functions() {
    let mut options = parse_weave_options(&args(&["--stop=a"]));
    options.merge(&parse_weave_options(&args(&["--stop=b", "-o=x.js"])));
    assert_eq!(options.stop_functions, args(&["a", "b"]));
    assert_eq!(options.output, Some(PathBuf::from("x.js")));
}

#[test]
fn config_keeps_defaults_when_unset() {
    assert_eq!(WeaveOptions::default().config(), WeaverConfig::default());

    let options = WeaveOptions {
        stop_functions: args(&["wait"]),
        serialize: true,
        tab_width: Some(8),
        output: None,
    };
    let config = options.config();
    assert_eq!(config.stop_functions, args(&["wait"]));
    assert!(config.serialize_result);
    assert_eq!(config.tab_width, 8);
}

#[test]
fn weave_script_reads_aspects_beside_base() {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.path().join("main.js");
    fs::write(&base, "cocoon.apply(\"aspects.js\");\nfunction f() { g(); }\n").unwrap();
    fs::write(
        dir.path().join("aspects.js"),
        "function f() { after() { done(); } }",
    )
    .unwrap();

    let woven = weave_script(base.to_str().unwrap(), &WeaveOptions::default()).unwrap();
    assert!(woven.contains("done();"));
    assert!(woven.contains("/* cocoon.apply(\"aspects.js\"); */"));
    assert!(!dir.path().join("main_intercepted.js").exists());
}

#[test]
fn weave_script_serializes_on_request() {
    let dir = tempfile::tempdir().unwrap();
    let base = dir.path().join("flow.js");
    fs::write(&base, "function f() { return 1; }").unwrap();

    let options = WeaveOptions {
        serialize: true,
        ..WeaveOptions::default()
    };
    let woven = weave_script(base.to_str().unwrap(), &options).unwrap();
    let written = fs::read_to_string(dir.path().join("flow_intercepted.js")).unwrap();
    assert_eq!(written, woven);
}

#[test]
fn weave_script_reports_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.js");
    let err = weave_script(missing.to_str().unwrap(), &WeaveOptions::default()).unwrap_err();
    assert!(matches!(err, WeaveError::Io { .. }));
}
