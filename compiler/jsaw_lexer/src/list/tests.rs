use super::*;
use crate::token::EventKind;
use crate::tokenize;
use pretty_assertions::assert_eq;

fn texts(list: &TokenList) -> Vec<String> {
    list.iter()
        .map(|item| match item {
            Item::Token(t) => t.text().to_string(),
            Item::Marker(m) => m.to_string(),
        })
        .collect()
}

#[test]
fn markers_render_as_nothing() {
    let mut list = tokenize("a;");
    list.push(Marker::new(EventKind::FunctionEnd, "f"));
    assert_eq!(list.len(), 3);
    assert_eq!(list.render(), "a;");
    assert_eq!(list.to_string(), "a;");
    assert_eq!(list.markers().count(), 1);
}

#[test]
fn next_significant_skips_trivia_and_markers() {
    let mut list = TokenList::new();
    list.push(Token::code("a"));
    list.push(Token::whitespace(1));
    list.push(Marker::new(EventKind::FunctionStart, "f"));
    list.push(Token::comment("c"));
    list.push(Token::line_feed());
    list.push_token(TokenKind::Semicolon, ";");
    assert_eq!(list.next_significant(1), Some(5));
    assert_eq!(list.next_significant(0), Some(0));
    assert_eq!(list.next_significant(6), None);
}

#[test]
fn offset_of_counts_rendered_bytes() {
    let list = tokenize("ab  é;");
    // [ab] [  ] [é] [;]
    assert_eq!(list.offset_of(0), 0);
    assert_eq!(list.offset_of(2), 4);
    assert_eq!(list.offset_of(3), 6);
    assert_eq!(list.offset_of(99), 7);
}

#[test]
fn cursor_insert_before_keeps_position_on_item() {
    let mut list = tokenize("a b");
    let mut cursor = list.cursor();
    assert!(cursor.advance());
    assert!(cursor.advance());
    cursor.insert_before(Marker::new(EventKind::StopExecution, "f"));
    assert_eq!(cursor.current().map(Item::text), Some("b"));
    assert_eq!(cursor.position(), 3);
    assert_eq!(texts(&list), vec!["a", " ", "<f:stopExecution>", "b"]);
}

#[test]
fn cursor_insert_after_and_peek() {
    let mut list = tokenize("a;");
    let mut cursor = list.cursor();
    cursor.insert_after(Token::whitespace(2));
    assert_eq!(cursor.peek(1).map(Item::text), Some("  "));
    assert_eq!(cursor.peek(2).map(Item::text), Some(";"));
    assert_eq!(cursor.peek(3), None);
    assert_eq!(list.render(), "a  ;");
}

#[test]
fn cursor_remove_moves_to_successor() {
    let mut list = tokenize("a b c");
    let mut cursor = list.cursor();
    let removed = cursor.remove();
    assert_eq!(removed.as_ref().map(Item::text), Some("a"));
    assert_eq!(cursor.current().map(Item::text), Some(" "));
    cursor.seek(100);
    assert!(cursor.is_at_end());
    assert_eq!(cursor.remove(), None);
    assert_eq!(list.render(), " b c");
}

#[test]
fn cursor_splice_inserts_whole_list() {
    let mut list = tokenize("f();");
    let advice = tokenize("log(); ");
    let mut cursor = list.cursor();
    cursor.splice(advice);
    assert_eq!(cursor.current().map(Item::text), Some("f"));
    assert_eq!(list.render(), "log(); f();");
}

#[test]
fn extend_from_copies_items() {
    let source = tokenize("x = 1;");
    let mut target = TokenList::new();
    target.extend_from(&source);
    target.extend_from(&source);
    assert_eq!(target.render(), "x = 1;x = 1;");
    assert_eq!(source.render(), "x = 1;");
}
