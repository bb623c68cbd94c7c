//! Ordered, owning sequence of tokens and markers.

use std::fmt;

use crate::token::{Item, Marker, Token, TokenKind};

/// An ordered list of [`Item`]s.
///
/// Passes over the list are usually written in builder style: iterate the
/// input and push original or synthetic items onto a fresh list. For local
/// edits a [`TokenCursor`] offers insert/remove/splice at a position.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct TokenList {
    items: Vec<Item>,
}

impl TokenList {
    #[inline]
    pub fn new() -> Self {
        TokenList { items: Vec::new() }
    }

    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        TokenList {
            items: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn push(&mut self, item: impl Into<Item>) {
        self.items.push(item.into());
    }

    /// Push a token built from `kind` and `text`.
    #[inline]
    pub fn push_token(&mut self, kind: TokenKind, text: impl Into<String>) {
        self.items.push(Item::Token(Token::new(kind, text)));
    }

    /// Append copies of every item in `other`.
    pub fn extend_from(&mut self, other: &TokenList) {
        self.items.extend(other.items.iter().cloned());
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }

    #[inline]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Item> {
        self.items.iter()
    }

    /// Tokens only, skipping markers.
    pub fn tokens(&self) -> impl Iterator<Item = &Token> {
        self.items.iter().filter_map(Item::as_token)
    }

    /// Markers only, in list order.
    pub fn markers(&self) -> impl Iterator<Item = &Marker> {
        self.items.iter().filter_map(Item::as_marker)
    }

    /// Index of the first item at or after `from` that is a token and not
    /// trivia. Markers are skipped as well.
    pub fn next_significant(&self, from: usize) -> Option<usize> {
        self.items
            .iter()
            .enumerate()
            .skip(from)
            .find(|(_, item)| item.as_token().is_some_and(|t| !t.is_trivia()))
            .map(|(i, _)| i)
    }

    /// Byte offset of item `index` in the rendered text.
    ///
    /// An index past the end yields the length of the rendered text.
    pub fn offset_of(&self, index: usize) -> usize {
        self.items
            .iter()
            .take(index)
            .map(|item| item.text().len())
            .sum()
    }

    /// Concatenated text of every token.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.items.iter().map(|i| i.text().len()).sum());
        for item in &self.items {
            out.push_str(item.text());
        }
        out
    }

    /// Mutable cursor positioned on the first item.
    pub fn cursor(&mut self) -> TokenCursor<'_> {
        TokenCursor { list: self, pos: 0 }
    }
}

impl fmt::Display for TokenList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for item in &self.items {
            f.write_str(item.text())?;
        }
        Ok(())
    }
}

impl From<Vec<Item>> for TokenList {
    fn from(items: Vec<Item>) -> Self {
        TokenList { items }
    }
}

impl FromIterator<Item> for TokenList {
    fn from_iter<I: IntoIterator<Item = Item>>(iter: I) -> Self {
        TokenList {
            items: iter.into_iter().collect(),
        }
    }
}

impl FromIterator<Token> for TokenList {
    fn from_iter<I: IntoIterator<Item = Token>>(iter: I) -> Self {
        TokenList {
            items: iter.into_iter().map(Item::Token).collect(),
        }
    }
}

impl IntoIterator for TokenList {
    type Item = Item;
    type IntoIter = std::vec::IntoIter<Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a TokenList {
    type Item = &'a Item;
    type IntoIter = std::slice::Iter<'a, Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

/// Cursor for in-place edits of a [`TokenList`].
///
/// The cursor sits *on* an item (or one past the end). Insertions before the
/// cursor keep it on the same item; removal moves it onto the following one.
pub struct TokenCursor<'a> {
    list: &'a mut TokenList,
    pos: usize,
}

impl TokenCursor<'_> {
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.pos >= self.list.items.len()
    }

    #[inline]
    pub fn current(&self) -> Option<&Item> {
        self.list.items.get(self.pos)
    }

    /// Item `n` positions after the current one, without moving.
    #[inline]
    pub fn peek(&self, n: usize) -> Option<&Item> {
        self.list.items.get(self.pos + n)
    }

    /// Move to the next item. Returns `false` once past the end.
    pub fn advance(&mut self) -> bool {
        if self.pos < self.list.items.len() {
            self.pos += 1;
        }
        !self.is_at_end()
    }

    /// Jump to `pos`, clamped to one past the end.
    pub fn seek(&mut self, pos: usize) {
        self.pos = pos.min(self.list.items.len());
    }

    pub fn insert_before(&mut self, item: impl Into<Item>) {
        self.list.items.insert(self.pos, item.into());
        self.pos += 1;
    }

    pub fn insert_after(&mut self, item: impl Into<Item>) {
        let at = (self.pos + 1).min(self.list.items.len());
        self.list.items.insert(at, item.into());
    }

    /// Remove the current item; the cursor then sits on its successor.
    pub fn remove(&mut self) -> Option<Item> {
        if self.is_at_end() {
            return None;
        }
        Some(self.list.items.remove(self.pos))
    }

    /// Insert all of `other` before the current item.
    pub fn splice(&mut self, other: TokenList) {
        let added = other.items.len();
        self.list.items.splice(self.pos..self.pos, other.items);
        self.pos += added;
    }
}

#[cfg(test)]
mod tests;
