//! Visible text of parsed documents.

use lazy_static::lazy_static;
use scraper::{ElementRef, Html, Node, Selector};

const HIDDEN_TAGS: &[&str] = &["script", "style", "noscript", "template"];

lazy_static! {
    static ref BODY_SELECTOR: Selector =
        Selector::parse("body").expect("static 'body' CSS selector is valid");
}

/// Text nodes under `element` in document order, skipping script-like
/// subtrees. Each node is visited once.
pub fn visible_segments<'a>(element: ElementRef<'a>) -> impl Iterator<Item = &'a str> + 'a {
    let mut stack: Vec<_> = element.children().rev().collect();
    std::iter::from_fn(move || {
        while let Some(node) = stack.pop() {
            match node.value() {
                Node::Text(text) => return Some(&**text),
                Node::Element(el) if HIDDEN_TAGS.contains(&el.name()) => {}
                _ => stack.extend(node.children().rev()),
            }
        }
        None
    })
}

/// Concatenated visible text under `element`.
pub fn visible_text(element: ElementRef<'_>) -> String {
    visible_segments(element).collect()
}

/// Visible text of `<body>`, or of the whole document if there is none.
pub fn body_text(document: &Html) -> String {
    match document.select(&BODY_SELECTOR).next() {
        Some(body) => visible_text(body),
        None => visible_text(document.root_element()),
    }
}
