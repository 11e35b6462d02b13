//! Readable-text projection of captured HTML.
//!
//! Mirrors what a reader would see on the rendered page: `script`, `style`,
//! and `noscript` subtrees are dropped entirely, block-level elements
//! produce line breaks, and whitespace is normalized (no trailing spaces
//! before a newline, at most one blank line in a row, trimmed at both
//! ends).

use scraper::{ElementRef, Html, Selector};

const SKIPPED_TAGS: &[&str] = &["script", "style", "noscript"];

const BLOCK_TAGS: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "dd",
    "details",
    "div",
    "dl",
    "dt",
    "fieldset",
    "figcaption",
    "figure",
    "footer",
    "form",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "li",
    "main",
    "nav",
    "ol",
    "p",
    "pre",
    "section",
    "table",
    "td",
    "th",
    "tr",
    "ul",
];

/// Project HTML markup to readable text.
///
/// Starts at `<body>` when present, falling back to the document root for
/// fragments without one.
pub fn readable_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let body = Selector::parse("body").expect("static selector must parse");

    let mut raw = String::new();
    match document.select(&body).next() {
        Some(el) => collect(el, &mut raw),
        None => collect(document.root_element(), &mut raw),
    }
    normalize_whitespace(&raw)
}

fn collect(el: ElementRef<'_>, out: &mut String) {
    let tag = el.value().name();
    if SKIPPED_TAGS.contains(&tag) {
        return;
    }
    // Void line-break elements: one newline, no children to visit.
    if tag == "br" || tag == "hr" {
        out.push('\n');
        return;
    }
    let block = BLOCK_TAGS.contains(&tag);
    if block {
        out.push('\n');
    }
    for child in el.children() {
        if let Some(text) = child.value().as_text() {
            push_collapsed(text, out);
        } else if let Some(child_el) = ElementRef::wrap(child) {
            collect(child_el, out);
        }
    }
    if block {
        out.push('\n');
    }
}

/// Append a raw text node with its whitespace runs collapsed to single
/// spaces, the way a rendered page displays them.
fn push_collapsed(text: &str, out: &mut String) {
    let mut last_space = out.is_empty() || out.ends_with(|c: char| c.is_whitespace());
    for ch in text.chars() {
        if ch.is_whitespace() {
            if !last_space {
                out.push(' ');
                last_space = true;
            }
        } else {
            out.push(ch);
            last_space = false;
        }
    }
}

/// Final cleanup pass: strip horizontal whitespace that directly precedes a
/// newline, cap consecutive newlines at two, and trim both ends.
pub fn normalize_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if ch == '\n' {
            while out.ends_with(' ') || out.ends_with('\t') {
                out.pop();
            }
            if !out.ends_with("\n\n") {
                out.push('\n');
            }
        } else {
            out.push(ch);
        }
    }
    out.trim().to_string()
}
