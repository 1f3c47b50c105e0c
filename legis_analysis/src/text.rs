//! Turns a bill text XML document into normalized, comparable plain text.

use log::debug;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use regex::Regex;
use snafu::prelude::*;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;
use unicode_normalization::char::canonical_combining_class;
use unicode_normalization::UnicodeNormalization;

use crate::config::*;

// Sections whose heading is one of these are rarely carried over verbatim into another bill.
const SKIPPED_HEADINGS: [&str; 2] = ["short title", "effective date"];

// Boilerplate phrases collapsed into single tokens so that they weigh less in a comparison.
const PHRASE_TOKENS: [(&str, &str); 3] = [
    ("is amended by striking", "/IABS/"),
    (
        "is amended by adding at the end the following",
        "/IABAATETF/",
    ),
    ("after the date of enactment of this act", "/ATDOEOTA/"),
];

// An element with the text/tail split of the document: `text` comes before the first
// child and `tail` follows the closing tag, up to the next sibling.
#[derive(Debug, Default)]
struct Element {
    name: String,
    deleted: bool,
    text: String,
    children: Vec<Element>,
    tail: String,
}

/// Reads the bill text XML file at `path` and returns its normalized text.
pub fn extract_text(path: &Path) -> Result<String, FormatError> {
    let xml = fs::read_to_string(path).context(UnreadableSnafu {
        path: path.display().to_string(),
    })?;
    extract_text_from_str(&xml)
}

/// Extracts and normalizes the substantive text of a bill text XML document.
///
/// Only the `legis-body` and `resolution-body` children of the root element are read.
/// Struck-out text, headings, enumerators and the short title and effective date
/// sections are left out.
pub fn extract_text_from_str(xml: &str) -> Result<String, FormatError> {
    let root = parse_tree(xml)?;
    let bodies: Vec<&Element> = root
        .children
        .iter()
        .filter(|c| c.name == "legis-body" || c.name == "resolution-body")
        .collect();
    ensure!(
        !bodies.is_empty(),
        MissingBodySnafu {
            root: root.name.clone()
        }
    );
    let mut buf = String::new();
    for body in bodies {
        serialize_node(body, &mut buf);
    }
    debug!("extract_text_from_str: serialized {} chars", buf.len());
    Ok(normalize_text(&buf))
}

/// Normalizes raw text for comparison: lowercase, single spaces, one kind of dash,
/// no punctuation before spaces, boilerplate phrases as single tokens and no
/// combining marks.
pub fn normalize_text(raw: &str) -> String {
    let text = raw.to_lowercase();
    let text = whitespace_re().replace_all(&text, " ");
    let text = dashes_re().replace_all(&text, "-");
    let mut text = trailing_punctuation_re()
        .replace_all(&text, " ")
        .into_owned();
    for (phrase, token) in PHRASE_TOKENS {
        text = text.replace(phrase, token);
    }
    text.nfkd()
        .filter(|c| canonical_combining_class(*c) == 0)
        .collect()
}

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("valid whitespace pattern"))
}

fn dashes_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new("[\u{2212}\u{2013}\u{2014}~\u{2010}]+").expect("valid dash pattern"))
}

fn trailing_punctuation_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\W+ ").expect("valid punctuation pattern"))
}

fn parse_tree(xml: &str) -> Result<Element, FormatError> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;
    loop {
        let position = reader.buffer_position() as u64;
        match reader.read_event().context(XmlSyntaxSnafu { position })? {
            Event::Start(e) => stack.push(open_element(&e)),
            Event::Empty(e) => attach(&mut stack, &mut root, open_element(&e)),
            Event::End(_) => {
                if let Some(done) = stack.pop() {
                    attach(&mut stack, &mut root, done);
                }
            }
            Event::Text(t) => {
                let s = t.unescape().map_err(|e| FormatError::Undecodable {
                    message: e.to_string(),
                    position,
                })?;
                append_text(&mut stack, &s);
            }
            Event::CData(c) => append_text(&mut stack, &String::from_utf8_lossy(&c)),
            Event::Eof => break,
            _ => {}
        }
    }
    if let Some(open) = stack.last() {
        return UnclosedSnafu {
            tag: open.name.clone(),
        }
        .fail();
    }
    root.context(EmptyDocumentSnafu {})
}

fn open_element(e: &BytesStart) -> Element {
    let deleted = e
        .attributes()
        .flatten()
        .any(|a| a.key.as_ref() == b"changed" && a.value.as_ref() == b"deleted");
    Element {
        name: String::from_utf8_lossy(e.name().as_ref()).into_owned(),
        deleted,
        ..Element::default()
    }
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
    } else if root.is_none() {
        *root = Some(element);
    }
}

fn append_text(stack: &mut [Element], s: &str) {
    // Text outside of the root element is dropped.
    if let Some(top) = stack.last_mut() {
        match top.children.last_mut() {
            Some(previous) => previous.tail.push_str(s),
            None => top.text.push_str(s),
        }
    }
}

fn serialize_node(node: &Element, buf: &mut String) {
    serialize_within_node(node, buf);
    buf.push_str(&node.tail);
}

fn serialize_within_node(node: &Element, buf: &mut String) {
    if node.deleted || node.name == "header" || node.name == "enum" {
        return;
    }
    if let Some(header) = node.children.iter().find(|c| c.name == "header") {
        if is_skipped_heading(&header.text) {
            return;
        }
    }
    buf.push_str(&node.text);
    for child in node.children.iter() {
        serialize_node(child, buf);
    }
    // Block-level text must not run into what follows.
    if node.name == "text" {
        buf.push(' ');
    }
}

fn is_skipped_heading(heading: &str) -> bool {
    let heading = heading
        .split_whitespace()
        .collect::<Vec<&str>>()
        .join(" ")
        .to_lowercase();
    SKIPPED_HEADINGS.contains(&heading.as_str())
}
