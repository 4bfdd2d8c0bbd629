//! HTML tokenizer and tree builder for the Wombat selector engine.
//!
//! # Scope
//!
//! This crate turns markup into a [`wombat_dom::DomTree`] so selectors can be
//! run against real documents:
//! - **Tokenizer** ([WHATWG § 13.2.5](https://html.spec.whatwg.org/multipage/parsing.html#tokenization))
//!   - Data, RAWTEXT and tag states, quoted and unquoted attribute values
//!   - Comments; DOCTYPE is recognised and dropped
//!
//! - **Tree builder** ([WHATWG § 13.2.6](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction))
//!   - Implied `<html>`, `<head>` and `<body>`
//!   - Void elements and self-closing tags
//!
//! # Not Implemented
//!
//! - Character reference decoding
//! - Table, form and formatting element insertion rules

/// Tree construction from tokens.
pub mod parser;
/// HTML tokenizer for converting input into tokens.
pub mod tokenizer;

pub use parser::{HTMLParser, InsertionMode, dump_tree, format_start_tag};
pub use tokenizer::{Attribute, HTMLTokenizer, Token};

use wombat_dom::DomTree;

/// Tokenize and tree-build `html` in one step.
#[must_use]
pub fn parse_document(html: &str) -> DomTree {
    let mut tokenizer = HTMLTokenizer::new(html.to_string());
    tokenizer.run();
    HTMLParser::new(tokenizer.into_tokens()).run()
}
