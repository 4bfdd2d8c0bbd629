//! HTML tokenizer module.
//!
//! Implements the parts of [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
//! that element trees depend on: tags, attributes, comments and raw text.

/// HTML tokenizer state machine implementation.
pub mod machine;
/// Token types produced by the tokenizer.
pub mod token;

pub use machine::{HTMLTokenizer, TokenizerState};
pub use token::{Attribute, Token};
