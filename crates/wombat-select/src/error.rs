//! Errors raised while compiling a selector.

use thiserror::Error;

/// The only way a query can fail: the selector text contains a construct the
/// grammar does not recognise. A selector that matches nothing is not an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    /// No predicate pattern matches the input at `offset`.
    #[error("unsupported selector \"{selector}\": unexpected input at byte {offset}")]
    Syntax {
        /// The selector as passed in, untrimmed.
        selector: String,
        /// Byte offset into `selector` where the unrecognised suffix starts.
        offset: usize,
    },
}

impl SelectorError {
    /// The unparsed tail of the selector, starting at the offending construct.
    #[must_use]
    pub fn remainder(&self) -> &str {
        match self {
            Self::Syntax { selector, offset } => selector.get(*offset..).unwrap_or_default(),
        }
    }
}
