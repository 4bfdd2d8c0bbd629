//! Selector engine for the Wombat workspace.
//!
//! # Scope
//!
//! This crate implements:
//! - **Selector parsing** ([Selectors Level 4](https://www.w3.org/TR/selectors-4/), a subset)
//!   - Type, class and ID selectors
//!   - Attribute presence (`[name]`) and exact value (`[name=value]`) selectors
//!   - Compound selectors
//!   - The descendant combinator
//!
//! - **Query execution**
//!   - Anchor lookup through a [`TreeAdapter`], preferring an id term
//!   - Right-to-left ancestor verification
//!   - Queries scoped to a context node
//!
//! # Not Implemented
//!
//! - Child and sibling combinators (`>`, `+`, `~`)
//! - Pseudo-classes and pseudo-elements
//! - Attribute operators other than `=`
//!
//! # Example
//!
//! ```
//! use wombat_dom::{DomTree, ElementData, NodeId};
//! use wombat_select::{DomAdapter, select};
//!
//! let mut tree = DomTree::new();
//! let div = tree.append_element(NodeId::ROOT, ElementData::new("div").with_attr("id", "x"));
//! let input = tree.append_element(div, ElementData::new("input").with_attr("disabled", ""));
//!
//! let adapter = DomAdapter::new(&tree);
//! let found = select(&adapter, "div#x input[disabled]").unwrap();
//! assert_eq!(found.as_slice(), &[input]);
//! ```

use std::fmt;
use std::str::FromStr;

/// Tree adapter trait and the [`wombat_dom::DomTree`] implementation.
pub mod adapter;
/// Adapter configuration loaded from JSON.
pub mod config;
/// Selector syntax errors.
pub mod error;
/// Per-node predicate evaluation.
pub mod matcher;
/// Selector string parsing.
pub mod parser;
/// Right-to-left query execution.
pub mod query;
/// Parsed selector data model.
pub mod selector;

pub use adapter::{DomAdapter, TreeAdapter};
pub use config::{AdapterConfig, ConfigError, LookupStrategy};
pub use error::SelectorError;
pub use parser::{parse, parse_simple};
pub use query::MatchSet;
pub use selector::{ParsedSelector, PredicateTerm, SelectorGroup};

/// A selector parsed once and run any number of times.
///
/// An empty (or all-whitespace) selector compiles to one that matches nothing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Selector {
    parsed: Option<ParsedSelector>,
}

impl Selector {
    /// Parse `selector`, trying the single-term fast path first.
    ///
    /// # Errors
    ///
    /// Returns [`SelectorError::Syntax`] for unsupported syntax.
    pub fn compile(selector: &str) -> Result<Self, SelectorError> {
        let parsed = match parse_simple(selector) {
            Some(parsed) => Some(parsed),
            None => parse(selector)?,
        };
        Ok(Self { parsed })
    }

    /// The parsed form, or `None` for an empty selector.
    #[must_use]
    pub const fn parsed(&self) -> Option<&ParsedSelector> {
        self.parsed.as_ref()
    }

    /// All nodes matching this selector, optionally scoped to the
    /// descendants of `context`.
    #[must_use]
    pub fn query<A: TreeAdapter>(&self, adapter: &A, context: Option<A::Node>) -> MatchSet<A::Node> {
        self.parsed
            .as_ref()
            .map_or_else(MatchSet::new, |parsed| query::query(adapter, parsed, context))
    }

    /// Whether `node` matches this selector.
    #[must_use]
    pub fn matches<A: TreeAdapter>(&self, adapter: &A, node: A::Node) -> bool {
        self.parsed
            .as_ref()
            .is_some_and(|parsed| query::matches_node(adapter, parsed, node))
    }
}

impl FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::compile(s)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.parsed {
            Some(parsed) => write!(f, "{parsed}"),
            None => Ok(()),
        }
    }
}

/// All nodes in the adapter's tree matching `selector`.
///
/// # Errors
///
/// Returns [`SelectorError::Syntax`] for unsupported syntax. An empty selector
/// is not an error; it matches nothing.
pub fn select<A: TreeAdapter>(adapter: &A, selector: &str) -> Result<MatchSet<A::Node>, SelectorError> {
    select_within(adapter, selector, None)
}

/// Like [`select`], with anchor lookups limited to the strict descendants of
/// `context` when one is given.
///
/// # Errors
///
/// Returns [`SelectorError::Syntax`] for unsupported syntax.
pub fn select_within<A: TreeAdapter>(
    adapter: &A,
    selector: &str,
    context: Option<A::Node>,
) -> Result<MatchSet<A::Node>, SelectorError> {
    Ok(Selector::compile(selector)?.query(adapter, context))
}

/// Whether `node` matches `selector`.
///
/// # Errors
///
/// Returns [`SelectorError::Syntax`] for unsupported syntax.
pub fn matches<A: TreeAdapter>(adapter: &A, selector: &str, node: A::Node) -> Result<bool, SelectorError> {
    Ok(Selector::compile(selector)?.matches(adapter, node))
}
