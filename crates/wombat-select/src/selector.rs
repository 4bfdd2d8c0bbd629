//! Parsed selector data model.
//!
//! A selector such as `div#main .item[data-id="3"]` is held as an ordered list
//! of [`SelectorGroup`]s (one per whitespace-separated compound), each an
//! ordered list of [`PredicateTerm`]s.

use std::fmt;

/// [§ 5 Elemental selectors](https://www.w3.org/TR/selectors-4/#elemental-selectors)
/// [§ 6 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
///
/// A single condition on an element.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PredicateTerm {
    /// [§ 6.7 ID selector](https://www.w3.org/TR/selectors-4/#id-selectors)
    ///
    /// Examples: `#main`, `#nav-bar`
    ById(String),

    /// [§ 6.6 Class selector](https://www.w3.org/TR/selectors-4/#class-html)
    ///
    /// Examples: `.highlight`, `.nav-item`
    ByClass(String),

    /// [§ 5.1 Type selector](https://www.w3.org/TR/selectors-4/#type-selectors)
    ///
    /// Examples: `div`, `input`. Compared ASCII case-insensitively.
    ByTag(String),

    /// [§ 6.4 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
    ///
    /// `[name]` tests presence; `[name=value]` tests exact string equality.
    ByAttr {
        /// Attribute name.
        name: String,
        /// Required value, or `None` for a presence test.
        value: Option<String>,
    },
}

impl PredicateTerm {
    /// The name the term tests: the id, class, tag or attribute name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::ById(name) | Self::ByClass(name) | Self::ByTag(name) => name,
            Self::ByAttr { name, .. } => name,
        }
    }

    /// Whether this is an id term.
    #[must_use]
    pub const fn is_id(&self) -> bool {
        matches!(self, Self::ById(_))
    }
}

impl fmt::Display for PredicateTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ById(name) => write!(f, "#{name}"),
            Self::ByClass(name) => write!(f, ".{name}"),
            Self::ByTag(name) => f.write_str(name),
            Self::ByAttr { name, value: None } => write!(f, "[{name}]"),
            Self::ByAttr {
                name,
                value: Some(value),
            } => write!(f, "[{name}=\"{value}\"]"),
        }
    }
}

/// [§ 4.2 Compound selectors](https://www.w3.org/TR/selectors-4/#compound)
///
/// "A compound selector is a sequence of simple selectors that are not
/// separated by a combinator, and represents a set of simultaneous
/// conditions on a single element."
///
/// Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SelectorGroup {
    terms: Vec<PredicateTerm>,
}

impl SelectorGroup {
    /// Build a group from its terms, or `None` if `terms` is empty.
    #[must_use]
    pub fn new(terms: Vec<PredicateTerm>) -> Option<Self> {
        if terms.is_empty() {
            None
        } else {
            Some(Self { terms })
        }
    }

    /// The terms in the order they were written.
    #[must_use]
    pub fn terms(&self) -> &[PredicateTerm] {
        &self.terms
    }

    /// Position of the first id term, if the group has one.
    #[must_use]
    pub fn id_position(&self) -> Option<usize> {
        self.terms.iter().position(PredicateTerm::is_id)
    }
}

impl fmt::Display for SelectorGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for term in &self.terms {
            write!(f, "{term}")?;
        }
        Ok(())
    }
}

/// [§ 4.3 Complex selectors](https://www.w3.org/TR/selectors-4/#complex)
///
/// Groups in source order, joined by the descendant combinator. The last group
/// is the subject: "The elements represented by a complex selector are the
/// elements matched by the last compound selector in the complex selector."
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParsedSelector {
    /// Groups left of the subject, in source order.
    ancestors: Vec<SelectorGroup>,
    /// The rightmost group.
    subject: SelectorGroup,
}

impl ParsedSelector {
    /// Build a selector from its groups in source order, or `None` if `groups`
    /// is empty.
    #[must_use]
    pub fn new(mut groups: Vec<SelectorGroup>) -> Option<Self> {
        let subject = groups.pop()?;
        Some(Self {
            ancestors: groups,
            subject,
        })
    }

    /// The subject (rightmost) group.
    #[must_use]
    pub const fn subject(&self) -> &SelectorGroup {
        &self.subject
    }

    /// The groups some chain of strict ancestors of the subject must satisfy,
    /// in source order.
    #[must_use]
    pub fn ancestors(&self) -> &[SelectorGroup] {
        &self.ancestors
    }

    /// All groups in source order.
    pub fn groups(&self) -> impl Iterator<Item = &SelectorGroup> {
        self.ancestors.iter().chain(std::iter::once(&self.subject))
    }

    /// Number of groups, the subject included.
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.ancestors.len() + 1
    }

    /// Check if this is a single compound (no combinators).
    #[must_use]
    pub fn is_compound(&self) -> bool {
        self.ancestors.is_empty()
    }
}

impl fmt::Display for ParsedSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for group in &self.ancestors {
            write!(f, "{group} ")?;
        }
        write!(f, "{}", self.subject)
    }
}
