//! Per-node predicate evaluation.
//!
//! These functions answer "does this node satisfy this term / group" using
//! only the per-node accessors of a [`TreeAdapter`]. They agree with the
//! adapter's lookups: a node is returned by `find_by_tag(name, ..)` exactly
//! when it matches `ByTag(name)`, and likewise for the other kinds.

use crate::adapter::{TreeAdapter, has_class_token};
use crate::selector::{PredicateTerm, SelectorGroup};

/// Whether `node` satisfies `term`. Non-element nodes never match.
#[must_use]
pub fn matches_term<A: TreeAdapter>(adapter: &A, term: &PredicateTerm, node: A::Node) -> bool {
    if adapter.tag_name(node).is_none() {
        return false;
    }
    match term {
        PredicateTerm::ById(id) => adapter
            .id_attribute(node)
            .is_some_and(|value| value.trim() == id),
        PredicateTerm::ByTag(name) => adapter
            .tag_name(node)
            .is_some_and(|tag| tag.eq_ignore_ascii_case(name)),
        PredicateTerm::ByClass(name) => adapter
            .class_attribute(node)
            .is_some_and(|classes| has_class_token(classes, name)),
        PredicateTerm::ByAttr { name, value } => {
            adapter.attribute(node, name).is_some_and(|actual| {
                value
                    .as_deref()
                    .is_none_or(|expected| actual == expected)
            })
        }
    }
}

/// Whether `node` satisfies every term of `group`.
#[must_use]
pub fn matches_group<A: TreeAdapter>(adapter: &A, group: &SelectorGroup, node: A::Node) -> bool {
    group
        .terms()
        .iter()
        .all(|term| matches_term(adapter, term, node))
}
