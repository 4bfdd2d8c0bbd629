//! The tree the engine queries, seen through a small read-only interface.
//!
//! [`TreeAdapter`] is everything the parser-independent parts of the engine
//! need from a host tree: anchor lookups scoped to an optional context node,
//! and per-node accessors for the matcher and the ancestor walk.
//! [`DomAdapter`] implements it over a [`wombat_dom::DomTree`].

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use tracing::debug;
use wombat_dom::{DomTree, NodeId};

use crate::config::{AdapterConfig, LookupStrategy};

/// Read-only access to a host node tree.
///
/// Lookups return element nodes in document order, each at most once. A
/// `context` of `None` means the whole tree; otherwise only strict
/// descendants of the context are returned.
pub trait TreeAdapter {
    /// Node handle type.
    type Node: Copy + Eq + Hash + Debug;

    /// The element whose id attribute (trimmed) equals `id`, if any. Like
    /// `getElementById`, only the first such element in document order.
    fn find_by_id(&self, id: &str) -> Option<Self::Node>;

    /// Elements whose tag name equals `name`, ASCII case-insensitively.
    fn find_by_tag(&self, name: &str, context: Option<Self::Node>) -> Vec<Self::Node>;

    /// Elements with `name` as one of their class tokens.
    fn find_by_class(&self, name: &str, context: Option<Self::Node>) -> Vec<Self::Node>;

    /// Elements carrying attribute `name`; when `value` is given, the
    /// attribute must equal it exactly.
    fn find_by_attr(
        &self,
        name: &str,
        context: Option<Self::Node>,
        value: Option<&str>,
    ) -> Vec<Self::Node>;

    /// Tag name, or `None` for non-element nodes.
    fn tag_name(&self, node: Self::Node) -> Option<&str>;

    /// Raw id attribute.
    fn id_attribute(&self, node: Self::Node) -> Option<&str> {
        self.attribute(node, "id")
    }

    /// Raw class attribute.
    fn class_attribute(&self, node: Self::Node) -> Option<&str> {
        self.attribute(node, "class")
    }

    /// Value of attribute `name`, or `None` when absent. An attribute present
    /// with an empty value is `Some("")`.
    fn attribute(&self, node: Self::Node, name: &str) -> Option<&str>;

    /// Parent node, or `None` at the root.
    fn parent(&self, node: Self::Node) -> Option<Self::Node>;
}

/// Whether `name` is one of the whitespace-separated tokens of `class_attr`.
pub(crate) fn has_class_token(class_attr: &str, name: &str) -> bool {
    class_attr.split_ascii_whitespace().any(|token| token == name)
}

/// [`TreeAdapter`] over an arena [`DomTree`].
///
/// Lookup strategies are fixed by the [`AdapterConfig`] given at construction;
/// indexes are built once, up front, and reflect the tree as it was then.
#[derive(Debug)]
pub struct DomAdapter<'a> {
    tree: &'a DomTree,
    config: AdapterConfig,
    id_index: Option<HashMap<&'a str, NodeId>>,
    class_index: Option<HashMap<&'a str, Vec<NodeId>>>,
}

impl<'a> DomAdapter<'a> {
    /// Adapter with the default configuration (tree scans, no indexes).
    #[must_use]
    pub fn new(tree: &'a DomTree) -> Self {
        Self::with_config(tree, AdapterConfig::default())
    }

    /// Adapter using the lookup strategies in `config`.
    #[must_use]
    pub fn with_config(tree: &'a DomTree, config: AdapterConfig) -> Self {
        let id_index = (config.id_lookup == LookupStrategy::Index).then(|| build_id_index(tree));
        let class_index =
            (config.class_lookup == LookupStrategy::Index).then(|| build_class_index(tree));
        debug!(
            nodes = tree.len(),
            id_lookup = ?config.id_lookup,
            class_lookup = ?config.class_lookup,
            "DOM adapter ready"
        );
        Self {
            tree,
            config,
            id_index,
            class_index,
        }
    }

    /// The tree this adapter reads.
    #[must_use]
    pub const fn tree(&self) -> &'a DomTree {
        self.tree
    }

    /// The configuration the adapter was built with.
    #[must_use]
    pub const fn config(&self) -> AdapterConfig {
        self.config
    }

    fn scope(context: Option<NodeId>) -> NodeId {
        context.unwrap_or(NodeId::ROOT)
    }

    fn in_scope(&self, node: NodeId, context: Option<NodeId>) -> bool {
        context.is_none_or(|ctx| self.tree.is_descendant_of(node, ctx))
    }

    /// Element descendants of the scope that satisfy `predicate`.
    fn scan(&self, context: Option<NodeId>, predicate: impl Fn(NodeId) -> bool) -> Vec<NodeId> {
        self.tree
            .element_descendants(Self::scope(context))
            .filter(|&node| predicate(node))
            .collect()
    }
}

fn build_id_index(tree: &DomTree) -> HashMap<&str, NodeId> {
    let mut index = HashMap::new();
    for node in tree.element_descendants(NodeId::ROOT) {
        if let Some(id) = tree.as_element(node).and_then(|e| e.id()) {
            let _ = index.entry(id.trim()).or_insert(node);
        }
    }
    index
}

fn build_class_index(tree: &DomTree) -> HashMap<&str, Vec<NodeId>> {
    let mut index: HashMap<&str, Vec<NodeId>> = HashMap::new();
    for node in tree.element_descendants(NodeId::ROOT) {
        let Some(element) = tree.as_element(node) else {
            continue;
        };
        for class in element.classes() {
            let nodes = index.entry(class).or_default();
            // `class="a a"` lists the element once.
            if nodes.last() != Some(&node) {
                nodes.push(node);
            }
        }
    }
    index
}

impl TreeAdapter for DomAdapter<'_> {
    type Node = NodeId;

    fn find_by_id(&self, id: &str) -> Option<NodeId> {
        match &self.id_index {
            Some(index) => index.get(id).copied(),
            None => self.tree.element_descendants(NodeId::ROOT).find(|&node| {
                self.id_attribute(node)
                    .is_some_and(|value| value.trim() == id)
            }),
        }
    }

    fn find_by_tag(&self, name: &str, context: Option<NodeId>) -> Vec<NodeId> {
        self.scan(context, |node| {
            self.tag_name(node)
                .is_some_and(|tag| tag.eq_ignore_ascii_case(name))
        })
    }

    fn find_by_class(&self, name: &str, context: Option<NodeId>) -> Vec<NodeId> {
        match &self.class_index {
            Some(index) => index
                .get(name)
                .map(|nodes| {
                    nodes
                        .iter()
                        .copied()
                        .filter(|&node| self.in_scope(node, context))
                        .collect::<Vec<_>>()
                })
                .unwrap_or_default(),
            None => self.scan(context, |node| {
                self.class_attribute(node)
                    .is_some_and(|classes| has_class_token(classes, name))
            }),
        }
    }

    fn find_by_attr(&self, name: &str, context: Option<NodeId>, value: Option<&str>) -> Vec<NodeId> {
        self.scan(context, |node| {
            self.attribute(node, name)
                .is_some_and(|actual| value.is_none_or(|expected| actual == expected))
        })
    }

    fn tag_name(&self, node: NodeId) -> Option<&str> {
        self.tree.as_element(node).map(|e| e.tag_name.as_str())
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.tree.as_element(node).and_then(|e| e.attribute(name))
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.tree.parent(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_class_token_whole_words_only() {
        assert!(has_class_token("a b c", "b"));
        assert!(has_class_token("  b\t", "b"));
        assert!(!has_class_token("abc", "b"));
        assert!(!has_class_token("so-me_class", "some"));
        assert!(!has_class_token("", "b"));
    }
}
