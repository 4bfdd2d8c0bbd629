//! Right-to-left query execution.
//!
//! The subject group is resolved first: one of its terms (the id term if
//! there is one, otherwise the first term) is looked up through the adapter
//! to get a small candidate list, the rest of the group filters it, and each
//! survivor then has its ancestor chain checked against the remaining groups.

use std::collections::HashSet;
use std::hash::Hash;

use tracing::{debug, trace};

use crate::adapter::TreeAdapter;
use crate::matcher::{matches_group, matches_term};
use crate::selector::{ParsedSelector, PredicateTerm, SelectorGroup};

/// The nodes a query matched, each at most once.
///
/// Iteration order is the order the executor produced them in, which is the
/// adapter's lookup order for the anchor term. Only membership is meaningful;
/// use [`MatchSet::same_members`] to compare two results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchSet<N> {
    nodes: Vec<N>,
}

impl<N> MatchSet<N> {
    /// An empty result.
    #[must_use]
    pub const fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Number of matched nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether nothing matched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over the matched nodes.
    pub fn iter(&self) -> std::slice::Iter<'_, N> {
        self.nodes.iter()
    }

    /// The matched nodes as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[N] {
        &self.nodes
    }

    /// Consume the set, returning its nodes.
    #[must_use]
    pub fn into_vec(self) -> Vec<N> {
        self.nodes
    }
}

impl<N: Eq + Hash> MatchSet<N> {
    /// Whether `node` is in the set.
    #[must_use]
    pub fn contains(&self, node: &N) -> bool {
        self.nodes.contains(node)
    }

    /// Whether both sets hold the same nodes, in any order.
    #[must_use]
    pub fn same_members(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self.nodes.iter().collect::<HashSet<_>>() == other.nodes.iter().collect::<HashSet<_>>()
    }
}

impl<N> Default for MatchSet<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: Copy + Eq + Hash> FromIterator<N> for MatchSet<N> {
    /// Collects nodes, keeping the first occurrence of each.
    fn from_iter<I: IntoIterator<Item = N>>(iter: I) -> Self {
        let mut seen = HashSet::new();
        let nodes = iter.into_iter().filter(|node| seen.insert(*node)).collect();
        Self { nodes }
    }
}

impl<N> IntoIterator for MatchSet<N> {
    type Item = N;
    type IntoIter = std::vec::IntoIter<N>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.into_iter()
    }
}

impl<'a, N> IntoIterator for &'a MatchSet<N> {
    type Item = &'a N;
    type IntoIter = std::slice::Iter<'a, N>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

/// Run `parsed` against the adapter's tree.
///
/// With a `context`, anchor lookups only consider strict descendants of the
/// context. Ancestor groups may still be satisfied by the context itself or
/// anything above it.
#[must_use]
pub fn query<A: TreeAdapter>(
    adapter: &A,
    parsed: &ParsedSelector,
    context: Option<A::Node>,
) -> MatchSet<A::Node> {
    let subject = parsed.subject();
    let anchor_index = subject.id_position().unwrap_or(0);
    let terms = subject.terms();
    let anchor = &terms[anchor_index];

    let candidates = resolve_anchor(adapter, anchor, context);
    debug!(
        selector = %parsed,
        anchor = %anchor,
        candidates = candidates.len(),
        "resolved anchor"
    );
    if candidates.is_empty() {
        return MatchSet::new();
    }

    let rest: Vec<&PredicateTerm> = terms
        .iter()
        .enumerate()
        .filter(|&(index, _)| index != anchor_index)
        .map(|(_, term)| term)
        .collect();

    let matches: MatchSet<A::Node> = candidates
        .into_iter()
        .filter(|&node| rest.iter().all(|term| matches_term(adapter, term, node)))
        .filter(|&node| ancestors_satisfy(adapter, parsed.ancestors(), node))
        .collect();
    debug!(selector = %parsed, matches = matches.len(), "query finished");
    matches
}

/// Whether `node` matches `parsed`, subject group and ancestor chain both.
#[must_use]
pub fn matches_node<A: TreeAdapter>(adapter: &A, parsed: &ParsedSelector, node: A::Node) -> bool {
    matches_group(adapter, parsed.subject(), node)
        && ancestors_satisfy(adapter, parsed.ancestors(), node)
}

/// Look up the candidates for the anchor term.
fn resolve_anchor<A: TreeAdapter>(
    adapter: &A,
    anchor: &PredicateTerm,
    context: Option<A::Node>,
) -> Vec<A::Node> {
    match anchor {
        PredicateTerm::ById(id) => adapter
            .find_by_id(id)
            .filter(|&node| context.is_none_or(|ctx| is_strict_descendant(adapter, node, ctx)))
            .into_iter()
            .collect(),
        PredicateTerm::ByTag(name) => adapter.find_by_tag(name, context),
        PredicateTerm::ByClass(name) => adapter.find_by_class(name, context),
        PredicateTerm::ByAttr { name, value } => {
            adapter.find_by_attr(name, context, value.as_deref())
        }
    }
}

/// Walk up from `node`, consuming `groups` right to left. Each group must be
/// matched by a strict ancestor of the node that matched the group after it.
///
/// Taking the nearest matching ancestor for each group is always safe: any
/// chain that works from a higher ancestor also works from the nearer one.
fn ancestors_satisfy<A: TreeAdapter>(adapter: &A, groups: &[SelectorGroup], node: A::Node) -> bool {
    let mut remaining = groups.len();
    let mut current = adapter.parent(node);
    while remaining > 0 {
        let Some(ancestor) = current else {
            trace!(node = ?node, unmatched = remaining, "ancestor walk reached the root");
            return false;
        };
        if matches_group(adapter, &groups[remaining - 1], ancestor) {
            remaining -= 1;
        }
        current = adapter.parent(ancestor);
    }
    true
}

fn is_strict_descendant<A: TreeAdapter>(adapter: &A, node: A::Node, ancestor: A::Node) -> bool {
    let mut current = adapter.parent(node);
    while let Some(parent) = current {
        if parent == ancestor {
            return true;
        }
        current = adapter.parent(parent);
    }
    false
}
