//! Tests for selector queries against parsed documents.

use std::cell::RefCell;

use wombat_dom::{DomTree, ElementData, NodeId, NodeType};
use wombat_html::parse_document;
use wombat_select::{
    AdapterConfig, DomAdapter, LookupStrategy, MatchSet, Selector, SelectorError, TreeAdapter,
    matches, select, select_within,
};

/// Wrap `fragment` the way a page would hold it.
fn document(fragment: &str) -> DomTree {
    parse_document(&format!("<section id=\"fragment\">{fragment}</section>"))
}

fn count(tree: &DomTree, selector: &str) -> usize {
    select(&DomAdapter::new(tree), selector)
        .expect("selector should parse")
        .len()
}

fn tag(tree: &DomTree, node: NodeId) -> &str {
    tree.as_element(node).map_or("", |e| e.tag_name.as_str())
}

fn first_with_tag(tree: &DomTree, name: &str) -> NodeId {
    tree.element_descendants(NodeId::ROOT)
        .find(|&node| tag(tree, node) == name)
        .expect("element should exist")
}

/// Delegates to a [`DomAdapter`] and records which anchor lookups ran.
struct RecordingAdapter<'a> {
    inner: DomAdapter<'a>,
    calls: RefCell<Vec<&'static str>>,
}

impl<'a> RecordingAdapter<'a> {
    fn new(tree: &'a DomTree) -> Self {
        Self {
            inner: DomAdapter::new(tree),
            calls: RefCell::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<&'static str> {
        self.calls.borrow().clone()
    }
}

impl TreeAdapter for RecordingAdapter<'_> {
    type Node = NodeId;

    fn find_by_id(&self, id: &str) -> Option<NodeId> {
        self.calls.borrow_mut().push("id");
        self.inner.find_by_id(id)
    }

    fn find_by_tag(&self, name: &str, context: Option<NodeId>) -> Vec<NodeId> {
        self.calls.borrow_mut().push("tag");
        self.inner.find_by_tag(name, context)
    }

    fn find_by_class(&self, name: &str, context: Option<NodeId>) -> Vec<NodeId> {
        self.calls.borrow_mut().push("class");
        self.inner.find_by_class(name, context)
    }

    fn find_by_attr(&self, name: &str, context: Option<NodeId>, value: Option<&str>) -> Vec<NodeId> {
        self.calls.borrow_mut().push("attr");
        self.inner.find_by_attr(name, context, value)
    }

    fn tag_name(&self, node: NodeId) -> Option<&str> {
        self.inner.tag_name(node)
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.inner.attribute(node, name)
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.inner.parent(node)
    }
}

// Scenarios

#[test]
fn test_tag_selects_only_that_tag() {
    let tree = parse_document("<div><p>x</p></div>");
    let found = select(&DomAdapter::new(&tree), "p").unwrap();
    assert_eq!(found.as_slice(), &[first_with_tag(&tree, "p")]);
}

#[test]
fn test_id_requires_exact_match() {
    let tree = parse_document("<div id=\"a\"/><p id=\"a-b\"/>");
    let found = select(&DomAdapter::new(&tree), "#a").unwrap();
    assert_eq!(found.as_slice(), &[first_with_tag(&tree, "div")]);
}

#[test]
fn test_compound_attribute_on_other_element() {
    let tree = parse_document("<div class=\"c\"><input disabled></div>");
    let found = select(&DomAdapter::new(&tree), "div[disabled]").unwrap();
    assert!(found.is_empty());
}

#[test]
fn test_descendant_with_compound_groups() {
    let tree =
        parse_document("<div id=\"x\" class=\"c\"><input id=\"y\" disabled type=\"text\"></div>");
    let found = select(&DomAdapter::new(&tree), "div#x input[disabled]").unwrap();
    assert_eq!(found.as_slice(), &[first_with_tag(&tree, "input")]);
}

#[test]
fn test_bad_selector_is_syntax_error() {
    let tree = parse_document("<div></div>");
    let err = select(&DomAdapter::new(&tree), "#@bad").unwrap_err();
    assert!(matches!(err, SelectorError::Syntax { offset: 0, .. }));
}

// Single predicates

#[test]
fn test_select_by_tag() {
    let tree = document("");
    assert_eq!(count(&tree, "p"), 0);
    assert_eq!(count(&tree, "div"), 0);

    let tree = document("<div>Hello!</div><p>...</p>");
    assert_eq!(count(&tree, "p"), 1);
    assert_eq!(count(&tree, "div"), 1);
    assert_eq!(count(&tree, "DIV"), 1);
}

#[test]
fn test_select_by_id() {
    let tree = document(r#"<div id="some_id"></div><p id="some-id"></p><p id="someid"></p>"#);
    assert_eq!(count(&tree, "#some_id"), 1);
    assert_eq!(count(&tree, "#some-id"), 1);
    assert_eq!(count(&tree, "#someid"), 1);
    assert_eq!(count(&tree, "#some"), 0);
}

#[test]
fn test_select_by_class() {
    let tree = document(
        r#"<div class="so-me_class"></div><div class="another so-me_class "></div><div class="so-me_class another"></div>"#,
    );
    assert_eq!(count(&tree, ".so-me_class"), 3);
    assert_eq!(count(&tree, ".another"), 2);
    assert_eq!(count(&tree, ".so-me"), 0);
}

#[test]
fn test_select_by_attribute() {
    let tree = document(r#"<div class="so-me_class"><input disabled="disabled" type="text"></div>"#);
    assert_eq!(count(&tree, "[disabled]"), 1);
    assert_eq!(count(&tree, "[type=text]"), 1);
    assert_eq!(count(&tree, "[type=\"text\"]"), 1);
    assert_eq!(count(&tree, "[type='text']"), 1);
    assert_eq!(count(&tree, "[class=\"so-me_class\"]"), 1);
    assert_eq!(count(&tree, "[type=password]"), 0);
}

#[test]
fn test_attribute_presence_with_empty_value() {
    let tree = document("<input disabled><input>");
    assert_eq!(count(&tree, "[disabled]"), 1);
    assert_eq!(count(&tree, "input[disabled]"), 1);
}

// Compounds and descendants

const MIXED: &str = r#"<div id="some-id" class="so-me_class another-class"><input id="some-other-id" disabled="disabled" type="text"></div>"#;

#[test]
fn test_select_mixed_compounds() {
    let tree = document(MIXED);
    assert_eq!(count(&tree, "input[disabled]"), 1);
    assert_eq!(count(&tree, "div[disabled]"), 0);
    assert_eq!(count(&tree, "input[disabled=disabled]"), 1);
    assert_eq!(count(&tree, "input#some-other-id[disabled=disabled]"), 1);
    assert_eq!(count(&tree, "input#some-other-id[disabled=false]"), 0);

    assert_eq!(count(&tree, "div#some-id"), 1);
    assert_eq!(count(&tree, "input#some-id"), 0);
    assert_eq!(count(&tree, "div#some-other-id"), 0);

    assert_eq!(count(&tree, "#some-id.so-me_class"), 1);
    assert_eq!(count(&tree, ".so-me_class#some-id"), 1);
    assert_eq!(count(&tree, "div.so-me_class#some-id"), 1);
    assert_eq!(count(&tree, "div.so-me_class"), 1);
}

#[test]
fn test_select_nested() {
    let tree = document(MIXED);
    assert_eq!(count(&tree, "div#some-id input"), 1);
    assert_eq!(count(&tree, "#some-id input[type=\"text\"]"), 1);
    assert_eq!(count(&tree, "body div input"), 1);
    assert_eq!(count(&tree, "html body div input"), 1);
    assert_eq!(count(&tree, "body .so-me_class [disabled]"), 1);
    assert_eq!(count(&tree, "body .so-me_class [enabled]"), 0);
}

#[test]
fn test_ancestor_must_be_strict() {
    let tree = document(MIXED);
    assert_eq!(count(&tree, "div div"), 0);
    assert_eq!(count(&tree, "input input"), 0);
    assert_eq!(count(&tree, "section div"), 1);
}

#[test]
fn test_ancestor_groups_keep_their_order() {
    let tree = parse_document("<article><section><p>x</p></section></article>");
    assert_eq!(count(&tree, "article section p"), 1);
    assert_eq!(count(&tree, "section article p"), 0);
}

#[test]
fn test_ancestor_groups_may_skip_levels() {
    let tree = parse_document(
        r#"<div class="a"><div><div class="b"><span><em>x</em></span></div></div></div>"#,
    );
    assert_eq!(count(&tree, ".a .b em"), 1);
    assert_eq!(count(&tree, ".a em"), 1);
    assert_eq!(count(&tree, ".b .a em"), 0);
}

#[test]
fn test_same_group_twice_needs_two_ancestors() {
    let tree = parse_document("<div><div><p>x</p></div></div><div><p>y</p></div>");
    let adapter = DomAdapter::new(&tree);
    assert_eq!(select(&adapter, "div div p").unwrap().len(), 1);
    assert_eq!(select(&adapter, "div p").unwrap().len(), 2);
}

#[test]
fn test_more_mixed_documents() {
    let tree = document(
        r#"<div></div>
            <div id="some_id" class="some_class some_other_class"></div>
            <img id="some_other_id" class="some_class some_other_class"></img>
            <input type="text">"#,
    );
    assert_eq!(count(&tree, "div"), 2);
    assert_eq!(count(&tree, "img.some_class"), 1);
    assert_eq!(count(&tree, "#some_id"), 1);
    assert_eq!(count(&tree, ".some_class"), 2);
    assert_eq!(count(&tree, "input#some_id"), 0);
    assert_eq!(count(&tree, "div#some_id.some_class"), 1);
    assert_eq!(count(&tree, "div.some_class#some_id"), 1);
}

#[test]
fn test_text_and_comments_never_match() {
    let tree = parse_document("<p>div<!-- div --></p>");
    assert_eq!(count(&tree, "div"), 0);
    assert_eq!(count(&tree, "p"), 1);
}

#[test]
fn test_duplicate_class_tokens_match_once() {
    let tree = parse_document(r#"<p class="a a"></p>"#);
    assert_eq!(count(&tree, ".a"), 1);
    let indexed = DomAdapter::with_config(&tree, AdapterConfig::indexed());
    assert_eq!(select(&indexed, ".a").unwrap().len(), 1);
}

// Anchor choice

#[test]
fn test_id_anchor_used_at_any_position() {
    let tree = document(MIXED);
    for selector in ["#some-id.so-me_class", "div.so-me_class#some-id", ".so-me_class#some-id"] {
        let adapter = RecordingAdapter::new(&tree);
        assert_eq!(select(&adapter, selector).unwrap().len(), 1, "{selector}");
        assert_eq!(adapter.calls(), vec!["id"], "{selector}");
    }
}

#[test]
fn test_first_term_anchor_without_id() {
    let tree = document(MIXED);
    let cases = [
        ("div.so-me_class", "tag"),
        (".so-me_class[id]", "class"),
        ("[type=text]input", "attr"),
    ];
    for (selector, lookup) in cases {
        let adapter = RecordingAdapter::new(&tree);
        assert_eq!(select(&adapter, selector).unwrap().len(), 1, "{selector}");
        assert_eq!(adapter.calls(), vec![lookup], "{selector}");
    }
}

#[test]
fn test_empty_anchor_stops_early() {
    let tree = document(MIXED);
    let adapter = RecordingAdapter::new(&tree);
    assert!(select(&adapter, "div #missing").unwrap().is_empty());
    assert_eq!(adapter.calls(), vec!["id"]);
}

#[test]
fn test_duplicate_ids_resolve_to_first() {
    let tree = parse_document(r#"<p id="d">1</p><p id="d">2</p><p id=" d ">3</p>"#);
    let adapter = DomAdapter::new(&tree);
    let found = select(&adapter, "#d").unwrap();
    assert_eq!(found.as_slice(), &[first_with_tag(&tree, "p")]);
}

// Empty input and errors

#[test]
fn test_empty_selector_matches_nothing() {
    let tree = document(MIXED);
    let adapter = DomAdapter::new(&tree);
    assert!(select(&adapter, "").unwrap().is_empty());
    assert!(select(&adapter, "   ").unwrap().is_empty());
}

#[test]
fn test_unsupported_combinator_is_error() {
    let tree = document(MIXED);
    let adapter = DomAdapter::new(&tree);
    assert!(select(&adapter, "div > input").is_err());
    assert!(select(&adapter, "input:checked").is_err());
}

// Context

#[test]
fn test_context_limits_anchor_lookup() {
    let tree = parse_document(
        r#"<div id="one"><p class="x">a</p></div><div id="two"><p class="x">b</p><p>c</p></div>"#,
    );
    let adapter = DomAdapter::new(&tree);
    let two = adapter.find_by_id("two").unwrap();

    assert_eq!(select(&adapter, ".x").unwrap().len(), 2);
    assert_eq!(select_within(&adapter, ".x", Some(two)).unwrap().len(), 1);
    assert_eq!(select_within(&adapter, "p", Some(two)).unwrap().len(), 2);
    assert!(select_within(&adapter, "div", Some(two)).unwrap().is_empty());
    assert_eq!(select_within(&adapter, "p", None).unwrap().len(), 3);
}

#[test]
fn test_context_limits_id_anchor() {
    let tree = parse_document(r#"<div id="one"><p id="a">a</p></div><div id="two"></div>"#);
    let adapter = DomAdapter::new(&tree);
    let one = adapter.find_by_id("one").unwrap();
    let two = adapter.find_by_id("two").unwrap();

    assert_eq!(select_within(&adapter, "#a", Some(one)).unwrap().len(), 1);
    assert!(select_within(&adapter, "#a", Some(two)).unwrap().is_empty());
    assert!(select_within(&adapter, "#one", Some(one)).unwrap().is_empty());
}

#[test]
fn test_context_does_not_bound_ancestor_walk() {
    let tree = parse_document(r#"<main><div id="c"><p>x</p></div></main>"#);
    let adapter = DomAdapter::new(&tree);
    let context = adapter.find_by_id("c").unwrap();
    assert_eq!(select_within(&adapter, "main p", Some(context)).unwrap().len(), 1);
    assert_eq!(select_within(&adapter, "body div p", Some(context)).unwrap().len(), 1);
}

// Reuse

#[test]
fn test_repeated_queries_agree() {
    let tree = document(MIXED);
    let adapter = DomAdapter::new(&tree);
    let selector = Selector::compile("body .so-me_class [disabled]").unwrap();
    let first = selector.query(&adapter, None);
    let second = selector.query(&adapter, None);
    assert!(first.same_members(&second));
    assert!(first.same_members(&select(&adapter, "body .so-me_class [disabled]").unwrap()));
}

#[test]
fn test_selector_runs_against_many_trees() {
    let selector: Selector = "ul li".parse().unwrap();
    let small = parse_document("<ul><li>a</li></ul>");
    let large = parse_document("<ul><li>a</li><li>b</li></ul><ol><li>c</li></ol>");
    assert_eq!(selector.query(&DomAdapter::new(&small), None).len(), 1);
    assert_eq!(selector.query(&DomAdapter::new(&large), None).len(), 2);
}

#[test]
fn test_mutation_between_queries_is_visible() {
    let mut tree = parse_document("<div></div>");
    assert_eq!(count(&tree, ".late"), 0);
    let body = tree.body().unwrap();
    let _ = tree.append_element(body, ElementData::new("span").with_attr("class", "late"));
    assert_eq!(count(&tree, ".late"), 1);
}

// Single node matching

#[test]
fn test_matches_single_node() {
    let tree = document(MIXED);
    let adapter = DomAdapter::new(&tree);
    let input = first_with_tag(&tree, "input");
    let div = first_with_tag(&tree, "div");

    assert!(matches(&adapter, "div#some-id input", input).unwrap());
    assert!(matches(&adapter, "[disabled]", input).unwrap());
    assert!(!matches(&adapter, "div#some-id input", div).unwrap());
    assert!(!matches(&adapter, "", input).unwrap());
    assert!(matches(&adapter, "div >", input).is_err());
}

#[test]
fn test_matches_agrees_with_select() {
    let tree = document(MIXED);
    let adapter = DomAdapter::new(&tree);
    for selector in ["div input", "section [type]", ".another-class", "body #some-other-id"] {
        let found = select(&adapter, selector).unwrap();
        let filtered: MatchSet<NodeId> = tree
            .element_descendants(NodeId::ROOT)
            .filter(|&node| matches(&adapter, selector, node).unwrap())
            .collect();
        assert!(found.same_members(&filtered), "{selector}");
    }
}

// Configuration

#[test]
fn test_lookup_strategies_agree() {
    let tree = document(MIXED);
    let configs = [
        AdapterConfig::default(),
        AdapterConfig::indexed(),
        AdapterConfig {
            id_lookup: LookupStrategy::Index,
            class_lookup: LookupStrategy::Scan,
        },
    ];
    for selector in [
        "#some-id",
        "#some-other-id",
        ".so-me_class",
        "section .another-class input",
        "#missing",
        ".missing",
    ] {
        let expected = select(&DomAdapter::new(&tree), selector).unwrap();
        for config in configs {
            let adapter = DomAdapter::with_config(&tree, config);
            assert_eq!(adapter.config(), config);
            let found = select(&adapter, selector).unwrap();
            assert!(found.same_members(&expected), "{selector} with {config:?}");
        }
    }
}

#[test]
fn test_class_index_respects_context() {
    let tree = parse_document(r#"<div id="one"><p class="x"></p></div><p class="x"></p>"#);
    let adapter = DomAdapter::with_config(&tree, AdapterConfig::indexed());
    let one = adapter.find_by_id("one").unwrap();
    assert_eq!(select_within(&adapter, ".x", Some(one)).unwrap().len(), 1);
    assert_eq!(select(&adapter, ".x").unwrap().len(), 2);
}

#[test]
fn test_hand_built_tree() {
    let mut tree = DomTree::new();
    let list = tree.append_element(NodeId::ROOT, ElementData::new("ul").with_attr("id", "menu"));
    let item = tree.append_element(list, ElementData::new("li").with_attr("class", "active"));
    let text = tree.alloc(NodeType::Text("Home".to_string()));
    tree.append_child(item, text);

    let adapter = DomAdapter::new(&tree);
    let found = select(&adapter, "#menu li.active").unwrap();
    assert_eq!(found.into_vec(), vec![item]);
}
