//! Tests for DOM tree construction and traversal.

use wombat_dom::{DomTree, ElementData, NodeId, NodeType};

/// Builds `<html><body><div><p/><span/></div><ul/></body></html>`.
fn sample_tree() -> (DomTree, [NodeId; 6]) {
    let mut tree = DomTree::new();
    let html = tree.append_element(NodeId::ROOT, ElementData::new("html"));
    let body = tree.append_element(html, ElementData::new("body"));
    let div = tree.append_element(body, ElementData::new("div"));
    let p = tree.append_element(div, ElementData::new("p"));
    let span = tree.append_element(div, ElementData::new("span"));
    let ul = tree.append_element(body, ElementData::new("ul"));
    (tree, [html, body, div, p, span, ul])
}

#[test]
fn test_new_tree_has_document_root() {
    let tree = DomTree::new();
    assert_eq!(tree.len(), 1);
    assert!(!tree.is_empty());
    assert!(matches!(
        tree.get(tree.root()).map(|n| &n.node_type),
        Some(NodeType::Document)
    ));
    assert_eq!(tree.parent(NodeId::ROOT), None);
}

#[test]
fn test_append_sets_parent_and_children() {
    let (tree, [html, body, div, p, span, ul]) = sample_tree();
    assert_eq!(tree.children(NodeId::ROOT), &[html]);
    assert_eq!(tree.children(body), &[div, ul]);
    assert_eq!(tree.children(div), &[p, span]);
    assert_eq!(tree.parent(span), Some(div));
}

#[test]
fn test_ancestors_walk_to_document() {
    let (tree, [html, body, div, p, ..]) = sample_tree();
    let ancestors: Vec<NodeId> = tree.ancestors(p).collect();
    assert_eq!(ancestors, vec![div, body, html, NodeId::ROOT]);
}

#[test]
fn test_descendants_in_tree_order() {
    let (tree, [html, body, div, p, span, ul]) = sample_tree();
    let all: Vec<NodeId> = tree.descendants(NodeId::ROOT).collect();
    assert_eq!(all, vec![html, body, div, p, span, ul]);

    let under_div: Vec<NodeId> = tree.descendants(div).collect();
    assert_eq!(under_div, vec![p, span]);
}

#[test]
fn test_element_descendants_skip_text() {
    let mut tree = DomTree::new();
    let div = tree.append_element(NodeId::ROOT, ElementData::new("div"));
    let text = tree.alloc(NodeType::Text("hello".to_string()));
    tree.append_child(div, text);
    let em = tree.append_element(div, ElementData::new("em"));

    let elements: Vec<NodeId> = tree.element_descendants(NodeId::ROOT).collect();
    assert_eq!(elements, vec![div, em]);
    assert_eq!(tree.as_text(text), Some("hello"));
}

#[test]
fn test_is_descendant_of_is_strict() {
    let (tree, [html, _, div, p, _, ul]) = sample_tree();
    assert!(tree.is_descendant_of(p, html));
    assert!(tree.is_descendant_of(p, div));
    assert!(!tree.is_descendant_of(p, p));
    assert!(!tree.is_descendant_of(p, ul));
}

#[test]
fn test_document_element_and_body() {
    let (tree, [html, body, ..]) = sample_tree();
    assert_eq!(tree.document_element(), Some(html));
    assert_eq!(tree.body(), Some(body));
}

#[test]
fn test_element_class_tokens() {
    let element = ElementData::new("div").with_attr("class", "  a\tb  c ");
    let classes: Vec<&str> = element.classes().collect();
    assert_eq!(classes, vec!["a", "b", "c"]);
    assert_eq!(ElementData::new("div").classes().count(), 0);
}

#[test]
fn test_element_attribute_access() {
    let element = ElementData::new("input")
        .with_attr("id", "name")
        .with_attr("disabled", "");
    assert_eq!(element.id(), Some("name"));
    assert_eq!(element.attribute("disabled"), Some(""));
    assert_eq!(element.attribute("type"), None);
}
