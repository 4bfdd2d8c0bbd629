use std::fmt::Write;

use strum_macros::Display;
use tracing::trace;
use wombat_dom::{AttributesMap, DomTree, ElementData, NodeId, NodeType};

use crate::tokenizer::{Attribute, Token};

/// [§ 13.2.6.2 Void elements](https://html.spec.whatwg.org/multipage/syntax.html#void-elements)
///
/// Elements that never have children, so their start tag is never pushed
/// onto the stack of open elements.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Elements that the "in head" insertion mode places in `<head>` when they
/// appear before any body content.
const HEAD_ELEMENTS: &[&str] = &[
    "base", "link", "meta", "noscript", "script", "style", "template", "title",
];

/// [§ 13.2.4.1 The insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-insertion-mode)
///
/// A reduced set of insertion modes: enough to place implied `<html>`,
/// `<head>` and `<body>` elements. Tables, forms and formatting element
/// reconstruction are not modelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum InsertionMode {
    /// Nothing inserted yet.
    BeforeHtml,
    /// [§ 13.2.6.4.4 The "in head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead)
    InHead,
    /// [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    InBody,
}

/// [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)
///
/// Builds a [`DomTree`] from a token stream. The resulting document always has
/// an `<html>` element with a `<head>` and a `<body>`.
pub struct HTMLParser {
    tokens: Vec<Token>,
    insertion_mode: InsertionMode,
    /// [§ 13.2.4.3 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#the-stack-of-open-elements)
    stack_of_open_elements: Vec<NodeId>,
    html_element: Option<NodeId>,
    head_element_pointer: Option<NodeId>,
    body_element: Option<NodeId>,
    pending_text: String,
    tree: DomTree,
}

impl HTMLParser {
    /// Create a parser over a complete token stream.
    #[must_use]
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            insertion_mode: InsertionMode::BeforeHtml,
            stack_of_open_elements: Vec::new(),
            html_element: None,
            head_element_pointer: None,
            body_element: None,
            pending_text: String::new(),
            tree: DomTree::new(),
        }
    }

    /// Process every token and return the finished tree.
    #[must_use]
    pub fn run(mut self) -> DomTree {
        let tokens = std::mem::take(&mut self.tokens);
        for token in tokens {
            match token {
                Token::Character { data } => self.handle_character(data),
                Token::StartTag {
                    name,
                    self_closing,
                    attributes,
                } => {
                    self.flush_text();
                    self.handle_start_tag(&name, self_closing, attributes);
                }
                Token::EndTag { name } => {
                    self.flush_text();
                    self.handle_end_tag(&name);
                }
                Token::Comment { data } => {
                    self.flush_text();
                    let comment = self.tree.alloc(NodeType::Comment(data));
                    self.tree.append_child(self.current_node(), comment);
                }
                Token::EndOfFile => break,
            }
        }
        self.flush_text();
        let _ = self.ensure_body();
        self.tree
    }

    /// "The current node is the bottommost node in this stack of open elements."
    fn current_node(&self) -> NodeId {
        self.stack_of_open_elements
            .last()
            .copied()
            .unwrap_or(NodeId::ROOT)
    }

    fn current_node_is(&self, node: Option<NodeId>) -> bool {
        node.is_some_and(|n| n == self.current_node())
    }

    fn handle_character(&mut self, c: char) {
        // Inter-element whitespace directly inside <html> or <head> is dropped.
        let in_structural_node = self.stack_of_open_elements.is_empty()
            || self.current_node_is(self.html_element)
            || self.current_node_is(self.head_element_pointer);
        if in_structural_node {
            if c.is_ascii_whitespace() {
                return;
            }
            let _ = self.ensure_body();
        }
        self.pending_text.push(c);
    }

    fn handle_start_tag(&mut self, name: &str, self_closing: bool, attributes: Vec<Attribute>) {
        match name {
            // "A start tag whose tag name is "html"" - "for each attribute on the
            // token, check to see if the attribute is already present on the top
            // element of the stack of open elements. If it is not, add the
            // attribute and its corresponding value to that element."
            "html" => {
                let html = self.ensure_html();
                self.merge_attributes(html, attributes);
            }
            "head" if self.insertion_mode != InsertionMode::InBody => {
                let head = self.ensure_head();
                self.merge_attributes(head, attributes);
            }
            "body" => {
                let body = self.ensure_body();
                self.merge_attributes(body, attributes);
            }
            _ if self.insertion_mode != InsertionMode::InBody
                && HEAD_ELEMENTS.contains(&name) =>
            {
                let head = self.ensure_head();
                // Head content seen after `</head>` still belongs to the head.
                if !self.stack_of_open_elements.contains(&head) {
                    self.stack_of_open_elements.push(head);
                }
                self.insert_element(name, self_closing, attributes);
            }
            _ => {
                let _ = self.ensure_body();
                self.insert_element(name, self_closing, attributes);
            }
        }
    }

    fn handle_end_tag(&mut self, name: &str) {
        match name {
            // The html and body elements stay open until the end of input.
            "html" | "body" => {}
            "head" => {
                if let Some(head) = self.head_element_pointer {
                    self.pop_until(head);
                }
            }
            _ => {
                let position = self.stack_of_open_elements.iter().rposition(|&id| {
                    Some(id) != self.html_element
                        && Some(id) != self.body_element
                        && Some(id) != self.head_element_pointer
                        && self
                            .tree
                            .as_element(id)
                            .is_some_and(|e| e.tag_name == name)
                });
                match position {
                    Some(index) => self.stack_of_open_elements.truncate(index),
                    None => trace!(tag = name, "ignoring unmatched end tag"),
                }
            }
        }
    }

    /// [§ 13.2.6.1 Creating and inserting nodes](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-foreign-element)
    fn insert_element(&mut self, name: &str, self_closing: bool, attributes: Vec<Attribute>) {
        let mut attrs = AttributesMap::new();
        for attribute in attributes {
            let _ = attrs.entry(attribute.name).or_insert(attribute.value);
        }
        let element = self.tree.append_element(
            self.current_node(),
            ElementData {
                tag_name: name.to_string(),
                attrs,
            },
        );
        if !self_closing && !VOID_ELEMENTS.contains(&name) {
            self.stack_of_open_elements.push(element);
        }
    }

    fn ensure_html(&mut self) -> NodeId {
        if let Some(html) = self.html_element {
            return html;
        }
        let html = self
            .tree
            .append_element(NodeId::ROOT, ElementData::new("html"));
        self.stack_of_open_elements.push(html);
        self.html_element = Some(html);
        self.switch_mode(InsertionMode::InHead);
        html
    }

    fn ensure_head(&mut self) -> NodeId {
        let html = self.ensure_html();
        if let Some(head) = self.head_element_pointer {
            return head;
        }
        let head = self.tree.append_element(html, ElementData::new("head"));
        self.stack_of_open_elements.push(head);
        self.head_element_pointer = Some(head);
        head
    }

    /// Leaves the head (if open) and inserts the body element on first use.
    fn ensure_body(&mut self) -> NodeId {
        if let Some(body) = self.body_element {
            return body;
        }
        let html = self.ensure_html();
        let _ = self.ensure_head();
        self.pop_until_current(html);
        let body = self.tree.append_element(html, ElementData::new("body"));
        self.stack_of_open_elements.push(body);
        self.body_element = Some(body);
        self.switch_mode(InsertionMode::InBody);
        body
    }

    /// Pops elements until `target` has been popped.
    fn pop_until(&mut self, target: NodeId) {
        if let Some(index) = self.stack_of_open_elements.iter().rposition(|&id| id == target) {
            self.stack_of_open_elements.truncate(index);
        }
    }

    /// Pops elements until `target` is the current node.
    fn pop_until_current(&mut self, target: NodeId) {
        if let Some(index) = self.stack_of_open_elements.iter().rposition(|&id| id == target) {
            self.stack_of_open_elements.truncate(index + 1);
        }
    }

    fn merge_attributes(&mut self, element: NodeId, attributes: Vec<Attribute>) {
        let Some(node) = self.tree.get_mut(element) else {
            return;
        };
        if let NodeType::Element(data) = &mut node.node_type {
            for attribute in attributes {
                let _ = data.attrs.entry(attribute.name).or_insert(attribute.value);
            }
        }
    }

    fn flush_text(&mut self) {
        if self.pending_text.is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.pending_text);
        let node = self.tree.alloc(NodeType::Text(text));
        self.tree.append_child(self.current_node(), node);
    }

    fn switch_mode(&mut self, mode: InsertionMode) {
        trace!(from = %self.insertion_mode, to = %mode, "insertion mode");
        self.insertion_mode = mode;
    }
}

/// Render a subtree as an indented outline, one node per line.
#[must_use]
pub fn dump_tree(tree: &DomTree, id: NodeId) -> String {
    let mut out = String::new();
    let mut stack = vec![(id, 0_usize)];
    while let Some((node_id, depth)) = stack.pop() {
        let Some(node) = tree.get(node_id) else {
            continue;
        };
        let prefix = "  ".repeat(depth);
        let _ = match &node.node_type {
            NodeType::Document => writeln!(out, "{prefix}Document"),
            NodeType::Element(data) => writeln!(out, "{prefix}{}", format_start_tag(data)),
            NodeType::Text(data) => {
                let display = data.replace('\n', "\\n");
                writeln!(out, "{prefix}\"{display}\"")
            }
            NodeType::Comment(data) => writeln!(out, "{prefix}<!-- {data} -->"),
        };
        stack.extend(tree.children(node_id).iter().rev().map(|&c| (c, depth + 1)));
    }
    out
}

/// Format an element's start tag with its attributes in name order.
#[must_use]
pub fn format_start_tag(data: &ElementData) -> String {
    let mut attrs: Vec<(&String, &String)> = data.attrs.iter().collect();
    attrs.sort();
    let mut out = format!("<{}", data.tag_name);
    for (name, value) in attrs {
        if value.is_empty() {
            let _ = write!(out, " {name}");
        } else {
            let _ = write!(out, " {name}=\"{value}\"");
        }
    }
    out.push('>');
    out
}
