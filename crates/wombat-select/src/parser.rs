//! Selector grammar.
//!
//! ```text
//! selector := group (whitespace group)*
//! group    := term+
//! term     := '#' name | name | '.' name | '[' name ( '=' value )? ']'
//! value    := name | '"' name '"' | '\'' name '\''
//! name     := [A-Za-z0-9_-]+
//! ```
//!
//! Terms are tried in the order id, tag, class, attribute against the
//! unconsumed input. Anything else (combinators other than whitespace,
//! pseudo-classes, attribute operators) is a syntax error.

use tracing::trace;

use crate::error::SelectorError;
use crate::selector::{ParsedSelector, PredicateTerm, SelectorGroup};

/// Characters allowed in names and unquoted values: ASCII word characters and `-`.
const fn is_name_char(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_' || c == b'-'
}

/// Byte length of the run of name characters at the start of `input`.
fn name_len(input: &str) -> usize {
    input.bytes().take_while(|&b| is_name_char(b)).count()
}

/// Split a non-empty name off the front of `input`.
fn take_name(input: &str) -> Option<(&str, &str)> {
    match name_len(input) {
        0 => None,
        len => Some(input.split_at(len)),
    }
}

fn match_id(input: &str) -> Option<(PredicateTerm, usize)> {
    let (name, _) = take_name(input.strip_prefix('#')?)?;
    Some((PredicateTerm::ById(name.to_string()), 1 + name.len()))
}

fn match_tag(input: &str) -> Option<(PredicateTerm, usize)> {
    let (name, _) = take_name(input)?;
    Some((PredicateTerm::ByTag(name.to_string()), name.len()))
}

fn match_class(input: &str) -> Option<(PredicateTerm, usize)> {
    let (name, _) = take_name(input.strip_prefix('.')?)?;
    Some((PredicateTerm::ByClass(name.to_string()), 1 + name.len()))
}

/// `[name]`, `[name=value]`, `[name="value"]` or `[name='value']`.
fn match_attr(input: &str) -> Option<(PredicateTerm, usize)> {
    let body = input.strip_prefix('[')?;
    let (name, rest) = take_name(body)?;

    if let Some(rest) = rest.strip_prefix(']') {
        let consumed = input.len() - rest.len();
        let term = PredicateTerm::ByAttr {
            name: name.to_string(),
            value: None,
        };
        return Some((term, consumed));
    }

    let rest = rest.strip_prefix('=')?;
    let (quote, rest) = match rest.as_bytes().first() {
        Some(&q @ (b'"' | b'\'')) => (Some(q as char), &rest[1..]),
        _ => (None, rest),
    };
    let (value, mut rest) = take_name(rest)?;
    if let Some(q) = quote {
        rest = rest.strip_prefix(q)?;
    }
    let rest = rest.strip_prefix(']')?;

    let term = PredicateTerm::ByAttr {
        name: name.to_string(),
        value: Some(value.to_string()),
    };
    Some((term, input.len() - rest.len()))
}

/// Try every term pattern, in order, against the start of `input`.
/// Returns the term and the number of bytes it consumed.
fn match_term(input: &str) -> Option<(PredicateTerm, usize)> {
    match_id(input)
        .or_else(|| match_tag(input))
        .or_else(|| match_class(input))
        .or_else(|| match_attr(input))
}

/// Parse a selector into groups of predicate terms.
///
/// Leading and trailing whitespace is ignored. Returns `Ok(None)` for an empty
/// (or all-whitespace) selector.
///
/// # Errors
///
/// Returns [`SelectorError::Syntax`] if some part of the input matches none of
/// the term patterns.
pub fn parse(selector: &str) -> Result<Option<ParsedSelector>, SelectorError> {
    let trimmed = selector.trim_start();
    let leading = selector.len() - trimmed.len();
    let trimmed = trimmed.trim_end();

    let mut groups: Vec<SelectorGroup> = Vec::new();
    let mut terms: Vec<PredicateTerm> = Vec::new();
    let mut rest = trimmed;

    while !rest.is_empty() {
        // [§ 16.1 Descendant combinator](https://www.w3.org/TR/selectors-4/#descendant-combinators)
        // "A descendant combinator is whitespace that separates two compound selectors."
        let after_whitespace = rest.trim_start();
        if after_whitespace.len() < rest.len() && !terms.is_empty() {
            groups.extend(SelectorGroup::new(std::mem::take(&mut terms)));
            rest = after_whitespace;
            continue;
        }

        let Some((term, consumed)) = match_term(rest) else {
            let offset = leading + (trimmed.len() - rest.len());
            trace!(selector, offset, "unsupported selector construct");
            return Err(SelectorError::Syntax {
                selector: selector.to_string(),
                offset,
            });
        };
        terms.push(term);
        rest = &rest[consumed..];
    }

    groups.extend(SelectorGroup::new(terms));
    let parsed = ParsedSelector::new(groups);
    if let Some(parsed) = &parsed {
        trace!(selector, groups = parsed.group_count(), "parsed selector");
    }
    Ok(parsed)
}

/// Recognise a selector made of exactly one term (`#id`, `tag`, `.class` or
/// `[attr]` / `[attr=value]`), surrounding whitespace aside.
///
/// Produces the same [`ParsedSelector`] as [`parse`] for such input and `None`
/// for anything else, so callers can try it first and fall back to [`parse`].
#[must_use]
pub fn parse_simple(selector: &str) -> Option<ParsedSelector> {
    let trimmed = selector.trim();
    let (term, consumed) = match_term(trimmed)?;
    if consumed != trimmed.len() {
        return None;
    }
    ParsedSelector::new(vec![SelectorGroup::new(vec![term])?])
}
