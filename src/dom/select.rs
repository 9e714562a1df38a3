//! Minimal CSS selector matching.
//!
//! Supports what the decorators and the importer need: comma-separated
//! lists of compound selectors built from a tag name, `#id`, `.class` and
//! `[attr]` / `[attr="value"]` parts. Combinators are not supported; callers
//! walk the tree explicitly where structure matters.

use super::node::Element;

/// One compound selector, e.g. `div.section[data-layout]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<(String, Option<String>)>,
}

impl Compound {
    fn matches(&self, elem: &Element) -> bool {
        if let Some(tag) = &self.tag
            && *tag != elem.tag
        {
            return false;
        }
        if let Some(id) = &self.id
            && elem.id() != Some(id.as_str())
        {
            return false;
        }
        if !self.classes.iter().all(|c| elem.has_class(c)) {
            return false;
        }
        self.attrs.iter().all(|(name, value)| match value {
            Some(v) => elem.get_attr(name) == Some(v.as_str()),
            None => elem.attrs.contains(name),
        })
    }

    fn parse(src: &str) -> Self {
        let mut compound = Self::default();
        let mut chars = src.trim().chars().peekable();
        let mut tag = String::new();

        while let Some(&c) = chars.peek() {
            match c {
                '.' | '#' => {
                    chars.next();
                    let mut name = String::new();
                    while let Some(&n) = chars.peek() {
                        if matches!(n, '.' | '#' | '[') {
                            break;
                        }
                        name.push(n);
                        chars.next();
                    }
                    if c == '.' {
                        compound.classes.push(name);
                    } else {
                        compound.id = Some(name);
                    }
                }
                '[' => {
                    chars.next();
                    let mut inner = String::new();
                    for n in chars.by_ref() {
                        if n == ']' {
                            break;
                        }
                        inner.push(n);
                    }
                    compound.attrs.push(parse_attr(&inner));
                }
                _ => {
                    tag.push(c.to_ascii_lowercase());
                    chars.next();
                }
            }
        }

        if !tag.is_empty() && tag != "*" {
            compound.tag = Some(tag);
        }
        compound
    }
}

fn parse_attr(inner: &str) -> (String, Option<String>) {
    match inner.split_once('=') {
        Some((name, value)) => {
            let value = value.trim().trim_matches(|c| c == '"' || c == '\'');
            (name.trim().to_ascii_lowercase(), Some(value.to_string()))
        }
        None => (inner.trim().to_ascii_lowercase(), None),
    }
}

/// A selector list; matches when any compound matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector(Vec<Compound>);

impl Selector {
    pub fn parse(src: &str) -> Self {
        Self(
            src.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(Compound::parse)
                .collect(),
        )
    }

    /// Selector matching a single tag name.
    pub fn tag(name: &str) -> Self {
        Self(vec![Compound {
            tag: Some(name.to_ascii_lowercase()),
            ..Compound::default()
        }])
    }

    pub fn matches(&self, elem: &Element) -> bool {
        self.0.iter().any(|c| c.matches(elem))
    }
}
