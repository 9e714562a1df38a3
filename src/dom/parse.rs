//! HTML → page tree conversion using `tl`.

use super::node::{Attrs, Element, Node};
use crate::utils::html::{is_block_element, is_raw_text_element, is_structural_element, unescape};

/// Parse an HTML string into top-level nodes.
///
/// Comments and doctype declarations are dropped. Whitespace-only text
/// collapses to a single space between two pieces of inline content and
/// is dropped everywhere else.
/// Tag and attribute names are lowercased; text and attribute values are
/// entity-decoded.
pub fn parse_nodes(html: &str) -> Vec<Node> {
    let Ok(dom) = tl::parse(html, tl::ParserOptions::default()) else {
        return if html.trim().is_empty() {
            Vec::new()
        } else {
            vec![Node::text(unescape(html))]
        };
    };

    let parser = dom.parser();
    convert_children(dom.children(), parser, false)
}

/// Parse an HTML fragment and return its first top-level element.
pub fn parse_element(html: &str) -> Option<Element> {
    parse_nodes(html).into_iter().find_map(|n| match n {
        Node::Element(e) => Some(e),
        Node::Text(_) => None,
    })
}

fn convert(handle: tl::NodeHandle, parser: &tl::Parser, raw_text: bool) -> Option<Node> {
    match handle.get(parser)? {
        tl::Node::Tag(tag) => {
            let name = tag.name().as_utf8_str().to_ascii_lowercase();
            if name.starts_with('!') || name.is_empty() {
                return None;
            }

            let mut attrs = Attrs::new();
            let tag_attrs = tag.attributes();
            for (key, value) in tag_attrs.iter() {
                let key: &str = key.as_ref();
                let value = value.map(|v| unescape(&v).into_owned()).unwrap_or_default();
                attrs.set(&key.to_ascii_lowercase(), &value);
            }
            // `id` and `class` are stored separately by tl
            if !attrs.contains("id")
                && let Some(id) = tag_attrs.id()
            {
                attrs.set("id", &unescape(&id.as_utf8_str()));
            }
            if !attrs.contains("class")
                && let Some(class) = tag_attrs.class()
            {
                attrs.set("class", &unescape(&class.as_utf8_str()));
            }

            let is_raw = is_raw_text_element(&name);
            let mut elem = Element::with_attrs(&name, attrs);
            elem.children = convert_children(tag.children().top().as_slice(), parser, is_raw);
            Some(Node::Element(elem))
        }
        tl::Node::Raw(bytes) => {
            let text = bytes.as_utf8_str();
            if text.trim().is_empty() {
                None
            } else if raw_text {
                Some(Node::text(text.into_owned()))
            } else {
                Some(Node::text(unescape(&text).into_owned()))
            }
        }
        tl::Node::Comment(_) => None,
    }
}

fn convert_children(handles: &[tl::NodeHandle], parser: &tl::Parser, raw_text: bool) -> Vec<Node> {
    let mut nodes = Vec::with_capacity(handles.len());
    for (i, handle) in handles.iter().enumerate() {
        if !raw_text && is_blank(*handle, parser) {
            let between_inline = i > 0
                && is_inline(handles[i - 1], parser)
                && handles.get(i + 1).is_some_and(|next| is_inline(*next, parser));
            if between_inline {
                nodes.push(Node::text(" "));
            }
            continue;
        }
        if let Some(node) = convert(*handle, parser, raw_text) {
            nodes.push(node);
        }
    }
    nodes
}

fn is_blank(handle: tl::NodeHandle, parser: &tl::Parser) -> bool {
    matches!(handle.get(parser), Some(tl::Node::Raw(bytes)) if bytes.as_utf8_str().trim().is_empty())
}

/// Text, or an element that flows within a line of text.
fn is_inline(handle: tl::NodeHandle, parser: &tl::Parser) -> bool {
    match handle.get(parser) {
        Some(tl::Node::Raw(bytes)) => !bytes.as_utf8_str().trim().is_empty(),
        Some(tl::Node::Tag(tag)) => {
            let name = tag.name().as_utf8_str().to_ascii_lowercase();
            !name.starts_with('!') && !is_block_element(&name) && !is_structural_element(&name)
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nested_structure() {
        let nodes = parse_nodes("<main><div><p>Hello <strong>world</strong></p></div></main>");
        assert_eq!(nodes.len(), 1);
        let main = nodes[0].as_element().unwrap();
        assert_eq!(main.tag, "main");
        assert_eq!(main.text_content(), "Hello world");
    }

    #[test]
    fn test_parse_attributes_and_classes() {
        let elem = parse_element(r#"<div id="x" class="section highlight" data-layout="6-6"></div>"#)
            .unwrap();
        assert_eq!(elem.id(), Some("x"));
        assert!(elem.has_class("highlight"));
        assert_eq!(elem.get_attr("data-layout"), Some("6-6"));
    }

    #[test]
    fn test_entities_decoded() {
        let elem = parse_element("<p title=\"a &amp; b\">Fish &amp; Chips</p>").unwrap();
        assert_eq!(elem.get_attr("title"), Some("a & b"));
        assert_eq!(elem.text_content(), "Fish & Chips");
    }

    #[test]
    fn test_whitespace_and_comments_dropped() {
        let elem = parse_element("<ul>\n  <li>a</li>\n  <!-- gone -->\n  <li>b</li>\n</ul>").unwrap();
        assert_eq!(elem.children.len(), 2);

        let elem = parse_element("<div>\n  <p>a</p>\n  <span>b</span>\n</div>").unwrap();
        assert_eq!(elem.children.len(), 2);
    }

    #[test]
    fn test_space_between_inline_siblings_kept() {
        let elem = parse_element("<p><strong>City</strong> <em>of</em>\n  <a href=\"/\">Greeley</a></p>").unwrap();
        assert_eq!(elem.children.len(), 5);
        assert_eq!(elem.children[1], Node::text(" "));
        assert_eq!(elem.children[3], Node::text(" "));
        assert_eq!(elem.text_content(), "City of Greeley");

        // leading and trailing whitespace has no inline neighbour on one side
        let elem = parse_element("<p> <a>x</a> </p>").unwrap();
        assert_eq!(elem.children.len(), 1);
    }
}
