//! Page tree → HTML serialization.

use super::node::{Element, Node};
use crate::utils::html::{escape, escape_attr, is_raw_text_element, is_void_element};

/// Render an element (including its own tag) to HTML.
pub fn render_element(elem: &Element) -> String {
    let mut out = String::with_capacity(256);
    write_element(elem, &mut out);
    out
}

/// Render only the children of an element, like `innerHTML`.
pub fn render_children(elem: &Element) -> String {
    let mut out = String::with_capacity(256);
    let raw = is_raw_text_element(&elem.tag);
    for child in &elem.children {
        write_node(child, raw, &mut out);
    }
    out
}

/// Render a full document with a doctype.
pub fn render_document(root: &Element) -> String {
    let mut out = String::from("<!DOCTYPE html>\n");
    write_element(root, &mut out);
    out.push('\n');
    out
}

fn write_node(node: &Node, raw: bool, out: &mut String) {
    match node {
        Node::Element(e) => write_element(e, out),
        Node::Text(t) if raw => out.push_str(t),
        Node::Text(t) => out.push_str(&escape(t)),
    }
}

fn write_element(elem: &Element, out: &mut String) {
    out.push('<');
    out.push_str(&elem.tag);
    for (name, value) in elem.attrs.iter() {
        out.push(' ');
        out.push_str(name);
        if !value.is_empty() {
            out.push_str("=\"");
            out.push_str(&escape_attr(value));
            out.push('"');
        }
    }
    out.push('>');

    if is_void_element(&elem.tag) {
        return;
    }

    let raw = is_raw_text_element(&elem.tag);
    for child in &elem.children {
        write_node(child, raw, out);
    }

    out.push_str("</");
    out.push_str(&elem.tag);
    out.push('>');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_attributes_and_void() {
        let elem = Element::new("a")
            .attr("href", "/news?a=1&b=2")
            .child(Element::new("img").attr("src", "/x.png"))
            .text("Fish & Chips");
        assert_eq!(
            render_element(&elem),
            r#"<a href="/news?a=1&amp;b=2"><img src="/x.png">Fish &amp; Chips</a>"#
        );
    }

    #[test]
    fn test_render_boolean_attribute() {
        let elem = Element::new("script").attr("defer", "").text("if (a < b) {}");
        assert_eq!(render_element(&elem), "<script defer>if (a < b) {}</script>");
    }

    #[test]
    fn test_render_document_has_doctype() {
        let html = render_document(&Element::new("html"));
        assert!(html.starts_with("<!DOCTYPE html>\n<html></html>"));
    }
}
