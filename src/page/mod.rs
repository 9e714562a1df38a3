//! The page value threaded through every pipeline stage.
//!
//! A `Page` owns the whole document tree (`<html>` with `<head>` and
//! `<body>`), the location it was loaded from, and a metadata snapshot taken
//! when the page was parsed.

mod meta;
mod url;

pub use meta::Metadata;
pub use url::PageUrl;

use crate::dom::{Element, Node, Selector, parse_nodes, render_document};

/// A parsed page.
#[derive(Debug, Clone)]
pub struct Page {
    pub root: Element,
    pub url: PageUrl,
    meta: Metadata,
}

impl Page {
    /// Parse a full document or a body fragment.
    ///
    /// Missing `<html>`, `<head>` or `<body>` elements are synthesized; loose
    /// top-level content ends up in `<body>`.
    pub fn parse(html: &str, url: PageUrl) -> Self {
        let nodes = parse_nodes(html);
        let root = Self::normalize(nodes);
        let meta = root
            .element_children()
            .find(|e| e.tag == "head")
            .map(Metadata::from_head)
            .unwrap_or_default();
        Self { root, url, meta }
    }

    fn normalize(nodes: Vec<Node>) -> Element {
        let mut html = None;
        let mut loose = Vec::new();
        for node in nodes {
            match node {
                Node::Element(e) if e.tag == "html" && html.is_none() => html = Some(e),
                other => loose.push(other),
            }
        }

        let mut html = html.unwrap_or_else(|| Element::new("html"));
        let mut head = None;
        let mut body = None;
        let mut stray = Vec::new();
        for node in std::mem::take(&mut html.children).into_iter().chain(loose) {
            match node {
                Node::Element(e) if e.tag == "head" && head.is_none() => head = Some(e),
                Node::Element(e) if e.tag == "body" && body.is_none() => body = Some(e),
                other => stray.push(other),
            }
        }

        let head = head.unwrap_or_else(|| Element::new("head"));
        let mut body = body.unwrap_or_else(|| Element::new("body"));
        body.children.extend(stray);

        html.children = vec![Node::Element(head), Node::Element(body)];
        html
    }

    /// Wrap fragment markup in `<main>`, the way fragments are decorated.
    pub fn fragment(html: &str, url: PageUrl) -> Self {
        let mut main = Element::new("main");
        main.children = parse_nodes(html);
        let mut page = Self::parse("", url);
        page.body_mut().push(main);
        page
    }

    #[inline]
    pub fn metadata(&self) -> &Metadata {
        &self.meta
    }

    pub fn metadata_mut(&mut self) -> &mut Metadata {
        &mut self.meta
    }

    // ------------------------------------------------------------------------
    // landmarks
    // ------------------------------------------------------------------------

    fn child_mut(&mut self, tag: &str) -> &mut Element {
        let pos = self
            .root
            .children
            .iter()
            .position(|n| matches!(n, Node::Element(e) if e.tag == tag));
        let pos = pos.unwrap_or_else(|| {
            self.root.children.push(Node::Element(Element::new(tag)));
            self.root.children.len() - 1
        });
        match &mut self.root.children[pos] {
            Node::Element(e) => e,
            Node::Text(_) => unreachable!("landmark position always holds an element"),
        }
    }

    pub fn head(&self) -> Option<&Element> {
        self.root.element_children().find(|e| e.tag == "head")
    }

    pub fn head_mut(&mut self) -> &mut Element {
        self.child_mut("head")
    }

    pub fn body(&self) -> Option<&Element> {
        self.root.element_children().find(|e| e.tag == "body")
    }

    pub fn body_mut(&mut self) -> &mut Element {
        self.child_mut("body")
    }

    pub fn main(&self) -> Option<&Element> {
        self.body()?.find(&Selector::tag("main"))
    }

    pub fn main_mut(&mut self) -> Option<&mut Element> {
        self.body_mut().find_mut(&Selector::tag("main"))
    }

    pub fn aside(&self) -> Option<&Element> {
        self.body()?.find(&Selector::tag("aside"))
    }

    /// Element with the given id anywhere in the body.
    pub fn element_by_id(&self, id: &str) -> Option<&Element> {
        let body = self.body()?;
        let mut found = None;
        body.walk(&mut |e| {
            if found.is_none() && e.id() == Some(id) {
                found = Some(e);
            }
        });
        found
    }

    /// Serialize the whole document.
    pub fn to_html(&self) -> String {
        render_document(&self.root)
    }
}
