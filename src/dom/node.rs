//! Page tree node types.
//!
//! A deliberately small tree: elements own their children, text is stored
//! decoded. Positions inside a tree are addressed by [`NodePath`], a list of
//! child indices from some root element, which lets callers collect targets
//! with a shared borrow and mutate them one at a time afterwards.

use super::select::Selector;

/// Child-index path from a root element to a descendant.
pub type NodePath = Vec<usize>;

/// A node in the page tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
}

impl Node {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    #[inline]
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(e) => Some(e),
            Self::Text(_) => None,
        }
    }

    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Self::Element(e) => Some(e),
            Self::Text(_) => None,
        }
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Self::Text(t) => out.push_str(t),
            Self::Element(e) => {
                for child in &e.children {
                    child.collect_text(out);
                }
            }
        }
    }
}

impl From<Element> for Node {
    fn from(elem: Element) -> Self {
        Self::Element(elem)
    }
}

// ============================================================================
// Attributes
// ============================================================================

/// Ordered attribute list (insertion order is preserved for rendering).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attrs(Vec<(String, String)>);

impl Attrs {
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn set(&mut self, name: &str, value: &str) {
        match self.0.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => value.clone_into(v),
            None => self.0.push((name.to_string(), value.to_string())),
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        let pos = self.0.iter().position(|(k, _)| k == name)?;
        Some(self.0.remove(pos).1)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|(k, _)| k == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a, const N: usize> From<[(&'a str, &'a str); N]> for Attrs {
    fn from(pairs: [(&'a str, &'a str); N]) -> Self {
        let mut attrs = Self::new();
        for (k, v) in pairs {
            attrs.set(k, v);
        }
        attrs
    }
}

// ============================================================================
// Element
// ============================================================================

/// An element with a lowercase tag name.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: String,
    pub attrs: Attrs,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attrs: Attrs::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attrs(tag: &str, attrs: Attrs) -> Self {
        Self {
            attrs,
            ..Self::new(tag)
        }
    }

    /// Builder: set an attribute.
    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.set(name, value);
        self
    }

    /// Builder: add a class.
    pub fn class(mut self, class: &str) -> Self {
        self.add_class(class);
        self
    }

    /// Builder: append a text child.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    /// Builder: append a child element.
    pub fn child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    // ------------------------------------------------------------------------
    // attributes and classes
    // ------------------------------------------------------------------------

    #[inline]
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name)
    }

    #[inline]
    pub fn set_attr(&mut self, name: &str, value: &str) {
        self.attrs.set(name, value);
    }

    #[inline]
    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        self.attrs.remove(name)
    }

    #[inline]
    pub fn id(&self) -> Option<&str> {
        self.attrs.get("id")
    }

    /// Class names in order, like `classList`.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attrs
            .get("class")
            .unwrap_or_default()
            .split_ascii_whitespace()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    pub fn first_class(&self) -> Option<&str> {
        self.classes().next()
    }

    pub fn add_class(&mut self, class: &str) {
        if class.is_empty() || self.has_class(class) {
            return;
        }
        let joined = match self.attrs.get("class").filter(|c| !c.trim().is_empty()) {
            Some(existing) => format!("{} {class}", existing.trim()),
            None => class.to_string(),
        };
        self.attrs.set("class", &joined);
    }

    pub fn remove_class(&mut self, class: &str) {
        let remaining: Vec<&str> = self.classes().filter(|c| *c != class).collect();
        if remaining.is_empty() {
            self.attrs.remove("class");
        } else {
            let joined = remaining.join(" ");
            self.attrs.set("class", &joined);
        }
    }

    pub fn clear_classes(&mut self) {
        self.attrs.remove("class");
    }

    // ------------------------------------------------------------------------
    // children
    // ------------------------------------------------------------------------

    pub fn push(&mut self, node: impl Into<Node>) {
        self.children.push(node.into());
    }

    pub fn prepend(&mut self, node: impl Into<Node>) {
        self.children.insert(0, node.into());
    }

    /// Direct element children, like `children`.
    pub fn element_children(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    pub fn element_children_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(Node::as_element_mut)
    }

    pub fn first_element_child(&self) -> Option<&Element> {
        self.element_children().next()
    }

    pub fn last_element_child(&self) -> Option<&Element> {
        self.element_children().last()
    }

    /// Concatenated text of all descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.collect_text(&mut out);
        }
        out
    }

    /// Replace all children with a single text node (or nothing).
    pub fn set_text(&mut self, text: &str) {
        self.children.clear();
        if !text.is_empty() {
            self.children.push(Node::text(text));
        }
    }

    // ------------------------------------------------------------------------
    // queries (descendants only, like `querySelector`)
    // ------------------------------------------------------------------------

    pub fn find(&self, selector: &Selector) -> Option<&Element> {
        for child in self.element_children() {
            if selector.matches(child) {
                return Some(child);
            }
            if let Some(found) = child.find(selector) {
                return Some(found);
            }
        }
        None
    }

    pub fn find_mut(&mut self, selector: &Selector) -> Option<&mut Element> {
        let path = self.find_path(selector)?;
        self.get_mut(&path)
    }

    /// All matching descendants in document order.
    pub fn find_all<'a>(&'a self, selector: &Selector) -> Vec<&'a Element> {
        let mut out = Vec::new();
        self.walk(&mut |e| {
            if selector.matches(e) {
                out.push(e);
            }
        });
        out
    }

    /// Path of the first matching descendant.
    pub fn find_path(&self, selector: &Selector) -> Option<NodePath> {
        self.find_paths(selector).into_iter().next()
    }

    /// Paths of all matching descendants in document order.
    pub fn find_paths(&self, selector: &Selector) -> Vec<NodePath> {
        let mut out = Vec::new();
        let mut path = Vec::new();
        self.collect_paths(selector, &mut path, &mut out);
        out
    }

    fn collect_paths(&self, selector: &Selector, path: &mut NodePath, out: &mut Vec<NodePath>) {
        for (i, child) in self.children.iter().enumerate() {
            if let Node::Element(e) = child {
                path.push(i);
                if selector.matches(e) {
                    out.push(path.clone());
                }
                e.collect_paths(selector, path, out);
                path.pop();
            }
        }
    }

    /// Depth-first visit of all descendant elements.
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a Element)) {
        for child in self.element_children() {
            f(child);
            child.walk(f);
        }
    }

    pub fn get(&self, path: &[usize]) -> Option<&Element> {
        let mut current = self;
        for &i in path {
            current = current.children.get(i)?.as_element()?;
        }
        Some(current)
    }

    pub fn get_mut(&mut self, path: &[usize]) -> Option<&mut Element> {
        let mut current = self;
        for &i in path {
            current = current.children.get_mut(i)?.as_element_mut()?;
        }
        Some(current)
    }

    /// Detach the node at `path` from the tree.
    pub fn remove_at(&mut self, path: &[usize]) -> Option<Node> {
        let (&last, parent) = path.split_last()?;
        let parent = self.get_mut(parent)?;
        (last < parent.children.len()).then(|| parent.children.remove(last))
    }

    /// Insert `node` at `path`, shifting later siblings.
    pub fn insert_at(&mut self, path: &[usize], node: impl Into<Node>) -> bool {
        let Some((&last, parent)) = path.split_last() else {
            return false;
        };
        match self.get_mut(parent) {
            Some(parent) if last <= parent.children.len() => {
                parent.children.insert(last, node.into());
                true
            }
            _ => false,
        }
    }

    /// Remove every descendant matching `selector`. Returns how many were removed.
    pub fn remove_all(&mut self, selector: &Selector) -> usize {
        let before = self.children.len();
        self.children
            .retain(|n| !matches!(n, Node::Element(e) if selector.matches(e)));
        let mut removed = before - self.children.len();
        for child in self.element_children_mut() {
            removed += child.remove_all(selector);
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Element {
        Element::new("div")
            .child(Element::new("p").text("one"))
            .child(
                Element::new("section")
                    .class("intro")
                    .child(Element::new("p").text("two"))
                    .child(Element::new("img").attr("src", "/a.png")),
            )
    }

    #[test]
    fn test_class_list_operations() {
        let mut e = Element::new("DIV");
        assert_eq!(e.tag, "div");
        e.add_class("section");
        e.add_class("section");
        e.add_class("hero-container");
        assert_eq!(e.get_attr("class"), Some("section hero-container"));
        e.remove_class("section");
        assert_eq!(e.first_class(), Some("hero-container"));
        e.remove_class("hero-container");
        assert!(!e.attrs.contains("class"));
    }

    #[test]
    fn test_text_content_concatenates_descendants() {
        assert_eq!(sample().text_content(), "onetwo");
    }

    #[test]
    fn test_find_is_document_order() {
        let root = sample();
        let p = Selector::parse("p");
        assert_eq!(root.find(&p).map(Element::text_content), Some("one".into()));
        assert_eq!(root.find_paths(&p), vec![vec![0], vec![1, 0]]);
    }

    #[test]
    fn test_find_excludes_self() {
        let root = sample();
        assert!(root.find(&Selector::parse("div")).is_none());
    }

    #[test]
    fn test_remove_and_insert_by_path() {
        let mut root = sample();
        let img = root.remove_at(&[1, 1]).unwrap();
        assert!(root.find(&Selector::parse("img")).is_none());
        assert!(root.insert_at(&[0], img));
        assert_eq!(root.first_element_child().map(|e| e.tag.as_str()), Some("img"));
    }

    #[test]
    fn test_remove_all_nested() {
        let mut root = sample();
        assert_eq!(root.remove_all(&Selector::parse("p")), 2);
        assert_eq!(root.text_content(), "");
    }
}
