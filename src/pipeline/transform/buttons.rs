//! Button decoration.
//!
//! A paragraph (or div) whose only child is a link renders as a button.
//! `<strong>` around the link makes it primary, `<em>` secondary:
//!
//! ```text
//! <p><a>            ─▶ p.button-container > a.button
//! <p><strong><a>    ─▶ p.button-container > strong > a.button.primary
//! <p><em><a>        ─▶ p.button-container > em > a.button.secondary
//! ```

use crate::dom::{Element, Node, Selector};
use crate::page::Page;
use crate::pipeline::Transform;

/// Decorates button links inside `main`.
pub struct ButtonDecorator;

impl ButtonDecorator {
    /// Decorate every button link below `root`.
    pub fn decorate(root: &mut Element) {
        for child in root.element_children_mut() {
            Self::decorate(child);
        }

        if root.tag == "a" && root.get_attr("title").is_none_or(str::is_empty) {
            let title = root.text_content();
            root.set_attr("title", title.trim());
        }

        if let Some(class) = button_class(root) {
            if let Some(link) = sole_link_mut(root) {
                link.set_attr("class", class);
            }
            root.add_class("button-container");
        }
    }
}

/// Class for the button inside `container`, when it holds one.
fn button_class(container: &Element) -> Option<&'static str> {
    let [Node::Element(only)] = container.children.as_slice() else {
        return None;
    };
    match only.tag.as_str() {
        "a" if matches!(container.tag.as_str(), "p" | "div") => {
            is_button_link(only).then_some("button")
        }
        "strong" | "em" if container.tag == "p" => {
            let [Node::Element(link)] = only.children.as_slice() else {
                return None;
            };
            let class = if only.tag == "strong" {
                "button primary"
            } else {
                "button secondary"
            };
            (link.tag == "a" && is_button_link(link)).then_some(class)
        }
        _ => None,
    }
}

fn sole_link_mut(container: &mut Element) -> Option<&mut Element> {
    let only = container.children.first_mut()?.as_element_mut()?;
    if only.tag == "a" {
        return Some(only);
    }
    only.children.first_mut()?.as_element_mut()
}

/// Links that show their own URL and image links stay plain.
fn is_button_link(link: &Element) -> bool {
    let text = link.text_content();
    link.get_attr("href").is_some_and(|href| href != text.trim())
        && link.find(&Selector::tag("img")).is_none()
}

impl Transform for ButtonDecorator {
    fn transform(self, mut page: Page) -> Page {
        if let Some(main) = page.main_mut() {
            Self::decorate(main);
        }
        page
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{parse_element, render_element};

    fn decorate(html: &str) -> String {
        let mut root = parse_element(&format!("<div>{html}</div>")).unwrap();
        for child in root.element_children_mut() {
            ButtonDecorator::decorate(child);
        }
        render_element(&root)
    }

    #[test]
    fn test_plain_button() {
        let out = decorate(r#"<p><a href="/pay">Pay a bill</a></p>"#);
        assert_eq!(
            out,
            r#"<div><p class="button-container"><a href="/pay" title="Pay a bill" class="button">Pay a bill</a></p></div>"#
        );
    }

    #[test]
    fn test_primary_and_secondary() {
        let out = decorate(r#"<p><strong><a href="/a">A</a></strong></p><p><em><a href="/b">B</a></em></p>"#);
        assert!(out.contains(r#"class="button primary""#));
        assert!(out.contains(r#"class="button secondary""#));
        assert_eq!(out.matches("button-container").count(), 2);
    }

    #[test]
    fn test_inline_links_untouched() {
        let out = decorate(r#"<p>See <a href="/a">this</a> page</p>"#);
        assert!(!out.contains("button"));
    }

    #[test]
    fn test_url_text_and_image_links_untouched() {
        let out = decorate(
            r#"<p><a href="https://x.com">https://x.com</a></p><p><a href="/a"><img src="/i.png"></a></p>"#,
        );
        assert!(!out.contains("button"));
    }
}
