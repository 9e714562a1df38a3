//! Page tree → Markdown.
//!
//! Covers what migrated pages contain: headings, paragraphs, emphasis,
//! links, images, lists, tables (blocks, including the metadata block),
//! code, quotes and horizontal rules. Anything else is flattened into its
//! text.

use crate::dom::{Element, Node};
use crate::utils::html::is_block_element;

/// Render the children of `root` as Markdown.
pub fn to_markdown(root: &Element) -> String {
    let mut writer = MarkdownWriter::default();
    writer.blocks(&root.children);
    writer.finish()
}

/// Collects finished blocks; blocks are joined with one blank line.
#[derive(Default)]
struct MarkdownWriter {
    blocks: Vec<String>,
}

impl MarkdownWriter {
    fn finish(self) -> String {
        let mut out = self.blocks.join("\n\n");
        if !out.is_empty() {
            out.push('\n');
        }
        out
    }

    fn push(&mut self, block: String) {
        if !block.trim().is_empty() {
            self.blocks.push(block);
        }
    }

    /// Block context: runs of inline nodes become paragraphs.
    fn blocks(&mut self, nodes: &[Node]) {
        let mut run: Vec<&Node> = Vec::new();
        for node in nodes {
            match node {
                Node::Element(e) if is_block_element(&e.tag) => {
                    self.paragraph(&run);
                    run.clear();
                    self.block(e);
                }
                Node::Element(e) if is_skipped(&e.tag) => {}
                _ => run.push(node),
            }
        }
        self.paragraph(&run);
    }

    fn paragraph(&mut self, nodes: &[&Node]) {
        let text = inline_nodes(nodes.iter().copied(), Context::Text);
        self.push(text.trim().to_string());
    }

    fn block(&mut self, e: &Element) {
        match e.tag.as_str() {
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                let level = usize::from(e.tag.as_bytes()[1] - b'0');
                let text = inline(e, Context::Text);
                if !text.trim().is_empty() {
                    self.push(format!("{} {}", "#".repeat(level), text.trim()));
                }
            }
            "p" => self.push(inline(e, Context::Text).trim().to_string()),
            "hr" => self.blocks.push("---".to_string()),
            "ul" | "ol" => self.push(list(e, 0)),
            "table" => self.push(table(e)),
            "pre" => {
                let code = e.text_content();
                self.blocks.push(format!("```\n{}\n```", code.trim_end_matches('\n')));
            }
            "blockquote" => {
                let mut inner = Self::default();
                inner.blocks(&e.children);
                let quoted = inner
                    .blocks
                    .join("\n\n")
                    .lines()
                    .map(|l| if l.is_empty() { ">".to_string() } else { format!("> {l}") })
                    .collect::<Vec<_>>()
                    .join("\n");
                self.push(quoted);
            }
            _ => self.blocks(&e.children),
        }
    }
}

/// Never part of the output.
fn is_skipped(tag: &str) -> bool {
    matches!(tag, "script" | "style" | "noscript" | "template" | "head")
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Context {
    Text,
    /// Inside a table cell: no line breaks, pipes escaped.
    Cell,
}

fn inline(e: &Element, ctx: Context) -> String {
    inline_nodes(e.children.iter(), ctx)
}

fn inline_nodes<'a>(nodes: impl Iterator<Item = &'a Node>, ctx: Context) -> String {
    let mut out = String::new();
    for node in nodes {
        match node {
            Node::Text(t) => push_text(&mut out, t, ctx),
            Node::Element(e) => inline_element(&mut out, e, ctx),
        }
    }
    out
}

fn inline_element(out: &mut String, e: &Element, ctx: Context) {
    match e.tag.as_str() {
        "strong" | "b" => wrap(out, "**", &inline(e, ctx)),
        "em" | "i" => wrap(out, "_", &inline(e, ctx)),
        "code" => {
            let code = e.text_content();
            if !code.is_empty() {
                out.push('`');
                out.push_str(&code);
                out.push('`');
            }
        }
        "a" => {
            let text = inline(e, ctx);
            match e.get_attr("href").filter(|h| !h.is_empty()) {
                Some(href) => {
                    out.push('[');
                    out.push_str(text.trim());
                    out.push_str("](");
                    out.push_str(&link_target(href));
                    out.push(')');
                }
                None => out.push_str(&text),
            }
        }
        "img" => {
            let src = e.get_attr("src").unwrap_or_default();
            if !src.is_empty() {
                let alt = escape_markdown(e.get_attr("alt").unwrap_or_default(), ctx);
                out.push_str(&format!("![{alt}]({})", link_target(src)));
            }
        }
        "br" => match ctx {
            Context::Text => out.push_str("\\\n"),
            Context::Cell => out.push(' '),
        },
        tag if is_skipped(tag) => {}
        // nested blocks inside inline content lose their structure
        tag if is_block_element(tag) => {
            let text = inline(e, ctx);
            if !text.trim().is_empty() {
                if !out.is_empty() && !out.ends_with(char::is_whitespace) {
                    out.push(' ');
                }
                out.push_str(text.trim());
            }
        }
        _ => out.push_str(&inline(e, ctx)),
    }
}

/// Emphasis markers must hug the text; surrounding spaces move outside.
fn wrap(out: &mut String, marker: &str, text: &str) {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        out.push_str(text);
        return;
    }
    if text.starts_with(char::is_whitespace) {
        out.push(' ');
    }
    out.push_str(marker);
    out.push_str(trimmed);
    out.push_str(marker);
    if text.ends_with(char::is_whitespace) {
        out.push(' ');
    }
}

fn push_text(out: &mut String, text: &str, ctx: Context) {
    // collapse whitespace the way the browser lays it out
    let mut collapsed = String::with_capacity(text.len());
    let mut in_space = out.ends_with(char::is_whitespace);
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_space {
                collapsed.push(' ');
            }
            in_space = true;
        } else {
            collapsed.push(c);
            in_space = false;
        }
    }
    out.push_str(&escape_markdown(&collapsed, ctx));
}

fn escape_markdown(text: &str, ctx: Context) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '*' | '_' | '[' | ']' | '`') || ctx == Context::Cell && c == '|' {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Destinations with spaces or parentheses go in angle brackets.
fn link_target(href: &str) -> String {
    if href.contains([' ', '(', ')']) {
        format!("<{href}>")
    } else {
        href.to_string()
    }
}

fn list(e: &Element, depth: usize) -> String {
    let ordered = e.tag == "ol";
    let indent = "   ".repeat(depth);
    let mut lines = Vec::new();

    for (i, item) in e.element_children().filter(|c| c.tag == "li").enumerate() {
        let marker = if ordered { format!("{}.", i + 1) } else { "-".to_string() };

        let (nested, text): (Vec<&Node>, Vec<&Node>) = item
            .children
            .iter()
            .partition(|n| matches!(n, Node::Element(c) if c.tag == "ul" || c.tag == "ol"));
        let text = inline_nodes(text.into_iter(), Context::Text);
        lines.push(format!("{indent}{marker} {}", text.trim()));

        for sub in nested.into_iter().filter_map(Node::as_element) {
            lines.push(list(sub, depth + 1));
        }
    }
    lines.join("\n")
}

fn table(e: &Element) -> String {
    let mut rows: Vec<Vec<String>> = Vec::new();
    collect_rows(e, &mut rows);
    let Some(columns) = rows.iter().map(Vec::len).max().filter(|&n| n > 0) else {
        return String::new();
    };

    let line = |cells: &[String]| {
        let mut padded: Vec<&str> = cells.iter().map(String::as_str).collect();
        padded.resize(columns, "");
        format!("| {} |", padded.join(" | "))
    };

    let mut out = vec![line(&rows[0])];
    out.push(format!("|{}", " --- |".repeat(columns)));
    out.extend(rows[1..].iter().map(|r| line(r)));
    out.join("\n")
}

fn collect_rows(e: &Element, rows: &mut Vec<Vec<String>>) {
    for child in e.element_children() {
        match child.tag.as_str() {
            "tr" => rows.push(
                child
                    .element_children()
                    .filter(|c| c.tag == "td" || c.tag == "th")
                    .map(|c| inline(c, Context::Cell).trim().to_string())
                    .collect(),
            ),
            "thead" | "tbody" | "tfoot" => collect_rows(child, rows),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parse_element;
    use pulldown_cmark::{Options, Parser, html};

    fn md(body: &str) -> String {
        to_markdown(&parse_element(&format!("<body>{body}</body>")).unwrap())
    }

    fn to_html(markdown: &str) -> String {
        let mut out = String::new();
        html::push_html(&mut out, Parser::new_ext(markdown, Options::ENABLE_TABLES));
        out
    }

    #[test]
    fn test_headings_and_paragraphs() {
        let out = md("<h1>Title</h1>\n  <p>Some <strong>bold</strong> and <em>soft</em> text.</p><h3>Sub</h3>");
        assert_eq!(out, "# Title\n\nSome **bold** and _soft_ text.\n\n### Sub\n");
    }

    #[test]
    fn test_links_and_images() {
        let out = md(r#"<p><a href="/news/a b">Read more</a> <img src="https://x.com/a.png" alt="A"></p>"#);
        assert_eq!(out, "[Read more](</news/a b>) ![A](https://x.com/a.png)\n");
    }

    #[test]
    fn test_lists() {
        let out = md("<ul><li>One</li><li>Two<ol><li>Inner</li></ol></li></ul>");
        assert_eq!(out, "- One\n- Two\n   1. Inner\n");
    }

    #[test]
    fn test_table_round_trips_through_commonmark() {
        let out = md("<table><tr><th>Metadata</th></tr><tr><td>Title</td><td>A | B</td></tr></table>");
        assert_eq!(out, "| Metadata |  |\n| --- | --- |\n| Title | A \\| B |\n");

        let rendered = to_html(&out);
        assert!(rendered.contains("<th>Metadata</th>"));
        assert!(rendered.contains("<td>A | B</td>"));
    }

    #[test]
    fn test_loose_text_and_markup_chars() {
        let out = md("Loose *text*<div><p>in div</p></div><script>x()</script><hr>");
        assert_eq!(out, "Loose \\*text\\*\n\nin div\n\n---\n");
    }

    #[test]
    fn test_whitespace_only_input() {
        assert_eq!(md("  \n  <div> </div>"), "");
    }
}
