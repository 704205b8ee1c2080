use rowan::{NodeOrToken, WalkEvent};

use crate::ast::{heading_level, link_destination, token_text};
use crate::config::SoftBreak;
use crate::syntax::{SyntaxKind, SyntaxNode, SyntaxToken};

/// Renders a syntax tree to HTML in a single preorder walk, so span nesting
/// depth costs no stack.
pub struct HtmlRenderer {
    output: String,
    soft_break: SoftBreak,
}

impl HtmlRenderer {
    pub fn new(soft_break: SoftBreak) -> Self {
        Self {
            output: String::new(),
            soft_break,
        }
    }

    pub fn render(mut self, node: &SyntaxNode) -> String {
        let mut walk = node.preorder_with_tokens();
        while let Some(step) = walk.next() {
            match step {
                WalkEvent::Enter(NodeOrToken::Node(node)) => {
                    if !self.enter_node(&node) {
                        walk.skip_subtree();
                    }
                }
                WalkEvent::Leave(NodeOrToken::Node(node)) => self.leave_node(&node),
                WalkEvent::Enter(NodeOrToken::Token(token)) => self.render_token(&token),
                WalkEvent::Leave(NodeOrToken::Token(_)) => {}
            }
        }
        self.output
    }

    /// Writes the opening of `node`. Returns `false` when the node is already
    /// fully written or renders nothing, so its children must be skipped.
    fn enter_node(&mut self, node: &SyntaxNode) -> bool {
        match node.kind() {
            SyntaxKind::PARAGRAPH => self.output.push_str("<p>"),
            SyntaxKind::Heading => {
                let level = heading_level(node);
                self.output.push_str(&format!("<h{level}>"));
            }
            SyntaxKind::Emphasis => self.output.push_str("<em>"),
            SyntaxKind::Strong => self.output.push_str("<strong>"),
            SyntaxKind::Link => self.open_anchor(&link_destination(node)),

            SyntaxKind::Verbatim => {
                self.output.push_str("<code>");
                self.push_text(&token_text(node, SyntaxKind::VerbatimContent));
                self.output.push_str("</code>");
                return false;
            }

            SyntaxKind::Autolink => {
                let url = token_text(node, SyntaxKind::Url);
                let href = if url.contains(':') {
                    url.clone()
                } else {
                    format!("mailto:{url}")
                };
                self.open_anchor(&href);
                self.push_text(&url);
                self.output.push_str("</a>");
                return false;
            }

            SyntaxKind::LinkDestination | SyntaxKind::BlankLine => return false,

            _ => {}
        }
        true
    }

    fn leave_node(&mut self, node: &SyntaxNode) {
        match node.kind() {
            SyntaxKind::PARAGRAPH => self.output.push_str("</p>\n"),
            SyntaxKind::Heading => {
                let level = heading_level(node);
                self.output.push_str(&format!("</h{level}>\n"));
            }
            SyntaxKind::Emphasis => self.output.push_str("</em>"),
            SyntaxKind::Strong => self.output.push_str("</strong>"),
            SyntaxKind::Link => self.output.push_str("</a>"),
            _ => {}
        }
    }

    fn render_token(&mut self, token: &SyntaxToken) {
        match token.kind() {
            SyntaxKind::TEXT => self.push_inline_text(token.text()),
            SyntaxKind::Escape => self.push_text(&token.text()[1..]),
            // Markers, link brackets and block edges are structure, not content.
            _ => {}
        }
    }

    fn open_anchor(&mut self, href: &str) {
        self.output.push_str("<a href=\"");
        self.output
            .push_str(&html_escape::encode_double_quoted_attribute(href));
        self.output.push_str("\">");
    }

    fn push_text(&mut self, text: &str) {
        self.output.push_str(&html_escape::encode_text(text));
    }

    /// Like `push_text`, but line endings are soft breaks.
    fn push_inline_text(&mut self, text: &str) {
        let escaped = html_escape::encode_text(text);
        match self.soft_break {
            SoftBreak::Newline => self.output.push_str(&escaped),
            SoftBreak::Space => self.output.push_str(&escaped.replace('\n', " ")),
        }
    }
}

/// Renders a document or inline tree to HTML.
pub fn render_html(node: &SyntaxNode, soft_break: SoftBreak) -> String {
    HtmlRenderer::new(soft_break).render(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse, parse_inline};

    fn inline_html(input: &str) -> String {
        render_html(&parse_inline(input), SoftBreak::Newline)
    }

    #[test]
    fn renders_nested_spans() {
        similar_asserts::assert_eq!(
            inline_html("_({_foo_})_"),
            "<em>(<em>foo</em>)</em>"
        );
    }

    #[test]
    fn escapes_html_in_text_and_verbatim() {
        similar_asserts::assert_eq!(
            inline_html("a < b `<i>` & \\<"),
            "a &lt; b <code>&lt;i&gt;</code> &amp; &lt;"
        );
    }

    #[test]
    fn renders_links_and_autolinks() {
        similar_asserts::assert_eq!(
            inline_html("[*hi*](/a?b=\"c\") <x@y.z>"),
            "<a href=\"/a?b=&quot;c&quot;\"><strong>hi</strong></a> <a href=\"mailto:x@y.z\">x@y.z</a>"
        );
    }

    #[test]
    fn soft_break_as_space() {
        let tree = parse("_one\ntwo_\n");
        similar_asserts::assert_eq!(
            render_html(&tree, SoftBreak::Space),
            "<p><em>one two</em></p>\n"
        );
        similar_asserts::assert_eq!(
            render_html(&tree, SoftBreak::Newline),
            "<p><em>one\ntwo</em></p>\n"
        );
    }

    #[test]
    fn soft_break_mode_leaves_verbatim_alone() {
        let tree = parse("`a\nb` c\nd\n");
        similar_asserts::assert_eq!(
            render_html(&tree, SoftBreak::Space),
            "<p><code>a\nb</code> c d</p>\n"
        );
    }

    #[test]
    fn renders_deep_nesting() {
        let depth = 100_000;
        let input = format!("{}a{}", "_".repeat(depth), "_".repeat(depth));
        let tree = parse_inline(&input);
        let html = render_html(&tree, SoftBreak::Newline);
        crate::syntax::release(tree);

        let expected = format!("{}a{}", "<em>".repeat(depth), "</em>".repeat(depth));
        assert!(html == expected, "deeply nested spans rendered incorrectly");
    }

    #[test]
    fn link_text_is_rendered_once() {
        similar_asserts::assert_eq!(
            inline_html("[a [b](c) d](e)"),
            "<a href=\"e\">a <a href=\"c\">b</a> d</a>"
        );
    }

    #[test]
    fn headings_and_blank_lines() {
        let tree = parse("## *Big* news\n\n\ntext\n");
        similar_asserts::assert_eq!(
            render_html(&tree, SoftBreak::Newline),
            "<h2><strong>Big</strong> news</h2>\n<p>text</p>\n"
        );
    }
}
