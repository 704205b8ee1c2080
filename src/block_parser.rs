use rowan::{GreenNode, GreenToken, NodeOrToken};

use crate::parser::inline_elements;
use crate::syntax::{GreenElement, SyntaxKind};

/// Splits a document into blank lines, single-line ATX headings and
/// paragraphs. Everything else about block structure is left alone.
pub struct BlockParser<'a> {
    lines: Vec<&'a str>,
    pos: usize,
    blocks: Vec<GreenElement>,
}

impl<'a> BlockParser<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            lines: input.split_inclusive('\n').collect(),
            pos: 0,
            blocks: Vec::new(),
        }
    }

    fn try_parse_blank_line(&mut self) -> bool {
        let Some(&line) = self.lines.get(self.pos) else {
            return false;
        };
        if !is_blank(line) {
            return false;
        }

        self.blocks.push(node(
            SyntaxKind::BlankLine,
            vec![token(SyntaxKind::BlankLine, line)],
        ));
        self.pos += 1;
        log::debug!("Parsed blank line at line {}", self.pos);
        true
    }

    fn try_parse_atx_heading(&mut self) -> bool {
        let Some(&line) = self.lines.get(self.pos) else {
            return false;
        };

        // Allow up to 3 leading spaces
        let trimmed = strip_leading_spaces(line);
        let indent = &line[..line.len() - trimmed.len()];

        // Must start with 1-6 '#'s followed by a space
        let hashes = trimmed.chars().take_while(|&c| c == '#').count();
        if hashes == 0 || hashes > 6 {
            return false;
        }
        let after_hashes = &trimmed[hashes..];
        if !after_hashes.starts_with(' ') {
            return false;
        }

        let mut children = Vec::new();
        if !indent.is_empty() {
            children.push(token(SyntaxKind::WHITESPACE, indent));
        }
        children.push(token(SyntaxKind::AtxHeadingMarker, &trimmed[..hashes]));

        let (leading, content, trailing, newline) = split_edges(after_hashes);
        children.push(token(SyntaxKind::WHITESPACE, leading));
        children.push(node(SyntaxKind::HeadingContent, inline_elements(content)));
        push_edges(&mut children, trailing, newline);

        self.blocks.push(node(SyntaxKind::Heading, children));
        self.pos += 1;
        log::debug!("Parsed level {hashes} heading at line {}", self.pos);
        true
    }

    fn parse_paragraph(&mut self) {
        let start = self.pos;
        while let Some(&line) = self.lines.get(self.pos) {
            if is_blank(line) {
                break;
            }
            self.pos += 1;
        }
        let text = self.lines[start..self.pos].concat();

        let (leading, content, trailing, newline) = split_edges(&text);
        let mut children = Vec::new();
        if !leading.is_empty() {
            children.push(token(SyntaxKind::WHITESPACE, leading));
        }
        children.extend(inline_elements(content));
        push_edges(&mut children, trailing, newline);

        self.blocks.push(node(SyntaxKind::PARAGRAPH, children));
        log::debug!("Parsed paragraph on lines {}..{}", start + 1, self.pos);
    }

    pub fn parse(mut self) -> GreenNode {
        log::debug!("Starting document parse");

        while self.pos < self.lines.len() {
            if self.try_parse_blank_line() {
                continue;
            }

            if self.try_parse_atx_heading() {
                continue;
            }

            self.parse_paragraph();
        }

        let document = node(SyntaxKind::DOCUMENT, self.blocks);
        GreenNode::new(SyntaxKind::ROOT.into(), vec![document])
    }
}

fn token(kind: SyntaxKind, text: &str) -> GreenElement {
    NodeOrToken::Token(GreenToken::new(kind.into(), text))
}

fn node(kind: SyntaxKind, children: Vec<GreenElement>) -> GreenElement {
    NodeOrToken::Node(GreenNode::new(kind.into(), children))
}

fn is_blank(line: &str) -> bool {
    line.chars().all(|c| matches!(c, ' ' | '\t' | '\r' | '\n'))
}

fn strip_leading_spaces(line: &str) -> &str {
    line.strip_prefix("   ")
        .or_else(|| line.strip_prefix("  "))
        .or_else(|| line.strip_prefix(" "))
        .unwrap_or(line)
}

/// Splits a block's text into leading whitespace, inline content, trailing
/// whitespace and the final line ending.
fn split_edges(text: &str) -> (&str, &str, &str, &str) {
    let (body, newline) = match text.strip_suffix('\n') {
        Some(body) => (body, "\n"),
        None => (text, ""),
    };
    let lead_end = body.len() - body.trim_start_matches([' ', '\t']).len();
    let content_end = body.trim_end_matches([' ', '\t', '\r']).len().max(lead_end);
    (
        &body[..lead_end],
        &body[lead_end..content_end],
        &body[content_end..],
        newline,
    )
}

fn push_edges(children: &mut Vec<GreenElement>, trailing: &str, newline: &str) {
    if !trailing.is_empty() {
        children.push(token(SyntaxKind::WHITESPACE, trailing));
    }
    if !newline.is_empty() {
        children.push(token(SyntaxKind::NEWLINE, newline));
    }
}

#[cfg(test)]
mod tests;
