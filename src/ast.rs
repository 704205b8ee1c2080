//! An owned, typed view of the syntax tree for consumers that do not want to
//! walk rowan nodes. Literal text is merged, escapes lose their backslash and
//! span markers disappear into the span they delimit.
//!
//! Span nesting has no depth limit, so nothing here recurses over the tree:
//! the tree is flattened into [`Event`]s by a preorder walk and folded back
//! with an explicit stack.

use rowan::{NodeOrToken, WalkEvent};
use serde::Serialize;

use crate::syntax::{SyntaxKind, SyntaxNode};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Inline {
    Text(String),
    Verbatim(String),
    Autolink { url: String, email: bool },
    Link {
        destination: String,
        children: Vec<Inline>,
    },
    Emphasis(Vec<Inline>),
    Strong(Vec<Inline>),
}

impl Inline {
    pub fn text(s: impl Into<String>) -> Self {
        Inline::Text(s.into())
    }

    /// The nested inlines of a span or link.
    pub fn children(&self) -> Option<&[Inline]> {
        match self {
            Inline::Emphasis(children)
            | Inline::Strong(children)
            | Inline::Link { children, .. } => Some(children),
            _ => None,
        }
    }

    fn children_mut(&mut self) -> Option<&mut Vec<Inline>> {
        match self {
            Inline::Emphasis(children)
            | Inline::Strong(children)
            | Inline::Link { children, .. } => Some(children),
            _ => None,
        }
    }
}

impl Drop for Inline {
    fn drop(&mut self) {
        let Some(children) = self.children_mut() else {
            return;
        };
        let mut pending = std::mem::take(children);
        while let Some(mut inline) = pending.pop() {
            if let Some(children) = inline.children_mut() {
                pending.append(children);
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Block {
    Paragraph(Vec<Inline>),
    Heading { level: usize, children: Vec<Inline> },
}

/// A node that wraps other content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Container {
    Paragraph,
    Heading { level: usize },
    Emphasis,
    Strong,
    Link { destination: String },
}

impl Container {
    fn of(node: &SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::PARAGRAPH => Some(Container::Paragraph),
            SyntaxKind::Heading => Some(Container::Heading {
                level: heading_level(node),
            }),
            SyntaxKind::Emphasis => Some(Container::Emphasis),
            SyntaxKind::Strong => Some(Container::Strong),
            SyntaxKind::Link => Some(Container::Link {
                destination: link_destination(node),
            }),
            _ => None,
        }
    }
}

/// One step of a depth-first walk over the content of a tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Event {
    Start(Container),
    End(Container),
    Text(String),
    Verbatim(String),
    Autolink { url: String, email: bool },
}

/// Flattens the content below `root` into events. `root` itself opens no
/// container; blank lines and block edge whitespace produce nothing.
pub fn events(root: &SyntaxNode) -> Vec<Event> {
    let mut out = Vec::new();
    let mut walk = root.preorder_with_tokens();
    while let Some(step) = walk.next() {
        match step {
            WalkEvent::Enter(NodeOrToken::Token(token)) => match token.kind() {
                SyntaxKind::TEXT => out.push(Event::Text(token.text().to_string())),
                SyntaxKind::Escape => out.push(Event::Text(token.text()[1..].to_string())),
                _ => {}
            },
            WalkEvent::Enter(NodeOrToken::Node(node)) => match node.kind() {
                SyntaxKind::Verbatim => {
                    out.push(Event::Verbatim(token_text(&node, SyntaxKind::VerbatimContent)));
                    walk.skip_subtree();
                }
                SyntaxKind::Autolink => {
                    let url = token_text(&node, SyntaxKind::Url);
                    let email = !url.contains(':');
                    out.push(Event::Autolink { url, email });
                    walk.skip_subtree();
                }
                SyntaxKind::LinkDestination | SyntaxKind::BlankLine => walk.skip_subtree(),
                _ if node == *root => {}
                _ => out.extend(Container::of(&node).map(Event::Start)),
            },
            WalkEvent::Leave(NodeOrToken::Node(node)) => {
                if node != *root {
                    out.extend(Container::of(&node).map(Event::End));
                }
            }
            WalkEvent::Leave(NodeOrToken::Token(_)) => {}
        }
    }
    out
}

/// Folds inline events back into nested [`Inline`]s.
#[derive(Debug, Default)]
struct InlineTree {
    current: Vec<Inline>,
    open: Vec<(Container, Vec<Inline>)>,
}

impl InlineTree {
    fn push(&mut self, event: Event) {
        match event {
            Event::Text(text) => push_text(&mut self.current, &text),
            Event::Verbatim(content) => self.current.push(Inline::Verbatim(content)),
            Event::Autolink { url, email } => self.current.push(Inline::Autolink { url, email }),
            Event::Start(Container::Paragraph | Container::Heading { .. })
            | Event::End(Container::Paragraph | Container::Heading { .. }) => {}
            Event::Start(container) => {
                let outer = std::mem::take(&mut self.current);
                self.open.push((container, outer));
            }
            Event::End(_) => {
                let Some((container, outer)) = self.open.pop() else {
                    panic!("Inline container closed with none open");
                };
                let children = std::mem::replace(&mut self.current, outer);
                let inline = match container {
                    Container::Emphasis => Inline::Emphasis(children),
                    Container::Strong => Inline::Strong(children),
                    Container::Link { destination } => Inline::Link {
                        destination,
                        children,
                    },
                    other @ (Container::Paragraph | Container::Heading { .. }) => {
                        panic!("Block container {other:?} opened inside inline content")
                    }
                };
                self.current.push(inline);
            }
        }
    }

    fn finish(&mut self) -> Vec<Inline> {
        assert!(
            self.open.is_empty(),
            "{} inline containers left open",
            self.open.len()
        );
        std::mem::take(&mut self.current)
    }
}

/// Collects the blocks of a document tree, skipping blank lines.
pub fn blocks(root: &SyntaxNode) -> Vec<Block> {
    let mut out = Vec::new();
    let mut tree = InlineTree::default();
    for event in events(root) {
        match event {
            Event::Start(Container::Paragraph | Container::Heading { .. }) => {}
            Event::End(Container::Paragraph) => out.push(Block::Paragraph(tree.finish())),
            Event::End(Container::Heading { level }) => out.push(Block::Heading {
                level,
                children: tree.finish(),
            }),
            event => tree.push(event),
        }
    }
    out
}

/// Converts the inline content below `node` (a paragraph, heading content,
/// span or link text).
pub fn inlines(node: &SyntaxNode) -> Vec<Inline> {
    let mut tree = InlineTree::default();
    for event in events(node) {
        tree.push(event);
    }
    tree.finish()
}

pub(crate) fn heading_level(node: &SyntaxNode) -> usize {
    node.children_with_tokens()
        .find(|e| e.kind() == SyntaxKind::AtxHeadingMarker)
        .and_then(|e| e.into_token())
        .map(|t| t.text().len())
        .unwrap_or(1)
}

pub(crate) fn link_destination(node: &SyntaxNode) -> String {
    node.children()
        .find(|n| n.kind() == SyntaxKind::LinkDestination)
        .map(|n| destination(&token_text(&n, SyntaxKind::Destination)))
        .unwrap_or_default()
}

/// Line breaks inside a destination are dropped.
fn destination(raw: &str) -> String {
    raw.lines().map(str::trim).collect()
}

pub(crate) fn token_text(node: &SyntaxNode, kind: SyntaxKind) -> String {
    node.children_with_tokens()
        .find(|e| e.kind() == kind)
        .and_then(|e| e.into_token())
        .map(|t| t.text().to_string())
        .unwrap_or_default()
}

fn push_text(out: &mut Vec<Inline>, text: &str) {
    if let Some(Inline::Text(last)) = out.last_mut() {
        last.push_str(text);
    } else {
        out.push(Inline::Text(text.to_string()));
    }
}
