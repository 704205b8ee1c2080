pub mod ast;
pub mod block_parser;
pub mod builder;
pub mod config;
pub mod delimiter;
pub mod lexer;
pub mod matcher;
pub mod parser;
pub mod renderer;
pub mod syntax;

pub use ast::{Block, Container, Event, Inline};
pub use config::{Config, ConfigBuilder, OutputFormat, SoftBreak};
pub use parser::{parse, parse_inline};
pub use renderer::render_html;

/// Renders a document to HTML.
///
/// Line endings are normalized to `\n` first. Every input is valid: markers
/// that do not pair up are kept as literal text.
///
/// # Examples
///
/// ```rust
/// use emphasize::render;
///
/// assert_eq!(render("foo*bar*baz", None), "<p>foo<strong>bar</strong>baz</p>\n");
/// ```
pub fn render(input: &str, config: Option<Config>) -> String {
    let config = config.unwrap_or_default();
    let tree = parse_document(input);
    let html = render_html(&tree, config.soft_break.unwrap_or_default());
    syntax::release(tree);
    html
}

/// Parses a document into typed blocks.
pub fn document(input: &str) -> Vec<Block> {
    let tree = parse_document(input);
    let blocks = ast::blocks(&tree);
    syntax::release(tree);
    blocks
}

/// Parses a document into a flat stream of content events.
pub fn document_events(input: &str) -> Vec<Event> {
    let tree = parse_document(input);
    let events = ast::events(&tree);
    syntax::release(tree);
    events
}

/// Parses a single run of inline content into typed inlines.
pub fn inlines(input: &str) -> Vec<Inline> {
    let tree = parse_inline(input);
    let inlines = ast::inlines(&tree);
    syntax::release(tree);
    inlines
}

/// Parses a document after normalizing line endings to `\n`.
pub fn parse_document(input: &str) -> syntax::SyntaxNode {
    parse(&input.replace("\r\n", "\n"))
}
