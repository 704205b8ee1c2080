use rowan::GreenNode;

use crate::block_parser::BlockParser;
use crate::builder::build;
use crate::lexer::Lexer;
use crate::matcher::resolve;
use crate::syntax::{GreenElement, SyntaxKind, SyntaxNode};

/// Parses a whole document: blocks, then the inline content of each block.
pub fn parse(input: &str) -> SyntaxNode {
    SyntaxNode::new_root(BlockParser::new(input).parse())
}

/// Parses `input` as a single run of inline content under an `INLINE` root.
pub fn parse_inline(input: &str) -> SyntaxNode {
    SyntaxNode::new_root(GreenNode::new(
        SyntaxKind::INLINE.into(),
        inline_elements(input),
    ))
}

/// One complete inline-content parse: scan, match, fold. Each call owns its
/// tokens and delimiter stack, so calls are independent of each other.
pub(crate) fn inline_elements(input: &str) -> Vec<GreenElement> {
    nested_inline_elements(input, 0)
}

/// Parses the text of a link nested `link_depth` links deep.
pub(crate) fn nested_inline_elements(input: &str, link_depth: usize) -> Vec<GreenElement> {
    log::debug!(
        "Parsing inline content of {} bytes at link depth {}",
        input.len(),
        link_depth
    );
    let tokens = Lexer::nested(input, link_depth).tokenize();
    let spans = resolve(&tokens);
    build(tokens, &spans)
}
