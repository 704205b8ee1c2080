use crate::block_parser::BlockParser;
use crate::syntax::{SyntaxKind, SyntaxNode};

fn parse_blocks(input: &str) -> SyntaxNode {
    SyntaxNode::new_root(BlockParser::new(input).parse())
}

fn find_first(node: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxNode> {
    node.descendants().find(|n| n.kind() == kind)
}

fn get_heading_content(node: &SyntaxNode) -> Option<String> {
    find_first(node, SyntaxKind::HeadingContent).map(|n| n.text().to_string())
}

fn get_blocks(node: &SyntaxNode) -> Vec<SyntaxNode> {
    let document = node
        .children()
        .find(|n| n.kind() == SyntaxKind::DOCUMENT)
        .unwrap();
    let blocks: Vec<SyntaxNode> = document.children().collect();
    blocks
}

fn assert_block_kinds(input: &str, expected: &[SyntaxKind]) {
    let node = parse_blocks(input);
    let blocks = get_blocks(&node);
    let actual: Vec<_> = blocks.iter().map(|n| n.kind()).collect();
    assert_eq!(
        actual, expected,
        "Block kinds did not match for input:\n{}",
        input
    );
}

#[test]
fn parses_simple_atx_heading() {
    let node = parse_blocks("# Heading\n");
    let content = get_heading_content(&node).unwrap();
    assert_eq!(content, "Heading");
}

#[test]
fn empty_atx_heading() {
    let node = parse_blocks("# \n");
    let content = get_heading_content(&node).unwrap();
    assert_eq!(content, "");
}

#[test]
fn parses_atx_heading_with_leading_spaces() {
    let node = parse_blocks("  # Leading spaces\n");
    let content = get_heading_content(&node).unwrap();
    assert_eq!(content, "Leading spaces");
}

#[test]
fn trailing_hashes_are_content() {
    let node = parse_blocks("### Foo Bar ###\n");
    let content = get_heading_content(&node).unwrap();
    assert_eq!(content, "Foo Bar ###");
}

#[test]
fn does_not_parse_with_four_leading_spaces() {
    let node = parse_blocks("    # Not a heading\n");
    assert!(find_first(&node, SyntaxKind::Heading).is_none());
}

#[test]
fn hashes_need_a_space() {
    assert_block_kinds("#hashtag\n", &[SyntaxKind::PARAGRAPH]);
    assert_block_kinds("####### seven\n", &[SyntaxKind::PARAGRAPH]);
}

#[test]
fn heading_line_inside_paragraph_is_text() {
    let node = parse_blocks("text\n# Heading\n");
    assert!(find_first(&node, SyntaxKind::Heading).is_none());
    assert_block_kinds("text\n# Heading\n", &[SyntaxKind::PARAGRAPH]);
}

#[test]
fn heading_ends_at_its_line() {
    assert_block_kinds(
        "# Title\nbody\n",
        &[SyntaxKind::Heading, SyntaxKind::PARAGRAPH],
    );
}

#[test]
fn parses_multiple_headings() {
    let node = parse_blocks("# First\n\n## Second\n");
    let mut headings = node
        .descendants()
        .filter(|n| n.kind() == SyntaxKind::HeadingContent);
    assert_eq!(headings.next().unwrap().text(), "First");
    assert_eq!(headings.next().unwrap().text(), "Second");
}

#[test]
fn blankline_between_paragraphs() {
    assert_block_kinds(
        "Paragraph 1\n\nParagraph 2\n",
        &[
            SyntaxKind::PARAGRAPH,
            SyntaxKind::BlankLine,
            SyntaxKind::PARAGRAPH,
        ],
    );
}

#[test]
fn whitespace_only_lines_are_blank() {
    assert_block_kinds(
        "a\n  \t\nb",
        &[
            SyntaxKind::PARAGRAPH,
            SyntaxKind::BlankLine,
            SyntaxKind::PARAGRAPH,
        ],
    );
}

#[test]
fn no_break_space_line_is_not_blank() {
    assert_block_kinds("a\n\u{a0}\nb\n", &[SyntaxKind::PARAGRAPH]);
}

#[test]
fn multi_line_paragraph_is_one_block() {
    let node = parse_blocks("one\ntwo\nthree\n");
    let blocks = get_blocks(&node);
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].text(), "one\ntwo\nthree\n");
}
