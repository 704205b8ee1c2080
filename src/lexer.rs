use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;
use rowan::{GreenNode, GreenNodeBuilder, GreenToken, NodeOrToken};

use crate::parser::nested_inline_elements;
use crate::syntax::{GreenElement, SyntaxKind};

/// The two emphasis delimiter characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Delim {
    /// `*`, resolves to strong emphasis.
    Star,
    /// `_`, resolves to emphasis.
    Underscore,
}

impl Delim {
    pub fn from_char(ch: char) -> Option<Self> {
        match ch {
            '*' => Some(Delim::Star),
            '_' => Some(Delim::Underscore),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Delim::Star => '*',
            Delim::Underscore => '_',
        }
    }
}

/// A single `*` or `_` with its decorations and flanking, fixed at scan time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marker {
    pub delim: Delim,
    /// Written as `{*` / `{_`.
    pub explicit_open: bool,
    /// Written as `*}` / `_}`.
    pub explicit_close: bool,
    pub can_open: bool,
    pub can_close: bool,
}

impl Marker {
    /// Computes flanking from the characters immediately around the marker
    /// character. A missing neighbour counts as whitespace.
    pub fn classify(
        delim: Delim,
        explicit_open: bool,
        explicit_close: bool,
        prev: Option<char>,
        next: Option<char>,
    ) -> Self {
        let can_open =
            explicit_open || (!explicit_close && next.is_some_and(|c| !is_whitespace(c)));
        let can_close =
            explicit_close || (!explicit_open && prev.is_some_and(|c| !is_whitespace(c)));
        Self {
            delim,
            explicit_open,
            explicit_close,
            can_open,
            can_close,
        }
    }

    /// The marker's source text, decorations included.
    pub fn text(&self) -> String {
        let mut s = String::with_capacity(2);
        if self.explicit_open {
            s.push('{');
        }
        s.push(self.delim.as_char());
        if self.explicit_close {
            s.push('}');
        }
        s
    }
}

/// Only space, tab and line feed count as whitespace for flanking.
pub fn is_whitespace(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\n')
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'s> {
    /// A run of literal text, soft line breaks included.
    Text(&'s str),
    /// A backslash-escaped ASCII punctuation character.
    Escape(char),
    Marker(Marker),
    /// A code span, autolink or link, already built.
    Opaque(GreenNode),
}

impl Token<'_> {
    /// Lowers a token that is not part of a span boundary into a green element.
    pub fn into_literal(self) -> GreenElement {
        match self {
            Token::Text(text) => {
                NodeOrToken::Token(GreenToken::new(SyntaxKind::TEXT.into(), text))
            }
            Token::Escape(ch) => NodeOrToken::Token(GreenToken::new(
                SyntaxKind::Escape.into(),
                &format!("\\{ch}"),
            )),
            Token::Marker(marker) => {
                NodeOrToken::Token(GreenToken::new(SyntaxKind::TEXT.into(), &marker.text()))
            }
            Token::Opaque(node) => NodeOrToken::Node(node),
        }
    }
}

/// How many links may nest inside each other's text. A `[` deeper than this
/// is literal text.
pub const MAX_LINK_DEPTH: usize = 64;

/// Matching positions for every `[`/`]` and `(`/`)` pair in a string.
#[derive(Debug, Default)]
struct BracketPairs {
    square: HashMap<usize, usize>,
    round: HashMap<usize, usize>,
}

impl BracketPairs {
    /// Pairs brackets in one pass. Nested pairs balance and a backslash-escaped
    /// character never pairs.
    fn scan(input: &str) -> Self {
        let mut pairs = Self::default();
        let mut open_square = Vec::new();
        let mut open_round = Vec::new();

        let mut chars = input.char_indices();
        while let Some((i, ch)) = chars.next() {
            match ch {
                '\\' => {
                    chars.next();
                }
                '[' => open_square.push(i),
                '(' => open_round.push(i),
                ']' => {
                    if let Some(open) = open_square.pop() {
                        pairs.square.insert(open, i);
                    }
                }
                ')' => {
                    if let Some(open) = open_round.pop() {
                        pairs.round.insert(open, i);
                    }
                }
                _ => {}
            }
        }
        pairs
    }
}

pub struct Lexer<'s> {
    input: &'s str,
    pos: usize,
    text_start: usize,
    tokens: Vec<Token<'s>>,
    brackets: BracketPairs,
    link_depth: usize,
}

impl<'s> Lexer<'s> {
    pub fn new(input: &'s str) -> Self {
        Self::nested(input, 0)
    }

    /// A lexer for content that sits inside `link_depth` enclosing link texts.
    pub fn nested(input: &'s str, link_depth: usize) -> Self {
        let brackets = if link_depth < MAX_LINK_DEPTH && input.contains('[') {
            BracketPairs::scan(input)
        } else {
            BracketPairs::default()
        };
        Self {
            input,
            pos: 0,
            text_start: 0,
            tokens: Vec::new(),
            brackets,
            link_depth,
        }
    }

    pub fn current_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    pub fn peek_char(&self, offset: usize) -> Option<char> {
        self.input[self.pos..].chars().nth(offset)
    }

    fn prev_char(&self) -> Option<char> {
        self.input[..self.pos].chars().next_back()
    }

    pub fn advance(&mut self) -> Option<char> {
        if let Some(ch) = self.current_char() {
            self.pos += ch.len_utf8();
            Some(ch)
        } else {
            None
        }
    }

    fn rest(&self) -> &'s str {
        &self.input[self.pos..]
    }

    fn flush_text(&mut self) {
        if self.text_start < self.pos {
            self.tokens
                .push(Token::Text(&self.input[self.text_start..self.pos]));
        }
    }

    /// Pushes `token` as covering the next `len` bytes of input.
    fn emit(&mut self, token: Token<'s>, len: usize) {
        self.flush_text();
        log::trace!("Token {}: {:?} at {}", self.tokens.len(), token, self.pos);
        self.tokens.push(token);
        self.pos += len;
        self.text_start = self.pos;
    }

    pub fn tokenize(mut self) -> Vec<Token<'s>> {
        while let Some(ch) = self.current_char() {
            let old_pos = self.pos;
            match ch {
                '\\' => self.lex_escape(),
                '`' => self.lex_verbatim(),
                '<' => self.lex_autolink(),
                '[' => self.lex_link(),
                '{' => self.lex_explicit_open(),
                '*' | '_' => self.lex_marker(),
                _ => {
                    self.advance();
                }
            }

            if self.pos == old_pos {
                panic!(
                    "Lexer stuck! Not advancing from pos {} with char {:?}",
                    self.pos, ch
                );
            }
        }
        self.flush_text();

        log::debug!(
            "Tokenization complete. {} tokens generated.",
            self.tokens.len()
        );
        self.tokens
    }

    fn lex_escape(&mut self) {
        match self.peek_char(1) {
            Some(next) if next.is_ascii_punctuation() => self.emit(Token::Escape(next), 2),
            _ => {
                self.advance();
            }
        }
    }

    fn lex_explicit_open(&mut self) {
        let Some(delim) = self.peek_char(1).and_then(Delim::from_char) else {
            self.advance();
            return;
        };
        let next = self.peek_char(2);
        // A trailing `}` is not consumed: the opening decoration wins.
        let marker = Marker::classify(delim, true, false, Some('{'), next);
        self.emit(Token::Marker(marker), 2);
    }

    fn lex_marker(&mut self) {
        let Some(delim) = self.current_char().and_then(Delim::from_char) else {
            self.advance();
            return;
        };
        let next = self.peek_char(1);
        let explicit_close = next == Some('}');
        let marker = Marker::classify(delim, false, explicit_close, self.prev_char(), next);
        let len = if explicit_close { 2 } else { 1 };
        self.emit(Token::Marker(marker), len);
    }

    fn lex_verbatim(&mut self) {
        let rest = self.rest();
        let fence_len = rest.bytes().take_while(|&b| b == b'`').count();
        let fence = &rest[..fence_len];
        let after = &rest[fence_len..];

        let mut builder = GreenNodeBuilder::new();
        builder.start_node(SyntaxKind::Verbatim.into());
        builder.token(SyntaxKind::VerbatimMarker.into(), fence);
        let len = match find_closing_fence(after, fence_len) {
            Some(close) => {
                if close > 0 {
                    builder.token(SyntaxKind::VerbatimContent.into(), &after[..close]);
                }
                builder.token(SyntaxKind::VerbatimMarker.into(), fence);
                fence_len * 2 + close
            }
            None => {
                // Unclosed verbatim runs to the end of the inline content.
                if !after.is_empty() {
                    builder.token(SyntaxKind::VerbatimContent.into(), after);
                }
                rest.len()
            }
        };
        builder.finish_node();

        self.emit(Token::Opaque(builder.finish()), len);
    }

    fn lex_autolink(&mut self) {
        let Some(caps) = autolink_regex().captures(self.rest()) else {
            self.advance();
            return;
        };
        let Some(url) = caps.get(1) else {
            self.advance();
            return;
        };

        let mut builder = GreenNodeBuilder::new();
        builder.start_node(SyntaxKind::Autolink.into());
        builder.token(SyntaxKind::AutolinkMarker.into(), "<");
        builder.token(SyntaxKind::Url.into(), url.as_str());
        builder.token(SyntaxKind::AutolinkMarker.into(), ">");
        builder.finish_node();

        self.emit(Token::Opaque(builder.finish()), url.as_str().len() + 2);
    }

    fn lex_link(&mut self) {
        if self.link_depth >= MAX_LINK_DEPTH {
            log::trace!("Link nesting too deep at {}", self.pos);
            self.advance();
            return;
        }
        let Some(&close) = self.brackets.square.get(&self.pos) else {
            self.advance();
            return;
        };
        let Some(&dest_close) = self.brackets.round.get(&(close + 1)) else {
            self.advance();
            return;
        };

        let rest = self.rest();
        let text_end = close - self.pos;
        let dest_end = dest_close - close - 1;
        let after_text = &rest[text_end + 1..];
        let text = &rest[1..text_end];
        let destination = &after_text[1..dest_end];
        log::trace!("Link text {:?} -> {:?}", text, destination);

        let mut dest_children: Vec<GreenElement> = vec![NodeOrToken::Token(GreenToken::new(
            SyntaxKind::DestinationStart.into(),
            "(",
        ))];
        if !destination.is_empty() {
            dest_children.push(NodeOrToken::Token(GreenToken::new(
                SyntaxKind::Destination.into(),
                destination,
            )));
        }
        dest_children.push(NodeOrToken::Token(GreenToken::new(
            SyntaxKind::DestinationEnd.into(),
            ")",
        )));

        let link = GreenNode::new(
            SyntaxKind::Link.into(),
            vec![
                NodeOrToken::Token(GreenToken::new(SyntaxKind::LinkStart.into(), "[")),
                NodeOrToken::Node(GreenNode::new(
                    SyntaxKind::LinkText.into(),
                    nested_inline_elements(text, self.link_depth + 1),
                )),
                NodeOrToken::Token(GreenToken::new(SyntaxKind::LinkEnd.into(), "]")),
                NodeOrToken::Node(GreenNode::new(
                    SyntaxKind::LinkDestination.into(),
                    dest_children,
                )),
            ],
        );

        self.emit(Token::Opaque(link), text_end + 1 + dest_end + 1);
    }
}

fn autolink_regex() -> &'static Regex {
    static AUTOLINK_REGEX: OnceLock<Regex> = OnceLock::new();
    AUTOLINK_REGEX.get_or_init(|| {
        Regex::new(r"^<([A-Za-z][A-Za-z0-9+.\-]*:[^<>\s]*|[^<>\s@]+@[^<>\s@]+)>")
            .expect("Invalid autolink regex")
    })
}

/// Byte offset in `s` of the first backtick run exactly `len` long.
fn find_closing_fence(s: &str, len: usize) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'`' {
            let start = i;
            while i < bytes.len() && bytes[i] == b'`' {
                i += 1;
            }
            if i - start == len {
                return Some(start);
            }
        } else {
            i += 1;
        }
    }
    None
}

pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    Lexer::new(input).tokenize()
}
