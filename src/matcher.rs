use crate::delimiter::{Class, Delimiter, DelimiterStack};
use crate::lexer::{Delim, Marker, Token};
use crate::syntax::SyntaxKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpanKind {
    Emphasis,
    Strong,
}

impl SpanKind {
    pub fn for_delim(delim: Delim) -> Self {
        match delim {
            Delim::Star => SpanKind::Strong,
            Delim::Underscore => SpanKind::Emphasis,
        }
    }

    pub fn node_kind(self) -> SyntaxKind {
        match self {
            SpanKind::Emphasis => SyntaxKind::Emphasis,
            SpanKind::Strong => SyntaxKind::Strong,
        }
    }

    pub fn marker_kind(self) -> SyntaxKind {
        match self {
            SpanKind::Emphasis => SyntaxKind::EmphasisMarker,
            SpanKind::Strong => SyntaxKind::StrongMarker,
        }
    }
}

/// A resolved span: the opener and closer token indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub kind: SpanKind,
    pub open: usize,
    pub close: usize,
}

/// Resolves which markers pair up. Owns its stack for exactly one inline
/// content parse.
pub struct Matcher {
    stack: DelimiterStack,
    spans: Vec<Span>,
}

impl Default for Matcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Matcher {
    pub fn new() -> Self {
        Self {
            stack: DelimiterStack::new(),
            spans: Vec::new(),
        }
    }

    /// Runs the single left-to-right pass. Spans come back in the order their
    /// closers were seen, so inner spans precede the spans enclosing them.
    pub fn resolve(mut self, tokens: &[Token<'_>]) -> Vec<Span> {
        for (pos, token) in tokens.iter().enumerate() {
            if let Token::Marker(marker) = token {
                self.marker(pos, *marker);
            }
        }

        let unmatched = self.stack.drain();
        log::debug!(
            "Matching complete. {} spans, {} unmatched openers.",
            self.spans.len(),
            unmatched.len()
        );
        self.spans
    }

    fn marker(&mut self, pos: usize, marker: Marker) {
        if marker.can_close && self.try_close(pos, marker) {
            return;
        }
        if marker.can_open {
            log::trace!("Opening {:?} at {}", marker.delim, pos);
            self.stack.push(Delimiter::new(pos, marker));
            return;
        }
        log::trace!("Literal {:?} at {}", marker.delim, pos);
    }

    fn try_close(&mut self, pos: usize, marker: Marker) -> bool {
        let class = Class::new(marker.delim, marker.explicit_close);
        let Some(depth) = self.stack.nearest(class) else {
            return false;
        };
        let Some(opener) = self.stack.get(depth).map(|d| d.position) else {
            panic!("Delimiter index {depth} points past the stack");
        };
        // Nothing between opener and closer: no empty spans.
        if pos - opener < 2 {
            return false;
        }

        let removed = self.stack.truncate(depth);
        if removed.len() > 1 {
            log::trace!(
                "Discarding {} openers enclosed by {}..{}",
                removed.len() - 1,
                opener,
                pos
            );
        }
        let kind = SpanKind::for_delim(marker.delim);
        log::trace!("Closing {:?} {}..{}", kind, opener, pos);
        self.spans.push(Span {
            kind,
            open: opener,
            close: pos,
        });
        true
    }
}

pub fn resolve(tokens: &[Token<'_>]) -> Vec<Span> {
    Matcher::new().resolve(tokens)
}

#[cfg(test)]
mod tests;
