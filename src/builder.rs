use rowan::{GreenNode, GreenToken, NodeOrToken};

use crate::lexer::Token;
use crate::matcher::{Span, SpanKind};
use crate::syntax::GreenElement;

#[derive(Debug, Clone, Copy)]
enum Boundary {
    Open(SpanKind),
    Close,
}

struct Frame {
    kind: Option<SpanKind>,
    children: Vec<GreenElement>,
}

impl Frame {
    fn new(kind: Option<SpanKind>) -> Self {
        Self {
            kind,
            children: Vec::new(),
        }
    }
}

/// Folds resolved spans around the tokens they enclose. Spans from the
/// matcher never partially overlap, so a stack of open frames is enough.
pub fn build(tokens: Vec<Token<'_>>, spans: &[Span]) -> Vec<GreenElement> {
    let mut boundaries: Vec<Option<Boundary>> = vec![None; tokens.len()];
    for span in spans {
        boundaries[span.open] = Some(Boundary::Open(span.kind));
        boundaries[span.close] = Some(Boundary::Close);
    }

    let mut frames = vec![Frame::new(None)];
    for (token, boundary) in tokens.into_iter().zip(boundaries) {
        match (token, boundary) {
            (Token::Marker(marker), Some(Boundary::Open(kind))) => {
                let mut frame = Frame::new(Some(kind));
                frame.children.push(NodeOrToken::Token(GreenToken::new(
                    kind.marker_kind().into(),
                    &marker.text(),
                )));
                frames.push(frame);
            }
            (Token::Marker(marker), Some(Boundary::Close)) => {
                let Some(Frame {
                    kind: Some(kind),
                    mut children,
                }) = frames.pop()
                else {
                    panic!("Span closed at marker {marker:?} with no open span");
                };
                children.push(NodeOrToken::Token(GreenToken::new(
                    kind.marker_kind().into(),
                    &marker.text(),
                )));
                let node = GreenNode::new(kind.node_kind().into(), children);
                push(&mut frames, NodeOrToken::Node(node));
            }
            (token, _) => push(&mut frames, token.into_literal()),
        }
    }

    if frames.len() != 1 {
        panic!("{} spans left open after building", frames.len() - 1);
    }
    frames.pop().map(|f| f.children).unwrap_or_default()
}

fn push(frames: &mut [Frame], element: GreenElement) {
    if let Some(frame) = frames.last_mut() {
        frame.children.push(element);
    }
}
