use crate::lexer::tokenize;
use crate::matcher::{Span, SpanKind, resolve};

fn spans(input: &str) -> Vec<(SpanKind, usize, usize)> {
    resolve(&tokenize(input))
        .into_iter()
        .map(|Span { kind, open, close }| (kind, open, close))
        .collect()
}

#[test]
fn star_is_strong_underscore_is_emphasis() {
    assert_eq!(spans("*a*"), vec![(SpanKind::Strong, 0, 2)]);
    assert_eq!(spans("_a_"), vec![(SpanKind::Emphasis, 0, 2)]);
}

#[test]
fn close_is_preferred_over_open() {
    // The middle `*` could open or close; it closes.
    assert_eq!(spans("*a*b*"), vec![(SpanKind::Strong, 0, 2)]);
}

#[test]
fn zero_width_match_is_rejected() {
    assert!(spans("__").is_empty());
    assert!(spans("**").is_empty());
    // The rejected closer opens instead and pairs later.
    assert_eq!(spans("**a*"), vec![(SpanKind::Strong, 1, 3)]);
}

#[test]
fn only_the_nearest_opener_is_considered() {
    // Nearest `_` opener is adjacent; the outer one is not searched for.
    assert!(spans("_a __").is_empty());
}

#[test]
fn enclosed_openers_are_discarded() {
    // tokens: _ foo␠ * bar _ ␠baz *
    assert_eq!(spans("_foo *bar_ baz*"), vec![(SpanKind::Emphasis, 0, 4)]);
}

#[test]
fn discarded_openers_cannot_match_later() {
    // The `*` inside the emphasis is gone once `_` closes around it.
    assert_eq!(spans("_a *b_ c* d*"), vec![(SpanKind::Emphasis, 0, 4)]);
}

#[test]
fn inner_spans_close_first() {
    assert_eq!(
        spans("*a _b_ c*"),
        vec![(SpanKind::Emphasis, 2, 4), (SpanKind::Strong, 0, 6)]
    );
}

#[test]
fn long_runs_match_lifo() {
    let got = spans("***a***");
    assert_eq!(
        got,
        vec![
            (SpanKind::Strong, 2, 4),
            (SpanKind::Strong, 1, 5),
            (SpanKind::Strong, 0, 6),
        ]
    );
}

#[test]
fn explicit_classes_are_segregated() {
    assert!(spans("{_a_").is_empty());
    assert!(spans("_a_}").is_empty());
    assert_eq!(spans("{_a_}"), vec![(SpanKind::Emphasis, 0, 2)]);
    // The default closer skips the explicit opener above it.
    assert_eq!(spans("_a {_b_"), vec![(SpanKind::Emphasis, 0, 4)]);
}

#[test]
fn explicit_markers_nest_inside_default_ones() {
    // tokens: _ ( {_ foo _} ) _
    assert_eq!(
        spans("_({_foo_})_"),
        vec![(SpanKind::Emphasis, 2, 4), (SpanKind::Emphasis, 0, 6)]
    );
}

#[test]
fn opaque_spans_count_as_content() {
    assert_eq!(spans("*`x`*"), vec![(SpanKind::Strong, 0, 2)]);
}

#[test]
fn many_unmatched_markers_terminate() {
    // Every `*` opens and none can close.
    let input = "a *".repeat(50_000);
    assert!(spans(&input).is_empty());

    // Alternating characters keep discarding the other kind's opener.
    assert_eq!(spans(&"*_".repeat(3)).len(), 2);

    let input = format!("{}a{}", "_".repeat(20_000), "_".repeat(20_000));
    assert_eq!(spans(&input).len(), 20_000);
}
