use rowan::Language;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum SyntaxKind {
    // Tokens
    WHITESPACE = 0,
    NEWLINE,
    TEXT,
    Escape,           // \* \_ \{ ...
    EmphasisMarker,   // _ {_ _}
    StrongMarker,     // * {* *}
    AtxHeadingMarker, // leading ######
    BlankLine,

    // Verbatim
    VerbatimMarker, // ` or ``
    VerbatimContent,

    // Autolinks
    AutolinkMarker, // < or >
    Url,

    // Links
    LinkStart,        // [
    LinkEnd,          // ]
    DestinationStart, // (
    Destination,
    DestinationEnd, // )

    // Composite nodes
    ROOT,
    DOCUMENT,
    INLINE,
    PARAGRAPH,
    Heading,
    HeadingContent,

    // Inline spans
    Emphasis,
    Strong,
    Verbatim,
    Autolink,
    Link,
    LinkText,
    LinkDestination,
}

impl SyntaxKind {
    const LAST: SyntaxKind = SyntaxKind::LinkDestination;

    /// Whether this kind is a resolved emphasis span.
    pub fn is_span(self) -> bool {
        matches!(self, SyntaxKind::Emphasis | SyntaxKind::Strong)
    }

    /// Whether this kind is a marker token that opened or closed a span.
    pub fn is_marker(self) -> bool {
        matches!(self, SyntaxKind::EmphasisMarker | SyntaxKind::StrongMarker)
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum InlineLanguage {}

impl Language for InlineLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        assert!(raw.0 <= SyntaxKind::LAST as u16, "unknown syntax kind {}", raw.0);
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

pub type SyntaxNode = rowan::SyntaxNode<InlineLanguage>;
pub type SyntaxToken = rowan::SyntaxToken<InlineLanguage>;

/// A green element as assembled bottom-up by the tree builder.
pub type GreenElement = rowan::NodeOrToken<rowan::GreenNode, rowan::GreenToken>;

/// Frees a tree one node at a time.
///
/// Dropping a rowan tree the ordinary way takes a stack frame per nesting
/// level, and span nesting is unbounded. Each node is kept alive here until
/// its children have been queued, so freeing it only releases references.
/// `root` should be the last handle to its tree; otherwise this is a plain
/// drop.
pub fn release(root: SyntaxNode) {
    let green = root.green().into_owned();
    drop(root);

    let mut pending = vec![green];
    while let Some(node) = pending.pop() {
        pending.extend(
            node.children()
                .filter_map(|child| child.into_node())
                .map(|child| child.to_owned()),
        );
    }
}
