//! Core token definitions
//!
//!     Tokens are immutable once emitted and have no identity beyond their position in a chunk.
//!     Downstream tree construction can match exhaustively on [Token], [MarkerKind] and
//!     [ScopeKind].

use super::chunk::TokenChunk;
use serde::Serialize;

/// A single lexical unit emitted by a scanning engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Token {
    /// A run of plain text.
    Text(String),
    /// A line break.
    Newline,
    /// An HTML comment, including its delimiters.
    Comment(String),
    /// A markup boundary (`{{`, `|`, `==`, ...).
    Marker(Marker),
    /// A closed scope, embedded as one structured token.
    Nested(Nested),
}

impl Token {
    pub fn text(text: impl Into<String>) -> Self {
        Token::Text(text.into())
    }

    pub fn marker(kind: MarkerKind, text: impl Into<String>) -> Self {
        Token::Marker(Marker::new(kind, text))
    }

    pub fn nested(scope: ScopeKind, chunk: TokenChunk) -> Self {
        Token::Nested(Nested { scope, chunk })
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Token::Text(_))
    }

    pub fn is_marker(&self, kind: &MarkerKind) -> bool {
        matches!(self, Token::Marker(marker) if &marker.kind == kind)
    }

    /// The embedded chunk, if this token is a nested scope of the given kind.
    pub fn as_nested(&self, scope: ScopeKind) -> Option<&TokenChunk> {
        match self {
            Token::Nested(nested) if nested.scope == scope => Some(&nested.chunk),
            _ => None,
        }
    }
}

/// A markup boundary and the exact source text it was scanned from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Marker {
    pub kind: MarkerKind,
    pub text: String,
}

impl Marker {
    pub fn new(kind: MarkerKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerKind {
    LinkOpen,
    LinkClose,
    ExternalLinkOpen,
    ExternalLinkClose,
    TemplateOpen,
    TemplateClose,
    /// Separator between template name and arguments, or between link target and description.
    Pipe,
    /// The `=` splitting a named template argument.
    ArgumentEquals,
    HeadingOpen {
        level: u8,
    },
    HeadingClose,
    TableOpen,
    TableClose,
    TableRow,
    TableCaption,
    TableCell,
    TableHeading,
    /// The `|` splitting cell attributes from cell content.
    CellAttributeSeparator,
    ListBullet,
    /// The `:` splitting a definition term from its definition.
    DefinitionSeparator,
    Bold,
    Italic,
    BoldItalic,
    Tag {
        name: String,
        closing: bool,
    },
}

/// A chunk produced by a closed scope, tagged with the construct that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Nested {
    pub scope: ScopeKind,
    pub chunk: TokenChunk,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeKind {
    Template,
    TemplateName,
    TemplateArgument,
    Link,
    LinkTarget,
    LinkDescription,
    ExternalLink,
    ExternalLinkDescription,
    Heading,
    HeadingContent,
    Table,
    TableAttributes,
    TableCell,
    CellAttributes,
    Preformatted,
}

impl ScopeKind {
    pub fn name(self) -> &'static str {
        match self {
            ScopeKind::Template => "Template",
            ScopeKind::TemplateName => "TemplateName",
            ScopeKind::TemplateArgument => "TemplateArgument",
            ScopeKind::Link => "Link",
            ScopeKind::LinkTarget => "LinkTarget",
            ScopeKind::LinkDescription => "LinkDescription",
            ScopeKind::ExternalLink => "ExternalLink",
            ScopeKind::ExternalLinkDescription => "ExternalLinkDescription",
            ScopeKind::Heading => "Heading",
            ScopeKind::HeadingContent => "HeadingContent",
            ScopeKind::Table => "Table",
            ScopeKind::TableAttributes => "TableAttributes",
            ScopeKind::TableCell => "TableCell",
            ScopeKind::CellAttributes => "CellAttributes",
            ScopeKind::Preformatted => "Preformatted",
        }
    }
}
