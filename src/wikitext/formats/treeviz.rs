//! Treeviz formatter for token chunks
//!
//! One line per token, which makes deep nesting quick to scan. Nested chunks are drawn below
//! their scope line with box connectors:
//!
//!     ⧉ 2 tokens
//!     ├─ ⊞ Template
//!     │ ├─ ▸ TemplateOpen {{
//!     │ ├─ ○ TemplateName
//!     │ │ └─ ◦ cite
//!     │ └─ ▸ TemplateClose }}
//!     └─ ↵
//!
//! Icons
//!     Tokens:
//!         Text: ◦
//!         Newline: ↵
//!         Comment: ⌘
//!         Marker: ▸
//!     Scopes:
//!         Template: ⊞
//!         Link, ExternalLink: ⇗
//!         Heading: §
//!         Table: ▦
//!         TableCell: ▢
//!         Preformatted: 𝒱
//!         others: ○

use super::registry::{FormatError, Formatter};
use crate::wikitext::token::{MarkerKind, ScopeKind, Token, TokenChunk};

const LABEL_WIDTH: usize = 30;

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let mut truncated = s.chars().take(max_chars).collect::<String>();
        truncated.push_str("...");
        truncated
    } else {
        s.to_string()
    }
}

fn scope_icon(scope: ScopeKind) -> &'static str {
    match scope {
        ScopeKind::Template => "⊞",
        ScopeKind::Link | ScopeKind::ExternalLink => "⇗",
        ScopeKind::Heading => "§",
        ScopeKind::Table => "▦",
        ScopeKind::TableCell => "▢",
        ScopeKind::Preformatted => "𝒱",
        _ => "○",
    }
}

fn marker_name(kind: &MarkerKind) -> String {
    match kind {
        MarkerKind::HeadingOpen { level } => format!("HeadingOpen({level})"),
        MarkerKind::Tag { closing: true, .. } => "TagClose".to_string(),
        MarkerKind::Tag { closing: false, .. } => "TagOpen".to_string(),
        other => format!("{other:?}"),
    }
}

fn line(token: &Token) -> String {
    let (icon, label) = match token {
        Token::Text(text) => ("◦", truncate(&text.replace('\n', "\\n"), LABEL_WIDTH)),
        Token::Newline => ("↵", String::new()),
        Token::Comment(text) => ("⌘", truncate(&text.replace('\n', "\\n"), LABEL_WIDTH)),
        Token::Marker(marker) => (
            "▸",
            format!(
                "{} {}",
                marker_name(&marker.kind),
                truncate(&marker.text, LABEL_WIDTH)
            ),
        ),
        Token::Nested(nested) => (scope_icon(nested.scope), nested.scope.name().to_string()),
    };
    if label.is_empty() {
        icon.to_string()
    } else {
        format!("{icon} {label}")
    }
}

fn format_chunk(chunk: &TokenChunk, prefix: &str, output: &mut String) {
    let count = chunk.len();
    for (i, token) in chunk.iter().enumerate() {
        let is_last = i == count - 1;
        let connector = if is_last { "└─" } else { "├─" };
        output.push_str(&format!("{}{} {}\n", prefix, connector, line(token)));

        if let Token::Nested(nested) = token {
            let child_prefix = format!("{}{}", prefix, if is_last { "  " } else { "│ " });
            format_chunk(&nested.chunk, &child_prefix, output);
        }
    }
}

/// Render a chunk as a treeviz string.
pub fn to_treeviz_str(chunk: &TokenChunk) -> String {
    let mut output = format!("⧉ {} tokens\n", chunk.len());
    format_chunk(chunk, "", &mut output);
    output
}

pub struct TreevizFormatter;

impl Formatter for TreevizFormatter {
    fn name(&self) -> &str {
        "treeviz"
    }

    fn serialize(&self, chunk: &TokenChunk) -> Result<String, FormatError> {
        Ok(to_treeviz_str(chunk))
    }

    fn description(&self) -> &str {
        "Visual tree, one line per token"
    }
}
