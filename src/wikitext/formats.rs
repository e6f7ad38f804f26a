//! Output formats for token chunks
//!
//! - json: the serde representation of the chunk, pretty printed
//! - treeviz: one line per token, nesting drawn with box connectors
//! - wikitext: the detokenized source

pub mod registry;
pub mod treeviz;

pub use registry::{FormatError, FormatRegistry, Formatter};
pub use treeviz::{to_treeviz_str, TreevizFormatter};

use crate::wikitext::token::{detokenize, TokenChunk};

/// Pretty-printed JSON.
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn name(&self) -> &str {
        "json"
    }

    fn serialize(&self, chunk: &TokenChunk) -> Result<String, FormatError> {
        serde_json::to_string_pretty(chunk)
            .map_err(|err| FormatError::SerializationError(err.to_string()))
    }

    fn description(&self) -> &str {
        "Token tree as JSON"
    }
}

/// Reassembles the source text.
pub struct WikitextFormatter;

impl Formatter for WikitextFormatter {
    fn name(&self) -> &str {
        "wikitext"
    }

    fn serialize(&self, chunk: &TokenChunk) -> Result<String, FormatError> {
        Ok(detokenize(chunk))
    }

    fn description(&self) -> &str {
        "Detokenized source text"
    }
}

/// Serialize `chunk` with one of the built-in formats.
pub fn serialize(chunk: &TokenChunk, format: &str) -> Result<String, FormatError> {
    FormatRegistry::with_defaults().serialize(chunk, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wikitext::token::{MarkerKind, ScopeKind, Token};

    fn sample() -> TokenChunk {
        TokenChunk::from(vec![Token::nested(
            ScopeKind::Link,
            TokenChunk::from(vec![
                Token::marker(MarkerKind::LinkOpen, "[["),
                Token::text("a"),
                Token::marker(MarkerKind::LinkClose, "]]"),
            ]),
        )])
    }

    #[test]
    fn test_json_format() {
        let output = serialize(&sample(), "json").unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value[0]["nested"]["scope"], "link");
        assert_eq!(value[0]["nested"]["chunk"][1]["text"], "a");
    }

    #[test]
    fn test_wikitext_format() {
        assert_eq!(serialize(&sample(), "wikitext").unwrap(), "[[a]]");
    }

    #[test]
    fn test_unknown_format() {
        assert_eq!(
            serialize(&sample(), "yaml"),
            Err(FormatError::FormatNotFound("yaml".to_string()))
        );
    }
}
