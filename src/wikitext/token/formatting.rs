//! Detokenizer for wikitext
//!
//! Converts a token tree back into source text. Because every token keeps the source it was
//! scanned from, this is the exact inverse of the reference scanner. This is useful for:
//!
//! - Round-trip testing (source -> tokens -> source)
//! - Token-level rewrites that must preserve the untouched parts of a page
//! - Debugging the scope structure of a token stream

use super::chunk::TokenChunk;
use super::core::Token;

/// Trait for writing a token back out as wikitext
pub trait ToWikitext {
    fn write_wikitext(&self, out: &mut String);

    fn to_wikitext(&self) -> String {
        let mut out = String::new();
        self.write_wikitext(&mut out);
        out
    }
}

impl ToWikitext for Token {
    fn write_wikitext(&self, out: &mut String) {
        match self {
            Token::Text(text) | Token::Comment(text) => out.push_str(text),
            Token::Newline => out.push('\n'),
            Token::Marker(marker) => out.push_str(&marker.text),
            Token::Nested(nested) => nested.chunk.write_wikitext(out),
        }
    }
}

impl ToWikitext for TokenChunk {
    fn write_wikitext(&self, out: &mut String) {
        for token in self {
            token.write_wikitext(out);
        }
    }
}

/// Detokenize a chunk (usually the base chunk of a run) into a string.
pub fn detokenize(chunk: &TokenChunk) -> String {
    chunk.to_wikitext()
}
