//! Wikitext tokenization
//!
//!     Wikitext is context-sensitive at the character level: a `|` separates template arguments,
//!     but it is plain text inside a link description and a cell separator inside a table. The
//!     tokenizer therefore keeps two pieces of state while a scanning engine walks the input.
//!
//! Accumulation Stack
//!
//!     Tokens are written to the top chunk of a stack of chunks. Nested constructs (a template
//!     argument, a link description) open a new chunk, and when the construct closes its chunk is
//!     popped and embedded into the parent as a single [Nested](token::Nested) token. The base
//!     chunk is never popped and holds the final result. See [accumulation].
//!
//! Restriction Stack
//!
//!     One independent stack of integers per [Restriction]. Constructs either count nesting on
//!     the top value (increment/decrement) or shadow the enclosing value with a push/pop pair.
//!     See [restrictions].
//!
//! The Scanning Engine
//!
//!     The [Tokenizer] makes no grammar decisions. A [ScanEngine] decides what to emit and when to
//!     open or close scopes. The crate ships [WikitextScanner](scanning::WikitextScanner), a
//!     reference engine covering templates, links, headings, tables, lists, apostrophe
//!     formatting, comments and the inclusion-control tags.

pub mod accumulation;
pub mod config;
pub mod error;
pub mod formats;
pub mod restrictions;
pub mod scanning;
pub mod token;
pub mod tokenizer;

pub use accumulation::AccumulationStack;
pub use config::TokenizerConfig;
pub use error::{Result, ScanError, TokenizerError, Underflow};
pub use restrictions::{Restriction, SyntaxRestrictionStack};
pub use scanning::WikitextScanner;
pub use token::{detokenize, Marker, MarkerKind, Nested, ScopeKind, Token, TokenChunk};
pub use tokenizer::{ScanEngine, Tokenizer};

/// Tokenize wikitext with the reference scanner and the default configuration.
///
/// Returns the base chunk: the complete top-level token sequence, with nested constructs
/// already embedded as [Token::Nested].
pub fn tokenize(source: &str) -> Result<TokenChunk> {
    tokenize_with_config(source, TokenizerConfig::default())
}

/// Tokenize wikitext with the reference scanner and an explicit configuration.
pub fn tokenize_with_config(source: &str, config: TokenizerConfig) -> Result<TokenChunk> {
    Tokenizer::with_config(source, config).tokenize(&mut WikitextScanner::new())
}
