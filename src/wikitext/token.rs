//! Token types shared by the tokenizer core, the scanning engine and the output formats.
//!
//! Token Layers
//!
//!     Lexemes:
//!         Character level units produced by the logos lexer inside the reference scanner. See
//!         [lexemes](crate::wikitext::scanning::lexemes). They never leave the scanner.
//!
//!     Tokens:
//!         What the scanner emits into the accumulation stack. A closed set: plain text, line
//!         breaks, comments, markup boundary markers and nested chunks. See [core].
//!
//!     Chunks:
//!         Ordered token sequences, one per parsing scope. When a scope closes its chunk is embedded
//!         into the parent as a [Token::Nested]. See [chunk].
//!
//! Source Fidelity
//!
//!     Every token carries the exact source text it came from (marker text, text runs, comment
//!     bodies), so a token tree can always be turned back into its source. See [formatting].

pub mod chunk;
pub mod core;
pub mod formatting;

pub use self::core::{Marker, MarkerKind, Nested, ScopeKind, Token};
pub use chunk::TokenChunk;
pub use formatting::{detokenize, ToWikitext};
