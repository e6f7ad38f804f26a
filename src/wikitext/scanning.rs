//! Reference scanning engine
//!
//!     A [ScanEngine](crate::wikitext::ScanEngine) for a practical subset of wikitext. It is not a
//!     complete grammar; it exists so the tokenizer core is driven end to end by something real.
//!
//! Structure
//!
//!     1. Lexing: the logos lexer splits the source into context-free lexemes. See [lexemes].
//!     2. Scanning: a recursive descent over the lexemes decides what each lexeme means in its
//!        context, emits tokens, and opens and closes scopes. See [scanner].
//!
//! Breaks
//!
//!     When a construct meets a lexeme that belongs to an enclosing construct (the `}}` of a
//!     template while inside a link description), it ends without a closing marker and leaves the
//!     lexeme for the enclosing construct. Which enclosing constructs are waiting for what is read
//!     from the restriction stack, never from the call stack.

pub mod lexemes;
pub mod scanner;

pub use lexemes::{lex, Lexeme};
pub use scanner::WikitextScanner;
