//! # wikitok
//!
//! A tokenizer for wikitext markup.
//!
//! File Layout
//!
//! The crate is split into a grammar-agnostic core and a reference scanning engine that drives it.
//! The core only keeps track of context: where emitted tokens go (the accumulation stack) and which
//! syntactic restrictions are active (the restriction stack). Everything grammar-specific lives in
//! the scanning engine, which is injected into the tokenizer through the
//! [ScanEngine](wikitext::ScanEngine) trait.
//!
//! src/wikitext
//!   ├── token          Token model, chunks and the detokenizer
//!   ├── accumulation   Nested token accumulation
//!   ├── restrictions   Syntax restriction flags
//!   ├── tokenizer      Composition root and the engine contract
//!   ├── scanning       Reference wikitext scanning engine (logos based)
//!   ├── config         Layered configuration
//!   └── formats        Output formats (json, treeviz, wikitext)

pub mod wikitext;
