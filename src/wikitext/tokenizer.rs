//! Tokenizer
//!
//!     The composition root of one run. It owns one [AccumulationStack] and one
//!     [SyntaxRestrictionStack], forwards the accumulator interface, and exposes the restriction
//!     stack for direct manipulation by the scanning engine.
//!
//!     A tokenizer processes exactly one input: [Tokenizer::tokenize] consumes it, so nothing
//!     survives across runs. A run is single-threaded and synchronous: the engine calls back into
//!     the tokenizer directly.
//!
//! The Engine Contract
//!
//!     [Tokenizer::tokenize] hands control to a [ScanEngine] for the full input. The engine must
//!     pair every `enter_scope` with a `leave_scope` and every restriction push with a pop. Stack
//!     underflows and engine scan errors end the run immediately. After the engine returns the
//!     tokenizer checks that both stacks are back at their starting depth and hands out the base
//!     chunk, which holds the top-level token sequence.

use crate::wikitext::accumulation::AccumulationStack;
use crate::wikitext::config::TokenizerConfig;
use crate::wikitext::error::{Result, TokenizerError};
use crate::wikitext::restrictions::{Restriction, SyntaxRestrictionStack};
use crate::wikitext::token::{Token, TokenChunk};
use tracing::debug;

/// A grammar-driven scanning engine.
///
/// The engine walks `source` and decides, at each position, what to emit and when to open or
/// close scopes and restrictions. Errors it returns are propagated unchanged by
/// [Tokenizer::tokenize].
pub trait ScanEngine {
    fn scan(&mut self, source: &str, tokenizer: &mut Tokenizer<'_>) -> Result<()>;
}

pub struct Tokenizer<'src> {
    input: &'src str,
    config: TokenizerConfig,
    accum: AccumulationStack,
    /// Public so the engine can manipulate restrictions directly.
    pub flags: SyntaxRestrictionStack,
}

impl<'src> Tokenizer<'src> {
    pub fn new(input: &'src str) -> Self {
        Self::with_config(input, TokenizerConfig::default())
    }

    pub fn with_config(input: &'src str, config: TokenizerConfig) -> Self {
        Self {
            input,
            config,
            accum: AccumulationStack::new(),
            flags: SyntaxRestrictionStack::new(),
        }
    }

    pub fn input(&self) -> &'src str {
        self.input
    }

    pub fn config(&self) -> &TokenizerConfig {
        &self.config
    }

    /// Run `engine` over the whole input and return the base chunk.
    pub fn tokenize<E: ScanEngine + ?Sized>(mut self, engine: &mut E) -> Result<TokenChunk> {
        debug!(bytes = self.input.len(), "tokenize start");
        let input = self.input;
        engine.scan(input, &mut self)?;
        self.check_balanced()?;
        debug!(tokens = self.current().len(), "tokenize done");
        self.into_output()
    }

    // Accumulator interface

    pub fn emit(&mut self, token: Token) {
        self.accum.emit(token)
    }

    pub fn enter_scope(&mut self) -> &mut TokenChunk {
        self.accum.enter_scope()
    }

    pub fn leave_scope(&mut self) -> Result<TokenChunk> {
        self.accum.leave_scope()
    }

    pub fn current(&self) -> &TokenChunk {
        self.accum.current()
    }

    /// Number of open chunks, the base chunk included.
    pub fn depth(&self) -> usize {
        self.accum.depth()
    }

    /// Hand out the base chunk. Fails if nested scopes are still open.
    pub fn into_output(self) -> Result<TokenChunk> {
        self.accum.into_base()
    }

    fn check_balanced(&self) -> Result<()> {
        if self.accum.depth() > 1 {
            return Err(TokenizerError::UnclosedScopes {
                open: self.accum.depth() - 1,
            });
        }
        for kind in Restriction::ALL {
            let depth = self.flags.depth(kind);
            if depth > 0 {
                return Err(TokenizerError::UnbalancedRestriction { kind, depth });
            }
        }
        Ok(())
    }
}
