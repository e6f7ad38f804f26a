//! Token accumulator stack
//!
//!     Supports the nested accumulation of tokens, which is needed for template arguments, link
//!     descriptions, table cells and other encapsulated bits of content. Each nested construct is
//!     tokenized into its own chunk so the enclosing construct can incorporate it as a single
//!     structured token instead of splicing loose tokens into its own stream.
//!
//!     The stack always holds the base chunk. The top chunk is the only write target.

use crate::wikitext::error::{Result, TokenizerError, Underflow};
use crate::wikitext::token::{Token, TokenChunk};
use tracing::trace;

#[derive(Debug, Clone)]
pub struct AccumulationStack {
    /// Never empty: index 0 is the base chunk.
    chunks: Vec<TokenChunk>,
}

impl AccumulationStack {
    pub fn new() -> Self {
        Self {
            chunks: vec![TokenChunk::new()],
        }
    }

    /// Append `token` to the current top chunk.
    pub fn emit(&mut self, token: Token) {
        self.top_mut().append(token);
    }

    /// Start a new nested chunk and make it the write target.
    pub fn enter_scope(&mut self) -> &mut TokenChunk {
        self.chunks.push(TokenChunk::new());
        trace!(depth = self.chunks.len(), "enter scope");
        self.top_mut()
    }

    /// Close the current chunk and hand it to the caller. The previous chunk becomes the write
    /// target again. The base chunk cannot be left.
    pub fn leave_scope(&mut self) -> Result<TokenChunk> {
        if self.chunks.len() == 1 {
            return Err(Underflow::Scope.into());
        }
        let chunk = std::mem::take(self.top_mut());
        self.chunks.truncate(self.chunks.len() - 1);
        trace!(depth = self.chunks.len(), tokens = chunk.len(), "leave scope");
        Ok(chunk)
    }

    pub fn current(&self) -> &TokenChunk {
        // The base chunk is never popped
        &self.chunks[self.chunks.len() - 1]
    }

    /// Number of open chunks, the base chunk included.
    pub fn depth(&self) -> usize {
        self.chunks.len()
    }

    /// Consume the stack and return the base chunk. Fails if nested scopes are still open.
    pub fn into_base(mut self) -> Result<TokenChunk> {
        if self.chunks.len() > 1 {
            return Err(TokenizerError::UnclosedScopes {
                open: self.chunks.len() - 1,
            });
        }
        self.chunks.pop().ok_or_else(|| Underflow::Scope.into())
    }

    fn top_mut(&mut self) -> &mut TokenChunk {
        let top = self.chunks.len() - 1;
        &mut self.chunks[top]
    }
}

impl Default for AccumulationStack {
    fn default() -> Self {
        Self::new()
    }
}
