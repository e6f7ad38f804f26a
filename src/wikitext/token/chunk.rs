//! Token chunks
//!
//!     A chunk is the output of one parsing scope. While its scope is open the chunk is owned by
//!     its slot in the accumulation stack and only grows at the end. When the scope closes the
//!     chunk is handed to the caller, usually to be embedded in the parent as a nested token.

use super::core::Token;
use serde::Serialize;
use std::ops::Index;

/// An ordered, append-only sequence of tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TokenChunk {
    tokens: Vec<Token>,
}

impl TokenChunk {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, token: Token) {
        self.tokens.push(token);
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn last(&self) -> Option<&Token> {
        self.tokens.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    pub fn as_slice(&self) -> &[Token] {
        &self.tokens
    }

    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }
}

impl From<Vec<Token>> for TokenChunk {
    fn from(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }
}

impl Index<usize> for TokenChunk {
    type Output = Token;

    fn index(&self, index: usize) -> &Token {
        &self.tokens[index]
    }
}

impl IntoIterator for TokenChunk {
    type Item = Token;
    type IntoIter = std::vec::IntoIter<Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.into_iter()
    }
}

impl<'a> IntoIterator for &'a TokenChunk {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}
