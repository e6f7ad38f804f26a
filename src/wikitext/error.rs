//! Error types for tokenization
//!
//! Stack errors are violations of the contract between the scanning engine and the core
//! (mismatched enter/leave or push/pop pairs), not properties of the input text. They abort the
//! run. Scan errors originate in the engine and are passed through untouched.

use crate::wikitext::restrictions::Restriction;
use thiserror::Error;

/// Which stack ran dry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Underflow {
    /// `leave_scope` was called while only the base chunk remained.
    #[error("cannot leave the base scope")]
    Scope,
    /// A read or mutation of a restriction kind that has nothing pushed.
    #[error("no value pushed for restriction `{0}`")]
    Restriction(Restriction),
}

/// A failure reported by a scanning engine while recognizing the input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("scan error at byte {offset}: {message}")]
pub struct ScanError {
    pub offset: usize,
    pub message: String,
}

impl ScanError {
    pub fn new(offset: usize, message: impl Into<String>) -> Self {
        Self {
            offset,
            message: message.into(),
        }
    }
}

/// Errors that end a tokenizer run
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenizerError {
    #[error("stack underflow: {0}")]
    StackUnderflow(Underflow),

    #[error(transparent)]
    Scan(#[from] ScanError),

    /// The engine returned with nested scopes still open.
    #[error("{open} nested scope(s) left open at end of scan")]
    UnclosedScopes { open: usize },

    /// The engine returned with values still pushed for a restriction kind.
    #[error("restriction `{kind}` left {depth} value(s) pushed at end of scan")]
    UnbalancedRestriction { kind: Restriction, depth: usize },
}

impl TokenizerError {
    pub fn is_stack_underflow(&self) -> bool {
        matches!(self, TokenizerError::StackUnderflow(_))
    }
}

impl From<Underflow> for TokenizerError {
    fn from(underflow: Underflow) -> Self {
        TokenizerError::StackUnderflow(underflow)
    }
}

pub type Result<T> = std::result::Result<T, TokenizerError>;
