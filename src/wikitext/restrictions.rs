//! Syntax restriction flags
//!
//!     Restrictions express what is allowed in nested content, e.g. "inline, but no nested links"
//!     or "a `|` here ends the current template argument". One could unroll these into separate
//!     sets of productions per parsing context, at the cost of duplicating most of the grammar.
//!     Instead each kind carries its own stack of integers.
//!
//!     Two usage patterns are common:
//!         - Counting: the top value counts how many constructs of a kind enclose the scan
//!           position (`increment` on open, `decrement` on close).
//!         - Shadowing: a construct pushes its own value to mask the enclosing one, and pops it
//!           when it closes (a link description pushes `Pipe = 0` so that `|` becomes text).
//!
//!     The stacks for different kinds never interact, so restrictions can nest and interleave
//!     freely.

use crate::wikitext::error::{Result, Underflow};
use serde::Serialize;
use std::fmt;

/// Declares the restriction kinds from one list so that the variant set, [Restriction::ALL],
/// [Restriction::COUNT] and the names can never disagree.
macro_rules! restriction_kinds {
    ($($variant:ident => $name:literal,)+) => {
        /// The closed set of restriction kinds.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
        pub enum Restriction {
            $(#[serde(rename = $name)] $variant,)+
        }

        impl Restriction {
            pub const COUNT: usize = [$(stringify!($variant)),+].len();

            /// Every kind, in declaration order. The stack storage is sized from this list.
            pub const ALL: [Restriction; Self::COUNT] = [$(Restriction::$variant),+];

            pub fn name(self) -> &'static str {
                match self {
                    $(Restriction::$variant => $name,)+
                }
            }
        }
    };
}

restriction_kinds! {
    Equal => "equal",
    Table => "table",
    Template => "template",
    LinkDescription => "link_description",
    Pipe => "pipe",
    TableCellArgument => "table_cell_argument",
    Colon => "colon",
    ExternalLink => "external_link",
    Preformatted => "preformatted",
    NoInclude => "noinclude",
    IncludeOnly => "includeonly",
    OnlyInclude => "onlyinclude",
}

impl Restriction {
    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Restriction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One independent stack of values per [Restriction].
///
/// Every stack starts empty. Reading or mutating a kind with nothing pushed is a contract
/// violation and fails with [Underflow::Restriction].
#[derive(Debug, Clone)]
pub struct SyntaxRestrictionStack {
    flags: [Vec<i32>; Restriction::COUNT],
}

impl SyntaxRestrictionStack {
    pub fn new() -> Self {
        Self {
            flags: std::array::from_fn(|_| Vec::new()),
        }
    }

    pub fn push(&mut self, kind: Restriction, value: i32) {
        self.flags[kind.index()].push(value);
    }

    pub fn pop(&mut self, kind: Restriction) -> Result<i32> {
        self.flags[kind.index()]
            .pop()
            .ok_or_else(|| Underflow::Restriction(kind).into())
    }

    pub fn get(&self, kind: Restriction) -> Result<i32> {
        self.flags[kind.index()]
            .last()
            .copied()
            .ok_or_else(|| Underflow::Restriction(kind).into())
    }

    /// Add one to the top value of `kind` and return the new value.
    pub fn increment(&mut self, kind: Restriction) -> Result<i32> {
        let top = self.top_mut(kind)?;
        *top += 1;
        Ok(*top)
    }

    /// Subtract one from the top value of `kind` and return the new value.
    pub fn decrement(&mut self, kind: Restriction) -> Result<i32> {
        let top = self.top_mut(kind)?;
        *top -= 1;
        Ok(*top)
    }

    /// Number of values currently pushed for `kind`.
    pub fn depth(&self, kind: Restriction) -> usize {
        self.flags[kind.index()].len()
    }

    /// Whether the top value of `kind` is positive. An empty stack counts as inactive.
    pub fn is_active(&self, kind: Restriction) -> bool {
        self.flags[kind.index()]
            .last()
            .is_some_and(|value| *value > 0)
    }

    fn top_mut(&mut self, kind: Restriction) -> Result<&mut i32> {
        self.flags[kind.index()]
            .last_mut()
            .ok_or_else(|| Underflow::Restriction(kind).into())
    }
}

impl Default for SyntaxRestrictionStack {
    fn default() -> Self {
        Self::new()
    }
}
