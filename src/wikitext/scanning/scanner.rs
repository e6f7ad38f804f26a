//! Wikitext scanner
//!
//!     Recursive descent over the lexeme stream. Block-level constructs (headings, tables, list
//!     lines) are recognized at line starts; everything else is inline content scanned by
//!     [Run::inline] under a [Context] naming the innermost construct.
//!
//!     For every lexeme the inline loop asks, in order:
//!         1. Does it close the innermost construct? Then return [Stop::Closer].
//!         2. Does an enclosing construct claim it (read from the restriction stack)? Then
//!            return [Stop::Break].
//!         3. Otherwise scan it as an item: an opener, a marker, or plain text.
//!
//!     Neither 1 nor 2 consumes the lexeme. Block-level loops consume anything that reaches them
//!     as a break as plain text, so every iteration makes progress.
//!
//! Restrictions
//!
//!     At scan start a 0 baseline is pushed for every kind and popped at scan end. Constructs then
//!     count (Template, LinkDescription, ExternalLink, Table, Preformatted and the inclusion tags)
//!     or shadow (Pipe, Equal, Colon, TableCellArgument) as listed in the constants below.

use crate::wikitext::config::TokenizerConfig;
use crate::wikitext::error::Result;
use crate::wikitext::restrictions::Restriction;
use crate::wikitext::scanning::lexemes::{lex, Lexeme};
use crate::wikitext::token::{MarkerKind, ScopeKind, Token};
use crate::wikitext::tokenizer::{ScanEngine, Tokenizer};
use std::ops::Range;
use tracing::{debug, trace, warn};

/// Pushed for the whole extent of a template. `|` separates arguments; link, external link,
/// cell and definition separators of enclosing constructs are masked.
const TEMPLATE_SHADOW: &[(Restriction, i32)] = &[
    (Restriction::Pipe, 1),
    (Restriction::Equal, 0),
    (Restriction::LinkDescription, 0),
    (Restriction::ExternalLink, 0),
    (Restriction::TableCellArgument, 0),
    (Restriction::Colon, 0),
];

/// Pushed for a link description: `|` and `=` are plain text inside it.
const LINK_DESCRIPTION_SHADOW: &[(Restriction, i32)] = &[
    (Restriction::Pipe, 0),
    (Restriction::Equal, 0),
    (Restriction::ExternalLink, 0),
    (Restriction::Colon, 0),
];

const EXTERNAL_LINK_SHADOW: &[(Restriction, i32)] =
    &[(Restriction::Equal, 0), (Restriction::Colon, 0)];

/// Pushed per table cell: the first lone `|` splits attributes from content.
const CELL_SHADOW: &[(Restriction, i32)] = &[
    (Restriction::Pipe, 1),
    (Restriction::TableCellArgument, 1),
];

/// The innermost construct an inline run belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Context {
    /// Content of a block-level line.
    Line,
    HeadingContent,
    /// A template name or argument.
    TemplatePart,
    LinkDescription,
    ExternalLinkDescription,
    TableCell { heading: bool },
}

/// Why an inline run stopped. The stopping lexeme is never consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stop {
    Closer,
    Break,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineStart {
    Heading(usize),
    Table,
    List,
    Plain,
}

/// The reference [ScanEngine] for wikitext.
///
/// Stateless between runs; per-run state lives in a private cursor created by each `scan`.
#[derive(Debug, Clone, Default)]
pub struct WikitextScanner;

impl WikitextScanner {
    pub fn new() -> Self {
        Self
    }
}

impl ScanEngine for WikitextScanner {
    fn scan(&mut self, source: &str, tokenizer: &mut Tokenizer<'_>) -> Result<()> {
        let lexemes = lex(source)?;
        debug!(lexemes = lexemes.len(), "lexed source");
        let mut run = Run::new(source, lexemes, tokenizer.config());

        for kind in Restriction::ALL {
            tokenizer.flags.push(kind, 0);
        }
        run.document(tokenizer)?;
        for kind in Restriction::ALL {
            tokenizer.flags.pop(kind)?;
        }
        Ok(())
    }
}

fn push_all(tk: &mut Tokenizer<'_>, values: &[(Restriction, i32)]) {
    for &(kind, value) in values {
        tk.flags.push(kind, value);
    }
}

fn pop_all(tk: &mut Tokenizer<'_>, values: &[(Restriction, i32)]) -> Result<()> {
    for &(kind, _) in values.iter().rev() {
        tk.flags.pop(kind)?;
    }
    Ok(())
}

/// Cursor over the lexemes of one scan.
struct Run<'s> {
    source: &'s str,
    lexemes: Vec<(Lexeme, Range<usize>)>,
    pos: usize,
    /// Plain text not yet emitted. Flushed before every other emission and scope change.
    text: String,
    max_depth: usize,
    preserve_comments: bool,
}

impl<'s> Run<'s> {
    fn new(
        source: &'s str,
        lexemes: Vec<(Lexeme, Range<usize>)>,
        config: &TokenizerConfig,
    ) -> Self {
        Self {
            source,
            lexemes,
            pos: 0,
            text: String::new(),
            max_depth: config.max_nesting_depth,
            preserve_comments: config.preserve_comments,
        }
    }

    // Cursor

    fn peek(&self) -> Option<Lexeme> {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> Option<Lexeme> {
        self.lexemes.get(self.pos + offset).map(|(lexeme, _)| *lexeme)
    }

    fn pair(&self, first: Lexeme, second: Lexeme) -> bool {
        self.peek_at(0) == Some(first) && self.peek_at(1) == Some(second)
    }

    fn at_end(&self) -> bool {
        self.pos >= self.lexemes.len()
    }

    fn slice(&self, index: usize) -> &'s str {
        let source = self.source;
        &source[self.lexemes[index].1.clone()]
    }

    fn run_len(&self, from: usize, lexeme: Lexeme) -> usize {
        self.lexemes[from..]
            .iter()
            .take_while(|(l, _)| *l == lexeme)
            .count()
    }

    // Emission

    fn bump_text(&mut self) {
        let text = self.slice(self.pos);
        self.text.push_str(text);
        self.pos += 1;
    }

    fn flush(&mut self, tk: &mut Tokenizer<'_>) {
        if !self.text.is_empty() {
            tk.emit(Token::Text(std::mem::take(&mut self.text)));
        }
    }

    fn emit(&mut self, tk: &mut Tokenizer<'_>, token: Token) {
        self.flush(tk);
        tk.emit(token);
    }

    /// Emit the next `count` lexemes as one marker.
    fn marker(&mut self, tk: &mut Tokenizer<'_>, kind: MarkerKind, count: usize) {
        let source = self.source;
        let start = self.lexemes[self.pos].1.start;
        let end = self.lexemes[self.pos + count - 1].1.end;
        self.pos += count;
        self.emit(tk, Token::marker(kind, &source[start..end]));
    }

    fn newline(&mut self, tk: &mut Tokenizer<'_>) {
        self.emit(tk, Token::Newline);
        self.pos += 1;
    }

    fn comment(&mut self, tk: &mut Tokenizer<'_>) {
        if self.preserve_comments {
            let text = self.slice(self.pos);
            self.emit(tk, Token::Comment(text.to_string()));
        }
        self.pos += 1;
    }

    // Scopes

    fn open(&mut self, tk: &mut Tokenizer<'_>) {
        self.flush(tk);
        tk.enter_scope();
    }

    fn close(&mut self, tk: &mut Tokenizer<'_>, scope: ScopeKind) -> Result<()> {
        self.flush(tk);
        let chunk = tk.leave_scope()?;
        tk.emit(Token::nested(scope, chunk));
        Ok(())
    }

    /// Like [Run::close], but an empty chunk is dropped instead of embedded.
    fn close_nonempty(&mut self, tk: &mut Tokenizer<'_>, scope: ScopeKind) -> Result<()> {
        self.flush(tk);
        let chunk = tk.leave_scope()?;
        if !chunk.is_empty() {
            tk.emit(Token::nested(scope, chunk));
        }
        Ok(())
    }

    /// Whether a construct opening `opens` chunks fits under the nesting limit.
    fn can_nest(&self, tk: &Tokenizer<'_>, opens: usize) -> bool {
        let allowed = tk.depth() + opens <= self.max_depth;
        if !allowed {
            warn!(
                depth = tk.depth(),
                offset = self.lexemes[self.pos].1.start,
                "nesting limit reached, scanning opener as text"
            );
        }
        allowed
    }

    // Block level

    fn document(&mut self, tk: &mut Tokenizer<'_>) -> Result<()> {
        while !self.at_end() {
            self.block_line(tk)?;
        }
        self.flush(tk);
        Ok(())
    }

    fn line_start(&self) -> LineStart {
        match self.peek() {
            Some(Lexeme::Equals) => self
                .heading_open_len()
                .map_or(LineStart::Plain, LineStart::Heading),
            Some(Lexeme::LeftBrace) if self.peek_at(1) == Some(Lexeme::Pipe) => LineStart::Table,
            Some(lexeme) if lexeme.is_bullet() => LineStart::List,
            _ => LineStart::Plain,
        }
    }

    /// Scan one line starting at a line start, including its line break.
    fn block_line(&mut self, tk: &mut Tokenizer<'_>) -> Result<()> {
        match self.line_start() {
            LineStart::Heading(open) if self.can_nest(tk, 2) => self.heading(tk, open)?,
            // Table, first cell and its attributes
            LineStart::Table if self.can_nest(tk, 3) => self.table(tk)?,
            LineStart::List => self.list_line(tk)?,
            LineStart::Heading(_) | LineStart::Table | LineStart::Plain => {}
        }
        self.line_content(tk, Context::Line)?;
        if self.peek() == Some(Lexeme::Newline) {
            self.newline(tk);
        }
        Ok(())
    }

    /// Inline content up to the end of the construct, absorbing breaks as text.
    fn line_content(&mut self, tk: &mut Tokenizer<'_>, context: Context) -> Result<()> {
        while self.inline(tk, context)? == Stop::Break {
            self.bump_text();
        }
        Ok(())
    }

    /// Length of the opening `=` run if the current line is a heading: the last non-space
    /// lexeme on the line must be a separate `=` run.
    fn heading_open_len(&self) -> Option<usize> {
        let open = self.run_len(self.pos, Lexeme::Equals);
        let line_end = self.lexemes[self.pos..]
            .iter()
            .position(|(l, _)| *l == Lexeme::Newline)
            .map_or(self.lexemes.len(), |i| self.pos + i);
        let last = (self.pos + open..line_end)
            .rev()
            .find(|&i| self.lexemes[i].0 != Lexeme::Space)?;
        (self.lexemes[last].0 == Lexeme::Equals).then_some(open)
    }

    /// At a `=` run followed only by spaces up to the end of the line.
    fn at_heading_close(&self) -> bool {
        if self.peek() != Some(Lexeme::Equals) {
            return false;
        }
        let after = self.pos + self.run_len(self.pos, Lexeme::Equals);
        let next = self.lexemes[after..]
            .iter()
            .map(|(l, _)| *l)
            .find(|l| *l != Lexeme::Space);
        matches!(next, None | Some(Lexeme::Newline))
    }

    fn heading(&mut self, tk: &mut Tokenizer<'_>, open: usize) -> Result<()> {
        let level = open.min(6) as u8;
        self.open(tk);
        self.marker(tk, MarkerKind::HeadingOpen { level }, open);

        tk.flags.push(Restriction::Equal, i32::from(level));
        self.open(tk);
        self.line_content(tk, Context::HeadingContent)?;
        self.close(tk, ScopeKind::HeadingContent)?;
        tk.flags.pop(Restriction::Equal)?;

        if self.at_heading_close() {
            let close = self.run_len(self.pos, Lexeme::Equals);
            self.marker(tk, MarkerKind::HeadingClose, close);
            while self.peek() == Some(Lexeme::Space) {
                self.bump_text();
            }
        }
        self.close(tk, ScopeKind::Heading)
    }

    fn list_line(&mut self, tk: &mut Tokenizer<'_>) -> Result<()> {
        let bullets = self.lexemes[self.pos..]
            .iter()
            .take_while(|(l, _)| l.is_bullet())
            .count();
        let definition = self.lexemes[self.pos..self.pos + bullets]
            .iter()
            .any(|(l, _)| *l == Lexeme::Semicolon);
        self.marker(tk, MarkerKind::ListBullet, bullets);

        // `; term : definition` splits at the first colon
        tk.flags.push(Restriction::Colon, i32::from(definition));
        self.line_content(tk, Context::Line)?;
        tk.flags.pop(Restriction::Colon)?;
        Ok(())
    }

    fn table(&mut self, tk: &mut Tokenizer<'_>) -> Result<()> {
        self.open(tk);
        self.marker(tk, MarkerKind::TableOpen, 2);
        let depth = tk.flags.increment(Restriction::Table)?;
        trace!(depth, "open table");
        self.attribute_line(tk)?;

        loop {
            // An unterminated construct inside a cell may have taken the line break
            if self.at_table_close(tk) {
                self.marker(tk, MarkerKind::TableClose, 2);
                break;
            }
            if self.peek() != Some(Lexeme::Newline) {
                break;
            }
            self.newline(tk);
            match (self.peek(), self.peek_at(1)) {
                (Some(Lexeme::Pipe), Some(Lexeme::RightBrace)) => continue,
                (Some(Lexeme::Pipe), Some(Lexeme::Dash)) => {
                    let dashes = self.run_len(self.pos + 1, Lexeme::Dash);
                    self.marker(tk, MarkerKind::TableRow, 1 + dashes);
                    self.attribute_line(tk)?;
                }
                (Some(Lexeme::Pipe), Some(Lexeme::Plus)) => {
                    self.marker(tk, MarkerKind::TableCaption, 2);
                    self.cells(tk, false)?;
                }
                (Some(Lexeme::Pipe), _) => {
                    self.marker(tk, MarkerKind::TableCell, 1);
                    self.cells(tk, false)?;
                }
                (Some(Lexeme::Bang), _) => {
                    self.marker(tk, MarkerKind::TableHeading, 1);
                    self.cells(tk, true)?;
                }
                (Some(Lexeme::LeftBrace), Some(Lexeme::Pipe)) if self.can_nest(tk, 3) => {
                    self.table(tk)?;
                }
                _ => {}
            }
            // Rest of the line after a nested table close, or a plain line
            self.line_content(tk, Context::Line)?;
        }

        tk.flags.decrement(Restriction::Table)?;
        self.close(tk, ScopeKind::Table)
    }

    /// The rest of a `{|` or `|-` line.
    fn attribute_line(&mut self, tk: &mut Tokenizer<'_>) -> Result<()> {
        self.open(tk);
        self.line_content(tk, Context::Line)?;
        self.close_nonempty(tk, ScopeKind::TableAttributes)
    }

    /// Cells on one table line, separated by `||` (or `!!` on heading lines).
    ///
    /// Each cell is one chunk. Content is first collected in an inner chunk; a lone `|` turns
    /// that chunk into the cell's attributes, otherwise its tokens are moved into the cell.
    fn cells(&mut self, tk: &mut Tokenizer<'_>, heading: bool) -> Result<()> {
        let context = Context::TableCell { heading };
        loop {
            push_all(tk, CELL_SHADOW);
            self.open(tk);
            self.open(tk);
            let mut attributes_open = true;
            loop {
                match self.inline(tk, context)? {
                    Stop::Closer if self.at_cell_attribute_separator(tk) => {
                        self.close(tk, ScopeKind::CellAttributes)?;
                        self.marker(tk, MarkerKind::CellAttributeSeparator, 1);
                        tk.flags.decrement(Restriction::TableCellArgument)?;
                        attributes_open = false;
                    }
                    Stop::Break => self.bump_text(),
                    Stop::Closer | Stop::End => break,
                }
            }
            if attributes_open {
                self.flush(tk);
                for token in tk.leave_scope()? {
                    tk.emit(token);
                }
            }
            self.close(tk, ScopeKind::TableCell)?;
            pop_all(tk, CELL_SHADOW)?;

            let separated = self.pair(Lexeme::Pipe, Lexeme::Pipe)
                || (heading && self.pair(Lexeme::Bang, Lexeme::Bang));
            if !separated {
                return Ok(());
            }
            let separator = if heading {
                MarkerKind::TableHeading
            } else {
                MarkerKind::TableCell
            };
            self.marker(tk, separator, 2);
        }
    }

    fn at_cell_attribute_separator(&self, tk: &Tokenizer<'_>) -> bool {
        self.peek() == Some(Lexeme::Pipe)
            && self.peek_at(1) != Some(Lexeme::Pipe)
            && tk.flags.is_active(Restriction::TableCellArgument)
            && !self.at_table_close(tk)
    }

    /// At a `|}` starting a line inside a table.
    fn at_table_close(&self, tk: &Tokenizer<'_>) -> bool {
        self.pair(Lexeme::Pipe, Lexeme::RightBrace)
            && self.pos > 0
            && self.lexemes[self.pos - 1].0 == Lexeme::Newline
            && tk.flags.is_active(Restriction::Table)
    }

    // Inline level

    fn inline(&mut self, tk: &mut Tokenizer<'_>, context: Context) -> Result<Stop> {
        loop {
            let Some(lexeme) = self.peek() else {
                return Ok(Stop::End);
            };
            if self.closes(tk, context, lexeme) {
                return Ok(Stop::Closer);
            }
            if self.breaks(tk, lexeme) {
                return Ok(Stop::Break);
            }
            self.item(tk, context, lexeme)?;
        }
    }

    fn closes(&self, tk: &Tokenizer<'_>, context: Context, lexeme: Lexeme) -> bool {
        match context {
            Context::Line => lexeme == Lexeme::Newline || self.at_table_close(tk),
            Context::HeadingContent => {
                lexeme == Lexeme::Newline
                    || (tk.flags.is_active(Restriction::Equal) && self.at_heading_close())
            }
            Context::TemplatePart => {
                (lexeme == Lexeme::Pipe && !self.at_table_close(tk))
                    || self.pair(Lexeme::RightBrace, Lexeme::RightBrace)
            }
            Context::LinkDescription => self.pair(Lexeme::RightBracket, Lexeme::RightBracket),
            Context::ExternalLinkDescription => {
                matches!(lexeme, Lexeme::RightBracket | Lexeme::Newline)
            }
            Context::TableCell { heading } => {
                lexeme == Lexeme::Newline
                    || self.at_table_close(tk)
                    || self.pair(Lexeme::Pipe, Lexeme::Pipe)
                    || (heading && self.pair(Lexeme::Bang, Lexeme::Bang))
                    || self.at_cell_attribute_separator(tk)
            }
        }
    }

    /// Whether an enclosing construct is waiting for this lexeme.
    fn breaks(&self, tk: &Tokenizer<'_>, lexeme: Lexeme) -> bool {
        let flags = &tk.flags;
        match lexeme {
            Lexeme::RightBrace => {
                flags.is_active(Restriction::Template)
                    && self.pair(Lexeme::RightBrace, Lexeme::RightBrace)
            }
            Lexeme::RightBracket => {
                flags.is_active(Restriction::ExternalLink)
                    || (flags.is_active(Restriction::LinkDescription)
                        && self.pair(Lexeme::RightBracket, Lexeme::RightBracket))
            }
            Lexeme::Newline => flags.is_active(Restriction::ExternalLink),
            Lexeme::Pipe => flags.is_active(Restriction::Pipe) || self.at_table_close(tk),
            _ => false,
        }
    }

    /// Scan one item. Always consumes at least one lexeme.
    fn item(&mut self, tk: &mut Tokenizer<'_>, context: Context, lexeme: Lexeme) -> Result<()> {
        match lexeme {
            Lexeme::LeftBrace
                if self.peek_at(1) == Some(Lexeme::LeftBrace) && self.can_nest(tk, 2) =>
            {
                self.template(tk)
            }
            Lexeme::LeftBracket
                if self.peek_at(1) == Some(Lexeme::LeftBracket)
                    && !tk.flags.is_active(Restriction::LinkDescription) =>
            {
                match self.link_target_end() {
                    Some(end) if self.can_nest(tk, 2) => self.wikilink(tk, end),
                    _ => {
                        self.bump_text();
                        Ok(())
                    }
                }
            }
            Lexeme::LeftBracket
                if self.peek_at(1) == Some(Lexeme::Url)
                    && !tk.flags.is_active(Restriction::ExternalLink)
                    && self.can_nest(tk, 2) =>
            {
                self.external_link(tk)
            }
            Lexeme::Apostrophe => {
                self.apostrophes(tk);
                Ok(())
            }
            Lexeme::Equals
                if context == Context::TemplatePart
                    && tk.flags.is_active(Restriction::Equal) =>
            {
                self.marker(tk, MarkerKind::ArgumentEquals, 1);
                tk.flags.decrement(Restriction::Equal)?;
                Ok(())
            }
            Lexeme::Colon if tk.flags.is_active(Restriction::Colon) => {
                self.marker(tk, MarkerKind::DefinitionSeparator, 1);
                tk.flags.decrement(Restriction::Colon)?;
                Ok(())
            }
            Lexeme::Comment => {
                self.comment(tk);
                Ok(())
            }
            Lexeme::Tag => self.tag(tk),
            Lexeme::Newline => {
                self.newline(tk);
                Ok(())
            }
            _ => {
                self.bump_text();
                Ok(())
            }
        }
    }

    fn template(&mut self, tk: &mut Tokenizer<'_>) -> Result<()> {
        self.open(tk);
        self.marker(tk, MarkerKind::TemplateOpen, 2);
        tk.flags.increment(Restriction::Template)?;
        push_all(tk, TEMPLATE_SHADOW);

        self.open(tk);
        let mut stop = self.inline(tk, Context::TemplatePart)?;
        self.close(tk, ScopeKind::TemplateName)?;

        while stop == Stop::Closer && self.peek() == Some(Lexeme::Pipe) {
            self.marker(tk, MarkerKind::Pipe, 1);
            tk.flags.push(Restriction::Equal, 1);
            self.open(tk);
            stop = self.inline(tk, Context::TemplatePart)?;
            self.close(tk, ScopeKind::TemplateArgument)?;
            tk.flags.pop(Restriction::Equal)?;
        }

        pop_all(tk, TEMPLATE_SHADOW)?;
        tk.flags.decrement(Restriction::Template)?;
        if stop == Stop::Closer {
            self.marker(tk, MarkerKind::TemplateClose, 2);
        }
        self.close(tk, ScopeKind::Template)
    }

    /// Index of the `|` or `]]` ending a valid link target after `[[`.
    fn link_target_end(&self) -> Option<usize> {
        let start = self.pos + 2;
        let mut index = start;
        loop {
            let lexeme = self.lexemes.get(index)?.0;
            match lexeme {
                Lexeme::Pipe => break,
                Lexeme::RightBracket
                    if self.lexemes.get(index + 1).map(|(l, _)| *l)
                        == Some(Lexeme::RightBracket) =>
                {
                    break
                }
                _ if lexeme.is_title_char() => index += 1,
                _ => return None,
            }
        }
        (index > start).then_some(index)
    }

    fn wikilink(&mut self, tk: &mut Tokenizer<'_>, target_end: usize) -> Result<()> {
        self.open(tk);
        self.marker(tk, MarkerKind::LinkOpen, 2);

        self.open(tk);
        while self.pos < target_end {
            self.bump_text();
        }
        self.close(tk, ScopeKind::LinkTarget)?;

        if self.peek() == Some(Lexeme::Pipe) {
            self.marker(tk, MarkerKind::Pipe, 1);
            tk.flags.increment(Restriction::LinkDescription)?;
            push_all(tk, LINK_DESCRIPTION_SHADOW);

            self.open(tk);
            let stop = self.inline(tk, Context::LinkDescription)?;
            self.close(tk, ScopeKind::LinkDescription)?;

            pop_all(tk, LINK_DESCRIPTION_SHADOW)?;
            tk.flags.decrement(Restriction::LinkDescription)?;
            if stop == Stop::Closer {
                self.marker(tk, MarkerKind::LinkClose, 2);
            }
        } else {
            self.marker(tk, MarkerKind::LinkClose, 2);
        }
        self.close(tk, ScopeKind::Link)
    }

    fn external_link(&mut self, tk: &mut Tokenizer<'_>) -> Result<()> {
        self.open(tk);
        self.marker(tk, MarkerKind::ExternalLinkOpen, 1);
        self.bump_text();
        tk.flags.increment(Restriction::ExternalLink)?;
        push_all(tk, EXTERNAL_LINK_SHADOW);

        self.open(tk);
        let stop = self.inline(tk, Context::ExternalLinkDescription)?;
        self.close_nonempty(tk, ScopeKind::ExternalLinkDescription)?;

        pop_all(tk, EXTERNAL_LINK_SHADOW)?;
        tk.flags.decrement(Restriction::ExternalLink)?;
        if stop == Stop::Closer && self.peek() == Some(Lexeme::RightBracket) {
            self.marker(tk, MarkerKind::ExternalLinkClose, 1);
        }
        self.close(tk, ScopeKind::ExternalLink)
    }

    /// `''` italic, `'''` bold, `'''''` both. Surplus apostrophes on the left are text.
    fn apostrophes(&mut self, tk: &mut Tokenizer<'_>) {
        let count = self.run_len(self.pos, Lexeme::Apostrophe);
        let (plain, kind) = match count {
            1 => (1, None),
            2 => (0, Some(MarkerKind::Italic)),
            3 => (0, Some(MarkerKind::Bold)),
            4 => (1, Some(MarkerKind::Bold)),
            n => (n - 5, Some(MarkerKind::BoldItalic)),
        };
        for _ in 0..plain {
            self.bump_text();
        }
        if let Some(kind) = kind {
            self.marker(tk, kind, count - plain);
        }
    }

    fn tag(&mut self, tk: &mut Tokenizer<'_>) -> Result<()> {
        let raw = self.slice(self.pos);
        let closing = raw.starts_with("</");
        let name = raw
            .trim_start_matches('<')
            .trim_start_matches('/')
            .trim_end_matches('>');
        let kind = match name {
            "pre" if !closing && self.can_nest(tk, 1) => return self.preformatted(tk),
            "noinclude" => Restriction::NoInclude,
            "includeonly" => Restriction::IncludeOnly,
            "onlyinclude" => Restriction::OnlyInclude,
            _ => {
                self.bump_text();
                return Ok(());
            }
        };
        if closing && !tk.flags.is_active(kind) {
            self.bump_text();
            return Ok(());
        }

        let marker = MarkerKind::Tag {
            name: name.to_string(),
            closing,
        };
        self.marker(tk, marker, 1);
        if closing {
            tk.flags.decrement(kind)?;
        } else {
            tk.flags.increment(kind)?;
        }
        Ok(())
    }

    /// `<pre>` content is raw text up to `</pre>`.
    fn preformatted(&mut self, tk: &mut Tokenizer<'_>) -> Result<()> {
        self.open(tk);
        self.marker(tk, pre_tag(false), 1);
        tk.flags.increment(Restriction::Preformatted)?;

        while tk.flags.is_active(Restriction::Preformatted) {
            match self.peek() {
                None => {
                    tk.flags.decrement(Restriction::Preformatted)?;
                }
                Some(Lexeme::Tag) if self.slice(self.pos) == "</pre>" => {
                    self.marker(tk, pre_tag(true), 1);
                    tk.flags.decrement(Restriction::Preformatted)?;
                }
                Some(Lexeme::Newline) => self.newline(tk),
                Some(_) => self.bump_text(),
            }
        }
        self.close(tk, ScopeKind::Preformatted)
    }
}

fn pre_tag(closing: bool) -> MarkerKind {
    MarkerKind::Tag {
        name: "pre".to_string(),
        closing,
    }
}
