//! Lexeme definitions for the reference scanner
//!
//! The logos lexer splits the source into small context-free units. Multi-character markup such as
//! `{{`, `]]` or `|}` is deliberately NOT lexed as one unit: whether `|}` closes a table or is a
//! pipe followed by the end of a template depends on context, which only the scanner knows.
//! Every character of the input is covered by some lexeme.

use crate::wikitext::error::ScanError;
use logos::{Lexer, Logos};
use std::ops::Range;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lexeme {
    #[token("{")]
    LeftBrace,
    #[token("}")]
    RightBrace,
    #[token("[")]
    LeftBracket,
    #[token("]")]
    RightBracket,
    #[token("|")]
    Pipe,
    #[token("!")]
    Bang,
    #[token("=")]
    Equals,
    #[token(":")]
    Colon,
    #[token(";")]
    Semicolon,
    #[token("*")]
    Star,
    #[token("#")]
    Hash,
    #[token("-")]
    Dash,
    #[token("+")]
    Plus,
    #[token("'")]
    Apostrophe,

    #[token("\n")]
    Newline,
    // `\r` of a CRLF line break counts as trailing space
    #[regex(r"[ \t\r]+")]
    Space,

    // Runs to the closing `-->`, or to the end of input when unterminated
    #[token("<!--", comment)]
    Comment,
    #[regex(r"</?(noinclude|includeonly|onlyinclude|pre)>")]
    Tag,
    #[regex(r#"(https?|ftp)://[^\s\[\]<>"|{}]+"#)]
    Url,
    #[token("<")]
    Lt,

    // Text content (catch-all for non-special characters)
    #[regex(r"[^\[\]{}|!=:;*#\-+'\n\r \t<]+")]
    Word,
}

fn comment(lex: &mut Lexer<Lexeme>) {
    let rest = lex.remainder();
    let end = rest.find("-->").map_or(rest.len(), |i| i + 3);
    lex.bump(end);
}

impl Lexeme {
    /// Whether this lexeme may appear inside a wikilink target.
    pub fn is_title_char(self) -> bool {
        matches!(
            self,
            Lexeme::Word
                | Lexeme::Space
                | Lexeme::Colon
                | Lexeme::Semicolon
                | Lexeme::Dash
                | Lexeme::Plus
                | Lexeme::Hash
                | Lexeme::Star
                | Lexeme::Bang
                | Lexeme::Equals
                | Lexeme::Apostrophe
        )
    }

    /// Whether this lexeme can start a list line.
    pub fn is_bullet(self) -> bool {
        matches!(
            self,
            Lexeme::Star | Lexeme::Hash | Lexeme::Colon | Lexeme::Semicolon
        )
    }
}

/// Split `source` into lexemes with their byte ranges.
pub fn lex(source: &str) -> Result<Vec<(Lexeme, Range<usize>)>, ScanError> {
    let mut lexer = Lexeme::lexer(source);
    let mut lexemes = Vec::new();

    while let Some(result) = lexer.next() {
        match result {
            Ok(lexeme) => lexemes.push((lexeme, lexer.span())),
            Err(()) => {
                return Err(ScanError::new(
                    lexer.span().start,
                    format!("unrecognized input {:?}", lexer.slice()),
                ))
            }
        }
    }

    Ok(lexemes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Lexeme> {
        lex(source).unwrap().into_iter().map(|(l, _)| l).collect()
    }

    #[test]
    fn test_markup_is_split_into_single_characters() {
        assert_eq!(
            kinds("{{a|}}"),
            vec![
                Lexeme::LeftBrace,
                Lexeme::LeftBrace,
                Lexeme::Word,
                Lexeme::Pipe,
                Lexeme::RightBrace,
                Lexeme::RightBrace,
            ]
        );
    }

    #[test]
    fn test_words_and_spaces() {
        assert_eq!(
            kinds("hello  world\n"),
            vec![Lexeme::Word, Lexeme::Space, Lexeme::Word, Lexeme::Newline]
        );
    }

    #[test]
    fn test_carriage_return_is_space() {
        assert_eq!(
            kinds("a \r\nb\rc"),
            vec![
                Lexeme::Word,
                Lexeme::Space,
                Lexeme::Newline,
                Lexeme::Word,
                Lexeme::Space,
                Lexeme::Word
            ]
        );
    }

    #[test]
    fn test_url_beats_word() {
        let lexemes = lex("[http://example.org/a?b=c x]").unwrap();
        assert_eq!(lexemes[1].0, Lexeme::Url);
        assert_eq!(lexemes[1].1, 1..25);
        assert_eq!(lexemes[2].0, Lexeme::Space);
    }

    #[test]
    fn test_scheme_without_slashes_is_text() {
        assert_eq!(kinds("http:x"), vec![Lexeme::Word, Lexeme::Colon, Lexeme::Word]);
    }

    #[test]
    fn test_comment_runs_to_terminator() {
        let lexemes = lex("a<!-- b -- c -->d").unwrap();
        assert_eq!(lexemes[1], (Lexeme::Comment, 1..16));
        assert_eq!(lexemes[2], (Lexeme::Word, 16..17));
    }

    #[test]
    fn test_unterminated_comment_runs_to_end() {
        let lexemes = lex("a<!-- b").unwrap();
        assert_eq!(lexemes, vec![(Lexeme::Word, 0..1), (Lexeme::Comment, 1..7)]);
    }

    #[test]
    fn test_tags_and_stray_angle_brackets() {
        assert_eq!(
            kinds("<noinclude>x</noinclude><b>"),
            vec![
                Lexeme::Tag,
                Lexeme::Word,
                Lexeme::Tag,
                Lexeme::Lt,
                Lexeme::Word
            ]
        );
    }

    #[test]
    fn test_every_character_is_covered() {
        let source = "~`@$%^&()_\\/?.,>\"é漢\r";
        let lexemes = lex(source).unwrap();
        let covered: usize = lexemes.iter().map(|(_, span)| span.len()).sum();
        assert_eq!(covered, source.len());
    }
}
