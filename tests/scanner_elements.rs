//! Reference scanner on individual wikitext elements
//!
//! Structure checks navigate the token tree with `as_nested`; the larger layouts are compared as
//! treeviz output.

use rstest::rstest;
use wikitok::wikitext::config::TokenizerConfig;
use wikitok::wikitext::formats::to_treeviz_str;
use wikitok::wikitext::{
    detokenize, tokenize, tokenize_with_config, MarkerKind, ScopeKind, Token, TokenChunk,
};

fn nested<'a>(chunk: &'a TokenChunk, index: usize, scope: ScopeKind) -> &'a TokenChunk {
    chunk[index]
        .as_nested(scope)
        .unwrap_or_else(|| panic!("expected {:?} at {}, got {:?}", scope, index, chunk[index]))
}

#[rstest]
#[case::plain("just text")]
#[case::template("{{Infobox person|name=Ada|birth_date=1815}}")]
#[case::nested_templates("{{a|{{b|c=d}}|e}}")]
#[case::unterminated_template("{{a|b")]
#[case::link("[[Ada Lovelace]]")]
#[case::link_description("[[Ada Lovelace|the countess]]")]
#[case::link_in_template_argument("{{cite|author=[[Ada|A. L.]]}}")]
#[case::external_link("[https://example.org Example]")]
#[case::bare_external_link("[https://example.org]")]
#[case::heading("=== Notes ===  \ntext")]
#[case::lists("* one\n*# two\n; term : definition\n")]
#[case::formatting("'''bold''' ''italic'' '''''both''''' ''''four")]
#[case::table("{| class=\"wikitable\"\n|+ Caption\n! a !! b\n|-\n| x || y\n|}\n")]
#[case::nested_table("{|\n| outer\n{|\n| inner\n|}\n|}")]
#[case::preformatted("<pre>{{not a template}}\n[[nor a link]]</pre>")]
#[case::unterminated_pre("<pre>a\nb")]
#[case::inclusion_tags("<noinclude>doc</noinclude><includeonly>{{x}}</includeonly>")]
#[case::comment("a<!-- hidden\nline -->b")]
#[case::stray_closers("]] }} |} </pre> </onlyinclude>")]
#[case::crlf("line one\r\nline two\r\n")]
#[case::crlf_heading("== One ==\r\ntext\r\n")]
fn test_round_trip(#[case] source: &str) {
    let chunk = tokenize(source).expect("tokenize failed");
    assert_eq!(detokenize(&chunk), source);
}

#[test]
fn test_template_arguments() {
    let output = tokenize("{{a|x=1|2}}").unwrap();
    let template = nested(&output, 0, ScopeKind::Template);

    assert_eq!(
        nested(template, 1, ScopeKind::TemplateName),
        &TokenChunk::from(vec![Token::text("a")])
    );
    let named = nested(template, 3, ScopeKind::TemplateArgument);
    assert!(named[1].is_marker(&MarkerKind::ArgumentEquals));
    let positional = nested(template, 5, ScopeKind::TemplateArgument);
    assert_eq!(positional.as_slice(), &[Token::text("2")]);
    assert!(template[6].is_marker(&MarkerKind::TemplateClose));
}

#[test]
fn test_inner_template_keeps_its_own_equals() {
    let output = tokenize("{{a|{{b|c=d}}}}").unwrap();
    let outer = nested(&output, 0, ScopeKind::Template);
    let argument = nested(outer, 3, ScopeKind::TemplateArgument);
    let inner = nested(argument, 0, ScopeKind::Template);
    let inner_argument = nested(inner, 3, ScopeKind::TemplateArgument);
    assert!(inner_argument[1].is_marker(&MarkerKind::ArgumentEquals));
    assert_eq!(argument.len(), 1);
}

#[test]
fn test_pipe_in_link_inside_template_belongs_to_link() {
    let output = tokenize("{{a|[[b|c]]|d}}").unwrap();
    let template = nested(&output, 0, ScopeKind::Template);
    let argument = nested(template, 3, ScopeKind::TemplateArgument);
    let link = nested(argument, 0, ScopeKind::Link);
    assert!(link[2].is_marker(&MarkerKind::Pipe));
    assert!(link[4].is_marker(&MarkerKind::LinkClose));
    assert!(template[4].is_marker(&MarkerKind::Pipe));
}

#[test]
fn test_link_description_ends_at_template_close() {
    let output = tokenize("{{a|[[b|c}} d").unwrap();
    let template = nested(&output, 0, ScopeKind::Template);
    assert!(template.last().is_some_and(|t| t.is_marker(&MarkerKind::TemplateClose)));
    assert_eq!(output[1], Token::text(" d"));
}

#[test]
fn test_link_with_invalid_target_is_text() {
    let output = tokenize("[[a{b]]").unwrap();
    assert_eq!(output.as_slice(), &[Token::text("[[a{b]]")]);
}

#[test]
fn test_cell_attributes() {
    let output = tokenize("{|\n| style=\"x\" | content | more\n|}").unwrap();
    let table = nested(&output, 0, ScopeKind::Table);

    assert!(table[0].is_marker(&MarkerKind::TableOpen));
    assert_eq!(table[1], Token::Newline);
    assert!(table[2].is_marker(&MarkerKind::TableCell));
    let cell = nested(table, 3, ScopeKind::TableCell);
    assert_eq!(
        nested(cell, 0, ScopeKind::CellAttributes).as_slice(),
        &[Token::text(" style=\"x\" ")]
    );
    assert!(cell[1].is_marker(&MarkerKind::CellAttributeSeparator));
    assert_eq!(cell[2], Token::text(" content | more"));
    assert!(table.last().is_some_and(|t| t.is_marker(&MarkerKind::TableClose)));
}

#[test]
fn test_template_pipe_inside_cell_belongs_to_template() {
    let output = tokenize("{|\n| {{a|b}} || c\n|}").unwrap();
    let table = nested(&output, 0, ScopeKind::Table);
    let cell = nested(table, 3, ScopeKind::TableCell);
    let template = nested(cell, 1, ScopeKind::Template);
    assert!(template[2].is_marker(&MarkerKind::Pipe));
    assert!(table[4].is_marker(&MarkerKind::TableCell));
    assert_eq!(
        nested(table, 5, ScopeKind::TableCell).as_slice(),
        &[Token::text(" c")]
    );
}

#[test]
fn test_table_close_ends_unterminated_link_in_cell() {
    let source = "{|\n| [[a|b\n|}\nafter";
    let output = tokenize(source).unwrap();
    assert_eq!(output.len(), 3);
    assert_eq!(output[1], Token::Newline);
    assert_eq!(output[2], Token::text("after"));

    let table = nested(&output, 0, ScopeKind::Table);
    assert!(table.last().is_some_and(|t| t.is_marker(&MarkerKind::TableClose)));
    let cell = nested(table, 3, ScopeKind::TableCell);
    let link = nested(cell, 1, ScopeKind::Link);
    assert_eq!(
        nested(link, 3, ScopeKind::LinkDescription).as_slice(),
        &[Token::text("b"), Token::Newline]
    );
    assert!(!link.iter().any(|t| t.is_marker(&MarkerKind::LinkClose)));
    assert_eq!(detokenize(&output), source);
}

#[test]
fn test_table_close_ends_unterminated_template_in_cell() {
    let source = "{|\n| {{a\n|}\nafter";
    let output = tokenize(source).unwrap();
    let table = nested(&output, 0, ScopeKind::Table);
    assert!(table.last().is_some_and(|t| t.is_marker(&MarkerKind::TableClose)));
    let cell = nested(table, 3, ScopeKind::TableCell);
    let template = nested(cell, 1, ScopeKind::Template);
    assert_eq!(template.len(), 2);
    assert_eq!(output[2], Token::text("after"));
    assert_eq!(detokenize(&output), source);
}

#[test]
fn test_heading_levels_are_capped() {
    let output = tokenize("======= deep =======").unwrap();
    let heading = nested(&output, 0, ScopeKind::Heading);
    assert_eq!(
        heading[0],
        Token::marker(MarkerKind::HeadingOpen { level: 6 }, "=======")
    );
}

#[test]
fn test_heading_inside_text_is_not_a_heading() {
    let output = tokenize("a == b ==").unwrap();
    assert_eq!(output.as_slice(), &[Token::text("a == b ==")]);
}

#[test]
fn test_definition_colon_inside_link_is_text() {
    let output = tokenize("; [[a:b]] : c").unwrap();
    assert!(output[0].is_marker(&MarkerKind::ListBullet));
    let link = nested(&output, 2, ScopeKind::Link);
    assert_eq!(
        nested(link, 1, ScopeKind::LinkTarget).as_slice(),
        &[Token::text("a:b")]
    );
    assert!(output[4].is_marker(&MarkerKind::DefinitionSeparator));
}

#[test]
fn test_inclusion_tags_are_markers() {
    let output = tokenize("<onlyinclude>x</onlyinclude>").unwrap();
    assert_eq!(
        output.as_slice(),
        &[
            Token::marker(
                MarkerKind::Tag {
                    name: "onlyinclude".to_string(),
                    closing: false
                },
                "<onlyinclude>"
            ),
            Token::text("x"),
            Token::marker(
                MarkerKind::Tag {
                    name: "onlyinclude".to_string(),
                    closing: true
                },
                "</onlyinclude>"
            ),
        ]
    );
}

#[test]
fn test_deep_nesting_degrades_to_text() {
    let depth = 200;
    let source = format!("{}x{}", "{{".repeat(depth), "}}".repeat(depth));
    let config = TokenizerConfig {
        max_nesting_depth: 16,
        ..TokenizerConfig::default()
    };
    let output = tokenize_with_config(&source, config).unwrap();
    assert_eq!(detokenize(&output), source);
}

#[test]
fn test_treeviz_of_link() {
    let output = tokenize("x[[Ada|her]]\n").unwrap();
    insta::assert_snapshot!(to_treeviz_str(&output), @r"
    ⧉ 3 tokens
    ├─ ◦ x
    ├─ ⇗ Link
    │ ├─ ▸ LinkOpen [[
    │ ├─ ○ LinkTarget
    │ │ └─ ◦ Ada
    │ ├─ ▸ Pipe |
    │ ├─ ○ LinkDescription
    │ │ └─ ◦ her
    │ └─ ▸ LinkClose ]]
    └─ ↵
    ");
}
