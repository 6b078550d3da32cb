use junco_core::{Interner, Kw};

use crate::diagnostics::MessageHolder;
use crate::lexer::{LexedFile, lex, lex_internal};
use crate::span::FileId;
use crate::token::{LitKind, Token, TokenKind};

fn lex_src(src: &str) -> (LexedFile, MessageHolder, Interner) {
    let mut interner = Interner::new();
    let mut msg = MessageHolder::new();
    let lexed = lex(&mut interner, FileId(1), src, &mut msg);
    (lexed, msg, interner)
}

fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
    tokens.iter().map(|t| t.kind).collect()
}

fn visible(tokens: &[Token]) -> Vec<Token> {
    tokens
        .iter()
        .filter(|t| !t.is_hidden() && !t.is_eof())
        .copied()
        .collect()
}

#[test]
fn token_texts_concatenate_to_the_source() {
    let sources = [
        "func main() { print(\"hi\") }",
        "let x = 0b1010 + 0xFF_u32\n// comment\n/* block */ 1.5e3",
        "a <<= b ..= c ... d |> e",
        "bad \u{1F980} char",
        "unterminated \"string",
    ];
    for src in sources {
        let (lexed, _, _) = lex_src(src);
        let mut rebuilt = String::new();
        for token in &lexed.tokens {
            if token.is_eof() {
                continue;
            }
            rebuilt.push_str(&src[token.span.lo() as usize..token.span.hi() as usize]);
        }
        assert_eq!(rebuilt, src, "round-trip failed for {src:?}");
    }
}

#[test]
fn newline_table_is_strictly_increasing_and_points_at_newlines() {
    let src = "a\nbb\n\nccc\n";
    let (lexed, msg, _) = lex_src(src);
    assert!(msg.is_empty());
    assert_eq!(lexed.newlines, vec![1, 4, 5, 9]);
    for window in lexed.newlines.windows(2) {
        assert!(window[1] > window[0]);
    }
    for &offset in &lexed.newlines {
        assert_eq!(src.as_bytes()[offset as usize], b'\n');
    }
}

#[test]
fn every_span_lies_within_the_source() {
    let src = "func f(x: int) -> int { x ** 2 }";
    let (lexed, _, _) = lex_src(src);
    for token in &lexed.tokens {
        assert!(token.span.hi() as usize <= src.len());
        assert!(token.span.lo() <= token.span.hi());
    }
    assert_eq!(lexed.tokens.last().unwrap().kind, TokenKind::Eof);
}

#[test]
fn keywords_and_identifiers() {
    let (lexed, msg, interner) = lex_src("func while whale fn");
    assert!(msg.is_empty());
    let visible = visible(&lexed.tokens);
    assert_eq!(visible[0].kind, TokenKind::Kw(Kw::Func));
    assert_eq!(visible[1].kind, TokenKind::Kw(Kw::While));
    assert!(matches!(visible[2].kind, TokenKind::Id(sym) if interner.resolve(sym) == "whale"));
    assert_eq!(visible[3].kind, TokenKind::Kw(Kw::Fn));
}

#[test]
fn bool_literals_are_literals_not_keywords() {
    let (lexed, msg, _) = lex_src("true false");
    assert!(msg.is_empty());
    let visible = visible(&lexed.tokens);
    for token in &visible {
        match token.kind {
            TokenKind::Lit(lit) => assert_eq!(lit.kind, LitKind::Bool),
            other => panic!("expected bool literal, got {other:?}"),
        }
    }
}

#[test]
fn number_literals_classify_by_base() {
    let (lexed, msg, interner) = lex_src("42 0b101 0o17 0xFF 1.5 1e9 2.5e-3");
    assert!(msg.is_empty(), "unexpected messages: {:?}", msg.as_slice());
    let expected = [
        (LitKind::Dec, "42"),
        (LitKind::Bin, "0b101"),
        (LitKind::Oct, "0o17"),
        (LitKind::Hex, "0xFF"),
        (LitKind::Float, "1.5"),
        (LitKind::Float, "1e9"),
        (LitKind::Float, "2.5e-3"),
    ];
    let visible = visible(&lexed.tokens);
    assert_eq!(visible.len(), expected.len());
    for (token, (kind, text)) in visible.iter().zip(expected) {
        let lit = token.lit().expect("literal token");
        assert_eq!(lit.kind, kind);
        assert_eq!(interner.resolve(lit.sym), text);
    }
}

#[test]
fn adjacent_identifier_becomes_literal_suffix() {
    let (lexed, msg, interner) = lex_src("123u32 1.5f32 0xFFu8 90 u32");
    assert!(msg.is_empty());
    let visible = visible(&lexed.tokens);
    assert_eq!(visible.len(), 5);

    let suffixed = [(0, "123", "u32"), (1, "1.5", "f32"), (2, "0xFF", "u8")];
    for (idx, text, suffix) in suffixed {
        let lit = visible[idx].lit().expect("literal");
        assert_eq!(interner.resolve(lit.sym), text);
        assert_eq!(interner.resolve(lit.suffix.expect("suffix")), suffix);
    }

    // Separated by a space: no suffix folding.
    let plain = visible[3].lit().expect("literal");
    assert!(plain.suffix.is_none());
    assert!(matches!(visible[4].kind, TokenKind::Id(_)));
}

#[test]
fn invalid_digit_for_base_is_reported() {
    let (_, msg, _) = lex_src("0b12");
    assert_eq!(msg.error_count(), 1);
    assert!(msg.as_slice()[0].text.contains("base-2"));

    let (_, msg, _) = lex_src("0o8");
    assert_eq!(msg.error_count(), 1);
    assert!(msg.as_slice()[0].text.contains("base-8"));
}

#[test]
fn missing_base_digits_is_reported() {
    let (_, msg, _) = lex_src("0x");
    assert_eq!(msg.error_count(), 1);
    assert!(msg.as_slice()[0].text.contains("missing digits"));
}

#[test]
fn strings_and_escapes() {
    let (lexed, msg, interner) = lex_src(r#""plain" "with \"escape\"" 'single'"#);
    assert!(msg.is_empty(), "unexpected: {:?}", msg.as_slice());
    let visible = visible(&lexed.tokens);
    let first = visible[0].lit().unwrap();
    assert_eq!(first.kind, LitKind::DQStr);
    assert_eq!(interner.resolve(first.sym), "plain");
    let second = visible[1].lit().unwrap();
    assert_eq!(interner.resolve(second.sym), r#"with \"escape\""#);
    let third = visible[2].lit().unwrap();
    assert_eq!(third.kind, LitKind::SQStr);
    assert_eq!(interner.resolve(third.sym), "single");
}

#[test]
fn unknown_escape_is_reported() {
    let (_, msg, _) = lex_src(r#""bad \q escape""#);
    assert_eq!(msg.error_count(), 1);
    assert!(msg.as_slice()[0].text.contains("unknown escape"));
}

#[test]
fn unterminated_string_is_reported() {
    let (_, msg, _) = lex_src("\"never ends");
    assert_eq!(msg.error_count(), 1);
    assert!(msg.as_slice()[0].text.contains("unterminated"));
}

#[test]
fn unterminated_block_comment_is_reported() {
    let (lexed, msg, _) = lex_src("/* open forever");
    assert_eq!(msg.error_count(), 1);
    assert!(msg.as_slice()[0].text.contains("unterminated block comment"));
    // Still a (hidden) token covering the rest of the file.
    assert_eq!(kinds(&lexed.tokens)[0], TokenKind::BlockComment);
}

#[test]
fn lifetimes_vs_single_quoted_strings() {
    let (lexed, msg, interner) = lex_src("<'a> 'c'");
    assert!(msg.is_empty());
    let visible = visible(&lexed.tokens);
    assert!(matches!(visible[1].kind, TokenKind::Lifetime(sym) if interner.resolve(sym) == "a"));
    let lit = visible[3].lit().expect("char-like string");
    assert_eq!(lit.kind, LitKind::SQStr);
    assert_eq!(interner.resolve(lit.sym), "c");
}

#[test]
fn maximal_munch_on_operators() {
    let (lexed, msg, _) = lex_src("a <<= b <=> c ..= d ... e === f");
    assert!(msg.is_empty());
    let ops: Vec<TokenKind> = visible(&lexed.tokens)
        .iter()
        .filter(|t| t.ident().is_none())
        .map(|t| t.kind)
        .collect();
    assert_eq!(
        ops,
        vec![
            TokenKind::ShlAssign,
            TokenKind::Spaceship,
            TokenKind::RangeEq,
            TokenKind::Spread,
            TokenKind::RefEq,
        ]
    );
}

#[test]
fn garbage_coalesces_into_one_error_token() {
    let (lexed, msg, _) = lex_src("ok \u{1F980}\u{1F980} ok");
    assert_eq!(msg.error_count(), 1);
    let errors: Vec<&Token> = lexed
        .tokens
        .iter()
        .filter(|t| t.kind == TokenKind::Error)
        .collect();
    assert_eq!(errors.len(), 1);
}

#[test]
fn lex_internal_matches_full_lexing() {
    let src = "func f() { 1 + 2 }";
    let internal = lex_internal(src);
    let (lexed, _, _) = lex_src(src);
    assert_eq!(internal.len(), lexed.tokens.len());
    for (a, b) in internal.iter().zip(&lexed.tokens) {
        assert_eq!(a.span.lo(), b.span.lo());
        assert_eq!(a.span.hi(), b.span.hi());
    }
}
