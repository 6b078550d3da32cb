//! Lexer.
//!
//! Tokenization is logos-driven: a raw token enum recognizes shapes, and
//! a post-processing pass interns identifier and literal text, retags
//! keywords, folds adjacent identifiers into literal suffixes, validates
//! base digits and string escapes, and coalesces unlexable characters
//! into single `Error` tokens.
//!
//! The stream preserves hidden trivia and ends with `Eof`; concatenating
//! the text of every token (errors included) reproduces the source.

use logos::Logos;

use junco_core::{Interner, Kw};

use crate::diagnostics::MessageHolder;
use crate::span::{FileId, Span};
use crate::token::{LitKind, Token, TokenKind, TokenLit};

/// Tokens plus the newline offset table for the source map.
#[derive(Debug, Clone)]
pub struct LexedFile {
    pub tokens: Vec<Token>,
    pub newlines: Vec<u32>,
}

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum RawToken {
    #[regex(r"[ \r]+")]
    Whitespace,
    #[regex(r"\t+")]
    Tab,
    #[token("\n")]
    Newline,
    #[regex(r"//[^\n]*", allow_greedy = true)]
    LineComment,
    #[token("/*", block_comment)]
    BlockComment,

    // Number shapes. Based literals accept any hex-ish digit run so that
    // `0b12` lexes as one token and the bad digit is a diagnostic, not a
    // token split.
    #[regex(r"[0-9][0-9_]*\.[0-9][0-9_]*([eE][+-]?[0-9][0-9_]*)?")]
    #[regex(r"[0-9][0-9_]*[eE][+-]?[0-9][0-9_]*")]
    Float,
    #[regex(r"0[bB][0-9a-fA-F_]*")]
    Bin,
    #[regex(r"0[oO][0-9a-fA-F_]*")]
    Oct,
    #[regex(r"0[xX][0-9a-fA-F_]*")]
    Hex,
    #[regex(r"[0-9][0-9_]*")]
    Dec,

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,
    // `'a'` is a string (longest match); `'a` with no closing quote is a
    // lifetime.
    #[regex(r"'[a-zA-Z_][a-zA-Z0-9_]*")]
    Lifetime,
    #[regex(r"'([^'\\\n]|\\[^\n])*'")]
    SQString,
    #[token("\"", dq_string)]
    DQString,

    // Operators, longest spelling wins.
    #[token("=")]
    Assign,
    #[token("+=")]
    AddAssign,
    #[token("-=")]
    SubAssign,
    #[token("*=")]
    MulAssign,
    #[token("/=")]
    DivAssign,
    #[token("%=")]
    ModAssign,
    #[token("**=")]
    PowerAssign,
    #[token("<<=")]
    ShlAssign,
    #[token(">>=")]
    ShrAssign,
    #[token("&=")]
    BitAndAssign,
    #[token("|=")]
    BitOrAssign,
    #[token("^=")]
    XorAssign,
    #[token("+")]
    Add,
    #[token("-")]
    Sub,
    #[token("*")]
    Mul,
    #[token("/")]
    Div,
    #[token("%")]
    Rem,
    #[token("**")]
    Power,
    #[token("<<")]
    Shl,
    #[token(">>")]
    Shr,
    #[token("&")]
    Ampersand,
    #[token("|")]
    BitOr,
    #[token("^")]
    Xor,
    #[token("~")]
    Inv,
    #[token("==")]
    Eq,
    #[token("!=")]
    NotEq,
    #[token("<")]
    LAngle,
    #[token(">")]
    RAngle,
    #[token("<=")]
    Le,
    #[token(">=")]
    Ge,
    #[token("<=>")]
    Spaceship,
    #[token("===")]
    RefEq,
    #[token("!==")]
    RefNotEq,
    #[token("..")]
    Range,
    #[token("..=")]
    RangeEq,
    #[token(".")]
    Dot,
    #[token("::")]
    PathSep,
    #[token("...")]
    Spread,
    #[token("|>")]
    Pipe,
    #[token("$")]
    Dollar,
    #[token("@")]
    At,
    #[token("\\")]
    Backslash,
    #[token(";")]
    Semi,
    #[token("->")]
    Arrow,
    #[token("=>")]
    DoubleArrow,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token("?")]
    Quest,
    #[token("`")]
    Backtick,
}

/// Consume a block comment body. Block comments do not nest; an
/// unterminated comment swallows the rest of the file and is reported in
/// post-processing.
fn block_comment(lex: &mut logos::Lexer<'_, RawToken>) -> bool {
    let rest = lex.remainder();
    match rest.find("*/") {
        Some(end) => lex.bump(end + 2),
        None => lex.bump(rest.len()),
    }
    true
}

/// Consume a double-quoted string body through the first unescaped `"`,
/// or to end of file when unterminated.
fn dq_string(lex: &mut logos::Lexer<'_, RawToken>) -> bool {
    let bytes = lex.remainder().as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'"' => {
                lex.bump(i + 1);
                return true;
            }
            _ => i += 1,
        }
    }
    lex.bump(bytes.len());
    true
}

struct LexCtx<'a, 'm> {
    interner: &'a mut Interner,
    file: FileId,
    src: &'a str,
    msg: &'m mut MessageHolder,
    tokens: Vec<Token>,
}

impl LexCtx<'_, '_> {
    fn span(&self, range: std::ops::Range<usize>) -> Span {
        Span::from_bounds(self.file, range.start as u32, range.end as u32)
    }

    fn push(&mut self, kind: TokenKind, range: std::ops::Range<usize>) {
        self.tokens.push(Token::new(kind, self.span(range)));
    }

    fn push_lit(&mut self, kind: LitKind, text: &str, range: std::ops::Range<usize>) {
        let sym = self.interner.intern(text);
        self.push(
            TokenKind::Lit(TokenLit {
                kind,
                sym,
                suffix: None,
            }),
            range,
        );
    }

    /// Fold an identifier directly adjacent to a numeric literal into
    /// that literal's suffix (`123u32`, `1.5f32`).
    fn try_fold_suffix(&mut self, ident_range: &std::ops::Range<usize>) -> bool {
        let Some(prev) = self.tokens.last_mut() else {
            return false;
        };
        let TokenKind::Lit(lit) = &mut prev.kind else {
            return false;
        };
        if lit.suffix.is_some()
            || !matches!(
                lit.kind,
                LitKind::Dec | LitKind::Bin | LitKind::Oct | LitKind::Hex | LitKind::Float
            )
            || prev.span.hi() != ident_range.start as u32
        {
            return false;
        }
        lit.suffix = Some(self.interner.intern(&self.src[ident_range.clone()]));
        prev.span = Span::from_bounds(prev.span.file, prev.span.lo(), ident_range.end as u32);
        true
    }

    fn lex_based(&mut self, kind: LitKind, range: std::ops::Range<usize>) {
        let text = &self.src[range.clone()];
        let digits = &text[2..];
        let digit_ok: fn(char) -> bool = match kind {
            LitKind::Bin => |c| matches!(c, '0' | '1' | '_'),
            LitKind::Oct => |c| matches!(c, '0'..='7' | '_'),
            _ => |c| c.is_ascii_hexdigit() || c == '_',
        };
        let base = match kind {
            LitKind::Bin => 2,
            LitKind::Oct => 8,
            _ => 16,
        };
        if let Some((off, bad)) = digits.char_indices().find(|&(_, c)| !digit_ok(c)) {
            let at = range.start + 2 + off;
            let span = self.span(at..at + bad.len_utf8());
            self.msg
                .error(format!("invalid digit `{bad}` for base-{base} integer literal"))
                .primary(span, "not a valid digit")
                .emit();
        } else if digits.chars().all(|c| c == '_') {
            let span = self.span(range.clone());
            self.msg
                .error(format!("missing digits in base-{base} integer literal"))
                .primary(span, "expected digits after the base prefix")
                .emit();
        }
        self.push_lit(kind, text, range);
    }

    fn lex_dq_string(&mut self, range: std::ops::Range<usize>) {
        let text = &self.src[range.clone()];
        let body = &text[1..];
        let terminated = scan_closes(body, b'"');
        let content = if terminated {
            &text[1..text.len() - 1]
        } else {
            let open = range.start;
            let span = self.span(open..open + 1);
            self.msg
                .error("unterminated double-quoted string")
                .primary(span, "string starts here and never ends")
                .emit();
            body
        };
        self.validate_escapes(content, range.start + 1);
        self.push_lit(LitKind::DQStr, content, range);
    }

    fn lex_sq_string(&mut self, range: std::ops::Range<usize>) {
        let text = &self.src[range.clone()];
        let content = &text[1..text.len() - 1];
        self.validate_escapes(content, range.start + 1);
        self.push_lit(LitKind::SQStr, content, range);
    }

    fn validate_escapes(&mut self, content: &str, base: usize) {
        let bytes = content.as_bytes();
        let mut i = 0;
        while i < bytes.len() {
            if bytes[i] != b'\\' {
                i += 1;
                continue;
            }
            let Some(&esc) = bytes.get(i + 1) else {
                break;
            };
            match esc {
                b'\\' | b'"' | b'\'' | b'n' | b'r' | b't' | b'0' => i += 2,
                b'x' => {
                    let hex_ok = bytes.get(i + 2).is_some_and(u8::is_ascii_hexdigit)
                        && bytes.get(i + 3).is_some_and(u8::is_ascii_hexdigit);
                    if !hex_ok {
                        let span = self.span(base + i..base + i + 2);
                        self.msg
                            .error("invalid `\\x` escape: expected two hex digits")
                            .primary(span, "invalid escape")
                            .emit();
                    }
                    i += 4;
                }
                _ => {
                    let end = base + i + 1 + char_len(bytes, i + 1);
                    let span = self.span(base + i..end);
                    self.msg
                        .error(format!(
                            "unknown escape sequence `\\{}`",
                            content[i + 1..].chars().next().unwrap_or('?')
                        ))
                        .primary(span, "unknown escape")
                        .emit();
                    i += 2;
                }
            }
        }
    }

    fn lex_ident(&mut self, range: std::ops::Range<usize>) {
        if self.try_fold_suffix(&range) {
            return;
        }
        let text = &self.src[range.clone()];
        let sym = self.interner.intern(text);
        let kind = match self.interner.as_keyword(text) {
            Some(Kw::True) | Some(Kw::False) => TokenKind::Lit(TokenLit {
                kind: LitKind::Bool,
                sym,
                suffix: None,
            }),
            Some(kw) => TokenKind::Kw(kw),
            None => TokenKind::Id(sym),
        };
        self.push(kind, range);
    }
}

fn char_len(bytes: &[u8], at: usize) -> usize {
    let b = bytes[at];
    if b < 0x80 {
        1
    } else if b < 0xE0 {
        2
    } else if b < 0xF0 {
        3
    } else {
        4
    }
}

/// Whether a quote-opened body reaches an unescaped closing quote.
fn scan_closes(body: &str, quote: u8) -> bool {
    let bytes = body.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b if b == quote => return true,
            _ => i += 1,
        }
    }
    false
}

/// Tokenize one source file, reporting lexical errors into `msg`.
pub fn lex(
    interner: &mut Interner,
    file: FileId,
    src: &str,
    msg: &mut MessageHolder,
) -> LexedFile {
    let newlines = src
        .bytes()
        .enumerate()
        .filter(|&(_, b)| b == b'\n')
        .map(|(i, _)| i as u32)
        .collect();

    let mut ctx = LexCtx {
        interner,
        file,
        src,
        msg,
        tokens: Vec::new(),
    };

    let mut lexer = RawToken::lexer(src);
    let mut error_start: Option<usize> = None;

    while let Some(result) = lexer.next() {
        let range = lexer.span();
        match result {
            Ok(raw) => {
                if let Some(start) = error_start.take() {
                    ctx.flush_garbage(start..range.start);
                }
                ctx.dispatch(raw, range);
            }
            Err(()) => {
                if error_start.is_none() {
                    error_start = Some(range.start);
                }
            }
        }
    }
    if let Some(start) = error_start.take() {
        ctx.flush_garbage(start..src.len());
    }

    ctx.tokens.push(Token::new(
        TokenKind::Eof,
        Span::from_bounds(file, src.len() as u32, src.len() as u32),
    ));

    LexedFile {
        tokens: ctx.tokens,
        newlines,
    }
}

/// Tokenize a bare string without diagnostics or session state.
/// Used for syntax highlighting; symbols come from a throwaway interner.
pub fn lex_internal(src: &str) -> Vec<Token> {
    let mut interner = Interner::new();
    let mut msg = MessageHolder::new();
    lex(&mut interner, FileId::DUMMY, src, &mut msg).tokens
}

impl LexCtx<'_, '_> {
    fn flush_garbage(&mut self, range: std::ops::Range<usize>) {
        let text = &self.src[range.clone()];
        let span = self.span(range.clone());
        self.msg
            .error(format!("unknown character sequence `{text}`"))
            .primary(span, "cannot be lexed")
            .emit();
        self.push(TokenKind::Error, range);
    }

    fn dispatch(&mut self, raw: RawToken, range: std::ops::Range<usize>) {
        use RawToken as R;
        match raw {
            R::Whitespace => self.push(TokenKind::Whitespace, range),
            R::Tab => self.push(TokenKind::Tab, range),
            R::Newline => self.push(TokenKind::NL, range),
            R::LineComment => self.push(TokenKind::LineComment, range),
            R::BlockComment => {
                if !self.src[range.clone()].ends_with("*/") || range.len() < 4 {
                    let span = self.span(range.start..range.start + 2);
                    self.msg
                        .error("unterminated block comment")
                        .primary(span, "comment starts here and never ends")
                        .emit();
                }
                self.push(TokenKind::BlockComment, range);
            }
            R::Float => {
                let text = &self.src[range.clone()];
                self.push_lit(LitKind::Float, text, range);
            }
            R::Bin => self.lex_based(LitKind::Bin, range),
            R::Oct => self.lex_based(LitKind::Oct, range),
            R::Hex => self.lex_based(LitKind::Hex, range),
            R::Dec => {
                let text = &self.src[range.clone()];
                self.push_lit(LitKind::Dec, text, range);
            }
            R::Ident => self.lex_ident(range),
            R::Lifetime => {
                let sym = self.interner.intern(&self.src[range.start + 1..range.end]);
                self.push(TokenKind::Lifetime(sym), range);
            }
            R::SQString => self.lex_sq_string(range),
            R::DQString => self.lex_dq_string(range),
            R::Assign => self.push(TokenKind::Assign, range),
            R::AddAssign => self.push(TokenKind::AddAssign, range),
            R::SubAssign => self.push(TokenKind::SubAssign, range),
            R::MulAssign => self.push(TokenKind::MulAssign, range),
            R::DivAssign => self.push(TokenKind::DivAssign, range),
            R::ModAssign => self.push(TokenKind::ModAssign, range),
            R::PowerAssign => self.push(TokenKind::PowerAssign, range),
            R::ShlAssign => self.push(TokenKind::ShlAssign, range),
            R::ShrAssign => self.push(TokenKind::ShrAssign, range),
            R::BitAndAssign => self.push(TokenKind::BitAndAssign, range),
            R::BitOrAssign => self.push(TokenKind::BitOrAssign, range),
            R::XorAssign => self.push(TokenKind::XorAssign, range),
            R::Add => self.push(TokenKind::Add, range),
            R::Sub => self.push(TokenKind::Sub, range),
            R::Mul => self.push(TokenKind::Mul, range),
            R::Div => self.push(TokenKind::Div, range),
            R::Rem => self.push(TokenKind::Rem, range),
            R::Power => self.push(TokenKind::Power, range),
            R::Shl => self.push(TokenKind::Shl, range),
            R::Shr => self.push(TokenKind::Shr, range),
            R::Ampersand => self.push(TokenKind::Ampersand, range),
            R::BitOr => self.push(TokenKind::BitOr, range),
            R::Xor => self.push(TokenKind::Xor, range),
            R::Inv => self.push(TokenKind::Inv, range),
            R::Eq => self.push(TokenKind::Eq, range),
            R::NotEq => self.push(TokenKind::NotEq, range),
            R::LAngle => self.push(TokenKind::LAngle, range),
            R::RAngle => self.push(TokenKind::RAngle, range),
            R::Le => self.push(TokenKind::Le, range),
            R::Ge => self.push(TokenKind::Ge, range),
            R::Spaceship => self.push(TokenKind::Spaceship, range),
            R::RefEq => self.push(TokenKind::RefEq, range),
            R::RefNotEq => self.push(TokenKind::RefNotEq, range),
            R::Range => self.push(TokenKind::Range, range),
            R::RangeEq => self.push(TokenKind::RangeEq, range),
            R::Dot => self.push(TokenKind::Dot, range),
            R::PathSep => self.push(TokenKind::Path, range),
            R::Spread => self.push(TokenKind::Spread, range),
            R::Pipe => self.push(TokenKind::Pipe, range),
            R::Dollar => self.push(TokenKind::Dollar, range),
            R::At => self.push(TokenKind::At, range),
            R::Backslash => self.push(TokenKind::Backslash, range),
            R::Semi => self.push(TokenKind::Semi, range),
            R::Arrow => self.push(TokenKind::Arrow, range),
            R::DoubleArrow => self.push(TokenKind::DoubleArrow, range),
            R::LParen => self.push(TokenKind::LParen, range),
            R::RParen => self.push(TokenKind::RParen, range),
            R::LBrace => self.push(TokenKind::LBrace, range),
            R::RBrace => self.push(TokenKind::RBrace, range),
            R::LBracket => self.push(TokenKind::LBracket, range),
            R::RBracket => self.push(TokenKind::RBracket, range),
            R::Comma => self.push(TokenKind::Comma, range),
            R::Colon => self.push(TokenKind::Colon, range),
            R::Quest => self.push(TokenKind::Quest, range),
            R::Backtick => self.push(TokenKind::Backtick, range),
        }
    }
}
