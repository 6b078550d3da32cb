//! Token model.
//!
//! Hidden tokens (whitespace, tabs, newlines, comments) are real tokens
//! in the stream so that concatenating every token's text reproduces the
//! source byte-for-byte; the parser skips them.

use serde::Serialize;

use junco_core::{Kw, Symbol};

use crate::span::Span;

/// Classification of a literal token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LitKind {
    Bool,
    Dec,
    Bin,
    Oct,
    Hex,
    Float,
    /// Single-quoted string.
    SQStr,
    /// Double-quoted string.
    DQStr,
}

/// Literal payload: kind, interned source text (quotes excluded for
/// strings), and the optional suffix (`123u32` carries suffix `u32`).
/// Suffixes are not evaluated here; a later pass does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TokenLit {
    pub kind: LitKind,
    pub sym: Symbol,
    pub suffix: Option<Symbol>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TokenKind {
    /// Unlexable garbage; consecutive bad characters coalesce into one.
    Error,
    Eof,

    // Hidden //
    Whitespace,
    Tab,
    NL,
    LineComment,
    BlockComment,

    Lit(TokenLit),
    Id(Symbol),
    Kw(Kw),
    /// Lifetime identifier, without the leading `'`.
    Lifetime(Symbol),

    // Operators //
    Assign,       // =
    AddAssign,    // +=
    SubAssign,    // -=
    MulAssign,    // *=
    DivAssign,    // /=
    ModAssign,    // %=
    PowerAssign,  // **=
    ShlAssign,    // <<=
    ShrAssign,    // >>=
    BitAndAssign, // &=
    BitOrAssign,  // |=
    XorAssign,    // ^=
    Add,          // +
    Sub,          // -
    Mul,          // *
    Div,          // /
    Rem,          // %
    Power,        // **
    Shl,          // <<
    Shr,          // >>
    Ampersand,    // &
    BitOr,        // |
    Xor,          // ^
    Inv,          // ~
    Eq,           // ==
    NotEq,        // !=
    LAngle,       // <
    RAngle,       // >
    Le,           // <=
    Ge,           // >=
    Spaceship,    // <=>
    RefEq,        // ===
    RefNotEq,     // !==
    Range,        // ..
    RangeEq,      // ..=
    Dot,          // .

    Path,      // ::
    Spread,    // ...
    Pipe,      // |>
    Dollar,    // $
    At,        // @
    Backslash, // \

    // Punctuation //
    Semi,        // ;
    Arrow,       // ->
    DoubleArrow, // =>
    LParen,      // (
    RParen,      // )
    LBrace,      // {
    RBrace,      // }
    LBracket,    // [
    RBracket,    // ]
    Comma,       // ,
    Colon,       // :
    Quest,       // ?
    Backtick,    // `
}

impl TokenKind {
    /// Fixed spelling of tag-only tokens; payload-carrying and hidden
    /// kinds have none.
    pub fn spelling(self) -> Option<&'static str> {
        use TokenKind::*;
        Some(match self {
            Assign => "=",
            AddAssign => "+=",
            SubAssign => "-=",
            MulAssign => "*=",
            DivAssign => "/=",
            ModAssign => "%=",
            PowerAssign => "**=",
            ShlAssign => "<<=",
            ShrAssign => ">>=",
            BitAndAssign => "&=",
            BitOrAssign => "|=",
            XorAssign => "^=",
            Add => "+",
            Sub => "-",
            Mul => "*",
            Div => "/",
            Rem => "%",
            Power => "**",
            Shl => "<<",
            Shr => ">>",
            Ampersand => "&",
            BitOr => "|",
            Xor => "^",
            Inv => "~",
            Eq => "==",
            NotEq => "!=",
            LAngle => "<",
            RAngle => ">",
            Le => "<=",
            Ge => ">=",
            Spaceship => "<=>",
            RefEq => "===",
            RefNotEq => "!==",
            Range => "..",
            RangeEq => "..=",
            Dot => ".",
            Path => "::",
            Spread => "...",
            Pipe => "|>",
            Dollar => "$",
            At => "@",
            Backslash => "\\",
            Semi => ";",
            Arrow => "->",
            DoubleArrow => "=>",
            LParen => "(",
            RParen => ")",
            LBrace => "{",
            RBrace => "}",
            LBracket => "[",
            RBracket => "]",
            Comma => ",",
            Colon => ":",
            Quest => "?",
            Backtick => "`",
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Hidden tokens are preserved in the stream but invisible to the
    /// parser.
    pub fn is_hidden(self) -> bool {
        matches!(
            self.kind,
            TokenKind::Whitespace
                | TokenKind::Tab
                | TokenKind::NL
                | TokenKind::LineComment
                | TokenKind::BlockComment
        )
    }

    pub fn is(self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    pub fn is_kw(self, kw: Kw) -> bool {
        matches!(self.kind, TokenKind::Kw(k) if k == kw)
    }

    pub fn is_eof(self) -> bool {
        self.kind == TokenKind::Eof
    }

    pub fn is_literal(self) -> bool {
        matches!(self.kind, TokenKind::Lit(_))
    }

    pub fn ident(self) -> Option<Symbol> {
        match self.kind {
            TokenKind::Id(sym) => Some(sym),
            _ => None,
        }
    }

    pub fn lit(self) -> Option<TokenLit> {
        match self.kind {
            TokenKind::Lit(lit) => Some(lit),
            _ => None,
        }
    }

    pub fn is_assign_op(self) -> bool {
        use TokenKind::*;
        matches!(
            self.kind,
            Assign
                | AddAssign
                | SubAssign
                | MulAssign
                | DivAssign
                | ModAssign
                | PowerAssign
                | ShlAssign
                | ShrAssign
                | BitAndAssign
                | BitOrAssign
                | XorAssign
        )
    }
}
