//! Staged pipeline driver.
//!
//! Stages run strictly in order, each reading the session and writing
//! its outputs into it. A stage boundary with accumulated errors stops
//! the pipeline; partial artifacts stay available on the result for
//! inspection, and the configured compile depth can stop it early on
//! purpose.

use crate::ast;
use crate::diagnostics::MessageHolder;
use crate::hir;
use crate::lexer;
use crate::parser;
use crate::resolve;
use crate::session::{CompileDepth, Session};
use crate::token::Token;
use crate::validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Lexer,
    Parser,
    Validator,
    ModuleTree,
    Importer,
    NameResolution,
    Lowering,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Lexer => "lexer",
            Stage::Parser => "parser",
            Stage::Validator => "validator",
            Stage::ModuleTree => "module-tree",
            Stage::Importer => "importer",
            Stage::NameResolution => "name-resolution",
            Stage::Lowering => "lowering",
        }
    }
}

/// Everything a run produced; partial on failure or early stop.
#[derive(Debug)]
pub struct CompileResult {
    pub tokens: Vec<Token>,
    pub party: Option<ast::Party>,
    pub hir: Option<hir::Party>,
    pub messages: MessageHolder,
    /// First stage whose boundary was crossed with errors.
    pub failed_at: Option<Stage>,
}

impl CompileResult {
    pub fn is_ok(&self) -> bool {
        self.failed_at.is_none()
    }

    pub fn into_result(self) -> Result<Self, crate::Error> {
        match self.failed_at {
            Some(stage) => Err(crate::Error::StageFailed { stage }),
            None => Ok(self),
        }
    }
}

/// Run the front-end over one already-loaded source file.
pub fn compile(
    sess: &mut Session,
    path: &str,
    source: String,
    depth: CompileDepth,
) -> CompileResult {
    let mut messages = MessageHolder::new();

    // Lexer.
    let file = sess.source_map.register_source(path);
    let mut lex_msg = MessageHolder::new();
    let lexed = lexer::lex(&mut sess.interner, file, &source, &mut lex_msg);
    sess.source_map.set_file(file, source, lexed.newlines);
    let lex_failed = lex_msg.has_errors();
    messages.extend(lex_msg);
    if lex_failed {
        return CompileResult {
            tokens: lexed.tokens,
            party: None,
            hir: None,
            messages,
            failed_at: Some(Stage::Lexer),
        };
    }

    // Parser.
    let (party, parse_msg) = parser::parse(sess, file, lexed.tokens.clone());
    let parse_failed = parse_msg.has_errors();
    messages.extend(parse_msg);
    if parse_failed {
        return CompileResult {
            tokens: lexed.tokens,
            party: Some(party),
            hir: None,
            messages,
            failed_at: Some(Stage::Parser),
        };
    }

    // Validator.
    let validate_msg = validate::validate(&party);
    let validate_failed = validate_msg.has_errors();
    messages.extend(validate_msg);
    if validate_failed {
        return CompileResult {
            tokens: lexed.tokens,
            party: Some(party),
            hir: None,
            messages,
            failed_at: Some(Stage::Validator),
        };
    }

    if depth < CompileDepth::NameResolution {
        return CompileResult {
            tokens: lexed.tokens,
            party: Some(party),
            hir: None,
            messages,
            failed_at: None,
        };
    }

    // Module tree, importation, name resolution.
    for (stage, run) in [
        (
            Stage::ModuleTree,
            resolve::build_module_tree as fn(&mut Session, &ast::Party) -> MessageHolder,
        ),
        (Stage::Importer, resolve::resolve_imports),
        (Stage::NameResolution, resolve::resolve_names),
    ] {
        let stage_msg = run(sess, &party);
        let failed = stage_msg.has_errors();
        messages.extend(stage_msg);
        if failed {
            return CompileResult {
                tokens: lexed.tokens,
                party: Some(party),
                hir: None,
                messages,
                failed_at: Some(stage),
            };
        }
    }

    if depth < CompileDepth::Lowering {
        return CompileResult {
            tokens: lexed.tokens,
            party: Some(party),
            hir: None,
            messages,
            failed_at: None,
        };
    }

    // Lowering.
    let (hir_party, lower_msg) = hir::lower::lower(sess, &party);
    let lower_failed = lower_msg.has_errors();
    messages.extend(lower_msg);

    CompileResult {
        tokens: lexed.tokens,
        party: Some(party),
        hir: Some(hir_party),
        messages,
        failed_at: lower_failed.then_some(Stage::Lowering),
    }
}
