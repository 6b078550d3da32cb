//! Drives the staged pipeline and prints requested artifacts.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use junco_lib::ast::printer::AstPrinter;
use junco_lib::hir::printer::HirPrinter;
use junco_lib::resolve::printer as resolve_printer;
use junco_lib::session::Session;
use junco_lib::stages::{self, CompileResult};
use junco_lib::token::{Token, TokenKind};

use crate::args::{Args, LogLevel, PrintKind};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("cannot read `{path}`: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Returns the process exit code.
pub fn run(args: &Args) -> Result<i32, Error> {
    let path = args.entry.display().to_string();
    let source = fs::read_to_string(&args.entry).map_err(|source| Error::ReadFile {
        path: path.clone(),
        source,
    })?;

    if args.log_level <= LogLevel::Info {
        eprintln!("compiling `{path}`");
    }

    let mut sess = Session::new();
    let result = stages::compile(&mut sess, &path, source, args.compile_depth.into());

    print_artifacts(args, &sess, &result);

    if !result.messages.is_empty() || args.wants(PrintKind::Messages) {
        let rendered = result.messages.printer(&sess.source_map).colored(true).render();
        if !rendered.is_empty() {
            eprintln!("{rendered}");
        }
    }

    // Dev mode always reports the run shape, even without `--print`.
    if args.wants(PrintKind::Summary) || args.dev {
        print_summary(&sess, &result);
    }

    Ok(if result.messages.has_errors() { 1 } else { 0 })
}

fn print_artifacts(args: &Args, sess: &Session, result: &CompileResult) {
    if args.wants(PrintKind::DirTree) {
        print!("{}", dir_tree(sess));
    }

    if args.wants(PrintKind::Source) {
        for file in sess.source_map.files() {
            println!("// {}", sess.source_map.path(file));
            println!("{}", sess.source_map.source(file));
        }
    }

    if args.wants(PrintKind::Tokens) {
        print_tokens(sess, &result.tokens);
    }

    if let Some(party) = &result.party {
        if args.wants(PrintKind::Ast) {
            if args.json {
                match serde_json::to_string_pretty(party) {
                    Ok(json) => println!("{json}"),
                    Err(err) => eprintln!("cannot serialize AST: {err}"),
                }
            } else {
                print!("{}", AstPrinter::new(sess).print(party));
            }
        }
        if args.wants(PrintKind::AstNames) {
            print!("{}", AstPrinter::new(sess).names_only().print(party));
        }
    }

    if args.wants(PrintKind::ModTree) {
        print!("{}", resolve_printer::print_module_tree(sess));
    }
    if args.wants(PrintKind::Ribs) {
        print!("{}", resolve_printer::print_ribs(sess));
    }
    if args.wants(PrintKind::Definitions) {
        print!("{}", resolve_printer::print_definitions(sess));
    }
    if args.wants(PrintKind::Resolutions) {
        print!("{}", resolve_printer::print_resolutions(sess));
    }

    if let Some(hir) = &result.hir {
        if args.wants(PrintKind::Hir) {
            if args.json {
                match serde_json::to_string_pretty(hir) {
                    Ok(json) => println!("{json}"),
                    Err(err) => eprintln!("cannot serialize HIR: {err}"),
                }
            } else {
                print!("{}", HirPrinter::new(sess, hir).print());
            }
        }
    }
}

/// `--print=dir-tree`: the loaded source files grouped by directory.
/// File discovery itself happens out here in the driver, so this stays a
/// view of what was actually registered with the session.
fn dir_tree(sess: &Session) -> String {
    let mut dirs: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for file in sess.source_map.files() {
        let path = Path::new(sess.source_map.path(file));
        let dir = path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .map(|parent| parent.display().to_string())
            .unwrap_or_else(|| ".".into());
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        dirs.entry(dir).or_default().push(name);
    }

    let mut out = String::new();
    for (dir, mut files) in dirs {
        files.sort();
        out.push_str(&dir);
        out.push('\n');
        for (idx, name) in files.iter().enumerate() {
            let branch = if idx + 1 == files.len() {
                "└── "
            } else {
                "├── "
            };
            out.push_str(branch);
            out.push_str(name);
            out.push('\n');
        }
    }
    out
}

fn print_tokens(sess: &Session, tokens: &[Token]) {
    for token in tokens {
        let text = match token.kind {
            TokenKind::Eof => "<eof>".into(),
            TokenKind::Kw(kw) => format!("kw `{}`", kw.as_str()),
            TokenKind::Id(sym) => format!("id `{}`", sess.interner.resolve(sym)),
            TokenKind::Lifetime(sym) => format!("lifetime `'{}`", sess.interner.resolve(sym)),
            TokenKind::Lit(lit) => {
                let suffix = lit
                    .suffix
                    .map(|suffix| format!(" suffix `{}`", sess.interner.resolve(suffix)))
                    .unwrap_or_default();
                format!(
                    "lit {:?} `{}`{suffix}",
                    lit.kind,
                    sess.interner.resolve(lit.sym)
                )
            }
            kind => match kind.spelling() {
                Some(spelling) => format!("`{spelling}`"),
                None => format!("{kind:?}"),
            },
        };
        println!("{:>5}..{:<5} {text}", token.span.lo(), token.span.hi());
    }
}

fn print_summary(sess: &Session, result: &CompileResult) {
    println!("files:       {}", sess.source_map.len());
    println!("nodes:       {}", sess.node_count());
    println!("definitions: {}", sess.def_table.size());
    println!("modules:     {}", sess.modules.len());
    println!("resolutions: {}", sess.resolutions.len());
    println!(
        "messages:    {} ({} errors, {} warnings)",
        result.messages.len(),
        result.messages.error_count(),
        result.messages.warn_count()
    );
    match result.failed_at {
        Some(stage) => println!("stopped at:  {}", stage.as_str()),
        None => println!("stopped at:  <completed>"),
    }
}
