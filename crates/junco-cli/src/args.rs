//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use junco_lib::CompileDepth;

#[derive(Debug, Parser)]
#[command(name = "junco", version, about = "Junco compiler front-end")]
pub struct Args {
    /// Entry source file (`.jc`).
    pub entry: PathBuf,

    /// Stop the pipeline after this stage.
    #[arg(long, value_enum, default_value = "lowering")]
    pub compile_depth: DepthArg,

    /// Artifacts to print, comma separated.
    #[arg(long, value_enum, value_delimiter = ',')]
    pub print: Vec<PrintKind>,

    /// Print artifacts as JSON where supported.
    #[arg(long)]
    pub json: bool,

    /// Developer mode: keep going after stage failures where possible
    /// and include extra context in dumps.
    #[arg(long)]
    pub dev: bool,

    /// Verbosity of driver chatter on stderr.
    #[arg(long, value_enum, default_value = "warn")]
    pub log_level: LogLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DepthArg {
    Parser,
    NameResolution,
    Lowering,
}

impl From<DepthArg> for CompileDepth {
    fn from(depth: DepthArg) -> Self {
        match depth {
            DepthArg::Parser => CompileDepth::Parser,
            DepthArg::NameResolution => CompileDepth::NameResolution,
            DepthArg::Lowering => CompileDepth::Lowering,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PrintKind {
    DirTree,
    Source,
    Tokens,
    Ast,
    AstNames,
    ModTree,
    Ribs,
    Definitions,
    Resolutions,
    Hir,
    Messages,
    Summary,
    All,
}

impl Args {
    pub fn wants(&self, kind: PrintKind) -> bool {
        self.print.contains(&kind) || self.print.contains(&PrintKind::All)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}
