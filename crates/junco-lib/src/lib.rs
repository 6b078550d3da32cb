//! Junco compiler front-end.
//!
//! Takes source text through lexing, parsing, validation, module-tree
//! construction, importation, name resolution, and AST→HIR lowering,
//! accumulating diagnostics at every stage.
//!
//! # Example
//!
//! ```
//! use junco_lib::session::{CompileDepth, Session};
//! use junco_lib::stages;
//!
//! let mut sess = Session::new();
//! let result = stages::compile(
//!     &mut sess,
//!     "main.jc",
//!     "func main() {}".to_owned(),
//!     CompileDepth::Lowering,
//! );
//! assert!(result.is_ok());
//! ```

pub mod ast;
pub mod diagnostics;
pub mod hir;
pub mod lexer;
pub mod parser;
pub mod resolve;
pub mod session;
pub mod source_map;
pub mod span;
pub mod stages;
pub mod token;
pub mod validate;

#[cfg(test)]
mod lexer_tests;
#[cfg(test)]
mod stages_tests;

pub use diagnostics::{Label, LabelKind, Message, MessageHolder, MessagesPrinter, Severity};
pub use session::{CompileDepth, Session};
pub use stages::{CompileResult, Stage, compile};

/// Library-level failure surface for callers that want a hard stop
/// instead of inspecting partial artifacts.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    #[error("errors were emitted during the {} stage", stage.as_str())]
    StageFailed { stage: Stage },
}

pub type Result<T> = std::result::Result<T, Error>;
