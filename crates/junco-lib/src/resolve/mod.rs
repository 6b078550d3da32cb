//! Name-space model and resolution.
//!
//! Four passes share this module: the module-tree builder allocates
//! definitions and per-namespace bindings, the importer expands `use`
//! declarations into aliases, the path resolver turns paths into
//! resolutions, and the name resolver drives it over every reference in
//! the AST.

mod build;
mod def;
mod import;
mod module;
mod path;
pub mod printer;
mod res;
mod resolver;
mod rib;

#[cfg(test)]
mod tests;

pub use build::build_module_tree;
pub use def::{Def, DefId, DefKind, DefTable, FOSId, FosRedefs, NameBinding, Namespace, PerNS, Vis};
pub use import::resolve_imports;
pub use module::{Module, ModuleId, ModuleKind, ModuleTree, PrimType, PrimTypeSet};
pub use path::{PathError, PathOutcome, PathResolver, ResMode, Seg};
pub use res::{Res, Resolutions};
pub use resolver::resolve_names;
pub use rib::{Rib, RibKind, RibSnapshot};
