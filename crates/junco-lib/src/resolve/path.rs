//! Path resolution.
//!
//! One routine serves both the importer (`Descend` mode, where the
//! final segment is itself a module) and the name resolver (`Specific`
//! mode, where the final segment must bind in the requested namespace).
//! The first segment of a relative path is looked up lexically through
//! the rib stack, then by ascending the module tree; later segments
//! look only inside the previous segment's module, with visibility
//! checked from the caller's perspective.

use junco_core::{Interner, Kw, Symbol};

use crate::ast::NodeId;
use crate::diagnostics::MessageHolder;
use crate::span::Span;

use super::def::{DefTable, NameBinding, Namespace, PerNS};
use super::module::{ModuleId, ModuleTree, PrimType};
use super::res::Res;
use super::rib::Rib;

/// Resolution mode of [`resolve_path`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResMode {
    /// The final segment must bind in the requested namespace; function
    /// overload sets are narrowed by an optional call-suffix hint.
    Specific,
    /// `use` pre-resolution: the final segment may itself be a module,
    /// which is returned.
    Descend,
}

/// A path segment reduced to what resolution needs.
#[derive(Debug, Clone, Copy)]
pub struct Seg {
    pub sym: Symbol,
    pub span: Span,
}

/// Successful resolution outcome.
#[derive(Debug, Clone, Copy)]
pub enum PathOutcome {
    Res(Res),
    Module(ModuleId),
}

/// Failure classes; the caller decides whether to report.
#[derive(Debug, Clone)]
pub enum PathError {
    CannotFind {
        name: Symbol,
        span: Span,
    },
    CannotFindSuffix {
        suffix: Symbol,
        span: Span,
    },
    Inaccessible {
        name: Symbol,
        span: Span,
        def_span: Span,
    },
    WrongNs {
        name: Symbol,
        span: Span,
        expected: Namespace,
        /// Bindings of the same name in other namespaces, for
        /// suggestions.
        alt: Vec<(Namespace, NameBinding)>,
    },
    NotModule {
        name: Symbol,
        span: Span,
    },
}

/// Shared read context for path resolution.
pub struct PathResolver<'a> {
    pub def_table: &'a DefTable,
    pub modules: &'a ModuleTree,
    pub interner: &'a Interner,
}

impl<'a> PathResolver<'a> {
    pub fn resolve(
        &self,
        start: ModuleId,
        target_ns: Namespace,
        global: bool,
        segs: &[Seg],
        suffix: Option<Symbol>,
        mode: ResMode,
        ribs: &[Rib],
    ) -> Result<PathOutcome, PathError> {
        let mut search_mod = if global { ModuleTree::ROOT } else { start };

        if segs.is_empty() {
            return Ok(PathOutcome::Module(search_mod));
        }

        let single = segs.len() == 1;
        let mut binding: Option<NameBinding> = None;

        for (idx, seg) in segs.iter().enumerate() {
            let first = idx == 0;
            let last = idx == segs.len() - 1;
            let ns = if last { target_ns } else { Namespace::Type };

            // Path-root keywords.
            if first && self.is_path_root_kw(seg.sym) {
                search_mod = self.root_kw_module(seg.sym, start);
                if last {
                    return match mode {
                        ResMode::Descend => Ok(PathOutcome::Module(search_mod)),
                        ResMode::Specific => Ok(PathOutcome::Res(Res::Def(
                            self.modules.module(search_mod).def_id(),
                        ))),
                    };
                }
                continue;
            }

            let found = if first && !global {
                // Lexical lookup: ribs innermost to outermost, then the
                // module tree upward.
                if single && target_ns == Namespace::Value {
                    if let Some(node) = find_rib_local(ribs, seg.sym) {
                        return Ok(PathOutcome::Res(Res::Local(node)));
                    }
                }
                let lookup_ns = if single { target_ns } else { Namespace::Type };
                self.lexical_lookup(ribs, search_mod, lookup_ns, seg.sym)
            } else {
                self.modules
                    .module(search_mod)
                    .find(ns, seg.sym)
                    .map(|found| (found, search_mod))
            };

            let Some((found, _home)) = found else {
                // Primitive types live in type-namespace position only,
                // and only when unshadowed along the scope chain.
                if last && target_ns == Namespace::Type && mode == ResMode::Specific {
                    if let Some(prim) = self.unshadowed_prim(seg.sym, start) {
                        if single {
                            return Ok(PathOutcome::Res(Res::PrimType(prim)));
                        }
                    }
                }
                return Err(self.not_found_error(search_mod, first && !global, start, ns, seg));
            };

            // Visibility of bindings reached through `::`.
            if !first || global {
                if let Some(def_span) = self.inaccessible_from(found, search_mod, start) {
                    return Err(PathError::Inaccessible {
                        name: seg.sym,
                        span: seg.span,
                        def_span,
                    });
                }
            }

            if last {
                binding = Some(found);
            } else {
                // Descend into the segment's module.
                search_mod = self.binding_module(found).ok_or(PathError::NotModule {
                    name: seg.sym,
                    span: seg.span,
                })?;
            }
        }

        let binding = match binding {
            Some(binding) => binding,
            None => junco_core::ice!("path resolution finished without a final binding"),
        };
        let last_seg = segs[segs.len() - 1];

        match mode {
            ResMode::Descend => {
                let module = self
                    .binding_module(binding)
                    .ok_or(PathError::NotModule {
                        name: last_seg.sym,
                        span: last_seg.span,
                    })?;
                Ok(PathOutcome::Module(module))
            }
            ResMode::Specific => match binding {
                NameBinding::Def(def) => Ok(PathOutcome::Res(Res::Def(def))),
                NameBinding::Fos(fos) => match suffix {
                    Some(suffix) => match self.def_table.fos(fos).get(&suffix) {
                        Some(&def) => Ok(PathOutcome::Res(Res::Def(def))),
                        None => Err(PathError::CannotFindSuffix {
                            suffix,
                            span: last_seg.span,
                        }),
                    },
                    // No call-shape information: the set itself is the
                    // resolution, narrowed later.
                    None => Ok(PathOutcome::Res(Res::Fos(fos))),
                },
            },
        }
    }

    fn is_path_root_kw(&self, sym: Symbol) -> bool {
        sym.is_kw(Kw::Party) || sym.is_kw(Kw::Super) || sym.is_kw(Kw::SelfLower)
    }

    fn root_kw_module(&self, sym: Symbol, start: ModuleId) -> ModuleId {
        if sym.is_kw(Kw::Party) {
            return ModuleTree::ROOT;
        }
        if sym.is_kw(Kw::SelfLower) {
            return self.nearest_mod_module(start);
        }
        // `super`: the `mod` enclosing the nearest `mod`.
        let near = self.nearest_mod_module(start);
        match self.modules.module(near).parent {
            Some(parent) => self.nearest_mod_module(parent),
            None => ModuleTree::ROOT,
        }
    }

    fn nearest_mod_module(&self, from: ModuleId) -> ModuleId {
        let def = self.modules.module(from).nearest_mod_def;
        self.modules.def_module(def).unwrap_or(ModuleTree::ROOT)
    }

    /// Rib-stack lookup, then ascent through enclosing modules.
    fn lexical_lookup(
        &self,
        ribs: &[Rib],
        start: ModuleId,
        ns: Namespace,
        sym: Symbol,
    ) -> Option<(NameBinding, ModuleId)> {
        for rib in ribs.iter().rev() {
            if let Some(module_id) = rib.bound_module {
                if let Some(found) = self.modules.module(module_id).find(ns, sym) {
                    return Some((found, module_id));
                }
            }
        }
        let mut cursor = Some(start);
        while let Some(id) = cursor {
            let module = self.modules.module(id);
            if let Some(found) = module.find(ns, sym) {
                return Some((found, id));
            }
            cursor = module.parent;
        }
        None
    }

    fn unshadowed_prim(&self, sym: Symbol, start: ModuleId) -> Option<PrimType> {
        let prim = PrimType::from_str(self.interner.resolve(sym))?;
        if self.modules.shadowed_prims(start) & prim.mask() != 0 {
            return None;
        }
        Some(prim)
    }

    /// Span of the private definition when `binding` is not visible from
    /// `from`.
    fn inaccessible_from(
        &self,
        binding: NameBinding,
        home: ModuleId,
        from: ModuleId,
    ) -> Option<Span> {
        let def = match binding {
            NameBinding::Def(def) => def,
            NameBinding::Fos(fos) => self.def_table.fos_first_def(fos),
        };
        if self.def_table.vis_of(def).is_pub() {
            return None;
        }
        let owner_mod = self.modules.module(home).nearest_mod_def;
        if self.modules.is_inside_mod(from, owner_mod) {
            return None;
        }
        Some(self.def_table.name_span(def))
    }

    /// The module a binding scopes, aliases unwound.
    fn binding_module(&self, binding: NameBinding) -> Option<ModuleId> {
        match binding {
            NameBinding::Def(def) => {
                let unwound = self.def_table.unwind_def_id(def);
                self.modules.def_module(unwound)
            }
            NameBinding::Fos(_) => None,
        }
    }

    fn not_found_error(
        &self,
        search_mod: ModuleId,
        lexical: bool,
        start: ModuleId,
        expected: Namespace,
        seg: &Seg,
    ) -> PathError {
        // Same name in another namespace makes a better diagnostic.
        let alts = if lexical {
            self.collect_alts_along_chain(start, seg.sym)
        } else {
            self.alts_of(self.modules.module(search_mod).find_all(seg.sym))
        };
        let alt: Vec<_> = alts
            .into_iter()
            .filter(|&(ns, _)| ns != expected)
            .collect();
        if alt.is_empty() {
            PathError::CannotFind {
                name: seg.sym,
                span: seg.span,
            }
        } else {
            PathError::WrongNs {
                name: seg.sym,
                span: seg.span,
                expected,
                alt,
            }
        }
    }

    fn collect_alts_along_chain(
        &self,
        start: ModuleId,
        sym: Symbol,
    ) -> Vec<(Namespace, NameBinding)> {
        let mut cursor = Some(start);
        while let Some(id) = cursor {
            let alts = self.alts_of(self.modules.module(id).find_all(sym));
            if !alts.is_empty() {
                return alts;
            }
            cursor = self.modules.module(id).parent;
        }
        Vec::new()
    }

    fn alts_of(&self, all: PerNS<Option<NameBinding>>) -> Vec<(Namespace, NameBinding)> {
        let mut alts = Vec::new();
        for (ns, binding) in all.iter() {
            if let Some(binding) = binding {
                alts.push((ns, *binding));
            }
        }
        alts
    }

    /// Emit a diagnostic for a path failure.
    pub fn report(&self, err: &PathError, msg: &mut MessageHolder) {
        match err {
            PathError::CannotFind { name, span } => {
                msg.error(format!(
                    "cannot find name `{}`",
                    self.interner.resolve(*name)
                ))
                .primary(*span, "not found in this scope")
                .emit();
            }
            PathError::CannotFindSuffix { suffix, span } => {
                msg.error(format!(
                    "cannot find function `{}` matching these argument labels",
                    self.interner.resolve(*suffix)
                ))
                .primary(*span, "no matching overload")
                .emit();
            }
            PathError::Inaccessible {
                name,
                span,
                def_span,
            } => {
                msg.error(format!("`{}` is private", self.interner.resolve(*name)))
                    .primary(*span, "inaccessible from here")
                    .aux(*def_span, "defined here")
                    .emit();
            }
            PathError::WrongNs {
                name,
                span,
                expected,
                alt,
            } => {
                let name = self.interner.resolve(*name);
                let mut builder = msg
                    .error(format!(
                        "expected a {} name, but `{name}` is not one",
                        expected.as_str()
                    ))
                    .primary(*span, format!("not a {} name", expected.as_str()));
                for (ns, binding) in alt {
                    builder = builder.aux(
                        self.def_table.binding_span(*binding),
                        format!(
                            "a {} named `{name}` ({}) is defined here",
                            ns.as_str(),
                            self.def_table.binding_kind_str(*binding)
                        ),
                    );
                }
                builder.emit();
            }
            PathError::NotModule { name, span } => {
                msg.error(format!(
                    "`{}` is not a module and cannot be descended into",
                    self.interner.resolve(*name)
                ))
                .primary(*span, "not a module")
                .emit();
            }
        }
    }
}

fn find_rib_local(ribs: &[Rib], sym: Symbol) -> Option<NodeId> {
    ribs.iter().rev().find_map(|rib| rib.find_local(sym))
}

/// Extract resolvable segments from an AST path; `None` when any
/// segment failed to parse (an error was already reported).
pub fn segs_of_path(path: &crate::ast::Path) -> Option<Vec<Seg>> {
    path.segments
        .iter()
        .map(|seg| {
            let seg = seg.as_ref().ok()?;
            let ident = seg.ident.as_ref().ok()?;
            Some(Seg {
                sym: ident.sym,
                span: ident.span,
            })
        })
        .collect()
}

/// Same for simple (`use`) paths.
pub fn segs_of_simple_path(path: &crate::ast::SimplePath) -> Option<Vec<Seg>> {
    path.segments
        .iter()
        .map(|seg| {
            let seg = seg.as_ref().ok()?;
            let ident = seg.ident.as_ref().ok()?;
            Some(Seg {
                sym: ident.sym,
                span: ident.span,
            })
        })
        .collect()
}
