//! Importation: expanding `use` declarations into `ImportAlias`
//! bindings.
//!
//! Runs after the module tree is complete. Each use tree's prefix is
//! resolved in `Descend` mode; the named item (or every public binding,
//! for globs) is then aliased into the module the declaration appeared
//! in. Aliases inherit the declaration's visibility, so `pub use`
//! re-exports.

use junco_core::Symbol;

use crate::ast::visit::{self, Visitor};
use crate::ast::*;
use crate::diagnostics::MessageHolder;
use crate::session::Session;
use crate::span::{Ident, Span};

use super::def::{DefKind, NameBinding, Namespace, Vis};
use super::module::ModuleId;
use super::path::{PathOutcome, PathResolver, ResMode, Seg, segs_of_simple_path};

/// Expand every `use` declaration of the party.
pub fn resolve_imports(sess: &mut Session, party: &Party) -> MessageHolder {
    let mut importer = Importer {
        sess,
        msg: MessageHolder::new(),
    };
    importer.visit_party(party);
    importer.msg
}

struct Importer<'s> {
    sess: &'s mut Session,
    msg: MessageHolder,
}

impl Visitor for Importer<'_> {
    fn visit_item(&mut self, item: &Item) {
        if let ItemKind::Use(decl) = &item.kind {
            let Some(module) = self.sess.modules.use_decl_module(item.id) else {
                return;
            };
            let vis = match item.vis {
                crate::ast::Vis::Unset => Vis::Unset,
                crate::ast::Vis::Pub(_) => Vis::Pub,
            };
            if let Ok(tree) = &decl.use_tree {
                self.process_tree(module, vis, Vec::new(), false, tree);
            }
            return;
        }
        visit::walk_item(self, item);
    }
}

impl Importer<'_> {
    fn process_tree(
        &mut self,
        module: ModuleId,
        vis: Vis,
        prefix: Vec<Seg>,
        global: bool,
        tree: &UseTree,
    ) {
        match &tree.kind {
            UseTreeKind::Raw(path) => {
                let Some((segs, global)) = join_path(prefix, global, path) else {
                    return;
                };
                self.import_named(module, vis, tree.id, &segs, global, None);
            }
            UseTreeKind::Rebind { path, name } => {
                let Some((segs, global)) = join_path(prefix, global, path) else {
                    return;
                };
                let Ok(rebind) = name else { return };
                self.import_named(module, vis, tree.id, &segs, global, Some(*rebind));
            }
            UseTreeKind::All(path) => {
                let (segs, global) = match path {
                    Some(path) => match join_path(prefix, global, path) {
                        Some(joined) => joined,
                        None => return,
                    },
                    None => (prefix, global),
                };
                let target = self.descend(module, &segs, global, tree.span);
                if let Some(target) = target {
                    self.import_glob(module, vis, tree.id, tree.span, target);
                }
            }
            UseTreeKind::Specific { prefix: p, trees } => {
                let (segs, global) = match p {
                    Some(path) => match join_path(prefix, global, path) {
                        Some(joined) => joined,
                        None => return,
                    },
                    None => (prefix, global),
                };
                for sub in trees.iter().flatten() {
                    self.process_tree(module, vis, segs.clone(), global, sub);
                }
            }
        }
    }

    /// Resolve a module prefix for glob and group trees.
    fn descend(
        &mut self,
        module: ModuleId,
        segs: &[Seg],
        global: bool,
        span: Span,
    ) -> Option<ModuleId> {
        let resolver = PathResolver {
            def_table: &self.sess.def_table,
            modules: &self.sess.modules,
            interner: &self.sess.interner,
        };
        match resolver.resolve(
            module,
            Namespace::Type,
            global,
            segs,
            None,
            ResMode::Descend,
            &[],
        ) {
            Ok(PathOutcome::Module(target)) => Some(target),
            Ok(PathOutcome::Res(_)) => {
                self.msg
                    .error("`use ...::*` expects a module path")
                    .primary(span, "not a module")
                    .emit();
                None
            }
            Err(err) => {
                resolver.report(&err, &mut self.msg);
                None
            }
        }
    }

    /// `use a::b::name` / `use a::b::name as other`.
    fn import_named(
        &mut self,
        module: ModuleId,
        vis: Vis,
        node: NodeId,
        segs: &[Seg],
        global: bool,
        rebind: Option<Ident>,
    ) {
        let Some((&last, prefix)) = segs.split_last() else {
            return;
        };

        // Resolve the prefix; with no prefix the name is searched by
        // ascending from the declaration's own module.
        let target = if prefix.is_empty() && !global {
            self.find_by_ascent(module, last)
        } else {
            let resolver = PathResolver {
                def_table: &self.sess.def_table,
                modules: &self.sess.modules,
                interner: &self.sess.interner,
            };
            match resolver.resolve(
                module,
                Namespace::Type,
                global,
                prefix,
                None,
                ResMode::Descend,
                &[],
            ) {
                Ok(PathOutcome::Module(target)) => Some(target),
                Ok(PathOutcome::Res(_)) => None,
                Err(err) => {
                    resolver.report(&err, &mut self.msg);
                    None
                }
            }
        };
        let Some(target) = target else { return };

        let bindings = self.sess.modules.module(target).find_all(last.sym);
        let mut found_any = false;

        for ns in Namespace::ALL {
            let Some(binding) = *bindings.get(ns) else {
                continue;
            };
            found_any = true;

            // Visibility from the importing module's side.
            if target != module {
                let resolver = PathResolver {
                    def_table: &self.sess.def_table,
                    modules: &self.sess.modules,
                    interner: &self.sess.interner,
                };
                if let Some(def_span) = resolver_inaccessible(&resolver, binding, target, module) {
                    let name = self.sess.interner.resolve(last.sym).to_owned();
                    self.msg
                        .error(format!("`{name}` is private and cannot be imported"))
                        .primary(last.span, "private item")
                        .aux(def_span, "defined here")
                        .emit();
                    continue;
                }
            }

            let local = rebind.unwrap_or(Ident::new(last.sym, last.span));
            self.define_alias(module, vis, node, ns, binding, local);
        }

        if !found_any {
            let name = self.sess.interner.resolve(last.sym).to_owned();
            self.msg
                .error(format!("cannot find name `{name}` to import"))
                .primary(last.span, "not found")
                .emit();
        }
    }

    /// Nearest enclosing module where `name` binds in any namespace.
    fn find_by_ascent(&self, from: ModuleId, seg: Seg) -> Option<ModuleId> {
        let mut cursor = Some(from);
        while let Some(id) = cursor {
            let module = self.sess.modules.module(id);
            let all = module.find_all(seg.sym);
            if Namespace::ALL.iter().any(|&ns| all.get(ns).is_some()) {
                return Some(id);
            }
            cursor = module.parent;
        }
        Some(from)
    }

    fn define_alias(
        &mut self,
        module: ModuleId,
        vis: Vis,
        node: NodeId,
        ns: Namespace,
        binding: NameBinding,
        local: Ident,
    ) {
        match binding {
            NameBinding::Def(target_def) => {
                let alias = self
                    .sess
                    .def_table
                    .define_import_alias(vis, node, target_def, local);
                let prev = self
                    .sess
                    .modules
                    .module_mut(module)
                    .try_define(ns, local.sym, NameBinding::Def(alias));
                if let Some(prev) = prev {
                    self.report_cannot_import(local, prev, None);
                }
            }
            NameBinding::Fos(import_fos) => {
                self.import_fos(module, vis, node, import_fos, local);
            }
        }
    }

    /// Merge an overload set into the importing module, overload by
    /// overload; colliding suffixes are reported together.
    fn import_fos(
        &mut self,
        module: ModuleId,
        vis: Vis,
        node: NodeId,
        import_fos: super::def::FOSId,
        local: Ident,
    ) {
        let target_fos = match self
            .sess
            .modules
            .module(module)
            .find(Namespace::Value, local.sym)
        {
            None => {
                let fos = self.sess.def_table.new_fos();
                self.sess.modules.module_mut(module).try_define(
                    Namespace::Value,
                    local.sym,
                    NameBinding::Fos(fos),
                );
                fos
            }
            Some(NameBinding::Fos(fos)) => fos,
            Some(prev @ NameBinding::Def(_)) => {
                self.report_cannot_import(local, prev, None);
                return;
            }
        };

        let overloads: Vec<(Symbol, super::def::DefId)> = self
            .sess
            .def_table
            .fos(import_fos)
            .iter()
            .map(|(&suffix, &def)| (suffix, def))
            .collect();

        let mut redefs = super::def::FosRedefs::default();
        for (suffix, overload) in overloads {
            let alias = self.sess.def_table.define_import_alias(
                vis,
                node,
                overload,
                Ident::new(suffix, local.span),
            );
            if self
                .sess
                .def_table
                .try_define_func(alias, Some(target_fos), suffix)
                .is_err()
            {
                redefs.suffixes.push(suffix);
            }
        }

        if !redefs.ok() {
            for suffix in redefs.suffixes {
                let prev = self.sess.def_table.fos(target_fos)[&suffix];
                let prev_span = self.sess.def_table.name_span(prev);
                let suffix_str = self.sess.interner.resolve(suffix).to_owned();
                self.msg
                    .error(format!("cannot import `{suffix_str}`: the name is already bound"))
                    .primary(local.span, "conflicting import")
                    .aux(prev_span, "existing declaration is here")
                    .emit();
            }
        }
    }

    /// `use path::*`: alias every public binding of the target module.
    fn import_glob(
        &mut self,
        module: ModuleId,
        vis: Vis,
        node: NodeId,
        span: Span,
        target: ModuleId,
    ) {
        if target == module {
            return;
        }
        for ns in Namespace::ALL {
            let entries: Vec<(Symbol, NameBinding)> = self
                .sess
                .modules
                .module(target)
                .per_ns
                .get(ns)
                .iter()
                .map(|(&sym, &binding)| (sym, binding))
                .collect();

            for (sym, binding) in entries {
                let def = match binding {
                    NameBinding::Def(def) => def,
                    NameBinding::Fos(fos) => self.sess.def_table.fos_first_def(fos),
                };
                if !self.sess.def_table.vis_of(def).is_pub() {
                    continue;
                }

                if let Some(existing) = self.sess.modules.module(module).find(ns, sym) {
                    self.check_glob_collision(sym, span, existing, binding);
                    continue;
                }

                let local = Ident::new(sym, span);
                self.define_alias(module, vis, node, ns, binding, local);
            }
        }
    }

    /// Two glob imports bringing incompatible bindings for one name is
    /// an ambiguity; anything already declared locally just wins.
    fn check_glob_collision(
        &mut self,
        sym: Symbol,
        span: Span,
        existing: NameBinding,
        incoming: NameBinding,
    ) {
        let existing_def = match existing {
            NameBinding::Def(def) => def,
            NameBinding::Fos(fos) => self.sess.def_table.fos_first_def(fos),
        };
        if self.sess.def_table.def(existing_def).kind != DefKind::ImportAlias {
            return;
        }
        let incoming_def = match incoming {
            NameBinding::Def(def) => def,
            NameBinding::Fos(fos) => self.sess.def_table.fos_first_def(fos),
        };
        let existing_target = self.sess.def_table.unwind_def_id(existing_def);
        let incoming_target = self.sess.def_table.unwind_def_id(incoming_def);
        if existing_target == incoming_target {
            return;
        }
        let name = self.sess.interner.resolve(sym).to_owned();
        self.msg
            .error(format!("`{name}` is ambiguous"))
            .primary(span, "imported multiple times with different meanings")
            .aux(
                self.sess.def_table.name_span(existing_target),
                "one candidate is here",
            )
            .aux(
                self.sess.def_table.name_span(incoming_target),
                "the other candidate is here",
            )
            .emit();
    }

    fn report_cannot_import(&mut self, local: Ident, prev: NameBinding, suffix: Option<Symbol>) {
        let name = match suffix {
            Some(suffix) => self.sess.interner.resolve(suffix).to_owned(),
            None => self.sess.interner.resolve(local.sym).to_owned(),
        };
        let prev_span = self.sess.def_table.binding_span(prev);
        self.msg
            .error(format!("cannot import `{name}`: the name is already bound"))
            .primary(local.span, "conflicting import")
            .aux(prev_span, "existing declaration is here")
            .emit();
    }
}

/// Visibility of an explicitly named import, from the importing side.
fn resolver_inaccessible(
    resolver: &PathResolver<'_>,
    binding: NameBinding,
    home: ModuleId,
    from: ModuleId,
) -> Option<Span> {
    let def = match binding {
        NameBinding::Def(def) => def,
        NameBinding::Fos(fos) => resolver.def_table.fos_first_def(fos),
    };
    if resolver.def_table.vis_of(def).is_pub() {
        return None;
    }
    let owner_mod = resolver.modules.module(home).nearest_mod_def;
    if resolver.modules.is_inside_mod(from, owner_mod) {
        return None;
    }
    Some(resolver.def_table.name_span(def))
}

/// Append a simple path's segments to the accumulated prefix; `None`
/// when the path failed to parse.
fn join_path(
    mut prefix: Vec<Seg>,
    global: bool,
    path: &SimplePath,
) -> Option<(Vec<Seg>, bool)> {
    let segs = segs_of_simple_path(path)?;
    let global = global || (prefix.is_empty() && path.global);
    prefix.extend(segs);
    Some((prefix, global))
}
