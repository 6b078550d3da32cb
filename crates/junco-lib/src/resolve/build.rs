//! Module tree construction.
//!
//! One walk over the AST: allocate a `DefId` for every named
//! declaration, a module for every scope (mod, enum, struct, trait,
//! impl, func, init, and each block), populate per-namespace bindings,
//! and report redefinitions. Overload sets collide only on equal
//! call-shape suffixes.

use junco_core::{Kw, Symbol};

use crate::ast::visit::{self, Visitor};
use crate::ast::*;
use crate::diagnostics::MessageHolder;
use crate::session::Session;
use crate::span::Ident;

use super::def::{DefId, DefKind, NameBinding, Vis};
use super::module::{ModuleId, ModuleTree, PrimType};

/// Build the module tree and definition table for the party.
pub fn build_module_tree(sess: &mut Session, party: &Party) -> MessageHolder {
    let mut builder = ModuleTreeBuilder {
        sess,
        module: ModuleTree::ROOT,
        msg: MessageHolder::new(),
    };
    builder.visit_party(party);
    builder.msg
}

struct ModuleTreeBuilder<'s> {
    sess: &'s mut Session,
    module: ModuleId,
    msg: MessageHolder,
}

impl ModuleTreeBuilder<'_> {
    fn vis_of(item_vis: &crate::ast::Vis) -> Vis {
        match item_vis {
            crate::ast::Vis::Unset => Vis::Unset,
            crate::ast::Vis::Pub(_) => Vis::Pub,
        }
    }

    /// Define and bind a plain (non-function) definition in the current
    /// module.
    fn define_and_bind(
        &mut self,
        vis: Vis,
        node: NodeId,
        kind: DefKind,
        ident: Ident,
    ) -> DefId {
        let def = self.sess.def_table.define(vis, node, kind, ident);
        self.bind(kind.ns(), ident, NameBinding::Def(def));
        def
    }

    fn bind(&mut self, ns: super::def::Namespace, ident: Ident, binding: NameBinding) {
        self.shadow_prim_if_needed(ns, ident.sym);
        let prev = self
            .sess
            .modules
            .module_mut(self.module)
            .try_define(ns, ident.sym, binding);
        if let Some(prev) = prev {
            let name = self.sess.interner.resolve(ident.sym).to_owned();
            let prev_span = self.sess.def_table.binding_span(prev);
            self.msg
                .error(format!("`{name}` has already been declared"))
                .primary(ident.span, "redeclared here")
                .aux(prev_span, "previously declared here")
                .emit();
        }
    }

    /// User names shadow primitive types in this scope.
    fn shadow_prim_if_needed(&mut self, ns: super::def::Namespace, sym: Symbol) {
        if ns != super::def::Namespace::Type {
            return;
        }
        let prim = PrimType::from_str(self.sess.interner.resolve(sym));
        if let Some(prim) = prim {
            self.sess.modules.module_mut(self.module).shadowed_prim_types |= prim.mask();
        }
    }

    /// Register a function or initializer overload.
    fn define_func_like(
        &mut self,
        vis: Vis,
        node: NodeId,
        kind: DefKind,
        base: Ident,
        suffix: Symbol,
    ) -> DefId {
        let full = Ident::new(suffix, base.span);
        let def = self.sess.def_table.define(vis, node, kind, full);

        let existing = self
            .sess
            .modules
            .module(self.module)
            .find(super::def::Namespace::Value, base.sym);

        match existing {
            None => {
                let fos = self
                    .sess
                    .def_table
                    .try_define_func(def, None, suffix)
                    .unwrap_or_else(|_| junco_core::ice!("fresh overload set cannot collide"));
                self.bind(
                    super::def::Namespace::Value,
                    base,
                    NameBinding::Fos(fos),
                );
            }
            Some(NameBinding::Fos(fos)) => {
                if let Err((_, prev)) = self.sess.def_table.try_define_func(def, Some(fos), suffix)
                {
                    let suffix_str = self.sess.interner.resolve(suffix).to_owned();
                    let prev_span = self.sess.def_table.name_span(prev);
                    self.msg
                        .error(format!("`{suffix_str}` has already been declared"))
                        .primary(base.span, "redeclared here")
                        .aux(prev_span, "previously declared here")
                        .emit();
                }
            }
            Some(prev @ NameBinding::Def(_)) => {
                let name = self.sess.interner.resolve(base.sym).to_owned();
                let prev_span = self.sess.def_table.binding_span(prev);
                self.msg
                    .error(format!("`{name}` has already been declared"))
                    .primary(base.span, "redeclared here")
                    .aux(prev_span, "previously declared here")
                    .emit();
            }
        }
        def
    }

    /// Serialize the call shape: `base(label:_:...)`.
    fn func_suffix(&mut self, base: &str, sig: &FuncSig) -> Symbol {
        let mut name = String::from(base);
        name.push('(');
        for param in &sig.params {
            match &param.label {
                Some(label) => {
                    name.push_str(self.sess.interner.resolve(label.sym));
                    name.push(':');
                }
                None => name.push_str("_:"),
            }
        }
        name.push(')');
        self.sess.interner.intern(&name)
    }

    fn struct_init_suffix(&mut self, fields: &[StructField]) -> Symbol {
        let mut name = String::from("init(");
        for field in fields {
            match &field.name {
                Some(Ok(ident)) => {
                    name.push_str(self.sess.interner.resolve(ident.sym));
                    name.push(':');
                }
                _ => name.push_str("_:"),
            }
        }
        name.push(')');
        self.sess.interner.intern(&name)
    }

    fn inside_def_module(&mut self, def: DefId, nearest_mod: Option<DefId>, f: impl FnOnce(&mut Self)) {
        let nearest = nearest_mod
            .unwrap_or_else(|| self.sess.modules.module(self.module).nearest_mod_def);
        let module = self.sess.modules.add_def_module(def, self.module, nearest);
        let saved = std::mem::replace(&mut self.module, module);
        f(self);
        self.module = saved;
    }

    fn define_generics(&mut self, generics: &[GenericParam]) {
        for param in generics {
            let (kind, name) = match &param.kind {
                GenericParamKind::Lifetime { name } => (DefKind::Lifetime, name),
                GenericParamKind::Type { name, .. } => (DefKind::TypeParam, name),
                GenericParamKind::Const { name, .. } => (DefKind::ConstParam, name),
            };
            if let Ok(ident) = name {
                self.define_and_bind(Vis::Unset, param.id, kind, *ident);
            }
        }
    }

    fn impl_ident(&mut self, node: NodeId) -> Ident {
        let sym = self.sess.interner.intern(&format!("%impl_{}", node.0));
        Ident::new(sym, self.sess.node_span(node))
    }
}

impl Visitor for ModuleTreeBuilder<'_> {
    fn visit_item(&mut self, item: &Item) {
        let vis = Self::vis_of(&item.vis);

        match &item.kind {
            ItemKind::Mod(module_item) => {
                let Ok(name) = &module_item.name else { return };
                let def = self.define_and_bind(vis, item.id, DefKind::Mod, *name);
                self.inside_def_module(def, Some(def), |this| {
                    visit::walk_item(this, item);
                });
            }
            ItemKind::Struct(struct_item) => {
                let Ok(name) = &struct_item.name else { return };
                let def = self.define_and_bind(vis, item.id, DefKind::Struct, *name);
                let init_suffix = self.struct_init_suffix(&struct_item.fields);
                self.inside_def_module(def, None, |this| {
                    this.define_generics(&struct_item.generics);
                    // Struct literals resolve through a synthesized
                    // default initializer overload.
                    let base = Ident::new(Symbol::from_kw(Kw::Init), name.span);
                    this.define_func_like(vis, item.id, DefKind::DefaultInit, base, init_suffix);
                    visit::walk_item(this, item);
                });
            }
            ItemKind::Enum(enum_item) => {
                let Ok(name) = &enum_item.name else { return };
                let def = self.define_and_bind(vis, item.id, DefKind::Enum, *name);
                self.inside_def_module(def, None, |this| {
                    this.define_generics(&enum_item.generics);
                    visit::walk_item(this, item);
                });
            }
            ItemKind::Trait(trait_item) => {
                let Ok(name) = &trait_item.name else { return };
                let def = self.define_and_bind(vis, item.id, DefKind::Trait, *name);
                self.inside_def_module(def, None, |this| {
                    this.define_generics(&trait_item.generics);
                    visit::walk_item(this, item);
                });
            }
            ItemKind::Impl(impl_item) => {
                let ident = self.impl_ident(item.id);
                let def = self.define_and_bind(vis, item.id, DefKind::Impl, ident);
                self.inside_def_module(def, None, |this| {
                    this.define_generics(&impl_item.generics);
                    visit::walk_item(this, item);
                });
            }
            ItemKind::TypeAlias(alias) => {
                let Ok(name) = &alias.name else { return };
                let def = self.define_and_bind(vis, item.id, DefKind::TypeAlias, *name);
                self.inside_def_module(def, None, |this| {
                    this.define_generics(&alias.generics);
                    visit::walk_item(this, item);
                });
            }
            ItemKind::Const(const_item) => {
                let Ok(name) = &const_item.name else { return };
                self.define_and_bind(vis, item.id, DefKind::Const, *name);
                visit::walk_item(self, item);
            }
            ItemKind::Func(func_item) => {
                let Ok(name) = &func_item.name else { return };
                let base_str = self.sess.interner.resolve(name.sym).to_owned();
                let suffix = self.func_suffix(&base_str, &func_item.sig);
                let def = self.define_func_like(vis, item.id, DefKind::Func, *name, suffix);
                self.inside_def_module(def, None, |this| {
                    this.define_generics(&func_item.generics);
                    visit::walk_item(this, item);
                });
            }
            ItemKind::Init(init_item) => {
                let base = Ident::new(Symbol::from_kw(Kw::Init), item.span);
                let suffix = self.func_suffix("init", &init_item.sig);
                let def = self.define_func_like(vis, item.id, DefKind::Init, base, suffix);
                self.inside_def_module(def, None, |this| {
                    this.define_generics(&init_item.generics);
                    visit::walk_item(this, item);
                });
            }
            ItemKind::Use(_) => {
                // Remember where the declaration sits; the importer
                // expands it after the whole tree is built.
                self.sess.modules.set_use_decl_module(item.id, self.module);
            }
        }
    }

    fn visit_variant(&mut self, variant: &Variant) {
        if let Ok(name) = &variant.name {
            self.define_and_bind(Vis::Pub, variant.id, DefKind::Variant, *name);
        }
        visit::walk_variant(self, variant);
    }

    fn visit_block(&mut self, block: &Block) {
        let nearest = self.sess.modules.module(self.module).nearest_mod_def;
        let module = self
            .sess
            .modules
            .add_block_module(block.id, self.module, nearest);
        let saved = std::mem::replace(&mut self.module, module);
        visit::walk_block(self, block);
        self.module = saved;
    }
}
