//! Dumps of the module tree, definitions, and resolutions.

use crate::session::Session;

use super::def::NameBinding;
use super::module::{ModuleId, ModuleKind};

/// `--print=mod-tree`: modules with their per-namespace bindings.
pub fn print_module_tree(sess: &Session) -> String {
    let mut out = String::new();
    print_module(sess, super::ModuleTree::ROOT, 0, &mut out);
    out
}

fn print_module(sess: &Session, id: ModuleId, indent: usize, out: &mut String) {
    let module = sess.modules.module(id);
    let head = match module.kind {
        ModuleKind::Def(def) => {
            let def = sess.def_table.def(def);
            format!(
                "{} `{}` (def #{})",
                def.kind.as_str(),
                sess.interner.resolve(def.ident.sym),
                def.id.0
            )
        }
        ModuleKind::Block(node) => format!("block (node #{})", node.0),
    };
    out.push_str(&"  ".repeat(indent));
    out.push_str(&head);
    out.push('\n');

    for (ns, bindings) in module.per_ns.iter() {
        for (sym, binding) in bindings {
            out.push_str(&"  ".repeat(indent + 1));
            let target = match binding {
                NameBinding::Def(def) => format!("def #{}", def.0),
                NameBinding::Fos(fos) => {
                    let suffixes: Vec<&str> = sess
                        .def_table
                        .fos(*fos)
                        .keys()
                        .map(|&suffix| sess.interner.resolve(suffix))
                        .collect();
                    format!("fos #{} {{{}}}", fos.0, suffixes.join(", "))
                }
            };
            out.push_str(&format!(
                "[{}] `{}` -> {}\n",
                ns.as_str(),
                sess.interner.resolve(*sym),
                target
            ));
        }
    }

    // Children in allocation order.
    for (child_id, child) in sess.modules.iter() {
        if child.parent == Some(id) {
            print_module(sess, child_id, indent + 1, out);
        }
    }
}

/// `--print=definitions`: the dense definition table.
pub fn print_definitions(sess: &Session) -> String {
    let mut out = String::new();
    for def in sess.def_table.defs() {
        out.push_str(&format!(
            "#{:<4} {:<20} `{}`\n",
            def.id.0,
            def.kind.as_str(),
            sess.interner.resolve(def.ident.sym)
        ));
    }
    out
}

/// `--print=resolutions`: every recorded `NodeId → Res`, sorted.
pub fn print_resolutions(sess: &Session) -> String {
    let mut out = String::new();
    for (node, res) in sess.resolutions.sorted() {
        out.push_str(&format!("node #{:<4} -> {:?}\n", node.0, res));
    }
    out
}

/// `--print=ribs`: rib frames preserved by the name resolver, in pop
/// (innermost-first) order. Locals are listed sorted by symbol so the
/// dump is stable.
pub fn print_ribs(sess: &Session) -> String {
    let mut out = String::new();
    for (idx, snap) in sess.rib_snapshots.iter().enumerate() {
        let bound = match snap.rib.bound_module {
            Some(module_id) => match sess.modules.module(module_id).kind {
                ModuleKind::Def(def) => format!(" bound to def #{}", def.0),
                ModuleKind::Block(node) => format!(" bound to block (node #{})", node.0),
            },
            None => String::new(),
        };
        out.push_str(&format!(
            "rib #{idx} depth {} {:?}{bound}\n",
            snap.depth, snap.rib.kind
        ));
        let mut locals: Vec<_> = snap.rib.locals.iter().collect();
        locals.sort_by_key(|&(&sym, _)| sym);
        for (sym, node) in locals {
            out.push_str(&format!(
                "  local `{}` -> node #{}\n",
                sess.interner.resolve(*sym),
                node.0
            ));
        }
    }
    out
}
