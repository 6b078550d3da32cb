//! HIR dump for `--print=hir`.

use junco_core::Interner;

use crate::session::Session;

use super::*;

pub struct HirPrinter<'a> {
    interner: &'a Interner,
    party: &'a Party,
    out: String,
    indent: usize,
}

impl<'a> HirPrinter<'a> {
    pub fn new(sess: &'a Session, party: &'a Party) -> Self {
        Self {
            interner: &sess.interner,
            party,
            out: String::new(),
            indent: 0,
        }
    }

    pub fn print(mut self) -> String {
        self.line(format!(
            "HIR: {} owners, {} bodies, {} modules",
            self.party.owners.len(),
            self.party.bodies.len(),
            self.party.modules.len()
        ));
        self.print_item(self.party.root_mod);
        self.out
    }

    fn line(&mut self, text: impl AsRef<str>) {
        for _ in 0..self.indent {
            self.out.push_str("  ");
        }
        self.out.push_str(text.as_ref());
        self.out.push('\n');
    }

    fn nested(&mut self, f: impl FnOnce(&mut Self)) {
        self.indent += 1;
        f(self);
        self.indent -= 1;
    }

    fn print_item(&mut self, id: ItemId) {
        let Some(item) = self.party.item(id) else {
            self.line(format!("<missing item {:?}>", id.0));
            return;
        };
        let name = self.interner.resolve(item.ident.sym).to_owned();
        let (kind, children, body) = match &item.kind {
            ItemKind::Mod(module) => ("Mod", module.items.clone(), None),
            ItemKind::Enum { variants } => {
                self.line(format!("Enum `{name}` {:?}", item.def_id));
                self.nested(|this| {
                    for variant in variants {
                        let vname = this.interner.resolve(variant.ident.sym).to_owned();
                        this.line(format!("Variant `{vname}` {:?}", variant.def_id));
                    }
                });
                return;
            }
            ItemKind::Struct { fields } => {
                self.line(format!("Struct `{name}` {:?}", item.def_id));
                self.nested(|this| {
                    for field in fields {
                        let fname = field
                            .ident
                            .map(|ident| this.interner.resolve(ident.sym).to_owned())
                            .unwrap_or_else(|| "<positional>".into());
                        this.line(format!("Field `{fname}`"));
                    }
                });
                return;
            }
            ItemKind::Trait { members } => ("Trait", members.clone(), None),
            ItemKind::Impl { members } => ("Impl", members.clone(), None),
            ItemKind::Func(func) => ("Func", Vec::new(), func.body),
            ItemKind::Init(func) => ("Init", Vec::new(), func.body),
            ItemKind::TypeAlias { .. } => ("TypeAlias", Vec::new(), None),
            ItemKind::Const { body, .. } => ("Const", Vec::new(), *body),
        };

        self.line(format!("{kind} `{name}` {:?}", item.def_id));
        self.nested(|this| {
            for child in children {
                this.print_item(child);
            }
            if let Some(body_id) = body {
                match this.party.body(body_id) {
                    Some(hir_body) => {
                        this.line(format!(
                            "Body {:?}: {} params",
                            body_id.0,
                            hir_body.params.len()
                        ));
                        this.nested(|this| this.print_expr(&hir_body.value));
                    }
                    None => this.line(format!("<missing body {:?}>", body_id.0)),
                }
            }
        });
    }

    fn print_expr(&mut self, expr: &Expr) {
        let id = format!("{:?}.{}", expr.hir_id.owner, expr.hir_id.child);
        match &expr.kind {
            ExprKind::Assign { lhs, rhs } => {
                self.line(format!("Assign [{id}]"));
                self.nested(|this| {
                    this.print_expr(lhs);
                    this.print_expr(rhs);
                });
            }
            ExprKind::Block(block) => self.print_block(block),
            ExprKind::Borrow { is_mut, expr } => {
                let head = if *is_mut { "Borrow mut" } else { "Borrow" };
                self.line(format!("{head} [{id}]"));
                self.nested(|this| this.print_expr(expr));
            }
            ExprKind::Break { expr } => {
                self.line(format!("Break [{id}]"));
                if let Some(inner) = expr {
                    self.nested(|this| this.print_expr(inner));
                }
            }
            ExprKind::Cast { expr, .. } => {
                self.line(format!("Cast [{id}]"));
                self.nested(|this| this.print_expr(expr));
            }
            ExprKind::Continue => self.line(format!("Continue [{id}]")),
            ExprKind::Field { lhs, field } => {
                self.line(format!(
                    "Field `{}` [{id}]",
                    self.interner.resolve(field.sym)
                ));
                self.nested(|this| this.print_expr(lhs));
            }
            ExprKind::If { cond, then, els } => {
                self.line(format!("If [{id}]"));
                self.nested(|this| {
                    this.print_expr(cond);
                    this.print_block(then);
                    if let Some(els) = els {
                        this.print_expr(els);
                    }
                });
            }
            ExprKind::Infix { lhs, op, rhs } => {
                self.line(format!("Infix `{}` [{id}]", op.node.as_str()));
                self.nested(|this| {
                    this.print_expr(lhs);
                    this.print_expr(rhs);
                });
            }
            ExprKind::Invoke { callee, args } => {
                self.line(format!("Invoke [{id}]"));
                self.nested(|this| {
                    this.print_expr(callee);
                    for arg in args {
                        this.print_expr(&arg.value);
                    }
                });
            }
            ExprKind::Lambda { body, .. } => {
                self.line(format!("Lambda [{id}]"));
                self.nested(|this| this.print_expr(body));
            }
            ExprKind::List(els) | ExprKind::Tuple(els) => {
                self.line(format!("Seq [{id}]"));
                self.nested(|this| {
                    for el in els {
                        this.print_expr(el);
                    }
                });
            }
            ExprKind::Lit(lit) => {
                self.line(format!(
                    "Lit `{}` [{id}]",
                    self.interner.resolve(lit.sym)
                ));
            }
            ExprKind::Loop { body } => {
                self.line(format!("Loop [{id}]"));
                self.nested(|this| this.print_block(body));
            }
            ExprKind::Match { subject, arms } => {
                self.line(format!("Match [{id}]"));
                self.nested(|this| {
                    this.print_expr(subject);
                    for arm in arms {
                        this.line("Arm");
                        this.nested(|this| this.print_expr(&arm.body));
                    }
                });
            }
            ExprKind::Path(path) => {
                let segs: Vec<&str> = path
                    .segs
                    .iter()
                    .map(|seg| self.interner.resolve(seg.sym))
                    .collect();
                self.line(format!("Path {} res={:?} [{id}]", segs.join("::"), path.res));
            }
            ExprKind::Postfix { lhs, .. } => {
                self.line(format!("Postfix `?` [{id}]"));
                self.nested(|this| this.print_expr(lhs));
            }
            ExprKind::Prefix { rhs, .. } => {
                self.line(format!("Prefix [{id}]"));
                self.nested(|this| this.print_expr(rhs));
            }
            ExprKind::Return { expr } => {
                self.line(format!("Return [{id}]"));
                if let Some(inner) = expr {
                    self.nested(|this| this.print_expr(inner));
                }
            }
            ExprKind::Spread(inner) => {
                self.line(format!("Spread [{id}]"));
                self.nested(|this| this.print_expr(inner));
            }
            ExprKind::Struct { path, fields } => {
                let segs: Vec<&str> = path
                    .segs
                    .iter()
                    .map(|seg| self.interner.resolve(seg.sym))
                    .collect();
                self.line(format!("Struct {} [{id}]", segs.join("::")));
                self.nested(|this| {
                    for field in fields {
                        match field {
                            StructExprField::Full(_, value) => this.print_expr(value),
                            StructExprField::Base(base) => this.print_expr(base),
                        }
                    }
                });
            }
            ExprKind::Subscript { lhs, indices } => {
                self.line(format!("Subscript [{id}]"));
                self.nested(|this| {
                    this.print_expr(lhs);
                    for index in indices {
                        this.print_expr(index);
                    }
                });
            }
            ExprKind::Unit => self.line(format!("Unit [{id}]")),
            ExprKind::Err => self.line(format!("Err [{id}]")),
        }
    }

    fn print_block(&mut self, block: &Block) {
        self.line(format!(
            "Block [{:?}.{}]",
            block.hir_id.owner, block.hir_id.child
        ));
        self.nested(|this| {
            for stmt in &block.stmts {
                match &stmt.kind {
                    StmtKind::Let(let_stmt) => {
                        this.line("Let");
                        this.nested(|this| {
                            if let Some(value) = &let_stmt.value {
                                this.print_expr(value);
                            }
                        });
                    }
                    StmtKind::Item(item) => this.print_item(*item),
                    StmtKind::Expr(expr) => this.print_expr(expr),
                }
            }
        });
    }
}
