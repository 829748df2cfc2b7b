//! Scope-aware AST walk shared by the name-resolution rules
//!
//! The walk follows runtime scoping: blocks, loop bodies and catch clauses
//! open a child scope, a declaration's initializer is resolved before the
//! name is bound, and globals sit in an outermost scope of their own.

use std::collections::HashMap;

use crate::executor::types::ast::{Expr, MemberAccess, Span, Stmt, VarKind};
use crate::parser::ScriptDef;

use super::ValidationContext;

// ============================================================================
// Bindings
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum BindingKind {
    /// Injected global or imported module
    Global,
    Let,
    Const,
}

#[derive(Debug, Clone, Copy)]
pub(super) struct Binding {
    /// Globals are numbered by their position in the context, declarations follow
    pub id: usize,
    pub kind: BindingKind,
}

/// Callbacks for the scope-aware walk; all default to no-ops
pub(super) trait ScopeVisitor {
    /// A new name was bound. `shadowed` is whatever the name resolved to before.
    fn declare(&mut self, _binding: Binding, _name: &str, _span: Span, _shadowed: Option<Binding>) {
    }

    /// A name was read
    fn reference(&mut self, _name: &str, _span: Span, _binding: Option<Binding>) {}

    /// A name (or a path below it when `has_path`) was assigned
    fn assign(&mut self, _name: &str, _span: Span, _has_path: bool, _binding: Option<Binding>) {}

    /// `name.property` where `name` resolved to `binding`
    fn member(&mut self, _binding: Binding, _name: &str, _property: &str, _property_span: Span) {}

    /// `new record { fields }`
    fn construct(&mut self, _record: &str, _record_span: Span, _fields: &[(String, Span, Expr)]) {}
}

// ============================================================================
// Walk
// ============================================================================

pub(super) fn walk_script<V: ScopeVisitor>(
    script: &ScriptDef,
    ctx: &ValidationContext,
    visitor: &mut V,
) {
    let globals = ctx
        .globals
        .iter()
        .enumerate()
        .map(|(id, global)| {
            (
                global.name.clone(),
                Binding {
                    id,
                    kind: BindingKind::Global,
                },
            )
        })
        .collect();

    let mut walker = Walker {
        scopes: vec![globals],
        next_id: ctx.globals.len(),
        visitor,
    };
    walker.stmt(&script.body);
}

struct Walker<'v, V> {
    scopes: Vec<HashMap<String, Binding>>,
    next_id: usize,
    visitor: &'v mut V,
}

impl<V: ScopeVisitor> Walker<'_, V> {
    fn resolve(&self, name: &str) -> Option<Binding> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(name).copied())
    }

    fn declare(&mut self, name: &str, span: Span, kind: BindingKind) {
        let binding = Binding {
            id: self.next_id,
            kind,
        };
        self.next_id += 1;

        let shadowed = self.resolve(name);
        self.visitor.declare(binding, name, span, shadowed);
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.to_string(), binding);
        }
    }

    fn scoped(&mut self, f: impl FnOnce(&mut Self)) {
        self.scopes.push(HashMap::new());
        f(self);
        self.scopes.pop();
    }

    fn stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Block { body, .. } => self.scoped(|w| {
                for s in body {
                    w.stmt(s);
                }
            }),

            Stmt::Declare {
                var_kind,
                name,
                name_span,
                init,
                ..
            } => {
                // Initializer first, so `let x = x` resolves the outer x
                if let Some(init) = init {
                    self.expr(init);
                }
                self.declare(name, *name_span, kind_of(*var_kind));
            }

            Stmt::Assign {
                var,
                var_span,
                path,
                value,
                ..
            } => {
                for segment in path {
                    if let MemberAccess::Index { expr, .. } = segment {
                        self.expr(expr);
                    }
                }
                self.expr(value);
                let binding = self.resolve(var);
                self.visitor
                    .assign(var, *var_span, !path.is_empty(), binding);
            }

            Stmt::If {
                test,
                then_s,
                else_s,
                ..
            } => {
                self.expr(test);
                self.scoped(|w| w.stmt(then_s));
                if let Some(else_s) = else_s {
                    self.scoped(|w| w.stmt(else_s));
                }
            }

            Stmt::While { test, body, .. } => {
                self.expr(test);
                self.scoped(|w| w.stmt(body));
            }

            Stmt::ForLoop {
                var_kind,
                binding,
                binding_span,
                iterable,
                body,
                ..
            } => {
                self.expr(iterable);
                self.scoped(|w| {
                    w.declare(binding, *binding_span, kind_of(*var_kind));
                    w.stmt(body);
                });
            }

            Stmt::Try {
                body,
                catch_var,
                catch_var_span,
                catch_body,
                ..
            } => {
                self.scoped(|w| w.stmt(body));
                self.scoped(|w| {
                    w.declare(catch_var, *catch_var_span, BindingKind::Let);
                    w.stmt(catch_body);
                });
            }

            Stmt::Return { value, .. } => {
                if let Some(value) = value {
                    self.expr(value);
                }
            }

            Stmt::Throw { value, .. } => self.expr(value),
            Stmt::Expr { expr, .. } => self.expr(expr),
            Stmt::Break { .. } | Stmt::Continue { .. } => {}
        }
    }

    fn expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Ident { name, span } => {
                let binding = self.resolve(name);
                self.visitor.reference(name, *span, binding);
            }

            Expr::Member {
                object,
                property,
                property_span,
                ..
            } => {
                self.expr(object);
                if let Expr::Ident { name, .. } = object.as_ref() {
                    if let Some(binding) = self.resolve(name) {
                        self.visitor
                            .member(binding, name, property, *property_span);
                    }
                }
            }

            Expr::Index { object, index, .. } => {
                self.expr(object);
                self.expr(index);
            }

            Expr::Call { callee, args, .. } => {
                self.expr(callee);
                for arg in args {
                    self.expr(arg);
                }
            }

            Expr::BinaryOp { left, right, .. } => {
                self.expr(left);
                self.expr(right);
            }

            Expr::UnaryOp { operand, .. } => self.expr(operand),

            Expr::Ternary {
                condition,
                consequent,
                alternate,
                ..
            } => {
                self.expr(condition);
                self.expr(consequent);
                self.expr(alternate);
            }

            Expr::LitList { elements, .. } => {
                for element in elements {
                    self.expr(element);
                }
            }

            Expr::LitObj { properties, .. } => {
                for (_, _, value) in properties {
                    self.expr(value);
                }
            }

            Expr::New {
                record,
                record_span,
                fields,
                ..
            } => {
                for (_, _, value) in fields {
                    self.expr(value);
                }
                self.visitor.construct(record, *record_span, fields);
            }

            Expr::LitBool { .. } | Expr::LitNum { .. } | Expr::LitStr { .. } | Expr::LitNull { .. } => {
            }
        }
    }
}

fn kind_of(var_kind: VarKind) -> BindingKind {
    match var_kind {
        VarKind::Let => BindingKind::Let,
        VarKind::Const => BindingKind::Const,
    }
}
