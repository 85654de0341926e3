//! Traversal protocol for analysis and codegen passes.
//!
//! - [`Visitor`] walks shared references; the `'ast` lifetime lets a pass keep
//!   references into the tree (see [`crate::binding::BindingIndex`]).
//! - [`VisitorMut`] walks mutable references for passes that annotate nodes
//!   in place (types, resolved flags, binding links).
//!
//! Every node type, concrete or enum, has `accept` / `accept_mut`, which call
//! the visitor method for that type.
//!
//! Each method has a default body that recurses through the matching `walk_*`
//! function. Override the methods you care about and call the `walk_*`
//! function to keep descending, or skip it to prune the subtree.
//!
//! Order is a fixed pre-order: a node is visited before its children, operands
//! left to right, conditions before branches, and attach points and predicate
//! before a probe body. The target of a compound assignment is visited once,
//! as the left operand of the assignment's expression. Empty child slots are
//! skipped.

use crate::ast::*;

pub trait Visitor<'ast> {
    fn visit_program(&mut self, program: &'ast Program) {
        walk_program(self, program);
    }

    fn visit_probe(&mut self, probe: &'ast Probe) {
        walk_probe(self, probe);
    }

    fn visit_attach_point(&mut self, _attach_point: &'ast AttachPoint) {}

    fn visit_predicate(&mut self, pred: &'ast Predicate) {
        walk_predicate(self, pred);
    }

    fn visit_stmt(&mut self, stmt: &'ast Statement) {
        walk_stmt(self, stmt);
    }

    fn visit_expr_statement(&mut self, stmt: &'ast ExprStatement) {
        walk_expr_statement(self, stmt);
    }

    fn visit_assign_map(&mut self, stmt: &'ast AssignMapStatement) {
        walk_assign_map(self, stmt);
    }

    fn visit_assign_var(&mut self, stmt: &'ast AssignVarStatement) {
        walk_assign_var(self, stmt);
    }

    fn visit_if(&mut self, stmt: &'ast If) {
        walk_if(self, stmt);
    }

    fn visit_unroll(&mut self, stmt: &'ast Unroll) {
        walk_unroll(self, stmt);
    }

    fn visit_while(&mut self, stmt: &'ast While) {
        walk_while(self, stmt);
    }

    fn visit_jump(&mut self, _stmt: &'ast Jump) {}

    fn visit_expr(&mut self, expr: &'ast Expression) {
        walk_expr(self, expr);
    }

    fn visit_integer(&mut self, _node: &'ast Integer) {}

    fn visit_positional_parameter(&mut self, _node: &'ast PositionalParameter) {}

    fn visit_string(&mut self, _node: &'ast StringLiteral) {}

    fn visit_stack_mode(&mut self, _node: &'ast StackMode) {}

    fn visit_identifier(&mut self, _node: &'ast Identifier) {}

    fn visit_builtin(&mut self, _node: &'ast Builtin) {}

    fn visit_call(&mut self, call: &'ast Call) {
        walk_call(self, call);
    }

    fn visit_map(&mut self, map: &'ast Map) {
        walk_map(self, map);
    }

    fn visit_variable(&mut self, _node: &'ast Variable) {}

    fn visit_binop(&mut self, binop: &'ast Binop) {
        walk_binop(self, binop);
    }

    fn visit_unop(&mut self, unop: &'ast Unop) {
        walk_unop(self, unop);
    }

    fn visit_field_access(&mut self, access: &'ast FieldAccess) {
        walk_field_access(self, access);
    }

    fn visit_array_access(&mut self, access: &'ast ArrayAccess) {
        walk_array_access(self, access);
    }

    fn visit_cast(&mut self, cast: &'ast Cast) {
        walk_cast(self, cast);
    }

    fn visit_tuple(&mut self, tuple: &'ast Tuple) {
        walk_tuple(self, tuple);
    }

    fn visit_ternary(&mut self, ternary: &'ast Ternary) {
        walk_ternary(self, ternary);
    }
}

pub fn walk_program<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, program: &'ast Program) {
    for probe in &program.probes {
        v.visit_probe(probe);
    }
}

pub fn walk_probe<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, probe: &'ast Probe) {
    for ap in &probe.attach_points {
        v.visit_attach_point(ap);
    }
    if let Some(pred) = probe.pred.get() {
        v.visit_predicate(pred);
    }
    walk_stmts(v, &probe.stmts);
}

pub fn walk_predicate<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, pred: &'ast Predicate) {
    if let Some(expr) = pred.expr.get() {
        v.visit_expr(expr);
    }
}

pub fn walk_stmts<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, stmts: &'ast [Statement]) {
    for stmt in stmts {
        v.visit_stmt(stmt);
    }
}

pub fn walk_stmt<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, stmt: &'ast Statement) {
    match stmt {
        Statement::Expr(s) => v.visit_expr_statement(s),
        Statement::AssignMap(s) => v.visit_assign_map(s),
        Statement::AssignVar(s) => v.visit_assign_var(s),
        Statement::If(s) => v.visit_if(s),
        Statement::Unroll(s) => v.visit_unroll(s),
        Statement::While(s) => v.visit_while(s),
        Statement::Jump(s) => v.visit_jump(s),
    }
}

pub fn walk_expr_statement<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, stmt: &'ast ExprStatement) {
    if let Some(expr) = stmt.expr.get() {
        v.visit_expr(expr);
    }
}

pub fn walk_assign_map<'ast, V: Visitor<'ast> + ?Sized>(
    v: &mut V,
    stmt: &'ast AssignMapStatement,
) {
    if let AssignTarget::Owned(map) = &stmt.target {
        if let Some(map) = map.get() {
            v.visit_map(map);
        }
    }
    if let Some(expr) = stmt.expr.get() {
        v.visit_expr(expr);
    }
}

pub fn walk_assign_var<'ast, V: Visitor<'ast> + ?Sized>(
    v: &mut V,
    stmt: &'ast AssignVarStatement,
) {
    if let AssignTarget::Owned(var) = &stmt.target {
        if let Some(var) = var.get() {
            v.visit_variable(var);
        }
    }
    if let Some(expr) = stmt.expr.get() {
        v.visit_expr(expr);
    }
}

pub fn walk_if<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, stmt: &'ast If) {
    if let Some(cond) = stmt.cond.get() {
        v.visit_expr(cond);
    }
    walk_stmts(v, &stmt.stmts);
    if let Some(else_stmts) = &stmt.else_stmts {
        walk_stmts(v, else_stmts);
    }
}

pub fn walk_unroll<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, stmt: &'ast Unroll) {
    if let Some(expr) = stmt.expr.get() {
        v.visit_expr(expr);
    }
    walk_stmts(v, &stmt.stmts);
}

pub fn walk_while<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, stmt: &'ast While) {
    if let Some(cond) = stmt.cond.get() {
        v.visit_expr(cond);
    }
    walk_stmts(v, &stmt.stmts);
}

pub fn walk_expr<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, expr: &'ast Expression) {
    match expr {
        Expression::Integer(n) => v.visit_integer(n),
        Expression::PositionalParameter(n) => v.visit_positional_parameter(n),
        Expression::String(n) => v.visit_string(n),
        Expression::StackMode(n) => v.visit_stack_mode(n),
        Expression::Identifier(n) => v.visit_identifier(n),
        Expression::Builtin(n) => v.visit_builtin(n),
        Expression::Call(n) => v.visit_call(n),
        Expression::Map(n) => v.visit_map(n),
        Expression::Variable(n) => v.visit_variable(n),
        Expression::Binop(n) => v.visit_binop(n),
        Expression::Unop(n) => v.visit_unop(n),
        Expression::FieldAccess(n) => v.visit_field_access(n),
        Expression::ArrayAccess(n) => v.visit_array_access(n),
        Expression::Cast(n) => v.visit_cast(n),
        Expression::Tuple(n) => v.visit_tuple(n),
        Expression::Ternary(n) => v.visit_ternary(n),
    }
}

fn walk_exprs<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, exprs: &'ast [Expression]) {
    for expr in exprs {
        v.visit_expr(expr);
    }
}

fn walk_child<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, child: &'ast crate::Child<Expression>) {
    if let Some(expr) = child.get() {
        v.visit_expr(expr);
    }
}

pub fn walk_call<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, call: &'ast Call) {
    walk_exprs(v, call.args());
}

pub fn walk_map<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, map: &'ast Map) {
    walk_exprs(v, map.keys());
}

pub fn walk_binop<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, binop: &'ast Binop) {
    walk_child(v, &binop.left);
    walk_child(v, &binop.right);
}

pub fn walk_unop<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, unop: &'ast Unop) {
    walk_child(v, &unop.expr);
}

pub fn walk_field_access<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, access: &'ast FieldAccess) {
    walk_child(v, &access.expr);
}

pub fn walk_array_access<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, access: &'ast ArrayAccess) {
    walk_child(v, &access.expr);
    walk_child(v, &access.indexpr);
}

pub fn walk_cast<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, cast: &'ast Cast) {
    walk_child(v, &cast.expr);
}

pub fn walk_tuple<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, tuple: &'ast Tuple) {
    walk_exprs(v, &tuple.elems);
}

pub fn walk_ternary<'ast, V: Visitor<'ast> + ?Sized>(v: &mut V, ternary: &'ast Ternary) {
    walk_child(v, &ternary.cond);
    walk_child(v, &ternary.left);
    walk_child(v, &ternary.right);
}

/// Mutable counterpart of [`Visitor`], same order and same pruning rules.
pub trait VisitorMut {
    fn visit_program(&mut self, program: &mut Program) {
        walk_program_mut(self, program);
    }

    fn visit_probe(&mut self, probe: &mut Probe) {
        walk_probe_mut(self, probe);
    }

    fn visit_attach_point(&mut self, _attach_point: &mut AttachPoint) {}

    fn visit_predicate(&mut self, pred: &mut Predicate) {
        walk_child_mut(self, &mut pred.expr);
    }

    fn visit_stmt(&mut self, stmt: &mut Statement) {
        walk_stmt_mut(self, stmt);
    }

    fn visit_expr_statement(&mut self, stmt: &mut ExprStatement) {
        walk_child_mut(self, &mut stmt.expr);
    }

    fn visit_assign_map(&mut self, stmt: &mut AssignMapStatement) {
        walk_assign_map_mut(self, stmt);
    }

    fn visit_assign_var(&mut self, stmt: &mut AssignVarStatement) {
        walk_assign_var_mut(self, stmt);
    }

    fn visit_if(&mut self, stmt: &mut If) {
        walk_if_mut(self, stmt);
    }

    fn visit_unroll(&mut self, stmt: &mut Unroll) {
        walk_child_mut(self, &mut stmt.expr);
        walk_stmts_mut(self, &mut stmt.stmts);
    }

    fn visit_while(&mut self, stmt: &mut While) {
        walk_child_mut(self, &mut stmt.cond);
        walk_stmts_mut(self, &mut stmt.stmts);
    }

    fn visit_jump(&mut self, _stmt: &mut Jump) {}

    fn visit_expr(&mut self, expr: &mut Expression) {
        walk_expr_mut(self, expr);
    }

    fn visit_integer(&mut self, _node: &mut Integer) {}

    fn visit_positional_parameter(&mut self, _node: &mut PositionalParameter) {}

    fn visit_string(&mut self, _node: &mut StringLiteral) {}

    fn visit_stack_mode(&mut self, _node: &mut StackMode) {}

    fn visit_identifier(&mut self, _node: &mut Identifier) {}

    fn visit_builtin(&mut self, _node: &mut Builtin) {}

    fn visit_call(&mut self, call: &mut Call) {
        if let Some(args) = &mut call.vargs {
            walk_exprs_mut(self, args);
        }
    }

    fn visit_map(&mut self, map: &mut Map) {
        walk_exprs_mut(self, map.keys_mut());
    }

    fn visit_variable(&mut self, _node: &mut Variable) {}

    fn visit_binop(&mut self, binop: &mut Binop) {
        walk_child_mut(self, &mut binop.left);
        walk_child_mut(self, &mut binop.right);
    }

    fn visit_unop(&mut self, unop: &mut Unop) {
        walk_child_mut(self, &mut unop.expr);
    }

    fn visit_field_access(&mut self, access: &mut FieldAccess) {
        walk_child_mut(self, &mut access.expr);
    }

    fn visit_array_access(&mut self, access: &mut ArrayAccess) {
        walk_child_mut(self, &mut access.expr);
        walk_child_mut(self, &mut access.indexpr);
    }

    fn visit_cast(&mut self, cast: &mut Cast) {
        walk_child_mut(self, &mut cast.expr);
    }

    fn visit_tuple(&mut self, tuple: &mut Tuple) {
        walk_exprs_mut(self, &mut tuple.elems);
    }

    fn visit_ternary(&mut self, ternary: &mut Ternary) {
        walk_child_mut(self, &mut ternary.cond);
        walk_child_mut(self, &mut ternary.left);
        walk_child_mut(self, &mut ternary.right);
    }
}

pub fn walk_program_mut<V: VisitorMut + ?Sized>(v: &mut V, program: &mut Program) {
    for probe in &mut program.probes {
        v.visit_probe(probe);
    }
}

pub fn walk_probe_mut<V: VisitorMut + ?Sized>(v: &mut V, probe: &mut Probe) {
    for ap in &mut probe.attach_points {
        v.visit_attach_point(ap);
    }
    if let Some(pred) = probe.pred.get_mut() {
        v.visit_predicate(pred);
    }
    walk_stmts_mut(v, &mut probe.stmts);
}

pub fn walk_stmts_mut<V: VisitorMut + ?Sized>(v: &mut V, stmts: &mut [Statement]) {
    for stmt in stmts {
        v.visit_stmt(stmt);
    }
}

pub fn walk_stmt_mut<V: VisitorMut + ?Sized>(v: &mut V, stmt: &mut Statement) {
    match stmt {
        Statement::Expr(s) => v.visit_expr_statement(s),
        Statement::AssignMap(s) => v.visit_assign_map(s),
        Statement::AssignVar(s) => v.visit_assign_var(s),
        Statement::If(s) => v.visit_if(s),
        Statement::Unroll(s) => v.visit_unroll(s),
        Statement::While(s) => v.visit_while(s),
        Statement::Jump(s) => v.visit_jump(s),
    }
}

pub fn walk_assign_map_mut<V: VisitorMut + ?Sized>(v: &mut V, stmt: &mut AssignMapStatement) {
    if let AssignTarget::Owned(map) = &mut stmt.target {
        if let Some(map) = map.get_mut() {
            v.visit_map(map);
        }
    }
    walk_child_mut(v, &mut stmt.expr);
}

pub fn walk_assign_var_mut<V: VisitorMut + ?Sized>(v: &mut V, stmt: &mut AssignVarStatement) {
    if let AssignTarget::Owned(var) = &mut stmt.target {
        if let Some(var) = var.get_mut() {
            v.visit_variable(var);
        }
    }
    walk_child_mut(v, &mut stmt.expr);
}

pub fn walk_if_mut<V: VisitorMut + ?Sized>(v: &mut V, stmt: &mut If) {
    walk_child_mut(v, &mut stmt.cond);
    walk_stmts_mut(v, &mut stmt.stmts);
    if let Some(else_stmts) = &mut stmt.else_stmts {
        walk_stmts_mut(v, else_stmts);
    }
}

pub fn walk_expr_mut<V: VisitorMut + ?Sized>(v: &mut V, expr: &mut Expression) {
    match expr {
        Expression::Integer(n) => v.visit_integer(n),
        Expression::PositionalParameter(n) => v.visit_positional_parameter(n),
        Expression::String(n) => v.visit_string(n),
        Expression::StackMode(n) => v.visit_stack_mode(n),
        Expression::Identifier(n) => v.visit_identifier(n),
        Expression::Builtin(n) => v.visit_builtin(n),
        Expression::Call(n) => v.visit_call(n),
        Expression::Map(n) => v.visit_map(n),
        Expression::Variable(n) => v.visit_variable(n),
        Expression::Binop(n) => v.visit_binop(n),
        Expression::Unop(n) => v.visit_unop(n),
        Expression::FieldAccess(n) => v.visit_field_access(n),
        Expression::ArrayAccess(n) => v.visit_array_access(n),
        Expression::Cast(n) => v.visit_cast(n),
        Expression::Tuple(n) => v.visit_tuple(n),
        Expression::Ternary(n) => v.visit_ternary(n),
    }
}

pub fn walk_exprs_mut<V: VisitorMut + ?Sized>(v: &mut V, exprs: &mut [Expression]) {
    for expr in exprs {
        v.visit_expr(expr);
    }
}

pub fn walk_child_mut<V: VisitorMut + ?Sized>(v: &mut V, child: &mut crate::Child<Expression>) {
    if let Some(expr) = child.get_mut() {
        v.visit_expr(expr);
    }
}

macro_rules! impl_accept {
    ($($node:ty => $visit:ident),* $(,)?) => {
        $(
            impl $node {
                /// Dispatches to the visitor method for this node kind.
                pub fn accept<'ast, V: Visitor<'ast> + ?Sized>(&'ast self, visitor: &mut V) {
                    visitor.$visit(self);
                }

                pub fn accept_mut<V: VisitorMut + ?Sized>(&mut self, visitor: &mut V) {
                    VisitorMut::$visit(visitor, self);
                }
            }
        )*
    };
}

impl_accept!(
    Program => visit_program,
    Probe => visit_probe,
    AttachPoint => visit_attach_point,
    Predicate => visit_predicate,
    Statement => visit_stmt,
    ExprStatement => visit_expr_statement,
    AssignMapStatement => visit_assign_map,
    AssignVarStatement => visit_assign_var,
    If => visit_if,
    Unroll => visit_unroll,
    While => visit_while,
    Jump => visit_jump,
    Expression => visit_expr,
    Integer => visit_integer,
    PositionalParameter => visit_positional_parameter,
    StringLiteral => visit_string,
    StackMode => visit_stack_mode,
    Identifier => visit_identifier,
    Builtin => visit_builtin,
    Call => visit_call,
    Map => visit_map,
    Variable => visit_variable,
    Binop => visit_binop,
    Unop => visit_unop,
    FieldAccess => visit_field_access,
    ArrayAccess => visit_array_access,
    Cast => visit_cast,
    Tuple => visit_tuple,
    Ternary => visit_ternary,
);
