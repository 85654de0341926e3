//! Indented text dump of a tree, one node per line.

use crate::ast::*;
use crate::types::PositionalParameterType;
use crate::visit::{self, Visitor};

#[derive(Debug, Default)]
pub struct Printer {
    out: String,
    depth: usize,
}

impl Printer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Renders a whole program.
    pub fn print(program: &Program) -> String {
        let mut printer = Printer::new();
        printer.visit_program(program);
        printer.finish()
    }

    pub fn finish(self) -> String {
        self.out
    }

    fn line(&mut self, text: impl AsRef<str>) {
        for _ in 0..self.depth {
            self.out.push(' ');
        }
        self.out.push_str(text.as_ref());
        self.out.push('\n');
    }

    fn nested(&mut self, f: impl FnOnce(&mut Self)) {
        self.depth += 1;
        f(self);
        self.depth -= 1;
    }

    fn block(&mut self, header: &str, stmts: &[Statement]) {
        self.line(header);
        self.nested(|p| {
            for stmt in stmts {
                p.visit_stmt(stmt);
            }
        });
    }
}

fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\n' => escaped.push_str("\\n"),
            '\t' => escaped.push_str("\\t"),
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            c => escaped.push(c),
        }
    }
    escaped
}

impl<'ast> Visitor<'ast> for Printer {
    fn visit_program(&mut self, program: &'ast Program) {
        if !program.c_definitions.is_empty() {
            self.line(program.c_definitions.trim_end());
        }
        self.line("Program");
        self.nested(|p| visit::walk_program(p, program));
    }

    fn visit_probe(&mut self, probe: &'ast Probe) {
        for ap in &probe.attach_points {
            self.visit_attach_point(ap);
        }
        self.nested(|p| {
            if let Some(pred) = probe.pred.get() {
                p.visit_predicate(pred);
            }
            visit::walk_stmts(p, &probe.stmts);
        });
    }

    fn visit_attach_point(&mut self, ap: &'ast AttachPoint) {
        self.line(ap.name(&ap.func));
    }

    fn visit_predicate(&mut self, pred: &'ast Predicate) {
        self.line("pred");
        self.nested(|p| visit::walk_predicate(p, pred));
    }

    fn visit_assign_map(&mut self, stmt: &'ast AssignMapStatement) {
        self.line(if stmt.is_compound() { "= (compound)" } else { "=" });
        self.nested(|p| visit::walk_assign_map(p, stmt));
    }

    fn visit_assign_var(&mut self, stmt: &'ast AssignVarStatement) {
        self.line(if stmt.is_compound() { "= (compound)" } else { "=" });
        self.nested(|p| visit::walk_assign_var(p, stmt));
    }

    fn visit_if(&mut self, stmt: &'ast If) {
        self.line("if");
        self.nested(|p| {
            if let Some(cond) = stmt.cond.get() {
                p.visit_expr(cond);
            }
            p.block("then", &stmt.stmts);
            if let Some(else_stmts) = &stmt.else_stmts {
                p.block("else", else_stmts);
            }
        });
    }

    fn visit_unroll(&mut self, stmt: &'ast Unroll) {
        self.line(format!("unroll {}", stmt.var));
        self.nested(|p| visit::walk_unroll(p, stmt));
    }

    fn visit_while(&mut self, stmt: &'ast While) {
        self.line("while");
        self.nested(|p| visit::walk_while(p, stmt));
    }

    fn visit_jump(&mut self, stmt: &'ast Jump) {
        self.line(stmt.kind.as_str());
    }

    fn visit_integer(&mut self, node: &'ast Integer) {
        self.line(format!("int: {}", node.n));
    }

    fn visit_positional_parameter(&mut self, node: &'ast PositionalParameter) {
        match node.ptype {
            PositionalParameterType::Positional => self.line(format!("param: ${}", node.n)),
            PositionalParameterType::Count => self.line("param: $#"),
        }
    }

    fn visit_string(&mut self, node: &'ast StringLiteral) {
        self.line(format!("string: {}", escape(&node.value)));
    }

    fn visit_stack_mode(&mut self, node: &'ast StackMode) {
        self.line(format!("stack_mode: {}", node.mode));
    }

    fn visit_identifier(&mut self, node: &'ast Identifier) {
        self.line(format!("identifier: {}", node.ident));
    }

    fn visit_builtin(&mut self, node: &'ast Builtin) {
        self.line(format!("builtin: {}", node.ident));
    }

    fn visit_call(&mut self, call: &'ast Call) {
        self.line(format!("call: {}", call.func));
        self.nested(|p| visit::walk_call(p, call));
    }

    fn visit_map(&mut self, map: &'ast Map) {
        self.line(format!("map: {}", map.ident));
        self.nested(|p| visit::walk_map(p, map));
    }

    fn visit_variable(&mut self, node: &'ast Variable) {
        self.line(format!("variable: {}", node.ident));
    }

    fn visit_binop(&mut self, binop: &'ast Binop) {
        self.line(binop.op.as_str());
        self.nested(|p| visit::walk_binop(p, binop));
    }

    fn visit_unop(&mut self, unop: &'ast Unop) {
        if unop.is_post_op {
            self.line(format!("{} (post)", unop.op));
        } else {
            self.line(unop.op.as_str());
        }
        self.nested(|p| visit::walk_unop(p, unop));
    }

    fn visit_field_access(&mut self, access: &'ast FieldAccess) {
        self.line(".");
        self.nested(|p| {
            visit::walk_field_access(p, access);
            match &access.field {
                FieldSelector::Named(name) => p.line(name),
                FieldSelector::Index(index) => p.line(index.to_string()),
            }
        });
    }

    fn visit_array_access(&mut self, access: &'ast ArrayAccess) {
        self.line("[]");
        self.nested(|p| visit::walk_array_access(p, access));
    }

    fn visit_cast(&mut self, cast: &'ast Cast) {
        let stars = "*".repeat(cast.pointer_depth as usize);
        if stars.is_empty() {
            self.line(format!("({})", cast.cast_type));
        } else {
            self.line(format!("({} {})", cast.cast_type, stars));
        }
        self.nested(|p| visit::walk_cast(p, cast));
    }

    fn visit_tuple(&mut self, tuple: &'ast Tuple) {
        self.line("tuple:");
        self.nested(|p| visit::walk_tuple(p, tuple));
    }

    fn visit_ternary(&mut self, ternary: &'ast Ternary) {
        self.line("?:");
        self.nested(|p| visit::walk_ternary(p, ternary));
    }
}
