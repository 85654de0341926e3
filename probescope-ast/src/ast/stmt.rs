use crate::ast::expr::{Binop, Expression, Map, Variable};
use crate::ast::LeafCopy;
use crate::child::Child;
use crate::location::Location;
use crate::ops::{BinaryOp, JumpKind};

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Expr(ExprStatement),
    AssignMap(AssignMapStatement),
    AssignVar(AssignVarStatement),
    If(If),
    Unroll(Unroll),
    While(While),
    Jump(Jump),
}

impl Statement {
    pub fn loc(&self) -> Location {
        match self {
            Statement::Expr(s) => s.loc,
            Statement::AssignMap(s) => s.loc,
            Statement::AssignVar(s) => s.loc,
            Statement::If(s) => s.loc,
            Statement::Unroll(s) => s.loc,
            Statement::While(s) => s.loc,
            Statement::Jump(s) => s.loc,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Statement::Expr(_) => "ExprStatement",
            Statement::AssignMap(_) => "AssignMapStatement",
            Statement::AssignVar(_) => "AssignVarStatement",
            Statement::If(_) => "If",
            Statement::Unroll(_) => "Unroll",
            Statement::While(_) => "While",
            Statement::Jump(_) => "Jump",
        }
    }
}

impl LeafCopy for Statement {
    fn leaf_copy(&self) -> Self {
        match self {
            Statement::Expr(s) => Statement::Expr(s.leaf_copy()),
            Statement::AssignMap(s) => Statement::AssignMap(s.leaf_copy()),
            Statement::AssignVar(s) => Statement::AssignVar(s.leaf_copy()),
            Statement::If(s) => Statement::If(s.leaf_copy()),
            Statement::Unroll(s) => Statement::Unroll(s.leaf_copy()),
            Statement::While(s) => Statement::While(s.leaf_copy()),
            Statement::Jump(s) => Statement::Jump(s.leaf_copy()),
        }
    }
}

macro_rules! impl_from_stmt {
    ($($variant:ident($node:ty)),* $(,)?) => {
        $(
            impl From<$node> for Statement {
                fn from(node: $node) -> Self {
                    Statement::$variant(node)
                }
            }
        )*
    };
}

impl_from_stmt!(
    Expr(ExprStatement),
    AssignMap(AssignMapStatement),
    AssignVar(AssignVarStatement),
    If(If),
    Unroll(Unroll),
    While(While),
    Jump(Jump),
);

#[derive(Debug, Clone, PartialEq)]
pub struct ExprStatement {
    pub loc: Location,
    pub expr: Child<Expression>,
}

impl ExprStatement {
    pub fn new(expr: impl Into<Expression>, loc: Location) -> Self {
        Self {
            loc,
            expr: Child::new(expr.into()),
        }
    }
}

impl LeafCopy for ExprStatement {
    fn leaf_copy(&self) -> Self {
        Self {
            loc: self.loc,
            expr: Child::empty(),
        }
    }
}

/// Who owns the left-hand side of an assignment.
///
/// `Compound` is used for `target op= rhs`, lowered to
/// `target = target op rhs`: the single target node lives in the statement's
/// expression as the left operand of a [`Binop`], and the statement only
/// refers to it. Statements hold their target privately, so `Compound` can
/// only come from the `compound` constructors (or a leaf copy of one).
#[derive(Debug, Clone, PartialEq)]
pub enum AssignTarget<T> {
    Owned(Child<T>),
    Compound,
}

impl<T> AssignTarget<T> {
    pub fn is_compound(&self) -> bool {
        matches!(self, AssignTarget::Compound)
    }

    fn leaf_copy(&self) -> Self {
        match self {
            AssignTarget::Owned(_) => AssignTarget::Owned(Child::empty()),
            AssignTarget::Compound => AssignTarget::Compound,
        }
    }
}

fn compound_lhs(expr: &Child<Expression>) -> Option<&Expression> {
    expr.get()
        .and_then(Expression::as_binop)
        .and_then(|binop| binop.left.get())
}

fn compound_lhs_mut(expr: &mut Child<Expression>) -> Option<&mut Expression> {
    match expr.get_mut() {
        Some(Expression::Binop(binop)) => binop.left.get_mut(),
        _ => None,
    }
}

/// `@map[keys] = expr` or `@map[keys] op= expr`.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignMapStatement {
    pub loc: Location,
    pub(crate) target: AssignTarget<Map>,
    /// For a compound statement this stays a `Binop` whose left operand is
    /// the target.
    pub expr: Child<Expression>,
}

impl AssignMapStatement {
    pub fn new(map: Map, expr: impl Into<Expression>, loc: Location) -> Self {
        Self {
            loc,
            target: AssignTarget::Owned(Child::new(map)),
            expr: Child::new(expr.into()),
        }
    }

    /// Builds `map = map op rhs` with `map` owned by the generated `Binop`.
    pub fn compound(map: Map, op: BinaryOp, rhs: impl Into<Expression>, loc: Location) -> Self {
        let binop = Binop::new(map, op, rhs, loc);
        Self {
            loc,
            target: AssignTarget::Compound,
            expr: Child::new(binop.into()),
        }
    }

    pub fn is_compound(&self) -> bool {
        self.target.is_compound()
    }

    pub fn target(&self) -> &AssignTarget<Map> {
        &self.target
    }

    /// The assigned map, wherever it is owned.
    pub fn map(&self) -> Option<&Map> {
        match &self.target {
            AssignTarget::Owned(map) => map.get(),
            AssignTarget::Compound => compound_lhs(&self.expr).and_then(Expression::as_map),
        }
    }

    pub fn map_mut(&mut self) -> Option<&mut Map> {
        match &mut self.target {
            AssignTarget::Owned(map) => map.get_mut(),
            AssignTarget::Compound => {
                compound_lhs_mut(&mut self.expr).and_then(Expression::as_map_mut)
            }
        }
    }
}

impl LeafCopy for AssignMapStatement {
    fn leaf_copy(&self) -> Self {
        Self {
            loc: self.loc,
            target: self.target.leaf_copy(),
            expr: Child::empty(),
        }
    }
}

/// `$var = expr` or `$var op= expr`.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignVarStatement {
    pub loc: Location,
    pub(crate) target: AssignTarget<Variable>,
    /// For a compound statement this stays a `Binop` whose left operand is
    /// the target.
    pub expr: Child<Expression>,
}

impl AssignVarStatement {
    pub fn new(var: Variable, expr: impl Into<Expression>, loc: Location) -> Self {
        Self {
            loc,
            target: AssignTarget::Owned(Child::new(var)),
            expr: Child::new(expr.into()),
        }
    }

    /// Builds `var = var op rhs` with `var` owned by the generated `Binop`.
    pub fn compound(
        var: Variable,
        op: BinaryOp,
        rhs: impl Into<Expression>,
        loc: Location,
    ) -> Self {
        let binop = Binop::new(var, op, rhs, loc);
        Self {
            loc,
            target: AssignTarget::Compound,
            expr: Child::new(binop.into()),
        }
    }

    pub fn is_compound(&self) -> bool {
        self.target.is_compound()
    }

    pub fn target(&self) -> &AssignTarget<Variable> {
        &self.target
    }

    pub fn var(&self) -> Option<&Variable> {
        match &self.target {
            AssignTarget::Owned(var) => var.get(),
            AssignTarget::Compound => compound_lhs(&self.expr).and_then(Expression::as_variable),
        }
    }

    pub fn var_mut(&mut self) -> Option<&mut Variable> {
        match &mut self.target {
            AssignTarget::Owned(var) => var.get_mut(),
            AssignTarget::Compound => {
                compound_lhs_mut(&mut self.expr).and_then(Expression::as_variable_mut)
            }
        }
    }
}

impl LeafCopy for AssignVarStatement {
    fn leaf_copy(&self) -> Self {
        Self {
            loc: self.loc,
            target: self.target.leaf_copy(),
            expr: Child::empty(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct If {
    pub loc: Location,
    pub cond: Child<Expression>,
    pub stmts: Vec<Statement>,
    /// `None` when there is no `else` branch at all.
    pub else_stmts: Option<Vec<Statement>>,
}

impl If {
    pub fn new(cond: impl Into<Expression>, stmts: Vec<Statement>, loc: Location) -> Self {
        Self {
            loc,
            cond: Child::new(cond.into()),
            stmts,
            else_stmts: None,
        }
    }

    pub fn with_else(
        cond: impl Into<Expression>,
        stmts: Vec<Statement>,
        else_stmts: Vec<Statement>,
        loc: Location,
    ) -> Self {
        Self {
            else_stmts: Some(else_stmts),
            ..Self::new(cond, stmts, loc)
        }
    }
}

impl LeafCopy for If {
    fn leaf_copy(&self) -> Self {
        Self {
            loc: self.loc,
            cond: Child::empty(),
            stmts: Vec::new(),
            else_stmts: None,
        }
    }
}

/// `unroll (expr) { ... }`.
#[derive(Debug, Clone, PartialEq)]
pub struct Unroll {
    pub loc: Location,
    /// Evaluated repeat count, written once `expr` has been folded.
    pub var: i64,
    pub expr: Child<Expression>,
    pub stmts: Vec<Statement>,
}

impl Unroll {
    pub fn new(expr: impl Into<Expression>, stmts: Vec<Statement>, loc: Location) -> Self {
        Self {
            loc,
            var: 0,
            expr: Child::new(expr.into()),
            stmts,
        }
    }
}

impl LeafCopy for Unroll {
    fn leaf_copy(&self) -> Self {
        Self {
            loc: self.loc,
            var: self.var,
            expr: Child::empty(),
            stmts: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct While {
    pub loc: Location,
    pub cond: Child<Expression>,
    pub stmts: Vec<Statement>,
}

impl While {
    pub fn new(cond: impl Into<Expression>, stmts: Vec<Statement>, loc: Location) -> Self {
        Self {
            loc,
            cond: Child::new(cond.into()),
            stmts,
        }
    }
}

impl LeafCopy for While {
    fn leaf_copy(&self) -> Self {
        Self {
            loc: self.loc,
            cond: Child::empty(),
            stmts: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Jump {
    pub loc: Location,
    pub kind: JumpKind,
}

impl Jump {
    pub fn new(kind: JumpKind, loc: Location) -> Self {
        Self { loc, kind }
    }
}

impl LeafCopy for Jump {
    fn leaf_copy(&self) -> Self {
        self.clone()
    }
}
