use crate::ast::LeafCopy;
use crate::binding::{MapRef, NodeId, VarRef};
use crate::child::Child;
use crate::location::Location;
use crate::ops::{BinaryOp, UnaryOp};
use crate::types::{PositionalParameterType, SizedType};

/// Fields shared by every expression node.
///
/// `bound_map`, `bound_var` and `key_for_map` are lookup links, not ownership
/// edges: they are copied as plain values and never followed when dropping or
/// copying a tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExprMeta {
    pub loc: Location,
    pub ty: SizedType,
    /// Map this expression is assigned into.
    pub bound_map: Option<MapRef>,
    /// Variable this expression is assigned into.
    pub bound_var: Option<VarRef>,
    /// Map this expression is a key of.
    pub key_for_map: Option<MapRef>,
    pub is_literal: bool,
    pub is_variable: bool,
    pub is_map: bool,
}

impl ExprMeta {
    pub fn new(loc: Location) -> Self {
        Self {
            loc,
            ..Default::default()
        }
    }

    fn literal(loc: Location) -> Self {
        Self {
            is_literal: true,
            ..Self::new(loc)
        }
    }
}

/// Any expression node.
///
/// `Clone` and `Drop` work from an explicit stack rather than recursion, so
/// arbitrarily deep trees (long operator chains from generated scripts) can be
/// copied for expansion and freed without exhausting the thread stack.
#[derive(Debug, PartialEq)]
pub enum Expression {
    Integer(Integer),
    PositionalParameter(PositionalParameter),
    String(StringLiteral),
    StackMode(StackMode),
    Identifier(Identifier),
    Builtin(Builtin),
    Call(Call),
    Map(Map),
    Variable(Variable),
    Binop(Binop),
    Unop(Unop),
    FieldAccess(FieldAccess),
    ArrayAccess(ArrayAccess),
    Cast(Cast),
    Tuple(Tuple),
    Ternary(Ternary),
}

macro_rules! with_node {
    ($expr:expr, $node:ident => $body:expr) => {
        match $expr {
            Expression::Integer($node) => $body,
            Expression::PositionalParameter($node) => $body,
            Expression::String($node) => $body,
            Expression::StackMode($node) => $body,
            Expression::Identifier($node) => $body,
            Expression::Builtin($node) => $body,
            Expression::Call($node) => $body,
            Expression::Map($node) => $body,
            Expression::Variable($node) => $body,
            Expression::Binop($node) => $body,
            Expression::Unop($node) => $body,
            Expression::FieldAccess($node) => $body,
            Expression::ArrayAccess($node) => $body,
            Expression::Cast($node) => $body,
            Expression::Tuple($node) => $body,
            Expression::Ternary($node) => $body,
        }
    };
}

macro_rules! impl_from_node {
    ($($variant:ident($node:ty)),* $(,)?) => {
        $(
            impl From<$node> for Expression {
                fn from(node: $node) -> Self {
                    Expression::$variant(node)
                }
            }
        )*
    };
}

impl_from_node!(
    Integer(Integer),
    PositionalParameter(PositionalParameter),
    String(StringLiteral),
    StackMode(StackMode),
    Identifier(Identifier),
    Builtin(Builtin),
    Call(Call),
    Map(Map),
    Variable(Variable),
    Binop(Binop),
    Unop(Unop),
    FieldAccess(FieldAccess),
    ArrayAccess(ArrayAccess),
    Cast(Cast),
    Tuple(Tuple),
    Ternary(Ternary),
);

impl Expression {
    pub fn meta(&self) -> &ExprMeta {
        with_node!(self, node => &node.meta)
    }

    pub fn meta_mut(&mut self) -> &mut ExprMeta {
        with_node!(self, node => &mut node.meta)
    }

    pub fn loc(&self) -> Location {
        self.meta().loc
    }

    pub fn ty(&self) -> &SizedType {
        &self.meta().ty
    }

    pub fn is_literal(&self) -> bool {
        self.meta().is_literal
    }

    pub fn is_variable(&self) -> bool {
        self.meta().is_variable
    }

    pub fn is_map(&self) -> bool {
        self.meta().is_map
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Expression::Integer(_) => "Integer",
            Expression::PositionalParameter(_) => "PositionalParameter",
            Expression::String(_) => "String",
            Expression::StackMode(_) => "StackMode",
            Expression::Identifier(_) => "Identifier",
            Expression::Builtin(_) => "Builtin",
            Expression::Call(_) => "Call",
            Expression::Map(_) => "Map",
            Expression::Variable(_) => "Variable",
            Expression::Binop(_) => "Binop",
            Expression::Unop(_) => "Unop",
            Expression::FieldAccess(_) => "FieldAccess",
            Expression::ArrayAccess(_) => "ArrayAccess",
            Expression::Cast(_) => "Cast",
            Expression::Tuple(_) => "Tuple",
            Expression::Ternary(_) => "Ternary",
        }
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Expression::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_map_mut(&mut self) -> Option<&mut Map> {
        match self {
            Expression::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_variable(&self) -> Option<&Variable> {
        match self {
            Expression::Variable(var) => Some(var),
            _ => None,
        }
    }

    pub fn as_variable_mut(&mut self) -> Option<&mut Variable> {
        match self {
            Expression::Variable(var) => Some(var),
            _ => None,
        }
    }

    pub fn as_binop(&self) -> Option<&Binop> {
        match self {
            Expression::Binop(binop) => Some(binop),
            _ => None,
        }
    }
}

impl LeafCopy for Expression {
    fn leaf_copy(&self) -> Self {
        match self {
            Expression::Integer(n) => Expression::Integer(n.leaf_copy()),
            Expression::PositionalParameter(p) => Expression::PositionalParameter(p.leaf_copy()),
            Expression::String(s) => Expression::String(s.leaf_copy()),
            Expression::StackMode(s) => Expression::StackMode(s.leaf_copy()),
            Expression::Identifier(i) => Expression::Identifier(i.leaf_copy()),
            Expression::Builtin(b) => Expression::Builtin(b.leaf_copy()),
            Expression::Call(c) => Expression::Call(c.leaf_copy()),
            Expression::Map(m) => Expression::Map(m.leaf_copy()),
            Expression::Variable(v) => Expression::Variable(v.leaf_copy()),
            Expression::Binop(b) => Expression::Binop(b.leaf_copy()),
            Expression::Unop(u) => Expression::Unop(u.leaf_copy()),
            Expression::FieldAccess(f) => Expression::FieldAccess(f.leaf_copy()),
            Expression::ArrayAccess(a) => Expression::ArrayAccess(a.leaf_copy()),
            Expression::Cast(c) => Expression::Cast(c.leaf_copy()),
            Expression::Tuple(t) => Expression::Tuple(t.leaf_copy()),
            Expression::Ternary(t) => Expression::Ternary(t.leaf_copy()),
        }
    }
}

impl Expression {
    /// Owned children in traversal order.
    fn children(&self) -> Vec<&Expression> {
        let mut children = Vec::new();
        match self {
            Expression::Integer(_)
            | Expression::PositionalParameter(_)
            | Expression::String(_)
            | Expression::StackMode(_)
            | Expression::Identifier(_)
            | Expression::Builtin(_)
            | Expression::Variable(_) => {}
            Expression::Call(n) => children.extend(n.args()),
            Expression::Map(n) => children.extend(n.keys()),
            Expression::Binop(n) => children.extend(n.left.get().into_iter().chain(n.right.get())),
            Expression::Unop(n) => children.extend(n.expr.get()),
            Expression::FieldAccess(n) => children.extend(n.expr.get()),
            Expression::ArrayAccess(n) => {
                children.extend(n.expr.get().into_iter().chain(n.indexpr.get()))
            }
            Expression::Cast(n) => children.extend(n.expr.get()),
            Expression::Tuple(n) => children.extend(&n.elems),
            Expression::Ternary(n) => children.extend(
                n.cond
                    .get()
                    .into_iter()
                    .chain(n.left.get())
                    .chain(n.right.get()),
            ),
        }
        children
    }

    /// Refills the empty slots of a leaf copy of `source` with `children`,
    /// given in the order [`Expression::children`] lists them.
    fn attach_children(&mut self, source: &Expression, children: Vec<Expression>) {
        fn fill(
            slot: &mut Child<Expression>,
            source: &Child<Expression>,
            next: &mut std::vec::IntoIter<Expression>,
        ) {
            if !source.is_empty() {
                if let Some(expr) = next.next() {
                    slot.replace(expr);
                }
            }
        }

        let mut next = children.into_iter();
        match (self, source) {
            (Expression::Call(copy), Expression::Call(src)) => {
                copy.vargs = src.vargs.as_ref().map(|_| next.by_ref().collect());
            }
            (Expression::Map(copy), Expression::Map(src)) => {
                copy.vargs = src.vargs.as_ref().map(|_| next.by_ref().collect());
            }
            (Expression::Binop(copy), Expression::Binop(src)) => {
                fill(&mut copy.left, &src.left, &mut next);
                fill(&mut copy.right, &src.right, &mut next);
            }
            (Expression::Unop(copy), Expression::Unop(src)) => {
                fill(&mut copy.expr, &src.expr, &mut next);
            }
            (Expression::FieldAccess(copy), Expression::FieldAccess(src)) => {
                fill(&mut copy.expr, &src.expr, &mut next);
            }
            (Expression::ArrayAccess(copy), Expression::ArrayAccess(src)) => {
                fill(&mut copy.expr, &src.expr, &mut next);
                fill(&mut copy.indexpr, &src.indexpr, &mut next);
            }
            (Expression::Cast(copy), Expression::Cast(src)) => {
                fill(&mut copy.expr, &src.expr, &mut next);
            }
            (Expression::Tuple(copy), Expression::Tuple(_)) => {
                copy.elems = next.collect();
            }
            (Expression::Ternary(copy), Expression::Ternary(src)) => {
                fill(&mut copy.cond, &src.cond, &mut next);
                fill(&mut copy.left, &src.left, &mut next);
                fill(&mut copy.right, &src.right, &mut next);
            }
            _ => {}
        }
    }

    /// Moves every owned child into `out`, leaving the slots empty.
    fn detach_children(&mut self, out: &mut Vec<Expression>) {
        match self {
            Expression::Integer(_)
            | Expression::PositionalParameter(_)
            | Expression::String(_)
            | Expression::StackMode(_)
            | Expression::Identifier(_)
            | Expression::Builtin(_)
            | Expression::Variable(_) => {}
            Expression::Call(n) => out.extend(n.vargs.take().into_iter().flatten()),
            Expression::Map(n) => out.extend(n.vargs.take().into_iter().flatten()),
            Expression::Binop(n) => out.extend(n.left.take().into_iter().chain(n.right.take())),
            Expression::Unop(n) => out.extend(n.expr.take()),
            Expression::FieldAccess(n) => out.extend(n.expr.take()),
            Expression::ArrayAccess(n) => {
                out.extend(n.expr.take().into_iter().chain(n.indexpr.take()))
            }
            Expression::Cast(n) => out.extend(n.expr.take()),
            Expression::Tuple(n) => out.append(&mut n.elems),
            Expression::Ternary(n) => out.extend(
                n.cond
                    .take()
                    .into_iter()
                    .chain(n.left.take())
                    .chain(n.right.take()),
            ),
        }
    }
}

impl Clone for Expression {
    fn clone(&self) -> Self {
        enum Step<'a> {
            Enter(&'a Expression),
            Build(&'a Expression, usize),
        }

        // post-order: children are built first and sit on top of `built`
        let mut steps = vec![Step::Enter(self)];
        let mut built: Vec<Expression> = Vec::new();
        while let Some(step) = steps.pop() {
            match step {
                Step::Enter(expr) => {
                    let children = expr.children();
                    steps.push(Step::Build(expr, children.len()));
                    steps.extend(children.into_iter().rev().map(Step::Enter));
                }
                Step::Build(expr, count) => {
                    let children = built.split_off(built.len().saturating_sub(count));
                    let mut copy = expr.leaf_copy();
                    copy.attach_children(expr, children);
                    built.push(copy);
                }
            }
        }
        built.pop().unwrap_or_else(|| self.leaf_copy())
    }
}

impl Drop for Expression {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.detach_children(&mut pending);
        while let Some(mut expr) = pending.pop() {
            expr.detach_children(&mut pending);
        }
    }
}

// Nodes without owned children: a leaf copy is a plain clone.
macro_rules! impl_leaf_copy_by_clone {
    ($($node:ty),* $(,)?) => {
        $(
            impl LeafCopy for $node {
                fn leaf_copy(&self) -> Self {
                    self.clone()
                }
            }
        )*
    };
}

impl_leaf_copy_by_clone!(
    Integer,
    PositionalParameter,
    StringLiteral,
    StackMode,
    Identifier,
    Builtin,
    Variable,
);

#[derive(Debug, Clone, PartialEq)]
pub struct Integer {
    pub meta: ExprMeta,
    pub n: i64,
}

impl Integer {
    pub fn new(n: i64, loc: Location) -> Self {
        Self {
            meta: ExprMeta::literal(loc),
            n,
        }
    }
}

/// `$1`, `$2`, ... or `$#`.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionalParameter {
    pub meta: ExprMeta,
    pub ptype: PositionalParameterType,
    pub n: i64,
    /// Set when the parameter is used inside `str()`.
    pub is_in_str: bool,
}

impl PositionalParameter {
    pub fn new(ptype: PositionalParameterType, n: i64, loc: Location) -> Self {
        Self {
            meta: ExprMeta::literal(loc),
            ptype,
            n,
            is_in_str: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StringLiteral {
    pub meta: ExprMeta,
    pub value: String,
}

impl StringLiteral {
    pub fn new(value: impl Into<String>, loc: Location) -> Self {
        Self {
            meta: ExprMeta::literal(loc),
            value: value.into(),
        }
    }
}

/// Stack rendering mode passed to `ustack`/`kstack`, e.g. `perf`.
#[derive(Debug, Clone, PartialEq)]
pub struct StackMode {
    pub meta: ExprMeta,
    pub mode: String,
}

impl StackMode {
    pub fn new(mode: impl Into<String>, loc: Location) -> Self {
        Self {
            meta: ExprMeta::new(loc),
            mode: mode.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Identifier {
    pub meta: ExprMeta,
    pub ident: String,
}

impl Identifier {
    pub fn new(ident: impl Into<String>, loc: Location) -> Self {
        Self {
            meta: ExprMeta::new(loc),
            ident: ident.into(),
        }
    }
}

/// Builtin such as `pid`, `comm` or `arg0`.
#[derive(Debug, Clone, PartialEq)]
pub struct Builtin {
    pub meta: ExprMeta,
    pub ident: String,
    /// Probe the builtin was resolved against (`probe` builtin only).
    pub probe_id: Option<usize>,
}

impl Builtin {
    pub fn new(ident: impl Into<String>, loc: Location) -> Self {
        Self {
            meta: ExprMeta::new(loc),
            ident: ident.into(),
            probe_id: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub meta: ExprMeta,
    pub func: String,
    /// `None` when called without parentheses (`count` vs `count()`).
    pub vargs: Option<Vec<Expression>>,
}

impl Call {
    pub fn new(func: impl Into<String>, loc: Location) -> Self {
        Self {
            meta: ExprMeta::new(loc),
            func: func.into(),
            vargs: None,
        }
    }

    pub fn with_args(func: impl Into<String>, vargs: Vec<Expression>, loc: Location) -> Self {
        Self {
            vargs: Some(vargs),
            ..Self::new(func, loc)
        }
    }

    pub fn args(&self) -> &[Expression] {
        self.vargs.as_deref().unwrap_or(&[])
    }
}

impl LeafCopy for Call {
    fn leaf_copy(&self) -> Self {
        Self {
            meta: self.meta.clone(),
            func: self.func.clone(),
            vargs: None,
        }
    }
}

/// `@name` or `@name[key, ...]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Map {
    pub meta: ExprMeta,
    pub id: NodeId,
    pub ident: String,
    pub vargs: Option<Vec<Expression>>,
    pub skip_key_validation: bool,
}

impl Map {
    pub fn new(ident: impl Into<String>, loc: Location) -> Self {
        Self {
            meta: ExprMeta {
                is_map: true,
                ..ExprMeta::new(loc)
            },
            id: NodeId::fresh(),
            ident: ident.into(),
            vargs: None,
            skip_key_validation: false,
        }
    }

    pub fn with_keys(ident: impl Into<String>, vargs: Vec<Expression>, loc: Location) -> Self {
        Self {
            vargs: Some(vargs),
            ..Self::new(ident, loc)
        }
    }

    pub fn keys(&self) -> &[Expression] {
        self.vargs.as_deref().unwrap_or(&[])
    }

    pub fn keys_mut(&mut self) -> &mut [Expression] {
        match &mut self.vargs {
            Some(keys) => keys,
            None => &mut [],
        }
    }

    /// Link value used for `bound_map` / `key_for_map`.
    pub fn binding(&self) -> MapRef {
        MapRef {
            id: self.id,
            ident: self.ident.clone(),
        }
    }
}

impl LeafCopy for Map {
    fn leaf_copy(&self) -> Self {
        Self {
            meta: self.meta.clone(),
            id: self.id,
            ident: self.ident.clone(),
            vargs: None,
            skip_key_validation: self.skip_key_validation,
        }
    }
}

/// `$name` scratch variable.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub meta: ExprMeta,
    pub id: NodeId,
    pub ident: String,
}

impl Variable {
    pub fn new(ident: impl Into<String>, loc: Location) -> Self {
        Self {
            meta: ExprMeta {
                is_variable: true,
                ..ExprMeta::new(loc)
            },
            id: NodeId::fresh(),
            ident: ident.into(),
        }
    }

    pub fn binding(&self) -> VarRef {
        VarRef {
            id: self.id,
            ident: self.ident.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Binop {
    pub meta: ExprMeta,
    pub left: Child<Expression>,
    pub op: BinaryOp,
    pub right: Child<Expression>,
}

impl Binop {
    pub fn new(
        left: impl Into<Expression>,
        op: BinaryOp,
        right: impl Into<Expression>,
        loc: Location,
    ) -> Self {
        Self {
            meta: ExprMeta::new(loc),
            left: Child::new(left.into()),
            op,
            right: Child::new(right.into()),
        }
    }
}

impl LeafCopy for Binop {
    fn leaf_copy(&self) -> Self {
        Self {
            meta: self.meta.clone(),
            left: Child::empty(),
            op: self.op,
            right: Child::empty(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Unop {
    pub meta: ExprMeta,
    pub expr: Child<Expression>,
    pub op: UnaryOp,
    /// `x++` rather than `++x`.
    pub is_post_op: bool,
}

impl Unop {
    pub fn new(op: UnaryOp, expr: impl Into<Expression>, loc: Location) -> Self {
        Self {
            meta: ExprMeta::new(loc),
            expr: Child::new(expr.into()),
            op,
            is_post_op: false,
        }
    }

    pub fn post(op: UnaryOp, expr: impl Into<Expression>, loc: Location) -> Self {
        Self {
            is_post_op: true,
            ..Self::new(op, expr, loc)
        }
    }
}

impl LeafCopy for Unop {
    fn leaf_copy(&self) -> Self {
        Self {
            meta: self.meta.clone(),
            expr: Child::empty(),
            op: self.op,
            is_post_op: self.is_post_op,
        }
    }
}

/// What a [`FieldAccess`] selects: a named struct field or a tuple element.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldSelector {
    Named(String),
    Index(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldAccess {
    pub meta: ExprMeta,
    pub expr: Child<Expression>,
    pub field: FieldSelector,
}

impl FieldAccess {
    pub fn named(expr: impl Into<Expression>, field: impl Into<String>, loc: Location) -> Self {
        Self {
            meta: ExprMeta::new(loc),
            expr: Child::new(expr.into()),
            field: FieldSelector::Named(field.into()),
        }
    }

    pub fn indexed(expr: impl Into<Expression>, index: usize, loc: Location) -> Self {
        Self {
            meta: ExprMeta::new(loc),
            expr: Child::new(expr.into()),
            field: FieldSelector::Index(index),
        }
    }

    pub fn field_name(&self) -> Option<&str> {
        match &self.field {
            FieldSelector::Named(name) => Some(name),
            FieldSelector::Index(_) => None,
        }
    }

    pub fn index(&self) -> Option<usize> {
        match self.field {
            FieldSelector::Index(index) => Some(index),
            FieldSelector::Named(_) => None,
        }
    }
}

impl LeafCopy for FieldAccess {
    fn leaf_copy(&self) -> Self {
        Self {
            meta: self.meta.clone(),
            expr: Child::empty(),
            field: self.field.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayAccess {
    pub meta: ExprMeta,
    pub expr: Child<Expression>,
    pub indexpr: Child<Expression>,
}

impl ArrayAccess {
    pub fn new(expr: impl Into<Expression>, indexpr: impl Into<Expression>, loc: Location) -> Self {
        Self {
            meta: ExprMeta::new(loc),
            expr: Child::new(expr.into()),
            indexpr: Child::new(indexpr.into()),
        }
    }
}

impl LeafCopy for ArrayAccess {
    fn leaf_copy(&self) -> Self {
        Self {
            meta: self.meta.clone(),
            expr: Child::empty(),
            indexpr: Child::empty(),
        }
    }
}

/// `(type)expr`, `(type *)expr`, `(type **)expr`.
#[derive(Debug, Clone, PartialEq)]
pub struct Cast {
    pub meta: ExprMeta,
    pub cast_type: String,
    pub pointer_depth: u8,
    pub expr: Child<Expression>,
}

impl Cast {
    pub fn new(
        cast_type: impl Into<String>,
        pointer_depth: u8,
        expr: impl Into<Expression>,
        loc: Location,
    ) -> Self {
        Self {
            meta: ExprMeta::new(loc),
            cast_type: cast_type.into(),
            pointer_depth,
            expr: Child::new(expr.into()),
        }
    }

    pub fn is_pointer(&self) -> bool {
        self.pointer_depth >= 1
    }

    pub fn is_double_pointer(&self) -> bool {
        self.pointer_depth >= 2
    }
}

impl LeafCopy for Cast {
    fn leaf_copy(&self) -> Self {
        Self {
            meta: self.meta.clone(),
            cast_type: self.cast_type.clone(),
            pointer_depth: self.pointer_depth,
            expr: Child::empty(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tuple {
    pub meta: ExprMeta,
    pub elems: Vec<Expression>,
}

impl Tuple {
    pub fn new(elems: Vec<Expression>, loc: Location) -> Self {
        Self {
            meta: ExprMeta::new(loc),
            elems,
        }
    }
}

impl LeafCopy for Tuple {
    fn leaf_copy(&self) -> Self {
        Self {
            meta: self.meta.clone(),
            elems: Vec::new(),
        }
    }
}

/// `cond ? left : right`.
#[derive(Debug, Clone, PartialEq)]
pub struct Ternary {
    pub meta: ExprMeta,
    pub cond: Child<Expression>,
    pub left: Child<Expression>,
    pub right: Child<Expression>,
}

impl Ternary {
    pub fn new(
        cond: impl Into<Expression>,
        left: impl Into<Expression>,
        right: impl Into<Expression>,
        loc: Location,
    ) -> Self {
        Self {
            meta: ExprMeta::new(loc),
            cond: Child::new(cond.into()),
            left: Child::new(left.into()),
            right: Child::new(right.into()),
        }
    }
}

impl LeafCopy for Ternary {
    fn leaf_copy(&self) -> Self {
        Self {
            meta: self.meta.clone(),
            cond: Child::empty(),
            left: Child::empty(),
            right: Child::empty(),
        }
    }
}
