//! Binding links between expressions and the maps/variables they feed.
//!
//! A link is a [`MapRef`] / [`VarRef`]: the target's [`NodeId`] plus its name.
//! Links are plain data, so they cannot keep a node alive, be dropped twice or
//! be walked into. To get the node back, build a [`BindingIndex`] over the tree
//! that owns it; the index borrows the tree and so cannot outlive it.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::debug;

use crate::ast::{AssignMapStatement, AssignVarStatement, Expression, Map, Probe, Program, Variable};
use crate::visit::{self, Visitor, VisitorMut};

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(0);

/// Identity of a `Map` or `Variable` node.
///
/// Ids are unique for the life of the process and are part of node equality:
/// two separately built trees compare equal only if they share their nodes'
/// identities (e.g. one is a clone of the other).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    pub(crate) fn fresh() -> Self {
        NodeId(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

/// Non-owning link to a [`Map`] node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MapRef {
    pub id: NodeId,
    pub ident: String,
}

/// Non-owning link to a [`Variable`] node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VarRef {
    pub id: NodeId,
    pub ident: String,
}

/// Lookup from binding links to the nodes of one tree.
#[derive(Debug, Default)]
pub struct BindingIndex<'ast> {
    maps: HashMap<NodeId, &'ast Map>,
    vars: HashMap<NodeId, &'ast Variable>,
}

impl<'ast> BindingIndex<'ast> {
    pub fn build(program: &'ast Program) -> Self {
        let mut index = BindingIndex::default();
        index.visit_program(program);
        index
    }

    pub fn for_probe(probe: &'ast Probe) -> Self {
        let mut index = BindingIndex::default();
        index.visit_probe(probe);
        index
    }

    pub fn map(&self, link: &MapRef) -> Option<&'ast Map> {
        self.maps.get(&link.id).copied()
    }

    pub fn var(&self, link: &VarRef) -> Option<&'ast Variable> {
        self.vars.get(&link.id).copied()
    }

    /// Map the expression is assigned into, if any.
    pub fn bound_map_of(&self, expr: &Expression) -> Option<&'ast Map> {
        expr.meta().bound_map.as_ref().and_then(|link| self.map(link))
    }

    /// Variable the expression is assigned into, if any.
    pub fn bound_var_of(&self, expr: &Expression) -> Option<&'ast Variable> {
        expr.meta().bound_var.as_ref().and_then(|link| self.var(link))
    }

    pub fn map_count(&self) -> usize {
        self.maps.len()
    }

    pub fn var_count(&self) -> usize {
        self.vars.len()
    }
}

impl<'ast> Visitor<'ast> for BindingIndex<'ast> {
    fn visit_map(&mut self, map: &'ast Map) {
        self.maps.insert(map.id, map);
        visit::walk_map(self, map);
    }

    fn visit_variable(&mut self, var: &'ast Variable) {
        self.vars.insert(var.id, var);
    }
}

/// Links every assignment's right-hand side to its target and every map key
/// to its map.
pub fn bind_assignments(program: &mut Program) {
    let mut binder = Binder { links: 0 };
    binder.visit_program(program);
    debug!("Bound {} expressions", binder.links);
}

struct Binder {
    links: usize,
}

impl VisitorMut for Binder {
    fn visit_assign_map(&mut self, stmt: &mut AssignMapStatement) {
        let link = stmt.map().map(Map::binding);
        if let (Some(link), Some(expr)) = (link, stmt.expr.get_mut()) {
            expr.meta_mut().bound_map = Some(link);
            self.links += 1;
        }
        visit::walk_assign_map_mut(self, stmt);
    }

    fn visit_assign_var(&mut self, stmt: &mut AssignVarStatement) {
        let link = stmt.var().map(Variable::binding);
        if let (Some(link), Some(expr)) = (link, stmt.expr.get_mut()) {
            expr.meta_mut().bound_var = Some(link);
            self.links += 1;
        }
        visit::walk_assign_var_mut(self, stmt);
    }

    fn visit_map(&mut self, map: &mut Map) {
        let link = map.binding();
        for key in map.keys_mut() {
            key.meta_mut().key_for_map = Some(link.clone());
            self.links += 1;
        }
        visit::walk_exprs_mut(self, map.keys_mut());
    }
}

/// Gives every map and variable of a copied probe a fresh id and rewrites the
/// probe's links to match, so deep copies never share ids with their source.
pub fn renumber_bindings(probe: &mut Probe) {
    let mut renumber = Renumber::default();
    renumber.visit_probe(probe);

    let mut remap = Remap {
        ids: renumber.ids,
    };
    remap.visit_probe(probe);
}

#[derive(Default)]
struct Renumber {
    ids: HashMap<NodeId, NodeId>,
}

impl VisitorMut for Renumber {
    fn visit_map(&mut self, map: &mut Map) {
        let fresh = NodeId::fresh();
        self.ids.insert(map.id, fresh);
        map.id = fresh;
        visit::walk_exprs_mut(self, map.keys_mut());
    }

    fn visit_variable(&mut self, var: &mut Variable) {
        let fresh = NodeId::fresh();
        self.ids.insert(var.id, fresh);
        var.id = fresh;
    }
}

struct Remap {
    ids: HashMap<NodeId, NodeId>,
}

impl Remap {
    fn remap_meta(&self, meta: &mut crate::ast::ExprMeta) {
        for link in [&mut meta.bound_map, &mut meta.key_for_map].into_iter().flatten() {
            if let Some(id) = self.ids.get(&link.id) {
                link.id = *id;
            }
        }
        if let Some(link) = &mut meta.bound_var {
            if let Some(id) = self.ids.get(&link.id) {
                link.id = *id;
            }
        }
    }
}

// Owned assignment targets are reached through visit_map/visit_variable only,
// so those are remapped there as well. Remapping twice is harmless: fresh ids
// never appear as keys.
impl VisitorMut for Remap {
    fn visit_expr(&mut self, expr: &mut Expression) {
        self.remap_meta(expr.meta_mut());
        visit::walk_expr_mut(self, expr);
    }

    fn visit_map(&mut self, map: &mut Map) {
        self.remap_meta(&mut map.meta);
        visit::walk_exprs_mut(self, map.keys_mut());
    }

    fn visit_variable(&mut self, var: &mut Variable) {
        self.remap_meta(&mut var.meta);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Builtin, ExprStatement, Integer, Statement};
    use crate::location::Location;
    use crate::ops::BinaryOp;

    fn loc() -> Location {
        Location::default()
    }

    fn program(stmts: Vec<Statement>) -> Program {
        let mut ap = crate::ast::AttachPoint::new("kprobe:f", loc());
        ap.provider = "kprobe".to_string();
        ap.func = "f".to_string();
        Program::new("", vec![Probe::new(vec![ap], None, stmts, loc())], loc())
    }

    fn first_stmt(program: &Program) -> &Statement {
        &program.probes[0].stmts[0]
    }

    #[test]
    fn test_node_ids_are_unique() {
        let a = Map::new("@a", loc());
        let b = Map::new("@a", loc());
        let v = Variable::new("$a", loc());
        assert_ne!(a.id, b.id);
        assert_ne!(a.id, v.id);
    }

    #[test]
    fn test_node_ids_increase() {
        let first = NodeId::fresh();
        let second = NodeId::fresh();
        assert!(second > first);
        assert!(second.as_u64() > first.as_u64());
    }

    #[test]
    fn test_bind_plain_map_assignment() {
        let map = Map::with_keys("@count", vec![Builtin::new("comm", loc()).into()], loc());
        let map_id = map.id;
        let mut program = program(vec![
            AssignMapStatement::new(map, Integer::new(1, loc()), loc()).into(),
        ]);
        bind_assignments(&mut program);

        let Statement::AssignMap(stmt) = first_stmt(&program) else {
            panic!("expected map assignment");
        };
        let expr = stmt.expr.get().expect("rhs");
        assert_eq!(expr.meta().bound_map.as_ref().map(|l| l.id), Some(map_id));
        assert!(expr.meta().bound_var.is_none());

        let key = &stmt.map().expect("map").keys()[0];
        assert_eq!(key.meta().key_for_map.as_ref().map(|l| l.id), Some(map_id));

        let index = BindingIndex::build(&program);
        let bound = index.bound_map_of(expr).expect("bound map");
        assert!(std::ptr::eq(bound, stmt.map().expect("map")));
    }

    #[test]
    fn test_bind_compound_variable_assignment() {
        let mut program = program(vec![AssignVarStatement::compound(
            Variable::new("$n", loc()),
            BinaryOp::Add,
            Integer::new(1, loc()),
            loc(),
        )
        .into()]);
        bind_assignments(&mut program);

        let Statement::AssignVar(stmt) = first_stmt(&program) else {
            panic!("expected variable assignment");
        };
        let index = BindingIndex::build(&program);
        assert_eq!(index.var_count(), 1);
        let bound = index.bound_var_of(stmt.expr.get().expect("rhs")).expect("bound var");
        assert!(std::ptr::eq(bound, stmt.var().expect("var")));
    }

    #[test]
    fn test_unbound_expression_resolves_to_nothing() {
        let program = program(vec![ExprStatement::new(Integer::new(1, loc()), loc()).into()]);
        let index = BindingIndex::build(&program);
        let Statement::Expr(stmt) = first_stmt(&program) else {
            panic!("expected expression statement");
        };
        assert!(index.bound_map_of(stmt.expr.get().expect("expr")).is_none());
        assert_eq!(index.map_count(), 0);
    }

    #[test]
    fn test_renumber_rewrites_links() {
        let mut program = program(vec![AssignMapStatement::new(
            Map::new("@x", loc()),
            Integer::new(1, loc()),
            loc(),
        )
        .into()]);
        bind_assignments(&mut program);

        let original = program.probes[0].clone();
        let mut copy = original.clone();
        renumber_bindings(&mut copy);

        let (Statement::AssignMap(before), Statement::AssignMap(after)) =
            (&original.stmts[0], &copy.stmts[0])
        else {
            panic!("expected map assignments");
        };
        let old_id = before.map().map(|m| m.id);
        let new_id = after.map().map(|m| m.id);
        assert_ne!(old_id, new_id);

        let rhs_link = after
            .expr
            .get()
            .and_then(|e| e.meta().bound_map.as_ref())
            .map(|l| l.id);
        assert_eq!(rhs_link, new_id);

        let index = BindingIndex::for_probe(&copy);
        let bound = index
            .bound_map_of(after.expr.get().expect("rhs"))
            .expect("bound map");
        assert!(std::ptr::eq(bound, after.map().expect("map")));
    }
}
