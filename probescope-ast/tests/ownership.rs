//! Ownership integration tests
//!
//! A counting allocator tracks live allocations per test thread, so every
//! test can check that dropping a tree releases exactly what building it
//! allocated.

mod common;

use std::alloc::{GlobalAlloc, Layout, System};
use std::cell::Cell;

use common::{attach_point, init, loc};
use probescope_ast::*;

struct CountingAlloc;

thread_local! {
    static LIVE: Cell<isize> = const { Cell::new(0) };
}

unsafe impl GlobalAlloc for CountingAlloc {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let _ = LIVE.try_with(|live| live.set(live.get() + 1));
        System.alloc(layout)
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        let _ = LIVE.try_with(|live| live.set(live.get() - 1));
        System.dealloc(ptr, layout)
    }
}

#[global_allocator]
static ALLOC: CountingAlloc = CountingAlloc;

fn live() -> isize {
    LIVE.with(Cell::get)
}

/// `@x += 1`
fn compound_increment() -> AssignMapStatement {
    AssignMapStatement::compound(
        Map::new("@x", loc(1, 1)),
        BinaryOp::Add,
        Integer::new(1, loc(1, 7)),
        loc(1, 1),
    )
}

fn every_kind_probe() -> Probe {
    let stmts: Vec<Statement> = vec![
        AssignMapStatement::new(
            Map::with_keys(
                "@m",
                vec![
                    Builtin::new("comm", loc(2, 4)).into(),
                    PositionalParameter::new(PositionalParameterType::Positional, 1, loc(2, 10))
                        .into(),
                ],
                loc(2, 1),
            ),
            Call::with_args(
                "ustack",
                vec![StackMode::new("perf", loc(2, 24)).into(), Integer::new(3, loc(2, 30)).into()],
                loc(2, 17),
            ),
            loc(2, 1),
        )
        .into(),
        AssignVarStatement::new(
            Variable::new("$t", loc(3, 1)),
            Tuple::new(
                vec![
                    StringLiteral::new("a", loc(3, 7)).into(),
                    Identifier::new("ident", loc(3, 12)).into(),
                ],
                loc(3, 6),
            ),
            loc(3, 1),
        )
        .into(),
        compound_increment().into(),
        AssignVarStatement::compound(
            Variable::new("$i", loc(4, 1)),
            BinaryOp::Multiply,
            Integer::new(2, loc(4, 7)),
            loc(4, 1),
        )
        .into(),
        If::with_else(
            Ternary::new(
                Unop::new(UnaryOp::LogicalNot, Variable::new("$f", loc(5, 5)), loc(5, 4)),
                FieldAccess::indexed(Variable::new("$t", loc(5, 10)), 0, loc(5, 10)),
                ArrayAccess::new(Variable::new("$a", loc(5, 16)), Integer::new(1, loc(5, 19)), loc(5, 16)),
                loc(5, 4),
            ),
            vec![Jump::new(JumpKind::Return, loc(6, 3)).into()],
            Vec::new(),
            loc(5, 1),
        )
        .into(),
        Unroll::new(
            Integer::new(4, loc(7, 8)),
            vec![ExprStatement::new(
                Unop::post(UnaryOp::Increment, Map::new("@n", loc(7, 12)), loc(7, 12)),
                loc(7, 12),
            )
            .into()],
            loc(7, 1),
        )
        .into(),
        While::new(
            Binop::new(
                Cast::new("int", 1, Builtin::new("arg0", loc(8, 14)), loc(8, 8)),
                BinaryOp::LessThan,
                Integer::new(10, loc(8, 20)),
                loc(8, 8),
            ),
            vec![Jump::new(JumpKind::Break, loc(8, 25)).into()],
            loc(8, 1),
        )
        .into(),
    ];
    Probe::new(
        vec![attach_point("kprobe", "vfs_read"), attach_point("kprobe", "vfs_write")],
        Some(Predicate::new(
            Binop::new(Builtin::new("pid", loc(1, 24)), BinaryOp::NotEqual, Integer::new(0, loc(1, 31)), loc(1, 24)),
            loc(1, 23),
        )),
        stmts,
        loc(1, 1),
    )
}

/// Counts map nodes reachable through the traversal protocol.
#[derive(Default)]
struct MapCounter {
    maps: usize,
}

impl<'ast> Visitor<'ast> for MapCounter {
    fn visit_map(&mut self, map: &'ast Map) {
        self.maps += 1;
        visit::walk_map(self, map);
    }
}

#[test]
fn test_dropping_program_releases_everything() {
    init();

    let before = live();
    let program = Program::new("struct s { int x; };", vec![every_kind_probe()], loc(1, 1));
    assert!(live() > before);
    drop(program);
    assert_eq!(live(), before);
}

/// `0 + 1 + ... + (depth - 1)`, nested to the left.
fn left_chain(depth: i64) -> Expression {
    let mut expr: Expression = Integer::new(0, loc(1, 1)).into();
    for i in 1..depth {
        expr = Binop::new(expr, BinaryOp::Add, Integer::new(i, loc(1, 1)), loc(1, 1)).into();
    }
    expr
}

fn chain_depth(expr: &Expression) -> usize {
    let mut depth = 1;
    let mut cur = expr;
    while let Some(left) = cur.as_binop().and_then(|b| b.left.get()) {
        depth += 1;
        cur = left;
    }
    depth
}

#[test]
fn test_very_deep_tree_copies_and_drops() {
    init();

    let before = live();
    let deep = left_chain(100_000);
    let copy = deep.clone();
    assert_eq!(chain_depth(&copy), 100_000);
    drop(deep);
    drop(copy);
    assert_eq!(live(), before);
}

#[test]
fn test_deep_and_wide_trees() {
    init();

    let before = live();

    let deep = left_chain(1000);
    let wide = Tuple::new(
        (0..10_000)
            .map(|i| Variable::new(format!("$v{}", i), loc(1, 1)).into())
            .collect(),
        loc(1, 1),
    );
    let stmts = vec![
        ExprStatement::new(deep, loc(1, 1)).into(),
        ExprStatement::new(wide, loc(2, 1)).into(),
    ];
    let probe = Probe::new(vec![attach_point("kprobe", "f")], None, stmts, loc(1, 1));
    let copy = probe.clone();
    drop(probe);
    drop(copy);

    assert_eq!(live(), before);
}

#[test]
fn test_compound_assignment_shares_one_map_node() {
    init();

    let stmt = compound_increment();
    assert!(stmt.is_compound());

    let binop = stmt.expr.get().and_then(Expression::as_binop).expect("binop");
    let left = binop.left.get().and_then(Expression::as_map).expect("map on the left");
    let target = stmt.map().expect("assigned map");
    assert!(std::ptr::eq(left, target));
    assert_eq!(binop.op, BinaryOp::Add);

    let statement: Statement = stmt.into();
    let mut counter = MapCounter::default();
    statement.accept(&mut counter);
    assert_eq!(counter.maps, 1);
}

#[test]
fn test_compound_target_lives_in_expression() {
    init();

    let before = live();
    let mut stmt = compound_increment();
    let expr = stmt.expr.take().expect("expression");

    // the statement no longer reaches the map, and dropping it frees nothing
    // the expression still needs
    assert!(stmt.map().is_none());
    drop(stmt);
    let map = expr
        .as_binop()
        .and_then(|b| b.left.get())
        .and_then(Expression::as_map)
        .expect("map still owned by the expression");
    assert_eq!(map.ident, "@x");

    drop(expr);
    assert_eq!(live(), before);
}

#[test]
fn test_bindings_do_not_own_their_targets() {
    init();

    // first run registers the pass's log callsite, which is never freed
    bind_assignments(&mut Program::new("", Vec::new(), loc(1, 1)));

    let before = live();
    let mut program = Program::new("", vec![every_kind_probe()], loc(1, 1));
    bind_assignments(&mut program);

    // links outlive nothing: dropping the tree still balances
    let links: Vec<MapRef> = program.probes[0]
        .stmts
        .iter()
        .filter_map(|stmt| match stmt {
            Statement::AssignMap(s) => s.expr.get().and_then(|e| e.meta().bound_map.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(links.len(), 2);
    drop(links);
    drop(program);
    assert_eq!(live(), before);
}

#[test]
fn test_leaf_copy_of_compound_statement_owns_nothing() {
    init();

    let stmt = compound_increment();
    let before = live();
    let copy = stmt.leaf_copy();
    assert_eq!(live(), before);
    assert!(copy.is_compound());
    assert!(copy.expr.is_empty());
    drop(copy);
    assert_eq!(live(), before);
    assert!(stmt.map().is_some());
}
