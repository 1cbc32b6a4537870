//! End-to-end concrete scenarios (spec.md §8, S1-S6), run against a
//! database built the normal way: `hornlog_bootstrap::new_database()`
//! plus whatever extra facts each scenario needs.

use hornlog_bootstrap::new_database;
use hornlog_core::term::{from_list, to_list};
use hornlog_core::{Indicator, Struct, Symbol, Term};
use hornlog_resolver::{Bounds, Clause, Database, Goal, Resolver, Rule};

fn peano(zero: Symbol, s: Symbol, n: u32) -> Term {
    let mut t = Term::Atom(zero);
    for _ in 0..n {
        t = Term::struct_(s, vec![t]);
    }
    t
}

fn assert_fact(db: &mut Database, head: Struct) {
    db.assert(Rule::Clause(Clause { head, body: vec![] }));
}

/// S1: successor arithmetic, `nat(0). nat(s(X)) :- nat(X).`, `limit = 5`.
#[test]
fn s1_successor_arithmetic_yields_peano_numerals_in_order() {
    let mut db = new_database().expect("bootstrap should load");
    let zero = db.interner.intern("0");
    let s = db.interner.intern("s");
    let nat = db.interner.intern("nat");
    let x = db.interner.intern("X");

    assert_fact(&mut db, Struct { name: nat, args: vec![Term::Atom(zero)] });
    db.assert(Rule::Clause(Clause {
        head: Struct { name: nat, args: vec![Term::struct_(s, vec![Term::Var(x)])] },
        body: vec![Goal::new(Struct { name: nat, args: vec![Term::Var(x)] })],
    }));

    let resolver = Resolver::new(&mut db, Bounds { max_depth: None, limit: Some(5) });
    let mut solutions = resolver.solve(Struct { name: nat, args: vec![Term::Var(x)] });

    for expected_depth in 0..5 {
        let solution = solutions.next().expect("solution should exist").expect("should not error");
        let bound = &solution.bindings.iter().find(|(n, _)| *n == x).unwrap().1;
        assert_eq!(*bound, peano(zero, s, expected_depth));
    }
    assert!(solutions.next().is_none());
}

/// S2: decomposing three via `add/3`, exactly 10 solutions in a specified order.
#[test]
fn s2_decomposing_three_enumerates_all_partitions_in_order() {
    let mut db = new_database().expect("bootstrap should load");
    let zero = db.interner.intern("0");
    let s = db.interner.intern("s");
    let add = db.interner.intern("add");
    let (a, b, c) = (db.interner.intern("A"), db.interner.intern("B"), db.interner.intern("C"));

    assert_fact(&mut db, Struct { name: add, args: vec![Term::Atom(zero), Term::Var(a), Term::Var(a)] });
    db.assert(Rule::Clause(Clause {
        head: Struct {
            name: add,
            args: vec![
                Term::struct_(s, vec![Term::Var(a)]),
                Term::Var(b),
                Term::struct_(s, vec![Term::Var(c)]),
            ],
        },
        body: vec![Goal::new(Struct { name: add, args: vec![Term::Var(a), Term::Var(b), Term::Var(c)] })],
    }));

    let (tmp, x, y, z) = (
        db.interner.intern("Tmp"),
        db.interner.intern("X"),
        db.interner.intern("Y"),
        db.interner.intern("Z"),
    );
    let three = peano(zero, s, 3);
    let goals = vec![
        Struct { name: add, args: vec![Term::Var(tmp), Term::Var(z), three] },
        Struct { name: add, args: vec![Term::Var(x), Term::Var(y), Term::Var(tmp)] },
    ];

    let resolver = Resolver::new(&mut db, Bounds::default());
    let mut solutions = resolver.solve_all(goals);

    let expected = [
        (0, 0, 3),
        (0, 1, 2),
        (1, 0, 2),
        (0, 2, 1),
        (1, 1, 1),
        (2, 0, 1),
        (0, 3, 0),
        (1, 2, 0),
        (2, 1, 0),
        (3, 0, 0),
    ];
    for (ex, ey, ez) in expected {
        let solution = solutions.next().expect("solution should exist").expect("should not error");
        let get = |sym: Symbol| solution.bindings.iter().find(|(n, _)| *n == sym).unwrap().1.clone();
        assert_eq!(get(x), peano(zero, s, ex));
        assert_eq!(get(y), peano(zero, s, ey));
        assert_eq!(get(z), peano(zero, s, ez));
    }
    assert!(solutions.next().is_none());
}

/// S3: list membership open enumeration via the prelude's `member/2`, `limit = 3`.
#[test]
fn s3_member_open_enumeration_yields_progressively_deeper_tails() {
    let mut db = new_database().expect("bootstrap should load");
    let member = db.interner.intern("member");
    let a = db.interner.intern("a");
    let l = db.interner.intern("L");

    let resolver = Resolver::new(&mut db, Bounds { max_depth: None, limit: Some(3) });
    let mut solutions = resolver.solve(Struct { name: member, args: vec![Term::Atom(a), Term::Var(l)] });

    for depth in 0..3 {
        let solution = solutions.next().expect("solution should exist").expect("should not error");
        let bound = solution.bindings.iter().find(|(n, _)| *n == l).unwrap().1.clone();
        let arena = solutions.arena();
        let (items, tail) = to_list(&bound, arena, solutions.symbols().dot, solutions.symbols().nil);
        assert_eq!(items.len(), depth + 1, "list should have exactly {} leading elements bound", depth + 1);
        assert_eq!(items[depth], Term::Atom(a), "the {depth}th element should be bound to `a`");
        assert!(matches!(tail, Term::Ref(_)), "the tail should remain a fresh unbound variable");
    }
}

/// S4: dynamic assert via `assertz(clause(...))` twice then querying.
#[test]
fn s4_dynamic_assert_defines_bit_1_and_enumerates_it_in_assertion_order() {
    let mut db = new_database().expect("bootstrap should load");
    let bit = db.interner.intern("bit");
    assert!(db.rules(Indicator::new(bit, 1)).is_empty(), "bit/1 should not exist yet");

    let clause_sym = db.interner.intern("clause");
    let struct_sym = db.interner.intern("struct");
    let int_sym = db.interner.intern("int");
    let assertz_sym = db.interner.intern("assertz");
    let x = db.interner.intern("X");
    let (dot, nil) = (db.symbols.dot, db.symbols.nil);

    let bit_clause_ast = |n: i64| {
        let int_ast = Term::struct_(int_sym, vec![Term::Int(n)]);
        let head_ast = Term::struct_(struct_sym, vec![Term::Atom(bit), from_list(vec![int_ast], dot, nil)]);
        Term::struct_(clause_sym, vec![head_ast, Term::Atom(nil)])
    };

    let goals = vec![
        Struct { name: assertz_sym, args: vec![bit_clause_ast(0)] },
        Struct { name: assertz_sym, args: vec![bit_clause_ast(1)] },
        Struct { name: bit, args: vec![Term::Var(x)] },
    ];

    let resolver = Resolver::new(&mut db, Bounds::default());
    let mut solutions = resolver.solve_all(goals);

    for expected in [0i64, 1] {
        let solution = solutions.next().expect("solution should exist").expect("should not error");
        let bound = solution.bindings.iter().find(|(n, _)| *n == x).unwrap().1.clone();
        assert_eq!(bound, Term::Int(expected));
    }
    assert!(solutions.next().is_none());
}

/// S5: reflection round-trip via `get_predicate`.
#[test]
fn s5_get_predicate_reflects_asserted_clauses_as_ast_terms() {
    let mut db = new_database().expect("bootstrap should load");
    let zero = db.interner.intern("0");
    let s = db.interner.intern("s");
    let add = db.interner.intern("add");
    let (a, b, c) = (db.interner.intern("A"), db.interner.intern("B"), db.interner.intern("C"));

    assert_fact(&mut db, Struct { name: add, args: vec![Term::Atom(zero), Term::Var(a), Term::Var(a)] });
    db.assert(Rule::Clause(Clause {
        head: Struct {
            name: add,
            args: vec![
                Term::struct_(s, vec![Term::Var(a)]),
                Term::Var(b),
                Term::struct_(s, vec![Term::Var(c)]),
            ],
        },
        body: vec![Goal::new(Struct { name: add, args: vec![Term::Var(a), Term::Var(b), Term::Var(c)] })],
    }));

    let get_predicate = db.interner.intern("get_predicate");
    let indicator_sym = db.interner.intern("indicator");
    let clause_sym = db.interner.intern("clause");
    let rs = db.interner.intern("Rs");

    let indicator_ast = Term::struct_(indicator_sym, vec![Term::Atom(add), Term::Int(3)]);
    let resolver = Resolver::new(&mut db, Bounds::default());
    let mut solutions = resolver.solve(Struct { name: get_predicate, args: vec![indicator_ast, Term::Var(rs)] });

    let solution = solutions.next().expect("solution should exist").expect("should not error");
    let bound = solution.bindings.iter().find(|(n, _)| *n == rs).unwrap().1.clone();
    let (items, tail) = to_list(&bound, solutions.arena(), solutions.symbols().dot, solutions.symbols().nil);
    assert_eq!(items.len(), 2, "add/3 has exactly two clauses");
    assert!(tail.is_atom(solutions.symbols().nil));
    for item in &items {
        match item {
            Term::Struct(outer) => {
                assert_eq!(outer.name, clause_sym);
                assert_eq!(outer.args.len(), 2);
            }
            other => panic!("expected a clause(...) AST term, got {other:?}"),
        }
    }
}

/// S6: self-hosting, covered in full by `hornlog_bootstrap`'s own unit test
/// (`self_hosted_parser_reparses_its_own_bootstrap_source`); re-asserted
/// here as a black-box sanity check through the public façade only.
#[test]
fn s6_self_hosted_parser_reparses_its_own_source_through_the_public_facade() {
    let mut db = new_database().expect("bootstrap should load");
    let bootstrap_source = include_str!("../lib/bootstrap.pl");
    hornlog_bootstrap::interpret(&mut db, bootstrap_source)
        .expect("the rules bootstrap.pl itself defines should be able to reparse bootstrap.pl");
}
