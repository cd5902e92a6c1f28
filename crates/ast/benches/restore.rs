// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use sqlexpr_ast::{rewrite, BinaryOp, ExprNode, Visitor};
use sqlexpr_test_utils::parse_expr;

const QUERIES: &[(&str, &str)] = &[
    ("comparison", "a.id = 42 and b.name != 'x'"),
    (
        "case",
        "case status when 1 then 'new' when 2 then 'open' when 3 then 'closed' else 'unknown' end",
    ),
    (
        "predicates",
        "(a between 1 and 10 or b in (1, 2, 3, 4, 5)) and c like 'abc%' and d is not null",
    ),
    (
        "arithmetic",
        "((price * quantity) - discount) / (1 + tax_rate) >= all (select 1)",
    ),
];

fn parsed() -> Vec<(&'static str, ExprNode)> {
    QUERIES
        .iter()
        .map(|(name, sql)| (*name, parse_expr(sql).expect("benchmark query parses")))
        .collect()
}

/// A chain of `+` nodes `n` deep
fn deep_chain(n: usize) -> ExprNode {
    (0..n).fold(ExprNode::int(0), |acc, i| {
        ExprNode::binary(BinaryOp::Plus, acc, ExprNode::int(i as i64))
    })
}

struct CountNodes(usize);

impl Visitor for CountNodes {
    fn enter(&mut self, node: ExprNode) -> (ExprNode, bool) {
        self.0 += 1;
        (node, false)
    }
}

fn benchmark_restore(c: &mut Criterion) {
    let mut group = c.benchmark_group("restore");

    for (name, tree) in parsed() {
        group.bench_with_input(BenchmarkId::from_parameter(name), &tree, |b, tree| {
            b.iter(|| black_box(tree).restore_sql())
        });
    }

    let chain = deep_chain(500);
    group.bench_function("chain_500", |b| b.iter(|| black_box(&chain).restore_sql()));

    group.finish();
}

fn benchmark_traversal(c: &mut Criterion) {
    let mut group = c.benchmark_group("traversal");

    for (name, tree) in parsed() {
        group.bench_with_input(BenchmarkId::from_parameter(name), &tree, |b, tree| {
            b.iter(|| {
                let mut v = CountNodes(0);
                let (_, ok) = black_box(tree.clone()).accept(&mut v);
                (ok, v.0)
            })
        });
    }

    group.bench_function("rewrite_chain_500", |b| {
        b.iter(|| rewrite(deep_chain(500), |node| node))
    });

    group.finish();
}

criterion_group!(benches, benchmark_restore, benchmark_traversal);
criterion_main!(benches);
