use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use pprof::criterion::{Output, PProfProfiler};
use stackguard::{StackGuard, StackGuardConfig};
use stackguard_tests::expr::{
    eval::{eval_guarded, eval_iterative},
    naive::naive_eval,
    Expr,
};

fn bench_eval(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("evaluate expression tree");

    // wide and shallow: nothing crosses onto a fresh stack
    for depth in 17..18 {
        let big_expr = Expr::balanced(depth);

        group.bench_with_input(
            BenchmarkId::new("traditional boxed method", depth),
            &big_expr,
            |b, expr| b.iter(|| naive_eval(expr)),
        );

        group.bench_with_input(
            BenchmarkId::new("iterative fold", depth),
            &big_expr,
            |b, expr| b.iter(|| eval_iterative(expr)),
        );

        group.bench_with_input(
            BenchmarkId::new("guarded fold", depth),
            &big_expr,
            |b, expr| b.iter(|| eval_guarded(&mut StackGuard::new(), expr)),
        );
    }
    group.finish();

    let mut group = criterion.benchmark_group("evaluate deep chain");

    // narrow and deep: the guarded fold trampolines every 256 levels
    for depth in [10_000, 100_000] {
        let chain = Expr::chain(depth);

        group.bench_with_input(
            BenchmarkId::new("iterative fold", depth),
            &chain,
            |b, expr| b.iter(|| eval_iterative(expr)),
        );

        group.bench_with_input(BenchmarkId::new("guarded fold", depth), &chain, |b, expr| {
            b.iter(|| eval_guarded(&mut StackGuard::new(), expr))
        });

        group.bench_with_input(
            BenchmarkId::new("guarded fold, 16 stacks then iterative", depth),
            &chain,
            |b, expr| {
                let config = StackGuardConfig::default().with_max_nesting(16);
                b.iter(|| eval_guarded(&mut StackGuard::with_config(config.clone()), expr))
            },
        );
    }
    group.finish();
}

criterion_group! {
    name = benches;
    config = Criterion::default()
        .with_profiler(
            PProfProfiler::new(100, Output::Flamegraph(None))
        );
    targets = bench_eval
}
criterion_main!(benches);
