//! Interpreter execution benchmarks
//!
//! Runs canonical programs through the whole pipeline. Measures:
//! - `for` loop arithmetic
//! - Guarded iteration with several guards per pass
//! - Array indexing and modification
//! - Parsing cost on its own

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use guarded_runtime::{Guarded, Lexer, Parser, RuntimeConfig};

/// Check and run source code, discarding output
fn interp_run(source: &str) {
    let runtime = Guarded::with_config(RuntimeConfig::quiet());
    let _ = runtime.run(source, &mut "".as_bytes(), &mut std::io::sink());
}

/// Parse source code (for measuring parse vs execution time)
fn parse_only(source: &str) {
    let (tokens, _) = Lexer::new(source).tokenize();
    let _ = Parser::new(tokens).parse();
}

fn bench_for_sum(c: &mut Criterion) {
    c.bench_function("interp_for_sum_10k", |b| {
        let code = "|[ declare s : int s := 0; for i in 1 to 10000 --> s := s + i * 2 rof; print s ]|";
        b.iter(|| interp_run(black_box(code)));
    });
}

fn bench_do_gcd(c: &mut Criterion) {
    c.bench_function("interp_do_gcd", |b| {
        let code = "|[ declare a, b : int
            a := 1000000; b := 7;
            do a > b --> a := a - b [] b > a --> b := b - a od;
            print a
        ]|";
        b.iter(|| interp_run(black_box(code)));
    });
}

fn bench_array_updates(c: &mut Criterion) {
    c.bench_function("interp_array_modif_1k", |b| {
        let code = "|[ declare a : array[1..10]
            a := 0, 0, 0, 0, 0, 0, 0, 0, 0, 0;
            for i in 1 to 1000 --> a := a(i % 10 + 1 : a[i % 10 + 1] + i) rof;
            print a
        ]|";
        b.iter(|| interp_run(black_box(code)));
    });
}

fn bench_parse_only(c: &mut Criterion) {
    let mut code = String::from("|[ declare x : int x := 0");
    for i in 0..500 {
        code.push_str(&format!(
            "; if x < {} --> x := x + 1 [] x >= {} --> x := x - 1 fi",
            i, i
        ));
    }
    code.push_str(" ]|");
    c.bench_function("parse_guarded_1k_lines", |b| {
        b.iter(|| parse_only(black_box(&code)));
    });
}

fn bench_nested_scopes(c: &mut Criterion) {
    let mut group = c.benchmark_group("nested_for");
    for depth in [1u32, 2, 3].iter() {
        let bound = 20;
        group.throughput(Throughput::Elements(u64::from(bound).pow(*depth)));
        group.bench_with_input(BenchmarkId::new("depth", depth), depth, |b, &d| {
            let mut code = String::from("|[ declare s : int s := 0; ");
            for level in 0..d {
                code.push_str(&format!("for v{} in 1 to {} --> ", level, bound));
            }
            code.push_str("s := s + 1");
            for _ in 0..d {
                code.push_str(" rof");
            }
            code.push_str("; print s ]|");
            b.iter(|| interp_run(black_box(&code)));
        });
    }
    group.finish();
}

criterion_group!(
    basic_benches,
    bench_for_sum,
    bench_do_gcd,
    bench_array_updates,
    bench_parse_only
);
criterion_group!(advanced_benches, bench_nested_scopes);
criterion_main!(basic_benches, advanced_benches);
