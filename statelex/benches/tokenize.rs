//! Criterion benchmarks for F# tokenization throughput.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use statelex::languages::fsharp;
use statelex::LexerEngine;

const SAMPLE: &str = r#"
module Geometry.Shapes

open System
open System.Collections.Generic

/// A shape in the plane
type Shape =
    | Circle of radius: float
    | Rectangle of width: float * height: float

(* area and perimeter (* both in SI units *) *)
let area shape =
    match shape with
    | Circle r -> Math.PI * r ** 2.0
    | Rectangle (w, h) -> w * h

let describe (s: Shape) =
    let name = sprintf "%A" s
    @"C:\shapes\" + name + """ "quoted" """ + "\tarea: \u0041"

let rec fib n = if n < 2 then n else fib (n - 1) + fib (n - 2)
let xs = [ 0x1F; 0o17; 0b1010; 1_000; 42L ] |> List.map (fun x -> x * 2)
"#;

fn bench_tokenize(c: &mut Criterion) {
    let registry = match fsharp::registry() {
        Ok(registry) => registry,
        Err(e) => {
            eprintln!("Skipping tokenize: {}", e);
            return;
        }
    };
    let engine = LexerEngine::new(&registry);

    let mut group = c.benchmark_group("tokenize");
    for copies in [1usize, 16, 256] {
        let source = SAMPLE.repeat(copies);
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(BenchmarkId::new("fsharp", copies), &source, |b, src| {
            b.iter(|| engine.tokenize(black_box(src)).count())
        });
        group.bench_with_input(
            BenchmarkId::new("fsharp_coalesced", copies),
            &source,
            |b, src| b.iter(|| engine.tokenize(black_box(src)).coalesce().count()),
        );
    }
    group.finish();
}

fn bench_build(c: &mut Criterion) {
    c.bench_function("build_fsharp_registry", |b| {
        b.iter(|| black_box(fsharp::registry()).is_ok())
    });
}

criterion_group!(benches, bench_tokenize, bench_build);
criterion_main!(benches);
