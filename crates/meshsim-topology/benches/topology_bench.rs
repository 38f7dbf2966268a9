//! Benchmarks for Meshsim Topology
//!
//! Measures performance of:
//! - Descriptor parsing
//! - Edge derivation
//! - Form serialization

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use meshsim_topology::{form_descriptor, random_topology, NodeForm, TopologyDescriptor};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn sample(count: usize) -> TopologyDescriptor {
    let mut rng = StdRng::seed_from_u64(count as u64);
    random_topology(count, 0.2, &mut rng)
}

/// Benchmark descriptor parsing at different sizes
fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    for &count in &[5usize, 10, 20, 30] {
        let text = sample(count).to_yaml().expect("serialize sample");
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &text, |b, text| {
            b.iter(|| TopologyDescriptor::parse(black_box(text)))
        });
    }
    group.finish();
}

/// Benchmark lexical edge derivation
fn bench_edges(c: &mut Criterion) {
    let mut group = c.benchmark_group("edges");

    for &count in &[5usize, 10, 20, 30] {
        let topo = sample(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &topo, |b, topo| {
            b.iter(|| black_box(topo).edges())
        });
    }
    group.finish();
}

/// Benchmark the validated form path
fn bench_form(c: &mut Criterion) {
    let mut form = NodeForm::new();
    form.set_count("30");
    for i in 0..29 {
        let next = form.sections()[i + 1].id.clone();
        form.set_neighbor(i, &next, true);
    }

    c.bench_function("form_descriptor_30", |b| {
        b.iter(|| form_descriptor(black_box(&form)))
    });
}

criterion_group!(benches, bench_parse, bench_edges, bench_form);
criterion_main!(benches);
