//! Benchmarks for graph construction and op execution.
//!
//! Uses a synthetic method made of a long chain of guarded blocks:
//! - graph building over the full instruction list
//! - building the op table through the registry
//! - stepping the chain with unknown conditions, which forks at every branch

use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use dexscope::{
    analysis::GraphBuilder,
    diagnostics::NullSink,
    disassembler::{Instruction, Opcode},
    emulation::{step, types, HeapItem, MethodState, OpRegistry},
};
use std::hint::black_box;

/// `blocks` repetitions of `if-eqz v0, +3 | const/4 v1, n | nop`, closed by `return v1`.
fn guarded_chain(blocks: usize) -> Vec<Instruction> {
    let mut instructions = Vec::with_capacity(blocks * 3 + 1);
    for block in 0..blocks {
        let base = block * 3;
        instructions.push(
            Instruction::new(Opcode::IfEqz, base)
                .with_registers(&[0])
                .with_offset(3),
        );
        instructions.push(
            Instruction::new(Opcode::Const4, base + 1)
                .with_registers(&[1])
                .with_literal((block % 8) as i64),
        );
        instructions.push(Instruction::new(Opcode::Nop, base + 2));
    }
    instructions.push(Instruction::new(Opcode::Return, blocks * 3).with_registers(&[1]));
    instructions
}

fn bench_build(c: &mut Criterion) {
    let instructions = guarded_chain(2048);

    let mut group = c.benchmark_group("graph");
    group.throughput(Throughput::Elements(instructions.len() as u64));
    group.bench_function("build", |b| {
        let builder = GraphBuilder::new().with_sink(&NullSink);
        b.iter(|| {
            let graph = builder.build(black_box(&instructions)).unwrap();
            black_box(graph)
        });
    });
    group.bench_function("build_ops", |b| {
        let graph = GraphBuilder::new()
            .with_sink(&NullSink)
            .build(&instructions)
            .unwrap();
        let registry = OpRegistry::new();
        b.iter(|| black_box(registry.build(black_box(&graph)).unwrap()));
    });
    group.finish();
}

fn bench_step(c: &mut Criterion) {
    let instructions = guarded_chain(256);
    let graph = GraphBuilder::new()
        .with_sink(&NullSink)
        .build(&instructions)
        .unwrap();
    let ops = OpRegistry::new().build(&graph).unwrap();

    let mut entry = MethodState::new(2);
    entry.assign_register(0, HeapItem::unknown(types::INT)).unwrap();
    entry.assign_register(1, HeapItem::int(0)).unwrap();

    // Walk every node once in reverse postorder, handing each the entry state.
    let order = graph.reverse_postorder();
    let mut group = c.benchmark_group("emulation");
    group.throughput(Throughput::Elements(order.len() as u64));
    group.bench_function("step", |b| {
        b.iter(|| {
            let mut forks = 0;
            for &node in &order {
                forks += step(&graph, &ops, node, entry.fork()).unwrap().len();
            }
            black_box(forks)
        });
    });
    group.finish();
}

criterion_group!(benches, bench_build, bench_step);
criterion_main!(benches);
