//! 级联状态机性能基准测试
//!
//! 测试覆盖：
//! - 请求描述构造（累积参数）
//! - 单次选择引起的下级重置
//! - 快速连续改选与过期响应丢弃
//! - 不同候选集规模下的快照构建

use std::hint::black_box;

use cascade_core::state::{Completion, PendingFetch};
use cascade_core::{
    CascadeState, EquipmentItem, FetchTarget, SelectItem, StageChain, StageResolver,
};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

type State = CascadeState<Vec<EquipmentItem>>;

fn new_state() -> (State, PendingFetch) {
    CascadeState::new(StageResolver::new(StageChain::school_equipment()))
        .expect("创建状态机失败")
}

fn candidates(count: usize) -> Vec<SelectItem> {
    (0..count)
        .map(|i| SelectItem::new(i as i64, format!("item-{i}")))
        .collect()
}

fn complete(pending: &PendingFetch, items: Vec<SelectItem>) -> Completion<Vec<EquipmentItem>> {
    match pending.target {
        FetchTarget::Stage(stage) => Completion::Stage {
            stage,
            generation: pending.generation,
            result: Ok(items),
        },
        FetchTarget::Resource => Completion::Resource {
            generation: pending.generation,
            result: Ok(Vec::new()),
        },
    }
}

/// 基准测试：请求描述构造
fn bench_build_request(c: &mut Criterion) {
    let resolver = StageResolver::new(StageChain::school_equipment());
    let ancestors = vec![
        SelectItem::new(1, "Lincoln HS"),
        SelectItem::new(9, "Grade 9"),
        SelectItem::new("A", "9-A"),
    ];

    c.bench_function("build_request_resource", |b| {
        b.iter(|| {
            resolver
                .build_request(black_box(FetchTarget::Resource), black_box(&ancestors))
                .expect("构造请求失败")
        })
    });
}

/// 基准测试：选择学校并完成整条链
fn bench_full_walk(c: &mut Criterion) {
    c.bench_function("full_walk", |b| {
        b.iter(|| {
            let (mut state, root) = new_state();
            state.apply(complete(&root, candidates(10)));
            let mut pending = state
                .select(0, SelectItem::new(1, "item-1"))
                .expect("选择失败")
                .expect("应发起请求");
            for stage in 1..3 {
                state.apply(complete(&pending, candidates(10)));
                pending = state
                    .select(stage, SelectItem::new(2, "item-2"))
                    .expect("选择失败")
                    .expect("应发起请求");
            }
            state.apply(complete(&pending, Vec::new()));
            black_box(state)
        })
    });
}

/// 基准测试：快速连续改选，只有最后一次的响应被采用
fn bench_rapid_reselect(c: &mut Criterion) {
    let mut group = c.benchmark_group("rapid_reselect");

    for reselects in [10usize, 100, 1_000] {
        group.throughput(Throughput::Elements(reselects as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(reselects),
            &reselects,
            |b, &reselects| {
                b.iter(|| {
                    let (mut state, root) = new_state();
                    state.apply(complete(&root, candidates(reselects)));

                    let issued: Vec<PendingFetch> = (0..reselects)
                        .filter_map(|i| {
                            state
                                .select(0, SelectItem::new(i as i64, "x"))
                                .expect("选择失败")
                        })
                        .collect();
                    for pending in &issued {
                        state.apply(complete(pending, candidates(5)));
                    }
                    black_box(state)
                })
            },
        );
    }

    group.finish();
}

/// 基准测试：不同候选集规模下的快照构建
fn bench_view(c: &mut Criterion) {
    let mut group = c.benchmark_group("view");

    for size in [10usize, 100, 1_000] {
        let (mut state, root) = new_state();
        state.apply(complete(&root, candidates(size)));

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &state, |b, state| {
            b.iter(|| black_box(state.view(false)))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_build_request,
    bench_full_walk,
    bench_rapid_reselect,
    bench_view,
);

criterion_main!(benches);
