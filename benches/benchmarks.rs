use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use adjmesh::{
    EH, PH,
    use_glam::{TetmeshF64, TrimeshF64},
};

const GRID_SIZES: [usize; 3] = [16, 64, 128];

// Mesh construction
fn bench_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("construction");
    for n in GRID_SIZES {
        group.bench_with_input(BenchmarkId::new("triangle_grid", n), &n, |b, &n| {
            b.iter(|| {
                let mesh = TrimeshF64::triangle_grid(black_box(n), black_box(n)).unwrap();
                black_box(mesh);
            });
        });
    }
    group.finish();
}

// Surface edits, each applied to every n-th element of a fresh grid.
fn bench_surface_edits(c: &mut Criterion) {
    let mut group = c.benchmark_group("surface_edits");
    let grid = TrimeshF64::triangle_grid(64, 64).unwrap();

    group.bench_function("edge_split", |b| {
        b.iter_batched(
            || grid.clone(),
            |mut mesh| {
                for e in (0..grid.num_edges() as u32).step_by(7) {
                    black_box(mesh.edge_split(EH::from(e), 0.5).unwrap());
                }
                mesh
            },
            BatchSize::LargeInput,
        );
    });

    group.bench_function("edge_flip", |b| {
        b.iter_batched(
            || grid.clone(),
            |mut mesh| {
                for e in (0..grid.num_edges() as u32).step_by(5) {
                    let _ = black_box(mesh.edge_flip(EH::from(e)));
                }
                mesh
            },
            BatchSize::LargeInput,
        );
    });

    group.bench_function("edge_collapse", |b| {
        b.iter_batched(
            || grid.clone(),
            |mut mesh| {
                // Collapses remove edges, so walk from the back.
                let mut e = mesh.num_edges();
                while e > 0 {
                    e = e.saturating_sub(11).min(mesh.num_edges().saturating_sub(1));
                    let _ = black_box(mesh.edge_collapse(EH::from(e as u32), 0.5));
                }
                mesh
            },
            BatchSize::LargeInput,
        );
    });

    group.bench_function("poly_remove", |b| {
        b.iter_batched(
            || grid.clone(),
            |mut mesh| {
                while mesh.num_polys() > 0 {
                    mesh.poly_remove(PH::from(0u32), true).unwrap();
                }
                mesh
            },
            BatchSize::LargeInput,
        );
    });

    group.finish();
}

// Queries
fn bench_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("queries");
    let grid = TrimeshF64::triangle_grid(128, 128).unwrap();

    group.bench_function("check_topology", |b| {
        b.iter(|| black_box(grid.check_topology()).unwrap());
    });

    group.bench_function("vert_normals", |b| {
        b.iter(|| {
            for v in grid.verts() {
                black_box(grid.vert_normal(v));
            }
        });
    });

    group.bench_function("total_area", |b| {
        b.iter(|| black_box(grid.total_area()));
    });

    group.finish();
}

// Volume edits
fn bench_volume_edits(c: &mut Criterion) {
    let mut group = c.benchmark_group("volume_edits");
    group.bench_function("tet_edge_split", |b| {
        b.iter(|| {
            let mut mesh = TetmeshF64::tetrahedron().unwrap();
            for i in 0..200u32 {
                let e = EH::from(i % mesh.num_edges() as u32);
                black_box(mesh.edge_split(e, 0.5).unwrap());
            }
            black_box(mesh.total_volume())
        });
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_construction,
    bench_surface_edits,
    bench_queries,
    bench_volume_edits,
);
criterion_main!(benches);
