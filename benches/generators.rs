use criterion::{criterion_group, criterion_main, Criterion};
use mazeball::{
    generators,
    grid::RectGrid,
    units::{ColumnsCount, RowsCount},
};

fn bench_recursive_backtracker_maze_32(c: &mut Criterion) {
    let mut rng = rand::weak_rng();

    c.bench_function("recursive_backtracker_maze_32", move |b| {
        b.iter(|| {
            let mut g = RectGrid::new(RowsCount(32), ColumnsCount(32)).unwrap();
            generators::recursive_backtracker(&mut g, &mut rng)
        })
    });
}

fn bench_recursive_backtracker_maze_100(c: &mut Criterion) {
    let mut rng = rand::weak_rng();

    c.bench_function("recursive_backtracker_maze_100", move |b| {
        b.iter(|| {
            let mut g = RectGrid::new(RowsCount(100), ColumnsCount(100)).unwrap();
            generators::recursive_backtracker(&mut g, &mut rng)
        })
    });
}

criterion_group!(
    benches,
    bench_recursive_backtracker_maze_32,
    bench_recursive_backtracker_maze_100
);
criterion_main!(benches);
