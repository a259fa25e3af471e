use bistro_logic::layout::RestaurantLayout;
use bistro_logic::pathfinding::find_path;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn bench_grid_build(c: &mut Criterion) {
    let layout = RestaurantLayout::default();
    c.bench_function("build_grid_960x640", |b| {
        b.iter(|| black_box(layout.build_grid(16.0)))
    });
}

fn bench_door_to_seats(c: &mut Criterion) {
    let layout = RestaurantLayout::default();
    let grid = layout.build_grid(16.0);
    let seats: Vec<_> = (0..layout.table_count())
        .filter_map(|i| layout.seat(i))
        .collect();
    c.bench_function("find_path_door_to_all_seats", |b| {
        b.iter(|| {
            for seat in &seats {
                black_box(find_path(&grid, layout.spawn, *seat));
            }
        })
    });
}

criterion_group!(benches, bench_grid_build, bench_door_to_seats);
criterion_main!(benches);
