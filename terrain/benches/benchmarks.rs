use criterion::{criterion_group, criterion_main, Criterion};
use sdf::{Resolution, Tile, TileKey};
use terrain::{math::destination, Path, Site, StoreConfig, TileStore};

/// Four standard resolution tiles of rolling synthetic terrain around
/// 45N 72W.
fn synthetic_store() -> TileStore {
    let mut store = TileStore::new(StoreConfig::new(4, Resolution::Standard).unwrap());
    for (lat, lon) in [(44, 71), (44, 72), (45, 71), (45, 72)] {
        let tile = Tile::from_fn(TileKey::new(lat, lon), Resolution::Standard, |x, y| {
            let (x, y) = (x as f64 / 40.0, y as f64 / 55.0);
            (300.0 + 120.0 * x.sin() * y.cos()) as i16
        });
        store.insert(tile).unwrap();
    }
    store
}

fn path_sampling(c: &mut Criterion) {
    let mut group = c.benchmark_group("Path");
    let store = synthetic_store();
    let source = Site::new(45.0, 72.0, 100.0);

    for (name, miles) in [("short", 2.0), ("long", 40.0)] {
        let dest = destination(&source, 63.0, miles);
        group.bench_with_input(name, &(&store, &source, dest), |b, (s, src, dst)| {
            b.iter(|| Path::new(s, src, dst))
        });
    }
}

criterion_group!(benches, path_sampling);
criterion_main!(benches);
