use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use tilesmith::data::DataManager;
use tilesmith::world::generation::{partition, random_seeds};
use tilesmith::world::tile::{Appearance, TileCategory};
use tilesmith::world::{Biome, Grid};
use tilesmith::{build_environment, BuildContext, BuildParams, WorldKind};

fn bench_partition(c: &mut Criterion) {
    let biomes = [Biome::Meadow, Biome::Forest, Biome::Desert, Biome::Tundra, Biome::Marsh];
    c.bench_function("partition 160x120", |b| {
        let mut rng = StdRng::seed_from_u64(1);
        b.iter(|| {
            let mut grid = Grid::new(160, 120, Appearance::new(TileCategory::Grass, 0), Biome::Meadow);
            let seeds = random_seeds(&mut rng, 160, 120, &biomes);
            partition(&mut grid, black_box(&seeds));
            grid
        })
    });
}

fn bench_dungeon(c: &mut Criterion) {
    let data = DataManager::default();
    let params = BuildParams::for_kind(WorldKind::Dungeon, 3);
    c.bench_function("dungeon level 3", |b| {
        let mut rng = StdRng::seed_from_u64(7);
        b.iter(|| {
            let mut ctx = BuildContext { rng: &mut rng, data: &data };
            build_environment(WorldKind::Dungeon, 3, black_box(&params), &mut ctx)
        })
    });
}

criterion_group!(benches, bench_partition, bench_dungeon);
criterion_main!(benches);
