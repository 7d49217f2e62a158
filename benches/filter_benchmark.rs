use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use globo_travel::{apply, load, Catalog, FilterSpec, InMemorySource, Row, SortKey};
use rand::{seq::SliceRandom, thread_rng, Rng};
use serde_json::json;

const LOCATIONS: [&str; 8] = ["Paris", "Goa", "Bali", "Oslo", "Jaipur", "Zurich", "Rome", "Lima"];
const AMENITIES: [&str; 5] = ["Parking", "Swimming Pool", "Free Wi-Fi", "Restaurant", "Gym"];
const TRAVEL_TYPES: [&str; 4] = ["Solo", "Business", "Leisure", "Family"];

// Random but valid catalog of the given size
fn random_catalog(size: usize) -> Catalog {
    let mut rng = thread_rng();
    let rows: Vec<Row> = (0..size)
        .map(|i| {
            let day = rng.gen_range(1..=20);
            let amenity_count = rng.gen_range(1..=3);
            let amenities: Vec<&str> = AMENITIES
                .choose_multiple(&mut rng, amenity_count)
                .copied()
                .collect();
            let value = json!({
                "Travel Company": format!("Company {}", i % 37),
                "Trip Location": LOCATIONS.choose(&mut rng).unwrap(),
                "People per Trip": rng.gen_range(1..=10),
                "Fees": rng.gen_range(100..5000),
                "Other Details": "Generated offer",
                "Departure Date": format!("2025-06-{:02}", day),
                "Return Date": format!("2025-06-{:02}", day + rng.gen_range(1..=10)),
                "Star Rating": rng.gen_range(1..=5),
                "Amenities": amenities.join(", "),
                "Travel Type": TRAVEL_TYPES.choose(&mut rng).unwrap(),
                "Image URL": null,
                "Travel ID": format!("GT-{}", i),
            });
            match value {
                serde_json::Value::Object(map) => map,
                _ => unreachable!(),
            }
        })
        .collect();

    load(&InMemorySource::new("bench", rows)).unwrap()
}

pub fn filter_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter_engine");

    for size in [1_000, 10_000, 100_000].iter() {
        let catalog = random_catalog(*size);
        let mut spec = FilterSpec::sidebar_defaults(&catalog);
        spec.min_star_rating = 3;

        for sort_key in [SortKey::Fee, SortKey::Location] {
            spec.sort_key = sort_key;
            group.bench_with_input(
                BenchmarkId::new(format!("{:?}", sort_key), size),
                &spec,
                |b, spec| b.iter(|| black_box(apply(&catalog, spec))),
            );
        }
    }

    group.finish();
}

criterion_group!(benches, filter_benchmark);
criterion_main!(benches);
