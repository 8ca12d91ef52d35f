use criterion::{Criterion, black_box, criterion_group, criterion_main};
use overload_core::warmup::Slot;
use overload_core::{
    Equipment, ExerciseConfig, PlateSet, Rating, RepRange, SetOutcome, compute_decision, generate_warmup,
    micro_adjust, round_to_plates,
};

fn squat() -> ExerciseConfig {
    ExerciseConfig::new("squat", RepRange::new(5, 8), 5.0, 2.5)
        .with_equipment(Equipment::Barbell)
        .with_micro_step(2.5)
        .with_plates(PlateSet::new(
            20.0,
            vec![25.0, 25.0, 20.0, 15.0, 10.0, 5.0, 2.5, 2.5, 1.25, 1.25],
        ))
}

// Deterministic mix of outcomes cycling through every rating
fn outcomes(n: usize) -> Vec<SetOutcome> {
    (0..n)
        .map(|i| SetOutcome {
            set_index: i as u32 + 1,
            target_reps: 5,
            target_weight: 100.0,
            achieved_reps: 3 + (i as u32 * 3) % 7,
            rating: Rating::ALL[i % Rating::ALL.len()],
            actual_weight: 100.0,
        })
        .collect()
}

fn sample_size(g: &mut criterion::BenchmarkGroup<'_, criterion::measurement::WallTime>) {
    // BENCH_SAMPLE_SIZE=10 cargo bench -p overload_core --bench engine
    match std::env::var("BENCH_SAMPLE_SIZE").ok().and_then(|s| s.parse::<usize>().ok()) {
        Some(n) => g.sample_size(n.max(10)),
        None => g.sample_size(50),
    };
}

pub fn bench_rules(c: &mut Criterion) {
    let mut g = c.benchmark_group("rules");
    sample_size(&mut g);
    let range = RepRange::new(5, 8);

    g.bench_function("micro_adjust_all_ratings", |b| {
        b.iter(|| {
            for rating in Rating::ALL {
                for reps in 0..=10 {
                    black_box(micro_adjust(
                        black_box(102.5),
                        reps,
                        range,
                        rating,
                        5.0,
                        Some(2.5),
                        2.5,
                    ));
                }
            }
        })
    });

    for n in [3usize, 5, 10] {
        let sets = outcomes(n);
        g.bench_function(format!("compute_decision_{n}_sets"), |b| {
            b.iter(|| black_box(compute_decision(black_box(&sets), range, n)))
        });
    }
    g.finish();
}

pub fn bench_loading(c: &mut Criterion) {
    let mut g = c.benchmark_group("loading");
    sample_size(&mut g);
    let cfg = squat();
    let plates = cfg.plates.clone().unwrap_or_else(|| PlateSet::new(20.0, Vec::new()));

    g.bench_function("round_to_plates_sweep", |b| {
        b.iter(|| {
            let mut w = 20.0;
            while w < 250.0 {
                black_box(round_to_plates(black_box(w), &plates.plates, plates.bar_weight));
                w += 0.75;
            }
        })
    });
    g.bench_function("generate_warmup_barbell", |b| {
        b.iter(|| black_box(generate_warmup(Equipment::Barbell, black_box(140.0), Slot::First, &cfg)))
    });
    g.finish();
}

criterion_group!(engine, bench_rules, bench_loading);
criterion_main!(engine);
