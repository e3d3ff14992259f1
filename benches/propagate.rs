use chrono::{Duration, TimeZone, Utc};
use criterion::{criterion_group, criterion_main, Criterion};
use orbit_predictor::location::Location;
use orbit_predictor::propagator::{Propagate, Propagator, Sgp4, Tle};

fn bugsat1() -> Propagator {
    let tle = Tle::new(
        Some("BUGSAT-1".to_owned()),
        "1 40014U 14033E   20179.25190503  .00000110  00000-0  36632-4 0  9997",
        "2 40014  97.9602 307.5076 0014527 81.5938 278.6709 14.91175328316903",
    );
    Propagator::Sgp4(Sgp4::from_tle(tle).unwrap())
}

pub fn criterion_benchmark(criterion: &mut Criterion) {
    let propagator = bugsat1();
    let location = Location::new("ASGK28", -34.0, -58.0, 25.0);
    let epoch = Utc.with_ymd_and_hms(2020, 6, 28, 0, 0, 0).unwrap();

    criterion.bench_function("elevation_for, 1000 samples", |b| {
        b.iter(|| {
            let mut sum = 0.0;
            for i in 0..1000 {
                let when = epoch + Duration::seconds(i);
                let position = propagator.get_only_position(when).unwrap();
                sum += location.elevation_for(position);
            }
            sum
        })
    });

    criterion.bench_function("passes_over, one week", |b| {
        b.iter(|| {
            let limit = epoch + Duration::days(7);
            propagator
                .passes_over(&location, epoch, limit, 0.0, 0.0, Duration::seconds(1))
                .filter_map(Result::ok)
                .count()
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
