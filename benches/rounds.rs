use botmarket::network::TrafficReport;
use botmarket::prelude::*;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn busy_config() -> SimConfig {
    let mut config = SimConfig::default()
        .with_botnet(30, 10.0)
        .with_good_traffic(0.4)
        .with_firewall(0.33);
    config.attacker_currency = 10_000_000;
    config.defender_currency = 10_000_000;
    config
}

fn rounds_bench(c: &mut Criterion) {
    c.bench_function("simulation_100_rounds", |b| {
        b.iter(|| {
            let mut sim = Simulation::new(busy_config()).unwrap();
            black_box(sim.run(100))
        })
    });
}

fn traffic_bench(c: &mut Criterion) {
    c.bench_function("traffic_compute", |b| {
        b.iter(|| TrafficReport::compute(black_box(250), black_box(2_500.0), black_box(0.3), black_box(0.1)))
    });
}

criterion_group!(benches, rounds_bench, traffic_bench);
criterion_main!(benches);
