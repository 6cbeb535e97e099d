use criterion::{
    criterion_group, criterion_main, AxisScale, BenchmarkId, Criterion, PlotConfiguration,
};
use rand::{rngs::StdRng, Rng, SeedableRng};

use glam::DVec3;
use swarm3d::{gravity::PairGravity, prelude::*};

const GRAVITY: PairGravity = PairGravity {
    g: 1.0,
    mass_scale: 1e8,
    softening: 50.0,
    min_distance: 2.0,
    dt: 0.0003,
};

fn random_particles(i: usize) -> Vec<Particle> {
    let mut rng = StdRng::seed_from_u64(0);
    let mut gen = |range| rng.gen_range(range);

    (0..i)
        .map(|_| {
            let position = DVec3::new(gen(0.0..800.0), gen(0.0..600.0), gen(0.0..2000.0));
            let radius = gen(1.0..20.0);

            Particle::new(position, radius, 0.2 * radius, Color::WHITE)
        })
        .collect()
}

fn driver(particles: &[Particle]) -> FrameDriver {
    let config = SimulationConfig {
        capacity: particles.len(),
        ..SimulationConfig::default()
    };
    let mut context = SimulationContext::new(config).unwrap();

    for &particle in particles {
        context.particles_mut().insert(particle);
    }

    FrameDriver::new(context)
}

fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("swarm3d");
    group
        .plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic))
        .warm_up_time(std::time::Duration::from_secs(1))
        .sample_size(50);

    for i in (2..=11).map(|i| 2_usize.pow(i)) {
        let particles = random_particles(i);

        group.bench_with_input(
            BenchmarkId::new("sequential::BruteForcePairs", i),
            &particles,
            |b, input| b.iter(|| BruteForcePairs(GRAVITY).compute(&input[..])),
        );

        group.bench_with_input(
            BenchmarkId::new("sequential::BruteForce", i),
            &particles,
            |b, input| b.iter(|| BruteForce(GRAVITY).compute(Between(&input[..], &input[..]))),
        );

        group.bench_with_input(
            BenchmarkId::new("FrameDriver::tick", i),
            &particles,
            |b, input| {
                let mut driver = driver(input);
                b.iter(|| driver.tick(1.0 / 60.0).stats)
            },
        );
    }

    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
