use glam::{DVec2, DVec3};
use rand::{rngs::StdRng, Rng, SeedableRng};
use swarm3d::{camera::PITCH_LIMIT, collision, prelude::*};

fn config(mass_scale: f64, collisions: bool) -> SimulationConfig {
    let mut config = SimulationConfig::default();
    config.gravity.mass_scale = mass_scale;
    config.integrator.drag = 1.0;
    config.collision.enabled = collisions;
    config
}

fn random_vector(rng: &mut StdRng, range: f64) -> DVec3 {
    DVec3::new(
        rng.gen_range(-range..range),
        rng.gen_range(-range..range),
        rng.gen_range(-range..range),
    )
}

#[test]
fn gravity_conserves_momentum() {
    let mut context = SimulationContext::new(config(1e7, false)).unwrap();
    let store = context.particles_mut();
    store.insert(
        Particle::new(DVec3::new(-150.0, 20.0, 30.0), 10.0, 2.0, Color::RED)
            .with_momentum(DVec3::new(0.0, 50.0, -10.0)),
    );
    store.insert(
        Particle::new(DVec3::new(150.0, -20.0, 0.0), 6.0, 5.0, Color::BLUE)
            .with_momentum(DVec3::new(-30.0, 0.0, 5.0)),
    );

    let total = |context: &SimulationContext| context.particles().iter().map(|p| p.momentum).sum::<DVec3>();
    let before = total(&context);

    for _ in 0..1000 {
        context.step_physics();
    }

    let after = total(&context);
    assert!(before.abs_diff_eq(after, 1e-9), "{before} != {after}");

    // The bodies did interact.
    assert!(context.particles()[0].momentum.x > 0.0);
}

#[test]
fn oldest_particle_is_evicted_first() {
    let mut store = ParticleStore::new(1500, 0.2);
    let markers: Vec<_> = (0..1501)
        .map(|i| store.spawn(DVec3::X * i as f64, 10.0))
        .collect();

    assert_eq!(store.len(), 1500);
    assert!(store.get(markers[0]).is_none());
    assert_eq!(store.get(markers[1]).unwrap().position, DVec3::X);
    assert_eq!(store.get(markers[1500]).unwrap().position, DVec3::X * 1500.0);
}

#[test]
fn spawn_events_never_exceed_capacity() {
    let mut config = SimulationConfig::default();
    config.capacity = 25;
    let mut driver = FrameDriver::new(SimulationContext::new(config).unwrap());
    let mut rng = StdRng::seed_from_u64(11);

    for _ in 0..20 {
        let mode = if rng.gen_bool(0.5) {
            SpawnMode::Burst
        } else {
            SpawnMode::Single
        };
        driver.push(InputEvent::SpawnAt {
            x: rng.gen_range(0.0..800.0),
            y: rng.gen_range(0.0..600.0),
            mode,
        });

        let frame = driver.tick(1.0 / 60.0);
        assert!(frame.stats.particles <= 25);
    }
}

#[test]
fn collisions_separate_overlapping_pairs() {
    let mut rng = StdRng::seed_from_u64(5);

    for _ in 0..500 {
        let r1 = rng.gen_range(1.0..20.0);
        let r2 = rng.gen_range(1.0..20.0);
        let a = Particle::new(random_vector(&mut rng, 100.0), r1, 0.2 * r1, Color::RED)
            .with_momentum(random_vector(&mut rng, 50.0));
        let offset = random_vector(&mut rng, 1.0).normalize() * rng.gen_range(0.1..r1 + r2);
        let b = Particle::new(a.position + offset, r2, 0.2 * r2, Color::GREEN)
            .with_momentum(random_vector(&mut rng, 50.0));

        let mut particles = [a, b];
        let resolution = collision::resolve(&mut particles, rng.gen_range(0.0..=1.0));

        assert_eq!(resolution.contacts, 1);
        let distance = particles[0].position.distance(particles[1].position);
        assert!(distance >= r1 + r2 - 1e-9, "{distance} < {}", r1 + r2);
    }
}

#[test]
fn separating_bodies_keep_their_momentum() {
    let a = Particle::new(DVec3::ZERO, 10.0, 2.0, Color::RED).with_momentum(DVec3::new(-4.0, 1.0, 0.0));
    let b = Particle::new(DVec3::X * 15.0, 10.0, 2.0, Color::BLUE).with_momentum(DVec3::new(4.0, 3.0, 0.0));
    let mut particles = [a, b];

    let resolution = collision::resolve(&mut particles, 0.8);

    assert_eq!(resolution.contacts, 1);
    assert_eq!(resolution.impulses, 0);
    assert_eq!(particles[0].momentum, a.momentum);
    assert_eq!(particles[1].momentum, b.momentum);
}

#[test]
fn orbit_drags_keep_pitch_clamped() {
    let mut driver = FrameDriver::new(SimulationContext::new(SimulationConfig::default()).unwrap());
    let mut rng = StdRng::seed_from_u64(2);

    for _ in 0..200 {
        driver.push(InputEvent::BeginOrbit);
        for _ in 0..rng.gen_range(1..10) {
            driver.push(InputEvent::OrbitDelta {
                dx: rng.gen_range(-1000.0..1000.0),
                dy: rng.gen_range(-1000.0..1000.0),
            });
        }
        driver.push(InputEvent::EndDrag);
        driver.tick(1.0 / 60.0);

        let pitch = driver.context().camera().state().pitch;
        assert!((-PITCH_LIMIT..=PITCH_LIMIT).contains(&pitch));
    }
}

#[test]
fn project_unproject_round_trip() {
    let mut rng = StdRng::seed_from_u64(9);
    let mut context = SimulationContext::new(SimulationConfig::default()).unwrap();
    let raycaster = Raycaster::default();

    for _ in 0..200 {
        let camera = context.camera_mut();
        camera.orbit(rng.gen_range(-200.0..200.0), rng.gen_range(-200.0..200.0));
        camera.zoom(rng.gen_range(-300.0..300.0));
        camera.update();

        let view = context.view();
        let screen = DVec2::new(rng.gen_range(0.0..800.0), rng.gen_range(0.0..600.0));
        let world = raycaster.spawn_point(screen, &view, context.camera().state().distance);

        if let Some(projected) = view.project(world, 10.0) {
            assert!(projected.screen.abs_diff_eq(screen, 1e-6));
        }
    }
}

#[test]
fn painter_ordering_after_every_tick() {
    let mut driver = FrameDriver::new(SimulationContext::new(SimulationConfig::default()).unwrap());
    let mut rng = StdRng::seed_from_u64(4);

    for _ in 0..30 {
        driver.push(InputEvent::SpawnAt {
            x: rng.gen_range(0.0..800.0),
            y: rng.gen_range(0.0..600.0),
            mode: SpawnMode::Burst,
        });
        driver.push(InputEvent::OrbitDelta {
            dx: rng.gen_range(-50.0..50.0),
            dy: rng.gen_range(-50.0..50.0),
        });

        let frame = driver.tick(1.0 / 60.0);
        assert!(frame.primitives.len() <= frame.stats.particles);

        let particles = driver.context().particles();
        for pair in driver.depth_order().windows(2) {
            assert!(particles[pair[0]].distance_to_camera >= particles[pair[1]].distance_to_camera);
        }
    }
}

#[test]
fn two_bodies_fall_together_and_collide_once() {
    let mut context = SimulationContext::new(config(3e7, true)).unwrap();
    let store = context.particles_mut();
    store.spawn(DVec3::new(300.0, 300.0, 1000.0), 10.0);
    store.spawn(DVec3::new(500.0, 300.0, 1000.0), 10.0);

    let mut collision_frames = 0;
    for _ in 0..1000 {
        let resolution = context.step_physics();

        if resolution.contacts > 0 {
            collision_frames += 1;

            let [a, b] = [&context.particles()[0], &context.particles()[1]];
            assert!(a.position.distance(b.position) >= 20.0 - 1e-9);
        }

        let [a, b] = [&context.particles()[0], &context.particles()[1]];
        assert!(a.position.x < b.position.x, "bodies crossed");
    }

    assert_eq!(collision_frames, 1);

    let [a, b] = [&context.particles()[0], &context.particles()[1]];
    assert!(a.position.distance(b.position) < 200.0);
    assert!(a.position.x > 300.0);
    assert!(b.position.x < 500.0);
}
