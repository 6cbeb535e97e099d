//! Initial conditions for spawned particles: scattered bursts, random palette colours and circular
//! orbits around an [`Attractor`].

use crate::{camera::WORLD_UP, gravity::Attractor, particle::Color};
use glam::DVec3;
use rand::{seq::SliceRandom, Rng};

/// Returns `count` positions drawn uniformly from the cube of side `spread` centred on `center`.
pub fn burst<R: Rng + ?Sized>(center: DVec3, count: usize, spread: f64, rng: &mut R) -> Vec<DVec3> {
    let half = spread / 2.0;

    (0..count)
        .map(|_| {
            if half > 0.0 {
                center
                    + DVec3::new(
                        rng.gen_range(-half..half),
                        rng.gen_range(-half..half),
                        rng.gen_range(-half..half),
                    )
            } else {
                center
            }
        })
        .collect()
}

/// Returns a colour picked uniformly from `palette`, or white if it is empty.
#[inline]
pub fn pick_color<R: Rng + ?Sized>(palette: &[Color], rng: &mut R) -> Color {
    palette.choose(rng).copied().unwrap_or(Color::WHITE)
}

/// Returns the momentum that puts a particle of the given mass on a circular orbit around the
/// attractor, in the plane perpendicular to the world up axis.
///
/// The speed is `sqrt(g * M * r / (r² + softening))`, so the softened attraction supplies exactly
/// the centripetal force. Returns zero if the particle sits on the attractor or on its vertical
/// axis, where the orbit plane is undefined.
pub fn seed_orbit(position: DVec3, mass: f64, attractor: &Attractor, g: f64, softening: f64) -> DVec3 {
    let radial = position - attractor.position;
    let r_2 = radial.length_squared();

    let tangent = WORLD_UP.cross(radial).normalize_or_zero();
    if tangent == DVec3::ZERO {
        return DVec3::ZERO;
    }

    let speed = (g * attractor.mass * r_2.sqrt() / (r_2 + softening)).sqrt();

    tangent * speed * mass
}

/// Returns `count` positions on a disc around the attractor, perpendicular to the world up axis.
///
/// Radii are biased towards the centre and start just outside the attractor.
pub fn galaxy<R: Rng + ?Sized>(
    attractor: &Attractor,
    count: usize,
    max_radius: f64,
    rng: &mut R,
) -> Vec<DVec3> {
    let inner = attractor.radius + 10.0;

    (0..count)
        .map(|_| {
            let angle = rng.gen_range(0.0..std::f64::consts::TAU);
            let u: f64 = rng.gen();
            let r = inner + u * u * (max_radius - inner).max(0.0);

            attractor.position + DVec3::new(r * angle.cos(), 0.0, r * angle.sin())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        gravity::{Integrator, InteractionMode},
        config::{GravityConfig, IntegratorConfig},
        particle::Particle,
    };
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn burst_stays_in_cube() {
        let mut rng = StdRng::seed_from_u64(7);
        let center = DVec3::new(400.0, 300.0, 1000.0);

        let positions = burst(center, 10, 40.0, &mut rng);

        assert_eq!(positions.len(), 10);
        for position in positions {
            assert!((position - center).abs().max_element() <= 20.0);
        }

        assert_eq!(burst(center, 3, 0.0, &mut rng), [center; 3]);
    }

    #[test]
    fn colors_come_from_palette() {
        let mut rng = StdRng::seed_from_u64(1);
        let palette = [Color::RED, Color::GREEN, Color::BLUE];

        for _ in 0..100 {
            assert!(palette.contains(&pick_color(&palette, &mut rng)));
        }
        assert_eq!(pick_color(&[], &mut rng), Color::WHITE);
    }

    #[test]
    fn seeded_orbit_stays_circular() {
        let attractor = Attractor {
            position: DVec3::ZERO,
            mass: 1e6,
            radius: 10.0,
        };
        let gravity = GravityConfig {
            g: 1.0,
            softening: 50.0,
            mode: InteractionMode::Attractor(attractor),
            ..GravityConfig::default()
        };
        let integrator = Integrator::new(
            &gravity,
            &IntegratorConfig {
                base_dt: 0.001,
                speed: 1.0,
                drag: 1.0,
            },
        );

        let position = DVec3::X * 100.0;
        let momentum = seed_orbit(position, 2.0, &attractor, 1.0, 50.0);
        assert!(momentum.normalize().abs_diff_eq(DVec3::Z, 1e-12));

        let mut particles = [Particle::new(position, 10.0, 2.0, Color::WHITE).with_momentum(momentum)];

        for _ in 0..7000 {
            integrator.step(&mut particles);

            let r = particles[0].position.length();
            assert!((99.95..=100.05).contains(&r), "radius drifted to {r}");
            assert!(particles[0].position.y.abs() < 1e-9);
        }
    }

    #[test]
    fn orbit_on_the_axis_is_undefined() {
        let attractor = Attractor {
            position: DVec3::ZERO,
            mass: 1e6,
            radius: 10.0,
        };

        assert_eq!(seed_orbit(DVec3::Y * 50.0, 1.0, &attractor, 1.0, 50.0), DVec3::ZERO);
        assert_eq!(seed_orbit(DVec3::ZERO, 1.0, &attractor, 1.0, 50.0), DVec3::ZERO);
    }

    #[test]
    fn galaxy_is_a_flat_disc() {
        let mut rng = StdRng::seed_from_u64(3);
        let attractor = Attractor {
            position: DVec3::new(400.0, 300.0, 1000.0),
            mass: 1e7,
            radius: 20.0,
        };

        for position in galaxy(&attractor, 200, 600.0, &mut rng) {
            let radial = position - attractor.position;
            assert_eq!(radial.y, 0.0);
            assert!((30.0 - 1e-9..=600.0 + 1e-9).contains(&radial.length()));
        }
    }
}
