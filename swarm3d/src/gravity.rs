use crate::{
    config::{GravityConfig, IntegratorConfig},
    particle::{Mass, Particle, Position, Radius},
    sequential::{BruteForce, BruteForcePairs, InteractionPair},
    Between, Interaction,
};
use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Range of the user-adjustable speed multiplier applied to the base timestep.
pub const SPEED_RANGE: std::ops::RangeInclusive<f64> = 0.1..=5.0;

/// A fixed body that attracts every particle but is never moved by them.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Attractor {
    /// Fixed position in world space.
    pub position: DVec3,
    /// Mass pulling on every particle.
    pub mass: f64,
    /// Radius inside which particles are no longer attracted.
    pub radius: f64,
}

impl Position for Attractor {
    type Vector = DVec3;

    #[inline]
    fn position(&self) -> DVec3 {
        self.position
    }
}

impl Mass for Attractor {
    type Scalar = f64;

    #[inline]
    fn mass(&self) -> f64 {
        self.mass
    }
}

impl Radius for Attractor {
    #[inline]
    fn radius(&self) -> f64 {
        self.radius
    }
}

/// Which bodies attract each other.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum InteractionMode {
    /// Every particle attracts every other particle.
    #[default]
    Pairwise,
    /// Every particle is attracted by one distinguished fixed body.
    Attractor(Attractor),
}

/// Returns `true` if two bodies are close enough that the attraction term must be skipped.
#[inline]
fn touching(distance: f64, radii: f64, min_distance: f64) -> bool {
    distance <= radii || distance <= min_distance
}

/// Softened Newtonian attraction between two particles, returned as the momentum each one gains
/// over one timestep.
///
/// `force = g * mass_i * (mass_j * mass_scale) / (r² + softening)`, which is symmetric in `i` and
/// `j`, so both particles receive equal and opposite momentum.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PairGravity {
    /// Gravitational constant.
    pub g: f64,
    /// Multiplier applied to particle masses in the force term.
    pub mass_scale: f64,
    /// Added to the squared distance to bound the force at small separations.
    pub softening: f64,
    /// Separation below which the attraction is skipped, whatever the radii.
    pub min_distance: f64,
    /// Timestep the momentum change is integrated over.
    pub dt: f64,
}

impl<P> InteractionPair<&P> for PairGravity
where
    P: Position<Vector = DVec3> + Mass<Scalar = f64> + Radius,
{
    type Output = DVec3;

    #[inline]
    fn compute_pair(&mut self, Between(affected, affecting): Between<&P, &P>) -> (DVec3, DVec3) {
        let dir = affecting.position() - affected.position();
        let mag_2 = dir.length_squared();
        let mag = mag_2.sqrt();

        if touching(mag, affected.radius() + affecting.radius(), self.min_distance) {
            return (DVec3::ZERO, DVec3::ZERO);
        }

        let force =
            self.g * affected.mass() * affecting.mass() * self.mass_scale / (mag_2 + self.softening);
        let impulse = dir / mag * force * self.dt;

        (impulse, -impulse)
    }
}

impl<P1, P2> Interaction<Between<&P1, &P2>> for PairGravity
where
    P1: Position<Vector = DVec3> + Mass<Scalar = f64> + Radius,
    P2: Position<Vector = DVec3> + Mass<Scalar = f64> + Radius,
{
    type Output = DVec3;

    #[inline]
    fn compute(&mut self, Between(affected, affecting): Between<&P1, &P2>) -> DVec3 {
        let dir = affecting.position() - affected.position();
        let mag_2 = dir.length_squared();
        let mag = mag_2.sqrt();

        if touching(mag, affected.radius() + affecting.radius(), self.min_distance) {
            return DVec3::ZERO;
        }

        let force =
            self.g * affected.mass() * affecting.mass() * self.mass_scale / (mag_2 + self.softening);

        dir / mag * force * self.dt
    }
}

/// Softened attraction towards an [`Attractor`], returned as the momentum the particle gains over
/// one timestep.
///
/// `force = g * mass_i * attractor.mass / (r² + softening)`. The attractor is not affected.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AttractorGravity {
    /// Gravitational constant.
    pub g: f64,
    /// Added to the squared distance to bound the force at small separations.
    pub softening: f64,
    /// Separation below which the attraction is skipped, whatever the radii.
    pub min_distance: f64,
    /// Timestep the momentum change is integrated over.
    pub dt: f64,
}

impl<P> Interaction<Between<&P, &Attractor>> for AttractorGravity
where
    P: Position<Vector = DVec3> + Mass<Scalar = f64> + Radius,
{
    type Output = DVec3;

    #[inline]
    fn compute(&mut self, Between(affected, attractor): Between<&P, &Attractor>) -> DVec3 {
        let dir = attractor.position - affected.position();
        let mag_2 = dir.length_squared();
        let mag = mag_2.sqrt();

        if touching(mag, affected.radius() + attractor.radius, self.min_distance) {
            return DVec3::ZERO;
        }

        let force = self.g * affected.mass() * attractor.mass / (mag_2 + self.softening);

        dir / mag * force * self.dt
    }
}

/// Semi-implicit Euler integrator: momentum is updated from gravity first, then damped by the
/// drag factor, then positions advance with the new momentum.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Integrator {
    /// Gravitational constant.
    pub g: f64,
    /// Multiplier applied to particle masses in pairwise mode.
    pub mass_scale: f64,
    /// Softening added to squared distances.
    pub softening: f64,
    /// Separation below which attraction is skipped.
    pub min_distance: f64,
    /// Interaction mode.
    pub mode: InteractionMode,
    /// Timestep before the speed multiplier is applied.
    pub base_dt: f64,
    /// Momentum multiplier applied every step. `1.0` disables damping.
    pub drag: f64,
    speed: f64,
}

impl Integrator {
    /// Creates a new [`Integrator`] from its configuration sections.
    #[inline]
    pub fn new(gravity: &GravityConfig, integrator: &IntegratorConfig) -> Self {
        Self {
            g: gravity.g,
            mass_scale: gravity.mass_scale,
            softening: gravity.softening,
            min_distance: gravity.min_distance,
            mode: gravity.mode,
            base_dt: integrator.base_dt,
            drag: integrator.drag,
            speed: clamp_speed(integrator.speed),
        }
    }

    /// Returns the speed multiplier.
    #[inline]
    pub const fn speed(&self) -> f64 {
        self.speed
    }

    /// Sets the speed multiplier, clamped to [`SPEED_RANGE`]. NaN is ignored.
    #[inline]
    pub fn set_speed(&mut self, speed: f64) {
        if speed.is_nan() {
            log::warn!("ignoring speed {speed}");
            return;
        }

        self.speed = clamp_speed(speed);
    }

    /// Returns the timestep of one step, `base_dt * speed`.
    #[inline]
    pub fn dt(&self) -> f64 {
        self.base_dt * self.speed
    }

    /// Adds the gravitational momentum gained over one timestep to every particle.
    ///
    /// Positions are only read, so the order particles are visited in does not matter.
    pub fn accumulate(&self, particles: &mut [Particle]) {
        let dt = self.dt();

        let deltas = match &self.mode {
            InteractionMode::Pairwise => BruteForcePairs(PairGravity {
                g: self.g,
                mass_scale: self.mass_scale,
                softening: self.softening,
                min_distance: self.min_distance,
                dt,
            })
            .compute(&*particles),
            InteractionMode::Attractor(attractor) => BruteForce(AttractorGravity {
                g: self.g,
                softening: self.softening,
                min_distance: self.min_distance,
                dt,
            })
            .compute(Between(&*particles, std::slice::from_ref(attractor))),
        };

        for (particle, delta) in particles.iter_mut().zip(deltas) {
            particle.momentum += delta;
        }
    }

    /// Damps momentum by the drag factor and advances positions by `momentum / mass * dt`.
    pub fn drift(&self, particles: &mut [Particle]) {
        let dt = self.dt();

        for particle in particles.iter_mut() {
            particle.momentum *= self.drag;
            particle.position += particle.momentum / particle.mass * dt;
        }
    }

    /// Runs [`accumulate`](Self::accumulate) then [`drift`](Self::drift).
    #[inline]
    pub fn step(&self, particles: &mut [Particle]) {
        self.accumulate(particles);
        self.drift(particles);
    }
}

#[inline]
fn clamp_speed(speed: f64) -> f64 {
    speed.clamp(*SPEED_RANGE.start(), *SPEED_RANGE.end())
}
