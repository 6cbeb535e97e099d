use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Trait for types that can be located in space.
pub trait Position {
    /// The type used to represent the position.
    type Vector;

    /// Returns the position of a particle.
    fn position(&self) -> Self::Vector;
}

/// Trait for an object that defines a mass.
pub trait Mass {
    /// The scalar type used to represent the mass.
    type Scalar;

    /// Returns the mass of the particle.
    fn mass(&self) -> Self::Scalar;
}

/// Trait for an object with a spherical extent, used to decide when two bodies are touching.
pub trait Radius: Mass {
    /// Returns the radius of the particle.
    fn radius(&self) -> Self::Scalar;
}

/// Opaque colour tag carried by a particle and forwarded untouched to the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Color {
    /// Opaque white, the colour of particles spawned without a palette.
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Pure red.
    pub const RED: Self = Self::rgb(255, 0, 0);
    /// Pure green.
    pub const GREEN: Self = Self::rgb(0, 255, 0);
    /// Pure blue.
    pub const BLUE: Self = Self::rgb(0, 0, 255);

    /// Creates a new [`Color`] from its red, green and blue channels.
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Identifier handed out by a [`ParticleStore`](crate::storage::ParticleStore) on insertion.
///
/// Identifiers increase monotonically for the lifetime of a store, including across clears, so an
/// identifier is never reused for a different particle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ParticleId(pub u64);

/// A simulated body.
///
/// Particles are plain records: the store owns them, the integrator and the collision resolver
/// mutate them in place. `mass` and `radius` are strictly positive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    /// Identifier assigned by the store. Default for particles that were never inserted.
    pub id: ParticleId,
    /// Position in world space.
    pub position: DVec3,
    /// Linear momentum, `mass * velocity`.
    pub momentum: DVec3,
    /// Inertial and gravitational mass, strictly positive.
    pub mass: f64,
    /// Radius of the sphere, strictly positive.
    pub radius: f64,
    /// Colour tag forwarded to the renderer.
    pub color: Color,
    /// Distance to the camera eye, recomputed every frame before depth sorting.
    pub distance_to_camera: f64,
}

impl Particle {
    /// Creates a new [`Particle`] at rest.
    ///
    /// # Panics
    ///
    /// Panics if `radius` or `mass` is not strictly positive.
    #[inline]
    pub fn new(position: DVec3, radius: f64, mass: f64, color: Color) -> Self {
        assert!(radius > 0.0, "particle radius must be positive, got {radius}");
        assert!(mass > 0.0, "particle mass must be positive, got {mass}");

        Self {
            id: ParticleId::default(),
            position,
            momentum: DVec3::ZERO,
            mass,
            radius,
            color,
            distance_to_camera: 0.0,
        }
    }

    /// Returns the same particle with the given momentum.
    #[inline]
    pub fn with_momentum(self, momentum: DVec3) -> Self {
        Self { momentum, ..self }
    }

    /// Returns the velocity of the particle, `momentum / mass`.
    #[inline]
    pub fn velocity(&self) -> DVec3 {
        self.momentum / self.mass
    }
}

impl Position for Particle {
    type Vector = DVec3;

    #[inline]
    fn position(&self) -> DVec3 {
        self.position
    }
}

impl Mass for Particle {
    type Scalar = f64;

    #[inline]
    fn mass(&self) -> f64 {
        self.mass
    }
}

impl Radius for Particle {
    #[inline]
    fn radius(&self) -> f64 {
        self.radius
    }
}

impl<P: Position> Position for &P {
    type Vector = P::Vector;

    #[inline]
    fn position(&self) -> Self::Vector {
        (**self).position()
    }
}

impl<P: Mass> Mass for &P {
    type Scalar = P::Scalar;

    #[inline]
    fn mass(&self) -> Self::Scalar {
        (**self).mass()
    }
}

impl<P: Radius> Radius for &P {
    #[inline]
    fn radius(&self) -> Self::Scalar {
        (**self).radius()
    }
}
