#![warn(missing_docs)]
//! # swarm3d
//!
//! swarm3d is a crate providing a small real-time N-body engine for swarms of mutually attracting
//! particles, together with a hand-rolled 3D orbit camera, perspective projector and raycaster so
//! that the swarm can be drawn on any flat 2D surface without a 3D graphics library.
//!
//! ## Goals
//!
//! The main goal of this crate is to keep the whole per-frame cycle (input, gravity, collisions,
//! camera, depth sorting and projection) in one deterministic, single-threaded pass that can be
//! driven from any scheduling mechanism: a game loop, a browser animation frame or a test harness
//! ticking synthetic frames.
//!
//! Interaction is brute-force O(N²) over unique pairs. The cost of a frame is bounded by the
//! capacity of the [`ParticleStore`](storage::ParticleStore), which evicts its oldest particle when
//! full.
//!
//! ## Using swarm3d
//!
//! ### Setting up a simulation
//!
//! A [`SimulationContext`](frame::SimulationContext) owns the particles, the camera and the
//! configuration. A [`FrameDriver`](frame::FrameDriver) wraps it with an input queue and produces
//! back-to-front draw primitives each tick.
//!
//! ```
//! use swarm3d::prelude::*;
//!
//! let context = SimulationContext::new(SimulationConfig::default()).unwrap();
//! let mut driver = FrameDriver::new(context);
//!
//! driver.push(InputEvent::Resize { width: 800.0, height: 600.0 });
//! driver.push(InputEvent::SpawnAt { x: 400.0, y: 300.0, mode: SpawnMode::Burst });
//!
//! let frame = driver.tick(1.0 / 60.0);
//! assert_eq!(frame.stats.particles, 10);
//! ```
//!
//! ### Computing interactions directly
//!
//! Physics rules are expressed as [`Interaction`]s computed [`Between`] an affected and an
//! affecting object, and applied over a store by the algorithms of the [`sequential`] module.
//!
//! ```
//! use swarm3d::prelude::*;
//! use swarm3d::gravity::PairGravity;
//! use glam::DVec3;
//!
//! let a = Particle::new(DVec3::new(-100.0, 0.0, 0.0), 10.0, 2.0, Color::WHITE);
//! let b = Particle::new(DVec3::new(100.0, 0.0, 0.0), 10.0, 2.0, Color::WHITE);
//!
//! let gravity = PairGravity { g: 1.0, mass_scale: 1e6, softening: 50.0, min_distance: 2.0, dt: 1e-3 };
//! let deltas = BruteForcePairs(gravity).compute(&[a, b][..]);
//!
//! assert!(deltas[0].x > 0.0);
//! assert_eq!(deltas[0], -deltas[1]);
//! ```

/// Orbit camera and the orthonormal view basis derived from it.
pub mod camera;
/// Overlap detection and impulse response between particles.
pub mod collision;
/// Serializable configuration of a simulation session.
pub mod config;
/// Errors reported when building a simulation.
pub mod error;
/// Per-frame driver tying input, physics, camera and projection together.
pub mod frame;
/// Gravitational interactions and the semi-implicit Euler integrator.
pub mod gravity;
/// Abstract input events and the queue they are drained from.
pub mod input;
/// The simulated body and the traits used to read it.
pub mod particle;
/// Initial conditions for spawned particles.
pub mod presets;
/// World to screen projection and its inverse.
pub mod projection;
/// Algorithms that use one CPU thread.
pub mod sequential;
/// Bounded FIFO storage for particles.
pub mod storage;

pub use error::Error;

/// Represents a pair of objects, which can be particles or storages of particles, between which an
/// interaction is computed.
///
/// The first object is the one being affected by the second object.
#[derive(Clone, Copy, Debug)]
pub struct Between<S1, S2>(pub S1, pub S2);

/// Trait to compute an interaction between particles contained in a storage.
///
/// Gravity, attractor pull and collision response are all implementations of this trait, and the
/// algorithms in [`sequential`] decide which pairs they are computed over.
///
/// # Example
///
/// ```
/// # use swarm3d::prelude::*;
/// use glam::DVec3;
///
/// struct Separation;
///
/// impl Interaction<Between<&Particle, &Particle>> for Separation {
///     type Output = f64;
///
///     fn compute(&mut self, Between(affected, affecting): Between<&Particle, &Particle>) -> f64 {
///         affected.position.distance(affecting.position)
///     }
/// }
///
/// let a = Particle::new(DVec3::ZERO, 1.0, 1.0, Color::WHITE);
/// let b = Particle::new(DVec3::X * 3.0, 1.0, 1.0, Color::WHITE);
///
/// assert_eq!(Separation.compute(Between(&a, &b)), 3.0);
/// ```
pub trait Interaction<Storage> {
    /// The computed interaction. This can be one or multiple values depending on the storage used.
    type Output;

    /// Returns the interaction between the particles in the storage.
    fn compute(&mut self, storage: Storage) -> Self::Output;
}

/// Commonly used types, re-exported.
pub mod prelude {
    pub use crate::{
        camera::{Basis, CameraMode, CameraModel, CameraState},
        collision::{ElasticCollision, Resolution},
        config::SimulationConfig,
        frame::{DrawPrimitive, Frame, FrameDriver, Renderer, SimulationContext, Stats},
        gravity::{Attractor, Integrator, InteractionMode},
        input::{InputEvent, InputQueue, SpawnMode},
        particle::{Color, Mass, Particle, ParticleId, Position, Radius},
        projection::{FocalDepth, Projected, Projector, Raycaster, View, Viewport},
        sequential::{BruteForce, BruteForcePairs, BruteForcePairsMut, InteractionPair},
        storage::{Pairs, ParticleStore},
        Between, Interaction,
    };
}
