//! Configuration of a simulation session.
//!
//! Every section deserializes with defaults for missing fields, so a YAML document only needs to
//! name what it changes:
//!
//! ```
//! use swarm3d::config::SimulationConfig;
//!
//! let config = SimulationConfig::from_yaml(
//!     "
//! capacity: 500
//! collision:
//!   restitution: 1.0
//! gravity:
//!   mode:
//!     kind: attractor
//!     position: [400.0, 300.0, 1000.0]
//!     mass: 1.0e7
//!     radius: 20.0
//! ",
//! )
//! .unwrap();
//!
//! assert_eq!(config.capacity, 500);
//! assert_eq!(config.collision.restitution, 1.0);
//! assert_eq!(config.integrator.drag, 0.9995);
//! ```

use crate::{
    error::Error,
    gravity::{InteractionMode, SPEED_RANGE},
    particle::Color,
    projection::{FocalDepth, Viewport},
};
use serde::{Deserialize, Serialize};

/// Gravity parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GravityConfig {
    /// Gravitational constant.
    pub g: f64,
    /// Multiplier applied to particle masses in pairwise mode.
    pub mass_scale: f64,
    /// Added to squared distances in the force term.
    pub softening: f64,
    /// Separation below which attraction is skipped.
    pub min_distance: f64,
    /// Which bodies attract each other.
    pub mode: InteractionMode,
}

impl Default for GravityConfig {
    fn default() -> Self {
        Self {
            g: 1.0,
            mass_scale: 1e8,
            softening: 50.0,
            min_distance: 2.0,
            mode: InteractionMode::Pairwise,
        }
    }
}

/// Timestep parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegratorConfig {
    /// Timestep at a speed multiplier of 1.
    pub base_dt: f64,
    /// Initial speed multiplier.
    pub speed: f64,
    /// Momentum multiplier applied every step.
    pub drag: f64,
}

impl Default for IntegratorConfig {
    fn default() -> Self {
        Self {
            base_dt: 0.0003,
            speed: 1.0,
            drag: 0.9995,
        }
    }
}

/// Collision parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// Resolve overlapping pairs every frame.
    pub enabled: bool,
    /// Restitution coefficient of every contact.
    pub restitution: f64,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            restitution: 0.8,
        }
    }
}

/// Orbit camera parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Initial yaw, in radians.
    pub yaw: f64,
    /// Initial pitch, in radians.
    pub pitch: f64,
    /// Initial orbit distance.
    pub distance: f64,
    /// Closest zoom.
    pub min_distance: f64,
    /// Farthest zoom.
    pub max_distance: f64,
    /// Focal length, in pixels.
    pub fov: f64,
    /// Depth of the look-at anchor.
    pub anchor_depth: f64,
    /// Radians per pixel of orbit drag.
    pub orbit_sensitivity: f64,
    /// World units per pixel of pan drag.
    pub pan_sensitivity: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            distance: 1500.0,
            min_distance: 200.0,
            max_distance: 6000.0,
            fov: 800.0,
            anchor_depth: 1000.0,
            orbit_sensitivity: 0.005,
            pan_sensitivity: 2.0,
        }
    }
}

/// Projection and culling parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    /// Minimum depth in front of the eye.
    pub near_plane: f64,
    /// On-screen radius below which particles are culled.
    pub min_pixel_radius: f64,
    /// Depth over which particles fade out.
    pub fade_depth: f64,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            near_plane: 10.0,
            min_pixel_radius: 0.2,
            fade_depth: 3000.0,
        }
    }
}

/// Parameters of spawned particles.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    /// Radius of spawned particles.
    pub radius: f64,
    /// Mass per unit of radius.
    pub mass_per_radius: f64,
    /// Number of particles in a burst.
    pub burst_count: usize,
    /// Side of the cube a burst is scattered in.
    pub burst_spread: f64,
    /// Depth spawned particles are placed at.
    pub focal: FocalDepth,
    /// Colours picked from at random.
    pub palette: Vec<Color>,
    /// Seed of the random number generator.
    pub seed: u64,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            radius: 10.0,
            mass_per_radius: 0.2,
            burst_count: 10,
            burst_spread: 40.0,
            focal: FocalDepth::default(),
            palette: vec![Color::RED, Color::GREEN, Color::BLUE],
            seed: 0,
        }
    }
}

/// Complete configuration of a simulation session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Maximum number of particles.
    pub capacity: usize,
    /// Initial size of the drawing surface.
    pub viewport: Viewport,
    /// Gravity parameters.
    pub gravity: GravityConfig,
    /// Timestep parameters.
    pub integrator: IntegratorConfig,
    /// Collision parameters.
    pub collision: CollisionConfig,
    /// Orbit camera parameters.
    pub camera: CameraConfig,
    /// Projection and culling parameters.
    pub projection: ProjectionConfig,
    /// Parameters of spawned particles.
    pub spawn: SpawnConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            capacity: 1500,
            viewport: Viewport::default(),
            gravity: GravityConfig::default(),
            integrator: IntegratorConfig::default(),
            collision: CollisionConfig::default(),
            camera: CameraConfig::default(),
            projection: ProjectionConfig::default(),
            spawn: SpawnConfig::default(),
        }
    }
}

fn finite(field: &'static str, value: f64) -> Result<(), Error> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(Error::NonFinite { field, value })
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), Error> {
    finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(Error::NonPositive { field, value })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), Error> {
    finite(field, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(Error::Negative { field, value })
    }
}

impl SimulationConfig {
    /// Parses and validates a YAML document.
    pub fn from_yaml(yaml: &str) -> Result<Self, Error> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;

        Ok(config)
    }

    /// Checks every parameter against its valid range.
    pub fn validate(&self) -> Result<(), Error> {
        if self.capacity == 0 {
            return Err(Error::ZeroCapacity);
        }

        positive("viewport.width", self.viewport.width)?;
        positive("viewport.height", self.viewport.height)?;

        positive("gravity.g", self.gravity.g)?;
        positive("gravity.mass_scale", self.gravity.mass_scale)?;
        positive("gravity.softening", self.gravity.softening)?;
        non_negative("gravity.min_distance", self.gravity.min_distance)?;
        if let InteractionMode::Attractor(attractor) = &self.gravity.mode {
            finite("gravity.mode.position.x", attractor.position.x)?;
            finite("gravity.mode.position.y", attractor.position.y)?;
            finite("gravity.mode.position.z", attractor.position.z)?;
            positive("gravity.mode.mass", attractor.mass)?;
            positive("gravity.mode.radius", attractor.radius)?;
        }

        positive("integrator.base_dt", self.integrator.base_dt)?;
        if !SPEED_RANGE.contains(&self.integrator.speed) {
            return Err(Error::InvalidSpeed {
                value: self.integrator.speed,
            });
        }
        if !(self.integrator.drag > 0.0 && self.integrator.drag <= 1.0) {
            return Err(Error::InvalidDrag(self.integrator.drag));
        }

        if !(0.0..=1.0).contains(&self.collision.restitution) {
            return Err(Error::InvalidRestitution(self.collision.restitution));
        }

        finite("camera.yaw", self.camera.yaw)?;
        finite("camera.pitch", self.camera.pitch)?;
        finite("camera.distance", self.camera.distance)?;
        finite("camera.max_distance", self.camera.max_distance)?;
        finite("camera.anchor_depth", self.camera.anchor_depth)?;
        finite("camera.orbit_sensitivity", self.camera.orbit_sensitivity)?;
        finite("camera.pan_sensitivity", self.camera.pan_sensitivity)?;
        let CameraConfig {
            min_distance,
            max_distance,
            ..
        } = self.camera;
        if !(min_distance >= 0.0 && min_distance <= max_distance) {
            return Err(Error::InvalidZoomRange {
                min: min_distance,
                max: max_distance,
            });
        }
        positive("camera.fov", self.camera.fov)?;

        positive("projection.near_plane", self.projection.near_plane)?;
        non_negative("projection.min_pixel_radius", self.projection.min_pixel_radius)?;
        positive("projection.fade_depth", self.projection.fade_depth)?;

        positive("spawn.radius", self.spawn.radius)?;
        positive("spawn.mass_per_radius", self.spawn.mass_per_radius)?;
        finite("spawn.burst_spread", self.spawn.burst_spread)?;
        match self.spawn.focal {
            FocalDepth::Plane { z, fallback } => {
                finite("spawn.focal.z", z)?;
                positive("spawn.focal.fallback", fallback)?;
            }
            FocalDepth::OrbitDistance => {}
            FocalDepth::Fixed { distance } => positive("spawn.focal.distance", distance)?,
        }
        if self.spawn.palette.is_empty() {
            return Err(Error::EmptyPalette);
        }

        Ok(())
    }
}
