use crate::{
    camera::Basis,
    config::{ProjectionConfig, SpawnConfig},
    frame::DrawPrimitive,
    particle::Particle,
};
use glam::{DVec2, DVec3};
use serde::{Deserialize, Serialize};

/// Size of the drawing surface, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

impl Viewport {
    /// Returns the centre of the surface.
    #[inline]
    pub fn center(&self) -> DVec2 {
        DVec2::new(self.width, self.height) / 2.0
    }

    /// Returns the world point the camera is anchored on for this surface: its centre, pushed
    /// `depth` units into the scene.
    #[inline]
    pub fn anchor(&self, depth: f64) -> DVec3 {
        self.center().extend(depth)
    }
}

/// Everything needed to map between world and screen space for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct View {
    /// Camera eye position.
    pub eye: DVec3,
    /// Orientation of the camera.
    pub basis: Basis,
    /// Focal length, in pixels.
    pub fov: f64,
    /// Screen position of the optical axis.
    pub center: DVec2,
}

/// A world point mapped onto the screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projected {
    /// Screen position, in pixels.
    pub screen: DVec2,
    /// Pixels per world unit at this depth, `fov / depth`.
    pub scale: f64,
    /// Distance in front of the eye along the forward axis.
    pub depth: f64,
}

impl Projected {
    /// Returns the on-screen radius of a sphere of the given world radius.
    #[inline]
    pub fn pixel_radius(&self, radius: f64) -> f64 {
        radius * self.scale
    }
}

impl View {
    /// Projects a world position onto the screen.
    ///
    /// Returns `None` if the point lies closer than `near_plane` in front of the eye, including
    /// every point behind it.
    #[inline]
    pub fn project(&self, world: DVec3, near_plane: f64) -> Option<Projected> {
        let offset = world - self.eye;
        let depth = offset.dot(self.basis.forward);

        if depth < near_plane {
            return None;
        }

        let scale = self.fov / depth;
        let screen = self.center
            + DVec2::new(offset.dot(self.basis.right), offset.dot(self.basis.up)) * scale;

        Some(Projected {
            screen,
            scale,
            depth,
        })
    }

    /// Returns the unit direction of the ray leaving the eye through a screen position.
    #[inline]
    pub fn ray_direction(&self, screen: DVec2) -> DVec3 {
        let offset = screen - self.center;

        (offset.x * self.basis.right + offset.y * self.basis.up + self.fov * self.basis.forward)
            .normalize()
    }

    /// Returns the world point `t` units along the ray through a screen position.
    #[inline]
    pub fn unproject(&self, screen: DVec2, t: f64) -> DVec3 {
        self.eye + t * self.ray_direction(screen)
    }
}

/// How far along the click ray a spawned particle is placed.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum FocalDepth {
    /// Intersect the ray with the world plane `z`, or use `fallback` if the ray is nearly parallel
    /// to the plane or meets it behind the eye.
    Plane {
        /// World z of the plane.
        z: f64,
        /// Distance used when the plane cannot be hit.
        fallback: f64,
    },
    /// Place the particle at the camera's current orbit distance.
    OrbitDistance,
    /// Place the particle at a fixed distance from the eye.
    Fixed {
        /// Distance from the eye.
        distance: f64,
    },
}

impl Default for FocalDepth {
    fn default() -> Self {
        Self::Plane {
            z: 1000.0,
            fallback: 1000.0,
        }
    }
}

/// Rays whose z component is smaller than this never hit a [`FocalDepth::Plane`].
const PARALLEL_EPSILON: f64 = 1e-3;

/// Maps screen positions back into world space to place new particles.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Raycaster {
    /// Where along the ray particles are placed.
    pub focal: FocalDepth,
}

impl Raycaster {
    /// Creates a new [`Raycaster`] from the spawn configuration.
    #[inline]
    pub fn new(config: &SpawnConfig) -> Self {
        Self {
            focal: config.focal,
        }
    }

    /// Returns the distance along `direction` at which a spawned particle is placed.
    pub fn depth(&self, eye: DVec3, direction: DVec3, orbit_distance: f64) -> f64 {
        match self.focal {
            FocalDepth::Plane { z, fallback } => {
                if direction.z.abs() < PARALLEL_EPSILON {
                    return fallback;
                }

                let t = (z - eye.z) / direction.z;
                if t < 0.0 {
                    fallback
                } else {
                    t
                }
            }
            FocalDepth::OrbitDistance => orbit_distance,
            FocalDepth::Fixed { distance } => distance,
        }
    }

    /// Returns the world point under a screen position.
    #[inline]
    pub fn spawn_point(&self, screen: DVec2, view: &View, orbit_distance: f64) -> DVec3 {
        let direction = view.ray_direction(screen);
        let t = self.depth(view.eye, direction, orbit_distance);

        view.eye + t * direction
    }
}

/// Turns particles into draw primitives, culling what is not worth drawing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projector {
    /// Minimum depth in front of the eye.
    pub near_plane: f64,
    /// Particles smaller than this on screen are culled.
    pub min_pixel_radius: f64,
    /// Depth over which particles fade out.
    pub fade_depth: f64,
}

impl Projector {
    /// Creates a new [`Projector`] from its configuration.
    #[inline]
    pub fn new(config: &ProjectionConfig) -> Self {
        Self {
            near_plane: config.near_plane,
            min_pixel_radius: config.min_pixel_radius,
            fade_depth: config.fade_depth,
        }
    }

    /// Returns the draw primitive of a particle, or `None` if it is behind the near plane or too
    /// small to see.
    pub fn primitive(&self, particle: &Particle, view: &View) -> Option<DrawPrimitive> {
        let projected = view.project(particle.position, self.near_plane)?;
        let pixel_radius = projected.pixel_radius(particle.radius);

        if pixel_radius < self.min_pixel_radius {
            return None;
        }

        Some(DrawPrimitive {
            x: projected.screen.x,
            y: projected.screen.y,
            pixel_radius: pixel_radius.max(1.0),
            color: particle.color,
            alpha: (1.2 - projected.depth / self.fade_depth).clamp(0.1, 1.0),
        })
    }
}
