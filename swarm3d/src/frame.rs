use crate::{
    camera::CameraModel,
    collision::{self, Resolution},
    config::SimulationConfig,
    error::Error,
    gravity::{Integrator, InteractionMode},
    input::{InputEvent, InputQueue, SpawnMode},
    particle::{Color, Particle},
    presets,
    projection::{Projector, Raycaster, View, Viewport},
    storage::ParticleStore,
};
use glam::{DVec2, DVec3};
use rand::{rngs::StdRng, SeedableRng};

/// A particle ready to be drawn as a filled circle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawPrimitive {
    /// Horizontal screen position, in pixels.
    pub x: f64,
    /// Vertical screen position, in pixels.
    pub y: f64,
    /// Radius on screen, at least one pixel.
    pub pixel_radius: f64,
    /// Fill colour.
    pub color: Color,
    /// Opacity in `[0.1, 1]`, fading with depth.
    pub alpha: f64,
}

/// Trait for the external collaborator that draws a frame.
pub trait Renderer {
    /// Draws the primitives of one frame, in order. Primitives are sorted back to front.
    fn render(&mut self, primitives: &[DrawPrimitive]);
}

impl Renderer for Vec<DrawPrimitive> {
    #[inline]
    fn render(&mut self, primitives: &[DrawPrimitive]) {
        self.clear();
        self.extend_from_slice(primitives);
    }
}

/// Frame statistics.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Stats {
    /// Number of stored particles.
    pub particles: usize,
    /// Frames per second, refreshed once per second of elapsed time.
    pub fps: f64,
    /// Number of frames ticked so far.
    pub frame: u64,
}

/// Output of one [`FrameDriver::tick`].
#[derive(Clone, Copy, Debug)]
pub struct Frame<'a> {
    /// Draw primitives, back to front.
    pub primitives: &'a [DrawPrimitive],
    /// Collisions resolved during the frame.
    pub contacts: Resolution,
    /// Statistics after the frame.
    pub stats: Stats,
}

/// State of one simulation session: the particles, the camera and everything configured for them.
///
/// Built once per session, emptied by [`clear`](Self::clear) and dropped when the session ends.
#[derive(Clone, Debug)]
pub struct SimulationContext {
    config: SimulationConfig,
    particles: ParticleStore,
    camera: CameraModel,
    integrator: Integrator,
    projector: Projector,
    raycaster: Raycaster,
    viewport: Viewport,
    spawn_radius: f64,
    rng: StdRng,
}

impl SimulationContext {
    /// Validates the configuration and builds a new empty session from it.
    pub fn new(config: SimulationConfig) -> Result<Self, Error> {
        config.validate()?;

        let mut camera = CameraModel::new(&config.camera);
        camera.set_anchor(config.viewport.anchor(config.camera.anchor_depth));
        camera.update();

        Ok(Self {
            particles: ParticleStore::new(config.capacity, config.spawn.mass_per_radius),
            camera,
            integrator: Integrator::new(&config.gravity, &config.integrator),
            projector: Projector::new(&config.projection),
            raycaster: Raycaster::new(&config.spawn),
            viewport: config.viewport,
            spawn_radius: config.spawn.radius,
            rng: StdRng::seed_from_u64(config.spawn.seed),
            config,
        })
    }

    /// Returns the configuration the session was built from.
    #[inline]
    pub const fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Returns the stored particles.
    #[inline]
    pub const fn particles(&self) -> &ParticleStore {
        &self.particles
    }

    /// Returns the stored particles mutably.
    #[inline]
    pub fn particles_mut(&mut self) -> &mut ParticleStore {
        &mut self.particles
    }

    /// Returns the camera.
    #[inline]
    pub const fn camera(&self) -> &CameraModel {
        &self.camera
    }

    /// Returns the camera mutably.
    #[inline]
    pub fn camera_mut(&mut self) -> &mut CameraModel {
        &mut self.camera
    }

    /// Returns the integrator.
    #[inline]
    pub const fn integrator(&self) -> &Integrator {
        &self.integrator
    }

    /// Returns the current size of the drawing surface.
    #[inline]
    pub const fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Returns the radius of particles spawned from now on.
    #[inline]
    pub const fn spawn_radius(&self) -> f64 {
        self.spawn_radius
    }

    /// Sets the radius of particles spawned from now on. Their mass follows from it.
    ///
    /// Radii that are not strictly positive and finite are ignored.
    pub fn set_spawn_radius(&mut self, radius: f64) {
        if !(radius.is_finite() && radius > 0.0) {
            log::warn!("ignoring spawn radius {radius}");
            return;
        }

        self.spawn_radius = radius;
        log::debug!("spawn radius set to {radius}");
    }

    /// Returns the view of the camera as of its last update.
    #[inline]
    pub fn view(&self) -> View {
        self.camera.view(self.viewport)
    }

    /// Spawns particles under a screen position and returns how many of them are still stored.
    ///
    /// The position is raycast with the camera as of its last update, which is what was on
    /// screen when the user clicked. A burst larger than the capacity evicts its own first
    /// particles, so the count is at most the capacity.
    pub fn spawn_at(&mut self, screen: DVec2, mode: SpawnMode) -> usize {
        let view = self.view();
        let point = self
            .raycaster
            .spawn_point(screen, &view, self.camera.state().distance);

        let positions = match mode {
            SpawnMode::Single => vec![point],
            SpawnMode::Burst => {
                let spawn = &self.config.spawn;
                log::debug!("spawning a burst of {} particles at {point}", spawn.burst_count);
                presets::burst(point, spawn.burst_count, spawn.burst_spread, &mut self.rng)
            }
        };

        let radius = self.spawn_radius;
        let mass = self.particles.mass_for(radius);

        for &position in &positions {
            let color = presets::pick_color(&self.config.spawn.palette, &mut self.rng);
            self.particles
                .insert(Particle::new(position, radius, mass, color));
        }

        positions.len().min(self.particles.capacity())
    }

    /// Spawns `count` particles on circular orbits around the attractor.
    ///
    /// Fails with [`Error::MissingAttractor`] unless the interaction mode is
    /// [`InteractionMode::Attractor`].
    pub fn seed_galaxy(&mut self, count: usize, max_radius: f64) -> Result<(), Error> {
        let InteractionMode::Attractor(attractor) = self.integrator.mode else {
            return Err(Error::MissingAttractor);
        };

        let radius = self.spawn_radius;
        let mass = self.particles.mass_for(radius);
        let (g, softening) = (self.integrator.g, self.integrator.softening);

        for position in presets::galaxy(&attractor, count, max_radius, &mut self.rng) {
            let color = presets::pick_color(&self.config.spawn.palette, &mut self.rng);
            let momentum = presets::seed_orbit(position, mass, &attractor, g, softening);

            self.particles
                .insert(Particle::new(position, radius, mass, color).with_momentum(momentum));
        }

        log::debug!("seeded {count} orbiting particles");
        Ok(())
    }

    /// Removes every particle.
    #[inline]
    pub fn clear(&mut self) {
        self.particles.clear();
    }

    /// Resizes the drawing surface and re-anchors the camera on its centre.
    ///
    /// The camera basis is refreshed at once, so spawns applied later in the same frame are
    /// raycast against the new surface.
    pub fn resize(&mut self, width: f64, height: f64) {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            log::warn!("ignoring resize to {width}x{height}");
            return;
        }

        self.viewport = Viewport { width, height };
        self.camera
            .set_anchor(self.viewport.anchor(self.config.camera.anchor_depth));
        self.camera.update();

        log::debug!("resized viewport to {width}x{height}");
    }

    /// Applies one input event.
    pub fn apply(&mut self, event: InputEvent) {
        match event {
            InputEvent::SpawnAt { x, y, mode } => {
                self.spawn_at(DVec2::new(x, y), mode);
            }
            InputEvent::BeginOrbit => self.camera.begin_orbit(),
            InputEvent::BeginPan => self.camera.begin_pan(),
            InputEvent::EndDrag => self.camera.end_drag(),
            InputEvent::OrbitDelta { dx, dy } => {
                self.camera.orbit(dx, dy);
            }
            InputEvent::PanDelta { dx, dy } => {
                self.camera.pan(dx, dy);
            }
            InputEvent::ZoomDelta { delta } => self.camera.zoom(delta),
            InputEvent::Resize { width, height } => self.resize(width, height),
            InputEvent::SetSpeed { speed } => self.integrator.set_speed(speed),
            InputEvent::SetSize { radius } => self.set_spawn_radius(radius),
            InputEvent::Clear => self.clear(),
        }
    }

    /// Runs one physics step: gravity over every particle first, then drag and drift, then
    /// collisions over every unique pair.
    pub fn step_physics(&mut self) -> Resolution {
        let particles = self.particles.as_mut_slice();

        self.integrator.step(particles);

        if self.config.collision.enabled {
            collision::resolve(particles, self.config.collision.restitution)
        } else {
            Resolution::default()
        }
    }
}

/// Frames per second over windows of at least one second.
#[derive(Clone, Copy, Debug, Default)]
struct FpsCounter {
    elapsed: f64,
    frames: u32,
    fps: f64,
}

impl FpsCounter {
    #[inline]
    fn tick(&mut self, elapsed: f64) -> f64 {
        self.elapsed += elapsed.max(0.0);
        self.frames += 1;

        if self.elapsed >= 1.0 {
            self.fps = f64::from(self.frames) / self.elapsed;
            self.elapsed = 0.0;
            self.frames = 0;
        }

        self.fps
    }
}

/// Drives a [`SimulationContext`] one frame at a time.
///
/// Each [`tick`](Self::tick) drains the input queue, steps the physics, updates the camera, sorts
/// the particles back to front and projects them.
#[derive(Clone, Debug)]
pub struct FrameDriver {
    context: SimulationContext,
    input: InputQueue,
    fps: FpsCounter,
    stats: Stats,
    order: Vec<usize>,
    primitives: Vec<DrawPrimitive>,
}

impl FrameDriver {
    /// Creates a new [`FrameDriver`] with an empty input queue.
    pub fn new(context: SimulationContext) -> Self {
        let capacity = context.particles.capacity();

        Self {
            context,
            input: InputQueue::new(),
            fps: FpsCounter::default(),
            stats: Stats::default(),
            order: Vec::with_capacity(capacity),
            primitives: Vec::with_capacity(capacity),
        }
    }

    /// Queues an input event for the next tick.
    #[inline]
    pub fn push(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Returns the queue of events applied by the next tick.
    #[inline]
    pub fn input_mut(&mut self) -> &mut InputQueue {
        &mut self.input
    }

    /// Returns the driven session.
    #[inline]
    pub const fn context(&self) -> &SimulationContext {
        &self.context
    }

    /// Returns the driven session mutably.
    #[inline]
    pub fn context_mut(&mut self) -> &mut SimulationContext {
        &mut self.context
    }

    /// Returns the statistics of the last tick.
    #[inline]
    pub const fn stats(&self) -> Stats {
        self.stats
    }

    /// Returns the store indices of the particles, farthest from the camera first, as of the last
    /// tick.
    #[inline]
    pub fn depth_order(&self) -> &[usize] {
        &self.order
    }

    /// Runs one frame. `elapsed` is the wall-clock time since the previous tick, in seconds, and
    /// only feeds the statistics; the physics timestep is fixed by the configuration.
    pub fn tick(&mut self, elapsed: f64) -> Frame<'_> {
        for event in self.input.drain() {
            self.context.apply(event);
        }

        let contacts = self.context.step_physics();

        self.context.camera.update();
        let view = self.context.view();

        depth_sort(self.context.particles.as_mut_slice(), view.eye, &mut self.order);

        let particles = &self.context.particles;
        let projector = &self.context.projector;
        self.primitives.clear();
        self.primitives.extend(
            self.order
                .iter()
                .filter_map(|&i| projector.primitive(&particles[i], &view)),
        );

        self.stats = Stats {
            particles: particles.len(),
            fps: self.fps.tick(elapsed),
            frame: self.stats.frame + 1,
        };

        log::trace!(
            "frame {}: {} particles, {} drawn, {} contacts",
            self.stats.frame,
            self.stats.particles,
            self.primitives.len(),
            contacts.contacts
        );

        Frame {
            primitives: &self.primitives,
            contacts,
            stats: self.stats,
        }
    }

    /// Runs one frame and hands its primitives to a renderer.
    pub fn tick_with<R: Renderer + ?Sized>(&mut self, elapsed: f64, renderer: &mut R) -> Stats {
        let frame = self.tick(elapsed);
        renderer.render(frame.primitives);

        frame.stats
    }
}

/// Updates the distance of every particle to the eye and fills `order` with their indices,
/// farthest first. Particles themselves are not moved.
#[cfg(not(feature = "parallel"))]
fn depth_sort(particles: &mut [Particle], eye: DVec3, order: &mut Vec<usize>) {
    for particle in particles.iter_mut() {
        particle.distance_to_camera = particle.position.distance(eye);
    }

    let particles = &*particles;
    order.clear();
    order.extend(0..particles.len());
    order.sort_by(|&a, &b| {
        particles[b]
            .distance_to_camera
            .total_cmp(&particles[a].distance_to_camera)
    });
}

/// Updates the distance of every particle to the eye and fills `order` with their indices,
/// farthest first. Particles themselves are not moved.
#[cfg(feature = "parallel")]
fn depth_sort(particles: &mut [Particle], eye: DVec3, order: &mut Vec<usize>) {
    use rayon::prelude::*;

    particles.par_iter_mut().for_each(|particle| {
        particle.distance_to_camera = particle.position.distance(eye);
    });

    let particles = &*particles;
    order.clear();
    order.extend(0..particles.len());
    order.par_sort_by(|&a, &b| {
        particles[b]
            .distance_to_camera
            .total_cmp(&particles[a].distance_to_camera)
    });
}
