use crate::{
    config::CameraConfig,
    projection::{View, Viewport},
};
use glam::{DVec2, DVec3};

/// Largest absolute pitch, in radians. Keeps the forward vector away from the world up axis.
pub const PITCH_LIMIT: f64 = 1.5;

/// Fixed world up reference. Screen space grows downwards, so world up points towards negative y.
pub const WORLD_UP: DVec3 = DVec3::NEG_Y;

/// Squared length below which a vector is treated as having no direction.
const DEGENERATE_LENGTH_SQUARED: f64 = 1e-18;

/// Mutually exclusive pointer interaction modes of a [`CameraModel`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CameraMode {
    /// No drag in progress.
    #[default]
    Idle,
    /// Drags change yaw and pitch.
    Orbiting,
    /// Drags change the pan offset.
    Panning,
}

/// Orthonormal view basis derived from the camera orientation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Basis {
    /// Unit vector from the eye towards the target.
    pub forward: DVec3,
    /// Unit vector pointing to the right of the screen.
    pub right: DVec3,
    /// Unit vector pointing to the bottom of the screen.
    pub up: DVec3,
}

impl Default for Basis {
    fn default() -> Self {
        Self {
            forward: DVec3::NEG_Z,
            right: DVec3::X,
            up: DVec3::NEG_Y,
        }
    }
}

impl Basis {
    /// Derives a basis from a forward direction, or returns `None` if `forward` has no direction
    /// or is parallel to [`WORLD_UP`].
    pub fn from_forward(forward: DVec3) -> Option<Self> {
        if forward.length_squared() < DEGENERATE_LENGTH_SQUARED {
            return None;
        }
        let forward = forward.normalize();

        let right = WORLD_UP.cross(forward);
        if right.length_squared() < DEGENERATE_LENGTH_SQUARED {
            return None;
        }
        let right = right.normalize();

        Some(Self {
            forward,
            right,
            up: forward.cross(right),
        })
    }
}

/// Persistent orientation of the orbit camera, as mutated by input.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraState {
    /// Rotation around the world up axis, in radians.
    pub yaw: f64,
    /// Elevation, in radians, within `[-PITCH_LIMIT, PITCH_LIMIT]`.
    pub pitch: f64,
    /// Distance from the eye to the target, within the zoom range.
    pub distance: f64,
    /// Offset of the target from the anchor, in screen-space units.
    pub pan: DVec2,
    /// Focal length of the perspective projection, in pixels.
    pub fov: f64,
}

/// Orbit camera around a pannable target.
///
/// The eye sits on a sphere of radius `distance` around `anchor + pan`. [`update`](Self::update)
/// derives the eye position and the view [`Basis`] from the current state, once per frame.
#[derive(Clone, Debug)]
pub struct CameraModel {
    state: CameraState,
    min_distance: f64,
    max_distance: f64,
    anchor: DVec3,
    orbit_sensitivity: f64,
    pan_sensitivity: f64,
    mode: CameraMode,
    position: DVec3,
    basis: Basis,
}

impl CameraModel {
    /// Creates a new [`CameraModel`] looking at `(0, 0, anchor_depth)` and derives its first basis.
    pub fn new(config: &CameraConfig) -> Self {
        let mut camera = Self {
            state: CameraState {
                yaw: config.yaw,
                pitch: config.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT),
                distance: config.distance.clamp(config.min_distance, config.max_distance),
                pan: DVec2::ZERO,
                fov: config.fov,
            },
            min_distance: config.min_distance,
            max_distance: config.max_distance,
            anchor: DVec3::new(0.0, 0.0, config.anchor_depth),
            orbit_sensitivity: config.orbit_sensitivity,
            pan_sensitivity: config.pan_sensitivity,
            mode: CameraMode::Idle,
            position: DVec3::ZERO,
            basis: Basis::default(),
        };

        camera.update();
        camera
    }

    /// Returns the current orientation state.
    #[inline]
    pub const fn state(&self) -> &CameraState {
        &self.state
    }

    /// Returns the current interaction mode.
    #[inline]
    pub const fn mode(&self) -> CameraMode {
        self.mode
    }

    /// Returns the eye position computed by the last [`update`](Self::update).
    #[inline]
    pub const fn position(&self) -> DVec3 {
        self.position
    }

    /// Returns the basis computed by the last successful [`update`](Self::update).
    #[inline]
    pub const fn basis(&self) -> Basis {
        self.basis
    }

    /// Returns the point the camera orbits around, `anchor + pan`.
    #[inline]
    pub fn target(&self) -> DVec3 {
        self.anchor + self.state.pan.extend(0.0)
    }

    /// Moves the fixed look-at anchor.
    #[inline]
    pub fn set_anchor(&mut self, anchor: DVec3) {
        self.anchor = anchor;
    }

    /// Enters [`CameraMode::Orbiting`].
    #[inline]
    pub fn begin_orbit(&mut self) {
        self.mode = CameraMode::Orbiting;
    }

    /// Enters [`CameraMode::Panning`].
    #[inline]
    pub fn begin_pan(&mut self) {
        self.mode = CameraMode::Panning;
    }

    /// Returns to [`CameraMode::Idle`].
    #[inline]
    pub fn end_drag(&mut self) {
        self.mode = CameraMode::Idle;
    }

    /// Applies an orbit drag of `(dx, dy)` pixels and returns `true` if it was applied.
    ///
    /// An orbit drag while idle starts orbiting; one received while panning is ignored, as is
    /// any non-finite drag.
    pub fn orbit(&mut self, dx: f64, dy: f64) -> bool {
        if !(dx.is_finite() && dy.is_finite()) {
            return false;
        }

        match self.mode {
            CameraMode::Panning => return false,
            CameraMode::Idle => self.mode = CameraMode::Orbiting,
            CameraMode::Orbiting => {}
        }

        self.state.yaw -= dx * self.orbit_sensitivity;
        self.state.pitch =
            (self.state.pitch + dy * self.orbit_sensitivity).clamp(-PITCH_LIMIT, PITCH_LIMIT);

        true
    }

    /// Applies a pan drag of `(dx, dy)` pixels and returns `true` if it was applied.
    ///
    /// A pan drag while idle starts panning; one received while orbiting is ignored, as is any
    /// non-finite drag.
    pub fn pan(&mut self, dx: f64, dy: f64) -> bool {
        if !(dx.is_finite() && dy.is_finite()) {
            return false;
        }

        match self.mode {
            CameraMode::Orbiting => return false,
            CameraMode::Idle => self.mode = CameraMode::Panning,
            CameraMode::Panning => {}
        }

        self.state.pan -= DVec2::new(dx, dy) * self.pan_sensitivity;

        true
    }

    /// Changes the orbit distance by `delta`, clamped to the zoom range, in any mode. A
    /// non-finite `delta` is ignored.
    #[inline]
    pub fn zoom(&mut self, delta: f64) {
        if !delta.is_finite() {
            return;
        }

        self.state.distance = (self.state.distance + delta).clamp(self.min_distance, self.max_distance);
    }

    /// Recomputes the eye position and the view basis from the current state.
    ///
    /// Returns `false` if the forward vector was degenerate, in which case the previous basis is
    /// kept.
    pub fn update(&mut self) -> bool {
        let CameraState {
            yaw,
            pitch,
            distance,
            ..
        } = self.state;

        let target = self.target();
        self.position = target
            + distance * DVec3::new(pitch.cos() * yaw.sin(), pitch.sin(), pitch.cos() * yaw.cos());

        match Basis::from_forward(target - self.position) {
            Some(basis) => {
                self.basis = basis;
                true
            }
            None => {
                log::warn!(
                    "degenerate camera forward vector at distance {distance}, keeping previous basis"
                );
                false
            }
        }
    }

    /// Returns the view used to project onto and raycast from the given viewport.
    #[inline]
    pub fn view(&self, viewport: Viewport) -> View {
        View {
            eye: self.position,
            basis: self.basis,
            fov: self.state.fov,
            center: viewport.center(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn camera() -> CameraModel {
        CameraModel::new(&CameraConfig::default())
    }

    fn assert_orthonormal(basis: Basis) {
        let Basis { forward, right, up } = basis;

        for v in [forward, right, up] {
            assert!((v.length() - 1.0).abs() < 1e-9);
        }

        assert!(forward.dot(right).abs() < 1e-9);
        assert!(forward.dot(up).abs() < 1e-9);
        assert!(right.dot(up).abs() < 1e-9);
    }

    #[test]
    fn default_view_looks_down_negative_z() {
        let camera = camera();

        assert!(camera.basis().forward.abs_diff_eq(DVec3::NEG_Z, 1e-12));
        assert!(camera.basis().right.abs_diff_eq(DVec3::X, 1e-12));
        assert!(camera.basis().up.abs_diff_eq(DVec3::NEG_Y, 1e-12));
        assert!(camera
            .position()
            .abs_diff_eq(DVec3::new(0.0, 0.0, 2500.0), 1e-9));
    }

    #[test]
    fn random_orbits_keep_pitch_and_basis_valid() {
        let mut rng = StdRng::seed_from_u64(0);
        let mut camera = camera();

        for _ in 0..1000 {
            camera.orbit(rng.gen_range(-500.0..500.0), rng.gen_range(-500.0..500.0));
            camera.zoom(rng.gen_range(-800.0..800.0));
            assert!(camera.update());

            let state = camera.state();
            assert!((-PITCH_LIMIT..=PITCH_LIMIT).contains(&state.pitch));
            assert!((200.0..=6000.0).contains(&state.distance));
            assert_orthonormal(camera.basis());
        }
    }

    #[test]
    fn drag_modes_are_exclusive() {
        let mut camera = camera();

        assert!(camera.pan(10.0, 0.0));
        assert_eq!(camera.mode(), CameraMode::Panning);
        assert!(!camera.orbit(10.0, 10.0));
        assert_eq!(camera.state().yaw, 0.0);

        camera.end_drag();
        camera.begin_orbit();
        assert!(!camera.pan(10.0, 0.0));
        assert_eq!(camera.state().pan, DVec2::new(-20.0, 0.0));

        // Zoom applies whatever the mode.
        camera.zoom(-100.0);
        assert_eq!(camera.state().distance, 1400.0);
    }

    #[test]
    fn pan_moves_target() {
        let mut camera = camera();
        camera.set_anchor(DVec3::new(400.0, 300.0, 1000.0));

        camera.pan(5.0, -5.0);
        camera.update();

        assert_eq!(camera.target(), DVec3::new(390.0, 310.0, 1000.0));
        assert!(camera.basis().forward.abs_diff_eq(DVec3::NEG_Z, 1e-12));
    }

    #[test]
    fn degenerate_forward_keeps_previous_basis() {
        let mut camera = CameraModel::new(&CameraConfig {
            min_distance: 0.0,
            ..CameraConfig::default()
        });

        camera.orbit(-100.0, 40.0);
        assert!(camera.update());
        let previous = camera.basis();

        camera.zoom(-1e9);
        assert_eq!(camera.state().distance, 0.0);
        assert!(!camera.update());

        assert_eq!(camera.basis(), previous);
        assert_eq!(camera.position(), camera.target());
    }

    #[test]
    fn non_finite_motion_is_ignored() {
        let mut camera = camera();
        let state = *camera.state();

        assert!(!camera.orbit(f64::NAN, 10.0));
        assert!(!camera.orbit(0.0, f64::INFINITY));
        assert!(!camera.pan(f64::NEG_INFINITY, 0.0));
        camera.zoom(f64::NAN);
        assert_eq!(camera.mode(), CameraMode::Idle);
        assert_eq!(*camera.state(), state);

        assert!(camera.orbit(10.0, 20.0));
        camera.zoom(100.0);
        assert!(camera.update());
        assert!(camera.state().pitch.is_finite());
        assert_orthonormal(camera.basis());
    }
}
