//! First-person camera with mouse-look and damped velocity movement.

use glam::{Mat4, Vec3, Vec4};

/// Velocity retained per tick. Applied unconditionally, so motion always
/// decays toward a stop once keys are released.
const DAMPING: f32 = 0.93;
/// Hard pitch limit in degrees; prevents gimbal flip at the poles.
const PITCH_LIMIT: f32 = 89.0;

/// Per-direction movement intent for the current tick. One boolean per
/// direction so held keys compose (forward + left = diagonal).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Moving {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

/// FPS camera: position + yaw/pitch orientation, velocity integration with
/// geometric damping, and cached view/projection matrices including the
/// skybox view-projection inverse.
#[derive(Debug, Clone)]
pub struct CameraController {
    pub position: Vec3,
    /// Yaw in degrees. -90 looks down -Z.
    pub yaw: f32,
    /// Pitch in degrees, clamped to [-89, 89].
    pub pitch: f32,
    pub moving: Moving,
    /// Movement speed in world units per second of held input.
    pub speed: f32,
    /// Mouse sensitivity (degrees per pointer-delta unit).
    pub sensitivity: f32,

    front: Vec3,
    right: Vec3,
    up: Vec3,
    velocity: Vec3,

    fov: f32,
    near: f32,
    far: f32,
    aspect: f32,

    projection: Mat4,
    view: Mat4,
    mvp: Mat4,
    skybox_vp_inverse: Mat4,
}

impl Default for CameraController {
    fn default() -> Self {
        let mut camera = Self {
            position: Vec3::new(50.0, 5.0, 100.0),
            yaw: -90.0,
            pitch: 0.0,
            moving: Moving::default(),
            speed: 10.0,
            sensitivity: 0.1,
            front: Vec3::NEG_Z,
            right: Vec3::X,
            up: Vec3::Y,
            velocity: Vec3::ZERO,
            fov: std::f32::consts::FRAC_PI_4,
            near: 1.0,
            far: 1000.0,
            aspect: 1.0,
            projection: Mat4::IDENTITY,
            view: Mat4::IDENTITY,
            mvp: Mat4::IDENTITY,
            skybox_vp_inverse: Mat4::IDENTITY,
        };
        camera.projection = camera.build_projection();
        camera.refresh();
        camera
    }
}

impl CameraController {
    /// Create a camera for the given surface aspect ratio.
    pub fn new(width: u32, height: u32) -> Self {
        let mut camera = Self::default();
        camera.set_aspect(width, height);
        camera
    }

    /// Update aspect ratio (call on window resize).
    pub fn set_aspect(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
        self.projection = self.build_projection();
        self.refresh();
    }

    fn build_projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    /// Process a relative mouse-look delta. Yaw and pitch accumulate across
    /// events; pitch is hard-clamped so the view matrix never degenerates.
    pub fn process_mouse(&mut self, delta_x: f32, delta_y: f32) {
        self.yaw += delta_x * self.sensitivity;
        self.pitch -= delta_y * self.sensitivity;
        self.pitch = self.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Advance the camera one tick with elapsed seconds `delta`.
    ///
    /// Held movement flags accumulate into velocity (along the previous
    /// tick's basis), the orientation basis is rebuilt from yaw/pitch,
    /// position integrates the velocity, and damping is applied
    /// unconditionally so releasing all keys glides to a stop.
    pub fn update(&mut self, delta: f32) {
        let step = self.speed * delta;
        let strafe = self.front.cross(self.up).normalize_or_zero();
        if self.moving.forward {
            self.velocity += self.front * step;
        }
        if self.moving.backward {
            self.velocity -= self.front * step;
        }
        if self.moving.right {
            self.velocity += strafe * step;
        }
        if self.moving.left {
            self.velocity -= strafe * step;
        }

        self.position += self.velocity;
        self.velocity *= DAMPING;

        self.refresh();
    }

    /// Rebuild the orientation basis and all derived matrices from the
    /// current position/yaw/pitch.
    fn refresh(&mut self) {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        self.front = Vec3::new(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        )
        .normalize();
        self.right = self.front.cross(self.up).normalize_or_zero();

        let target = self.position + self.front;
        self.view = Mat4::look_at_rh(self.position, target, self.up);
        self.mvp = self.projection * self.view;

        // Skybox: strip the camera translation so the box recenters on the
        // viewer, then invert so the shader can turn clip positions back
        // into view-ray directions.
        let mut rotation_only = self.view;
        rotation_only.w_axis = Vec4::W;
        self.skybox_vp_inverse = (self.projection * rotation_only).inverse();
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.view
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    /// Combined model-view-projection (model is identity: terrain lives in
    /// world space).
    pub fn model_view_projection(&self) -> Mat4 {
        self.mvp
    }

    /// Inverse of projection x translation-stripped view, fed to the skybox
    /// pipeline every frame.
    pub fn skybox_view_projection_inverse(&self) -> Mat4 {
        self.skybox_vp_inverse
    }

    pub fn front(&self) -> Vec3 {
        self.front
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Pitch stays inside [-89, 89] after any mouse delta, including an
    /// extreme single event.
    #[test]
    fn pitch_hard_clamp() {
        let mut camera = CameraController::default();
        camera.process_mouse(0.0, 100_000.0);
        assert_eq!(camera.pitch, -PITCH_LIMIT);
        camera.process_mouse(0.0, -1.0e9);
        assert_eq!(camera.pitch, PITCH_LIMIT);
        for dy in [-5000.0, 3.0, 12_000.0, -0.4] {
            camera.process_mouse(0.0, dy);
            assert!(camera.pitch.abs() <= PITCH_LIMIT);
        }
    }

    /// With no input held, speed strictly decreases tick over tick and the
    /// direction never reverses.
    #[test]
    fn velocity_monotonic_decay() {
        let mut camera = CameraController::default();
        camera.moving.forward = true;
        for _ in 0..5 {
            camera.update(1.0 / 60.0);
        }
        camera.moving.forward = false;

        let initial = camera.velocity();
        let mut previous = initial.length();
        assert!(previous > 0.0);
        for _ in 0..50 {
            camera.update(1.0 / 60.0);
            let speed = camera.velocity().length();
            assert!(speed < previous, "speed must strictly decay");
            assert!(
                camera.velocity().dot(initial) > 0.0,
                "decay must not reverse direction"
            );
            previous = speed;
        }
    }

    /// A zero-delta update with zero velocity changes nothing.
    #[test]
    fn zero_delta_idempotent() {
        let reference = CameraController::default();
        let mut camera = reference.clone();
        camera.update(0.0);
        assert_eq!(camera.position, reference.position);
        assert_eq!(camera.model_view_projection(), reference.model_view_projection());
        assert_eq!(camera.view_matrix(), reference.view_matrix());
        assert_eq!(
            camera.skybox_view_projection_inverse(),
            reference.skybox_view_projection_inverse()
        );
    }

    /// Held diagonal flags produce movement along both axes.
    #[test]
    fn diagonal_movement_composes() {
        let mut camera = CameraController::default();
        camera.moving.forward = true;
        camera.moving.left = true;
        camera.update(1.0 / 60.0);
        let v = camera.velocity();
        // Default yaw -90: forward is -Z, left strafe is -X.
        assert!(v.z < 0.0);
        assert!(v.x < 0.0);
    }

    /// The skybox matrix ignores camera position entirely.
    #[test]
    fn skybox_matrix_position_independent() {
        let mut a = CameraController::default();
        let mut b = CameraController::default();
        b.position = Vec3::new(-300.0, 42.0, 7.0);
        a.update(0.0);
        b.update(0.0);
        assert_eq!(
            a.skybox_view_projection_inverse(),
            b.skybox_view_projection_inverse()
        );
    }

    /// mvp is exactly projection * view.
    #[test]
    fn mvp_composition() {
        let mut camera = CameraController::default();
        camera.process_mouse(120.0, -35.0);
        camera.update(0.016);
        let expected = camera.projection_matrix() * camera.view_matrix();
        assert_eq!(camera.model_view_projection(), expected);
    }

    /// Front stays unit length across arbitrary look updates.
    #[test]
    fn front_renormalized() {
        let mut camera = CameraController::default();
        for (dx, dy) in [(35.0, 80.0), (-400.0, 12.5), (3.0, -90.0)] {
            camera.process_mouse(dx, dy);
            camera.update(0.016);
            assert!((camera.front().length() - 1.0).abs() < 1e-5);
        }
    }
}
