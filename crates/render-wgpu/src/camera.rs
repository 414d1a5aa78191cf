use glam::{Mat4, Vec3};
use shadowbox_render::RenderView;

/// Orbit camera: the eye rides a sphere around a target point.
///
/// Yaw and pitch are radians; pitch is elevation above the target's horizon
/// and stays clamped away from the poles so the view never flips.
pub struct OrbitCamera {
    pub target: Vec3,
    pub distance: f32,
    pub yaw: f32,
    pub pitch: f32,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub sensitivity: f32,
    pub zoom_speed: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            distance: 20.0,
            yaw: 45.0_f32.to_radians(),
            pitch: 30.0_f32.to_radians(),
            fov: 45.0_f32.to_radians(),
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
            min_distance: 1.0,
            max_distance: 200.0,
            sensitivity: 0.005,
            zoom_speed: 1.5,
        }
    }
}

impl OrbitCamera {
    const PITCH_LIMIT_DEGREES: f32 = 89.0;

    /// Start the orbit at the placement a [`RenderView`] describes.
    pub fn from_view(view: &RenderView) -> Self {
        let offset = view.eye - view.target;
        let distance = offset.length().max(1e-3);
        Self {
            target: view.target,
            distance,
            yaw: offset.z.atan2(offset.x),
            pitch: (offset.y / distance).clamp(-1.0, 1.0).asin(),
            fov: view.fov_degrees.to_radians(),
            ..Self::default()
        }
    }

    /// Eye position in world space.
    pub fn eye(&self) -> Vec3 {
        let planar = self.pitch.cos() * self.distance;
        self.target
            + Vec3::new(
                planar * self.yaw.cos(),
                self.pitch.sin() * self.distance,
                planar * self.yaw.sin(),
            )
    }

    /// Orbit by a mouse-drag delta in pixels.
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * self.sensitivity;
        self.pitch = (self.pitch + dy * self.sensitivity).clamp(
            -Self::PITCH_LIMIT_DEGREES.to_radians(),
            Self::PITCH_LIMIT_DEGREES.to_radians(),
        );
    }

    /// Dolly toward (positive delta) or away from the target.
    pub fn zoom(&mut self, delta: f32) {
        self.distance =
            (self.distance - delta * self.zoom_speed).clamp(self.min_distance, self.max_distance);
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eye_sits_at_distance_from_target() {
        let cam = OrbitCamera::default();
        let offset = cam.eye() - cam.target;
        assert!((offset.length() - cam.distance).abs() < 1e-4);
    }

    #[test]
    fn rotate_moves_the_eye() {
        let mut cam = OrbitCamera::default();
        let before = cam.eye();
        cam.rotate(40.0, 10.0);
        assert_ne!(cam.eye(), before);
        // Distance is preserved while orbiting.
        assert!(((cam.eye() - cam.target).length() - cam.distance).abs() < 1e-4);
    }

    #[test]
    fn pitch_clamps_at_the_poles() {
        let mut cam = OrbitCamera::default();
        cam.rotate(0.0, 1e6);
        assert!(cam.pitch <= 89.0_f32.to_radians() + 1e-6);
        cam.rotate(0.0, -2e6);
        assert!(cam.pitch >= -(89.0_f32.to_radians() + 1e-6));
    }

    #[test]
    fn zoom_clamps_to_range() {
        let mut cam = OrbitCamera::default();
        cam.zoom(1e6);
        assert_eq!(cam.distance, cam.min_distance);
        cam.zoom(-1e6);
        assert_eq!(cam.distance, cam.max_distance);
    }

    #[test]
    fn from_view_reproduces_the_eye() {
        let view = RenderView {
            eye: Vec3::new(10.0, 9.0, 16.0),
            target: Vec3::ZERO,
            fov_degrees: 45.0,
        };
        let cam = OrbitCamera::from_view(&view);
        let eye = cam.eye();
        assert!((eye - view.eye).length() < 1e-3);
    }

    #[test]
    fn view_projection_is_finite() {
        let cam = OrbitCamera::default();
        let vp = cam.view_projection();
        assert!(vp.to_cols_array().iter().all(|v| v.is_finite()));
    }
}
