use glam::Vec3;
use serde::{Deserialize, Serialize};
use shadowbox_builders::BuildError;
use shadowbox_common::Color;
use shadowbox_scene::SceneError;

/// Errors from assembling a stage.
#[derive(Debug, thiserror::Error)]
pub enum StageError {
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Build(#[from] BuildError),
    #[error(transparent)]
    Scene(#[from] SceneError),
}

/// Everything tunable about the demo stage, with serde-friendly defaults.
///
/// Defaults describe the classic arrangement: a 10×10 grid of unit boxes
/// spaced 1.5 apart over a 20×20 plane, charcoal ambient fill, and a white
/// sun at intensity 2 parked high to the side with a ±12 shadow frustum on a
/// 1024×1024 map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageConfig {
    /// Boxes along the X axis.
    pub grid_width: u32,
    /// Boxes along the Z axis.
    pub grid_depth: u32,
    /// Edge length of each box.
    pub box_size: f32,
    /// Center-to-center distance between neighboring boxes.
    pub spacing: f32,
    pub box_color: Color,
    /// Edge length of the square ground plane.
    pub plane_size: f32,
    pub plane_color: Color,
    pub ambient_intensity: f32,
    pub sun_color: Color,
    pub sun_intensity: f32,
    /// World position of the sun node; rays aim at the origin.
    pub sun_position: Vec3,
    /// Symmetric shadow-camera extent (±extent on both axes).
    pub shadow_extent: f32,
    /// Shadow map resolution (square).
    pub shadow_map_size: u32,
    /// Floor added to the pulse so boxes never collapse to zero height.
    pub pulse_floor: f32,
    /// Initial camera position; the camera looks at the origin.
    pub camera_eye: Vec3,
    /// Vertical field of view in degrees.
    pub camera_fov_degrees: f32,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            grid_width: 10,
            grid_depth: 10,
            box_size: 1.0,
            spacing: 1.5,
            box_color: Color::from_rgb8(120, 120, 120),
            plane_size: 20.0,
            plane_color: Color::from_rgb8(120, 120, 120),
            ambient_intensity: 1.0,
            sun_color: Color::WHITE,
            sun_intensity: 2.0,
            sun_position: Vec3::new(6.0, 10.0, 4.0),
            shadow_extent: 12.0,
            shadow_map_size: 1024,
            pulse_floor: 0.001,
            camera_eye: Vec3::new(10.0, 9.0, 16.0),
            camera_fov_degrees: 45.0,
        }
    }
}

impl StageConfig {
    /// Reject configurations that cannot produce a drawable stage.
    pub fn validate(&self) -> Result<(), StageError> {
        if self.grid_width == 0 || self.grid_depth == 0 {
            return Err(StageError::InvalidConfig(
                "grid dimensions must be at least 1x1".into(),
            ));
        }
        if self.box_size <= 0.0 {
            return Err(StageError::InvalidConfig("box_size must be positive".into()));
        }
        if self.spacing < self.box_size {
            return Err(StageError::InvalidConfig(
                "spacing must be at least box_size".into(),
            ));
        }
        if self.plane_size <= 0.0 {
            return Err(StageError::InvalidConfig(
                "plane_size must be positive".into(),
            ));
        }
        if self.shadow_map_size == 0 {
            return Err(StageError::InvalidConfig(
                "shadow_map_size must be positive".into(),
            ));
        }
        if self.pulse_floor < 0.0 {
            return Err(StageError::InvalidConfig(
                "pulse_floor must be non-negative".into(),
            ));
        }
        Ok(())
    }
}
