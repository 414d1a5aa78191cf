use crate::mesh::Mesh;
use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};
use shadowbox_common::Color;

/// Orthographic frustum bounds for a directional light's shadow camera.
///
/// Default is the ±5 frustum the demo relied on before anyone tuned it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShadowCameraBounds {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
}

impl ShadowCameraBounds {
    /// Symmetric bounds: ±extent on both axes.
    pub fn symmetric(extent: f32) -> Self {
        Self {
            left: -extent,
            right: extent,
            bottom: -extent,
            top: extent,
        }
    }
}

impl Default for ShadowCameraBounds {
    fn default() -> Self {
        Self::symmetric(5.0)
    }
}

/// Shadow-map configuration for a directional light.
///
/// Defaults: ±5 bounds, 512×512 map, near 0.5, far 500.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShadowSettings {
    pub bounds: ShadowCameraBounds,
    pub map_width: u32,
    pub map_height: u32,
    pub near: f32,
    pub far: f32,
}

impl Default for ShadowSettings {
    fn default() -> Self {
        Self {
            bounds: ShadowCameraBounds::default(),
            map_width: 512,
            map_height: 512,
            near: 0.5,
            far: 500.0,
        }
    }
}

/// Uniform light with no direction or position. Default white at intensity 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmbientLight {
    pub color: Color,
    pub intensity: f32,
}

impl Default for AmbientLight {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            intensity: 1.0,
        }
    }
}

/// Sun-style light: parallel rays from the node's position toward the origin.
///
/// Default white at intensity 1, shadows off, default shadow settings,
/// no marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectionalLight {
    pub color: Color,
    pub intensity: f32,
    pub cast_shadow: bool,
    pub shadow: ShadowSettings,
    /// Visual marker mesh attached as a child of the light's node.
    pub marker: Option<Mesh>,
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            intensity: 1.0,
            cast_shadow: false,
            shadow: ShadowSettings::default(),
            marker: None,
        }
    }
}

impl DirectionalLight {
    /// View matrix for shadow rendering: the light looks from `position`
    /// toward `target`. Falls back to a Z-up basis when the light is
    /// near-vertical.
    pub fn view_matrix(&self, position: Vec3, target: Vec3) -> Mat4 {
        let dir = (target - position).normalize_or_zero();
        let up = if dir.y.abs() > 0.99 { Vec3::Z } else { Vec3::Y };
        Mat4::look_at_rh(position, target, up)
    }

    /// Orthographic projection over the configured shadow-camera bounds.
    pub fn projection_matrix(&self) -> Mat4 {
        let b = self.shadow.bounds;
        Mat4::orthographic_rh(b.left, b.right, b.bottom, b.top, self.shadow.near, self.shadow.far)
    }
}

/// Node payload for light sources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Light {
    Ambient(AmbientLight),
    Directional(DirectionalLight),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directional_defaults_are_white_unit() {
        let light = DirectionalLight::default();
        assert_eq!(light.color.to_hex(), "ffffff");
        assert_eq!(light.intensity, 1.0);
        assert!(!light.cast_shadow);
        assert!(light.marker.is_none());
    }

    #[test]
    fn symmetric_bounds() {
        let b = ShadowCameraBounds::symmetric(3.0);
        assert_eq!(b.left, -3.0);
        assert_eq!(b.bottom, -3.0);
        assert_eq!(b.right, 3.0);
        assert_eq!(b.top, 3.0);
    }

    #[test]
    fn vertical_light_view_is_finite() {
        let light = DirectionalLight::default();
        let view = light.view_matrix(Vec3::new(0.0, 10.0, 0.0), Vec3::ZERO);
        assert!(view.to_cols_array().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn projection_reflects_bounds() {
        let light = DirectionalLight {
            shadow: ShadowSettings {
                bounds: ShadowCameraBounds::symmetric(10.0),
                ..ShadowSettings::default()
            },
            ..DirectionalLight::default()
        };
        let proj = light.projection_matrix();
        // Points on the frustum edge land on the NDC edge.
        let edge = proj.project_point3(Vec3::new(10.0, 10.0, -1.0));
        assert!((edge.x - 1.0).abs() < 1e-5);
        assert!((edge.y - 1.0).abs() < 1e-5);
    }
}
