use shadowbox_common::Color;
use shadowbox_scene::{AmbientLight, DirectionalLight, Mesh, ShadowCameraBounds};

/// Operations shared by every light builder.
///
/// Light fields all have documented defaults, so unlike the shape builders
/// nothing here can fail: `take_result` yields the light as currently staged
/// and resets the builder to those defaults.
pub trait LightBuilder {
    type Output;

    /// Stage the light intensity.
    fn set_intensity(&mut self, intensity: f32);

    /// Yield the staged light and reset to defaults.
    fn take_result(&mut self) -> Self::Output;

    /// Reinstate the documented defaults.
    fn reset(&mut self);
}

/// Builds ambient fill lights.
///
/// Resets to a charcoal `rgb(54, 69, 79)` fill at intensity 1.
#[derive(Debug)]
pub struct AmbientLightBuilder {
    light: AmbientLight,
}

impl AmbientLightBuilder {
    /// The charcoal default color.
    pub const DEFAULT_COLOR: Color = Color {
        r: 54.0 / 255.0,
        g: 69.0 / 255.0,
        b: 79.0 / 255.0,
    };

    pub fn new() -> Self {
        let mut builder = Self {
            light: AmbientLight::default(),
        };
        builder.reset();
        builder
    }

    /// Stage the light color.
    pub fn set_color(&mut self, color: Color) {
        self.light.color = color;
    }
}

impl Default for AmbientLightBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LightBuilder for AmbientLightBuilder {
    type Output = AmbientLight;

    fn set_intensity(&mut self, intensity: f32) {
        self.light.intensity = intensity;
    }

    fn take_result(&mut self) -> AmbientLight {
        tracing::debug!("ambient builder yielding light");
        let result = self.light;
        self.reset();
        result
    }

    fn reset(&mut self) {
        self.light = AmbientLight {
            color: Self::DEFAULT_COLOR,
            intensity: 1.0,
        };
    }
}

/// Builds directional sun-style lights with optional shadows and a bulb
/// marker.
///
/// Resets to white at intensity 1 with shadows off and default shadow
/// settings (±5 bounds, 512×512 map).
#[derive(Debug, Default)]
pub struct DirectionalLightBuilder {
    light: DirectionalLight,
}

impl DirectionalLightBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage the light color.
    pub fn set_color(&mut self, color: Color) {
        self.light.color = color;
    }

    /// Opt the light into shadow casting.
    pub fn allow_cast_shadow(&mut self) {
        self.light.cast_shadow = true;
    }

    /// Frame the shadow camera symmetrically: bounds become ±`extent` on
    /// both axes. Objects outside the frustum fall out of the depth map and
    /// stop occluding.
    pub fn set_light_view(&mut self, extent: f32) {
        self.light.shadow.bounds = ShadowCameraBounds::symmetric(extent);
    }

    /// Stage the shadow map resolution. Higher is sharper and slower.
    pub fn set_map_size(&mut self, width: u32, height: u32) {
        self.light.shadow.map_width = width;
        self.light.shadow.map_height = height;
    }

    /// Attach a marker mesh that scenes place as a child of the light.
    pub fn add_light_source(&mut self, marker: Mesh) {
        self.light.marker = Some(marker);
    }
}

impl LightBuilder for DirectionalLightBuilder {
    type Output = DirectionalLight;

    fn set_intensity(&mut self, intensity: f32) {
        self.light.intensity = intensity;
    }

    fn take_result(&mut self) -> DirectionalLight {
        tracing::debug!("directional builder yielding light");
        // mem::take leaves the default state behind, which is the reset state.
        std::mem::take(&mut self.light)
    }

    fn reset(&mut self) {
        self.light = DirectionalLight::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::{LightBulbSphereBuilder, ShapeBuilder};
    use shadowbox_scene::MaterialConfig;

    fn bulb() -> Mesh {
        let mut builder = LightBulbSphereBuilder::new();
        builder.create_geometry();
        builder.set_material(MaterialConfig::default());
        builder.create_mesh().expect("bulb mesh");
        builder.take_result().expect("bulb result")
    }

    #[test]
    fn directional_defaults_without_any_calls() {
        let mut builder = DirectionalLightBuilder::new();
        let light = builder.take_result();
        assert_eq!(light.intensity, 1.0);
        assert_eq!(light.color.to_hex(), "ffffff");
        assert!(!light.cast_shadow);
    }

    #[test]
    fn set_light_view_frames_symmetric_bounds() {
        let mut builder = DirectionalLightBuilder::new();
        builder.set_light_view(3.0);
        let bounds = builder.take_result().shadow.bounds;
        assert_eq!(bounds.left, -3.0);
        assert_eq!(bounds.bottom, -3.0);
        assert_eq!(bounds.right, 3.0);
        assert_eq!(bounds.top, 3.0);
    }

    #[test]
    fn take_result_resets_to_defaults() {
        let mut builder = DirectionalLightBuilder::new();
        builder.set_intensity(4.0);
        builder.set_color(Color::from_rgb8(255, 0, 0));
        builder.allow_cast_shadow();
        builder.set_map_size(2048, 2048);

        let staged = builder.take_result();
        assert_eq!(staged.intensity, 4.0);
        assert!(staged.cast_shadow);
        assert_eq!(staged.shadow.map_width, 2048);

        // A second take yields the just-reset defaults.
        let fresh = builder.take_result();
        assert_eq!(fresh.intensity, 1.0);
        assert_eq!(fresh.color.to_hex(), "ffffff");
        assert!(!fresh.cast_shadow);
        assert_eq!(fresh.shadow.map_width, 512);
    }

    #[test]
    fn marker_travels_with_the_light_once() {
        let mut builder = DirectionalLightBuilder::new();
        builder.add_light_source(bulb());
        let light = builder.take_result();
        assert!(light.marker.is_some());
        assert!(builder.take_result().marker.is_none());
    }

    #[test]
    fn ambient_resets_to_charcoal() {
        let mut builder = AmbientLightBuilder::new();
        builder.set_intensity(0.2);
        builder.set_color(Color::WHITE);
        let staged = builder.take_result();
        assert_eq!(staged.intensity, 0.2);
        assert_eq!(staged.color.to_hex(), "ffffff");

        let fresh = builder.take_result();
        assert_eq!(fresh.intensity, 1.0);
        assert_eq!(fresh.color.to_hex(), "36454f");
    }
}
