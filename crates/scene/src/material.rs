use serde::{Deserialize, Serialize};
use shadowbox_common::Color;

/// Which face of a triangle is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Side {
    #[default]
    Front,
    Back,
    Double,
}

/// How a material reacts to lights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Shading {
    /// Ambient + diffuse + specular shading, shadow-aware.
    Lit,
    /// Flat color, ignores lights entirely (bulb markers, gizmos).
    Unlit,
}

/// Explicit material configuration with documented defaults.
///
/// Defaults: white color, front side, shininess 30.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialConfig {
    pub color: Color,
    pub side: Side,
    /// Specular exponent for lit materials; ignored by unlit ones.
    pub shininess: f32,
}

impl Default for MaterialConfig {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            side: Side::Front,
            shininess: 30.0,
        }
    }
}

/// A material ready to attach to a mesh.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub color: Color,
    pub side: Side,
    pub shininess: f32,
    pub shading: Shading,
}

impl Material {
    pub fn lit(config: MaterialConfig) -> Self {
        Self {
            color: config.color,
            side: config.side,
            shininess: config.shininess,
            shading: Shading::Lit,
        }
    }

    pub fn unlit(config: MaterialConfig) -> Self {
        Self {
            color: config.color,
            side: config.side,
            shininess: config.shininess,
            shading: Shading::Unlit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = MaterialConfig::default();
        assert_eq!(config.color, Color::WHITE);
        assert_eq!(config.side, Side::Front);
        assert_eq!(config.shininess, 30.0);
    }

    #[test]
    fn lit_and_unlit_preserve_config() {
        let config = MaterialConfig {
            color: Color::from_rgb8(120, 120, 120),
            side: Side::Double,
            ..MaterialConfig::default()
        };
        assert_eq!(Material::lit(config).shading, Shading::Lit);
        let unlit = Material::unlit(config);
        assert_eq!(unlit.shading, Shading::Unlit);
        assert_eq!(unlit.side, Side::Double);
    }
}
