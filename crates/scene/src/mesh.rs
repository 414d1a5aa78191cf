use crate::geometry::Geometry;
use crate::material::Material;
use serde::{Deserialize, Serialize};

/// A drawable surface: geometry plus material plus shadow participation.
///
/// Meshes start outside the shadow pass on both sides; builders opt them in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    pub geometry: Geometry,
    pub material: Material,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

impl Mesh {
    pub fn new(geometry: Geometry, material: Material) -> Self {
        Self {
            geometry,
            material,
            cast_shadow: false,
            receive_shadow: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::MaterialConfig;

    #[test]
    fn new_mesh_opts_out_of_shadows() {
        let mesh = Mesh::new(
            Geometry::Box {
                width: 1.0,
                height: 1.0,
                depth: 1.0,
            },
            Material::lit(MaterialConfig::default()),
        );
        assert!(!mesh.cast_shadow);
        assert!(!mesh.receive_shadow);
    }
}
