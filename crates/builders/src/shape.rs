use shadowbox_scene::{Geometry, Material, MaterialConfig, Mesh};

/// A required builder step was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("the geometry has not been created")]
    MissingGeometry,
    #[error("the material has not been set")]
    MissingMaterial,
    #[error("the mesh has not been created")]
    MeshNotCreated,
}

/// Operations shared by every shape builder.
///
/// Concrete builders add their own `create_geometry` with the arity their
/// shape needs, plus shadow toggles where the shape participates in the
/// shadow pass.
pub trait ShapeBuilder {
    /// Stage the material the mesh will be drawn with.
    fn set_material(&mut self, config: MaterialConfig);

    /// Assemble the staged geometry and material into a mesh.
    fn create_mesh(&mut self) -> Result<(), BuildError>;

    /// Yield the finished mesh and reset all staged state.
    fn take_result(&mut self) -> Result<Mesh, BuildError>;

    /// Clear every staged field.
    fn reset(&mut self);
}

/// Staged state common to the shape builders.
#[derive(Debug, Default)]
struct StagedShape {
    geometry: Option<Geometry>,
    material: Option<Material>,
    mesh: Option<Mesh>,
}

impl StagedShape {
    fn create_mesh(&mut self) -> Result<(), BuildError> {
        let geometry = self.geometry.ok_or(BuildError::MissingGeometry)?;
        let material = self.material.ok_or(BuildError::MissingMaterial)?;
        self.mesh = Some(Mesh::new(geometry, material));
        Ok(())
    }

    fn mesh_mut(&mut self) -> Result<&mut Mesh, BuildError> {
        self.mesh.as_mut().ok_or(BuildError::MeshNotCreated)
    }

    fn take_result(&mut self) -> Result<Mesh, BuildError> {
        let mesh = self.mesh.ok_or(BuildError::MeshNotCreated)?;
        self.reset();
        Ok(mesh)
    }

    fn reset(&mut self) {
        self.geometry = None;
        self.material = None;
        self.mesh = None;
    }
}

/// Builds box meshes with lit materials. Boxes can cast shadows.
#[derive(Debug, Default)]
pub struct BoxBuilder {
    staged: StagedShape,
}

impl BoxBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage a box geometry with the given dimensions.
    pub fn create_geometry(&mut self, width: f32, height: f32, depth: f32) {
        self.staged.geometry = Some(Geometry::Box {
            width,
            height,
            depth,
        });
    }

    /// Opt the mesh into the shadow pass as a caster.
    pub fn allow_cast_shadow(&mut self) -> Result<(), BuildError> {
        self.staged.mesh_mut()?.cast_shadow = true;
        Ok(())
    }
}

impl ShapeBuilder for BoxBuilder {
    fn set_material(&mut self, config: MaterialConfig) {
        self.staged.material = Some(Material::lit(config));
    }

    fn create_mesh(&mut self) -> Result<(), BuildError> {
        self.staged.create_mesh()
    }

    fn take_result(&mut self) -> Result<Mesh, BuildError> {
        tracing::debug!("box builder yielding mesh");
        self.staged.take_result()
    }

    fn reset(&mut self) {
        self.staged.reset();
    }
}

/// Builds plane meshes with lit materials. Planes can receive shadows.
#[derive(Debug, Default)]
pub struct PlaneBuilder {
    staged: StagedShape,
}

impl PlaneBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage a plane geometry with the given extent.
    pub fn create_geometry(&mut self, width: f32, height: f32) {
        self.staged.geometry = Some(Geometry::Plane { width, height });
    }

    /// Opt the mesh into the shadow pass as a receiver.
    pub fn allow_receive_shadow(&mut self) -> Result<(), BuildError> {
        self.staged.mesh_mut()?.receive_shadow = true;
        Ok(())
    }
}

impl ShapeBuilder for PlaneBuilder {
    fn set_material(&mut self, config: MaterialConfig) {
        self.staged.material = Some(Material::lit(config));
    }

    fn create_mesh(&mut self) -> Result<(), BuildError> {
        self.staged.create_mesh()
    }

    fn take_result(&mut self) -> Result<Mesh, BuildError> {
        tracing::debug!("plane builder yielding mesh");
        self.staged.take_result()
    }

    fn reset(&mut self) {
        self.staged.reset();
    }
}

/// Builds the small unlit sphere that marks a light's position.
///
/// The geometry is fixed (radius 0.05, 24×24 segments) and the material is
/// unlit so the bulb stays bright regardless of the lighting rig. The bulb
/// neither casts nor receives shadows.
#[derive(Debug, Default)]
pub struct LightBulbSphereBuilder {
    staged: StagedShape,
}

impl LightBulbSphereBuilder {
    pub const RADIUS: f32 = 0.05;
    pub const SEGMENTS: u32 = 24;

    pub fn new() -> Self {
        Self::default()
    }

    /// Stage the fixed bulb geometry.
    pub fn create_geometry(&mut self) {
        self.staged.geometry = Some(Geometry::Sphere {
            radius: Self::RADIUS,
            width_segments: Self::SEGMENTS,
            height_segments: Self::SEGMENTS,
        });
    }
}

impl ShapeBuilder for LightBulbSphereBuilder {
    fn set_material(&mut self, config: MaterialConfig) {
        self.staged.material = Some(Material::unlit(config));
    }

    fn create_mesh(&mut self) -> Result<(), BuildError> {
        self.staged.create_mesh()
    }

    fn take_result(&mut self) -> Result<Mesh, BuildError> {
        tracing::debug!("bulb builder yielding mesh");
        self.staged.take_result()
    }

    fn reset(&mut self) {
        self.staged.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shadowbox_common::Color;
    use shadowbox_scene::{Shading, Side};

    fn gray() -> MaterialConfig {
        MaterialConfig {
            color: Color::from_rgb8(120, 120, 120),
            ..MaterialConfig::default()
        }
    }

    #[test]
    fn box_builds_and_resets() {
        let mut builder = BoxBuilder::new();
        builder.create_geometry(1.0, 1.0, 1.0);
        builder.set_material(gray());
        builder.create_mesh().unwrap();
        builder.allow_cast_shadow().unwrap();

        let mesh = builder.take_result().unwrap();
        assert!(mesh.cast_shadow);
        assert!(!mesh.receive_shadow);
        assert_eq!(mesh.material.shading, Shading::Lit);
        assert!(matches!(mesh.geometry, Geometry::Box { .. }));

        // Yielding cleared the staged state.
        assert_eq!(builder.take_result(), Err(BuildError::MeshNotCreated));
    }

    #[test]
    fn box_mesh_requires_geometry() {
        let mut builder = BoxBuilder::new();
        builder.set_material(gray());
        assert_eq!(builder.create_mesh(), Err(BuildError::MissingGeometry));
    }

    #[test]
    fn box_mesh_requires_material() {
        let mut builder = BoxBuilder::new();
        builder.create_geometry(1.0, 1.0, 1.0);
        assert_eq!(builder.create_mesh(), Err(BuildError::MissingMaterial));
    }

    #[test]
    fn shadow_toggle_requires_mesh() {
        let mut builder = BoxBuilder::new();
        builder.create_geometry(1.0, 1.0, 1.0);
        builder.set_material(gray());
        assert_eq!(builder.allow_cast_shadow(), Err(BuildError::MeshNotCreated));
    }

    #[test]
    fn take_result_without_mesh_fails() {
        let mut builder = BoxBuilder::new();
        assert_eq!(builder.take_result(), Err(BuildError::MeshNotCreated));
    }

    #[test]
    fn builder_is_reusable_after_yield() {
        let mut builder = BoxBuilder::new();
        for _ in 0..3 {
            builder.create_geometry(2.0, 1.0, 0.5);
            builder.set_material(gray());
            builder.create_mesh().unwrap();
            assert!(builder.take_result().is_ok());
        }
    }

    #[test]
    fn staging_order_does_not_matter() {
        let mut builder = BoxBuilder::new();
        builder.set_material(gray());
        builder.create_geometry(1.0, 1.0, 1.0);
        assert!(builder.create_mesh().is_ok());
    }

    #[test]
    fn explicit_reset_discards_staged_fields() {
        let mut builder = BoxBuilder::new();
        builder.create_geometry(1.0, 1.0, 1.0);
        builder.set_material(gray());
        builder.reset();
        assert_eq!(builder.create_mesh(), Err(BuildError::MissingGeometry));
    }

    #[test]
    fn plane_receives_shadow_after_mesh() {
        let mut builder = PlaneBuilder::new();
        builder.create_geometry(20.0, 20.0);
        builder.set_material(MaterialConfig {
            side: Side::Double,
            ..gray()
        });
        assert_eq!(
            builder.allow_receive_shadow(),
            Err(BuildError::MeshNotCreated)
        );
        builder.create_mesh().unwrap();
        builder.allow_receive_shadow().unwrap();

        let mesh = builder.take_result().unwrap();
        assert!(mesh.receive_shadow);
        assert!(!mesh.cast_shadow);
        assert_eq!(mesh.material.side, Side::Double);
    }

    #[test]
    fn bulb_is_small_unlit_and_shadowless() {
        let mut builder = LightBulbSphereBuilder::new();
        builder.create_geometry();
        builder.set_material(MaterialConfig::default());
        builder.create_mesh().unwrap();

        let mesh = builder.take_result().unwrap();
        assert_eq!(mesh.material.shading, Shading::Unlit);
        assert!(!mesh.cast_shadow);
        assert!(!mesh.receive_shadow);
        match mesh.geometry {
            Geometry::Sphere { radius, .. } => assert_eq!(radius, 0.05),
            other => panic!("expected sphere, got {other:?}"),
        }
    }
}
