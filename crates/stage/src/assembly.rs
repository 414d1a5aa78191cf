use crate::config::{StageConfig, StageError};
use glam::{Quat, Vec3};
use shadowbox_builders::{
    AmbientLightBuilder, BoxBuilder, DirectionalLightBuilder, LightBuilder,
    LightBulbSphereBuilder, PlaneBuilder, ShapeBuilder,
};
use shadowbox_common::{NodeId, Transform};
use shadowbox_render::RenderView;
use shadowbox_scene::{Light, MaterialConfig, Node, Scene, Side};
use std::f32::consts::FRAC_PI_2;

/// Name of the group holding the animated boxes.
pub const BOX_GROUP: &str = "boxes";

/// An assembled stage: the scene plus the handles consumers need.
#[derive(Debug)]
pub struct SceneHandle {
    pub scene: Scene,
    /// The group whose children the animation drives.
    pub box_group: NodeId,
    /// The directional light node (slider panels retune it).
    pub sun: NodeId,
    /// Initial camera placement.
    pub view: RenderView,
}

/// Assemble the demo stage from a config.
///
/// Pure function of the config: no globals, no I/O, safe to call from tests.
pub fn build_scene(config: &StageConfig) -> Result<SceneHandle, StageError> {
    config.validate()?;
    let mut scene = Scene::new();

    // Ground plane, authored in XY and rotated flat so its face points up.
    let mut planes = PlaneBuilder::new();
    planes.create_geometry(config.plane_size, config.plane_size);
    planes.set_material(MaterialConfig {
        color: config.plane_color,
        side: Side::Double,
        ..MaterialConfig::default()
    });
    planes.create_mesh()?;
    planes.allow_receive_shadow()?;
    scene.add(
        Node::mesh(planes.take_result()?)
            .with_name("ground")
            .with_transform(Transform {
                rotation: Quat::from_rotation_x(-FRAC_PI_2),
                ..Transform::default()
            }),
    );

    // Box grid, one builder reused across the whole run.
    let box_group = scene.add(Node::group().with_name(BOX_GROUP));
    let mut boxes = BoxBuilder::new();
    let origin_x = (config.grid_width - 1) as f32 * config.spacing / 2.0;
    let origin_z = (config.grid_depth - 1) as f32 * config.spacing / 2.0;
    for row in 0..config.grid_depth {
        for col in 0..config.grid_width {
            boxes.create_geometry(config.box_size, config.box_size, config.box_size);
            boxes.set_material(MaterialConfig {
                color: config.box_color,
                ..MaterialConfig::default()
            });
            boxes.create_mesh()?;
            boxes.allow_cast_shadow()?;
            let position = Vec3::new(
                col as f32 * config.spacing - origin_x,
                config.box_size / 2.0,
                row as f32 * config.spacing - origin_z,
            );
            scene.add_child(
                box_group,
                Node::mesh(boxes.take_result()?).with_transform(Transform::from_position(position)),
            )?;
        }
    }

    // Ambient fill at its charcoal default color.
    let mut ambient = AmbientLightBuilder::new();
    ambient.set_intensity(config.ambient_intensity);
    scene.add(Node::light(Light::Ambient(ambient.take_result())).with_name("fill"));

    // Bulb marker for the sun.
    let mut bulbs = LightBulbSphereBuilder::new();
    bulbs.create_geometry();
    bulbs.set_material(MaterialConfig {
        color: config.sun_color,
        ..MaterialConfig::default()
    });
    bulbs.create_mesh()?;
    let marker = bulbs.take_result()?;

    // Shadow-casting sun aimed at the origin.
    let mut suns = DirectionalLightBuilder::new();
    suns.set_color(config.sun_color);
    suns.set_intensity(config.sun_intensity);
    suns.allow_cast_shadow();
    suns.set_light_view(config.shadow_extent);
    suns.set_map_size(config.shadow_map_size, config.shadow_map_size);
    suns.add_light_source(marker);
    let mut light = suns.take_result();

    // The marker rides the light node as a child so it tracks the light.
    let marker = light.marker.take();
    let sun = scene.add(
        Node::light(Light::Directional(light))
            .with_name("sun")
            .with_transform(Transform::from_position(config.sun_position)),
    );
    if let Some(marker) = marker {
        scene.add_child(sun, Node::mesh(marker).with_name("bulb"))?;
    }

    tracing::info!(
        nodes = scene.node_count(),
        boxes = scene.children(box_group).len(),
        "stage assembled"
    );

    Ok(SceneHandle {
        scene,
        box_group,
        sun,
        view: RenderView {
            eye: config.camera_eye,
            target: Vec3::ZERO,
            fov_degrees: config.camera_fov_degrees,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use shadowbox_scene::NodeKind;

    #[test]
    fn default_stage_has_expected_shape() {
        let handle = build_scene(&StageConfig::default()).unwrap();
        let scene = &handle.scene;

        // 100 boxes + group + ground + 2 lights + bulb marker.
        assert_eq!(scene.children(handle.box_group).len(), 100);
        assert_eq!(scene.node_count(), 105);
        assert_eq!(scene.object_by_name(BOX_GROUP), Some(handle.box_group));
        assert!(scene.object_by_name("ground").is_some());
        assert!(scene.object_by_name("sun").is_some());
    }

    #[test]
    fn boxes_cast_and_ground_receives() {
        let handle = build_scene(&StageConfig::default()).unwrap();
        let scene = &handle.scene;

        let ground = scene.object_by_name("ground").unwrap();
        match &scene.get(ground).unwrap().kind {
            NodeKind::Mesh(mesh) => {
                assert!(mesh.receive_shadow);
                assert!(!mesh.cast_shadow);
            }
            other => panic!("ground should be a mesh, got {other:?}"),
        }

        for id in scene.children(handle.box_group) {
            match &scene.get(*id).unwrap().kind {
                NodeKind::Mesh(mesh) => assert!(mesh.cast_shadow),
                other => panic!("box group child should be a mesh, got {other:?}"),
            }
        }
    }

    #[test]
    fn sun_carries_config_and_bulb_child() {
        let config = StageConfig {
            shadow_extent: 3.0,
            shadow_map_size: 2048,
            sun_intensity: 1.5,
            ..StageConfig::default()
        };
        let handle = build_scene(&config).unwrap();
        let scene = &handle.scene;

        let (_, light) = scene.directional_light().unwrap();
        assert!(light.cast_shadow);
        assert_eq!(light.intensity, 1.5);
        assert_eq!(light.shadow.bounds.left, -3.0);
        assert_eq!(light.shadow.bounds.top, 3.0);
        assert_eq!(light.shadow.map_width, 2048);
        // Marker moved out of the light and into the graph.
        assert!(light.marker.is_none());

        let children = scene.children(handle.sun);
        assert_eq!(children.len(), 1);
        assert_eq!(scene.get(children[0]).unwrap().name.as_deref(), Some("bulb"));
    }

    #[test]
    fn grid_is_centered_on_the_origin() {
        let config = StageConfig {
            grid_width: 3,
            grid_depth: 3,
            ..StageConfig::default()
        };
        let handle = build_scene(&config).unwrap();
        let scene = &handle.scene;

        let sum: Vec3 = scene
            .children(handle.box_group)
            .iter()
            .map(|id| scene.get(*id).unwrap().transform.position)
            .sum();
        assert!(sum.x.abs() < 1e-4);
        assert!(sum.z.abs() < 1e-4);
    }

    #[test]
    fn boxes_sit_on_the_plane() {
        let handle = build_scene(&StageConfig::default()).unwrap();
        let scene = &handle.scene;
        for id in scene.children(handle.box_group) {
            assert_eq!(scene.get(*id).unwrap().transform.position.y, 0.5);
        }
    }

    #[test]
    fn invalid_config_fails_before_building() {
        let config = StageConfig {
            grid_width: 0,
            ..StageConfig::default()
        };
        assert!(build_scene(&config).is_err());
    }

    #[test]
    fn ambient_fill_uses_charcoal_default() {
        let handle = build_scene(&StageConfig::default()).unwrap();
        let (_, ambient) = handle.scene.ambient_light().unwrap();
        assert_eq!(ambient.color.to_hex(), "36454f");
    }
}
