use shadowbox_common::NodeId;
use shadowbox_scene::Scene;

/// Height of a box at elapsed time `t`, phase-shifted by its index.
///
/// `(sin(t + index) + 1) / 2` sweeps 0..1; `floor` keeps the box from
/// flattening to nothing at the trough.
pub fn pulse(t: f32, index: usize, floor: f32) -> f32 {
    ((t + index as f32).sin() + 1.0) / 2.0 + floor
}

/// Advance the pulse animation for every child of `group`.
///
/// Each child's Y scale follows [`pulse`] and its Y position tracks the
/// scale, so boxes grow upward from the plane. Returns the number of nodes
/// updated; an unknown group updates nothing.
pub fn animate(scene: &mut Scene, group: NodeId, t: f32, floor: f32) -> usize {
    let children: Vec<NodeId> = scene.children(group).to_vec();
    let mut updated = 0;
    for (index, id) in children.into_iter().enumerate() {
        if let Some(node) = scene.get_mut(id) {
            let height = pulse(t, index, floor);
            node.transform.scale.y = height;
            node.transform.position.y = height;
            updated += 1;
        }
    }
    updated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembly::build_scene;
    use crate::config::StageConfig;

    #[test]
    fn pulse_at_origin_is_half_plus_floor() {
        assert_eq!(pulse(0.0, 0, 0.001), 0.5 + 0.001);
    }

    #[test]
    fn pulse_stays_within_floor_and_one_plus_floor() {
        for step in 0..200 {
            let t = step as f32 * 0.1;
            let v = pulse(t, step, 0.001);
            assert!(v >= 0.001);
            assert!(v <= 1.0015);
        }
    }

    #[test]
    fn pulse_phase_shifts_by_index() {
        let t = 1.25;
        assert_ne!(pulse(t, 0, 0.0), pulse(t, 1, 0.0));
        // Index acts as a time offset.
        assert_eq!(pulse(t, 3, 0.0), pulse(t + 3.0, 0, 0.0));
    }

    #[test]
    fn animate_updates_every_box() {
        let config = StageConfig {
            grid_width: 4,
            grid_depth: 4,
            ..StageConfig::default()
        };
        let mut handle = build_scene(&config).unwrap();
        let updated = animate(&mut handle.scene, handle.box_group, 0.0, config.pulse_floor);
        assert_eq!(updated, 16);

        let first = handle.scene.children(handle.box_group)[0];
        let node = handle.scene.get(first).unwrap();
        assert_eq!(node.transform.scale.y, 0.5 + config.pulse_floor);
        assert_eq!(node.transform.position.y, node.transform.scale.y);
    }

    #[test]
    fn animate_with_unknown_group_is_a_no_op() {
        let mut handle = build_scene(&StageConfig::default()).unwrap();
        assert_eq!(animate(&mut handle.scene, NodeId::new(), 1.0, 0.001), 0);
    }

    #[test]
    fn animate_leaves_non_group_members_alone() {
        let mut handle = build_scene(&StageConfig::default()).unwrap();
        let ground = handle.scene.object_by_name("ground").unwrap();
        let before = handle.scene.get(ground).unwrap().transform;
        animate(&mut handle.scene, handle.box_group, 2.0, 0.001);
        assert_eq!(handle.scene.get(ground).unwrap().transform, before);
    }
}
