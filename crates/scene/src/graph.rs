use crate::light::{AmbientLight, DirectionalLight, Light};
use crate::mesh::Mesh;
use glam::Mat4;
use serde::{Deserialize, Serialize};
use shadowbox_common::{NodeId, Transform};
use std::collections::BTreeMap;

/// Errors from scene graph operations.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("node {0:?} not found")]
    NodeNotFound(NodeId),
}

/// What a node carries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    /// Pure grouping node; exists to transform and name its children.
    Group,
    Mesh(Mesh),
    Light(Light),
}

/// A scene graph node: optional name, local transform, payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub name: Option<String>,
    pub transform: Transform,
    pub kind: NodeKind,
}

impl Node {
    pub fn group() -> Self {
        Self {
            name: None,
            transform: Transform::default(),
            kind: NodeKind::Group,
        }
    }

    pub fn mesh(mesh: Mesh) -> Self {
        Self {
            name: None,
            transform: Transform::default(),
            kind: NodeKind::Mesh(mesh),
        }
    }

    pub fn light(light: Light) -> Self {
        Self {
            name: None,
            transform: Transform::default(),
            kind: NodeKind::Light(light),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct NodeEntry {
    node: Node,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// The scene: a forest of nodes with deterministic iteration order.
///
/// Nodes live in a `BTreeMap` keyed by `NodeId` so traversal, name lookup,
/// and render output are reproducible across runs and platforms.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scene {
    nodes: BTreeMap<NodeId, NodeEntry>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Add a root node. Returns its id.
    pub fn add(&mut self, node: Node) -> NodeId {
        let id = NodeId::new();
        tracing::debug!(id = %id.short(), name = node.name.as_deref().unwrap_or("-"), "add node");
        self.nodes.insert(
            id,
            NodeEntry {
                node,
                parent: None,
                children: Vec::new(),
            },
        );
        id
    }

    /// Add a node as a child of `parent`. Returns the child's id.
    pub fn add_child(&mut self, parent: NodeId, node: Node) -> Result<NodeId, SceneError> {
        if !self.nodes.contains_key(&parent) {
            return Err(SceneError::NodeNotFound(parent));
        }
        let id = self.add(node);
        if let Some(entry) = self.nodes.get_mut(&id) {
            entry.parent = Some(parent);
        }
        if let Some(entry) = self.nodes.get_mut(&parent) {
            entry.children.push(id);
        }
        Ok(id)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id).map(|entry| &entry.node)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id).map(|entry| &mut entry.node)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(&id).and_then(|entry| entry.parent)
    }

    /// Children of a node in insertion order. Empty for unknown ids.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(&id)
            .map(|entry| entry.children.as_slice())
            .unwrap_or(&[])
    }

    /// First node carrying the given name, in id order.
    pub fn object_by_name(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|(_, entry)| entry.node.name.as_deref() == Some(name))
            .map(|(id, _)| *id)
    }

    /// All nodes in id order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().map(|(id, entry)| (*id, &entry.node))
    }

    /// All mesh nodes in id order.
    pub fn meshes(&self) -> impl Iterator<Item = (NodeId, &Mesh)> {
        self.iter().filter_map(|(id, node)| match &node.kind {
            NodeKind::Mesh(mesh) => Some((id, mesh)),
            _ => None,
        })
    }

    /// First ambient light in the scene, if any.
    pub fn ambient_light(&self) -> Option<(NodeId, &AmbientLight)> {
        self.iter().find_map(|(id, node)| match &node.kind {
            NodeKind::Light(Light::Ambient(light)) => Some((id, light)),
            _ => None,
        })
    }

    /// First directional light in the scene, if any.
    pub fn directional_light(&self) -> Option<(NodeId, &DirectionalLight)> {
        self.iter().find_map(|(id, node)| match &node.kind {
            NodeKind::Light(Light::Directional(light)) => Some((id, light)),
            _ => None,
        })
    }

    /// Mutable access to the first directional light (slider panels use this).
    pub fn directional_light_mut(&mut self) -> Option<&mut DirectionalLight> {
        self.nodes
            .values_mut()
            .find_map(|entry| match &mut entry.node.kind {
                NodeKind::Light(Light::Directional(light)) => Some(light),
                _ => None,
            })
    }

    /// Mutable access to the first ambient light.
    pub fn ambient_light_mut(&mut self) -> Option<&mut AmbientLight> {
        self.nodes
            .values_mut()
            .find_map(|entry| match &mut entry.node.kind {
                NodeKind::Light(Light::Ambient(light)) => Some(light),
                _ => None,
            })
    }

    /// World-space matrix for a node: the product of its ancestor transforms.
    pub fn world_transform(&self, id: NodeId) -> Option<Mat4> {
        let entry = self.nodes.get(&id)?;
        let local = entry.node.transform.matrix();
        match entry.parent {
            // Parent links are only created through add_child, so the chain
            // always resolves.
            Some(parent) => self.world_transform(parent).map(|m| m * local),
            None => Some(local),
        }
    }
}
