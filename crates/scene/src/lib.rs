//! Scene primitives and the scene graph for the shadowbox demo.
//!
//! This crate is the "rendering library" surface the builders wrap: geometry
//! that tessellates on demand, materials with explicit configuration, meshes
//! with shadow flags, ambient and directional lights, and a graph of named,
//! parent-linked nodes.
//!
//! # Invariants
//! - Node iteration order is deterministic (`BTreeMap` keyed by `NodeId`).
//! - A node has at most one parent; world transforms resolve parent-first.
//! - The graph never renders; backends read it and draw.

mod geometry;
mod graph;
mod light;
mod material;
mod mesh;

pub use geometry::{Geometry, MeshData};
pub use graph::{Node, NodeKind, Scene, SceneError};
pub use light::{AmbientLight, DirectionalLight, Light, ShadowCameraBounds, ShadowSettings};
pub use material::{Material, MaterialConfig, Shading, Side};
pub use mesh::Mesh;

pub fn crate_info() -> &'static str {
    "shadowbox-scene v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("scene"));
    }
}
