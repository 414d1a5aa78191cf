//! wgpu render backend for the shadowbox scene.
//!
//! Renders mesh nodes with ambient + directional lighting and a single
//! directional shadow map; the camera is an orbit model driven by mouse drag
//! and wheel.
//!
//! # Invariants
//! - The renderer never mutates the scene.
//! - Scene topology is fixed after `SceneRenderer::new`; only transforms,
//!   colors, and light parameters may change between frames.

mod camera;
mod gpu;
mod shaders;
mod shadow;

pub use camera::OrbitCamera;
pub use gpu::SceneRenderer;
pub use shadow::ShadowMap;
