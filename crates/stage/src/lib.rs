//! Assembly of the demo stage: a pulsing grid of boxes over a ground plane,
//! an ambient fill, and a shadow-casting sun with a bulb marker.
//!
//! The single entry point is [`build_scene`]: it takes a [`StageConfig`],
//! drives the builders, and returns a [`SceneHandle`]. Nothing here touches
//! global state, so tests can assemble stages freely.

mod animation;
mod assembly;
mod config;

pub use animation::{animate, pulse};
pub use assembly::{BOX_GROUP, SceneHandle, build_scene};
pub use config::{StageConfig, StageError};

pub fn crate_info() -> &'static str {
    "shadowbox-stage v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("stage"));
    }
}
