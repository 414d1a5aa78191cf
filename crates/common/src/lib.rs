//! Shared leaf types for the shadowbox demo scene.
//!
//! Everything here is renderer-agnostic and cheap to copy: colors, spatial
//! transforms, and node identifiers. Higher crates (scene graph, builders,
//! render backends) all speak these types.

mod color;
mod types;

pub use color::{Color, ColorParseError};
pub use types::{NodeId, Transform};

pub fn crate_info() -> &'static str {
    "shadowbox-common v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("common"));
    }
}
