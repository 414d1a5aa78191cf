//! Staged builders for the shadowbox scene primitives.
//!
//! A builder stages construction parameters across multiple calls, validates
//! that required steps happened, then yields the finished value and resets
//! itself so the same instance can build the next object.
//!
//! Two capability traits split the family:
//! - [`ShapeBuilder`] is strict: geometry and material have no meaningful
//!   defaults, so mesh creation and result extraction return `Result` and
//!   fail with [`BuildError`] when a step was skipped.
//! - [`LightBuilder`] is lenient: every light field has a documented default,
//!   so setters are infallible and `take_result` always succeeds.

mod light;
mod shape;

pub use light::{AmbientLightBuilder, DirectionalLightBuilder, LightBuilder};
pub use shape::{BoxBuilder, BuildError, LightBulbSphereBuilder, PlaneBuilder, ShapeBuilder};

pub fn crate_info() -> &'static str {
    "shadowbox-builders v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("builders"));
    }
}
