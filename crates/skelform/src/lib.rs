//! Constraint-driven point placement for glyph skeletons.
//!
//! A spec declares nodes, links between them, and relative constraints:
//! position orderings per axis (`a>b`, `avb`) and half-plane side constraints
//! (`c>a,b`). The pipeline turns one spec into many random-but-valid point sets:
//!
//! 1. `validate::sanitize` drops tokens referencing undeclared nodes.
//! 2. `closure::infer` closes the orderings transitively and flags redundant ones.
//! 3. `solver::place` narrows a per-node box from placed neighbors and samples in it.
//! 4. `solver::recompute_boxes` rebuilds the boxes from final neighbor positions.
//! 5. `side::refine` clips boxes against side lines and resamples violators.
//!
//! All randomness comes from an injected `Sampler`; identical samplers give
//! bit-identical point maps.

pub mod closure;
pub mod constraint;
pub mod geom;
pub mod outline;
pub mod pipeline;
pub mod sampler;
pub mod side;
pub mod solver;
pub mod types;
pub mod validate;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use nalgebra::Vector2 as Vec2;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::constraint::{Axis, PositionConstraint, SideConstraint};
    pub use crate::outline::{convert, convert_all, Outline};
    pub use crate::pipeline::{solve, solve_sanitized, Solution};
    pub use crate::sampler::{FnSampler, ReplayToken, Sampler, SeededSampler};
    pub use crate::side::SideOutcome;
    pub use crate::types::{NodeId, PlacementBox, PointMap, SolveCfg};
    pub use crate::validate::{sanitize, ConstraintTokens, Sanitized, Spec};
    pub use nalgebra::Vector2 as Vec2;
}
