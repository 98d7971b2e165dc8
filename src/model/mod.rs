//! Transition model: per-run ordering and first-order transition counts.

pub mod build;
pub mod matrix;

pub use build::{Bracketing, build_transition_matrix};
pub use matrix::TransitionMatrix;
