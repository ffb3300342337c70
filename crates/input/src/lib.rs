//! Input mapping: held keys become per-frame movement, mouse deltas become look input.
//!
//! # Invariants
//! - Movement speed is fixed while a key is held and zero once released.
//! - This crate knows nothing about the windowing backend; the app translates
//!   raw key codes into `MoveKey` and `Action`.

pub mod action;
pub mod controls;

pub use action::{Action, MoveKey};
pub use controls::{ControlConfig, Controls};

/// Invalid input tuning.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("mouse divisor must be a positive finite number, got {0}")]
    MouseDivisor(f32),
    #[error("move speed must be finite, got {0}")]
    MoveSpeed(f32),
}

pub fn crate_info() -> &'static str {
    "viewer-input v0.1.0"
}
