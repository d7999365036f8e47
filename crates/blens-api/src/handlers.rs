//! HTTP handlers.

pub mod health;
pub mod predict;

pub use health::health;
pub use predict::{predict, predict_method_not_allowed};
