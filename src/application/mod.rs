//! Application services layer: normalization, validation, orchestration.

pub mod error;
pub mod forms;
pub mod menu;
pub mod repos;
