//! Savora: a menu-management backend for an ordering application.
//!
//! Free-form submissions are normalized into canonical menu records,
//! validated, persisted to Postgres, and served back through an in-process
//! snapshot cache that every write invalidates.

pub mod application;
pub mod cache;
pub mod config;
pub mod domain;
pub mod infra;
