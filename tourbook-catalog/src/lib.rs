//! The nine target domains reviews attach to: resolution by id, images, and
//! the kind metadata (tables, foreign keys, labels) shared with the reviews
//! crate.

pub mod entity;
pub mod infra;
pub mod repository;
pub mod service;

pub use entity::{Image, Target, TargetIds, TargetKind, TargetRef};
