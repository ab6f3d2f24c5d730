//! Reviews attached to exactly one catalog target: creation, moderation,
//! paginated listings and per-target rating summaries.

pub mod api;
pub mod entity;
pub mod infra;
pub mod rating;
pub mod repository;
pub mod service;
pub mod usecase;

pub use entity::{Review, ReviewScope};
pub use rating::RatingSummary;
