//! Campus Algo - Recommendation and mutual-match service for the campus dating app
//!
//! This library provides the core recommendation engine: candidate pool
//! building, deterministic compatibility scoring, ranked pagination, and
//! idempotent swipe recording with race-safe mutual-match detection.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{compatibility_score, rank_and_paginate};
pub use crate::models::{
    Candidate, FeedResponse, MatchRecord, PoolFilters, SwipeAction, SwipeEdge, SwipeResponse,
    UserRecord,
};
pub use crate::services::{MatchEngine, MemoryDirectory, MemoryInteractionStore};
