// Core algorithm exports
pub mod age;
pub mod pool;
pub mod ranker;
pub mod scoring;

pub use age::{age_on, birth_date_bounds, within_age_range};
pub use pool::{build_pool, directory_criteria, is_eligible};
pub use ranker::{rank_and_paginate, RankedPage, ScoredRecord};
pub use scoring::compatibility_score;
