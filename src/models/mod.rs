// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    canonical_pair, Candidate, EligibilityCriteria, Gender, MatchRecord, PoolFilters, SwipeAction,
    SwipeEdge, UserRecord, VerificationState,
};
pub use requests::{FeedFilters, FeedRequest, SwipeRequest};
pub use responses::{ErrorResponse, FeedResponse, HealthResponse, SwipeResponse};
