use serde::{Deserialize, Serialize};
use crate::models::domain::{Candidate, SwipeAction};

/// Response for a feed page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedResponse {
    pub candidates: Vec<Candidate>,
    pub page: u32,
    #[serde(rename = "pageSize")]
    pub page_size: u32,
    pub total: usize,
    #[serde(rename = "hasMore")]
    pub has_more: bool,
}

/// Response for a recorded swipe
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwipeResponse {
    pub accepted: bool,
    pub action: SwipeAction,
    #[serde(rename = "isMatch")]
    pub is_match: bool,
    #[serde(rename = "matchId", skip_serializing_if = "Option::is_none")]
    pub match_id: Option<uuid::Uuid>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
