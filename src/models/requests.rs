use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request for a recommendation feed page
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FeedRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
    #[validate(range(min = 1))]
    #[serde(default = "default_page")]
    pub page: u32,
    #[validate(range(min = 1, max = 100))]
    #[serde(default = "default_page_size")]
    #[serde(alias = "page_size", rename = "pageSize")]
    pub page_size: u32,
    #[serde(default)]
    #[validate(nested)]
    pub filters: Option<FeedFilters>,
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    20
}

/// Optional feed filters
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FeedFilters {
    #[serde(default)]
    #[serde(alias = "same_school", rename = "sameSchool")]
    pub same_school: bool,
    #[serde(default)]
    #[serde(alias = "same_program", rename = "sameProgram")]
    pub same_program: bool,
    #[validate(range(min = 18, max = 100))]
    #[serde(alias = "min_age", rename = "minAge")]
    pub min_age: Option<u8>,
    #[validate(range(min = 18, max = 100))]
    #[serde(alias = "max_age", rename = "maxAge")]
    pub max_age: Option<u8>,
}

/// Request to record a swipe action
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SwipeRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "swiper_id", rename = "swiperId")]
    pub swiper_id: String,
    #[validate(length(min = 1))]
    #[serde(alias = "target_id", rename = "targetId")]
    pub target_id: String,
    pub action: String,
}
