use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Gender as stored in the user directory.
///
/// The orientation filter only understands the two known values; anything
/// else deserializes to `Unspecified` and is served an unfiltered pool.
/// That pass-through is an explicit policy choice, not an oversight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    #[serde(other)]
    Unspecified,
}

impl Gender {
    /// The gender shown to this requester under the fixed male<->female
    /// mapping, or `None` when no orientation filter applies.
    pub fn orientation_target(self) -> Option<Gender> {
        match self {
            Gender::Male => Some(Gender::Female),
            Gender::Female => Some(Gender::Male),
            Gender::Unspecified => None,
        }
    }
}

/// Account verification state, owned by the directory's moderation flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationState {
    Unverified,
    Pending,
    Verified,
    Rejected,
}

/// User attribute record as read from the directory service.
///
/// The engine never writes these; report_count in particular is only ever
/// read (moderation increments it elsewhere).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(rename = "userId")]
    pub id: String,
    pub name: String,
    #[serde(rename = "birthDate")]
    pub birth_date: NaiveDate,
    pub gender: Gender,
    #[serde(default)]
    pub school: String,
    #[serde(default)]
    pub program: String,
    #[serde(rename = "preferenceText", default)]
    pub preference_text: String,
    #[serde(default = "default_verification")]
    pub verification: VerificationState,
    #[serde(rename = "isRestricted", default)]
    pub is_restricted: bool,
    #[serde(rename = "reportCount", default)]
    pub report_count: u32,
}

fn default_verification() -> VerificationState {
    VerificationState::Unverified
}

impl UserRecord {
    pub fn verified(&self) -> bool {
        self.verification == VerificationState::Verified
    }
}

/// A directed swipe from one user toward another.
///
/// At most one live edge exists per ordered (swiper, target) pair; a repeat
/// swipe overwrites action and timestamp rather than inserting a second row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwipeEdge {
    #[serde(rename = "swiperId")]
    pub swiper_id: String,
    #[serde(rename = "targetId")]
    pub target_id: String,
    pub action: SwipeAction,
    #[serde(rename = "actedAt")]
    pub acted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwipeAction {
    Like,
    Skip,
}

/// Durable artifact of two reciprocal likes.
///
/// Stored under the canonical pair ordering (user_a < user_b) so the store
/// can enforce at-most-one per unordered pair. Read-only once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRecord {
    pub id: Uuid,
    #[serde(rename = "userA")]
    pub user_a: String,
    #[serde(rename = "userB")]
    pub user_b: String,
    #[serde(rename = "matchedAt")]
    pub matched_at: DateTime<Utc>,
}

/// Order a pair of user ids canonically (lexicographic ascending).
pub fn canonical_pair<'a>(a: &'a str, b: &'a str) -> (&'a str, &'a str) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Feed filter parameters after request validation.
#[derive(Debug, Clone)]
pub struct PoolFilters {
    pub same_school: bool,
    pub same_program: bool,
    pub min_age: u8,
    pub max_age: u8,
}

impl Default for PoolFilters {
    fn default() -> Self {
        Self {
            same_school: false,
            same_program: false,
            min_age: 18,
            max_age: 100,
        }
    }
}

impl PoolFilters {
    /// The age filter only applies when the caller narrowed it below the
    /// full [18, 100] range.
    pub fn age_bounded(&self) -> bool {
        self.min_age > 18 || self.max_age < 100
    }
}

/// Criteria pushed down into the directory's bulk read.
///
/// The pool builder re-applies every rule in-process afterwards, so these
/// only need to be a superset pre-filter.
#[derive(Debug, Clone)]
pub struct EligibilityCriteria {
    pub exclude_id: String,
    pub gender: Option<Gender>,
    pub school: Option<String>,
    pub program: Option<String>,
    pub limit: usize,
}

/// A scored candidate as returned on a feed page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(rename = "userId")]
    pub id: String,
    pub name: String,
    pub age: u8,
    pub school: String,
    pub program: String,
    #[serde(rename = "isVerified")]
    pub is_verified: bool,
    pub score: i32,
    // Always empty for now: no interest-matching data source is wired up.
    #[serde(rename = "sharedInterests")]
    pub shared_interests: Vec<String>,
    #[serde(rename = "isLiked")]
    pub is_liked: bool,
    #[serde(rename = "isSkipped")]
    pub is_skipped: bool,
}
