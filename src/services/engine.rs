use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;

use crate::core::{
    age::age_on,
    pool::{build_pool, directory_criteria},
    ranker::{rank_and_paginate, ScoredRecord},
    scoring::compatibility_score,
};
use crate::models::{
    Candidate, FeedResponse, PoolFilters, SwipeAction, SwipeEdge, SwipeResponse,
};
use crate::services::directory::{DirectoryError, UserDirectory};
use crate::services::interactions::{InteractionError, InteractionStore};

/// Hard cap on the page size a caller can request.
pub const MAX_PAGE_SIZE: u32 = 100;
/// Pool fetches pull this multiple of the requested page depth, because
/// age filtering happens after the fetch.
pub const DEFAULT_OVERFETCH_FACTOR: usize = 2;

/// Errors surfaced by feed and swipe operations
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("cannot swipe on own profile")]
    SelfSwipe,

    #[error("user not found: {0}")]
    UserNotFound(String),

    #[error("directory fetch failed: {0}")]
    Directory(#[from] DirectoryError),

    #[error("interaction store unavailable")]
    StoreUnavailable,

    #[error("interaction store error: {0}")]
    Store(InteractionError),
}

impl From<InteractionError> for EngineError {
    fn from(value: InteractionError) -> Self {
        match value {
            InteractionError::Unavailable(_) => EngineError::StoreUnavailable,
            other => EngineError::Store(other),
        }
    }
}

/// Feed and swipe orchestrator
///
/// # Feed pipeline
/// 1. Exclusion set from prior swipes (degrades to empty if unavailable)
/// 2. Directory bulk read with pushed-down criteria
/// 3. In-process eligibility filtering
/// 4. Scoring and ranked pagination
/// 5. Like/skip tagging of the returned page
pub struct MatchEngine {
    directory: Arc<dyn UserDirectory>,
    store: Arc<dyn InteractionStore>,
    overfetch_factor: usize,
}

impl MatchEngine {
    pub fn new(directory: Arc<dyn UserDirectory>, store: Arc<dyn InteractionStore>) -> Self {
        Self {
            directory,
            store,
            overfetch_factor: DEFAULT_OVERFETCH_FACTOR,
        }
    }

    pub fn with_overfetch_factor(mut self, factor: usize) -> Self {
        self.overfetch_factor = factor.max(1);
        self
    }

    /// Build one page of ranked recommendations for a requester.
    pub async fn build_feed(
        &self,
        requester_id: &str,
        page: u32,
        page_size: u32,
        filters: PoolFilters,
    ) -> Result<FeedResponse, EngineError> {
        let page = page.max(1);
        let page_size = page_size.clamp(1, MAX_PAGE_SIZE);

        let requester = self
            .directory
            .get_user(requester_id)
            .await?
            .ok_or_else(|| EngineError::UserNotFound(requester_id.to_string()))?;

        // Prior interactions exclude their targets from the pool. A store
        // that is unreachable or not provisioned must not fail the feed;
        // serve an unfiltered pool and say so in the logs.
        let exclusions: HashSet<String> = match self.store.swiped_target_ids(requester_id).await {
            Ok(ids) => ids.into_iter().collect(),
            Err(InteractionError::Unavailable(reason)) => {
                tracing::warn!(
                    "Interaction store degraded for {}, serving feed without exclusion filtering: {}",
                    requester_id,
                    reason
                );
                HashSet::new()
            }
            Err(e) => return Err(e.into()),
        };

        let fetch_limit = (page as usize)
            .saturating_mul(page_size as usize)
            .saturating_mul(self.overfetch_factor);
        let criteria = directory_criteria(&requester, &filters, fetch_limit);
        let fetched = self.directory.list_eligible(&criteria).await?;

        tracing::debug!(
            "Fetched {} directory records for {} (excluding {} prior swipes)",
            fetched.len(),
            requester_id,
            exclusions.len()
        );

        let today = Utc::now().date_naive();
        let pool = build_pool(&requester, fetched, &filters, &exclusions, today);

        let scored: Vec<ScoredRecord> = pool
            .into_iter()
            .map(|record| ScoredRecord {
                score: compatibility_score(&requester, &record),
                record,
            })
            .collect();

        let ranked = rank_and_paginate(scored, page, page_size);
        let (total, has_more) = (ranked.total, ranked.has_more);

        let mut candidates = Vec::with_capacity(ranked.entries.len());
        for entry in ranked.entries {
            let (is_liked, is_skipped) = self.page_tags(requester_id, &entry.record.id).await;
            let age = age_on(entry.record.birth_date, today);
            let is_verified = entry.record.verified();
            candidates.push(Candidate {
                id: entry.record.id,
                name: entry.record.name,
                age,
                school: entry.record.school,
                program: entry.record.program,
                is_verified,
                score: entry.score,
                shared_interests: Vec::new(),
                is_liked,
                is_skipped,
            });
        }

        tracing::info!(
            "Feed for {}: page {} of {} candidates ({} returned)",
            requester_id,
            page,
            total,
            candidates.len()
        );

        Ok(FeedResponse {
            candidates,
            page,
            page_size,
            total,
            has_more,
        })
    }

    /// Re-check the requester's own edge toward a returned candidate.
    ///
    /// The exclusion step should already have removed swiped users, but the
    /// pool can be stale; tag the page from a fresh lookup so the client
    /// never renders a like button on an already-liked profile.
    async fn page_tags(&self, requester_id: &str, candidate_id: &str) -> (bool, bool) {
        match self.store.get_edge(requester_id, candidate_id).await {
            Ok(Some(edge)) => match edge.action {
                SwipeAction::Like => (true, false),
                SwipeAction::Skip => (false, true),
            },
            Ok(None) => (false, false),
            Err(e) => {
                tracing::debug!("Edge lookup failed while tagging page: {}", e);
                (false, false)
            }
        }
    }

    /// Record a swipe and detect a mutual match.
    ///
    /// The edge write is the durable fact; match creation is best-effort on
    /// top of it. Reciprocity is re-derived on every like, so a failed
    /// creation heals on the next interaction for the pair.
    pub async fn record_swipe(
        &self,
        swiper_id: &str,
        target_id: &str,
        action: SwipeAction,
    ) -> Result<SwipeResponse, EngineError> {
        if swiper_id == target_id {
            return Err(EngineError::SelfSwipe);
        }

        self.directory
            .get_user(swiper_id)
            .await?
            .ok_or_else(|| EngineError::UserNotFound(swiper_id.to_string()))?;
        self.directory
            .get_user(target_id)
            .await?
            .ok_or_else(|| EngineError::UserNotFound(target_id.to_string()))?;

        let edge = SwipeEdge {
            swiper_id: swiper_id.to_string(),
            target_id: target_id.to_string(),
            action,
            acted_at: Utc::now(),
        };

        self.store.upsert_edge(&edge).await?;

        let (is_match, match_id) = if action == SwipeAction::Like {
            self.detect_match(swiper_id, target_id).await
        } else {
            (false, None)
        };

        Ok(SwipeResponse {
            accepted: true,
            action,
            is_match,
            match_id,
        })
    }

    async fn detect_match(&self, swiper_id: &str, target_id: &str) -> (bool, Option<uuid::Uuid>) {
        let reciprocal = match self.store.get_edge(target_id, swiper_id).await {
            Ok(edge) => edge.map(|e| e.action == SwipeAction::Like).unwrap_or(false),
            Err(e) => {
                // The swipe itself is already committed; a failed
                // reciprocity read must not undo that.
                tracing::error!(
                    "Reciprocity check failed for {} -> {}: {}",
                    swiper_id,
                    target_id,
                    e
                );
                return (false, None);
            }
        };

        if !reciprocal {
            return (false, None);
        }

        match self.store.create_match_if_absent(swiper_id, target_id).await {
            Ok(creation) => {
                if creation.created {
                    tracing::info!(
                        "Mutual match created: {} <-> {} ({})",
                        swiper_id,
                        target_id,
                        creation.record.id
                    );
                } else {
                    tracing::debug!(
                        "Match already existed for {} <-> {} ({})",
                        swiper_id,
                        target_id,
                        creation.record.id
                    );
                }
                (true, Some(creation.record.id))
            }
            Err(e) => {
                // Soft failure: the like stays recorded, the match is
                // re-derived on the pair's next interaction.
                tracing::error!(
                    "Swipe recorded but match creation failed for {} <-> {}: {}",
                    swiper_id,
                    target_id,
                    e
                );
                (false, None)
            }
        }
    }

    /// Store ping for the health endpoint.
    pub async fn store_healthy(&self) -> bool {
        self.store.health_check().await.unwrap_or(false)
    }
}
