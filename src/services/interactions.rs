use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{canonical_pair, MatchRecord, SwipeAction, SwipeEdge};

/// Errors from the interaction store
#[derive(Debug, Error)]
pub enum InteractionError {
    /// The store is unreachable or the swipe feature is not provisioned.
    /// Pool building treats this as "no prior interactions" instead of
    /// failing the feed.
    #[error("Interaction store unavailable: {0}")]
    Unavailable(String),

    #[error("SQLx error: {0}")]
    Database(sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

/// Outcome of the atomic match-creation primitive.
#[derive(Debug, Clone)]
pub struct MatchCreation {
    pub created: bool,
    pub record: MatchRecord,
}

/// Read/write access to swipe edges and match records.
///
/// Implementations must guarantee at most one live edge per ordered pair
/// (upsert semantics) and at most one match record per unordered pair, even
/// under concurrent `create_match_if_absent` calls for the same pair.
#[async_trait]
pub trait InteractionStore: Send + Sync {
    async fn get_edge(
        &self,
        swiper_id: &str,
        target_id: &str,
    ) -> Result<Option<SwipeEdge>, InteractionError>;

    /// Insert the edge, or overwrite action and timestamp if one already
    /// exists for the ordered pair.
    async fn upsert_edge(&self, edge: &SwipeEdge) -> Result<(), InteractionError>;

    /// All target ids the swiper has any edge toward, like or skip.
    async fn swiped_target_ids(&self, swiper_id: &str) -> Result<Vec<String>, InteractionError>;

    async fn get_match(&self, a: &str, b: &str) -> Result<Option<MatchRecord>, InteractionError>;

    /// Create the match record for the unordered pair unless one exists,
    /// atomically. Exactly one of two concurrent callers observes
    /// `created = true`; the other gets the existing record.
    async fn create_match_if_absent(
        &self,
        a: &str,
        b: &str,
    ) -> Result<MatchCreation, InteractionError>;

    async fn health_check(&self) -> Result<bool, InteractionError> {
        Ok(true)
    }
}

/// Swipe action as stored in PostgreSQL
#[derive(Debug, Clone, Copy, sqlx::Type)]
#[sqlx(type_name = "swipe_action", rename_all = "lowercase")]
enum DbSwipeAction {
    Like,
    Skip,
}

impl From<SwipeAction> for DbSwipeAction {
    fn from(value: SwipeAction) -> Self {
        match value {
            SwipeAction::Like => DbSwipeAction::Like,
            SwipeAction::Skip => DbSwipeAction::Skip,
        }
    }
}

impl From<DbSwipeAction> for SwipeAction {
    fn from(value: DbSwipeAction) -> Self {
        match value {
            DbSwipeAction::Like => SwipeAction::Like,
            DbSwipeAction::Skip => SwipeAction::Skip,
        }
    }
}

/// PostgreSQL-backed interaction store
///
/// The swipes table carries a primary key on (swiper_id, target_id) so a
/// repeat swipe is an in-place update; the matches table carries a primary
/// key on the canonically ordered pair, which is what makes concurrent
/// reciprocal-like detection collapse to a single record.
pub struct PostgresInteractionStore {
    pool: PgPool,
}

impl PostgresInteractionStore {
    /// Connect and run migrations on startup
    pub async fn connect(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, InteractionError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(5))
            .idle_timeout(Duration::from_secs(600))
            .test_before_acquire(true)
            .connect(database_url)
            .await
            .map_err(map_store_err)?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }
}

/// Classify connectivity and missing-table failures as `Unavailable`;
/// everything else stays a surfaced database error.
fn map_store_err(e: sqlx::Error) -> InteractionError {
    match &e {
        sqlx::Error::Io(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::Tls(_) => InteractionError::Unavailable(e.to_string()),
        // undefined_table: the swipe feature was never provisioned
        sqlx::Error::Database(db) if db.code().as_deref() == Some("42P01") => {
            InteractionError::Unavailable(e.to_string())
        }
        _ => InteractionError::Database(e),
    }
}

#[async_trait]
impl InteractionStore for PostgresInteractionStore {
    async fn get_edge(
        &self,
        swiper_id: &str,
        target_id: &str,
    ) -> Result<Option<SwipeEdge>, InteractionError> {
        let query = r#"
            SELECT swiper_id, target_id, action, acted_at
            FROM swipes
            WHERE swiper_id = $1 AND target_id = $2
        "#;

        let row = sqlx::query(query)
            .bind(swiper_id)
            .bind(target_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_store_err)?;

        Ok(row.map(|row| SwipeEdge {
            swiper_id: row.get("swiper_id"),
            target_id: row.get("target_id"),
            action: row.get::<DbSwipeAction, _>("action").into(),
            acted_at: row.get("acted_at"),
        }))
    }

    async fn upsert_edge(&self, edge: &SwipeEdge) -> Result<(), InteractionError> {
        let query = r#"
            INSERT INTO swipes (swiper_id, target_id, action, acted_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (swiper_id, target_id)
            DO UPDATE SET
                action = EXCLUDED.action,
                acted_at = EXCLUDED.acted_at
        "#;

        sqlx::query(query)
            .bind(&edge.swiper_id)
            .bind(&edge.target_id)
            .bind(DbSwipeAction::from(edge.action))
            .bind(edge.acted_at)
            .execute(&self.pool)
            .await
            .map_err(map_store_err)?;

        tracing::debug!(
            "Recorded swipe: {} -> {} ({:?})",
            edge.swiper_id,
            edge.target_id,
            edge.action
        );

        Ok(())
    }

    async fn swiped_target_ids(&self, swiper_id: &str) -> Result<Vec<String>, InteractionError> {
        let query = r#"
            SELECT target_id
            FROM swipes
            WHERE swiper_id = $1
        "#;

        let rows = sqlx::query(query)
            .bind(swiper_id)
            .fetch_all(&self.pool)
            .await
            .map_err(map_store_err)?;

        let target_ids: Vec<String> = rows.iter().map(|row| row.get("target_id")).collect();

        tracing::debug!("User {} has swiped on {} profiles", swiper_id, target_ids.len());

        Ok(target_ids)
    }

    async fn get_match(&self, a: &str, b: &str) -> Result<Option<MatchRecord>, InteractionError> {
        let (user_a, user_b) = canonical_pair(a, b);

        let query = r#"
            SELECT id, user_a, user_b, matched_at
            FROM matches
            WHERE user_a = $1 AND user_b = $2
        "#;

        let row = sqlx::query(query)
            .bind(user_a)
            .bind(user_b)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_store_err)?;

        Ok(row.map(|row| MatchRecord {
            id: row.get("id"),
            user_a: row.get("user_a"),
            user_b: row.get("user_b"),
            matched_at: row.get("matched_at"),
        }))
    }

    async fn create_match_if_absent(
        &self,
        a: &str,
        b: &str,
    ) -> Result<MatchCreation, InteractionError> {
        let (user_a, user_b) = canonical_pair(a, b);

        // ON CONFLICT DO NOTHING on the pair primary key: when two callers
        // detect reciprocity at the same time, exactly one insert lands and
        // the other falls through to the select below.
        let insert = r#"
            INSERT INTO matches (id, user_a, user_b, matched_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_a, user_b) DO NOTHING
            RETURNING id, user_a, user_b, matched_at
        "#;

        let inserted = sqlx::query(insert)
            .bind(Uuid::new_v4())
            .bind(user_a)
            .bind(user_b)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_store_err)?;

        if let Some(row) = inserted {
            return Ok(MatchCreation {
                created: true,
                record: MatchRecord {
                    id: row.get("id"),
                    user_a: row.get("user_a"),
                    user_b: row.get("user_b"),
                    matched_at: row.get("matched_at"),
                },
            });
        }

        // Lost the race (or the match predates this call). Match records are
        // never deleted, so the row is there to read.
        let select = r#"
            SELECT id, user_a, user_b, matched_at
            FROM matches
            WHERE user_a = $1 AND user_b = $2
        "#;

        let row = sqlx::query(select)
            .bind(user_a)
            .bind(user_b)
            .fetch_one(&self.pool)
            .await
            .map_err(map_store_err)?;

        Ok(MatchCreation {
            created: false,
            record: MatchRecord {
                id: row.get("id"),
                user_a: row.get("user_a"),
                user_b: row.get("user_b"),
                matched_at: row.get("matched_at"),
            },
        })
    }

    async fn health_check(&self) -> Result<bool, InteractionError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(map_store_err)
    }
}

/// In-memory interaction store for tests and local development.
///
/// A single mutex guards both maps, so `create_match_if_absent` is atomic
/// by construction.
#[derive(Default)]
pub struct MemoryInteractionStore {
    inner: Mutex<MemoryState>,
}

#[derive(Default)]
struct MemoryState {
    edges: HashMap<(String, String), SwipeEdge>,
    matches: HashMap<(String, String), MatchRecord>,
}

impl MemoryInteractionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl InteractionStore for MemoryInteractionStore {
    async fn get_edge(
        &self,
        swiper_id: &str,
        target_id: &str,
    ) -> Result<Option<SwipeEdge>, InteractionError> {
        let state = self.lock();
        Ok(state
            .edges
            .get(&(swiper_id.to_string(), target_id.to_string()))
            .cloned())
    }

    async fn upsert_edge(&self, edge: &SwipeEdge) -> Result<(), InteractionError> {
        let mut state = self.lock();
        state.edges.insert(
            (edge.swiper_id.clone(), edge.target_id.clone()),
            edge.clone(),
        );
        Ok(())
    }

    async fn swiped_target_ids(&self, swiper_id: &str) -> Result<Vec<String>, InteractionError> {
        let state = self.lock();
        Ok(state
            .edges
            .keys()
            .filter(|(swiper, _)| swiper == swiper_id)
            .map(|(_, target)| target.clone())
            .collect())
    }

    async fn get_match(&self, a: &str, b: &str) -> Result<Option<MatchRecord>, InteractionError> {
        let (user_a, user_b) = canonical_pair(a, b);
        let state = self.lock();
        Ok(state
            .matches
            .get(&(user_a.to_string(), user_b.to_string()))
            .cloned())
    }

    async fn create_match_if_absent(
        &self,
        a: &str,
        b: &str,
    ) -> Result<MatchCreation, InteractionError> {
        let (user_a, user_b) = canonical_pair(a, b);
        let mut state = self.lock();
        let key = (user_a.to_string(), user_b.to_string());

        if let Some(existing) = state.matches.get(&key) {
            return Ok(MatchCreation {
                created: false,
                record: existing.clone(),
            });
        }

        let record = MatchRecord {
            id: Uuid::new_v4(),
            user_a: user_a.to_string(),
            user_b: user_b.to_string(),
            matched_at: Utc::now(),
        };
        state.matches.insert(key, record.clone());

        Ok(MatchCreation {
            created: true,
            record,
        })
    }
}

/// Null store used when the swipe feature is disabled by configuration.
///
/// Reads behave as if no interactions exist; writes report the store as
/// unavailable so swipe attempts surface a clear error instead of silently
/// dropping user intent.
pub struct NullInteractionStore;

#[async_trait]
impl InteractionStore for NullInteractionStore {
    async fn get_edge(
        &self,
        _swiper_id: &str,
        _target_id: &str,
    ) -> Result<Option<SwipeEdge>, InteractionError> {
        Ok(None)
    }

    async fn upsert_edge(&self, _edge: &SwipeEdge) -> Result<(), InteractionError> {
        Err(InteractionError::Unavailable(
            "swipe recording is disabled".to_string(),
        ))
    }

    async fn swiped_target_ids(&self, _swiper_id: &str) -> Result<Vec<String>, InteractionError> {
        Ok(Vec::new())
    }

    async fn get_match(&self, _a: &str, _b: &str) -> Result<Option<MatchRecord>, InteractionError> {
        Ok(None)
    }

    async fn create_match_if_absent(
        &self,
        _a: &str,
        _b: &str,
    ) -> Result<MatchCreation, InteractionError> {
        Err(InteractionError::Unavailable(
            "swipe recording is disabled".to_string(),
        ))
    }
}
