use crate::models::UserRecord;

/// A pool entry with its computed compatibility score.
#[derive(Debug, Clone)]
pub struct ScoredRecord {
    pub record: UserRecord,
    pub score: i32,
}

/// One page of the ranked pool.
#[derive(Debug)]
pub struct RankedPage {
    pub entries: Vec<ScoredRecord>,
    pub total: usize,
    pub has_more: bool,
}

/// Sort the scored pool and slice out one page.
///
/// Descending by score, ties broken by ascending user id so identical
/// pools always paginate identically. Pages are 1-based; a page past the
/// end of the pool yields an empty slice rather than an error.
pub fn rank_and_paginate(mut scored: Vec<ScoredRecord>, page: u32, page_size: u32) -> RankedPage {
    scored.sort_by(|a, b| {
        b.score
            .cmp(&a.score)
            .then_with(|| a.record.id.cmp(&b.record.id))
    });

    let total = scored.len();
    let size = page_size as usize;
    let start = (page.saturating_sub(1) as usize).saturating_mul(size);
    let has_more = (page as usize).saturating_mul(size) < total;

    let entries = if start >= total {
        Vec::new()
    } else {
        scored.into_iter().skip(start).take(size).collect()
    };

    RankedPage {
        entries,
        total,
        has_more,
    }
}
