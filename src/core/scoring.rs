use std::collections::HashSet;

use crate::models::UserRecord;

/// Base score every candidate starts from.
const BASE_SCORE: i32 = 50;
/// Bonus for a verified candidate account.
const VERIFIED_BONUS: i32 = 20;
/// Bonus for attending the requester's school.
const SAME_SCHOOL_BONUS: i32 = 10;
/// Bonus for sharing the requester's program.
const SAME_PROGRAM_BONUS: i32 = 5;
/// Points per shared preference token.
const TOKEN_BONUS: i32 = 2;
/// Ceiling on the preference-similarity contribution.
const TOKEN_BONUS_CAP: i32 = 15;
/// Penalty per report against the candidate.
const REPORT_PENALTY: i32 = 5;
/// Shared tokens must be longer than this to count.
const SHARED_TOKEN_MIN_LEN: usize = 3;

/// Compatibility score for showing `candidate` to `requester`.
///
/// Pure and deterministic; the constants and their application order are
/// fixed policy, not tunables. Never returns a negative score.
///
/// # Formula
/// ```text
/// score = 50
///       + 20 if candidate is verified
///       + 10 if same non-empty school
///       + 5  if same non-empty program
///       + min(2 * shared_preference_tokens, 15)
///       - 5 * candidate.report_count
/// clamped at 0
/// ```
pub fn compatibility_score(requester: &UserRecord, candidate: &UserRecord) -> i32 {
    let mut score = BASE_SCORE;

    if candidate.verified() {
        score += VERIFIED_BONUS;
    }

    if !candidate.school.is_empty() && candidate.school == requester.school {
        score += SAME_SCHOOL_BONUS;
    }

    if !candidate.program.is_empty() && candidate.program == requester.program {
        score += SAME_PROGRAM_BONUS;
    }

    score += preference_similarity(&requester.preference_text, &candidate.preference_text);

    score -= REPORT_PENALTY * candidate.report_count as i32;

    score.max(0)
}

/// Preference-text similarity bonus.
///
/// Case-insensitive whitespace tokens; each occurrence in the candidate's
/// text of a token (longer than three characters) that also appears in the
/// requester's text counts once, so repeated candidate tokens accumulate.
fn preference_similarity(requester_text: &str, candidate_text: &str) -> i32 {
    if requester_text.is_empty() || candidate_text.is_empty() {
        return 0;
    }

    let requester_tokens: HashSet<String> = requester_text
        .split_whitespace()
        .map(|t| t.to_lowercase())
        .collect();

    let shared = candidate_text
        .split_whitespace()
        .map(|t| t.to_lowercase())
        .filter(|t| t.chars().count() > SHARED_TOKEN_MIN_LEN)
        .filter(|t| requester_tokens.contains(t))
        .count() as i32;

    (shared * TOKEN_BONUS).min(TOKEN_BONUS_CAP)
}
