use std::collections::HashSet;

use chrono::NaiveDate;

use crate::core::age::within_age_range;
use crate::models::{EligibilityCriteria, PoolFilters, UserRecord};

/// Criteria pushed down into the directory bulk read.
///
/// Equality filters are only pushed when the requester's own field is
/// non-empty; the in-process pass re-checks everything anyway.
pub fn directory_criteria(
    requester: &UserRecord,
    filters: &PoolFilters,
    limit: usize,
) -> EligibilityCriteria {
    EligibilityCriteria {
        exclude_id: requester.id.clone(),
        gender: requester.gender.orientation_target(),
        school: (filters.same_school && !requester.school.is_empty())
            .then(|| requester.school.clone()),
        program: (filters.same_program && !requester.program.is_empty())
            .then(|| requester.program.clone()),
        limit,
    }
}

/// Check a single candidate against every pool eligibility rule.
#[inline]
pub fn is_eligible(
    requester: &UserRecord,
    candidate: &UserRecord,
    filters: &PoolFilters,
    exclusions: &HashSet<String>,
    today: NaiveDate,
) -> bool {
    // Never show the requester their own profile
    if candidate.id == requester.id {
        return false;
    }

    if candidate.is_restricted {
        return false;
    }

    // Fixed two-value orientation mapping; a requester outside it gets no
    // orientation filter at all.
    if let Some(wanted) = requester.gender.orientation_target() {
        if candidate.gender != wanted {
            return false;
        }
    }

    // Any prior edge excludes, whatever its action was.
    if exclusions.contains(&candidate.id) {
        return false;
    }

    // Age filtering happens here, post-fetch, by birth-date bounds.
    if filters.age_bounded()
        && !within_age_range(candidate.birth_date, filters.min_age, filters.max_age, today)
    {
        return false;
    }

    if filters.same_school && !requester.school.is_empty() && candidate.school != requester.school {
        return false;
    }

    if filters.same_program
        && !requester.program.is_empty()
        && candidate.program != requester.program
    {
        return false;
    }

    true
}

/// Filter a fetched batch down to the eligible candidate pool.
pub fn build_pool(
    requester: &UserRecord,
    fetched: Vec<UserRecord>,
    filters: &PoolFilters,
    exclusions: &HashSet<String>,
    today: NaiveDate,
) -> Vec<UserRecord> {
    fetched
        .into_iter()
        .filter(|candidate| is_eligible(requester, candidate, filters, exclusions, today))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Gender, VerificationState};

    fn user(id: &str, gender: Gender) -> UserRecord {
        UserRecord {
            id: id.to_string(),
            name: format!("User {}", id),
            birth_date: NaiveDate::from_ymd_opt(2003, 4, 2).unwrap(),
            gender,
            school: "Tech".to_string(),
            program: "CS".to_string(),
            preference_text: String::new(),
            verification: VerificationState::Verified,
            is_restricted: false,
            report_count: 0,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, 1).unwrap()
    }

    #[test]
    fn test_self_excluded() {
        let requester = user("a", Gender::Male);
        let candidate = user("a", Gender::Female);
        assert!(!is_eligible(
            &requester,
            &candidate,
            &PoolFilters::default(),
            &HashSet::new(),
            today()
        ));
    }

    #[test]
    fn test_restricted_excluded() {
        let requester = user("a", Gender::Male);
        let mut candidate = user("b", Gender::Female);
        candidate.is_restricted = true;
        assert!(!is_eligible(
            &requester,
            &candidate,
            &PoolFilters::default(),
            &HashSet::new(),
            today()
        ));
    }

    #[test]
    fn test_orientation_filter() {
        let requester = user("a", Gender::Male);
        let same = user("b", Gender::Male);
        let opposite = user("c", Gender::Female);
        let filters = PoolFilters::default();
        assert!(!is_eligible(&requester, &same, &filters, &HashSet::new(), today()));
        assert!(is_eligible(&requester, &opposite, &filters, &HashSet::new(), today()));
    }

    #[test]
    fn test_unspecified_gender_passes_through() {
        let requester = user("a", Gender::Unspecified);
        let filters = PoolFilters::default();
        assert!(is_eligible(&requester, &user("b", Gender::Male), &filters, &HashSet::new(), today()));
        assert!(is_eligible(&requester, &user("c", Gender::Female), &filters, &HashSet::new(), today()));
    }

    #[test]
    fn test_prior_swipe_excludes_regardless_of_action() {
        let requester = user("a", Gender::Male);
        let candidate = user("b", Gender::Female);
        let exclusions: HashSet<String> = ["b".to_string()].into_iter().collect();
        assert!(!is_eligible(
            &requester,
            &candidate,
            &PoolFilters::default(),
            &exclusions,
            today()
        ));
    }

    #[test]
    fn test_age_filter_applied_only_when_narrowed() {
        let requester = user("a", Gender::Male);
        let mut candidate = user("b", Gender::Female);
        // 17 years old at `today`
        candidate.birth_date = NaiveDate::from_ymd_opt(2008, 6, 1).unwrap();

        let default_filters = PoolFilters::default();
        assert!(is_eligible(&requester, &candidate, &default_filters, &HashSet::new(), today()));

        let narrowed = PoolFilters {
            min_age: 18,
            max_age: 25,
            ..PoolFilters::default()
        };
        assert!(!is_eligible(&requester, &candidate, &narrowed, &HashSet::new(), today()));
    }

    #[test]
    fn test_same_school_filter() {
        let requester = user("a", Gender::Male);
        let mut candidate = user("b", Gender::Female);
        candidate.school = "State".to_string();
        let filters = PoolFilters {
            same_school: true,
            ..PoolFilters::default()
        };
        assert!(!is_eligible(&requester, &candidate, &filters, &HashSet::new(), today()));
    }

    #[test]
    fn test_same_school_filter_skipped_for_empty_requester_school() {
        let mut requester = user("a", Gender::Male);
        requester.school = String::new();
        let mut candidate = user("b", Gender::Female);
        candidate.school = "State".to_string();
        let filters = PoolFilters {
            same_school: true,
            ..PoolFilters::default()
        };
        assert!(is_eligible(&requester, &candidate, &filters, &HashSet::new(), today()));
    }

    #[test]
    fn test_same_program_filter() {
        let requester = user("a", Gender::Male);
        let mut candidate = user("b", Gender::Female);
        candidate.program = "Law".to_string();
        let filters = PoolFilters {
            same_program: true,
            ..PoolFilters::default()
        };
        assert!(!is_eligible(&requester, &candidate, &filters, &HashSet::new(), today()));
    }

    #[test]
    fn test_build_pool_filters_batch() {
        let requester = user("a", Gender::Male);
        let mut restricted = user("c", Gender::Female);
        restricted.is_restricted = true;
        let fetched = vec![
            user("b", Gender::Female),
            restricted,
            user("d", Gender::Male),
            user("e", Gender::Female),
        ];
        let pool = build_pool(
            &requester,
            fetched,
            &PoolFilters::default(),
            &HashSet::new(),
            today(),
        );
        let ids: Vec<&str> = pool.iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "e"]);
    }

    #[test]
    fn test_directory_criteria_pushdown() {
        let requester = user("a", Gender::Male);
        let filters = PoolFilters {
            same_school: true,
            ..PoolFilters::default()
        };
        let criteria = directory_criteria(&requester, &filters, 40);
        assert_eq!(criteria.exclude_id, "a");
        assert_eq!(criteria.gender, Some(Gender::Female));
        assert_eq!(criteria.school.as_deref(), Some("Tech"));
        assert_eq!(criteria.program, None);
        assert_eq!(criteria.limit, 40);
    }
}
