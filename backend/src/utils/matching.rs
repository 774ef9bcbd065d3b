use crate::models::MatchCandidate;
use serde::Serialize;
use std::collections::HashSet;
use uuid::Uuid;

/// A matchmaking hit: another user sharing at least one liked or wishlisted
/// blog with the caller, ranked by the overlap size.
#[derive(Debug, Clone, Serialize)]
pub struct BuddyMatch {
    pub id: Uuid,
    pub name: String,
    pub avatar: String,
    pub trips_completed: i64,
    pub interests: Vec<String>,
    pub common_interests: usize,
}

/// Splits the comma-delimited interests column into clean entries.
pub fn parse_interests(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

/// Pairwise set-intersection scan: candidates with zero overlap are dropped,
/// the rest sorted by descending shared count (ties unordered).
pub fn rank_candidates(
    own_blog_ids: &HashSet<Uuid>,
    candidates: Vec<MatchCandidate>,
) -> Vec<BuddyMatch> {
    let mut matches: Vec<BuddyMatch> = candidates
        .into_iter()
        .filter_map(|candidate| {
            let common = candidate
                .blog_ids
                .iter()
                .filter(|id| own_blog_ids.contains(*id))
                .count();

            (common > 0).then(|| BuddyMatch {
                id: candidate.id,
                name: candidate.name,
                avatar: candidate
                    .avatar
                    .unwrap_or_else(|| "/placeholder.svg".to_string()),
                trips_completed: candidate.trips_completed,
                interests: parse_interests(candidate.interests.as_deref()),
                common_interests: common,
            })
        })
        .collect();

    matches.sort_by(|a, b| b.common_interests.cmp(&a.common_interests));
    matches
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(name: &str, blog_ids: Vec<Uuid>) -> MatchCandidate {
        MatchCandidate {
            id: Uuid::new_v4(),
            name: name.to_string(),
            avatar: None,
            interests: None,
            trips_completed: 0,
            blog_ids,
        }
    }

    #[test]
    fn test_zero_overlap_candidates_dropped() {
        let shared = Uuid::new_v4();
        let own: HashSet<Uuid> = [shared].into();

        let matches = rank_candidates(
            &own,
            vec![
                candidate("match", vec![shared, Uuid::new_v4()]),
                candidate("stranger", vec![Uuid::new_v4()]),
                candidate("empty", vec![]),
            ],
        );

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].name, "match");
        assert_eq!(matches[0].common_interests, 1);
    }

    #[test]
    fn test_sorted_by_descending_overlap() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let c = Uuid::new_v4();
        let own: HashSet<Uuid> = [a, b, c].into();

        let matches = rank_candidates(
            &own,
            vec![
                candidate("one", vec![a]),
                candidate("three", vec![a, b, c]),
                candidate("two", vec![b, c]),
            ],
        );

        let names: Vec<&str> = matches.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["three", "two", "one"]);
        assert_eq!(matches[0].common_interests, 3);
    }

    #[test]
    fn test_empty_own_set_matches_nobody() {
        let own = HashSet::new();
        let matches = rank_candidates(&own, vec![candidate("anyone", vec![Uuid::new_v4()])]);
        assert!(matches.is_empty());
    }

    #[test]
    fn test_candidate_duplicates_count_once() {
        let shared = Uuid::new_v4();
        let own: HashSet<Uuid> = [shared].into();

        // db aggregation dedups, but a duplicate slipping through must not
        // inflate the score past the set-membership semantics
        let matches = rank_candidates(&own, vec![candidate("dup", vec![shared])]);
        assert_eq!(matches[0].common_interests, 1);
    }

    #[test]
    fn test_parse_interests() {
        assert_eq!(
            parse_interests(Some("hiking, food , beaches")),
            vec!["hiking", "food", "beaches"]
        );
        assert_eq!(parse_interests(Some(" , ,")), Vec::<String>::new());
        assert_eq!(parse_interests(None), Vec::<String>::new());
    }
}
