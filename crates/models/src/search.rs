use serde::{Deserialize, Serialize};
use std::{cmp::Reverse, collections::VecDeque};
use strum::{AsRefStr, EnumString};

/// Queries shorter than this (in characters) return nothing
pub const MIN_QUERY_CHARS: usize = 2;

/// Maximum number of ranked results returned
pub const MAX_RESULTS: usize = 15;

/// Suggested caller-side debounce between keystrokes and a search
pub const DEBOUNCE_MS: u64 = 300;

/// How many recent queries a session remembers
pub const RECENT_CAPACITY: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EntityType {
    University,
    Faculty,
    Program,
}

impl EntityType {
    /// Tie-break priority, higher ranks first
    fn priority(self) -> u8 {
        match self {
            Self::University => 3,
            Self::Faculty => 2,
            Self::Program => 1,
        }
    }
}

/// Something that can be found by name
#[derive(Debug, Clone, PartialEq)]
pub struct SearchCandidate {
    pub id: String,
    pub entity_type: EntityType,
    pub name: String,
    pub name_en: Option<String>,
    pub subtitle: String,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub id: String,
    pub entity_type: EntityType,
    pub name: String,
    pub subtitle: String,
    pub path: String,
    pub score: u8,
}

/// True if every character of `query` appears in `text` in order
pub fn fuzzy_match(text: &str, query: &str) -> bool {
    let text = text.to_lowercase();
    let query = query.to_lowercase();

    if text.contains(&query) {
        return true;
    }

    let mut wanted = query.chars().peekable();
    for c in text.chars() {
        if wanted.peek() == Some(&c) {
            wanted.next();
        }
    }
    wanted.peek().is_none()
}

/// Scores how well `text` matches `query`, or `None` if it does not match at all
pub fn match_score(text: &str, query: &str) -> Option<u8> {
    let text_lower = text.to_lowercase();
    let query_lower = query.to_lowercase();

    if text_lower == query_lower {
        Some(100)
    } else if text_lower.starts_with(&query_lower) {
        Some(90)
    } else if text_lower.contains(&query_lower) {
        Some(70)
    } else if fuzzy_match(&text_lower, &query_lower) {
        Some(50)
    } else {
        None
    }
}

/// Ranks candidates against `query`. Name and English name both count; the better score wins.
pub fn rank(candidates: impl IntoIterator<Item = SearchCandidate>, query: &str) -> Vec<SearchHit> {
    let query = query.trim();
    if query.chars().count() < MIN_QUERY_CHARS {
        return vec![];
    }

    let mut hits: Vec<SearchHit> = candidates
        .into_iter()
        .filter_map(|candidate| {
            let score = [Some(candidate.name.as_str()), candidate.name_en.as_deref()]
                .into_iter()
                .flatten()
                .filter_map(|name| match_score(name, query))
                .max()?;

            Some(SearchHit {
                id: candidate.id,
                entity_type: candidate.entity_type,
                name: candidate.name,
                subtitle: candidate.subtitle,
                path: candidate.path,
                score,
            })
        })
        .collect();

    // Stable sort keeps fetch order among equal scores of the same type
    hits.sort_by_key(|hit| (Reverse(hit.score), Reverse(hit.entity_type.priority())));
    hits.truncate(MAX_RESULTS);
    hits
}

/// Most-recently-used list of selected queries, newest first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecentSearches {
    entries: VecDeque<String>,
}

impl RecentSearches {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a query, moving it to the front if already present
    pub fn record(&mut self, query: &str) {
        let query = query.trim();
        if query.is_empty() {
            return;
        }

        self.entries.retain(|q| q != query);
        self.entries.push_front(query.to_string());
        self.entries.truncate(RECENT_CAPACITY);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn candidate(id: &str, entity_type: EntityType, name: &str) -> SearchCandidate {
        SearchCandidate {
            id: id.to_string(),
            entity_type,
            name: name.to_string(),
            name_en: None,
            subtitle: String::new(),
            path: format!("/{}/{id}", entity_type.as_ref()),
        }
    }

    #[test]
    fn test_fuzzy_match() {
        assert!(fuzzy_match("Computer Engineering", "cmpeng"));
        assert!(fuzzy_match("Kasetsart", "SART"));
        assert!(!fuzzy_match("Kasetsart", "trask"));
        assert!(fuzzy_match("วิศวกรรมคอมพิวเตอร์", "วศคอม"));
    }

    #[test]
    fn test_match_score_tiers() {
        assert_eq!(match_score("Kasetsart", "kasetsart"), Some(100));
        assert_eq!(match_score("Kasetsart University", "kaset"), Some(90));
        assert_eq!(match_score("Kasetsart University", "univ"), Some(70));
        assert_eq!(match_score("Kasetsart University", "ksu"), Some(50));
        assert_eq!(match_score("Kasetsart University", "xyz"), None);
    }

    #[test]
    fn test_short_query_is_noop() {
        let hits = rank([candidate("1", EntityType::University, "ก")], "ก");
        assert!(hits.is_empty());

        let hits = rank([candidate("1", EntityType::University, "ab")], " a ");
        assert!(hits.is_empty());
    }

    #[test]
    fn test_prefix_university_outranks_substring_program() {
        let hits = rank(
            [
                candidate("p1", EntityType::Program, "หลักสูตรร่วมจุฬาและมหิดล"),
                candidate("u1", EntityType::University, "จุฬาลงกรณ์มหาวิทยาลัย"),
            ],
            "จุฬา",
        );

        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].id, "u1");
        assert_eq!(hits[0].score, 90);
        assert_eq!(hits[1].score, 70);
    }

    #[test]
    fn test_ties_break_by_entity_type() {
        let hits = rank(
            [
                candidate("p", EntityType::Program, "Engineering"),
                candidate("f", EntityType::Faculty, "Engineering"),
                candidate("u", EntityType::University, "Engineering"),
            ],
            "engineering",
        );

        let order: Vec<_> = hits.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(order, vec!["u", "f", "p"]);
    }

    #[test]
    fn test_english_name_matches() {
        let mut uni = candidate("u", EntityType::University, "มหาวิทยาลัยเกษตรศาสตร์");
        uni.name_en = Some("Kasetsart University".to_string());

        let hits = rank([uni], "kasetsart");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].score, 90);
    }

    #[test]
    fn test_results_are_capped() {
        let candidates =
            (0..40).map(|i| candidate(&i.to_string(), EntityType::Program, &format!("Program {i}")));
        assert_eq!(rank(candidates, "program").len(), MAX_RESULTS);
    }

    #[test]
    fn test_recent_searches() {
        let mut recent = RecentSearches::new();
        for q in ["a1", "b2", "c3", "d4", "e5", "f6"] {
            recent.record(q);
        }
        assert_eq!(recent.len(), RECENT_CAPACITY);
        assert_eq!(recent.iter().next(), Some("f6"));
        assert!(!recent.iter().any(|q| q == "a1"));

        recent.record("c3");
        let order: Vec<_> = recent.iter().collect();
        assert_eq!(order, vec!["c3", "f6", "e5", "d4", "b2"]);

        recent.record("   ");
        assert_eq!(recent.len(), RECENT_CAPACITY);
    }
}
