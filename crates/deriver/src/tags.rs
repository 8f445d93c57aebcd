use std::collections::{HashMap, HashSet};

use normalizer::IssueRecord;
use serde::{Deserialize, Serialize};

/// Entry of `tags.json`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    pub count: u64,
}

/// Counts lower-cased labels across published records, skipping any case
/// variant of the marker. Each record counts at most once per name. Sorted by
/// descending count, ties in first-seen order.
pub fn aggregate_tags(published: &[&IssueRecord], marker: &str) -> Vec<Tag> {
    let marker = marker.to_lowercase();
    let mut tags: Vec<Tag> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for record in published {
        let mut seen = HashSet::new();
        for label in &record.labels {
            let name = label.name.to_lowercase();
            if name == marker || !seen.insert(name.clone()) {
                continue;
            }
            match index.get(&name) {
                Some(&slot) => tags[slot].count += 1,
                None => {
                    index.insert(name.clone(), tags.len());
                    tags.push(Tag { name, count: 1 });
                }
            }
        }
    }

    // stable: equal counts keep insertion order
    tags.sort_by(|a, b| b.count.cmp(&a.count));
    tags
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use normalizer::{Author, Label};

    fn record(id: i64, labels: &[&str]) -> IssueRecord {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        IssueRecord {
            id,
            title: format!("post {id}"),
            body: None,
            created_at: ts,
            updated_at: ts,
            labels: labels
                .iter()
                .map(|name| Label {
                    name: name.to_string(),
                })
                .collect(),
            user: Author {
                login: "alice".into(),
                avatar_url: String::new(),
            },
        }
    }

    fn tag(name: &str, count: u64) -> Tag {
        Tag {
            name: name.into(),
            count,
        }
    }

    #[test]
    fn marker_is_excluded_and_names_lowercased() {
        let records = [record(1, &["Release", "Rust"]), record(2, &["Release", "rust", "Go"])];
        let published: Vec<_> = records.iter().collect();
        assert_eq!(
            aggregate_tags(&published, "Release"),
            vec![tag("rust", 2), tag("go", 1)]
        );
    }

    #[test]
    fn case_variants_on_one_post_count_once() {
        let records = [record(1, &["Release", "Go", "go"])];
        let published: Vec<_> = records.iter().collect();
        assert_eq!(aggregate_tags(&published, "Release"), vec![tag("go", 1)]);
    }

    #[test]
    fn ties_keep_first_seen_order() {
        let records = [
            record(1, &["Release", "zeta", "alpha"]),
            record(2, &["Release", "mid"]),
            record(3, &["Release", "mid"]),
        ];
        let published: Vec<_> = records.iter().collect();
        assert_eq!(
            aggregate_tags(&published, "Release"),
            vec![tag("mid", 2), tag("zeta", 1), tag("alpha", 1)]
        );
    }

    #[test]
    fn marker_case_variants_are_not_tags() {
        let records = [record(1, &["Release", "release", "go"]), record(2, &["Release"])];
        let published: Vec<_> = records.iter().collect();
        assert_eq!(aggregate_tags(&published, "Release"), vec![tag("go", 1)]);
    }

    #[test]
    fn counts_match_posts_carrying_the_tag() {
        let records = [
            record(1, &["Release", "RELEASE", "Rust"]),
            record(2, &["Release", "rust", "Go", "go"]),
            record(3, &["Release"]),
        ];
        let published: Vec<_> = records.iter().collect();
        let tags = aggregate_tags(&published, "Release");
        assert!(!tags.is_empty());
        for tag in &tags {
            let carrying = published
                .iter()
                .filter(|record| {
                    record
                        .labels
                        .iter()
                        .any(|label| label.name.eq_ignore_ascii_case(&tag.name))
                })
                .count() as u64;
            assert_eq!(tag.count, carrying, "tag {}", tag.name);
        }
    }

    #[test]
    fn empty_input_gives_empty_index() {
        assert!(aggregate_tags(&[], "Release").is_empty());
    }
}
