//! Name search over the catalog
//!
//! Matching is a case-insensitive *literal* substring test on the app name:
//! a name matches when its lowercase form contains the lowercase query.
//! Characters such as `.`, `*` or `(` match themselves. [`filter`],
//! [`highlight`] and the catalog service all go through the same [`Matcher`].
//!
//! Highlight spans come from an escaped, case-insensitive regex so they keep
//! the name's original casing. Regex case folding is slightly wider than
//! `to_lowercase` (`σ` folds to `Σ`, which lowercases to `ς` at the end of a
//! word), so spans are only produced for names that pass the filter.

use crate::catalog::AppRecord;
use regex::{Regex, RegexBuilder};

/// Trim a raw query. An empty result means "no filter".
pub fn normalize_query(query: &str) -> &str {
    query.trim()
}

/// Compiled form of a search query
#[derive(Debug, Clone)]
pub struct Matcher {
    kind: MatcherKind,
}

#[derive(Debug, Clone)]
enum MatcherKind {
    Everything,
    Literal {
        lowered: String,
        // None when the query is too large to compile; names still filter
        spans: Option<Regex>,
    },
}

impl Matcher {
    pub fn new(query: &str) -> Self {
        let needle = normalize_query(query);
        if needle.is_empty() {
            return Self { kind: MatcherKind::Everything };
        }

        let spans = match RegexBuilder::new(&regex::escape(needle))
            .case_insensitive(true)
            .build()
        {
            Ok(re) => Some(re),
            Err(e) => {
                tracing::warn!(len = needle.len(), error = %e, "query too large to highlight");
                None
            }
        };
        Self {
            kind: MatcherKind::Literal {
                lowered: needle.to_lowercase(),
                spans,
            },
        }
    }

    /// True when the query is empty and everything matches
    pub fn is_empty(&self) -> bool {
        matches!(self.kind, MatcherKind::Everything)
    }

    pub fn is_match(&self, text: &str) -> bool {
        match &self.kind {
            MatcherKind::Everything => true,
            MatcherKind::Literal { lowered, .. } => text.to_lowercase().contains(lowered.as_str()),
        }
    }

    /// Split `text` into matched / unmatched segments, scanning left to right
    /// without overlaps.
    pub fn segments<'t>(&self, text: &'t str) -> Vec<Segment<'t>> {
        let re = match &self.kind {
            MatcherKind::Literal { spans: Some(re), .. } if self.is_match(text) => re,
            _ => return vec![Segment::plain(text)],
        };

        let mut segments = Vec::new();
        let mut last = 0;
        for m in re.find_iter(text) {
            if m.start() > last {
                segments.push(Segment::plain(&text[last..m.start()]));
            }
            segments.push(Segment::matched(m.as_str()));
            last = m.end();
        }
        if last < text.len() {
            segments.push(Segment::plain(&text[last..]));
        }
        if segments.is_empty() {
            segments.push(Segment::plain(text));
        }
        segments
    }

    /// Apply the matcher to a record list, keeping original order
    pub fn filter<'r>(&self, records: &'r [AppRecord]) -> Vec<&'r AppRecord> {
        records.iter().filter(|r| self.is_match(&r.name)).collect()
    }
}

/// Piece of highlighted text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'t> {
    pub text: &'t str,
    pub is_match: bool,
}

impl<'t> Segment<'t> {
    fn plain(text: &'t str) -> Self {
        Self { text, is_match: false }
    }

    fn matched(text: &'t str) -> Self {
        Self { text, is_match: true }
    }
}

/// Does `name` contain `query` (trimmed, case-insensitive, literal)?
pub fn matches(name: &str, query: &str) -> bool {
    Matcher::new(query).is_match(name)
}

/// Records whose name contains the query, in their original order.
/// An empty query returns every record.
pub fn filter(records: &[AppRecord], query: &str) -> Vec<AppRecord> {
    Matcher::new(query)
        .filter(records)
        .into_iter()
        .cloned()
        .collect()
}

/// Split `text` on case-insensitive occurrences of `query`.
pub fn highlight<'t>(text: &'t str, query: &str) -> Vec<Segment<'t>> {
    Matcher::new(query).segments(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(records: &[AppRecord]) -> Vec<&str> {
        records.iter().map(|r| r.name.as_str()).collect()
    }

    fn sample() -> Vec<AppRecord> {
        vec![
            AppRecord::new(1, "Agriculture API", "https://agri.example/api"),
            AppRecord::new(2, "Academy App", "https://academy.example/api"),
            AppRecord::new(3, "Weather", "https://weather.example/api"),
        ]
    }

    #[test]
    fn filter_finds_academy() {
        let out = filter(&sample(), "aca");
        assert_eq!(names(&out), vec!["Academy App"]);
    }

    #[test]
    fn empty_query_keeps_everything() {
        let records: Vec<AppRecord> = (0..5)
            .map(|i| AppRecord::new(i, format!("App {}", i), "https://x.example"))
            .collect();
        assert_eq!(filter(&records, ""), records);
        assert_eq!(filter(&records, "   "), records);
    }

    #[test]
    fn query_is_trimmed() {
        assert_eq!(names(&filter(&sample(), "  weath  ")), vec!["Weather"]);
    }

    #[test]
    fn query_is_case_insensitive() {
        assert_eq!(filter(&sample(), "API"), filter(&sample(), "api"));
        assert_eq!(names(&filter(&sample(), "API")), vec!["Agriculture API"]);
    }

    #[test]
    fn pattern_characters_are_literal() {
        let records = vec![
            AppRecord::new(1, "C++ Tools", "https://cpp.example"),
            AppRecord::new(2, "Cxx Tools", "https://cxx.example"),
            AppRecord::new(3, "Price (USD)", "https://usd.example"),
        ];
        assert_eq!(names(&filter(&records, "c++")), vec!["C++ Tools"]);
        assert_eq!(names(&filter(&records, "(usd")), vec!["Price (USD)"]);
        assert!(filter(&records, ".*").is_empty());
        assert!(filter(&records, "[").is_empty());
    }

    #[test]
    fn highlight_marks_term() {
        assert_eq!(
            highlight("search term", "term"),
            vec![
                Segment { text: "search ", is_match: false },
                Segment { text: "term", is_match: true },
            ]
        );
    }

    #[test]
    fn highlight_empty_query_is_single_plain_segment() {
        assert_eq!(
            highlight("Weather", " "),
            vec![Segment { text: "Weather", is_match: false }]
        );
    }

    #[test]
    fn highlight_scans_without_overlap() {
        assert_eq!(
            highlight("aaa", "aa"),
            vec![
                Segment { text: "aa", is_match: true },
                Segment { text: "a", is_match: false },
            ]
        );
        assert_eq!(
            highlight("aaaa", "aa"),
            vec![
                Segment { text: "aa", is_match: true },
                Segment { text: "aa", is_match: true },
            ]
        );
    }

    #[test]
    fn highlight_keeps_original_case() {
        let segments = highlight("Academy App", "a");
        let matched: Vec<&str> = segments
            .iter()
            .filter(|s| s.is_match)
            .map(|s| s.text)
            .collect();
        assert_eq!(matched, vec!["A", "a", "A"]);
    }

    #[test]
    fn highlight_empty_text() {
        assert_eq!(highlight("", "term"), vec![Segment { text: "", is_match: false }]);
    }

    #[test]
    fn matching_follows_lowercase_containment() {
        // "ΟΔΟΣ" lowercases to "οδος" with a final sigma, which has no "σ"
        let records = vec![
            AppRecord::new(1, "ΟΔΟΣ", "https://odos.example"),
            AppRecord::new(2, "Σοφία", "https://sofia.example"),
        ];
        assert_eq!(names(&filter(&records, "σ")), vec!["Σοφία"]);
        assert_eq!(
            highlight("ΟΔΟΣ", "σ"),
            vec![Segment { text: "ΟΔΟΣ", is_match: false }]
        );
        assert_eq!(highlight("Σοφία", "σ")[0], Segment { text: "Σ", is_match: true });
    }

    #[test]
    fn long_query_filters() {
        let long = "a".repeat(5_000);
        let records = vec![
            AppRecord::new(1, long.clone(), "https://long.example"),
            AppRecord::new(2, "short", "https://short.example"),
        ];
        assert_eq!(filter(&records, &long).len(), 1);
    }

    #[test]
    fn matcher_is_empty_for_blank_query() {
        assert!(Matcher::new("").is_empty());
        assert!(Matcher::new("\t ").is_empty());
        assert!(!Matcher::new("a").is_empty());
        assert!(matches("Anything", ""));
    }
}
