//! Derived statistics over an immutable set of visit records.
//!
//! Every function here is total and deterministic: output order never
//! depends on hash map iteration, only on the input order and explicit
//! stable sorts.

use crate::history::VisitEntry;
use fxhash::FxHashMap;
use std::collections::BTreeMap;

/// Per-domain entry counts in first-encounter order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainFrequency {
    counts: Vec<(String, usize)>,
    index: FxHashMap<String, usize>,
}

impl DomainFrequency {
    fn add(&mut self, domain: String) {
        if let Some(&i) = self.index.get(&domain) {
            self.counts[i].1 += 1;
        } else {
            self.index.insert(domain.clone(), self.counts.len());
            self.counts.push((domain, 1));
        }
    }

    #[cfg(test)]
    pub fn get(&self, domain: &str) -> usize {
        self.index.get(domain).map_or(0, |&i| self.counts[i].1)
    }

    /// Number of unique domains
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.counts.iter().map(|(d, c)| (d.as_str(), *c))
    }

    /// Up to `n` domains by descending count; ties keep encounter order.
    pub fn top(&self, n: usize) -> Vec<(&str, usize)> {
        let mut sorted: Vec<_> = self.iter().collect();
        sorted.sort_by(|a, b| b.1.cmp(&a.1));
        sorted.truncate(n);
        sorted
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverviewStats {
    pub total_entries: usize,
    pub total_visit_count: u64,
    pub domain_frequency: DomainFrequency,
}

/// One row of the domain ranking
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainRank {
    pub domain: String,
    pub visits: u64,
    pub entries: usize,
    /// First non-empty title seen for the domain. Carried with the ranking
    /// so callers get the whole domain visit map; the Top Sites view only
    /// shows counts.
    #[allow(dead_code)]
    pub title: String,
}

pub fn compute_overview_stats(entries: &[VisitEntry]) -> OverviewStats {
    let mut stats = OverviewStats {
        total_entries: entries.len(),
        ..OverviewStats::default()
    };
    for entry in entries {
        stats.total_visit_count += entry.visit_count;
        stats.domain_frequency.add(extract_domain(&entry.url));
    }
    stats
}

/// Host portion of a URL without scheme or leading `www.`, lowercased.
///
/// A heuristic, not a URL parser: it never fails and at worst returns the
/// whole (lowercased) input. Applying it to its own output is a no-op.
pub fn extract_domain(url: &str) -> String {
    let rest = url
        .strip_prefix("http://")
        .or_else(|| url.strip_prefix("https://"))
        .unwrap_or(url)
        .to_lowercase();

    let mut host = rest.as_str();
    while let Some(stripped) = host.strip_prefix("www.") {
        host = stripped;
    }

    match host.split_once('/') {
        Some((head, _)) => head.to_string(),
        None => host.to_string(),
    }
}

/// Entries bucketed by calendar date (`YYYY-MM-DD` in each record's own
/// offset). Keys iterate ascending; each bucket keeps input order.
pub fn group_by_date(entries: &[VisitEntry]) -> BTreeMap<String, Vec<&VisitEntry>> {
    let mut groups: BTreeMap<String, Vec<&VisitEntry>> = BTreeMap::new();
    for entry in entries {
        let date = entry.visit_time.format("%Y-%m-%d").to_string();
        groups.entry(date).or_default().push(entry);
    }
    groups
}

/// Domains by descending summed `visit_count`; ties keep encounter order.
pub fn rank_domains(entries: &[VisitEntry]) -> Vec<DomainRank> {
    let mut ranks: Vec<DomainRank> = Vec::new();
    let mut index: FxHashMap<String, usize> = FxHashMap::default();

    for entry in entries {
        let domain = extract_domain(&entry.url);
        let i = match index.get(&domain) {
            Some(&i) => i,
            None => {
                index.insert(domain.clone(), ranks.len());
                ranks.push(DomainRank {
                    domain,
                    visits: 0,
                    entries: 0,
                    title: String::new(),
                });
                ranks.len() - 1
            }
        };
        let rank = &mut ranks[i];
        rank.visits += entry.visit_count;
        rank.entries += 1;
        if rank.title.is_empty() {
            rank.title.clone_from(&entry.title);
        }
    }

    // sort_by is stable
    ranks.sort_by(|a, b| b.visits.cmp(&a.visits));
    ranks
}

/// Most recent first; equal timestamps keep input order.
pub fn sort_by_recency(entries: &[VisitEntry]) -> Vec<&VisitEntry> {
    let mut sorted: Vec<&VisitEntry> = entries.iter().collect();
    sorted.sort_by(|a, b| b.visit_time.cmp(&a.visit_time));
    sorted
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::{DateTime, FixedOffset, TimeZone};

    pub(crate) fn at(day: u32, hour: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2024, 3, day, hour, 0, 0)
            .unwrap()
    }

    pub(crate) fn entry(url: &str, title: &str, visits: u64, time: DateTime<FixedOffset>) -> VisitEntry {
        VisitEntry {
            url: url.to_string(),
            title: title.to_string(),
            visit_count: visits,
            visit_time: time,
        }
    }

    #[test]
    fn test_extract_domain_strips_scheme_and_www() {
        assert_eq!(extract_domain("https://www.example.com/a"), "example.com");
        assert_eq!(extract_domain("http://News.Ycombinator.com/item?id=1"), "news.ycombinator.com");
        assert_eq!(extract_domain("https://docs.rs"), "docs.rs");
    }

    #[test]
    fn test_extract_domain_degrades_gracefully() {
        assert_eq!(extract_domain("localhost"), "localhost");
        assert_eq!(extract_domain(""), "");
        assert_eq!(extract_domain("file:///etc/hosts"), "file:");
        // scheme match is case-sensitive
        assert_eq!(extract_domain("HTTPS://Example.com/x"), "https:");
    }

    #[test]
    fn test_extract_domain_is_idempotent() {
        let urls = [
            "https://www.example.com/a",
            "http://www.www.nested.org/",
            "HTTPS://WWW.Shout.com/",
            "ftp://files.example.com/pub",
            "https://http://weird",
            "www.bare.net",
            "",
        ];
        for url in urls {
            let once = extract_domain(url);
            assert_eq!(extract_domain(&once), once, "not idempotent for {url}");
        }
    }

    #[test]
    fn test_overview_stats_for_single_domain() {
        let entries = vec![
            entry("https://www.example.com/a", "A", 5, at(1, 9)),
            entry("https://www.example.com/a", "A", 3, at(1, 10)),
            entry("https://www.example.com/a", "A", 2, at(2, 11)),
        ];
        let stats = compute_overview_stats(&entries);
        assert_eq!(stats.total_entries, 3);
        assert_eq!(stats.total_visit_count, 10);
        assert_eq!(stats.domain_frequency.get("example.com"), 3);
        assert_eq!(stats.domain_frequency.len(), 1);
    }

    #[test]
    fn test_overview_stats_empty() {
        let stats = compute_overview_stats(&[]);
        assert_eq!(stats.total_entries, 0);
        assert_eq!(stats.total_visit_count, 0);
        assert!(stats.domain_frequency.is_empty());
        assert!(stats.domain_frequency.top(8).is_empty());
    }

    #[test]
    fn test_domain_frequency_counts_entries_not_visits() {
        let entries = vec![
            entry("https://a.com/1", "", 100, at(1, 1)),
            entry("https://b.com/1", "", 1, at(1, 2)),
            entry("https://b.com/2", "", 1, at(1, 3)),
        ];
        let stats = compute_overview_stats(&entries);
        let top = stats.domain_frequency.top(8);
        assert_eq!(top, vec![("b.com", 2), ("a.com", 1)]);
    }

    #[test]
    fn test_domain_frequency_top_is_stable_and_bounded() {
        let entries: Vec<_> = (0..10)
            .map(|i| entry(&format!("https://site{i}.com/"), "", 1, at(1, 1)))
            .collect();
        let stats = compute_overview_stats(&entries);
        let top = stats.domain_frequency.top(8);
        assert_eq!(top.len(), 8);
        assert_eq!(top[0].0, "site0.com");
        assert_eq!(top[7].0, "site7.com");
    }

    #[test]
    fn test_group_by_date_preserves_order_within_day() {
        let entries = vec![
            entry("https://x.com/late", "late", 1, at(2, 20)),
            entry("https://y.com/", "y", 1, at(1, 8)),
            entry("https://x.com/early", "early", 1, at(2, 6)),
        ];
        let groups = group_by_date(&entries);
        let dates: Vec<_> = groups.keys().cloned().collect();
        assert_eq!(dates, vec!["2024-03-01", "2024-03-02"]);
        let titles: Vec<_> = groups["2024-03-02"].iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["late", "early"]);
    }

    #[test]
    fn test_group_by_date_uses_record_offset() {
        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
        let t = tokyo.with_ymd_and_hms(2024, 3, 2, 1, 0, 0).unwrap();
        let entries = vec![entry("https://a.com/", "", 1, t)];
        let groups = group_by_date(&entries);
        // 2024-03-01T16:00Z, but the record's own date is the 2nd
        assert!(groups.contains_key("2024-03-02"));
    }

    #[test]
    fn test_rank_domains_sorted_descending() {
        let entries = vec![
            entry("https://small.com/", "Small", 1, at(1, 1)),
            entry("https://big.com/a", "", 10, at(1, 2)),
            entry("https://big.com/b", "Big B", 5, at(1, 3)),
            entry("https://mid.com/", "Mid", 7, at(1, 4)),
        ];
        let ranks = rank_domains(&entries);
        let order: Vec<_> = ranks.iter().map(|r| r.domain.as_str()).collect();
        assert_eq!(order, vec!["big.com", "mid.com", "small.com"]);
        assert_eq!(ranks[0].visits, 15);
        assert_eq!(ranks[0].entries, 2);
        assert_eq!(ranks[0].title, "Big B");
    }

    #[test]
    fn test_rank_domains_ties_keep_encounter_order() {
        let entries = vec![
            entry("https://zeta.com/", "", 4, at(1, 1)),
            entry("https://alpha.com/", "", 4, at(1, 2)),
            entry("https://top.com/", "", 9, at(1, 3)),
        ];
        let order: Vec<_> = rank_domains(&entries).into_iter().map(|r| r.domain).collect();
        assert_eq!(order, vec!["top.com", "zeta.com", "alpha.com"]);

        let swapped = vec![entries[1].clone(), entries[0].clone(), entries[2].clone()];
        let order: Vec<_> = rank_domains(&swapped).into_iter().map(|r| r.domain).collect();
        assert_eq!(order, vec!["top.com", "alpha.com", "zeta.com"]);
    }

    #[test]
    fn test_sort_by_recency_is_stable_and_non_mutating() {
        let entries = vec![
            entry("https://a.com/", "first-tie", 1, at(5, 12)),
            entry("https://b.com/", "oldest", 1, at(1, 12)),
            entry("https://c.com/", "second-tie", 1, at(5, 12)),
            entry("https://d.com/", "newest", 1, at(9, 12)),
        ];
        let before = entries.clone();
        let titles: Vec<_> = sort_by_recency(&entries)
            .iter()
            .map(|e| e.title.as_str())
            .collect();
        assert_eq!(titles, vec!["newest", "first-tie", "second-tie", "oldest"]);
        assert_eq!(entries, before);
    }

    #[test]
    fn test_aggregates_are_deterministic() {
        let entries: Vec<_> = (0..50)
            .map(|i| entry(&format!("https://d{}.com/{i}", i % 7), "", (i % 5) as u64, at(1 + i % 9, 3)))
            .collect();
        assert_eq!(rank_domains(&entries), rank_domains(&entries));
        assert_eq!(compute_overview_stats(&entries), compute_overview_stats(&entries));
        assert_eq!(group_by_date(&entries), group_by_date(&entries));
    }
}
