//! Top-content leaderboard

use serde::Serialize;

use super::period::{MatchMode, PeriodKey};
use crate::models::PageRecord;

/// Leaderboard size shown on the dashboard
pub const TOP_CONTENT_LIMIT: usize = 10;

/// Pages of one site and period, ascending by position, at most `limit`
///
/// The sort is stable: rows sharing a position keep their input order.
pub fn top_content<'a>(
    pages: &'a [PageRecord],
    site: &str,
    period: PeriodKey,
    limit: usize,
    mode: MatchMode,
) -> Vec<&'a PageRecord> {
    let mut ranked: Vec<&PageRecord> = pages
        .iter()
        .filter(|page| page.site.trim() == site && period.matches(&page.date, mode))
        .collect();
    ranked.sort_by_key(|page| page.position);
    ranked.truncate(limit);
    ranked
}

/// Rank change class derived from a page's evolution marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EvolutionClass {
    New,
    Up,
    Down,
    Stable,
}

impl EvolutionClass {
    /// "new" is a new entry; signed integers go up or down; anything else is stable
    pub fn classify(marker: &str) -> Self {
        let marker = marker.trim();
        if marker.eq_ignore_ascii_case("new") {
            return Self::New;
        }
        let digits = marker.strip_prefix('+').unwrap_or(marker);
        match digits.parse::<i64>() {
            Ok(change) if change > 0 => Self::Up,
            Ok(change) if change < 0 => Self::Down,
            _ => Self::Stable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(site: &str, date: &str, position: u32, title: &str) -> PageRecord {
        PageRecord {
            site: site.to_string(),
            date: date.to_string(),
            position,
            title: title.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_truncates_to_limit_in_position_order() {
        let pages: Vec<PageRecord> = (1..=15)
            .rev()
            .map(|p| page("FA", "2025-01", p, &format!("page {p}")))
            .collect();

        let top = top_content(
            &pages,
            "FA",
            PeriodKey::parse("2025-01").unwrap(),
            TOP_CONTENT_LIMIT,
            MatchMode::Exact,
        );
        let positions: Vec<u32> = top.iter().map(|p| p.position).collect();
        assert_eq!(positions, (1..=10).collect::<Vec<_>>());
    }

    #[test]
    fn test_filters_site_and_granularity() {
        let pages = vec![
            page("FA", "2025", 2, "year two"),
            page("FA", "2025-03", 1, "march one"),
            page("AP", "2025", 1, "other site"),
            page("FA", "2025", 1, "year one"),
        ];
        let year = PeriodKey::Year(2025);

        let exact = top_content(&pages, "FA", year, 10, MatchMode::Exact);
        let titles: Vec<&str> = exact.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["year one", "year two"]);

        let prefix = top_content(&pages, "FA", year, 10, MatchMode::Prefix);
        assert_eq!(prefix.len(), 3);
    }

    #[test]
    fn test_ties_keep_input_order_and_short_lists_are_fine() {
        let pages = vec![
            page("FA", "2025-01", 2, "first"),
            page("FA", "2025-01", 1, "top"),
            page("FA", "2025-01", 2, "second"),
        ];

        let top = top_content(
            &pages,
            "FA",
            PeriodKey::parse("2025-01").unwrap(),
            10,
            MatchMode::Exact,
        );
        let titles: Vec<&str> = top.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["top", "first", "second"]);
    }

    #[test]
    fn test_evolution_classes() {
        assert_eq!(EvolutionClass::classify("new"), EvolutionClass::New);
        assert_eq!(EvolutionClass::classify("NEW"), EvolutionClass::New);
        assert_eq!(EvolutionClass::classify("+3"), EvolutionClass::Up);
        assert_eq!(EvolutionClass::classify("2"), EvolutionClass::Up);
        assert_eq!(EvolutionClass::classify("-4"), EvolutionClass::Down);
        assert_eq!(EvolutionClass::classify("0"), EvolutionClass::Stable);
        assert_eq!(EvolutionClass::classify("="), EvolutionClass::Stable);
        assert_eq!(EvolutionClass::classify(""), EvolutionClass::Stable);
        assert_eq!(EvolutionClass::classify("up a bit"), EvolutionClass::Stable);
    }
}
