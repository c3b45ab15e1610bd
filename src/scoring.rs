//! Score computation and ranking.

use serde::Serialize;

use crate::config::types::BuildResult;

/// One ranked row. Field order matches the ranking key so the struct reads
/// the same way the table prints.
#[derive(Clone, Debug, Serialize)]
pub struct ScoreRecord {
    pub ratio: f64,
    pub source_bytes: u64,
    pub diagnostic_bytes: u64,
    pub identifier: String,
}

impl ScoreRecord {
    /// Build a record from a finished build. The ratio is real-valued
    /// division over the exact byte counts.
    pub fn new(identifier: &str, result: &BuildResult) -> Self {
        ScoreRecord {
            ratio: result.diagnostic_bytes as f64 / result.source_bytes as f64,
            source_bytes: result.source_bytes,
            diagnostic_bytes: result.diagnostic_bytes,
            identifier: identifier.to_string(),
        }
    }

    /// Display line: two-decimal ratio, then the exact byte counts. The
    /// rounding is cosmetic; ranking uses the full ratio.
    pub fn display_line(&self) -> String {
        format!(
            "{:.2} {} {} {}",
            self.ratio, self.source_bytes, self.diagnostic_bytes, self.identifier
        )
    }
}

/// Rank records in descending order over the full composite key
/// (ratio, source size, diagnostic size, identifier).
pub fn rank(mut records: Vec<ScoreRecord>) -> Vec<ScoreRecord> {
    records.sort_by(|a, b| {
        b.ratio
            .total_cmp(&a.ratio)
            .then_with(|| b.source_bytes.cmp(&a.source_bytes))
            .then_with(|| b.diagnostic_bytes.cmp(&a.diagnostic_bytes))
            .then_with(|| b.identifier.cmp(&a.identifier))
    });
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(ratio_num: u64, source: u64, identifier: &str) -> ScoreRecord {
        ScoreRecord::new(
            identifier,
            &BuildResult {
                exit_code: Some(1),
                diagnostic_bytes: ratio_num,
                source_bytes: source,
            },
        )
    }

    #[test]
    fn test_ratio_is_real_valued() {
        let r = record(250, 100, "alpha");
        assert!((r.ratio - 2.5).abs() < f64::EPSILON);
        let r = record(1, 3, "third");
        assert!(r.ratio > 0.33 && r.ratio < 0.34);
    }

    #[test]
    fn test_rank_descends_by_ratio_first() {
        let ranked = rank(vec![record(100, 100, "one"), record(300, 100, "three")]);
        let ids: Vec<&str> = ranked.iter().map(|r| r.identifier.as_str()).collect();
        assert_eq!(ids, vec!["three", "one"]);
    }

    #[test]
    fn test_full_tuple_breaks_ties() {
        // Same ratio; larger source wins, then larger diagnostics, then the
        // identifier ordering, all descending.
        let a = record(250, 100, "alpha");
        let b = record(500, 200, "beta");
        let ranked = rank(vec![a, b]);
        let ids: Vec<&str> = ranked.iter().map(|r| r.identifier.as_str()).collect();
        assert_eq!(ids, vec!["beta", "alpha"]);
    }

    #[test]
    fn test_identifier_tiebreak_is_descending() {
        let a = record(250, 100, "alpha");
        let b = record(250, 100, "beta");
        let ranked = rank(vec![a, b]);
        let ids: Vec<&str> = ranked.iter().map(|r| r.identifier.as_str()).collect();
        assert_eq!(ids, vec!["beta", "alpha"]);
    }

    #[test]
    fn test_display_rounds_to_two_decimals() {
        let r = record(1, 3, "third");
        assert_eq!(r.display_line(), "0.33 3 1 third");
        let r = record(250, 100, "alpha");
        assert_eq!(r.display_line(), "2.50 100 250 alpha");
    }
}
