//! Split-level filtering.
use super::Filter;
use crate::extraction::Extraction;

/// Keeps extractions that produced rows and whose match rate is above [MatchRate::min_rate].
///
/// A low match rate usually means the join degenerated (e.g. a wrong treebank for the language).
///
/// [MatchRate::min_rate] is 5% by default.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchRate {
    min_rate: f64,
}

impl MatchRate {
    /// specify a minimum match rate, in percent.
    pub fn with_min_rate(min_rate: f64) -> Self {
        Self { min_rate }
    }

    /// Get a reference to the match rate filter's minimum rate.
    pub fn min_rate(&self) -> &f64 {
        &self.min_rate
    }
}

impl Default for MatchRate {
    fn default() -> Self {
        MatchRate { min_rate: 5.0 }
    }
}

impl Filter<&Extraction> for MatchRate {
    fn detect(&self, extraction: &Extraction) -> bool {
        !extraction.rows.is_empty() && extraction.match_rate() > self.min_rate
    }
}

#[cfg(test)]
mod tests {
    use super::{Filter, MatchRate};
    use crate::extraction::{ExtractedRow, Extraction};

    fn extraction(nb_rows: usize, total: usize) -> Extraction {
        let row = ExtractedRow {
            sentence: "a b".to_string(),
            head: "b".to_string(),
            head_index: 1,
            value: "Sing".to_string(),
            distance: -1,
            dependent: "a".to_string(),
            dependent_index: 0,
            relation: "nsubj".to_string(),
            nb_tokens: 2,
        };
        Extraction {
            rows: vec![row; nb_rows],
            observed: ["Sing"].into_iter().collect(),
            matched: nb_rows,
            total,
        }
    }

    #[test]
    fn default_threshold() {
        let f = MatchRate::default();
        assert_eq!(f.min_rate(), &5.0);
        assert_eq!(false, f.detect(&extraction(3, 100)));
        assert_eq!(true, f.detect(&extraction(6, 100)));
    }

    #[test]
    fn at_threshold_is_discarded() {
        let f = MatchRate::default();
        assert_eq!(false, f.detect(&extraction(5, 100)));
        assert_eq!(false, f.detect(&extraction(0, 0)));
    }

    #[test]
    fn custom_threshold() {
        let f = MatchRate::with_min_rate(0.0);
        assert_eq!(true, f.detect(&extraction(1, 100)));
        assert_eq!(false, f.detect(&extraction(0, 100)));
    }
}
