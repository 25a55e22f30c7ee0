//! Coverage penalty for partially matching documents

use super::ScoredResult;
use std::collections::{BTreeMap, BTreeSet};

/// Penalize documents that contain only some of the query words.
///
/// A document containing every word in `query` keeps its score with
/// `diff = 1.0`. Otherwise `diff` is the fraction of query words it is
/// missing, and the score is reduced by that factor: multiplied when the
/// score is non-negative, divided when it is negative. Either way the
/// adjusted score is never above the original. `original` always holds the
/// score before adjustment.
pub fn normalize(query: &BTreeSet<String>, results: &mut BTreeMap<String, ScoredResult>) {
    for result in results.values_mut() {
        result.original = result.score;

        if result.words_contained == *query || query.is_empty() {
            result.diff = 1.0;
            continue;
        }

        let missing = query.difference(&result.words_contained).count();
        result.diff = missing as f64 / query.len() as f64;

        if result.score >= 0.0 {
            result.score *= result.diff;
        } else {
            result.score /= result.diff;
        }
    }
}
