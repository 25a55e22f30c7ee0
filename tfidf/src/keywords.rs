//! Keyword salience from corpus-wide scores
//!
//! Each word of a text is scored by the sum of its index scores over all
//! documents. Lower is better here: a word that barely registers across the
//! corpus is taken to be the most specific to the text.

use crate::index::{word_scores, Index};
use crate::tokenizer::tokenize;

/// Score every token of `text`, lowest aggregate score first.
///
/// Tokens are not stopword-filtered and duplicates are kept. Words the index
/// has never seen score `0.0`. Tokens with equal scores stay in text order.
pub fn determine_keywords(index: &Index, text: &str) -> Vec<(String, f64)> {
    let (tokens, _) = tokenize(text);
    let scores = word_scores(index);

    let mut keywords: Vec<(String, f64)> = tokens
        .into_iter()
        .map(|token| {
            let score = scores.get(&token).copied().unwrap_or(0.0);
            (token, score)
        })
        .collect();

    keywords.sort_by(|(_, a), (_, b)| a.total_cmp(b));
    keywords
}
