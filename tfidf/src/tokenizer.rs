//! Word tokenizer shared by indexing, querying and keyword extraction
//!
//! Text is lowercased first, then every maximal run of Unicode word
//! characters (letters, digits, underscore) plus apostrophe and backtick is
//! taken as a token, in the order it appears.

use regex::Regex;
use std::sync::LazyLock;

static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\w'`]+").expect("token pattern is a valid regex"));

/// Split `text` into lowercase tokens.
///
/// Returns the token sequence together with its length.
///
/// # Examples
/// ```
/// use tfidf::tokenize;
///
/// let (tokens, count) = tokenize("The Cat's hat, the CAT!");
/// assert_eq!(tokens, vec!["the", "cat's", "hat", "the", "cat"]);
/// assert_eq!(count, 5);
/// ```
pub fn tokenize(text: &str) -> (Vec<String>, usize) {
    let lowered = text.to_lowercase();
    let tokens: Vec<String> = TOKEN_RE
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect();
    let count = tokens.len();
    (tokens, count)
}
