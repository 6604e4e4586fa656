//! Tolerant text matching for the dropdown search box.
//!
//! A candidate matches a query when, ignoring case, the query is a substring of
//! it, its characters appear in order inside it, or the two are close enough by
//! Jaro-Winkler similarity to absorb a typo or transposition.

use strsim::jaro_winkler;

/// Default minimum Jaro-Winkler similarity for a typo-tolerant match
pub const DEFAULT_THRESHOLD: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuzzyMatcher {
    /// Minimum similarity (0.0 - 1.0) for the similarity fallback
    threshold: f64,
}

impl Default for FuzzyMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

impl FuzzyMatcher {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Does `candidate` satisfy `query`? An empty (or blank) query matches everything.
    pub fn is_match(&self, query: &str, candidate: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        let candidate = candidate.to_lowercase();

        candidate.contains(&query)
            || is_subsequence(&query, &candidate)
            || jaro_winkler(&query, &candidate) >= self.threshold
    }

    /// Indices of the candidates that match, in their original order
    pub fn filter<'a, I>(&self, query: &str, candidates: I) -> Vec<usize>
    where
        I: IntoIterator<Item = &'a str>,
    {
        candidates
            .into_iter()
            .enumerate()
            .filter(|(_, candidate)| self.is_match(query, candidate))
            .map(|(idx, _)| idx)
            .collect()
    }
}

/// True if every char of `needle` appears in `haystack` in order
fn is_subsequence(needle: &str, haystack: &str) -> bool {
    let mut rest = haystack.chars();
    needle.chars().all(|c| rest.any(|h| h == c))
}
