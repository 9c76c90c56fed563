//! Approximate question matching.
//!
//! Similarity is the classic sequence-matcher ratio `2·M / T`: `M` counts the
//! characters in the matching blocks found by recursively taking the longest
//! common contiguous block and recursing on both sides of it, `T` is the
//! combined length of the two strings. Lengths are counted in Unicode scalar
//! values.
//!
//! The block search, including its "popular element" heuristic for long
//! queries, must produce the reference scores exactly. Configured cutoffs
//! assume them.

use recall_core::config::DEFAULT_CUTOFF;
use recall_core::{AppError, AppResult};
use std::collections::HashMap;

/// Queries at least this long get popular characters dropped from the index.
const AUTOJUNK_MIN_LEN: usize = 200;

/// A maximal matching block: `a[a_start..a_start+size] == b[b_start..b_start+size]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    pub a_start: usize,
    pub b_start: usize,
    pub size: usize,
}

/// Pre-indexed second sequence, compared against many first sequences.
///
/// The query is indexed once and every candidate is scanned against it, so
/// the candidate is the first sequence (`a`) and the query the second (`b`).
#[derive(Debug, Clone)]
pub struct SequenceMatcher {
    b: Vec<char>,
    /// Positions of each non-popular character of `b`, ascending
    b2j: HashMap<char, Vec<usize>>,
    /// Character counts of `b`, popular characters included
    full_b_count: HashMap<char, usize>,
}

impl SequenceMatcher {
    pub fn new(b: &str) -> Self {
        let b: Vec<char> = b.chars().collect();

        let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, &c) in b.iter().enumerate() {
            b2j.entry(c).or_default().push(j);
        }

        let full_b_count = b2j.iter().map(|(&c, idx)| (c, idx.len())).collect();

        if b.len() >= AUTOJUNK_MIN_LEN {
            let threshold = b.len() / 100 + 1;
            b2j.retain(|_, indices| indices.len() <= threshold);
        }

        Self {
            b,
            b2j,
            full_b_count,
        }
    }

    /// Longest matching block within `a[alo..ahi]` and `b[blo..bhi]`.
    ///
    /// Among equally long blocks the one starting earliest in `a` wins, then
    /// earliest in `b`. The result is then grown over equal neighbours, which
    /// lets popular characters join a block they could not start.
    pub fn find_longest_match(
        &self,
        a: &[char],
        alo: usize,
        ahi: usize,
        blo: usize,
        bhi: usize,
    ) -> Block {
        let b = &self.b;
        let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0usize);

        // j2len[j] = length of the block ending at a[i-1], b[j]
        let mut j2len: HashMap<usize, usize> = HashMap::new();
        for (i, c) in a.iter().enumerate().take(ahi).skip(alo) {
            let mut new_j2len = HashMap::new();
            if let Some(indices) = self.b2j.get(c) {
                for &j in indices {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j
                        .checked_sub(1)
                        .and_then(|prev| j2len.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    new_j2len.insert(j, k);
                    if k > best_size {
                        best_i = i + 1 - k;
                        best_j = j + 1 - k;
                        best_size = k;
                    }
                }
            }
            j2len = new_j2len;
        }

        while best_i > alo && best_j > blo && a[best_i - 1] == b[best_j - 1] {
            best_i -= 1;
            best_j -= 1;
            best_size += 1;
        }
        while best_i + best_size < ahi
            && best_j + best_size < bhi
            && a[best_i + best_size] == b[best_j + best_size]
        {
            best_size += 1;
        }

        Block {
            a_start: best_i,
            b_start: best_j,
            size: best_size,
        }
    }

    /// All matching blocks between `a` and the indexed query, sorted by position.
    pub fn matching_blocks(&self, a: &[char]) -> Vec<Block> {
        let mut queue = vec![(0, a.len(), 0, self.b.len())];
        let mut blocks = Vec::new();

        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let block = self.find_longest_match(a, alo, ahi, blo, bhi);
            if block.size == 0 {
                continue;
            }
            let (i, j, k) = (block.a_start, block.b_start, block.size);
            blocks.push(block);
            if alo < i && blo < j {
                queue.push((alo, i, blo, j));
            }
            if i + k < ahi && j + k < bhi {
                queue.push((i + k, ahi, j + k, bhi));
            }
        }

        blocks.sort_by_key(|block| (block.a_start, block.b_start));
        blocks
    }

    /// Exact similarity ratio of `a` against the indexed query.
    pub fn ratio(&self, a: &[char]) -> f64 {
        let matches: usize = self.matching_blocks(a).iter().map(|b| b.size).sum();
        calculate_ratio(matches, a.len() + self.b.len())
    }

    /// Upper bound on `ratio` from character multiset intersection.
    pub fn quick_ratio(&self, a: &[char]) -> f64 {
        let mut available: HashMap<char, isize> = HashMap::new();
        let mut matches = 0usize;
        for c in a {
            let count = available
                .entry(*c)
                .or_insert_with(|| self.full_b_count.get(c).copied().unwrap_or(0) as isize);
            if *count > 0 {
                matches += 1;
            }
            *count -= 1;
        }
        calculate_ratio(matches, a.len() + self.b.len())
    }

    /// Upper bound on `ratio` from lengths alone.
    pub fn real_quick_ratio(&self, a: &[char]) -> f64 {
        let (la, lb) = (a.len(), self.b.len());
        calculate_ratio(la.min(lb), la + lb)
    }

    /// Score of `a` if it reaches `cutoff`, checking the cheap bounds first.
    fn qualifies(&self, a: &[char], cutoff: f64) -> Option<f64> {
        if self.real_quick_ratio(a) < cutoff || self.quick_ratio(a) < cutoff {
            return None;
        }
        let score = self.ratio(a);
        (score >= cutoff).then_some(score)
    }
}

fn calculate_ratio(matches: usize, length: usize) -> f64 {
    if length == 0 {
        return 1.0;
    }
    2.0 * matches as f64 / length as f64
}

/// Similarity of `candidate` to `query` in `[0, 1]`.
pub fn similarity(query: &str, candidate: &str) -> f64 {
    let candidate: Vec<char> = candidate.chars().collect();
    SequenceMatcher::new(query).ratio(&candidate)
}

/// The winning candidate of a match.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredMatch<'a> {
    pub candidate: &'a str,
    /// Index of the candidate in the input sequence
    pub position: usize,
    pub score: f64,
}

/// Best candidate scoring at least `cutoff`, ties to the earliest position.
///
/// The cutoff is not range-checked here; use [`Matcher::new`] for that.
pub fn best_match<'a, S: AsRef<str>>(
    query: &str,
    candidates: &'a [S],
    cutoff: f64,
) -> Option<&'a str> {
    best_scored(query, candidates, cutoff).map(|m| m.candidate)
}

fn best_scored<'a, S: AsRef<str>>(
    query: &str,
    candidates: &'a [S],
    cutoff: f64,
) -> Option<ScoredMatch<'a>> {
    if candidates.is_empty() {
        return None;
    }

    let matcher = SequenceMatcher::new(query);
    let mut best: Option<ScoredMatch<'a>> = None;

    for (position, candidate) in candidates.iter().enumerate() {
        let candidate = candidate.as_ref();
        let chars: Vec<char> = candidate.chars().collect();
        let Some(score) = matcher.qualifies(&chars, cutoff) else {
            continue;
        };

        tracing::trace!("Candidate {} {:?} scored {:.4}", position, candidate, score);

        if best.map_or(true, |b| score > b.score) {
            best = Some(ScoredMatch {
                candidate,
                position,
                score,
            });
        }
    }

    best
}

/// Approximate matcher with a validated cutoff.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matcher {
    cutoff: f64,
}

impl Default for Matcher {
    fn default() -> Self {
        Self {
            cutoff: DEFAULT_CUTOFF,
        }
    }
}

impl Matcher {
    /// Create a matcher. Higher cutoffs demand near-exact phrasing, lower
    /// cutoffs let more loosely related questions through.
    pub fn new(cutoff: f64) -> AppResult<Self> {
        if !(0.0..=1.0).contains(&cutoff) {
            return Err(AppError::Config(format!(
                "Cutoff must be within [0.0, 1.0], got {}",
                cutoff
            )));
        }
        Ok(Self { cutoff })
    }

    pub fn cutoff(&self) -> f64 {
        self.cutoff
    }

    pub fn best_match<'a, S: AsRef<str>>(
        &self,
        query: &str,
        candidates: &'a [S],
    ) -> Option<&'a str> {
        best_match(query, candidates, self.cutoff)
    }

    /// Like [`Matcher::best_match`], also reporting position and score.
    pub fn best_scored<'a, S: AsRef<str>>(
        &self,
        query: &str,
        candidates: &'a [S],
    ) -> Option<ScoredMatch<'a>> {
        best_scored(query, candidates, self.cutoff)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-12,
            "expected {}, got {}",
            expected,
            actual
        );
    }

    #[test]
    fn test_ratio_reference_values() {
        assert_close(similarity("bcde", "abcd"), 0.75);
        assert_close(
            similarity(
                "private volatile Thread currentThread;",
                "private Thread currentThread;",
            ),
            58.0 / 67.0,
        );
        assert_close(similarity("what is ur name", "What is your name?"), 28.0 / 33.0);
        assert_close(similarity("How are you?", "How are you"), 22.0 / 23.0);
    }

    #[test]
    fn test_ratio_empty_strings() {
        assert_close(similarity("", ""), 1.0);
        assert_close(similarity("", "a"), 0.0);
        assert_close(similarity("a", ""), 0.0);
    }

    #[test]
    fn test_ratio_counts_chars_not_bytes() {
        assert_close(similarity("hello world", "héllo wörld"), 18.0 / 22.0);
    }

    #[test]
    fn test_popular_characters_are_dropped_for_long_queries() {
        let query = format!("x{}", "ab".repeat(150));
        let candidate = format!("{}x", "ab".repeat(150));
        // Only the lone 'x' can start a block once 'a' and 'b' are popular
        assert_close(similarity(&query, &candidate), 2.0 / 602.0);

        let query = "The quick brown fox jumps over the lazy dog. ".repeat(5);
        let candidate = "The quick brown cat jumps over the lazy dog. ".repeat(5);
        assert_close(similarity(&query, &candidate), 32.0 / 450.0);
    }

    #[test]
    fn test_popular_characters_extend_blocks() {
        let text = "ab".repeat(150);
        assert_close(similarity(&text, &text), 1.0);
    }

    #[test]
    fn test_matching_blocks() {
        let matcher = SequenceMatcher::new("abxcd");
        let a: Vec<char> = "abcd".chars().collect();
        let blocks = matcher.matching_blocks(&a);
        assert_eq!(
            blocks,
            vec![
                Block { a_start: 0, b_start: 0, size: 2 },
                Block { a_start: 2, b_start: 3, size: 2 },
            ]
        );
    }

    #[test]
    fn test_find_longest_match_prefers_earliest() {
        let matcher = SequenceMatcher::new("abab");
        let a: Vec<char> = "ab".chars().collect();
        let block = matcher.find_longest_match(&a, 0, 2, 0, 4);
        assert_eq!(block, Block { a_start: 0, b_start: 0, size: 2 });
    }

    #[test]
    fn test_quick_bounds_never_below_ratio() {
        let pairs = [
            ("What is your name?", "what is ur name"),
            ("How old are you?", "what is ur name"),
            ("abcabcabc", "cba"),
            ("", "x"),
        ];
        for (query, candidate) in pairs {
            let matcher = SequenceMatcher::new(query);
            let a: Vec<char> = candidate.chars().collect();
            let ratio = matcher.ratio(&a);
            assert!(matcher.quick_ratio(&a) >= ratio);
            assert!(matcher.real_quick_ratio(&a) >= matcher.quick_ratio(&a));
        }
    }

    #[test]
    fn test_best_match_exact() {
        let candidates = ["What is your name?"];
        assert_eq!(
            best_match("What is your name?", &candidates, 0.8),
            Some("What is your name?")
        );
    }

    #[test]
    fn test_best_match_near_phrasing() {
        let candidates = ["What is your name?", "How old are you?"];
        assert_eq!(
            best_match("what is ur name", &candidates, 0.8),
            Some("What is your name?")
        );
        assert_eq!(best_match("what is ur name", &candidates, 0.85), None);
        assert_eq!(best_match("hello", &candidates, 0.8), None);
    }

    #[test]
    fn test_best_match_empty_candidates() {
        let candidates: [&str; 0] = [];
        assert_eq!(best_match("anything", &candidates, 0.0), None);
    }

    #[test]
    fn test_best_match_prefers_higher_score() {
        let candidates = ["How old are you?", "how old are you"];
        let found = Matcher::default().best_scored("how old are you", &candidates).unwrap();
        assert_eq!(found.candidate, "how old are you");
        assert_eq!(found.position, 1);
        assert_close(found.score, 1.0);
    }

    #[test]
    fn test_best_match_ties_go_to_earliest() {
        let candidates = ["tam", "tom"];
        let found = best_scored("tim", &candidates, 0.6).unwrap();
        assert_eq!(found.candidate, "tam");
        assert_eq!(found.position, 0);

        let candidates = ["dup", "dup"];
        assert_eq!(best_scored("dup", &candidates, 0.8).unwrap().position, 0);
    }

    #[test]
    fn test_matcher_rejects_out_of_range_cutoff() {
        assert!(Matcher::new(0.0).is_ok());
        assert!(Matcher::new(1.0).is_ok());
        assert!(matches!(Matcher::new(1.01), Err(AppError::Config(_))));
        assert!(matches!(Matcher::new(-0.1), Err(AppError::Config(_))));
        assert!(Matcher::new(f64::NAN).is_err());
        assert_eq!(Matcher::default().cutoff(), 0.8);
    }

    #[test]
    fn test_matcher_works_with_owned_strings() {
        let candidates = vec!["Where do you live?".to_string()];
        let matcher = Matcher::new(0.7).unwrap();
        assert_eq!(
            matcher.best_match("where do u live", &candidates),
            Some("Where do you live?")
        );
    }
}
