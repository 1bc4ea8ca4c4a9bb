//! Bigram Dice similarity.
//!
//! Both inputs are normalized, split into their sets of overlapping
//! two-character windows, and compared with `2 * |A ∩ B| / (|A| + |B|)`.
//! A bigram repeated within one string counts once.

use ahash::AHashSet;

use crate::normalize::normalize;

/// Set of overlapping character pairs of a normalized string.
#[derive(Debug, Clone, Default)]
pub struct BigramSet {
    grams: AHashSet<(char, char)>,
}

impl BigramSet {
    /// Bigrams of already-normalized text. Fewer than two characters
    /// yields the empty set.
    pub fn from_normalized(text: &str) -> Self {
        let grams = text.chars().zip(text.chars().skip(1)).collect();
        Self { grams }
    }

    /// Normalize `raw`, then take its bigrams.
    pub fn of(raw: &str) -> Self {
        Self::from_normalized(&normalize(Some(raw)))
    }

    pub fn len(&self) -> usize {
        self.grams.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grams.is_empty()
    }

    /// True if the two-character string `gram` is in the set.
    pub fn contains(&self, gram: &str) -> bool {
        let mut chars = gram.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(a), Some(b), None) => self.grams.contains(&(a, b)),
            _ => false,
        }
    }

    /// Dice coefficient against `other`, in `[0.0, 1.0]`.
    ///
    /// Two empty sets are a (vacuous) perfect match; one empty side scores 0.
    pub fn dice(&self, other: &BigramSet) -> f64 {
        match (self.is_empty(), other.is_empty()) {
            (true, true) => return 1.0,
            (true, false) | (false, true) => return 0.0,
            (false, false) => {}
        }

        let (small, large) = if self.len() <= other.len() {
            (&self.grams, &other.grams)
        } else {
            (&other.grams, &self.grams)
        };
        let shared = small.iter().filter(|g| large.contains(*g)).count();

        2.0 * shared as f64 / (self.len() + other.len()) as f64
    }
}

/// Bigrams of normalized text.
pub fn bigrams(text: &str) -> BigramSet {
    BigramSet::from_normalized(text)
}

/// Dice similarity of two raw strings. Pure, symmetric and total.
pub fn score(a: &str, b: &str) -> f64 {
    BigramSet::of(a).dice(&BigramSet::of(b))
}
