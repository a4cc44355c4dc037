//! Language profiles: per-language n-gram frequency tables.
//!
//! A [`LanguageProfile`] is the trained data for one language. Profiles are
//! collected by a loader ([`loader`]) or assembled in memory, then frozen into
//! a [`ProfileIndex`] that every detector reads from.
//!
//! ## Usage
//!
//! ```rust
//! use ngram_langid::profile::{LanguageProfile, ProfileIndex};
//!
//! let mut en = LanguageProfile::new("en");
//! for gram in ["t", "h", "th", "the"] {
//!     en.add(gram);
//! }
//! let index = ProfileIndex::build(vec![en]).unwrap();
//! assert_eq!(index.languages(), ["en"]);
//! ```

pub mod index;
pub mod loader;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{ProfileError, ProfileResult};
use crate::ngram::MAX_NGRAM_LEN;

pub use index::ProfileIndex;
pub use loader::{load_profile, load_profile_dir, load_profiles_json, profile_from_json};

/// Trained n-gram statistics for one language.
///
/// Field names follow the on-disk JSON profile format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageProfile {
    /// Unique language identifier, e.g. `"en"`.
    pub name: String,
    /// Occurrence count per n-gram (1 to 3 characters).
    pub freq: HashMap<String, u64>,
    /// Total tokens observed per n-gram length: `[len1, len2, len3]`.
    pub n_words: [u64; MAX_NGRAM_LEN],
}

impl LanguageProfile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            freq: HashMap::new(),
            n_words: [0; MAX_NGRAM_LEN],
        }
    }

    /// Count one occurrence of `gram`. Grams outside 1..=3 chars are ignored.
    pub fn add(&mut self, gram: &str) {
        let len = gram.chars().count();
        if !(1..=MAX_NGRAM_LEN).contains(&len) {
            return;
        }
        self.n_words[len - 1] += 1;
        *self.freq.entry(gram.to_string()).or_insert(0) += 1;
    }

    /// Total observed tokens of n-grams with `len` characters.
    pub fn total(&self, len: usize) -> u64 {
        match len {
            1..=MAX_NGRAM_LEN => self.n_words[len - 1],
            _ => 0,
        }
    }

    /// Probability of `gram` under this profile, or `None` when unseen.
    pub fn probability(&self, gram: &str) -> Option<f64> {
        let count = *self.freq.get(gram)?;
        let total = self.total(gram.chars().count());
        (total > 0).then(|| count as f64 / total as f64)
    }

    /// Check the data-model invariants: key lengths in 1..=3 and a non-zero
    /// token total for every length that has entries.
    pub fn validate(&self) -> ProfileResult<()> {
        for gram in self.freq.keys() {
            let len = gram.chars().count();
            if !(1..=MAX_NGRAM_LEN).contains(&len) {
                return Err(ProfileError::InvalidProfile {
                    name: self.name.clone(),
                    message: format!("n-gram {gram:?} has length {len}, expected 1 to 3"),
                });
            }
            if self.n_words[len - 1] == 0 {
                return Err(ProfileError::InvalidProfile {
                    name: self.name.clone(),
                    message: format!(
                        "n-gram {gram:?} present but the total for length {len} is zero"
                    ),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_counts_grams_and_totals() {
        let mut profile = LanguageProfile::new("en");
        for gram in "a a a b b".split(' ') {
            profile.add(gram);
        }
        profile.add("ab");
        assert_eq!(profile.freq["a"], 3);
        assert_eq!(profile.freq["b"], 2);
        assert_eq!(profile.n_words, [5, 1, 0]);
    }

    #[test]
    fn add_ignores_out_of_range_lengths() {
        let mut profile = LanguageProfile::new("en");
        profile.add("");
        profile.add("abcd");
        assert!(profile.freq.is_empty());
        assert_eq!(profile.n_words, [0, 0, 0]);
    }

    #[test]
    fn probability_uses_length_bucket() {
        let mut profile = LanguageProfile::new("ja");
        for gram in ["\u{3042}", "\u{3042}", "\u{3044}", "\u{3042}\u{3044}"] {
            profile.add(gram);
        }
        let p = profile.probability("\u{3042}").unwrap();
        assert!((p - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(profile.probability("\u{3042}\u{3044}"), Some(1.0));
        assert_eq!(profile.probability("x"), None);
    }

    #[test]
    fn validate_rejects_zero_total() {
        let mut profile = LanguageProfile::new("xx");
        profile.freq.insert("ab".into(), 2);
        profile.n_words = [4, 0, 0];
        assert!(matches!(
            profile.validate(),
            Err(ProfileError::InvalidProfile { .. })
        ));
    }

    #[test]
    fn validate_rejects_long_keys() {
        let mut profile = LanguageProfile::new("xx");
        profile.freq.insert("abcd".into(), 1);
        profile.n_words = [1, 1, 1];
        assert!(profile.validate().is_err());
    }
}
