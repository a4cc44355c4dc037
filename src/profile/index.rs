//! Frozen likelihood table shared by all detectors.
//!
//! The index is built in two phases: every profile is collected and validated
//! first, then each n-gram gets one final-sized probability vector with a slot
//! per language. Once built it is never mutated, so it can be shared across
//! threads without locking.

use std::collections::{HashMap, HashSet};

use crate::error::{ProfileError, ProfileResult};

use super::LanguageProfile;

/// Mapping from n-gram to per-language likelihoods.
#[derive(Debug, Clone)]
pub struct ProfileIndex {
    languages: Vec<String>,
    ngram_probabilities: HashMap<String, Vec<f64>>,
}

impl ProfileIndex {
    /// Build an index from profiles. Language order follows input order.
    ///
    /// Fails without producing any index if a name repeats, a profile breaks
    /// its invariants, or no profiles are given.
    pub fn build(profiles: impl IntoIterator<Item = LanguageProfile>) -> ProfileResult<Self> {
        let profiles: Vec<LanguageProfile> = profiles.into_iter().collect();
        if profiles.is_empty() {
            return Err(ProfileError::NoProfiles);
        }

        let mut seen = HashSet::with_capacity(profiles.len());
        for profile in &profiles {
            if !seen.insert(profile.name.as_str()) {
                return Err(ProfileError::DuplicateLanguage {
                    name: profile.name.clone(),
                });
            }
            profile.validate()?;
        }

        let lang_count = profiles.len();
        let mut ngram_probabilities: HashMap<String, Vec<f64>> = HashMap::new();
        for (slot, profile) in profiles.iter().enumerate() {
            for (gram, &count) in &profile.freq {
                let total = profile.total(gram.chars().count());
                let probs = ngram_probabilities
                    .entry(gram.clone())
                    .or_insert_with(|| vec![0.0; lang_count]);
                probs[slot] = count as f64 / total as f64;
            }
        }

        let languages: Vec<String> = profiles.into_iter().map(|p| p.name).collect();
        tracing::info!(
            languages = languages.len(),
            ngrams = ngram_probabilities.len(),
            "built profile index"
        );

        Ok(Self {
            languages,
            ngram_probabilities,
        })
    }

    /// Language identifiers in slot order.
    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    /// Number of languages.
    pub fn len(&self) -> usize {
        self.languages.len()
    }

    /// Always false for a successfully built index.
    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }

    /// Number of distinct n-grams across all profiles.
    pub fn ngram_count(&self) -> usize {
        self.ngram_probabilities.len()
    }

    /// Per-language likelihoods of `gram`, aligned with [`languages`](Self::languages).
    pub fn likelihoods(&self, gram: &str) -> Option<&[f64]> {
        self.ngram_probabilities.get(gram).map(Vec::as_slice)
    }

    /// Slot of a language, if loaded.
    pub fn position(&self, language: &str) -> Option<usize> {
        self.languages.iter().position(|l| l == language)
    }
}
