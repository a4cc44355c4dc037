//! Language detection over a frozen [`ProfileIndex`].
//!
//! A [`Detector`] accumulates text, extracts the n-grams known to the index
//! and scores them with a naive Bayes update. Scoring is repeated over several
//! randomized trials (each visiting the n-grams in a different order) and the
//! per-language results are averaged.
//!
//! ## Usage
//!
//! ```rust
//! use ngram_langid::detect::Detector;
//! use ngram_langid::profile::{LanguageProfile, ProfileIndex};
//!
//! let mut en = LanguageProfile::new("en");
//! let mut fr = LanguageProfile::new("fr");
//! for g in ["a", "a", "b"] { en.add(g); }
//! for g in ["b", "b", "c"] { fr.add(g); }
//! let index = ProfileIndex::build(vec![en, fr]).unwrap();
//!
//! let mut detector = Detector::new(&index);
//! detector.set_seed(42);
//! detector.append("a");
//! assert_eq!(detector.detect().unwrap(), "en");
//! ```

pub mod batch;
mod trial;

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use rand::SeedableRng;
use rand::rngs::StdRng;
use regex::Regex;
use serde::Serialize;

use crate::config::DetectorConfig;
use crate::error::{DetectError, DetectResult};
use crate::ngram::ngrams;
use crate::normalize::{ScriptClass, normalize, script_class};
use crate::profile::ProfileIndex;

use trial::{TrialParams, run_trial};

pub use batch::detect_batch;

static RE_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://[-_.?&~;+=/#0-9A-Za-z]{1,2076}").unwrap());

static RE_MAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[-_.0-9A-Za-z]{1,64}@[-_0-9A-Za-z]{1,255}[-_.0-9A-Za-z]{1,255}").unwrap()
});

/// A language with its estimated posterior probability.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LanguageProbability {
    pub language: String,
    pub probability: f64,
}

impl fmt::Display for LanguageProbability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.language, self.probability)
    }
}

/// Per-request detector bound to a shared index.
///
/// Not meant to be shared between concurrent callers; create one per text.
#[derive(Debug, Clone)]
pub struct Detector<'a> {
    index: &'a ProfileIndex,
    config: DetectorConfig,
    text: String,
    text_chars: usize,
    prior: Option<Vec<f64>>,
}

impl<'a> Detector<'a> {
    /// Create a detector with the default configuration.
    pub fn new(index: &'a ProfileIndex) -> Self {
        Self::with_config(index, DetectorConfig::default())
    }

    /// Create a detector with an explicit configuration.
    ///
    /// The configuration is checked with [`DetectorConfig::validate`] each
    /// time the detector scores, so an out-of-range value surfaces as
    /// [`DetectError::Config`] from [`Detector::detect`] and
    /// [`Detector::get_probabilities`].
    pub fn with_config(index: &'a ProfileIndex, config: DetectorConfig) -> Self {
        Self {
            index,
            config,
            text: String::new(),
            text_chars: 0,
            prior: None,
        }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Set the smoothing strength. Must lie in (0, 1].
    pub fn set_alpha(&mut self, alpha: f64) -> DetectResult<()> {
        if !(alpha.is_finite() && alpha > 0.0 && alpha <= 1.0) {
            return Err(DetectError::InvalidAlpha { alpha });
        }
        self.config.alpha = alpha;
        Ok(())
    }

    /// Fix the seed so every detection on this state is reproducible.
    pub fn set_seed(&mut self, seed: u64) {
        self.config.seed = Some(seed);
    }

    /// Cap the buffered text at `max` characters. Already buffered text is kept.
    pub fn set_max_text_length(&mut self, max: usize) {
        self.config.max_text_length = max;
    }

    /// Replace the uniform starting distribution with explicit priors.
    ///
    /// Languages missing from `priors` start at zero. Entries for languages
    /// that are not loaded are ignored.
    pub fn set_prior_map(&mut self, priors: &HashMap<String, f64>) -> DetectResult<()> {
        let mut prior = vec![0.0; self.index.len()];
        for (slot, language) in self.index.languages().iter().enumerate() {
            let Some(&p) = priors.get(language) else {
                continue;
            };
            if !(p.is_finite() && p >= 0.0) {
                return Err(DetectError::InvalidPrior {
                    message: format!("prior for \"{language}\" is {p}"),
                });
            }
            prior[slot] = p;
        }
        let sum: f64 = prior.iter().sum();
        if sum <= 0.0 {
            return Err(DetectError::InvalidPrior {
                message: "every loaded language has a zero prior".into(),
            });
        }
        prior.iter_mut().for_each(|p| *p /= sum);
        self.prior = Some(prior);
        Ok(())
    }

    /// Normalize `text` and append it to the buffer.
    ///
    /// URLs and e-mail addresses are dropped first; input beyond
    /// `max_text_length` characters is ignored.
    pub fn append(&mut self, text: &str) {
        let text = RE_URL.replace_all(text, " ");
        let text = RE_MAIL.replace_all(&text, " ");
        for c in normalize(&text).chars() {
            if self.text_chars >= self.config.max_text_length {
                tracing::debug!(
                    max_text_length = self.config.max_text_length,
                    "text buffer full, ignoring further input"
                );
                break;
            }
            if c == ' ' && self.text.ends_with(' ') {
                continue;
            }
            self.text.push(c);
            self.text_chars += 1;
        }
    }

    /// The accumulated normalized text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Return the most probable language.
    ///
    /// Fails with [`DetectError::NoSupportedLanguage`] when even the best
    /// candidate scores below the confidence threshold.
    pub fn detect(&self) -> DetectResult<String> {
        let probabilities = self.get_probabilities()?;
        let threshold = self.config.confidence_threshold;
        match probabilities.into_iter().next() {
            Some(top) if top.probability >= threshold => Ok(top.language),
            Some(top) => Err(DetectError::NoSupportedLanguage {
                best: top.language,
                probability: top.probability,
                threshold,
            }),
            None => Err(DetectError::NoFeatureInText),
        }
    }

    /// Full distribution over loaded languages, sorted by descending
    /// probability. Ties keep index order.
    pub fn get_probabilities(&self) -> DetectResult<Vec<LanguageProbability>> {
        let averaged = self.score()?;
        let mut ranked: Vec<(usize, f64)> = averaged.into_iter().enumerate().collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

        let languages = self.index.languages();
        Ok(ranked
            .into_iter()
            .map(|(slot, probability)| LanguageProbability {
                language: languages[slot].clone(),
                probability,
            })
            .collect())
    }

    /// Likelihood vectors of every known n-gram in the buffer, in text order.
    fn features(&self) -> Vec<&'a [f64]> {
        let index: &'a ProfileIndex = self.index;
        let text = strip_latin_noise(&self.text);
        ngrams(&text)
            .filter_map(|gram| index.likelihoods(gram.text))
            .collect()
    }

    /// Run all trials and average them per language.
    fn score(&self) -> DetectResult<Vec<f64>> {
        self.config.validate()?;
        let features = self.features();
        if features.is_empty() {
            return Err(DetectError::NoFeatureInText);
        }

        let lang_count = self.index.len();
        let prior = match &self.prior {
            Some(prior) => prior.clone(),
            None => vec![1.0 / lang_count as f64; lang_count],
        };
        let params = TrialParams {
            smoothing: self.config.alpha / self.config.smoothing_base,
            likelihood_weight: 1.0 - self.config.alpha,
            max_updates: self.config.max_updates,
            convergence_threshold: self.config.convergence_threshold,
            convergence_steps: self.config.convergence_steps,
        };
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let trials = self.config.trials.max(1);
        let mut averaged = vec![0.0; lang_count];
        for trial in 0..trials {
            let outcome = run_trial(&features, &prior, &params, &mut rng);
            tracing::debug!(
                trial,
                updates = outcome.updates,
                max = outcome.probabilities.iter().copied().fold(0.0, f64::max),
                converged = outcome.converged,
                "trial finished"
            );
            for (acc, p) in averaged.iter_mut().zip(&outcome.probabilities) {
                *acc += p / trials as f64;
            }
        }
        Ok(averaged)
    }
}

/// Drop ASCII letters from text dominated by non-Latin letters.
///
/// Stray Latin tokens (product names, romanized words) in CJK or Cyrillic text
/// otherwise pull the result towards Latin-script languages.
fn strip_latin_noise(text: &str) -> Cow<'_, str> {
    let mut latin = 0usize;
    let mut non_latin = 0usize;
    for c in text.chars() {
        if c.is_ascii_alphabetic() {
            latin += 1;
        } else if c.is_alphabetic() && script_class(c) != ScriptClass::Latin {
            non_latin += 1;
        }
    }
    if latin * 2 < non_latin {
        Cow::Owned(text.chars().filter(|c| !c.is_ascii_alphabetic()).collect())
    } else {
        Cow::Borrowed(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::LanguageProfile;

    const TRAINING_EN: &str = "a a a b b c c d e";
    const TRAINING_FR: &str = "a b b c c c d d d";
    const TRAINING_JA: &str = "\u{3042} \u{3042} \u{3042} \u{3044} \u{3046} \u{3048} \u{3048}";

    fn profile(name: &str, training: &str) -> LanguageProfile {
        let mut profile = LanguageProfile::new(name);
        for gram in training.split(' ') {
            profile.add(gram);
        }
        profile
    }

    fn test_index() -> ProfileIndex {
        ProfileIndex::build(vec![
            profile("en", TRAINING_EN),
            profile("fr", TRAINING_FR),
            profile("ja", TRAINING_JA),
        ])
        .unwrap()
    }

    fn detect(index: &ProfileIndex, text: &str) -> DetectResult<String> {
        let mut detector = Detector::new(index);
        detector.set_seed(0);
        detector.append(text);
        detector.detect()
    }

    #[test]
    fn detects_single_latin_char() {
        assert_eq!(detect(&test_index(), "a").unwrap(), "en");
    }

    #[test]
    fn detects_fr_pair() {
        assert_eq!(detect(&test_index(), "b d").unwrap(), "fr");
    }

    #[test]
    fn detects_en_pair() {
        assert_eq!(detect(&test_index(), "d e").unwrap(), "en");
    }

    #[test]
    fn detects_cjk_with_stray_latin() {
        assert_eq!(
            detect(&test_index(), "\u{3042}\u{3042}\u{3042}\u{3042}a").unwrap(),
            "ja"
        );
    }

    #[test]
    fn whitespace_only_has_no_features() {
        let err = detect(&test_index(), "   \t\n ").unwrap_err();
        assert!(matches!(err, DetectError::NoFeatureInText));
    }

    #[test]
    fn punctuation_only_has_no_features() {
        let err = detect(&test_index(), "!!! ... ?").unwrap_err();
        assert!(matches!(err, DetectError::NoFeatureInText));
    }

    #[test]
    fn unknown_ngrams_have_no_features() {
        let err = detect(&test_index(), "xyz qq").unwrap_err();
        assert!(matches!(err, DetectError::NoFeatureInText));
    }

    #[test]
    fn seeded_detection_is_repeatable() {
        let index = test_index();
        let mut detector = Detector::new(&index);
        detector.set_seed(1234);
        detector.append("a b c d e a b \u{3042}");
        let first = detector.get_probabilities().unwrap();
        let second = detector.get_probabilities().unwrap();
        assert_eq!(first, second);
        assert_eq!(detector.detect().unwrap(), detector.detect().unwrap());
    }

    #[test]
    fn probabilities_are_sorted_and_complete() {
        let index = test_index();
        let mut detector = Detector::new(&index);
        detector.set_seed(9);
        detector.append("c c d");
        let probs = detector.get_probabilities().unwrap();
        assert_eq!(probs.len(), 3);
        assert!(probs.windows(2).all(|w| w[0].probability >= w[1].probability));
        assert_eq!(probs[0].language, "fr");
    }

    #[test]
    fn ties_keep_index_order() {
        let index = test_index();
        let mut detector = Detector::new(&index);
        detector.set_seed(5);
        detector.append("b");
        let probs = detector.get_probabilities().unwrap();
        assert_eq!(probs[0].language, "en");
        assert_eq!(probs[1].language, "fr");
        assert_eq!(probs[0].probability, probs[1].probability);
    }

    #[test]
    fn low_confidence_is_unsupported() {
        let index = test_index();
        let config = DetectorConfig {
            confidence_threshold: 0.9,
            seed: Some(3),
            ..Default::default()
        };
        let mut detector = Detector::with_config(&index, config);
        detector.append("b");
        let err = detector.detect().unwrap_err();
        assert!(matches!(
            err,
            DetectError::NoSupportedLanguage { ref best, .. } if best == "en"
        ));
    }

    #[test]
    fn prior_map_shifts_result() {
        let index = test_index();
        let mut detector = Detector::new(&index);
        detector.set_seed(11);
        detector.append("a");
        let priors = HashMap::from([("fr".to_string(), 1.0)]);
        detector.set_prior_map(&priors).unwrap();
        assert_eq!(detector.detect().unwrap(), "fr");
    }

    #[test]
    fn prior_map_rejects_bad_values() {
        let index = test_index();
        let mut detector = Detector::new(&index);
        let negative = HashMap::from([("en".to_string(), -0.5)]);
        assert!(matches!(
            detector.set_prior_map(&negative),
            Err(DetectError::InvalidPrior { .. })
        ));
        let zero = HashMap::from([("en".to_string(), 0.0), ("zz".to_string(), 1.0)]);
        assert!(detector.set_prior_map(&zero).is_err());
    }

    #[test]
    fn alpha_must_be_in_range() {
        let index = test_index();
        let mut detector = Detector::new(&index);
        assert!(matches!(
            detector.set_alpha(0.0),
            Err(DetectError::InvalidAlpha { .. })
        ));
        assert!(detector.set_alpha(f64::NAN).is_err());
        assert!(detector.set_alpha(0.3).is_ok());
        assert_eq!(detector.config().alpha, 0.3);
    }

    #[test]
    fn alpha_changes_the_score() {
        let index = test_index();
        let top = |alpha: f64| {
            let mut detector = Detector::new(&index);
            detector.set_seed(5);
            detector.set_alpha(alpha).unwrap();
            detector.append("b d");
            detector.get_probabilities().unwrap()
        };

        let weighted = top(0.5);
        assert_eq!(weighted[0].language, "fr");
        assert!(weighted[0].probability > 0.7, "{weighted:?}");

        // With alpha = 1 the likelihoods carry no weight and the prior survives.
        let smoothed = top(1.0);
        for p in &smoothed {
            assert!((p.probability - 1.0 / 3.0).abs() < 1e-9, "{smoothed:?}");
        }
    }

    #[test]
    fn hand_built_config_is_validated() {
        let index = test_index();
        let bad = [
            DetectorConfig {
                alpha: 1.5,
                ..Default::default()
            },
            DetectorConfig {
                alpha: f64::NAN,
                ..Default::default()
            },
            DetectorConfig {
                confidence_threshold: 0.0,
                ..Default::default()
            },
        ];
        for config in bad {
            let mut detector = Detector::with_config(&index, config.clone());
            detector.append("a b d");
            assert!(
                matches!(detector.get_probabilities(), Err(DetectError::Config(_))),
                "{config:?}"
            );
            assert!(matches!(detector.detect(), Err(DetectError::Config(_))));
        }
    }

    #[test]
    fn append_respects_max_text_length() {
        let index = test_index();
        let mut detector = Detector::new(&index);
        detector.set_max_text_length(3);
        detector.append("abcdef");
        detector.append("ghi");
        assert_eq!(detector.text(), "abc");
    }

    #[test]
    fn append_collapses_space_across_calls() {
        let index = test_index();
        let mut detector = Detector::new(&index);
        detector.append("a ");
        detector.append("  b");
        assert_eq!(detector.text(), "a b");
    }

    #[test]
    fn append_strips_urls_and_mail() {
        let index = test_index();
        let mut detector = Detector::new(&index);
        detector.append("see https://example.com/path?q=1 or mail someone@example.org now");
        assert_eq!(detector.text(), "see or mail now");
    }

    #[test]
    fn latin_noise_stripped_only_when_dominated() {
        assert_eq!(strip_latin_noise("\u{3042}\u{3044}\u{3046}x"), "\u{3042}\u{3044}\u{3046}");
        assert_eq!(strip_latin_noise("\u{3042}xy"), "\u{3042}xy");
    }

    #[test]
    fn language_probability_display() {
        let lp = LanguageProbability {
            language: "en".into(),
            probability: 1.0,
        };
        assert_eq!(lp.to_string(), "en:1");
    }
}
