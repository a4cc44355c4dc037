//! Parallel detection of many independent texts.

use rayon::prelude::*;

use crate::config::DetectorConfig;
use crate::error::DetectResult;
use crate::profile::ProfileIndex;

use super::{Detector, LanguageProbability};

/// Score every text with its own detector, in parallel.
///
/// Results line up with `texts`. Each entry fails or succeeds on its own, so
/// one featureless line does not affect the others.
pub fn detect_batch<S>(
    index: &ProfileIndex,
    config: &DetectorConfig,
    texts: &[S],
) -> Vec<DetectResult<Vec<LanguageProbability>>>
where
    S: AsRef<str> + Sync,
{
    texts
        .par_iter()
        .map(|text| {
            let mut detector = Detector::with_config(index, config.clone());
            detector.append(text.as_ref());
            detector.get_probabilities()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DetectError;
    use crate::profile::LanguageProfile;

    fn index() -> ProfileIndex {
        let mut en = LanguageProfile::new("en");
        let mut fr = LanguageProfile::new("fr");
        for g in ["a", "a", "a", "b"] {
            en.add(g);
        }
        for g in ["b", "c", "c", "c"] {
            fr.add(g);
        }
        ProfileIndex::build(vec![en, fr]).unwrap()
    }

    #[test]
    fn results_follow_input_order() {
        let index = index();
        let config = DetectorConfig {
            seed: Some(17),
            ..Default::default()
        };
        let results = detect_batch(&index, &config, &["a a", "...", "c c"]);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap()[0].language, "en");
        assert!(matches!(results[1], Err(DetectError::NoFeatureInText)));
        assert_eq!(results[2].as_ref().unwrap()[0].language, "fr");
    }

    #[test]
    fn matches_sequential_detection() {
        let index = index();
        let config = DetectorConfig {
            seed: Some(99),
            ..Default::default()
        };
        let texts = vec!["a b c".to_string(), "b b a".to_string()];
        let batch = detect_batch(&index, &config, &texts);
        for (text, result) in texts.iter().zip(batch) {
            let mut detector = Detector::with_config(&index, config.clone());
            detector.append(text);
            assert_eq!(result.unwrap(), detector.get_probabilities().unwrap());
        }
    }

    #[test]
    fn invalid_config_fails_every_entry() {
        let index = index();
        let config = DetectorConfig {
            alpha: 1.5,
            seed: Some(1),
            ..Default::default()
        };
        let results = detect_batch(&index, &config, &["a b", "c c"]);
        assert_eq!(results.len(), 2);
        assert!(
            results
                .iter()
                .all(|r| matches!(r, Err(DetectError::Config(_))))
        );
    }
}
