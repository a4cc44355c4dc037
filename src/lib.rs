// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # ngram-langid
//!
//! Language identification for short text fragments from trained character
//! n-gram profiles.
//!
//! ## Architecture
//!
//! - **Normalizer** (`normalize`): canonical character stream + coarse script classes
//! - **Extractor** (`ngram`): lazy 1-3 character n-grams that never span words or scripts
//! - **Profiles** (`profile`): per-language frequency tables, JSON loaders, frozen index
//! - **Detector** (`detect`): Monte-Carlo naive Bayes scoring with seeded trials
//!
//! ## Library usage
//!
//! ```no_run
//! use ngram_langid::detect::Detector;
//! use ngram_langid::profile::{ProfileIndex, load_profile_dir};
//!
//! let profiles = load_profile_dir(std::path::Path::new("profiles")).unwrap();
//! let index = ProfileIndex::build(profiles).unwrap();
//!
//! let mut detector = Detector::new(&index);
//! detector.append("Ceci est un petit texte.");
//! println!("{}", detector.detect().unwrap());
//! ```

pub mod config;
pub mod detect;
pub mod error;
pub mod ngram;
pub mod normalize;
pub mod profile;

pub use config::DetectorConfig;
pub use detect::{Detector, LanguageProbability, detect_batch};
pub use error::{LangIdError, LangIdResult};
pub use profile::{LanguageProfile, ProfileIndex};
