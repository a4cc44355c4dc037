//! Rich diagnostic error types for ngram-langid.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes, help text, and source chains so callers know exactly
//! what went wrong and how to fix it.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for the crate.
///
/// Each variant wraps a subsystem-specific error, preserving the full diagnostic
/// chain through to the user.
#[derive(Debug, Error, Diagnostic)]
pub enum LangIdError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Profile(#[from] ProfileError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Detect(#[from] DetectError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}

// ---------------------------------------------------------------------------
// Profile errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ProfileError {
    #[error("duplicate language profile for \"{name}\"")]
    #[diagnostic(
        code(langid::profile::duplicate_language),
        help(
            "Two profiles share the same language name. \
             Each language may be loaded only once per index; \
             remove or rename one of the profiles."
        )
    )]
    DuplicateLanguage { name: String },

    #[error("invalid profile \"{name}\": {message}")]
    #[diagnostic(
        code(langid::profile::invalid),
        help(
            "Every n-gram key must be 1 to 3 characters long, and the token total \
             for a length must be non-zero whenever n-grams of that length exist. \
             Regenerate the profile or fix its `n_words` totals."
        )
    )]
    InvalidProfile { name: String, message: String },

    #[error("no language profiles supplied")]
    #[diagnostic(
        code(langid::profile::none),
        help("Load at least one language profile before building an index.")
    )]
    NoProfiles,

    #[error("failed to parse profile {source_name}: {message}")]
    #[diagnostic(
        code(langid::profile::parse),
        help(
            "Profiles are JSON objects of the form \
             {{\"freq\": {{...}}, \"n_words\": [n1, n2, n3], \"name\": \"xx\"}}."
        )
    )]
    Parse { source_name: String, message: String },

    #[error("failed to read profile: {path}")]
    #[diagnostic(
        code(langid::profile::io),
        help("Ensure the file or directory exists and is readable.")
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("profile directory contains no profiles: {path}")]
    #[diagnostic(
        code(langid::profile::empty_directory),
        help("Point --profiles at a directory containing one JSON file per language.")
    )]
    EmptyDirectory { path: String },
}

pub type ProfileResult<T> = std::result::Result<T, ProfileError>;

// ---------------------------------------------------------------------------
// Detection errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum DetectError {
    #[error("no features in text")]
    #[diagnostic(
        code(langid::detect::no_feature),
        help(
            "The text contains no n-grams known to any loaded profile \
             (it may be empty, whitespace or punctuation only). Supply more text."
        )
    )]
    NoFeatureInText,

    #[error(
        "no supported language: best candidate \"{best}\" scored {probability:.5}, below {threshold}"
    )]
    #[diagnostic(
        code(langid::detect::no_supported_language),
        help(
            "The text could not be reliably attributed to any loaded language. \
             Add a profile for the text's language or supply a longer sample."
        )
    )]
    NoSupportedLanguage {
        best: String,
        probability: f64,
        threshold: f64,
    },

    #[error("invalid smoothing alpha: {alpha}")]
    #[diagnostic(
        code(langid::detect::invalid_alpha),
        help("Alpha must be a finite value in the range (0, 1].")
    )]
    InvalidAlpha { alpha: f64 },

    #[error("invalid prior map: {message}")]
    #[diagnostic(
        code(langid::detect::invalid_prior),
        help("Prior probabilities must be non-negative and at least one must be non-zero.")
    )]
    InvalidPrior { message: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}

pub type DetectResult<T> = std::result::Result<T, DetectError>;

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read detector config: {path}")]
    #[diagnostic(
        code(langid::config::read),
        help("Ensure the config file exists and is valid TOML.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse detector config: {path}: {message}")]
    #[diagnostic(
        code(langid::config::parse),
        help("Check the TOML syntax and field names in the detector config.")
    )]
    Parse { path: String, message: String },

    #[error("invalid detector config: {message}")]
    #[diagnostic(
        code(langid::config::invalid),
        help(
            "Trial counts and limits must be positive, thresholds must lie in (0, 1], \
             and alpha must lie in (0, 1]."
        )
    )]
    Invalid { message: String },
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Convenience result alias for operations spanning subsystems.
pub type LangIdResult<T> = std::result::Result<T, LangIdError>;
