//! langid CLI: identify the language of text from n-gram profiles.

use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};

use ngram_langid::config::DetectorConfig;
use ngram_langid::detect::{Detector, LanguageProbability, detect_batch};
use ngram_langid::error::{DetectError, DetectResult};
use ngram_langid::profile::{ProfileIndex, load_profile_dir};

#[derive(Parser)]
#[command(name = "langid", version, about = "N-gram language identification")]
struct Cli {
    /// Directory containing one JSON profile per language.
    #[arg(long, global = true, default_value = "profiles")]
    profiles: PathBuf,

    /// Detector config file (TOML).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log scoring details (equivalent to RUST_LOG=debug).
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect the language of TEXT, or of stdin when TEXT is omitted.
    Detect {
        /// Text to identify.
        text: Option<String>,

        /// Seed for reproducible trials.
        #[arg(long)]
        seed: Option<u64>,

        /// Smoothing strength in (0, 1].
        #[arg(long)]
        alpha: Option<f64>,

        /// Print the full probability distribution.
        #[arg(long)]
        all: bool,

        /// Detect each stdin line independently.
        #[arg(long)]
        lines: bool,

        /// Emit JSON.
        #[arg(long)]
        json: bool,
    },

    /// List the loaded languages in index order.
    Languages,
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &cli.config {
        Some(path) => DetectorConfig::load(path)?,
        None => DetectorConfig::default(),
    };

    let index = build_index(&cli.profiles)?;

    match cli.command {
        Commands::Languages => {
            println!("Languages ({}):", index.len());
            for (slot, language) in index.languages().iter().enumerate() {
                println!("  {slot}. {language}");
            }
        }

        Commands::Detect {
            text,
            seed,
            alpha,
            all,
            lines,
            json,
        } => {
            if let Some(seed) = seed {
                config.seed = Some(seed);
            }
            if let Some(alpha) = alpha {
                config.alpha = alpha;
            }
            config.validate()?;

            let input = match text {
                Some(text) => text,
                None => {
                    let mut buf = String::new();
                    std::io::stdin().read_to_string(&mut buf).into_diagnostic()?;
                    buf
                }
            };

            if lines {
                let texts: Vec<&str> = input.lines().collect();
                let results = detect_batch(&index, &config, &texts);
                for (line, result) in texts.iter().zip(results) {
                    match result {
                        Ok(probs) => print_result(line, &probs, &config, all, json)?,
                        Err(e) if json => {
                            let value = serde_json::json!({ "text": line, "error": e.to_string() });
                            println!("{value}");
                        }
                        Err(e) => {
                            tracing::warn!(line, error = %e, "detection failed");
                            println!("unknown");
                        }
                    }
                }
            } else {
                let mut detector = Detector::with_config(&index, config.clone());
                detector.append(&input);
                if all || json {
                    let probs = undetermined(detector.get_probabilities())?.unwrap_or_default();
                    print_result(input.trim(), &probs, &config, all, json)?;
                } else {
                    let language = undetermined(detector.detect())?;
                    println!("{}", language.as_deref().unwrap_or("unknown"));
                }
            }
        }
    }

    Ok(())
}

fn build_index(dir: &Path) -> Result<ProfileIndex> {
    let profiles = load_profile_dir(dir)?;
    Ok(ProfileIndex::build(profiles)?)
}

/// Turn the ordinary negative outcomes of detection into `None`.
///
/// Featureless or low-confidence text is reported as `unknown`; every other
/// error still aborts the command.
fn undetermined<T>(result: DetectResult<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e @ (DetectError::NoFeatureInText | DetectError::NoSupportedLanguage { .. })) => {
            tracing::warn!(error = %e, "detection failed");
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

/// Print one detection result as plain text or JSON.
fn print_result(
    text: &str,
    probs: &[LanguageProbability],
    config: &DetectorConfig,
    all: bool,
    json: bool,
) -> Result<()> {
    let best = probs
        .first()
        .filter(|top| top.probability >= config.confidence_threshold)
        .map(|top| top.language.as_str());

    if json {
        let shown: &[LanguageProbability] = if all { probs } else { &probs[..probs.len().min(1)] };
        let value = serde_json::json!({
            "text": text,
            "language": best,
            "probabilities": shown,
        });
        println!("{}", serde_json::to_string(&value).into_diagnostic()?);
        return Ok(());
    }

    if all {
        let rendered: Vec<String> = probs.iter().map(ToString::to_string).collect();
        println!("{}\t[{}]", best.unwrap_or("unknown"), rendered.join(", "));
    } else {
        println!("{}", best.unwrap_or("unknown"));
    }
    Ok(())
}
