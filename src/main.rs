//! hotscore - Command-line driver for training and evaluating scorers

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use hotscore::app::corpus;
use hotscore::config::Settings;
use hotscore::domain::Role;
use hotscore::services::{Analyzer, AnalyzerKind, RelationScorer};
use hotscore::ScoringContext;

#[derive(Parser)]
#[command(name = "hotscore", version, about = "Score email relevance and evaluate scorers")]
struct Cli {
    /// Settings file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Train an analyzer and report how well it predicts read messages
    Evaluate {
        /// Analyzer name: relation, from-only, content, linear, product, max
        #[arg(long, default_value = "relation")]
        analyzer: String,

        /// Training corpus (JSON array or JSON lines)
        #[arg(long)]
        train: PathBuf,

        /// Test corpus; when omitted the training corpus is split by date
        #[arg(long)]
        test: Option<PathBuf>,

        /// Hot threshold, overriding the settings file
        #[arg(long)]
        threshold: Option<f64>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the correspondents the user engages with most
    Correspondents {
        /// Training corpus (JSON array or JSON lines)
        #[arg(long)]
        train: PathBuf,

        /// Header role to rank: from, to or cc
        #[arg(long, default_value = "from")]
        role: Role,

        /// Minimum messages received before an address is ranked
        #[arg(long, default_value_t = 1)]
        min_received: u32,

        /// Number of addresses to list
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(Cli::parse()) {
        tracing::error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut settings = load_settings(cli.config.as_deref())?;

    match cli.command {
        Command::Evaluate {
            analyzer,
            train,
            test,
            threshold,
            json,
        } => {
            if let Some(threshold) = threshold {
                settings.evaluation.threshold = threshold;
                settings.validate()?;
            }

            let kind: AnalyzerKind = analyzer.parse()?;
            let messages = corpus::load(&train)
                .with_context(|| format!("loading training corpus {}", train.display()))?;
            let (training, testing) = match test {
                Some(path) => {
                    let testing = corpus::load(&path)
                        .with_context(|| format!("loading test corpus {}", path.display()))?;
                    (messages, testing)
                }
                None => corpus::split(messages, settings.evaluation.training_fraction)?,
            };

            let mut context = ScoringContext::new(kind, &settings);
            let report = context.run(&training, &testing)?;
            if json {
                let json = report.to_json().context("serializing report")?;
                println!("{json}");
            } else {
                print!("{}", report.summary());
            }
        }
        Command::Correspondents {
            train,
            role,
            min_received,
            limit,
        } => {
            let messages = corpus::load(&train)
                .with_context(|| format!("loading training corpus {}", train.display()))?;
            let mut scorer = RelationScorer::from_settings(&settings.scoring);
            scorer.analyze(&messages);

            for (address, stats) in scorer.address_book().ranked(role, min_received, limit) {
                println!(
                    "{:.3}\t{}\t{}\t{}\t{}",
                    stats.score(),
                    stats.received,
                    stats.read,
                    stats.replied,
                    address
                );
            }
        }
    }

    Ok(())
}

fn load_settings(path: Option<&Path>) -> Result<Settings> {
    if let Some(path) = path {
        return Settings::load(path).context("loading settings");
    }
    match Settings::default_path() {
        Some(path) => Ok(Settings::load_or_default(&path)?),
        None => Ok(Settings::default()),
    }
}
