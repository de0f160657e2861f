//! CLI for entropyhunter: profile captured tokens and guess the ones you haven't seen.

mod commands;

use clap::{ArgAction, Parser, Subcommand};
use env_logger::Env;

#[derive(Parser)]
#[command(name = "entropyhunter")]
#[command(about = "entropyhunter — measure how guessable your tokens are")]
#[command(version = entropyhunter_core::VERSION)]
struct Cli {
    /// Increase log verbosity (-v, -vv)
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Decrease log verbosity (-q, -qq)
    #[arg(short = 'q', long, global = true, action = ArgAction::Count)]
    quiet: u8,

    /// JSON file overriding anomaly thresholds, preview size and workers
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Per-position frequency and entropy table for tokens in a file (one per line)
    Analyze {
        /// Token file, one token per line
        #[arg(long, short = 'i')]
        input: String,

        /// Write the full profile as JSON
        #[arg(long)]
        output: Option<String>,
    },

    /// Generate candidate tokens from the learned per-position biases
    Generate {
        /// Token file, one token per line
        #[arg(long, short = 'i')]
        input: String,

        /// Number of candidates
        #[arg(long, short = 'n', default_value = "20000")]
        num: usize,

        /// Write candidates here, one per line (default: preview on stdout)
        #[arg(long, short = 'o')]
        output: Option<String>,

        /// Seed for a reproducible batch
        #[arg(long)]
        seed: Option<u64>,

        /// Worker threads (overrides the config file)
        #[arg(long)]
        workers: Option<usize>,
    },

    /// Predict total entropy and expected matches for biased-subset parameters
    Theory {
        /// Symbols per position subset (k)
        #[arg(long, default_value = "8")]
        subset_k: usize,

        /// Favored symbol weight multiplier
        #[arg(long, default_value = "6.0")]
        fav_weight: f64,

        /// Token length (positions)
        #[arg(long, default_value = "24")]
        length: usize,

        /// Size of the captured token set
        #[arg(long, default_value = "50000")]
        sample_size: u64,

        /// Number of attack guesses
        #[arg(long, default_value = "100000")]
        guesses: u64,

        /// Print the report as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Sample a synthetic biased-subset population, analyze it and attack it
    Simulate {
        /// Population size
        #[arg(long, default_value = "50000")]
        sample_size: usize,

        /// Number of candidates to generate
        #[arg(long, default_value = "20000")]
        guesses: usize,

        /// Seed for a reproducible run
        #[arg(long)]
        seed: Option<u64>,

        /// Symbols per position subset (k)
        #[arg(long, default_value = "8")]
        subset_k: usize,

        /// Favored symbol weight multiplier
        #[arg(long, default_value = "6.0")]
        fav_weight: f64,

        /// Token length (positions)
        #[arg(long, default_value = "24")]
        length: usize,

        /// Alphabet to draw subsets from (default: URL-safe base64)
        #[arg(long)]
        alphabet: Option<String>,

        /// Write the simulation report as JSON
        #[arg(long)]
        output: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let result = commands::load_config(cli.config.as_deref()).and_then(|cfg| match cli.command {
        Commands::Analyze { input, output } => {
            commands::analyze::run(&input, output.as_deref(), &cfg)
        }
        Commands::Generate {
            input,
            num,
            output,
            seed,
            workers,
        } => commands::generate::run(commands::generate::GenerateCommandConfig {
            input: &input,
            num,
            output_path: output.as_deref(),
            seed,
            workers: workers.unwrap_or(cfg.workers),
            preview_limit: cfg.preview_limit,
        }),
        Commands::Theory {
            subset_k,
            fav_weight,
            length,
            sample_size,
            guesses,
            json,
        } => commands::theory::run(
            entropyhunter_core::TheoryParams {
                subset_k,
                fav_weight,
                length,
                sample_size,
                guesses,
            },
            json,
        ),
        Commands::Simulate {
            sample_size,
            guesses,
            seed,
            subset_k,
            fav_weight,
            length,
            alphabet,
            output,
        } => {
            let mut model = entropyhunter_core::ModelParams::new(subset_k, fav_weight, length);
            if let Some(alphabet) = alphabet {
                model = model.with_alphabet(alphabet);
            }
            commands::simulate::run(
                entropyhunter_core::SimulationConfig {
                    model,
                    sample_size,
                    guesses,
                    seed,
                    thresholds: cfg.anomaly,
                    workers: cfg.workers,
                },
                output.as_deref(),
            )
        }
    });

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8, quiet: u8) {
    use log::LevelFilter;

    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("warn"));
    builder.format_timestamp_millis();
    let level = match (verbose, quiet) {
        (0, 0) => None,
        (_, 1) => Some(LevelFilter::Error),
        (_, q) if q > 1 => Some(LevelFilter::Off),
        (1, _) => Some(LevelFilter::Info),
        (2, _) => Some(LevelFilter::Debug),
        _ => Some(LevelFilter::Trace),
    };
    if let Some(level) = level {
        builder.filter_level(level);
    }
    let _ = builder.try_init();
}
