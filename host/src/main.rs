//! BattleTanks match runner and proof verifier.
//!
//! Runs a match from the same three inputs every chat client sees, writes the
//! proof artifact, and recomputes fingerprints of proofs from elsewhere.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use battletanks_core::proof::fingerprint_from_file_name;
use battletanks_core::{
    derive_seed, digest_hex, roster, verify, Elimination, Match, MatchConfig, MatchInputs, Proof,
    StepOutcome,
};
use clap::{Args, Parser, Subcommand};
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "battletanks")]
#[command(about = "Run deterministic BattleTanks matches and verify their proofs", long_about = None)]
struct Cli {
    /// Verbose output (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a match to the end and export its proof
    Run(RunArgs),
    /// Recompute the fingerprint of a proof file
    Verify(VerifyArgs),
    /// Print the digest and derived seed of a string
    Seed {
        /// Text to derive from, e.g. "room:seedword"
        text: String,
    },
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Room identifier
    #[arg(short, long, default_value = "room")]
    room: String,

    /// Seed word from the start command
    #[arg(short, long)]
    seed: String,

    /// Participant username (repeat for each user)
    #[arg(short, long = "user")]
    users: Vec<String>,

    /// JSON match config; missing fields use defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Keep eliminated participants as ghosts
    #[arg(long)]
    ghosts: bool,

    /// Override the tick cap
    #[arg(long)]
    max_ticks: Option<u64>,

    /// Synthetic frame rate driving the clock
    #[arg(long, default_value = "60")]
    fps: f64,

    /// Directory for battle-proof-<hash>.json
    #[arg(short, long, default_value = ".")]
    out_dir: PathBuf,
}

#[derive(Args, Debug)]
struct VerifyArgs {
    /// Proof file to check
    file: PathBuf,

    /// Published fingerprint; defaults to the one in the file name
    #[arg(long)]
    expect: Option<String>,
}

fn load_config(args: &RunArgs) -> Result<MatchConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("failed to parse config {}", path.display()))?
        }
        None => MatchConfig::default(),
    };
    if args.ghosts {
        config.elimination = Elimination::Ghost;
    }
    if let Some(max_ticks) = args.max_ticks {
        config.max_ticks = max_ticks;
    }
    config.validate().context("invalid match config")?;
    Ok(config)
}

/// Drive a match with evenly spaced synthetic frames until it finishes.
fn play(inputs: MatchInputs, config: MatchConfig, fps: f64) -> Result<(Proof, Match)> {
    if !fps.is_finite() || fps <= 0.0 {
        bail!("fps must be positive, got {fps}");
    }
    let frame = 1.0 / fps;
    let mut m = Match::start(inputs, config);
    let mut now = 0.0;
    let mut frames: u64 = 0;
    while m.advance(now) == StepOutcome::Continue {
        now += frame;
        frames += 1;
        if frames % 3600 == 0 {
            debug!(frames, tick = m.tick(), live = m.entities().len(), "progress");
        }
    }
    let proof = m
        .proof()?
        .context("match stopped without finishing")?;
    Ok((proof, m))
}

fn write_proof(proof: &Proof, out_dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;
    let path = out_dir.join(proof.file_name());
    std::fs::write(&path, &proof.canonical)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}

fn cmd_run(args: RunArgs) -> Result<ExitCode> {
    let config = load_config(&args)?;
    let users = roster::sanitize(&args.users);
    if users.is_empty() {
        warn!("no participants given, a stand-in participant will be used");
    }
    let inputs = MatchInputs::new(args.room.as_str(), args.seed.as_str(), users);

    let (proof, m) = play(inputs, config, args.fps)?;
    let path = write_proof(&proof, &args.out_dir)?;
    info!(path = %path.display(), "proof written");

    println!("=== Match Result ===");
    println!("Ticks: {}", m.tick());
    println!("Survivors: {}", m.entities().len());
    for e in m.entities() {
        match e.health() {
            Some(hp) => println!("  {} ({}) hp={}", e.id, e.kind().as_str(), hp),
            None => println!("  {} ({})", e.id, e.kind().as_str()),
        }
    }
    println!("Events: {}", proof.document.events.len());
    println!("Fingerprint: {}", proof.fingerprint);
    println!("Proof: {}", path.display());
    Ok(ExitCode::SUCCESS)
}

/// Fingerprint the file and compare it with what the caller expects.
/// Returns `(computed, expected)`.
fn check_file(path: &Path, expect: Option<&str>) -> Result<(String, Option<String>)> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let computed = verify(&text).with_context(|| format!("{} is not a proof", path.display()))?;
    let expected = expect.map(str::to_string).or_else(|| {
        path.file_name()
            .and_then(|n| n.to_str())
            .and_then(fingerprint_from_file_name)
            .map(str::to_string)
    });
    Ok((computed, expected))
}

fn cmd_verify(args: VerifyArgs) -> Result<ExitCode> {
    let (computed, expected) = check_file(&args.file, args.expect.as_deref())?;
    println!("Computed: {computed}");
    match expected {
        Some(expected) if expected.eq_ignore_ascii_case(&computed) => {
            println!("OK: matches {expected}");
            Ok(ExitCode::SUCCESS)
        }
        Some(expected) => {
            println!("MISMATCH: expected {expected}");
            Ok(ExitCode::FAILURE)
        }
        None => {
            warn!("no fingerprint to compare against, pass --expect");
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn cmd_seed(text: &str) {
    let seed = derive_seed(text);
    println!("Digest: {}", digest_hex(text));
    println!("Seed: {} (0x{})", seed, hex::encode(seed.to_be_bytes()));
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("failed to set tracing subscriber")?;

    match cli.command {
        Command::Run(args) => cmd_run(args),
        Command::Verify(args) => cmd_verify(args),
        Command::Seed { text } => {
            cmd_seed(&text);
            Ok(ExitCode::SUCCESS)
        }
    }
}
