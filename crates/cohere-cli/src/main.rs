mod config;

use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cohere_core::{
    AuditorConfig, AuditorSession, EnvironmentClock, IntentOutcome, bridged_causality,
    check_causality, export_json,
};
use rand::SeedableRng;
use rand::rngs::SmallRng;

#[derive(Parser)]
#[command(name = "cohere", about = "State-coherence monitor CLI")]
struct Cli {
    /// TOML config file (falls back to COHERE_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Seed the environment clock for a reproducible run
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Enable verbose debug output
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Audit intents in order within one session, then print the receipt
    Audit {
        /// Intent texts
        #[arg(required = true)]
        texts: Vec<String>,

        /// Feed the whole list this many times
        #[arg(long, default_value_t = 1)]
        repeat: usize,

        /// Emit a JSON session snapshot instead of text
        #[arg(long)]
        json: bool,
    },

    /// Audit one intent per line from a file or stdin
    Monitor {
        /// Input file (stdin if omitted)
        #[arg(long)]
        input: Option<PathBuf>,

        /// Emit a JSON session snapshot instead of text
        #[arg(long)]
        json: bool,
    },

    /// Advance the environment clock and print raw tick reports
    Tick {
        #[arg(long, default_value_t = 1)]
        count: usize,

        /// Duration units per tick
        #[arg(long, default_value_t = 1.0)]
        duration: f64,
    },

    /// Check whether an event is inside the light cone
    Causality {
        /// Event distance
        #[arg(required_unless_present = "bridge")]
        distance: Option<f64>,

        /// Elapsed time since the event
        #[arg(required_unless_present = "bridge")]
        time_delta: Option<f64>,

        /// Use the bridge shortcut instead of a plain check
        #[arg(long, conflicts_with_all = ["distance", "time_delta"])]
        bridge: bool,
    },
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let file_config = config::resolve(cli.config.as_deref())?;
    let seed = cli.seed.or(file_config.seed);
    let auditor = file_config.auditor;

    match &cli.command {
        Commands::Audit {
            texts,
            repeat,
            json,
        } => cmd_audit(auditor, seed, texts, *repeat, *json),
        Commands::Monitor { input, json } => cmd_monitor(auditor, seed, input.as_deref(), *json),
        Commands::Tick { count, duration } => cmd_tick(auditor, seed, *count, *duration),
        Commands::Causality {
            distance,
            time_delta,
            bridge,
        } => cmd_causality(*distance, *time_delta, *bridge),
    }
}

fn rng(seed: Option<u64>) -> SmallRng {
    match seed {
        Some(s) => SmallRng::seed_from_u64(s),
        None => SmallRng::from_os_rng(),
    }
}

fn open_session(config: AuditorConfig, seed: Option<u64>) -> Result<AuditorSession> {
    let session = AuditorSession::with_source(config, rng(seed))
        .context("failed to create auditor session")?;
    tracing::info!("session {} started (seed: {:?})", session.id(), seed);
    Ok(session)
}

fn print_outcome(index: usize, text: &str, outcome: &IntentOutcome, dilation: f64) {
    println!(
        "[{index}] {:<12} purity={:.4} dilation={:.4}  {text:?}",
        outcome.causal_status.as_str(),
        outcome.purity_score,
        dilation
    );
}

fn finish(session: &AuditorSession, json: bool) -> Result<()> {
    if json {
        let out = export_json(session).context("failed to serialize session")?;
        println!("{out}");
    } else {
        println!("{}", session.generate_receipt());
    }
    Ok(())
}

fn audit_one(session: &mut AuditorSession, index: usize, text: &str, json: bool) {
    let outcome = session.process_intent(text);
    if !json {
        let dilation = session.history().last().map_or(0.0, |r| r.dilation);
        print_outcome(index, text, &outcome, dilation);
    }
}

fn cmd_audit(
    config: AuditorConfig,
    seed: Option<u64>,
    texts: &[String],
    repeat: usize,
    json: bool,
) -> Result<()> {
    let mut session = open_session(config, seed)?;
    let mut index = 0;
    for _ in 0..repeat {
        for text in texts {
            index += 1;
            audit_one(&mut session, index, text, json);
        }
    }
    finish(&session, json)
}

fn cmd_monitor(
    config: AuditorConfig,
    seed: Option<u64>,
    input: Option<&Path>,
    json: bool,
) -> Result<()> {
    let reader: Box<dyn BufRead> = match input {
        Some(path) => Box::new(BufReader::new(
            std::fs::File::open(path)
                .with_context(|| format!("failed to open {}", path.display()))?,
        )),
        None => Box::new(BufReader::new(std::io::stdin())),
    };

    let mut session = open_session(config, seed)?;
    for (i, line) in reader.lines().enumerate() {
        let line = line.context("failed to read input line")?;
        audit_one(&mut session, i + 1, &line, json);
    }
    finish(&session, json)
}

fn cmd_tick(config: AuditorConfig, seed: Option<u64>, count: usize, duration: f64) -> Result<()> {
    config
        .environment
        .validate()
        .context("invalid environment config")?;
    let mut clock = EnvironmentClock::with_source(config.environment, rng(seed));

    for i in 1..=count {
        let report = clock.tick(duration);
        let interrupts: Vec<String> = report.interrupts.iter().map(|e| e.to_string()).collect();
        println!(
            "tick {i}: dilation={:.4} experienced={:.4} interrupts=[{}]",
            report.dilation_factor,
            report.experienced_time,
            interrupts.join(", ")
        );
    }

    let state = clock.state();
    println!("ticks:      {}", state.ticks);
    println!("entropy:    {:.4}", state.entropy_accumulator);
    println!("planck:     {:.3e}", state.tick_count);
    println!("flare:      {}", state.solar_flare_active);
    Ok(())
}

fn cmd_causality(distance: Option<f64>, time_delta: Option<f64>, bridge: bool) -> Result<()> {
    let check = if bridge {
        bridged_causality()
    } else {
        let distance = distance.context("distance is required")?;
        let time_delta = time_delta.context("time_delta is required")?;
        check_causality(distance, time_delta)
    };
    println!(
        "{} visible={} lag={}",
        check.region, check.visible, check.lag
    );
    Ok(())
}
