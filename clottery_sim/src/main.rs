//! CLottery CLI
//!
//! Manage a weighted name pool and draw winners from it.

use clap::{Parser, Subcommand};
use clottery_core::expected_shares;
use clottery_env::{EnvError, JsonFileStore, OsContext, StateStore, DEFAULT_STATE_FILE};
use clottery_sim::{
    execute, load_table, run_draw, AppConfig, AppError, ScenarioId, SimContext, TableCommand,
    TrialReport, TrialRunner,
};
use std::io::Write;
use std::path::PathBuf;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

/// CLottery - weighted name drawing
#[derive(Parser, Debug)]
#[command(name = "clottery")]
#[command(about = "Draw a winner from a weighted name pool", long_about = None)]
struct Args {
    /// Path of the persisted weight table
    #[arg(long, default_value = DEFAULT_STATE_FILE, global = true)]
    state: PathBuf,

    /// Seed for reproducible draws (0 = OS entropy)
    #[arg(short, long, default_value = "0", global = true)]
    seed: u64,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// JSON output for scripting
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Add an entrant; every weight is reset to an equal share
    Add { name: String },

    /// Remove an entrant; remaining weights are kept as they are
    Remove { name: String },

    /// Set an entrant's weight; the rest is split equally among the others
    SetWeight {
        name: String,
        #[arg(allow_negative_numbers = true)]
        value: f64,
    },

    /// Give every entrant the same weight
    Equalize,

    /// Rescale weights proportionally so they sum to 100
    Normalize,

    /// Show entrants, weights and effective chances
    List,

    /// Draw one winner
    Draw {
        /// How long the result is held back
        #[arg(long, default_value = "3000")]
        delay_ms: u64,

        /// Time between flashed names while waiting
        #[arg(long, default_value = "100")]
        flash_ms: u64,
    },

    /// Verify draw frequencies over seeded batches
    Simulate {
        /// Scenario to run (skewed, uniform, redistributed, unnormalized, zero_weight, current, all)
        #[arg(short = 'S', long, default_value = "all")]
        scenario: String,

        /// Draws per run
        #[arg(long, default_value = "100000")]
        trials: u64,

        /// Number of consecutive seeds to test
        #[arg(long, default_value = "1", value_parser = clap::value_parser!(u64).range(1..))]
        seeds: u64,

        /// Allowed deviation of observed shares
        #[arg(long, default_value = "0.01")]
        tolerance: f64,
    },
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize logging
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    let config = AppConfig {
        state_path: args.state.clone(),
        seed: args.seed,
        ..AppConfig::default()
    };
    let store = JsonFileStore::new(&config.state_path);

    let code = match run(args, config, &store).await {
        Ok(code) => code,
        Err(e) => {
            error!("{}", e);
            1
        }
    };

    // Exit with proper code for scripting
    std::process::exit(code);
}

async fn run(args: Args, config: AppConfig, store: &dyn StateStore) -> Result<i32, AppError> {
    let json = args.json;

    let command = match args.command {
        Command::Add { name } => TableCommand::Add(name),
        Command::Remove { name } => TableCommand::Remove(name),
        Command::SetWeight { name, value } => TableCommand::SetWeight { name, value },
        Command::Equalize => TableCommand::Equalize,
        Command::Normalize => TableCommand::Normalize,
        Command::List => {
            list(store, json)?;
            return Ok(0);
        }
        Command::Draw { delay_ms, flash_ms } => {
            draw(store, config.with_reveal_ms(delay_ms, flash_ms), json).await?;
            return Ok(0);
        }
        Command::Simulate {
            scenario,
            trials,
            seeds,
            tolerance,
        } => {
            let config = AppConfig {
                trials,
                tolerance,
                ..config
            };
            return simulate(store, &config, &scenario, seeds, json);
        }
    };

    execute(store, &command)?;
    if !json {
        list(store, false)?;
    }
    Ok(0)
}

fn list(store: &dyn StateStore, json: bool) -> Result<(), AppError> {
    let table = load_table(store)?;
    let snapshot = table.snapshot();
    let shares = expected_shares(&snapshot);

    if json {
        let summary = serde_json::json!({
            "entrants": snapshot.iter().zip(&shares).map(|((name, weight), (_, share))| {
                serde_json::json!({
                    "name": name,
                    "weight": weight,
                    "effective_chance": share,
                })
            }).collect::<Vec<_>>(),
            "total": table.total(),
            "normalized": table.is_normalized(),
        });
        print_json(&summary)?;
        return Ok(());
    }

    if table.is_empty() {
        info!("No entrants yet. Add one with `clottery add <name>`");
        return Ok(());
    }

    for ((name, weight), (_, share)) in snapshot.iter().zip(&shares) {
        println!("{:<24} {:>7.2}%   (chance {:>6.2}%)", name, weight, share * 100.0);
    }
    if !table.is_normalized() {
        info!(
            "Weights sum to {:.2}%, not 100% (run `clottery normalize` or `clottery equalize`)",
            table.total()
        );
    }
    Ok(())
}

async fn draw(store: &dyn StateStore, config: AppConfig, json: bool) -> Result<(), AppError> {
    let snapshot = load_table(store)?.snapshot();

    let on_flash = move |name: &str| {
        if !json {
            let mut err = std::io::stderr();
            let _ = write!(err, "\r{:<32}", name);
            let _ = err.flush();
        }
    };

    // Seeded draws are reproducible and skip the wall-clock wait
    let winner = if config.is_seeded() {
        let ctx = SimContext::shared(config.seed);
        run_draw(ctx, snapshot, config.session.clone(), on_flash).await?
    } else {
        run_draw(OsContext::shared(), snapshot, config.session.clone(), on_flash).await?
    };

    if json {
        print_json(&serde_json::json!({ "winner": winner, "seed": config.seed }))?;
    } else {
        eprint!("\r{:<32}\r", "");
        println!("The lucky one is: {}", winner);
    }
    Ok(())
}

fn simulate(
    store: &dyn StateStore,
    config: &AppConfig,
    scenario: &str,
    seeds: u64,
    json: bool,
) -> Result<i32, AppError> {
    // Parse scenarios; "current" means the persisted table
    let use_current = scenario == "current";
    let scenarios: Vec<ScenarioId> = if use_current {
        Vec::new()
    } else if scenario == "all" {
        ScenarioId::all()
    } else {
        match scenario.parse() {
            Ok(id) => vec![id],
            Err(e) => {
                error!("{}", e);
                error!("Available scenarios: skewed, uniform, redistributed, unnormalized, zero_weight, current, all");
                return Ok(1);
            }
        }
    };

    // Determine base seed
    let base_seed = if config.is_seeded() {
        config.seed
    } else {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(1)
    };

    let current = if use_current {
        Some(load_table(store)?.snapshot())
    } else {
        None
    };

    let mut reports: Vec<TrialReport> = Vec::new();
    for seed_offset in 0..seeds {
        let seed = base_seed.wrapping_add(seed_offset);
        let runner = TrialRunner::new(seed)
            .with_trials(config.trials)
            .with_tolerance(config.tolerance);

        if let Some(snapshot) = &current {
            reports.push(runner.run_snapshot("current", snapshot)?);
        }
        for scenario in &scenarios {
            reports.push(runner.run(*scenario)?);
        }
    }

    let failed: Vec<&TrialReport> = reports.iter().filter(|r| !r.passed).collect();

    if json {
        print_json(&serde_json::json!({
            "total": reports.len(),
            "passed": reports.len() - failed.len(),
            "failed": failed.len(),
            "results": reports,
        }))?;
    } else {
        for report in &reports {
            if report.passed {
                info!(
                    "✓ {} (seed={}) PASSED, max deviation {:.4}",
                    report.label, report.seed, report.max_deviation
                );
            } else {
                error!(
                    "✗ {} (seed={}) FAILED, max deviation {:.4} > {:.4}",
                    report.label, report.seed, report.max_deviation, report.tolerance
                );
            }
            for entrant in &report.entrants {
                info!(
                    "    {:<16} observed {:>6.2}%  expected {:>6.2}%",
                    entrant.name,
                    entrant.observed * 100.0,
                    entrant.expected * 100.0
                );
            }
        }

        if failed.is_empty() {
            info!("All {} runs passed", reports.len());
        } else {
            error!("{}/{} runs failed", failed.len(), reports.len());
        }
    }

    Ok(if failed.is_empty() { 0 } else { 1 })
}

fn print_json(value: &serde_json::Value) -> Result<(), AppError> {
    let text = serde_json::to_string_pretty(value).map_err(EnvError::serialization)?;
    println!("{}", text);
    Ok(())
}
