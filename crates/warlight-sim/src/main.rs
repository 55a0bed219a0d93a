use std::path::PathBuf;

use clap::Parser;

use warlight_sim::config::SimConfig;
use warlight_sim::logging::init_logging;
use warlight_sim::replay::ReplayRunner;

/// Replays recorded turn standings through one of the registered bots.
#[derive(Debug, Parser)]
#[command(
    name = "warlight-sim",
    author,
    version,
    about = "Replay harness for WarLight bots and the enemy tracker"
)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "replays/replay.yaml")]
    config: PathBuf,

    /// Override the run identifier (substitutes {run_id} templates).
    #[arg(long, value_name = "RUN_ID")]
    run_id: Option<String>,

    /// Override the bot name (case-insensitive).
    #[arg(long, value_name = "NAME")]
    bot: Option<String>,

    /// Exit after validating the configuration and loading the map.
    #[arg(long)]
    validate_only: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = SimConfig::from_path(&cli.config)?;

    if let Some(run_id) = cli.run_id {
        config.run_id = run_id;
    }

    if let Some(bot) = cli.bot {
        config.bot = bot;
    }

    config.validate()?;

    let outputs = config.resolved_outputs();
    let run_id = config.run_id.clone();
    println!(
        "Loaded configuration '{run_id}' for bot {} ({} armies per turn)",
        config.bot, config.income
    );

    let logging_guard = init_logging(&config.logging, &outputs)?;
    let runner = ReplayRunner::new(config, outputs)?;
    println!(
        "Map '{}': {} territories, {} bonuses",
        runner.map().name(),
        runner.map().territory_count(),
        runner.map().bonus_count()
    );

    if cli.validate_only {
        println!("Validation-only mode: replay skipped.");
        return Ok(());
    }

    let summary = runner.run()?;
    println!(
        "Replay complete for '{run_id}': {} played {} turns → {} rows at {}",
        summary.bot,
        summary.turns_played,
        summary.rows_written,
        summary.jsonl_path.display()
    );
    if let Some(income) = summary.final_enemy_income {
        println!("Final enemy income estimate: {income:.2}");
    }
    if let Some(guard) = logging_guard.as_ref() {
        println!("Telemetry log: {}", guard.telemetry_path.display());
    }

    Ok(())
}
