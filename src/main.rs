// Copyright 2025 Servus Altissimi (Pseudonym)

// Permission is hereby granted, free of charge, to any person obtaining a copy of this software and associated documentation files (the "Software"), to deal in the Software without restriction, including without limitation the rights to use, copy, modify, merge, publish, distribute, sublicense, and/or sell copies of the Software, and to permit persons to whom the Software is furnished to do so, subject to the following conditions:
// The above copyright notice and this permission notice shall be included in all copies or substantial portions of the Software.
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use botmarket::metrics::analyzer::{self, AnalysisReport, SweepSummary};
use botmarket::metrics::logger::{self, SnapshotLogger};
use botmarket::metrics::RoundSnapshot;
use botmarket::simulation::scenario::load_scenario;
use botmarket::simulation::{Simulation, SimConfig, Termination};
use botmarket::strategies::StrategyRegistry;
use botmarket::ConfigError;

use anyhow::Result;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::time::interval;
use tracing::{info, Level};

const TEMPLATES_DIR: &str = "templates";

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long)]
    verbose: bool,
}

#[derive(clap::Args, Clone)]
struct Overrides {
    /// Scenario file; the built-in fair game when omitted.
    #[arg(short, long)]
    scenario: Option<PathBuf>,
    #[arg(short, long)]
    attacker: Option<String>,
    #[arg(short, long)]
    defender: Option<String>,
    /// Legitimate share of traffic, 0..=1.
    #[arg(short, long)]
    good_traffic: Option<f64>,
    #[arg(short = 'm', long, default_value_t = 1000)]
    max_rounds: u64,
}

#[derive(Subcommand)]
enum Commands {
    Run {
        #[command(flatten)]
        overrides: Overrides,
        #[arg(long)]
        seed: Option<u64>,
        /// Pause between rounds; 0 runs straight through.
        #[arg(long, default_value_t = 0)]
        step_ms: u64,
        #[arg(short, long, default_value = "results")]
        out: String,
        #[arg(long)]
        no_save: bool,
    },

    Sweep {
        #[command(flatten)]
        overrides: Overrides,
        #[arg(short = 'n', long, default_value_t = 32)]
        runs: u64,
        #[arg(long, default_value_t = 1)]
        base_seed: u64,
        #[arg(short, long, default_value = "results")]
        out: String,
    },

    Analyze {
        #[arg(default_value = "results")]
        path: String,
    },

    List,
}

#[tokio::main]
async fn main() -> Result<()> {
    let program_start = Instant::now();

    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Run { overrides, seed, step_ms, out, no_save } => {
            let mut config = build_config(&overrides)?;
            if let Some(seed) = seed {
                config = config.with_seed(seed);
            }
            run_single(config, overrides.max_rounds, step_ms, (!no_save).then_some(out)).await?;
        }

        Commands::Sweep { overrides, runs, base_seed, out } => {
            let config = build_config(&overrides)?;
            run_sweep(config, overrides.max_rounds, runs, base_seed, &out)?;
        }

        Commands::Analyze { path } => {
            analyze_results(&path)?;
        }

        Commands::List => {
            let registry = StrategyRegistry::global();
            println!("\nAttacker strategies");
            for name in registry.list_attackers() {
                println!("  - {}", name);
            }
            println!("\nDefender strategies");
            for name in registry.list_defenders() {
                println!("  - {}", name);
            }

            println!("\nBundled scenarios");
            for path in list_templates(TEMPLATES_DIR) {
                println!("  - {}", path.display());
            }

            println!("\nExample: cargo run -- run --scenario templates/high_stakes.txt --attacker legacy\n");
        }
    }

    info!("Total runtime: {:.2}s", program_start.elapsed().as_secs_f64());

    Ok(())
}

fn build_config(overrides: &Overrides) -> Result<SimConfig, ConfigError> {
    let mut config = match &overrides.scenario {
        Some(path) => load_scenario(path)?,
        None => SimConfig::default(),
    };

    if let Some(name) = &overrides.attacker {
        config = config.with_attacker_strategy(name.clone());
    }
    if let Some(name) = &overrides.defender {
        config = config.with_defender_strategy(name.clone());
    }
    if let Some(fraction) = overrides.good_traffic {
        config = config.with_good_traffic(fraction);
    }

    config.validate()?;
    Ok(config)
}

async fn run_single(config: SimConfig, max_rounds: u64, step_ms: u64, out: Option<String>) -> Result<()> {
    let mut sim = Simulation::new(config)?;

    let termination = if step_ms == 0 {
        sim.run(max_rounds)
    } else {
        info!("Stepping every {}ms, Ctrl-C to stop", step_ms);
        let mut tick = interval(Duration::from_millis(step_ms));
        let ctrl_c = tokio::signal::ctrl_c();
        tokio::pin!(ctrl_c);

        while sim.should_continue() && sim.rounds() < max_rounds {
            tokio::select! {
                _ = tick.tick() => {
                    let outcome = sim.run_round();
                    print_round(&outcome.snapshot);
                }
                _ = &mut ctrl_c => {
                    info!("Interrupted after {} rounds", sim.rounds());
                    break;
                }
            }
        }
        sim.termination()
    };

    print_termination(&termination);

    if let Some(out) = out {
        save_results(&sim, &out)?;
    }
    Ok(())
}

fn print_round(s: &RoundSnapshot) {
    info!(
        "Round {:>4} | attacker {:>14.2} ({:+.2}) | defender {:>14.2} ({:+.2}) | bots {} | firewall {:.3} {}",
        s.round,
        s.attacker_currency,
        s.attacker_change,
        s.defender_currency,
        s.defender_change,
        s.num_bots,
        s.firewall_type,
        s.firewall_quality
    );
}

fn print_termination(t: &Termination) {
    let s = &t.final_snapshot;
    info!("Game over after {} rounds ({:?})", t.final_round, t.reason);
    info!("Final attacker currency: {:.2}", s.attacker_currency);
    info!("Final defender currency: {:.2}", s.defender_currency);
    info!("Final bot count: {}", s.num_bots);
    info!("Final firewall: {:.3} ({})", s.firewall_type, s.firewall_quality);
    info!("Winner: {:?}", t.winner);
}

fn save_results(sim: &Simulation, out: &str) -> Result<()> {
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let name = &sim.config().name;

    std::fs::create_dir_all(out)?;

    let csv_path = format!("{}/{}_{}.csv", out, name, timestamp);
    let mut snapshot_logger = SnapshotLogger::new(&csv_path)?;
    snapshot_logger.log_batch(sim.history().snapshots())?;
    info!("Rounds saved to: {}", csv_path);

    let events_path = format!("{}/{}_{}_events.jsonl", out, name, timestamp);
    logger::write_events(&events_path, sim.history().events())?;
    info!("Round log saved to: {}", events_path);

    let report = analyzer::analyze(sim);
    let json_path = format!("{}/{}_{}_analysis.json", out, name, timestamp);
    std::fs::write(&json_path, serde_json::to_string_pretty(&report)?)?;
    info!("Analysis saved to: {}", json_path);

    Ok(())
}

fn run_sweep(config: SimConfig, max_rounds: u64, runs: u64, base_seed: u64, out: &str) -> Result<()> {
    info!("Sweep: {} x {} seeds from {}", config.name, runs, base_seed);
    info!("Attacker: {}, defender: {}", config.attacker_strategy, config.defender_strategy);

    let pb = ProgressBar::new(runs);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.red/blue} {pos}/{len} runs {msg}")?
            .progress_chars("█▓░"),
    );

    let reports = (0..runs)
        .into_par_iter()
        .map(|i| -> Result<AnalysisReport, ConfigError> {
            let mut sim = Simulation::new(config.clone().with_seed(base_seed + i))?;
            sim.run(max_rounds);
            pb.inc(1);
            Ok(analyzer::analyze(&sim))
        })
        .collect::<Result<Vec<AnalysisReport>, ConfigError>>()?;

    pb.finish_with_message("done");

    let summary = analyzer::summarize(&reports);
    print_summary(&summary);

    std::fs::create_dir_all(out)?;
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let path = format!("{}/{}_{}_sweep.json", out, config.name, timestamp);
    std::fs::write(&path, serde_json::to_string_pretty(&reports)?)?;
    info!("Sweep reports saved to: {}", path);

    Ok(())
}

fn print_summary(summary: &SweepSummary) {
    let pct = |n: usize| n as f64 / summary.runs.max(1) as f64 * 100.0;
    println!();
    println!("Scenario:       {}", summary.scenario);
    println!("Runs:           {}", summary.runs);
    println!("Attacker wins:  {} ({:.1}%)", summary.attacker_wins, pct(summary.attacker_wins));
    println!("Defender wins:  {} ({:.1}%)", summary.defender_wins, pct(summary.defender_wins));
    println!("Stalemates:     {} ({:.1}%)", summary.stalemates, pct(summary.stalemates));
    println!("Avg rounds:     {:.1}", summary.avg_rounds);
    println!("Avg intrusion:  {:.3}", summary.avg_intrusion_rate);
    println!("Avg attacker:   {:.2}", summary.avg_final_attacker_currency);
    println!("Avg defender:   {:.2}", summary.avg_final_defender_currency);
    println!();
}

fn analyze_results(path: &str) -> Result<()> {
    info!("Analyzing results in: {}", path);

    let mut reports = Vec::new();
    for entry in std::fs::read_dir(path)? {
        let path = entry?.path();
        if path.extension().and_then(|s| s.to_str()) != Some("json") {
            continue;
        }

        let content = std::fs::read_to_string(&path)?;
        let name = path.to_string_lossy();
        if name.contains("_sweep") {
            reports.extend(serde_json::from_str::<Vec<AnalysisReport>>(&content)?);
        } else if name.contains("_analysis") {
            reports.push(serde_json::from_str::<AnalysisReport>(&content)?);
        }
    }

    if reports.is_empty() {
        info!("No analysis files found.");
        return Ok(());
    }

    comparison_table(&reports);
    Ok(())
}

fn comparison_table(reports: &[AnalysisReport]) {
    println!("\n{:<20} {:<17} {:<9} {:>6} {:>10} {:>16} {:>16} {:>9}",
        "Scenario", "Attacker", "Defender", "Seed", "Winner", "Attacker $", "Defender $", "Rounds");
    println!("{}", "-".repeat(110));

    for r in reports {
        println!(
            "{:<20} {:<17} {:<9} {:>6} {:>10} {:>16.2} {:>16.2} {:>9}",
            r.scenario,
            r.attacker_strategy,
            r.defender_strategy,
            r.seed,
            format!("{:?}", r.winner),
            r.final_attacker_currency,
            r.final_defender_currency,
            r.rounds,
        );
    }
    println!();
}

fn list_templates(dir: impl AsRef<Path>) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok().map(|e| e.path()))
                .filter(|p| p.extension().and_then(|s| s.to_str()) == Some("txt"))
                .collect()
        })
        .unwrap_or_default();
    paths.sort();
    paths
}
