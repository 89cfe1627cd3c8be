//! sim-runner: headless runner for the martingale dice simulator.
//!
//! Usage:
//!   sim-runner --seed 12345 --balance 200 --base-bet 1 --payout 2 --iterations 1000
//!   sim-runner --config settings.json --loss-adder 50 --json
//!   sim-runner --ipc-mode

use anyhow::Result;
use chrono::{DateTime, Utc};
use martingale_core::{
    account::Account,
    aggregate::AggregateResult,
    config::RunSettings,
    engine::SimEngine,
    event::SimEvent,
};
use std::env;
use std::io::{self, BufRead, Write};

/// Number of rows in the printed balance table.
const SERIES_ROWS: usize = 12;

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    GetSettings,
    UpdateSettings { settings: SettingsUpdate },
    Run,
    Quit,
}

/// Fields a front end may change between runs. Absent fields keep
/// their current value.
#[derive(serde::Deserialize, Default)]
struct SettingsUpdate {
    base_bet: Option<f64>,
    payout: Option<f64>,
    iterations: Option<u64>,
    #[serde(alias = "loss_adder")]
    loss_multiplier_percent: Option<u32>,
    #[serde(alias = "balance")]
    starting_balance: Option<i64>,
    progress_checkpoints: Option<i64>,
    seed: Option<u64>,
}

impl SettingsUpdate {
    fn apply(self, settings: &mut RunSettings) {
        if let Some(v) = self.base_bet { settings.base_bet = v; }
        if let Some(v) = self.payout { settings.payout = v; }
        if let Some(v) = self.iterations { settings.iterations = v; }
        if let Some(v) = self.loss_multiplier_percent { settings.loss_multiplier_percent = v; }
        if let Some(v) = self.starting_balance { settings.starting_balance = v; }
        if let Some(v) = self.progress_checkpoints { settings.progress_checkpoints = v; }
        if self.seed.is_some() { settings.seed = self.seed; }
    }
}

#[derive(serde::Serialize)]
struct RunReport<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    seed: u64,
    started_at: DateTime<Utc>,
    elapsed_ms: i64,
    settings: &'a RunSettings,
    result: &'a AggregateResult,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let json_output = args.iter().any(|a| a == "--json");

    let mut settings = match find_arg(&args, "--config") {
        Some(path) => RunSettings::load(path)?,
        None => RunSettings::default(),
    };
    apply_flags(&args, &mut settings);

    if ipc_mode {
        return run_ipc_loop(settings);
    }

    let engine = build_engine(&settings)?;
    if !json_output {
        print_settings(&engine, &settings);
    }

    let started_at = Utc::now();
    let result = engine.run(settings.progress_checkpoints, &mut |event: &SimEvent| {
        if let SimEvent::ProgressCheckpoint { percent, .. } = event {
            // Keep stdout clean for the JSON report.
            if json_output {
                eprintln!("progress: {percent:.0}%");
            } else {
                println!("  progress: {percent:.0}%");
            }
        }
    })?;
    let elapsed = Utc::now() - started_at;

    if json_output {
        let report = RunReport {
            kind: "result",
            seed: engine.seed(),
            started_at,
            elapsed_ms: elapsed.num_milliseconds(),
            settings: &settings,
            result: &result,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&result);
        println!();
        println!("Time taken: {:.3} seconds", elapsed.num_milliseconds() as f64 / 1000.0);
    }
    Ok(())
}

fn build_engine(settings: &RunSettings) -> Result<SimEngine> {
    let config = settings.config()?;
    let seed = settings.seed.unwrap_or_else(rand::random);
    Ok(SimEngine::new(config, Account::new(settings.starting_balance), seed))
}

fn run_ipc_loop(mut settings: RunSettings) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }
        if buffer.trim().is_empty() {
            continue;
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                write_error(&mut stdout, &e.to_string())?;
                continue;
            }
        };

        match cmd {
            IpcCommand::Quit => break,
            IpcCommand::GetSettings => {
                writeln!(stdout, "{}", settings_json(&settings))?;
            }
            IpcCommand::UpdateSettings { settings: changes } => {
                changes.apply(&mut settings);
                writeln!(stdout, "{}", settings_json(&settings))?;
            }
            IpcCommand::Run => {
                let engine = match build_engine(&settings) {
                    Ok(engine) => engine,
                    Err(e) => {
                        write_error(&mut stdout, &e.to_string())?;
                        continue;
                    }
                };
                let started_at = Utc::now();
                let result = {
                    let mut out = stdout.lock();
                    engine.run(settings.progress_checkpoints, &mut |event: &SimEvent| {
                        let line = serde_json::to_string(event).unwrap_or_default();
                        if let Err(e) = writeln!(out, "{line}").and_then(|_| out.flush()) {
                            log::warn!("Failed to forward {} event: {e}", event.type_name());
                        }
                    })
                };
                match result {
                    Ok(result) => {
                        let report = RunReport {
                            kind: "result",
                            seed: engine.seed(),
                            started_at,
                            elapsed_ms: (Utc::now() - started_at).num_milliseconds(),
                            settings: &settings,
                            result: &result,
                        };
                        writeln!(stdout, "{}", serde_json::to_string(&report)?)?;
                    }
                    Err(e) => write_error(&mut stdout, &e.to_string())?,
                }
            }
        }
        stdout.flush()?;
    }
    Ok(())
}

fn settings_json(settings: &RunSettings) -> serde_json::Value {
    serde_json::json!({ "type": "settings", "settings": settings })
}

fn write_error(stdout: &mut io::Stdout, message: &str) -> Result<()> {
    let err_json = serde_json::json!({ "type": "error", "error": message });
    writeln!(stdout, "{}", err_json)?;
    stdout.flush()?;
    Ok(())
}

fn print_settings(engine: &SimEngine, settings: &RunSettings) {
    let config = engine.config();
    println!("Martingale dice simulator — sim-runner");
    println!("  seed:        {}", engine.seed());
    println!("  balance:     {}", engine.account().balance());
    println!("  base bet:    {}", config.base_bet());
    println!(
        "  payout:      {} (win below {:.2}){}",
        config.payout(),
        config.win_threshold().as_percent(),
        if config.is_payout_valid() { "" } else { " [outside allowed range]" }
    );
    println!("  iterations:  {}", config.iterations());
    println!("  loss adder:  {}%", config.loss_multiplier_percent());
    println!("  checkpoints: {}", engine.verify_progress_checkpoints(settings.progress_checkpoints));
    println!();
}

fn print_summary(result: &AggregateResult) {
    println!();
    println!("=== RUN SUMMARY ===");
    println!("  trials:                     {}", result.trial_count());
    println!("  avg rolls until bankrupt:   {:.2}", result.average_rounds_to_ruin());
    println!("  avg balance during run:     {:.2}", result.average_overall_balance());
    println!("  longest run (rolls):        {}", result.num_of_rolls().saturating_sub(1));
    println!("  median series length:       {}", result.median_balance_series().len());

    println!();
    println!("=== BALANCE BY ROLL ===");
    println!("  {:>8}  {:>12}  {:>12}", "roll", "mean", "median");
    let means = result.mean_balance_series();
    let medians = result.median_balance_series();
    let step = (means.len() / SERIES_ROWS).max(1);
    for roll in (0..means.len()).step_by(step) {
        let median = medians
            .get(roll)
            .map(|m| format!("{m:.1}"))
            .unwrap_or_else(|| "-".to_string());
        println!("  {roll:>8}  {:>12.1}  {median:>12}", means[roll]);
    }
}

/// Override settings with any flags given on the command line.
fn apply_flags(args: &[String], settings: &mut RunSettings) {
    settings.base_bet = parse_arg(args, "--base-bet", settings.base_bet);
    settings.payout = parse_arg(args, "--payout", settings.payout);
    settings.iterations = parse_arg(args, "--iterations", settings.iterations);
    settings.loss_multiplier_percent =
        parse_arg(args, "--loss-adder", settings.loss_multiplier_percent);
    settings.starting_balance = parse_arg(args, "--balance", settings.starting_balance);
    settings.progress_checkpoints =
        parse_arg(args, "--checkpoints", settings.progress_checkpoints);
    if let Some(seed) = find_arg(args, "--seed").and_then(|s| s.parse().ok()) {
        settings.seed = Some(seed);
    }
}

fn find_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
