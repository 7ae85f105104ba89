//! LocoHFT - Band Mean Reversion Signal Engine
//!
//! Host binary: replays tick files through the engine and exposes the risk
//! gate, weight fallback and volatility analytics from the command line.

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, EnvFilter};

use loco_hft::adapters::cli::{CliApp, Command, ReplayCmd, RiskCmd, SimulateCmd, VolatilityCmd, WeightsCmd};
use loco_hft::adapters::{write_tick, SimulatorConfig, TickReader, TickSimulator};
use loco_hft::config::{load_config, Config};
use loco_hft::domain::{historical_var95, PaperPortfolio, RiskVerdict};
use loco_hft::strategy::{realized_volatility, VolatilityRegime};
use loco_hft::{ReversionEngine, TickOutcome};

/// Exit status when the risk gate halts
const HALT_EXIT_CODE: i32 = 2;

fn main() -> Result<()> {
    // Load .env file if it exists
    dotenvy::dotenv().ok();

    let app = CliApp::parse();

    let config = match config_path(&app.command) {
        Some(path) => load_config(expand_path(path))
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => Config::default(),
    };
    init_logging(app.verbose, app.debug, &config.logging.level)?;

    match app.command {
        Command::Replay(cmd) => replay_command(cmd, &config),
        Command::Risk(cmd) => risk_command(cmd, &config),
        Command::Weights(cmd) => weights_command(cmd),
        Command::Simulate(cmd) => simulate_command(cmd),
        Command::Volatility(cmd) => volatility_command(cmd),
    }
}

fn config_path(command: &Command) -> Option<&PathBuf> {
    match command {
        Command::Replay(cmd) => cmd.config.as_ref(),
        Command::Risk(cmd) => cmd.config.as_ref(),
        _ => None,
    }
}

fn init_logging(verbose: bool, debug: bool, config_level: &str) -> Result<()> {
    let filter = if debug {
        EnvFilter::new("debug")
    } else if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config_level))
    };

    // stdout carries JSON output
    fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialise logging: {}", e))?;
    Ok(())
}

/// Expand `~` and environment variables in a user-supplied path
fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    match shellexpand::full(&raw) {
        Ok(expanded) => PathBuf::from(expanded.into_owned()),
        Err(_) => path.to_path_buf(),
    }
}

fn open_ticks(path: &Path) -> Result<TickReader<Box<dyn BufRead>>> {
    let reader: Box<dyn BufRead> = if path.as_os_str() == "-" {
        Box::new(BufReader::new(io::stdin()))
    } else {
        let expanded = expand_path(path);
        let file = fs::File::open(&expanded)
            .with_context(|| format!("Failed to open tick file {}", expanded.display()))?;
        Box::new(BufReader::new(file))
    };
    Ok(TickReader::new(reader))
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let expanded = expand_path(path);
    let content = fs::read_to_string(&expanded)
        .with_context(|| format!("Failed to read {}", expanded.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {}", expanded.display()))
}

fn replay_command(cmd: ReplayCmd, config: &Config) -> Result<()> {
    let mut engine_config = config.engine_config().context("Invalid engine configuration")?;
    if let Some(capital) = cmd.capital {
        engine_config.capital = capital;
    }
    if let Some(lookback) = cmd.lookback {
        engine_config.strategy.lookback = lookback;
    }
    let engine = ReversionEngine::new(engine_config).context("Failed to create engine")?;

    tracing::info!(
        capital = engine.capital(),
        lookback = engine.lookback(),
        "Replaying {}",
        cmd.ticks.display()
    );

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut portfolio = PaperPortfolio::new();
    let mut marks: BTreeMap<String, f64> = BTreeMap::new();
    let (mut ticks, mut rejected) = (0usize, 0usize);

    for tick in open_ticks(&cmd.ticks)? {
        let tick = tick.context("Failed to read tick")?;
        ticks += 1;
        match engine.on_tick(&tick) {
            Ok(outcome) => {
                marks.insert(tick.symbol.clone(), tick.price);
                if let TickOutcome::Signal(signal) = outcome {
                    let fill = portfolio.execute(&signal);
                    tracing::debug!(
                        symbol = %fill.symbol,
                        realized_pnl = fill.realized_pnl,
                        position = fill.position,
                        "Paper fill"
                    );
                    serde_json::to_writer(&mut out, &signal)?;
                    writeln!(out)?;
                }
            }
            Err(e) if e.is_invalid_input() => {
                rejected += 1;
                tracing::warn!(symbol = %tick.symbol, "Rejected tick: {}", e);
            }
            Err(e) => return Err(e).context("Engine failure"),
        }
    }
    out.flush()?;
    drop(out);

    eprintln!(
        "Processed {} ticks, {} signals, {} rejected",
        ticks,
        portfolio.fill_count(),
        rejected
    );
    eprintln!(
        "  {:<12} {:>8} {:>12} {:>14} {:>14}",
        "SYMBOL", "POSITION", "AVG PRICE", "REALIZED", "UNREALIZED"
    );
    let mut unrealized_total = 0.0;
    for (symbol, position) in engine.positions() {
        let holding = portfolio.holding(&symbol).copied().unwrap_or_default();
        let unrealized = marks
            .get(&symbol)
            .map(|&mark| holding.unrealized_pnl(mark))
            .unwrap_or(0.0);
        unrealized_total += unrealized;
        eprintln!(
            "  {:<12} {:>8} {:>12.4} {:>14.2} {:>14.2}",
            symbol, position, holding.avg_price, holding.realized_pnl, unrealized
        );
    }
    eprintln!(
        "Realized PnL {:.2}, unrealized PnL {:.2}",
        portfolio.total_realized_pnl(),
        unrealized_total
    );
    Ok(())
}

fn risk_command(cmd: RiskCmd, config: &Config) -> Result<()> {
    let engine_config = config.engine_config().context("Invalid engine configuration")?;
    let engine = ReversionEngine::new(engine_config).context("Failed to create engine")?;

    let var95 = match (cmd.var95, &cmd.returns) {
        (Some(var95), _) => var95,
        (None, Some(path)) => {
            let returns: Vec<f64> = read_json(path)?;
            historical_var95(&returns) * cmd.exposure.abs()
        }
        (None, None) => bail!("Either --var95 or --returns is required"),
    };

    match engine.risk_verdict(var95, cmd.exposure) {
        RiskVerdict::Allow => {
            println!("ALLOW var95={:.2} limit={:.2}", var95, engine.risk_limit());
            Ok(())
        }
        RiskVerdict::Halt { var95, limit } => {
            println!("HALT var95={:.2} limit={:.2}", var95, limit);
            std::process::exit(HALT_EXIT_CODE);
        }
    }
}

fn weights_command(cmd: WeightsCmd) -> Result<()> {
    let returns: Vec<Vec<f64>> = read_json(&cmd.returns)?;
    let engine = ReversionEngine::default();
    let weights = engine
        .calculate_portfolio_weights(&returns)
        .context("Cannot allocate weights")?;
    println!("{}", serde_json::to_string(&weights)?);
    Ok(())
}

fn simulate_command(cmd: SimulateCmd) -> Result<()> {
    if !(cmd.start.is_finite() && cmd.start > 0.0) {
        bail!("--start must be a positive price, got {}", cmd.start);
    }
    if !(cmd.vol.is_finite() && cmd.vol >= 0.0) {
        bail!("--vol must be non-negative, got {}", cmd.vol);
    }

    let simulator = TickSimulator::new(SimulatorConfig {
        symbols: cmd.symbols,
        start_price: cmd.start,
        volatility: cmd.vol,
        seed: cmd.seed,
    });

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for tick in simulator.take(cmd.count) {
        write_tick(&mut out, &tick)?;
    }
    out.flush()?;
    Ok(())
}

fn volatility_command(cmd: VolatilityCmd) -> Result<()> {
    if cmd.short == 0 || cmd.long == 0 {
        bail!("Horizons must be at least 1 tick");
    }

    let mut series: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for tick in open_ticks(&cmd.ticks)? {
        let tick = tick.context("Failed to read tick")?;
        if let Err(e) = tick.validate() {
            tracing::warn!(symbol = %tick.symbol, "Skipping tick: {}", e);
            continue;
        }
        series.entry(tick.symbol).or_default().push(tick.price);
    }

    println!("{:<12} {:>10} {:>10} {:>10}", "SYMBOL", "SHORT", "LONG", "REGIME");
    for (symbol, prices) in &series {
        let tail = |n: usize| &prices[prices.len().saturating_sub(n)..];
        let short_vol = realized_volatility(tail(cmd.short));
        let long_vol = realized_volatility(tail(cmd.long));
        println!(
            "{:<12} {:>10.4} {:>10.4} {:>10}",
            symbol,
            short_vol,
            long_vol,
            VolatilityRegime::detect(short_vol, long_vol).to_string()
        );
    }
    Ok(())
}
