#![recursion_limit = "256"]

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use ml_wave_forecast::config::AppConfig;
use ml_wave_forecast::training::orchestrator::TrainingOrchestrator;
use ml_wave_forecast::training::progress::ConsoleSink;
use ml_wave_forecast::ui::App;

/// Forecast sine waves with an LSTM, watched from a live TUI dashboard.
#[derive(Parser)]
#[command(
    name = "wave-forecast",
    about = "LSTM sine-wave forecasting with a live TUI dashboard"
)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Run one training run on stdout, without the TUI dashboard
    #[arg(long)]
    headless: bool,

    /// Override the number of generated sequences
    #[arg(long)]
    count: Option<usize>,

    /// Override the number of training epochs
    #[arg(long)]
    epochs: Option<usize>,

    /// Seed the wave generator for a reproducible pool
    #[arg(long)]
    seed: Option<u64>,

    /// Write the per-epoch loss history as JSON after a headless run
    #[arg(long)]
    history_out: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    // Apply CLI overrides
    if let Some(count) = cli.count {
        config.generation.count = count;
    }
    if let Some(epochs) = cli.epochs {
        config.training.epochs = epochs;
    }
    config
        .validate()
        .context("validating configuration after overrides")?;

    if cli.headless {
        run_headless(config, &cli)
    } else {
        run_tui(config, cli.seed)
    }
}

fn run_headless(config: AppConfig, cli: &Cli) -> Result<()> {
    let mut orchestrator = TrainingOrchestrator::new(config.generation, config.training);
    if let Some(seed) = cli.seed {
        orchestrator = orchestrator.with_seed(seed);
    }

    let n = orchestrator.generate();
    println!("Generated {n} sequences");

    let mut sink = ConsoleSink;
    let report = orchestrator.train(&mut sink)?;

    println!(
        "Test MSE over {} sequences: {:.6}",
        report.sequences.len(),
        report.mean_squared_error()
    );

    if let Some(path) = &cli.history_out {
        let json = serde_json::to_string_pretty(orchestrator.history())
            .context("serializing loss history")?;
        fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        println!("Wrote loss history to {}", path.display());
    }

    Ok(())
}

fn run_tui(config: AppConfig, seed: Option<u64>) -> Result<()> {
    // Setup terminal
    enable_raw_mode().context("enabling raw mode")?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("creating terminal")?;

    let mut app = App::new(config, seed);
    let res = app.run(&mut terminal);

    // Restore terminal even when the app loop errored
    let _ = disable_raw_mode();
    let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let _ = terminal.show_cursor();

    res.context("running dashboard")
}
