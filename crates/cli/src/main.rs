use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use controller::{CommandScript, RodController, RodControllerConfig};
use sim::{ReactorModel, ScenarioParameters, SimConfig, TickLog};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "pwr-sim",
    version,
    about = "Discrete-time pressurised-water reactor plant simulation"
)]
struct Args {
    /// Scenario file (JSON) holding the initial plant state
    #[arg(long)]
    scenario: PathBuf,

    /// Coefficient overrides (JSON); defaults are used for anything omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Operator command script (JSON list of {"tick": n, "command": ...})
    #[arg(long)]
    commands: Option<PathBuf>,

    /// Number of ticks to run
    #[arg(long, default_value_t = 60)]
    ticks: u64,

    /// Time step per tick in milliseconds
    #[arg(long, default_value_t = 1000)]
    dt_ms: u64,

    /// Let a PI controller drive the control rods
    #[arg(long)]
    auto_rods: bool,

    /// Core temperature setpoint (°C) for --auto-rods
    #[arg(long, default_value_t = 320.0)]
    setpoint: f64,

    /// Write the human-readable tick log to this file (truncated first)
    #[arg(long)]
    log: Option<PathBuf>,

    /// Stop as soon as a SCRAM is latched
    #[arg(long)]
    stop_on_scram: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let dt_s = (args.dt_ms as f64) / 1000.0;

    let scenario = ScenarioParameters::load(&args.scenario)?;
    let cfg = match &args.config {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };
    let mut script = match &args.commands {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading command script {}", path.display()))?;
            CommandScript::from_json_str(&text)
                .with_context(|| format!("parsing command script {}", path.display()))?
        }
        None => CommandScript::default(),
    };
    let mut rods = args
        .auto_rods
        .then(|| RodController::new(args.setpoint, RodControllerConfig::default()));

    let mut model = ReactorModel::new(&scenario, cfg).context("building reactor model")?;
    let log = match &args.log {
        Some(path) => Some(
            TickLog::create(path).with_context(|| format!("creating tick log {}", path.display()))?,
        ),
        None => None,
    };

    tracing::info!(
        scenario = %scenario.name,
        ticks = args.ticks,
        dt_s,
        auto_rods = args.auto_rods,
        "starting run"
    );

    // Output JSONL trace to stdout (one snapshot per line)
    for k in 0..args.ticks {
        for command in script.due(k) {
            model.apply(command);
        }
        if let Some(rc) = rods.as_mut() {
            if model.is_scrammed() {
                rc.reset();
            } else {
                let command = rc.command(model.snapshot().core.temperature, dt_s);
                model.apply(command);
            }
        }

        let snapshot = model.tick(dt_s)?;
        println!("{}", serde_json::to_string(snapshot)?);
        if let Some(log) = &log {
            log.record(snapshot);
        }

        if args.stop_on_scram && snapshot.safety.scram {
            tracing::warn!(tick = snapshot.tick, reason = ?snapshot.safety.reason, "stopping on SCRAM");
            break;
        }
    }

    if let Some(log) = log {
        log.finish().context("closing tick log")?;
    }
    Ok(())
}
