use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use hud_core::Clock;
use services::{HostNotifier, HttpNotifier, HudConfig, LogNotifier};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, fmt as log_fmt};
use ui::{HudContext, build_hud_context};

const RENDER_PERIOD: Duration = Duration::from_millis(100);

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidFuelRate { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidFuelRate { raw } => write!(f, "invalid --fuel-rate value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

#[derive(Debug, Default)]
struct Args {
    endpoint: Option<String>,
    fuel_rate: Option<f64>,
    dry_run: bool,
    help: bool,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut parsed = Self::default();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--endpoint" => parsed.endpoint = Some(require_value(args, "--endpoint")?),
                "--fuel-rate" => {
                    let value = require_value(args, "--fuel-rate")?;
                    let rate: f64 = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidFuelRate { raw: value.clone() })?;
                    parsed.fuel_rate = Some(rate);
                }
                "--dry-run" => parsed.dry_run = true,
                "--help" | "-h" => parsed.help = true,
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(parsed)
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--endpoint <url>] [--fuel-rate <litres/s>] [--dry-run]");
    eprintln!();
    eprintln!("Reads host commands and UI events as JSON lines on stdin and writes");
    eprintln!("HUD snapshots as JSON lines on stdout.");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  HUD_ENDPOINT, HUD_FUEL_RATE, HUD_LITRE_PRICE, HUD_CURRENCY, HUD_MAX_LITRES");
    eprintln!("  HUD_PUMP_TICK_MS, HUD_PROGRESS_TICK_MS");
    eprintln!("  HUD_PUMP_HOLD_COMPLETED_MS, HUD_PUMP_HOLD_STOPPED_MS");
    eprintln!("  RUST_LOG (default: info)");
}

fn load_config(args: &Args) -> Result<HudConfig, Box<dyn std::error::Error>> {
    let mut config = HudConfig::from_env()?;
    if let Some(endpoint) = &args.endpoint {
        config = config.with_endpoint(endpoint.as_str())?;
    }
    if let Some(rate) = args.fuel_rate {
        config = config.with_fuel_rate(rate)?;
    }
    Ok(config)
}

fn notifier_for(args: &Args, config: &HudConfig) -> Arc<dyn HostNotifier> {
    if args.dry_run {
        Arc::new(LogNotifier)
    } else {
        Arc::new(HttpNotifier::new(config.endpoint.clone()))
    }
}

async fn render(
    hud: &HudContext,
    out: &mut tokio::io::Stdout,
    last_version: &mut Option<u64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let state = hud.state();
    let version = state.version();
    if *last_version == Some(version) {
        return Ok(());
    }
    *last_version = Some(version);

    let mut line = serde_json::to_string(&state.snapshot())?;
    line.push('\n');
    out.write_all(line.as_bytes()).await?;
    out.flush().await?;
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let args = Args::parse(&mut argv).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;
    if args.help {
        print_usage();
        return Ok(());
    }

    log_fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(&args)?;
    let notifier = notifier_for(&args, &config);
    info!(
        endpoint = %config.endpoint,
        fuel_rate = config.fuel_rate,
        dry_run = args.dry_run,
        "hud ready"
    );

    let mut hud = build_hud_context(&config, Clock::System, notifier);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    let mut ticker = interval(RENDER_PERIOD);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut last_version = None;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    debug!("stdin closed");
                    break;
                };
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                if let Err(err) = hud.dispatch(line) {
                    warn!(error = %err, "message rejected");
                }
                render(&hud, &mut stdout, &mut last_version).await?;
            }
            _ = ticker.tick() => render(&hud, &mut stdout, &mut last_version).await?,
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted");
                break;
            }
        }
    }

    render(&hud, &mut stdout, &mut last_version).await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
