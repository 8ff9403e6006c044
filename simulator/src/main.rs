use anyhow::Context;
use clap::Parser;
use std::io;
use std::path::PathBuf;
use tokio::runtime::Builder as TokioBuilder;
use workflow::config::SimulatorConfig;
use workflow::runner::Runner;

mod generator;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Demo MAVLink vehicle for the ground station console")]
struct Args {
    /// Print N flight steps as JSON lines instead of transmitting
    #[arg(long)]
    offline: Option<usize>,
    /// Load endpoint, rate and flight profile from YAML
    #[arg(long)]
    profile: Option<PathBuf>,
    #[arg(long, default_value = "udpout:127.0.0.1:14550")]
    endpoint: String,
    #[arg(long, default_value_t = 10.0)]
    rate_hz: f32,
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = if let Some(path) = args.profile {
        SimulatorConfig::load(path)?
    } else {
        SimulatorConfig::from_args(args.endpoint, args.rate_hz, args.seed)
    };
    let runner = Runner::new(config);

    if let Some(steps) = args.offline {
        let stdout = io::stdout();
        let states = runner.offline(steps, &mut stdout.lock())?;
        if let Some(last) = states.last() {
            eprintln!(
                "Offline run -> {} steps, final altitude {:.1} m, battery {:.1}%",
                states.len(),
                last.altitude_m,
                last.battery_percent
            );
        }
        return Ok(());
    }

    let runtime = TokioBuilder::new_current_thread()
        .enable_all()
        .build()
        .context("creating runtime for the transmit loop")?;
    runtime.block_on(runner.serve())
}
