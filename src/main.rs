use anyhow::Context;
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use spinwheel::config;
use spinwheel::events::WheelEvent;
use spinwheel::surface::LogSurface;
use spinwheel::sys::runtime::{self, ImmediateTimer, SpinResult, TokioTimer};
use spinwheel::wheel::Wheel;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Config file to load instead of the user config
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for the random draws, for repeatable spins
    #[arg(short, long)]
    seed: Option<u64>,

    /// Skip the step delays and settle at once
    #[arg(long)]
    instant: bool,

    /// Write the sample config to the config directory and exit
    #[arg(long)]
    init: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.init {
        let path = config::write_default_config().context("Failed to write default config")?;
        println!("{}", path.display());
        return Ok(());
    }

    let file_config = match &args.config {
        Some(path) => config::load_config(Some(path.as_path()))
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => config::load_or_default(),
    };
    log::info!(
        "Loaded {} items and {} filters",
        file_config.items.len(),
        file_config.filters.len()
    );

    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let mut wheel = Wheel::with_rng(file_config.into_wheel_config(), LogSurface::new(), rng)
        .context("Invalid wheel configuration")?;
    wheel.paint().context("Failed to paint the wheel")?;

    let (tx, rx) = async_channel::bounded(32);
    let listener = tokio::spawn(async move {
        while let Ok(event) = rx.recv().await {
            match event {
                WheelEvent::SpinStarted {
                    target,
                    total_steps,
                } => log::info!("Spinning {} steps towards slot {}", total_steps, target),
                WheelEvent::Settled { index, label } => {
                    log::info!("Settled on slot {}: {}", index, label)
                }
                WheelEvent::Cancelled => log::info!("Spin cancelled"),
            }
        }
    });

    let stop = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    let result = if args.instant {
        runtime::run_spin_until(&mut wheel, &mut ImmediateTimer::default(), Some(&tx), stop).await
    } else {
        runtime::run_spin_until(&mut wheel, &mut TokioTimer, Some(&tx), stop).await
    }
    .context("Spin failed")?;

    drop(tx);
    let _ = listener.await;

    match result {
        SpinResult::Settled(index) => {
            println!("{}", wheel.label_of(index).unwrap_or_default());
        }
        SpinResult::Cancelled => eprintln!("Spin cancelled"),
    }

    Ok(())
}
