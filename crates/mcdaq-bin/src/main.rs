//! CLI demo for the mcdaq acquisition engine.
//!
//! Runs the engine against the simulated board: the mock free-runs a
//! synthetic ramp through its circular buffer (scan mode) or serves
//! slowly drifting channel values (sequential mode) while the demo
//! polls at a fixed interval and reports the reconstructed events.
//!
//! ```bash
//! RUST_LOG=debug mcdaq --polls 200 --poll-interval-ms 5
//! mcdaq --config device.toml
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use mcdaq_core::{AtomicEventIds, BufferedSink, DaqEvent, SystemClock};
use mcdaq_mcc::{DaqModel, McDaq, McDaqConfig, ReadMethod};
use mcdaq_mock::MockBoard;

#[derive(Parser)]
#[command(name = "mcdaq", about = "Simulated MC DAQ acquisition demo", long_about = None)]
struct Cli {
    /// TOML device configuration; defaults to a built-in scan setup
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of poll cycles to run
    #[arg(long, default_value_t = 100)]
    polls: u32,

    /// Delay between poll cycles in milliseconds
    #[arg(long, default_value_t = 10)]
    poll_interval_ms: u64,
}

fn default_config() -> McDaqConfig {
    McDaqConfig {
        board_id: 0,
        daq_model: DaqModel::Usb1616Fs,
        input_channels: vec![
            "AI_0".to_string(),
            "AI_1".to_string(),
            "AI_2".to_string(),
            "AI_3".to_string(),
        ],
        gain: Default::default(),
        input_scan_frequency: 1000,
        input_read_method: ReadMethod::Scan,
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            McDaqConfig::from_toml(&text)?
        }
        None => default_config(),
    };

    let sink = Arc::new(BufferedSink::default());
    let mut device = McDaq::new(
        MockBoard::new(),
        &config,
        Arc::new(SystemClock::new()),
        Arc::new(AtomicEventIds::new()),
        sink.clone(),
    )?;
    device.enable()?;

    // Keep the simulated producer roughly at the configured rate.
    let samples_per_cycle =
        (u64::from(config.input_scan_frequency) * 8 * cli.poll_interval_ms / 1000).max(8) as usize;
    let save_channels = device.plan().save_channels.clone();

    for cycle in 0..cli.polls {
        match config.input_read_method {
            ReadMethod::Scan => device.board_mut().produce(samples_per_cycle),
            ReadMethod::Poll => {
                // Step the simulated inputs every few cycles so the
                // debounce has something to suppress in between.
                let drift = f64::from(cycle / 10) * 0.1;
                for (i, channel) in save_channels.iter().enumerate() {
                    device.board_mut().set_channel(*channel, i as f64 + drift);
                }
            }
        }
        device.poll()?;
        std::thread::sleep(Duration::from_millis(cli.poll_interval_ms));
    }
    device.disable()?;

    let events = sink.drain();
    info!(
        events = events.len(),
        dropped = sink.drop_count(),
        "Acquisition complete"
    );
    for event in events.iter().take(5) {
        match event {
            DaqEvent::MultiChannel(e) => info!(
                sequence = e.sequence_index,
                hub_time = e.hub_time,
                delay = e.delay,
                "multi-channel event"
            ),
            DaqEvent::SingleChannel(e) => info!(
                channel = %e.channel_name,
                value = e.float_value,
                "single-channel event"
            ),
        }
    }

    Ok(())
}
