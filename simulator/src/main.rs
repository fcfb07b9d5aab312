use anyhow::Context;
use carriercore::control::{SignalHandle, SystemHost};
use carriercore::element_interface::{read_carrier_table, CarrierRow};
use carriercore::prelude::{HostSignal, SpectrumElement};
use carriercore::telemetry::LogManager;
use clap::Parser;
use element_bridge::bridge::BridgeHandle;
use element_bridge::client::HttpElement;
use log::warn;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::thread;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use workflow::config::ScriptConfig;
use workflow::runner::{RunOutcome, RunReport, Runner, ScriptParams};

mod element_bridge;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Default carrier initialization for spectrum elements")]
struct Args {
    /// Initialize, GoodWeather, BadWeather, FrequencyShiftUp or FrequencyShiftDown
    #[arg(long, default_value = "Initialize")]
    mode: String,
    /// Row key moved by the frequency shift modes
    #[arg(long, default_value = "")]
    index_reference: String,
    /// Load a script config from YAML
    #[arg(long)]
    config: Option<PathBuf>,
    /// Base URL of an element bridge; overrides the config file
    #[arg(long)]
    element_url: Option<String>,
    /// Host the simulated element over HTTP until Ctrl+C
    #[arg(long, default_value_t = false)]
    serve: bool,
    /// Print the carrier table after the run
    #[arg(long, default_value_t = false)]
    show: bool,
}

/// Raises [`HostSignal::Abort`] on the running script when Ctrl+C is pressed.
fn spawn_ctrl_c_watcher(handle: SignalHandle) -> anyhow::Result<()> {
    let runtime = TokioBuilder::new_current_thread()
        .enable_all()
        .build()
        .context("creating runtime for signal handling")?;
    thread::spawn(move || {
        runtime.block_on(async {
            if signal::ctrl_c().await.is_ok() {
                handle.raise(HostSignal::Abort);
            }
        });
    });
    Ok(())
}

fn print_table(rows: &[CarrierRow]) {
    println!("{:<32} {:>12} {:>10} {:>10}", "carrier", "CF (MHz)", "span", "ampl (dB)");
    for row in rows {
        println!(
            "{:<32} {:>12.1} {:>10.1} {:>10.1}",
            row.key,
            row.settings.center_frequency_mhz,
            row.settings.span_mhz,
            row.settings.amplitude_db
        );
    }
}

fn main() -> anyhow::Result<ExitCode> {
    env_logger::init();
    let args = Args::parse();

    let mut config = if let Some(path) = args.config {
        ScriptConfig::load(path)?
    } else {
        ScriptConfig::default()
    };
    if let Some(url) = args.element_url {
        config.element_url = Some(url);
    }

    if args.serve {
        let element = Arc::new(config.simulation.build_element(&config.controller.schema));
        let bridge = BridgeHandle::spawn(element, config.bind_address)?;
        println!("Element bridge running on {} (Ctrl+C to stop)...", bridge.base_url());
        let runtime = TokioBuilder::new_current_thread()
            .enable_all()
            .build()
            .context("creating runtime for signal handling")?;
        runtime.block_on(async {
            signal::ctrl_c().await.context("awaiting Ctrl+C to exit")?;
            Ok::<(), anyhow::Error>(())
        })?;
        return Ok(ExitCode::SUCCESS);
    }

    let host =
        SystemHost::new(LogManager::new("carrier-script")).with_timeout(config.script_timeout());
    spawn_ctrl_c_watcher(host.signal_handle())?;

    let runner = Runner::new(config.controller.clone());
    let params = ScriptParams {
        mode: args.mode,
        index_reference: args.index_reference,
    };

    let element: Box<dyn SpectrumElement> = match config.element_url.as_deref() {
        Some(url) => Box::new(HttpElement::new(url)?),
        None => Box::new(config.simulation.build_element(&config.controller.schema)),
    };

    let report: RunReport = match runner.execute(element.as_ref(), &host, &params) {
        Ok(report) => report,
        Err(host_signal) => {
            warn!("run interrupted: {}", host_signal);
            return Ok(ExitCode::from(130));
        }
    };

    println!(
        "Run -> reads {}, writes {}, actions {}, errors {}",
        report.metrics.reads, report.metrics.writes, report.metrics.actions, report.metrics.errors
    );
    if args.show {
        let rows = read_carrier_table(element.as_ref(), &config.controller.schema)
            .context("reading carrier table")?;
        print_table(&rows);
    }

    match report.outcome {
        RunOutcome::Completed => Ok(ExitCode::SUCCESS),
        RunOutcome::Failed(message) => {
            eprintln!("{}", message);
            Ok(ExitCode::FAILURE)
        }
    }
}
