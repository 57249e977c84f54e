use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use miru_capture::{FrameSource, ScreenSource};
use miru_config::Config;
use miru_ocr::{HttpOcrEngine, OcrInvoker};
use tokio::signal;

mod controller;
mod emitter;
mod pipeline;
mod schedule;
mod state;
mod status;
mod telemetry;

#[cfg(test)]
mod tests;

use self::controller::MonitorController;
use self::state::AppState;

#[derive(Parser)]
#[command(name = "miru", about = "Continuous visual-text monitor")]
struct Args {
    /// JSON profile with regions, capture, OCR and sink settings.
    #[arg(short, long, default_value = "miru.json")]
    config: PathBuf,

    /// Run a single cycle and exit. Useful for smoke-testing a profile.
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init();

    let args = Args::parse();

    let loaded = Config::load(&args.config)
        .with_context(|| format!("loading config from {}", args.config.display()))?;
    loaded.validate().context("invalid configuration")?;

    let state = Arc::new(AppState::new(loaded));
    let config = state.config.read().await.clone();

    tracing::info!(
        regions = config.regions.len(),
        interval_ms = config.capture.interval_ms,
        source = %config.capture.source,
        "starting monitor"
    );

    let source: Arc<dyn FrameSource> = Arc::new(ScreenSource::new(&config.capture));

    // The backend must be reachable before the loop starts; a dead
    // backend at startup is a configuration problem, not a transient one.
    source
        .capture()
        .await
        .context("capture backend unreachable at startup")?;

    let engine = Arc::new(HttpOcrEngine::new(&config.ocr));
    let invoker = Arc::new(OcrInvoker::new(engine, &config.ocr));
    let sink: Arc<dyn miru_sink::EventSink> =
        Arc::from(miru_sink::from_config(&config.sink).context("building event sink")?);

    let controller = MonitorController::new(Arc::clone(&state));
    let (mut tasks, cancel) =
        controller.spawn_tasks(&config, source, invoker, sink, args.once);

    tokio::select! {
        _ = signal::ctrl_c() => {
            tracing::info!("shutdown requested");
            cancel.cancel();
        }
        // A loop finishing on its own means --once completed or an
        // internal failure; either way, wind the rest down.
        result = tasks.join_next() => {
            if let Some(Ok(Err(e))) = result {
                tracing::error!("task exited with error: {e}");
            }
            cancel.cancel();
        }
    }

    while let Some(result) = tasks.join_next().await {
        match result {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::error!("task exited with error: {e}"),
            Err(e) => tracing::error!("task panicked: {e}"),
        }
    }

    state.status.log_summary();
    Ok(())
}
