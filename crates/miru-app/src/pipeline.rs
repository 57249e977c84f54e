use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use kanal::AsyncSender;
use miru_capture::{CaptureError, FrameSource, extract_regions};
use miru_config::hours::ActiveHours;
use miru_config::region::RegionConfig;
use miru_core::{ChangeEngine, normalize};
use miru_ocr::{OcrError, OcrInvoker};
use miru_types::{ChangeEvent, Observation};
use tokio::task::JoinSet;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::schedule;
use crate::status::MonitorStatus;

/// One capture→recognize→decide→emit unit. Owns the change engine, so all
/// history mutation happens on the task driving `run_cycle`.
pub struct Pipeline {
    source: Arc<dyn FrameSource>,
    invoker: Arc<OcrInvoker>,
    regions: Vec<RegionConfig>,
    engine: ChangeEngine,
    events_tx: AsyncSender<ChangeEvent>,
    status: Arc<MonitorStatus>,
    cancel: CancellationToken,
}

impl Pipeline {
    pub fn new(
        source: Arc<dyn FrameSource>,
        invoker: Arc<OcrInvoker>,
        regions: Vec<RegionConfig>,
        events_tx: AsyncSender<ChangeEvent>,
        status: Arc<MonitorStatus>,
        cancel: CancellationToken,
    ) -> Self {
        let engine = ChangeEngine::new(&regions);
        Self {
            source,
            invoker,
            regions,
            engine,
            events_tx,
            status,
            cancel,
        }
    }

    /// Run one full cycle. Per-region failures are logged and isolated;
    /// only the frame capture gates the whole cycle.
    pub async fn run_cycle(&mut self) {
        self.status.record_cycle();

        let frame = match self.source.capture().await {
            Ok(frame) => frame,
            Err(e) => {
                self.status.record_capture_failure();
                tracing::warn!("capture failed, skipping cycle: {e}");
                return;
            }
        };

        let mut tasks: JoinSet<(String, Result<Observation, OcrError>)> = JoinSet::new();
        for (region, crop) in extract_regions(&frame, &self.regions) {
            match crop {
                Ok(image) => {
                    let invoker = Arc::clone(&self.invoker);
                    let region = region.clone();
                    let cancel = self.cancel.clone();
                    tasks.spawn(async move {
                        let result = invoker
                            .recognize(&image, &region, &cancel)
                            .await
                            .map(|record| normalize(&record));
                        (region.name, result)
                    });
                }
                Err(CaptureError::InvalidRegion(name)) => {
                    self.status.record_region_error();
                    tracing::warn!(region = %name, "region outside frame, skipped");
                }
                Err(e) => {
                    self.status.record_region_error();
                    tracing::warn!(region = %region.name, "extraction failed: {e}");
                }
            }
        }

        // Frame buffer is no longer needed once every crop exists.
        drop(frame);

        let mut observations = Vec::with_capacity(self.regions.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((_, Ok(obs))) => observations.push(obs),
                Ok((_, Err(OcrError::Cancelled))) => {
                    // Shutting down; late results must not reach history.
                }
                Ok((region, Err(e))) => {
                    self.status.record_region_error();
                    tracing::warn!(region = %region, "recognition failed: {e}");
                }
                Err(e) => {
                    self.status.record_region_error();
                    tracing::error!("region task panicked: {e}");
                }
            }
        }

        if self.cancel.is_cancelled() {
            return;
        }

        // Single-writer history application.
        for obs in &observations {
            match self.engine.observe(obs) {
                Ok(Some(event)) => {
                    self.status.record_event();
                    tracing::debug!(
                        region = %event.region,
                        previous = %event.previous,
                        current = %event.current,
                        "change confirmed"
                    );
                    if let Err(e) = self.events_tx.send(event).await {
                        tracing::warn!("emitter channel closed, event dropped: {e}");
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::error!("observation rejected: {e}");
                }
            }
        }
    }
}

/// Drive the pipeline at the configured cadence until cancellation.
/// `Skip` tick behavior guarantees a slow cycle delays rather than stacks.
pub async fn monitor_loop(
    mut pipeline: Pipeline,
    interval: Duration,
    active_hours: Option<ActiveHours>,
    cancel: CancellationToken,
    once: bool,
) -> anyhow::Result<()> {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        // --once is a smoke test and ignores the active-hours gate.
        if !once && !schedule::within_active_hours(active_hours.as_ref(), Local::now()) {
            tracing::debug!("outside active hours, idling");
            continue;
        }

        pipeline.run_cycle().await;

        if once {
            break;
        }
    }

    tracing::info!("monitor loop stopped");
    Ok(())
}
