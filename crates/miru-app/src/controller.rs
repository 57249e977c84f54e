use std::sync::Arc;
use std::time::Duration;

use kanal::{AsyncReceiver, AsyncSender};
use miru_capture::FrameSource;
use miru_config::Config;
use miru_ocr::OcrInvoker;
use miru_sink::EventSink;
use miru_types::ChangeEvent;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::emitter::emitter_loop;
use crate::pipeline::{Pipeline, monitor_loop};
use crate::state::AppState;

/// Centralized channel management.
pub struct ChannelSet {
    pub events: (AsyncSender<ChangeEvent>, AsyncReceiver<ChangeEvent>),
}

impl ChannelSet {
    pub fn new() -> Self {
        Self {
            events: kanal::bounded_async(256), // burst capacity between loop and sink
        }
    }
}

/// Task spawning and lifecycle for the monitor and emitter loops.
pub struct MonitorController {
    channels: ChannelSet,
    state: Arc<AppState>,
    cancel_token: CancellationToken,
}

impl MonitorController {
    pub fn new(state: Arc<AppState>) -> Self {
        Self {
            channels: ChannelSet::new(),
            state,
            cancel_token: CancellationToken::new(),
        }
    }

    pub fn spawn_tasks(
        self,
        config: &Config,
        source: Arc<dyn FrameSource>,
        invoker: Arc<OcrInvoker>,
        sink: Arc<dyn EventSink>,
        once: bool,
    ) -> (JoinSet<anyhow::Result<()>>, CancellationToken) {
        let mut tasks = JoinSet::new();
        let (events_tx, events_rx) = self.channels.events;

        let pipeline = Pipeline::new(
            source,
            invoker,
            config.regions.clone(),
            events_tx,
            Arc::clone(&self.state.status),
            self.cancel_token.child_token(),
        );
        tasks.spawn(monitor_loop(
            pipeline,
            Duration::from_millis(config.capture.interval_ms),
            config.active_hours.clone(),
            self.cancel_token.child_token(),
            once,
        ));

        tasks.spawn(emitter_loop(
            events_rx,
            sink,
            Arc::clone(&self.state.status),
            self.cancel_token.child_token(),
        ));

        (tasks, self.cancel_token)
    }
}
