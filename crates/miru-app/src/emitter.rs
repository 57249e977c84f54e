use std::sync::Arc;

use kanal::AsyncReceiver;
use miru_sink::EventSink;
use miru_types::ChangeEvent;
use tokio_util::sync::CancellationToken;

use crate::status::MonitorStatus;

/// Forward confirmed events to the sink. A sink failure loses that one
/// event and is logged; the loop itself never dies from it. Exits when
/// the channel closes or on cancellation.
pub async fn emitter_loop(
    events_rx: AsyncReceiver<ChangeEvent>,
    sink: Arc<dyn EventSink>,
    status: Arc<MonitorStatus>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    loop {
        let event = tokio::select! {
            _ = cancel.cancelled() => break,
            event = events_rx.recv() => match event {
                Ok(event) => event,
                Err(_) => break, // producer gone
            },
        };

        if let Err(e) = sink.send(&event).await {
            status.record_lost_event();
            tracing::warn!(
                event_id = %event.id,
                region = %event.region,
                "sink delivery failed, event lost: {e}"
            );
        }
    }

    tracing::info!("emitter stopped");
    Ok(())
}
