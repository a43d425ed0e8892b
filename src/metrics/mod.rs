// metrics/mod.rs
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

use crate::events::{DEVICE_CHANGED, EventBus, VOICE_COMMAND};

pub fn setup_metrics(port: u16) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| anyhow::anyhow!("Failed to setup metrics: {}", e))?;
    tracing::info!("Metrics exporter listening on {}", addr);
    Ok(())
}

/// Count room events. Safe to call without an installed recorder.
pub fn record_events(bus: &EventBus) {
    bus.subscribe(DEVICE_CHANGED, |data| {
        let device = data["device"].as_str().unwrap_or("unknown").to_string();
        let state = if data["is_on"].as_bool().unwrap_or(false) { "on" } else { "off" };
        ::metrics::counter!("smart_room_device_changes_total", "device" => device, "state" => state)
            .increment(1);
    });
    bus.subscribe(VOICE_COMMAND, |data| {
        let outcome = data["outcome"].as_str().unwrap_or("unknown").to_string();
        ::metrics::counter!("smart_room_voice_commands_total", "outcome" => outcome).increment(1);
    });
}
