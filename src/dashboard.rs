// dashboard.rs
use chrono::Utc;
use serde_json::json;
use std::str::FromStr;

use crate::{
    commands,
    devices::{DeviceId, DeviceView},
    error::AppError,
    events::{DEVICE_CHANGED, VOICE_COMMAND},
    models::{AppState, ControlView, DashboardView, StatusColumn},
};

pub const TITLE: &str = "Smart Room Automation";
pub const DESCRIPTION: &str = "Control your room devices: Light, Fan, AC, and LED.";
pub const STATUS_HEADING: &str = "Device Status";
pub const UPDATED_STATUS_HEADING: &str = "Updated Device Status";
pub const LISTEN_LABEL: &str = "Listen for Commands";

/// A single UI event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Control {
    TurnOn(String),
    TurnOff(String),
    Listen,
}

impl Control {
    pub fn kind(&self) -> &'static str {
        match self {
            Control::TurnOn(_) => "turn_on",
            Control::TurnOff(_) => "turn_off",
            Control::Listen => "listen",
        }
    }
}

impl FromStr for Control {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "listen" {
            Ok(Control::Listen)
        } else if let Some(id) = s.strip_prefix("turn_on_") {
            Ok(Control::TurnOn(id.to_string()))
        } else if let Some(id) = s.strip_prefix("turn_off_") {
            Ok(Control::TurnOff(id.to_string()))
        } else {
            Err(AppError::UnknownControl(s.to_string()))
        }
    }
}

/// The nine buttons, always in the same order.
pub fn controls() -> Vec<ControlView> {
    let mut controls: Vec<ControlView> = DeviceId::ALL
        .into_iter()
        .flat_map(|id| {
            [
                ControlView {
                    id: format!("turn_on_{id}"),
                    label: format!("Turn On {}", id.name()),
                },
                ControlView {
                    id: format!("turn_off_{id}"),
                    label: format!("Turn Off {}", id.name()),
                },
            ]
        })
        .collect();
    controls.push(ControlView {
        id: "listen".to_string(),
        label: LISTEN_LABEL.to_string(),
    });
    controls
}

fn render(
    before: Vec<DeviceView>,
    after: Vec<DeviceView>,
    status_lines: Vec<String>,
) -> DashboardView {
    DashboardView {
        title: TITLE.to_string(),
        description: DESCRIPTION.to_string(),
        columns: vec![
            StatusColumn {
                heading: STATUS_HEADING.to_string(),
                devices: before,
            },
            StatusColumn {
                heading: UPDATED_STATUS_HEADING.to_string(),
                devices: after,
            },
        ],
        controls: controls(),
        status_lines,
        rendered_at: Utc::now(),
    }
}

pub async fn snapshot(state: &AppState) -> DashboardView {
    let devices = state.registry.lock().await.views();
    render(devices.clone(), devices, Vec::new())
}

/// Run one control to completion. The registry stays locked for the whole
/// interaction, voice capture included.
pub async fn interact(state: &AppState, control: Control) -> DashboardView {
    let mut registry = state.registry.lock().await;
    let before = registry.views();
    let mut status_lines = Vec::new();

    ::metrics::counter!("smart_room_interactions_total", "control" => control.kind())
        .increment(1);

    match control {
        Control::TurnOn(id) => registry.turn_on(&id),
        Control::TurnOff(id) => registry.turn_off(&id),
        Control::Listen => {
            let report = commands::handle_voice(state.speech.as_ref(), &mut registry).await;
            let event = match &report.result {
                Ok((text, actions)) => {
                    let outcome = if actions.is_empty() { "no_match" } else { "applied" };
                    json!({ "outcome": outcome, "text": text, "actions": actions })
                }
                Err(e) => json!({ "outcome": e.outcome(), "text": null, "actions": [] }),
            };
            state.events.publish(VOICE_COMMAND, event);
            status_lines = report.status_lines;
        }
    }

    let after = registry.views();
    drop(registry);

    for (old, new) in before.iter().zip(&after) {
        if old.is_on != new.is_on {
            state
                .events
                .publish(DEVICE_CHANGED, json!({ "device": new.id, "is_on": new.is_on }));
        }
    }

    render(before, after, status_lines)
}
