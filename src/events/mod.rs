// events/mod.rs
use dashmap::DashMap;

pub const DEVICE_CHANGED: &str = "device_changed";
pub const VOICE_COMMAND: &str = "voice_command";

type Callback = Box<dyn Fn(serde_json::Value) + Send + Sync>;

pub struct EventBus {
    subscribers: DashMap<String, Vec<Callback>>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            subscribers: DashMap::new(),
        }
    }

    pub fn publish(&self, event_type: &str, data: serde_json::Value) {
        if let Some(subscribers) = self.subscribers.get(event_type) {
            for callback in subscribers.iter() {
                (callback)(data.clone());
            }
        }
    }

    pub fn subscribe<F: Fn(serde_json::Value) + Send + Sync + 'static>(
        &self,
        event_type: &str,
        callback: F,
    ) {
        self.subscribers
            .entry(event_type.to_string())
            .or_default()
            .push(Box::new(callback));
    }
}

/// Logs every room event at info level.
pub fn log_events(bus: &EventBus) {
    bus.subscribe(DEVICE_CHANGED, |data| {
        tracing::info!(device = %data["device"], is_on = %data["is_on"], "Device state changed");
    });
    bus.subscribe(VOICE_COMMAND, |data| {
        tracing::info!(outcome = %data["outcome"], text = %data["text"], "Voice command handled");
    });
}
